//! Subnet lookups against `IPAM.Subnet`

use serde_json::json;

use crate::client::SwisClient;
use crate::context::RequestContext;
use crate::error::SwisError;
use crate::models::Subnet;

const SUBNET_COLUMNS: &str = "SubnetId, Address, CIDR, Comments, AddressMask, DisplayName, FriendlyName, VLAN, \
     TotalCount, UsedCount, AvailableCount, ReservedCount, TransientCount, StatusName";

pub(crate) const BY_NAME: &str = " WHERE DisplayName = @name";
pub(crate) const BY_VLAN: &str = " WHERE VLAN = @vlan";
pub(crate) const ALL_SUBNETS: &str = " WHERE GroupTypeText = 'Subnet'";

pub(crate) fn subnet_query(filter: &str) -> String {
    format!("SELECT {SUBNET_COLUMNS} FROM IPAM.Subnet{filter}")
}

impl SwisClient {
    /// Find a subnet by display name
    ///
    /// # Errors
    /// Any query error.
    pub async fn get_subnet_ctx(&self, ctx: &RequestContext, name: &str) -> Result<Option<Subnet>, SwisError> {
        let query = subnet_query(BY_NAME);
        let parameters = json!({ "name": name });
        let result = self.query_as_ctx::<Subnet>(ctx, &query, Some(&parameters)).await?;
        if result.count == 0 {
            tracing::info!(name, "no subnet matching that name found");
        }
        Ok(result.results.into_iter().next())
    }

    /// [`SwisClient::get_subnet_ctx`] without cancellation
    ///
    /// # Errors
    /// Any query error.
    pub async fn get_subnet(&self, name: &str) -> Result<Option<Subnet>, SwisError> {
        self.get_subnet_ctx(&RequestContext::background(), name).await
    }

    /// Find a subnet by VLAN
    ///
    /// # Errors
    /// Any query error.
    pub async fn get_subnet_by_vlan_ctx(&self, ctx: &RequestContext, vlan: &str) -> Result<Option<Subnet>, SwisError> {
        let query = subnet_query(BY_VLAN);
        let parameters = json!({ "vlan": vlan });
        let result = self.query_as_ctx::<Subnet>(ctx, &query, Some(&parameters)).await?;
        Ok(result.results.into_iter().next())
    }

    /// [`SwisClient::get_subnet_by_vlan_ctx`] without cancellation
    ///
    /// # Errors
    /// Any query error.
    pub async fn get_subnet_by_vlan(&self, vlan: &str) -> Result<Option<Subnet>, SwisError> {
        self.get_subnet_by_vlan_ctx(&RequestContext::background(), vlan).await
    }

    /// All subnets known to IPAM
    ///
    /// # Errors
    /// Any query error.
    pub async fn list_subnets_ctx(&self, ctx: &RequestContext) -> Result<Vec<Subnet>, SwisError> {
        let query = subnet_query(ALL_SUBNETS);
        Ok(self.query_as_ctx::<Subnet>(ctx, &query, None).await?.results)
    }

    /// [`SwisClient::list_subnets_ctx`] without cancellation
    ///
    /// # Errors
    /// Any query error.
    pub async fn list_subnets(&self) -> Result<Vec<Subnet>, SwisError> {
        self.list_subnets_ctx(&RequestContext::background()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subnet_query() {
        let query = subnet_query(BY_VLAN);
        assert!(query.starts_with("SELECT SubnetId, Address, CIDR,"));
        assert!(query.ends_with("FROM IPAM.Subnet WHERE VLAN = @vlan"));
    }
}
