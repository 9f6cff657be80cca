//! `solarcmd subnet ...`

use anyhow::Context;
use serde_json::Value;
use swis_client::{RequestContext, SwisClientTrait};

use crate::cli::SubnetFindOptions;

/// Subnet by name or VLAN, `null` if none matches
pub async fn find(client: &dyn SwisClientTrait, ctx: &RequestContext, options: &SubnetFindOptions) -> anyhow::Result<Value> {
    let subnet = match (&options.name, &options.vlan) {
        (Some(name), _) => client
            .get_subnet(ctx, name)
            .await
            .with_context(|| format!("failed to find subnet {name}"))?,
        (None, Some(vlan)) => client
            .get_subnet_by_vlan(ctx, vlan)
            .await
            .with_context(|| format!("failed to find subnet on VLAN {vlan}"))?,
        (None, None) => anyhow::bail!("either --name or --vlan is required"),
    };
    Ok(serde_json::to_value(subnet)?)
}

pub async fn list(client: &dyn SwisClientTrait, ctx: &RequestContext) -> anyhow::Result<Value> {
    let subnets = client.list_subnets(ctx).await.context("failed to list subnets")?;
    Ok(serde_json::to_value(subnets)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swis_client::{ErrorKind, MockSwisClient, Subnet, SwisError};

    fn mock() -> MockSwisClient {
        let mock = MockSwisClient::new();
        mock.add_subnet(Subnet {
            subnet_id: 1,
            address: "10.0.0.0".to_string(),
            cidr: 24,
            display_name: "build-net".to_string(),
            vlan: Some("120".to_string()),
            ..Subnet::default()
        });
        mock.add_subnet(Subnet {
            subnet_id: 2,
            address: "10.0.1.0".to_string(),
            cidr: 24,
            display_name: "mgmt-net".to_string(),
            ..Subnet::default()
        });
        mock
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let options = SubnetFindOptions {
            name: Some("mgmt-net".to_string()),
            vlan: None,
        };

        let value = find(&mock(), &RequestContext::background(), &options).await.unwrap();

        assert_eq!(value["SubnetId"], 2);
        assert_eq!(value["CIDR"], 24);
    }

    #[tokio::test]
    async fn test_find_by_vlan() {
        let options = SubnetFindOptions {
            name: None,
            vlan: Some("120".to_string()),
        };

        let value = find(&mock(), &RequestContext::background(), &options).await.unwrap();
        assert_eq!(value["DisplayName"], "build-net");

        let missing = SubnetFindOptions {
            name: None,
            vlan: Some("999".to_string()),
        };
        assert_eq!(find(&mock(), &RequestContext::background(), &missing).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_list() {
        let value = list(&mock(), &RequestContext::background()).await.unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_find_failure_is_reported() {
        let mock = mock();
        mock.fail_endpoint("Query", 500);
        let options = SubnetFindOptions {
            name: Some("build-net".to_string()),
            vlan: None,
        };

        let err = find(&mock, &RequestContext::background(), &options).await.unwrap_err();

        assert!(err.to_string().contains("failed to find subnet build-net"));
        assert_eq!(err.downcast_ref::<SwisError>().unwrap().kind(), ErrorKind::Internal);
        assert_eq!(mock.calls()[0].endpoint, "Query");
    }

    #[tokio::test]
    async fn test_list_sends_subnet_query() {
        let mock = mock();

        list(&mock, &RequestContext::background()).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        let query = calls[0].body.as_ref().unwrap()["query"].as_str().unwrap().to_string();
        assert!(query.ends_with("WHERE GroupTypeText = 'Subnet'"));
    }
}
