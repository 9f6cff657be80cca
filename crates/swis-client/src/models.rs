//! SWIS API models
//!
//! Request bodies for the fixed endpoints and the entity shapes the
//! domain helpers decode. Field names follow the SWQL column names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorKind, SwisError};

/// Body of a `Query` request
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    /// SWQL text
    pub query: &'a str,
    /// Named `@parameter` values, sent as `null` when absent
    pub parameters: Option<&'a Value>,
}

/// Body of a `BulkDelete` request
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteRequest<'a> {
    /// `swis://` URIs to delete
    pub uris: &'a [String],
}

/// Body of a `BulkUpdate` request
#[derive(Debug, Clone, Serialize)]
pub struct BulkUpdateRequest<'a> {
    /// `swis://` URIs to update
    pub uris: &'a [String],
    /// Properties written to every URI
    pub properties: &'a serde_json::Map<String, Value>,
}

/// Typed query output with its row count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult<T> {
    /// Decoded rows, in service order
    pub results: Vec<T>,
    /// Number of rows in `results`
    pub count: usize,
}

impl<T> QueryResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    /// Decode a raw result array into typed rows
    ///
    /// # Errors
    /// An internal error if the rows do not match `T`.
    pub fn from_slice(data: &[u8]) -> Result<Self, SwisError> {
        let results: Vec<T> = serde_json::from_slice(data).map_err(|e| {
            SwisError::wrap(e, ErrorKind::Internal, "unmarshal", "failed to unmarshal query result")
        })?;

        Ok(Self {
            count: results.len(),
            results,
        })
    }
}

/// IPAM IP node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpAddress {
    /// IPAM node id, used to build the node's `swis://` URI
    #[serde(rename = "IpNodeId", default)]
    pub ip_node_id: u64,
    /// Dotted address text
    #[serde(rename = "IPAddress", alias = "DisplayName", default)]
    pub address: String,
    /// Status name, or the numeric code as text
    #[serde(rename = "Status", default, deserialize_with = "status_text")]
    pub status: String,
    /// Free-text comment attached to the node
    #[serde(rename = "Comments", default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

// IPAM reports status either as a name or as its numeric code
fn status_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// IPAM status values accepted by `ChangeIPStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpStatus {
    /// Assigned to a host
    Used,
    /// Free to hand out
    Available,
    /// Held back, not handed out
    Reserved,
    /// Dynamically assigned (DHCP)
    Transient,
}

impl IpStatus {
    /// Name expected by the IPAM verbs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Used => "Used",
            Self::Available => "Available",
            Self::Reserved => "Reserved",
            Self::Transient => "Transient",
        }
    }
}

/// IPAM subnet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subnet {
    #[serde(rename = "SubnetId")]
    pub subnet_id: u64,
    #[serde(rename = "Address")]
    pub address: String,
    /// Prefix length
    #[serde(rename = "CIDR")]
    pub cidr: u32,
    #[serde(rename = "Comments")]
    pub comments: Option<String>,
    #[serde(rename = "AddressMask")]
    pub address_mask: String,
    #[serde(rename = "DisplayName")]
    pub display_name: String,
    #[serde(rename = "FriendlyName")]
    pub friendly_name: String,
    /// VLAN id as IPAM stores it (text)
    #[serde(rename = "VLAN")]
    pub vlan: Option<String>,
    #[serde(rename = "TotalCount")]
    pub total_count: u64,
    #[serde(rename = "UsedCount")]
    pub used_count: u64,
    #[serde(rename = "AvailableCount")]
    pub available_count: u64,
    #[serde(rename = "ReservedCount")]
    pub reserved_count: u64,
    #[serde(rename = "TransientCount")]
    pub transient_count: u64,
    #[serde(rename = "StatusName")]
    pub status_name: Option<String>,
}

/// Universal Device Poller assignment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assignment {
    #[serde(rename = "CustomPollerAssignmentID")]
    pub id: String,
    #[serde(rename = "CustomPollerID")]
    pub custom_poller_id: String,
    #[serde(rename = "NodeID")]
    pub node_id: u64,
    /// Set only for interface-level pollers
    #[serde(rename = "InterfaceID")]
    pub interface_id: Option<u64>,
    #[serde(rename = "InstanceType")]
    pub instance_type: String,
}

/// Commonly used `Orion.Nodes` columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    #[serde(rename = "NodeID")]
    pub node_id: u64,
    #[serde(rename = "Caption")]
    pub caption: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    /// One of the [`node_status`] codes
    #[serde(rename = "Status")]
    pub status: i32,
    #[serde(rename = "Vendor")]
    pub vendor: Option<String>,
    #[serde(rename = "MachineType")]
    pub machine_type: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "LastBoot")]
    pub last_boot: Option<String>, // ISO 8601 datetime
    #[serde(rename = "ResponseTime")]
    pub response_time: Option<f64>,
}

/// Orion node status codes
pub mod node_status {
    /// Not polled yet
    pub const UNKNOWN: i32 = 0;
    /// Responding normally
    pub const UP: i32 = 1;
    /// Not responding
    pub const DOWN: i32 = 2;
    /// Responding with degraded health
    pub const WARNING: i32 = 3;
    /// Cannot be reached from the poller
    pub const UNREACHABLE: i32 = 12;
    /// Responding with critical health
    pub const CRITICAL: i32 = 14;
}

/// Data type of a custom property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomPropertyType {
    /// Text, limited by `length`
    String,
    /// Whole number
    Integer,
    /// Floating point number
    Float,
    /// True or false
    Boolean,
    /// Date and time
    #[serde(rename = "datetime")]
    DateTime,
}

impl CustomPropertyType {
    /// Name expected by `CreateCustomProperty`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
        }
    }
}

/// Parameters for defining a new custom property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCustomPropertyRequest {
    /// Entity the property belongs to, e.g. `Orion.NodesCustomProperties`
    pub entity: String,
    /// Property (column) name
    pub name: String,
    /// Shown in the Orion UI
    pub description: String,
    /// Data type of the new column
    #[serde(rename = "type")]
    pub property_type: CustomPropertyType,
    /// Maximum length; 0 picks the default for strings
    #[serde(default, skip_serializing_if = "is_zero")]
    pub length: u32,
}

#[allow(clippy::trivially_copy_pass_by_ref, reason = "serde skip_serializing_if signature")]
fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// Default length of string custom properties
pub const DEFAULT_STRING_PROPERTY_LENGTH: u32 = 400;

impl CreateCustomPropertyRequest {
    /// Check the request before it is sent
    ///
    /// # Errors
    /// A validation error for an empty entity or name.
    pub fn validate(&self) -> Result<(), SwisError> {
        if self.entity.is_empty() {
            return Err(SwisError::new(
                ErrorKind::Validation,
                "create_custom_property",
                "entity cannot be empty",
            ));
        }
        if self.name.is_empty() {
            return Err(SwisError::new(
                ErrorKind::Validation,
                "create_custom_property",
                "name cannot be empty",
            ));
        }
        Ok(())
    }

    /// Positional arguments of the `CreateCustomProperty` verb
    pub fn verb_arguments(&self) -> Vec<String> {
        let length = match (self.property_type, self.length) {
            (CustomPropertyType::String, 0) => DEFAULT_STRING_PROPERTY_LENGTH,
            (_, length) => length,
        };

        let mut args = vec![
            self.name.clone(),
            self.description.clone(),
            self.property_type.as_str().to_string(),
            length.to_string(),
        ];
        // default value, validation, units, format, tooltip, category, subcategory
        args.extend(std::iter::repeat_n(String::new(), 7));
        // mandatory
        args.push("false".to_string());
        // display name
        args.push(String::new());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ip_address_accepts_numeric_status() {
        let ip: IpAddress =
            serde_json::from_value(json!({"IpNodeId": 7, "IPAddress": "10.0.0.7", "Status": 2})).unwrap();

        assert_eq!(ip.ip_node_id, 7);
        assert_eq!(ip.address, "10.0.0.7");
        assert_eq!(ip.status, "2");
    }

    #[test]
    fn test_ip_address_display_name_alias() {
        let ip: IpAddress = serde_json::from_value(json!({"DisplayName": "10.0.0.9"})).unwrap();
        assert_eq!(ip.address, "10.0.0.9");
        assert_eq!(ip.status, "");
    }

    #[test]
    fn test_query_result_counts_rows() {
        let result: QueryResult<Node> =
            QueryResult::from_slice(br#"[{"NodeID":1,"Caption":"a"},{"NodeID":2,"Caption":"b"}]"#).unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result.results[1].caption, "b");
    }

    #[test]
    fn test_query_result_decode_failure_is_internal() {
        let err = QueryResult::<Node>::from_slice(b"{\"not\":\"rows\"}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_custom_property_arguments() {
        let req = CreateCustomPropertyRequest {
            entity: "Orion.NodesCustomProperties".to_string(),
            name: "Owner".to_string(),
            description: "Team owning the node".to_string(),
            property_type: CustomPropertyType::String,
            length: 0,
        };

        let args = req.verb_arguments();
        assert_eq!(args.len(), 13);
        assert_eq!(args[0], "Owner");
        assert_eq!(args[2], "string");
        assert_eq!(args[3], "400");
        assert_eq!(args[11], "false");
    }

    #[test]
    fn test_custom_property_validation() {
        let req = CreateCustomPropertyRequest {
            entity: String::new(),
            name: "Owner".to_string(),
            description: String::new(),
            property_type: CustomPropertyType::Integer,
            length: 0,
        };

        let err = req.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "entity cannot be empty");
        assert_eq!(req.verb_arguments()[3], "0");
    }
}
