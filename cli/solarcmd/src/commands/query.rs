//! `solarcmd query <swql>`

use anyhow::Context;
use serde_json::{Map, Value};
use swis_client::{RequestContext, SwisClientTrait};

use crate::cli::QueryOptions;
use crate::error::CliError;

/// Turn `--param key=value` pairs into a parameter object.
///
/// Values that parse as JSON (numbers, booleans, quoted strings) keep their
/// type; anything else is sent as a string.
pub fn parse_params(params: &[String]) -> Result<Option<Value>, CliError> {
    if params.is_empty() {
        return Ok(None);
    }

    let mut object = Map::new();
    for param in params {
        let (key, value) = param
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| CliError::InvalidParam(param.clone()))?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        object.insert(key.trim().to_string(), value);
    }
    Ok(Some(Value::Object(object)))
}

/// Run the query and return the raw result rows
pub async fn run(client: &dyn SwisClientTrait, ctx: &RequestContext, options: &QueryOptions) -> anyhow::Result<Value> {
    let parameters = parse_params(&options.params)?;
    let raw = client
        .query(ctx, &options.swql, parameters.as_ref())
        .await
        .context("query failed")?;
    serde_json::from_slice(&raw).context("query returned invalid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use swis_client::{ErrorKind, MockSwisClient, SwisError};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_params() {
        assert_eq!(parse_params(&[]).unwrap(), None);

        let parsed = parse_params(&strings(&["vendor=Cisco", "status=1", "managed=true", "note=a=b"])).unwrap();
        assert_eq!(
            parsed,
            Some(json!({"vendor": "Cisco", "status": 1, "managed": true, "note": "a=b"}))
        );
    }

    #[test]
    fn test_parse_params_rejects_malformed() {
        assert!(matches!(
            parse_params(&strings(&["novalue"])),
            Err(CliError::InvalidParam(p)) if p == "novalue"
        ));
        assert!(parse_params(&strings(&["=1"])).is_err());
    }

    #[tokio::test]
    async fn test_run_prints_rows_in_order() {
        let mock = MockSwisClient::new();
        let swql = "SELECT Caption, NodeID FROM Orion.Nodes WHERE Vendor = @vendor";
        mock.set_query_result(swql, r#"[{"Caption":"edge-1","NodeID":10}]"#);
        let options = QueryOptions {
            swql: swql.to_string(),
            params: strings(&["vendor=Cisco"]),
        };

        let value = run(&mock, &RequestContext::background(), &options).await.unwrap();

        assert_eq!(serde_json::to_string(&value).unwrap(), r#"[{"Caption":"edge-1","NodeID":10}]"#);
        let call = &mock.calls()[0];
        assert_eq!(call.endpoint, "Query");
        assert_eq!(call.body.as_ref().unwrap()["parameters"], json!({"vendor": "Cisco"}));
    }

    #[tokio::test]
    async fn test_run_blank_query() {
        let mock = MockSwisClient::new();
        let options = QueryOptions {
            swql: "   ".to_string(),
            params: Vec::new(),
        };

        let err = run(&mock, &RequestContext::background(), &options).await.unwrap_err();

        assert_eq!(err.downcast_ref::<SwisError>().unwrap().kind(), ErrorKind::Swql);
        assert!(mock.calls().is_empty());
    }
}
