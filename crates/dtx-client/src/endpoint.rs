//! Data-type endpoint paths and response decoding.

use crate::error::{ClientError, Result};
use dtx_core::{Counter, FieldTree};
use dtx_ops::{DataTypeKind, DataTypeObject, DataTypeValue};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Location of one data-type object behind the explorer's cluster proxy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataTypePath {
    pub cluster_id: String,
    pub bucket_type: String,
    pub bucket: String,
    pub key: String,
}

impl DataTypePath {
    pub fn new(
        cluster_id: impl Into<String>,
        bucket_type: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            bucket_type: bucket_type.into(),
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Full URL of the per-key data-type endpoint under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/riak/clusters/{}/types/{}/buckets/{}/datatypes/{}",
            base_url.trim_end_matches('/'),
            self.cluster_id,
            self.bucket_type,
            self.bucket,
            self.key
        )
    }
}

/// Body of a data-type fetch: `{"type": "map", "value": {...}}`.
#[derive(Debug, Deserialize)]
struct FetchResponse {
    #[serde(rename = "type")]
    data_type: String,
    value: Value,
}

/// Decode a fetched data-type body into an object, classifying map payloads.
///
/// `declared` is the data type the bucket type's properties declare.
pub fn decode_object(path: &DataTypePath, declared: &str, body: &str) -> Result<DataTypeObject> {
    let response: FetchResponse = serde_json::from_str(body)?;
    let kind: DataTypeKind = response.data_type.parse()?;

    let value = match kind {
        DataTypeKind::Counter => {
            let value = response
                .value
                .as_i64()
                .ok_or_else(|| malformed("counter value is not an integer"))?;
            DataTypeValue::Counter(Counter::new(value))
        }
        DataTypeKind::Set => {
            let items = response
                .value
                .as_array()
                .ok_or_else(|| malformed("set value is not an array"))?;
            let elements = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| malformed("set element is not a string"))
                })
                .collect::<Result<BTreeSet<_>>>()?;
            DataTypeValue::Set(elements)
        }
        DataTypeKind::Map => {
            let payload = response
                .value
                .as_object()
                .ok_or_else(|| malformed("map value is not an object"))?;
            DataTypeValue::Map(FieldTree::from_payload(path.key.clone(), payload)?)
        }
    };

    Ok(DataTypeObject::new(
        path.bucket_type.clone(),
        path.bucket.clone(),
        path.key.clone(),
        value,
    )
    .with_data_type(declared))
}

fn malformed(reason: &str) -> ClientError {
    ClientError::MalformedResponse(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtx_ops::OperationError;

    fn path() -> DataTypePath {
        DataTypePath::new("default", "maps", "users", "u1")
    }

    #[test]
    fn test_url() {
        assert_eq!(
            path().url("http://localhost:9000/"),
            "http://localhost:9000/riak/clusters/default/types/maps/buckets/users/datatypes/u1"
        );
    }

    #[test]
    fn test_decode_counter() {
        let object = decode_object(&path(), "counter", r#"{"type":"counter","value":12}"#).unwrap();
        assert_eq!(object.value, DataTypeValue::Counter(Counter::new(12)));
        assert_eq!(object.data_type, "counter");
    }

    #[test]
    fn test_decode_set() {
        let object = decode_object(&path(), "set", r#"{"type":"set","value":["b","a"]}"#).unwrap();
        match object.value {
            DataTypeValue::Set(items) => {
                assert_eq!(items.into_iter().collect::<Vec<_>>(), vec!["a", "b"])
            }
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_decode_map() {
        let body = r#"{"type":"map","value":{"name_register":"ann","prefs_map":{"dark_flag":true}}}"#;
        let object = decode_object(&path(), "map", body).unwrap();
        let tree = object.tree().unwrap();
        assert_eq!(tree.get(tree.root()).unwrap().name, "u1");
        assert!(tree.find_path("prefs_map.dark_flag").is_ok());
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_object(&path(), "hll", r#"{"type":"hll","value":3}"#),
            Err(ClientError::Operation(OperationError::InvalidDataType(_)))
        ));
        assert!(matches!(
            decode_object(&path(), "counter", r#"{"type":"counter","value":"3"}"#),
            Err(ClientError::MalformedResponse(_))
        ));
        assert!(matches!(
            decode_object(&path(), "map", r#"{"type":"map","value":{"a_counter":"x"}}"#),
            Err(ClientError::Field(_))
        ));
        assert!(matches!(
            decode_object(&path(), "map", "not json"),
            Err(ClientError::MalformedResponse(_))
        ));
    }
}
