//! Wire-level data types for the Import API

use std::fmt;

use serde::{Deserialize, Serialize};
pub use serde_json::{Map, Value};

use crate::constants::{VALIDATE_SAMPLE_KEY, VALIDATE_SAMPLE_TABLE};

/// One row to upsert: field name → JSON value, insertion order preserved.
pub type Record = Map<String, Value>;

/// Decoded response body returned by the service.
pub type ApiResult = Value;

/// Credentials issued for an Import API integration
///
/// Immutable once constructed. The access token is redacted from `Debug`
/// output so credentials can travel inside logged config structs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    client_id: u64,
    access_token: String,
}

impl Credentials {
    /// Credentials for `client_id` authenticated by `access_token`.
    pub fn new(client_id: u64, access_token: impl Into<String>) -> Self {
        Self { client_id, access_token: access_token.into() }
    }

    /// Integration client id.
    pub fn client_id(&self) -> u64 {
        self.client_id
    }

    /// Bearer token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Command action understood by the Import API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Insert-or-update keyed by the command's `key_names`.
    Upsert,
}

crate::impl_wire_name_conversions!(Action {
    Upsert => "upsert",
});

/// One upsert instruction: a record plus table, key and ordering metadata
///
/// Built once per record at submission time and not modified afterwards.
/// Field order matches the serialized command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    action: Action,
    sequence: i64,
    table_name: String,
    key_names: Vec<String>,
    data: Record,
}

impl Command {
    /// Upsert `data` into `table_name`, deduplicated on `key_names`.
    pub fn upsert(
        sequence: i64,
        table_name: impl Into<String>,
        key_names: Vec<String>,
        data: Record,
    ) -> Self {
        Self { action: Action::Upsert, sequence, table_name: table_name.into(), key_names, data }
    }

    /// Sample command used to probe connectivity and credentials.
    pub fn validation_sample(sequence: i64) -> Self {
        let mut data = Record::new();
        data.insert(VALIDATE_SAMPLE_KEY.to_string(), Value::from(10));
        data.insert("test_field".to_string(), Value::from("foo"));

        Self::upsert(sequence, VALIDATE_SAMPLE_TABLE, vec![VALIDATE_SAMPLE_KEY.to_string()], data)
    }

    /// Always [`Action::Upsert`] for now.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Ordering value; later sequences win for the same key.
    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    /// Destination table.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Primary key fields.
    pub fn key_names(&self) -> &[String] {
        &self.key_names
    }

    /// Record being written.
    pub fn data(&self) -> &Record {
        &self.data
    }

    /// Give back the caller's record once the command has been sent.
    pub fn into_data(self) -> Record {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_credentials_debug_redacts_token() {
        let credentials = Credentials::new(42, "secret-token");
        let debug = format!("{:?}", credentials);

        assert!(debug.contains("42"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_command_serializes_in_wire_order() {
        let mut data = Record::new();
        data.insert("id".into(), json!(1));
        data.insert("name".into(), json!("a"));

        let command = Command::upsert(1_700_000_000_000, "users", vec!["id".into()], data);
        let encoded = serde_json::to_string(&command).unwrap();

        assert_eq!(
            encoded,
            r#"{"action":"upsert","sequence":1700000000000,"table_name":"users","key_names":["id"],"data":{"id":1,"name":"a"}}"#
        );
    }

    #[test]
    fn test_validation_sample_shape() {
        let command = Command::validation_sample(7);

        assert_eq!(command.action(), Action::Upsert);
        assert_eq!(command.sequence(), 7);
        assert_eq!(command.table_name(), "test");
        assert_eq!(command.key_names(), ["id".to_string()]);
        assert_eq!(Value::Object(command.into_data()), json!({"id": 10, "test_field": "foo"}));
    }

    #[test]
    fn test_action_wire_name() {
        assert_eq!(Action::Upsert.to_string(), "upsert");
        assert_eq!("UPSERT".parse::<Action>().unwrap(), Action::Upsert);
    }
}
