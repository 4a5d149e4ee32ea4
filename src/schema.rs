//! Avro schemas attached to produce requests.

use serde_json::{Map, Value};

/// A schema is either already registered, and referenced by id, or sent
/// in full with the request and registered by the proxy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Schema {
    Id(i64),
    Definition(String),
}

impl Schema {
    /// Schema from its JSON definition, e.g. `{"type": "string"}`.
    pub fn from_json(definition: &Value) -> Self {
        Schema::Definition(definition.to_string())
    }

    /// Add this schema to a request body under `<prefix>_schema` or
    /// `<prefix>_schema_id`.
    pub(crate) fn write_to(&self, prefix: &str, body: &mut Map<String, Value>) {
        match self {
            Schema::Id(id) => {
                body.insert(format!("{}_schema_id", prefix), Value::from(*id));
            }
            Schema::Definition(definition) => {
                body.insert(
                    format!("{}_schema", prefix),
                    Value::String(definition.clone()),
                );
            }
        }
    }
}

impl From<i64> for Schema {
    fn from(id: i64) -> Self {
        Schema::Id(id)
    }
}

impl From<&str> for Schema {
    fn from(definition: &str) -> Self {
        Schema::Definition(definition.to_string())
    }
}

impl From<String> for Schema {
    fn from(definition: String) -> Self {
        Schema::Definition(definition)
    }
}
