//! Typed records for every resource the registry API exchanges.
//!
//! Each model keeps the exact wire name of every field through an explicit
//! `rename` and leaves unset optional fields out of the encoded object.
//! Decoding goes through [`Model::from_value`], which checks required
//! properties before handing the object to serde so the failure names the
//! missing property and the model.

pub mod account;
pub mod image;
pub mod inspection;
pub mod namespace;
pub mod quota;
pub mod retention;
pub mod trash;

pub use account::{AccountSettings, AuthOptions, Plan};
pub use image::{
    ImageBulkDeleteError, ImageBulkDeleteResult, ImageDeleteResult, ImageDigest, RemoteApiImage,
    VaReport,
};
pub use inspection::{Config, HealthConfig, ImageInspection, RootFs};
pub use namespace::{Namespace, NamespaceDetails};
pub use quota::{Quota, QuotaDetails};
pub use retention::RetentionPolicy;
pub use trash::{RestoreResult, Trash};

use crate::error::{RegistryError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// Bidirectional mapping between a model and its JSON object form.
pub trait Model: Serialize + DeserializeOwned {
    /// Model name used in decode errors.
    const NAME: &'static str;

    /// Wire names that must be present and non-null when decoding.
    const REQUIRED: &'static [&'static str] = &[];

    fn from_value(value: Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            RegistryError::Decode(format!(
                "expected a JSON object for {}, found {}",
                Self::NAME,
                kind_of(&value)
            ))
        })?;

        if let Some(field) = Self::REQUIRED
            .iter()
            .find(|key| object.get(**key).is_none_or(Value::is_null))
        {
            return Err(RegistryError::MissingRequiredField {
                field: *field,
                model: Self::NAME,
            });
        }

        serde_json::from_value(value)
            .map_err(|e| RegistryError::Decode(format!("{}: {}", Self::NAME, e)))
    }

    fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode a JSON array whose elements are all `M`.
pub fn decode_list<M: Model>(value: Value) -> Result<Vec<M>> {
    match value {
        Value::Array(items) => items.into_iter().map(M::from_value).collect(),
        other => Err(RegistryError::Decode(format!(
            "expected a JSON array of {}, found {}",
            M::NAME,
            kind_of(&other)
        ))),
    }
}

/// Decode a JSON object whose values are all `M`, keyed by arbitrary strings.
pub fn decode_map<M: Model>(value: Value) -> Result<BTreeMap<String, M>> {
    match value {
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, item)| M::from_value(item).map(|model| (key, model)))
            .collect(),
        other => Err(RegistryError::Decode(format!(
            "expected a JSON object of {}, found {}",
            M::NAME,
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
