//! Command definitions and their schema hash.
//!
//! A `CommandDescriptor` is the desired shape of one slash command on one
//! server. The schema hash is the reconciliation currency: the registry
//! compares a desired command's hash against the hash last confirmed by the
//! gateway and issues an update on mismatch. Any change to the name,
//! description, or parameter list must change the hash, so the hash is
//! computed over an explicit canonical byte encoding rather than a
//! serialization format that might reorder fields.

use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use crate::error::store::StoreError;

/// The type of a single command parameter.
///
/// Mirrors the gateway's option types; one tag per variant keeps the schema
/// hash stable across serde or compiler changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Integer,
    Boolean,
    User,
    Channel,
}

impl ParamType {
    /// Stable single-byte tag fed into the schema hash.
    fn tag(&self) -> u8 {
        match self {
            ParamType::String => 1,
            ParamType::Integer => 2,
            ParamType::Boolean => 3,
            ParamType::User => 4,
            ParamType::Channel => 5,
        }
    }
}

/// One typed, named command parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandParam {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub required: bool,
}

/// A named, versioned command definition for one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    /// Ordered list; parameter order is part of the schema.
    pub params: Vec<CommandParam>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    pub fn param(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        param_type: ParamType,
        required: bool,
    ) -> Self {
        self.params.push(CommandParam {
            name: name.into(),
            description: description.into(),
            param_type,
            required,
        });
        self
    }

    /// Deterministic digest of the full command schema.
    ///
    /// Fields are fed to the hasher in a fixed order with explicit
    /// separators, so equal descriptors always hash equally and any field
    /// change produces a different hash.
    pub fn schema_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.name.as_bytes());
        hasher.update(&[0]);
        hasher.update(self.description.as_bytes());
        hasher.update(&[0]);
        for param in &self.params {
            hasher.update(param.name.as_bytes());
            hasher.update(&[0]);
            hasher.update(param.description.as_bytes());
            hasher.update(&[0, param.param_type.tag(), param.required as u8, 0]);
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Converts a stored command row back into a descriptor.
    pub fn from_model(model: &entity::command::Model) -> Result<Self, StoreError> {
        let params: Vec<CommandParam> = serde_json::from_str(&model.params).map_err(|e| {
            StoreError::ConstraintViolation(format!(
                "Malformed parameter schema for command '{}': {}",
                model.name, e
            ))
        })?;

        Ok(Self {
            name: model.name.clone(),
            description: model.description.clone(),
            params,
        })
    }

    /// Builds the active model persisting this descriptor for a server.
    pub fn to_active_model(&self, server_id: i32) -> entity::command::ActiveModel {
        entity::command::ActiveModel {
            server_id: ActiveValue::Set(server_id),
            name: ActiveValue::Set(self.name.clone()),
            description: ActiveValue::Set(self.description.clone()),
            params: ActiveValue::Set(
                serde_json::to_string(&self.params).unwrap_or_else(|_| "[]".to_string()),
            ),
            schema_hash: ActiveValue::Set(self.schema_hash()),
        }
    }
}
