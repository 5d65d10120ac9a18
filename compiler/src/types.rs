use crate::{error::ProtoError, utils::quote};
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Scalar types a field may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int32,
    Bool,
    String,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Int32  => "int32",
            FieldType::Bool   => "bool",
            FieldType::String => "string",
        }
    }
}

impl FromStr for FieldType {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int32"  => Ok(FieldType::Int32),
            "bool"   => Ok(FieldType::Bool),
            "string" => Ok(FieldType::String),
            other    => Err(ProtoError::UnknownFieldType(quote(other))),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the parsed schema.
///
/// The top level of a schema is a sequence of `Syntax` and `Message` nodes;
/// a `Message` owns its children outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaNode {
    Syntax {
        value: String,
    },
    Message {
        name:     String,
        children: Vec<SchemaNode>,
    },
    Field {
        #[serde(rename = "fieldType")]
        field_type: FieldType,
        name:       String,
        number:     u32,
    },
}

impl SchemaNode {
    pub fn message_name(&self) -> Option<&str> {
        match self {
            SchemaNode::Message { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// A parsed `.proto` file.
pub type Schema = Vec<SchemaNode>;
