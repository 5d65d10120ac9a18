use protolens_compiler::{utils::quote, FieldType, ProtoError, SchemaNode};
use protolens_wire::{DecodedField, FieldMap};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What the schema says about one field of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMetadata {
    pub name:          String,
    pub number:        u32,
    pub declared_type: FieldType,
}

/// A field value after coercion to its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    String(String),
    Bool(bool),
    Int32(i32),
}

impl TypedValue {
    /// The value used when a declared field is absent from the payload.
    pub fn default_for(field_type: FieldType) -> TypedValue {
        match field_type {
            FieldType::String => TypedValue::String(String::new()),
            FieldType::Bool   => TypedValue::Bool(false),
            FieldType::Int32  => TypedValue::Int32(0),
        }
    }

    /// A convenience method to extract the value out of a [String](#variant.String).
    /// Returns `""` for other value kinds.
    pub fn as_str(&self) -> &str {
        match *self {
            TypedValue::String(ref value) => value.as_str(),
            _ => "",
        }
    }

    /// A convenience method to extract the value out of a [Bool](#variant.Bool).
    /// Returns `false` for other value kinds.
    pub fn as_bool(&self) -> bool {
        match *self {
            TypedValue::Bool(value) => value,
            _ => false,
        }
    }

    /// A convenience method to extract the value out of an [Int32](#variant.Int32).
    /// Returns `0` for other value kinds.
    pub fn as_int32(&self) -> i32 {
        match *self {
            TypedValue::Int32(value) => value,
            _ => 0,
        }
    }
}

/// Declared field name → typed value, one entry per declared field.
pub type DecodedMessage = BTreeMap<String, TypedValue>;

/// Children of the first message called `name`, searched depth-first.
pub fn find_message<'s>(schema: &'s [SchemaNode], name: &str) -> Option<&'s [SchemaNode]> {
    schema.iter().find_map(|node| match node {
        SchemaNode::Message { name: n, children } if n == name => Some(children.as_slice()),
        SchemaNode::Message { children, .. } => find_message(children, name),
        _ => None,
    })
}

/// Flatten a message body into metadata keyed by field number. When two
/// fields share a number the later declaration replaces the earlier one.
pub fn field_metadata(children: &[SchemaNode]) -> BTreeMap<u32, FieldMetadata> {
    children
        .iter()
        .filter_map(|child| match child {
            SchemaNode::Field { field_type, name, number } => Some((
                *number,
                FieldMetadata {
                    name:          name.clone(),
                    number:        *number,
                    declared_type: *field_type,
                },
            )),
            _ => None,
        })
        .collect()
}

/// Resolve scanned wire fields against message `message` of `schema`.
///
/// Every declared field appears in the result; absent fields take the
/// default of their type. Wire values whose framing cannot carry the
/// declared type are logged and treated as absent.
pub fn assemble(
    fields: &FieldMap<'_>,
    schema: &[SchemaNode],
    message: &str,
) -> Result<DecodedMessage, ProtoError> {
    let children = find_message(schema, message)
        .ok_or_else(|| ProtoError::MissingMessage(quote(message)))?;

    let mut decoded = DecodedMessage::new();
    for meta in field_metadata(children).into_values() {
        let value = coerce(&meta, fields.get(&u64::from(meta.number)));
        decoded.insert(meta.name, value);
    }

    debug!(message, fields = decoded.len(), "assembled message");
    Ok(decoded)
}

fn coerce(meta: &FieldMetadata, field: Option<&DecodedField<'_>>) -> TypedValue {
    let Some(field) = field else {
        return TypedValue::default_for(meta.declared_type);
    };

    let value = match meta.declared_type {
        FieldType::String => field
            .value
            .as_bytes()
            .map(|bytes| TypedValue::String(String::from_utf8_lossy(bytes).into_owned())),
        FieldType::Bool => field.value.as_varint().map(|v| TypedValue::Bool(v == 1)),
        // int32 values travel sign-extended to 64 bits; keep the low 32.
        FieldType::Int32 => field.value.as_varint().map(|v| TypedValue::Int32(v as i32)),
    };

    value.unwrap_or_else(|| {
        warn!(
            field = %meta.name,
            number = meta.number,
            declared = %meta.declared_type,
            wire_type = %field.wire_type,
            "wire type cannot carry the declared type; using the default"
        );
        TypedValue::default_for(meta.declared_type)
    })
}
