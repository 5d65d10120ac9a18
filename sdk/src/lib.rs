//! protolens
//!
//! Decode protobuf wire-format payloads, with or without a schema.
//!
//! - [scan] recovers field number → (wire type, raw value) from bytes alone.
//! - [compile_schema] parses a small `.proto` subset into a [Schema].
//! - [assemble] resolves scanned fields into a named, typed [DecodedMessage].
//!
//! ```
//! use protolens::{compile_schema, decode_message, TypedValue};
//!
//! let schema = compile_schema("message M { int32 a = 1; string c = 20; }").unwrap();
//! let decoded = decode_message(&[0x08, 0x2A, 0xA2, 0x01, 0x02, b'h', b'i'], &schema, "M").unwrap();
//! assert_eq!(decoded["a"], TypedValue::Int32(42));
//! assert_eq!(decoded["c"].as_str(), "hi");
//! ```

pub mod assembler;

pub use assembler::{assemble, field_metadata, find_message, DecodedMessage, FieldMetadata, TypedValue};
pub use protolens_compiler::{compile_schema, FieldType, ProtoError, Schema, SchemaNode};
pub use protolens_wire::{scan, DecodedField, FieldMap, RawValue, WireError, WireType};

/// Scan `buffer` and resolve it against message `message` of `schema`.
pub fn decode_message(
    buffer: &[u8],
    schema: &[SchemaNode],
    message: &str,
) -> Result<DecodedMessage, ProtoError> {
    let fields = scan(buffer)?;
    assemble(&fields, schema, message)
}

/// Decode a payload without a schema into pretty-printed JSON keyed by
/// field number.
pub fn decode_partial_to_json(buffer: &[u8]) -> Result<String, ProtoError> {
    let fields = scan(buffer)?;
    Ok(serde_json::to_string_pretty(&fields)?)
}

/// Decode a payload against schema text into pretty-printed JSON keyed by
/// field name.
pub fn decode_to_json(buffer: &[u8], schema_text: &str, message: &str) -> Result<String, ProtoError> {
    let schema = compile_schema(schema_text)?;
    let decoded = decode_message(buffer, &schema, message)?;
    Ok(serde_json::to_string_pretty(&decoded)?)
}

pub mod error {
    pub use protolens_compiler::error::ProtoError;
}

pub mod schema {
    pub use protolens_compiler::types::{FieldType, Schema, SchemaNode};
}
