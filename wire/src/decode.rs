use crate::{
    bb::{WireBuffer, MSB},
    error::WireError,
    value::{DecodedField, FieldMap, RawValue, Tag, WireType},
};
use tracing::{debug, trace};

/// Decode one varint at `offset`, returning the value and the offset just
/// past it.
pub fn parse_varint(buf: &[u8], offset: usize) -> Result<(u64, usize), WireError> {
    let mut bb = WireBuffer::at(buf, offset);
    let value = bb.read_varint()?;
    Ok((value, bb.index()))
}

/// Decode a field tag at `offset`: the low 3 bits select the wire type, the
/// rest is the field number.
pub fn parse_tag(buf: &[u8], offset: usize) -> Result<(Tag, usize), WireError> {
    let (raw, next) = match buf.get(offset) {
        Some(&byte) if byte & MSB == 0 => (byte as u64, offset + 1),
        _ => parse_varint(buf, offset)?,
    };

    let bits = (raw & 0x07) as u8;
    let wire_type = WireType::from_bits(bits).ok_or(WireError::UnknownWireType {
        wire_type: bits,
        offset,
    })?;

    Ok((
        Tag {
            field_number: raw >> 3,
            wire_type,
        },
        next,
    ))
}

/// Decode the value that follows a tag of type `wire_type`.
///
/// LEN payloads are returned verbatim; strings, bytes and embedded messages
/// cannot be told apart at this layer.
pub fn parse_value(
    buf: &[u8],
    offset: usize,
    wire_type: WireType,
) -> Result<(RawValue<'_>, usize), WireError> {
    let mut bb = WireBuffer::at(buf, offset);
    let value = match wire_type {
        WireType::Varint => RawValue::Int(bb.read_varint()?),
        WireType::Len => {
            let len = bb.read_varint()?;
            let available = buf.len().saturating_sub(bb.index()) as u64;
            if len > available {
                return Err(WireError::UnexpectedEof {
                    offset: bb.index(),
                    needed: len - available,
                });
            }
            RawValue::Bytes(bb.read_bytes(len as usize)?)
        }
        WireType::I32 => RawValue::Bytes(bb.read_bytes(4)?),
        WireType::I64 => RawValue::Bytes(bb.read_bytes(8)?),
    };
    Ok((value, bb.index()))
}

/// Walk the whole buffer as a single message and collect every field.
///
/// A field number seen more than once keeps only its last occurrence.
/// An empty buffer yields an empty map.
pub fn scan(buf: &[u8]) -> Result<FieldMap<'_>, WireError> {
    let mut fields = FieldMap::new();
    let mut offset = 0;

    while offset < buf.len() {
        let (tag, value_offset) = parse_tag(buf, offset)?;
        let (value, next) = parse_value(buf, value_offset, tag.wire_type)?;
        trace!(
            field = tag.field_number,
            wire_type = %tag.wire_type,
            offset,
            "decoded field"
        );

        let replaced = fields.insert(
            tag.field_number,
            DecodedField {
                wire_type: tag.wire_type,
                value,
            },
        );
        if replaced.is_some() {
            trace!(field = tag.field_number, "field repeated; keeping last occurrence");
        }
        offset = next;
    }

    debug!(fields = fields.len(), bytes = buf.len(), "scanned payload");
    Ok(fields)
}
