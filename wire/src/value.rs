use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// The four framings a field value can have on the wire.
///
/// Groups (wire types 3 and 4) are deliberately absent: a tag selecting them
/// is an [UnknownWireType](crate::WireError::UnknownWireType) error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WireType {
    #[serde(rename = "VARINT")]
    Varint,
    #[serde(rename = "I64")]
    I64,
    #[serde(rename = "LEN")]
    Len,
    #[serde(rename = "I32")]
    I32,
}

impl WireType {
    /// Maps the low 3 bits of a tag onto a wire type.
    pub fn from_bits(bits: u8) -> Option<WireType> {
        match bits {
            0 => Some(WireType::Varint),
            1 => Some(WireType::I64),
            2 => Some(WireType::Len),
            5 => Some(WireType::I32),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WireType::Varint => "VARINT",
            WireType::I64 => "I64",
            WireType::Len => "LEN",
            WireType::I32 => "I32",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field number and wire type, as read from a tag varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub field_number: u64,
    pub wire_type:    WireType,
}

/// An uninterpreted field value.
///
/// Byte runs borrow from the decoded buffer, so a `RawValue` cannot outlive
/// the payload it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawValue<'a> {
    /// A decoded VARINT.
    Int(u64),
    /// A LEN payload, or the 4/8 little-endian bytes of an I32/I64.
    Bytes(&'a [u8]),
}

impl<'a> RawValue<'a> {
    /// Returns the integer of an [Int](#variant.Int), `None` for byte runs.
    pub fn as_varint(&self) -> Option<u64> {
        match *self {
            RawValue::Int(value) => Some(value),
            RawValue::Bytes(_) => None,
        }
    }

    /// Returns the bytes of a [Bytes](#variant.Bytes), `None` for integers.
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            RawValue::Bytes(bytes) => Some(bytes),
            RawValue::Int(_) => None,
        }
    }
}

/// One entry of a scanned payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField<'a> {
    #[serde(rename = "wireType")]
    pub wire_type: WireType,
    pub value:     RawValue<'a>,
}

/// Field number → last decoded occurrence of that field.
pub type FieldMap<'a> = BTreeMap<u64, DecodedField<'a>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_type_bits() {
        assert_eq!(WireType::from_bits(0), Some(WireType::Varint));
        assert_eq!(WireType::from_bits(1), Some(WireType::I64));
        assert_eq!(WireType::from_bits(2), Some(WireType::Len));
        assert_eq!(WireType::from_bits(5), Some(WireType::I32));
        for group in [3, 4, 6, 7] {
            assert_eq!(WireType::from_bits(group), None);
        }
    }

    #[test]
    fn decoded_field_json_shape() {
        let varint = DecodedField { wire_type: WireType::Varint, value: RawValue::Int(150) };
        assert_eq!(
            serde_json::to_value(&varint).unwrap(),
            json!({ "wireType": "VARINT", "value": 150 })
        );

        let len = DecodedField { wire_type: WireType::Len, value: RawValue::Bytes(b"hi") };
        assert_eq!(
            serde_json::to_value(&len).unwrap(),
            json!({ "wireType": "LEN", "value": [104, 105] })
        );
    }
}
