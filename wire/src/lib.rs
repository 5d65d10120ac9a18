//! Schema-less decoding of the protobuf wire format.
//!
//! A payload is a flat run of `(tag, value)` pairs. Without a schema we can
//! still recover every field number, its wire type and the raw value, which
//! is what [scan] does:
//!
//! ```
//! use protolens_wire::*;
//!
//! let fields = scan(&[0x08, 0x96, 0x01, 0x12, 0x02, b'h', b'i']).unwrap();
//! assert_eq!(fields[&1].wire_type, WireType::Varint);
//! assert_eq!(fields[&1].value, RawValue::Int(150));
//! assert_eq!(fields[&2].value.as_bytes(), Some(&b"hi"[..]));
//! ```

pub mod bb;
pub mod decode;
pub mod error;
pub mod value;

pub use bb::*;
pub use decode::*;
pub use error::*;
pub use value::*;
