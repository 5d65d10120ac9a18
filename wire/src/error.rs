use thiserror::Error;

/// Failures raised while walking a wire-format buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("Unknown wire type {wire_type} at byte {offset}")]
    UnknownWireType { wire_type: u8, offset: usize },

    #[error("Unexpected end of input at byte {offset}: needed {needed} more byte(s)")]
    UnexpectedEof { offset: usize, needed: u64 },

    #[error("Varint starting at byte {offset} is longer than 10 bytes")]
    VarintOverflow { offset: usize },
}
