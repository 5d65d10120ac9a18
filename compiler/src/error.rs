use protolens_wire::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lexical error at line {line}, column {column}: unrecognized token {text}")]
    Lexical {
        text:   String,
        line:   usize,
        column: usize,
    },

    #[error("Syntax error at line {line}, column {column}: {msg}")]
    Syntax {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Unsupported construct at line {line}, column {column}: {construct}")]
    UnsupportedConstruct {
        construct: String,
        line:      usize,
        column:    usize,
    },

    #[error("Unknown proto type {0}")]
    UnknownFieldType(String),

    #[error("Message {0} is not defined in the schema")]
    MissingMessage(String),

    #[error("Wire decode error: {0}")]
    Wire(#[from] WireError),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
