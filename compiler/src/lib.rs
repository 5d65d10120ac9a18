//! protolens-compiler
//!
//! This crate implements:
//!  1) A character [Reader](reader::Reader) and on-demand [Lexer](tokenizer::Lexer) for a small `.proto` subset,
//!  2) A recursive-descent [Parser](parser::Parser) producing a [Schema](types::Schema),
//!  3) A schema inspector that logs tolerated defects (duplicate ids, duplicate messages),
//!  4) The error taxonomy shared by the whole workspace (`ProtoError`).

pub mod error;
pub mod types;
pub mod utils;
pub mod reader;
pub mod tokenizer;
pub mod parser;
pub mod verifier;
pub mod compiler;

pub use compiler::{compile_schema, compile_schema_with_limits};
pub use error::ProtoError;
pub use parser::{parse_schema, ParseLimits, Parser};
pub use types::{FieldType, Schema, SchemaNode};
