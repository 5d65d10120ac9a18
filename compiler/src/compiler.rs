use crate::{
    error::ProtoError,
    parser::{ParseLimits, Parser},
    types::Schema,
    verifier::inspect_schema,
};
use tracing::debug;

/// Compile schema text into its AST.
/// Returns `Err(ProtoError)` if tokenization or parsing fails; tolerated
/// schema defects are only logged.
pub fn compile_schema(text: &str) -> Result<Schema, ProtoError> {
    compile_schema_with_limits(text, ParseLimits::default())
}

pub fn compile_schema_with_limits(text: &str, limits: ParseLimits) -> Result<Schema, ProtoError> {
    let schema = Parser::with_limits(text, limits).parse()?;
    let findings = inspect_schema(&schema);
    debug!(
        messages = schema.iter().filter(|n| n.message_name().is_some()).count(),
        findings = findings.len(),
        "compiled schema"
    );
    Ok(schema)
}
