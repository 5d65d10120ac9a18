use std::collections::HashMap;
use crate::{
    types::{Schema, SchemaNode},
    utils::quote,
};
use tracing::warn;

/// Report schema defects that decoding tolerates.
///
/// Nothing here is fatal: a duplicated message name means lookups hit the
/// first declaration, and a duplicated field number means the last field
/// declared with it wins. Each finding is logged and returned.
pub fn inspect_schema(schema: &Schema) -> Vec<String> {
    let mut findings = Vec::new();
    let mut message_names: HashMap<&str, usize> = HashMap::new();
    let mut syntax_count = 0;

    for node in schema {
        match node {
            SchemaNode::Syntax { .. } => syntax_count += 1,
            SchemaNode::Message { name, children } => {
                *message_names.entry(name.as_str()).or_insert(0) += 1;
                inspect_fields(name, children, &mut findings);
            }
            SchemaNode::Field { name, .. } => findings.push(format!(
                "Field {} is declared outside of any message",
                quote(name)
            )),
        }
    }

    if syntax_count > 1 {
        findings.push(format!("The syntax is declared {} times", syntax_count));
    }

    let mut duplicated: Vec<_> = message_names
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .collect();
    duplicated.sort();
    for (name, _) in duplicated {
        findings.push(format!(
            "The message {} is defined twice; the first definition is used",
            quote(name)
        ));
    }

    for finding in &findings {
        warn!("{}", finding);
    }
    findings
}

fn inspect_fields(message: &str, children: &[SchemaNode], findings: &mut Vec<String>) {
    let mut numbers: HashMap<u32, &str> = HashMap::new();
    for child in children {
        if let SchemaNode::Field { name, number, .. } = child {
            if let Some(previous) = numbers.insert(*number, name) {
                findings.push(format!(
                    "The id {} is used by fields {} and {} in message {}; {} wins",
                    number,
                    quote(previous),
                    quote(name),
                    quote(message),
                    quote(name)
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    #[test]
    fn clean_schema_has_no_findings() {
        let schema = parse_schema("syntax = \"proto3\"; message M { int32 a = 1; bool b = 2; }").unwrap();
        assert!(inspect_schema(&schema).is_empty());
    }

    #[test]
    fn duplicate_field_numbers() {
        let schema = parse_schema("message M { int32 a = 1; bool b = 1; }").unwrap();
        let findings = inspect_schema(&schema);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("\"a\" and \"b\""));
    }

    #[test]
    fn duplicate_messages_and_syntax() {
        let schema = parse_schema(
            "syntax = \"proto3\"; syntax = \"proto3\"; message M { } message M { }",
        )
        .unwrap();
        let findings = inspect_schema(&schema);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().any(|f| f.contains("syntax is declared 2 times")));
        assert!(findings.iter().any(|f| f.contains("message \"M\" is defined twice")));
    }
}
