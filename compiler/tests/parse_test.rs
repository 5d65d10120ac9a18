use protolens_compiler::{
    compile_schema,
    tokenizer::{tokenize_schema, Keyword, TokenKind},
    FieldType, ProtoError, SchemaNode,
};

#[test]
fn test_parse_schema() {
    let input = r#"
    syntax = "proto3";

    message Person {
      string name = 1;
      int32 id = 2;
      bool active = 3;
    }

    message Empty {
    }

    message Flags {
      bool verbose = 10;
    }
    "#;

    let tokens = tokenize_schema(input).expect("tokenize_schema failed");
    assert_eq!(tokens.first().map(|t| &t.kind), Some(&TokenKind::Keyword(Keyword::Syntax)));
    assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));

    let schema = compile_schema(input).expect("compile_schema failed");

    // Check number of top-level nodes
    assert_eq!(schema.len(), 4);
    assert_eq!(schema[0], SchemaNode::Syntax { value: "proto3".into() });

    // Check message Person
    match &schema[1] {
        SchemaNode::Message { name, children } => {
            assert_eq!(name, "Person");
            assert_eq!(children.len(), 3);
            assert_eq!(
                children[0],
                SchemaNode::Field { field_type: FieldType::String, name: "name".into(), number: 1 }
            );
            assert_eq!(
                children[1],
                SchemaNode::Field { field_type: FieldType::Int32, name: "id".into(), number: 2 }
            );
            assert_eq!(
                children[2],
                SchemaNode::Field { field_type: FieldType::Bool, name: "active".into(), number: 3 }
            );
        }
        other => panic!("expected message Person, got {:?}", other),
    }

    // Check message Empty
    assert_eq!(
        schema[2],
        SchemaNode::Message { name: "Empty".into(), children: vec![] }
    );

    // Check message Flags
    assert_eq!(schema[3].message_name(), Some("Flags"));
}

#[test]
fn test_schema_errors_carry_positions() {
    let input = "message M {\n  int32 a = 1;\n  int32 b = 2\n}";
    match compile_schema(input).unwrap_err() {
        ProtoError::Syntax { line, column, msg } => {
            assert_eq!((line, column), (4, 1));
            assert!(msg.contains("Expected \";\""), "unexpected message {}", msg);
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_string_literal_quotes_are_stripped() {
    let tokens = tokenize_schema("\"pro\"to3\"").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral("proto3".into()));
}

#[test]
fn test_schema_serializes_to_json() {
    let schema = compile_schema("syntax = \"proto3\";").unwrap();
    assert_eq!(
        serde_json::to_string(&schema).unwrap(),
        r#"[{"type":"syntax","value":"proto3"}]"#
    );
}
