use crate::{
    error::ProtoError,
    tokenizer::{Delimiter, Keyword, Lexer, Operator, Token, TokenKind},
    types::{FieldType, Schema, SchemaNode},
    utils::quote,
};
use tracing::debug;

/// Field modifiers and declarations that exist in `.proto` but are not
/// handled here.
pub const UNSUPPORTED_WORDS: [&str; 11] = [
    "repeated", "optional", "oneof", "map", "enum", "import",
    "option", "package", "service", "reserved", "extend",
];

/// The subset of [UNSUPPORTED_WORDS] that starts a field declaration.
pub const FIELD_MODIFIERS: [&str; 4] = ["repeated", "optional", "oneof", "map"];

/// Scalar type names that are valid protobuf but have no decoder here.
pub const UNSUPPORTED_SCALARS: [&str; 12] = [
    "int64", "uint32", "uint64", "sint32", "sint64", "fixed32",
    "fixed64", "sfixed32", "sfixed64", "float", "double", "bytes",
];

/// Upper bounds on parser loops, so malformed input fails instead of
/// spinning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    pub max_top_level_items: usize,
    pub max_message_fields:  usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        ParseLimits {
            max_top_level_items: 10_000,
            max_message_fields:  10_000,
        }
    }
}

pub struct Parser {
    lexer:  Lexer,
    limits: ParseLimits,
}

impl Parser {
    pub fn new(text: &str) -> Parser {
        Parser::with_limits(text, ParseLimits::default())
    }

    pub fn with_limits(text: &str, limits: ParseLimits) -> Parser {
        Parser { lexer: Lexer::new(text), limits }
    }

    /// proto := (syntaxDecl | messageDecl)* EOF
    pub fn parse(&mut self) -> Result<Schema, ProtoError> {
        let mut nodes = Vec::new();

        loop {
            let token = self.lexer.peek_token()?;
            if token.kind == TokenKind::Eof {
                break;
            }
            if nodes.len() >= self.limits.max_top_level_items {
                return Err(syntax_error(
                    &format!(
                        "More than {} top-level declarations",
                        self.limits.max_top_level_items
                    ),
                    &token,
                ));
            }

            let node = match &token.kind {
                TokenKind::Keyword(Keyword::Syntax)  => self.parse_syntax()?,
                TokenKind::Keyword(Keyword::Message) => self.parse_message()?,
                TokenKind::Identifier(word) if UNSUPPORTED_WORDS.contains(&word.as_str()) => {
                    return Err(unsupported(word, &token));
                }
                _ => return Err(unexpected_token(&token)),
            };
            nodes.push(node);
        }

        debug!(nodes = nodes.len(), "parsed schema");
        Ok(nodes)
    }

    /// syntaxDecl := "syntax" "=" "proto3" ";"
    fn parse_syntax(&mut self) -> Result<SchemaNode, ProtoError> {
        self.expect_keyword(Keyword::Syntax)?;
        self.expect_operator(Operator::Equals)?;

        let token = self.lexer.next_token()?;
        let value = match token.kind {
            TokenKind::StringLiteral(ref value) => value.clone(),
            _ => return Err(expected("a quoted syntax version", &token)),
        };
        if value != "proto3" {
            return Err(unsupported(&format!("syntax {}", quote(&value)), &token));
        }

        self.expect_delimiter(Delimiter::Semicolon)?;
        Ok(SchemaNode::Syntax { value })
    }

    /// messageDecl := "message" identifier "{" fieldDecl* "}"
    fn parse_message(&mut self) -> Result<SchemaNode, ProtoError> {
        self.expect_keyword(Keyword::Message)?;
        let name = self.expect_identifier()?;
        self.expect_delimiter(Delimiter::LeftBrace)?;

        let mut children = Vec::new();
        loop {
            let token = self.lexer.peek_token()?;
            match &token.kind {
                TokenKind::Delimiter(Delimiter::RightBrace) => {
                    self.lexer.next_token()?;
                    break;
                }
                TokenKind::Keyword(Keyword::Int32 | Keyword::Bool | Keyword::String) => {
                    if children.len() >= self.limits.max_message_fields {
                        return Err(syntax_error(
                            &format!(
                                "Message {} has more than {} fields",
                                quote(&name),
                                self.limits.max_message_fields
                            ),
                            &token,
                        ));
                    }
                    children.push(self.parse_field()?);
                }
                TokenKind::Keyword(Keyword::Message) => {
                    return Err(unsupported("nested message", &token));
                }
                TokenKind::Identifier(word) if FIELD_MODIFIERS.contains(&word.as_str()) => {
                    return Err(unsupported(&format!("{} field", word), &token));
                }
                TokenKind::Identifier(word) if UNSUPPORTED_WORDS.contains(&word.as_str()) => {
                    return Err(unsupported(word, &token));
                }
                TokenKind::Identifier(word) if UNSUPPORTED_SCALARS.contains(&word.as_str()) => {
                    return Err(ProtoError::UnknownFieldType(quote(word)));
                }
                TokenKind::Identifier(word) => {
                    // `Type name = n;` refers to an enum or message type.
                    let ahead = self.lexer.peek(2)?;
                    if matches!(ahead[1].kind, TokenKind::Identifier(_)) {
                        return Err(unsupported(
                            &format!("field of message or enum type {}", quote(word)),
                            &token,
                        ));
                    }
                    return Err(unexpected_token(&token));
                }
                TokenKind::Eof => {
                    return Err(syntax_error(
                        &format!("Unexpected end of input in message {}", quote(&name)),
                        &token,
                    ));
                }
                _ => return Err(unexpected_token(&token)),
            }
        }

        Ok(SchemaNode::Message { name, children })
    }

    /// fieldDecl := ("int32"|"bool"|"string") identifier "=" integer ";"
    fn parse_field(&mut self) -> Result<SchemaNode, ProtoError> {
        let token = self.lexer.next_token()?;
        let field_type = match token.kind {
            TokenKind::Keyword(Keyword::Int32)  => FieldType::Int32,
            TokenKind::Keyword(Keyword::Bool)   => FieldType::Bool,
            TokenKind::Keyword(Keyword::String) => FieldType::String,
            _ => return Err(expected("a field type", &token)),
        };

        let name = self.expect_identifier()?;
        self.expect_operator(Operator::Equals)?;

        let token = self.lexer.next_token()?;
        let number = match token.kind {
            TokenKind::IntegerLiteral(n) => u32::try_from(n).map_err(|_| {
                syntax_error(&format!("Field number {} is out of range", n), &token)
            })?,
            _ => return Err(expected("integer", &token)),
        };

        self.expect_delimiter(Delimiter::Semicolon)?;
        Ok(SchemaNode::Field { field_type, name, number })
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ProtoError> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Keyword(k) if k == keyword => Ok(()),
            _ => Err(expected(&quote(keyword.as_str()), &token)),
        }
    }

    fn expect_operator(&mut self, operator: Operator) -> Result<(), ProtoError> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Operator(o) if o == operator => Ok(()),
            _ => Err(expected(&quote(operator.as_str()), &token)),
        }
    }

    fn expect_delimiter(&mut self, delimiter: Delimiter) -> Result<(), ProtoError> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Delimiter(d) if d == delimiter => Ok(()),
            _ => Err(expected(&quote(delimiter.as_str()), &token)),
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ProtoError> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Identifier(name) => Ok(name),
            _ => Err(expected("identifier", &token)),
        }
    }
}

/// Parse schema text with default limits.
pub fn parse_schema(text: &str) -> Result<Schema, ProtoError> {
    Parser::new(text).parse()
}

fn syntax_error(msg: &str, token: &Token) -> ProtoError {
    ProtoError::Syntax {
        msg:    msg.to_string(),
        line:   token.line,
        column: token.column,
    }
}

fn expected(what: &str, token: &Token) -> ProtoError {
    syntax_error(&format!("Expected {} but found {}", what, token.describe()), token)
}

fn unexpected_token(token: &Token) -> ProtoError {
    syntax_error(&format!("Unexpected {}", token.describe()), token)
}

fn unsupported(construct: &str, token: &Token) -> ProtoError {
    ProtoError::UnsupportedConstruct {
        construct: construct.to_string(),
        line:      token.line,
        column:    token.column,
    }
}
