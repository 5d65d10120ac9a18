use crate::{
    error::ProtoError,
    parser::UNSUPPORTED_WORDS,
    reader::{Cursor, Reader},
    utils::quote,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

lazy_static! {
    pub static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
    pub static ref INTEGER:    Regex = Regex::new(r"^[0-9]+$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Syntax,
    Message,
    Int32,
    Bool,
    String,
}

impl Keyword {
    pub fn from_text(text: &str) -> Option<Keyword> {
        match text {
            "syntax"  => Some(Keyword::Syntax),
            "message" => Some(Keyword::Message),
            "int32"   => Some(Keyword::Int32),
            "bool"    => Some(Keyword::Bool),
            "string"  => Some(Keyword::String),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Syntax  => "syntax",
            Keyword::Message => "message",
            Keyword::Int32   => "int32",
            Keyword::Bool    => "bool",
            Keyword::String  => "string",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    LeftBrace,
    RightBrace,
    Semicolon,
}

impl Delimiter {
    pub fn from_char(c: char) -> Option<Delimiter> {
        match c {
            '{' => Some(Delimiter::LeftBrace),
            '}' => Some(Delimiter::RightBrace),
            ';' => Some(Delimiter::Semicolon),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::LeftBrace  => "{",
            Delimiter::RightBrace => "}",
            Delimiter::Semicolon  => ";",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Operator(Operator),
    Delimiter(Delimiter),
    Identifier(String),
    IntegerLiteral(u64),
    StringLiteral(String),
    Eof,
}

impl TokenKind {
    /// Short category name used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Keyword(_)        => "keyword",
            TokenKind::Operator(_)       => "operator",
            TokenKind::Delimiter(_)      => "delimiter",
            TokenKind::Identifier(_)     => "identifier",
            TokenKind::IntegerLiteral(_) => "integer",
            TokenKind::StringLiteral(_)  => "string",
            TokenKind::Eof               => "end of input",
        }
    }

    pub fn text(&self) -> String {
        match self {
            TokenKind::Keyword(k)        => k.as_str().to_string(),
            TokenKind::Operator(o)       => o.as_str().to_string(),
            TokenKind::Delimiter(d)      => d.as_str().to_string(),
            TokenKind::Identifier(s)     => s.clone(),
            TokenKind::IntegerLiteral(n) => n.to_string(),
            TokenKind::StringLiteral(s)  => s.clone(),
            TokenKind::Eof               => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind:   TokenKind,
    pub line:   usize,
    pub column: usize,
}

impl Token {
    /// `keyword "int32"`, `end of input`, ...
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => self.kind.describe().to_string(),
            _ => format!("{} {}", self.kind.describe(), quote(&self.kind.text())),
        }
    }
}

/// Splits schema text into tokens on demand.
pub struct Lexer {
    reader: Reader,
}

impl Lexer {
    pub fn new(text: &str) -> Lexer {
        Lexer { reader: Reader::new(text) }
    }

    /// Produce the next token. Once the input is exhausted every call
    /// returns [TokenKind::Eof].
    pub fn next_token(&mut self) -> Result<Token, ProtoError> {
        while self.reader.peek(1).first().is_some_and(|c| c.is_whitespace()) {
            self.reader.consume(1);
        }

        let start = self.reader.cursor();
        let kind = self.read_kind(start)?;
        trace!(?kind, line = start.line, column = start.column, "token");
        Ok(Token { kind, line: start.line, column: start.column })
    }

    fn read_kind(&mut self, start: Cursor) -> Result<TokenKind, ProtoError> {
        let first = match self.reader.peek(1).first() {
            Some(&c) => c,
            None => return Ok(TokenKind::Eof),
        };

        if let Some(delimiter) = Delimiter::from_char(first) {
            self.reader.consume(1);
            return Ok(TokenKind::Delimiter(delimiter));
        }

        let mut text = String::new();
        while let Some(&c) = self.reader.peek(1).first() {
            if c.is_whitespace() || Delimiter::from_char(c).is_some() {
                break;
            }
            text.push(c);
            self.reader.consume(1);
        }

        if let Some(kind) = classify(&text) {
            return Ok(kind);
        }

        // `map<string,int32>` lexes as one run; name the construct instead.
        match text.split_once('<') {
            Some((word, _)) if UNSUPPORTED_WORDS.contains(&word) => {
                Err(ProtoError::UnsupportedConstruct {
                    construct: format!("{} field", word),
                    line:      start.line,
                    column:    start.column,
                })
            }
            _ => Err(ProtoError::Lexical {
                text:   quote(&text),
                line:   start.line,
                column: start.column,
            }),
        }
    }

    /// The next `k` tokens, leaving the lexer where it was.
    pub fn peek(&mut self, k: usize) -> Result<Vec<Token>, ProtoError> {
        let saved = self.reader.cursor();
        let tokens = (0..k).map(|_| self.next_token()).collect();
        self.reader.restore(saved);
        tokens
    }

    pub fn peek_token(&mut self) -> Result<Token, ProtoError> {
        let saved = self.reader.cursor();
        let token = self.next_token();
        self.reader.restore(saved);
        token
    }

    /// Every remaining token, ending with (and including) end-of-input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ProtoError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

fn classify(text: &str) -> Option<TokenKind> {
    if let Some(keyword) = Keyword::from_text(text) {
        Some(TokenKind::Keyword(keyword))
    } else if text == "=" {
        Some(TokenKind::Operator(Operator::Equals))
    } else if INTEGER.is_match(text) {
        text.parse().ok().map(TokenKind::IntegerLiteral)
    } else if text.starts_with('"') {
        Some(TokenKind::StringLiteral(text.replace('"', "")))
    } else if IDENTIFIER.is_match(text) {
        Some(TokenKind::Identifier(text.to_string()))
    } else {
        None
    }
}

/// Convenience wrapper over [Lexer::tokenize].
pub fn tokenize_schema(text: &str) -> Result<Vec<Token>, ProtoError> {
    Lexer::new(text).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize_schema(text).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_field() {
        let input = "int32 x = 10;";
        let expected = vec![
            Token { kind: TokenKind::Keyword(Keyword::Int32),          line: 1, column: 1 },
            Token { kind: TokenKind::Identifier("x".into()),           line: 1, column: 7 },
            Token { kind: TokenKind::Operator(Operator::Equals),       line: 1, column: 9 },
            Token { kind: TokenKind::IntegerLiteral(10),               line: 1, column: 11 },
            Token { kind: TokenKind::Delimiter(Delimiter::Semicolon),  line: 1, column: 13 },
            Token { kind: TokenKind::Eof,                              line: 1, column: 14 },
        ];
        assert_eq!(tokenize_schema(input).unwrap(), expected);
    }

    #[test]
    fn test_tokenize_syntax_line() {
        assert_eq!(
            kinds("syntax = \"proto3\";"),
            vec![
                TokenKind::Keyword(Keyword::Syntax),
                TokenKind::Operator(Operator::Equals),
                TokenKind::StringLiteral("proto3".into()),
                TokenKind::Delimiter(Delimiter::Semicolon),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_braces_split_runs() {
        assert_eq!(
            kinds("message M{}"),
            vec![
                TokenKind::Keyword(Keyword::Message),
                TokenKind::Identifier("M".into()),
                TokenKind::Delimiter(Delimiter::LeftBrace),
                TokenKind::Delimiter(Delimiter::RightBrace),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_positions_across_lines() {
        let tokens = tokenize_schema("message M {\n  bool b = 1;\n}").unwrap();
        let bool_tok = &tokens[3];
        assert_eq!(bool_tok.kind, TokenKind::Keyword(Keyword::Bool));
        assert_eq!((bool_tok.line, bool_tok.column), (2, 3));
        let close = &tokens[8];
        assert_eq!(close.kind, TokenKind::Delimiter(Delimiter::RightBrace));
        assert_eq!((close.line, close.column), (3, 1));
    }

    #[test]
    fn test_tokenize_unexpected_text() {
        let err = tokenize_schema("int32 x = 10 @").unwrap_err();
        assert!(
            matches!(err, ProtoError::Lexical { ref text, line: 1, column: 14 } if text == "\"@\""),
            "expected a Lexical error but got {:?}",
            err
        );
    }

    #[test]
    fn test_identifier_must_start_with_letter() {
        assert!(tokenize_schema("_hidden").is_err());
        assert!(tokenize_schema("9lives").is_err());
        assert_eq!(kinds("snake_case9")[0], TokenKind::Identifier("snake_case9".into()));
    }

    #[test]
    fn test_eof_is_terminal() {
        let mut lexer = Lexer::new("  ");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_peek_is_idempotent() {
        let mut lexer = Lexer::new("message M { }");
        let first = lexer.peek_token().unwrap();
        let second = lexer.peek_token().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.kind, TokenKind::Keyword(Keyword::Message));

        let ahead = lexer.peek(3).unwrap();
        assert_eq!(ahead, lexer.peek(3).unwrap());
        assert_eq!(lexer.next_token().unwrap(), ahead[0]);
        assert_eq!(lexer.next_token().unwrap(), ahead[1]);
    }

    #[test]
    fn test_peek_restores_after_error() {
        let mut lexer = Lexer::new("message $");
        assert!(lexer.peek(2).is_err());
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Keyword(Keyword::Message));
    }

    #[test]
    fn test_generic_run_names_the_construct() {
        let err = tokenize_schema("  map<string,int32> m = 1;").unwrap_err();
        assert!(
            matches!(err, ProtoError::UnsupportedConstruct { ref construct, line: 1, column: 3 } if construct == "map field"),
            "expected UnsupportedConstruct but got {:?}",
            err
        );
        assert!(matches!(tokenize_schema("Foo<Bar>").unwrap_err(), ProtoError::Lexical { .. }));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_every_token_is_traced() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tokenize_schema("message M {}").unwrap();
        });

        let text = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.matches("tokenizer: token kind=").count(), 5, "log was:\n{}", text);
        assert!(text.contains("Delimiter(LeftBrace)"));
        assert!(text.contains("Delimiter(RightBrace)"));
        assert!(text.contains("Eof"));
    }

    #[test]
    fn test_integer_overflow_is_lexical() {
        let err = tokenize_schema("99999999999999999999999").unwrap_err();
        assert!(matches!(err, ProtoError::Lexical { .. }));
    }
}
