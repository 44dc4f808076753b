//! Lexer and parser errors.

use super::env::Identifier;
use super::token::Span;

/// An error encountered during lexical analysis. Lexing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character {found:?} at {span}")]
    UnexpectedCharacter { found: char, span: Span },
    #[error("malformed string: only \\\" may follow a backslash, at {span}")]
    MalformedString { span: Span },
    #[error("unterminated string starting at {span}")]
    UnterminatedString { span: Span },
    #[error("unterminated block comment starting at {span}")]
    UnterminatedComment { span: Span },
    #[error("invalid integer literal {text:?} at {span}")]
    InvalidInteger { text: String, span: Span },
    #[error("empty identifier at {span}")]
    EmptyIdentifier { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::MalformedString { span }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedComment { span }
            | LexError::InvalidInteger { span, .. }
            | LexError::EmptyIdentifier { span } => *span,
        }
    }
}

/// An error encountered while parsing a token stream into a module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("expected {expected}, found {found} at {span}")]
    Syntax {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("undefined {kind}: {ident} at {span}")]
    Unresolved {
        kind: &'static str,
        ident: Identifier,
        span: Span,
    },
    #[error("unknown instruction '{name}' at {span}")]
    UnknownInstruction { name: String, span: Span },
    #[error("constant {value} out of range at {span}")]
    ConstOutOfRange { value: i64, span: Span },
}

impl ParseError {
    /// An "expected X, found Y" error.
    pub fn expected(expected: impl Into<String>, found: impl ToString, span: Span) -> Self {
        ParseError::Syntax {
            expected: expected.into(),
            found: found.to_string(),
            span,
        }
    }

    /// An "undefined X" error for a name that resolved to nothing.
    pub fn undefined(kind: &'static str, name: &str, span: Span) -> Self {
        Self::unresolved(kind, Identifier::Name(name.to_string()), span)
    }

    pub fn unresolved(kind: &'static str, ident: Identifier, span: Span) -> Self {
        ParseError::Unresolved { kind, ident, span }
    }

    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(e) => e.span(),
            ParseError::Syntax { span, .. }
            | ParseError::Unresolved { span, .. }
            | ParseError::UnknownInstruction { span, .. }
            | ParseError::ConstOutOfRange { span, .. } => *span,
        }
    }
}
