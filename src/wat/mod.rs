//! Front end for the text format: lexing, identifier resolution and parsing.
//!
//! # Example
//!
//! ```
//! use watrun::wat::{parse, Keyword, Lexer, TokenKind};
//!
//! let source = "(module (func $main (result i32) i32.const 42))";
//! let tokens = Lexer::tokenise(source).unwrap();
//! assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::Module));
//!
//! let module = parse(source).unwrap();
//! assert_eq!(module.funcs().count(), 1);
//! ```
//!
//! # Error Handling
//!
//! Lexing stops at the first malformed token and parsing at the first
//! structural problem; both report a line and column:
//!
//! ```
//! use watrun::wat::parse;
//!
//! let err = parse("(module (func\n  i32.frobnicate))").unwrap_err();
//! assert_eq!(err.span().line, 2);
//! ```

pub mod ast;
mod cursor;
pub mod env;
mod error;
mod lexer;
mod parser;
mod token;

pub use env::{Identifier, IdentifierEnvironment, IndexSpace};
pub use error::{LexError, ParseError};
pub use lexer::Lexer;
pub use parser::{parse, Parser};
pub use token::{Keyword, Literal, Span, Token, TokenKind};
