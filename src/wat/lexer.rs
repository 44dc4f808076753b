//! Lexer for the text format.
//!
//! The lexer is an iterator over tokens. At each position the first matching
//! rule wins:
//!
//! 1. `(;` opens a block comment (comments nest), skipped
//! 2. `;;` opens a line comment, skipped
//! 3. `"` opens a string literal
//! 4. `(` or `)`
//! 5. ASCII whitespace, skipped
//! 6. a lowercase letter starts a keyword run
//! 7. `+`, `-` or a digit starts an integer
//! 8. `$` starts an identifier
//!
//! Anything else is an error. A successful lex always ends with exactly one
//! [`TokenKind::Eof`] token.
//!
//! ```
//! use watrun::wat::{Keyword, Lexer, TokenKind};
//!
//! let tokens = Lexer::tokenise("(func $f (param i32))").unwrap();
//! assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::Func));
//! assert_eq!(tokens[2].kind, TokenKind::Id("f".into()));
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
//! ```

use super::cursor::{Cursor, Position};
use super::error::LexError;
use super::token::{Keyword, Token, TokenKind};

/// Lexer over a source string, yielding `Result<Token, LexError>`.
///
/// Iteration ends after the `Eof` token or after the first error.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            done: false,
        }
    }

    /// Tokenise the entire source. On error no tokens are returned.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn tokenise(source: &str) -> Result<Vec<Token>, LexError> {
        let tokens: Vec<Token> = Lexer::new(source).collect::<Result<_, _>>()?;
        tracing::debug!(count = tokens.len(), "tokenised source");
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;

        let start = self.cursor.position();
        let kind = match self.cursor.peek() {
            None => {
                self.done = true;
                TokenKind::Eof
            }
            Some('"') => self.lex_string(start)?,
            Some('(') => {
                self.cursor.bump();
                TokenKind::LeftParen
            }
            Some(')') => {
                self.cursor.bump();
                TokenKind::RightParen
            }
            Some(c) if c.is_ascii_lowercase() => self.lex_keyword(),
            Some(c) if c == '+' || c == '-' || c.is_ascii_digit() => self.lex_integer(start)?,
            Some('$') => self.lex_id(start)?,
            Some(found) => {
                self.cursor.bump();
                return Err(LexError::UnexpectedCharacter {
                    found,
                    span: start.span_to(&self.cursor.position()),
                });
            }
        };

        let text = self.cursor.slice_from(&start);
        Ok(Token::new(kind, text, start.span_to(&self.cursor.position())))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

// ============================================================================
// Whitespace and comments
// ============================================================================

impl<'a> Lexer<'a> {
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            if self.cursor.at("(;") {
                self.skip_block_comment()?;
            } else if self.cursor.at(";;") {
                self.cursor.take_while(|c| c != '\n');
            } else if matches!(self.cursor.peek(), Some(c) if c.is_ascii_whitespace()) {
                self.cursor.take_while(|c| c.is_ascii_whitespace());
            } else {
                return Ok(());
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.cursor.position();
        self.cursor.bump();
        self.cursor.bump();

        let mut depth = 1u32;
        while depth > 0 {
            if self.cursor.at("(;") {
                self.cursor.bump();
                self.cursor.bump();
                depth += 1;
            } else if self.cursor.at(";)") {
                self.cursor.bump();
                self.cursor.bump();
                depth -= 1;
            } else if self.cursor.bump().is_none() {
                return Err(LexError::UnterminatedComment {
                    span: start.span_to(&self.cursor.position()),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Literals
// ============================================================================

impl<'a> Lexer<'a> {
    /// The only escape is `\"`; any other character after a backslash is malformed.
    fn lex_string(&mut self, start: Position) -> Result<TokenKind, LexError> {
        self.cursor.bump();
        let mut value = String::new();
        loop {
            match self.cursor.bump() {
                None => {
                    return Err(LexError::UnterminatedString {
                        span: start.span_to(&self.cursor.position()),
                    })
                }
                Some('"') => return Ok(TokenKind::String(value)),
                Some('\\') => {
                    let escape = self.cursor.position();
                    if !self.cursor.eat('"') {
                        return Err(LexError::MalformedString {
                            span: escape.span_here(),
                        });
                    }
                    value.push('"');
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn lex_keyword(&mut self) -> TokenKind {
        let word = self.cursor.take_while(is_idchar);
        match Keyword::lookup(word) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Reserved(word.to_string()),
        }
    }

    /// Integers are an optional sign followed by digits and `_` separators.
    fn lex_integer(&mut self, start: Position) -> Result<TokenKind, LexError> {
        let mut digits = String::new();
        if let Some(sign @ ('+' | '-')) = self.cursor.peek() {
            self.cursor.bump();
            if sign == '-' {
                digits.push('-');
            }
        }
        let run = self.cursor.take_while(|c| c.is_ascii_digit() || c == '_');
        digits.extend(run.chars().filter(|c| *c != '_'));

        // A number running straight into another word (`12ab`, `-x`) is not an integer.
        let trailing = matches!(self.cursor.peek(), Some(c) if is_idchar(c));
        if trailing {
            self.cursor.take_while(is_idchar);
        }

        let invalid = || LexError::InvalidInteger {
            text: self.cursor.slice_from(&start).to_string(),
            span: start.span_to(&self.cursor.position()),
        };
        if trailing {
            return Err(invalid());
        }
        digits.parse::<i64>().map(TokenKind::Integer).map_err(|_| invalid())
    }

    fn lex_id(&mut self, start: Position) -> Result<TokenKind, LexError> {
        self.cursor.bump();
        let name = self.cursor.take_while(is_idchar);
        if name.is_empty() {
            return Err(LexError::EmptyIdentifier {
                span: start.span_to(&self.cursor.position()),
            });
        }
        Ok(TokenKind::Id(name.to_string()))
    }
}

/// Characters allowed after the first character of keywords and identifiers.
pub fn is_idchar(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '.'
                | '/'
                | ':'
                | '<'
                | '='
                | '>'
                | '?'
                | '@'
                | '\\'
                | '^'
                | '_'
                | '`'
                | '|'
                | '~'
        )
}
