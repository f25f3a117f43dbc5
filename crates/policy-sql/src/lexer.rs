//! Clause tokenizer shared by every scanner in the crate.
//!
//! Text is cut into lexemes with nom: quoted literals, parentheses, words,
//! whitespace runs and single punctuation characters. Each [`Token`] carries
//! its byte offset and the parenthesis depth it sits at, so callers never
//! track quote or depth state themselves.
//!
//! | Lexeme | Example | Depth reported |
//! |--------|---------|----------------|
//! | `Quoted` | `'E10'`, `"x OR y"` | enclosing depth |
//! | `UnterminatedQuote` | `'abc` to end of text | enclosing depth |
//! | `Open` | `(` | depth outside the paren |
//! | `Close` | `)` | depth outside the paren |
//! | `Word` | `patient_age`, `AND`, `18` | enclosing depth |
//! | `Space` | `" \n\t"` | enclosing depth |
//! | `Other` | `>`, `=`, `;`, `,` | enclosing depth |

use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while1},
    character::complete::{anychar, char, one_of},
    combinator::{map, recognize, rest},
    sequence::{pair, tuple},
    IResult,
};

/// Kind of lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Quoted,
    UnterminatedQuote,
    Open,
    Close,
    Word,
    Space,
    Other,
}

/// A lexeme with its position and parenthesis depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
    pub depth: usize,
}

impl Token<'_> {
    /// Byte offset just past the token.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Case-insensitive keyword match on a whole word.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Unquoted punctuation character.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Other && self.text.starts_with(c)
    }

    /// Whitespace or a parenthesis.
    pub fn is_boundary(&self) -> bool {
        matches!(self.kind, TokenKind::Space | TokenKind::Open | TokenKind::Close)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A single- or double-quoted literal, delimiters included.
pub(crate) fn quoted_text(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(tuple((char('\''), take_till(|c: char| c == '\''), char('\'')))),
        recognize(tuple((char('"'), take_till(|c: char| c == '"'), char('"')))),
    ))(input)
}

fn unterminated_quote(input: &str) -> IResult<&str, &str> {
    recognize(pair(one_of("'\""), rest))(input)
}

fn lexeme(input: &str) -> IResult<&str, (TokenKind, &str)> {
    alt((
        map(quoted_text, |t| (TokenKind::Quoted, t)),
        map(unterminated_quote, |t| (TokenKind::UnterminatedQuote, t)),
        map(recognize(char('(')), |t| (TokenKind::Open, t)),
        map(recognize(char(')')), |t| (TokenKind::Close, t)),
        map(take_while1(is_word_char), |t| (TokenKind::Word, t)),
        map(take_while1(char::is_whitespace), |t| (TokenKind::Space, t)),
        map(recognize(anychar), |t| (TokenKind::Other, t)),
    ))(input)
}

/// Iterator over the tokens of a text.
///
/// Depth never goes below zero: a stray `)` is reported at depth zero.
#[derive(Debug, Clone)]
pub(crate) struct Tokens<'a> {
    source: &'a str,
    rest: &'a str,
    depth: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        let (remaining, (kind, text)) = lexeme(self.rest).ok()?;
        let offset = self.source.len() - self.rest.len();
        self.rest = remaining;

        let depth = match kind {
            TokenKind::Open => {
                self.depth += 1;
                self.depth - 1
            }
            TokenKind::Close => {
                self.depth = self.depth.saturating_sub(1);
                self.depth
            }
            _ => self.depth,
        };

        Some(Token {
            kind,
            text,
            offset,
            depth,
        })
    }
}

/// Tokenizes `text` from the start.
pub(crate) fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        source: text,
        rest: text,
        depth: 0,
    }
}
