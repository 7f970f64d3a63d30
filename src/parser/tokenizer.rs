// Copyright 2024 NeuroML Gates Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Byte-level tokenizer for model expressions
//!
//! Tokens borrow their text from the input. Comparison and logic operators
//! are accepted both in the modeling language's dotted spelling (`.gt.`,
//! `.and.`) and in the symbolic spelling (`>`, `&&`) so that text rendered
//! by the ternary notations parses back.

use super::error::{ParseError, ParseResult};
use super::span::Spanned;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Token of the expression grammar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'input> {
    /// Numeric literal as written (e.g., 42, 0.5, 1e-3)
    Number(&'input str),
    /// Identifier (e.g., rate, midpoint, v)
    Identifier(&'input str),

    /// Addition operator (+)
    Plus,
    /// Subtraction operator (-)
    Minus,
    /// Multiplication operator (*)
    Multiply,
    /// Division operator (/)
    Divide,
    /// Power operator (^)
    Power,
    /// Greater than (.gt. or >)
    GreaterThan,
    /// Greater than or equal (.geq., .ge. or >=)
    GreaterThanOrEqual,
    /// Less than (.lt. or <)
    LessThan,
    /// Less than or equal (.leq., .le. or <=)
    LessThanOrEqual,
    /// Equality (.eq. or ==)
    Equal,
    /// Inequality (.neq., .ne. or !=)
    NotEqual,
    /// Logical AND (.and. or &&)
    And,
    /// Logical OR (.or. or ||)
    Or,
    /// Logical NOT (.not. or !)
    Not,
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Comma separator (,)
    Comma,
    /// Ternary question mark (?)
    Question,
    /// Ternary colon (:)
    Colon,
}

impl Token<'_> {
    /// Source-like spelling used in error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Number(text) | Token::Identifier(text) => (*text).to_string(),
            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Multiply => "*".to_string(),
            Token::Divide => "/".to_string(),
            Token::Power => "^".to_string(),
            Token::GreaterThan => ".gt.".to_string(),
            Token::GreaterThanOrEqual => ".geq.".to_string(),
            Token::LessThan => ".lt.".to_string(),
            Token::LessThanOrEqual => ".leq.".to_string(),
            Token::Equal => ".eq.".to_string(),
            Token::NotEqual => ".neq.".to_string(),
            Token::And => ".and.".to_string(),
            Token::Or => ".or.".to_string(),
            Token::Not => ".not.".to_string(),
            Token::LeftParen => "(".to_string(),
            Token::RightParen => ")".to_string(),
            Token::Comma => ",".to_string(),
            Token::Question => "?".to_string(),
            Token::Colon => ":".to_string(),
        }
    }
}

/// Dotted operator words, looked up case-insensitively
static DOTTED_OPERATORS: Lazy<FxHashMap<&'static str, Token<'static>>> = Lazy::new(|| {
    let mut map = FxHashMap::default();

    // Comparisons
    map.insert("gt", Token::GreaterThan);
    map.insert("geq", Token::GreaterThanOrEqual);
    map.insert("ge", Token::GreaterThanOrEqual);
    map.insert("lt", Token::LessThan);
    map.insert("leq", Token::LessThanOrEqual);
    map.insert("le", Token::LessThanOrEqual);
    map.insert("eq", Token::Equal);
    map.insert("neq", Token::NotEqual);
    map.insert("ne", Token::NotEqual);

    // Logic
    map.insert("and", Token::And);
    map.insert("or", Token::Or);
    map.insert("not", Token::Not);

    map
});

/// Tokenizer over the bytes of one expression
#[derive(Clone)]
pub struct Tokenizer<'input> {
    input: &'input str,
    bytes: &'input [u8],
    pos: usize,
    token_start: usize,
}

impl<'input> Tokenizer<'input> {
    /// Create a new tokenizer
    #[inline]
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            token_start: 0,
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Start offset of the token most recently returned by [`Tokenizer::next_token`]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    #[inline(always)]
    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    #[inline(always)]
    fn is_id_start(ch: u8) -> bool {
        matches!(ch, b'A'..=b'Z' | b'a'..=b'z' | b'_')
    }

    #[inline(always)]
    fn is_id_continue(ch: u8) -> bool {
        matches!(ch, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_')
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n') = self.peek_byte(0) {
            self.pos += 1;
        }
    }

    fn scan_digits(&mut self) {
        while matches!(self.peek_byte(0), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    /// Scan a numeric literal; a trailing dot is only taken when it cannot
    /// start a dotted operator (`1.gt.x` is `1 .gt. x`)
    fn parse_number(&mut self) -> ParseResult<Token<'input>> {
        let start = self.pos;
        self.scan_digits();

        if self.peek_byte(0) == Some(b'.') {
            match self.peek_byte(1) {
                Some(b'0'..=b'9') => {
                    self.pos += 1;
                    self.scan_digits();
                }
                Some(ch) if ch.is_ascii_alphabetic() => {}
                _ => self.pos += 1,
            }
        }

        if matches!(self.peek_byte(0), Some(b'e' | b'E')) {
            let digits_at = match self.peek_byte(1) {
                Some(b'+' | b'-') => 2,
                _ => 1,
            };
            if matches!(self.peek_byte(digits_at), Some(b'0'..=b'9')) {
                self.pos += digits_at;
                self.scan_digits();
            }
        }

        let text = &self.input[start..self.pos];
        if text.parse::<f64>().is_err() {
            return Err(ParseError::InvalidNumber {
                value: text.to_string(),
                position: start,
            });
        }
        Ok(Token::Number(text))
    }

    fn parse_identifier(&mut self) -> &'input str {
        let start = self.pos;
        while matches!(self.peek_byte(0), Some(ch) if Self::is_id_continue(ch)) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    /// Scan `.word.` starting at the leading dot
    fn parse_dotted_operator(&mut self) -> ParseResult<Token<'input>> {
        let start = self.pos;
        self.pos += 1;
        while matches!(self.peek_byte(0), Some(ch) if ch.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let word = &self.input[start + 1..self.pos];
        if self.peek_byte(0) != Some(b'.') {
            return Err(ParseError::UnknownOperator {
                operator: self.input[start..self.pos].to_string(),
                position: start,
            });
        }
        self.pos += 1;

        DOTTED_OPERATORS
            .get(word.to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| ParseError::UnknownOperator {
                operator: self.input[start..self.pos].to_string(),
                position: start,
            })
    }

    /// Consume `second` if it follows, choosing between a two-byte and a one-byte token
    fn one_or_two(
        &mut self,
        second: u8,
        pair: Token<'input>,
        single: Option<Token<'input>>,
    ) -> ParseResult<Token<'input>> {
        if self.peek_byte(1) == Some(second) {
            self.pos += 2;
            return Ok(pair);
        }
        match single {
            Some(token) => {
                self.pos += 1;
                Ok(token)
            }
            None => Err(self.unexpected_character()),
        }
    }

    fn unexpected_character(&self) -> ParseError {
        let character = self.input[self.pos..].chars().next().unwrap_or('\0');
        ParseError::UnexpectedCharacter {
            character,
            position: self.pos,
        }
    }

    /// Produce the next token, or `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<Token<'input>>> {
        self.skip_whitespace();
        self.token_start = self.pos;

        let Some(byte) = self.peek_byte(0) else {
            return Ok(None);
        };

        let token = match byte {
            b'0'..=b'9' => self.parse_number()?,
            b'.' => match self.peek_byte(1) {
                Some(b'0'..=b'9') => self.parse_number()?,
                _ => self.parse_dotted_operator()?,
            },
            ch if Self::is_id_start(ch) => Token::Identifier(self.parse_identifier()),
            b'(' => {
                self.pos += 1;
                Token::LeftParen
            }
            b')' => {
                self.pos += 1;
                Token::RightParen
            }
            b',' => {
                self.pos += 1;
                Token::Comma
            }
            b'+' => {
                self.pos += 1;
                Token::Plus
            }
            b'-' => {
                self.pos += 1;
                Token::Minus
            }
            b'*' => match self.peek_byte(1) {
                Some(b'*') => {
                    self.pos += 2;
                    Token::Power
                }
                _ => {
                    self.pos += 1;
                    Token::Multiply
                }
            },
            b'/' => {
                self.pos += 1;
                Token::Divide
            }
            b'^' => {
                self.pos += 1;
                Token::Power
            }
            b'?' => {
                self.pos += 1;
                Token::Question
            }
            b':' => {
                self.pos += 1;
                Token::Colon
            }
            b'>' => self.one_or_two(b'=', Token::GreaterThanOrEqual, Some(Token::GreaterThan))?,
            b'<' => self.one_or_two(b'=', Token::LessThanOrEqual, Some(Token::LessThan))?,
            b'=' => self.one_or_two(b'=', Token::Equal, None)?,
            b'!' => self.one_or_two(b'=', Token::NotEqual, Some(Token::Not))?,
            b'&' => self.one_or_two(b'&', Token::And, None)?,
            b'|' => self.one_or_two(b'|', Token::Or, None)?,
            _ => return Err(self.unexpected_character()),
        };

        Ok(Some(token))
    }

    /// Tokenize the whole input with source spans
    pub fn tokenize_all(&mut self) -> ParseResult<Vec<Spanned<Token<'input>>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(Spanned::new(token, self.token_start, self.pos));
        }
        Ok(tokens)
    }
}

/// Tokenize a complete expression
pub fn tokenize(input: &str) -> ParseResult<Vec<Spanned<Token<'_>>>> {
    Tokenizer::new(input).tokenize_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|spanned| spanned.value)
            .collect()
    }

    #[test]
    fn test_tokenizer_basic() {
        let mut tokenizer = Tokenizer::new("rate * exp(x)");

        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::Identifier("rate")));
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::Multiply));
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::Identifier("exp")));
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::LeftParen));
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::Identifier("x")));
        assert_eq!(tokenizer.next_token().unwrap(), Some(Token::RightParen));
        assert!(tokenizer.next_token().unwrap().is_none());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("12 0.5 .5 1e-3 2.5E+4"),
            vec![
                Token::Number("12"),
                Token::Number("0.5"),
                Token::Number(".5"),
                Token::Number("1e-3"),
                Token::Number("2.5E+4"),
            ]
        );
    }

    #[test]
    fn test_number_followed_by_dotted_operator() {
        assert_eq!(
            tokens("1.gt.x"),
            vec![Token::Number("1"), Token::GreaterThan, Token::Identifier("x")]
        );
    }

    #[test]
    fn test_dotted_operators() {
        assert_eq!(
            tokens("x .gt. 0 .AND. y .neq. 1 .or. .not. z"),
            vec![
                Token::Identifier("x"),
                Token::GreaterThan,
                Token::Number("0"),
                Token::And,
                Token::Identifier("y"),
                Token::NotEqual,
                Token::Number("1"),
                Token::Or,
                Token::Not,
                Token::Identifier("z"),
            ]
        );
    }

    #[test]
    fn test_symbolic_operators() {
        assert_eq!(
            tokens("a >= b != c && !d || e ? f : g"),
            vec![
                Token::Identifier("a"),
                Token::GreaterThanOrEqual,
                Token::Identifier("b"),
                Token::NotEqual,
                Token::Identifier("c"),
                Token::And,
                Token::Not,
                Token::Identifier("d"),
                Token::Or,
                Token::Identifier("e"),
                Token::Question,
                Token::Identifier("f"),
                Token::Colon,
                Token::Identifier("g"),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let spanned = tokenize("ab + 10").unwrap();
        assert_eq!((spanned[0].start, spanned[0].end), (0, 2));
        assert_eq!((spanned[1].start, spanned[1].end), (3, 4));
        assert_eq!((spanned[2].start, spanned[2].end), (5, 7));
    }

    #[test]
    fn test_unknown_dotted_operator() {
        assert_eq!(
            tokenize("x .foo. y").unwrap_err(),
            ParseError::UnknownOperator {
                operator: ".foo.".to_string(),
                position: 2,
            }
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            tokenize("x # y").unwrap_err(),
            ParseError::UnexpectedCharacter {
                character: '#',
                position: 2,
            }
        );
        assert!(matches!(
            tokenize("a = b").unwrap_err(),
            ParseError::UnexpectedCharacter { character: '=', .. }
        ));
    }
}
