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

//! Parser error types

use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use thiserror::Error;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error with location information
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected token
    #[error("Unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        /// The unexpected token that was found
        token: String,
        /// Position where the token was found
        position: usize,
    },

    /// Unexpected end of input at specific position
    #[error("Unexpected end of input at position {position}")]
    UnexpectedEndOfInput {
        /// Position where more input was expected
        position: usize,
    },

    /// Character that starts no token of the grammar
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter {
        /// The offending character
        character: char,
        /// Position of the character
        position: usize,
    },

    /// Invalid numeric literal
    #[error("Invalid number literal at position {position}: {value}")]
    InvalidNumber {
        /// The literal text as scanned
        value: String,
        /// Position where the literal starts
        position: usize,
    },

    /// Unknown dotted operator such as `.foo.`
    #[error("Unknown operator '{operator}' at position {position}")]
    UnknownOperator {
        /// The operator text including its dots
        operator: String,
        /// Position where the operator starts
        position: usize,
    },

    /// Opening parenthesis without a matching close
    #[error("Unclosed parenthesis opened at position {position}")]
    UnclosedParen {
        /// Position of the opening parenthesis
        position: usize,
    },

    /// Input contained no expression at all
    #[error("Empty expression")]
    EmptyExpression,
}

impl ParseError {
    /// Byte offset the error refers to, when it has one
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEndOfInput { position }
            | ParseError::UnexpectedCharacter { position, .. }
            | ParseError::InvalidNumber { position, .. }
            | ParseError::UnknownOperator { position, .. }
            | ParseError::UnclosedParen { position } => Some(*position),
            ParseError::EmptyExpression => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            ParseError::UnexpectedToken { .. }
            | ParseError::UnexpectedEndOfInput { .. }
            | ParseError::UnexpectedCharacter { .. }
            | ParseError::EmptyExpression => DiagnosticCode::UnexpectedToken,
            ParseError::InvalidNumber { .. } => DiagnosticCode::InvalidNumber,
            ParseError::UnknownOperator { .. } => DiagnosticCode::UnknownOperator,
            ParseError::UnclosedParen { .. } => DiagnosticCode::ExpectedToken(")".to_string()),
        };
        let builder = DiagnosticBuilder::error(code).with_message(self.to_string());
        match self.position() {
            Some(position) => builder.with_offset(position).build(),
            None => builder.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_positions() {
        let err = ParseError::UnexpectedCharacter {
            character: '#',
            position: 4,
        };
        assert_eq!(err.to_string(), "Unexpected character '#' at position 4");
        assert_eq!(err.position(), Some(4));
        assert_eq!(ParseError::EmptyExpression.position(), None);
    }

    #[test]
    fn test_to_diagnostic() {
        let diagnostic = ParseError::InvalidNumber {
            value: "1e".to_string(),
            position: 2,
        }
        .to_diagnostic();
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.code, DiagnosticCode::InvalidNumber);
        assert_eq!(diagnostic.offset, Some(2));
    }
}
