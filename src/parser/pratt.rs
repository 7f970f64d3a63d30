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

//! Pratt parser for model expressions
//!
//! Binary operators are driven by the precedence table on
//! [`BinaryOperator`]; the ternary conditional is handled in the same loop
//! at the lowest level and binds to the right, so `a ? b : c ? d : e`
//! reads as `a ? b : (c ? d : e)`.

use super::error::{ParseError, ParseResult};
use super::tokenizer::{Token, Tokenizer};
use crate::ast::{Associativity, BinaryOperator, ExpressionNode, Precedence, UnaryOperator};
use smallvec::SmallVec;

/// Map a token to the binary operator it spells, if any
#[inline(always)]
fn token_to_binary_op(token: &Token<'_>) -> Option<BinaryOperator> {
    match token {
        // Arithmetic
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Subtract),
        Token::Multiply => Some(BinaryOperator::Multiply),
        Token::Divide => Some(BinaryOperator::Divide),
        Token::Power => Some(BinaryOperator::Power),

        // Comparison
        Token::GreaterThan => Some(BinaryOperator::GreaterThan),
        Token::GreaterThanOrEqual => Some(BinaryOperator::GreaterThanOrEqual),
        Token::LessThan => Some(BinaryOperator::LessThan),
        Token::LessThanOrEqual => Some(BinaryOperator::LessThanOrEqual),
        Token::Equal => Some(BinaryOperator::Equal),
        Token::NotEqual => Some(BinaryOperator::NotEqual),

        // Logic
        Token::And => Some(BinaryOperator::And),
        Token::Or => Some(BinaryOperator::Or),

        _ => None,
    }
}

/// Pratt parser over a single expression string
pub struct PrattParser<'input> {
    input: &'input str,
    tokenizer: Tokenizer<'input>,
    current_token: Option<Token<'input>>,
    current_start: usize,
}

impl<'input> PrattParser<'input> {
    /// Create a new parser
    #[inline]
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            tokenizer: Tokenizer::new(input),
            current_token: None,
            current_start: 0,
        }
    }

    #[inline(always)]
    fn advance(&mut self) -> ParseResult<()> {
        self.current_token = self.tokenizer.next_token()?;
        self.current_start = self.tokenizer.token_start();
        Ok(())
    }

    #[inline(always)]
    fn current(&self) -> Option<&Token<'input>> {
        self.current_token.as_ref()
    }

    fn end_of_input(&self) -> ParseError {
        ParseError::UnexpectedEndOfInput {
            position: self.input.len(),
        }
    }

    fn unexpected(&self, token: &Token<'_>) -> ParseError {
        ParseError::UnexpectedToken {
            token: token.describe(),
            position: self.current_start,
        }
    }

    /// Consume the expected token or report what was found instead
    #[inline(always)]
    fn expect(&mut self, expected: Token<'input>) -> ParseResult<()> {
        match self.current() {
            Some(token) if *token == expected => self.advance(),
            Some(token) => Err(self.unexpected(token)),
            None => Err(self.end_of_input()),
        }
    }

    /// Parse the whole input as one expression
    pub fn parse(mut self) -> ParseResult<ExpressionNode> {
        self.advance()?;
        if self.current().is_none() {
            return Err(ParseError::EmptyExpression);
        }

        let expr = self.parse_expression_with_precedence(Precedence::Conditional)?;

        match self.current() {
            None => Ok(expr),
            Some(token) => Err(self.unexpected(token)),
        }
    }

    /// Parse an expression whose operators all bind at least as tightly as `min_precedence`
    fn parse_expression_with_precedence(
        &mut self,
        min_precedence: Precedence,
    ) -> ParseResult<ExpressionNode> {
        let mut left = self.parse_unary()?;

        loop {
            let Some(token) = self.current() else {
                break;
            };

            if *token == Token::Question {
                if Precedence::Conditional < min_precedence {
                    break;
                }
                self.advance()?;
                let then_expr = self.parse_expression_with_precedence(Precedence::Conditional)?;
                self.expect(Token::Colon)?;
                let else_expr = self.parse_expression_with_precedence(Precedence::Conditional)?;
                left = ExpressionNode::conditional(left, then_expr, else_expr);
                continue;
            }

            let Some(op) = token_to_binary_op(token) else {
                break;
            };
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance()?;

            let next_min = match op.associativity() {
                Associativity::Left => precedence.next_level(),
                Associativity::Right => precedence,
            };
            let right = self.parse_expression_with_precedence(next_min)?;
            left = ExpressionNode::binary_op(op, left, right);
        }

        Ok(left)
    }

    /// Parse prefix operators; the operand binds tighter than any binary
    /// operator except `^`, so `-x^2` is `-(x^2)`
    fn parse_unary(&mut self) -> ParseResult<ExpressionNode> {
        match self.current() {
            Some(Token::Minus) => {
                self.advance()?;
                let operand = self.parse_expression_with_precedence(Precedence::Unary)?;
                Ok(ExpressionNode::unary_op(UnaryOperator::Minus, operand))
            }
            Some(Token::Not) => {
                self.advance()?;
                let operand = self.parse_expression_with_precedence(Precedence::Unary)?;
                Ok(ExpressionNode::unary_op(UnaryOperator::Not, operand))
            }
            Some(Token::Plus) => {
                self.advance()?;
                self.parse_expression_with_precedence(Precedence::Unary)
            }
            _ => self.parse_primary(),
        }
    }

    /// Parse literals, identifiers, calls and parenthesized groups
    fn parse_primary(&mut self) -> ParseResult<ExpressionNode> {
        match self.current() {
            Some(Token::Identifier(name)) => {
                let name = *name;
                self.advance()?;
                if let Some(Token::LeftParen) = self.current() {
                    self.parse_function_call(name)
                } else {
                    Ok(ExpressionNode::identifier(name))
                }
            }
            Some(Token::Number(text)) => {
                let text = *text;
                self.advance()?;
                Ok(ExpressionNode::number(text))
            }
            Some(Token::LeftParen) => {
                let open = self.current_start;
                self.advance()?;
                let inner = self.parse_expression_with_precedence(Precedence::Conditional)?;
                match self.current() {
                    Some(Token::RightParen) => {
                        self.advance()?;
                        Ok(inner)
                    }
                    Some(token) => Err(self.unexpected(token)),
                    None => Err(ParseError::UnclosedParen { position: open }),
                }
            }
            Some(token) => Err(self.unexpected(token)),
            None => Err(self.end_of_input()),
        }
    }

    /// Parse `name(arg, ...)`; the current token is the opening parenthesis
    fn parse_function_call(&mut self, name: &str) -> ParseResult<ExpressionNode> {
        let open = self.current_start;
        self.advance()?;

        let mut args: SmallVec<[ExpressionNode; 4]> = SmallVec::new();
        if let Some(Token::RightParen) = self.current() {
            self.advance()?;
            return Ok(ExpressionNode::function_call(name, args));
        }

        loop {
            args.push(self.parse_expression_with_precedence(Precedence::Conditional)?);
            match self.current() {
                Some(Token::Comma) => self.advance()?,
                Some(Token::RightParen) => {
                    self.advance()?;
                    break;
                }
                Some(token) => return Err(self.unexpected(token)),
                None => return Err(ParseError::UnclosedParen { position: open }),
            }
        }

        Ok(ExpressionNode::function_call(name, args))
    }
}

/// Parse an expression string into an AST
pub fn parse_expression(input: &str) -> ParseResult<ExpressionNode> {
    PrattParser::new(input).parse()
}
