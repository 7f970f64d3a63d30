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

//! Shared renderer for operator notations
//!
//! The ternary-style notations differ only in how operators and function
//! names are spelled, so they share one visitor parameterized by an
//! [`InfixDialect`].

use crate::ast::{
    Associativity, BinaryOperator, ExpressionNode, Precedence, UnaryOperator, Visitor,
};
use std::borrow::Cow;

/// Spelling rules of an operator notation
pub trait InfixDialect {
    /// Spelling of a binary operator (without surrounding spaces)
    fn binary_operator(&self, op: BinaryOperator) -> &'static str;

    /// Spelling of a prefix operator, including any trailing space
    fn unary_operator(&self, op: UnaryOperator) -> &'static str;

    /// Name of a function in this notation
    fn function_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(name)
    }

    /// Function used to spell exponentiation, when `^` is not available
    fn power_function(&self) -> Option<&'static str> {
        None
    }
}

/// Visitor rendering an expression tree with a dialect's spellings
pub struct InfixRenderer<'d, D: InfixDialect> {
    dialect: &'d D,
}

impl<'d, D: InfixDialect> InfixRenderer<'d, D> {
    /// Create a renderer for the given dialect
    pub fn new(dialect: &'d D) -> Self {
        Self { dialect }
    }

    /// Render a complete expression
    pub fn render(&mut self, expr: &ExpressionNode) -> String {
        self.visit_expression(expr)
    }

    fn grouped(&mut self, expr: &ExpressionNode, parenthesize: bool) -> String {
        let text = self.visit_expression(expr);
        if parenthesize {
            format!("({text})")
        } else {
            text
        }
    }
}

/// Whether the left operand of `op` needs parentheses
pub(crate) fn left_needs_parens(op: BinaryOperator, left: &ExpressionNode) -> bool {
    let precedence = op.precedence();
    let child = left.precedence();
    child < precedence
        || (child == precedence && op.associativity() == Associativity::Right)
}

/// Whether the right operand of `op` needs parentheses; a sign on the
/// right is always grouped so `v - -40` reads `v - (-40)`
pub(crate) fn right_needs_parens(op: BinaryOperator, right: &ExpressionNode) -> bool {
    if let ExpressionNode::UnaryOp {
        op: UnaryOperator::Minus | UnaryOperator::Plus,
        ..
    } = right
    {
        return true;
    }
    let precedence = op.precedence();
    let child = right.precedence();
    child < precedence || (child == precedence && op.associativity() == Associativity::Left)
}

/// Whether the operand of a prefix operator needs parentheses
pub(crate) fn operand_needs_parens(operand: &ExpressionNode) -> bool {
    matches!(operand, ExpressionNode::UnaryOp { .. }) || operand.precedence() < Precedence::Unary
}

impl<D: InfixDialect> Visitor for InfixRenderer<'_, D> {
    type Result = String;

    fn visit_number(&mut self, text: &str) -> String {
        text.to_string()
    }

    fn visit_identifier(&mut self, name: &str) -> String {
        name.to_string()
    }

    fn visit_binary_op(
        &mut self,
        op: &BinaryOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> String {
        if *op == BinaryOperator::Power {
            if let Some(function) = self.dialect.power_function() {
                let base = self.visit_expression(left);
                let exponent = self.visit_expression(right);
                return format!("{function}({base}, {exponent})");
            }
        }

        let left_text = self.grouped(left, left_needs_parens(*op, left));
        let right_text = self.grouped(right, right_needs_parens(*op, right));
        format!(
            "{} {} {}",
            left_text,
            self.dialect.binary_operator(*op),
            right_text
        )
    }

    fn visit_unary_op(&mut self, op: &UnaryOperator, operand: &ExpressionNode) -> String {
        let operand_text = self.grouped(operand, operand_needs_parens(operand));
        format!("{}{}", self.dialect.unary_operator(*op), operand_text)
    }

    fn visit_function_call(&mut self, name: &str, args: &[ExpressionNode]) -> String {
        let args = args
            .iter()
            .map(|arg| self.visit_expression(arg))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.dialect.function_name(name), args)
    }

    fn visit_conditional(
        &mut self,
        condition: &ExpressionNode,
        then_expr: &ExpressionNode,
        else_expr: &ExpressionNode,
    ) -> String {
        let condition_text = self.grouped(
            condition,
            condition.precedence() == Precedence::Conditional,
        );
        let then_text = self.grouped(then_expr, then_expr.precedence() == Precedence::Conditional);
        let else_text = self.visit_expression(else_expr);
        format!("{condition_text} ? {then_text} : {else_text}")
    }
}
