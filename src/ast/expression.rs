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

//! Expression AST node definitions

use super::operator::{BinaryOperator, Precedence, UnaryOperator};
use smallvec::SmallVec;

/// AST representation of a model expression
///
/// Large variants are boxed to keep the enum small.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpressionNode {
    /// Numeric literal, kept as written in the source (`1000`, `0.5`, `1e-3`)
    Number(String),

    /// Named quantity (parameter, derived variable, independent variable)
    Identifier(String),

    /// Binary operation (arithmetic, comparison, logical)
    BinaryOp(Box<BinaryOpData>),

    /// Unary operation (negation, not)
    UnaryOp {
        /// The operator
        op: UnaryOperator,
        /// The operand
        operand: Box<ExpressionNode>,
    },

    /// Function call with name and arguments
    FunctionCall(Box<FunctionCallData>),

    /// Ternary conditional (`condition ? then : else`)
    Conditional(Box<ConditionalData>),
}

/// Binary operation data (separate struct to optimize enum size)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryOpData {
    /// The operator
    pub op: BinaryOperator,
    /// Left operand
    pub left: ExpressionNode,
    /// Right operand
    pub right: ExpressionNode,
}

/// Function call data (separate struct to optimize enum size)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionCallData {
    /// Function name
    pub name: String,
    /// Function arguments (SmallVec for the common case of 1-2 args)
    pub args: SmallVec<[ExpressionNode; 4]>,
}

/// Conditional expression data (separate struct to optimize enum size)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalData {
    /// Condition
    pub condition: ExpressionNode,
    /// Value when the condition holds
    pub then_expr: ExpressionNode,
    /// Value otherwise
    pub else_expr: ExpressionNode,
}

impl ExpressionNode {
    /// Create a numeric literal from its source text
    pub fn number(text: impl Into<String>) -> Self {
        Self::Number(text.into())
    }

    /// Create a numeric literal from a float
    ///
    /// Negative values become a negation of the magnitude so the tree
    /// stays in the shape the parser would produce for the same text.
    pub fn from_f64(value: f64) -> Self {
        let text = format!("{}", value.abs());
        if value.is_sign_negative() && value != 0.0 {
            Self::unary_op(UnaryOperator::Minus, Self::Number(text))
        } else {
            Self::Number(text)
        }
    }

    /// Create an identifier expression
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Create a binary operation expression
    pub fn binary_op(op: BinaryOperator, left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::BinaryOp(Box::new(BinaryOpData { op, left, right }))
    }

    /// Create a unary operation expression
    pub fn unary_op(op: UnaryOperator, operand: ExpressionNode) -> Self {
        Self::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create a function call expression
    pub fn function_call(
        name: impl Into<String>,
        args: impl Into<SmallVec<[ExpressionNode; 4]>>,
    ) -> Self {
        Self::FunctionCall(Box::new(FunctionCallData {
            name: name.into(),
            args: args.into(),
        }))
    }

    /// Create a conditional expression
    pub fn conditional(
        condition: ExpressionNode,
        then_expr: ExpressionNode,
        else_expr: ExpressionNode,
    ) -> Self {
        Self::Conditional(Box::new(ConditionalData {
            condition,
            then_expr,
            else_expr,
        }))
    }

    /// Binding strength of the outermost form, used for parenthesization
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Number(_) | Self::Identifier(_) | Self::FunctionCall(_) => Precedence::Primary,
            Self::BinaryOp(data) => data.op.precedence(),
            Self::UnaryOp { op, .. } => op.precedence(),
            Self::Conditional(_) => Precedence::Conditional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64_keeps_sign_as_negation() {
        assert_eq!(ExpressionNode::from_f64(0.0), ExpressionNode::number("0"));
        assert_eq!(ExpressionNode::from_f64(2.5), ExpressionNode::number("2.5"));
        assert_eq!(
            ExpressionNode::from_f64(-40.0),
            ExpressionNode::unary_op(UnaryOperator::Minus, ExpressionNode::number("40"))
        );
    }

    #[test]
    fn test_precedence_of_forms() {
        let sum = ExpressionNode::binary_op(
            BinaryOperator::Add,
            ExpressionNode::identifier("a"),
            ExpressionNode::number("1"),
        );
        assert_eq!(sum.precedence(), Precedence::Additive);
        assert_eq!(
            ExpressionNode::function_call("exp", vec![sum]).precedence(),
            Precedence::Primary
        );
    }
}
