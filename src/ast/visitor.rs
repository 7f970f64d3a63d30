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

//! Visitor pattern for AST traversal

use super::expression::ExpressionNode;
use super::operator::{BinaryOperator, UnaryOperator};
use smallvec::SmallVec;

/// Trait for visiting AST nodes
pub trait Visitor: Sized {
    /// The result type of visiting a node
    type Result;

    /// Visit an expression node
    fn visit_expression(&mut self, expr: &ExpressionNode) -> Self::Result {
        walk_expression(self, expr)
    }

    /// Visit a numeric literal
    fn visit_number(&mut self, _text: &str) -> Self::Result;

    /// Visit an identifier
    fn visit_identifier(&mut self, _name: &str) -> Self::Result;

    /// Visit a binary operation
    fn visit_binary_op(
        &mut self,
        _op: &BinaryOperator,
        _left: &ExpressionNode,
        _right: &ExpressionNode,
    ) -> Self::Result;

    /// Visit a unary operation
    fn visit_unary_op(&mut self, _op: &UnaryOperator, _operand: &ExpressionNode)
    -> Self::Result;

    /// Visit a function call
    fn visit_function_call(&mut self, _name: &str, _args: &[ExpressionNode]) -> Self::Result;

    /// Visit a conditional expression
    fn visit_conditional(
        &mut self,
        _condition: &ExpressionNode,
        _then_expr: &ExpressionNode,
        _else_expr: &ExpressionNode,
    ) -> Self::Result;
}

/// Default implementation of walking an expression tree
pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &ExpressionNode) -> V::Result {
    match expr {
        ExpressionNode::Number(text) => visitor.visit_number(text),
        ExpressionNode::Identifier(name) => visitor.visit_identifier(name),
        ExpressionNode::BinaryOp(data) => {
            visitor.visit_binary_op(&data.op, &data.left, &data.right)
        }
        ExpressionNode::UnaryOp { op, operand } => visitor.visit_unary_op(op, operand),
        ExpressionNode::FunctionCall(func_data) => {
            visitor.visit_function_call(&func_data.name, &func_data.args)
        }
        ExpressionNode::Conditional(cond_data) => visitor.visit_conditional(
            &cond_data.condition,
            &cond_data.then_expr,
            &cond_data.else_expr,
        ),
    }
}

/// Mutable visitor trait for modifying AST nodes
///
/// Implementors that need to replace a whole node (rather than edit it in
/// place) override [`MutVisitor::visit_expression_mut`] and fall back to
/// [`walk_expression_mut`] for nodes they leave alone.
pub trait MutVisitor: Sized {
    /// Visit and potentially modify an expression node
    fn visit_expression_mut(&mut self, expr: &mut ExpressionNode) {
        walk_expression_mut(self, expr)
    }

    /// Visit a numeric literal
    fn visit_number_mut(&mut self, _text: &mut String) {}

    /// Visit an identifier
    fn visit_identifier_mut(&mut self, _name: &mut String) {}

    /// Visit a binary operation
    fn visit_binary_op_mut(
        &mut self,
        _op: &mut BinaryOperator,
        left: &mut ExpressionNode,
        right: &mut ExpressionNode,
    ) {
        self.visit_expression_mut(left);
        self.visit_expression_mut(right);
    }

    /// Visit a unary operation
    fn visit_unary_op_mut(&mut self, _op: &mut UnaryOperator, operand: &mut ExpressionNode) {
        self.visit_expression_mut(operand);
    }

    /// Visit a function call
    fn visit_function_call_mut(
        &mut self,
        _name: &mut String,
        args: &mut SmallVec<[ExpressionNode; 4]>,
    ) {
        for arg in args {
            self.visit_expression_mut(arg);
        }
    }

    /// Visit a conditional expression
    fn visit_conditional_mut(
        &mut self,
        condition: &mut ExpressionNode,
        then_expr: &mut ExpressionNode,
        else_expr: &mut ExpressionNode,
    ) {
        self.visit_expression_mut(condition);
        self.visit_expression_mut(then_expr);
        self.visit_expression_mut(else_expr);
    }
}

/// Default implementation of walking and modifying an expression tree
pub fn walk_expression_mut<V: MutVisitor>(visitor: &mut V, expr: &mut ExpressionNode) {
    match expr {
        ExpressionNode::Number(text) => visitor.visit_number_mut(text),
        ExpressionNode::Identifier(name) => visitor.visit_identifier_mut(name),
        ExpressionNode::BinaryOp(data) => {
            let data = &mut **data;
            visitor.visit_binary_op_mut(&mut data.op, &mut data.left, &mut data.right)
        }
        ExpressionNode::UnaryOp { op, operand } => visitor.visit_unary_op_mut(op, operand),
        ExpressionNode::FunctionCall(func_data) => {
            let func_data = &mut **func_data;
            visitor.visit_function_call_mut(&mut func_data.name, &mut func_data.args)
        }
        ExpressionNode::Conditional(cond_data) => {
            let cond_data = &mut **cond_data;
            visitor.visit_conditional_mut(
                &mut cond_data.condition,
                &mut cond_data.then_expr,
                &mut cond_data.else_expr,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NodeCounter;

    impl Visitor for NodeCounter {
        type Result = usize;

        fn visit_number(&mut self, _text: &str) -> usize {
            1
        }

        fn visit_identifier(&mut self, _name: &str) -> usize {
            1
        }

        fn visit_binary_op(
            &mut self,
            _op: &BinaryOperator,
            left: &ExpressionNode,
            right: &ExpressionNode,
        ) -> usize {
            1 + self.visit_expression(left) + self.visit_expression(right)
        }

        fn visit_unary_op(&mut self, _op: &UnaryOperator, operand: &ExpressionNode) -> usize {
            1 + self.visit_expression(operand)
        }

        fn visit_function_call(&mut self, _name: &str, args: &[ExpressionNode]) -> usize {
            1 + args.iter().map(|a| self.visit_expression(a)).sum::<usize>()
        }

        fn visit_conditional(
            &mut self,
            condition: &ExpressionNode,
            then_expr: &ExpressionNode,
            else_expr: &ExpressionNode,
        ) -> usize {
            1 + self.visit_expression(condition)
                + self.visit_expression(then_expr)
                + self.visit_expression(else_expr)
        }
    }

    struct Renamer;

    impl MutVisitor for Renamer {
        fn visit_identifier_mut(&mut self, name: &mut String) {
            name.push_str("_0");
        }
    }

    fn sample() -> ExpressionNode {
        // rate * exp(x)
        ExpressionNode::binary_op(
            BinaryOperator::Multiply,
            ExpressionNode::identifier("rate"),
            ExpressionNode::function_call("exp", vec![ExpressionNode::identifier("x")]),
        )
    }

    #[test]
    fn test_visitor_reaches_every_node() {
        assert_eq!(NodeCounter.visit_expression(&sample()), 4);
    }

    #[test]
    fn test_mut_visitor_rewrites_in_place() {
        let mut expr = sample();
        Renamer.visit_expression_mut(&mut expr);
        let expected = ExpressionNode::binary_op(
            BinaryOperator::Multiply,
            ExpressionNode::identifier("rate_0"),
            ExpressionNode::function_call("exp", vec![ExpressionNode::identifier("x_0")]),
        );
        assert_eq!(expr, expected);
    }
}
