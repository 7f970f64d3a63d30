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

//! Free variable collection and substitution over expression trees

use crate::ast::{
    BinaryOperator, ExpressionNode, MutVisitor, UnaryOperator, Visitor, walk_expression_mut,
};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;

/// Collects identifiers in first-appearance order, skipping known names.
/// Function names are not variables.
struct FreeVariableCollector<'k> {
    known: &'k FxHashSet<&'k str>,
    found: IndexSet<String>,
}

impl Visitor for FreeVariableCollector<'_> {
    type Result = ();

    fn visit_number(&mut self, _text: &str) {}

    fn visit_identifier(&mut self, name: &str) {
        if !self.known.contains(name) && !self.found.contains(name) {
            self.found.insert(name.to_string());
        }
    }

    fn visit_binary_op(
        &mut self,
        _op: &BinaryOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) {
        self.visit_expression(left);
        self.visit_expression(right);
    }

    fn visit_unary_op(&mut self, _op: &UnaryOperator, operand: &ExpressionNode) {
        self.visit_expression(operand);
    }

    fn visit_function_call(&mut self, _name: &str, args: &[ExpressionNode]) {
        for arg in args {
            self.visit_expression(arg);
        }
    }

    fn visit_conditional(
        &mut self,
        condition: &ExpressionNode,
        then_expr: &ExpressionNode,
        else_expr: &ExpressionNode,
    ) {
        self.visit_expression(condition);
        self.visit_expression(then_expr);
        self.visit_expression(else_expr);
    }
}

/// Names referenced by `expr` that are not in `known`, in first-appearance order
pub fn free_variables<'a, I>(expr: &ExpressionNode, known: I) -> IndexSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let known: FxHashSet<&str> = known.into_iter().collect();
    let mut collector = FreeVariableCollector {
        known: &known,
        found: IndexSet::new(),
    };
    collector.visit_expression(expr);
    collector.found
}

/// Replaces identifier leaves with trees from a substitution table
pub(crate) struct Substitution<'m> {
    replacements: &'m IndexMap<String, ExpressionNode>,
    skip: &'m str,
}

impl<'m> Substitution<'m> {
    /// Substitute every name in `replacements` except `skip`
    pub(crate) fn new(replacements: &'m IndexMap<String, ExpressionNode>, skip: &'m str) -> Self {
        Self { replacements, skip }
    }
}

impl MutVisitor for Substitution<'_> {
    fn visit_expression_mut(&mut self, expr: &mut ExpressionNode) {
        if let ExpressionNode::Identifier(name) = expr {
            if name.as_str() != self.skip {
                if let Some(replacement) = self.replacements.get(name.as_str()) {
                    *expr = replacement.clone();
                }
            }
            return;
        }
        walk_expression_mut(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_first_appearance_order_without_functions() {
        let expr = parse("rate * exp((v - midpoint)/scale) + rate").unwrap();
        let vars = free_variables(&expr, std::iter::empty());
        assert_eq!(
            vars.into_iter().collect::<Vec<_>>(),
            vec!["rate", "v", "midpoint", "scale"]
        );
    }

    #[test]
    fn test_known_names_are_not_free() {
        let expr = parse("x .gt. 0 ? v : null").unwrap();
        let vars = free_variables(&expr, ["v", "null"]);
        assert_eq!(vars.into_iter().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn test_substitution_replaces_whole_identifiers_only() {
        let mut expr = parse("rate * rates + rate_2").unwrap();
        let mut table = IndexMap::new();
        table.insert("rate".to_string(), ExpressionNode::number("5"));
        Substitution::new(&table, "").visit_expression_mut(&mut expr);
        assert_eq!(expr, parse("5 * rates + rate_2").unwrap());
    }
}
