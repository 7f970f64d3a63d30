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

//! Public façade tying a target symbol to its expanded context
//!
//! A [`FunctionContext`] is built per extraction request. Expansion runs on
//! the first query and is memoized until the context is changed.

use super::dependency::{DependencyGraphBuilder, NULL_SYMBOL, OrderedContext};
use super::expander::{ExpandedContext, SymbolExpander};
use super::free_variables::Substitution;
use crate::ast::{ExpressionNode, MutVisitor};
use crate::config::ExtractionConfig;
use crate::error::{ResolutionError, ResolutionResult};
use crate::model::Symbol;
use crate::render::{Notation, RenderedExpression};
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;

/// Target expression of one independent variable with its dependency context
#[derive(Debug, Clone)]
pub struct FunctionContext {
    target: String,
    independent_variable: String,
    context: OrderedContext,
    expanded: OnceCell<ExpandedContext>,
}

impl FunctionContext {
    /// Empty context for `target`, with the placeholder and the independent
    /// variable bound to themselves
    pub fn new(target: impl Into<String>, independent_variable: impl Into<String>) -> Self {
        let independent_variable = independent_variable.into();
        let mut context = OrderedContext::new();
        context.insert(NULL_SYMBOL, NULL_SYMBOL);
        context.insert(independent_variable.clone(), independent_variable.clone());

        Self {
            target: target.into(),
            independent_variable,
            context,
            expanded: OnceCell::new(),
        }
    }

    /// Build the context of `symbol` and its whole dependency closure
    pub fn for_symbol(symbol: &Symbol, config: &ExtractionConfig) -> ResolutionResult<Self> {
        let mut function = Self::new(symbol.name(), config.independent_variable.clone());
        function.process_symbol(symbol, &DependencyGraphBuilder::from_config(config))?;
        Ok(function)
    }

    /// Merge the dependency context of `symbol` into this one
    pub fn process_symbol(
        &mut self,
        symbol: &Symbol,
        builder: &DependencyGraphBuilder,
    ) -> ResolutionResult<()> {
        let built = builder
            .clone()
            .with_independent_variable(self.independent_variable.clone())
            .build(symbol)?;
        for (name, expression) in built.iter() {
            self.context.insert(name, expression);
        }
        self.expanded.take();
        Ok(())
    }

    /// Name of the target symbol
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Name of the independent variable
    pub fn independent_variable(&self) -> &str {
        &self.independent_variable
    }

    /// Raw ordered context
    pub fn context(&self) -> &OrderedContext {
        &self.context
    }

    /// Add or replace a definition; drops any memoized expansion
    pub fn register(&mut self, name: impl Into<String>, expression: impl Into<String>) {
        self.context.insert(name, expression);
        self.expanded.take();
    }

    /// Remove a definition; drops any memoized expansion
    pub fn deregister(&mut self, name: &str) -> Option<String> {
        let removed = self.context.remove(name);
        if removed.is_some() {
            self.expanded.take();
        }
        removed
    }

    /// Expanded context, computed on first use
    pub fn expanded(&self) -> ResolutionResult<&ExpandedContext> {
        self.expanded
            .get_or_try_init(|| SymbolExpander::expand(&self.context))
    }

    fn expanded_tree(&self, name: &str) -> ResolutionResult<&ExpressionNode> {
        self.expanded()?
            .get(name)
            .ok_or_else(|| ResolutionError::UnresolvedSymbol {
                name: name.to_string(),
                scope: format!("function context of '{}'", self.target),
            })
    }

    /// Expanded expression of `name` in the ternary notation
    pub fn expression(&self, name: &str) -> ResolutionResult<RenderedExpression> {
        self.render(name, Notation::MathJs)
    }

    /// Expanded expression of `name` in any notation
    pub fn render(&self, name: &str, notation: Notation) -> ResolutionResult<RenderedExpression> {
        self.expanded_tree(name)
            .map(|expr| RenderedExpression::render(expr, notation))
    }

    /// Expanded target expression in `notation`
    pub fn to_notation(&self, notation: Notation) -> ResolutionResult<RenderedExpression> {
        self.render(&self.target, notation)
    }

    /// Expanded target expression typeset in LaTeX
    pub fn to_tex(&self) -> ResolutionResult<RenderedExpression> {
        self.to_notation(Notation::Latex)
    }

    /// `f(v) = <expression>` for `name` in the ternary notation
    pub fn function_definition(&self, name: &str) -> ResolutionResult<String> {
        Ok(format!(
            "f({}) = {}",
            self.independent_variable,
            self.expression(name)?
        ))
    }

    /// Target expression with the independent variable replaced by `value`.
    /// The result is ready to evaluate; nothing is evaluated here.
    /// NaN and infinities have no literal form and are rejected.
    pub fn render_at(&self, value: f64, notation: Notation) -> ResolutionResult<RenderedExpression> {
        if !value.is_finite() {
            return Err(ResolutionError::NonFiniteValue {
                variable: self.independent_variable.clone(),
                value,
            });
        }
        let mut expr = self.expanded_tree(&self.target)?.clone();
        let mut replacements = IndexMap::new();
        replacements.insert(
            self.independent_variable.clone(),
            ExpressionNode::from_f64(value),
        );
        Substitution::new(&replacements, "").visit_expression_mut(&mut expr);
        Ok(RenderedExpression::render(&expr, notation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Case, ComponentScope, resolve};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn exp_rate() -> FunctionContext {
        let scope = ComponentScope::builder("m_fwd")
            .parameter("rate", "1000")
            .parameter("midpoint", "-40")
            .parameter("scale", "10")
            .derived("r", "rate * exp((v - midpoint)/scale)")
            .build_ref();
        let symbol = resolve(&scope, "r").unwrap();
        FunctionContext::for_symbol(&symbol, &ExtractionConfig::default()).unwrap()
    }

    #[test]
    fn test_expression_and_definition() {
        let function = exp_rate();
        assert_eq!(
            function.expression("r").unwrap().as_str(),
            "1000 * exp((v - (-40)) / 10)"
        );
        assert_eq!(
            function.function_definition("r").unwrap(),
            "f(v) = 1000 * exp((v - (-40)) / 10)"
        );
        assert_eq!(function.expression("rate").unwrap().as_str(), "1000");
    }

    #[test]
    fn test_expansion_is_memoized() {
        let function = exp_rate();
        let first: *const ExpandedContext = function.expanded().unwrap();
        let second: *const ExpandedContext = function.expanded().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_register_invalidates_expansion() {
        let mut function = exp_rate();
        assert_eq!(function.expression("r").unwrap().as_str(), "1000 * exp((v - (-40)) / 10)");

        function.register("rate", "5");
        assert_eq!(function.expression("r").unwrap().as_str(), "5 * exp((v - (-40)) / 10)");

        assert_eq!(function.deregister("scale"), Some("10".to_string()));
        assert!(matches!(
            function.expression("r"),
            Err(ResolutionError::UnresolvedSymbol { ref name, .. }) if name == "scale"
        ));
    }

    #[test]
    fn test_render_at_value() {
        let function = exp_rate();
        assert_eq!(
            function.render_at(0.0, Notation::JavaScript).unwrap().as_str(),
            "1000 * Math.exp((0 - (-40)) / 10)"
        );
        assert_eq!(
            function.render_at(-65.0, Notation::MathJs).unwrap().as_str(),
            "1000 * exp((-65 - (-40)) / 10)"
        );
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_render_at_rejects_non_finite(#[case] value: f64) {
        let err = exp_rate().render_at(value, Notation::JavaScript).unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::NonFiniteValue { ref variable, .. } if variable == "v"
        ));
    }

    #[test]
    fn test_to_tex() {
        let function = exp_rate();
        assert_eq!(
            function.to_tex().unwrap().as_str(),
            "1000 \\cdot \\exp\\left(\\frac{v - \\left(-40\\right)}{10}\\right)"
        );
    }

    #[test]
    fn test_piecewise_target_is_flattened_before_expansion() {
        let scope = ComponentScope::builder("c")
            .parameter("threshold", "-50")
            .piecewise(
                "g",
                vec![
                    Case::when("v .lt. threshold", "0"),
                    Case::when("v .geq. threshold", "1"),
                ],
            )
            .build_ref();
        let symbol = resolve(&scope, "g").unwrap();
        let function = FunctionContext::for_symbol(&symbol, &ExtractionConfig::default()).unwrap();
        assert_eq!(
            function.to_notation(Notation::MathJs).unwrap().as_str(),
            "v < (-50) ? 0 : 1"
        );
    }

    #[test]
    fn test_manual_context() {
        let mut function = FunctionContext::new("y", "x");
        function.register("k", "2");
        function.register("y", "k * x ^ 2");
        assert_eq!(
            function.function_definition("y").unwrap(),
            "f(x) = 2 * x ^ 2"
        );
        assert!(function.context().is_topologically_valid());
    }
}
