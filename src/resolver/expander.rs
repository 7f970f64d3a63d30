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

//! Substituting expanded definitions into later ones

use super::dependency::OrderedContext;
use super::free_variables::{Substitution, free_variables};
use crate::ast::{ExpressionNode, MutVisitor};
use crate::error::{ResolutionError, ResolutionResult};
use crate::parser::parse;
use crate::render::{Notation, RenderedExpression};
use indexmap::IndexMap;

/// Context in which every entry is self-contained
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedContext {
    entries: IndexMap<String, ExpressionNode>,
}

impl ExpandedContext {
    /// Expanded tree of a name
    pub fn get(&self, name: &str) -> Option<&ExpressionNode> {
        self.entries.get(name)
    }

    /// Render an entry
    pub fn render(&self, name: &str, notation: Notation) -> Option<RenderedExpression> {
        self.get(name)
            .map(|expr| RenderedExpression::render(expr, notation))
    }

    /// Whether a name is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in dependency order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in dependency order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExpressionNode)> {
        self.entries.iter().map(|(name, expr)| (name.as_str(), expr))
    }
}

/// Expands an ordered context in one pass
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolExpander;

impl SymbolExpander {
    /// Substitute, in order, each entry's already expanded dependencies.
    ///
    /// Every name an entry references must appear earlier in the context or
    /// be the entry's own name (names bound to themselves, like the
    /// independent variable).
    pub fn expand(context: &OrderedContext) -> ResolutionResult<ExpandedContext> {
        let mut entries: IndexMap<String, ExpressionNode> = IndexMap::with_capacity(context.len());

        for (name, text) in context.iter() {
            let mut expr =
                parse(text).map_err(|err| ResolutionError::malformed(name, text, &err))?;

            let self_bound = matches!(&expr, ExpressionNode::Identifier(id) if id == name);
            let free = if self_bound {
                free_variables(&expr, [name])
            } else {
                free_variables(&expr, std::iter::empty::<&str>())
            };
            if let Some(missing) = free.into_iter().find(|var| !entries.contains_key(var)) {
                if missing == name {
                    return Err(ResolutionError::CyclicDependency {
                        path: vec![missing.clone(), missing],
                    });
                }
                return Err(ResolutionError::UnresolvedSymbol {
                    name: missing,
                    scope: name.to_string(),
                });
            }

            Substitution::new(&entries, name).visit_expression_mut(&mut expr);
            log::trace!("expanded '{}'", name);
            entries.insert(name.to_string(), expr);
        }

        Ok(ExpandedContext { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context(entries: &[(&str, &str)]) -> OrderedContext {
        let mut context = OrderedContext::new();
        for (name, expression) in entries {
            context.insert(*name, *expression);
        }
        context
    }

    #[test]
    fn test_exact_numeric_substitution() {
        let expanded = SymbolExpander::expand(&context(&[
            ("null", "null"),
            ("v", "v"),
            ("rate", "1000"),
            ("midpoint", "-40"),
            ("scale", "10"),
            ("r", "rate * exp((v - midpoint)/scale)"),
        ]))
        .unwrap();

        assert_eq!(
            expanded.render("r", Notation::MathJs).unwrap().as_str(),
            "1000 * exp((v - (-40)) / 10)"
        );
        assert_eq!(expanded.get("v"), Some(&ExpressionNode::identifier("v")));
    }

    #[test]
    fn test_reference_before_definition_is_unresolved() {
        let expanded = SymbolExpander::expand(&context(&[("a", "x + 1"), ("x", "x")]));
        assert!(matches!(
            expanded,
            Err(ResolutionError::UnresolvedSymbol { ref name, .. }) if name == "x"
        ));
    }

    #[test]
    fn test_only_self_bound_entries_may_name_themselves() {
        let expanded = SymbolExpander::expand(&context(&[("v", "v"), ("a", "a + v")]));
        assert_eq!(
            expanded.unwrap_err(),
            ResolutionError::CyclicDependency {
                path: vec!["a".to_string(), "a".to_string()],
            }
        );
    }

    #[test]
    fn test_precedence_survives_substitution() {
        let expanded = SymbolExpander::expand(&context(&[
            ("x", "x"),
            ("a", "x + 1"),
            ("b", "2 * a"),
            ("c", "b ^ a"),
        ]))
        .unwrap();
        assert_eq!(
            expanded.render("c", Notation::MathJs).unwrap().as_str(),
            "(2 * (x + 1)) ^ (x + 1)"
        );
    }

    #[test]
    fn test_no_partial_token_matches() {
        let expanded = SymbolExpander::expand(&context(&[
            ("rate", "5"),
            ("rates", "7"),
            ("r", "rate + rates"),
        ]))
        .unwrap();
        assert_eq!(
            expanded.render("r", Notation::Lems).unwrap().as_str(),
            "5 + 7"
        );
    }

    #[test]
    fn test_self_contained_after_expansion() {
        let ordered = context(&[
            ("v", "v"),
            ("c", "3"),
            ("b", "c * v"),
            ("a", "b + c"),
        ]);
        let expanded = SymbolExpander::expand(&ordered).unwrap();
        for (name, expr) in expanded.iter() {
            let free = free_variables(expr, [name]);
            // only names bound to themselves may remain
            assert!(
                free.iter().all(|var| ordered.get(var) == Some(var.as_str())),
                "{name} still references {free:?}"
            );
        }
    }
}
