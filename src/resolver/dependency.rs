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

//! Dependency closure and topological ordering
//!
//! [`DependencyGraphBuilder::build`] walks the names a symbol's definition
//! references, resolving each in the scope that declares the symbol being
//! expanded, and records definitions dependencies-first. Independent
//! symbols keep the order in which they were first discovered.

use super::conditional::{ConditionalCaseFlattener, PiecewisePolicy};
use super::free_variables::free_variables;
use crate::config::ExtractionConfig;
use crate::error::{ResolutionError, ResolutionResult};
use crate::model::{Definition, ScopeRef, Symbol, resolve};
use crate::parser::parse;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Placeholder name of the expression grammar, always bound to itself
pub const NULL_SYMBOL: &str = "null";

/// Default bound on the length of a dependency chain
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Ordered mapping of names to definition text, dependencies first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedContext {
    entries: IndexMap<String, String>,
}

impl OrderedContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Append or replace an entry; a replaced entry keeps its position
    pub fn insert(&mut self, name: impl Into<String>, expression: impl Into<String>) {
        self.entries.insert(name.into(), expression.into());
    }

    /// Remove an entry, keeping the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.shift_remove(name)
    }

    /// Definition text of a name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Whether a name is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Position of a name in the order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, expression)| (name.as_str(), expression.as_str()))
    }

    /// Whether every entry only references names placed before it.
    /// Only names bound to themselves (`v` = `v`) may reference themselves.
    pub fn is_topologically_valid(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(index, (name, expression))| {
                let Ok(expr) = parse(expression) else {
                    return false;
                };
                let exempt = (name == expression).then_some(name.as_str());
                free_variables(&expr, exempt)
                    .iter()
                    .filter_map(|var| self.position(var))
                    .all(|position| position < index)
            })
    }
}

impl<'a> IntoIterator for &'a OrderedContext {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds the ordered dependency context of a symbol
#[derive(Debug, Clone)]
pub struct DependencyGraphBuilder {
    pre_bound: IndexSet<String>,
    flattener: ConditionalCaseFlattener,
    max_depth: usize,
}

impl Default for DependencyGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraphBuilder {
    /// Builder with only the grammar placeholder pre-bound
    pub fn new() -> Self {
        let mut pre_bound = IndexSet::new();
        pre_bound.insert(NULL_SYMBOL.to_string());
        Self {
            pre_bound,
            flattener: ConditionalCaseFlattener::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Builder configured from an extraction config
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_independent_variable(config.independent_variable.clone())
            .with_policy(config.piecewise_policy)
            .with_max_depth(config.max_depth)
    }

    /// Bind the independent variable to itself so it is never resolved
    pub fn with_independent_variable(self, name: impl Into<String>) -> Self {
        self.with_pre_bound(name)
    }

    /// Bind any name to itself
    pub fn with_pre_bound(mut self, name: impl Into<String>) -> Self {
        self.pre_bound.insert(name.into());
        self
    }

    /// Piecewise policy applied to every piecewise symbol in the closure
    pub fn with_policy(mut self, policy: PiecewisePolicy) -> Self {
        self.flattener = ConditionalCaseFlattener::new(policy);
        self
    }

    /// Limit on the length of any dependency chain
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Definition text of a symbol, piecewise definitions flattened
    pub fn definition_text(&self, symbol: &Symbol) -> ResolutionResult<String> {
        match symbol.definition() {
            Definition::Expression(text) => Ok(text.clone()),
            Definition::Piecewise(cases) => self.flattener.flatten_text(symbol.name(), cases),
        }
    }

    /// Ordered context holding `symbol` and its whole dependency closure
    pub fn build(&self, symbol: &Symbol) -> ResolutionResult<OrderedContext> {
        let mut context = OrderedContext::new();
        for name in &self.pre_bound {
            context.insert(name.clone(), name.clone());
        }

        let mut walk = Walk {
            builder: self,
            context,
            active: IndexSet::new(),
            declared_in: FxHashMap::default(),
        };
        walk.visit(symbol, 0)?;

        log::debug!(
            "built context for '{}' with {} entries",
            symbol.name(),
            walk.context.len()
        );
        Ok(walk.context)
    }
}

/// Depth-first traversal state of one build
struct Walk<'b> {
    builder: &'b DependencyGraphBuilder,
    context: OrderedContext,
    active: IndexSet<String>,
    /// Scope each visited name was taken from
    declared_in: FxHashMap<String, ScopeRef>,
}

fn same_scope(a: &ScopeRef, b: &ScopeRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl Walk<'_> {
    fn cycle(&self, name: &str) -> ResolutionError {
        let start = self.active.get_index_of(name).unwrap_or(0);
        let mut path: Vec<String> = self.active.iter().skip(start).cloned().collect();
        path.push(name.to_string());
        ResolutionError::CyclicDependency { path }
    }

    fn visit(&mut self, symbol: &Symbol, depth: usize) -> ResolutionResult<()> {
        let name = symbol.name();
        if self.context.contains(name) {
            return Ok(());
        }
        if self.active.contains(name) {
            return Err(self.cycle(name));
        }
        if depth > self.builder.max_depth {
            return Err(ResolutionError::DepthLimitExceeded {
                symbol: name.to_string(),
                limit: self.builder.max_depth,
            });
        }

        let text = self.builder.definition_text(symbol)?;
        let expr = parse(&text).map_err(|err| ResolutionError::malformed(name, &text, &err))?;

        self.active.insert(name.to_string());
        self.declared_in
            .insert(name.to_string(), Arc::clone(symbol.scope()));
        for var in free_variables(&expr, std::iter::empty::<&str>()) {
            if self.builder.pre_bound.contains(&var) {
                continue;
            }
            let dependency =
                resolve(symbol.scope(), &var).ok_or_else(|| ResolutionError::UnresolvedSymbol {
                    name: var.clone(),
                    scope: symbol.scope().name().to_string(),
                })?;

            // names are context keys, so one name may only come from one scope
            if let Some(bound) = self.declared_in.get(&var) {
                if !same_scope(bound, dependency.scope()) {
                    return Err(ResolutionError::ConflictingDefinition {
                        name: var.clone(),
                        symbol: name.to_string(),
                        bound_scope: bound.name().to_string(),
                        scope: dependency.scope().name().to_string(),
                    });
                }
                if self.active.contains(&var) {
                    return Err(self.cycle(&var));
                }
                continue;
            }

            log::trace!(
                "'{}' depends on '{}' from scope '{}'",
                name,
                var,
                dependency.scope().name()
            );
            self.visit(&dependency, depth + 1)?;
        }
        self.active.pop();

        self.context.insert(name, text);
        Ok(())
    }
}
