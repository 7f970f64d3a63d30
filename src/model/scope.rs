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

//! Scoped symbol lookup
//!
//! A [`Scope`] is the narrow capability the resolver depends on: a named
//! namespace that can look up a definition locally and hand out its
//! enclosing scope. [`resolve`] walks outward until a definition is found.

use crate::error::{ResolutionError, ResolutionResult};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// One guarded branch of a piecewise definition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Case {
    /// Guard; `None` marks an explicit catch-all
    pub condition: Option<String>,
    /// Value expression
    pub value: String,
}

impl Case {
    /// Guarded case
    pub fn when(condition: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            condition: Some(condition.into()),
            value: value.into(),
        }
    }

    /// Catch-all case
    pub fn otherwise(value: impl Into<String>) -> Self {
        Self {
            condition: None,
            value: value.into(),
        }
    }

    /// Whether this is an explicit catch-all
    pub fn is_default(&self) -> bool {
        self.condition.is_none()
    }
}

/// Whether a symbol is defined by one expression or by guarded cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SymbolKind {
    /// Single defining expression
    Plain,
    /// Ordered list of guarded cases
    Piecewise,
}

/// Defining form of a symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Definition {
    /// Expression text (parameters are expressions too, usually a numeral)
    Expression(String),
    /// Piecewise definition, cases in document order
    Piecewise(Vec<Case>),
}

impl Definition {
    /// Semantic kind of this definition
    pub fn kind(&self) -> SymbolKind {
        match self {
            Definition::Expression(_) => SymbolKind::Plain,
            Definition::Piecewise(_) => SymbolKind::Piecewise,
        }
    }
}

/// Shared handle to a scope
pub type ScopeRef = Arc<dyn Scope + Send + Sync>;

/// A hierarchical namespace of symbol definitions
pub trait Scope: fmt::Debug {
    /// Name used in diagnostics (`naChan`, `gate m`, ...)
    fn name(&self) -> &str;

    /// Definition declared directly in this scope
    fn definition(&self, name: &str) -> Option<&Definition>;

    /// Enclosing scope, if any
    fn parent(&self) -> Option<ScopeRef>;
}

/// A named quantity together with the scope that declares it
#[derive(Debug, Clone)]
pub struct Symbol {
    name: String,
    definition: Definition,
    scope: ScopeRef,
}

impl Symbol {
    /// Create a symbol declared in `scope`
    pub fn new(name: impl Into<String>, definition: Definition, scope: ScopeRef) -> Self {
        Self {
            name: name.into(),
            definition,
            scope,
        }
    }

    /// Symbol name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Defining form
    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Plain or piecewise
    pub fn kind(&self) -> SymbolKind {
        self.definition.kind()
    }

    /// Declaring scope
    pub fn scope(&self) -> &ScopeRef {
        &self.scope
    }
}

/// Look `name` up in `scope` and then in each enclosing scope
pub fn resolve(scope: &ScopeRef, name: &str) -> Option<Symbol> {
    let mut current = Arc::clone(scope);
    loop {
        if let Some(definition) = current.definition(name) {
            return Some(Symbol::new(name, definition.clone(), Arc::clone(&current)));
        }
        current = current.parent()?;
    }
}

/// Like [`resolve`], failing with [`ResolutionError::UnresolvedSymbol`]
pub fn resolve_symbol(scope: &ScopeRef, name: &str) -> ResolutionResult<Symbol> {
    resolve(scope, name).ok_or_else(|| ResolutionError::UnresolvedSymbol {
        name: name.to_string(),
        scope: scope.name().to_string(),
    })
}

/// Concrete scope holding parameters and derived variables
#[derive(Debug, Clone)]
pub struct ComponentScope {
    name: String,
    definitions: IndexMap<String, Definition>,
    parent: Option<ScopeRef>,
}

impl ComponentScope {
    /// Start building a scope
    pub fn builder(name: impl Into<String>) -> ComponentScopeBuilder {
        ComponentScopeBuilder {
            scope: ComponentScope {
                name: name.into(),
                definitions: IndexMap::new(),
                parent: None,
            },
        }
    }

    /// Names declared directly in this scope, in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }
}

impl Scope for ComponentScope {
    fn name(&self) -> &str {
        &self.name
    }

    fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    fn parent(&self) -> Option<ScopeRef> {
        self.parent.clone()
    }
}

/// Fluent builder for [`ComponentScope`]
#[derive(Debug)]
pub struct ComponentScopeBuilder {
    scope: ComponentScope,
}

impl ComponentScopeBuilder {
    /// Set the enclosing scope
    pub fn parent(mut self, parent: ScopeRef) -> Self {
        self.scope.parent = Some(parent);
        self
    }

    /// Bind a parameter value
    pub fn parameter(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.define(name, Definition::Expression(value.into()))
    }

    /// Declare a derived variable
    pub fn derived(self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.define(name, Definition::Expression(expression.into()))
    }

    /// Declare a piecewise derived variable
    pub fn piecewise(self, name: impl Into<String>, cases: Vec<Case>) -> Self {
        self.define(name, Definition::Piecewise(cases))
    }

    /// Declare any definition; a later declaration of the same name replaces the earlier one
    pub fn define(mut self, name: impl Into<String>, definition: Definition) -> Self {
        self.scope.definitions.insert(name.into(), definition);
        self
    }

    /// Finish as a plain value
    pub fn build(self) -> ComponentScope {
        self.scope
    }

    /// Finish as a shared handle
    pub fn build_ref(self) -> ScopeRef {
        Arc::new(self.scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> ScopeRef {
        let channel = ComponentScope::builder("naChan")
            .parameter("temperature", "6.3")
            .parameter("scale", "99")
            .build_ref();
        ComponentScope::builder("m_fwd")
            .parent(channel)
            .parameter("scale", "10")
            .derived("r", "scale * temperature")
            .build_ref()
    }

    #[test]
    fn test_resolve_walks_enclosing_scopes() {
        let scope = nested();

        let local = resolve(&scope, "scale").unwrap();
        assert_eq!(local.definition(), &Definition::Expression("10".to_string()));
        assert_eq!(local.scope().name(), "m_fwd");

        let outer = resolve(&scope, "temperature").unwrap();
        assert_eq!(outer.scope().name(), "naChan");
        assert_eq!(outer.kind(), SymbolKind::Plain);
    }

    #[test]
    fn test_unresolved_symbol() {
        let scope = nested();
        assert!(resolve(&scope, "midpoint").is_none());
        assert_eq!(
            resolve_symbol(&scope, "midpoint").unwrap_err(),
            ResolutionError::UnresolvedSymbol {
                name: "midpoint".to_string(),
                scope: "m_fwd".to_string(),
            }
        );
    }

    #[test]
    fn test_piecewise_kind() {
        let scope = ComponentScope::builder("c")
            .piecewise("r", vec![Case::when("x .gt. 0", "x"), Case::otherwise("0")])
            .build_ref();
        let symbol = resolve(&scope, "r").unwrap();
        assert_eq!(symbol.kind(), SymbolKind::Piecewise);
        assert!(!Case::when("a", "b").is_default());
        assert!(Case::otherwise("b").is_default());
    }
}
