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

//! Component types and the domain type registry
//!
//! A [`ComponentType`] declares the parameters a component must bind, the
//! quantities it requires from its environment, its derived variables and
//! the one variable it exposes. Types may extend one another; resolution
//! merges the chain parent-first.

use super::scope::{Case, Definition};
use crate::error::{ModelError, ModelResult};
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// Declaration of a component type
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentType {
    /// Type name
    pub name: String,
    /// Parent type, if this type extends another
    pub extends: Option<String>,
    /// Parameters components of this type must set
    pub parameters: Vec<String>,
    /// Quantities taken from the environment (the membrane potential)
    pub requirements: Vec<String>,
    /// Derived variables in declaration order
    pub derived: IndexMap<String, Definition>,
    /// Variable read by the enclosing gate
    pub exposure: Option<String>,
}

impl ComponentType {
    /// Create an empty type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            parameters: Vec::new(),
            requirements: Vec::new(),
            derived: IndexMap::new(),
            exposure: None,
        }
    }

    /// Extend another type
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Declare a parameter
    pub fn parameter(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(name.into());
        self
    }

    /// Declare a requirement
    pub fn requirement(mut self, name: impl Into<String>) -> Self {
        self.requirements.push(name.into());
        self
    }

    /// Declare a derived variable
    pub fn derived(mut self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.derived
            .insert(name.into(), Definition::Expression(expression.into()));
        self
    }

    /// Declare a piecewise derived variable
    pub fn piecewise(mut self, name: impl Into<String>, cases: Vec<Case>) -> Self {
        self.derived.insert(name.into(), Definition::Piecewise(cases));
        self
    }

    /// Set the exposed variable
    pub fn exposure(mut self, name: impl Into<String>) -> Self {
        self.exposure = Some(name.into());
        self
    }
}

/// A component type with its `extends` chain merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Name of the most derived type
    pub name: String,
    /// All parameters, ancestors first
    pub parameters: IndexSet<String>,
    /// All requirements, ancestors first
    pub requirements: IndexSet<String>,
    /// All derived variables; a redefinition in a subtype replaces the inherited one
    pub derived: IndexMap<String, Definition>,
    /// Exposure of the nearest type that declares one
    pub exposure: Option<String>,
}

/// Registry of component types
#[derive(Debug, Clone, Default)]
pub struct DomainTypes {
    types: IndexMap<String, ComponentType>,
}

static CORE_TYPES: Lazy<DomainTypes> = Lazy::new(DomainTypes::standard);

impl DomainTypes {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide read-only registry of the standard types, built on first use
    pub fn core() -> &'static DomainTypes {
        &CORE_TYPES
    }

    /// Build a fresh registry holding the standard Hodgkin-Huxley rate,
    /// variable and time-course types
    pub fn standard() -> Self {
        let mut types = Self::new();

        types.register(
            ComponentType::new("baseVoltageDepRate")
                .requirement("v")
                .exposure("r"),
        );
        types.register(
            ComponentType::new("baseVoltageDepVariable")
                .requirement("v")
                .exposure("x"),
        );
        types.register(
            ComponentType::new("baseVoltageDepTime")
                .requirement("v")
                .exposure("t"),
        );

        types.register(
            ComponentType::new("HHExpRate")
                .extends("baseVoltageDepRate")
                .parameter("rate")
                .parameter("midpoint")
                .parameter("scale")
                .derived("r", "rate * exp((v - midpoint)/scale)"),
        );
        types.register(
            ComponentType::new("HHSigmoidRate")
                .extends("baseVoltageDepRate")
                .parameter("rate")
                .parameter("midpoint")
                .parameter("scale")
                .derived("r", "rate / (1 + exp(0 - (v - midpoint)/scale))"),
        );
        types.register(
            ComponentType::new("HHExpLinearRate")
                .extends("baseVoltageDepRate")
                .parameter("rate")
                .parameter("midpoint")
                .parameter("scale")
                .derived("x", "(v - midpoint) / scale")
                .piecewise(
                    "r",
                    vec![
                        Case::when("x .neq. 0", "rate * x / (1 - exp(0 - x))"),
                        Case::when("x .eq. 0", "rate"),
                    ],
                ),
        );

        types.register(
            ComponentType::new("HHExpVariable")
                .extends("baseVoltageDepVariable")
                .parameter("rate")
                .parameter("midpoint")
                .parameter("scale")
                .derived("x", "rate * exp((v - midpoint)/scale)"),
        );
        types.register(
            ComponentType::new("HHSigmoidVariable")
                .extends("baseVoltageDepVariable")
                .parameter("rate")
                .parameter("midpoint")
                .parameter("scale")
                .derived("x", "rate / (1 + exp(0 - (v - midpoint)/scale))"),
        );
        types.register(
            ComponentType::new("HHExpLinearVariable")
                .extends("baseVoltageDepVariable")
                .parameter("rate")
                .parameter("midpoint")
                .parameter("scale")
                .derived("u", "(v - midpoint) / scale")
                .derived("x", "rate * u / (1 - exp(0 - u))"),
        );

        types.register(
            ComponentType::new("fixedTimeCourse")
                .extends("baseVoltageDepTime")
                .parameter("tau")
                .derived("t", "tau"),
        );

        types
    }

    /// Add a type, returning the one it replaces
    pub fn register(&mut self, component_type: ComponentType) -> Option<ComponentType> {
        self.types
            .insert(component_type.name.clone(), component_type)
    }

    /// Look up a type by name
    pub fn get(&self, name: &str) -> Option<&ComponentType> {
        self.types.get(name)
    }

    /// Whether a type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Merge a type with its ancestors
    pub fn resolve(&self, name: &str) -> ModelResult<ResolvedType> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut referrer = name;
        let mut next = Some(name);

        while let Some(type_name) = next {
            if !seen.insert(type_name) {
                return Err(ModelError::CyclicTypeHierarchy {
                    type_name: type_name.to_string(),
                });
            }
            let component_type =
                self.get(type_name)
                    .ok_or_else(|| ModelError::UnknownComponentType {
                        component: referrer.to_string(),
                        type_name: type_name.to_string(),
                    })?;
            chain.push(component_type);
            referrer = type_name;
            next = component_type.extends.as_deref();
        }

        let mut resolved = ResolvedType {
            name: name.to_string(),
            parameters: IndexSet::new(),
            requirements: IndexSet::new(),
            derived: IndexMap::new(),
            exposure: None,
        };
        for component_type in chain.iter().rev() {
            resolved
                .parameters
                .extend(component_type.parameters.iter().cloned());
            resolved
                .requirements
                .extend(component_type.requirements.iter().cloned());
            for (variable, definition) in &component_type.derived {
                resolved.derived.insert(variable.clone(), definition.clone());
            }
            if component_type.exposure.is_some() {
                resolved.exposure.clone_from(&component_type.exposure);
            }
        }

        log::trace!(
            "resolved component type '{}' through {} level(s)",
            name,
            chain.len()
        );
        Ok(resolved)
    }
}
