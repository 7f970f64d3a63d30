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

//! Error types for dependency resolution and model binding

use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use crate::parser::ParseError;
use thiserror::Error;

/// Result type for resolution operations
pub type ResolutionResult<T> = std::result::Result<T, ResolutionError>;

/// Result type for model operations
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Result type for gate extraction, which can fail in either layer
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, expanding or flattening a dependency context
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    /// A free name has no definition in the current or any enclosing scope
    #[error("Unresolved symbol '{name}' in scope '{scope}'")]
    UnresolvedSymbol {
        /// The name that could not be resolved
        name: String,
        /// Scope the lookup started from
        scope: String,
    },

    /// A definition reaches itself through its own dependencies
    #[error("Cyclic dependency: {}", path.join(" -> "))]
    CyclicDependency {
        /// The active expansion path, ending with the repeated name
        path: Vec<String>,
    },

    /// Expression text or piecewise definition that cannot be used
    #[error("Malformed expression for '{symbol}': {reason}")]
    MalformedExpression {
        /// Symbol whose definition is malformed
        symbol: String,
        /// Offending text (empty for structural problems)
        expression: String,
        /// What is wrong with it
        reason: String,
        /// Byte offset of the problem inside `expression`
        offset: Option<usize>,
    },

    /// Dependency chain deeper than the configured limit
    #[error("Dependency chain of '{symbol}' exceeds the depth limit of {limit}")]
    DepthLimitExceeded {
        /// Symbol at which the limit was hit
        symbol: String,
        /// The configured limit
        limit: usize,
    },

    /// A name already bound from one scope is needed from another scope
    #[error(
        "'{name}' is bound from scope '{bound_scope}' but '{symbol}' needs the one declared in scope '{scope}'"
    )]
    ConflictingDefinition {
        /// The shadowed name
        name: String,
        /// Symbol whose definition references it
        symbol: String,
        /// Scope the context already took the name from
        bound_scope: String,
        /// Scope `symbol` resolves the name in
        scope: String,
    },

    /// Numeric value with no literal form
    #[error("Cannot substitute {value} for '{variable}': value is not finite")]
    NonFiniteValue {
        /// Variable being replaced
        variable: String,
        /// The rejected value
        value: f64,
    },
}

impl ResolutionError {
    /// Wrap a parse failure of a symbol's expression text
    pub fn malformed(symbol: &str, expression: &str, error: &ParseError) -> Self {
        ResolutionError::MalformedExpression {
            symbol: symbol.to_string(),
            expression: expression.to_string(),
            reason: error.to_string(),
            offset: error.position(),
        }
    }

    /// Structural problem with a piecewise definition
    pub fn malformed_piecewise(symbol: &str, reason: impl Into<String>) -> Self {
        ResolutionError::MalformedExpression {
            symbol: symbol.to_string(),
            expression: String::new(),
            reason: reason.into(),
            offset: None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolutionError::UnresolvedSymbol { name, .. } => {
                DiagnosticBuilder::error(DiagnosticCode::UnresolvedSymbol)
                    .with_message(self.to_string())
                    .with_help(format!("declare '{name}' as a parameter or derived variable"))
                    .build()
            }
            ResolutionError::CyclicDependency { .. } => {
                DiagnosticBuilder::error(DiagnosticCode::CyclicDependency)
                    .with_message(self.to_string())
                    .build()
            }
            ResolutionError::MalformedExpression { offset, .. } => {
                let builder = DiagnosticBuilder::error(DiagnosticCode::MalformedExpression)
                    .with_message(self.to_string());
                match offset {
                    Some(offset) => builder.with_offset(*offset).build(),
                    None => builder.build(),
                }
            }
            ResolutionError::DepthLimitExceeded { .. } => {
                DiagnosticBuilder::error(DiagnosticCode::DepthLimitExceeded)
                    .with_message(self.to_string())
                    .build()
            }
            ResolutionError::ConflictingDefinition { name, .. } => {
                DiagnosticBuilder::error(DiagnosticCode::ConflictingDefinition)
                    .with_message(self.to_string())
                    .with_help(format!("rename one of the '{name}' definitions"))
                    .build()
            }
            ResolutionError::NonFiniteValue { .. } => {
                DiagnosticBuilder::error(DiagnosticCode::InvalidValue)
                    .with_message(self.to_string())
                    .build()
            }
        }
    }
}

/// Errors raised while binding a channel description to component types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Component refers to a type the registry does not know
    #[error("Component '{component}' has unknown type '{type_name}'")]
    UnknownComponentType {
        /// Component id
        component: String,
        /// Requested type name
        type_name: String,
    },

    /// Type parameter with no bound value
    #[error("Component '{component}' does not set parameter '{parameter}'")]
    MissingParameter {
        /// Component id
        component: String,
        /// Parameter name
        parameter: String,
    },

    /// Gate type attribute that names no known gate kind
    #[error("Unknown gate kind '{kind}'")]
    UnknownGateKind {
        /// Kind as written
        kind: String,
    },

    /// Component type whose chain declares no exposed variable
    #[error("Component type '{type_name}' exposes no variable")]
    MissingExposure {
        /// Type name
        type_name: String,
    },

    /// `extends` chain that loops back on itself
    #[error("Component type '{type_name}' extends itself")]
    CyclicTypeHierarchy {
        /// Type where the loop was detected
        type_name: String,
    },
}

impl ModelError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            ModelError::UnknownComponentType { .. }
            | ModelError::CyclicTypeHierarchy { .. }
            | ModelError::MissingExposure { .. } => DiagnosticCode::UnknownComponentType,
            ModelError::MissingParameter { .. } => DiagnosticCode::MissingParameter,
            ModelError::UnknownGateKind { .. } => {
                DiagnosticCode::Custom("unknown_gate_kind".to_string())
            }
        };
        DiagnosticBuilder::error(code)
            .with_message(self.to_string())
            .build()
    }
}

/// Any failure while extracting one gate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Expression text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Dependency resolution failed
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The channel description does not bind to the component types
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl Error {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Parse(err) => err.to_diagnostic(),
            Error::Resolution(err) => err.to_diagnostic(),
            Error::Model(err) => err.to_diagnostic(),
        }
    }
}
