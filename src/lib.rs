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

//! Dependency resolution and notation rendering for ion-channel gate expressions
//!
//! Given a named quantity inside a scoped component hierarchy (an ion
//! channel's gate rates, time courses and steady states), this crate finds
//! every quantity it transitively depends on, orders them dependencies
//! first, flattens piecewise definitions, substitutes everything into one
//! self-contained expression and renders it in a chosen notation.
//!
//! ```
//! use neuroml_gates::{ComponentScope, ExtractionConfig, FunctionContext, Notation, resolve};
//!
//! let scope = ComponentScope::builder("m_fwd")
//!     .parameter("rate", "1000")
//!     .parameter("midpoint", "-40")
//!     .parameter("scale", "10")
//!     .derived("r", "rate * exp((v - midpoint)/scale)")
//!     .build_ref();
//! let symbol = resolve(&scope, "r").expect("r is declared");
//! let function = FunctionContext::for_symbol(&symbol, &ExtractionConfig::default())?;
//!
//! assert_eq!(function.expression("r")?.as_str(), "1000 * exp((v - (-40)) / 10)");
//! assert_eq!(
//!     function.render_at(0.0, Notation::JavaScript)?.as_str(),
//!     "1000 * Math.exp((0 - (-40)) / 10)"
//! );
//! # Ok::<(), neuroml_gates::ResolutionError>(())
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod grammar;
pub mod model;
pub mod parser;
pub mod render;
pub mod report;
pub mod resolver;

// Re-export main types
pub use ast::ExpressionNode;
pub use config::ExtractionConfig;
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use error::{Error, ModelError, ResolutionError, ResolutionResult, Result};
pub use model::{
    Behavior, Case, Component, ComponentScope, ComponentType, Definition, DomainTypes, Gate,
    GateKind, IonChannel, Scope, ScopeRef, Symbol, SymbolKind, resolve,
};
pub use parser::{ParseError, parse};
pub use render::{Notation, RenderedExpression};
pub use report::{ChannelReport, GateExtractor, GateReport};
pub use resolver::{
    ConditionalCaseFlattener, DependencyGraphBuilder, ExpandedContext, FunctionContext,
    OrderedContext, PiecewisePolicy, SymbolExpander,
};
