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

//! Dependency resolution and expansion of gate expressions
//!
//! The pipeline for one target symbol is: flatten piecewise definitions,
//! build the ordered dependency context, substitute dependencies in order,
//! then render. [`FunctionContext`] drives the whole sequence.

pub mod conditional;
pub mod dependency;
pub mod expander;
pub mod free_variables;
pub mod function;

pub use conditional::{ConditionalCaseFlattener, PiecewisePolicy};
pub use dependency::{DEFAULT_MAX_DEPTH, DependencyGraphBuilder, NULL_SYMBOL, OrderedContext};
pub use expander::{ExpandedContext, SymbolExpander};
pub use free_variables::free_variables;
pub use function::FunctionContext;
