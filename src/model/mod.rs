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

//! In-memory model of channels, component types and scopes
//!
//! The resolver only sees the [`Scope`] capability; everything else here
//! exists to build scopes from channel descriptions.

pub mod channel;
pub mod scope;
pub mod types;

pub use channel::{Behavior, BoundComponent, Component, Gate, GateKind, IonChannel};
pub use scope::{
    Case, ComponentScope, ComponentScopeBuilder, Definition, Scope, ScopeRef, Symbol, SymbolKind,
    resolve, resolve_symbol,
};
pub use types::{ComponentType, DomainTypes, ResolvedType};
