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

//! Configuration for gate extraction

use crate::render::Notation;
use crate::resolver::{DEFAULT_MAX_DEPTH, PiecewisePolicy};

/// Configuration for resolving and rendering gate expressions
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractionConfig {
    /// Name of the independent variable (membrane potential)
    pub independent_variable: String,
    /// Notation of report expressions
    pub notation: Notation,
    /// Handling of piecewise definitions without a catch-all
    pub piecewise_policy: PiecewisePolicy,
    /// Longest dependency chain followed before giving up
    pub max_depth: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            independent_variable: "v".to_string(),
            notation: Notation::MathJs,
            piecewise_policy: PiecewisePolicy::PromoteLast,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ExtractionConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the independent variable
    pub fn with_independent_variable(mut self, name: impl Into<String>) -> Self {
        self.independent_variable = name.into();
        self
    }

    /// Set the report notation
    pub fn with_notation(mut self, notation: Notation) -> Self {
        self.notation = notation;
        self
    }

    /// Set the piecewise policy
    pub fn with_piecewise_policy(mut self, policy: PiecewisePolicy) -> Self {
        self.piecewise_policy = policy;
        self
    }

    /// Set the depth limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reject piecewise definitions without an explicit catch-all
    pub fn strict() -> Self {
        Self {
            piecewise_policy: PiecewisePolicy::Strict,
            ..Self::default()
        }
    }

    /// Typeset output for documentation
    pub fn typeset() -> Self {
        Self {
            notation: Notation::Latex,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_presets() {
        let config = ExtractionConfig::default();
        assert_eq!(config.independent_variable, "v");
        assert_eq!(config.notation, Notation::MathJs);
        assert_eq!(config.piecewise_policy, PiecewisePolicy::PromoteLast);

        assert_eq!(
            ExtractionConfig::strict().piecewise_policy,
            PiecewisePolicy::Strict
        );
        assert_eq!(ExtractionConfig::typeset().notation, Notation::Latex);

        let custom = ExtractionConfig::new()
            .with_independent_variable("V")
            .with_notation(Notation::JavaScript)
            .with_max_depth(8);
        assert_eq!(custom.independent_variable, "V");
        assert_eq!(custom.notation, Notation::JavaScript);
        assert_eq!(custom.max_depth, 8);
    }
}
