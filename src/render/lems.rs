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

//! Native modeling-language notation
//!
//! Output uses the dotted comparison and logic keywords and parses back
//! with [`crate::parser::parse`]. Contexts store their entries in this form.

use super::infix::InfixDialect;
use crate::ast::{BinaryOperator, UnaryOperator};

/// Dotted-keyword notation of the modeling language
#[derive(Debug, Clone, Copy, Default)]
pub struct LemsDialect;

impl InfixDialect for LemsDialect {
    fn binary_operator(&self, op: BinaryOperator) -> &'static str {
        op.as_lems()
    }

    fn unary_operator(&self, op: UnaryOperator) -> &'static str {
        op.as_lems()
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::render::Notation;

    #[test]
    fn test_dotted_comparisons() {
        let expr = parse("x > 0 && !(y == 1)").unwrap();
        assert_eq!(
            Notation::Lems.render(&expr),
            "x .gt. 0 .and. .not. (y .eq. 1)"
        );
    }

    #[test]
    fn test_output_parses_back_to_same_tree() {
        for text in [
            "rate * exp((v - midpoint) / scale)",
            "v .lt. -40 ? 0 : v .gt. 20 ? 1 : (v + 40) / 60",
            "a - (b - c) - d",
            "(a ^ b) ^ c",
            "x / (1 - exp(-x))",
        ] {
            let expr = parse(text).unwrap();
            let rendered = Notation::Lems.render(&expr);
            assert_eq!(parse(&rendered).unwrap(), expr, "{text} -> {rendered}");
        }
    }
}
