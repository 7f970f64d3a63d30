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

//! Ternary/operator notation consumed by numeric plotting tools
//!
//! Follows the math.js expression syntax: `^` for powers, `and`/`or`/`not`
//! keywords, `log` for the natural logarithm and `log10` for base ten.

use super::infix::InfixDialect;
use crate::ast::{BinaryOperator, UnaryOperator};
use std::borrow::Cow;

/// math.js-compatible notation
#[derive(Debug, Clone, Copy, Default)]
pub struct MathJsDialect;

impl InfixDialect for MathJsDialect {
    fn binary_operator(&self, op: BinaryOperator) -> &'static str {
        match op {
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            _ => op.as_symbol(),
        }
    }

    fn unary_operator(&self, op: UnaryOperator) -> &'static str {
        match op {
            UnaryOperator::Not => "not ",
            _ => op.as_symbol(),
        }
    }

    fn function_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match name {
            "ln" => Cow::Borrowed("log"),
            "log" => Cow::Borrowed("log10"),
            _ => Cow::Borrowed(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::render::Notation;
    use pretty_assertions::assert_eq;

    fn mathjs(text: &str) -> String {
        Notation::MathJs.render(&parse(text).unwrap())
    }

    #[test]
    fn test_operators_and_ternary() {
        assert_eq!(
            mathjs("v .lt. -40 .and. v .geq. -80 ? 0 : 1"),
            "v < (-40) and v >= (-80) ? 0 : 1"
        );
        assert_eq!(mathjs(".not. (x .eq. 0)"), "not (x == 0)");
        assert_eq!(mathjs("x^2^3"), "x ^ 2 ^ 3");
    }

    #[test]
    fn test_logarithms() {
        assert_eq!(mathjs("ln(x) + log(y)"), "log(x) + log10(y)");
    }

    #[test]
    fn test_minimal_parentheses() {
        assert_eq!(mathjs("(a * b) + c"), "a * b + c");
        assert_eq!(mathjs("a * (b + c)"), "a * (b + c)");
        assert_eq!(mathjs("a / (b * c)"), "a / (b * c)");
        assert_eq!(mathjs("-(x + 1)"), "-(x + 1)");
    }
}
