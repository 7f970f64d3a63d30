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

//! Evaluate-ready JavaScript notation (`Math.exp`, `Math.pow`, `&&`)

use super::infix::InfixDialect;
use crate::ast::{BinaryOperator, UnaryOperator};
use std::borrow::Cow;

/// Functions that live on the `Math` object under the same name
const MATH_FUNCTIONS: &[&str] = &[
    "exp", "sqrt", "sin", "cos", "tan", "sinh", "cosh", "tanh", "abs", "ceil", "floor", "random",
    "pow", "min", "max",
];

/// JavaScript expression notation
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptDialect;

impl InfixDialect for JavaScriptDialect {
    fn binary_operator(&self, op: BinaryOperator) -> &'static str {
        op.as_symbol()
    }

    fn unary_operator(&self, op: UnaryOperator) -> &'static str {
        op.as_symbol()
    }

    fn function_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match name {
            "ln" => Cow::Borrowed("Math.log"),
            "log" => Cow::Borrowed("Math.log10"),
            _ if MATH_FUNCTIONS.contains(&name) => Cow::Owned(format!("Math.{name}")),
            _ => Cow::Borrowed(name),
        }
    }

    fn power_function(&self) -> Option<&'static str> {
        Some("Math.pow")
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::render::Notation;

    fn javascript(text: &str) -> String {
        Notation::JavaScript.render(&parse(text).unwrap())
    }

    #[test]
    fn test_math_object_functions() {
        assert_eq!(
            javascript("1000 * exp((0 - -40) / 10)"),
            "1000 * Math.exp((0 - (-40)) / 10)"
        );
        assert_eq!(javascript("ln(x)"), "Math.log(x)");
        assert_eq!(javascript("H(x)"), "H(x)");
    }

    #[test]
    fn test_power_as_call() {
        assert_eq!(javascript("2 * x^(y + 1)"), "2 * Math.pow(x, y + 1)");
    }

    #[test]
    fn test_logic() {
        assert_eq!(
            javascript("x .gt. 0 .or. .not. y ? 1 : 0"),
            "x > 0 || !y ? 1 : 0"
        );
    }
}
