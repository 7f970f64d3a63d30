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

//! Text-in, text-out boundary over the parser and the renderers

use crate::ast::ExpressionNode;
use crate::parser::{self, ParseResult};
use crate::render::{Notation, RenderedExpression};
use indexmap::IndexSet;

/// Parse expression text into a tree
pub fn parse(text: &str) -> ParseResult<ExpressionNode> {
    parser::parse(text)
}

/// Render a tree in a notation
pub fn render(expr: &ExpressionNode, notation: Notation) -> RenderedExpression {
    RenderedExpression::render(expr, notation)
}

/// Parse text and render it in a notation
pub fn render_text(text: &str, notation: Notation) -> ParseResult<RenderedExpression> {
    parse(text).map(|expr| render(&expr, notation))
}

/// Names referenced by `text` that are not in `known`, in first-appearance order
pub fn free_variables<'a, I>(text: &str, known: I) -> ParseResult<IndexSet<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    parse(text).map(|expr| crate::resolver::free_variables(&expr, known))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text() {
        assert_eq!(
            render_text("a .gt. b ? a : b", Notation::JavaScript)
                .unwrap()
                .as_str(),
            "a > b ? a : b"
        );
        assert!(render_text("a +", Notation::MathJs).is_err());
    }

    #[test]
    fn test_free_variables_from_text() {
        let vars = free_variables("rate * exp((v - midpoint)/scale)", ["v"]).unwrap();
        assert_eq!(
            vars.into_iter().collect::<Vec<_>>(),
            vec!["rate", "midpoint", "scale"]
        );
    }
}
