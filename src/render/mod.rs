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

//! Rendering expression trees into target notations
//!
//! Every notation is a pure function of the tree: the same tree rendered
//! twice in the same notation gives byte-identical text.

pub mod infix;
pub mod javascript;
pub mod latex;
pub mod lems;
pub mod mathjs;

pub use infix::{InfixDialect, InfixRenderer};
pub use javascript::JavaScriptDialect;
pub use latex::LatexRenderer;
pub use lems::LemsDialect;
pub use mathjs::MathJsDialect;

use crate::ast::ExpressionNode;
use std::fmt;
use std::str::FromStr;

/// Target notation for rendered expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notation {
    /// Ternary/operator notation read by numeric plotting tools
    #[default]
    MathJs,
    /// Plain JavaScript using the `Math` object
    JavaScript,
    /// LaTeX math mode
    Latex,
    /// The modeling language's own dotted notation
    Lems,
}

impl Notation {
    /// All supported notations
    pub const ALL: [Notation; 4] = [
        Notation::MathJs,
        Notation::JavaScript,
        Notation::Latex,
        Notation::Lems,
    ];

    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Notation::MathJs => "mathjs",
            Notation::JavaScript => "javascript",
            Notation::Latex => "latex",
            Notation::Lems => "lems",
        }
    }

    /// Render an expression tree in this notation
    pub fn render(&self, expr: &ExpressionNode) -> String {
        match self {
            Notation::MathJs => InfixRenderer::new(&MathJsDialect).render(expr),
            Notation::JavaScript => InfixRenderer::new(&JavaScriptDialect).render(expr),
            Notation::Latex => LatexRenderer::new().render(expr),
            Notation::Lems => InfixRenderer::new(&LemsDialect).render(expr),
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Notation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mathjs" => Ok(Notation::MathJs),
            "javascript" | "js" => Ok(Notation::JavaScript),
            "latex" | "tex" => Ok(Notation::Latex),
            "lems" => Ok(Notation::Lems),
            other => Err(format!("Unknown notation '{other}'")),
        }
    }
}

/// Expression text tagged with the notation it was rendered in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderedExpression {
    notation: Notation,
    text: String,
}

impl RenderedExpression {
    /// Render a tree
    pub fn render(expr: &ExpressionNode, notation: Notation) -> Self {
        Self {
            notation,
            text: notation.render(expr),
        }
    }

    /// Notation of the text
    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// The rendered text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Take the rendered text
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for RenderedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
