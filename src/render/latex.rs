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

//! Typesetting notation for documentation and plot labels

use crate::ast::{BinaryOperator, ExpressionNode, Precedence, UnaryOperator, Visitor};

/// Names typeset as Greek letters
const GREEK_LETTERS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "kappa", "lambda", "mu",
    "nu", "xi", "pi", "rho", "sigma", "tau", "phi", "chi", "psi", "omega", "Gamma", "Delta",
    "Theta", "Lambda", "Sigma", "Phi", "Psi", "Omega",
];

/// Functions with a dedicated operator name command
const NAMED_FUNCTIONS: &[&str] = &["exp", "ln", "log", "sin", "cos", "tan", "sinh", "cosh", "tanh"];

/// Visitor producing LaTeX math-mode text
#[derive(Debug, Default)]
pub struct LatexRenderer;

impl LatexRenderer {
    /// Create a new renderer
    pub fn new() -> Self {
        Self
    }

    /// Render a complete expression
    pub fn render(&mut self, expr: &ExpressionNode) -> String {
        self.visit_expression(expr)
    }

    fn grouped(&mut self, expr: &ExpressionNode, parenthesize: bool) -> String {
        let text = self.visit_expression(expr);
        if parenthesize {
            format!("\\left({text}\\right)")
        } else {
            text
        }
    }
}

/// Fractions are visually grouped, so they bind like atoms here
fn typeset_precedence(expr: &ExpressionNode) -> Precedence {
    match expr {
        ExpressionNode::BinaryOp(data) if data.op == BinaryOperator::Divide => Precedence::Primary,
        _ => expr.precedence(),
    }
}

fn is_sign(expr: &ExpressionNode) -> bool {
    matches!(
        expr,
        ExpressionNode::UnaryOp {
            op: UnaryOperator::Minus | UnaryOperator::Plus,
            ..
        }
    )
}

fn symbol(word: &str) -> String {
    if GREEK_LETTERS.contains(&word) {
        format!("\\{word}")
    } else if word.chars().count() == 1 {
        word.to_string()
    } else {
        format!("\\mathrm{{{}}}", word.replace('_', "\\_"))
    }
}

impl Visitor for LatexRenderer {
    type Result = String;

    fn visit_number(&mut self, text: &str) -> String {
        match text.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => {
                let exponent = exponent.trim_start_matches('+');
                format!("{mantissa} \\times 10^{{{exponent}}}")
            }
            None => text.to_string(),
        }
    }

    fn visit_identifier(&mut self, name: &str) -> String {
        match name.split_once('_') {
            Some((base, subscript)) if !base.is_empty() && !subscript.is_empty() => {
                format!("{}_{{{}}}", symbol(base), symbol(subscript))
            }
            _ => symbol(name),
        }
    }

    fn visit_binary_op(
        &mut self,
        op: &BinaryOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> String {
        match op {
            BinaryOperator::Divide => {
                let numerator = self.visit_expression(left);
                let denominator = self.visit_expression(right);
                return format!("\\frac{{{numerator}}}{{{denominator}}}");
            }
            BinaryOperator::Power => {
                let base_needs_parens = typeset_precedence(left) <= Precedence::Power;
                let base = self.grouped(left, base_needs_parens);
                let exponent = self.visit_expression(right);
                return format!("{base}^{{{exponent}}}");
            }
            _ => {}
        }

        let precedence = op.precedence();
        let left_precedence = typeset_precedence(left);
        let right_precedence = typeset_precedence(right);
        let left_text = self.grouped(left, left_precedence < precedence);
        let right_text = self.grouped(right, is_sign(right) || right_precedence <= precedence);

        let operator = match op {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "\\cdot",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => "\\geq",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "\\leq",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "\\neq",
            BinaryOperator::And => "\\land",
            BinaryOperator::Or => "\\lor",
            BinaryOperator::Divide | BinaryOperator::Power => op.as_symbol(),
        };
        format!("{left_text} {operator} {right_text}")
    }

    fn visit_unary_op(&mut self, op: &UnaryOperator, operand: &ExpressionNode) -> String {
        let parenthesize = matches!(operand, ExpressionNode::UnaryOp { .. })
            || typeset_precedence(operand) < Precedence::Unary;
        let operand_text = self.grouped(operand, parenthesize);
        match op {
            UnaryOperator::Not => format!("\\lnot {operand_text}"),
            _ => format!("{}{}", op.as_symbol(), operand_text),
        }
    }

    fn visit_function_call(&mut self, name: &str, args: &[ExpressionNode]) -> String {
        let args = args
            .iter()
            .map(|arg| self.visit_expression(arg))
            .collect::<Vec<_>>()
            .join(", ");
        match name {
            "sqrt" => format!("\\sqrt{{{args}}}"),
            "abs" => format!("\\left|{args}\\right|"),
            _ if NAMED_FUNCTIONS.contains(&name) => format!("\\{name}\\left({args}\\right)"),
            _ => format!("{}\\left({args}\\right)", symbol(name)),
        }
    }

    fn visit_conditional(
        &mut self,
        condition: &ExpressionNode,
        then_expr: &ExpressionNode,
        else_expr: &ExpressionNode,
    ) -> String {
        let mut rows = vec![format!(
            "{} & \\text{{if }} {}",
            self.visit_expression(then_expr),
            self.visit_expression(condition)
        )];

        let mut rest = else_expr;
        while let ExpressionNode::Conditional(data) = rest {
            rows.push(format!(
                "{} & \\text{{if }} {}",
                self.visit_expression(&data.then_expr),
                self.visit_expression(&data.condition)
            ));
            rest = &data.else_expr;
        }
        rows.push(format!("{} & \\text{{otherwise}}", self.visit_expression(rest)));

        format!("\\begin{{cases}} {} \\end{{cases}}", rows.join(" \\\\ "))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::render::Notation;
    use pretty_assertions::assert_eq;

    fn latex(text: &str) -> String {
        Notation::Latex.render(&parse(text).unwrap())
    }

    #[test]
    fn test_fraction_and_functions() {
        assert_eq!(
            latex("rate * exp((v - midpoint)/scale)"),
            "\\mathrm{rate} \\cdot \\exp\\left(\\frac{v - \\mathrm{midpoint}}{\\mathrm{scale}}\\right)"
        );
        assert_eq!(latex("sqrt(x) + abs(y)"), "\\sqrt{x} + \\left|y\\right|");
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(latex("tau_m"), "\\tau_{m}");
        assert_eq!(latex("x_inf"), "x_{\\mathrm{inf}}");
        assert_eq!(latex("alpha * beta"), "\\alpha \\cdot \\beta");
    }

    #[test]
    fn test_scientific_numbers() {
        assert_eq!(latex("1e-3"), "1 \\times 10^{-3}");
        assert_eq!(latex("2.5E+4"), "2.5 \\times 10^{4}");
    }

    #[test]
    fn test_powers_and_signs() {
        assert_eq!(latex("(a + b)^2"), "\\left(a + b\\right)^{2}");
        assert_eq!(latex("v - -40"), "v - \\left(-40\\right)");
    }

    #[test]
    fn test_conditional_as_cases() {
        assert_eq!(
            latex("v .lt. 0 ? 0 : v .gt. 1 ? 1 : v"),
            "\\begin{cases} 0 & \\text{if } v < 0 \\\\ 1 & \\text{if } v > 1 \\\\ v & \\text{otherwise} \\end{cases}"
        );
    }
}
