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

//! Flattening piecewise definitions into a ternary chain
//!
//! Cases become `c1 ? v1 : c2 ? v2 : default`, nested to the right. The
//! default branch is chosen while scanning the cases once, left to right:
//!
//! * a case without a condition becomes the default wherever it appears
//!   (a later one replaces an earlier one);
//! * under [`PiecewisePolicy::PromoteLast`], if no catch-all has been seen
//!   by the time the last case is reached, the last case becomes the
//!   default and its condition is dropped.

use crate::ast::ExpressionNode;
use crate::error::{ResolutionError, ResolutionResult};
use crate::model::Case;
use crate::parser::parse;
use crate::render::Notation;

/// What to do with a piecewise definition that has no explicit catch-all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PiecewisePolicy {
    /// Use the last case's value as the default and drop its condition
    #[default]
    PromoteLast,
    /// Reject the definition with `MalformedExpression`
    Strict,
}

/// Converts ordered cases into one conditional expression
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalCaseFlattener {
    policy: PiecewisePolicy,
}

impl ConditionalCaseFlattener {
    /// Create a flattener with the given policy
    pub fn new(policy: PiecewisePolicy) -> Self {
        Self { policy }
    }

    /// Policy in effect
    pub fn policy(&self) -> PiecewisePolicy {
        self.policy
    }

    /// Flatten the cases of `symbol` into a tree
    pub fn flatten(&self, symbol: &str, cases: &[Case]) -> ResolutionResult<ExpressionNode> {
        if cases.is_empty() {
            return Err(ResolutionError::malformed_piecewise(
                symbol,
                "piecewise definition has no cases",
            ));
        }

        let parse_part = |text: &str| {
            parse(text).map_err(|err| ResolutionError::malformed(symbol, text, &err))
        };

        let last = cases.len() - 1;
        let mut guarded = Vec::with_capacity(cases.len());
        let mut default = None;

        for (index, case) in cases.iter().enumerate() {
            match &case.condition {
                None => default = Some(parse_part(&case.value)?),
                Some(_)
                    if index == last
                        && default.is_none()
                        && self.policy == PiecewisePolicy::PromoteLast =>
                {
                    log::debug!(
                        "piecewise '{}' has no catch-all; promoting its last case to default",
                        symbol
                    );
                    default = Some(parse_part(&case.value)?);
                }
                Some(condition) => {
                    guarded.push((parse_part(condition)?, parse_part(&case.value)?));
                }
            }
        }

        let default = default.ok_or_else(|| {
            ResolutionError::malformed_piecewise(
                symbol,
                "piecewise definition has no catch-all case",
            )
        })?;

        Ok(guarded
            .into_iter()
            .rev()
            .fold(default, |else_expr, (condition, value)| {
                ExpressionNode::conditional(condition, value, else_expr)
            }))
    }

    /// Flatten and render in the modeling language's notation
    pub fn flatten_text(&self, symbol: &str, cases: &[Case]) -> ResolutionResult<String> {
        self.flatten(symbol, cases)
            .map(|expr| Notation::Lems.render(&expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn promote_last(cases: &[Case]) -> String {
        ConditionalCaseFlattener::default()
            .flatten_text("r", cases)
            .unwrap()
    }

    #[rstest]
    #[case::explicit_default(
        vec![Case::when("c1", "v1"), Case::when("c2", "v2"), Case::otherwise("d")],
        "c1 ? v1 : c2 ? v2 : d"
    )]
    #[case::last_promoted(vec![Case::when("c1", "v1"), Case::when("c2", "v2")], "c1 ? v1 : v2")]
    #[case::default_first(
        vec![Case::otherwise("d"), Case::when("c1", "v1"), Case::when("c2", "v2")],
        "c1 ? v1 : c2 ? v2 : d"
    )]
    #[case::single_guarded(vec![Case::when("x .gt. 0", "x")], "x")]
    #[case::later_catch_all_wins(
        vec![Case::otherwise("a"), Case::when("c", "v"), Case::otherwise("b")],
        "c ? v : b"
    )]
    fn test_flatten(#[case] cases: Vec<Case>, #[case] expected: &str) {
        assert_eq!(promote_last(&cases), expected);
    }

    #[test]
    fn test_chain_nests_to_the_right() {
        let expr = ConditionalCaseFlattener::default()
            .flatten(
                "r",
                &[
                    Case::when("a", "1"),
                    Case::when("b", "2"),
                    Case::otherwise("3"),
                ],
            )
            .unwrap();
        assert_eq!(
            expr,
            ExpressionNode::conditional(
                ExpressionNode::identifier("a"),
                ExpressionNode::number("1"),
                ExpressionNode::conditional(
                    ExpressionNode::identifier("b"),
                    ExpressionNode::number("2"),
                    ExpressionNode::number("3"),
                ),
            )
        );
    }

    #[test]
    fn test_empty_cases_fail_fast() {
        let err = ConditionalCaseFlattener::default()
            .flatten("r", &[])
            .unwrap_err();
        assert!(matches!(err, ResolutionError::MalformedExpression { ref symbol, .. } if symbol == "r"));
    }

    #[test]
    fn test_strict_policy_requires_catch_all() {
        let strict = ConditionalCaseFlattener::new(PiecewisePolicy::Strict);
        assert!(strict
            .flatten("r", &[Case::when("c1", "v1"), Case::when("c2", "v2")])
            .is_err());
        assert_eq!(
            strict
                .flatten_text("r", &[Case::when("c1", "v1"), Case::otherwise("v2")])
                .unwrap(),
            "c1 ? v1 : v2"
        );
    }

    #[test]
    fn test_malformed_case_reports_symbol() {
        let err = ConditionalCaseFlattener::default()
            .flatten("rate", &[Case::when("x .gt", "1"), Case::otherwise("0")])
            .unwrap_err();
        match err {
            ResolutionError::MalformedExpression {
                symbol, expression, ..
            } => {
                assert_eq!(symbol, "rate");
                assert_eq!(expression, "x .gt");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
