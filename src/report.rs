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

//! Gate extraction reports
//!
//! For each gate of a channel the extractor resolves every present
//! sub-behavior to a self-contained expression. Failures are isolated per
//! gate and recorded as diagnostics so one malformed definition does not
//! abort a batch.

use crate::config::ExtractionConfig;
use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use crate::error::Result;
use crate::model::{
    Behavior, Component, DomainTypes, Gate, GateKind, IonChannel, ScopeRef, resolve_symbol,
};
use crate::render::RenderedExpression;
use crate::resolver::FunctionContext;
use std::fmt;

/// Resolved expressions of one gate
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateReport {
    /// Gate id
    pub gate_id: String,
    /// Kinetic scheme
    pub kind: GateKind,
    /// Instance count
    pub instances: u32,
    /// Present behaviors in report order
    pub expressions: Vec<(Behavior, RenderedExpression)>,
}

impl GateReport {
    /// Expression of one behavior, if present
    pub fn expression(&self, behavior: Behavior) -> Option<&RenderedExpression> {
        self.expressions
            .iter()
            .find(|(b, _)| *b == behavior)
            .map(|(_, expression)| expression)
    }
}

/// Report for one channel
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelReport {
    /// Channel id
    pub channel_id: String,
    /// Successfully extracted gates in document order
    pub gates: Vec<GateReport>,
    /// Problems found while extracting
    pub diagnostics: Vec<Diagnostic>,
}

impl ChannelReport {
    /// Report for a gate by id
    pub fn gate(&self, gate_id: &str) -> Option<&GateReport> {
        self.gates.iter().find(|gate| gate.gate_id == gate_id)
    }

    /// Whether any gate failed
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

impl fmt::Display for ChannelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for gate in &self.gates {
            writeln!(
                f,
                "{}:gate {}:instances = {}",
                self.channel_id, gate.gate_id, gate.instances
            )?;
            for (behavior, expression) in &gate.expressions {
                writeln!(
                    f,
                    "{}:gate {}:{} = {}",
                    self.channel_id,
                    gate.gate_id,
                    behavior.label(),
                    expression
                )?;
            }
        }
        Ok(())
    }
}

/// Extracts gate expressions using a component type registry
#[derive(Debug, Clone)]
pub struct GateExtractor<'t> {
    types: &'t DomainTypes,
    config: ExtractionConfig,
}

impl GateExtractor<'static> {
    /// Extractor over the process-wide standard types
    pub fn with_core_types(config: ExtractionConfig) -> Self {
        Self::new(DomainTypes::core(), config)
    }
}

impl<'t> GateExtractor<'t> {
    /// Create an extractor over an injected registry
    pub fn new(types: &'t DomainTypes, config: ExtractionConfig) -> Self {
        Self { types, config }
    }

    /// Configuration in effect
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Resolve one behavior component to its exposed expression
    pub fn extract_behavior(
        &self,
        component: &Component,
        gate_scope: ScopeRef,
    ) -> Result<RenderedExpression> {
        let bound = component.bind(self.types, gate_scope)?;
        let symbol = resolve_symbol(&bound.scope, &bound.exposure)?;
        let function = FunctionContext::for_symbol(&symbol, &self.config)?;
        Ok(function.to_notation(self.config.notation)?)
    }

    /// Extract every present behavior of a gate
    pub fn extract_gate(&self, channel_scope: &ScopeRef, gate: &Gate) -> Result<GateReport> {
        let gate_scope = gate.scope(channel_scope.clone());
        let expressions = gate
            .behaviors()
            .map(|(behavior, component)| {
                self.extract_behavior(component, gate_scope.clone())
                    .map(|expression| (behavior, expression))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GateReport {
            gate_id: gate.id.clone(),
            kind: gate.kind,
            instances: gate.instances,
            expressions,
        })
    }

    /// Extract all gates of a channel, isolating failures per gate
    pub fn extract_channel(&self, channel: &IonChannel) -> ChannelReport {
        let channel_scope = channel.scope();
        let mut report = ChannelReport {
            channel_id: channel.id.clone(),
            gates: Vec::with_capacity(channel.gates.len()),
            diagnostics: Vec::new(),
        };

        for gate in &channel.gates {
            let subject = format!("{}:gate {}", channel.id, gate.id);

            for missing in gate.missing_behaviors() {
                report.diagnostics.push(
                    DiagnosticBuilder::warning(DiagnosticCode::MissingBehavior)
                        .with_message(format!(
                            "{} gate '{}' has no {}",
                            gate.kind.element_name(),
                            gate.id,
                            missing.label()
                        ))
                        .with_subject(subject.clone())
                        .with_help(format!("add a <{}> element", missing.element_name()))
                        .build(),
                );
            }

            match self.extract_gate(&channel_scope, gate) {
                Ok(gate_report) => report.gates.push(gate_report),
                Err(err) => {
                    log::warn!("skipping {}: {}", subject, err);
                    report
                        .diagnostics
                        .push(err.to_diagnostic().with_subject(subject));
                }
            }
        }

        log::debug!(
            "extracted {} of {} gate(s) from channel '{}'",
            report.gates.len(),
            channel.gates.len(),
            channel.id
        );
        report
    }

    /// Extract several channels; each report stands alone
    pub fn extract_all(&self, channels: &[IonChannel]) -> Vec<ChannelReport> {
        channels
            .iter()
            .map(|channel| self.extract_channel(channel))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rate(id: &str, type_name: &str, rate: &str, midpoint: &str, scale: &str) -> Component {
        Component::new(id, type_name)
            .with_parameter("rate", rate)
            .with_parameter("midpoint", midpoint)
            .with_parameter("scale", scale)
    }

    #[test]
    fn test_report_lines() {
        let channel = IonChannel::new("naChan").with_gate(
            Gate::new("m", GateKind::HHrates)
                .with_instances(3)
                .with_behavior(
                    Behavior::ForwardRate,
                    rate("m_fwd", "HHExpRate", "1000", "-40", "10"),
                )
                .with_behavior(
                    Behavior::ReverseRate,
                    rate("m_rev", "HHSigmoidRate", "4000", "-65", "-18"),
                ),
        );

        let report = GateExtractor::with_core_types(ExtractionConfig::default())
            .extract_channel(&channel);

        assert!(report.diagnostics.is_empty());
        assert_eq!(
            report.to_string(),
            "naChan:gate m:instances = 3\n\
             naChan:gate m:forward rate = 1000 * exp((v - (-40)) / 10)\n\
             naChan:gate m:reverse rate = 4000 / (1 + exp(0 - (v - (-65)) / (-18)))\n"
        );
    }

    #[test]
    fn test_failure_is_isolated_per_gate() {
        let channel = IonChannel::new("kChan")
            .with_gate(
                Gate::new("bad", GateKind::HHrates)
                    .with_behavior(Behavior::ForwardRate, Component::new("c", "HHExpRate"))
                    .with_behavior(
                        Behavior::ReverseRate,
                        rate("r", "HHExpRate", "1", "0", "1"),
                    ),
            )
            .with_gate(
                Gate::new("n", GateKind::HHtauInf)
                    .with_behavior(
                        Behavior::TimeCourse,
                        Component::new("tau", "fixedTimeCourse").with_parameter("tau", "0.002"),
                    ),
            );

        let report = GateExtractor::with_core_types(ExtractionConfig::default())
            .extract_channel(&channel);

        assert_eq!(report.gates.len(), 1);
        assert_eq!(report.gates[0].gate_id, "n");
        assert!(report.has_errors());

        let error = report.diagnostics.iter().find(|d| d.is_error()).unwrap();
        assert_eq!(error.code, DiagnosticCode::MissingParameter);
        assert_eq!(error.subject.as_deref(), Some("kChan:gate bad"));

        let warning = report.diagnostics.iter().find(|d| d.is_warning()).unwrap();
        assert_eq!(warning.code, DiagnosticCode::MissingBehavior);
        assert_eq!(warning.subject.as_deref(), Some("kChan:gate n"));
        assert_eq!(warning.message, "gateHHtauInf gate 'n' has no steady state");
    }
}
