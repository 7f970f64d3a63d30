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

//! Channel-level gate extraction

use anyhow::{Context, Result};
use neuroml_gates::{
    Behavior, Component, DiagnosticCode, DomainTypes, ExtractionConfig, Gate, GateExtractor,
    GateKind, IonChannel, Notation,
};
use pretty_assertions::assert_eq;

fn rate(id: &str, type_name: &str, rate: &str, midpoint: &str, scale: &str) -> Component {
    Component::new(id, type_name)
        .with_parameter("rate", rate)
        .with_parameter("midpoint", midpoint)
        .with_parameter("scale", scale)
}

fn na_channel() -> IonChannel {
    IonChannel::new("naChan")
        .with_gate(
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
        )
        .with_gate(
            Gate::new("h", GateKind::HHrates)
                .with_behavior(
                    Behavior::ForwardRate,
                    rate("h_fwd", "HHExpRate", "70", "-65", "-20"),
                )
                .with_behavior(
                    Behavior::ReverseRate,
                    rate("h_rev", "HHSigmoidRate", "1000", "-35", "10"),
                ),
        )
}

fn k_channel() -> IonChannel {
    IonChannel::new("kChan").with_gate(
        Gate::new("n", GateKind::HHrates)
            .with_instances(4)
            .with_behavior(
                Behavior::ForwardRate,
                rate("n_fwd", "HHExpLinearRate", "100", "-55", "10"),
            )
            .with_behavior(
                Behavior::ReverseRate,
                rate("n_rev", "HHExpRate", "125", "-65", "-80"),
            ),
    )
}

#[test]
fn test_sodium_channel_report() {
    let report =
        GateExtractor::with_core_types(ExtractionConfig::default()).extract_channel(&na_channel());

    assert!(report.diagnostics.is_empty());
    assert_eq!(
        report.to_string(),
        "naChan:gate m:instances = 3\n\
         naChan:gate m:forward rate = 1000 * exp((v - (-40)) / 10)\n\
         naChan:gate m:reverse rate = 4000 / (1 + exp(0 - (v - (-65)) / (-18)))\n\
         naChan:gate h:instances = 1\n\
         naChan:gate h:forward rate = 70 * exp((v - (-65)) / (-20))\n\
         naChan:gate h:reverse rate = 1000 / (1 + exp(0 - (v - (-35)) / 10))\n"
    );
}

#[test]
fn test_extract_all_keeps_channels_apart() -> Result<()> {
    let extractor = GateExtractor::with_core_types(ExtractionConfig::default());
    let reports = extractor.extract_all(&[na_channel(), k_channel()]);

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].channel_id, "naChan");
    assert_eq!(reports[1].channel_id, "kChan");

    let n = reports[1].gate("n").context("gate n is extracted")?;
    assert_eq!(n.instances, 4);
    let forward = n
        .expression(Behavior::ForwardRate)
        .context("forward rate is present")?;
    assert_eq!(
        forward.as_str(),
        "(v - (-55)) / 10 != 0 ? 100 * ((v - (-55)) / 10) / (1 - exp(0 - (v - (-55)) / 10)) : 100"
    );
    assert_eq!(
        n.expression(Behavior::ReverseRate)
            .context("reverse rate is present")?
            .as_str(),
        "125 * exp((v - (-65)) / (-80))"
    );
    Ok(())
}

#[test]
fn test_strict_policy_reports_malformed_piecewise() {
    let extractor = GateExtractor::with_core_types(ExtractionConfig::strict());
    let report = extractor.extract_channel(&k_channel());

    assert!(report.gates.is_empty());
    assert!(report.has_errors());
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.code, DiagnosticCode::MalformedExpression);
    assert_eq!(diagnostic.subject.as_deref(), Some("kChan:gate n"));
}

#[test]
fn test_unknown_component_type() {
    let channel = IonChannel::new("caChan").with_gate(
        Gate::new("q", GateKind::HHrates)
            .with_behavior(
                Behavior::ForwardRate,
                rate("q_fwd", "HHCubicRate", "1", "0", "1"),
            )
            .with_behavior(
                Behavior::ReverseRate,
                rate("q_rev", "HHExpRate", "1", "0", "1"),
            ),
    );
    let report =
        GateExtractor::with_core_types(ExtractionConfig::default()).extract_channel(&channel);

    assert!(report.gates.is_empty());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(
        report.diagnostics[0].code,
        DiagnosticCode::UnknownComponentType
    );
}

#[test]
fn test_injected_registry_and_notation() -> Result<()> {
    let mut types = DomainTypes::standard();
    types.register(
        neuroml_gates::ComponentType::new("HHLinearTime")
            .extends("baseVoltageDepTime")
            .parameter("slope")
            .derived("t", "slope * v"),
    );
    let channel = IonChannel::new("hcn").with_gate(
        Gate::new("s", GateKind::HHtauInf)
            .with_behavior(
                Behavior::TimeCourse,
                Component::new("s_tau", "HHLinearTime").with_parameter("slope", "0.5"),
            )
            .with_behavior(
                Behavior::SteadyState,
                rate("s_inf", "HHSigmoidVariable", "1", "-70", "5"),
            ),
    );
    let extractor = GateExtractor::new(
        &types,
        ExtractionConfig::default().with_notation(Notation::JavaScript),
    );
    let report = extractor.extract_channel(&channel);
    let gate = report.gate("s").context("gate s is extracted")?;

    assert_eq!(
        gate.expression(Behavior::TimeCourse)
            .context("time course is present")?
            .as_str(),
        "0.5 * v"
    );
    assert_eq!(
        gate.expression(Behavior::SteadyState)
            .context("steady state is present")?
            .as_str(),
        "1 / (1 + Math.exp(0 - (v - (-70)) / 5))"
    );
    Ok(())
}
