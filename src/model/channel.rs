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

//! Ion channels, gates and the components describing their behaviors

use super::scope::{ComponentScope, ScopeRef};
use super::types::DomainTypes;
use crate::error::{ModelError, ModelResult};
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// Sub-behavior of a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Behavior {
    /// Opening rate (alpha)
    ForwardRate,
    /// Closing rate (beta)
    ReverseRate,
    /// Time constant
    TimeCourse,
    /// Steady-state activation
    SteadyState,
}

impl Behavior {
    /// All behaviors in report order
    pub const ALL: [Behavior; 4] = [
        Behavior::ForwardRate,
        Behavior::ReverseRate,
        Behavior::TimeCourse,
        Behavior::SteadyState,
    ];

    /// Label used in textual reports
    pub fn label(&self) -> &'static str {
        match self {
            Behavior::ForwardRate => "forward rate",
            Behavior::ReverseRate => "reverse rate",
            Behavior::TimeCourse => "time course",
            Behavior::SteadyState => "steady state",
        }
    }

    /// Element name in model documents
    pub fn element_name(&self) -> &'static str {
        match self {
            Behavior::ForwardRate => "forwardRate",
            Behavior::ReverseRate => "reverseRate",
            Behavior::TimeCourse => "timeCourse",
            Behavior::SteadyState => "steadyState",
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kinetic scheme of a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GateKind {
    /// Forward and reverse rates
    HHrates,
    /// Time course and steady state
    HHtauInf,
    /// Rates plus an explicit steady state
    HHratesInf,
    /// Rates plus an explicit time course
    HHratesTau,
    /// Rates, time course and steady state
    HHratesTauInf,
}

impl GateKind {
    /// Behaviors a gate of this kind must define
    pub fn required_behaviors(&self) -> &'static [Behavior] {
        match self {
            GateKind::HHrates => &[Behavior::ForwardRate, Behavior::ReverseRate],
            GateKind::HHtauInf => &[Behavior::TimeCourse, Behavior::SteadyState],
            GateKind::HHratesInf => &[
                Behavior::ForwardRate,
                Behavior::ReverseRate,
                Behavior::SteadyState,
            ],
            GateKind::HHratesTau => &[
                Behavior::ForwardRate,
                Behavior::ReverseRate,
                Behavior::TimeCourse,
            ],
            GateKind::HHratesTauInf => &Behavior::ALL,
        }
    }

    /// Element name in model documents
    pub fn element_name(&self) -> &'static str {
        match self {
            GateKind::HHrates => "gateHHrates",
            GateKind::HHtauInf => "gateHHtauInf",
            GateKind::HHratesInf => "gateHHratesInf",
            GateKind::HHratesTau => "gateHHratesTau",
            GateKind::HHratesTauInf => "gateHHratesTauInf",
        }
    }
}

impl FromStr for GateKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = s.strip_prefix("gate").unwrap_or(s);
        match kind {
            "HHrates" => Ok(GateKind::HHrates),
            "HHtauInf" => Ok(GateKind::HHtauInf),
            "HHratesInf" => Ok(GateKind::HHratesInf),
            "HHratesTau" => Ok(GateKind::HHratesTau),
            "HHratesTauInf" => Ok(GateKind::HHratesTauInf),
            _ => Err(ModelError::UnknownGateKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// A typed component with bound parameter values
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    /// Component id
    pub id: String,
    /// Name of its [`ComponentType`](super::types::ComponentType)
    pub type_name: String,
    /// Parameter values as expression text
    pub parameters: IndexMap<String, String>,
}

/// A component bound into the scope tree
#[derive(Debug, Clone)]
pub struct BoundComponent {
    /// Scope holding the component's parameters and derived variables
    pub scope: ScopeRef,
    /// Name of the variable the component exposes
    pub exposure: String,
}

impl Component {
    /// Create a component with no parameters
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
            parameters: IndexMap::new(),
        }
    }

    /// Bind a parameter value
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Build this component's scope under `parent` using its type from `types`
    pub fn bind(&self, types: &DomainTypes, parent: ScopeRef) -> ModelResult<BoundComponent> {
        if !types.contains(&self.type_name) {
            return Err(ModelError::UnknownComponentType {
                component: self.id.clone(),
                type_name: self.type_name.clone(),
            });
        }
        let resolved = types.resolve(&self.type_name)?;

        let mut builder = ComponentScope::builder(self.id.clone()).parent(parent);
        for parameter in &resolved.parameters {
            let value =
                self.parameters
                    .get(parameter)
                    .ok_or_else(|| ModelError::MissingParameter {
                        component: self.id.clone(),
                        parameter: parameter.clone(),
                    })?;
            builder = builder.parameter(parameter.clone(), value.clone());
        }
        for name in self.parameters.keys() {
            if !resolved.parameters.contains(name) {
                log::debug!(
                    "component '{}' sets '{}', which type '{}' does not declare",
                    self.id,
                    name,
                    self.type_name
                );
            }
        }
        for (variable, definition) in &resolved.derived {
            builder = builder.define(variable.clone(), definition.clone());
        }

        let exposure = resolved
            .exposure
            .ok_or_else(|| ModelError::MissingExposure {
                type_name: self.type_name.clone(),
            })?;

        Ok(BoundComponent {
            scope: builder.build_ref(),
            exposure,
        })
    }
}

/// A gating variable of an ion channel
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gate {
    /// Gate id
    pub id: String,
    /// Kinetic scheme
    pub kind: GateKind,
    /// Exponent of the gating variable in the conductance
    pub instances: u32,
    /// Forward rate component
    pub forward_rate: Option<Component>,
    /// Reverse rate component
    pub reverse_rate: Option<Component>,
    /// Time course component
    pub time_course: Option<Component>,
    /// Steady state component
    pub steady_state: Option<Component>,
}

impl Gate {
    /// Create a gate with one instance and no behaviors
    pub fn new(id: impl Into<String>, kind: GateKind) -> Self {
        Self {
            id: id.into(),
            kind,
            instances: 1,
            forward_rate: None,
            reverse_rate: None,
            time_course: None,
            steady_state: None,
        }
    }

    /// Set the instance count
    pub fn with_instances(mut self, instances: u32) -> Self {
        self.instances = instances;
        self
    }

    /// Attach a behavior component
    pub fn with_behavior(mut self, behavior: Behavior, component: Component) -> Self {
        let slot = match behavior {
            Behavior::ForwardRate => &mut self.forward_rate,
            Behavior::ReverseRate => &mut self.reverse_rate,
            Behavior::TimeCourse => &mut self.time_course,
            Behavior::SteadyState => &mut self.steady_state,
        };
        *slot = Some(component);
        self
    }

    /// Component describing a behavior, if present
    pub fn behavior(&self, behavior: Behavior) -> Option<&Component> {
        match behavior {
            Behavior::ForwardRate => self.forward_rate.as_ref(),
            Behavior::ReverseRate => self.reverse_rate.as_ref(),
            Behavior::TimeCourse => self.time_course.as_ref(),
            Behavior::SteadyState => self.steady_state.as_ref(),
        }
    }

    /// Behaviors present on this gate, in report order
    pub fn behaviors(&self) -> impl Iterator<Item = (Behavior, &Component)> {
        Behavior::ALL
            .into_iter()
            .filter_map(|behavior| self.behavior(behavior).map(|c| (behavior, c)))
    }

    /// Required behaviors that are absent
    pub fn missing_behaviors(&self) -> Vec<Behavior> {
        self.kind
            .required_behaviors()
            .iter()
            .copied()
            .filter(|behavior| self.behavior(*behavior).is_none())
            .collect()
    }

    /// Scope of this gate under its channel
    pub fn scope(&self, channel: ScopeRef) -> ScopeRef {
        ComponentScope::builder(format!("gate {}", self.id))
            .parent(channel)
            .build_ref()
    }
}

/// An ion channel with its gates
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IonChannel {
    /// Channel id
    pub id: String,
    /// Channel-level parameters visible to every gate
    pub parameters: IndexMap<String, String>,
    /// Gates in document order
    pub gates: Vec<Gate>,
}

impl IonChannel {
    /// Create a channel with no gates
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parameters: IndexMap::new(),
            gates: Vec::new(),
        }
    }

    /// Add a channel-level parameter
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Add a gate
    pub fn with_gate(mut self, gate: Gate) -> Self {
        self.gates.push(gate);
        self
    }

    /// Root scope of the channel
    pub fn scope(&self) -> ScopeRef {
        self.parameters
            .iter()
            .fold(ComponentScope::builder(self.id.clone()), |builder, (name, value)| {
                builder.parameter(name.clone(), value.clone())
            })
            .build_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::scope::{Definition, Scope, resolve};

    fn exp_rate() -> Component {
        Component::new("m_fwd", "HHExpRate")
            .with_parameter("rate", "1000")
            .with_parameter("midpoint", "-40")
            .with_parameter("scale", "10")
    }

    #[test]
    fn test_gate_kind_from_str() {
        assert_eq!("gateHHrates".parse::<GateKind>().unwrap(), GateKind::HHrates);
        assert_eq!("HHtauInf".parse::<GateKind>().unwrap(), GateKind::HHtauInf);
        assert!("gateKS".parse::<GateKind>().is_err());
    }

    #[test]
    fn test_missing_behaviors() {
        let gate = Gate::new("m", GateKind::HHratesInf)
            .with_behavior(Behavior::ForwardRate, exp_rate());
        assert_eq!(
            gate.missing_behaviors(),
            vec![Behavior::ReverseRate, Behavior::SteadyState]
        );
        assert_eq!(gate.behaviors().count(), 1);
    }

    #[test]
    fn test_bind_builds_nested_scope() {
        let channel = IonChannel::new("naChan").with_parameter("q10", "3");
        let gate = Gate::new("m", GateKind::HHrates);
        let bound = exp_rate()
            .bind(DomainTypes::core(), gate.scope(channel.scope()))
            .unwrap();

        assert_eq!(bound.exposure, "r");
        assert_eq!(
            resolve(&bound.scope, "midpoint").unwrap().definition(),
            &Definition::Expression("-40".to_string())
        );
        let q10 = resolve(&bound.scope, "q10").unwrap();
        assert_eq!(q10.scope().name(), "naChan");
        assert_eq!(
            bound.scope.parent().map(|p| p.name().to_string()),
            Some("gate m".to_string())
        );
    }

    #[test]
    fn test_bind_errors() {
        let channel = IonChannel::new("k").scope();
        let unknown = Component::new("c", "NoSuchRate");
        assert!(matches!(
            unknown.bind(DomainTypes::core(), channel.clone()),
            Err(ModelError::UnknownComponentType { .. })
        ));

        let incomplete = Component::new("c", "HHExpRate").with_parameter("rate", "1");
        assert_eq!(
            incomplete.bind(DomainTypes::core(), channel).unwrap_err(),
            ModelError::MissingParameter {
                component: "c".to_string(),
                parameter: "midpoint".to_string(),
            }
        );
    }
}
