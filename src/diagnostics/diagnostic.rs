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

//! Core diagnostic types

use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Hint - subtle suggestion for improvement
    Hint,
    /// Information - provides helpful information
    #[default]
    Info,
    /// Warning - the extraction continued but the result may be incomplete
    Warning,
    /// Error - the affected entity could not be extracted
    Error,
}

/// Diagnostic error codes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticCode {
    // Parsing errors
    /// Unexpected token in expression
    UnexpectedToken,
    /// Expected a specific token
    ExpectedToken(String),
    /// Invalid number format
    InvalidNumber,
    /// Unknown operator
    UnknownOperator,

    // Resolution errors
    /// Name with no definition in any enclosing scope
    UnresolvedSymbol,
    /// Definition that depends on itself
    CyclicDependency,
    /// Expression text or piecewise definition that cannot be used
    MalformedExpression,
    /// Dependency chain deeper than the configured limit
    DepthLimitExceeded,
    /// One name bound to definitions from two different scopes
    ConflictingDefinition,
    /// Value that cannot be written as a numeric literal
    InvalidValue,

    // Model errors
    /// Component type not present in the registry
    UnknownComponentType,
    /// Parameter required by a component type but not bound
    MissingParameter,
    /// Sub-behavior required by a gate kind but absent
    MissingBehavior,

    // Custom error code
    /// Custom error with a string code
    Custom(String),
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// Severity of the diagnostic
    pub severity: Severity,
    /// Error code
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// Entity the diagnostic is about (`channel:gate`, a symbol name, ...)
    pub subject: Option<String>,
    /// Byte offset into the offending expression text
    pub offset: Option<usize>,
    /// Optional hint on how to fix the problem
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            subject: None,
            offset: None,
            help: None,
        }
    }

    /// Attach the entity this diagnostic is about
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Check if this is a warning
    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }

    /// Get the diagnostic code as a string
    pub fn code_string(&self) -> String {
        match &self.code {
            DiagnosticCode::UnexpectedToken => "E001".to_string(),
            DiagnosticCode::ExpectedToken(_) => "E002".to_string(),
            DiagnosticCode::InvalidNumber => "E003".to_string(),
            DiagnosticCode::UnknownOperator => "E004".to_string(),
            DiagnosticCode::UnresolvedSymbol => "E100".to_string(),
            DiagnosticCode::CyclicDependency => "E101".to_string(),
            DiagnosticCode::MalformedExpression => "E102".to_string(),
            DiagnosticCode::DepthLimitExceeded => "E103".to_string(),
            DiagnosticCode::ConflictingDefinition => "E104".to_string(),
            DiagnosticCode::InvalidValue => "E105".to_string(),
            DiagnosticCode::UnknownComponentType => "E200".to_string(),
            DiagnosticCode::MissingParameter => "E201".to_string(),
            DiagnosticCode::MissingBehavior => "W200".to_string(),
            DiagnosticCode::Custom(code) => code.clone(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::UnexpectedToken => write!(f, "unexpected token"),
            DiagnosticCode::ExpectedToken(token) => write!(f, "expected '{token}'"),
            DiagnosticCode::InvalidNumber => write!(f, "invalid number format"),
            DiagnosticCode::UnknownOperator => write!(f, "unknown operator"),
            DiagnosticCode::UnresolvedSymbol => write!(f, "unresolved symbol"),
            DiagnosticCode::CyclicDependency => write!(f, "cyclic dependency"),
            DiagnosticCode::MalformedExpression => write!(f, "malformed expression"),
            DiagnosticCode::DepthLimitExceeded => write!(f, "dependency depth limit exceeded"),
            DiagnosticCode::ConflictingDefinition => write!(f, "conflicting definition"),
            DiagnosticCode::InvalidValue => write!(f, "invalid value"),
            DiagnosticCode::UnknownComponentType => write!(f, "unknown component type"),
            DiagnosticCode::MissingParameter => write!(f, "missing parameter"),
            DiagnosticCode::MissingBehavior => write!(f, "missing gate behavior"),
            DiagnosticCode::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code_string(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_creation() {
        let diagnostic = Diagnostic::new(
            Severity::Error,
            DiagnosticCode::UnresolvedSymbol,
            "Unresolved symbol 'scale'",
        )
        .with_subject("naChan:gate m");

        assert!(diagnostic.is_error());
        assert!(!diagnostic.is_warning());
        assert_eq!(diagnostic.code_string(), "E100");
        assert_eq!(diagnostic.subject.as_deref(), Some("naChan:gate m"));
        assert_eq!(
            diagnostic.to_string(),
            "error[E100]: Unresolved symbol 'scale'"
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Info > Severity::Hint);
    }
}
