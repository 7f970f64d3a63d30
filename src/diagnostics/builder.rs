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

//! Builder pattern for constructing diagnostics

use super::diagnostic::{Diagnostic, DiagnosticCode, Severity};

/// Builder for constructing diagnostics fluently
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    severity: Severity,
    code: DiagnosticCode,
    message: String,
    subject: Option<String>,
    offset: Option<usize>,
    help: Option<String>,
}

impl DiagnosticBuilder {
    fn with_severity(severity: Severity, code: DiagnosticCode) -> Self {
        Self {
            severity,
            code,
            message: String::new(),
            subject: None,
            offset: None,
            help: None,
        }
    }

    /// Create a new error diagnostic builder
    pub fn error(code: DiagnosticCode) -> Self {
        Self::with_severity(Severity::Error, code)
    }

    /// Create a new warning diagnostic builder
    pub fn warning(code: DiagnosticCode) -> Self {
        Self::with_severity(Severity::Warning, code)
    }

    /// Create a new info diagnostic builder
    pub fn info(code: DiagnosticCode) -> Self {
        Self::with_severity(Severity::Info, code)
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the entity the diagnostic is about
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the byte offset into the offending expression
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Add a fix hint
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Build the diagnostic
    pub fn build(self) -> Diagnostic {
        let message = if self.message.is_empty() {
            self.code.to_string()
        } else {
            self.message
        };

        Diagnostic {
            severity: self.severity,
            code: self.code,
            message,
            subject: self.subject,
            offset: self.offset,
            help: self.help,
        }
    }
}
