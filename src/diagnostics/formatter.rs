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

//! Formatting diagnostics for different output formats

use super::diagnostic::Diagnostic;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable multi-line text format
    Text,
    /// JSON for tooling (pretty-printed with the `serde` feature, `Debug` text without it)
    Json,
    /// Compact single-line format
    Compact,
}

/// Formatter for diagnostics
#[derive(Debug, Clone)]
pub struct DiagnosticFormatter {
    format: Format,
    show_code: bool,
    show_help: bool,
}

impl DiagnosticFormatter {
    /// Create a new formatter
    pub fn new(format: Format) -> Self {
        Self {
            format,
            show_code: true,
            show_help: true,
        }
    }

    /// Set whether to show error codes
    pub fn with_code(mut self, show: bool) -> Self {
        self.show_code = show;
        self
    }

    /// Set whether to show fix hints
    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    /// Format a diagnostic
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        match self.format {
            Format::Text => self.format_text(diagnostic, None),
            Format::Json => self.format_json(diagnostic),
            Format::Compact => self.format_compact(diagnostic),
        }
    }

    /// Format a diagnostic against the expression text it refers to,
    /// underlining the offending offset in text mode
    pub fn format_with_source(&self, diagnostic: &Diagnostic, source: &str) -> String {
        match self.format {
            Format::Text => self.format_text(diagnostic, Some(source)),
            Format::Json => self.format_json(diagnostic),
            Format::Compact => self.format_compact(diagnostic),
        }
    }

    /// Format multiple diagnostics
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        match self.format {
            Format::Text => diagnostics
                .iter()
                .map(|d| self.format_text(d, None))
                .collect::<Vec<_>>()
                .join("\n"),
            Format::Json => {
                #[cfg(feature = "serde")]
                {
                    serde_json::to_string_pretty(diagnostics)
                        .unwrap_or_else(|_| format!("{diagnostics:?}"))
                }
                #[cfg(not(feature = "serde"))]
                {
                    format!("{diagnostics:?}")
                }
            }
            Format::Compact => diagnostics
                .iter()
                .map(|d| self.format_compact(d))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn format_text(&self, diagnostic: &Diagnostic, source: Option<&str>) -> String {
        let mut result = format!("{}: {}", diagnostic.severity, diagnostic.message);

        if self.show_code {
            result.push_str(&format!(" [{}]", diagnostic.code_string()));
        }
        result.push('\n');

        match (&diagnostic.subject, diagnostic.offset) {
            (Some(subject), Some(offset)) => {
                result.push_str(&format!(" --> {subject} at offset {offset}\n"))
            }
            (Some(subject), None) => result.push_str(&format!(" --> {subject}\n")),
            (None, Some(offset)) => result.push_str(&format!(" --> offset {offset}\n")),
            (None, None) => {}
        }

        if let (Some(source), Some(offset)) = (source, diagnostic.offset) {
            result.push_str(&format!("   | {source}\n"));
            result.push_str("   | ");
            result.push_str(&" ".repeat(offset.min(source.len())));
            result.push_str("^\n");
        }

        if self.show_help {
            if let Some(help) = &diagnostic.help {
                result.push_str(&format!("   = help: {help}\n"));
            }
        }

        result
    }

    fn format_json(&self, diagnostic: &Diagnostic) -> String {
        #[cfg(feature = "serde")]
        {
            serde_json::to_string_pretty(diagnostic).unwrap_or_else(|_| format!("{diagnostic:?}"))
        }

        #[cfg(not(feature = "serde"))]
        {
            format!("{diagnostic:?}")
        }
    }

    fn format_compact(&self, diagnostic: &Diagnostic) -> String {
        let code = if self.show_code {
            format!("[{}] ", diagnostic.code_string())
        } else {
            String::new()
        };
        let location = match (&diagnostic.subject, diagnostic.offset) {
            (Some(subject), Some(offset)) => format!("{subject}@{offset}"),
            (Some(subject), None) => subject.clone(),
            (None, Some(offset)) => format!("@{offset}"),
            (None, None) => "<expression>".to_string(),
        };

        format!(
            "{}: {}: {}{}",
            location, diagnostic.severity, code, diagnostic.message
        )
    }
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self::new(Format::Text)
    }
}

/// Extension trait for formatting diagnostics
pub trait DiagnosticFormat {
    /// Format as human-readable text
    fn to_text(&self) -> String;

    /// Format as compact single line
    fn to_compact(&self) -> String;

    /// Format as JSON
    fn to_json(&self) -> String;
}

impl DiagnosticFormat for Diagnostic {
    fn to_text(&self) -> String {
        DiagnosticFormatter::new(Format::Text).format(self)
    }

    fn to_compact(&self) -> String {
        DiagnosticFormatter::new(Format::Compact).format(self)
    }

    fn to_json(&self) -> String {
        DiagnosticFormatter::new(Format::Json).format(self)
    }
}
