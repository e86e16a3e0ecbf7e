//! Format dispatch, resolved once per domain.

use tacit_core::config::FormatterDescriptor;
use tacit_core::errors::TacitResult;
use tacit_core::models::{OutputFormat, QueryResult};

use crate::formats::{ChatFormatter, DigestFormatter, HtmlFormatter, MarkdownFormatter};

/// Render `result` in `format`, showing at most `max_units` supporting units.
pub fn render(result: &QueryResult, format: OutputFormat, max_units: usize) -> String {
    match format {
        OutputFormat::Html => HtmlFormatter::new().format(result, max_units),
        OutputFormat::Markdown => MarkdownFormatter::new().format(result, max_units),
        OutputFormat::Chat => ChatFormatter::new().format(result, max_units),
        OutputFormat::Digest => DigestFormatter::new().format(result, max_units),
    }
}

/// A domain's resolved formatter descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    format: OutputFormat,
    max_units: usize,
}

impl Formatter {
    pub fn new(format: OutputFormat, max_units: usize) -> Self {
        Self { format, max_units }
    }

    /// Unknown format names fail here, at load time.
    pub fn from_descriptor(descriptor: &FormatterDescriptor) -> TacitResult<Self> {
        Ok(Self::new(
            OutputFormat::from_name(&descriptor.format)?,
            descriptor.max_units,
        ))
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn max_units(&self) -> usize {
        self.max_units
    }

    /// Render with the domain format unless the request overrides it.
    pub fn render(&self, result: &QueryResult, requested: Option<OutputFormat>) -> (OutputFormat, String) {
        let format = requested.unwrap_or(self.format);
        (format, render(result, format, self.max_units))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacit_core::ErrorKind;

    #[test]
    fn descriptor_resolves_aliases() {
        let f = Formatter::from_descriptor(&FormatterDescriptor {
            format: "tldr".into(),
            max_units: 2,
        })
        .unwrap();
        assert_eq!(f.format(), OutputFormat::Digest);
        assert_eq!(f.max_units(), 2);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = Formatter::from_descriptor(&FormatterDescriptor {
            format: "pdf".into(),
            max_units: 3,
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn request_override_wins() {
        let f = Formatter::new(OutputFormat::Markdown, 3);
        let r = QueryResult::from_matches("q", "d", vec![], vec![], 0.0);
        let (format, out) = f.render(&r, Some(OutputFormat::Chat));
        assert_eq!(format, OutputFormat::Chat);
        assert!(out.starts_with('{'));
    }
}
