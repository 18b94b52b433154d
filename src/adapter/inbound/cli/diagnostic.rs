//! Miette diagnostics for cluster config files.
//!
//! A TOML syntax or type error is rendered with the offending file content
//! and a label at the reported span.

use std::path::Path;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// A cluster config file that could not be parsed.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(clpctl::config))]
pub struct ConfigDiagnostic {
    pub message: String,

    #[source_code]
    pub src: miette::NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,

    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    /// Build a diagnostic from a TOML error against the file's content.
    #[must_use]
    pub fn from_toml(path: &Path, content: &str, error: &toml::de::Error) -> Self {
        Self {
            message: format!("invalid config file {}", path.display()),
            src: miette::NamedSource::new(path.display().to_string(), content.to_string()),
            span: error.span().map(SourceSpan::from),
            help: Some(error.message().to_string()),
        }
    }

    /// Render with miette's graphical handler, without colors when
    /// `plain` is set.
    #[must_use]
    pub fn render(&self, plain: bool) -> String {
        let theme = if plain {
            miette::GraphicalTheme::unicode_nocolor()
        } else {
            miette::GraphicalTheme::default()
        };
        let handler = miette::GraphicalReportHandler::new_themed(theme);
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, self) {
            Ok(()) => rendered,
            Err(_) => self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_the_toml_error_span() {
        let content = "name = \"c1\"\npublish_ports = maybe\n";
        let error = toml::from_str::<toml::Value>(content).unwrap_err();
        let diagnostic = ConfigDiagnostic::from_toml(Path::new("clp.toml"), content, &error);

        let span = diagnostic.span.unwrap();
        assert!(span.offset() >= content.find("publish_ports").unwrap());
        assert!(diagnostic.message.contains("clp.toml"));
    }

    #[test]
    fn plain_rendering_includes_source_line() {
        let content = "name = \"c1\"\npublish_ports = maybe\n";
        let error = toml::from_str::<toml::Value>(content).unwrap_err();
        let rendered = ConfigDiagnostic::from_toml(Path::new("clp.toml"), content, &error)
            .render(true);

        assert!(rendered.contains("publish_ports = maybe"));
        assert!(rendered.contains("clpctl::config"));
    }
}
