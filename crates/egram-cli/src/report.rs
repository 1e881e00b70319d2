//! Parse error reports rendered with ariadne

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use egram_lexer::Span;
use egram_parser::ParseError;
use miette::Diagnostic;
use std::io;
use std::ops::Range;

/// Render `error` as an ariadne report
pub fn render_parse_error(
    filename: &str,
    source: &str,
    error: &ParseError,
    color: bool,
) -> io::Result<String> {
    let range = label_range(error.span(), source.len());
    let label_message = match error {
        ParseError::IllegalCommaList { .. } => "comma not allowed here".to_string(),
        ParseError::IllegalArgumentList { name, .. } => {
            format!("`{}` needs parentheses for more than one argument", name)
        }
        ParseError::UnexpectedToken { expected, .. } => format!("expected {}", expected),
        ParseError::UnterminatedConstruct { construct, .. } => {
            format!("this {} is never closed", construct)
        }
    };

    let mut report = Report::build(ReportKind::Error, filename, range.start)
        .with_config(Config::default().with_color(color))
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, range))
                .with_message(label_message)
                .with_color(Color::Red),
        );
    if let Some(code) = error.code() {
        report = report.with_code(code);
    }
    if let Some(help) = error.help() {
        report = report.with_help(help.to_string());
    }

    let mut out = Vec::new();
    report
        .finish()
        .write((filename, Source::from(source)), &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Empty spans (end of input) are widened to one character so the label
/// has something to point at.
fn label_range(span: Span, source_len: usize) -> Range<usize> {
    if !span.is_empty() {
        return span.into();
    }
    if span.start < source_len {
        span.start..span.start + 1
    } else {
        source_len.saturating_sub(1)..source_len
    }
}
