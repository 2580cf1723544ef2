//! Template diagnostics.
//!
//! Resolution degrades silently; this module explains afterwards which
//! top-level regions of a template were left unresolved and why.

use std::fmt;
use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::config::ResolverConfig;

use super::resolver::Resolution;
use super::scanner::{Scanner, Segment};

/// A problem found in one region of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateIssue {
    pub kind: IssueKind,
    /// Byte range of the offending region in the checked template
    pub span: Range<usize>,
}

/// Category of template problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// A prefix with no matching suffix
    Unterminated,
    /// A name with no value and no default
    Unresolved { name: String },
    /// A value that expands back into its own name
    Cycle { name: String },
    /// Expansion nested deeper than the configured bound
    DepthExceeded,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Unterminated => write!(f, "unterminated parameter region"),
            IssueKind::Unresolved { name } => write!(f, "no value for parameter '{}'", name),
            IssueKind::Cycle { name } => write!(f, "parameter '{}' refers back to itself", name),
            IssueKind::DepthExceeded => write!(f, "parameter nesting exceeds the recursion bound"),
        }
    }
}

impl fmt::Display for TemplateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:?}", self.kind, self.span)
    }
}

impl TemplateIssue {
    fn label(&self) -> &'static str {
        match self.kind {
            IssueKind::Unterminated => "this region is never closed",
            IssueKind::Unresolved { .. } => "left unresolved",
            IssueKind::Cycle { .. } => "expansion cycle",
            IssueKind::DepthExceeded => "nested too deeply",
        }
    }

    /// Format the issue with source context using ariadne
    pub fn format(&self, source: &str, filename: &str, color: bool) -> String {
        let span = char_span(source, &self.span);
        let mut buf = Vec::new();

        let written = Report::build(ReportKind::Warning, filename, span.start)
            .with_config(Config::default().with_color(color))
            .with_message(self.kind.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(self.label())
                    .with_color(Color::Yellow),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Scan the top level of `template`, resolving each region on its own
pub(crate) fn check(
    config: &ResolverConfig,
    template: &str,
    mut resolve_region: impl FnMut(&str) -> Resolution,
) -> Vec<TemplateIssue> {
    let mut issues = Vec::new();

    for segment in Scanner::new(template, config) {
        match segment {
            Segment::Unterminated { text, start } => issues.push(TemplateIssue {
                kind: IssueKind::Unterminated,
                span: start..start + text.len(),
            }),
            Segment::Region(region) => {
                let resolution = resolve_region(region.raw);
                let span = region.span;
                issues.extend(resolution.unresolved.into_iter().map(|name| TemplateIssue {
                    kind: IssueKind::Unresolved { name },
                    span: span.clone(),
                }));
                issues.extend(resolution.cycles.into_iter().map(|name| TemplateIssue {
                    kind: IssueKind::Cycle { name },
                    span: span.clone(),
                }));
                if resolution.depth_exceeded {
                    issues.push(TemplateIssue {
                        kind: IssueKind::DepthExceeded,
                        span,
                    });
                }
            }
            Segment::Literal(_) | Segment::Escaped { .. } => {}
        }
    }
    issues
}

/// ariadne counts characters, spans count bytes
fn char_span(source: &str, span: &Range<usize>) -> Range<usize> {
    let offset = |byte: usize| {
        source
            .get(..byte.min(source.len()))
            .map_or(0, |s| s.chars().count())
    };
    offset(span.start)..offset(span.end)
}
