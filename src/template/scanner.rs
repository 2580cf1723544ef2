//! Template scanner - splits a template into literal text and parameter regions

use std::ops::Range;

use crate::config::ResolverConfig;

/// A balanced `prefix ... suffix` region found in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region<'a> {
    /// Byte range of the whole region, delimiters included
    pub span: Range<usize>,
    /// The region exactly as written
    pub raw: &'a str,
    /// Name expression: inner text before the first top-level default delimiter
    pub name: &'a str,
    /// Default expression, if a top-level default delimiter was present
    pub default: Option<&'a str>,
}

/// One left-to-right piece of a scanned template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text with no region in it
    Literal(&'a str),
    /// A prefix made literal by the escape character written before it
    Escaped { escape: &'a str, prefix: &'a str },
    /// A well-formed region
    Region(Region<'a>),
    /// A prefix that is never closed; the text runs to the end of the template
    Unterminated { text: &'a str, start: usize },
}

/// Lazy scanner over a template.
///
/// Nested prefix/suffix pairs raise and lower the depth; a region closes only
/// on the suffix that brings the depth back to where it opened. With escapes
/// enabled, a prefix written right after the escape character neither opens a
/// region nor counts towards nesting.
#[derive(Debug, Clone)]
pub struct Scanner<'t, 'c> {
    template: &'t str,
    prefix: &'c str,
    suffix: &'c str,
    delimiter: &'c str,
    escape: Option<char>,
    pos: usize,
}

impl<'t, 'c> Scanner<'t, 'c> {
    /// Scan `template` with the tokens of `config`, honouring escapes
    pub fn new(template: &'t str, config: &'c ResolverConfig) -> Self {
        Self {
            template,
            prefix: config.prefix(),
            suffix: config.suffix(),
            delimiter: config.default_delimiter(),
            escape: Some(config.escape()),
            pos: 0,
        }
    }

    /// Treat the escape character as ordinary text
    pub fn without_escapes(mut self) -> Self {
        self.escape = None;
        self
    }

    /// Length of the escaped prefix at the start of `text`, if there is one
    fn escaped_prefix_len(&self, text: &str) -> Option<usize> {
        let escape = self.escape?;
        let after = text.strip_prefix(escape)?;
        after
            .starts_with(self.prefix)
            .then(|| escape.len_utf8() + self.prefix.len())
    }

    /// Byte offset of the next escaped or plain prefix after `from`
    fn next_marker(&self, from: usize) -> Option<usize> {
        let found = from + self.template[from..].find(self.prefix)?;
        match self.escape {
            Some(escape)
                if found - from >= escape.len_utf8()
                    && self.template[from..found].ends_with(escape) =>
            {
                Some(found - escape.len_utf8())
            }
            _ => Some(found),
        }
    }

    /// End offset of the region opened at `start`, or `None` if it never closes
    fn close(&self, start: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = start + self.prefix.len();

        while i < self.template.len() {
            let rest = &self.template[i..];
            if let Some(len) = self.escaped_prefix_len(rest) {
                i += len;
            } else if rest.starts_with(self.prefix) {
                depth += 1;
                i += self.prefix.len();
            } else if rest.starts_with(self.suffix) {
                if depth == 0 {
                    return Some(i + self.suffix.len());
                }
                depth -= 1;
                i += self.suffix.len();
            } else {
                i += char_len(rest);
            }
        }
        None
    }

    /// Split a region body on its first top-level default delimiter
    fn split_default(&self, inner: &'t str) -> (&'t str, Option<&'t str>) {
        let mut depth = 0usize;
        let mut i = 0;

        while i < inner.len() {
            let rest = &inner[i..];
            if let Some(len) = self.escaped_prefix_len(rest) {
                i += len;
            } else if rest.starts_with(self.prefix) {
                depth += 1;
                i += self.prefix.len();
            } else if rest.starts_with(self.suffix) {
                depth = depth.saturating_sub(1);
                i += self.suffix.len();
            } else if depth == 0 && rest.starts_with(self.delimiter) {
                return (&inner[..i], Some(&inner[i + self.delimiter.len()..]));
            } else {
                i += char_len(rest);
            }
        }
        (inner, None)
    }

    fn region(&self, start: usize, end: usize) -> Region<'t> {
        let inner = &self.template[start + self.prefix.len()..end - self.suffix.len()];
        let (name, default) = self.split_default(inner);
        Region {
            span: start..end,
            raw: &self.template[start..end],
            name,
            default,
        }
    }
}

impl<'t> Iterator for Scanner<'t, '_> {
    type Item = Segment<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        if start >= self.template.len() {
            return None;
        }
        let rest = &self.template[start..];

        if let Some(len) = self.escaped_prefix_len(rest) {
            self.pos += len;
            let escape_len = len - self.prefix.len();
            return Some(Segment::Escaped {
                escape: &rest[..escape_len],
                prefix: &rest[escape_len..len],
            });
        }

        if rest.starts_with(self.prefix) {
            return Some(match self.close(start) {
                Some(end) => {
                    self.pos = end;
                    Segment::Region(self.region(start, end))
                }
                None => {
                    self.pos = self.template.len();
                    Segment::Unterminated { text: rest, start }
                }
            });
        }

        let end = self.next_marker(start).unwrap_or(self.template.len());
        self.pos = end;
        Some(Segment::Literal(&self.template[start..end]))
    }
}

fn char_len(text: &str) -> usize {
    text.chars().next().map_or(1, char::len_utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(template: &str) -> Vec<Segment<'_>> {
        Scanner::new(template, &ResolverConfig::default()).collect()
    }

    fn region<'a>(
        span: Range<usize>,
        raw: &'a str,
        name: &'a str,
        default: Option<&'a str>,
    ) -> Segment<'a> {
        Segment::Region(Region {
            span,
            raw,
            name,
            default,
        })
    }

    #[test]
    fn test_segments_outlive_config() {
        let template = String::from("a {b:-c}");
        let segments: Vec<Segment<'_>> = {
            let config = ResolverConfig::builder().with_max_depth(4).build().unwrap();
            Scanner::new(&template, &config).collect()
        };
        assert_eq!(
            segments,
            vec![Segment::Literal("a "), region(2..8, "{b:-c}", "b", Some("c"))]
        );
    }

    #[test]
    fn test_plain_text_is_one_literal() {
        assert_eq!(scan("hello world"), vec![Segment::Literal("hello world")]);
    }

    #[test]
    fn test_empty_template_yields_nothing() {
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_simple_region() {
        assert_eq!(
            scan("the key {k1} is ok"),
            vec![
                Segment::Literal("the key "),
                region(8..12, "{k1}", "k1", None),
                Segment::Literal(" is ok"),
            ]
        );
    }

    #[test]
    fn test_region_with_default() {
        assert_eq!(
            scan("{k3:-v3}"),
            vec![region(0..8, "{k3:-v3}", "k3", Some("v3"))]
        );
    }

    #[test]
    fn test_empty_default_is_still_a_default() {
        assert_eq!(scan("{k:-}"), vec![region(0..5, "{k:-}", "k", Some(""))]);
    }

    #[test]
    fn test_nested_regions_close_at_matching_depth() {
        assert_eq!(
            scan("a k{k{k{v}}} b"),
            vec![
                Segment::Literal("a k"),
                region(3..12, "{k{k{v}}}", "k{k{v}}", None),
                Segment::Literal(" b"),
            ]
        );
    }

    #[test]
    fn test_default_split_ignores_nested_delimiters() {
        assert_eq!(
            scan("{a{b:-c}d:-e}"),
            vec![region(0..13, "{a{b:-c}d:-e}", "a{b:-c}d", Some("e"))]
        );
        assert_eq!(
            scan("{k:-{x:-y}}"),
            vec![region(0..11, "{k:-{x:-y}}", "k", Some("{x:-y}"))]
        );
    }

    #[test]
    fn test_default_splits_on_first_delimiter_only() {
        assert_eq!(
            scan("{k:-a:-b}"),
            vec![region(0..9, "{k:-a:-b}", "k", Some("a:-b"))]
        );
    }

    #[test]
    fn test_unterminated_region_swallows_the_rest() {
        assert_eq!(
            scan("{hey:-oops} {open:-secondOops {open}"),
            vec![
                region(0..11, "{hey:-oops}", "hey", Some("oops")),
                Segment::Literal(" "),
                Segment::Unterminated {
                    text: "{open:-secondOops {open}",
                    start: 12,
                },
            ]
        );
    }

    #[test]
    fn test_escaped_prefix() {
        assert_eq!(
            scan("a\\{k} b"),
            vec![
                Segment::Literal("a"),
                Segment::Escaped {
                    escape: "\\",
                    prefix: "{",
                },
                Segment::Literal("k} b"),
            ]
        );
    }

    #[test]
    fn test_escaped_prefix_does_not_nest() {
        assert_eq!(
            scan("{a\\{b}"),
            vec![region(0..6, "{a\\{b}", "a\\{b", None)]
        );
    }

    #[test]
    fn test_without_escapes_treats_escape_as_text() {
        let config = ResolverConfig::default();
        let segments: Vec<_> = Scanner::new("\\{k}", &config).without_escapes().collect();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("\\"),
                Segment::Region(Region {
                    span: 1..4,
                    raw: "{k}",
                    name: "k",
                    default: None,
                }),
            ]
        );
    }

    #[test]
    fn test_multi_byte_tokens_and_text() {
        let config = ResolverConfig::builder()
            .with_prefix("«")
            .with_suffix("»")
            .with_default_delimiter("|")
            .build()
            .unwrap();
        let segments: Vec<_> = Scanner::new("héllo «nämé|dé» ✓", &config).collect();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("héllo "),
                Segment::Region(Region {
                    span: 7..21,
                    raw: "«nämé|dé»",
                    name: "nämé",
                    default: Some("dé"),
                }),
                Segment::Literal(" ✓"),
            ]
        );
    }

    #[test]
    fn test_adjacent_regions() {
        assert_eq!(
            scan("{a}{b}"),
            vec![
                region(0..3, "{a}", "a", None),
                region(3..6, "{b}", "b", None),
            ]
        );
    }

    #[test]
    fn test_scanner_is_lazy() {
        let config = ResolverConfig::default();
        let mut scanner = Scanner::new("{a} {b", &config);
        assert!(matches!(scanner.next(), Some(Segment::Region(_))));
        assert_eq!(scanner.next(), Some(Segment::Literal(" ")));
        assert!(matches!(
            scanner.next(),
            Some(Segment::Unterminated { start: 4, .. })
        ));
        assert_eq!(scanner.next(), None);
    }
}
