//! Template resolution - substitutes parameter regions with their values

use tracing::{debug, trace, warn};

use crate::config::ResolverConfig;
use crate::error::ArgumentError;
use crate::params::Parameters;

use super::check::{self, TemplateIssue};
use super::declare;
use super::scanner::{Region, Scanner, Segment};

/// Outcome of resolving one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved text
    pub output: String,

    /// Names with no value and no default, left in place verbatim
    pub unresolved: Vec<String>,

    /// Names whose expansion led back to themselves
    pub cycles: Vec<String>,

    /// Whether some region was left in place because the depth bound was hit
    pub depth_exceeded: bool,
}

impl Resolution {
    /// Whether every region in the template was substituted
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty() && self.cycles.is_empty() && !self.depth_exceeded
    }
}

/// Resolves templates against parameter values.
///
/// The resolver holds only its immutable configuration, so one instance can
/// be shared by any number of threads. Each call keeps its own scan state.
/// Parameters must not be mutated while a call that reads them is running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve every region of `template`.
    ///
    /// Never fails: missing names without defaults, unterminated regions,
    /// reference cycles and over-deep expansions are all left as written.
    pub fn resolve<P: Parameters + ?Sized>(&self, template: &str, params: &P) -> String {
        self.resolve_with_report(template, params).output
    }

    /// Resolve `template` and report what could not be substituted
    pub fn resolve_with_report<P: Parameters + ?Sized>(
        &self,
        template: &str,
        params: &P,
    ) -> Resolution {
        let mut pass = Pass::new(&self.config, params);
        let output = pass.expand(template, true, 0);
        pass.finish(output)
    }

    /// Report unterminated and unresolvable regions of `template`
    pub fn check<P: Parameters + ?Sized>(&self, template: &str, params: &P) -> Vec<TemplateIssue> {
        check::check(&self.config, template, |region| {
            let mut pass = Pass::new(&self.config, params);
            let output = pass.expand(region, true, 0);
            pass.finish(output)
        })
    }

    /// Format `key` as a parameter reference, e.g. `{key}`
    pub fn declare_parameter(&self, key: &str) -> Result<String, ArgumentError> {
        declare::declare(&self.config, key)
    }

    /// Format `key` as a parameter reference with a default, e.g. `{key:-value}`.
    ///
    /// A missing default still produces the with-default form, `{key:-}`.
    pub fn declare_parameter_with_default(
        &self,
        key: &str,
        default: Option<&str>,
    ) -> Result<String, ArgumentError> {
        declare::declare_with_default(&self.config, key, default)
    }
}

/// State of a single resolution call
struct Pass<'a, P: ?Sized> {
    config: &'a ResolverConfig,
    params: &'a P,
    /// Names whose values are being expanded (for cycle detection)
    expanding: Vec<String>,
    unresolved: Vec<String>,
    cycles: Vec<String>,
    depth_exceeded: bool,
}

impl<'a, P: Parameters + ?Sized> Pass<'a, P> {
    fn new(config: &'a ResolverConfig, params: &'a P) -> Self {
        Self {
            config,
            params,
            expanding: Vec::new(),
            unresolved: Vec::new(),
            cycles: Vec::new(),
            depth_exceeded: false,
        }
    }

    fn finish(self, output: String) -> Resolution {
        Resolution {
            output,
            unresolved: self.unresolved,
            cycles: self.cycles,
            depth_exceeded: self.depth_exceeded,
        }
    }

    /// Expand all regions of `text`.
    ///
    /// Escapes are only honoured in template text; substituted values are
    /// scanned with the escape character treated as plain text.
    fn expand(&mut self, text: &str, escapes: bool, depth: usize) -> String {
        let config = self.config;
        let mut scanner = Scanner::new(text, config);
        if !escapes {
            scanner = scanner.without_escapes();
        }

        let mut out = String::with_capacity(text.len());
        for segment in scanner {
            match segment {
                Segment::Literal(literal) => out.push_str(literal),
                Segment::Unterminated { text: rest, .. } => out.push_str(rest),
                Segment::Escaped { escape, prefix } => {
                    if config.preserves_escapes() {
                        out.push_str(escape);
                    }
                    out.push_str(prefix);
                }
                Segment::Region(region) => self.expand_region(&region, escapes, depth, &mut out),
            }
        }
        out
    }

    fn expand_region(
        &mut self,
        region: &Region<'_>,
        escapes: bool,
        depth: usize,
        out: &mut String,
    ) {
        if depth >= self.config.max_depth() {
            warn!(region = region.raw, depth, "recursion bound reached, leaving region unresolved");
            self.depth_exceeded = true;
            out.push_str(region.raw);
            return;
        }

        let name = self.expand(region.name, escapes, depth + 1);

        if self.expanding.contains(&name) {
            debug!(
                name = %name,
                chain = ?self.expanding,
                "reference cycle, leaving region unresolved"
            );
            push_unique(&mut self.cycles, &name);
            out.push_str(region.raw);
            return;
        }

        // An empty name never matches a parameter
        let params = self.params;
        let value = if name.is_empty() {
            None
        } else {
            params.lookup(&name)
        };

        match (value, region.default) {
            (Some(value), _) => {
                trace!(name = %name, "substituting parameter");
                self.expanding.push(name);
                let expanded = self.expand(&value, false, depth + 1);
                self.expanding.pop();
                out.push_str(&expanded);
            }
            (None, Some(default)) => {
                trace!(name = %name, "substituting default value");
                let expanded = self.expand(default, escapes, depth + 1);
                out.push_str(&expanded);
            }
            (None, None) => {
                trace!(name = %name, "no value for parameter");
                push_unique(&mut self.unresolved, &name);
                out.push_str(region.raw);
            }
        }
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn resolve(template: &str, pairs: &[(&str, &str)]) -> String {
        Resolver::default().resolve(template, &params(pairs))
    }

    #[test]
    fn test_simple_substitution() {
        assert_eq!(resolve("the key {k1} is ok", &[("k1", "v1")]), "the key v1 is ok");
    }

    #[test]
    fn test_multiple_substitutions_and_defaults() {
        let result = resolve(
            "a {k1} b {k2} c {k3:-v3} d {k4} e {k5:-v5} f {k6:-v7}",
            &[("k1", "v1"), ("k2", "v2"), ("k4", "v4"), ("k6", "v6")],
        );
        assert_eq!(result, "a v1 b v2 c v3 d v4 e v5 f v6");
    }

    #[test]
    fn test_default_fallback() {
        assert_eq!(resolve("{k:-d}", &[]), "d");
        assert_eq!(resolve("{k:-d}", &[("k", "x")]), "x");
    }

    #[test]
    fn test_missing_without_default_is_verbatim() {
        assert_eq!(resolve("{k}", &[]), "{k}");
    }

    #[test]
    fn test_unresolved_region_is_not_normalized() {
        // The nested name resolves to "ab" but the region is emitted as written
        assert_eq!(resolve("x {a{b}} y", &[("b", "b")]), "x {a{b}} y");
    }

    #[test]
    fn test_recursive_value_chain() {
        let result = resolve("a {k1} b", &[("k1", "{k2}"), ("k2", "{k3}"), ("k3", "k4")]);
        assert_eq!(result, "a k4 b");
    }

    #[test]
    fn test_nested_key_construction() {
        let result = resolve("a k{k{k{v}}} b", &[("v", "1"), ("k1", "2"), ("k2", "3")]);
        assert_eq!(result, "a k3 b");
    }

    #[test]
    fn test_nested_keys_values_and_defaults_together() {
        let result = resolve(
            "a k{k{k{v}}} b {k2} c {k3:-default}",
            &[("v", "1"), ("k1", "2"), ("k2", "3")],
        );
        assert_eq!(result, "a k3 b 3 c default");
    }

    #[test]
    fn test_default_is_itself_resolved() {
        assert_eq!(resolve("{k:-{x}!}", &[("x", "fallback")]), "fallback!");
        assert_eq!(resolve("{k:-{x:-deep}}", &[]), "deep");
    }

    #[test]
    fn test_default_value_resolving_to_reference() {
        assert_eq!(resolve("{k:-{x}}", &[("x", "{y}"), ("y", "z")]), "z");
    }

    #[test]
    fn test_unterminated_regions() {
        assert_eq!(resolve("{open", &[("open", "another")]), "{open");
        assert_eq!(
            resolve("{hey:-oops} {open:-secondOops", &[("open", "closed")]),
            "oops {open:-secondOops"
        );
        assert_eq!(
            resolve("{hey:-oops} {open:-secondOops {open}", &[("open", "closed")]),
            "oops {open:-secondOops {open}"
        );
    }

    #[test]
    fn test_empty_name_is_unresolved() {
        assert_eq!(resolve("a {} b", &[("", "nothing")]), "a {} b");
        assert_eq!(resolve("{:-fallback}", &[]), "fallback");
    }

    #[test]
    fn test_escaped_prefix_preserved() {
        assert_eq!(resolve("\\{k} {k}", &[("k", "v")]), "\\{k} v");
    }

    #[test]
    fn test_escaped_prefix_consumed() {
        let config = ResolverConfig::builder()
            .with_preserve_escapes(false)
            .build()
            .unwrap();
        let resolver = Resolver::new(config);
        let result = resolver.resolve("\\{k} {k}", &params(&[("k", "v")]));
        assert_eq!(result, "{k} v");
    }

    #[test]
    fn test_escape_in_values_is_not_reinterpreted() {
        let config = ResolverConfig::builder()
            .with_preserve_escapes(false)
            .build()
            .unwrap();
        let resolver = Resolver::new(config);
        let result = resolver.resolve("{k}", &params(&[("k", "\\{x}"), ("x", "X")]));
        assert_eq!(result, "\\X");
    }

    #[test]
    fn test_two_key_cycle_terminates() {
        let resolver = Resolver::default();
        let values = params(&[("k1", "{k2}"), ("k2", "{k1}")]);
        let report = resolver.resolve_with_report("{k1}", &values);
        assert_eq!(report.output, "{k1}");
        assert_eq!(report.cycles, vec!["k1"]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_self_reference_terminates() {
        assert_eq!(resolve("{k}", &[("k", "again {k}")]), "again {k}");
    }

    #[test]
    fn test_repeated_non_cyclic_reference_is_fine() {
        assert_eq!(resolve("{a}", &[("a", "{b}{b}"), ("b", "x")]), "xx");
    }

    #[test]
    fn test_depth_bound() {
        let config = ResolverConfig::builder().with_max_depth(3).build().unwrap();
        let resolver = Resolver::new(config);
        let values = params(&[("a", "{b}"), ("b", "{c}"), ("c", "{d}"), ("d", "end")]);

        let report = resolver.resolve_with_report("{a}", &values);
        assert!(report.depth_exceeded);
        assert_eq!(report.output, "{d}");

        let deep = Resolver::default().resolve_with_report("{a}", &values);
        assert_eq!(deep.output, "end");
        assert!(deep.is_complete());
    }

    #[test]
    fn test_report_collects_unresolved_once() {
        let report = Resolver::default().resolve_with_report("{a} {b} {a}", &params(&[("b", "1")]));
        assert_eq!(report.output, "{a} 1 {a}");
        assert_eq!(report.unresolved, vec!["a"]);
    }

    #[test]
    fn test_literal_pass_through() {
        let text = "no regions here: } :- \\ at all";
        assert_eq!(resolve(text, &[("k", "v")]), text);
    }

    #[test]
    fn test_idempotent_on_resolved_output() {
        let values = params(&[("k1", "v1"), ("k2", "{k1}")]);
        let resolver = Resolver::default();
        let once = resolver.resolve("x {k2} {missing} {k3:-d}", &values);
        let twice = resolver.resolve(&once, &values);
        assert_eq!(once, "x v1 {missing} d");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_tokens() {
        let config = ResolverConfig::new("${", "}", ":", '$', true).unwrap();
        let resolver = Resolver::new(config);
        let result = resolver.resolve("${user:guest} has ${n} items", &params(&[("n", "3")]));
        assert_eq!(result, "guest has 3 items");
    }

    #[test]
    fn test_declare_through_resolver() {
        let resolver = Resolver::default();
        assert_eq!(resolver.declare_parameter("hello").unwrap(), "{hello}");
        assert_eq!(
            resolver
                .declare_parameter_with_default("hello", Some("defaultValue"))
                .unwrap(),
            "{hello:-defaultValue}"
        );
    }

    #[test]
    fn test_declared_parameter_round_trips_through_resolve() {
        let resolver = Resolver::default();
        let template = resolver
            .declare_parameter_with_default("name", Some("friend"))
            .unwrap();
        assert_eq!(resolver.resolve(&template, &params(&[])), "friend");
        assert_eq!(resolver.resolve(&template, &params(&[("name", "Ada")])), "Ada");
    }
}
