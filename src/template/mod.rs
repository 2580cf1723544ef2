//! Template engine for parameterized messages
//!
//! A template is plain text with delimited parameter regions. Regions may
//! nest, carry a default value, and be escaped:
//!
//! ```text
//! Hello {name:-friend}, you have {count} new {kind{count}}.
//! \{literal} stays as written.
//! ```
//!
//! Resolution substitutes each region with its parameter value, resolving
//! names and defaults that are themselves templates, and re-resolving
//! substituted values until nothing more changes.

mod check;
mod declare;
mod resolver;
mod scanner;

pub use check::{IssueKind, TemplateIssue};
pub use declare::{declare, declare_with_default};
pub use resolver::{Resolution, Resolver};
pub use scanner::{Region, Scanner, Segment};
