//! `jira-org` converts text between Jira wiki markup and Org-mode markup.
//! Conversions are pure functions over a string; heading levels produced by
//! the Jira→Org direction are returned as metadata for the caller to place.

/// Fenced block recognition and rendering.
pub mod blocks;
/// Command-line argument parsing for the `jira-org` binary.
pub mod cli;
/// Runtime configuration loading and validation.
pub mod config;
/// The Jira→Org and Org→Jira pipelines.
pub mod convert;
/// Heading level translation and materialization.
pub mod heading;
/// Inline emphasis, code and link substitution.
pub mod inline;
/// Line classification for both dialects.
pub mod line;
/// Link syntax helpers.
pub mod links;
/// List nesting and numbering state.
pub mod lists;
/// Logging helpers used by the binary.
pub mod logging;
/// Per-conversion counters.
pub mod metrics;

pub use convert::{jira_to_org, org_to_jira, org_to_jira_with, Conversion, ConvertOptions};
pub use heading::{HeadingMark, HeadingPolicy};
