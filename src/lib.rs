//! MCP server that spellchecks markdown documents.
//!
//! Markdown is stripped of code, links, images, and formatting before
//! checking. Unknown words come back with their most likely correction. The
//! server can also read files from GitHub repositories and open issues
//! listing the errors it finds.

pub mod checker;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod markdown;
pub mod report;
pub mod server;
