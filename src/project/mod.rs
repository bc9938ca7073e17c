//! Project introspection and scaffolding operations.
//!
//! Every function here is synchronous and stateless: it touches the
//! filesystem (or spawns a build process) for the duration of one call and
//! keeps nothing afterwards. Failures come back as [`ProjectError`] values.
//!
//! [`ProjectError`]: crate::error::ProjectError

pub mod command;
pub mod content;
pub mod framework;
pub mod markup;
pub mod scanner;

pub use command::{BuildFamily, CommandDispatcher, CommandResolver, CommandResult, HostResolver};
pub use content::{find_existing_test, read_file, write_file, TestLookup};
pub use framework::{detect_framework, suggest_vue_component, Framework};
pub use markup::{extract_selectors, PageSummary, SelectorRecord};
pub use scanner::{scan, FileKind, PathStyle, EXCLUDED_DIRS};
