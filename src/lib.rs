//! # scaffold-mcp
//!
//! MCP (Model Context Protocol) servers that let an AI assistant explore a
//! project and scaffold code and tests inside it.
//!
//! Two toolsets are served by the same binary:
//!
//! - **frontend** (`frontend-architect`): list, read and write Vue.js
//!   components, detect the frontend framework, suggest new components.
//! - **tests** (`universal-tests-provider`): list and read Java classes,
//!   write JUnit tests, look up existing tests, run Maven/npm actions, list
//!   web files and extract their interactive elements for Selenium suites.
//!   Also offers the `junit_test_style` and `create_selenium_suite` prompts
//!   and the `project://summary` resource.
//!
//! ## Usage with VS Code
//!
//! Add to your `.vscode/mcp.json`:
//!
//! ```json
//! {
//!   "servers": {
//!     "tests": {
//!       "command": "scaffold-mcp",
//!       "args": ["--toolset", "tests"]
//!     },
//!     "frontend": {
//!       "command": "scaffold-mcp",
//!       "args": ["--toolset", "frontend"]
//!     }
//!   }
//! }
//! ```
//!
//! ## Trust model
//!
//! Paths supplied by the client are used as given. Nothing stops a
//! `file_path` of `../../etc/passwd`; only point these servers at clients
//! you trust with your filesystem and build tools.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod project;
pub mod prompts;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::{Error, ProjectError, Result};
pub use protocol::{JsonRpcRequest, JsonRpcResponse, McpMessage};
pub use server::McpServer;
pub use tools::{Tool, ToolRegistry, Toolset};
