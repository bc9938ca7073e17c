//! Tool definitions and registry for MCP server.
//!
//! Each tool is a thin adapter: it decodes its JSON arguments, calls one
//! operation from [`crate::project`], and renders the outcome as text.
//! Operation failures become `isError` results carrying the diagnostic;
//! only malformed arguments surface as JSON-RPC errors.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, ProjectError, Result};
use crate::project::{self, CommandDispatcher, FileKind};
use crate::protocol::{ToolCallResult, ToolDefinition};

/// Tool trait for implementing MCP tools.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
        context: &ToolContext,
    ) -> Result<ToolCallResult>;
}

/// Which family of tools a server instance exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Toolset {
    /// Vue component exploration and authoring.
    Frontend,
    /// JUnit/Selenium test generation support.
    Tests,
}

impl Toolset {
    /// Server name reported during initialization.
    pub fn server_name(self) -> &'static str {
        match self {
            Toolset::Frontend => "frontend-architect",
            Toolset::Tests => "universal-tests-provider",
        }
    }
}

/// Context passed to tools during execution.
pub struct ToolContext {
    /// Root used by tools whose `project_root` argument is optional.
    pub default_root: PathBuf,
    /// Build command runner.
    pub dispatcher: CommandDispatcher,
}

impl ToolContext {
    /// Create a new tool context rooted at `default_root`.
    pub fn new(default_root: impl Into<PathBuf>) -> Self {
        Self {
            default_root: default_root.into(),
            dispatcher: CommandDispatcher::new(),
        }
    }
}

/// Registry of available tools.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    context: Arc<ToolContext>,
}

impl ToolRegistry {
    /// Create a registry with the tools of `toolset`.
    pub fn new(toolset: Toolset, context: ToolContext) -> Self {
        let builtin: Vec<Arc<dyn Tool>> = match toolset {
            Toolset::Frontend => vec![
                Arc::new(ListFilesTool::COMPONENTS),
                Arc::new(ReadFileTool::COMPONENT),
                Arc::new(WriteFileTool::COMPONENT),
                Arc::new(DetectFrameworkTool),
                Arc::new(SuggestComponentTool),
            ],
            Toolset::Tests => vec![
                Arc::new(ListFilesTool::JAVA_CLASSES),
                Arc::new(ReadFileTool::JAVA_CLASS),
                Arc::new(WriteFileTool::JAVA_TEST),
                Arc::new(FindExistingTestTool),
                Arc::new(RunProjectCommandTool),
                Arc::new(ListFilesTool::MARKUP),
                Arc::new(AnalyzePageElementsTool),
            ],
        };

        let mut registry = Self {
            tools: HashMap::new(),
            context: Arc::new(context),
        };
        for tool in builtin {
            registry.register(tool);
        }
        registry
    }

    /// Get tool definitions, sorted by name.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        let mut tools: Vec<ToolDefinition> = self.tools.values().map(|t| t.definition()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, arguments: serde_json::Value) -> Result<ToolCallResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))?;

        tracing::info!("Executing tool {}", name);
        tool.execute(arguments, &self.context).await
    }

    /// Register a custom tool.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name.clone();
        self.tools.insert(name, tool);
    }
}

fn parse_args<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| Error::InvalidParams(e.to_string()))
}

/// Renders an operation failure as an `isError` tool result.
fn failure(tool: &str, err: ProjectError) -> ToolCallResult {
    tracing::warn!("Tool {} failed ({}): {}", tool, err.kind(), err);
    ToolCallResult::error_text(err.to_string())
}

fn path_property(description: &str) -> serde_json::Value {
    json!({ "type": "string", "description": description })
}

// ============================================================================
// Built-in Tools
// ============================================================================

/// Lists project files of one [`FileKind`].
pub struct ListFilesTool {
    name: &'static str,
    description: &'static str,
    kind: FileKind,
    /// Message returned instead of an empty listing.
    empty_message: Option<&'static str>,
    /// Whether `project_root` may be omitted in favour of the server root.
    root_optional: bool,
}

impl ListFilesTool {
    const COMPONENTS: Self = Self {
        name: "list_component_vue",
        description: "Return the list of all components (.vue, .js, .ts, .css, .json) in a Vue.js project, relative to the project root.",
        kind: FileKind::Frontend,
        empty_message: None,
        root_optional: false,
    };

    const JAVA_CLASSES: Self = Self {
        name: "list_java_classes",
        description: "List all production Java classes in a Spring Boot project, relative to the project root.",
        kind: FileKind::Backend,
        empty_message: Some("No classes found."),
        root_optional: false,
    };

    const MARKUP: Self = Self {
        name: "list_frontend_files",
        description: "List the absolute paths of all HTML/Vue/JSP/JS files of the project, for Selenium test generation.",
        kind: FileKind::Markup,
        empty_message: None,
        root_optional: true,
    };
}

#[derive(Debug, Deserialize)]
struct ListArgs {
    project_root: Option<String>,
}

#[async_trait::async_trait]
impl Tool for ListFilesTool {
    fn definition(&self) -> ToolDefinition {
        let required: &[&str] = if self.root_optional { &[] } else { &["project_root"] };
        ToolDefinition {
            name: self.name.into(),
            description: self.description.into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "project_root": path_property("Root directory of the project")
                },
                "required": required
            }),
        }
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        context: &ToolContext,
    ) -> Result<ToolCallResult> {
        let args: ListArgs = parse_args(arguments)?;
        let root = match args.project_root {
            Some(root) => PathBuf::from(root),
            None if self.root_optional => context.default_root.clone(),
            None => {
                return Err(Error::InvalidParams(
                    "missing field `project_root`".into(),
                ))
            }
        };

        let files = match project::scan(&root, self.kind) {
            Ok(files) => files,
            Err(e) => return Ok(failure(self.name, e)),
        };
        tracing::info!("{}: {} file(s) under {}", self.name, files.len(), root.display());

        let text = match (files.is_empty(), self.empty_message) {
            (true, Some(message)) => message.to_string(),
            _ => files.join("\n"),
        };
        Ok(ToolCallResult::text(text))
    }
}

/// Reads one file relative to a project root.
pub struct ReadFileTool {
    name: &'static str,
    description: &'static str,
}

impl ReadFileTool {
    const COMPONENT: Self = Self {
        name: "read_component_vue",
        description: "Read the source code of a Vue.js component.",
    };

    const JAVA_CLASS: Self = Self {
        name: "read_java_classes",
        description: "Read the source code of a Java class to prepare for test generation.",
    };
}

#[derive(Debug, Deserialize)]
struct ReadArgs {
    project_root: String,
    file_path: String,
}

#[async_trait::async_trait]
impl Tool for ReadFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.into(),
            description: self.description.into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "project_root": path_property("Root directory of the project"),
                    "file_path": path_property("Path of the file, relative to the project root")
                },
                "required": ["project_root", "file_path"]
            }),
        }
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _context: &ToolContext,
    ) -> Result<ToolCallResult> {
        let args: ReadArgs = parse_args(arguments)?;

        Ok(match project::read_file(&args.project_root, &args.file_path) {
            Ok(content) => ToolCallResult::text(content),
            Err(e) => failure(self.name, e),
        })
    }
}

/// Writes one file relative to a project root.
pub struct WriteFileTool {
    name: &'static str,
    description: &'static str,
    content_description: &'static str,
}

impl WriteFileTool {
    const COMPONENT: Self = Self {
        name: "write_new_component",
        description: "Save a generated component to the project filesystem, creating missing folders.",
        content_description: "The component source (e.g. Component.vue) to write",
    };

    const JAVA_TEST: Self = Self {
        name: "write_java_test",
        description: "Save a generated JUnit test class to the project filesystem, creating missing folders.",
        content_description: "The Java code to write",
    };
}

#[derive(Debug, Deserialize)]
struct WriteArgs {
    project_root: String,
    file_path: String,
    code_content: String,
}

#[async_trait::async_trait]
impl Tool for WriteFileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.into(),
            description: self.description.into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "project_root": path_property("Root directory of the project"),
                    "file_path": path_property("Relative path where the file should be saved"),
                    "code_content": {
                        "type": "string",
                        "description": self.content_description
                    }
                },
                "required": ["project_root", "file_path", "code_content"]
            }),
        }
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _context: &ToolContext,
    ) -> Result<ToolCallResult> {
        let args: WriteArgs = parse_args(arguments)?;

        Ok(
            match project::write_file(&args.project_root, &args.file_path, &args.code_content) {
                Ok(message) => ToolCallResult::text(message),
                Err(e) => failure(self.name, e),
            },
        )
    }
}

/// Looks up the unit test of a production class.
pub struct FindExistingTestTool;

#[derive(Debug, Deserialize)]
struct FindTestArgs {
    project_root: String,
    class_name: String,
}

#[async_trait::async_trait]
impl Tool for FindExistingTestTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "find_existing_test".into(),
            description: "Find an existing test for a class: for 'UserService' it looks for 'UserServiceTest.java' under src/test/java.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "project_root": path_property("Root directory of the project"),
                    "class_name": {
                        "type": "string",
                        "description": "Simple class name, with or without the .java suffix"
                    }
                },
                "required": ["project_root", "class_name"]
            }),
        }
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _context: &ToolContext,
    ) -> Result<ToolCallResult> {
        let args: FindTestArgs = parse_args(arguments)?;
        let lookup = project::find_existing_test(&args.project_root, &args.class_name);
        Ok(ToolCallResult::text(lookup.to_string()))
    }
}

/// Runs a Maven or npm action in a project directory.
pub struct RunProjectCommandTool;

#[derive(Debug, Deserialize)]
struct RunCommandArgs {
    work_dir: String,
    command_type: String,
}

#[async_trait::async_trait]
impl Tool for RunProjectCommandTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "run_project_command".into(),
            description: "Execute a build command based on the project type (Maven if pom.xml exists, otherwise npm if package.json exists).".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "work_dir": path_property("The root directory of the project"),
                    "command_type": {
                        "type": "string",
                        "description": "The action to perform (e.g. 'test', 'install')"
                    }
                },
                "required": ["work_dir", "command_type"]
            }),
        }
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        context: &ToolContext,
    ) -> Result<ToolCallResult> {
        let args: RunCommandArgs = parse_args(arguments)?;
        if args.command_type.trim().is_empty() {
            return Err(Error::InvalidParams("command_type must not be empty".into()));
        }

        // The child is waited on synchronously; keep it off the stdio loop's worker.
        let dispatcher = context.dispatcher.clone();
        let work_dir = PathBuf::from(args.work_dir);
        let action = args.command_type.trim().to_string();
        let outcome = tokio::task::spawn_blocking(move || dispatcher.run(&work_dir, &action))
            .await
            .map_err(|e| Error::Internal(format!("run_project_command task failed: {}", e)))?;

        Ok(match outcome {
            Ok(result) => ToolCallResult::text(result.to_string()),
            Err(e) => failure("run_project_command", e),
        })
    }
}

/// Extracts interactive element selectors from a markup file.
pub struct AnalyzePageElementsTool;

#[derive(Debug, Deserialize)]
struct AnalyzeArgs {
    file_path: String,
}

#[async_trait::async_trait]
impl Tool for AnalyzePageElementsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "analyze_page_elements".into(),
            description: "Collect id, name, class, type and text of the interactive elements (input, button, a, select, textarea) of a web file, to write Selenium scripts.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "file_path": path_property("Path of the HTML/Vue/JSP file")
                },
                "required": ["file_path"]
            }),
        }
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _context: &ToolContext,
    ) -> Result<ToolCallResult> {
        let args: AnalyzeArgs = parse_args(arguments)?;

        let result = project::extract_selectors(&args.file_path);
        if let Err(ref e) = result {
            tracing::warn!("analyze_page_elements failed ({}): {}", e.kind(), e);
        }
        let body = serde_json::to_string_pretty(&project::markup::summary_to_json(&result))?;

        Ok(ToolCallResult {
            content: vec![crate::protocol::ContentItem::text(body)],
            is_error: result.is_err(),
        })
    }
}

/// Reports which frontend framework a project uses.
pub struct DetectFrameworkTool;

#[derive(Debug, Deserialize)]
struct DetectFrameworkArgs {
    project_root: String,
}

#[async_trait::async_trait]
impl Tool for DetectFrameworkTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "detect_frontend_framework".into(),
            description: "Detect the frontend framework from package.json: vue, angular, generic, or unknown when there is no package.json.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "project_root": path_property("Root directory of the project")
                },
                "required": ["project_root"]
            }),
        }
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _context: &ToolContext,
    ) -> Result<ToolCallResult> {
        let args: DetectFrameworkArgs = parse_args(arguments)?;

        Ok(match project::detect_framework(&args.project_root) {
            Ok(framework) => ToolCallResult::text(framework.to_string()),
            Err(e) => failure("detect_frontend_framework", e),
        })
    }
}

/// Suggests where a new Vue component goes and its skeleton.
pub struct SuggestComponentTool;

#[derive(Debug, Deserialize)]
struct SuggestComponentArgs {
    component_name: String,
}

#[async_trait::async_trait]
impl Tool for SuggestComponentTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "suggest_vue_component".into(),
            description: "Suggest the path (src/components/<Name>.vue) and a boilerplate for a new Vue component.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "component_name": {
                        "type": "string",
                        "description": "Component name in PascalCase"
                    }
                },
                "required": ["component_name"]
            }),
        }
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _context: &ToolContext,
    ) -> Result<ToolCallResult> {
        let args: SuggestComponentArgs = parse_args(arguments)?;
        if args.component_name.trim().is_empty() {
            return Err(Error::InvalidParams("component_name must not be empty".into()));
        }

        let suggestion = project::suggest_vue_component(&args.component_name);
        Ok(ToolCallResult::text(serde_json::to_string_pretty(&suggestion)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn registry(toolset: Toolset, root: &Path) -> ToolRegistry {
        ToolRegistry::new(toolset, ToolContext::new(root))
    }

    #[test]
    fn test_toolsets_expose_distinct_tools() {
        let dir = tempfile::tempdir().unwrap();

        let names = |toolset| {
            registry(toolset, dir.path())
                .list_tools()
                .into_iter()
                .map(|t| t.name)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            names(Toolset::Frontend),
            vec![
                "detect_frontend_framework",
                "list_component_vue",
                "read_component_vue",
                "suggest_vue_component",
                "write_new_component",
            ]
        );
        assert_eq!(
            names(Toolset::Tests),
            vec![
                "analyze_page_elements",
                "find_existing_test",
                "list_frontend_files",
                "list_java_classes",
                "read_java_classes",
                "run_project_command",
                "write_java_test",
            ]
        );
    }

    #[test]
    fn test_list_java_classes_empty_message() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(Toolset::Tests, dir.path());

        let result = tokio_test::block_on(registry.execute(
            "list_java_classes",
            json!({ "project_root": dir.path() }),
        ))
        .unwrap();
        assert!(!result.is_error);
        assert_eq!(result.content[0].as_text(), "No classes found.");
    }

    #[test]
    fn test_list_frontend_files_defaults_to_server_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<button>Go</button>").unwrap();
        let registry = registry(Toolset::Tests, dir.path());

        let result =
            tokio_test::block_on(registry.execute("list_frontend_files", json!({}))).unwrap();
        let text = result.content[0].as_text();
        assert!(Path::new(text).is_absolute());
        assert!(text.ends_with("index.html"));
    }

    #[test]
    fn test_missing_required_argument_is_invalid_params() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(Toolset::Frontend, dir.path());

        let err = tokio_test::block_on(registry.execute("list_component_vue", json!({})))
            .unwrap_err();
        assert_eq!(err.code(), crate::error::codes::INVALID_PARAMS);

        let err = tokio_test::block_on(
            registry.execute("read_component_vue", json!({ "project_root": "." })),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));
    }

    #[test]
    fn test_unknown_tool() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(Toolset::Frontend, dir.path());

        let err = tokio_test::block_on(registry.execute("list_java_classes", json!({})))
            .unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_run_project_command_unsupported_project() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(Toolset::Tests, dir.path());

        let result = registry
            .execute(
                "run_project_command",
                json!({ "work_dir": dir.path(), "command_type": "test" }),
            )
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(result.content[0]
            .as_text()
            .starts_with("Error: No supported build tool"));
    }

    #[tokio::test]
    async fn test_run_project_command_rejects_blank_action() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(Toolset::Tests, dir.path());

        let err = registry
            .execute(
                "run_project_command",
                json!({ "work_dir": dir.path(), "command_type": "  " }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));
    }
}
