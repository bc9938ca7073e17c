//! Build command dispatch.
//!
//! Detects which build tool a directory uses from its marker file and runs
//! `<tool> <action>` there, capturing output as text. Host-specific program
//! naming lives behind [`CommandResolver`] so the dispatcher itself does not
//! branch on the operating system.

use std::fmt;
use std::path::Path;
use std::process::Command;

use crate::error::ProjectError;

/// Build tool family inferred from a marker file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFamily {
    /// `pom.xml` present.
    Maven,
    /// `package.json` present.
    Npm,
}

impl BuildFamily {
    /// Marker file name for this family.
    pub fn marker(self) -> &'static str {
        match self {
            BuildFamily::Maven => "pom.xml",
            BuildFamily::Npm => "package.json",
        }
    }

    /// Detects the family of `work_dir`. Maven wins when both markers exist.
    pub fn detect(work_dir: &Path) -> Result<Self, ProjectError> {
        [BuildFamily::Maven, BuildFamily::Npm]
            .into_iter()
            .find(|family| work_dir.join(family.marker()).is_file())
            .ok_or(ProjectError::UnsupportedProject)
    }
}

/// Operating system family, as far as command naming is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// Windows: `.cmd` shims resolved through `cmd /C`.
    Windows,
    /// Everything else: executables run directly.
    Unix,
}

impl HostOs {
    /// The OS this process is running on.
    pub fn current() -> Self {
        if std::env::consts::OS == "windows" {
            HostOs::Windows
        } else {
            HostOs::Unix
        }
    }
}

/// A fully resolved process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program handed to the OS.
    pub program: String,
    /// Arguments handed to the OS.
    pub args: Vec<String>,
    /// Command line as reported back to the caller.
    pub display: String,
}

/// Maps a build family and action to a concrete invocation.
pub trait CommandResolver {
    /// Resolves how to run `action` for `family` inside `work_dir`.
    fn resolve(&self, family: BuildFamily, work_dir: &Path, action: &str) -> Invocation;
}

/// Resolver for a real host: prefers a project-local Maven wrapper and
/// applies Windows shim naming.
#[derive(Debug, Clone, Copy)]
pub struct HostResolver {
    os: HostOs,
}

impl HostResolver {
    /// Resolver for the current host.
    pub fn new() -> Self {
        Self::for_os(HostOs::current())
    }

    /// Resolver for an explicit OS family.
    pub fn for_os(os: HostOs) -> Self {
        Self { os }
    }
}

impl Default for HostResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandResolver for HostResolver {
    fn resolve(&self, family: BuildFamily, work_dir: &Path, action: &str) -> Invocation {
        let has_wrapper = work_dir.join("mvnw").is_file();

        let tool = match (family, self.os, has_wrapper) {
            (BuildFamily::Maven, HostOs::Windows, true) => "mvnw.cmd".to_string(),
            (BuildFamily::Maven, HostOs::Unix, true) => {
                work_dir.join("mvnw").to_string_lossy().into_owned()
            }
            (BuildFamily::Maven, _, false) => "mvn".to_string(),
            (BuildFamily::Npm, HostOs::Windows, _) => "npm.cmd".to_string(),
            (BuildFamily::Npm, HostOs::Unix, _) => "npm".to_string(),
        };

        let display = match (family, self.os, has_wrapper) {
            (BuildFamily::Maven, HostOs::Unix, true) => format!("./mvnw {}", action),
            _ => format!("{} {}", tool, action),
        };

        match self.os {
            HostOs::Windows => Invocation {
                program: "cmd".to_string(),
                args: vec!["/C".to_string(), tool, action.to_string()],
                display,
            },
            HostOs::Unix => Invocation {
                program: tool,
                args: vec![action.to_string()],
                display,
            },
        }
    }
}

/// Captured output of a finished build command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Command line as invoked.
    pub command: String,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandResult {
    /// True when the tool wrote anything to standard error.
    pub fn has_stderr(&self) -> bool {
        !self.stderr.is_empty()
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Command: {}", self.command)?;
        writeln!(f, "--- STDOUT ---\n{}", self.stdout)?;
        if self.has_stderr() {
            writeln!(f, "--- STDERR ---\n{}", self.stderr)?;
        }
        Ok(())
    }
}

/// Runs build actions in a project directory.
#[derive(Debug, Clone, Default)]
pub struct CommandDispatcher<R = HostResolver> {
    resolver: R,
}

impl CommandDispatcher<HostResolver> {
    /// Dispatcher for the current host.
    pub fn new() -> Self {
        Self::with_resolver(HostResolver::new())
    }
}

impl<R: CommandResolver> CommandDispatcher<R> {
    /// Dispatcher with a custom resolver.
    pub fn with_resolver(resolver: R) -> Self {
        Self { resolver }
    }

    /// Detects the build family of `work_dir` and resolves the invocation
    /// for `action` without running anything.
    pub fn plan(&self, work_dir: &Path, action: &str) -> Result<Invocation, ProjectError> {
        let family = BuildFamily::detect(work_dir)?;
        Ok(self.resolver.resolve(family, work_dir, action))
    }

    /// Runs `action` in `work_dir` to completion.
    ///
    /// Blocks until the process exits; there is no timeout.
    pub fn run(&self, work_dir: &Path, action: &str) -> Result<CommandResult, ProjectError> {
        let invocation = self.plan(work_dir, action)?;
        tracing::info!(
            "Running `{}` in {}",
            invocation.display,
            work_dir.display()
        );

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(work_dir)
            .output()
            .map_err(|source| ProjectError::Launch {
                command: invocation.display.clone(),
                source,
            })?;

        tracing::info!("`{}` exited with {}", invocation.display, output.status);

        Ok(CommandResult {
            command: invocation.display,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Runs `sh -c` with a fixed script instead of a real build tool.
    struct ScriptResolver(&'static str);

    impl CommandResolver for ScriptResolver {
        fn resolve(&self, family: BuildFamily, _work_dir: &Path, action: &str) -> Invocation {
            Invocation {
                program: "sh".into(),
                args: vec!["-c".into(), self.0.into(), "sh".into(), action.into()],
                display: format!("{:?} {}", family, action),
            }
        }
    }

    /// Resolves to a program that cannot exist.
    struct MissingResolver;

    impl CommandResolver for MissingResolver {
        fn resolve(&self, _family: BuildFamily, _work_dir: &Path, action: &str) -> Invocation {
            Invocation {
                program: "scaffold-mcp-no-such-build-tool".into(),
                args: vec![action.into()],
                display: format!("scaffold-mcp-no-such-build-tool {}", action),
            }
        }
    }

    #[test]
    fn test_detect_family() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            BuildFamily::detect(dir.path()),
            Err(ProjectError::UnsupportedProject)
        ));

        fs::write(dir.path().join("package.json"), "{}").unwrap();
        assert_eq!(BuildFamily::detect(dir.path()).unwrap(), BuildFamily::Npm);

        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        assert_eq!(BuildFamily::detect(dir.path()).unwrap(), BuildFamily::Maven);
    }

    #[test]
    fn test_unix_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = HostResolver::for_os(HostOs::Unix);

        let mvn = resolver.resolve(BuildFamily::Maven, dir.path(), "test");
        assert_eq!(mvn.program, "mvn");
        assert_eq!(mvn.args, vec!["test".to_string()]);
        assert_eq!(mvn.display, "mvn test");

        fs::write(dir.path().join("mvnw"), "#!/bin/sh\n").unwrap();
        let wrapper = resolver.resolve(BuildFamily::Maven, dir.path(), "test");
        assert_eq!(Path::new(&wrapper.program), dir.path().join("mvnw"));
        assert_eq!(wrapper.display, "./mvnw test");

        let npm = resolver.resolve(BuildFamily::Npm, dir.path(), "install");
        assert_eq!(npm.program, "npm");
        assert_eq!(npm.display, "npm install");
    }

    #[test]
    fn test_windows_resolution_goes_through_cmd() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = HostResolver::for_os(HostOs::Windows);

        let npm = resolver.resolve(BuildFamily::Npm, dir.path(), "test");
        assert_eq!(npm.program, "cmd");
        assert_eq!(npm.args, vec!["/C", "npm.cmd", "test"]);

        let mvn = resolver.resolve(BuildFamily::Maven, dir.path(), "verify");
        assert_eq!(mvn.args, vec!["/C", "mvn", "verify"]);

        fs::write(dir.path().join("mvnw"), "").unwrap();
        let wrapper = resolver.resolve(BuildFamily::Maven, dir.path(), "verify");
        assert_eq!(wrapper.args, vec!["/C", "mvnw.cmd", "verify"]);
        assert_eq!(wrapper.display, "mvnw.cmd verify");
    }

    #[test]
    fn test_unsupported_project_never_launches() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = CommandDispatcher::with_resolver(MissingResolver);

        let err = dispatcher.run(dir.path(), "test").unwrap_err();
        assert!(matches!(err, ProjectError::UnsupportedProject));
        assert!(err.to_string().contains("No supported build tool"));
    }

    #[test]
    fn test_launch_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let dispatcher = CommandDispatcher::with_resolver(MissingResolver);

        let err = dispatcher.run(dir.path(), "test").unwrap_err();
        assert!(matches!(err, ProjectError::Launch { .. }));
        assert!(err.to_string().contains("scaffold-mcp-no-such-build-tool test"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captures_stdout_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();

        let quiet = CommandDispatcher::with_resolver(ScriptResolver("echo running $1"));
        let result = quiet.run(dir.path(), "test").unwrap();
        assert_eq!(result.stdout, "running test\n");
        assert!(!result.has_stderr());
        let text = result.to_string();
        assert!(text.starts_with("Command: Maven test\n--- STDOUT ---\nrunning test\n"));
        assert!(!text.contains("STDERR"));

        let noisy = CommandDispatcher::with_resolver(ScriptResolver("echo out; echo oops >&2"));
        let result = noisy.run(dir.path(), "install").unwrap();
        assert_eq!(result.stderr, "oops\n");
        assert!(result.to_string().contains("--- STDERR ---\noops\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_uses_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::write(dir.path().join("marker.txt"), "here").unwrap();

        let dispatcher = CommandDispatcher::with_resolver(ScriptResolver("cat marker.txt"));
        let result = dispatcher.run(dir.path(), "build").unwrap();
        assert_eq!(result.stdout, "here");
    }
}
