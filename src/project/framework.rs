//! Frontend framework detection and component scaffolding hints.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

/// Frontend framework a project depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    /// `vue` in the dependencies.
    Vue,
    /// `@angular/core` in the dependencies.
    Angular,
    /// A `package.json` with neither.
    Generic,
    /// No `package.json` at all.
    Unknown,
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Framework::Vue => "vue",
            Framework::Angular => "angular",
            Framework::Generic => "generic",
            Framework::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    dependencies: HashMap<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: HashMap<String, serde_json::Value>,
}

impl PackageManifest {
    fn depends_on(&self, name: &str) -> bool {
        self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
    }
}

/// Inspects `<root>/package.json` to tell which framework the project uses.
pub fn detect_framework(root: impl AsRef<Path>) -> Result<Framework, ProjectError> {
    let manifest_path = root.as_ref().join("package.json");
    if !manifest_path.exists() {
        return Ok(Framework::Unknown);
    }

    let raw = std::fs::read_to_string(&manifest_path).map_err(|source| ProjectError::Read {
        path: "package.json".to_string(),
        source,
    })?;
    let manifest: PackageManifest = serde_json::from_str(&raw)
        .map_err(|e| ProjectError::Parse(format!("package.json: {}", e)))?;

    let framework = if manifest.depends_on("vue") {
        Framework::Vue
    } else if manifest.depends_on("@angular/core") {
        Framework::Angular
    } else {
        Framework::Generic
    };
    Ok(framework)
}

/// Where a new Vue component should live and what it starts out as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSuggestion {
    /// Root-relative path for the component file.
    pub path: String,
    /// Minimal single-file component source.
    pub boilerplate: String,
}

/// Suggests a path and skeleton for a Vue component called `name`.
pub fn suggest_vue_component(name: &str) -> ComponentSuggestion {
    let name = name.trim();
    ComponentSuggestion {
        path: format!("src/components/{}.vue", name),
        boilerplate: format!(
            "<template>\n  <div class='{}'></div>\n</template>\n<script setup>\n</script>",
            name
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_detect_framework() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(detect_framework(dir.path()).unwrap(), Framework::Unknown);

        let manifest = dir.path().join("package.json");
        fs::write(&manifest, r#"{"name": "shop", "dependencies": {"axios": "^1"}}"#).unwrap();
        assert_eq!(detect_framework(dir.path()).unwrap(), Framework::Generic);

        fs::write(&manifest, r#"{"devDependencies": {"vue": "^3.4.0"}}"#).unwrap();
        assert_eq!(detect_framework(dir.path()).unwrap(), Framework::Vue);

        fs::write(&manifest, r#"{"dependencies": {"@angular/core": "17"}}"#).unwrap();
        assert_eq!(detect_framework(dir.path()).unwrap(), Framework::Angular);
    }

    #[test]
    fn test_invalid_manifest_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{ not json").unwrap();

        let err = detect_framework(dir.path()).unwrap_err();
        assert_eq!(err.kind(), "parse_failure");
    }

    #[test]
    fn test_suggest_vue_component() {
        let suggestion = suggest_vue_component("UserCard");
        assert_eq!(suggestion.path, "src/components/UserCard.vue");
        assert!(suggestion.boilerplate.starts_with("<template>\n  <div class='UserCard'>"));
        assert!(suggestion.boilerplate.contains("<script setup>"));
        assert_eq!(Framework::Vue.to_string(), "vue");
    }
}
