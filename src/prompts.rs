//! Prompt templates and resources offered by the tests toolset.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::protocol::{
    ContentItem, GetPromptResult, PromptArgument, PromptDefinition, PromptMessage,
    ReadResourceResult, ResourceContents, ResourceDefinition,
};

/// URI of the project summary resource.
pub const PROJECT_SUMMARY_URI: &str = "project://summary";

const JUNIT_TEST_STYLE: &str = "\
When generating JUnit 5 tests:
1. Use AssertJ for assertions (assertThat).
2. Use Mockito for mocking dependencies.
3. Follow the naming convention: 'should_[ExpectedBehavior]_when_[Condition]'.
4. Always include a test for edge cases (null inputs, empty strings).
";

/// Coding standards every generated Selenium suite must follow.
pub const SELENIUM_STANDARDS: &str = "\
SELENIUM TEST STANDARDS:
- NAMING CONVENTION: Test classes MUST end with the suffix 'SeleniumIT.java' (e.g., LoginSeleniumIT.java).
- ARCHITECTURE: Implement the Page Object Model (POM) pattern. Separate page elements/actions from the test logic.
- LIBRARIES: Use JUnit 5 (Jupiter) for assertions and lifecycle hooks (@Test, @BeforeEach, @AfterEach).
- DRIVER MANAGEMENT: Use 'io.github.bonigarcia.wdm.WebDriverManager' for automated driver setup.
- CLEANUP: Ensure 'driver.quit()' is always called in the @AfterEach block.
- SELECTORS: Favor 'By.id' or 'By.cssSelector' over XPath whenever possible.
- TARGET DIRECTORY: Save all web tests under 'src/test/java/<base package>/selenium/'.
";

/// Prompts available to the client.
pub fn list_prompts() -> Vec<PromptDefinition> {
    vec![
        PromptDefinition {
            name: "junit_test_style".into(),
            description: "Instructions for generating JUnit tests in this project.".into(),
            arguments: Vec::new(),
        },
        PromptDefinition {
            name: "create_selenium_suite".into(),
            description: "Guide the creation of a standardized Selenium test suite for one page."
                .into(),
            arguments: vec![PromptArgument {
                name: "page_name".into(),
                description: "Name of the page under test (e.g. Login)".into(),
                required: true,
            }],
        },
    ]
}

/// Renders prompt `name` with `arguments`.
pub fn get_prompt(name: &str, arguments: &HashMap<String, String>) -> Result<GetPromptResult> {
    match name {
        "junit_test_style" => Ok(single_message(
            "Instructions for generating JUnit tests in this project.",
            JUNIT_TEST_STYLE.to_string(),
        )),
        "create_selenium_suite" => {
            let page_name = arguments
                .get("page_name")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| Error::InvalidParams("missing prompt argument: page_name".into()))?;

            Ok(single_message(
                "Selenium test suite workflow",
                selenium_suite_prompt(page_name),
            ))
        }
        _ => Err(Error::InvalidParams(format!("prompt not found: {}", name))),
    }
}

fn selenium_suite_prompt(page_name: &str) -> String {
    format!(
        "You are an expert QA Automation Engineer. Your task is to generate a Selenium test suite for the '{page}' page.

### Guidelines & Standards:
{standards}
### Workflow Instructions:
1. **Analyze**: Use the 'analyze_page_elements' tool to inspect the HTML/Vue file for the '{page}' page.
2. **Design**: Create a Page Object class containing WebElements and action methods (e.g., loginUser, clickSubmit).
3. **Implement**: Create the Test class using the POM, following the naming convention mentioned above.
4. **Verify**: Ensure the package declarations and imports (JUnit 5, Selenium, WebDriverManager) are correct.
5. **Save**: Use the 'write_java_test' tool to store both the Page Object and the Test class in the correct project directory.

Please start by listing which file you are going to analyze.
",
        page = page_name,
        standards = SELENIUM_STANDARDS,
    )
}

fn single_message(description: &str, text: String) -> GetPromptResult {
    GetPromptResult {
        description: description.to_string(),
        messages: vec![PromptMessage {
            role: "user".into(),
            content: ContentItem::text(text),
        }],
    }
}

/// Resources available to the client.
pub fn list_resources() -> Vec<ResourceDefinition> {
    vec![ResourceDefinition {
        uri: PROJECT_SUMMARY_URI.into(),
        name: "Project summary".into(),
        description: "Summary of the project in the server's working directory.".into(),
        mime_type: "text/plain".into(),
    }]
}

/// Reads resource `uri`; `cwd` is the directory the summary describes.
pub fn read_resource(uri: &str, cwd: &Path) -> Result<ReadResourceResult> {
    if uri != PROJECT_SUMMARY_URI {
        return Err(Error::InvalidParams(format!("resource not found: {}", uri)));
    }

    Ok(ReadResourceResult {
        contents: vec![ResourceContents {
            uri: uri.to_string(),
            mime_type: "text/plain".into(),
            text: format!("Summary of project in: {}", cwd.display()),
        }],
    })
}
