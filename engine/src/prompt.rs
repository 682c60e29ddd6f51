use crate::{AnalysisRequest, TaskKind};

/// Fixed reviewer persona sent as the system message on every call.
pub const SYSTEM_PROMPT: &str = "You are CodeRefine, an expert AI code reviewer specializing in bug detection, performance optimization, security analysis, and code quality improvement.";

/// Closing paragraph of every user instruction, naming the exact reply shape.
const RESPONSE_CONTRACT: &str = r#"Respond with a single JSON object and nothing else. Use exactly these keys: "bugs" (array of strings), "performanceIssues" (array of strings), "securityRisks" (array of strings), "suggestions" (array of strings), "rewrittenCode" (string). Leave a category as an empty array, or rewrittenCode as an empty string, when you have nothing to report for it."#;

const LANGUAGE_SLOT: &str = "{language}";
const CODE_SLOT: &str = "{code}";

const COMPREHENSIVE_TEMPLATE: &str = r#"You are performing a comprehensive review. Analyze the following {language} code and report:
1. Bugs, errors, or potential runtime issues
2. Performance bottlenecks and inefficiencies
3. Security risks and vulnerabilities
4. Violations of coding standards and best practices
5. A complete rewritten version of the code with all improvements applied

Code to analyze:
```
{code}
```"#;

const BUGS_TEMPLATE: &str = r#"You are a bug detection expert. Analyze the following {language} code and identify all bugs, errors, and potential runtime issues. For each finding, describe the issue, why it is a problem, and how to fix it.

Code:
```
{code}
```"#;

const PERFORMANCE_TEMPLATE: &str = r#"You are a performance optimization expert. Analyze the following {language} code for performance issues: identify bottlenecks, suggest algorithmic improvements, recommend better data structures, and point out unnecessary computations.

Code:
```
{code}
```"#;

const SECURITY_TEMPLATE: &str = r#"You are a security expert. Analyze the following {language} code for security vulnerabilities: input validation issues, injection risks, XSS vulnerabilities, authentication and authorization flaws, and data exposure risks.

Code:
```
{code}
```"#;

const BEST_PRACTICES_TEMPLATE: &str = r#"You are a code quality expert. Review the following {language} code for best practice violations: code organization and structure, naming conventions, readability, documentation, error handling, and design patterns.

Code:
```
{code}
```"#;

const REWRITE_TEMPLATE: &str = r#"You are an expert programmer. Rewrite the following {language} code to be bug-free, performant, secure, well-documented, and aligned with best practices. Put the complete rewritten code in the rewrittenCode field, with inline comments explaining key improvements.

Original code:
```
{code}
```"#;

/// Total mapping from task kind to its user-instruction template. Templates
/// carry `{language}` and `{code}` slots filled in by `build_prompt`.
pub fn template(task: TaskKind) -> &'static str {
    match task {
        TaskKind::Comprehensive => COMPREHENSIVE_TEMPLATE,
        TaskKind::Bugs => BUGS_TEMPLATE,
        TaskKind::Performance => PERFORMANCE_TEMPLATE,
        TaskKind::Security => SECURITY_TEMPLATE,
        TaskKind::BestPractices => BEST_PRACTICES_TEMPLATE,
        TaskKind::Rewrite => REWRITE_TEMPLATE,
    }
}

/// Role-tagged instruction pair for one chat-completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Render the instruction pair for a request. Deterministic, no side effects.
/// The code is inserted verbatim; ``` fences inside it are not escaped.
pub fn build_prompt(request: &AnalysisRequest) -> Prompt {
    // Language first: after the code lands in the template, no further
    // substitution may touch it.
    let body = template(request.task())
        .replace(LANGUAGE_SLOT, request.language().label())
        .replacen(CODE_SLOT, request.code(), 1);
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: format!("{body}\n\n{RESPONSE_CONTRACT}"),
    }
}
