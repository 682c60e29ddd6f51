use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod config;
pub mod history;
pub mod prompt;
pub mod report;
pub mod response;
pub mod reviewer;
pub mod session;
pub mod adapters {
    pub mod groq;
    pub mod mock;
    pub mod timeout;
}

/// Source language label attached to a request. Used for prompt and report
/// labeling only; the engine never parses the submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    CSharp,
    Go,
    Ruby,
    Php,
    Rust,
    Other,
}

impl Language {
    pub const ALL: [Language; 11] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
        Language::Cpp,
        Language::CSharp,
        Language::Go,
        Language::Ruby,
        Language::Php,
        Language::Rust,
        Language::Other,
    ];

    /// Parse a user-supplied label. Unknown labels fall back to `Other`
    /// rather than failing; the set is closed but the input is not.
    pub fn parse(label: &str) -> Language {
        match label.trim().to_lowercase().as_str() {
            "python" | "py" => Language::Python,
            "javascript" | "js" => Language::JavaScript,
            "typescript" | "ts" => Language::TypeScript,
            "java" => Language::Java,
            "c++" | "cpp" => Language::Cpp,
            "c#" | "csharp" => Language::CSharp,
            "go" | "golang" => Language::Go,
            "ruby" | "rb" => Language::Ruby,
            "php" => Language::Php,
            "rust" | "rs" => Language::Rust,
            _ => Language::Other,
        }
    }

    /// Guess a language from a file extension.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Language::Python),
            "js" | "jsx" | "mjs" => Some(Language::JavaScript),
            "ts" | "tsx" => Some(Language::TypeScript),
            "java" => Some(Language::Java),
            "cpp" | "cc" | "cxx" | "hpp" | "h" => Some(Language::Cpp),
            "cs" => Some(Language::CSharp),
            "go" => Some(Language::Go),
            "rb" => Some(Language::Ruby),
            "php" => Some(Language::Php),
            "rs" => Some(Language::Rust),
            _ => None,
        }
    }

    /// Display label used in prompts and report headers.
    pub fn label(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Ruby => "Ruby",
            Language::Php => "PHP",
            Language::Rust => "Rust",
            Language::Other => "Other",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Analysis mode selected per request. Each kind maps to exactly one prompt
/// template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Comprehensive,
    Bugs,
    Performance,
    Security,
    BestPractices,
    Rewrite,
}

impl TaskKind {
    pub const ALL: [TaskKind; 6] = [
        TaskKind::Comprehensive,
        TaskKind::Bugs,
        TaskKind::Performance,
        TaskKind::Security,
        TaskKind::BestPractices,
        TaskKind::Rewrite,
    ];

    /// Parse the snake_case task name; hyphens are accepted as separators.
    pub fn parse(name: &str) -> Option<TaskKind> {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "comprehensive" => Some(TaskKind::Comprehensive),
            "bugs" => Some(TaskKind::Bugs),
            "performance" => Some(TaskKind::Performance),
            "security" => Some(TaskKind::Security),
            "best_practices" => Some(TaskKind::BestPractices),
            "rewrite" => Some(TaskKind::Rewrite),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Comprehensive => "comprehensive",
            TaskKind::Bugs => "bugs",
            TaskKind::Performance => "performance",
            TaskKind::Security => "security",
            TaskKind::BestPractices => "best_practices",
            TaskKind::Rewrite => "rewrite",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("code is empty after trimming")]
    EmptyCode,
}

/// A single analysis request. Immutable once constructed; validation happens
/// here, before any backend is involved.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    code: String,
    language: Language,
    task: TaskKind,
}

impl AnalysisRequest {
    /// Build a request, rejecting code that is empty after trimming. The code
    /// itself is stored untrimmed so prompts and rewrites see it verbatim.
    pub fn new(
        code: impl Into<String>,
        language: Language,
        task: TaskKind,
    ) -> Result<AnalysisRequest, RequestError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(RequestError::EmptyCode);
        }
        Ok(AnalysisRequest {
            code,
            language,
            task,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn task(&self) -> TaskKind {
        self.task
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_code() {
        let err = AnalysisRequest::new("", Language::Python, TaskKind::Bugs).unwrap_err();
        assert_eq!(err, RequestError::EmptyCode);
        let err = AnalysisRequest::new("  \n\t ", Language::Python, TaskKind::Bugs).unwrap_err();
        assert_eq!(err, RequestError::EmptyCode);
    }

    #[test]
    fn keeps_code_verbatim() {
        let req = AnalysisRequest::new("  x = 1\n", Language::Python, TaskKind::Bugs).unwrap();
        assert_eq!(req.code(), "  x = 1\n");
        assert_eq!(req.language(), Language::Python);
        assert_eq!(req.task(), TaskKind::Bugs);
    }

    #[test]
    fn parses_known_language_labels() {
        assert_eq!(Language::parse("Python"), Language::Python);
        assert_eq!(Language::parse("  js "), Language::JavaScript);
        assert_eq!(Language::parse("C++"), Language::Cpp);
        assert_eq!(Language::parse("C#"), Language::CSharp);
        assert_eq!(Language::parse("golang"), Language::Go);
    }

    #[test]
    fn unknown_language_falls_back_to_other() {
        assert_eq!(Language::parse("COBOL"), Language::Other);
        assert_eq!(Language::parse(""), Language::Other);
        assert_eq!(Language::parse("brainfuck"), Language::Other);
    }

    #[test]
    fn guesses_language_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("TSX"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("xyz"), None);
    }

    #[test]
    fn language_labels_round_trip() {
        for language in Language::ALL {
            assert_eq!(Language::parse(language.label()), language);
        }
    }

    #[test]
    fn parses_task_names() {
        assert_eq!(TaskKind::parse("bugs"), Some(TaskKind::Bugs));
        assert_eq!(
            TaskKind::parse("best-practices"),
            Some(TaskKind::BestPractices)
        );
        assert_eq!(
            TaskKind::parse("Best_Practices"),
            Some(TaskKind::BestPractices)
        );
        assert_eq!(TaskKind::parse("unknown"), None);
    }

    #[test]
    fn task_names_round_trip() {
        for task in TaskKind::ALL {
            assert_eq!(TaskKind::parse(task.name()), Some(task));
        }
    }

    #[test]
    fn language_serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&Language::JavaScript).unwrap();
        assert_eq!(json, "\"javascript\"");
        let parsed: Language = serde_json::from_str("\"csharp\"").unwrap();
        assert_eq!(parsed, Language::CSharp);
    }
}
