use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::RunnerConfig;

/// The closed set of languages offered by the editor dropdown. Only
/// Python and JavaScript have an execution path; the rest can still be
/// sent for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    Python,
    JavaScript,
    Java,
    #[serde(rename = "C++")]
    Cpp,
    #[serde(rename = "C#")]
    CSharp,
    Go,
    TypeScript,
    Ruby,
    #[serde(rename = "PHP")]
    Php,
}

impl Language {
    /// Lowercase tag used for fenced code blocks in prompts.
    pub fn fence_tag(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Java => "java",
            Language::Cpp => "c++",
            Language::CSharp => "c#",
            Language::Go => "go",
            Language::TypeScript => "typescript",
            Language::Ruby => "ruby",
            Language::Php => "php",
        }
    }

    /// Source file extension and interpreter binary, for the two
    /// languages the sandbox can actually execute.
    pub fn runtime<'a>(&self, config: &'a RunnerConfig) -> Option<(&'static str, &'a str)> {
        match self {
            Language::Python => Some((".py", config.python_bin.as_str())),
            Language::JavaScript => Some((".js", config.node_bin.as_str())),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::TypeScript => "TypeScript",
            Language::Ruby => "Ruby",
            Language::Php => "PHP",
        };
        f.write_str(name)
    }
}
