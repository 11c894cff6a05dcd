use serde::Serialize;

use crate::runner::Language;

/// Result of one sandbox invocation. One execution = one child process at
/// most; the variants that never spawn are distinguished so handlers can
/// word the response accordingly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Success { stdout: String },
    Failed { stderr: String, exit_code: Option<i32> },
    TimedOut { timeout_secs: u64 },
    EmptySource,
    Unsupported { language: Language },
    RuntimeMissing { interpreter: String },
}

impl ExecutionOutcome {
    /// Inline text shown in the execution pane.
    pub fn display(&self) -> String {
        match self {
            ExecutionOutcome::Success { stdout } => {
                format!("Execution successful\n\n{}", stdout)
            }
            ExecutionOutcome::Failed { stderr, .. } => {
                format!("Execution failed\n\n{}", stderr)
            }
            ExecutionOutcome::TimedOut { timeout_secs } => format!(
                "Execution timed out after {} seconds",
                timeout_secs
            ),
            ExecutionOutcome::EmptySource => "No code to run".to_string(),
            ExecutionOutcome::Unsupported { language } => format!(
                "Running {} code is not supported. Only Python and JavaScript can be executed.",
                language
            ),
            ExecutionOutcome::RuntimeMissing { interpreter } => format!(
                "Interpreter '{}' is not installed on the server",
                interpreter
            ),
        }
    }
}
