use std::io::Write;
use std::path::PathBuf;

use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::config::RunnerConfig;
use crate::models::ExecutionOutcome;
use crate::runner::Language;

/// Execute submitted source in a child interpreter process.
///
/// The source is written to a uniquely named temp file which is owned by
/// this function and removed on every exit path, including timeout. The
/// child is spawned with `kill_on_drop`, so abandoning the output future
/// on timeout also reaps the process. The only error this returns is a
/// failure to stage the temp file; everything the child does comes back
/// as an `ExecutionOutcome`.
pub async fn run_code(
    code: &str,
    language: Language,
    config: &RunnerConfig,
) -> std::io::Result<ExecutionOutcome> {
    if code.trim().is_empty() {
        return Ok(ExecutionOutcome::EmptySource);
    }

    let (extension, interpreter) = match language.runtime(config) {
        Some(runtime) => runtime,
        None => return Ok(ExecutionOutcome::Unsupported { language }),
    };

    let scratch_dir = config
        .scratch_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);

    let mut source_file = tempfile::Builder::new()
        .prefix("coderefine-run-")
        .suffix(extension)
        .tempfile_in(&scratch_dir)?;
    source_file.write_all(code.as_bytes())?;
    source_file.flush()?;

    tracing::debug!(
        "Running {} source via {} ({})",
        language,
        interpreter,
        source_file.path().display()
    );

    let mut command = Command::new(interpreter);
    command.arg(source_file.path()).kill_on_drop(true);

    let outcome = match timeout(
        Duration::from_secs(config.timeout_secs),
        command.output(),
    )
    .await
    {
        Err(_) => {
            tracing::warn!(
                "Execution timed out after {} seconds",
                config.timeout_secs
            );
            ExecutionOutcome::TimedOut {
                timeout_secs: config.timeout_secs,
            }
        }
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Interpreter not found: {}", interpreter);
            ExecutionOutcome::RuntimeMissing {
                interpreter: interpreter.to_string(),
            }
        }
        Ok(Err(e)) => return Err(e),
        Ok(Ok(output)) => {
            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            if output.status.success() {
                ExecutionOutcome::Success { stdout }
            } else {
                ExecutionOutcome::Failed {
                    stderr,
                    exit_code: output.status.code(),
                }
            }
        }
    };

    // source_file drops here, removing the staged temp file
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(scratch: &std::path::Path, timeout_secs: u64) -> RunnerConfig {
        RunnerConfig {
            timeout_secs,
            python_bin: "python3".to_string(),
            node_bin: "node".to_string(),
            scratch_dir: Some(scratch.to_string_lossy().into_owned()),
        }
    }

    fn python_available() -> bool {
        std::process::Command::new("python3")
            .arg("--version")
            .output()
            .is_ok()
    }

    fn scratch_is_empty(dir: &std::path::Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn unsupported_language_reports_without_running() {
        let scratch = tempfile::tempdir().unwrap();
        let config = test_config(scratch.path(), 5);

        let outcome = run_code("package main", Language::Go, &config)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ExecutionOutcome::Unsupported {
                language: Language::Go
            }
        );
        // never staged a source file, let alone spawned anything
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn empty_source_returns_immediately() {
        let scratch = tempfile::tempdir().unwrap();
        let config = test_config(scratch.path(), 5);

        for code in ["", "   \n\t  "] {
            let outcome = run_code(code, Language::Python, &config).await.unwrap();
            assert_eq!(outcome, ExecutionOutcome::EmptySource);
        }
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn missing_interpreter_is_its_own_outcome() {
        let scratch = tempfile::tempdir().unwrap();
        let mut config = test_config(scratch.path(), 5);
        config.python_bin = "coderefine-no-such-interpreter".to_string();

        let outcome = run_code("print('hi')", Language::Python, &config)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ExecutionOutcome::RuntimeMissing {
                interpreter: "coderefine-no-such-interpreter".to_string()
            }
        );
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn sleeping_script_times_out_and_leaves_no_temp_file() {
        if !python_available() {
            return;
        }
        let scratch = tempfile::tempdir().unwrap();
        let config = test_config(scratch.path(), 1);

        let outcome = run_code("import time\ntime.sleep(30)\n", Language::Python, &config)
            .await
            .unwrap();

        assert_eq!(outcome, ExecutionOutcome::TimedOut { timeout_secs: 1 });
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn successful_script_captures_stdout() {
        if !python_available() {
            return;
        }
        let scratch = tempfile::tempdir().unwrap();
        let config = test_config(scratch.path(), 5);

        let outcome = run_code("print('hello from sandbox')", Language::Python, &config)
            .await
            .unwrap();

        match outcome {
            ExecutionOutcome::Success { stdout } => {
                assert!(stdout.contains("hello from sandbox"))
            }
            other => panic!("expected success, got {:?}", other),
        }
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn failing_script_reports_stderr_and_exit_code() {
        if !python_available() {
            return;
        }
        let scratch = tempfile::tempdir().unwrap();
        let config = test_config(scratch.path(), 5);

        let outcome = run_code("this_name_is_not_defined\n", Language::Python, &config)
            .await
            .unwrap();

        match outcome {
            ExecutionOutcome::Failed { stderr, exit_code } => {
                assert!(!stderr.is_empty());
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(scratch_is_empty(scratch.path()));
    }
}
