//! Running converter processes with a deadline

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{PdfError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Longest stderr excerpt carried in a `ToolFailed` message
const MAX_STDERR_CHARS: usize = 400;

/// Run `program args...`, waiting at most `timeout`.
///
/// Stderr goes to `log_path` while the process runs and is folded into the
/// error message on failure. The log file is removed afterwards.
pub(crate) fn run_tool(
    program: &str,
    args: &[&std::ffi::OsStr],
    timeout: Duration,
    log_path: &Path,
) -> Result<()> {
    let stderr_file = File::create(log_path)?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::from(stderr_file));

    debug!(program, ?args, "spawning converter");
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let _ = fs::remove_file(log_path);
            return Err(PdfError::ToolNotFound(program.to_string()));
        }
        Err(e) => {
            let _ = fs::remove_file(log_path);
            return Err(PdfError::Io(e));
        }
    };

    let waited = wait_with_timeout(&mut child, timeout);
    let stderr = fs::read_to_string(log_path).unwrap_or_default();
    let _ = fs::remove_file(log_path);

    match waited? {
        None => Err(PdfError::TimedOut {
            tool: program.to_string(),
            secs: timeout.as_secs(),
        }),
        Some(0) => Ok(()),
        Some(code) => Err(PdfError::ToolFailed {
            tool: program.to_string(),
            message: failure_message(code, &stderr),
        }),
    }
}

/// Wait for a child process, killing it once `timeout` has elapsed.
///
/// Returns the exit code, `Some(-1)` for signal termination, or `None` on timeout.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<i32>> {
    let start = Instant::now();
    loop {
        match child.try_wait()? {
            Some(status) => return Ok(Some(status.code().unwrap_or(-1))),
            None => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(None);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

fn failure_message(code: i32, stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        return format!("exit code {}", code);
    }
    let excerpt: String = stderr.chars().take(MAX_STDERR_CHARS).collect();
    format!("exit code {}: {}", code, excerpt)
}
