//! Process boundary: running external tool invocations

use super::PulumiCommand;
use crate::error::{Error, Result};
use crate::logging::LogSink;
use std::io::{self, BufRead, BufReader, Read};
use std::thread;
use tracing::{debug, info};

/// What came back from one finished invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into an external failure
    pub fn ensure_success(self, command: &PulumiCommand) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        Err(Error::CommandFailed {
            command: command.to_shell_command(),
            code: self
                .code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string()),
            stderr: self.stderr.trim().to_string(),
        })
    }
}

/// Runs external tool invocations
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion. Stdout is always captured; when a sink
    /// is given each stdout line is also forwarded to it as it arrives.
    fn execute(&self, command: &PulumiCommand, sink: Option<&dyn LogSink>) -> Result<CommandOutput>;
}

/// Spawns real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn execute(&self, command: &PulumiCommand, sink: Option<&dyn LogSink>) -> Result<CommandOutput> {
        debug!("Spawning: {}", command.to_shell_command());
        if let Some(dir) = command.working_dir() {
            debug!("Working directory: {}", dir.display());
        }

        let mut child = command.to_process().spawn().map_err(|e| {
            Error::IoError(io::Error::new(
                e.kind(),
                format!("Failed to start `{}`: {e}", command.program),
            ))
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("stderr was not captured"))?;

        // Drain stderr concurrently so a chatty child cannot block on a full pipe
        let stderr_reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stderr
                .read_to_end(&mut buf)
                .map(|_| String::from_utf8_lossy(&buf).into_owned())
        });

        let streamed = forward_lines(stdout, sink);
        if streamed.is_err() {
            // Nobody reads stdout any more; do not leave the child blocked on it
            let _ = child.kill();
        }

        // Reap the child and the reader before reporting any failure
        let status = child.wait();
        let stderr = stderr_reader
            .join()
            .map_err(|_| io::Error::other("stderr reader panicked"))?;

        let captured = streamed?;
        let status = status?;
        let stderr = stderr?;

        debug!("`{}` exited with {:?}", command.program, status.code());

        Ok(CommandOutput {
            code: status.code(),
            stdout: captured,
            stderr,
        })
    }
}

/// Read stdout line by line, handing each line to the sink as it arrives.
/// Bytes that are not UTF-8 are replaced rather than failing the read.
fn forward_lines(stdout: impl Read, sink: Option<&dyn LogSink>) -> io::Result<String> {
    let mut reader = BufReader::new(stdout);
    let mut captured = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let decoded = String::from_utf8_lossy(&buf);
        let line = decoded.trim_end_matches(['\n', '\r']);
        if let Some(sink) = sink {
            sink.line(line);
        }
        captured.push_str(line);
        captured.push('\n');
    }

    Ok(captured)
}

/// Logs what would run and reports success without spawning anything
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunExecutor;

impl CommandExecutor for DryRunExecutor {
    fn execute(&self, command: &PulumiCommand, _sink: Option<&dyn LogSink>) -> Result<CommandOutput> {
        match command.working_dir() {
            Some(dir) => info!("Would run: {} (in {})", command.to_shell_command(), dir.display()),
            None => info!("Would run: {}", command.to_shell_command()),
        }

        Ok(CommandOutput {
            code: Some(0),
            ..Default::default()
        })
    }
}
