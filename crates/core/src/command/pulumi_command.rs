use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Placeholder shown instead of secret argument values
pub const REDACTED: &str = "[secret]";

/// A single invocation of the external tool, kept as an argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulumiCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    /// Indices into `args` never shown in rendered command lines
    pub redacted: Vec<usize>,
}

impl PulumiCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
            env: Vec::new(),
            redacted: Vec::new(),
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_envs<'a>(mut self, vars: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (key, value) in vars {
            self.env.push((key.clone(), value.clone()));
        }
        self
    }

    pub fn with_redacted_arg(mut self, index: usize) -> Self {
        self.redacted.push(index);
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Render the command for logs. Display only: execution never goes
    /// through a shell.
    pub fn to_shell_command(&self) -> String {
        let mut cmd = self.program.clone();
        for (i, arg) in self.args.iter().enumerate() {
            cmd.push(' ');
            if self.redacted.contains(&i) {
                cmd.push_str(REDACTED);
            } else if arg.is_empty() || arg.contains(' ') {
                cmd.push_str(&format!("'{arg}'"));
            } else {
                cmd.push_str(arg);
            }
        }
        cmd
    }

    /// Build the `std::process::Command` with piped output streams
    pub fn to_process(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        cmd
    }
}
