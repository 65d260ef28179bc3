//! Argument vectors for the external tool's subcommands

use crate::types::{ActionInput, ConfigEntry, StackIdentifier, StackLocation};
use std::path::Path;

/// Fluent builder for one subcommand's argument vector
#[derive(Debug, Clone, Default)]
pub struct PulumiArgs {
    args: Vec<String>,
}

impl PulumiArgs {
    pub fn new(subcommand: &[&str]) -> Self {
        Self {
            args: subcommand.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Push the flag and its value; skipped entirely when the value is absent
    pub fn option(mut self, flag: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.args.push(flag.to_string());
            self.args.push(value.to_string());
        }
        self
    }

    pub fn flag_if(mut self, flag: &str, enabled: bool) -> Self {
        if enabled {
            self.args.push(flag.to_string());
        }
        self
    }

    pub fn non_interactive(self) -> Self {
        self.arg("--non-interactive")
    }

    /// `--yes --skip-preview`, for operations that would otherwise prompt
    pub fn unattended(self) -> Self {
        self.arg("--yes").arg("--skip-preview")
    }

    pub fn stack(self, stack: &StackIdentifier) -> Self {
        self.option("--stack", Some(stack.to_string().as_str()))
    }

    pub fn cwd(self, dir: &Path) -> Self {
        self.option("--cwd", Some(dir.display().to_string().as_str()))
    }

    /// Where an operation executes: a local project directory, or a remote
    /// git checkout run through Pulumi Deployments
    pub fn location(self, location: &StackLocation) -> Self {
        match location {
            StackLocation::Local { work_dir } => self.cwd(work_dir),
            StackLocation::Remote {
                repo_url,
                branch_ref,
                project_path,
            } => self
                .arg(repo_url.as_str())
                .arg("--remote")
                .option("--remote-git-branch", Some(branch_ref.as_str()))
                .option("--remote-git-repo-dir", Some(project_path.as_str())),
        }
    }

    /// Only applies the location when it is local; read-only subcommands
    /// have no remote form
    pub fn local_cwd(self, location: &StackLocation) -> Self {
        match location {
            StackLocation::Local { work_dir } => self.cwd(work_dir),
            StackLocation::Remote { .. } => self,
        }
    }

    pub fn extend<'a>(mut self, extra: impl IntoIterator<Item = &'a str>) -> Self {
        self.args.extend(extra.into_iter().map(str::to_string));
        self
    }

    /// Index the next pushed argument will occupy
    pub(crate) fn next_index(&self) -> usize {
        self.args.len()
    }

    pub fn build(self) -> Vec<String> {
        self.args
    }
}

/// `new <template> --yes --force -n <name> -d <description> -s <stack> --dir <folder> <extra...>`
///
/// Optional values that were not supplied are left out together with their
/// flag. Extra arguments keep their order with empty entries dropped.
pub fn new_project_args(
    input: &ActionInput,
    stack: &StackIdentifier,
    folder: Option<&str>,
) -> Vec<String> {
    let mut args = PulumiArgs::new(&["new"]);
    if let Some(template) = ActionInput::non_empty(&input.template) {
        args = args.arg(template);
    }

    args.arg("--yes")
        .arg("--force")
        .option("-n", ActionInput::non_empty(&input.name))
        .option("-d", ActionInput::non_empty(&input.description))
        .option("-s", Some(stack.to_string().as_str()))
        .option("--dir", folder)
        .extend(input.extra_args())
        .build()
}

/// `config set <key> <value> --stack <id> --plaintext|--secret --non-interactive [--cwd <dir>]`
///
/// Returns the arguments and the index of the value, which must not be logged
/// for secret entries.
pub fn config_set_args(
    entry: &ConfigEntry,
    stack: &StackIdentifier,
    cwd: Option<&Path>,
) -> (Vec<String>, usize) {
    let mut args = PulumiArgs::new(&["config", "set"]).arg(entry.key.as_str());
    let value_index = args.next_index();
    args = args
        .arg(entry.value.as_str())
        .stack(stack)
        .arg(if entry.secret { "--secret" } else { "--plaintext" })
        .non_interactive();

    if let Some(dir) = cwd {
        args = args.cwd(dir);
    }

    (args.build(), value_index)
}

pub fn select_stack_args(stack: &StackIdentifier, location: &StackLocation) -> Vec<String> {
    PulumiArgs::new(&["stack", "select"])
        .arg("--create")
        .stack(stack)
        .non_interactive()
        .local_cwd(location)
        .build()
}

pub fn refresh_args(stack: &StackIdentifier, location: &StackLocation) -> Vec<String> {
    PulumiArgs::new(&["refresh"])
        .unattended()
        .non_interactive()
        .stack(stack)
        .location(location)
        .build()
}

pub fn destroy_args(stack: &StackIdentifier, location: &StackLocation) -> Vec<String> {
    PulumiArgs::new(&["destroy"])
        .unattended()
        .non_interactive()
        .stack(stack)
        .location(location)
        .build()
}

pub fn up_args(stack: &StackIdentifier, location: &StackLocation, show_secrets: bool) -> Vec<String> {
    PulumiArgs::new(&["up"])
        .unattended()
        .non_interactive()
        .stack(stack)
        .flag_if("--show-secrets", show_secrets)
        .location(location)
        .build()
}

pub fn stack_output_args(
    stack: &StackIdentifier,
    location: &StackLocation,
    show_secrets: bool,
) -> Vec<String> {
    PulumiArgs::new(&["stack", "output"])
        .arg("--json")
        .flag_if("--show-secrets", show_secrets)
        .stack(stack)
        .local_cwd(location)
        .build()
}

pub fn stack_history_args(
    stack: &StackIdentifier,
    location: &StackLocation,
    show_secrets: bool,
) -> Vec<String> {
    PulumiArgs::new(&["stack", "history"])
        .arg("--json")
        .option("--page-size", Some("1"))
        .flag_if("--show-secrets", show_secrets)
        .stack(stack)
        .local_cwd(location)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> StackIdentifier {
        StackIdentifier::new("acme", "dev")
    }

    #[test]
    fn test_new_project_args_order() {
        let input = ActionInput {
            template: Some("aws-typescript".into()),
            name: Some("web".into()),
            description: Some("Web tier".into()),
            args: vec!["--generate-only".into(), "".into(), "--language=ts".into()],
            ..Default::default()
        };

        assert_eq!(
            new_project_args(&input, &stack(), Some("infra")).join(" "),
            "new aws-typescript --yes --force -n web -d Web tier -s acme/dev --dir infra --generate-only --language=ts"
        );
    }

    #[test]
    fn test_new_project_args_skip_missing_values() {
        let input = ActionInput {
            template: Some("aws-go".into()),
            name: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(
            new_project_args(&input, &stack(), None),
            vec!["new", "aws-go", "--yes", "--force", "-s", "acme/dev"]
        );
    }

    #[test]
    fn test_config_set_args() {
        let entry = ConfigEntry {
            key: "aws:region".into(),
            value: "eu-west-1".into(),
            secret: false,
        };
        let (args, value_index) = config_set_args(&entry, &stack(), Some(Path::new("infra")));
        assert_eq!(
            args.join(" "),
            "config set aws:region eu-west-1 --stack acme/dev --plaintext --non-interactive --cwd infra"
        );
        assert_eq!(args[value_index], "eu-west-1");

        let secret = ConfigEntry {
            secret: true,
            ..entry
        };
        let (args, _) = config_set_args(&secret, &stack(), None);
        assert_eq!(
            args.join(" "),
            "config set aws:region eu-west-1 --stack acme/dev --secret --non-interactive"
        );
    }

    #[test]
    fn test_lifecycle_args_local() {
        let location = StackLocation::local("/work/web");
        assert_eq!(
            select_stack_args(&stack(), &location).join(" "),
            "stack select --create --stack acme/dev --non-interactive --cwd /work/web"
        );
        assert_eq!(
            refresh_args(&stack(), &location).join(" "),
            "refresh --yes --skip-preview --non-interactive --stack acme/dev --cwd /work/web"
        );
        assert_eq!(
            up_args(&stack(), &location, true).join(" "),
            "up --yes --skip-preview --non-interactive --stack acme/dev --show-secrets --cwd /work/web"
        );
    }

    #[test]
    fn test_lifecycle_args_remote() {
        let location = StackLocation::remote("https://github.com/acme/infra", "main", "web");
        assert_eq!(
            destroy_args(&stack(), &location).join(" "),
            "destroy --yes --skip-preview --non-interactive --stack acme/dev \
             https://github.com/acme/infra --remote --remote-git-branch refs/heads/main \
             --remote-git-repo-dir web"
        );
        // Read-back commands have no remote form
        assert_eq!(
            stack_output_args(&stack(), &location, false).join(" "),
            "stack output --json --stack acme/dev"
        );
        assert_eq!(
            select_stack_args(&stack(), &location).join(" "),
            "stack select --create --stack acme/dev --non-interactive"
        );
    }

    #[test]
    fn test_history_args() {
        let location = StackLocation::local("/work/web");
        assert_eq!(
            stack_history_args(&stack(), &location, true).join(" "),
            "stack history --json --page-size 1 --show-secrets --stack acme/dev --cwd /work/web"
        );
    }
}
