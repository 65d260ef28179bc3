use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Name of a stack as the Pulumi service addresses it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackIdentifier {
    pub organization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub stack: String,
}

impl StackIdentifier {
    /// `org/stack`, used when no project name is known
    pub fn new(organization: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            project: None,
            stack: stack.into(),
        }
    }

    /// `org/project/stack`. An empty project name falls back to `org/stack`.
    pub fn fully_qualified(
        organization: impl Into<String>,
        project: Option<&str>,
        stack: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            project: project.filter(|p| !p.is_empty()).map(str::to_string),
            stack: stack.into(),
        }
    }
}

impl fmt::Display for StackIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.project {
            Some(project) => write!(f, "{}/{}/{}", self.organization, project, self.stack),
            None => write!(f, "{}/{}", self.organization, self.stack),
        }
    }
}

/// Where stack operations execute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum StackLocation {
    /// Against a checked-out project directory on this machine
    Local { work_dir: PathBuf },
    /// Through Pulumi Deployments against a remote git checkout
    Remote {
        repo_url: String,
        branch_ref: String,
        project_path: String,
    },
}

impl StackLocation {
    pub fn local(work_dir: impl Into<PathBuf>) -> Self {
        StackLocation::Local {
            work_dir: work_dir.into(),
        }
    }

    /// Remote location; a bare branch name is expanded to `refs/heads/<branch>`
    pub fn remote(
        repo_url: impl Into<String>,
        branch: &str,
        project_path: impl Into<String>,
    ) -> Self {
        let branch_ref = if branch.starts_with("refs/") {
            branch.to_string()
        } else {
            format!("refs/heads/{branch}")
        };
        StackLocation::Remote {
            repo_url: repo_url.into(),
            branch_ref,
            project_path: project_path.into(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, StackLocation::Remote { .. })
    }
}

/// Live reference to a stack returned by the automation layer.
///
/// Owned by the routine that selected it and dropped when that routine ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackHandle {
    pub name: StackIdentifier,
    pub location: StackLocation,
}

impl StackHandle {
    pub fn new(name: StackIdentifier, location: StackLocation) -> Self {
        Self { name, location }
    }
}
