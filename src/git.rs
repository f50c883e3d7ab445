use crate::error::GitError;
use std::process::Command as GitCommand;

/// The version-control facts the pipeline needs about the working copy.
pub trait VersionControl {
    /// Name of the checked out branch.
    fn current_branch(&self) -> Result<String, GitError>;

    /// Diff of `current` against the point where it diverged from `target`.
    fn diff(&self, current: &str, target: &str) -> Result<String, GitError>;

    /// Subject lines of the commits on `current` that are not on `target`, oldest first.
    fn commit_subjects(&self, current: &str, target: &str) -> Result<Vec<String>, GitError>;

    /// Branch the remote considers its default.
    fn default_branch(&self) -> Result<String, GitError>;

    /// URL of the `origin` remote.
    fn repository_url(&self) -> Result<String, GitError>;
}

/// Shells out to the `git` binary in the current directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

/// Run a git command and capture stdout as String.
pub fn git_output(args: &[&str]) -> Result<String, GitError> {
    log::trace!("Running git {}", args.join(" "));

    let output = GitCommand::new("git")
        .args(args)
        .output()
        .map_err(|e| GitError::new(args, format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::new(
            args,
            format!("exited with status {:?}: {}", output.status.code(), stderr.trim()),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

impl VersionControl for GitCli {
    fn current_branch(&self) -> Result<String, GitError> {
        let name = git_output(&["rev-parse", "--abbrev-ref", "HEAD"])?
            .trim()
            .to_string();
        Ok(name)
    }

    fn diff(&self, current: &str, target: &str) -> Result<String, GitError> {
        let range = format!("{target}...{current}");
        git_output(&["diff", &range])
    }

    fn commit_subjects(&self, current: &str, target: &str) -> Result<Vec<String>, GitError> {
        let range = format!("{target}..{current}");
        let log_output = git_output(&["log", "--reverse", "--pretty=format:%s", &range])?;
        Ok(parse_subjects(&log_output))
    }

    fn default_branch(&self) -> Result<String, GitError> {
        let args = ["remote", "show", "origin"];
        let output = git_output(&args)?;
        parse_head_branch(&output)
            .ok_or_else(|| GitError::new(&args, "no HEAD branch reported for origin"))
    }

    fn repository_url(&self) -> Result<String, GitError> {
        let url = git_output(&["config", "--get", "remote.origin.url"])?;
        Ok(url.trim().to_string())
    }
}

fn parse_subjects(log_output: &str) -> Vec<String> {
    log_output
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Pull the branch name out of the `HEAD branch: main` line of `git remote show`.
fn parse_head_branch(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains("HEAD branch"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, branch)| branch.trim().to_string())
        .filter(|branch| !branch.is_empty() && branch != "(unknown)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_branch_is_parsed_from_remote_show() {
        let output = "* remote origin\n  \
                      Fetch URL: git@github.com:acme/widgets.git\n  \
                      Push  URL: git@github.com:acme/widgets.git\n  \
                      HEAD branch: develop\n  \
                      Remote branches:\n    develop tracked\n";
        assert_eq!(parse_head_branch(output).as_deref(), Some("develop"));
    }

    #[test]
    fn unknown_head_branch_is_none() {
        assert_eq!(parse_head_branch("  HEAD branch: (unknown)\n"), None);
        assert_eq!(parse_head_branch("* remote origin\n"), None);
    }

    #[test]
    fn subjects_skip_blank_lines() {
        let subjects = parse_subjects("Add login\n\nFix typo\n");
        assert_eq!(subjects, vec!["Add login", "Fix typo"]);
    }

    #[test]
    fn failing_git_command_reports_args() {
        let err = git_output(&["definitely-not-a-subcommand"]).unwrap_err();
        assert_eq!(err.args, "definitely-not-a-subcommand");
    }
}
