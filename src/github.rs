use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Owner and name of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

/// Derive `owner/repo` from a remote URL.
///
/// Handles `https://github.com/owner/repo(.git)` and `git@github.com:owner/repo(.git)`.
pub fn parse_repo_slug(url: &str) -> Option<RepoSlug> {
    let trimmed = url.trim().trim_end_matches('/').trim_end_matches(".git");

    let path = if let Some(idx) = trimmed.find("://") {
        // Strip scheme and host
        let rest = &trimmed[idx + 3..];
        match rest.find('/') {
            Some(slash) => &rest[slash + 1..],
            None => rest,
        }
    } else if let Some(idx) = trimmed.find(':') {
        // SSH-style: after ':' is "owner/repo"
        &trimmed[idx + 1..]
    } else {
        trimmed
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., owner, name] => Some(RepoSlug {
            owner: owner.to_string(),
            name: name.to_string(),
        }),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
pub struct NewPullRequest<'a> {
    pub head: &'a str,
    pub base: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub draft: bool,
}

#[derive(Deserialize)]
struct PullRequestResponse {
    html_url: String,
}

/// Opens pull requests through the GitHub REST API.
pub struct GitHubClient {
    http: Client,
    token: String,
    api_url: String,
    repo: RepoSlug,
}

impl GitHubClient {
    /// Build a client from `GITHUB_TOKEN`. Fails before any request if the token is missing.
    pub fn from_env(repo: RepoSlug) -> Result<Self> {
        let token = env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("GITHUB_TOKEN is not set"))?;
        Self::new(token, DEFAULT_API_URL, repo)
    }

    pub fn new(token: String, api_url: impl Into<String>, repo: RepoSlug) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("propr/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(GitHubClient {
            http,
            token,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            repo,
        })
    }

    /// Open the pull request and return its web URL.
    pub fn create_pull_request(&self, pr: &NewPullRequest<'_>) -> Result<String> {
        let url = format!(
            "{}/repos/{}/{}/pulls",
            self.api_url, self.repo.owner, self.repo.name
        );

        log::debug!(
            "Creating pull request head={} base={} owner={} name={}",
            pr.head,
            pr.base,
            self.repo.owner,
            self.repo.name
        );

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(pr)
            .send()
            .context("failed to send request to GitHub")?;

        if resp.status() != reqwest::StatusCode::CREATED {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(anyhow!(
                "GitHub API error: HTTP {} - {}",
                status.as_u16(),
                text
            ));
        }

        let created: PullRequestResponse = resp.json().context("failed to parse GitHub response")?;
        Ok(created.html_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::runtime::Runtime;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn slug(owner: &str, name: &str) -> Option<RepoSlug> {
        Some(RepoSlug {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    #[test]
    fn parses_https_and_ssh_remotes() {
        assert_eq!(
            parse_repo_slug("https://github.com/acme/widgets.git"),
            slug("acme", "widgets")
        );
        assert_eq!(
            parse_repo_slug("git@github.com:acme/widgets.git\n"),
            slug("acme", "widgets")
        );
        assert_eq!(
            parse_repo_slug("ssh://git@github.com/acme/widgets"),
            slug("acme", "widgets")
        );
    }

    #[test]
    fn rejects_urls_without_owner() {
        assert_eq!(parse_repo_slug("widgets"), None);
        assert_eq!(parse_repo_slug(""), None);
    }

    #[test]
    fn missing_token_fails_before_any_request() {
        let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
        let err = GitHubClient::from_env(RepoSlug {
            owner: "acme".to_string(),
            name: "widgets".to_string(),
        })
        .err()
        .unwrap();
        assert_eq!(err.to_string(), "GITHUB_TOKEN is not set");
    }

    #[test]
    fn creates_pull_request() {
        let runtime = Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        runtime.block_on(
            Mock::given(method("POST"))
                .and(path("/repos/acme/widgets/pulls"))
                .and(header("authorization", "Bearer gh-token"))
                .and(body_json(json!({
                    "head": "feature/search",
                    "base": "main",
                    "title": "Add search",
                    "body": "# Description",
                    "draft": true
                })))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                    "number": 7,
                    "html_url": "https://github.com/acme/widgets/pull/7"
                })))
                .expect(1)
                .mount(&server),
        );

        let client = GitHubClient::new(
            "gh-token".to_string(),
            server.uri(),
            RepoSlug {
                owner: "acme".to_string(),
                name: "widgets".to_string(),
            },
        )
        .unwrap();
        let url = client
            .create_pull_request(&NewPullRequest {
                head: "feature/search",
                base: "main",
                title: "Add search",
                body: "# Description",
                draft: true,
            })
            .unwrap();

        assert_eq!(url, "https://github.com/acme/widgets/pull/7");
        runtime.block_on(server.verify());
    }

    #[test]
    fn rejected_pull_request_reports_status() {
        let runtime = Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        runtime.block_on(
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(422).set_body_string("A pull request already exists"))
                .mount(&server),
        );

        let client = GitHubClient::new(
            "gh-token".to_string(),
            server.uri(),
            RepoSlug {
                owner: "acme".to_string(),
                name: "widgets".to_string(),
            },
        )
        .unwrap();
        let err = client
            .create_pull_request(&NewPullRequest {
                head: "a",
                base: "b",
                title: "t",
                body: "",
                draft: false,
            })
            .unwrap_err();

        assert!(err.to_string().starts_with("GitHub API error: HTTP 422"));
    }
}
