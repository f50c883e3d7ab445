mod cli_args;
mod logging;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli_args::{Cli, Command, ConfigAction};
use indicatif::{ProgressBar, ProgressStyle};
use propr::config::{self, GenerationConfig};
use propr::git::{GitCli, VersionControl};
use propr::github::{self, GitHubClient, NewPullRequest};
use propr::llm::{EnvProviderSelector, ProviderFamily, SUPPORTED_MODELS};
use propr::render::{print_description, strip_code_fence};
use propr::{GenerationPipeline, Stage};
use std::io::{self, Write};
use std::time::Duration;

/// Ask the user a question and return a trimmed input line.
fn prompt_input(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb
}

/// Build the pipeline with a spinner that runs while the provider is working.
fn build_pipeline(model: Option<String>) -> Result<GenerationPipeline> {
    let cfg = GenerationConfig::from_sources(model)?;
    log::debug!("Using model {} ({})", cfg.model, ProviderFamily::of(&cfg.model));

    let selector = EnvProviderSelector::new(cfg.endpoints.clone());

    let pipeline = GenerationPipeline::new(cfg, Box::new(GitCli), Box::new(selector))
        .with_stage_observer(spinner_observer(spinner()));

    Ok(pipeline)
}

/// Spin `pb` while the provider works. The bar is reused across regenerations.
fn spinner_observer(pb: ProgressBar) -> impl Fn(Stage) + 'static {
    move |stage| match stage {
        Stage::AwaitingProvider => {
            // A finished bar ignores ticks until it is reset.
            pb.reset();
            pb.set_message("Generating your pull request...");
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        Stage::Done | Stage::Failed => pb.finish_and_clear(),
        _ => {}
    }
}

fn run_generate(branch: Option<&str>, model: Option<String>, plain: bool) -> Result<()> {
    let pipeline = build_pipeline(model)?;
    let description = pipeline.generate(branch)?;

    let pretty = pipeline.config().pretty_print && !plain;
    print_description(&description, pretty);
    Ok(())
}

fn run_create(
    branch: Option<&str>,
    model: Option<String>,
    title: Option<String>,
    draft: bool,
    yes: bool,
) -> Result<()> {
    let git = GitCli;
    let remote = git.repository_url()?;
    let slug = github::parse_repo_slug(&remote)
        .ok_or_else(|| anyhow!("could not determine GitHub repository from remote {remote:?}"))?;
    // Fail on a missing token before spending any tokens on generation.
    let gh = GitHubClient::from_env(slug)?;

    let pipeline = build_pipeline(model)?;
    pipeline.check_credentials()?;
    let target = pipeline.resolve_target(branch)?;

    let description = loop {
        let response = pipeline.generate(Some(&target))?;
        print_description(&response, pipeline.config().pretty_print);

        if yes {
            break response;
        }

        let answer =
            prompt_input("Create this pull request? [y]es / [r]egenerate / [N]o: ")?.to_lowercase();
        match answer.as_str() {
            "y" | "yes" => break response,
            "r" | "regenerate" => continue,
            _ => {
                println!("Aborted, no pull request was created.");
                return Ok(());
            }
        }
    };

    let title = match title {
        Some(t) => t,
        None => prompt_input("Provide a title for your pull request: ")?,
    };
    if title.is_empty() {
        return Err(anyhow!("a pull request title is required"));
    }

    let head = git.current_branch()?;
    let body = strip_code_fence(&description);
    let url = gh
        .create_pull_request(&NewPullRequest {
            head: &head,
            base: &target,
            title: &title,
            body: &body,
            draft,
        })
        .context("failed to create pull request")?;

    println!("Pull request created at {url}");
    Ok(())
}

fn run_models() -> Result<()> {
    let cfg = GenerationConfig::from_sources(None)?;

    for (name, family) in SUPPORTED_MODELS {
        let marker = if *name == cfg.model { "*" } else { " " };
        println!(
            "{marker} {name:<26} {family:<10} {}",
            family.credential_var()
        );
    }
    Ok(())
}

fn run_config(action: &ConfigAction) -> Result<()> {
    let path = config::config_path().ok_or_else(|| anyhow!("could not determine home directory"))?;

    match action {
        ConfigAction::Ls => {
            let cfg = GenerationConfig::from_sources(None)?;
            let data = serde_json::to_string_pretty(&cfg).context("failed to encode config")?;
            println!("{data}");
        }
        ConfigAction::Init => {
            if config::write_default_config(&path)? {
                println!("Wrote default configuration to {}", path.display());
            } else {
                println!("Configuration already exists at {}", path.display());
            }
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    match cli.command {
        Command::Generate {
            branch,
            model,
            plain,
        } => run_generate(branch.as_deref(), model, plain),
        Command::Create {
            branch,
            model,
            title,
            draft,
            yes,
        } => run_create(branch.as_deref(), model, title, draft, yes),
        Command::Models => run_models(),
        Command::Config { action } => run_config(&action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;
    use propr::llm::{Message, ProviderClient, ProviderSelector};
    use propr::{GenerateError, GitError};
    use std::sync::{Arc, Mutex};

    struct OneFileGit;

    impl VersionControl for OneFileGit {
        fn current_branch(&self) -> Result<String, GitError> {
            Ok("feature/search".to_string())
        }

        fn diff(&self, _: &str, _: &str) -> Result<String, GitError> {
            Ok("diff --git a/src/lib.rs b/src/lib.rs\n+pub fn search() {}".to_string())
        }

        fn commit_subjects(&self, _: &str, _: &str) -> Result<Vec<String>, GitError> {
            Ok(vec!["Add search".to_string()])
        }

        fn default_branch(&self) -> Result<String, GitError> {
            Ok("main".to_string())
        }

        fn repository_url(&self) -> Result<String, GitError> {
            Ok("https://github.com/acme/widgets".to_string())
        }
    }

    /// Records whether the spinner was live each time the provider was called.
    #[derive(Clone)]
    struct SpinnerWitness {
        pb: ProgressBar,
        live: Arc<Mutex<Vec<bool>>>,
    }

    impl ProviderClient for SpinnerWitness {
        fn family(&self) -> ProviderFamily {
            ProviderFamily::OpenAi
        }

        fn create_message(
            &self,
            _system: &str,
            _messages: &[Message],
            _deadline: Duration,
        ) -> Result<String, GenerateError> {
            self.live.lock().unwrap().push(!self.pb.is_finished());
            Ok("# Description".to_string())
        }
    }

    impl ProviderSelector for SpinnerWitness {
        fn select(&self, _model: &str) -> Result<Box<dyn ProviderClient>, GenerateError> {
            Ok(Box::new(self.clone()))
        }
    }

    #[test]
    fn spinner_runs_again_after_regenerate() {
        let pb = spinner();
        pb.set_draw_target(ProgressDrawTarget::hidden());
        let witness = SpinnerWitness {
            pb: pb.clone(),
            live: Arc::default(),
        };

        let pipeline = GenerationPipeline::new(
            GenerationConfig::default(),
            Box::new(OneFileGit),
            Box::new(witness.clone()),
        )
        .with_stage_observer(spinner_observer(pb.clone()));

        pipeline.generate(Some("main")).unwrap();
        assert!(pb.is_finished());
        pipeline.generate(Some("main")).unwrap();

        assert_eq!(*witness.live.lock().unwrap(), vec![true, true]);
        assert!(pb.is_finished());
    }
}
