use crate::config::GenerationConfig;
use crate::diff::prepare_diff;
use crate::error::GenerateError;
use crate::git::VersionControl;
use crate::llm::conversation::{build_conversation, system_instruction, ConversationContext};
use crate::llm::{truncate, ProviderSelector};
use std::cell::Cell;
use std::fmt;

/// Where a generation currently is. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    FetchingContext,
    Preparing,
    AwaitingProvider,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Idle => "idle",
            Stage::FetchingContext => "fetching context",
            Stage::Preparing => "preparing",
            Stage::AwaitingProvider => "awaiting provider",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

type StageObserver = Box<dyn Fn(Stage)>;

/// Diff, context, conversation, provider: one description per `generate` call.
pub struct GenerationPipeline {
    config: GenerationConfig,
    git: Box<dyn VersionControl>,
    selector: Box<dyn ProviderSelector>,
    observer: Option<StageObserver>,
    stage: Cell<Stage>,
}

impl GenerationPipeline {
    pub fn new(
        config: GenerationConfig,
        git: Box<dyn VersionControl>,
        selector: Box<dyn ProviderSelector>,
    ) -> Self {
        GenerationPipeline {
            config,
            git,
            selector,
            observer: None,
            stage: Cell::new(Stage::Idle),
        }
    }

    /// Get called on every stage transition, e.g. to drive a spinner.
    pub fn with_stage_observer(mut self, observer: impl Fn(Stage) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// The stage the most recent `generate` call reached.
    pub fn stage(&self) -> Stage {
        self.stage.get()
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Make sure the configured model's API key is available. No I/O.
    pub fn check_credentials(&self) -> Result<(), GenerateError> {
        self.selector.check_credentials(&self.config.model)
    }

    /// Resolve the branch to compare against: the given one, or the remote's default.
    pub fn resolve_target(&self, target: Option<&str>) -> Result<String, GenerateError> {
        match target.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => Ok(t.to_string()),
            None => Ok(self.git.default_branch()?),
        }
    }

    /// Generate a description of the current branch against `target`.
    ///
    /// Returns the provider's text verbatim. Errors are returned as they happened;
    /// nothing is retried and no partial result is produced.
    pub fn generate(&self, target: Option<&str>) -> Result<String, GenerateError> {
        let result = self.run(target);
        match &result {
            Ok(_) => self.enter(Stage::Done),
            Err(e) => {
                log::debug!("Generation failed: {e}");
                self.enter(Stage::Failed);
            }
        }
        result
    }

    fn enter(&self, stage: Stage) {
        log::debug!("Pipeline stage: {} -> {stage}", self.stage.get());
        self.stage.set(stage);
        if let Some(observer) = &self.observer {
            observer(stage);
        }
    }

    fn run(&self, target: Option<&str>) -> Result<String, GenerateError> {
        self.enter(Stage::FetchingContext);

        // Resolving the default branch talks to the remote.
        self.check_credentials()?;

        let target = self.resolve_target(target)?;
        let current = self.git.current_branch()?;

        log::debug!("Fetching diff target={target} current={current}");
        let diff = self.git.diff(&current, &target)?;
        if diff.trim().is_empty() {
            return Err(GenerateError::NoChanges { target });
        }

        let commits = self.git.commit_subjects(&current, &target)?;
        let repository_url = self.git.repository_url()?;

        self.enter(Stage::Preparing);

        let cleaned = prepare_diff(&diff);
        let messages = build_conversation(&ConversationContext {
            repository_url: &repository_url,
            branch: &current,
            commits: &commits,
            diff: &cleaned,
        });
        let system = system_instruction(&self.config.prompt, &self.config.template);

        log::debug!("Constructed {} message(s) for the provider", messages.len());
        for m in &messages {
            log::trace!("[{}] {}", m.role, truncate(&m.content, 2000));
        }
        log::debug!("Constructed system instructions:\n{}", truncate(&system, 2000));

        self.enter(Stage::AwaitingProvider);

        let client = self.selector.select(&self.config.model)?;
        log::info!(
            "Requesting description from {} model {}",
            client.family(),
            self.config.model
        );
        client.create_message(&system, &messages, self.config.deadline())
    }
}
