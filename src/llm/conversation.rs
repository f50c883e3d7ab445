use super::prompts;
use super::Message;

/// What the provider is told about the branch before it sees the diff.
#[derive(Debug, Clone, Copy)]
pub struct ConversationContext<'a> {
    pub repository_url: &'a str,
    pub branch: &'a str,
    pub commits: &'a [String],
    pub diff: &'a str,
}

/// Walk the model through repository, branch and commits before handing it the diff.
///
/// Turns alternate user/assistant and always end on the user turn holding the diff.
pub fn build_conversation(ctx: &ConversationContext<'_>) -> Vec<Message> {
    vec![
        Message::user(ctx.repository_url),
        Message::assistant(prompts::ACK_REPOSITORY),
        Message::user(ctx.branch),
        Message::assistant(prompts::ACK_BRANCH),
        Message::user(ctx.commits.join("\n")),
        Message::assistant(prompts::ACK_COMMITS),
        Message::user(ctx.diff),
    ]
}

/// The configured prompt followed by the body template the answer must follow.
pub fn system_instruction(prompt: &str, template: &str) -> String {
    format!(
        "{prompt}\n\n{directive}\n\n{template}",
        directive = prompts::TEMPLATE_DIRECTIVE
    )
}
