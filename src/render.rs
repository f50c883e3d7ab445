//! Turning a provider answer into something fit for a terminal or a PR body.

use colored::Colorize;

/// Remove a code fence the model wrapped its whole answer in.
///
/// Only applies when the text starts with three backticks; a language tag on
/// the opening fence line (```` ```markdown ````) goes with it.
pub fn strip_code_fence(content: &str) -> String {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return content.to_string();
    }

    let inner = trimmed.trim_matches('`');
    let inner = match inner.split_once('\n') {
        Some((tag, rest)) if is_fence_tag(tag) => rest,
        _ => inner,
    };
    inner.trim().to_string()
}

fn is_fence_tag(line: &str) -> bool {
    let tag = line.trim();
    !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Colour markdown headings, bullets and fences for terminal display.
pub fn format_markdown(content: &str) -> String {
    let mut out = String::with_capacity(content.len());

    for line in content.lines() {
        let trimmed = line.trim_start();
        let rendered = if trimmed.starts_with('#') {
            line.bold().cyan().to_string()
        } else if let Some(rest) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            let indent = &line[..line.len() - trimmed.len()];
            format!("{indent}{} {rest}", "•".yellow())
        } else if trimmed.starts_with("```") {
            line.bright_black().to_string()
        } else {
            line.to_string()
        };

        out.push_str(&rendered);
        out.push('\n');
    }

    out
}

/// Print the description, either verbatim or with terminal styling.
pub fn print_description(content: &str, pretty: bool) {
    let content = strip_code_fence(content);
    if pretty {
        print!("{}", format_markdown(&content));
    } else {
        println!("{content}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfenced_text_is_untouched() {
        let text = "# Description\n\nUses `foo` now.";
        assert_eq!(strip_code_fence(text), text);
    }

    #[test]
    fn fence_with_language_tag_is_removed() {
        let text = "```markdown\n# Description\n\nAdds search.\n```";
        assert_eq!(strip_code_fence(text), "# Description\n\nAdds search.");
    }

    #[test]
    fn bare_fence_is_removed() {
        let text = "```\n# Description\n```\n";
        assert_eq!(strip_code_fence(text), "# Description");
    }

    #[test]
    fn first_line_that_is_content_is_kept() {
        let text = "```# Description\nBody```";
        assert_eq!(strip_code_fence(text), "# Description\nBody");
    }

    #[test]
    fn markdown_formatting_keeps_text() {
        colored::control::set_override(false);
        let out = format_markdown("# Title\n  - item\nplain");
        assert_eq!(out, "# Title\n  • item\nplain\n");
    }
}
