pub const DEFAULT_PROMPT: &str = r#"You will be asked to write a concise GitHub PR description based on a provided git diff.
You will first receive the repository URL, the branch name and the commit messages so you have
enough context to write a proper description.
Analyze the code changes and provide a concise explanation of the changes, their context and why they were made.
Don't reference file names or directories directly, instead give a general explanation of the changes made.
Do not treat imports and requires as changes or new features.
If the provided message is not a diff respond with an appropriate message.
Only answer with the raw markdown description matching the template, do not include any other text.
Don't wrap your response in a markdown code block since GitHub will render it properly."#;

pub const DEFAULT_TEMPLATE: &str = "# Description";

pub const TEMPLATE_DIRECTIVE: &str = "Follow this exact template to write your description:";

pub const ACK_REPOSITORY: &str = "Thanks for providing the repository URL. What about the branch?";

pub const ACK_BRANCH: &str = "Thanks for providing the branch. What about the commit messages?";

pub const ACK_COMMITS: &str = "Thanks for providing the commit messages. Now the final step to \
generate a description is to see what's changed using the diff";
