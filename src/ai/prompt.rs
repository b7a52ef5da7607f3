use crate::github::{Activity, ActivityKind};

/// Digest returned when there is nothing to report
pub const NO_ACTIVITY: &str = "No GitHub activity found for the specified period.";

/// Descriptions of this many characters or more are left out of the digest.
/// Counted in characters, not bytes.
const MAX_DESCRIPTION_CHARS: usize = 200;

/// System instruction sent with every report request
pub const SYSTEM_PROMPT: &str = "You are an AI assistant helping to generate professional standup reports based on GitHub activity.

Your task is to create a concise, well-structured standup report that summarizes the developer's work from the previous day(s). The report should be written in first person and include:

1. **Yesterday's Accomplishments**: What was completed/worked on
2. **Today's Plans**: Logical next steps based on the activity (be realistic)
3. **Blockers/Challenges**: Any potential issues or dependencies mentioned

Guidelines:
- Keep it professional but conversational
- Focus on meaningful work rather than trivial commits
- Group related activities together
- Highlight significant contributions like new features, bug fixes, or reviews
- Be concise but informative
- Use bullet points for clarity
- Avoid technical jargon that non-developers wouldn't understand

Format the output as a clean, readable report without any markdown headers.";

/// Wrap a digest in the user message of the report request
pub fn user_prompt(digest: &str) -> String {
    format!(
        "Based on the following GitHub activity, generate a standup report:\n\n{}",
        digest
    )
}

/// Render activities as the plain-text digest fed to the model
pub fn format_activities(activities: &[Activity]) -> String {
    if activities.is_empty() {
        return NO_ACTIVITY.to_string();
    }

    let mut digest = String::new();

    for kind in ActivityKind::ALL {
        let mut section = activities.iter().filter(|a| a.kind == kind).peekable();
        if section.peek().is_none() {
            continue;
        }

        digest.push_str(section_header(kind));
        digest.push('\n');

        for activity in section {
            digest.push_str(&format!("- [{}] {}\n", activity.repository, activity.title));
            if let Some(detail) = detail_line(activity) {
                digest.push_str(&format!("  Description: {}\n", detail));
            }
        }

        digest.push('\n');
    }

    digest
}

fn section_header(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Commit => "COMMITS:",
        ActivityKind::PullRequest => "PULL REQUESTS:",
        ActivityKind::Issue => "ISSUES:",
        ActivityKind::Review => "CODE REVIEWS:",
    }
}

fn detail_line(activity: &Activity) -> Option<&str> {
    match activity.kind {
        ActivityKind::Commit => {
            if activity.description == activity.title {
                None
            } else {
                commit_body_line(&activity.description)
            }
        }
        ActivityKind::PullRequest | ActivityKind::Issue => {
            let description = activity.description.trim();
            let short = activity.description.chars().count() < MAX_DESCRIPTION_CHARS;
            (!description.is_empty() && short).then_some(description)
        }
        ActivityKind::Review => None,
    }
}

/// The line after the subject of a commit message. A single blank separator
/// line after the subject is skipped; nothing past that line is ever used.
fn commit_body_line(message: &str) -> Option<&str> {
    let mut rest = message.lines().skip(1);
    let line = match rest.next()? {
        separator if separator.trim().is_empty() => rest.next()?,
        line => line,
    };

    let line = line.trim();
    (!line.is_empty()).then_some(line)
}
