use serde::Serialize;

pub const TEST_SYSTEM_PROMPT: &str = "You are a Golang expert. Generate a high-quality unit test \
for the given function, ensuring coverage of edge cases and using appropriate mocks where necessary.";

pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a Go language expert. Analyze the following code \
diff and identify key function changes along with their impact.";

/// One chat message in OpenAI wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

pub fn test_messages(function_source: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(TEST_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "Generate a unit test for this function:\n\n{function_source}"
        )),
    ]
}

pub fn analysis_messages(diff: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(ANALYSIS_SYSTEM_PROMPT),
        ChatMessage::user(diff),
    ]
}

/// Pull the body out of the first fenced code block in `reply`, or return
/// the whole reply trimmed when it has no fence. The result always ends with
/// a single newline.
pub fn strip_code_fence(reply: &str) -> String {
    let Some(open) = reply.find("```") else {
        return format!("{}\n", reply.trim());
    };
    let after_fence = &reply[open + 3..];
    // skip the info string (`go`, `golang`, ...)
    let body_start = after_fence.find('\n').map_or(after_fence.len(), |i| i + 1);
    let body = &after_fence[body_start..];
    let body = match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    };
    let mut out = body.trim_end().to_string();
    out.push('\n');
    out
}
