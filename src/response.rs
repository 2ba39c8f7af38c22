//! Pulls the generated document out of a chat-completion response.

use crate::error::{Error, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// Extracts `choices[0].message.content` from a completion response body.
///
/// Fields other than the first choice's content are ignored.
///
/// # Errors
///
/// Returns [`Error::Envelope`] if the body is not JSON of the expected
/// shape or any step of the path is missing.
pub fn extract_content(body: &str) -> Result<String> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| Error::envelope(format!("body is not a completion object: {e}")))?;

    let first = envelope
        .choices
        .ok_or_else(|| Error::envelope("missing 'choices'"))?
        .into_iter()
        .next()
        .ok_or_else(|| Error::envelope("'choices' is empty"))?;

    first
        .message
        .ok_or_else(|| Error::envelope("missing 'choices[0].message'"))?
        .content
        .ok_or_else(|| Error::envelope("missing 'choices[0].message.content'"))
}
