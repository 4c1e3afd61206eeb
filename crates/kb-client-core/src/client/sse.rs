//! Assembles the server-sent event body of the chat stream into one reply

use tracing::warn;

use super::CallError;

const DATA_PREFIX: &str = "data:";
const DONE_MARKER: &str = "[DONE]";
const ERROR_PREFIX: &str = "Error:";
/// Line breaks inside the reply are sent escaped so they cannot end an event
const ESCAPED_NEWLINE: &str = "\\n";

/// Concatenates every `data:` payload up to the `[DONE]` marker. A payload
/// starting with `Error:` fails the whole reply, the server sends those with a
/// success status.
pub(crate) fn assemble_reply(body: &str) -> Result<String, CallError> {
    let mut reply = String::new();
    for line in body.lines() {
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            continue;
        };
        // Only the single separator space is dropped, a lone space is content
        let payload = payload.strip_prefix(' ').unwrap_or(payload);
        if payload == DONE_MARKER {
            return Ok(reply);
        }
        if let Some(err) = payload.strip_prefix(ERROR_PREFIX) {
            return Err(CallError::Stream(err.trim().to_string()));
        }
        reply.push_str(&payload.replace(ESCAPED_NEWLINE, "\n"));
    }
    warn!(len = reply.len(), "chat stream ended without the done marker");
    Ok(reply)
}
