//! Reply normalisation and decision parsing.
//!
//! Models regularly ignore the "no markdown" instruction and wrap the JSON in
//! a fenced code block, sometimes with prose around it. The cleanup rule is:
//!
//! 1. A reply that starts with `{` is used as is.
//! 2. Otherwise the content of the first fenced block is used, minus a
//!    bare-word info string such as `json`. An unterminated fence runs to the
//!    end of the reply.
//! 3. Otherwise the trimmed reply is used.

use veredito_core::Decisao;

use crate::error::ProtocolError;

const FENCE: &str = "```";

/// Strip markdown code fences from a reasoning-service reply.
pub fn strip_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    if trimmed.starts_with('{') {
        return trimmed;
    }

    let Some(open) = trimmed.find(FENCE) else {
        return trimmed;
    };
    let after = &trimmed[open + FENCE.len()..];
    let block = match after.find(FENCE) {
        Some(close) => &after[..close],
        None => after,
    };

    let block = block.trim();
    let body = match block.split_once('\n') {
        Some((info, rest)) if is_info_string(info) => rest,
        _ => strip_json_tag(block),
    };
    body.trim()
}

/// `json`, `JSON`, `json5`... a single word on the opening fence line.
fn is_info_string(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty()
        && line
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Handles a one-line block such as ```` ```json{...}``` ````.
fn strip_json_tag(block: &str) -> &str {
    match block.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &block[4..],
        _ => block,
    }
}

/// Parse a raw reply into a [`Decisao`].
///
/// Fails with [`ProtocolError::Parse`] when the cleaned text is not JSON and
/// with [`ProtocolError::Schema`] when it is JSON of the wrong shape, including
/// a `decision` value outside the three literals.
pub fn parse_decision(reply: &str) -> Result<Decisao, ProtocolError> {
    let cleaned = strip_fences(reply);
    let value: serde_json::Value = serde_json::from_str(cleaned).map_err(ProtocolError::Parse)?;
    serde_json::from_value(value).map_err(ProtocolError::Schema)
}
