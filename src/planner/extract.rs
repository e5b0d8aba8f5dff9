//! Pulling the JSON payload out of a model reply.

/// The JSON part of a model reply.
///
/// Models like to wrap JSON in Markdown fences. A ```` ```json ```` fence
/// wins; failing that, the first bare ```` ``` ```` fence; failing that,
/// the whole reply. An unterminated fence runs to the end of the reply.
pub fn extract_json(reply: &str) -> &str {
    let reply = reply.trim();
    let body = if let Some((_, rest)) = reply.split_once("```json") {
        rest
    } else if let Some((_, rest)) = reply.split_once("```") {
        rest
    } else {
        return reply;
    };
    body.split_once("```")
        .map_or(body, |(inner, _)| inner)
        .trim()
}
