//! Parsing of chat-completion replies into release text.

use serde::Deserialize;

/// Replies shorter than this are treated as failed generations.
pub const MIN_CONTENT_CHARS: usize = 100;

/// Structured reply shape some prompts coax out of the model.
#[derive(Debug, Deserialize)]
pub struct ReplyEnvelope {
    pub content: String,
    #[serde(default)]
    pub tone: Option<String>,
}

/// Text and optional tone pulled from a reply.
#[derive(Debug, PartialEq)]
pub struct ParsedReply {
    pub content: String,
    pub tone: Option<String>,
}

/// Body of the first ``` fenced block anywhere in the reply, without its
/// info string. An unclosed fence runs to the end of the text.
pub fn fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")? + 3;
    let inner = &raw[start..];
    let inner = match inner.find("```") {
        Some(end) => &inner[..end],
        None => inner,
    };
    // drop the info string, e.g. "json" or "markdown"
    let body = match inner.find('\n') {
        Some(idx) => &inner[idx + 1..],
        None => inner,
    };
    Some(body.trim())
}

/// Drop every fence marker line, keeping the text around and between them.
pub fn strip_code_fences(raw: &str) -> String {
    raw.trim()
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_envelope(text: &str) -> Option<ParsedReply> {
    let envelope = serde_json::from_str::<ReplyEnvelope>(text.trim()).ok()?;
    Some(ParsedReply {
        content: normalize(&envelope.content),
        tone: envelope.tone.filter(|t| !t.trim().is_empty()),
    })
}

/// Two steps: a JSON envelope first (fenced or bare), then the reply as raw
/// text with fence markers removed.
pub fn parse(raw: &str) -> ParsedReply {
    if let Some(parsed) = fenced_block(raw).and_then(decode_envelope) {
        return parsed;
    }
    if let Some(parsed) = decode_envelope(raw) {
        return parsed;
    }
    ParsedReply {
        content: normalize(&strip_code_fences(raw)),
        tone: None,
    }
}

/// Trim trailing spaces on each line and collapse runs of blank lines.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.trim().lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.truncate(out.trim_end().len());
    out
}

pub fn is_too_short(content: &str) -> bool {
    content.chars().count() < MIN_CONTENT_CHARS
}
