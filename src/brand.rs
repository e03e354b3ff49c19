//! Literal brand substitution on the child's output stream.
//!
//! Works line by line so a name split across two chunks is still
//! replaced. Bytes are never decoded; escape sequences pass through.

/// Dropped only when it follows a `Sonnet X.Y` model label.
const MODEL_SUFFIX: &[u8] = " · Claude API".as_bytes();

const REPLACEMENTS: &[(&[u8], &[u8])] = &[
    (b"Claude Code", b"Son of Anton"),
    (b"Claude API", b""),
    (b"Son of Anton API", b""),
    (b"claude.ai/code", b"github.com/jahluwalia/son-of-anton"),
];

#[derive(Debug, Default)]
pub struct BrandPatcher {
    pending: Vec<u8>,
}

impl BrandPatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk; returns every completed line, patched.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<u8> {
        self.pending.extend_from_slice(chunk);
        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);
        patch(&complete)
    }

    /// Emit whatever is left without waiting for a newline.
    pub fn flush(&mut self) -> Vec<u8> {
        let rest = std::mem::take(&mut self.pending);
        patch(&rest)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Apply every replacement, in order, to `input`.
pub fn patch(input: &[u8]) -> Vec<u8> {
    let mut out = strip_model_suffix(input);
    for (from, to) in REPLACEMENTS {
        out = replace_all(&out, from, to);
    }
    out
}

fn strip_model_suffix(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i..].starts_with(MODEL_SUFFIX) && ends_with_sonnet_label(&out) {
            i += MODEL_SUFFIX.len();
        } else {
            out.push(input[i]);
            i += 1;
        }
    }
    out
}

/// `...Sonnet <digits>.<digits>` at the end of `text`.
fn ends_with_sonnet_label(text: &[u8]) -> bool {
    let minor = text.iter().rev().take_while(|b| b.is_ascii_digit()).count();
    let Some(rest) = text[..text.len() - minor].strip_suffix(b".") else {
        return false;
    };
    let major = rest.iter().rev().take_while(|b| b.is_ascii_digit()).count();
    minor > 0 && major > 0 && rest[..rest.len() - major].ends_with(b"Sonnet ")
}

fn replace_all(haystack: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;
    while i < haystack.len() {
        if haystack[i..].starts_with(from) {
            out.extend_from_slice(to);
            i += from.len();
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    out
}
