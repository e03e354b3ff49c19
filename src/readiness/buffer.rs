/// Output captured from the child while the relay is suppressed.
///
/// Bytes are kept raw; matching happens on bytes so a multi-byte glyph
/// split across two chunks is still found once both halves arrive.
#[derive(Debug, Default, Clone)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte offset where the prompt tail starts.
    ///
    /// The prompt marker is the first one following any separator; the
    /// tail begins at the start of the line holding the last separator
    /// before that marker. Separator glyphs in banner decoration above
    /// the prompt are therefore never part of the tail.
    pub fn prompt_tail_offset(&self, separator: &[u8], marker: &[u8]) -> Option<usize> {
        if separator.is_empty() {
            return None;
        }
        let first = find(&self.bytes, separator)?;
        let after = first + separator.len();
        let marker_at = after + find(&self.bytes[after..], marker)?;
        let nearest = rfind(&self.bytes[..marker_at], separator)?;
        let line_start = self.bytes[..nearest]
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |nl| nl + 1);
        Some(line_start)
    }

    /// The bytes from the prompt tail onward, if a prompt was rendered.
    pub fn prompt_tail(&self, separator: &[u8], marker: &[u8]) -> Option<&[u8]> {
        self.prompt_tail_offset(separator, marker)
            .map(|offset| &self.bytes[offset..])
    }

    /// Drop everything captured so far.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.bytes.shrink_to_fit();
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}
