//! Byte spans into source text.

/// A half-open range of byte offsets into one source file.
///
/// Spans carry no file identity of their own; pairing a span with its file
/// is [`Location`](crate::context::Location)'s job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: SpanIndex,
    pub end: SpanIndex,
}

/// The integer type used for span offsets.
type SpanIndex = u32;

impl Span {
    /// The number of bytes covered. Multi-byte characters make this larger
    /// than the character count.
    pub fn length(&self) -> SpanIndex {
        self.end - self.start
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}
