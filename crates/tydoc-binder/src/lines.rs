use oxc_span::Span;
use tydoc::SourcePos;

/// Byte offset to 1-based line lookup for one source text.
#[derive(Debug)]
pub(crate) struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub(crate) fn new(source: &str) -> Self {
        let mut line_starts = Vec::with_capacity(128);
        line_starts.push(0);
        for (idx, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((idx + 1) as u32);
            }
        }
        Self { line_starts }
    }

    pub(crate) fn line(&self, offset: u32) -> u32 {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        idx as u32 + 1
    }

    /// Position covering `span`. The end offset is exclusive.
    pub(crate) fn pos(&self, path: &str, span: Span) -> SourcePos {
        let last = span.end.saturating_sub(1).max(span.start);
        SourcePos::new(path, self.line(span.start), self.line(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_offsets_to_lines() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.line(0), 1);
        assert_eq!(index.line(2), 2);
        assert_eq!(index.line(3), 2);
        assert_eq!(index.line(5), 3);
        assert_eq!(index.line(6), 4);
    }

    #[test]
    fn span_ending_at_newline_stays_on_its_line() {
        let index = LineIndex::new("class A {\n}\nnext");
        let pos = index.pos("a.ts", Span::new(0, 11));
        assert_eq!((pos.first_line, pos.last_line), (1, 2));
    }
}
