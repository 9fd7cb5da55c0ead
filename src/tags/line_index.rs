//! Byte offset to line number mapping

/// Line start offsets for one text buffer
///
/// Holds the offset following every `\n`, plus a trailing sentinel equal to
/// the buffer length. The line owning offset `o` is the smallest index `i`
/// with `offsets[i] > o`, reported 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    offsets: Vec<usize>,
}

impl LineIndex {
    pub fn build(text: &str) -> Self {
        let mut offsets: Vec<usize> = text
            .bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n')
            .map(|(i, _)| i + 1)
            .collect();
        offsets.push(text.len());
        Self { offsets }
    }

    /// Start a monotonic lookup cursor at line 1
    pub fn cursor(&self) -> LineCursor<'_> {
        LineCursor {
            offsets: &self.offsets,
            position: 0,
        }
    }

    /// Source text of a 1-based line, without its line terminator
    pub fn line_text<'t>(&self, text: &'t str, line: usize) -> &'t str {
        let Some(&end) = self.offsets.get(line.saturating_sub(1)) else {
            return "";
        };
        let start = match line {
            0 | 1 => 0,
            n => self.offsets[n - 2],
        };
        text.get(start..end)
            .unwrap_or("")
            .trim_end_matches('\n')
            .trim_end_matches('\r')
    }
}

/// Forward-only position in a [`LineIndex`]
///
/// Queries must come in non-decreasing offset order; the cursor never moves
/// back, so a full scan costs one pass over the lines plus one step per query.
pub struct LineCursor<'a> {
    offsets: &'a [usize],
    position: usize,
}

impl LineCursor<'_> {
    /// Advance to the line owning `offset` and return it (1-based)
    ///
    /// Offsets at or past the sentinel resolve to the last line.
    pub fn line_of(&mut self, offset: usize) -> usize {
        while self.position + 1 < self.offsets.len() && self.offsets[self.position] <= offset {
            self.position += 1;
        }
        self.position + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_records_line_starts_and_sentinel() {
        let index = LineIndex::build("ab\ncd\n");
        assert_eq!(index.offsets, vec![3, 6, 6]);
        assert_eq!(LineIndex::build("").offsets, vec![0]);
        assert_eq!(LineIndex::build("no newline").offsets, vec![10]);
    }

    #[test]
    fn test_first_and_last_byte() {
        let text = "one\ntwo\nthree";
        let index = LineIndex::build(text);
        let mut cursor = index.cursor();
        assert_eq!(cursor.line_of(0), 1);
        assert_eq!(cursor.line_of(text.len() - 1), 3);
    }

    #[test]
    fn test_newline_byte_belongs_to_its_line() {
        let index = LineIndex::build("a\nb\n");
        let mut cursor = index.cursor();
        assert_eq!(cursor.line_of(1), 1);
        assert_eq!(cursor.line_of(2), 2);
        assert_eq!(cursor.line_of(3), 2);
    }

    #[test]
    fn test_monotonic_over_increasing_offsets() {
        let text = "fn a() {}\n\n\nfn b() {}\nfn c() {}\n";
        let index = LineIndex::build(text);
        let mut cursor = index.cursor();
        let lines: Vec<usize> = (0..text.len()).map(|o| cursor.line_of(o)).collect();
        assert!(lines.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(lines[0], 1);
        assert_eq!(*lines.last().unwrap(), 5);
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let index = LineIndex::build("x\n");
        let mut cursor = index.cursor();
        assert_eq!(cursor.line_of(100), 2);
    }

    #[test]
    fn test_line_text() {
        let text = "int x;\r\nint y = x;\nlast";
        let index = LineIndex::build(text);
        assert_eq!(index.line_text(text, 1), "int x;");
        assert_eq!(index.line_text(text, 2), "int y = x;");
        assert_eq!(index.line_text(text, 3), "last");
        assert_eq!(index.line_text(text, 9), "");
    }
}
