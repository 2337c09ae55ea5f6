//! Per-line cursor over one source line.
//!
//! Columns are tab-expanded (tab stop = 4); byte indices address the
//! original line so token emission stays lossless. Container parsers
//! advance the cursor as they consume their per-line prefix; whatever
//! remains belongs to the innermost block.

const TAB_STOP: usize = 4;

#[derive(Debug, Clone)]
pub(crate) struct LineState<'a> {
    line: &'a str,
    index: usize,
    column: usize,
    next_non_space: usize,
    next_non_space_column: usize,
    blank: bool,
}

impl<'a> LineState<'a> {
    pub(crate) fn new(line: &'a str) -> Self {
        let mut state = Self {
            line,
            index: 0,
            column: 0,
            next_non_space: 0,
            next_non_space_column: 0,
            blank: false,
        };
        state.find_next_non_space();
        state
    }

    pub(crate) fn line(&self) -> &'a str {
        self.line
    }

    /// Byte index of the next unconsumed character.
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    /// Tab-expanded column of the next unconsumed character.
    pub(crate) fn column(&self) -> usize {
        self.column
    }

    pub(crate) fn next_non_space(&self) -> usize {
        self.next_non_space
    }

    pub(crate) fn next_non_space_column(&self) -> usize {
        self.next_non_space_column
    }

    /// Whitespace width between the cursor and the first content
    /// character.
    pub(crate) fn indent(&self) -> usize {
        self.next_non_space_column - self.column
    }

    /// True when nothing but whitespace remains on the line.
    pub(crate) fn is_blank(&self) -> bool {
        self.blank
    }

    /// The unconsumed tail of the line.
    pub(crate) fn rest(&self) -> &'a str {
        &self.line[self.index..]
    }

    /// The line content starting at the first non-space character.
    pub(crate) fn content(&self) -> &'a str {
        &self.line[self.next_non_space..]
    }

    fn find_next_non_space(&mut self) {
        let mut index = self.index;
        let mut column = self.column;
        for b in self.line.as_bytes()[self.index..].iter() {
            match b {
                b' ' => {
                    index += 1;
                    column += 1;
                }
                b'\t' => {
                    index += 1;
                    column += TAB_STOP - (column % TAB_STOP);
                }
                _ => break,
            }
        }
        self.next_non_space = index;
        self.next_non_space_column = column;
        let rest = &self.line[index..];
        self.blank = rest.is_empty() || rest == "\n" || rest == "\r\n";
    }

    /// Consume forward to a byte index, expanding tabs for the column.
    pub(crate) fn advance_to_index(&mut self, index: usize) {
        debug_assert!(index >= self.index, "cursor may only move forward");
        for ch in self.line[self.index..index].chars() {
            if ch == '\t' {
                self.column += TAB_STOP - (self.column % TAB_STOP);
            } else {
                self.column += 1;
            }
        }
        self.index = index;
        self.find_next_non_space();
    }

    /// Consume whitespace forward until the cursor reaches (or a tab
    /// overshoots) the target column. Stops early at the first
    /// non-whitespace character.
    pub(crate) fn advance_to_column(&mut self, column: usize) {
        while self.column < column {
            match self.line.as_bytes().get(self.index) {
                Some(b' ') => {
                    self.index += 1;
                    self.column += 1;
                }
                Some(b'\t') => {
                    self.index += 1;
                    self.column += TAB_STOP - (self.column % TAB_STOP);
                }
                _ => break,
            }
        }
        self.find_next_non_space();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_counts_columns_not_bytes() {
        let state = LineState::new("\tcode\n");
        assert_eq!(state.indent(), 4);
        assert_eq!(state.next_non_space(), 1);
    }

    #[test]
    fn blank_detection_handles_line_endings() {
        assert!(LineState::new("   \n").is_blank());
        assert!(LineState::new("\t\r\n").is_blank());
        assert!(LineState::new("").is_blank());
        assert!(!LineState::new("  x\n").is_blank());
    }

    #[test]
    fn advance_to_column_stops_at_content() {
        let mut state = LineState::new("  text\n");
        state.advance_to_column(4);
        assert_eq!(state.index(), 2);
        assert_eq!(state.column(), 2);
        assert_eq!(state.rest(), "text\n");
    }

    #[test]
    fn advance_to_column_consumes_whole_tab() {
        let mut state = LineState::new("\tcode\n");
        state.advance_to_column(2);
        assert_eq!(state.index(), 1);
        assert_eq!(state.column(), 4);
    }

    #[test]
    fn advance_to_index_tracks_indent() {
        let mut state = LineState::new("> quoted\n");
        state.advance_to_index(2);
        assert_eq!(state.column(), 2);
        assert_eq!(state.indent(), 0);
        assert_eq!(state.rest(), "quoted\n");
    }
}
