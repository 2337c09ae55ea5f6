//! Fenced code blocks.

use crate::syntax::SyntaxKind;

use super::CODE_BLOCK_INDENT;
use super::blocks::{BlockContext, BlockParse, Continuation};
use super::state::LineState;
use super::utils::strip_newline;

/// Try to parse an opening fence at the cursor. Returns the fence
/// character and length. A backtick fence may not carry backticks in
/// its info string.
pub(crate) fn try_parse_fence_open(line: &LineState) -> Option<(char, usize)> {
    if line.indent() >= CODE_BLOCK_INDENT {
        return None;
    }
    let content = line.content();
    let fence_char = content.chars().next()?;
    if !matches!(fence_char, '`' | '~') {
        return None;
    }
    let fence_len = content.chars().take_while(|&c| c == fence_char).count();
    if fence_len < 3 {
        return None;
    }
    let (info, _) = strip_newline(&content[fence_len..]);
    if fence_char == '`' && info.contains('`') {
        return None;
    }
    Some((fence_char, fence_len))
}

#[derive(Debug, Clone)]
pub(crate) struct FencedCodeParser {
    fence_char: char,
    fence_len: usize,
    /// Indent of the opening fence; content lines shed up to this much.
    indent: usize,
    /// Set when the current line is the closing fence; the driver
    /// closes the block after emitting it.
    pub(crate) closing: bool,
}

impl FencedCodeParser {
    pub(crate) fn new(fence_char: char, fence_len: usize, indent: usize) -> Self {
        Self {
            fence_char,
            fence_len,
            indent,
            closing: false,
        }
    }

    fn is_closing_fence(&self, line: &LineState) -> bool {
        if line.is_blank() || line.indent() >= CODE_BLOCK_INDENT {
            return false;
        }
        let content = line.content();
        let run = content
            .chars()
            .take_while(|&c| c == self.fence_char)
            .count();
        if run < self.fence_len {
            return false;
        }
        let (rest, _) = strip_newline(&content[run..]);
        rest.chars().all(|c| c == ' ' || c == '\t')
    }
}

impl BlockParse for FencedCodeParser {
    fn is_container(&self) -> bool {
        false
    }

    fn can_contain(&self, _kind: SyntaxKind) -> bool {
        false
    }

    fn try_continue(&mut self, line: &LineState, _ctx: &BlockContext) -> Continuation {
        if self.is_closing_fence(line) {
            self.closing = true;
            return Continuation::AtIndex(line.index());
        }
        // Content line; shed up to the opening fence's indent.
        Continuation::AtColumn(line.column() + self.indent.min(line.indent()))
    }

    fn propagates_trailing_blank(&self, _children: usize, _is_last_matched: bool) -> bool {
        // Blanks inside fenced code never count for spacing decisions.
        false
    }
}
