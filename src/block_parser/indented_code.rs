//! Indented code blocks.
//!
//! A block of text indented to the code threshold is verbatim text.
//! Interior blank lines need not be indented; whether a blank line is
//! kept inside the block or closes it is decided by the driver's
//! look-ahead against the next non-blank line.

use crate::syntax::SyntaxKind;

use super::CODE_BLOCK_INDENT;
use super::blocks::{BlockContext, BlockParse, Continuation};
use super::state::LineState;

#[derive(Debug, Clone, Default)]
pub(crate) struct IndentedCodeParser;

impl BlockParse for IndentedCodeParser {
    fn is_container(&self) -> bool {
        false
    }

    fn can_contain(&self, _kind: SyntaxKind) -> bool {
        false
    }

    fn try_continue(&mut self, line: &LineState, _ctx: &BlockContext) -> Continuation {
        if line.is_blank() {
            Continuation::AtIndex(line.next_non_space())
        } else if line.indent() >= CODE_BLOCK_INDENT {
            Continuation::AtColumn(line.column() + CODE_BLOCK_INDENT)
        } else {
            Continuation::None
        }
    }
}
