//! Block quotes: the other container besides lists.

use crate::syntax::SyntaxKind;

use super::CODE_BLOCK_INDENT;
use super::blocks::{BlockContext, BlockParse, Continuation};
use super::state::LineState;

/// If the line carries a quote marker at the cursor, return the byte
/// index just past the marker and its optional following space.
pub(crate) fn scan_quote_marker(line: &LineState) -> Option<usize> {
    if line.indent() >= CODE_BLOCK_INDENT {
        return None;
    }
    if !line.content().starts_with('>') {
        return None;
    }
    let mut index = line.next_non_space() + 1;
    if matches!(line.line().as_bytes().get(index), Some(b' ') | Some(b'\t')) {
        index += 1;
    }
    Some(index)
}

#[derive(Debug, Clone, Default)]
pub(crate) struct BlockQuoteParser;

impl BlockParse for BlockQuoteParser {
    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&self, kind: SyntaxKind) -> bool {
        !kind.is_list_item()
    }

    fn try_continue(&mut self, line: &LineState, _ctx: &BlockContext) -> Continuation {
        match scan_quote_marker(line) {
            Some(index) => Continuation::AtIndex(index),
            // No marker: stop matching and let the driver decide
            // whether the line is a lazy continuation.
            None => Continuation::None,
        }
    }

    fn propagates_trailing_blank(&self, _children: usize, _is_last_matched: bool) -> bool {
        // Quote lines are never blank, they start with the marker.
        false
    }
}
