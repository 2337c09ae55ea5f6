//! Paragraphs: the fall-through leaf block.
//!
//! A paragraph continues on any non-blank line; whether a line reaches
//! it at all is decided by the containers above it and by lazy
//! continuation in the driver.

use crate::syntax::SyntaxKind;

use super::blocks::{BlockContext, BlockParse, Continuation};
use super::state::LineState;

#[derive(Debug, Clone, Default)]
pub(crate) struct ParagraphParser;

impl BlockParse for ParagraphParser {
    fn is_container(&self) -> bool {
        false
    }

    fn can_contain(&self, _kind: SyntaxKind) -> bool {
        false
    }

    fn try_continue(&mut self, line: &LineState, _ctx: &BlockContext) -> Continuation {
        if line.is_blank() {
            Continuation::None
        } else {
            Continuation::AtIndex(line.index())
        }
    }
}
