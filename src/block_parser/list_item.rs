//! Block parser for one list item.
//!
//! Blank lines are intercepted here; everything else is delegated to
//! the dialect rule selected for the document. The two sticky flags
//! are the item's only memory across lines.

use crate::syntax::SyntaxKind;

use super::blocks::{BlockContext, BlockParse, Continuation};
use super::emulation::rule_for;
use super::lists::ListData;
use super::state::LineState;

#[derive(Debug, Clone)]
pub(crate) struct ListItemParser {
    /// This item's own marker geometry, recomputed at item start.
    pub(crate) data: ListData,
    /// Set once a blank line has been seen while this item is open.
    pub(crate) had_blank_line: bool,
    /// True only while the item has no child blocks yet.
    pub(crate) is_empty: bool,
}

impl ListItemParser {
    pub(crate) fn new(data: ListData) -> Self {
        Self {
            data,
            had_blank_line: false,
            is_empty: false,
        }
    }
}

impl BlockParse for ListItemParser {
    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&self, _kind: SyntaxKind) -> bool {
        true
    }

    fn try_continue(&mut self, line: &LineState, ctx: &BlockContext) -> Continuation {
        if line.is_blank() {
            // Record whether the item was empty at this moment; the
            // empty-item rejection in the dialect rules needs it.
            self.is_empty = ctx.self_children == 0;
            self.had_blank_line = true;
            return Continuation::AtIndex(line.next_non_space());
        }

        let rule = rule_for(ctx.config.emulation);
        let outcome = rule.continue_item(self, line, ctx);

        if let Some(signal) = outcome.signal {
            log::trace!("list item signal: {:?}", signal);
            ctx.owner_scope().signal.set(Some(signal));
        }
        if !matches!(outcome.continuation, Continuation::None) {
            // Any accepted continuation means the item has content now.
            self.is_empty = false;
        }
        outcome.continuation
    }

    fn propagates_trailing_blank(&self, children: usize, is_last_matched: bool) -> bool {
        !(children == 0 && !is_last_matched)
    }
}
