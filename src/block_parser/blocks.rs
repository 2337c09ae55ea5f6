//! The block parser protocol: the contract every open block implements,
//! and the bookkeeping the driver keeps per open block.
//!
//! The set of block kinds is closed: the stack stores a `BlockKind`
//! enum and dispatches exhaustively, so adding a block kind is a
//! compile-checked match arm, not a registration table. The trait is
//! the seam the driver talks through.

use std::cell::Cell;

use crate::config::Config;
use crate::syntax::SyntaxKind;

use super::blockquotes::BlockQuoteParser;
use super::code_blocks::FencedCodeParser;
use super::indented_code::IndentedCodeParser;
use super::list_item::ListItemParser;
use super::lists::{ListData, ListParser, ListRegistry, ListSignal};
use super::paragraphs::ParagraphParser;
use super::state::LineState;

/// Per-line continuation decision for one open block.
///
/// `AtColumn`/`AtIndex` consume the line up to that position and keep
/// the block open; `None` stops matching, which closes this block and
/// everything open inside it before new blocks are considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Continuation {
    AtColumn(usize),
    AtIndex(usize),
    None,
}

/// Snapshot of one open list, rebuilt per line for stack lookups and
/// discarded afterwards. The signal cell collects the list item's
/// handled-line report for this line only.
#[derive(Debug)]
pub(crate) struct ListScope {
    pub(crate) stack_idx: usize,
    pub(crate) data: ListData,
    pub(crate) signal: Cell<Option<ListSignal>>,
}

impl ListScope {
    /// Content indent of the list's opening item.
    pub(crate) fn content_indent(&self) -> usize {
        self.data.content_indent()
    }
}

/// Innermost open parser at the start of the line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActiveInfo {
    pub(crate) kind: SyntaxKind,
    /// The active parser is a paragraph that is so far the only child
    /// of a list item.
    pub(crate) is_item_first_paragraph: bool,
}

/// Read-only context handed to `try_continue`: configuration, the
/// per-line list scope snapshot, and where the parser sits in the
/// stack.
pub(crate) struct BlockContext<'a> {
    pub(crate) config: &'a Config,
    /// Scopes for every open list, outermost first.
    pub(crate) scopes: &'a [ListScope],
    /// Kinds of every open block, outermost first.
    pub(crate) stack_kinds: &'a [SyntaxKind],
    /// Stack position of the parser being asked to continue.
    pub(crate) depth: usize,
    /// Child blocks opened so far under the parser being asked.
    pub(crate) self_children: usize,
    pub(crate) active: ActiveInfo,
}

impl BlockContext<'_> {
    /// The scope of the list directly enclosing the parser at `depth`.
    /// A list item whose enclosing container is not a list is a caller
    /// integration defect, not a data error.
    pub(crate) fn owner_scope(&self) -> &ListScope {
        self.scopes
            .iter()
            .rfind(|scope| scope.stack_idx + 1 == self.depth)
            .expect("list item continuation outside of a list block")
    }

    /// Scopes of the contiguous list/item chain enclosing the parser,
    /// outermost first. The chain stops at the first intervening
    /// non-list container (e.g. a block quote).
    pub(crate) fn enclosing_chain(&self) -> &[ListScope] {
        let mut first = self.depth;
        while first > 1 {
            let kind = self.stack_kinds[first - 1];
            if kind.is_list() || kind.is_list_item() {
                first -= 1;
            } else {
                break;
            }
        }
        let lo = self
            .scopes
            .iter()
            .position(|scope| scope.stack_idx >= first)
            .unwrap_or(self.scopes.len());
        let hi = self
            .scopes
            .iter()
            .position(|scope| scope.stack_idx >= self.depth)
            .unwrap_or(self.scopes.len());
        &self.scopes[lo..hi]
    }

    /// Whether the owning list is itself nested inside a list item.
    pub(crate) fn owner_nested_in_item(&self) -> bool {
        let owner = self.owner_scope();
        owner.stack_idx > 1 && self.stack_kinds[owner.stack_idx - 1].is_list_item()
    }
}

/// Finalization context; lists record their registry entry here.
pub(crate) struct CloseContext<'a> {
    pub(crate) registry: &'a mut ListRegistry,
}

/// The contract every container or leaf block parser implements.
pub(crate) trait BlockParse {
    /// Whether this block may own child blocks.
    fn is_container(&self) -> bool;

    /// Containment compatibility for a block about to nest inside.
    fn can_contain(&self, kind: SyntaxKind) -> bool;

    /// Decide whether this block keeps accepting input on this line.
    fn try_continue(&mut self, line: &LineState, ctx: &BlockContext) -> Continuation;

    /// Invoked exactly once, when the driver has determined the block
    /// accepts no further lines.
    fn close(&mut self, ctx: &mut CloseContext) {
        let _ = ctx;
    }

    /// Whether a trailing blank line is attributed to this block, or
    /// donated to an ancestor for spacing decisions.
    fn propagates_trailing_blank(&self, children: usize, is_last_matched: bool) -> bool {
        let _ = (children, is_last_matched);
        true
    }
}

/// The document root: matches every line, contains everything.
#[derive(Debug, Clone, Default)]
pub(crate) struct DocumentParser;

impl BlockParse for DocumentParser {
    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&self, _kind: SyntaxKind) -> bool {
        true
    }

    fn try_continue(&mut self, line: &LineState, _ctx: &BlockContext) -> Continuation {
        Continuation::AtIndex(line.index())
    }
}

/// Closed set of stackable block parsers.
#[derive(Debug, Clone)]
pub(crate) enum BlockKind {
    Document(DocumentParser),
    Paragraph(ParagraphParser),
    BlockQuote(BlockQuoteParser),
    List(ListParser),
    ListItem(ListItemParser),
    IndentedCode(IndentedCodeParser),
    FencedCode(FencedCodeParser),
}

/// One entry of the active parser stack.
#[derive(Debug, Clone)]
pub(crate) struct OpenBlock {
    pub(crate) kind: SyntaxKind,
    pub(crate) parser: BlockKind,
    /// Child blocks opened under this block so far.
    pub(crate) children: usize,
    /// Whether the previous line ended blank for this block.
    pub(crate) last_line_blank: bool,
}

impl OpenBlock {
    pub(crate) fn new(kind: SyntaxKind, parser: BlockKind) -> Self {
        Self {
            kind,
            parser,
            children: 0,
            last_line_blank: false,
        }
    }

    pub(crate) fn parser(&self) -> &dyn BlockParse {
        match &self.parser {
            BlockKind::Document(p) => p,
            BlockKind::Paragraph(p) => p,
            BlockKind::BlockQuote(p) => p,
            BlockKind::List(p) => p,
            BlockKind::ListItem(p) => p,
            BlockKind::IndentedCode(p) => p,
            BlockKind::FencedCode(p) => p,
        }
    }

    pub(crate) fn parser_mut(&mut self) -> &mut dyn BlockParse {
        match &mut self.parser {
            BlockKind::Document(p) => p,
            BlockKind::Paragraph(p) => p,
            BlockKind::BlockQuote(p) => p,
            BlockKind::List(p) => p,
            BlockKind::ListItem(p) => p,
            BlockKind::IndentedCode(p) => p,
            BlockKind::FencedCode(p) => p,
        }
    }

    pub(crate) fn as_list(&self) -> Option<&ListParser> {
        match &self.parser {
            BlockKind::List(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn as_list_mut(&mut self) -> Option<&mut ListParser> {
        match &mut self.parser {
            BlockKind::List(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn as_fenced_code(&self) -> Option<&FencedCodeParser> {
        match &self.parser {
            BlockKind::FencedCode(p) => Some(p),
            _ => None,
        }
    }
}
