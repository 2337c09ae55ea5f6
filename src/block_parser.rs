//! Line-by-line block structure parser.
//!
//! One pass over the source: for every line the stack of open blocks is
//! walked outermost to innermost, each open block decides how it
//! continues, then new blocks are opened at the first position no open
//! block claimed. The tree is lossless: concatenating every token
//! reproduces the input.

use rowan::GreenNodeBuilder;

use crate::config::{Config, Emulation};
use crate::syntax::{SyntaxKind, SyntaxNode};

mod blockquotes;
mod blocks;
mod code_blocks;
mod emulation;
mod headings;
mod horizontal_rules;
mod indented_code;
mod list_item;
pub mod lists;
mod paragraphs;
mod state;
mod utils;

use blockquotes::{BlockQuoteParser, scan_quote_marker};
use blocks::{
    ActiveInfo, BlockContext, BlockKind, CloseContext, Continuation, DocumentParser, ListScope,
    OpenBlock,
};
use code_blocks::{FencedCodeParser, try_parse_fence_open};
use headings::try_parse_atx_heading;
use horizontal_rules::try_parse_thematic_break;
use indented_code::IndentedCodeParser;
use list_item::ListItemParser;
use lists::{ListData, ListParser, ListRegistry, ListSignal, parse_list_marker};
use paragraphs::ParagraphParser;
use state::LineState;
use utils::{split_lines_inclusive, strip_newline};

/// Document-level indented code threshold. The per-family `code_indent`
/// governs list continuation arithmetic only.
pub(crate) const CODE_BLOCK_INDENT: usize = 4;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A new block recognized at the current line position.
enum Started {
    BlockQuote,
    AtxHeading(usize),
    FencedCode(char, usize),
    ThematicBreak,
    /// A new list with its first item; `replace` closes the matched
    /// list first (a marker the current list cannot absorb).
    List { data: ListData, replace: bool },
    /// The next sibling item of the matched list.
    Item { data: ListData },
    IndentedCode,
}

impl Started {
    /// The node kind this start will open.
    fn kind(&self) -> SyntaxKind {
        match self {
            Started::BlockQuote => SyntaxKind::BlockQuote,
            Started::AtxHeading(_) => SyntaxKind::AtxHeading,
            Started::FencedCode(..) => SyntaxKind::FencedCodeBlock,
            Started::ThematicBreak => SyntaxKind::ThematicBreak,
            Started::List { data, .. } => data.node_kinds().0,
            Started::Item { data } => data.node_kinds().1,
            Started::IndentedCode => SyntaxKind::IndentedCodeBlock,
        }
    }
}

pub struct BlockParser<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    open: Vec<OpenBlock>,
    registry: ListRegistry,
    config: &'a Config,
    /// Byte offset of the current line's start within the source.
    offset: usize,
}

impl<'a> BlockParser<'a> {
    pub fn new(input: &'a str, config: &'a Config) -> Self {
        // split_lines_inclusive preserves line endings (LF and CRLF)
        let lines = split_lines_inclusive(input);
        Self {
            lines,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            open: Vec::new(),
            registry: ListRegistry::default(),
            config,
            offset: 0,
        }
    }

    pub fn parse(mut self) -> (SyntaxNode, ListRegistry) {
        #[cfg(debug_assertions)]
        {
            init_logger();
        }

        self.builder.start_node(SyntaxKind::ROOT.into());
        self.builder.start_node(SyntaxKind::DOCUMENT.into());
        self.open.push(OpenBlock::new(
            SyntaxKind::DOCUMENT,
            BlockKind::Document(DocumentParser),
        ));

        log::debug!("starting document parse ({:?})", self.config.emulation);

        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            log::debug!("parsing line {}: {:?}", self.pos + 1, line.trim_end());
            self.parse_line(line);
            self.offset += line.len();
            self.pos += 1;
        }

        self.close_to(0); // finishes DOCUMENT as well
        self.builder.finish_node(); // ROOT

        let tree = SyntaxNode::new_root(self.builder.finish());
        (tree, self.registry)
    }

    fn parse_line(&mut self, line: &'a str) {
        let mut ls = LineState::new(line);
        let scopes = collect_scopes(&self.open);
        let kinds: Vec<SyntaxKind> = self.open.iter().map(|block| block.kind).collect();
        let active = active_info(&self.open);

        if ls.is_blank() {
            self.parse_blank_line(ls, &scopes, &kinds, active);
            return;
        }

        // Walk the open blocks; each decides how it continues.
        let mut consumed: Vec<(SyntaxKind, std::ops::Range<usize>)> = Vec::new();
        let mut matched = self.open.len();
        let config = self.config;
        for depth in 1..self.open.len() {
            let continuation = {
                let ctx = BlockContext {
                    config,
                    scopes: &scopes,
                    stack_kinds: &kinds,
                    depth,
                    self_children: self.open[depth].children,
                    active,
                };
                self.open[depth].parser_mut().try_continue(&ls, &ctx)
            };
            match continuation {
                Continuation::AtIndex(index) => {
                    let start = ls.index();
                    if index > start {
                        consumed.push((self.open[depth].kind, start..index));
                        ls.advance_to_index(index);
                    }
                }
                Continuation::AtColumn(column) => {
                    let start = ls.index();
                    ls.advance_to_column(column);
                    if ls.index() > start {
                        consumed.push((self.open[depth].kind, start..ls.index()));
                    }
                }
                Continuation::None => {
                    matched = depth;
                    break;
                }
            }
        }
        let last_matched = matched - 1;
        let mut closed_unmatched = matched == self.open.len();
        let mut spans_emitted = false;
        let mut line_done = false;

        // Open new blocks at the first unclaimed position.
        loop {
            let tip_idx = if closed_unmatched {
                self.open.len() - 1
            } else {
                matched - 1
            };
            let tip = &self.open[tip_idx];
            if !(tip.kind == SyntaxKind::PARAGRAPH || tip.parser().is_container()) {
                break;
            }
            let Some(started) = self.find_block_start(&ls, tip_idx, &scopes, active) else {
                break;
            };
            if !closed_unmatched {
                self.close_to(matched);
                closed_unmatched = true;
            }
            if let Started::List { replace: true, .. } = &started {
                // The matched list cannot absorb this marker.
                self.close_to(self.open.len() - 1);
            }
            self.close_incompatible(started.kind());
            self.emit_consumed_once(line, &consumed, &mut spans_emitted);
            match started {
                Started::BlockQuote => {
                    let end = scan_quote_marker(&ls).expect("quote start was just scanned");
                    self.open_block(
                        SyntaxKind::BlockQuote,
                        BlockKind::BlockQuote(BlockQuoteParser),
                    );
                    self.emit_quote_marker(line, &ls, end);
                    ls.advance_to_index(end);
                }
                Started::List { data, .. } => {
                    let (list_kind, item_kind) = data.node_kinds();
                    let start_offset = self.offset + ls.index();
                    self.open_block(
                        list_kind,
                        BlockKind::List(ListParser::new(data.clone(), start_offset)),
                    );
                    self.open_item(item_kind, data, &mut ls);
                }
                Started::Item { data } => {
                    let (_, item_kind) = data.node_kinds();
                    self.open_item(item_kind, data, &mut ls);
                }
                Started::IndentedCode => {
                    self.open_block(
                        SyntaxKind::IndentedCodeBlock,
                        BlockKind::IndentedCode(IndentedCodeParser),
                    );
                    let start = ls.index();
                    ls.advance_to_column(ls.column() + CODE_BLOCK_INDENT);
                    if ls.index() > start {
                        self.builder
                            .token(SyntaxKind::WHITESPACE.into(), &line[start..ls.index()]);
                    }
                    break;
                }
                Started::AtxHeading(level) => {
                    self.emit_atx_heading(line, &ls, level);
                    line_done = true;
                    break;
                }
                Started::ThematicBreak => {
                    self.emit_thematic_break(line, &ls);
                    line_done = true;
                    break;
                }
                Started::FencedCode(fence_char, fence_len) => {
                    self.emit_fence_open(line, &mut ls, fence_char, fence_len);
                    line_done = true;
                    break;
                }
            }
        }

        if !closed_unmatched {
            // Nothing interrupted; a still-open paragraph takes the
            // line as a lazy continuation with everything left open.
            if !ls.is_blank()
                && self.open.last().expect("document always open").kind == SyntaxKind::PARAGRAPH
            {
                log::debug!("lazy continuation of open paragraph");
                self.emit_consumed_once(line, &consumed, &mut spans_emitted);
                self.append_leaf_line(&mut ls);
                self.propagate_trailing_blank(&ls, last_matched);
                return;
            }
            self.close_to(matched);
        }

        if !line_done {
            let tip_is_container = self
                .open
                .last()
                .expect("document always open")
                .parser()
                .is_container();
            if !tip_is_container {
                self.emit_consumed_once(line, &consumed, &mut spans_emitted);
                self.append_leaf_line(&mut ls);
                let fence_closed = self
                    .open
                    .last()
                    .and_then(|block| block.as_fenced_code())
                    .is_some_and(|fenced| fenced.closing);
                if fence_closed {
                    self.close_to(self.open.len() - 1);
                }
            } else if !ls.is_blank() {
                self.close_incompatible(SyntaxKind::PARAGRAPH);
                self.emit_consumed_once(line, &consumed, &mut spans_emitted);
                self.open_block(
                    SyntaxKind::PARAGRAPH,
                    BlockKind::Paragraph(ParagraphParser),
                );
                self.append_leaf_line(&mut ls);
            } else {
                // Marker-only remainder of a container-opening line.
                self.emit_consumed_once(line, &consumed, &mut spans_emitted);
                self.emit_trailing_rest(&ls);
            }
        } else {
            self.emit_consumed_once(line, &consumed, &mut spans_emitted);
        }

        self.propagate_trailing_blank(&ls, last_matched);
    }

    /// Blank lines: walk the stack so items record their flags, then
    /// attribute the blank to the deepest block that still continues
    /// past it, decided by a dry-run match of the next non-blank line.
    fn parse_blank_line(
        &mut self,
        mut ls: LineState<'a>,
        scopes: &[ListScope],
        kinds: &[SyntaxKind],
        active: ActiveInfo,
    ) {
        let config = self.config;
        let mut consumed: Vec<(SyntaxKind, std::ops::Range<usize>)> = Vec::new();
        let mut matched = self.open.len();
        for depth in 1..self.open.len() {
            let continuation = {
                let ctx = BlockContext {
                    config,
                    scopes,
                    stack_kinds: kinds,
                    depth,
                    self_children: self.open[depth].children,
                    active,
                };
                self.open[depth].parser_mut().try_continue(&ls, &ctx)
            };
            match continuation {
                Continuation::AtIndex(index) => {
                    let start = ls.index();
                    if index > start {
                        consumed.push((self.open[depth].kind, start..index));
                        ls.advance_to_index(index);
                    }
                }
                Continuation::AtColumn(column) => {
                    let start = ls.index();
                    ls.advance_to_column(column);
                    if ls.index() > start {
                        consumed.push((self.open[depth].kind, start..ls.index()));
                    }
                }
                Continuation::None => {
                    matched = depth;
                    break;
                }
            }
        }

        let mut peek = self.pos + 1;
        while peek < self.lines.len() && LineState::new(self.lines[peek]).is_blank() {
            peek += 1;
        }
        let keep = if peek >= self.lines.len() {
            // Trailing blanks belong to the document.
            1
        } else {
            let (dry, has_marker) = self.dry_match_depth(self.lines[peek], matched);
            let mut keep = dry.min(matched);
            if !has_marker {
                // A list left on top will close at that line anyway;
                // the blank belongs outside it.
                while keep > 1 && self.open[keep - 1].kind.is_list() {
                    keep -= 1;
                }
            }
            keep
        };
        log::trace!(
            "blank line: matched {}, keeping {} of {} open blocks",
            matched,
            keep,
            self.open.len()
        );

        self.close_to(keep.max(1));
        self.emit_consumed(ls.line(), &consumed);

        let tip_kind = self.open.last().expect("document always open").kind;
        if matches!(
            tip_kind,
            SyntaxKind::IndentedCodeBlock | SyntaxKind::FencedCodeBlock
        ) {
            // Interior blank of a code block stays verbatim content.
            self.emit_trailing_rest(&ls);
        } else if !ls.rest().is_empty() {
            self.builder.start_node(SyntaxKind::BlankLine.into());
            self.builder
                .token(SyntaxKind::BlankLine.into(), ls.rest());
            self.builder.finish_node();
        }

        self.propagate_trailing_blank(&ls, matched - 1);
    }

    /// Match the given line against clones of the first `upto` open
    /// blocks, returning how many would continue and whether a list
    /// marker sits at the position the walk stopped at. Nothing is
    /// emitted and no real parser state changes.
    fn dry_match_depth(&self, line: &str, upto: usize) -> (usize, bool) {
        let mut clones: Vec<OpenBlock> = self.open[..upto].to_vec();
        let kinds: Vec<SyntaxKind> = clones.iter().map(|block| block.kind).collect();
        let scopes = collect_scopes(&clones);
        let active = active_info(&clones);
        let config = self.config;

        let mut ls = LineState::new(line);
        let mut matched = clones.len();
        for depth in 1..clones.len() {
            let continuation = {
                let ctx = BlockContext {
                    config,
                    scopes: &scopes,
                    stack_kinds: &kinds,
                    depth,
                    self_children: clones[depth].children,
                    active,
                };
                clones[depth].parser_mut().try_continue(&ls, &ctx)
            };
            match continuation {
                Continuation::AtIndex(index) => ls.advance_to_index(index),
                Continuation::AtColumn(column) => ls.advance_to_column(column),
                Continuation::None => {
                    matched = depth;
                    break;
                }
            }
        }
        let has_marker = parse_list_marker(None, &ls, config).is_some();
        (matched, has_marker)
    }

    /// The block-start chain, in precedence order. `tip_idx` is the
    /// deepest matched block; interruption decisions are made against
    /// it and against the innermost open parser.
    fn find_block_start(
        &self,
        ls: &LineState,
        tip_idx: usize,
        scopes: &[ListScope],
        active: ActiveInfo,
    ) -> Option<Started> {
        if ls.is_blank() {
            return None;
        }
        if scan_quote_marker(ls).is_some() {
            return Some(Started::BlockQuote);
        }
        if let Some(level) = try_parse_atx_heading(ls) {
            return Some(Started::AtxHeading(level));
        }
        if let Some((fence_char, fence_len)) = try_parse_fence_open(ls) {
            return Some(Started::FencedCode(fence_char, fence_len));
        }
        if try_parse_thematic_break(ls).is_some() {
            return Some(Started::ThematicBreak);
        }
        if let Some(started) = self.try_start_list(ls, tip_idx, scopes, active) {
            return Some(started);
        }
        if ls.indent() >= CODE_BLOCK_INDENT
            && active.kind != SyntaxKind::PARAGRAPH
            && self.open[tip_idx].kind != SyntaxKind::PARAGRAPH
        {
            return Some(Started::IndentedCode);
        }
        None
    }

    fn try_start_list(
        &self,
        ls: &LineState,
        tip_idx: usize,
        scopes: &[ListScope],
        active: ActiveInfo,
    ) -> Option<Started> {
        let config = self.config;
        let tip = &self.open[tip_idx];

        let signal = self.relevant_signal(tip_idx, scopes);
        if matches!(
            signal,
            Some(ListSignal::HandledLine) | Some(ListSignal::HandledLineSkipActive)
        ) {
            // The line was already attributed by an item's engine.
            return None;
        }

        let limit = (config.emulation == Emulation::CommonMark && !tip.kind.is_list())
            .then_some(config.code_indent);
        let data = parse_list_marker(limit, ls, config)?;

        // A brand-new list in the legacy families only starts below
        // the item-nesting threshold.
        if signal.is_none()
            && config.emulation != Emulation::CommonMark
            && !tip.kind.is_list()
            && ls.indent() >= config.item_indent
        {
            return None;
        }

        if active.kind == SyntaxKind::PARAGRAPH
            && signal.is_none()
            && !config
                .policy
                .can_interrupt(&data, active.is_item_first_paragraph)
        {
            return None;
        }

        match signal {
            Some(ListSignal::HandledNewItemLine) => {
                debug_assert!(tip.kind.is_list(), "sibling signal without its list");
                Some(Started::Item { data })
            }
            Some(ListSignal::HandledNewListLine) => {
                if tip.kind.is_list() {
                    // The item closed as well; a fresh list replaces
                    // the current one entirely.
                    Some(Started::List {
                        data,
                        replace: true,
                    })
                } else {
                    Some(Started::List {
                        data,
                        replace: false,
                    })
                }
            }
            None => {
                if tip.kind.is_list() {
                    let list = tip.as_list().expect("list kind without list parser");
                    if config.policy.starts_new_list(&list.data, &data) {
                        Some(Started::List {
                            data,
                            replace: true,
                        })
                    } else {
                        Some(Started::Item { data })
                    }
                } else {
                    Some(Started::List {
                        data,
                        replace: false,
                    })
                }
            }
            _ => None,
        }
    }

    /// The signal left this line with the list enclosing the matched
    /// tip, reached through list items and their paragraphs only.
    fn relevant_signal(&self, tip_idx: usize, scopes: &[ListScope]) -> Option<ListSignal> {
        let mut idx = tip_idx;
        if self.open[idx].kind == SyntaxKind::PARAGRAPH
            && idx >= 1
            && self.open[idx - 1].kind.is_list_item()
        {
            idx -= 1;
        }
        let list_idx = if self.open[idx].kind.is_list() {
            idx
        } else if self.open[idx].kind.is_list_item() {
            idx - 1
        } else {
            return None;
        };
        scopes
            .iter()
            .rfind(|scope| scope.stack_idx == list_idx)
            .and_then(|scope| scope.signal.get())
    }

    /// Close open blocks from the top down until one can contain
    /// `kind`.
    fn close_incompatible(&mut self, kind: SyntaxKind) {
        while !self
            .open
            .last()
            .expect("document always open")
            .parser()
            .can_contain(kind)
        {
            self.close_to(self.open.len() - 1);
        }
    }

    fn emit_consumed_once(
        &mut self,
        line: &str,
        consumed: &[(SyntaxKind, std::ops::Range<usize>)],
        emitted: &mut bool,
    ) {
        if !*emitted {
            self.emit_consumed(line, consumed);
            *emitted = true;
        }
    }

    /// Open a block under the deepest open block that can contain it,
    /// closing incompatible blocks on the way.
    fn open_block(&mut self, kind: SyntaxKind, parser: BlockKind) {
        self.close_incompatible(kind);
        let parent_idx = self.open.len() - 1;
        if self.open[parent_idx].last_line_blank {
            self.mark_enclosing_list_loose(parent_idx);
        }
        self.open[parent_idx].children += 1;
        log::debug!("opening {:?}", kind);
        self.builder.start_node(kind.into());
        self.open.push(OpenBlock::new(kind, parser));
    }

    /// A block opening right after a blank line makes its enclosing
    /// list loose.
    fn mark_enclosing_list_loose(&mut self, parent_idx: usize) {
        let list_idx = match self.open[parent_idx].kind {
            kind if kind.is_list() => parent_idx,
            kind if kind.is_list_item() => parent_idx - 1,
            _ => return,
        };
        let list = self.open[list_idx]
            .as_list_mut()
            .expect("list item not owned by a list block");
        list.tight = false;
    }

    /// Open a list item and emit its marker tokens, advancing the
    /// cursor to the item's content column.
    fn open_item(&mut self, kind: SyntaxKind, data: ListData, ls: &mut LineState) {
        let line = ls.line();
        self.open_block(kind, BlockKind::ListItem(ListItemParser::new(data.clone())));
        if ls.next_non_space() > ls.index() {
            self.builder.token(
                SyntaxKind::WHITESPACE.into(),
                &line[ls.index()..ls.next_non_space()],
            );
        }
        let marker_start = ls.next_non_space();
        let marker_end = marker_start + data.marker_text.len();
        self.builder
            .token(SyntaxKind::ListMarker.into(), &line[marker_start..marker_end]);
        ls.advance_to_index(marker_end);

        let ws_start = ls.index();
        ls.advance_to_column(data.content_column());
        if ls.index() > ws_start {
            self.builder
                .token(SyntaxKind::WHITESPACE.into(), &line[ws_start..ls.index()]);
        }
    }

    fn emit_quote_marker(&mut self, line: &str, ls: &LineState, end: usize) {
        if ls.next_non_space() > ls.index() {
            self.builder.token(
                SyntaxKind::WHITESPACE.into(),
                &line[ls.index()..ls.next_non_space()],
            );
        }
        let marker = ls.next_non_space();
        self.builder
            .token(SyntaxKind::QuoteMarker.into(), &line[marker..marker + 1]);
        if end > marker + 1 {
            self.builder
                .token(SyntaxKind::WHITESPACE.into(), &line[marker + 1..end]);
        }
    }

    fn emit_atx_heading(&mut self, line: &str, ls: &LineState, level: usize) {
        self.begin_child_node(SyntaxKind::AtxHeading);
        if ls.next_non_space() > ls.index() {
            self.builder.token(
                SyntaxKind::WHITESPACE.into(),
                &line[ls.index()..ls.next_non_space()],
            );
        }
        let hash_start = ls.next_non_space();
        let hash_end = hash_start + level;
        self.builder.token(
            SyntaxKind::AtxHeadingMarker.into(),
            &line[hash_start..hash_end],
        );
        let (text, newline) = strip_newline(&line[hash_end..]);
        let ws_len = text.len() - text.trim_start().len();
        if ws_len > 0 {
            self.builder
                .token(SyntaxKind::WHITESPACE.into(), &text[..ws_len]);
        }
        if !text[ws_len..].is_empty() {
            self.builder.token(SyntaxKind::TEXT.into(), &text[ws_len..]);
        }
        if !newline.is_empty() {
            self.builder.token(SyntaxKind::NEWLINE.into(), newline);
        }
        self.builder.finish_node();
    }

    fn emit_thematic_break(&mut self, line: &str, ls: &LineState) {
        self.begin_child_node(SyntaxKind::ThematicBreak);
        if ls.next_non_space() > ls.index() {
            self.builder.token(
                SyntaxKind::WHITESPACE.into(),
                &line[ls.index()..ls.next_non_space()],
            );
        }
        let (text, newline) = strip_newline(&line[ls.next_non_space()..]);
        self.builder
            .token(SyntaxKind::ThematicBreakToken.into(), text);
        if !newline.is_empty() {
            self.builder.token(SyntaxKind::NEWLINE.into(), newline);
        }
        self.builder.finish_node();
    }

    fn emit_fence_open(&mut self, line: &str, ls: &mut LineState, fence_char: char, fence_len: usize) {
        let indent = ls.indent();
        self.open_block(
            SyntaxKind::FencedCodeBlock,
            BlockKind::FencedCode(FencedCodeParser::new(fence_char, fence_len, indent)),
        );
        if ls.next_non_space() > ls.index() {
            self.builder.token(
                SyntaxKind::WHITESPACE.into(),
                &line[ls.index()..ls.next_non_space()],
            );
        }
        let fence_start = ls.next_non_space();
        let fence_end = fence_start + fence_len;
        self.builder.token(
            SyntaxKind::CodeFenceMarker.into(),
            &line[fence_start..fence_end],
        );
        let (info, newline) = strip_newline(&line[fence_end..]);
        if !info.is_empty() {
            self.builder.token(SyntaxKind::CodeInfo.into(), info);
        }
        if !newline.is_empty() {
            self.builder.token(SyntaxKind::NEWLINE.into(), newline);
        }
    }

    /// Start a single-line node under the deepest block that can
    /// contain it; the caller emits tokens and finishes the node.
    fn begin_child_node(&mut self, kind: SyntaxKind) {
        self.close_incompatible(kind);
        let parent_idx = self.open.len() - 1;
        if self.open[parent_idx].last_line_blank {
            self.mark_enclosing_list_loose(parent_idx);
        }
        self.open[parent_idx].children += 1;
        self.builder.start_node(kind.into());
    }

    /// Append the rest of the line to the innermost leaf block.
    fn append_leaf_line(&mut self, ls: &mut LineState) {
        let line = ls.line();
        if let Some(fenced) = self.open.last().expect("document always open").as_fenced_code()
            && fenced.closing
        {
            // The closing fence line.
            if ls.next_non_space() > ls.index() {
                self.builder.token(
                    SyntaxKind::WHITESPACE.into(),
                    &line[ls.index()..ls.next_non_space()],
                );
            }
            let (text, newline) = strip_newline(&line[ls.next_non_space()..]);
            let fence = text.trim_end();
            self.builder.token(SyntaxKind::CodeFenceMarker.into(), fence);
            if text.len() > fence.len() {
                self.builder
                    .token(SyntaxKind::WHITESPACE.into(), &text[fence.len()..]);
            }
            if !newline.is_empty() {
                self.builder.token(SyntaxKind::NEWLINE.into(), newline);
            }
            return;
        }

        if ls.next_non_space() > ls.index() {
            self.builder.token(
                SyntaxKind::WHITESPACE.into(),
                &line[ls.index()..ls.next_non_space()],
            );
            ls.advance_to_index(ls.next_non_space());
        }
        let (text, newline) = strip_newline(ls.rest());
        if !text.is_empty() {
            self.builder.token(SyntaxKind::TEXT.into(), text);
        }
        if !newline.is_empty() {
            self.builder.token(SyntaxKind::NEWLINE.into(), newline);
        }
    }

    /// Emit whatever whitespace remains of a line whose content was
    /// fully consumed by container markers.
    fn emit_trailing_rest(&mut self, ls: &LineState) {
        let (ws, newline) = strip_newline(ls.rest());
        if !ws.is_empty() {
            self.builder.token(SyntaxKind::WHITESPACE.into(), ws);
        }
        if !newline.is_empty() {
            self.builder.token(SyntaxKind::NEWLINE.into(), newline);
        }
    }

    /// Emit the spans container parsers consumed during the walk.
    fn emit_consumed(&mut self, line: &str, consumed: &[(SyntaxKind, std::ops::Range<usize>)]) {
        for (kind, range) in consumed {
            let text = &line[range.clone()];
            if *kind == SyntaxKind::BlockQuote
                && let Some(pos) = text.find('>')
            {
                if pos > 0 {
                    self.builder
                        .token(SyntaxKind::WHITESPACE.into(), &text[..pos]);
                }
                self.builder
                    .token(SyntaxKind::QuoteMarker.into(), &text[pos..pos + 1]);
                if pos + 1 < text.len() {
                    self.builder
                        .token(SyntaxKind::WHITESPACE.into(), &text[pos + 1..]);
                }
            } else {
                self.builder.token(SyntaxKind::WHITESPACE.into(), text);
            }
        }
    }

    /// Close open blocks from the top down until `keep` remain.
    fn close_to(&mut self, keep: usize) {
        while self.open.len() > keep {
            let mut block = self.open.pop().expect("stack length checked");
            log::debug!("closing {:?}", block.kind);
            let mut ctx = CloseContext {
                registry: &mut self.registry,
            };
            block.parser_mut().close(&mut ctx);
            self.builder.finish_node();
        }
    }

    /// Record whether this line ended blank for every open block; an
    /// empty list item that was not the deepest matched parser donates
    /// its blank to the ancestors instead.
    fn propagate_trailing_blank(&mut self, ls: &LineState, last_matched: usize) {
        let tip_idx = self.open.len() - 1;
        let tip = &self.open[tip_idx];
        let blank = ls.is_blank()
            && tip
                .parser()
                .propagates_trailing_blank(tip.children, tip_idx == last_matched);
        for block in self.open.iter_mut() {
            block.last_line_blank = blank;
        }
    }
}

fn collect_scopes(open: &[OpenBlock]) -> Vec<ListScope> {
    open.iter()
        .enumerate()
        .filter_map(|(idx, block)| {
            block.as_list().map(|list| ListScope {
                stack_idx: idx,
                data: list.data.clone(),
                signal: std::cell::Cell::new(None),
            })
        })
        .collect()
}

fn active_info(open: &[OpenBlock]) -> ActiveInfo {
    let tip = open.last().expect("document always open");
    let is_item_first_paragraph = tip.kind == SyntaxKind::PARAGRAPH
        && open.len() >= 2
        && {
            let parent = &open[open.len() - 2];
            parent.kind.is_list_item() && parent.children == 1
        };
    ActiveInfo {
        kind: tip.kind,
        is_item_first_paragraph,
    }
}
