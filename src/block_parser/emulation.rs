//! Dialect rule tables for list item continuation.
//!
//! Each supported dialect family is one `ContinuationRule`
//! implementation with a single entry point, selected once per
//! document. The families disagree on what "current indent" means and
//! on the order in which the code / nesting / marker cases are tried;
//! everything marker-compatibility-related is delegated to the
//! configured `ListPolicy` so no tie-break is hardcoded here.
//!
//! All arithmetic is exact integer column comparison.

use crate::config::Emulation;

use super::blocks::{BlockContext, Continuation};
use super::list_item::ListItemParser;
use super::lists::{ListSignal, parse_list_marker};
use super::state::LineState;

/// The engine's per-line verdict: how the item continues, and which
/// handled-line report goes to the owning list.
pub(crate) struct ItemOutcome {
    pub(crate) continuation: Continuation,
    pub(crate) signal: Option<ListSignal>,
}

impl ItemOutcome {
    fn new(continuation: Continuation, signal: Option<ListSignal>) -> Self {
        Self {
            continuation,
            signal,
        }
    }
}

pub(crate) trait ContinuationRule {
    fn continue_item(
        &self,
        item: &ListItemParser,
        line: &LineState,
        ctx: &BlockContext,
    ) -> ItemOutcome;
}

/// The rule table for a family, selected once at document-parse start.
pub(crate) fn rule_for(emulation: Emulation) -> &'static dyn ContinuationRule {
    match emulation {
        Emulation::CommonMark => &CommonMarkRule,
        Emulation::FixedIndent => &FixedIndentRule,
        Emulation::Kramdown => &KramdownRule,
        Emulation::Markdown => &MarkdownRule,
    }
}

/// Strict family.
///
/// Current indent is the plain line indent. Thresholds are relative to
/// the item's own content indent: at the content indent or deeper the
/// line is child content (or a sub-list if it carries a marker), at
/// content indent + code indent it is indented code. An empty item
/// rejects non-marker content outright, and a marker below the content
/// indent ends the item unless it cannot interrupt the paragraph in
/// progress.
pub(crate) struct CommonMarkRule;

impl ContinuationRule for CommonMarkRule {
    fn continue_item(
        &self,
        item: &ListItemParser,
        line: &LineState,
        ctx: &BlockContext,
    ) -> ItemOutcome {
        let config = ctx.config;
        let content_indent = item.data.content_indent();
        let new_column = line.column() + content_indent;
        let current_indent = line.indent();

        if current_indent >= content_indent + config.code_indent {
            // Indented code child of this item.
            return ItemOutcome::new(
                Continuation::AtColumn(new_column),
                Some(ListSignal::HandledLine),
            );
        }

        let candidate = parse_list_marker(None, line, config);

        if current_indent >= content_indent {
            if let Some(candidate) = candidate {
                if ctx.active.is_item_first_paragraph
                    && (!config.policy.can_interrupt(&candidate, true) || candidate.is_empty)
                {
                    // Just a lazy continuation of the item's paragraph.
                    ItemOutcome::new(
                        Continuation::AtColumn(new_column),
                        Some(ListSignal::HandledLineSkipActive),
                    )
                } else {
                    ItemOutcome::new(
                        Continuation::AtColumn(new_column),
                        Some(ListSignal::HandledNewListLine),
                    )
                }
            } else if item.is_empty {
                // An empty item cannot be continued by non-marker
                // content.
                ItemOutcome::new(Continuation::None, Some(ListSignal::HandledLine))
            } else {
                ItemOutcome::new(
                    Continuation::AtColumn(new_column),
                    Some(ListSignal::HandledLine),
                )
            }
        } else if let Some(candidate) =
            // Below the content indent the marker sits in the list's
            // own frame, where the code threshold still applies.
            candidate.filter(|_| current_indent < config.code_indent)
        {
            if !item.had_blank_line && !config.policy.can_interrupt(&candidate, true) {
                // Our text, kept as a lazy continuation.
                ItemOutcome::new(
                    Continuation::AtColumn(line.next_non_space_column()),
                    Some(ListSignal::HandledLine),
                )
            } else {
                let owner = ctx.owner_scope();
                if config.policy.starts_sub_list(&owner.data, &candidate) {
                    ItemOutcome::new(
                        Continuation::AtColumn(line.next_non_space_column()),
                        Some(ListSignal::HandledNewListLine),
                    )
                } else if config.policy.starts_new_list(&owner.data, &candidate) {
                    // Close this item and its list; the driver opens a
                    // fresh list.
                    ItemOutcome::new(Continuation::None, Some(ListSignal::HandledNewListLine))
                } else {
                    // The next sibling item of the current list.
                    ItemOutcome::new(Continuation::None, Some(ListSignal::HandledNewItemLine))
                }
            }
        } else {
            ItemOutcome::new(Continuation::None, None)
        }
    }
}

/// Fixed-indent legacy family.
///
/// Current indent is computed relative to the outermost list of the
/// contiguous list/item chain enclosing this item, with one item
/// indent subtracted per nesting level: every level of nesting is
/// expected to sit exactly one item indent deeper, wherever the
/// content actually starts.
pub(crate) struct FixedIndentRule;

impl ContinuationRule for FixedIndentRule {
    fn continue_item(
        &self,
        item: &ListItemParser,
        line: &LineState,
        ctx: &BlockContext,
    ) -> ItemOutcome {
        let config = ctx.config;
        let content_indent = item.data.content_indent();
        let new_column = line.column() + content_indent;

        let chain = ctx.enclosing_chain();
        let (first_column, first_indent) = chain
            .first()
            .map(|scope| (scope.data.marker_column, scope.data.marker_indent))
            .unwrap_or((line.column(), line.indent()));
        let nesting = chain.len().max(1);

        let current_indent = line.next_non_space_column() as isize - first_column as isize
            + first_indent as isize
            - (config.item_indent * (nesting - 1)) as isize;

        if current_indent >= config.code_indent as isize {
            return ItemOutcome::new(
                Continuation::AtColumn(new_column),
                Some(ListSignal::HandledLine),
            );
        }

        let candidate = parse_list_marker(None, line, config);

        if current_indent >= config.item_indent as isize {
            if candidate.is_some() {
                ItemOutcome::new(
                    Continuation::AtColumn(new_column),
                    Some(ListSignal::HandledNewListLine),
                )
            } else {
                ItemOutcome::new(
                    Continuation::AtColumn(new_column),
                    Some(ListSignal::HandledLine),
                )
            }
        } else if !item.had_blank_line
            && candidate
                .as_ref()
                .is_none_or(|c| !config.policy.can_interrupt(c, true))
        {
            ItemOutcome::new(
                Continuation::AtColumn(line.next_non_space_column()),
                Some(ListSignal::HandledLine),
            )
        } else if let Some(candidate) = candidate
            && current_indent >= item.data.marker_indent as isize
        {
            let owner = ctx.owner_scope();
            if config.policy.starts_sub_list(&owner.data, &candidate) {
                ItemOutcome::new(
                    Continuation::AtColumn(line.next_non_space_column()),
                    Some(ListSignal::HandledNewListLine),
                )
            } else {
                ItemOutcome::new(Continuation::None, Some(ListSignal::HandledNewItemLine))
            }
        } else {
            ItemOutcome::new(Continuation::None, None)
        }
    }
}

/// Kramdown-compatible legacy family.
///
/// Current indent is the plain line indent, but every threshold is
/// relative to the owning list's content indent. The deep-indent
/// branch defers to the parent item when this list is itself nested
/// inside one.
pub(crate) struct KramdownRule;

impl ContinuationRule for KramdownRule {
    fn continue_item(
        &self,
        item: &ListItemParser,
        line: &LineState,
        ctx: &BlockContext,
    ) -> ItemOutcome {
        let config = ctx.config;
        let owner = ctx.owner_scope();
        let list_content_indent = owner.content_indent();
        let content_indent = item.data.content_indent();
        let new_column = line.column() + content_indent;
        let current_indent = line.indent();

        if current_indent >= list_content_indent + config.code_indent {
            return ItemOutcome::new(
                Continuation::AtColumn(new_column),
                Some(ListSignal::HandledLine),
            );
        }

        let candidate = parse_list_marker(None, line, config);

        if current_indent >= list_content_indent + config.item_indent {
            // Could be the parent item's indented code, our lazy
            // continuation, or our child.
            if candidate.is_none() || !ctx.owner_nested_in_item() {
                if !item.had_blank_line
                    && candidate
                        .as_ref()
                        .is_none_or(|c| !config.policy.can_interrupt(c, true))
                {
                    return ItemOutcome::new(
                        Continuation::AtColumn(line.next_non_space_column()),
                        Some(ListSignal::HandledLine),
                    );
                }
                if let Some(candidate) = candidate
                    && current_indent >= item.data.marker_indent
                {
                    if config.policy.starts_sub_list(&owner.data, &candidate) {
                        return ItemOutcome::new(
                            Continuation::AtColumn(line.next_non_space_column()),
                            Some(ListSignal::HandledNewListLine),
                        );
                    }
                    return ItemOutcome::new(
                        Continuation::None,
                        Some(ListSignal::HandledNewItemLine),
                    );
                }
            }
            ItemOutcome::new(Continuation::None, None)
        } else if current_indent >= list_content_indent {
            if candidate.is_some() {
                ItemOutcome::new(
                    Continuation::AtColumn(new_column),
                    Some(ListSignal::HandledNewListLine),
                )
            } else {
                ItemOutcome::new(
                    Continuation::AtColumn(new_column),
                    Some(ListSignal::HandledLine),
                )
            }
        } else {
            ItemOutcome::new(Continuation::None, None)
        }
    }
}

/// Markdown.pl-compatible legacy family.
///
/// Thresholds are keyed to the list's marker indent. Deeply indented
/// lines stay lazy paragraph continuations until a blank line has been
/// seen; only then do they become indented code. Sub-items require
/// strictly greater indent than the list marker; a marker at exactly
/// the marker indent is the next sibling item.
pub(crate) struct MarkdownRule;

impl ContinuationRule for MarkdownRule {
    fn continue_item(
        &self,
        item: &ListItemParser,
        line: &LineState,
        ctx: &BlockContext,
    ) -> ItemOutcome {
        let config = ctx.config;
        let owner = ctx.owner_scope();
        let list_indent = owner.data.marker_indent;
        let content_indent = item.data.content_indent();
        let new_column = line.column() + content_indent;
        let current_indent = line.indent();

        if current_indent >= list_indent + config.code_indent {
            if !item.had_blank_line {
                // Our lazy continuation.
                ItemOutcome::new(
                    Continuation::AtColumn(line.next_non_space_column()),
                    Some(ListSignal::HandledLine),
                )
            } else {
                // Indented code child.
                ItemOutcome::new(
                    Continuation::AtColumn(line.column() + list_indent + config.item_indent),
                    Some(ListSignal::HandledLine),
                )
            }
        } else {
            let candidate = parse_list_marker(None, line, config);

            if current_indent > list_indent {
                if candidate.is_some() {
                    ItemOutcome::new(
                        Continuation::AtColumn(new_column),
                        Some(ListSignal::HandledNewListLine),
                    )
                } else {
                    ItemOutcome::new(
                        Continuation::AtColumn(new_column),
                        Some(ListSignal::HandledLine),
                    )
                }
            } else if current_indent == list_indent
                && let Some(candidate) = candidate
                && (item.had_blank_line || config.policy.can_interrupt(&candidate, true))
            {
                ItemOutcome::new(Continuation::None, Some(ListSignal::HandledNewItemLine))
            } else {
                ItemOutcome::new(Continuation::None, None)
            }
        }
    }
}
