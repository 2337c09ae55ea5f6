//! List marker scanning and list-level state.
//!
//! `parse_list_marker` is a pure scan: it never touches parser state,
//! so the continuation engine and the block-start phase can both probe
//! a line without committing to anything.

use std::collections::BTreeMap;

use crate::config::Config;
use crate::syntax::SyntaxKind;

use super::blocks::{BlockContext, BlockParse, CloseContext, Continuation};
use super::state::LineState;

/// The literal marker shape of one list item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListMarker {
    Bullet(char),
    Ordinal { digits: String, delimiter: char },
}

impl ListMarker {
    /// The digit run of an ordinal marker, if this is one.
    pub fn ordinal_number(&self) -> Option<&str> {
        match self {
            ListMarker::Bullet(_) => None,
            ListMarker::Ordinal { digits, .. } => Some(digits),
        }
    }
}

/// Strict marker compatibility: bullets must use the same character,
/// ordinals the same delimiter.
pub fn markers_match(a: &ListMarker, b: &ListMarker) -> bool {
    match (a, b) {
        (ListMarker::Bullet(c1), ListMarker::Bullet(c2)) => c1 == c2,
        (
            ListMarker::Ordinal { delimiter: d1, .. },
            ListMarker::Ordinal { delimiter: d2, .. },
        ) => d1 == d2,
        _ => false,
    }
}

/// Geometry of one list marker, immutable once scanned.
///
/// Invariant: `marker_indent + marker_length + content_offset` is the
/// content indent for items of this list; it is recomputed per item,
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListData {
    /// Absolute column at which the marker begins.
    pub marker_column: usize,
    /// Whitespace width between the enclosing frame and the marker.
    pub marker_indent: usize,
    /// The literal marker (`-`, `*`, `1.`, ...), verbatim.
    pub marker_text: String,
    /// Whitespace width between marker and first content character,
    /// clamped to 1 when the gap reaches the code threshold or the
    /// rest of the line is blank.
    pub content_offset: usize,
    /// Ordinal vs. bullet list; selects the node variant created.
    pub is_numbered: bool,
    /// No content followed the marker on its own line.
    pub is_empty: bool,
    pub marker: ListMarker,
}

impl ListData {
    /// Character width of the literal marker.
    pub fn marker_length(&self) -> usize {
        self.marker_text.chars().count()
    }

    /// Content indent relative to the marker's frame.
    pub fn content_indent(&self) -> usize {
        self.marker_indent + self.marker_length() + self.content_offset
    }

    /// Absolute column at which item content starts.
    pub fn content_column(&self) -> usize {
        self.marker_column + self.marker_length() + self.content_offset
    }

    /// Node kinds for the list and its items.
    pub(crate) fn node_kinds(&self) -> (SyntaxKind, SyntaxKind) {
        if self.is_numbered {
            (SyntaxKind::OrderedList, SyntaxKind::OrderedListItem)
        } else {
            (SyntaxKind::BulletList, SyntaxKind::BulletListItem)
        }
    }
}

/// Scan for a list marker at the line's next non-space position.
///
/// `code_indent_limit` rejects markers indented to the code threshold;
/// `None` skips that rejection (legacy dialects ignore it here). The
/// content offset is computed by expanding the whitespace after the
/// marker; a gap past the configured code indent, or a marker with
/// nothing after it, clamps the offset to 1 so the surplus stays
/// available as indented-code content.
pub(crate) fn parse_list_marker(
    code_indent_limit: Option<usize>,
    line: &LineState,
    config: &Config,
) -> Option<ListData> {
    if line.is_blank() {
        return None;
    }
    if let Some(limit) = code_indent_limit
        && line.indent() >= limit
    {
        return None;
    }

    let content = line.content();
    let (marker, marker_bytes) = scan_marker(content, config)?;

    let after = &content[marker_bytes..];
    if !(after.is_empty()
        || after == "\n"
        || after == "\r\n"
        || after.starts_with(' ')
        || after.starts_with('\t'))
    {
        return None;
    }

    let marker_text = &content[..marker_bytes];
    let marker_column = line.next_non_space_column();
    let mut column = marker_column + marker_text.chars().count();
    let mut has_content = false;
    let mut offset = 0;
    for ch in after.chars() {
        match ch {
            ' ' => column += 1,
            '\t' => column += 4 - (column % 4),
            '\n' | '\r' => break,
            _ => {
                has_content = true;
                break;
            }
        }
        offset = column - (marker_column + marker_text.chars().count());
    }

    let content_offset = if !has_content || offset > config.code_indent {
        1
    } else {
        offset
    };

    Some(ListData {
        marker_column,
        marker_indent: line.indent(),
        marker_text: marker_text.to_string(),
        content_offset,
        is_numbered: matches!(marker, ListMarker::Ordinal { .. }),
        is_empty: !has_content,
        marker,
    })
}

/// Recognize the marker itself, returning its byte length.
fn scan_marker(content: &str, config: &Config) -> Option<(ListMarker, usize)> {
    let first = content.chars().next()?;
    if config.bullet_chars.contains(&first) {
        return Some((ListMarker::Bullet(first), first.len_utf8()));
    }

    let digit_count = content.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_count == 0 || digit_count > config.max_ordinal_digits {
        return None;
    }
    let delimiter = content.chars().nth(digit_count)?;
    if !config.ordered_delimiters.contains(&delimiter) {
        return None;
    }
    Some((
        ListMarker::Ordinal {
            digits: content[..digit_count].to_string(),
            delimiter,
        },
        digit_count + delimiter.len_utf8(),
    ))
}

/// The handled-line report an item files with its owning list, one per
/// line, mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListSignal {
    /// Line belongs to the current item as ordinary or code content.
    HandledLine,
    /// Line is a lazy continuation of a paragraph inside the current
    /// item; active-parser resolution bypasses the stack position.
    HandledLineSkipActive,
    /// Line starts a nested sub-list inside the current item.
    HandledNewListLine,
    /// Line starts a new sibling item at this list's level.
    HandledNewItemLine,
}

/// Block parser for one list. Owns the geometry of the opening item;
/// per-line item signals live in the line's scope snapshot, and the
/// tight/loose decision is folded in as blank lines and new blocks
/// arrive.
#[derive(Debug, Clone)]
pub(crate) struct ListParser {
    pub(crate) data: ListData,
    pub(crate) start_offset: usize,
    pub(crate) tight: bool,
}

impl ListParser {
    pub(crate) fn new(data: ListData, start_offset: usize) -> Self {
        Self {
            data,
            start_offset,
            tight: true,
        }
    }
}

impl BlockParse for ListParser {
    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&self, kind: SyntaxKind) -> bool {
        kind.is_list_item()
    }

    fn try_continue(&mut self, line: &LineState, _ctx: &BlockContext) -> Continuation {
        // A list never consumes anything itself; it closes when its
        // items stop reporting handled lines and containment fails.
        Continuation::AtIndex(line.index())
    }

    fn close(&mut self, ctx: &mut CloseContext) {
        log::debug!(
            "closing list at offset {} (tight: {})",
            self.start_offset,
            self.tight
        );
        ctx.registry.insert(
            self.start_offset,
            ListInfo {
                data: self.data.clone(),
                tight: self.tight,
            },
        );
    }
}

/// Marker geometry and spacing for one parsed list, keyed by the list
/// node's start offset in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListInfo {
    pub data: ListData,
    /// False once items were separated by blank lines, or an item
    /// grew a second block after a blank.
    pub tight: bool,
}

/// Side table of list geometry produced alongside the syntax tree.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListRegistry {
    entries: BTreeMap<usize, ListInfo>,
}

impl ListRegistry {
    pub(crate) fn insert(&mut self, offset: usize, info: ListInfo) {
        self.entries.insert(offset, info);
    }

    /// Look up a list by its node's start offset.
    pub fn get(&self, offset: usize) -> Option<&ListInfo> {
        self.entries.get(&offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ListInfo)> {
        self.entries.iter().map(|(offset, info)| (*offset, info))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
