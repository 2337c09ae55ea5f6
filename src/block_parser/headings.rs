//! ATX headings.

use super::CODE_BLOCK_INDENT;
use super::state::LineState;

/// Try to parse an ATX heading at the cursor, returning its level
/// (1-6).
pub(crate) fn try_parse_atx_heading(line: &LineState) -> Option<usize> {
    if line.indent() >= CODE_BLOCK_INDENT {
        return None;
    }
    let content = line.content();
    let hash_count = content.chars().take_while(|&c| c == '#').count();
    if hash_count == 0 || hash_count > 6 {
        return None;
    }

    // After the hashes: end of line, space, or tab.
    let after = &content[hash_count..];
    if !(after.is_empty()
        || after == "\n"
        || after == "\r\n"
        || after.starts_with(' ')
        || after.starts_with('\t'))
    {
        return None;
    }

    Some(hash_count)
}
