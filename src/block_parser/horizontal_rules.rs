//! Thematic breaks.

use super::CODE_BLOCK_INDENT;
use super::state::LineState;
use super::utils::strip_newline;

/// Try to parse a thematic break at the cursor: 3 or more `*`, `-`, or
/// `_` characters, optionally separated by spaces or tabs.
pub(crate) fn try_parse_thematic_break(line: &LineState) -> Option<char> {
    if line.indent() >= CODE_BLOCK_INDENT {
        return None;
    }
    let (content, _) = strip_newline(line.content());
    let trimmed = content.trim_end();

    let rule_char = trimmed.chars().next()?;
    if !matches!(rule_char, '*' | '-' | '_') {
        return None;
    }

    let mut count = 0;
    for ch in trimmed.chars() {
        match ch {
            c if c == rule_char => count += 1,
            ' ' | '\t' => continue,
            _ => return None,
        }
    }

    if count >= 3 { Some(rule_char) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_all_rule_chars() {
        assert_eq!(try_parse_thematic_break(&LineState::new("***\n")), Some('*'));
        assert_eq!(try_parse_thematic_break(&LineState::new("- - -\n")), Some('-'));
        assert_eq!(try_parse_thematic_break(&LineState::new("___\n")), Some('_'));
    }

    #[test]
    fn rejects_short_or_mixed_runs() {
        assert_eq!(try_parse_thematic_break(&LineState::new("**\n")), None);
        assert_eq!(try_parse_thematic_break(&LineState::new("*-*\n")), None);
        assert_eq!(try_parse_thematic_break(&LineState::new("text\n")), None);
    }
}
