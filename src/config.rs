use std::fmt;
use std::sync::Arc;

use crate::block_parser::lists::{ListData, markers_match};

/// The dialect family whose list-continuation arithmetic is emulated.
/// Each family has its own indent thresholds and decision order; the
/// family is selected once per document and never changes mid-parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Emulation {
    /// The strict specification dialect (CommonMark rules).
    #[default]
    CommonMark,
    /// Fixed-indent legacy dialect (MultiMarkdown, Pandoc-era nesting
    /// arithmetic relative to the outermost list marker).
    FixedIndent,
    /// Kramdown-compatible dialect (thresholds relative to the owning
    /// list's content indent).
    Kramdown,
    /// Markdown.pl-compatible dialect (thresholds keyed to the list's
    /// marker indent, lazy continuation preferred over indented code
    /// until a blank line is seen).
    Markdown,
}

impl Emulation {
    /// Default indented-code threshold for this family.
    pub fn default_code_indent(self) -> usize {
        match self {
            Emulation::CommonMark => 4,
            Emulation::FixedIndent | Emulation::Kramdown | Emulation::Markdown => 8,
        }
    }

    /// Default item-nesting threshold for this family.
    pub fn default_item_indent(self) -> usize {
        4
    }
}

/// Dialect-specific marker compatibility rules, kept outside the
/// continuation engine so the engine never hardcodes a tie-break.
///
/// `current` is the list currently open, `candidate` the list a freshly
/// scanned marker would start.
pub trait ListPolicy: Send + Sync {
    /// May `candidate` interrupt an in-progress paragraph without an
    /// intervening blank line? `is_item_paragraph` distinguishes a
    /// paragraph that is the first child of a list item from a
    /// top-level one.
    fn can_interrupt(&self, candidate: &ListData, is_item_paragraph: bool) -> bool;

    /// Should a marker that mismatches the current item geometry be
    /// kept as a sub-list of the current item?
    fn starts_sub_list(&self, current: &ListData, candidate: &ListData) -> bool;

    /// Should a marker that mismatches the current item geometry close
    /// the current list entirely and start a fresh one?
    fn starts_new_list(&self, current: &ListData, candidate: &ListData) -> bool;
}

/// Strict-dialect interruption and compatibility rules.
///
/// An empty item never interrupts a paragraph; an ordinal item must
/// start at 1 to do so. A marker whose type or delimiter differs from
/// the current list's starts a new list rather than a sibling item.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultListPolicy;

impl ListPolicy for DefaultListPolicy {
    fn can_interrupt(&self, candidate: &ListData, is_item_paragraph: bool) -> bool {
        if is_item_paragraph {
            // Inside a list, a sibling marker ends the item's
            // paragraph even when empty or not starting at 1.
            return true;
        }
        !candidate.is_empty
            && candidate
                .marker
                .ordinal_number()
                .is_none_or(|number| number == "1")
    }

    fn starts_sub_list(&self, _current: &ListData, _candidate: &ListData) -> bool {
        false
    }

    fn starts_new_list(&self, current: &ListData, candidate: &ListData) -> bool {
        !markers_match(&current.marker, &candidate.marker)
    }
}

/// Parser configuration: dialect family, indent thresholds, marker
/// character sets, and the list tie-breaking policy.
#[derive(Clone)]
pub struct Config {
    pub emulation: Emulation,
    /// Indent at which a line becomes indented code.
    pub code_indent: usize,
    /// Indent at which a line nests inside a list item.
    pub item_indent: usize,
    /// Longest digit run accepted as an ordinal marker.
    pub max_ordinal_digits: usize,
    /// Characters accepted as bullet markers.
    pub bullet_chars: Vec<char>,
    /// Delimiters accepted after an ordinal digit run.
    pub ordered_delimiters: Vec<char>,
    pub policy: Arc<dyn ListPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::default().build()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("emulation", &self.emulation)
            .field("code_indent", &self.code_indent)
            .field("item_indent", &self.item_indent)
            .field("max_ordinal_digits", &self.max_ordinal_digits)
            .field("bullet_chars", &self.bullet_chars)
            .field("ordered_delimiters", &self.ordered_delimiters)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Configuration with a family's default thresholds.
    pub fn for_emulation(emulation: Emulation) -> Self {
        ConfigBuilder::default().emulation(emulation).build()
    }
}

/// Builder for [`Config`]. Thresholds left unset follow the selected
/// emulation family's defaults.
#[derive(Default)]
pub struct ConfigBuilder {
    emulation: Emulation,
    code_indent: Option<usize>,
    item_indent: Option<usize>,
    max_ordinal_digits: Option<usize>,
    bullet_chars: Option<Vec<char>>,
    ordered_delimiters: Option<Vec<char>>,
    policy: Option<Arc<dyn ListPolicy>>,
}

impl ConfigBuilder {
    pub fn emulation(mut self, emulation: Emulation) -> Self {
        self.emulation = emulation;
        self
    }

    pub fn code_indent(mut self, columns: usize) -> Self {
        self.code_indent = Some(columns);
        self
    }

    pub fn item_indent(mut self, columns: usize) -> Self {
        self.item_indent = Some(columns);
        self
    }

    pub fn max_ordinal_digits(mut self, digits: usize) -> Self {
        self.max_ordinal_digits = Some(digits);
        self
    }

    pub fn bullet_chars(mut self, chars: Vec<char>) -> Self {
        self.bullet_chars = Some(chars);
        self
    }

    pub fn ordered_delimiters(mut self, delimiters: Vec<char>) -> Self {
        self.ordered_delimiters = Some(delimiters);
        self
    }

    pub fn policy(mut self, policy: Arc<dyn ListPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn build(self) -> Config {
        let emulation = self.emulation;
        Config {
            emulation,
            code_indent: self
                .code_indent
                .unwrap_or_else(|| emulation.default_code_indent()),
            item_indent: self
                .item_indent
                .unwrap_or_else(|| emulation.default_item_indent()),
            max_ordinal_digits: self.max_ordinal_digits.unwrap_or(9),
            bullet_chars: self.bullet_chars.unwrap_or_else(|| vec!['-', '+', '*']),
            ordered_delimiters: self.ordered_delimiters.unwrap_or_else(|| vec!['.', ')']),
            policy: self.policy.unwrap_or_else(|| Arc::new(DefaultListPolicy)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_defaults() {
        let strict = Config::default();
        assert_eq!(strict.emulation, Emulation::CommonMark);
        assert_eq!(strict.code_indent, 4);
        assert_eq!(strict.item_indent, 4);

        let legacy = Config::for_emulation(Emulation::Kramdown);
        assert_eq!(legacy.code_indent, 8);
        assert_eq!(legacy.item_indent, 4);
    }

    #[test]
    fn builder_overrides_family_defaults() {
        let config = ConfigBuilder::default()
            .emulation(Emulation::Markdown)
            .code_indent(6)
            .build();
        assert_eq!(config.code_indent, 6);
        assert_eq!(config.item_indent, 4);
    }
}
