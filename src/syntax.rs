use rowan::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    WHITESPACE = 0,
    NEWLINE,
    TEXT,
    BlankLine,
    ListMarker,         // - + * or 1. 1)
    QuoteMarker,        // >
    AtxHeadingMarker,   // leading #####
    CodeFenceMarker,    // ``` or ~~~
    CodeInfo,           // info string after an opening fence
    ThematicBreakToken, // --- or *** or ___

    // Composite nodes
    ROOT,
    DOCUMENT,
    PARAGRAPH,
    BulletList,
    OrderedList,
    BulletListItem,
    OrderedListItem,
    BlockQuote,
    IndentedCodeBlock,
    FencedCodeBlock,
    AtxHeading,
    ThematicBreak,
}

impl SyntaxKind {
    /// Whether this kind is a list container node.
    pub fn is_list(self) -> bool {
        matches!(self, SyntaxKind::BulletList | SyntaxKind::OrderedList)
    }

    /// Whether this kind is a list item node.
    pub fn is_list_item(self) -> bool {
        matches!(
            self,
            SyntaxKind::BulletListItem | SyntaxKind::OrderedListItem
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkupLanguage {}

impl Language for MarkupLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<MarkupLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<MarkupLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<MarkupLanguage>;
