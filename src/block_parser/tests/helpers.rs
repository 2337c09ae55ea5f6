use crate::block_parser::BlockParser;
use crate::block_parser::lists::ListRegistry;
use crate::config::{Config, Emulation};
use crate::syntax::{SyntaxKind, SyntaxNode};

pub fn parse_blocks(input: &str) -> SyntaxNode {
    let config = Config::default();
    let (tree, _registry) = BlockParser::new(input, &config).parse();
    tree
}

pub fn parse_with(input: &str, config: &Config) -> (SyntaxNode, ListRegistry) {
    BlockParser::new(input, config).parse()
}

pub fn parse_family(input: &str, emulation: Emulation) -> (SyntaxNode, ListRegistry) {
    let config = Config::for_emulation(emulation);
    BlockParser::new(input, &config).parse()
}

pub fn find_first(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.descendants().find(|n| n.kind() == kind)
}

pub fn find_all(node: &SyntaxNode, kind: SyntaxKind) -> Vec<SyntaxNode> {
    node.descendants().filter(|n| n.kind() == kind).collect()
}

pub fn get_blocks(node: &SyntaxNode) -> Vec<SyntaxNode> {
    let document = node
        .children()
        .find(|n| n.kind() == SyntaxKind::DOCUMENT)
        .unwrap();
    document.children().collect()
}

pub fn assert_block_kinds(input: &str, expected: &[SyntaxKind]) {
    let node = parse_blocks(input);
    let blocks = get_blocks(&node);
    let actual: Vec<_> = blocks.iter().map(|n| n.kind()).collect();
    assert_eq!(
        actual, expected,
        "Block kinds did not match for input:\n{}",
        input
    );
}

/// Count direct children of a specific kind.
pub fn count_children(node: &SyntaxNode, kind: SyntaxKind) -> usize {
    node.children().filter(|n| n.kind() == kind).count()
}

/// Direct children that are list items of either kind.
pub fn items(node: &SyntaxNode) -> Vec<SyntaxNode> {
    node.children().filter(|n| n.kind().is_list_item()).collect()
}

/// Text of the first ListMarker token under the node.
pub fn marker_text(node: &SyntaxNode) -> Option<String> {
    node.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == SyntaxKind::ListMarker)
        .map(|token| token.text().to_string())
}
