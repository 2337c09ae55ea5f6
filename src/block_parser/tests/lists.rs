use std::sync::Arc;

use crate::block_parser::state::LineState;
use crate::block_parser::lists::parse_list_marker;
use crate::block_parser::tests::helpers::{
    count_children, find_all, find_first, get_blocks, items, marker_text, parse_blocks, parse_with,
};
use crate::config::{Config, ConfigBuilder, ListPolicy};
use crate::block_parser::lists::ListData;
use crate::syntax::SyntaxKind;

#[test]
fn simple_bullet_list() {
    let input = "* one\n* two\n* three\n";
    let tree = parse_blocks(input);
    let list = find_first(&tree, SyntaxKind::BulletList).expect("should find list");
    assert_eq!(count_children(&list, SyntaxKind::BulletListItem), 3);
}

#[test]
fn bullet_list_requires_space_after_marker() {
    let input = "*one\n*two\n";
    let tree = parse_blocks(input);
    assert!(find_first(&tree, SyntaxKind::BulletList).is_none());
    assert!(find_first(&tree, SyntaxKind::PARAGRAPH).is_some());
}

#[test]
fn bullet_list_with_different_markers() {
    // Changing the bullet character starts a new list
    let input = "* item\n+ item\n- item\n";
    let tree = parse_blocks(input);
    let lists = find_all(&tree, SyntaxKind::BulletList);
    assert_eq!(lists.len(), 3);
}

#[test]
fn bullet_list_indented_1_to_3_spaces() {
    let input = " * one\n";
    let tree = parse_blocks(input);
    assert_eq!(find_all(&tree, SyntaxKind::BulletListItem).len(), 1);
}

#[test]
fn bullet_list_indented_4_spaces_is_code() {
    let input = "    * not a list\n";
    let tree = parse_blocks(input);
    assert!(find_first(&tree, SyntaxKind::BulletList).is_none());
    assert!(find_first(&tree, SyntaxKind::IndentedCodeBlock).is_some());
}

#[test]
fn bullet_list_with_continuation() {
    let input = "* here is my first\n  list item.\n* and my second.\n";
    let tree = parse_blocks(input);
    let list = find_first(&tree, SyntaxKind::BulletList).expect("should find list");
    assert_eq!(count_children(&list, SyntaxKind::BulletListItem), 2);
}

#[test]
fn bullet_list_lazy_continuation() {
    let input = "* here is my first\nlist item.\n* and my second.\n";
    let tree = parse_blocks(input);
    let list = find_first(&tree, SyntaxKind::BulletList).expect("should find list");
    assert_eq!(count_children(&list, SyntaxKind::BulletListItem), 2);
}

#[test]
fn nested_bullet_lists() {
    let input = "- fruits\n  - apples\n  - pears\n- vegetables\n";
    let tree = parse_blocks(input);
    let lists = find_all(&tree, SyntaxKind::BulletList);
    assert_eq!(lists.len(), 2, "outer list plus one nested list");
    let outer = &lists[0];
    assert_eq!(count_children(outer, SyntaxKind::BulletListItem), 2);
    let nested = &lists[1];
    assert_eq!(count_children(nested, SyntaxKind::BulletListItem), 2);
}

#[test]
fn simple_ordered_list() {
    let input = "1. one\n2. two\n3. three\n";
    let tree = parse_blocks(input);
    let list = find_first(&tree, SyntaxKind::OrderedList).expect("should find list");
    assert_eq!(count_children(&list, SyntaxKind::OrderedListItem), 3);
}

#[test]
fn ordered_list_numbers_are_not_matched() {
    let input = "5. one\n7. two\n1. three\n";
    let tree = parse_blocks(input);
    let list = find_first(&tree, SyntaxKind::OrderedList).expect("should find list");
    assert_eq!(count_children(&list, SyntaxKind::OrderedListItem), 3);
}

#[test]
fn ordered_list_requires_space_after_marker() {
    let input = "1.one\n2.two\n";
    let tree = parse_blocks(input);
    assert!(find_first(&tree, SyntaxKind::OrderedList).is_none());
}

#[test]
fn ordered_markers_preserved_verbatim() {
    let input = "1. first\n2. second\n";
    let (tree, registry) = parse_with(input, &Config::default());
    let list = find_first(&tree, SyntaxKind::OrderedList).expect("should find list");
    let item_nodes = items(&list);
    assert_eq!(item_nodes.len(), 2);
    assert_eq!(marker_text(&item_nodes[0]).as_deref(), Some("1."));
    assert_eq!(marker_text(&item_nodes[1]).as_deref(), Some("2."));

    let offset: usize = list.text_range().start().into();
    let info = registry.get(offset).expect("registry entry for the list");
    assert!(info.data.is_numbered);
    assert!(info.tight);
}

#[test]
fn ordered_and_bullet_markers_split_lists() {
    let input = "1. one\n- two\n";
    let tree = parse_blocks(input);
    assert!(find_first(&tree, SyntaxKind::OrderedList).is_some());
    assert!(find_first(&tree, SyntaxKind::BulletList).is_some());
}

#[test]
fn item_content_at_content_indent_stays_in_item() {
    let input = "- a\n  text\n";
    let tree = parse_blocks(input);
    let list = find_first(&tree, SyntaxKind::BulletList).expect("should find list");
    assert_eq!(count_children(&list, SyntaxKind::BulletListItem), 1);
    let item = items(&list).remove(0);
    let para = find_first(&item, SyntaxKind::PARAGRAPH).expect("item paragraph");
    // the continuation line's shed indent stays inside the paragraph
    assert_eq!(para.text().to_string(), "a\n  text\n");
}

#[test]
fn marker_at_content_indent_starts_sub_list() {
    let input = "- item1\n  - subitem\n";
    let tree = parse_blocks(input);
    let lists = find_all(&tree, SyntaxKind::BulletList);
    assert_eq!(lists.len(), 2);
    let outer_item = items(&lists[0]).remove(0);
    assert_eq!(count_children(&outer_item, SyntaxKind::BulletList), 1);
}

#[test]
fn nested_item_with_blank_then_outer_content() {
    // blank line does not close item1 because the following line's
    // indent still meets item1's content indent
    let input = "- item1\n  - subitem\n\n  text\n";
    let (tree, registry) = parse_with(input, &Config::default());

    let lists = find_all(&tree, SyntaxKind::BulletList);
    assert_eq!(lists.len(), 2);
    let outer = &lists[0];
    assert_eq!(count_children(outer, SyntaxKind::BulletListItem), 1);

    let item1 = items(outer).remove(0);
    assert_eq!(count_children(&item1, SyntaxKind::BulletList), 1);
    assert_eq!(count_children(&item1, SyntaxKind::PARAGRAPH), 2);
    let paragraphs: Vec<_> = item1
        .children()
        .filter(|n| n.kind() == SyntaxKind::PARAGRAPH)
        .collect();
    assert_eq!(paragraphs[0].text().to_string(), "item1\n");
    assert_eq!(paragraphs[1].text().to_string(), "text\n");

    // the outer list went loose, the nested one stayed tight
    let outer_offset: usize = outer.text_range().start().into();
    assert!(!registry.get(outer_offset).unwrap().tight);
    let nested_offset: usize = lists[1].text_range().start().into();
    assert!(registry.get(nested_offset).unwrap().tight);
}

#[test]
fn empty_item_rejects_plain_continuation() {
    let input = "- \n\n  text\n";
    let tree = parse_blocks(input);
    let blocks = get_blocks(&tree);
    let kinds: Vec<_> = blocks.iter().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::BulletList,
            SyntaxKind::BlankLine,
            SyntaxKind::PARAGRAPH
        ],
        "the empty item must close instead of taking content"
    );
    let list = find_first(&tree, SyntaxKind::BulletList).unwrap();
    let item = items(&list).remove(0);
    assert_eq!(count_children(&item, SyntaxKind::PARAGRAPH), 0);
}

#[test]
fn empty_item_without_blank_takes_content() {
    let input = "- \n  text\n";
    let tree = parse_blocks(input);
    let list = find_first(&tree, SyntaxKind::BulletList).unwrap();
    let item = items(&list).remove(0);
    assert_eq!(count_children(&item, SyntaxKind::PARAGRAPH), 1);
}

#[test]
fn empty_marker_becomes_sibling_item() {
    let input = "- a\n-\n- c\n";
    let tree = parse_blocks(input);
    let list = find_first(&tree, SyntaxKind::BulletList).unwrap();
    assert_eq!(count_children(&list, SyntaxKind::BulletListItem), 3);
}

#[test]
fn loose_and_tight_lists_in_registry() {
    let (_, registry) = parse_with("- a\n- b\n", &Config::default());
    assert_eq!(registry.len(), 1);
    assert!(registry.iter().next().unwrap().1.tight);

    let (_, registry) = parse_with("- a\n\n- b\n", &Config::default());
    assert_eq!(registry.len(), 1);
    assert!(!registry.iter().next().unwrap().1.tight);
}

#[test]
fn blank_between_items_stays_inside_the_list() {
    let input = "- a\n\n- b\n";
    let tree = parse_blocks(input);
    let list = find_first(&tree, SyntaxKind::BulletList).unwrap();
    assert_eq!(count_children(&list, SyntaxKind::BulletListItem), 2);
    assert_eq!(count_children(&list, SyntaxKind::BlankLine), 1);
}

#[test]
fn item_marker_scan_is_idempotent_over_item_text() {
    let config = Config::default();
    let input = "  1. first\n  2. second\n";
    let (tree, registry) = parse_with(input, &config);
    let list = find_first(&tree, SyntaxKind::OrderedList).unwrap();
    let offset: usize = list.text_range().start().into();
    let info = registry.get(offset).expect("registry entry");

    // re-scanning the serialized list text reproduces the marker data
    let text = list.text().to_string();
    let first_line: String = text.lines().next().unwrap().to_string() + "\n";
    let state = LineState::new(&first_line);
    let rescanned =
        parse_list_marker(Some(config.code_indent), &state, &config).expect("marker rescans");
    assert_eq!(rescanned.marker_text, info.data.marker_text);
    assert_eq!(rescanned.marker_indent, info.data.marker_indent);
    assert_eq!(rescanned.content_offset, info.data.content_offset);
    assert_eq!(rescanned.is_numbered, info.data.is_numbered);
}

#[test]
fn wide_marker_gap_yields_code_in_item() {
    let input = "-     code\n";
    let tree = parse_blocks(input);
    let item = find_first(&tree, SyntaxKind::BulletListItem).unwrap();
    let code = find_first(&item, SyntaxKind::IndentedCodeBlock);
    assert!(code.is_some(), "surplus marker gap becomes indented code");
}

#[test]
fn ordinal_not_starting_at_one_cannot_interrupt_a_paragraph() {
    let tree = parse_blocks("paragraph\n2. not a list\n");
    assert!(find_first(&tree, SyntaxKind::OrderedList).is_none());
    let para = find_first(&tree, SyntaxKind::PARAGRAPH).expect("paragraph");
    assert_eq!(para.text().to_string(), "paragraph\n2. not a list\n");
}

#[test]
fn ordinal_starting_at_one_interrupts_a_paragraph() {
    let tree = parse_blocks("paragraph\n1. item\n");
    assert!(find_first(&tree, SyntaxKind::OrderedList).is_some());
}

#[test]
fn empty_marker_cannot_interrupt_a_paragraph() {
    let tree = parse_blocks("paragraph\n-\n");
    assert!(find_first(&tree, SyntaxKind::BulletList).is_none());
    let para = find_first(&tree, SyntaxKind::PARAGRAPH).expect("paragraph");
    assert!(para.text().to_string().contains("-"));
}

#[test]
fn empty_marker_at_content_indent_continues_the_item_paragraph() {
    let tree = parse_blocks("- a\n  -\n");
    let item = find_first(&tree, SyntaxKind::BulletListItem).expect("item");
    assert_eq!(count_children(&item, SyntaxKind::BulletList), 0);
    let para = find_first(&item, SyntaxKind::PARAGRAPH).expect("paragraph");
    assert_eq!(para.text().to_string(), "a\n  -\n");
}

struct NoInterruptions;

impl ListPolicy for NoInterruptions {
    fn can_interrupt(&self, _candidate: &ListData, _is_item_paragraph: bool) -> bool {
        false
    }

    fn starts_sub_list(&self, _current: &ListData, _candidate: &ListData) -> bool {
        false
    }

    fn starts_new_list(&self, _current: &ListData, _candidate: &ListData) -> bool {
        false
    }
}

#[test]
fn injected_policy_keeps_bullet_as_lazy_continuation() {
    let config = ConfigBuilder::default()
        .policy(Arc::new(NoInterruptions))
        .build();
    let (tree, _) = parse_with("paragraph text\n- item\n", &config);
    assert!(
        find_first(&tree, SyntaxKind::BulletList).is_none(),
        "the marker may not interrupt the paragraph"
    );
    let para = find_first(&tree, SyntaxKind::PARAGRAPH).expect("paragraph");
    assert_eq!(para.text().to_string(), "paragraph text\n- item\n");
}

struct SubListEverything;

impl ListPolicy for SubListEverything {
    fn can_interrupt(&self, _candidate: &ListData, _is_item_paragraph: bool) -> bool {
        true
    }

    fn starts_sub_list(&self, _current: &ListData, _candidate: &ListData) -> bool {
        true
    }

    fn starts_new_list(&self, _current: &ListData, _candidate: &ListData) -> bool {
        false
    }
}

#[test]
fn injected_policy_resolves_marker_mismatch_to_sub_list() {
    let config = ConfigBuilder::default()
        .policy(Arc::new(SubListEverything))
        .build();
    let input = "- a\n1. b\n";
    let (tree, _) = parse_with(input, &config);
    let item = find_first(&tree, SyntaxKind::BulletListItem).expect("outer item");
    assert!(
        find_first(&item, SyntaxKind::OrderedList).is_some(),
        "the ordinal marker nests instead of replacing the list"
    );
}
