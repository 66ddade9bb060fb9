use std::collections::HashSet;

use super::{Block, BlockId, BlockKind, truncate_chars};

const TITLE_LABEL_CHARS: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutlineNode {
    Title(TitleNode),
    /// A paragraph that appears before the first title.
    Paragraph(ParagraphNode),
}

impl OutlineNode {
    pub fn id(&self) -> BlockId {
        match self {
            OutlineNode::Title(node) => node.id,
            OutlineNode::Paragraph(node) => node.id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleNode {
    pub id: BlockId,
    pub title_number: usize,
    pub text: String,
    pub collapsed: bool,
    pub applied: bool,
    /// Owned paragraphs, present even when the title is collapsed.
    pub children: Vec<ParagraphNode>,
}

impl TitleNode {
    pub fn label(&self) -> String {
        let marker = if self.collapsed { '▶' } else { '▼' };
        let mut label = format!(
            "{marker} Title {}: {}",
            self.title_number,
            truncate_chars(&self.text, TITLE_LABEL_CHARS)
        );
        if self.applied {
            label.push_str(" ✓");
        }
        label
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParagraphNode {
    pub id: BlockId,
    pub number: usize,
    pub char_count: usize,
    pub applied: bool,
    pub selected: bool,
}

impl ParagraphNode {
    pub fn label(&self) -> String {
        let mut label = format!("Paragraph {} ({} characters)", self.number, self.char_count);
        if self.applied {
            label.push_str(" ✓");
        }
        label
    }
}

/// Builds the nested title → paragraphs view from the flat block sequence.
pub fn project(
    blocks: &[Block],
    collapsed: &HashSet<BlockId>,
    selected: &HashSet<BlockId>,
) -> Vec<OutlineNode> {
    let mut nodes = Vec::new();
    let mut current: Option<TitleNode> = None;

    for block in blocks {
        match block.kind {
            BlockKind::Title { title_number } => {
                if let Some(title) = current.take() {
                    nodes.push(OutlineNode::Title(title));
                }
                current = Some(TitleNode {
                    id: block.id,
                    title_number,
                    text: block.text.clone(),
                    collapsed: collapsed.contains(&block.id),
                    applied: block.applied,
                    children: Vec::new(),
                });
            }
            BlockKind::Paragraph { number } => {
                let node = ParagraphNode {
                    id: block.id,
                    number,
                    char_count: block.char_count(),
                    applied: block.applied,
                    selected: selected.contains(&block.id),
                };
                match current.as_mut() {
                    Some(title) => title.children.push(node),
                    None => nodes.push(OutlineNode::Paragraph(node)),
                }
            }
        }
    }

    if let Some(title) = current {
        nodes.push(OutlineNode::Title(title));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::BlockEditor;
    use pretty_assertions::assert_eq;

    fn editor() -> BlockEditor {
        BlockEditor::from_text("Preface\n\n1. One\n\nfirst\nsecond\n\n2. Two\n\nthird").unwrap()
    }

    #[test]
    fn paragraphs_before_first_title_stay_top_level() {
        let outline = editor().outline();
        assert_eq!(outline.len(), 3);
        assert!(matches!(&outline[0], OutlineNode::Paragraph(node) if node.number == 1));

        let OutlineNode::Title(one) = &outline[1] else {
            panic!("expected title node");
        };
        assert_eq!(one.title_number, 1);
        let numbers: Vec<_> = one.children.iter().map(|child| child.number).collect();
        assert_eq!(numbers, vec![2, 3]);

        let OutlineNode::Title(two) = &outline[2] else {
            panic!("expected title node");
        };
        assert_eq!(two.children.len(), 1);
    }

    #[test]
    fn collapsed_titles_keep_their_children() {
        let mut editor = editor();
        let title = editor.blocks()[1].id();
        assert!(editor.toggle_collapse(title));

        let outline = editor.outline();
        let OutlineNode::Title(one) = &outline[1] else {
            panic!("expected title node");
        };
        assert!(one.collapsed);
        assert_eq!(one.children.len(), 2);
        assert!(one.label().starts_with("▶ Title 1: 1. One"));
    }

    #[test]
    fn labels_report_counts_and_applied_marker() {
        let mut editor = editor();
        let first = editor.blocks()[2].id();
        editor.toggle_select(first);
        editor.apply().unwrap();

        let outline = editor.outline();
        let OutlineNode::Title(one) = &outline[1] else {
            panic!("expected title node");
        };
        assert_eq!(one.children[0].label(), "Paragraph 2 (5 characters) ✓");
        assert_eq!(one.children[1].label(), "Paragraph 3 (6 characters)");
    }

    #[test]
    fn applied_titles_carry_the_marker() {
        let title = TitleNode {
            id: BlockId(7),
            title_number: 2,
            text: "2. Results".to_string(),
            collapsed: true,
            applied: true,
            children: Vec::new(),
        };
        assert_eq!(title.label(), "▶ Title 2: 2. Results ✓");
    }

    #[test]
    fn long_title_labels_are_truncated() {
        let editor =
            BlockEditor::from_text("1. A heading that is clearly longer than thirty chars\n\nx")
                .unwrap();
        let outline = editor.outline();
        let OutlineNode::Title(title) = &outline[0] else {
            panic!("expected title node");
        };
        assert_eq!(title.label(), "▼ Title 1: 1. A heading that is clearly l...");
    }
}
