use std::collections::HashSet;

use super::{Block, BlockId, BlockKind};

/// Recomputes `visible` for every block in one forward pass. Titles are always
/// visible; a paragraph is hidden when the nearest title before it is
/// collapsed.
pub fn apply_collapse(blocks: &mut [Block], collapsed: &HashSet<BlockId>) {
    let mut suppressed = false;
    for block in blocks.iter_mut() {
        match block.kind {
            BlockKind::Title { .. } => {
                block.visible = true;
                suppressed = collapsed.contains(&block.id);
            }
            BlockKind::Paragraph { .. } => {
                block.visible = !suppressed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::BlockIdGenerator;

    fn sample() -> Vec<Block> {
        let mut ids = BlockIdGenerator::new();
        vec![
            Block::new(ids.next_id(), "intro", BlockKind::paragraph()),
            Block::new(ids.next_id(), "1.", BlockKind::title()),
            Block::new(ids.next_id(), "a", BlockKind::paragraph()),
            Block::new(ids.next_id(), "b", BlockKind::paragraph()),
            Block::new(ids.next_id(), "2.", BlockKind::title()),
            Block::new(ids.next_id(), "c", BlockKind::paragraph()),
        ]
    }

    fn visibility(blocks: &[Block]) -> Vec<bool> {
        blocks.iter().map(Block::is_visible).collect()
    }

    #[test]
    fn collapsed_title_hides_only_its_own_run() {
        let mut blocks = sample();
        let collapsed = HashSet::from([blocks[1].id()]);
        apply_collapse(&mut blocks, &collapsed);
        assert_eq!(
            visibility(&blocks),
            vec![true, true, false, false, true, true]
        );
    }

    #[test]
    fn leading_paragraphs_are_never_hidden() {
        let mut blocks = sample();
        let collapsed: HashSet<_> = blocks
            .iter()
            .filter(|block| block.is_title())
            .map(Block::id)
            .collect();
        apply_collapse(&mut blocks, &collapsed);
        assert_eq!(
            visibility(&blocks),
            vec![true, true, false, false, true, false]
        );

        apply_collapse(&mut blocks, &HashSet::new());
        assert!(blocks.iter().all(Block::is_visible));
    }
}
