use super::{Block, BlockKind};

/// Recomputes title and paragraph numbers over the whole sequence. The two
/// counters are independent and both start at 1.
pub fn renumber(blocks: &mut [Block]) {
    let mut next_title = 1;
    let mut next_paragraph = 1;

    for block in blocks.iter_mut() {
        block.kind = match block.kind {
            BlockKind::Title { .. } => {
                let kind = BlockKind::Title {
                    title_number: next_title,
                };
                next_title += 1;
                kind
            }
            BlockKind::Paragraph { .. } => {
                let kind = BlockKind::Paragraph {
                    number: next_paragraph,
                };
                next_paragraph += 1;
                kind
            }
        };
    }
}
