use super::{Block, BlockIdGenerator, BlockKind, is_title};
use crate::error::EngineError;

/// Splits raw text into blocks, one per non-blank line. Blank lines only
/// serve as context for title detection and never become blocks.
///
/// The returned blocks carry placeholder numbers; callers renumber them.
pub fn segment(raw: &str, ids: &mut BlockIdGenerator) -> Result<Vec<Block>, EngineError> {
    let lines: Vec<&str> = raw.split('\n').collect();
    let blocks: Vec<Block> = lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return None;
            }
            let kind = if is_title(trimmed, index, &lines) {
                BlockKind::title()
            } else {
                BlockKind::paragraph()
            };
            Some(Block::new(ids.next_id(), trimmed, kind))
        })
        .collect();

    if blocks.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    Ok(blocks)
}
