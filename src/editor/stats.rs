use std::collections::HashSet;

use super::{Block, BlockId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total_blocks: usize,
    pub titles: usize,
    pub paragraphs: usize,
    pub characters: usize,
    pub words: usize,
    pub applied: usize,
    pub selected: usize,
    pub selected_characters: usize,
}

impl Statistics {
    pub fn collect(blocks: &[Block], selected: &HashSet<BlockId>) -> Self {
        let mut stats = Statistics {
            total_blocks: blocks.len(),
            ..Statistics::default()
        };
        for block in blocks {
            let chars = block.char_count();
            if block.is_title() {
                stats.titles += 1;
            } else {
                stats.paragraphs += 1;
            }
            stats.characters += chars;
            stats.words += block.word_count();
            if block.applied {
                stats.applied += 1;
            }
            if selected.contains(&block.id) {
                stats.selected += 1;
                stats.selected_characters += chars;
            }
        }
        stats
    }

    pub fn summary(&self) -> String {
        if self.total_blocks == 0 {
            return "No blocks created yet".to_string();
        }
        format!(
            "Blocks: {} | Titles: {} | Paragraphs: {} | Words: {} | Characters: {} | Applied: {}",
            self.total_blocks,
            self.titles,
            self.paragraphs,
            self.words,
            self.characters,
            self.applied
        )
    }

    pub fn selection_summary(&self) -> Option<String> {
        if self.selected == 0 {
            return None;
        }
        Some(format!(
            "Selected: {} paragraphs ({} chars)",
            self.selected, self.selected_characters
        ))
    }
}
