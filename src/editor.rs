use std::{collections::HashSet, fmt};

use tracing::{debug, trace};

use crate::error::EngineError;

mod classify;
mod numbering;
mod outline;
mod segment;
mod stats;
mod visibility;

pub use classify::is_title;
pub use numbering::renumber;
pub use outline::{OutlineNode, ParagraphNode, TitleNode, project};
pub use segment::segment;
pub use stats::Statistics;
pub use visibility::apply_collapse;

const SAVE_SEPARATOR: &str = "\n\n";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

impl BlockId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block-{}", self.0)
    }
}

/// Mints block ids for one editing session. Ids are never handed out twice,
/// even after the document is cleared or re-segmented.
#[derive(Clone, Debug)]
pub struct BlockIdGenerator {
    next: u64,
}

impl BlockIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> BlockId {
        let id = BlockId(self.next);
        self.next += 1;
        id
    }
}

impl Default for BlockIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// The two block kinds. The variant is fixed when a block is created; the
/// number it carries is derived state owned by [`renumber`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Title { title_number: usize },
    Paragraph { number: usize },
}

impl BlockKind {
    pub(crate) fn title() -> Self {
        BlockKind::Title { title_number: 0 }
    }

    pub(crate) fn paragraph() -> Self {
        BlockKind::Paragraph { number: 0 }
    }

    pub fn is_title(&self) -> bool {
        matches!(self, BlockKind::Title { .. })
    }

    pub fn label(&self) -> String {
        match self {
            BlockKind::Title { title_number } => format!("Title {title_number}"),
            BlockKind::Paragraph { number } => format!("Paragraph {number}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    text: String,
    kind: BlockKind,
    visible: bool,
    applied: bool,
}

impl Block {
    pub(crate) fn new(id: BlockId, text: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id,
            text: text.into(),
            kind,
            visible: true,
            applied: false,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn is_title(&self) -> bool {
        self.kind.is_title()
    }

    pub fn number(&self) -> Option<usize> {
        match self.kind {
            BlockKind::Paragraph { number } => Some(number),
            BlockKind::Title { .. } => None,
        }
    }

    pub fn title_number(&self) -> Option<usize> {
        match self.kind {
            BlockKind::Title { title_number } => Some(title_number),
            BlockKind::Paragraph { .. } => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// First `max_chars` characters of the text, with `...` appended when the
    /// text was cut.
    pub fn preview(&self, max_chars: usize) -> String {
        truncate_chars(&self.text, max_chars)
    }
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentSummary {
    pub titles: usize,
    pub paragraphs: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyScope {
    /// Everything applied sits before the first title.
    Intro,
    Body,
}

impl ApplyScope {
    pub fn label(&self) -> &'static str {
        match self {
            ApplyScope::Intro => "intro",
            ApplyScope::Body => "paragraphs",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplyResult {
    pub payload: String,
    pub count: usize,
    pub scope: ApplyScope,
}

/// One open document: the ordered blocks plus the collapsed and selected
/// sets. Every structural mutation ends by renumbering and recomputing
/// visibility over the whole sequence.
#[derive(Clone, Debug, Default)]
pub struct BlockEditor {
    blocks: Vec<Block>,
    collapsed: HashSet<BlockId>,
    selected: HashSet<BlockId>,
    ids: BlockIdGenerator,
}

impl BlockEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(raw: &str) -> Result<Self, EngineError> {
        let mut editor = Self::new();
        editor.load(raw)?;
        Ok(editor)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn visible_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|block| block.visible)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn position_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| block.id == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn is_collapsed(&self, id: BlockId) -> bool {
        self.collapsed.contains(&id)
    }

    pub fn is_selected(&self, id: BlockId) -> bool {
        self.selected.contains(&id)
    }

    pub fn collapsed_ids(&self) -> &HashSet<BlockId> {
        &self.collapsed
    }

    pub fn selected_ids(&self) -> &HashSet<BlockId> {
        &self.selected
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Replaces the document with the segmentation of `raw`. On empty input
    /// the current document is kept as is.
    pub fn load(&mut self, raw: &str) -> Result<SegmentSummary, EngineError> {
        let blocks = segment(raw, &mut self.ids)?;
        self.blocks = blocks;
        self.collapsed.clear();
        self.selected.clear();
        self.restructure();

        let titles = self.blocks.iter().filter(|block| block.is_title()).count();
        let summary = SegmentSummary {
            titles,
            paragraphs: self.blocks.len() - titles,
        };
        debug!(
            titles = summary.titles,
            paragraphs = summary.paragraphs,
            "document segmented"
        );
        Ok(summary)
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.collapsed.clear();
        self.selected.clear();
        self.restructure();
        debug!("document cleared");
    }

    pub fn edit_block(&mut self, id: BlockId, text: impl Into<String>) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|block| block.id == id) else {
            trace!(%id, "edit ignored for unknown block");
            return false;
        };
        block.text = text.into();
        block.applied = false;
        true
    }

    pub fn add_empty_paragraph(&mut self) -> BlockId {
        let id = self.ids.next_id();
        self.blocks.push(Block::new(id, "", BlockKind::paragraph()));
        self.restructure();
        debug!(%id, blocks = self.blocks.len(), "empty paragraph appended");
        id
    }

    /// Removes a block. Paragraphs owned by a deleted title fall under
    /// whichever title now precedes them.
    pub fn delete_block(&mut self, id: BlockId) -> bool {
        let Some(idx) = self.position_of(id) else {
            trace!(%id, "delete ignored for unknown block");
            return false;
        };
        self.blocks.remove(idx);
        self.collapsed.remove(&id);
        self.selected.remove(&id);
        self.restructure();
        debug!(%id, blocks = self.blocks.len(), "block deleted");
        true
    }

    pub fn toggle_collapse(&mut self, id: BlockId) -> bool {
        let Some(kind) = self.block(id).map(Block::kind) else {
            trace!(%id, "collapse ignored for unknown block");
            return false;
        };
        match kind {
            BlockKind::Title { .. } => {
                if !self.collapsed.remove(&id) {
                    self.collapsed.insert(id);
                }
                apply_collapse(&mut self.blocks, &self.collapsed);
                debug!(%id, collapsed = self.collapsed.contains(&id), "title toggled");
                true
            }
            BlockKind::Paragraph { .. } => {
                trace!(%id, "collapse ignored for paragraph");
                false
            }
        }
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
        apply_collapse(&mut self.blocks, &self.collapsed);
    }

    pub fn collapse_all(&mut self) {
        self.collapsed.extend(
            self.blocks
                .iter()
                .filter(|block| block.is_title())
                .map(|block| block.id),
        );
        apply_collapse(&mut self.blocks, &self.collapsed);
    }

    pub fn toggle_select(&mut self, id: BlockId) -> bool {
        let Some(kind) = self.block(id).map(Block::kind) else {
            trace!(%id, "select ignored for unknown block");
            return false;
        };
        match kind {
            BlockKind::Paragraph { .. } => {
                if !self.selected.remove(&id) {
                    self.selected.insert(id);
                }
                true
            }
            BlockKind::Title { .. } => {
                trace!(%id, "select ignored for title");
                false
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Marks every selected paragraph as applied and returns their texts in
    /// document order, joined by a blank line.
    pub fn apply(&mut self) -> Result<ApplyResult, EngineError> {
        if self.selected.is_empty() {
            return Err(EngineError::NothingSelected);
        }

        let first_title = self.blocks.iter().position(|block| block.is_title());
        let mut texts = Vec::with_capacity(self.selected.len());
        let mut has_intro = first_title.is_none();
        for (idx, block) in self.blocks.iter_mut().enumerate() {
            if !self.selected.contains(&block.id) {
                continue;
            }
            block.applied = true;
            texts.push(block.text.clone());
            if first_title.is_some_and(|title_idx| idx < title_idx) {
                has_intro = true;
            }
        }
        let scope = if has_intro {
            ApplyScope::Intro
        } else {
            ApplyScope::Body
        };

        let result = ApplyResult {
            payload: texts.join(SAVE_SEPARATOR),
            count: texts.len(),
            scope,
        };
        self.selected.clear();
        debug!(count = result.count, scope = scope.label(), "selection applied");
        Ok(result)
    }

    pub fn outline(&self) -> Vec<OutlineNode> {
        project(&self.blocks, &self.collapsed, &self.selected)
    }

    pub fn stats(&self) -> Statistics {
        Statistics::collect(&self.blocks, &self.selected)
    }

    pub fn saveable_texts(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .map(|block| block.text.as_str())
            .filter(|text| !text.trim().is_empty())
    }

    pub fn save_text(&self) -> String {
        self.saveable_texts().collect::<Vec<_>>().join(SAVE_SEPARATOR)
    }

    fn restructure(&mut self) {
        renumber(&mut self.blocks);
        apply_collapse(&mut self.blocks, &self.collapsed);
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod editor_tests;

#[cfg(test)]
#[path = "editor/classify_tests.rs"]
mod classify_tests;
