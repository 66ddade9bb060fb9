use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::editor::{Block, BlockEditor, BlockId, OutlineNode, ParagraphNode, Statistics};
use crate::theme::Theme;

const LABEL_COLUMN: usize = 14;
const CHILD_INDENT: &str = "  ";
const SELECTED_MARKER: &str = "● ";
const UNSELECTED_MARKER: &str = "  ";

/// Rendered rows, one per visible block or outline entry. Row `n` stands for
/// the `n`th id of `BlockEditor::visible_blocks` or [`outline_row_ids`].
#[derive(Debug, Default)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
}

impl RenderResult {
    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }
}

/// Renders the visible blocks, one row each: kind label, text preview and
/// character count.
pub fn render_block_list(
    editor: &BlockEditor,
    theme: &Theme,
    width: usize,
    preview_chars: usize,
    cursor: Option<usize>,
) -> RenderResult {
    let mut result = RenderResult::default();
    for (row, block) in editor.visible_blocks().enumerate() {
        let selected = editor.is_selected(block.id());
        let base = block_style(block, selected, theme);
        let mut builder = RowBuilder::new(width);

        builder.push(
            if selected { SELECTED_MARKER } else { UNSELECTED_MARKER },
            base,
        );
        builder.push(
            &pad_to(&block.kind().label(), LABEL_COLUMN),
            base.patch(theme.label_style()),
        );
        let text_style = if block.is_title() {
            base.patch(theme.title_style())
        } else {
            base
        };
        builder.push(&block.preview(preview_chars), text_style);
        builder.push(
            &format!("  ({})", block.char_count()),
            base.patch(theme.label_style()),
        );

        let line = builder.finish();
        result.lines.push(highlight_cursor(line, cursor == Some(row), theme));
    }
    result
}

/// Renders the outline. Children of collapsed titles are left out.
pub fn render_outline(
    nodes: &[OutlineNode],
    theme: &Theme,
    width: usize,
    cursor: Option<usize>,
) -> RenderResult {
    let mut result = RenderResult::default();
    for node in nodes {
        match node {
            OutlineNode::Title(title) => {
                let mut style = theme.title_style();
                if title.applied {
                    style = style.patch(theme.applied_style());
                }
                let mut builder = RowBuilder::new(width);
                builder.push(&title.label(), style);
                push_row(&mut result, builder.finish(), cursor, theme);

                if !title.collapsed {
                    for child in &title.children {
                        let line = paragraph_row(child, CHILD_INDENT, width, theme);
                        push_row(&mut result, line, cursor, theme);
                    }
                }
            }
            OutlineNode::Paragraph(paragraph) => {
                let line = paragraph_row(paragraph, "", width, theme);
                push_row(&mut result, line, cursor, theme);
            }
        }
    }
    result
}

/// Block ids in the same order as the rows produced by [`render_outline`].
pub fn outline_row_ids(nodes: &[OutlineNode]) -> Vec<BlockId> {
    let mut rows = Vec::new();
    for node in nodes {
        match node {
            OutlineNode::Title(title) => {
                rows.push(title.id);
                if !title.collapsed {
                    rows.extend(title.children.iter().map(|child| child.id));
                }
            }
            OutlineNode::Paragraph(paragraph) => rows.push(paragraph.id),
        }
    }
    rows
}

pub fn render_statistics(stats: &Statistics, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled(stats.summary(), theme.status_bar_style())];
    if let Some(selection) = stats.selection_summary() {
        spans.push(Span::styled(" | ", theme.status_bar_style()));
        spans.push(Span::styled(selection, theme.filename_style()));
    }
    Line::from(spans)
}

fn paragraph_row(node: &ParagraphNode, indent: &str, width: usize, theme: &Theme) -> Line<'static> {
    let mut style = Style::default();
    if node.applied {
        style = style.patch(theme.applied_style());
    }
    if node.selected {
        style = style.patch(theme.selected_style());
    }
    let mut builder = RowBuilder::new(width);
    builder.push(indent, Style::default());
    builder.push(
        if node.selected { SELECTED_MARKER } else { UNSELECTED_MARKER },
        style,
    );
    builder.push(&node.label(), style);
    builder.finish()
}

fn push_row(result: &mut RenderResult, line: Line<'static>, cursor: Option<usize>, theme: &Theme) {
    let row = result.lines.len();
    result.lines.push(highlight_cursor(line, cursor == Some(row), theme));
}

fn block_style(block: &Block, selected: bool, theme: &Theme) -> Style {
    let mut style = Style::default();
    if block.is_applied() {
        style = style.patch(theme.applied_style());
    }
    if selected {
        style = style.patch(theme.selected_style());
    }
    style
}

fn highlight_cursor(line: Line<'static>, active: bool, theme: &Theme) -> Line<'static> {
    if !active {
        return line;
    }
    let spans = line
        .spans
        .into_iter()
        .map(|span| Span::styled(span.content, span.style.patch(theme.cursor_style())))
        .collect::<Vec<_>>();
    Line::from(spans)
}

/// Collects styled segments for one row and stops at the row width.
struct RowBuilder {
    spans: Vec<Span<'static>>,
    width: usize,
    limit: usize,
}

impl RowBuilder {
    fn new(limit: usize) -> Self {
        Self {
            spans: Vec::new(),
            width: 0,
            limit: limit.max(1),
        }
    }

    fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() || self.width >= self.limit {
            return;
        }
        let mut fitted = String::new();
        for ch in text.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if self.width + ch_width > self.limit {
                self.width = self.limit;
                break;
            }
            fitted.push(ch);
            self.width += ch_width;
        }
        if !fitted.is_empty() {
            self.spans.push(Span::styled(fitted, style));
        }
    }

    fn finish(self) -> Line<'static> {
        Line::from(self.spans)
    }
}

fn pad_to(text: &str, width: usize) -> String {
    let mut padded = text.to_string();
    let current = visible_width(text);
    if current < width {
        padded.push_str(&" ".repeat(width - current));
    }
    padded
}

pub fn visible_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

pub fn line_width(line: &Line<'_>) -> usize {
    line.spans
        .iter()
        .map(|span| visible_width(span.content.as_ref()))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn editor() -> BlockEditor {
        BlockEditor::from_text("Lead in\n\n1. First\n\nalpha\nbeta\n\n2. Second\n\ngamma").unwrap()
    }

    #[test]
    fn block_list_rows_follow_visible_blocks() {
        let mut editor = editor();
        let first = editor.blocks()[1].id();
        editor.toggle_collapse(first);

        let render = render_block_list(&editor, &Theme::default(), 80, 50, None);
        assert_eq!(render.total_lines(), 4);
        assert_eq!(editor.visible_blocks().nth(1).map(Block::id), Some(first));
        assert!(line_text(&render.lines[1]).starts_with("  Title 1       1. First"));
        assert!(line_text(&render.lines[2]).contains("2. Second  (9)"));
    }

    #[test]
    fn block_list_marks_selected_paragraphs() {
        let mut editor = editor();
        let alpha = editor.blocks()[2].id();
        editor.toggle_select(alpha);

        let render = render_block_list(&editor, &Theme::default(), 80, 50, None);
        let row = editor
            .visible_blocks()
            .position(|block| block.id() == alpha)
            .unwrap();
        assert!(line_text(&render.lines[row]).starts_with("● Paragraph 2"));
    }

    #[test]
    fn rows_are_clipped_to_width() {
        let editor = BlockEditor::from_text("a fairly long paragraph of text").unwrap();
        let render = render_block_list(&editor, &Theme::default(), 20, 50, None);
        assert_eq!(line_width(&render.lines[0]), 20);
    }

    #[test]
    fn wide_characters_are_not_split_past_the_limit() {
        let editor = BlockEditor::from_text("漢字漢字漢字").unwrap();
        let render = render_block_list(&editor, &Theme::default(), 19, 50, None);
        assert!(line_width(&render.lines[0]) <= 19);
    }

    #[test]
    fn outline_hides_children_of_collapsed_titles() {
        let mut editor = editor();
        let render = render_outline(&editor.outline(), &Theme::default(), 60, None);
        assert_eq!(render.total_lines(), 6);

        let second = editor.blocks()[4].id();
        editor.toggle_collapse(second);
        let render = render_outline(&editor.outline(), &Theme::default(), 60, None);
        assert_eq!(render.total_lines(), 5);
        assert_eq!(line_text(&render.lines[4]), "▶ Title 2: 2. Second");
        assert_eq!(line_text(&render.lines[2]), "    Paragraph 2 (5 characters)");
    }

    #[test]
    fn outline_row_ids_match_rendered_rows() {
        let mut editor = editor();
        editor.collapse_all();
        let outline = editor.outline();
        let render = render_outline(&outline, &Theme::default(), 60, None);
        let ids = outline_row_ids(&outline);
        assert_eq!(ids.len(), render.total_lines());
        assert_eq!(
            ids,
            vec![
                editor.blocks()[0].id(),
                editor.blocks()[1].id(),
                editor.blocks()[4].id(),
            ]
        );
        assert_eq!(line_text(&render.lines[2]), "▶ Title 2: 2. Second");
    }

    #[test]
    fn cursor_row_is_highlighted() {
        let editor = editor();
        let theme = Theme::default();
        let render = render_outline(&editor.outline(), &theme, 60, Some(1));
        assert!(
            render.lines[1]
                .spans
                .iter()
                .all(|span| span.style.bg == Some(theme.cursor_bg))
        );
        assert!(
            render.lines[0]
                .spans
                .iter()
                .all(|span| span.style.bg != Some(theme.cursor_bg))
        );
    }

    #[test]
    fn statistics_line_includes_selection() {
        let mut editor = editor();
        let gamma = editor.blocks()[5].id();
        editor.toggle_select(gamma);
        let line = render_statistics(&editor.stats(), &Theme::default());
        let text = line_text(&line);
        assert!(text.starts_with("Blocks: 6 | Titles: 2 | Paragraphs: 4"));
        assert!(text.ends_with("Selected: 1 paragraphs (5 chars)"));
    }
}
