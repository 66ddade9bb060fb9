use std::{
    fs, io,
    path::Path,
    sync::Mutex,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use blocks_tui::config::Config;
use blocks_tui::editor::{ApplyResult, BlockEditor, BlockId, BlockKind};
use blocks_tui::prompt::LinePrompt;
use blocks_tui::render::{
    RenderResult, outline_row_ids, render_block_list, render_outline, render_statistics,
};
use blocks_tui::theme::Theme;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let (editor, initial_status) = load_document(&config.path)?;
    let mut app = App::new(editor, config, initial_status);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(Config::log_directive()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    info!("blocks v{} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn load_document(path: &Path) -> Result<(BlockEditor, Option<String>)> {
    let mut editor = BlockEditor::new();
    if !path.exists() {
        return Ok((editor, Some("New document".to_string())));
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let status = match editor.load(&content) {
        Ok(summary) => format!(
            "Created {} titles and {} paragraphs",
            summary.titles, summary.paragraphs
        ),
        Err(err) => format!("{err}. Starting with empty document."),
    };
    Ok((editor, Some(status)))
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    let mut needs_redraw = true;

    while !app.should_quit() {
        if needs_redraw {
            terminal
                .draw(|frame| app.draw(frame))
                .context("failed to draw frame")?;
            needs_redraw = false;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt)?;
            needs_redraw = true;
        }

        if last_tick.elapsed() >= tick_rate {
            let had_message_before = app.has_status_message();
            app.on_tick();
            last_tick = Instant::now();
            if had_message_before && !app.has_status_message() {
                needs_redraw = true;
            }
        }
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuAction {
    Edit,
    Delete,
    ToggleCollapse,
    ToggleSelect,
    AddParagraph,
    Apply,
    ClearSelection,
    ExpandAll,
    CollapseAll,
    ClearAll,
}

#[derive(Clone, Copy)]
struct MenuShortcut {
    key: char,
    requires_shift: bool,
}

impl MenuShortcut {
    const fn new(key: char) -> Self {
        Self {
            key,
            requires_shift: false,
        }
    }

    const fn with_shift(key: char) -> Self {
        Self {
            key,
            requires_shift: true,
        }
    }

    fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char(ch) if ch == self.key => {
                if self.requires_shift {
                    modifiers == KeyModifiers::SHIFT
                } else {
                    modifiers.is_empty()
                }
            }
            _ => false,
        }
    }
}

#[derive(Clone, Copy)]
struct MenuItem {
    label: &'static str,
    action: Option<MenuAction>,
    shortcut: Option<MenuShortcut>,
}

impl MenuItem {
    fn with_shortcut(
        label: &'static str,
        action: MenuAction,
        shortcut: MenuShortcut,
        enabled: bool,
    ) -> Self {
        Self {
            label,
            action: enabled.then_some(action),
            shortcut: Some(shortcut),
        }
    }

    fn is_enabled(&self) -> bool {
        self.action.is_some()
    }
}

enum MenuEntry {
    Section(&'static str),
    Separator,
    Item(MenuItem),
}

struct ContextMenuState {
    entries: Vec<MenuEntry>,
    selected_index: usize,
}

impl ContextMenuState {
    fn new(entries: Vec<MenuEntry>) -> Self {
        let selected_index = entries
            .iter()
            .enumerate()
            .find(|(_, entry)| matches!(entry, MenuEntry::Item(item) if item.is_enabled()))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        Self {
            entries,
            selected_index,
        }
    }

    fn move_selection(&mut self, delta: i32) {
        if self.entries.is_empty() {
            return;
        }

        let len = self.entries.len() as i32;
        let mut idx = self.selected_index as i32;

        for _ in 0..len {
            idx = (idx + delta).rem_euclid(len);
            if matches!(self.entries[idx as usize], MenuEntry::Item(_)) {
                self.selected_index = idx as usize;
                break;
            }
        }
    }

    fn current_action(&self) -> Option<MenuAction> {
        match self.entries.get(self.selected_index) {
            Some(MenuEntry::Item(item)) => item.action,
            _ => None,
        }
    }

    fn shortcut_action(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> (bool, Option<MenuAction>) {
        for (idx, entry) in self.entries.iter().enumerate() {
            if let MenuEntry::Item(item) = entry
                && let Some(shortcut) = item.shortcut
                && shortcut.matches(code, modifiers)
            {
                self.selected_index = idx;
                return (true, item.action);
            }
        }
        (false, None)
    }
}

fn build_context_menu_entries(
    current: Option<BlockKind>,
    has_selection: bool,
    has_blocks: bool,
) -> Vec<MenuEntry> {
    let is_title = current.is_some_and(|kind| kind.is_title());
    let is_paragraph = current.is_some_and(|kind| !kind.is_title());

    vec![
        MenuEntry::Section("Block"),
        MenuEntry::Item(MenuItem::with_shortcut(
            "Edit",
            MenuAction::Edit,
            MenuShortcut::new('e'),
            current.is_some(),
        )),
        MenuEntry::Item(MenuItem::with_shortcut(
            "Delete",
            MenuAction::Delete,
            MenuShortcut::new('d'),
            current.is_some(),
        )),
        MenuEntry::Item(MenuItem::with_shortcut(
            "Toggle Collapse",
            MenuAction::ToggleCollapse,
            MenuShortcut::new('t'),
            is_title,
        )),
        MenuEntry::Item(MenuItem::with_shortcut(
            "Select",
            MenuAction::ToggleSelect,
            MenuShortcut::new('s'),
            is_paragraph,
        )),
        MenuEntry::Item(MenuItem::with_shortcut(
            "Add Empty Paragraph",
            MenuAction::AddParagraph,
            MenuShortcut::new('a'),
            true,
        )),
        MenuEntry::Separator,
        MenuEntry::Section("Selection"),
        MenuEntry::Item(MenuItem::with_shortcut(
            "Apply Selected",
            MenuAction::Apply,
            MenuShortcut::with_shift('A'),
            has_selection,
        )),
        MenuEntry::Item(MenuItem::with_shortcut(
            "Clear Selection",
            MenuAction::ClearSelection,
            MenuShortcut::new('c'),
            has_selection,
        )),
        MenuEntry::Separator,
        MenuEntry::Section("View"),
        MenuEntry::Item(MenuItem::with_shortcut(
            "Expand All",
            MenuAction::ExpandAll,
            MenuShortcut::with_shift('E'),
            has_blocks,
        )),
        MenuEntry::Item(MenuItem::with_shortcut(
            "Collapse All",
            MenuAction::CollapseAll,
            MenuShortcut::with_shift('C'),
            has_blocks,
        )),
        MenuEntry::Item(MenuItem::with_shortcut(
            "Clear All",
            MenuAction::ClearAll,
            MenuShortcut::with_shift('X'),
            has_blocks,
        )),
    ]
}

fn is_context_menu_shortcut(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc => modifiers.is_empty(),
        KeyCode::Char('p') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Focus {
    Blocks,
    Outline,
}

enum Confirm {
    Delete(BlockId),
    ClearAll,
}

enum Mode {
    Normal,
    Menu(ContextMenuState),
    Edit { id: BlockId, prompt: LinePrompt },
    Confirm(Confirm),
    Applied(ApplyResult),
}

struct App {
    editor: BlockEditor,
    config: Config,
    theme: Theme,
    mode: Mode,
    focus: Focus,
    block_cursor: usize,
    outline_cursor: usize,
    block_scroll: usize,
    outline_scroll: usize,
    should_quit: bool,
    dirty: bool,
    status_message: Option<(String, Instant)>,
}

impl App {
    fn new(editor: BlockEditor, config: Config, initial_status: Option<String>) -> Self {
        Self {
            editor,
            config,
            theme: Theme::default(),
            mode: Mode::Normal,
            focus: Focus::Blocks,
            block_cursor: 0,
            outline_cursor: 0,
            block_scroll: 0,
            outline_scroll: 0,
            should_quit: false,
            dirty: false,
            status_message: initial_status.map(|msg| (msg, Instant::now())),
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn has_status_message(&self) -> bool {
        self.status_message.is_some()
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }

        let status_height = if area.height > 3 { 3 } else { 1 };
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(status_height)])
            .split(area);
        let content_area = vertical[0];
        let status_area = vertical[1];

        let outline_width = self.config.outline_width.min(content_area.width / 2);
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(outline_width)])
            .split(content_area);
        let blocks_area = horizontal[0];
        let outline_area = horizontal[1];

        self.clamp_cursors();

        let inner_width = |rect: Rect| rect.width.saturating_sub(2).max(1) as usize;
        let inner_height = |rect: Rect| rect.height.saturating_sub(2).max(1) as usize;

        let block_render = render_block_list(
            &self.editor,
            &self.theme,
            inner_width(blocks_area),
            self.config.preview_width,
            (self.focus == Focus::Blocks).then_some(self.block_cursor),
        );
        self.block_scroll = adjust_scroll(
            self.block_scroll,
            self.block_cursor,
            &block_render,
            inner_height(blocks_area),
        );
        let outline_render = render_outline(
            &self.editor.outline(),
            &self.theme,
            inner_width(outline_area),
            (self.focus == Focus::Outline).then_some(self.outline_cursor),
        );
        self.outline_scroll = adjust_scroll(
            self.outline_scroll,
            self.outline_cursor,
            &outline_render,
            inner_height(outline_area),
        );

        self.render_panel(
            frame,
            blocks_area,
            block_render,
            "Editable Blocks",
            self.block_scroll,
            self.focus == Focus::Blocks,
        );
        self.render_panel(
            frame,
            outline_area,
            outline_render,
            "Outline",
            self.outline_scroll,
            self.focus == Focus::Outline,
        );

        let status_widget = Paragraph::new(Text::from(self.status_lines()))
            .style(self.theme.status_bar_style())
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(status_widget, status_area);

        match &self.mode {
            Mode::Normal => {}
            Mode::Menu(menu) => self.render_context_menu(frame, area, menu),
            Mode::Edit { id, prompt } => self.render_edit_prompt(frame, area, *id, prompt),
            Mode::Confirm(confirm) => self.render_confirm(frame, area, confirm),
            Mode::Applied(result) => self.render_applied(frame, area, result),
        }
    }

    fn render_panel(
        &self,
        frame: &mut Frame,
        area: Rect,
        render: RenderResult,
        title: &'static str,
        scroll: usize,
        focused: bool,
    ) {
        let panel = Paragraph::new(Text::from(render.lines))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(self.theme.panel_border_style(focused)),
            )
            .scroll((scroll as u16, 0));
        frame.render_widget(panel, area);
    }

    fn render_context_menu(&self, frame: &mut Frame, area: Rect, menu: &ContextMenuState) {
        if area.width < 3 || area.height < 3 {
            return;
        }

        let max_label_width = menu
            .entries
            .iter()
            .map(|entry| match entry {
                MenuEntry::Item(item) => item.label.chars().count() + 3,
                MenuEntry::Section(title) => title.chars().count(),
                MenuEntry::Separator => 0,
            })
            .max()
            .unwrap_or(0) as u16;
        let width = (max_label_width + 4).min(area.width);
        let height = (menu.entries.len() as u16 + 2).min(area.height);
        let popup_area = centered(area, width, height);

        frame.render_widget(Clear, popup_area);

        let separator_width = popup_area.width.saturating_sub(4).max(4) as usize;
        let label_width = max_label_width.saturating_sub(3) as usize;
        let items = menu
            .entries
            .iter()
            .map(|entry| match entry {
                MenuEntry::Section(title) => ListItem::new(Line::from(Span::styled(
                    *title,
                    self.theme.menu_style().add_modifier(Modifier::BOLD),
                ))),
                MenuEntry::Separator => ListItem::new(Line::from(Span::styled(
                    "─".repeat(separator_width),
                    self.theme.menu_disabled_style(),
                ))),
                MenuEntry::Item(item) => {
                    let shortcut = item.shortcut.map(|s| s.key).unwrap_or(' ');
                    let content = format!("{:<label_width$}  {shortcut}", item.label);
                    let style = if item.is_enabled() {
                        self.theme.menu_style()
                    } else {
                        self.theme.menu_disabled_style()
                    };
                    ListItem::new(Line::from(Span::styled(content, style)))
                }
            })
            .collect::<Vec<_>>();

        let mut state = ListState::default();
        state.select(Some(menu.selected_index));

        let list = List::new(items)
            .highlight_style(self.theme.menu_selected_style())
            .style(self.theme.menu_style())
            .block(
                Block::default()
                    .title("Context Menu")
                    .borders(Borders::ALL)
                    .style(self.theme.menu_style()),
            );

        frame.render_stateful_widget(list, popup_area, &mut state);
    }

    fn render_edit_prompt(&self, frame: &mut Frame, area: Rect, id: BlockId, prompt: &LinePrompt) {
        let label = self
            .editor
            .block(id)
            .map(|block| block.kind().label())
            .unwrap_or_else(|| "Block".to_string());
        let width = area.width.saturating_sub(4).max(10).min(area.width);
        let popup_area = centered(area, width, 3.min(area.height));
        let inner_width = popup_area.width.saturating_sub(2) as usize;

        let column = prompt.cursor_column();
        let offset = column.saturating_sub(inner_width.saturating_sub(1));

        frame.render_widget(Clear, popup_area);
        let input = Paragraph::new(prompt.text().to_string())
            .style(self.theme.menu_style())
            .scroll((0, offset as u16))
            .block(
                Block::default()
                    .title(format!("Edit {label} (Enter save, Esc cancel)"))
                    .borders(Borders::ALL),
            );
        frame.render_widget(input, popup_area);

        if popup_area.width > 2 && popup_area.height > 2 {
            let cursor_x = popup_area.x + 1 + (column - offset) as u16;
            frame.set_cursor_position(Position::new(cursor_x, popup_area.y + 1));
        }
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect, confirm: &Confirm) {
        let question = match confirm {
            Confirm::Delete(_) => "Are you sure you want to delete this block? (y/n)",
            Confirm::ClearAll => "Are you sure you want to clear all content? (y/n)",
        };
        let width = (question.chars().count() as u16 + 4).min(area.width);
        let popup_area = centered(area, width, 3.min(area.height));
        frame.render_widget(Clear, popup_area);
        let widget = Paragraph::new(question)
            .style(self.theme.menu_style())
            .block(Block::default().title("Confirm").borders(Borders::ALL));
        frame.render_widget(widget, popup_area);
    }

    fn render_applied(&self, frame: &mut Frame, area: Rect, result: &ApplyResult) {
        let width = area.width.saturating_sub(8).max(10).min(area.width);
        let height = area.height.saturating_sub(4).max(3).min(area.height);
        let popup_area = centered(area, width, height);
        frame.render_widget(Clear, popup_area);
        let widget = Paragraph::new(result.payload.clone())
            .wrap(Wrap { trim: false })
            .style(self.theme.menu_style())
            .block(
                Block::default()
                    .title(format!(
                        "Applied {} paragraphs ({}), Esc to close",
                        result.count,
                        result.scope.label()
                    ))
                    .borders(Borders::ALL),
            );
        frame.render_widget(widget, popup_area);
    }

    fn status_lines(&mut self) -> Vec<Line<'static>> {
        self.prune_status_message();
        let stats_line = render_statistics(&self.editor.stats(), &self.theme);

        let status = if let Some((message, _)) = &self.status_message {
            Line::from(Span::styled(message.clone(), self.theme.status_bar_style()))
        } else {
            let marker = if self.dirty { "*" } else { "" };
            Line::from(vec![
                Span::styled(
                    format!("{}{}", self.config.path.display(), marker),
                    self.theme.filename_style(),
                ),
                Span::styled(
                    " | Tab panel | Space collapse/select | Enter edit | A apply | Esc menu | ^S save | ^Q quit",
                    self.theme.status_bar_style(),
                ),
            ])
        };
        vec![stats_line, status]
    }

    fn prune_status_message(&mut self) {
        if let Some((_, instant)) = &self.status_message
            && instant.elapsed() > STATUS_TIMEOUT
        {
            self.status_message = None;
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn on_tick(&mut self) {
        self.prune_status_message();
    }

    fn block_rows(&self) -> Vec<BlockId> {
        self.editor.visible_blocks().map(|block| block.id()).collect()
    }

    fn outline_rows(&self) -> Vec<BlockId> {
        outline_row_ids(&self.editor.outline())
    }

    fn current_id(&self) -> Option<BlockId> {
        match self.focus {
            Focus::Blocks => self.block_rows().get(self.block_cursor).copied(),
            Focus::Outline => self.outline_rows().get(self.outline_cursor).copied(),
        }
    }

    fn clamp_cursors(&mut self) {
        let block_rows = self.block_rows().len();
        let outline_rows = self.outline_rows().len();
        self.block_cursor = self.block_cursor.min(block_rows.saturating_sub(1));
        self.outline_cursor = self.outline_cursor.min(outline_rows.saturating_sub(1));
    }

    fn move_cursor(&mut self, delta: isize) {
        let rows = match self.focus {
            Focus::Blocks => self.block_rows().len(),
            Focus::Outline => self.outline_rows().len(),
        };
        if rows == 0 {
            return;
        }
        let cursor = match self.focus {
            Focus::Blocks => &mut self.block_cursor,
            Focus::Outline => &mut self.outline_cursor,
        };
        *cursor = cursor.saturating_add_signed(delta).min(rows - 1);
    }

    fn focus_block(&mut self, id: BlockId) {
        if let Some(row) = self.block_rows().iter().position(|row| *row == id) {
            self.block_cursor = row;
        }
        if let Some(row) = self.outline_rows().iter().position(|row| *row == id) {
            self.outline_cursor = row;
        }
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return Ok(());
        };

        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.handle_normal_key(code, modifiers)?,
            Mode::Menu(menu) => self.handle_menu_key(menu, code, modifiers)?,
            Mode::Edit { id, prompt } => self.handle_edit_key(id, prompt, code),
            Mode::Confirm(confirm) => self.handle_confirm_key(confirm, code),
            Mode::Applied(result) => {
                if !matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.mode = Mode::Applied(result);
                }
            }
        }
        self.clamp_cursors();
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        if is_context_menu_shortcut(code, modifiers) {
            self.open_context_menu();
            return Ok(());
        }

        match (code, modifiers) {
            (KeyCode::Char('q'), m) | (KeyCode::Char('c'), m)
                if m.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
            }
            (KeyCode::Char('s'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.save()?;
            }
            (KeyCode::Char('o'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.reload();
            }
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
                self.focus = match self.focus {
                    Focus::Blocks => Focus::Outline,
                    Focus::Outline => Focus::Blocks,
                };
            }
            (KeyCode::Up, _) => self.move_cursor(-1),
            (KeyCode::Down, _) => self.move_cursor(1),
            (KeyCode::PageUp, _) => self.move_cursor(-10),
            (KeyCode::PageDown, _) => self.move_cursor(10),
            (KeyCode::Home, _) => self.move_cursor(isize::MIN),
            (KeyCode::End, _) => self.move_cursor(isize::MAX),
            (KeyCode::Enter, _) if self.focus == Focus::Outline => self.jump_to_block(),
            (KeyCode::Enter, _) | (KeyCode::Char('e'), _) => {
                self.execute_menu_action(MenuAction::Edit);
            }
            (KeyCode::Char(' '), _) => self.toggle_current(),
            (KeyCode::Char('a'), _) => self.execute_menu_action(MenuAction::AddParagraph),
            (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => {
                self.execute_menu_action(MenuAction::Delete);
            }
            (KeyCode::Char('A'), _) => self.execute_menu_action(MenuAction::Apply),
            (KeyCode::Char('c'), _) => self.execute_menu_action(MenuAction::ClearSelection),
            (KeyCode::Char('E'), _) => self.execute_menu_action(MenuAction::ExpandAll),
            (KeyCode::Char('C'), _) => self.execute_menu_action(MenuAction::CollapseAll),
            (KeyCode::Char('X'), _) => self.execute_menu_action(MenuAction::ClearAll),
            _ => {}
        }
        Ok(())
    }

    fn open_context_menu(&mut self) {
        let current = self
            .current_id()
            .and_then(|id| self.editor.block(id))
            .map(|block| block.kind());
        let entries = build_context_menu_entries(
            current,
            self.editor.has_selection(),
            !self.editor.is_empty(),
        );
        self.mode = Mode::Menu(ContextMenuState::new(entries));
    }

    fn handle_menu_key(
        &mut self,
        mut menu: ContextMenuState,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> Result<()> {
        match code {
            KeyCode::Esc => {}
            KeyCode::Char('p') if modifiers.contains(KeyModifiers::CONTROL) => {}
            KeyCode::Up => {
                menu.move_selection(-1);
                self.mode = Mode::Menu(menu);
            }
            KeyCode::Down => {
                menu.move_selection(1);
                self.mode = Mode::Menu(menu);
            }
            KeyCode::Enter => match menu.current_action() {
                Some(action) => self.execute_menu_action(action),
                None => self.mode = Mode::Menu(menu),
            },
            KeyCode::Char(_) => match menu.shortcut_action(code, modifiers) {
                (true, Some(action)) => self.execute_menu_action(action),
                _ => self.mode = Mode::Menu(menu),
            },
            _ => self.mode = Mode::Menu(menu),
        }
        Ok(())
    }

    fn execute_menu_action(&mut self, action: MenuAction) {
        let current = self.current_id();
        match action {
            MenuAction::Edit => {
                if let Some(block) = current.and_then(|id| self.editor.block(id)) {
                    self.mode = Mode::Edit {
                        id: block.id(),
                        prompt: LinePrompt::new(block.text()),
                    };
                }
            }
            MenuAction::Delete => {
                if let Some(id) = current {
                    self.mode = Mode::Confirm(Confirm::Delete(id));
                }
            }
            MenuAction::ToggleCollapse => {
                if let Some(id) = current {
                    self.editor.toggle_collapse(id);
                    self.focus_block(id);
                }
            }
            MenuAction::ToggleSelect => {
                if let Some(id) = current {
                    self.editor.toggle_select(id);
                }
            }
            MenuAction::AddParagraph => {
                let id = self.editor.add_empty_paragraph();
                self.mark_dirty();
                self.focus_block(id);
                self.set_status("Empty paragraph added");
            }
            MenuAction::Apply => self.apply_selection(),
            MenuAction::ClearSelection => self.editor.clear_selection(),
            MenuAction::ExpandAll => {
                self.editor.expand_all();
                self.set_status("All sections expanded");
            }
            MenuAction::CollapseAll => {
                self.editor.collapse_all();
                self.set_status("All sections collapsed");
            }
            MenuAction::ClearAll => {
                if !self.editor.is_empty() {
                    self.mode = Mode::Confirm(Confirm::ClearAll);
                }
            }
        }
    }

    fn toggle_current(&mut self) {
        let Some(kind) = self
            .current_id()
            .and_then(|id| self.editor.block(id))
            .map(|block| block.kind())
        else {
            return;
        };
        match kind {
            BlockKind::Title { .. } => self.execute_menu_action(MenuAction::ToggleCollapse),
            BlockKind::Paragraph { .. } => self.execute_menu_action(MenuAction::ToggleSelect),
        }
    }

    fn jump_to_block(&mut self) {
        let Some(id) = self.current_id() else {
            return;
        };
        match self.block_rows().iter().position(|row| *row == id) {
            Some(row) => {
                self.block_cursor = row;
                self.focus = Focus::Blocks;
            }
            None => self.set_status("Block is inside a collapsed section"),
        }
    }

    fn apply_selection(&mut self) {
        match self.editor.apply() {
            Ok(result) => {
                info!(count = result.count, "applied selection");
                self.set_status(format!("{} paragraphs marked as applied", result.count));
                self.mode = Mode::Applied(result);
            }
            Err(err) => self.set_status(err.to_string()),
        }
    }

    fn handle_edit_key(&mut self, id: BlockId, mut prompt: LinePrompt, code: KeyCode) {
        match code {
            KeyCode::Esc => return,
            KeyCode::Enter => {
                if self.editor.edit_block(id, prompt.into_text()) {
                    self.mark_dirty();
                } else {
                    self.set_status("Block no longer exists");
                }
                return;
            }
            KeyCode::Backspace => {
                prompt.backspace();
            }
            KeyCode::Delete => {
                prompt.delete();
            }
            KeyCode::Left => {
                prompt.move_left();
            }
            KeyCode::Right => {
                prompt.move_right();
            }
            KeyCode::Home => prompt.move_to_start(),
            KeyCode::End => prompt.move_to_end(),
            KeyCode::Char(ch) => {
                prompt.insert_char(ch);
            }
            _ => {}
        }
        self.mode = Mode::Edit { id, prompt };
    }

    fn handle_confirm_key(&mut self, confirm: Confirm, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => match confirm {
                Confirm::Delete(id) => {
                    if self.editor.delete_block(id) {
                        self.mark_dirty();
                    }
                }
                Confirm::ClearAll => {
                    self.editor.clear();
                    self.mark_dirty();
                    self.set_status("All content cleared");
                }
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
            _ => self.mode = Mode::Confirm(confirm),
        }
    }

    /// Reads the file again. Read failures end up in the status bar so
    /// unsaved edits survive them.
    fn reload(&mut self) {
        let path = self.config.path.clone();
        if !path.exists() {
            self.set_status(format!("{} does not exist yet", path.display()));
            return;
        }
        let content = match fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))
        {
            Ok(content) => content,
            Err(err) => {
                warn!("reload failed: {err:#}");
                self.set_status(format!("{err:#}"));
                return;
            }
        };
        match self.editor.load(&content) {
            Ok(summary) => {
                self.dirty = false;
                self.block_cursor = 0;
                self.outline_cursor = 0;
                self.set_status(format!(
                    "Created {} titles and {} paragraphs",
                    summary.titles, summary.paragraphs
                ));
            }
            Err(err) => {
                warn!(path = %path.display(), "reload found nothing to segment");
                self.set_status(err.to_string());
            }
        }
    }

    fn save(&mut self) -> Result<()> {
        if self.editor.is_empty() {
            self.set_status("No paragraphs to save");
            return Ok(());
        }
        let contents = self.editor.save_text();
        fs::write(&self.config.path, contents)
            .with_context(|| format!("failed to write {}", self.config.path.display()))?;
        debug!(path = %self.config.path.display(), "document saved");

        self.dirty = false;
        self.set_status("Saved");
        Ok(())
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

fn adjust_scroll(scroll: usize, cursor: usize, render: &RenderResult, viewport: usize) -> usize {
    let viewport = viewport.max(1);
    let max_scroll = render.total_lines().saturating_sub(viewport);
    let mut scroll = scroll.min(max_scroll);
    if cursor < scroll {
        scroll = cursor;
    } else if cursor >= scroll + viewport {
        scroll = cursor + 1 - viewport;
    }
    scroll.min(max_scroll)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}
