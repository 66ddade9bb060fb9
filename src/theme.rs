use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the block editor
#[derive(Clone, Debug)]
pub struct Theme {
    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Color for the current file name in the status bar
    pub filename_color: Color,

    /// Color for title rows in the block list and outline
    pub title_fg: Color,

    /// Color for the kind column ("Title 1", "Paragraph 3")
    pub label_fg: Color,

    /// Foreground color for applied blocks
    pub applied_fg: Color,

    /// Background color for selected paragraphs
    pub selected_bg: Color,

    /// Foreground color for the row under the cursor
    pub cursor_fg: Color,

    /// Background color for the row under the cursor
    pub cursor_bg: Color,

    /// Border color of the focused panel
    pub focus_border: Color,

    /// Foreground color for menu items
    pub menu_fg: Color,

    /// Background color for menu
    pub menu_bg: Color,

    /// Foreground color for disabled menu items
    pub menu_disabled_fg: Color,

    /// Foreground color for selected menu entry
    pub menu_selected_fg: Color,

    /// Background color for selected menu entry
    pub menu_selected_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            filename_color: Color::LightYellow,
            title_fg: Color::Yellow,
            label_fg: Color::DarkGray,
            applied_fg: Color::Green,
            selected_bg: Color::Rgb(0x1e, 0x3a, 0x8a),
            cursor_fg: Color::Black,
            cursor_bg: Color::Gray,
            focus_border: Color::LightBlue,
            menu_fg: Color::White,
            menu_bg: Color::Black,
            menu_disabled_fg: Color::DarkGray,
            menu_selected_fg: Color::White,
            menu_selected_bg: Color::LightBlue,
        }
    }
}

impl Theme {
    /// Create a new theme with default colors
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    /// Get the style for the filename in the status bar
    pub fn filename_style(&self) -> Style {
        self.status_bar_style().fg(self.filename_color)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label_style(&self) -> Style {
        Style::default().fg(self.label_fg)
    }

    pub fn applied_style(&self) -> Style {
        Style::default().fg(self.applied_fg)
    }

    pub fn selected_style(&self) -> Style {
        Style::default().bg(self.selected_bg)
    }

    /// Get the style for the row under the cursor; it replaces any row colors
    pub fn cursor_style(&self) -> Style {
        Style::default().fg(self.cursor_fg).bg(self.cursor_bg)
    }

    pub fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus_border)
        } else {
            Style::default().fg(self.label_fg)
        }
    }

    /// Get the style for the menu/popup
    pub fn menu_style(&self) -> Style {
        Style::default().fg(self.menu_fg).bg(self.menu_bg)
    }

    /// Get the style for a disabled menu item
    pub fn menu_disabled_style(&self) -> Style {
        Style::default().fg(self.menu_disabled_fg)
    }

    /// Get the style for a selected menu entry
    pub fn menu_selected_style(&self) -> Style {
        Style::default()
            .fg(self.menu_selected_fg)
            .bg(self.menu_selected_bg)
    }
}
