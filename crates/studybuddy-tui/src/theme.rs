use ratatui::style::{Color, Modifier, Style};

use studybuddy_core::ExtractionStatus;

/// Color theme for the TUI.
pub struct Theme {
    pub success: Color,
    pub error: Color,
    pub notice: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Hacker-green terminal theme.
    pub fn hacker() -> Self {
        Self {
            success: Color::Rgb(0, 210, 0),
            error: Color::Red,
            notice: Color::Yellow,

            header_fg: Color::Black,
            header_bg: Color::Rgb(0, 210, 0),
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(30, 50, 30),
            active: Color::Cyan,
            spinner: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    /// Modern theme: white text, electric blue accents, dark blue header.
    pub fn modern() -> Self {
        Self {
            success: Color::Rgb(0, 200, 80),
            error: Color::Rgb(255, 80, 80),
            notice: Color::Rgb(255, 200, 0),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            active: Color::Rgb(60, 140, 255),
            spinner: Color::Rgb(60, 140, 255),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    /// Look up a theme by name, falling back to `hacker`.
    pub fn by_name(name: &str) -> Self {
        match name {
            "modern" => Self::modern(),
            _ => Self::hacker(),
        }
    }

    pub fn extraction_color(&self, status: ExtractionStatus) -> Color {
        match status {
            ExtractionStatus::Idle => self.dim,
            ExtractionStatus::Processing => self.active,
            ExtractionStatus::Done => self.success,
            ExtractionStatus::Error => self.error,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
