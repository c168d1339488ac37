//! # Views
//!
//! Pure functions from data to `String`. Nothing in here touches the
//! network, the store or the terminal.
//!
//! ```text
//! views/
//! ├── mod.rs     ◄─── Palette, Table, bars, stat cards
//! └── pages.rs   ◄─── one renderer per page of the admin UI
//! ```

pub mod pages;

use milka_core::types::Theme;
use owo_colors::{AnsiColors, OwoColorize, Stream};

// =============================================================================
// Palette
// =============================================================================

/// Colours for one theme. `plain()` renders without escape codes.
///
/// Themed output still goes through `if_supports_color`, so `NO_COLOR` and a
/// redirected stdout come out plain as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    theme: Option<Theme>,
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Danger,
    Warning,
    Accent,
    Muted,
}

impl Tone {
    fn color(self, theme: Theme) -> AnsiColors {
        match (theme, self) {
            (Theme::Light, Tone::Success) => AnsiColors::Green,
            (Theme::Light, Tone::Danger) => AnsiColors::Red,
            (Theme::Light, Tone::Warning) => AnsiColors::Yellow,
            (Theme::Light, Tone::Accent) => AnsiColors::Blue,
            (Theme::Light, Tone::Muted) => AnsiColors::BrightBlack,
            (Theme::Dark, Tone::Success) => AnsiColors::BrightGreen,
            (Theme::Dark, Tone::Danger) => AnsiColors::BrightRed,
            (Theme::Dark, Tone::Warning) => AnsiColors::BrightYellow,
            (Theme::Dark, Tone::Accent) => AnsiColors::BrightCyan,
            (Theme::Dark, Tone::Muted) => AnsiColors::White,
        }
    }
}

impl Palette {
    pub const fn for_theme(theme: Theme) -> Self {
        Palette { theme: Some(theme) }
    }

    pub const fn plain() -> Self {
        Palette { theme: None }
    }

    fn paint(&self, tone: Tone, text: &str) -> String {
        match self.theme {
            Some(theme) => {
                let color = tone.color(theme);
                text.if_supports_color(Stream::Stdout, |t| t.color(color)).to_string()
            }
            None => text.to_string(),
        }
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(Tone::Success, text)
    }

    pub fn danger(&self, text: &str) -> String {
        self.paint(Tone::Danger, text)
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(Tone::Warning, text)
    }

    pub fn accent(&self, text: &str) -> String {
        self.paint(Tone::Accent, text)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(Tone::Muted, text)
    }

    pub fn heading(&self, text: &str) -> String {
        match self.theme {
            Some(_) => text.if_supports_color(Stream::Stdout, |t| t.bold()).to_string(),
            None => text.to_string(),
        }
    }
}

// =============================================================================
// Table
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A text table. Column widths follow the widest cell.
///
/// Cells are stored unpainted; `styled_row` marks whole rows to be painted
/// after padding so escape codes never count towards the width.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<(String, Align)>,
    rows: Vec<(Vec<String>, RowStyle)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Normal,
    Warning,
    Danger,
    Success,
}

impl Table {
    pub fn new(headers: &[(&str, Align)]) -> Self {
        Table {
            headers: headers
                .iter()
                .map(|(h, a)| (h.to_string(), *a))
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) -> &mut Self {
        self.rows.push((cells, RowStyle::Normal));
        self
    }

    pub fn styled_row(&mut self, cells: Vec<String>, style: RowStyle) -> &mut Self {
        self.rows.push((cells, style));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|(h, _)| width(h)).collect();
        for (cells, _) in &self.rows {
            for (i, cell) in cells.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(width(cell));
                }
            }
        }
        widths
    }

    fn line(&self, cells: &[String], widths: &[usize]) -> String {
        self.headers
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, ((_, align), w))| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                pad(cell, *w, *align)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self, palette: &Palette) -> String {
        let widths = self.widths();
        let headers: Vec<String> = self.headers.iter().map(|(h, _)| h.clone()).collect();

        let mut out = Vec::with_capacity(self.rows.len() + 2);
        out.push(palette.heading(&self.line(&headers, &widths)));
        let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push(palette.muted(&"─".repeat(rule)));

        for (cells, style) in &self.rows {
            let line = self.line(cells, &widths);
            out.push(match style {
                RowStyle::Normal => line,
                RowStyle::Warning => palette.warning(&line),
                RowStyle::Danger => palette.danger(&line),
                RowStyle::Success => palette.success(&line),
            });
        }

        out.join("\n")
    }
}

fn width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, w: usize, align: Align) -> String {
    let fill = w.saturating_sub(width(text));
    match align {
        Align::Left => format!("{text}{}", " ".repeat(fill)),
        Align::Right => format!("{}{text}", " ".repeat(fill)),
    }
}

// =============================================================================
// Charts & Cards
// =============================================================================

/// Width of a full bar in the text charts.
pub const BAR_WIDTH: usize = 30;

/// A horizontal bar for `share` in `0.0..=1.0`.
pub fn bar(share: f64, max_width: usize) -> String {
    let share = if share.is_finite() { share.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (share * max_width as f64).round() as usize;
    if filled == 0 && share > 0.0 {
        return "▏".to_string();
    }
    "█".repeat(filled)
}

/// A row of stat cards: `label` above `value`.
pub fn stat_cards(cards: &[(&str, String)], palette: &Palette) -> String {
    let widths: Vec<usize> = cards
        .iter()
        .map(|(label, value)| width(label).max(width(value)) + 2)
        .collect();

    let border = |left: &str, mid: &str, right: &str| {
        let inner: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
        format!("{left}{}{right}", inner.join(mid))
    };
    let labels: Vec<String> = cards
        .iter()
        .zip(&widths)
        .map(|((label, _), w)| palette.muted(&pad(&format!(" {label}"), *w, Align::Left)))
        .collect();
    let values: Vec<String> = cards
        .iter()
        .zip(&widths)
        .map(|((_, value), w)| palette.heading(&pad(&format!(" {value}"), *w, Align::Left)))
        .collect();

    [
        border("┌", "┬", "┐"),
        format!("│{}│", labels.join("│")),
        format!("│{}│", values.join("│")),
        border("└", "┴", "┘"),
    ]
    .join("\n")
}
