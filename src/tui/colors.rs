//! Colour palettes for the terminal user interface.

use ratatui::style::Color;

use crate::settings::Theme;
use crate::timer::TimerMode;

/// The handful of colours every screen draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub background: Color,
    pub text: Color,
}

/// Used for the work dial
pub const TOMATO: Color = Color::Rgb(220, 60, 45);
/// Used for the break dial
pub const MINT: Color = Color::Rgb(46, 184, 140);

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::TomatoRed => Palette {
            primary: Color::Rgb(185, 28, 28),
            secondary: Color::Rgb(254, 226, 226),
            accent: Color::Rgb(239, 68, 68),
            background: Color::Rgb(250, 250, 250),
            text: Color::Rgb(23, 23, 23),
        },
        Theme::MintGreen => Palette {
            primary: Color::Rgb(5, 150, 105),
            secondary: Color::Rgb(209, 250, 229),
            accent: Color::Rgb(52, 211, 153),
            background: Color::Rgb(250, 250, 250),
            text: Color::Rgb(23, 23, 23),
        },
        Theme::MidnightDark => Palette {
            primary: Color::Rgb(163, 163, 163),
            secondary: Color::Rgb(38, 38, 38),
            accent: Color::Rgb(82, 82, 82),
            background: Color::Rgb(23, 23, 23),
            text: Color::Rgb(250, 250, 250),
        },
    }
}

/// Dial colour for the current phase.
pub fn mode_color(mode: TimerMode) -> Color {
    match mode {
        TimerMode::Work => TOMATO,
        TimerMode::Break => MINT,
    }
}
