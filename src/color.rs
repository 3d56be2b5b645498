use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Foreground/background color pair used by the canvas and by export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Palette {
    /// White aggregate on black, as in a photo of a discharge
    #[default]
    Classic,
    Plasma,
    Ember,
    Phosphor,
}

impl Palette {
    pub fn name(&self) -> &str {
        match self {
            Palette::Classic => "Classic",
            Palette::Plasma => "Plasma",
            Palette::Ember => "Ember",
            Palette::Phosphor => "Phosphor",
        }
    }

    pub fn next(&self) -> Palette {
        match self {
            Palette::Classic => Palette::Plasma,
            Palette::Plasma => Palette::Ember,
            Palette::Ember => Palette::Phosphor,
            Palette::Phosphor => Palette::Classic,
        }
    }

    pub fn parse(s: &str) -> Option<Palette> {
        match s.to_lowercase().as_str() {
            "classic" | "mono" => Some(Palette::Classic),
            "plasma" | "blue" => Some(Palette::Plasma),
            "ember" | "fire" => Some(Palette::Ember),
            "phosphor" | "green" => Some(Palette::Phosphor),
            _ => None,
        }
    }

    pub fn foreground_rgb(&self) -> [u8; 3] {
        match self {
            Palette::Classic => [0xFF, 0xFF, 0xFF],
            Palette::Plasma => [0xB4, 0xC8, 0xFF],
            Palette::Ember => [0xFF, 0xB0, 0x40],
            Palette::Phosphor => [0x60, 0xFF, 0x80],
        }
    }

    pub fn background_rgb(&self) -> [u8; 3] {
        match self {
            Palette::Classic => [0x00, 0x00, 0x00],
            Palette::Plasma => [0x0A, 0x06, 0x20],
            Palette::Ember => [0x18, 0x04, 0x00],
            Palette::Phosphor => [0x00, 0x10, 0x04],
        }
    }

    /// Terminal color for filled cells
    pub fn foreground(&self) -> Color {
        let [r, g, b] = self.foreground_rgb();
        Color::Rgb(r, g, b)
    }

    /// Terminal color behind the canvas
    pub fn background(&self) -> Color {
        let [r, g, b] = self.background_rgb();
        Color::Rgb(r, g, b)
    }
}
