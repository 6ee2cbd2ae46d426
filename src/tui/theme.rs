//! Color themes for the dashboard.

use ratatui::style::Color;

use crate::core::CustomColorsConfig;

/// Colors used by the dashboard panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name as used in config
    pub name: String,
    /// Focused panel border and titles
    pub primary: Color,
    /// Running indicator and added-item highlights
    pub secondary: Color,
    /// Grabbed row while reordering
    pub accent: Color,
    /// Main text
    pub text: Color,
    /// Params column and hints
    pub text_dim: Color,
    /// Timestamps and placeholders
    pub text_muted: Color,
    /// Selected row background
    pub selected_bg: Color,
    /// Unfocused panel border
    pub border: Color,
    /// Completion lines
    pub success: Color,
    /// Stop and duplicate notices
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// Default theme - readable on light and dark terminals.
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            primary: Color::Rgb(99, 102, 241),     // Indigo
            secondary: Color::Rgb(16, 185, 129),   // Emerald
            accent: Color::Rgb(251, 146, 60),      // Orange
            text: Color::White,
            text_dim: Color::Rgb(156, 163, 175),   // Gray-400
            text_muted: Color::Rgb(107, 114, 128), // Gray-500
            selected_bg: Color::Rgb(55, 65, 81),   // Gray-700
            border: Color::Rgb(75, 85, 99),        // Gray-600
            success: Color::Rgb(34, 197, 94),      // Green
            warning: Color::Rgb(234, 179, 8),      // Yellow
        }
    }

    /// Dracula.
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            primary: Color::Rgb(189, 147, 249),
            secondary: Color::Rgb(80, 250, 123),
            accent: Color::Rgb(255, 121, 198),
            text: Color::Rgb(248, 248, 242),
            text_dim: Color::Rgb(189, 147, 249),
            text_muted: Color::Rgb(98, 114, 164),
            selected_bg: Color::Rgb(68, 71, 90),
            border: Color::Rgb(68, 71, 90),
            success: Color::Rgb(80, 250, 123),
            warning: Color::Rgb(255, 184, 108),
        }
    }

    /// Nord.
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            primary: Color::Rgb(136, 192, 208),
            secondary: Color::Rgb(163, 190, 140),
            accent: Color::Rgb(208, 135, 112),
            text: Color::Rgb(236, 239, 244),
            text_dim: Color::Rgb(216, 222, 233),
            text_muted: Color::Rgb(76, 86, 106),
            selected_bg: Color::Rgb(59, 66, 82),
            border: Color::Rgb(67, 76, 94),
            success: Color::Rgb(163, 190, 140),
            warning: Color::Rgb(235, 203, 139),
        }
    }

    /// Look up a built-in theme (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_theme()),
            "dracula" => Some(Self::dracula()),
            "nord" => Some(Self::nord()),
            _ => None,
        }
    }

    /// Built-in theme names.
    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "dracula", "nord"]
    }

    /// Resolve a theme from its config name plus hex overrides.
    ///
    /// Unknown names fall back to the default theme; malformed hex values
    /// are ignored.
    pub fn resolve(name: &str, custom: Option<&CustomColorsConfig>) -> Self {
        let mut theme = Self::by_name(name).unwrap_or_else(|| {
            tracing::warn!(
                theme = name,
                available = ?Self::available_themes(),
                "unknown theme, using default"
            );
            Self::default_theme()
        });

        let Some(custom) = custom else {
            return theme;
        };

        let overrides = [
            (&custom.primary, &mut theme.primary),
            (&custom.secondary, &mut theme.secondary),
            (&custom.accent, &mut theme.accent),
            (&custom.text, &mut theme.text),
            (&custom.selected_bg, &mut theme.selected_bg),
            (&custom.border, &mut theme.border),
        ];
        for (hex, slot) in overrides {
            if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
                *slot = color;
            }
        }

        theme
    }
}

/// Parse a hex color string (#RRGGBB or RRGGBB) into a Color.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
