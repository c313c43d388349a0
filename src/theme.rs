//! Board colours, with optional overrides from the config file

use ratatui::style::Color;

use crate::config::ThemeOverrides;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,      // Cursor cell border, key hints
    pub board: Color,       // Cell background
    pub mask: Color,        // "?" on hidden clues
    pub question: Color,    // Revealed question text
    pub answer: Color,      // Revealed answer text
    pub header: Color,      // Category titles
    pub danger: Color,      // Load errors
    pub text: Color,
    pub text_dim: Color,
    pub inactive: Color,    // Cell borders
}

impl Default for Theme {
    fn default() -> Self {
        // Studio blue board with gold lettering
        Self {
            accent: Color::Rgb(255, 204, 0),
            board: Color::Rgb(6, 12, 233),
            mask: Color::Rgb(214, 159, 76),
            question: Color::Rgb(255, 255, 255),
            answer: Color::Rgb(166, 218, 149),
            header: Color::Rgb(255, 255, 255),
            danger: Color::Rgb(243, 139, 168),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            inactive: Color::Rgb(88, 91, 112),
        }
    }
}

impl Theme {
    /// Defaults with any valid config overrides applied
    pub fn from_overrides(overrides: &ThemeOverrides) -> Self {
        let mut theme = Self::default();

        let slots = [
            (&overrides.accent, &mut theme.accent),
            (&overrides.board, &mut theme.board),
            (&overrides.mask, &mut theme.mask),
            (&overrides.question, &mut theme.question),
            (&overrides.answer, &mut theme.answer),
            (&overrides.header, &mut theme.header),
        ];

        for (value, slot) in slots {
            let Some(value) = value else { continue };
            match Self::parse_hex_color(value) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring invalid theme color: {}", value),
            }
        }

        theme
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if !s.is_ascii() {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#060CE9"), Some(Color::Rgb(6, 12, 233)));
        assert_eq!(Theme::parse_hex_color("fc0"), Some(Color::Rgb(255, 204, 0)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_overrides_apply_and_bad_values_are_skipped() {
        let overrides = ThemeOverrides {
            mask: Some("#ff0000".to_string()),
            answer: Some("not a color".to_string()),
            ..Default::default()
        };
        let theme = Theme::from_overrides(&overrides);

        assert_eq!(theme.mask, Color::Rgb(255, 0, 0));
        assert_eq!(theme.answer, Theme::default().answer);
        assert_eq!(theme.board, Theme::default().board);
    }
}
