//! Colors and preset styles for the dashboard.

use tui::style::{Color, Modifier, Style};

use crate::dataset::{Region, Sex, Smoker};

pub struct Theme;

impl Theme {
    pub const ACCENT: Color = Color::Yellow;
    pub const FRAME: Color = Color::Cyan;
    pub const MUTED: Color = Color::DarkGray;
    pub const TEXT: Color = Color::White;
    pub const GOOD: Color = Color::Green;
    pub const BAD: Color = Color::Red;

    pub const SMOKER: Color = Color::Red;
    pub const NON_SMOKER: Color = Color::Blue;

    pub fn title() -> Style {
        Style::default().fg(Self::TEXT).add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::FRAME)
    }

    pub fn focused() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    pub fn highlight() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn key_desc() -> Style {
        Style::default().fg(Self::MUTED)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::GOOD).add_modifier(Modifier::BOLD)
    }

    pub fn danger() -> Style {
        Style::default().fg(Self::BAD).add_modifier(Modifier::BOLD)
    }

    pub fn smoker(smoker: Smoker) -> Color {
        match smoker {
            Smoker::Yes => Self::SMOKER,
            Smoker::No => Self::NON_SMOKER,
        }
    }

    pub fn sex(sex: Sex) -> Color {
        match sex {
            Sex::Male => Color::Rgb(76, 114, 176),
            Sex::Female => Color::Rgb(221, 132, 82),
        }
    }

    pub fn region(region: Region) -> Color {
        match region {
            Region::Southeast => Color::Rgb(255, 153, 153),
            Region::Southwest => Color::Rgb(102, 178, 255),
            Region::Northeast => Color::Rgb(153, 255, 153),
            Region::Northwest => Color::Rgb(255, 204, 153),
        }
    }

    /// Diverging blue-grey-red scale for a correlation in [-1, 1].
    pub fn heat(value: f64) -> Color {
        const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
        const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
        const HOT: (f64, f64, f64) = (180.0, 4.0, 38.0);

        if value.is_nan() {
            return Self::MUTED;
        }
        let v = value.clamp(-1.0, 1.0);
        let (from, to, t) = if v < 0.0 { (MID, COLD, -v) } else { (MID, HOT, v) };
        let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
        Color::Rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_scale_ends() {
        assert_eq!(Theme::heat(0.0), Color::Rgb(221, 221, 221));
        assert_eq!(Theme::heat(1.0), Color::Rgb(180, 4, 38));
        assert_eq!(Theme::heat(-1.0), Color::Rgb(59, 76, 192));
        assert_eq!(Theme::heat(7.0), Theme::heat(1.0));
        assert_eq!(Theme::heat(f64::NAN), Theme::MUTED);
    }
}
