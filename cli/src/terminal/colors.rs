use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 200, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 190, b: 90 };
pub const SEPARATOR: Color = Color::TrueColor { r: 110, g: 110, b: 120 };
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 220, g: 220, b: 220 };

pub const LATENCY_GOOD: Color = Color::Green;
pub const LATENCY_NEUTRAL: Color = Color::Yellow;
pub const LATENCY_BAD: Color = Color::Red;
pub const SPEED: Color = Color::Cyan;
pub const MUTED: Color = Color::BrightBlack;
