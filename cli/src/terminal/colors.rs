use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 129, g: 199, b: 132 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 202, b: 40 };
pub const SEPARATOR: Color = Color::TrueColor { r: 97, g: 97, b: 97 };
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 224, g: 224, b: 224 };
pub const IPV4_ADDR: Color = Color::TrueColor { r: 100, g: 181, b: 246 };
pub const FAILURE: Color = Color::TrueColor { r: 229, g: 115, b: 115 };
