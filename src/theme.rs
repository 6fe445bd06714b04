use ratatui::style::{Color, Modifier, Style};

pub const TITLE: Style = Style::new().fg(Color::Indexed(170)).add_modifier(Modifier::BOLD);
pub const PROMPT: Style = Style::new().fg(Color::Indexed(212));
pub const ERROR: Style = Style::new().fg(Color::Indexed(196)).add_modifier(Modifier::BOLD);
pub const SELECTED: Style = Style::new().fg(Color::Indexed(205));
pub const INPUT: Style = Style::new().fg(Color::Yellow);
pub const HINT: Style = Style::new().fg(Color::DarkGray);
