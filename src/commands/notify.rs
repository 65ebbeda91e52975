use owo_colors::OwoColorize;
use std::fmt::Display;

pub fn success(message: impl Display) {
    println!("{} {}", "✓".green(), message);
}

pub fn warning(message: impl Display) {
    eprintln!("{} {}", "!".yellow(), message);
}

pub fn error(message: impl Display) {
    eprintln!("{} {}", "✗".red(), message);
}
