//! Terminal output

mod console;
pub mod theme;

pub use console::Console;
pub use theme::Theme;
