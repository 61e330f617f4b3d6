//! UI Theme - Design system constants
//!
//! Colors, icons and column widths used by micasa's terminal output.

use crossterm::style::Color;

/// Default theme for micasa output
#[derive(Debug, Clone, Default)]
pub struct Theme {
    /// Colors for different UI elements
    pub colors: ColorScheme,
    /// Status icons
    pub icons: Icons,
    /// Column widths
    pub layout: Layout,
}

/// Color scheme for UI elements
#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// Package names (primary content)
    pub package_name: Color,
    /// Commands, paths and secondary info
    pub secondary: Color,
    /// Headers and labels
    pub header: Color,
    /// Success states
    pub success: Color,
    /// Warning states
    pub warning: Color,
    /// Error states
    pub error: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            package_name: Color::Cyan,
            secondary: Color::DarkGrey,
            header: Color::DarkGrey,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

/// Status icons for different states
#[derive(Debug, Clone)]
pub struct Icons {
    /// Active/in-progress state (●)
    pub active: &'static str,
    /// Success/completed state (✓)
    pub success: &'static str,
    /// Error/failed state (✗)
    pub error: &'static str,
    /// Warning state (⚠)
    pub warning: &'static str,
    /// Info/Tip state (ℹ)
    pub info: &'static str,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            active: "●",
            success: "✓",
            error: "✗",
            warning: "⚠",
            info: "ℹ",
        }
    }
}

/// Column widths
#[derive(Debug, Clone)]
pub struct Layout {
    /// Width allocated for package name column
    pub name_width: usize,
    /// Width allocated for labels in `info` output
    pub label_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            name_width: 16,
            label_width: 18,
        }
    }
}

/// `1 package` / `3 packages`
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(0, "package"), "0 packages");
        assert_eq!(plural(1, "package"), "1 package");
        assert_eq!(plural(2, "package"), "2 packages");
    }

    #[test]
    fn test_theme_defaults() {
        let theme = Theme::default();
        assert_eq!(theme.icons.success, "✓");
        assert_eq!(theme.icons.error, "✗");
        assert_eq!(theme.icons.warning, "⚠");
    }
}
