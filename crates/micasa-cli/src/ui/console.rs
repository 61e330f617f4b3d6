//! Line-oriented terminal reporter
//!
//! Prints one line per event. Install commands inherit the terminal, so
//! their output interleaves with ours; no live redraw is attempted.

use crossterm::style::Stylize;
use micasa_core::Reporter;
use micasa_schema::PackageName;

use super::theme::Theme;

/// Reporter that writes to stdout (and stderr for errors).
#[derive(Debug, Clone, Default)]
pub struct Console {
    theme: Theme,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    fn name(&self, name: &PackageName) -> String {
        format!("{:<width$}", name.as_str(), width = self.theme.layout.name_width)
    }
}

impl Reporter for Console {
    fn section(&self, title: &str) {
        println!();
        println!("{}", title.with(self.theme.colors.header));
    }

    fn checking(&self, name: &PackageName) {
        tracing::debug!("checking {name}");
    }

    fn running(&self, name: &PackageName, command: &str) {
        println!(
            "  {} {} {}",
            self.theme.icons.active.with(self.theme.colors.secondary),
            self.name(name).with(self.theme.colors.package_name),
            format!("Running: {command}").with(self.theme.colors.secondary)
        );
    }

    fn done(&self, name: &PackageName, detail: &str) {
        println!(
            "  {} {} {}",
            self.theme.icons.success.with(self.theme.colors.success),
            self.name(name).with(self.theme.colors.package_name),
            detail
        );
    }

    fn failed(&self, name: &PackageName, reason: &str) {
        println!(
            "  {} {} {}",
            self.theme.icons.error.with(self.theme.colors.error),
            self.name(name).with(self.theme.colors.package_name),
            reason.with(self.theme.colors.error)
        );
    }

    fn info(&self, msg: &str) {
        println!("{msg}");
    }

    fn success(&self, msg: &str) {
        let color = self.theme.colors.success;
        println!("{} {}", self.theme.icons.success.with(color), msg.with(color));
    }

    fn warning(&self, msg: &str) {
        println!(
            "{} {}",
            self.theme.icons.warning.with(self.theme.colors.warning),
            format!("Warning: {msg}").with(self.theme.colors.warning)
        );
    }

    fn error(&self, msg: &str) {
        eprintln!("{}", format!("Error: {msg}").with(self.theme.colors.error));
    }

    fn summary_plain(&self, count: usize, status: &str) {
        println!();
        println!("{} {count} {status}", self.theme.icons.info);
    }
}
