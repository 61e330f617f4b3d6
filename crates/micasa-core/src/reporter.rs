//! Reporter trait for dependency injection
//!
//! This trait allows the engine to report progress and status without
//! being coupled to a specific terminal implementation.

use micasa_schema::PackageName;

/// Sink for user-facing progress messages.
pub trait Reporter: Send + Sync {
    /// Indicates a new section or phase has started (e.g. "Checking", "Installing").
    fn section(&self, title: &str);

    /// A package's installed state is being checked.
    fn checking(&self, name: &PackageName);

    /// An external command is about to run on behalf of a package.
    fn running(&self, name: &PackageName, command: &str);

    /// Marks a package operation as successfully completed.
    fn done(&self, name: &PackageName, detail: &str);

    /// Marks a package operation as failed with a specific reason.
    fn failed(&self, name: &PackageName, reason: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a success message.
    fn success(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Log an error message.
    fn error(&self, msg: &str);

    /// Display a final summary without timing information.
    fn summary_plain(&self, count: usize, status: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn checking(&self, name: &PackageName) {
        (**self).checking(name);
    }
    fn running(&self, name: &PackageName, command: &str) {
        (**self).running(name, command);
    }
    fn done(&self, name: &PackageName, detail: &str) {
        (**self).done(name, detail);
    }
    fn failed(&self, name: &PackageName, reason: &str) {
        (**self).failed(name, reason);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn success(&self, msg: &str) {
        (**self).success(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
    fn error(&self, msg: &str) {
        (**self).error(msg);
    }
    fn summary_plain(&self, count: usize, status: &str) {
        (**self).summary_plain(count, status);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn checking(&self, _: &PackageName) {}
    fn running(&self, _: &PackageName, _: &str) {}
    fn done(&self, _: &PackageName, _: &str) {}
    fn failed(&self, _: &PackageName, _: &str) {}
    fn info(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn error(&self, _: &str) {}
    fn summary_plain(&self, _: usize, _: &str) {}
}
