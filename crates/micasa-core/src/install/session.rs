/// State shared across the packages of one install invocation.
///
/// Created fresh for every single-package or batch install and never
/// persisted. Holds whether the apt package index was already refreshed, so
/// `apt-get update` runs at most once per invocation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    index_refreshed: bool,
}

impl Session {
    /// A session in which nothing has happened yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a package index refresh has succeeded.
    pub fn index_refreshed(&self) -> bool {
        self.index_refreshed
    }

    /// Record a successful index refresh.
    pub fn mark_index_refreshed(&mut self) {
        self.index_refreshed = true;
    }
}
