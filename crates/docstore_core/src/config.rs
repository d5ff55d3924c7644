//! Snapshot configuration.

/// Configuration for writing snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Whether to pretty-print the JSON payload.
    pub pretty: bool,

    /// Whether file dumps write a temp file and rename it over the target.
    pub atomic_replace: bool,

    /// Whether file dumps create missing parent directories.
    pub create_dirs: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            atomic_replace: true,
            create_dirs: false,
        }
    }
}

impl SnapshotConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration producing compact single-line JSON.
    #[must_use]
    pub fn compact() -> Self {
        Self::default().pretty(false)
    }

    /// Sets whether to pretty-print the payload.
    #[must_use]
    pub const fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    /// Sets whether file dumps replace the target atomically.
    #[must_use]
    pub const fn atomic_replace(mut self, value: bool) -> Self {
        self.atomic_replace = value;
        self
    }

    /// Sets whether file dumps create missing parent directories.
    #[must_use]
    pub const fn create_dirs(mut self, value: bool) -> Self {
        self.create_dirs = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SnapshotConfig::default();
        assert!(config.pretty);
        assert!(config.atomic_replace);
        assert!(!config.create_dirs);
    }

    #[test]
    fn builder_pattern() {
        let config = SnapshotConfig::new()
            .pretty(false)
            .atomic_replace(false)
            .create_dirs(true);

        assert!(!config.pretty);
        assert!(!config.atomic_replace);
        assert!(config.create_dirs);
        assert_eq!(SnapshotConfig::compact(), SnapshotConfig::new().pretty(false));
    }
}
