//! Store connection settings threaded into the gateway at construction.

use std::path::{Path, PathBuf};

/// Where the catalog database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// Existing SQLite database file. A missing file counts as unreachable.
    File(PathBuf),
    /// Private in-memory database, alive while the connection is open.
    Memory,
}

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    target: StoreTarget,
}

impl StoreConfig {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            target: StoreTarget::File(path.as_ref().to_path_buf()),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            target: StoreTarget::Memory,
        }
    }

    pub fn target(&self) -> &StoreTarget {
        &self.target
    }

    /// Short label for log events.
    pub fn mode(&self) -> &'static str {
        match self.target {
            StoreTarget::File(_) => "file",
            StoreTarget::Memory => "memory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreConfig, StoreTarget};
    use std::path::PathBuf;

    #[test]
    fn file_config_keeps_path() {
        let config = StoreConfig::file("/var/lib/libris/library.db");
        assert_eq!(
            config.target(),
            &StoreTarget::File(PathBuf::from("/var/lib/libris/library.db"))
        );
        assert_eq!(config.mode(), "file");
        assert_eq!(StoreConfig::in_memory().mode(), "memory");
    }
}
