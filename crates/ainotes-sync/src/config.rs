//! Engine configuration.

use std::fmt;
use std::sync::Arc;

use ainotes_core::RemoteNoteStore;

/// Whether the engine may talk to the remote store at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    #[default]
    Online,
    /// Demo mode: every operation targets the local cache only.
    Offline,
}

/// Explicit engine configuration, passed to [`crate::NoteSync::new`].
#[derive(Clone, Default)]
pub struct SyncConfig {
    pub mode: SyncMode,
    pub remote: Option<Arc<dyn RemoteNoteStore>>,
}

impl SyncConfig {
    /// Online against `remote`.
    pub fn online(remote: Arc<dyn RemoteNoteStore>) -> Self {
        Self {
            mode: SyncMode::Online,
            remote: Some(remote),
        }
    }

    /// Local cache only.
    pub fn offline() -> Self {
        Self {
            mode: SyncMode::Offline,
            remote: None,
        }
    }

    pub fn with_mode(mut self, mode: SyncMode) -> Self {
        self.mode = mode;
        self
    }

    /// True when no remote call may be made: offline mode, no store, or a
    /// store reporting demo mode.
    pub fn is_offline(&self) -> bool {
        match (&self.mode, &self.remote) {
            (SyncMode::Offline, _) | (_, None) => true,
            (SyncMode::Online, Some(remote)) => remote.is_offline_mode(),
        }
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("mode", &self.mode)
            .field("has_remote", &self.remote.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ainotes_cloud::MockRemoteStore;

    #[test]
    fn test_default_has_no_remote_and_is_offline() {
        let config = SyncConfig::default();
        assert_eq!(config.mode, SyncMode::Online);
        assert!(config.is_offline());
    }

    #[test]
    fn test_online_with_remote() {
        let config = SyncConfig::online(Arc::new(MockRemoteStore::new()));
        assert!(!config.is_offline());
        assert!(config.with_mode(SyncMode::Offline).is_offline());
    }

    #[test]
    fn test_remote_demo_mode_forces_offline() {
        let remote = MockRemoteStore::new();
        let config = SyncConfig::online(Arc::new(remote.clone()));
        remote.set_offline(true);
        assert!(config.is_offline());
    }

    #[test]
    fn test_debug_hides_remote() {
        let rendered = format!("{:?}", SyncConfig::offline());
        assert!(rendered.contains("Offline"));
        assert!(rendered.contains("has_remote: false"));
    }
}
