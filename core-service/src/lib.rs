//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (audio backend,
//! notification host, settings storage) into the player core. It constructs
//! the one session controller the process gets, and hands out the handles
//! everything else uses: UIs and the notification host clone the
//! [`SessionHandle`]; library screens share the catalog and override store.
//! Desktop apps typically enable the `desktop` feature for the SQLite-backed
//! settings store from `bridge-desktop`.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{
    notification::NotificationHost, playback::AudioBackend, storage::SettingsStore,
};
use core_library::{MemoryCatalog, OverrideStore};
use core_playback::PlayerEngine;
use core_session::{Queue, SessionController, SessionHandle};
use tracing::info;

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub settings_store: Arc<dyn SettingsStore>,
    pub notification_host: Arc<dyn NotificationHost>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        settings_store: Arc<dyn SettingsStore>,
        notification_host: Arc<dyn NotificationHost>,
    ) -> Self {
        Self {
            settings_store,
            notification_host,
        }
    }
}

/// Primary façade exposed to host applications.
///
/// Exactly one of these exists per process; it owns the playback session for
/// its whole foreground lifetime. Dropping the service (and every cloned
/// session handle) tears playback down.
pub struct CoreService {
    session: SessionHandle,
    catalog: Arc<MemoryCatalog>,
    overrides: OverrideStore,
}

impl CoreService {
    /// Wire the bridges and an audio backend into a running core.
    ///
    /// Spawns the session controller, so this must be called within a Tokio
    /// runtime.
    pub fn new(deps: CoreDependencies, backend: Box<dyn AudioBackend>) -> Self {
        info!("Starting player core");
        let engine = PlayerEngine::new(backend);
        let session =
            SessionController::spawn(engine, Queue::new(), deps.notification_host.clone());
        let overrides = OverrideStore::new(deps.settings_store.clone());

        Self {
            session,
            catalog: Arc::new(MemoryCatalog::new()),
            overrides,
        }
    }

    /// The playback session's command surface. Clone freely; every clone
    /// addresses the same controller.
    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    /// The shared track catalog.
    pub fn catalog(&self) -> Arc<MemoryCatalog> {
        Arc::clone(&self.catalog)
    }

    /// The per-track override store (favorites, hidden, metadata, artwork).
    pub fn overrides(&self) -> OverrideStore {
        self.overrides.clone()
    }
}

/// Convenience bootstrapper for desktop hosts: SQLite settings under
/// `data_dir`, caller-supplied notification host and audio backend.
#[cfg(feature = "desktop")]
pub async fn bootstrap_desktop(
    data_dir: std::path::PathBuf,
    notification_host: Arc<dyn NotificationHost>,
    backend: Box<dyn AudioBackend>,
) -> Result<CoreService> {
    let settings = bridge_desktop::SqliteSettingsStore::new(data_dir.join("settings.db"))
        .await
        .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;

    Ok(CoreService::new(
        CoreDependencies::new(Arc::new(settings), notification_host),
        backend,
    ))
}
