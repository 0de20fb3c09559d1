//! Desktop bridge implementations.
//!
//! Concrete adapters for the `bridge-traits` contracts on desktop platforms.
//! Currently ships the SQLite-backed [`SqliteSettingsStore`]; audio backends
//! live in `core-playback` (the clock-paced reference backend) or are
//! supplied by the host shell.

pub mod settings;

pub use settings::SqliteSettingsStore;
