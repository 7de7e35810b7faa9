//! Persistence: libSQL-backed settings, survey responses, and device state.

pub mod device;
pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use device::{DeviceStore, SettingsDeviceStore};
pub use libsql_backend::LibSqlBackend;
pub use traits::{Database, StoredSubmission};
