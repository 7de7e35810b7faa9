//! Device-held participation state: the participant id and completion flag.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DatabaseError;
use crate::survey::DeviceState;

use super::Database;

/// Keys used in the `settings` table.
pub mod settings_keys {
    pub const DEFAULT_DEVICE: &str = "default";
    pub const SURVEY_USER_ID: &str = "survey_user_id";
    pub const SURVEY_COMPLETED: &str = "survey_completed";
}

/// Storage for the two values a device remembers between sessions.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    async fn load(&self) -> Result<DeviceState, DatabaseError>;

    async fn save_user_id(&self, user_id: &str) -> Result<(), DatabaseError>;

    async fn mark_completed(&self) -> Result<(), DatabaseError>;
}

/// `DeviceStore` over the generic settings table.
pub struct SettingsDeviceStore {
    db: Arc<dyn Database>,
    device: String,
}

impl SettingsDeviceStore {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self::for_device(db, settings_keys::DEFAULT_DEVICE)
    }

    pub fn for_device(db: Arc<dyn Database>, device: impl Into<String>) -> Self {
        Self {
            db,
            device: device.into(),
        }
    }
}

/// Accepts both a JSON bool and the string form browsers stored.
fn is_true(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}

#[async_trait]
impl DeviceStore for SettingsDeviceStore {
    async fn load(&self) -> Result<DeviceState, DatabaseError> {
        let user_id = self
            .db
            .get_setting(&self.device, settings_keys::SURVEY_USER_ID)
            .await?
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|id| !id.is_empty());
        let completed = self
            .db
            .get_setting(&self.device, settings_keys::SURVEY_COMPLETED)
            .await?
            .is_some_and(|v| is_true(&v));
        Ok(DeviceState { user_id, completed })
    }

    async fn save_user_id(&self, user_id: &str) -> Result<(), DatabaseError> {
        self.db
            .set_setting(
                &self.device,
                settings_keys::SURVEY_USER_ID,
                &Value::String(user_id.to_string()),
            )
            .await
    }

    async fn mark_completed(&self) -> Result<(), DatabaseError> {
        self.db
            .set_setting(&self.device, settings_keys::SURVEY_COMPLETED, &Value::Bool(true))
            .await
    }
}
