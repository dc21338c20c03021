//! Handlers for tools with a line-oriented global config store (`git`, `npm`).
use anyhow::Result;

use super::{Handler, SettingOutcome, SettingStatus, converge};
use crate::config::Settings;
use crate::engine::Context;
use crate::error::SettingError;
use crate::resources::config_store::{ConfigEntryResource, ConfigStore};

/// Applies each setting as one key in the tool's global config.
#[derive(Debug)]
pub struct ConfigStoreHandler {
    store: ConfigStore,
}

impl ConfigStoreHandler {
    /// Create a handler for `store`.
    #[must_use]
    pub const fn new(store: ConfigStore) -> Self {
        Self { store }
    }
}

/// `git config --global`.
pub static GIT: ConfigStoreHandler = ConfigStoreHandler::new(ConfigStore::Git);
/// `npm config`.
pub static NPM: ConfigStoreHandler = ConfigStoreHandler::new(ConfigStore::Npm);

impl Handler for ConfigStoreHandler {
    fn name(&self) -> &'static str {
        self.store.program()
    }

    fn apply(&self, settings: &Settings, ctx: &Context) -> Result<Vec<SettingOutcome>> {
        let mut outcomes = Vec::with_capacity(settings.len());
        for (key, value) in settings.iter() {
            let Some(desired) = value.to_scalar_string() else {
                let err = SettingError::Shape {
                    key: key.to_string(),
                    expected: "a string, boolean or number",
                    found: value.kind(),
                };
                ctx.log.warn(&err.to_string());
                outcomes.push(SettingOutcome::new(key, SettingStatus::Failed(err.to_string())));
                continue;
            };

            let resource =
                ConfigEntryResource::new(self.store, key.to_string(), desired, &*ctx.executor);
            outcomes.push(converge(ctx, key, &resource));
        }
        Ok(outcomes)
    }
}
