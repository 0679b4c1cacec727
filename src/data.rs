use std::{ops::Deref, sync::Arc};

use crate::config::BotConfig;
use crate::fetch::{FetchResult, PunishmentClient};

/// Centralized data structure for the bot
///
/// Everything in here is read-only once the bot is running, so cloning only
/// bumps a reference count.
#[derive(Clone, Debug)]
pub struct Data(pub Arc<DataInner>);

#[derive(Debug)]
pub struct DataInner {
    // Client for the timesheet punishment API
    pub client: PunishmentClient,
    // Configuration the bot was started with
    pub config: BotConfig,
}

impl Deref for Data {
    type Target = DataInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Data {
    /// Build the bot data, creating an HTTP client from the API settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: BotConfig) -> FetchResult<Self> {
        let client = PunishmentClient::new(config.api.clone())?;
        Ok(Self::with_client(config, client))
    }

    /// Build the bot data around an existing client
    #[must_use]
    pub fn with_client(config: BotConfig, client: PunishmentClient) -> Self {
        Self(Arc::new(DataInner { client, config }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_new() {
        let data = Data::new(BotConfig::default()).expect("Failed to build data");
        assert_eq!(data.config.prefix, "*");
        assert_eq!(data.client.config(), &data.config.api);
    }

    #[test]
    fn test_clone_shares_inner() {
        let data = Data::new(BotConfig::default()).expect("Failed to build data");
        let other = data.clone();
        assert!(Arc::ptr_eq(&data.0, &other.0));
    }

    #[test]
    fn test_debug_hides_secret() {
        let mut config = BotConfig::default();
        config.api.secret = "hunter2".to_string();
        let data = Data::new(config).expect("Failed to build data");

        let debug_output = format!("{data:?}");
        assert!(debug_output.contains("PunishmentClient"));
        assert!(debug_output.contains("endpoint"));
        assert!(!debug_output.contains("hunter2"));
    }
}
