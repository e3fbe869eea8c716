use std::time::Duration;

use reaper_common::config::{
    ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer, ensure_in_range,
};
use serde::{Deserialize, Serialize};
use serenity::all::ChannelId;

pub const DEFAULT_CONFIG_FILE_NAME: &str = "reaper_bot_config.yaml";

pub fn get_config_manager(
    path: &str,
) -> ConfigManager<FileContentConfigProvider, BotConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct BotConfig {
    pub prefix: String,
    #[serde(default = "default_tictactoe_timeout_secs")]
    pub tictactoe_timeout_secs: u64,
    #[serde(default = "default_help_timeout_secs")]
    pub help_timeout_secs: u64,
    /// Channel that receives a copy of every moderation action.
    #[serde(default)]
    pub mod_log_channel_id: Option<u64>,
}

fn default_tictactoe_timeout_secs() -> u64 {
    180
}

fn default_help_timeout_secs() -> u64 {
    60
}

impl BotConfig {
    pub fn tictactoe_timeout(&self) -> Duration {
        Duration::from_secs(self.tictactoe_timeout_secs)
    }

    pub fn help_timeout(&self) -> Duration {
        Duration::from_secs(self.help_timeout_secs)
    }

    pub fn mod_log_channel(&self) -> Option<ChannelId> {
        self.mod_log_channel_id.map(ChannelId::new)
    }
}

impl Validate for BotConfig {
    fn validate(&self) -> Result<(), String> {
        if self.prefix.is_empty() {
            return Err("Prefix must not be empty".to_string());
        }
        if self.prefix.chars().any(char::is_whitespace) {
            return Err(format!("Prefix must not contain whitespace, got {:?}", self.prefix));
        }
        ensure_in_range("tictactoe_timeout_secs", self.tictactoe_timeout_secs, 10, 3600)?;
        ensure_in_range("help_timeout_secs", self.help_timeout_secs, 5, 600)?;
        if self.mod_log_channel_id == Some(0) {
            return Err("mod_log_channel_id must be a channel id, got 0".to_string());
        }
        Ok(())
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            tictactoe_timeout_secs: default_tictactoe_timeout_secs(),
            help_timeout_secs: default_help_timeout_secs(),
            mod_log_channel_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reaper_common::config::{ConfigContentProvider, ConfigSerializer};

    fn get_temp_file_path() -> String {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_reaper_bot_config_{}.yaml", random_number));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(BotConfig::default().validate().is_ok());
        assert_eq!(BotConfig::default().tictactoe_timeout(), Duration::from_secs(180));
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_manager() {
        let config = BotConfig {
            prefix: "?".to_string(),
            ..BotConfig::default()
        };
        let manager = get_config_manager(&get_temp_file_path());

        manager.set_config(&config).unwrap();
        assert_eq!(manager.get_config().unwrap(), config);
        assert_eq!(manager.get_config().unwrap(), config);
    }

    #[test]
    fn test_config_file_does_not_exist_returns_default_config() {
        let manager = get_config_manager("this_file_does_not_exist.yaml");
        assert_eq!(manager.get_config().unwrap(), BotConfig::default());
    }

    #[test]
    fn test_missing_timeouts_fall_back_to_defaults() {
        let serializer = YamlConfigSerializer::new();
        let config: BotConfig = serializer.deserialize("prefix: \"$\"\n").unwrap();
        assert_eq!(config.prefix, "$");
        assert_eq!(config.tictactoe_timeout_secs, 180);
        assert_eq!(config.help_timeout_secs, 60);
        assert_eq!(config.mod_log_channel(), None);
    }

    #[test]
    fn test_mod_log_channel_is_read() {
        let serializer = YamlConfigSerializer::new();
        let config: BotConfig = serializer
            .deserialize("prefix: \"!\"\nmod_log_channel_id: 1234567890\n")
            .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.mod_log_channel(), Some(ChannelId::new(1_234_567_890)));
    }

    #[test]
    fn test_zero_mod_log_channel_is_rejected() {
        let config = BotConfig {
            mod_log_channel_id: Some(0),
            ..BotConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_config_cant_be_read() {
        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(file_path.as_str());
        content_provider
            .set_config_content("prefix: \"! \"\ntictactoe_timeout_secs: 1\n")
            .unwrap();

        let manager = get_config_manager(&file_path);
        assert!(manager.get_config().is_err());
    }

    #[test]
    fn test_set_config_rejects_invalid_values() {
        let manager = get_config_manager(&get_temp_file_path());
        let config = BotConfig {
            help_timeout_secs: 0,
            ..BotConfig::default()
        };
        assert!(manager.set_config(&config).is_err());
    }
}
