use mc_bot_proto::error::ProtoError;
use mc_bot_proto::features::FeatureSet;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct BotConfig {
    pub bot: BotSection,
    #[serde(default)]
    pub features: FeaturesSection,
    pub replay: ReplaySection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct BotSection {
    pub username: String,
    /// Protocol version string, e.g. "1.8.9".
    pub version: String,
}

/// Explicit feature flags. When non-empty they replace the version table.
#[derive(Debug, Default, Deserialize)]
pub struct FeaturesSection {
    #[serde(default)]
    pub enabled: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaySection {
    /// JSON-lines packet capture.
    pub capture: String,
    /// Optional scripted interaction commands.
    #[serde(default)]
    pub commands: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl BotConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Feature flags for the session.
    pub fn feature_set(&self) -> Result<FeatureSet, ProtoError> {
        if self.features.enabled.is_empty() {
            FeatureSet::for_version(&self.bot.version)
        } else {
            Ok(FeatureSet::from_names(self.features.enabled.iter().cloned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_bot_proto::features::SupportFeature;

    #[test]
    fn parse_config() {
        let toml_str = r#"
            [bot]
            username = "Bot"
            version = "1.8.9"

            [replay]
            capture = "session.jsonl"
        "#;
        let config: BotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot.username, "Bot");
        assert_eq!(config.bot.version, "1.8.9");
        assert_eq!(config.replay.capture, "session.jsonl");
        assert!(config.replay.commands.is_none());
        // logging and features default when absent
        assert_eq!(config.logging.level, "info");
        assert!(config.features.enabled.is_empty());

        let features = config.feature_set().unwrap();
        assert!(features.support_feature("fixedPointPosition"));
        assert!(features.support_feature("fixedPointDelta"));
    }

    #[test]
    fn explicit_features_replace_version_table() {
        let toml_str = r#"
            [bot]
            username = "Bot"
            version = "1.8.9"

            [features]
            enabled = ["doublePosition", "doubleDelta"]

            [replay]
            capture = "session.jsonl"
            commands = "script.txt"

            [logging]
            level = "debug"
        "#;
        let config: BotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.replay.commands.as_deref(), Some("script.txt"));
        assert_eq!(config.logging.level, "debug");
        let features = config.feature_set().unwrap();
        assert!(features.support_feature("doubleDelta"));
        assert!(!features.support_feature("fixedPointPosition"));
    }

    #[test]
    fn unsupported_version_is_an_error() {
        let toml_str = r#"
            [bot]
            username = "Bot"
            version = "1.7.10"

            [replay]
            capture = "session.jsonl"
        "#;
        let config: BotConfig = toml::from_str(toml_str).unwrap();
        assert!(config.feature_set().is_err());
    }
}
