use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Source des poids utilisés pour tirer le numéro bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BonusWeighting {
    /// Reliquat du pool principal après retrait des 6 numéros.
    #[default]
    #[value(name = "main")]
    MainFrequency,
    /// Pool séparé pondéré par `bonus_probability`.
    #[value(name = "bonus")]
    BonusFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Facteur de quantification : poids = floor(probabilité × scale).
    pub scale: u32,
    pub bonus_weighting: BonusWeighting,
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scale: 100,
            bonus_weighting: BonusWeighting::MainFrequency,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)
            .map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SimError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(SimError::InvalidConfig("scale must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.scale, 100);
        assert_eq!(config.bonus_weighting, BonusWeighting::MainFrequency);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{"bonus_weighting": "bonus_frequency"}"#).unwrap();
        assert_eq!(config.scale, 100);
        assert_eq!(config.bonus_weighting, BonusWeighting::BonusFrequency);
    }

    #[test]
    fn test_zero_scale_rejected() {
        let err = SimConfig::from_json(r#"{"scale": 0}"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            SimConfig::from_json("{scale: 10"),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("loto645_config_{}.json", std::process::id()));
        let config = SimConfig { scale: 1000, bonus_weighting: BonusWeighting::MainFrequency, seed: Some(7) };
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = SimConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("loto645_config_absent.json");
        assert!(matches!(SimConfig::load(&path), Err(SimError::InvalidConfig(_))));
    }
}
