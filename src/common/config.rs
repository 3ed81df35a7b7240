use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout_engine::{
    DefaultConflictResolver, FullLockConflictResolver, ResolverKind, TieBreak,
};

/// Location of the user configuration file, if a config directory exists.
pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dock-resize").join("resize.toml"))
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolverChoice {
    /// Stronger request wins, ties handled by `tie_break`.
    Default,
    /// Like `default`, but a fully locked subtree wins a full-weight tie.
    #[default]
    FullLock,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct ResizeSettings {
    #[serde(default)]
    pub resolver: ResolverChoice,
    #[serde(default)]
    pub tie_break: TieBreak,
    /// Divider shifts smaller than this many pixels are dropped.
    #[serde(default = "default_min_divider_delta")]
    pub min_divider_delta: f64,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            resolver: ResolverChoice::default(),
            tie_break: TieBreak::default(),
            min_divider_delta: default_min_divider_delta(),
        }
    }
}

impl ResizeSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.min_divider_delta.is_finite() || self.min_divider_delta < 0.0 {
            issues.push(format!(
                "min_divider_delta must be a non-negative number, got {}",
                self.min_divider_delta
            ));
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if !self.min_divider_delta.is_finite() || self.min_divider_delta < 0.0 {
            self.min_divider_delta = default_min_divider_delta();
            fixes += 1;
        }

        fixes
    }

    pub fn resolver(&self) -> ResolverKind {
        let fallback = DefaultConflictResolver::new(self.tie_break);
        match self.resolver {
            ResolverChoice::Default => fallback.into(),
            ResolverChoice::FullLock => FullLockConflictResolver::new(fallback).into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: ResizeSettings,
}

fn default_min_divider_delta() -> f64 { 0.001 }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> { Ok(toml::from_str(buf)?) }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> { self.settings.validate() }

    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize { self.settings.auto_fix_values() }

    pub fn resolver(&self) -> ResolverKind { self.settings.resolver() }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_file_matches_defaults() {
        let shipped = Config::parse(include_str!("../../resize.default.toml")).unwrap();
        assert_eq!(shipped, Config::default());
    }

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn parses_settings() {
        let config = Config::parse(
            r#"
            [settings]
            resolver = "default"
            tie_break = "second"
            min_divider_delta = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.settings, ResizeSettings {
            resolver: ResolverChoice::Default,
            tie_break: TieBreak::Second,
            min_divider_delta: 0.5,
        });
        assert_eq!(
            config.resolver(),
            ResolverKind::Default(DefaultConflictResolver::new(TieBreak::Second))
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::parse("[settings]\nresolvr = \"default\"\n").is_err());
        assert!(Config::parse("[settings]\ntie_break = \"coin_flip\"\n").is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_empty());

        config.settings.min_divider_delta = -1.0;
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("min_divider_delta"));

        assert_eq!(config.auto_fix_values(), 1);
        assert_eq!(config.settings.min_divider_delta, 0.001);

        config.settings.min_divider_delta = f64::NAN;
        assert_eq!(config.auto_fix_values(), 1);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn config_file_lives_in_its_own_directory() {
        if let Some(path) = config_file() {
            assert!(path.ends_with("dock-resize/resize.toml"), "{}", path.display());
        }
    }

    #[test]
    fn default_resolver_is_full_lock() {
        assert_eq!(Config::default().resolver(), ResolverKind::default());
    }

    #[test]
    fn save_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("resize.toml");
        let mut config = Config::default();
        config.settings.tie_break = TieBreak::First;
        config.save(&path).unwrap();
        assert_eq!(Config::read(&path).unwrap(), config);
    }
}
