//! Loading combat tuning from TOML.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use skirmish_core::CombatConfig;

/// Reads the combat configuration, falling back to defaults without a file.
///
/// Keys missing from the file keep their default values.
pub(crate) fn load(path: Option<&Path>) -> Result<CombatConfig> {
    let Some(path) = path else {
        return Ok(CombatConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read combat config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid combat config in {}", path.display()))
}

fn parse(contents: &str) -> Result<CombatConfig> {
    let config: CombatConfig =
        toml::from_str(contents).context("failed to parse combat config toml contents")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::ConfigError;

    #[test]
    fn missing_path_uses_defaults() {
        let config = load(None).expect("defaults");
        assert_eq!(config, CombatConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse(
            r#"
            breach_damage = 25
            fire_cooldown_ms = 500

            [formation]
            seed = 99
            stagger = 0.0
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.breach_damage, 25);
        assert_eq!(config.fire_cooldown_ms, 500);
        assert_eq!(config.formation.seed, 99);
        assert_eq!(config.formation.stagger, 0.0);
        assert_eq!(config.max_health, 100);
        assert_eq!(config.formation.max_count, 20);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let error = parse("max_health = 0").expect_err("zero health");

        assert_eq!(
            error.downcast_ref::<ConfigError>(),
            Some(&ConfigError::ZeroMaxHealth)
        );
    }

    #[test]
    fn malformed_toml_reports_parse_failure() {
        let error = parse("breach_damage = \"lots\"").expect_err("wrong type");

        assert!(error.to_string().contains("toml"));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let error = load(Some(Path::new("/definitely/not/here.toml"))).expect_err("missing");

        assert!(format!("{error:#}").contains("/definitely/not/here.toml"));
    }
}
