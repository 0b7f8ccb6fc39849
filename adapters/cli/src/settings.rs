use std::{fs, path::Path};

use anyhow::{Context, Result};
use trial_grounds_core::SimulationConfig;

/// Loads a configuration file, or the defaults when no path is given.
///
/// Missing fields in the file keep their default values.
pub(crate) fn load(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid configuration {}", path.display()))
}

fn parse(contents: &str) -> Result<SimulationConfig> {
    let config: SimulationConfig =
        serde_json::from_str(contents).context("configuration is not valid JSON")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_path_uses_defaults() {
        let config = load(None).expect("defaults");
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn partial_file_overrides_selected_fields() {
        let config = parse(r#"{ "roster": { "survivors": 2 }, "speed_multiplier": 2.0 }"#)
            .expect("partial config");
        assert_eq!(config.roster.survivors, 2);
        assert_eq!(config.roster.generators, 7);
        assert_eq!(config.speed_multiplier, 2.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let error = parse(r#"{ "killer": { "radius": -1.0 } }"#).expect_err("negative radius");
        assert!(error.to_string().contains("killer.radius"), "{error:#}");
    }
}
