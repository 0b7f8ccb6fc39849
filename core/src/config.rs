//! Static configuration for a simulation run.
//!
//! Defaults describe a 600 x 600 pixel arena to the right of a 100 pixel
//! status bar at six pixels per meter, holding seven generators, four
//! survivors and one killer.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AgentKind;

/// Errors raised while validating configuration before a world is built.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A dimension, radius, speed or scale that must be positive was not.
    #[error("configuration value `{field}` must be a positive finite number, got {value}")]
    NotPositive {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f32,
    },
    /// A value that must be finite was NaN or infinite.
    #[error("configuration value `{field}` must be finite, got {value}")]
    NotFinite {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f32,
    },
    /// A repair slot side index outside `1..=4` was requested.
    #[error("unknown repair slot side index {0}")]
    UnknownSlotSide(u8),
}

/// Playable rectangle in screen space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Left edge of the playable area.
    pub origin_x: f32,
    /// Top edge of the playable area.
    pub origin_y: f32,
    /// Width of the playable area.
    pub width: f32,
    /// Height of the playable area.
    pub height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            origin_x: 100.0,
            origin_y: 0.0,
            width: 600.0,
            height: 600.0,
        }
    }
}

/// Generator footprint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Half of the generator width.
    pub half_width: f32,
    /// Half of the generator height.
    pub half_height: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            half_width: 12.5,
            half_height: 10.0,
        }
    }
}

/// Survivor body and movement tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivorConfig {
    /// Body radius in pixels.
    pub radius: f32,
    /// Base speed in meters per second.
    pub base_speed: f32,
}

impl Default for SurvivorConfig {
    fn default() -> Self {
        Self {
            radius: 8.5,
            base_speed: 4.0,
        }
    }
}

/// Killer body and movement tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KillerConfig {
    /// Body radius in pixels.
    pub radius: f32,
    /// Base speed in meters per second.
    pub base_speed: f32,
    /// Default threat radius in meters.
    pub threat_radius_meters: f32,
}

impl Default for KillerConfig {
    fn default() -> Self {
        Self {
            radius: 9.5,
            base_speed: 4.6,
            threat_radius_meters: 32.0,
        }
    }
}

/// Effects applied when a killer lands a basic attack.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitConfig {
    /// Length of the hurt-animation window in milliseconds.
    pub hurt_duration_ms: u64,
    /// Additive change to the survivor speed modifier, reverted after
    /// `survivor_recovery_ms`.
    pub survivor_speed_delta: f32,
    /// Delay before the survivor modifier change is reverted.
    pub survivor_recovery_ms: u64,
    /// Additive change to the killer speed modifier, reverted after
    /// `killer_recovery_ms`.
    pub killer_speed_delta: f32,
    /// Delay before the killer modifier change is reverted.
    pub killer_recovery_ms: u64,
}

impl HitConfig {
    /// Hurt-animation window length.
    #[must_use]
    pub const fn hurt_duration(&self) -> Duration {
        Duration::from_millis(self.hurt_duration_ms)
    }

    /// Delay before the survivor speed change reverts.
    #[must_use]
    pub const fn survivor_recovery(&self) -> Duration {
        Duration::from_millis(self.survivor_recovery_ms)
    }

    /// Delay before the killer speed change reverts.
    #[must_use]
    pub const fn killer_recovery(&self) -> Duration {
        Duration::from_millis(self.killer_recovery_ms)
    }
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            hurt_duration_ms: 1_000,
            survivor_speed_delta: -0.5,
            survivor_recovery_ms: 1_800,
            killer_speed_delta: -0.5,
            killer_recovery_ms: 2_700,
        }
    }
}

/// Spawn placement tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Minimum clearance kept around every placed element.
    pub clearance: f32,
    /// Candidate draws allowed per element before placement gives up.
    pub max_attempts: u32,
    /// Seed for the placement random number generator.
    pub seed: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            clearance: 12.5,
            max_attempts: 10_000,
            seed: 0x5eed_d00d_2b1f_7a43,
        }
    }
}

/// Number of entities created at world setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Generators placed in the arena.
    pub generators: u32,
    /// Survivors placed in the arena.
    pub survivors: u32,
    /// Killers placed in the arena.
    pub killers: u32,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            generators: 7,
            survivors: 4,
            killers: 1,
        }
    }
}

/// Complete configuration, static for a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Playable arena.
    pub arena: ArenaConfig,
    /// Generator footprint.
    pub generator: GeneratorConfig,
    /// Survivor tuning.
    pub survivor: SurvivorConfig,
    /// Killer tuning.
    pub killer: KillerConfig,
    /// Scale from meters to pixels.
    pub pixels_per_meter: f32,
    /// Global multiplier applied to every speed.
    pub speed_multiplier: f32,
    /// Fraction of a killer threat radius under which survivors flee.
    pub escape_threshold: f32,
    /// Delay before any behavior starts, in milliseconds.
    pub cinematic_delay_ms: u64,
    /// Hit effects.
    pub hit: HitConfig,
    /// Spawn placement.
    pub spawn: SpawnConfig,
    /// Entity counts.
    pub roster: RosterConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            generator: GeneratorConfig::default(),
            survivor: SurvivorConfig::default(),
            killer: KillerConfig::default(),
            pixels_per_meter: 6.0,
            speed_multiplier: 1.0,
            escape_threshold: 0.25,
            cinematic_delay_ms: 3_000,
            hit: HitConfig::default(),
            spawn: SpawnConfig::default(),
            roster: RosterConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Checks that every geometric and kinematic value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("arena.width", self.arena.width),
            ("arena.height", self.arena.height),
            ("generator.half_width", self.generator.half_width),
            ("generator.half_height", self.generator.half_height),
            ("survivor.radius", self.survivor.radius),
            ("survivor.base_speed", self.survivor.base_speed),
            ("killer.radius", self.killer.radius),
            ("killer.base_speed", self.killer.base_speed),
            ("killer.threat_radius_meters", self.killer.threat_radius_meters),
            ("pixels_per_meter", self.pixels_per_meter),
            ("speed_multiplier", self.speed_multiplier),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let finite = [
            ("arena.origin_x", self.arena.origin_x),
            ("arena.origin_y", self.arena.origin_y),
            ("escape_threshold", self.escape_threshold),
            ("hit.survivor_speed_delta", self.hit.survivor_speed_delta),
            ("hit.killer_speed_delta", self.hit.killer_speed_delta),
            ("spawn.clearance", self.spawn.clearance),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        Ok(())
    }

    /// Delay before behavior starts.
    #[must_use]
    pub const fn cinematic_delay(&self) -> Duration {
        Duration::from_millis(self.cinematic_delay_ms)
    }

    /// Base speed of the agent kind in meters per second.
    #[must_use]
    pub const fn base_speed(&self, kind: AgentKind) -> f32 {
        match kind {
            AgentKind::Survivor => self.survivor.base_speed,
            AgentKind::Killer => self.killer.base_speed,
        }
    }

    /// Body radius of the agent kind in pixels.
    #[must_use]
    pub const fn radius(&self, kind: AgentKind) -> f32 {
        match kind {
            AgentKind::Survivor => self.survivor.radius,
            AgentKind::Killer => self.killer.radius,
        }
    }

    /// Factor converting meters per second into pixels per second, including
    /// the global speed multiplier.
    #[must_use]
    pub fn speed_scale(&self) -> f32 {
        self.pixels_per_meter * self.speed_multiplier
    }

    /// Default killer threat radius in pixels.
    #[must_use]
    pub fn killer_threat_radius(&self) -> f32 {
        self.killer.threat_radius_meters * self.pixels_per_meter
    }

    /// Distance under which a survivor flees a killer of the given threat radius.
    #[must_use]
    pub fn escape_distance(&self, threat_radius: f32) -> f32 {
        self.escape_threshold * threat_radius
    }

    /// Center distance at or under which a killer lands a hit on a survivor.
    #[must_use]
    pub fn contact_radius(&self) -> f32 {
        self.survivor.radius + self.killer.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn default_escape_distance_is_a_quarter_of_threat_radius() {
        let config = SimulationConfig::default();
        let threat = config.killer_threat_radius();
        assert!((threat - 192.0).abs() < f32::EPSILON);
        assert!((config.escape_distance(threat) - 48.0).abs() < f32::EPSILON);
    }

    #[test]
    fn base_speed_dispatches_on_agent_kind() {
        let config = SimulationConfig::default();
        assert!((config.base_speed(AgentKind::Survivor) - 4.0).abs() < f32::EPSILON);
        assert!((config.base_speed(AgentKind::Killer) - 4.6).abs() < f32::EPSILON);
        assert!((config.contact_radius() - 18.0).abs() < f32::EPSILON);
    }

    #[test]
    fn validate_rejects_non_positive_radius() {
        let mut config = SimulationConfig::default();
        config.survivor.radius = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "survivor.radius",
                value: 0.0,
            })
        );
    }

    #[test]
    fn validate_rejects_nan_threshold() {
        let mut config = SimulationConfig::default();
        config.escape_threshold = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite {
                field: "escape_threshold",
                ..
            })
        ));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{ "escape_threshold": 0.5, "roster": { "survivors": 2 } }"#;
        let config: SimulationConfig = serde_json::from_str(json).expect("parse");
        assert!((config.escape_threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.roster.survivors, 2);
        assert_eq!(config.roster.generators, 7);
        assert_eq!(config.hit, HitConfig::default());
    }
}
