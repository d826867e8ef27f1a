//! Tuning knobs for a combat session.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ResourceKind;

/// Every adjustable constant of the combat simulation.
///
/// Defaults reproduce the reference balance: an 800x600 field with the player
/// parked near the bottom edge, one-hit raiders walking at 50 units per second,
/// and one shot per second.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Width of the playfield in world units.
    pub field_width: f32,
    /// Height of the playfield in world units.
    pub field_height: f32,
    /// Position of the player; enemies pursue this point.
    pub player_position: Vec2,
    /// Health the player starts with and is restored to on restart.
    pub max_health: u32,
    /// Distance above the player at which an enemy counts as breaching.
    pub breach_offset: f32,
    /// Damage dealt to the player by each breach.
    pub breach_damage: u32,
    /// Pursuit speed of enemies in world units per second.
    pub enemy_speed: f32,
    /// Fraction of the gap to the desired velocity closed on every tick.
    pub steering_lerp: f32,
    /// Health each enemy spawns with.
    pub enemy_health: u32,
    /// Damage value advertised in wave statistics.
    pub enemy_damage: u32,
    /// Half of the enemy hitbox edge length.
    pub enemy_half_extent: f32,
    /// Projectile speed in world units per second.
    pub projectile_speed: f32,
    /// Milliseconds a projectile survives without hitting anything.
    pub projectile_lifetime_ms: u64,
    /// Half of the projectile hitbox edge length.
    pub projectile_half_extent: f32,
    /// Enemy health removed by each projectile hit.
    pub shot_damage: u32,
    /// Milliseconds between automatic shots.
    pub fire_cooldown_ms: u64,
    /// Currency credited for each kill.
    pub kill_reward: u32,
    /// Coins granted per wave number when a wave is cleared.
    pub coins_per_wave: u32,
    /// Milliseconds the player keeps flashing after a hit.
    pub damage_flash_ms: u64,
    /// Resource consumed as ammo.
    pub ammo_resource: ResourceKind,
    /// Layout of freshly spawned waves.
    pub formation: FormationConfig,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            player_position: Vec2::new(400.0, 550.0),
            max_health: 100,
            breach_offset: 32.0,
            breach_damage: 10,
            enemy_speed: 50.0,
            steering_lerp: 0.05,
            enemy_health: 1,
            enemy_damage: 1,
            enemy_half_extent: 16.0,
            projectile_speed: 400.0,
            projectile_lifetime_ms: 2_000,
            projectile_half_extent: 4.0,
            shot_damage: 1,
            fire_cooldown_ms: 1_000,
            kill_reward: 1,
            coins_per_wave: 10,
            damage_flash_ms: 100,
            ammo_resource: ResourceKind::Stone,
            formation: FormationConfig::default(),
        }
    }
}

impl CombatConfig {
    /// Interval between automatic shots.
    #[must_use]
    pub const fn fire_cooldown(&self) -> Duration {
        Duration::from_millis(self.fire_cooldown_ms)
    }

    /// Lifetime of an uncollided projectile.
    #[must_use]
    pub const fn projectile_lifetime(&self) -> Duration {
        Duration::from_millis(self.projectile_lifetime_ms)
    }

    /// Duration of the player's damage flash.
    #[must_use]
    pub const fn damage_flash(&self) -> Duration {
        Duration::from_millis(self.damage_flash_ms)
    }

    /// Vertical coordinate at or beyond which an enemy breaches.
    #[must_use]
    pub fn breach_line(&self) -> f32 {
        self.player_position.y - self.breach_offset
    }

    /// Checks that the configuration describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_width > 0.0) || !(self.field_height > 0.0) {
            return Err(ConfigError::EmptyField {
                width: self.field_width,
                height: self.field_height,
            });
        }

        let player = self.player_position;
        if !(0.0..=self.field_width).contains(&player.x)
            || !(0.0..=self.field_height).contains(&player.y)
        {
            return Err(ConfigError::PlayerOutsideField {
                x: player.x,
                y: player.y,
            });
        }

        if self.max_health == 0 {
            return Err(ConfigError::ZeroMaxHealth);
        }

        positive("breach_offset", self.breach_offset)?;
        positive("enemy_speed", self.enemy_speed)?;
        positive("projectile_speed", self.projectile_speed)?;
        positive("enemy_half_extent", self.enemy_half_extent)?;
        positive("projectile_half_extent", self.projectile_half_extent)?;

        if !(self.steering_lerp > 0.0 && self.steering_lerp <= 1.0) {
            return Err(ConfigError::SteeringLerpOutOfRange {
                factor: self.steering_lerp,
            });
        }

        if self.enemy_health == 0 {
            return Err(ConfigError::ZeroEnemyHealth);
        }

        if self.shot_damage == 0 {
            return Err(ConfigError::ZeroShotDamage);
        }

        if self.fire_cooldown_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                name: "fire_cooldown_ms",
            });
        }

        if self.projectile_lifetime_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                name: "projectile_lifetime_ms",
            });
        }

        self.formation.validate()
    }
}

/// Parameters of the parabolic arc new waves spawn along.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    /// Enemies in the first wave.
    pub base_count: u32,
    /// Extra enemies added per wave.
    pub count_step: u32,
    /// Upper bound on enemies per wave.
    pub max_count: u32,
    /// Vertical coordinate of the arc's centre.
    pub min_y: f32,
    /// Height the arc rises to at its outer ends.
    pub arc_height: f32,
    /// Fraction of the field width covered by the arc.
    pub arc_width_ratio: f32,
    /// Maximum random vertical offset applied to each spawn.
    pub stagger: f32,
    /// Seed feeding the stagger generator.
    pub seed: u64,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            base_count: 3,
            count_step: 2,
            max_count: 20,
            min_y: 50.0,
            arc_height: 75.0,
            arc_width_ratio: 0.8,
            stagger: 40.0,
            seed: 0x5eed_0f_a4c5,
        }
    }
}

impl FormationConfig {
    /// Number of enemies spawned for the provided wave.
    ///
    /// Waves are numbered from one; wave zero is treated like wave one.
    #[must_use]
    pub fn enemy_count(&self, wave: u32) -> u32 {
        let growth = wave.saturating_sub(1).saturating_mul(self.count_step);
        self.base_count.saturating_add(growth).min(self.max_count)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_count == 0 || self.base_count == 0 {
            return Err(ConfigError::EmptyFormation);
        }

        finite("formation.min_y", self.min_y)?;
        finite("formation.arc_height", self.arc_height)?;

        if !(self.arc_width_ratio > 0.0 && self.arc_width_ratio <= 1.0) {
            return Err(ConfigError::ArcWidthOutOfRange {
                ratio: self.arc_width_ratio,
            });
        }

        if !(self.stagger >= 0.0) {
            return Err(ConfigError::NegativeStagger {
                stagger: self.stagger,
            });
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

/// Reasons a [`CombatConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The playfield has no area.
    #[error("playfield must have positive dimensions (received {width}x{height})")]
    EmptyField {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// The player sits outside the playfield.
    #[error("player position ({x}, {y}) lies outside the playfield")]
    PlayerOutsideField {
        /// Configured horizontal coordinate.
        x: f32,
        /// Configured vertical coordinate.
        y: f32,
    },
    /// The player would start dead.
    #[error("max_health must be positive")]
    ZeroMaxHealth,
    /// Enemies would die before being hit.
    #[error("enemy_health must be positive")]
    ZeroEnemyHealth,
    /// Projectiles would never wear enemies down.
    #[error("shot_damage must be positive")]
    ZeroShotDamage,
    /// A coordinate is NaN or infinite.
    #[error("{name} must be finite (received {value})")]
    NonFinite {
        /// Name of the offending field.
        name: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// A distance, speed, or size that must be positive is not.
    #[error("{name} must be positive (received {value})")]
    NonPositive {
        /// Name of the offending field.
        name: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// Steering would never converge or would overshoot.
    #[error("steering_lerp must lie in (0, 1] (received {factor})")]
    SteeringLerpOutOfRange {
        /// Value that failed validation.
        factor: f32,
    },
    /// A timer interval is zero.
    #[error("{name} must be positive")]
    ZeroDuration {
        /// Name of the offending field.
        name: &'static str,
    },
    /// Waves would spawn no enemies.
    #[error("formation must spawn at least one enemy per wave")]
    EmptyFormation,
    /// The arc would spill beyond the field.
    #[error("arc_width_ratio must lie in (0, 1] (received {ratio})")]
    ArcWidthOutOfRange {
        /// Value that failed validation.
        ratio: f32,
    },
    /// The stagger range is inverted.
    #[error("stagger must not be negative (received {stagger})")]
    NegativeStagger {
        /// Value that failed validation.
        stagger: f32,
    },
}
