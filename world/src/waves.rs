//! Wave counter, completion detection, and statistics.

use glam::Vec2;
use skirmish_core::{CombatConfig, Notification, WaveRewards, WaveStats};

use crate::enemies::EnemyRegistry;

/// Tracks the wave number and reports wave statistics.
///
/// The wave number starts at zero, increases by exactly one per started wave,
/// and only returns to zero through [`reset`](Self::reset).
#[derive(Clone, Debug)]
pub struct WaveController {
    wave: u32,
    field_width: f32,
    enemy_health: u32,
    enemy_damage: u32,
    enemy_speed: f32,
    coins_per_wave: u32,
}

impl WaveController {
    /// Creates a controller that has not started any wave.
    #[must_use]
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            wave: 0,
            field_width: config.field_width,
            enemy_health: config.enemy_health,
            enemy_damage: config.enemy_damage,
            enemy_speed: config.enemy_speed,
            coins_per_wave: config.coins_per_wave,
        }
    }

    /// Current wave number; zero before the first wave starts.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Starts the next wave: spawns it, aims it at the player, and reports stats.
    pub fn start_next_wave(
        &mut self,
        enemies: &mut EnemyRegistry,
        player_position: Vec2,
        out: &mut Vec<Notification>,
    ) -> u32 {
        self.wave = self.wave.saturating_add(1);
        let _ = enemies.spawn_wave(self.wave, self.field_width);
        enemies.set_initial_velocities(player_position);
        self.report_stats(enemies, out);
        self.wave
    }

    /// Reports whether every enemy of the wave is gone.
    #[must_use]
    pub fn is_complete(&self, enemies: &EnemyRegistry) -> bool {
        enemies.is_empty()
    }

    /// Reports the current wave as complete and returns its rewards.
    ///
    /// The wave number is left untouched; the caller starts the next wave.
    pub fn complete_wave(&self, out: &mut Vec<Notification>) -> WaveRewards {
        let rewards = WaveRewards {
            coins: self.wave.saturating_mul(self.coins_per_wave),
        };
        log::info!("wave {} complete, {} coins", self.wave, rewards.coins);
        out.push(Notification::WaveComplete {
            wave_number: self.wave,
            rewards,
        });
        rewards
    }

    /// Statistics for the current wave, read live from the registry.
    #[must_use]
    pub fn stats(&self, enemies: &EnemyRegistry) -> WaveStats {
        WaveStats {
            wave: self.wave,
            enemies_remaining: u32::try_from(enemies.len()).unwrap_or(u32::MAX),
            enemy_health: self.enemy_health,
            enemy_damage: self.enemy_damage,
            enemy_speed: self.enemy_speed,
        }
    }

    /// Recomputes and reports the current statistics.
    pub fn report_stats(&self, enemies: &EnemyRegistry, out: &mut Vec<Notification>) {
        out.push(Notification::WaveStatsUpdated {
            stats: self.stats(enemies),
        });
    }

    /// Returns the counter to zero.
    pub fn reset(&mut self) {
        self.wave = 0;
    }
}
