//! Player health and hit feedback.

use std::time::Duration;

use glam::Vec2;
use skirmish_core::{CombatConfig, Notification, PlayerSnapshot};

use crate::timers::{TimerId, TimerQueue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FlashEnded;

/// Owns the player's health and position.
///
/// Every health change, including the starting value, is reported as
/// [`Notification::PlayerHealthChanged`] so observers never need to poll.
#[derive(Clone, Debug)]
pub struct PlayerAgent {
    position: Vec2,
    health: u32,
    max_health: u32,
    damage: u32,
    shooting_interval: Duration,
    flash_duration: Duration,
    flash: Option<TimerId>,
    effects: TimerQueue<FlashEnded>,
    ended_scratch: Vec<FlashEnded>,
}

impl PlayerAgent {
    /// Creates a player at full health and reports that health.
    pub fn new(config: &CombatConfig, out: &mut Vec<Notification>) -> Self {
        let agent = Self {
            position: config.player_position,
            health: config.max_health,
            max_health: config.max_health,
            damage: config.shot_damage,
            shooting_interval: config.fire_cooldown(),
            flash_duration: config.damage_flash(),
            flash: None,
            effects: TimerQueue::new(),
            ended_scratch: Vec::new(),
        };
        agent.report_health(out);
        agent
    }

    /// Subtracts `amount` from health and reports whether the player died.
    ///
    /// Health bottoms out at zero, and zero counts as dead.
    pub fn apply_damage(&mut self, amount: u32, out: &mut Vec<Notification>) -> bool {
        self.health = self.health.saturating_sub(amount);
        out.push(Notification::PlayerDamaged {
            amount,
            health: self.health,
        });
        self.report_health(out);
        self.start_flash();
        self.is_dead()
    }

    /// Restores full health and reports it.
    pub fn reset_health(&mut self, out: &mut Vec<Notification>) {
        self.health = self.max_health;
        self.report_health(out);
    }

    /// Advances hit feedback timers.
    pub fn advance(&mut self, dt: Duration) {
        self.ended_scratch.clear();
        self.effects.advance(dt, &mut self.ended_scratch);
        if !self.ended_scratch.is_empty() {
            self.flash = None;
        }
    }

    /// Drops pending hit feedback.
    pub fn clear_effects(&mut self) {
        self.effects.clear();
        self.flash = None;
    }

    /// Reports whether health has run out.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Position enemies pursue and projectiles launch from.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Captures the player's observable state.
    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            damage: self.damage,
            shooting_interval: self.shooting_interval,
            flashing: self.flash.is_some(),
        }
    }

    fn start_flash(&mut self) {
        if self.flash_duration.is_zero() {
            return;
        }
        if let Some(previous) = self.flash.take() {
            let _ = self.effects.cancel(previous);
        }
        self.flash = Some(self.effects.schedule(self.flash_duration, FlashEnded));
    }

    fn report_health(&self, out: &mut Vec<Notification>) {
        out.push(Notification::PlayerHealthChanged {
            health: self.health,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_reports_initial_health() {
        let mut out = Vec::new();
        let player = PlayerAgent::new(&CombatConfig::default(), &mut out);

        assert_eq!(player.health(), 100);
        assert_eq!(out, vec![Notification::PlayerHealthChanged { health: 100 }]);
    }

    #[test]
    fn snapshot_exposes_shot_damage_and_interval() {
        let config = CombatConfig {
            shot_damage: 2,
            fire_cooldown_ms: 250,
            ..CombatConfig::default()
        };
        let player = PlayerAgent::new(&config, &mut Vec::new());

        let snapshot = player.snapshot();
        assert_eq!(snapshot.damage, 2);
        assert_eq!(snapshot.shooting_interval, Duration::from_millis(250));
        assert_eq!(snapshot.max_health, 100);
    }

    #[test]
    fn damage_reports_new_health() {
        let mut out = Vec::new();
        let mut player = PlayerAgent::new(&CombatConfig::default(), &mut out);
        out.clear();

        let died = player.apply_damage(10, &mut out);

        assert!(!died);
        assert_eq!(
            out,
            vec![
                Notification::PlayerDamaged {
                    amount: 10,
                    health: 90
                },
                Notification::PlayerHealthChanged { health: 90 },
            ]
        );
    }

    #[test]
    fn overkill_clamps_at_zero_and_dies() {
        let mut out = Vec::new();
        let mut player = PlayerAgent::new(&CombatConfig::default(), &mut out);

        assert!(player.apply_damage(250, &mut out));
        assert_eq!(player.health(), 0);
        assert!(player.is_dead());
    }

    #[test]
    fn reset_restores_max_health() {
        let mut out = Vec::new();
        let mut player = PlayerAgent::new(&CombatConfig::default(), &mut out);
        let _ = player.apply_damage(40, &mut out);
        out.clear();

        player.reset_health(&mut out);

        assert_eq!(player.health(), 100);
        assert_eq!(out, vec![Notification::PlayerHealthChanged { health: 100 }]);
    }

    #[test]
    fn flash_ends_after_configured_duration() {
        let mut out = Vec::new();
        let mut player = PlayerAgent::new(&CombatConfig::default(), &mut out);
        let _ = player.apply_damage(10, &mut out);
        assert!(player.snapshot().flashing);

        player.advance(Duration::from_millis(60));
        let _ = player.apply_damage(10, &mut out);
        player.advance(Duration::from_millis(60));
        assert!(player.snapshot().flashing, "second hit restarts the flash");

        player.advance(Duration::from_millis(40));
        assert!(!player.snapshot().flashing);
    }
}
