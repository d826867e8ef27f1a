#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides when the player fires at the nearest enemy.

use std::time::Duration;

use glam::Vec2;
use skirmish_core::{EnemyId, EnemySnapshot};

/// Outcome of one auto-fire evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FireDecision {
    /// Nothing to do this tick.
    Hold,
    /// Spend one unit of ammo and launch a projectile at the target.
    Fire {
        /// Enemy being shot at.
        target: EnemyId,
        /// Position the projectile is aimed at.
        at: Vec2,
    },
    /// A shot was due but the stock is empty; auto-shooting switched itself off.
    OutOfAmmo,
}

/// Cooldown clock and toggle for automatic firing.
///
/// The cooldown starts ready, so enabling auto-shooting fires on the next
/// evaluation. It only restarts after an actual shot; a due shot with no
/// enemy on the field stays due.
#[derive(Clone, Debug)]
pub struct AutoFire {
    interval: Duration,
    ready_in: Duration,
    enabled: bool,
}

impl AutoFire {
    /// Creates a disabled system that fires at most once per `interval`.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            ready_in: Duration::ZERO,
            enabled: false,
        }
    }

    /// Reports whether auto-shooting is on.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Time left until the next shot may be fired.
    #[must_use]
    pub const fn ready_in(&self) -> Duration {
        self.ready_in
    }

    /// Switches auto-shooting on or off and reports whether the flag changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.enabled != enabled;
        self.enabled = enabled;
        changed
    }

    /// Disables auto-shooting and makes the cooldown ready again.
    pub fn reset(&mut self) {
        self.enabled = false;
        self.ready_in = Duration::ZERO;
    }

    /// Advances the cooldown by `dt` and decides whether to fire.
    ///
    /// `nearest` is the enemy closest to the player and `ammo` the stock the
    /// shot would draw from.
    pub fn handle(
        &mut self,
        dt: Duration,
        nearest: Option<&EnemySnapshot>,
        ammo: u32,
    ) -> FireDecision {
        self.ready_in = self.ready_in.saturating_sub(dt);

        if !self.enabled || !self.ready_in.is_zero() {
            return FireDecision::Hold;
        }

        let Some(target) = nearest else {
            return FireDecision::Hold;
        };

        if ammo == 0 {
            self.enabled = false;
            return FireDecision::OutOfAmmo;
        }

        self.ready_in = self.interval;
        FireDecision::Fire {
            target: target.id,
            at: target.position,
        }
    }
}
