#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the skirmish combat engine.
//!
//! This crate defines the message surface that connects hosts, the combat
//! session, and the presentation adapters. Hosts submit [`Command`] values, the
//! session executes them against its authoritative state, and then reports
//! every observable change as a [`Notification`]. Observers never reach into the
//! session; they read immutable views such as [`EnemyView`] and
//! [`ProjectileView`] and react to the notification stream.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod config;
mod ledger;

pub use config::{CombatConfig, ConfigError, FormationConfig};
pub use ledger::{CoinPurse, CurrencyLedger, ResourceKind, ResourceLedger, Stockpile};

/// Lifecycle state of a combat session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatState {
    /// Simulation advances every tick.
    Active,
    /// The player died; ticks are ignored until the session restarts.
    GameOver,
}

/// Commands accepted from the host driving the session.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Toggles automatic firing at the nearest enemy.
    SetAutoShooting {
        /// Whether auto-shooting should be active.
        enabled: bool,
    },
    /// Tears the session down and rebuilds it from wave one.
    Restart,
}

/// Notifications reported by the session to hosts and observers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    /// Aggregate wave statistics changed.
    WaveStatsUpdated {
        /// Latest statistics for the active wave.
        stats: WaveStats,
    },
    /// The ammo stock mirrored from the resource ledger changed.
    AmmoChanged {
        /// Units of ammo left in the resource ledger.
        amount: u32,
    },
    /// A shot was withheld because the resource ledger ran dry.
    OutOfAmmo,
    /// Auto-shooting was switched on or off.
    AutoShootingChanged {
        /// Whether auto-shooting is now active.
        enabled: bool,
    },
    /// The player's health changed.
    PlayerHealthChanged {
        /// Health after the change.
        health: u32,
    },
    /// The player absorbed damage.
    PlayerDamaged {
        /// Damage applied by the hit.
        amount: u32,
        /// Health left after the hit.
        health: u32,
    },
    /// A projectile left the player.
    ProjectileLaunched {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Launch point.
        from: Vec2,
        /// Point the projectile was aimed at.
        to: Vec2,
    },
    /// An enemy was destroyed by a projectile.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Position where the enemy died; floating reward text anchors here.
        position: Vec2,
        /// Currency credited for the kill.
        reward: u32,
    },
    /// An enemy reached the defense line.
    EnemyBreached {
        /// Identifier of the enemy that breached.
        enemy: EnemyId,
        /// Position where the breach happened.
        position: Vec2,
        /// Damage dealt to the player.
        damage: u32,
    },
    /// Every enemy of the wave was killed or breached.
    WaveComplete {
        /// Number of the completed wave.
        wave_number: u32,
        /// Rewards granted for clearing the wave.
        rewards: WaveRewards,
    },
    /// The player died.
    GameOver {
        /// Wave reached when the player died.
        final_score: u32,
    },
    /// The session was rebuilt from scratch.
    SessionRestarted,
}

/// Aggregate statistics describing the active wave.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WaveStats {
    /// Current wave number.
    pub wave: u32,
    /// Enemies still alive in the registry.
    pub enemies_remaining: u32,
    /// Health each enemy spawns with.
    pub enemy_health: u32,
    /// Damage value advertised for enemies.
    pub enemy_damage: u32,
    /// Pursuit speed of enemies in world units per second.
    pub enemy_speed: f32,
}

/// Rewards granted when a wave is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WaveRewards {
    /// Coins awarded for the wave.
    pub coins: u32,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u64);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u64);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Types of enemies that take part in a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Basic raider that walks straight at the player.
    Raider,
}

/// Axis-aligned bounding box expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    min: Vec2,
    max: Vec2,
}

impl Bounds {
    /// Creates a box centred on `center` extending `half_extent` along each axis.
    #[must_use]
    pub fn centered(center: Vec2, half_extent: f32) -> Self {
        let half = Vec2::splat(half_extent.max(0.0));
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Lower corner of the box.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Upper corner of the box.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Reports whether the two boxes overlap. Touching edges do not count.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Centre of the enemy in world units.
    pub position: Vec2,
    /// Current velocity in world units per second.
    pub velocity: Vec2,
    /// Hits left before the enemy is destroyed.
    pub health: u32,
}

/// Read-only snapshot describing every live enemy.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot captured for the provided enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Centre of the projectile in world units.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Time the projectile has been in flight.
    pub age: Duration,
}

/// Read-only snapshot describing every projectile in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Position of the player in world units.
    pub position: Vec2,
    /// Current health.
    pub health: u32,
    /// Health restored on reset.
    pub max_health: u32,
    /// Enemy health removed by each projectile the player fires.
    pub damage: u32,
    /// Minimum time between automatic shots.
    pub shooting_interval: Duration,
    /// Whether the damage flash from a recent hit is still showing.
    pub flashing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_bounds_intersect() {
        let enemy = Bounds::centered(Vec2::new(100.0, 100.0), 16.0);
        let projectile = Bounds::centered(Vec2::new(112.0, 90.0), 4.0);
        assert!(enemy.intersects(&projectile));
        assert!(projectile.intersects(&enemy));
    }

    #[test]
    fn touching_bounds_do_not_intersect() {
        let left = Bounds::centered(Vec2::new(0.0, 0.0), 5.0);
        let right = Bounds::centered(Vec2::new(10.0, 0.0), 5.0);
        assert!(!left.intersects(&right));
    }

    #[test]
    fn negative_half_extent_collapses_to_point() {
        let bounds = Bounds::centered(Vec2::new(3.0, 4.0), -2.0);
        assert_eq!(bounds.min(), bounds.max());
    }

    #[test]
    fn enemy_view_sorts_and_looks_up_by_id() {
        let snapshot = |id: u64, x: f32| EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Raider,
            position: Vec2::new(x, 0.0),
            velocity: Vec2::ZERO,
            health: 1,
        };
        let view = EnemyView::from_snapshots(vec![snapshot(7, 1.0), snapshot(2, 2.0)]);

        let ids: Vec<u64> = view.iter().map(|enemy| enemy.id.get()).collect();
        assert_eq!(ids, vec![2, 7]);
        assert_eq!(
            view.get(EnemyId::new(7)).map(|enemy| enemy.position.x),
            Some(1.0)
        );
        assert!(view.get(EnemyId::new(3)).is_none());
    }

    #[test]
    fn notification_round_trips_through_bincode() {
        let notification = Notification::EnemyKilled {
            enemy: EnemyId::new(4),
            position: Vec2::new(12.5, 80.0),
            reward: 1,
        };
        let bytes = bincode::serialize(&notification).expect("serialize");
        let restored: Notification = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, notification);
    }
}
