//! Tracker owning every projectile in flight.

use std::time::Duration;

use glam::Vec2;
use skirmish_core::{
    Bounds, CombatConfig, EnemyId, ProjectileId, ProjectileSnapshot, ProjectileView,
};

use crate::{
    enemies::EnemyRegistry,
    timers::{TimerId, TimerQueue},
};

/// Projectile that struck an enemy during collision resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Projectile that was consumed by the hit.
    pub projectile: ProjectileId,
    /// Enemy the projectile struck.
    pub enemy: EnemyId,
    /// Position of the projectile at impact.
    pub position: Vec2,
}

#[derive(Clone, Debug)]
struct Projectile {
    id: ProjectileId,
    position: Vec2,
    velocity: Vec2,
    age: Duration,
    expiry: TimerId,
}

impl Projectile {
    fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            age: self.age,
        }
    }
}

/// Owns projectiles from launch until they hit an enemy or expire.
///
/// Each projectile is removed exactly once: a collision cancels its pending
/// expiry, and an expiry for a projectile that is already gone is ignored.
#[derive(Clone, Debug)]
pub struct ProjectileTracker {
    projectiles: Vec<Projectile>,
    next_id: u64,
    expiries: TimerQueue<ProjectileId>,
    expired_scratch: Vec<ProjectileId>,
    speed: f32,
    lifetime: Duration,
    half_extent: f32,
}

impl ProjectileTracker {
    /// Creates an empty tracker tuned by the provided configuration.
    #[must_use]
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            projectiles: Vec::new(),
            next_id: 0,
            expiries: TimerQueue::new(),
            expired_scratch: Vec::new(),
            speed: config.projectile_speed,
            lifetime: config.projectile_lifetime(),
            half_extent: config.projectile_half_extent,
        }
    }

    /// Fires a projectile from `source` toward `target` and schedules its expiry.
    pub fn launch(&mut self, source: Vec2, target: Vec2) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id += 1;
        let velocity = (target - source).normalize_or_zero() * self.speed;
        let expiry = self.expiries.schedule(self.lifetime, id);
        self.projectiles.push(Projectile {
            id,
            position: source,
            velocity,
            age: Duration::ZERO,
            expiry,
        });
        log::debug!("projectile {} launched toward {target}", id.get());
        id
    }

    /// Moves every projectile by `dt` and removes those whose lifetime ran out.
    ///
    /// Identifiers of expired projectiles are appended to `expired`.
    pub fn advance(&mut self, dt: Duration, expired: &mut Vec<ProjectileId>) {
        let seconds = dt.as_secs_f32();
        for projectile in &mut self.projectiles {
            projectile.position += projectile.velocity * seconds;
            projectile.age = projectile.age.saturating_add(dt);
        }

        self.expired_scratch.clear();
        self.expiries.advance(dt, &mut self.expired_scratch);
        for &id in &self.expired_scratch {
            if let Some(index) = self.index(id) {
                let _ = self.projectiles.remove(index);
                log::debug!("projectile {} expired", id.get());
                expired.push(id);
            }
        }
    }

    /// Resolves overlaps between projectiles and enemies.
    ///
    /// Each projectile is tested against the enemies in identifier order and
    /// resolves against the first one it overlaps; the projectile is removed
    /// and a single [`Hit`] is appended to `out`. Enemies are not touched, so
    /// two projectiles may report the same enemy in one pass and the caller
    /// decides what the second hit means.
    pub fn check_collisions(&mut self, enemies: &EnemyRegistry, out: &mut Vec<Hit>) {
        if self.projectiles.is_empty() || enemies.is_empty() {
            return;
        }

        let half_extent = self.half_extent;
        let expiries = &mut self.expiries;
        self.projectiles.retain(|projectile| {
            let bounds = Bounds::centered(projectile.position, half_extent);
            let struck = enemies
                .hitboxes()
                .find(|(_, hitbox)| hitbox.intersects(&bounds))
                .map(|(enemy, _)| enemy);

            match struck {
                Some(enemy) => {
                    let _ = expiries.cancel(projectile.expiry);
                    out.push(Hit {
                        projectile: projectile.id,
                        enemy,
                        position: projectile.position,
                    });
                    false
                }
                None => true,
            }
        });
    }

    /// Destroys every projectile and drops their pending expiries.
    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.expiries.clear();
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Reports whether nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Number of expiries still scheduled.
    #[must_use]
    pub fn pending_expiries(&self) -> usize {
        self.expiries.len()
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn view(&self) -> ProjectileView {
        ProjectileView::from_snapshots(self.projectiles.iter().map(Projectile::snapshot).collect())
    }

    fn index(&self, id: ProjectileId) -> Option<usize> {
        self.projectiles
            .binary_search_by_key(&id, |projectile| projectile.id)
            .ok()
    }
}
