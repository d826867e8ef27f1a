//! Registry owning every live enemy.

use std::time::Duration;

use glam::Vec2;
use skirmish_core::{Bounds, CombatConfig, EnemyId, EnemyKind, EnemySnapshot, EnemyView};

use crate::formation::ArcFormation;

/// Result of landing a hit on an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageOutcome {
    /// The enemy survived with the provided health.
    Wounded {
        /// Hits the enemy can still take.
        remaining: u32,
    },
    /// The enemy ran out of health and was removed from the registry.
    Destroyed(EnemySnapshot),
    /// No live enemy carries the identifier; nothing changed.
    Missing,
}

impl DamageOutcome {
    /// Reports whether the hit destroyed the enemy.
    #[must_use]
    pub const fn destroyed(&self) -> bool {
        matches!(self, Self::Destroyed(_))
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: Vec2,
    velocity: Vec2,
    health: u32,
}

impl Enemy {
    fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            velocity: self.velocity,
            health: self.health,
        }
    }

    fn pursuit_velocity(&self, target: Vec2, speed: f32) -> Vec2 {
        (target - self.position).normalize_or_zero() * speed
    }
}

/// Owns the live enemies of a combat session.
///
/// Enemies are kept in identifier order, so every scan walks them
/// deterministically and ties resolve toward the oldest enemy.
#[derive(Clone, Debug)]
pub struct EnemyRegistry {
    enemies: Vec<Enemy>,
    next_id: u64,
    formation: ArcFormation,
    spawn_points: Vec<Vec2>,
    speed: f32,
    steering_lerp: f32,
    spawn_health: u32,
    shot_damage: u32,
    half_extent: f32,
}

impl EnemyRegistry {
    /// Creates an empty registry tuned by the provided configuration.
    #[must_use]
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            enemies: Vec::new(),
            next_id: 0,
            formation: ArcFormation::new(config.formation.clone()),
            spawn_points: Vec::new(),
            speed: config.enemy_speed,
            steering_lerp: config.steering_lerp,
            spawn_health: config.enemy_health,
            shot_damage: config.shot_damage,
            half_extent: config.enemy_half_extent,
        }
    }

    /// Replaces every live enemy with a freshly spawned wave.
    ///
    /// Spawned enemies start at rest; call
    /// [`set_initial_velocities`](Self::set_initial_velocities) to aim them.
    pub fn spawn_wave(&mut self, wave: u32, field_width: f32) -> EnemyView {
        self.clear();
        self.spawn_points.clear();
        self.formation
            .layout(wave, field_width, &mut self.spawn_points);

        for &position in &self.spawn_points {
            let id = EnemyId::new(self.next_id);
            self.next_id += 1;
            self.enemies.push(Enemy {
                id,
                kind: EnemyKind::Raider,
                position,
                velocity: Vec2::ZERO,
                health: self.spawn_health,
            });
        }

        log::debug!("wave {wave}: spawned {} enemies", self.enemies.len());
        self.view()
    }

    /// Points every enemy straight at `target` at full speed.
    pub fn set_initial_velocities(&mut self, target: Vec2) {
        let speed = self.speed;
        for enemy in &mut self.enemies {
            enemy.velocity = enemy.pursuit_velocity(target, speed);
        }
    }

    /// Steers every enemy toward `target` and moves it by `dt`.
    ///
    /// The velocity eases toward the pursuit velocity by the steering factor on
    /// each call, which bends enemies onto curved paths instead of snapping
    /// them around.
    pub fn update_movement(&mut self, target: Vec2, dt: Duration) {
        let speed = self.speed;
        let lerp = self.steering_lerp;
        let seconds = dt.as_secs_f32();
        for enemy in &mut self.enemies {
            let desired = enemy.pursuit_velocity(target, speed);
            enemy.velocity = enemy.velocity.lerp(desired, lerp);
            enemy.position += enemy.velocity * seconds;
        }
    }

    /// Finds the enemy closest to `point`, preferring the oldest on ties.
    #[must_use]
    pub fn find_nearest(&self, point: Vec2) -> Option<EnemySnapshot> {
        let mut best: Option<(&Enemy, f32)> = None;
        for enemy in &self.enemies {
            let distance_sq = enemy.position.distance_squared(point);
            match best {
                Some((_, best_distance)) if best_distance <= distance_sq => {}
                _ => best = Some((enemy, distance_sq)),
            }
        }
        best.map(|(enemy, _)| enemy.snapshot())
    }

    /// Lands one shot on the enemy, removing it once its health is spent.
    pub fn damage(&mut self, id: EnemyId) -> DamageOutcome {
        let Some(index) = self.index(id) else {
            return DamageOutcome::Missing;
        };

        let enemy = &mut self.enemies[index];
        enemy.health = enemy.health.saturating_sub(self.shot_damage);
        if enemy.health > 0 {
            return DamageOutcome::Wounded {
                remaining: enemy.health,
            };
        }

        DamageOutcome::Destroyed(self.enemies.remove(index).snapshot())
    }

    /// Removes the enemy regardless of its health.
    ///
    /// Returns `None` when the enemy was already gone.
    pub fn remove(&mut self, id: EnemyId) -> Option<EnemySnapshot> {
        let index = self.index(id)?;
        Some(self.enemies.remove(index).snapshot())
    }

    /// Appends the identifiers of enemies at or beyond `line` to `out`.
    pub fn breaching(&self, line: f32, out: &mut Vec<EnemyId>) {
        out.extend(
            self.enemies
                .iter()
                .filter(|enemy| enemy.position.y >= line)
                .map(|enemy| enemy.id),
        );
    }

    /// Iterator over the hitbox of every live enemy in identifier order.
    pub fn hitboxes(&self) -> impl Iterator<Item = (EnemyId, Bounds)> + '_ {
        self.enemies
            .iter()
            .map(|enemy| (enemy.id, Bounds::centered(enemy.position, self.half_extent)))
    }

    /// Destroys every live enemy.
    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn view(&self) -> EnemyView {
        EnemyView::from_snapshots(self.enemies.iter().map(Enemy::snapshot).collect())
    }

    fn index(&self, id: EnemyId) -> Option<usize> {
        self.enemies
            .binary_search_by_key(&id, |enemy| enemy.id)
            .ok()
    }
}
