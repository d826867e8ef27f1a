#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combat orchestrator sequencing the world components every tick.
//!
//! A [`CombatSession`] owns one encounter from scene creation until restart.
//! Hosts feed it [`Command`] values and receive the resulting
//! [`Notification`] stream; the resource and currency stores are borrowed
//! capabilities injected at construction.
//!
//! Each tick while [`CombatState::Active`] runs, in order:
//!
//! 1. hit feedback timers and projectile flight (including expiry);
//! 2. auto-fire at the nearest enemy, gated by the cooldown and the ammo stock;
//! 3. enemy steering toward the player;
//! 4. breaches at the defense line, which may end the session;
//! 5. projectile collisions and kill rewards;
//! 6. wave completion followed immediately by the next wave.

use std::{mem, time::Duration};

use skirmish_core::{
    CombatConfig, CombatState, Command, ConfigError, CurrencyLedger, EnemyId, EnemyView,
    Notification, PlayerSnapshot, ProjectileId, ProjectileView, ResourceLedger, WaveStats,
};
use skirmish_system_auto_fire::{AutoFire, FireDecision};
use skirmish_world::{
    DamageOutcome, EnemyRegistry, Hit, PlayerAgent, ProjectileTracker, WaveController,
};

/// One combat encounter and the state machine around it.
#[derive(Debug)]
pub struct CombatSession<R, C> {
    config: CombatConfig,
    resources: R,
    currency: C,
    state: CombatState,
    elapsed: Duration,
    enemies: EnemyRegistry,
    projectiles: ProjectileTracker,
    player: PlayerAgent,
    waves: WaveController,
    auto_fire: AutoFire,
    expired_scratch: Vec<ProjectileId>,
    breach_scratch: Vec<EnemyId>,
    hit_scratch: Vec<Hit>,
}

impl<R, C> CombatSession<R, C>
where
    R: ResourceLedger,
    C: CurrencyLedger,
{
    /// Validates `config`, builds the session, and starts wave one.
    ///
    /// The initial player health, wave statistics, and ammo stock are appended
    /// to `out`.
    pub fn start(
        config: CombatConfig,
        resources: R,
        currency: C,
        out: &mut Vec<Notification>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let player = PlayerAgent::new(&config, out);
        let mut session = Self {
            enemies: EnemyRegistry::new(&config),
            projectiles: ProjectileTracker::new(&config),
            waves: WaveController::new(&config),
            auto_fire: AutoFire::new(config.fire_cooldown()),
            player,
            config,
            resources,
            currency,
            state: CombatState::Active,
            elapsed: Duration::ZERO,
            expired_scratch: Vec::new(),
            breach_scratch: Vec::new(),
            hit_scratch: Vec::new(),
        };
        session.begin(out);
        Ok(session)
    }

    /// Executes a host command.
    pub fn apply(&mut self, command: Command, out: &mut Vec<Notification>) {
        match command {
            Command::Tick { dt } => self.tick(dt, out),
            Command::SetAutoShooting { enabled } => self.set_auto_shooting(enabled, out),
            Command::Restart => self.restart(out),
        }
    }

    /// Advances the simulation by `dt`; does nothing after game over.
    pub fn tick(&mut self, dt: Duration, out: &mut Vec<Notification>) {
        if self.state == CombatState::GameOver {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        log::trace!(
            "tick at {:?}: {} enemies, {} projectiles",
            self.elapsed,
            self.enemies.len(),
            self.projectiles.len()
        );

        self.player.advance(dt);
        self.expired_scratch.clear();
        self.projectiles.advance(dt, &mut self.expired_scratch);
        if !self.expired_scratch.is_empty() {
            log::trace!("{} projectiles expired", self.expired_scratch.len());
        }

        self.resolve_auto_fire(dt, out);

        self.enemies.update_movement(self.player.position(), dt);

        if self.resolve_breaches(out) {
            self.enter_game_over(out);
            return;
        }

        self.resolve_collisions(out);

        if self.waves.is_complete(&self.enemies) {
            let rewards = self.waves.complete_wave(out);
            self.currency.add(rewards.coins);
            let _ = self
                .waves
                .start_next_wave(&mut self.enemies, self.player.position(), out);
        }
    }

    /// Toggles auto-shooting; ignored after game over.
    pub fn set_auto_shooting(&mut self, enabled: bool, out: &mut Vec<Notification>) {
        if self.state == CombatState::GameOver {
            log::debug!("auto-shooting toggle ignored after game over");
            return;
        }

        if self.auto_fire.set_enabled(enabled) {
            out.push(Notification::AutoShootingChanged { enabled });
        }
    }

    /// Tears the session down and starts again from wave one.
    ///
    /// Allowed in either state. The enemy registry is rebuilt so its
    /// formation starts from the configured seed again, and a restarted
    /// session replays like a fresh one.
    pub fn restart(&mut self, out: &mut Vec<Notification>) {
        log::info!("restarting session at wave {}", self.waves.wave());
        self.teardown();
        if self.auto_fire.enabled() {
            out.push(Notification::AutoShootingChanged { enabled: false });
        }
        self.auto_fire.reset();
        self.waves.reset();
        self.currency.reset();

        self.enemies = EnemyRegistry::new(&self.config);
        self.state = CombatState::Active;
        self.elapsed = Duration::ZERO;

        out.push(Notification::SessionRestarted);
        self.player.reset_health(out);
        self.begin(out);
    }

    /// Destroys every enemy and projectile and drops every scheduled callback.
    pub fn teardown(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
        self.player.clear_effects();
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> CombatState {
        self.state
    }

    /// Number of the active wave.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.waves.wave()
    }

    /// Reports whether auto-shooting is on.
    #[must_use]
    pub const fn auto_shooting(&self) -> bool {
        self.auto_fire.enabled()
    }

    /// Simulated time accumulated since the session last (re)started.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(&self) -> EnemyView {
        self.enemies.view()
    }

    /// Read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(&self) -> ProjectileView {
        self.projectiles.view()
    }

    /// Snapshot of the player.
    #[must_use]
    pub fn player(&self) -> PlayerSnapshot {
        self.player.snapshot()
    }

    /// Live statistics for the active wave.
    #[must_use]
    pub fn stats(&self) -> WaveStats {
        self.waves.stats(&self.enemies)
    }

    /// Ammo left in the resource ledger.
    #[must_use]
    pub fn ammo(&self) -> u32 {
        self.resources.get(self.config.ammo_resource)
    }

    /// Configuration the session was built from.
    #[must_use]
    pub const fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Resource ledger borrowed by the session.
    #[must_use]
    pub const fn resources(&self) -> &R {
        &self.resources
    }

    /// Currency ledger borrowed by the session.
    #[must_use]
    pub const fn currency(&self) -> &C {
        &self.currency
    }

    fn begin(&mut self, out: &mut Vec<Notification>) {
        let wave = self
            .waves
            .start_next_wave(&mut self.enemies, self.player.position(), out);
        log::info!("wave {wave} started");
        out.push(Notification::AmmoChanged { amount: self.ammo() });
    }

    fn resolve_auto_fire(&mut self, dt: Duration, out: &mut Vec<Notification>) {
        let kind = self.config.ammo_resource;
        let nearest = self.enemies.find_nearest(self.player.position());
        let ammo = self.resources.get(kind);

        match self.auto_fire.handle(dt, nearest.as_ref(), ammo) {
            FireDecision::Hold => {}
            FireDecision::Fire { target, at } => {
                self.resources.remove(kind, 1);
                let from = self.player.position();
                let projectile = self.projectiles.launch(from, at);
                log::debug!("fired projectile {} at enemy {}", projectile.get(), target.get());
                out.push(Notification::ProjectileLaunched {
                    projectile,
                    from,
                    to: at,
                });
                out.push(Notification::AmmoChanged {
                    amount: self.resources.get(kind),
                });
            }
            FireDecision::OutOfAmmo => {
                log::warn!("out of ammo; auto-shooting disabled");
                out.push(Notification::AmmoChanged { amount: 0 });
                out.push(Notification::OutOfAmmo);
                out.push(Notification::AutoShootingChanged { enabled: false });
            }
        }
    }

    /// Applies breach damage and reports whether the player died.
    fn resolve_breaches(&mut self, out: &mut Vec<Notification>) -> bool {
        let mut breached = mem::take(&mut self.breach_scratch);
        breached.clear();
        self.enemies.breaching(self.config.breach_line(), &mut breached);

        let damage = self.config.breach_damage;
        let mut died = false;
        for &id in &breached {
            let Some(enemy) = self.enemies.remove(id) else {
                continue;
            };
            out.push(Notification::EnemyBreached {
                enemy: id,
                position: enemy.position,
                damage,
            });
            died = self.player.apply_damage(damage, out);
            self.waves.report_stats(&self.enemies, out);
            if died {
                break;
            }
        }

        self.breach_scratch = breached;
        died
    }

    fn resolve_collisions(&mut self, out: &mut Vec<Notification>) {
        self.hit_scratch.clear();
        self.projectiles
            .check_collisions(&self.enemies, &mut self.hit_scratch);

        let reward = self.config.kill_reward;
        for hit in &self.hit_scratch {
            match self.enemies.damage(hit.enemy) {
                DamageOutcome::Destroyed(enemy) => {
                    self.currency.add(reward);
                    out.push(Notification::EnemyKilled {
                        enemy: enemy.id,
                        position: enemy.position,
                        reward,
                    });
                    self.waves.report_stats(&self.enemies, out);
                }
                DamageOutcome::Wounded { .. } | DamageOutcome::Missing => {}
            }
        }
    }

    fn enter_game_over(&mut self, out: &mut Vec<Notification>) {
        self.state = CombatState::GameOver;
        if self.auto_fire.set_enabled(false) {
            out.push(Notification::AutoShootingChanged { enabled: false });
        }
        self.currency.reset();
        let final_score = self.waves.wave();
        log::info!("game over at wave {final_score}");
        out.push(Notification::GameOver { final_score });
    }
}
