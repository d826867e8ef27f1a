#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative combat state for the skirmish engine.
//!
//! Each component owns one slice of the battlefield: [`EnemyRegistry`] the
//! live enemies, [`ProjectileTracker`] the projectiles in flight,
//! [`PlayerAgent`] the player's health, and [`WaveController`] the wave
//! counter. Components never call each other; the combat session sequences
//! them every tick and collects the notifications they report.

mod enemies;
mod formation;
mod player;
mod projectiles;
mod timers;
mod waves;

pub use enemies::{DamageOutcome, EnemyRegistry};
pub use formation::ArcFormation;
pub use player::PlayerAgent;
pub use projectiles::{Hit, ProjectileTracker};
pub use timers::{TimerId, TimerQueue};
pub use waves::WaveController;
