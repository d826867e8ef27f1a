#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a skirmish combat session headlessly.

mod ascii;
mod settings;

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use skirmish_combat::CombatSession;
use skirmish_core::{CoinPurse, CombatState, Command, Notification, Stockpile};
use skirmish_rendering::{Palette, RenderingBackend, SceneDirector};

use crate::ascii::AsciiBackend;

/// Runs a combat session against in-memory resource and currency ledgers.
#[derive(Debug, Parser)]
#[command(name = "skirmish", version, about)]
struct Args {
    /// TOML file overriding the default combat tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of ticks to simulate before stopping.
    #[arg(long, default_value_t = 3_600)]
    ticks: u32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Stone placed in the resource ledger before the session starts.
    #[arg(long, default_value_t = 100)]
    ammo: u32,
    /// Seed for the spawn stagger; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Enable auto-shooting on the first tick.
    #[arg(long)]
    auto_shoot: bool,
    /// Print every notification as a JSON line instead of logging it.
    #[arg(long)]
    json: bool,
    /// Draw an ASCII frame every N ticks; zero disables drawing.
    #[arg(long, default_value_t = 0)]
    frame_every: u32,
}

/// Final state printed when the run stops.
#[derive(Debug, Serialize)]
struct Summary {
    ticks: u32,
    elapsed_ms: u128,
    state: &'static str,
    wave: u32,
    health: u32,
    ammo: u32,
    coins: u64,
}

/// Entry point for the skirmish command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = settings::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.formation.seed = seed;
    }

    let mut out = io::stdout();
    let mut director = SceneDirector::new(&config, Palette::default())
        .context("combat configuration cannot be presented")?;
    let mut backend = AsciiBackend::new(ascii::DEFAULT_COLUMNS, ascii::DEFAULT_ROWS, io::stdout());

    let ammo_kind = config.ammo_resource;
    let mut notifications = Vec::new();
    let mut session = CombatSession::start(
        config,
        Stockpile::new().with(ammo_kind, args.ammo),
        CoinPurse::new(),
        &mut notifications,
    )
    .context("invalid combat configuration")?;
    report(&mut out, args.json, &notifications)?;
    director.observe(&notifications);

    if args.auto_shoot {
        notifications.clear();
        session.apply(Command::SetAutoShooting { enabled: true }, &mut notifications);
        report(&mut out, args.json, &notifications)?;
        director.observe(&notifications);
    }

    let dt = Duration::from_millis(args.tick_ms);
    let mut ticks = 0;
    while ticks < args.ticks {
        notifications.clear();
        session.apply(Command::Tick { dt }, &mut notifications);
        ticks += 1;
        report(&mut out, args.json, &notifications)?;
        director.observe(&notifications);
        director.advance(dt);

        if args.frame_every > 0 && ticks % args.frame_every == 0 {
            let scene = director.compose(
                &session.enemy_view(),
                &session.projectile_view(),
                session.player(),
            );
            backend.present(&scene)?;
        }

        if session.state() == CombatState::GameOver {
            break;
        }
    }

    let summary = Summary {
        ticks,
        elapsed_ms: session.elapsed().as_millis(),
        state: match session.state() {
            CombatState::Active => "active",
            CombatState::GameOver => "game_over",
        },
        wave: session.wave(),
        health: session.player().health,
        ammo: session.ammo(),
        coins: session.currency().balance(),
    };
    if args.json {
        writeln!(out, "{}", serde_json::to_string(&summary)?)?;
    } else {
        writeln!(
            out,
            "{} after {} ticks ({} ms): wave {}, health {}, ammo {}, coins {}",
            summary.state,
            summary.ticks,
            summary.elapsed_ms,
            summary.wave,
            summary.health,
            summary.ammo,
            summary.coins
        )?;
    }
    Ok(())
}

fn report(out: &mut impl Write, json: bool, notifications: &[Notification]) -> Result<()> {
    for notification in notifications {
        if json {
            let line = serde_json::to_string(notification)
                .context("failed to encode notification")?;
            writeln!(out, "{line}")?;
            continue;
        }

        match notification {
            Notification::WaveComplete {
                wave_number,
                rewards,
            } => log::info!("wave {wave_number} cleared, {} coins", rewards.coins),
            Notification::GameOver { final_score } => {
                log::info!("game over, final score {final_score}");
            }
            Notification::OutOfAmmo => log::warn!("out of ammo"),
            Notification::EnemyBreached { enemy, damage, .. } => {
                log::info!("enemy {} breached for {damage} damage", enemy.get());
            }
            other => log::debug!("{other:?}"),
        }
    }
    Ok(())
}
