use std::{cell::RefCell, rc::Rc, time::Duration};

use skirmish_combat::CombatSession;
use skirmish_core::{
    CoinPurse, CombatConfig, CombatState, Command, CurrencyLedger, Notification, ResourceKind,
    ResourceLedger, Stockpile, WaveRewards, WaveStats,
};

const FRAME: Duration = Duration::from_millis(16);

type Session = CombatSession<Stockpile, CoinPurse>;

fn start(config: CombatConfig, stones: u32) -> Session {
    let mut out = Vec::new();
    CombatSession::start(
        config,
        Stockpile::new().with(ResourceKind::Stone, stones),
        CoinPurse::new(),
        &mut out,
    )
    .expect("valid config")
}

fn tick<R: ResourceLedger, C: CurrencyLedger>(
    session: &mut CombatSession<R, C>,
) -> Vec<Notification> {
    let mut out = Vec::new();
    session.apply(Command::Tick { dt: FRAME }, &mut out);
    out
}

fn enable_auto_shooting<R: ResourceLedger, C: CurrencyLedger>(
    session: &mut CombatSession<R, C>,
) {
    let mut out = Vec::new();
    session.apply(Command::SetAutoShooting { enabled: true }, &mut out);
}

/// Ticks until a notification matching `found` appears, returning everything
/// emitted up to and including that tick.
fn run_until<R, C>(
    session: &mut CombatSession<R, C>,
    max_ticks: usize,
    found: impl Fn(&Notification) -> bool,
) -> Vec<Notification>
where
    R: ResourceLedger,
    C: CurrencyLedger,
{
    let mut log = Vec::new();
    for _ in 0..max_ticks {
        let out = tick(session);
        let done = out.iter().any(&found);
        log.extend(out);
        if done {
            return log;
        }
    }
    panic!("condition not reached within {max_ticks} ticks");
}

fn count(log: &[Notification], matches: impl Fn(&Notification) -> bool) -> usize {
    log.iter().filter(|notification| matches(notification)).count()
}

#[test]
fn clearing_first_wave_pays_ten_coins_and_starts_five_enemy_wave() {
    let mut session = start(CombatConfig::default(), 100);
    assert_eq!(session.enemy_view().len(), 3);
    enable_auto_shooting(&mut session);

    let log = run_until(&mut session, 1_250, |notification| {
        matches!(notification, Notification::WaveComplete { .. })
    });

    let complete = log
        .iter()
        .position(|notification| matches!(notification, Notification::WaveComplete { .. }))
        .expect("wave completed");
    assert_eq!(
        log[complete],
        Notification::WaveComplete {
            wave_number: 1,
            rewards: WaveRewards { coins: 10 },
        }
    );
    assert_eq!(
        log.get(complete + 1),
        Some(&Notification::WaveStatsUpdated {
            stats: WaveStats {
                wave: 2,
                enemies_remaining: 5,
                enemy_health: 1,
                enemy_damage: 1,
                enemy_speed: 50.0,
            },
        })
    );
    assert_eq!(
        count(&log, |n| matches!(n, Notification::EnemyKilled { .. })),
        3
    );
    assert_eq!(
        count(&log, |n| matches!(n, Notification::EnemyBreached { .. })),
        0
    );
    assert_eq!(session.wave(), 2);
    assert_eq!(session.enemy_view().len(), 5);
    assert_eq!(session.currency().balance(), 13);
}

#[test]
fn single_breach_deals_ten_damage() {
    let mut config = CombatConfig::default();
    config.formation.base_count = 1;
    let mut session = start(config, 0);
    assert_eq!(session.player().health, 100);

    let log = run_until(&mut session, 1_000, |notification| {
        matches!(notification, Notification::EnemyBreached { .. })
    });

    assert!(log.contains(&Notification::PlayerDamaged {
        amount: 10,
        health: 90,
    }));
    assert!(log.contains(&Notification::PlayerHealthChanged { health: 90 }));
    assert!(!log
        .iter()
        .any(|n| matches!(n, Notification::GameOver { .. })));
    assert_eq!(session.state(), CombatState::Active);
    assert_eq!(session.player().health, 90);
    assert!(session.player().flashing);
}

#[test]
fn empty_stock_withholds_fire_and_reports_out_of_ammo() {
    let mut session = start(CombatConfig::default(), 0);
    enable_auto_shooting(&mut session);

    let out = tick(&mut session);

    assert_eq!(
        out,
        vec![
            Notification::AmmoChanged { amount: 0 },
            Notification::OutOfAmmo,
            Notification::AutoShootingChanged { enabled: false },
        ]
    );
    assert!(session.projectile_view().is_empty());
    assert!(!session.auto_shooting());

    for _ in 0..200 {
        assert!(tick(&mut session).is_empty(), "fire attempted after auto-disable");
    }
}

#[test]
fn repeated_breaches_end_the_game_at_the_active_wave() {
    let mut session = start(CombatConfig::default(), 0);

    let log = run_until(&mut session, 10_000, |notification| {
        matches!(notification, Notification::GameOver { .. })
    });

    assert_eq!(log.last(), Some(&Notification::GameOver { final_score: 3 }));
    assert_eq!(
        count(&log, |n| matches!(n, Notification::EnemyBreached { .. })),
        10
    );
    assert_eq!(session.state(), CombatState::GameOver);
    assert_eq!(session.wave(), 3);
    assert_eq!(session.player().health, 0);
    assert_eq!(session.currency().balance(), 0, "currency reset on game over");
}

#[test]
fn ticks_after_game_over_change_nothing() {
    let mut session = start(CombatConfig::default(), 0);
    let _ = run_until(&mut session, 10_000, |notification| {
        matches!(notification, Notification::GameOver { .. })
    });
    let enemies = session.enemy_view().into_vec();
    let elapsed = session.elapsed();

    for _ in 0..100 {
        assert!(tick(&mut session).is_empty());
    }
    let mut out = Vec::new();
    session.apply(Command::SetAutoShooting { enabled: true }, &mut out);

    assert!(out.is_empty());
    assert!(!session.auto_shooting());
    assert_eq!(session.enemy_view().into_vec(), enemies);
    assert_eq!(session.elapsed(), elapsed);
}

#[test]
fn restart_after_game_over_rebuilds_wave_one() {
    let mut session = start(CombatConfig::default(), 0);
    let _ = run_until(&mut session, 10_000, |notification| {
        matches!(notification, Notification::GameOver { .. })
    });

    let mut out = Vec::new();
    session.apply(Command::Restart, &mut out);

    assert_eq!(
        out,
        vec![
            Notification::SessionRestarted,
            Notification::PlayerHealthChanged { health: 100 },
            Notification::WaveStatsUpdated {
                stats: WaveStats {
                    wave: 1,
                    enemies_remaining: 3,
                    enemy_health: 1,
                    enemy_damage: 1,
                    enemy_speed: 50.0,
                },
            },
            Notification::AmmoChanged { amount: 0 },
        ]
    );
    assert_eq!(session.state(), CombatState::Active);
    assert_eq!(session.wave(), 1);
    assert_eq!(session.player().health, 100);
    assert_eq!(session.enemy_view().len(), 3);
    assert!(session.projectile_view().is_empty());
    assert_eq!(session.currency().balance(), 0);
    assert_eq!(session.elapsed(), Duration::ZERO);
}

#[test]
fn restart_mid_flight_drops_projectiles_and_disables_auto_shooting() {
    let mut session = start(CombatConfig::default(), 10);
    enable_auto_shooting(&mut session);
    let _ = tick(&mut session);
    assert_eq!(session.projectile_view().len(), 1);

    let mut out = Vec::new();
    session.apply(Command::Restart, &mut out);

    assert_eq!(
        out.first(),
        Some(&Notification::AutoShootingChanged { enabled: false })
    );
    assert!(session.projectile_view().is_empty());
    assert!(!session.auto_shooting());

    for _ in 0..200 {
        let out = tick(&mut session);
        assert!(!out
            .iter()
            .any(|n| matches!(n, Notification::EnemyKilled { .. })));
    }
}

#[test]
fn restart_replays_the_same_spawns() {
    let fresh = start(CombatConfig::default(), 0);
    let mut session = start(CombatConfig::default(), 0);
    for _ in 0..300 {
        let _ = tick(&mut session);
    }

    let mut out = Vec::new();
    session.apply(Command::Restart, &mut out);

    assert_eq!(
        session.enemy_view().into_vec(),
        fresh.enemy_view().into_vec()
    );
}

#[test]
fn restart_leaves_cooldown_ready() {
    let mut session = start(CombatConfig::default(), 10);
    enable_auto_shooting(&mut session);
    let out = tick(&mut session);
    assert_eq!(
        count(&out, |n| matches!(n, Notification::ProjectileLaunched { .. })),
        1
    );

    let mut out = Vec::new();
    session.apply(Command::Restart, &mut out);
    enable_auto_shooting(&mut session);
    let out = tick(&mut session);

    assert_eq!(
        count(&out, |n| matches!(n, Notification::ProjectileLaunched { .. })),
        1
    );
    assert_eq!(session.ammo(), 8);
}

#[test]
fn enemy_struck_twice_in_one_pass_pays_once() {
    let mut config = CombatConfig::default();
    config.formation.base_count = 1;
    config.formation.stagger = 0.0;
    config.enemy_speed = 1.0;
    config.projectile_speed = 40.0;
    config.projectile_lifetime_ms = 60_000;
    config.fire_cooldown_ms = 1;
    let mut session = start(config, 50);
    enable_auto_shooting(&mut session);

    for _ in 0..10 {
        let _ = tick(&mut session);
    }
    let mut out = Vec::new();
    session.apply(Command::SetAutoShooting { enabled: false }, &mut out);
    assert_eq!(session.projectile_view().len(), 10);

    // The whole stream lands inside the enemy's hitbox in one step.
    let mut out = Vec::new();
    session.apply(
        Command::Tick {
            dt: Duration::from_millis(12_250),
        },
        &mut out,
    );

    assert_eq!(
        count(&out, |n| matches!(n, Notification::EnemyKilled { .. })),
        1
    );
    assert!(out.contains(&Notification::WaveComplete {
        wave_number: 1,
        rewards: WaveRewards { coins: 10 },
    }));
    assert!(session.projectile_view().is_empty());
    assert_eq!(session.currency().balance(), 11);
    assert_eq!(session.wave(), 2);
}

#[test]
fn reported_ammo_matches_ledger_after_each_shot() {
    let stock = Rc::new(RefCell::new(
        Stockpile::new().with(ResourceKind::Stone, 4),
    ));
    let mut out = Vec::new();
    let mut session = CombatSession::start(
        CombatConfig::default(),
        Rc::clone(&stock),
        CoinPurse::new(),
        &mut out,
    )
    .expect("valid config");
    enable_auto_shooting(&mut session);

    let mut shots = 0;
    for _ in 0..400 {
        let out = tick(&mut session);
        if let Some(index) = out
            .iter()
            .position(|n| matches!(n, Notification::ProjectileLaunched { .. }))
        {
            shots += 1;
            let live = stock.borrow().get(ResourceKind::Stone);
            assert_eq!(
                out.get(index + 1),
                Some(&Notification::AmmoChanged { amount: live })
            );
        }
    }

    assert_eq!(shots, 4);
    assert_eq!(stock.borrow().get(ResourceKind::Stone), 0);
}

#[test]
fn stock_drained_elsewhere_stops_fire_without_error() {
    let stock = Rc::new(RefCell::new(
        Stockpile::new().with(ResourceKind::Stone, 20),
    ));
    let mut out = Vec::new();
    let mut session = CombatSession::start(
        CombatConfig::default(),
        Rc::clone(&stock),
        CoinPurse::new(),
        &mut out,
    )
    .expect("valid config");
    enable_auto_shooting(&mut session);
    let _ = tick(&mut session);
    assert_eq!(session.ammo(), 19);

    stock.borrow_mut().remove(ResourceKind::Stone, 19);
    let log = run_until(&mut session, 100, |n| matches!(n, Notification::OutOfAmmo));

    assert!(!log
        .iter()
        .any(|n| matches!(n, Notification::ProjectileLaunched { .. })));
    assert!(log.contains(&Notification::AmmoChanged { amount: 0 }));
    assert!(!session.auto_shooting());
    assert_eq!(session.state(), CombatState::Active);
}

#[test]
fn reported_enemy_count_is_never_stale() {
    let mut session = start(CombatConfig::default(), 500);
    enable_auto_shooting(&mut session);

    for _ in 0..3_000 {
        let out = tick(&mut session);
        let live = session.enemy_view().len() as u32;
        let last_report = out.iter().rev().find_map(|n| match n {
            Notification::WaveStatsUpdated { stats } => Some(stats.enemies_remaining),
            _ => None,
        });
        if let Some(reported) = last_report {
            assert_eq!(reported, live);
        }
        assert_eq!(session.stats().enemies_remaining, live);
        if session.state() == CombatState::GameOver {
            break;
        }
    }
}

#[test]
fn kills_credit_one_coin_each() {
    let coins = Rc::new(RefCell::new(CoinPurse::new()));
    let mut out = Vec::new();
    let mut session = CombatSession::start(
        CombatConfig::default(),
        Stockpile::new().with(ResourceKind::Stone, 50),
        Rc::clone(&coins),
        &mut out,
    )
    .expect("valid config");
    enable_auto_shooting(&mut session);

    let log = run_until(&mut session, 1_250, |n| {
        matches!(n, Notification::EnemyKilled { .. })
    });

    assert_eq!(
        count(&log, |n| matches!(n, Notification::EnemyKilled { reward: 1, .. })),
        1
    );
    assert_eq!(coins.borrow().balance(), 1);
}
