//! Heads-up panel kept in sync with the notification stream.

use skirmish_core::{Notification, WaveStats};

/// Message shown across the middle of the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    /// A wave was cleared.
    WaveCleared {
        /// Number of the cleared wave.
        wave: u32,
        /// Coins paid for clearing it.
        coins: u32,
    },
    /// The player died.
    GameOver {
        /// Wave reached.
        final_score: u32,
    },
}

/// Panel mirroring the values the session reports.
///
/// The panel never queries the session; every field changes only in
/// response to a notification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HudPanel {
    /// Latest wave statistics.
    pub stats: WaveStats,
    /// Ammo left in the resource ledger.
    pub ammo: u32,
    /// Player health.
    pub health: u32,
    /// Whether auto-shooting is on.
    pub auto_shooting: bool,
    /// Whether the last shot was withheld for lack of ammo.
    pub out_of_ammo: bool,
    /// Coins earned since the session last started.
    pub coins: u64,
    /// Message currently shown, if any.
    pub banner: Option<Banner>,
}

impl HudPanel {
    /// Creates an empty panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the panel from one notification.
    pub fn observe(&mut self, notification: &Notification) {
        match notification {
            Notification::WaveStatsUpdated { stats } => self.stats = *stats,
            Notification::AmmoChanged { amount } => {
                self.ammo = *amount;
                if *amount > 0 {
                    self.out_of_ammo = false;
                }
            }
            Notification::OutOfAmmo => self.out_of_ammo = true,
            Notification::AutoShootingChanged { enabled } => self.auto_shooting = *enabled,
            Notification::PlayerHealthChanged { health } => self.health = *health,
            Notification::EnemyKilled { reward, .. } => {
                self.coins = self.coins.saturating_add(u64::from(*reward));
            }
            Notification::WaveComplete {
                wave_number,
                rewards,
            } => {
                self.coins = self.coins.saturating_add(u64::from(rewards.coins));
                self.banner = Some(Banner::WaveCleared {
                    wave: *wave_number,
                    coins: rewards.coins,
                });
            }
            Notification::GameOver { final_score } => {
                self.coins = 0;
                self.auto_shooting = false;
                self.banner = Some(Banner::GameOver {
                    final_score: *final_score,
                });
            }
            Notification::SessionRestarted => *self = Self::default(),
            Notification::PlayerDamaged { .. }
            | Notification::ProjectileLaunched { .. }
            | Notification::EnemyBreached { .. } => {}
        }
    }

    /// Text lines describing the panel, top to bottom.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Wave {}  enemies {}  hp {} dmg {} speed {:.0}",
                self.stats.wave,
                self.stats.enemies_remaining,
                self.stats.enemy_health,
                self.stats.enemy_damage,
                self.stats.enemy_speed
            ),
            format!(
                "Health {}  Ammo {}{}  Auto {}  Coins {}",
                self.health,
                self.ammo,
                if self.out_of_ammo { " (empty)" } else { "" },
                if self.auto_shooting { "on" } else { "off" },
                self.coins
            ),
        ];
        match self.banner {
            Some(Banner::WaveCleared { wave, coins }) => {
                lines.push(format!("Wave {wave} cleared! +{coins} coins"));
            }
            Some(Banner::GameOver { final_score }) => {
                lines.push(format!("GAME OVER - reached wave {final_score}"));
            }
            None => {}
        }
        lines
    }
}
