//! Turns notifications and session views into scenes.

use std::time::Duration;

use glam::Vec2;
use skirmish_core::{CombatConfig, EnemyView, Notification, PlayerSnapshot, ProjectileView};

use crate::{
    Banner, EnemyPresentation, FieldPresentation, FloatingText, HudPanel, Palette,
    PlayerPresentation, ProjectilePresentation, RenderingError, Scene,
};

const FLASH_LIGHTEN: f32 = 0.7;

#[derive(Clone, Debug)]
struct FloatingReward {
    text: String,
    origin: Vec2,
    age: Duration,
}

/// Presentation state that outlives a single frame.
///
/// Owns the HUD panel, the floating reward indicators, and the wave-cleared
/// banner countdown. Everything here is cosmetic; dropping the director never
/// affects the simulation.
#[derive(Clone, Debug)]
pub struct SceneDirector {
    field: FieldPresentation,
    palette: Palette,
    enemy_half_extent: f32,
    projectile_half_extent: f32,
    hud: HudPanel,
    rewards: Vec<FloatingReward>,
    banner_left: Duration,
}

impl SceneDirector {
    /// Time a floating reward stays visible.
    pub const FLOAT_DURATION: Duration = Duration::from_millis(800);

    /// Distance a floating reward rises over its lifetime.
    pub const FLOAT_RISE: f32 = 30.0;

    /// Time the wave-cleared banner stays visible.
    pub const BANNER_DURATION: Duration = Duration::from_secs(2);

    /// Creates a director for a session built from `config`.
    pub fn new(config: &CombatConfig, palette: Palette) -> Result<Self, RenderingError> {
        let field =
            FieldPresentation::new(config.field_width, config.field_height, config.breach_line())?;

        Ok(Self {
            field,
            palette,
            enemy_half_extent: config.enemy_half_extent,
            projectile_half_extent: config.projectile_half_extent,
            hud: HudPanel::new(),
            rewards: Vec::new(),
            banner_left: Duration::ZERO,
        })
    }

    /// Panel mirroring the notifications observed so far.
    #[must_use]
    pub const fn hud(&self) -> &HudPanel {
        &self.hud
    }

    /// Number of floating rewards still visible.
    #[must_use]
    pub fn floating_rewards(&self) -> usize {
        self.rewards.len()
    }

    /// Applies a batch of notifications in order.
    pub fn observe(&mut self, notifications: &[Notification]) {
        for notification in notifications {
            self.hud.observe(notification);
            match notification {
                Notification::EnemyKilled {
                    position, reward, ..
                } => self.rewards.push(FloatingReward {
                    text: format!("+{reward}"),
                    origin: *position,
                    age: Duration::ZERO,
                }),
                Notification::WaveComplete { .. } => self.banner_left = Self::BANNER_DURATION,
                Notification::SessionRestarted => {
                    self.rewards.clear();
                    self.banner_left = Duration::ZERO;
                }
                _ => {}
            }
        }
    }

    /// Ages floating rewards and the banner by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        for reward in &mut self.rewards {
            reward.age = reward.age.saturating_add(dt);
        }
        self.rewards
            .retain(|reward| reward.age < Self::FLOAT_DURATION);

        if self.banner_left.is_zero() {
            return;
        }
        self.banner_left = self.banner_left.saturating_sub(dt);
        if self.banner_left.is_zero() && matches!(self.hud.banner, Some(Banner::WaveCleared { .. }))
        {
            self.hud.banner = None;
        }
    }

    /// Composes the scene for the current frame.
    #[must_use]
    pub fn compose(
        &self,
        enemies: &EnemyView,
        projectiles: &ProjectileView,
        player: PlayerSnapshot,
    ) -> Scene {
        let enemies = enemies
            .iter()
            .map(|enemy| EnemyPresentation {
                id: enemy.id,
                position: enemy.position,
                half_extent: self.enemy_half_extent,
                color: self.palette.enemy,
            })
            .collect();

        let projectiles = projectiles
            .iter()
            .map(|projectile| ProjectilePresentation {
                id: projectile.id,
                position: projectile.position,
                half_extent: self.projectile_half_extent,
                color: self.palette.projectile,
            })
            .collect();

        let player_color = if player.flashing {
            self.palette.player.lighten(FLASH_LIGHTEN)
        } else {
            self.palette.player
        };

        let floating_texts = self
            .rewards
            .iter()
            .map(|reward| {
                let progress = (reward.age.as_secs_f32() / Self::FLOAT_DURATION.as_secs_f32())
                    .clamp(0.0, 1.0);
                FloatingText {
                    text: reward.text.clone(),
                    position: reward.origin - Vec2::new(0.0, Self::FLOAT_RISE * progress),
                    color: self.palette.reward_text.faded(1.0 - progress),
                }
            })
            .collect();

        Scene {
            field: self.field,
            palette: self.palette,
            enemies,
            projectiles,
            player: PlayerPresentation {
                position: player.position,
                health: player.health,
                max_health: player.max_health,
                color: player_color,
            },
            floating_texts,
            hud: self.hud.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{EnemyId, EnemyKind, EnemySnapshot, WaveRewards};

    fn director() -> SceneDirector {
        SceneDirector::new(&CombatConfig::default(), Palette::default()).expect("valid config")
    }

    fn player(flashing: bool) -> PlayerSnapshot {
        PlayerSnapshot {
            position: Vec2::new(400.0, 550.0),
            health: 90,
            max_health: 100,
            damage: 1,
            shooting_interval: Duration::from_secs(1),
            flashing,
        }
    }

    fn kill(x: f32, y: f32) -> Notification {
        Notification::EnemyKilled {
            enemy: EnemyId::new(3),
            position: Vec2::new(x, y),
            reward: 1,
        }
    }

    #[test]
    fn kill_spawns_rising_fading_reward_text() {
        let mut director = director();
        director.observe(&[kill(100.0, 200.0)]);
        director.advance(Duration::from_millis(400));

        let scene = director.compose(&EnemyView::default(), &ProjectileView::default(), player(false));

        assert_eq!(scene.floating_texts.len(), 1);
        let text = &scene.floating_texts[0];
        assert_eq!(text.text, "+1");
        assert!((text.position.y - 185.0).abs() < 1e-3);
        assert!((text.color.alpha - 0.5).abs() < 1e-3);
    }

    #[test]
    fn reward_text_disappears_after_lifetime() {
        let mut director = director();
        director.observe(&[kill(0.0, 0.0)]);

        director.advance(Duration::from_millis(799));
        assert_eq!(director.floating_rewards(), 1);
        director.advance(Duration::from_millis(1));
        assert_eq!(director.floating_rewards(), 0);
    }

    #[test]
    fn flashing_player_is_tinted() {
        let director = director();
        let calm = director.compose(&EnemyView::default(), &ProjectileView::default(), player(false));
        let hit = director.compose(&EnemyView::default(), &ProjectileView::default(), player(true));

        assert_eq!(calm.player.color, Palette::default().player);
        assert_eq!(hit.player.color, Palette::default().player.lighten(0.7));
    }

    #[test]
    fn compose_places_enemies_with_configured_extent() {
        let director = director();
        let enemies = EnemyView::from_snapshots(vec![EnemySnapshot {
            id: EnemyId::new(1),
            kind: EnemyKind::Raider,
            position: Vec2::new(50.0, 60.0),
            velocity: Vec2::ZERO,
            health: 1,
        }]);

        let scene = director.compose(&enemies, &ProjectileView::default(), player(false));

        assert_eq!(scene.enemies.len(), 1);
        assert_eq!(scene.enemies[0].half_extent, 16.0);
        assert_eq!(scene.field.breach_line, 518.0);
    }

    #[test]
    fn wave_banner_expires_but_game_over_stays() {
        let mut director = director();
        director.observe(&[Notification::WaveComplete {
            wave_number: 1,
            rewards: WaveRewards { coins: 10 },
        }]);
        assert!(director.hud().banner.is_some());
        director.advance(SceneDirector::BANNER_DURATION);
        assert!(director.hud().banner.is_none());

        director.observe(&[Notification::GameOver { final_score: 2 }]);
        director.advance(Duration::from_secs(10));
        assert_eq!(
            director.hud().banner,
            Some(Banner::GameOver { final_score: 2 })
        );
    }

    #[test]
    fn restart_clears_cosmetics() {
        let mut director = director();
        director.observe(&[kill(1.0, 1.0), Notification::SessionRestarted]);

        assert_eq!(director.floating_rewards(), 0);
        assert_eq!(director.hud(), &HudPanel::default());
    }
}
