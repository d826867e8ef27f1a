#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation contracts for skirmish adapters.
//!
//! The simulation never depends on this crate. Adapters feed the
//! notification stream and the session's read-only views into a
//! [`SceneDirector`], which composes a backend-agnostic [`Scene`] that any
//! [`RenderingBackend`] can draw.

use anyhow::Result as AnyResult;
use glam::Vec2;
use skirmish_core::{EnemyId, ProjectileId};
use std::{error::Error, fmt};

mod director;
mod hud;

pub use director::SceneDirector;
pub use hud::{Banner, HudPanel};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Returns the color with its alpha channel scaled by `factor`.
    #[must_use]
    pub fn faded(self, factor: f32) -> Self {
        Self {
            alpha: self.alpha * factor.clamp(0.0, 1.0),
            ..self
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors used when composing scenes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill behind everything else.
    pub background: Color,
    /// Enemy body color.
    pub enemy: Color,
    /// Projectile color.
    pub projectile: Color,
    /// Player color while not flashing.
    pub player: Color,
    /// Floating reward text color.
    pub reward_text: Color,
    /// Defense line color.
    pub breach_line: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(24, 28, 36),
            enemy: Color::from_rgb_u8(200, 64, 64),
            projectile: Color::from_rgb_u8(240, 220, 120),
            player: Color::from_rgb_u8(64, 160, 220),
            reward_text: Color::from_rgb_u8(250, 210, 60),
            breach_line: Color::from_rgb_u8(120, 40, 40),
        }
    }
}

/// Rectangular battlefield the scene is drawn on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPresentation {
    /// Width of the field in world units.
    pub width: f32,
    /// Height of the field in world units.
    pub height: f32,
    /// Vertical coordinate of the defense line.
    pub breach_line: f32,
}

impl FieldPresentation {
    /// Creates a new field descriptor.
    ///
    /// Returns an error when the field has no area or the defense line lies
    /// outside it.
    pub fn new(width: f32, height: f32, breach_line: f32) -> Result<Self, RenderingError> {
        if !(width > 0.0) || !(height > 0.0) {
            return Err(RenderingError::InvalidFieldSize { width, height });
        }
        if !(0.0..=height).contains(&breach_line) {
            return Err(RenderingError::BreachLineOutsideField {
                breach_line,
                height,
            });
        }

        Ok(Self {
            width,
            height,
            breach_line,
        })
    }

    /// Clamps a world-space position to the field bounds.
    #[must_use]
    pub fn clamp_world_position(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            position.x.clamp(0.0, self.width),
            position.y.clamp(0.0, self.height),
        )
    }
}

/// Enemy drawn as a filled square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Centre of the enemy in world units.
    pub position: Vec2,
    /// Half the side length of the square.
    pub half_extent: f32,
    /// Fill color.
    pub color: Color,
}

/// Projectile drawn as a small filled square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Centre of the projectile in world units.
    pub position: Vec2,
    /// Half the side length of the square.
    pub half_extent: f32,
    /// Fill color.
    pub color: Color,
}

/// Player marker with its health bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Centre of the player in world units.
    pub position: Vec2,
    /// Current health.
    pub health: u32,
    /// Health of a full bar.
    pub max_health: u32,
    /// Fill color, lightened while the damage flash shows.
    pub color: Color,
}

impl PlayerPresentation {
    /// Share of the health bar that is filled.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

/// Text rising and fading above a kill position.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingText {
    /// Text to draw, such as `+1`.
    pub text: String,
    /// Current anchor in world units.
    pub position: Vec2,
    /// Text color including the current fade.
    pub color: Color,
}

/// Scene description combining the field, its inhabitants and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Battlefield the scene is drawn on.
    pub field: FieldPresentation,
    /// Colors the scene was composed with.
    pub palette: Palette,
    /// Live enemies in identifier order.
    pub enemies: Vec<EnemyPresentation>,
    /// Projectiles in flight in identifier order.
    pub projectiles: Vec<ProjectilePresentation>,
    /// The player.
    pub player: PlayerPresentation,
    /// Floating reward indicators, oldest first.
    pub floating_texts: Vec<FloatingText>,
    /// Panel mirroring the session's notifications.
    pub hud: HudPanel,
}

/// Rendering backend capable of presenting skirmish scenes.
pub trait RenderingBackend {
    /// Draws one composed scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The field must have a positive width and height.
    InvalidFieldSize {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
    /// The defense line must lie within the field.
    BreachLineOutsideField {
        /// Provided defense line.
        breach_line: f32,
        /// Height of the field.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFieldSize { width, height } => {
                write!(f, "field must have a positive size (received {width}x{height})")
            }
            Self::BreachLineOutsideField {
                breach_line,
                height,
            } => write!(
                f,
                "breach line {breach_line} lies outside a field of height {height}"
            ),
        }
    }
}

impl Error for RenderingError {}
