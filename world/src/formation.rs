//! Spawn layout for new waves.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_core::FormationConfig;

/// Places a wave along a parabolic arc near the top of the field.
///
/// The arc spans a fixed share of the field width centred horizontally. Its
/// lowest point sits in the middle and its ends rise by the configured arc
/// height, so the centre of the wave starts closest to the top edge. Every
/// spawn is then nudged vertically by a seeded uniform stagger.
#[derive(Clone, Debug)]
pub struct ArcFormation {
    config: FormationConfig,
    rng: ChaCha8Rng,
}

impl ArcFormation {
    /// Creates a formation whose stagger stream starts from the configured seed.
    #[must_use]
    pub fn new(config: FormationConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Number of enemies a wave spawns.
    #[must_use]
    pub fn enemy_count(&self, wave: u32) -> u32 {
        self.config.enemy_count(wave)
    }

    /// Appends the spawn points for `wave` to `out`, left to right.
    pub fn layout(&mut self, wave: u32, field_width: f32, out: &mut Vec<Vec2>) {
        let count = self.enemy_count(wave);
        if count == 0 {
            return;
        }

        let arc_width = field_width * self.config.arc_width_ratio;
        let start_x = field_width * 0.5 - arc_width * 0.5;
        let stagger = self.config.stagger;

        out.reserve(count as usize);
        for index in 0..count {
            let progress = arc_progress(index, count);
            let x = start_x + arc_width * progress;
            let normalized = progress - 0.5;
            let base_y =
                self.config.min_y + self.config.arc_height * 4.0 * normalized * normalized;
            let offset = if stagger > 0.0 {
                self.rng.gen_range(-stagger..=stagger)
            } else {
                0.0
            };
            out.push(Vec2::new(x, base_y + offset));
        }
    }
}

fn arc_progress(index: u32, count: u32) -> f32 {
    if count <= 1 {
        return 0.5;
    }
    index as f32 / (count - 1) as f32
}
