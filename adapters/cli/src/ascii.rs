//! Text backend drawing scenes as character grids.

use std::io::Write;

use anyhow::{Context, Result};
use glam::Vec2;
use skirmish_rendering::{FieldPresentation, RenderingBackend, Scene};

/// Character columns used by the command-line renderer.
pub(crate) const DEFAULT_COLUMNS: usize = 80;
/// Character rows used by the command-line renderer.
pub(crate) const DEFAULT_ROWS: usize = 30;

const EMPTY: char = ' ';
const BREACH_LINE: char = '-';
const ENEMY: char = 'E';
const PROJECTILE: char = '*';
const PLAYER: char = '@';
const PLAYER_HIT: char = '#';

/// Backend writing each scene as a block of text.
#[derive(Debug)]
pub(crate) struct AsciiBackend<W> {
    columns: usize,
    rows: usize,
    writer: W,
}

impl<W: Write> AsciiBackend<W> {
    /// Creates a backend drawing `columns` by `rows` characters into `writer`.
    pub(crate) fn new(columns: usize, rows: usize, writer: W) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            writer,
        }
    }

    /// Draws `scene` into a string without writing it anywhere.
    pub(crate) fn render(&self, scene: &Scene) -> String {
        let mut grid = vec![vec![EMPTY; self.columns]; self.rows];

        let (_, line_row) = self.cell(&scene.field, Vec2::new(0.0, scene.field.breach_line));
        for cell in &mut grid[line_row] {
            *cell = BREACH_LINE;
        }

        for enemy in &scene.enemies {
            let (column, row) = self.cell(&scene.field, enemy.position);
            grid[row][column] = ENEMY;
        }
        for projectile in &scene.projectiles {
            let (column, row) = self.cell(&scene.field, projectile.position);
            grid[row][column] = PROJECTILE;
        }

        let (column, row) = self.cell(&scene.field, scene.player.position);
        grid[row][column] = if scene.player.color == scene.palette.player {
            PLAYER
        } else {
            PLAYER_HIT
        };

        for text in &scene.floating_texts {
            let (column, row) = self.cell(&scene.field, text.position);
            for (offset, character) in text.text.chars().enumerate() {
                if let Some(cell) = grid[row].get_mut(column + offset) {
                    *cell = character;
                }
            }
        }

        let border = format!("+{}+", "-".repeat(self.columns));
        let mut frame = String::with_capacity((self.columns + 3) * (self.rows + 6));
        frame.push_str(&border);
        frame.push('\n');
        for line in grid {
            frame.push('|');
            frame.extend(line);
            frame.push('|');
            frame.push('\n');
        }
        frame.push_str(&border);
        frame.push('\n');
        for line in scene.hud.lines() {
            frame.push_str(&line);
            frame.push('\n');
        }
        frame
    }

    fn cell(&self, field: &FieldPresentation, position: Vec2) -> (usize, usize) {
        let clamped = field.clamp_world_position(position);
        let column = (clamped.x / field.width * self.columns as f32) as usize;
        let row = (clamped.y / field.height * self.rows as f32) as usize;
        (column.min(self.columns - 1), row.min(self.rows - 1))
    }
}

impl<W: Write> RenderingBackend for AsciiBackend<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        let frame = self.render(scene);
        self.writer
            .write_all(frame.as_bytes())
            .context("failed to write ascii frame")?;
        self.writer.flush().context("failed to flush ascii frame")
    }
}
