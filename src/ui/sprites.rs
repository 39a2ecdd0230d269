/// Sprites: how each world object looks on the canvas.
///
/// Every drawable shifts its world rect by `-offset` (the camera) and lets
/// the canvas clip. Animated objects pick their glyph from a per-state frame
/// table using `frame_idx`; left-facing sprites use the mirrored table.

use crossterm::style::Color;

use crate::domain::entity::{AnimationState, Bullet, Direction, Enemy, Player, SnowFlake};
use crate::domain::rect::Rect;
use crate::domain::tile::Tile;
use crate::sim::world::Level;
use super::canvas::Canvas;

pub trait Drawable {
    fn draw(&self, canvas: &mut Canvas, offset: i32);
}

pub const SKY: Color = Color::Rgb { r: 24, g: 34, b: 60 };
const ICE_FG: Color = Color::Rgb { r: 200, g: 235, b: 255 };
const ICE_BG: Color = Color::Rgb { r: 90, g: 140, b: 190 };
const PLAYER_FG: Color = Color::Rgb { r: 255, g: 220, b: 80 };
const ENEMY_FG: Color = Color::Rgb { r: 255, g: 90, b: 90 };
const SNOW_FG: Color = Color::Rgb { r: 235, g: 240, b: 255 };
const BULLET_FG: Color = Color::White;

// ── Frame tables ──

struct Frames {
    idle: &'static [char],
    run: &'static [char],
    jump: &'static [char],
    fall: &'static [char],
}

impl Frames {
    fn pick(&self, state: AnimationState, frame_idx: usize) -> char {
        let frames = match state {
            AnimationState::Idle => self.idle,
            AnimationState::Run => self.run,
            AnimationState::Jump => self.jump,
            AnimationState::Fall => self.fall,
        };
        frames[frame_idx % frames.len()]
    }
}

const PLAYER_RIGHT: Frames = Frames {
    idle: &['@'],
    run: &['>', '»'],
    jump: &['^'],
    fall: &['v'],
};

const PLAYER_LEFT: Frames = Frames {
    idle: &['@'],
    run: &['<', '«'],
    jump: &['^'],
    fall: &['v'],
};

const ENEMY_RIGHT: Frames = Frames {
    idle: &['E', 'e'],
    run: &['E', 'e'],
    jump: &['E'],
    fall: &['e'],
};

const ENEMY_LEFT: Frames = Frames {
    idle: &['Ǝ', 'ǝ'],
    run: &['Ǝ', 'ǝ'],
    jump: &['Ǝ'],
    fall: &['ǝ'],
};

const SNOW_FRAMES: &[char] = &['*', '+', 'x', '+'];
const BULLET_FRAMES: &[char] = &['o', 'O'];

fn frames_for(direction: Direction) -> &'static Frames {
    match direction {
        Direction::Right => &PLAYER_RIGHT,
        Direction::Left => &PLAYER_LEFT,
    }
}

fn enemy_frames_for(direction: Direction) -> &'static Frames {
    match direction {
        Direction::Right => &ENEMY_RIGHT,
        Direction::Left => &ENEMY_LEFT,
    }
}

fn on_screen(rect: Rect, offset: i32) -> Rect {
    rect.translated(-offset, 0)
}

// ── Drawables ──

impl Drawable for Tile {
    fn draw(&self, canvas: &mut Canvas, offset: i32) {
        canvas.fill_px(on_screen(self.rect, offset), '▓', ICE_FG, ICE_BG);
    }
}

impl Drawable for Player {
    fn draw(&self, canvas: &mut Canvas, offset: i32) {
        let ch = frames_for(self.direction).pick(self.animation.state, self.animation.frame_idx);
        canvas.fill_px(on_screen(self.body.rect, offset), ch, PLAYER_FG, SKY);
        for bullet in &self.bullets {
            bullet.draw(canvas, offset);
        }
    }
}

impl Drawable for Enemy {
    fn draw(&self, canvas: &mut Canvas, offset: i32) {
        let ch = enemy_frames_for(self.direction).pick(self.animation.state, self.animation.frame_idx);
        canvas.fill_px(on_screen(self.body.rect, offset), ch, ENEMY_FG, SKY);
    }
}

impl Drawable for SnowFlake {
    fn draw(&self, canvas: &mut Canvas, offset: i32) {
        let ch = SNOW_FRAMES[self.animation.frame_idx % SNOW_FRAMES.len()];
        canvas.fill_px(on_screen(self.body.rect, offset), ch, SNOW_FG, SKY);
    }
}

impl Drawable for Bullet {
    fn draw(&self, canvas: &mut Canvas, offset: i32) {
        let ch = BULLET_FRAMES[self.animation.frame_idx % BULLET_FRAMES.len()];
        canvas.fill_px(on_screen(self.rect, offset), ch, BULLET_FG, SKY);
    }
}

/// Sky, then back to front: snow, tiles, enemies, player (with bullets).
impl Drawable for Level {
    fn draw(&self, canvas: &mut Canvas, offset: i32) {
        let sky = Rect::new(0, 0, self.tuning.screen_width, self.tuning.screen_height);
        canvas.fill_px(sky, ' ', Color::White, SKY);

        for flake in &self.snowflakes {
            flake.draw(canvas, offset);
        }
        for tile in &self.tiles {
            tile.draw(canvas, offset);
        }
        for enemy in &self.enemies {
            enemy.draw(canvas, offset);
        }
        self.player.draw(canvas, offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, RenderConfig};
    use crate::ui::canvas::Cell;
    use crate::sim::level::{build_level, LevelDef};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn canvas() -> Canvas {
        let mut c = Canvas::new(&RenderConfig { cell_width_px: 16, cell_height_px: 32 }, 0);
        c.buf.resize(48, 20);
        c.set_view(768, 640);
        c
    }

    fn glyph_count(c: &Canvas, ch: char) -> usize {
        c.buf.cells.iter().filter(|cell| cell.ch == ch).count()
    }

    #[test]
    fn tile_is_shifted_by_camera_offset() {
        let mut c = canvas();
        let tile = Tile::new(64, 128, 0);
        tile.draw(&mut c, 64);
        // world x 128 at offset 64 → screen x 64 → column 4.
        assert_eq!(c.buf.get(4, 0).ch, '▓');
        assert_eq!(c.buf.get(7, 1).ch, '▓');
        assert_eq!(c.buf.get(3, 0).ch, ' ');
        assert_eq!(c.buf.get(8, 0).ch, ' ');
    }

    #[test]
    fn tile_left_of_camera_is_not_drawn() {
        let mut c = canvas();
        Tile::new(64, 0, 0).draw(&mut c, 64);
        assert_eq!(glyph_count(&c, '▓'), 0);
    }

    #[test]
    fn left_facing_runner_uses_mirrored_frames() {
        assert_eq!(frames_for(Direction::Right).pick(AnimationState::Run, 0), '>');
        assert_eq!(frames_for(Direction::Left).pick(AnimationState::Run, 0), '<');
        assert_eq!(frames_for(Direction::Left).pick(AnimationState::Run, 1), '«');
        // frame index wraps through the table.
        assert_eq!(frames_for(Direction::Right).pick(AnimationState::Run, 5), '»');
    }

    #[test]
    fn enemies_face_left_by_default() {
        let cfg = GameConfig::default();
        let enemy = Enemy::new(64, 0, &cfg.physics);
        let mut c = canvas();
        enemy.draw(&mut c, 0);
        assert_eq!(glyph_count(&c, 'Ǝ'), 4);
    }

    #[test]
    fn player_draws_its_bullets() {
        let cfg = GameConfig::default();
        let mut player = Player::new(0, 64, &cfg.physics);
        player.shoot();
        let mut c = canvas();
        player.draw(&mut c, 0);
        assert!(glyph_count(&c, '@') > 0);
        assert_eq!(glyph_count(&c, 'o'), 1);
    }

    #[test]
    fn bullet_glyph_follows_animation_frame() {
        let mut c = canvas();
        let mut b = Bullet::new(320, 320, Direction::Right, 10, 1);
        b.animation.frame_idx = 1;
        b.draw(&mut c, 0);
        assert_eq!(glyph_count(&c, 'O'), 1);
    }

    #[test]
    fn level_draws_tiles_over_sky() {
        let def = LevelDef { name: "t".into(), rows: vec!["P".into(), "XX".into()] };
        let level = build_level(&def, &GameConfig::default(), StdRng::seed_from_u64(1)).unwrap();
        let mut c = canvas();
        level.draw(&mut c, 0);
        // two 64px tiles = 8 columns × 2 rows.
        assert_eq!(glyph_count(&c, '▓'), 16);
        assert!(c.buf.cells.iter().all(|cell| cell.bg != Cell::BASE_BG));
    }
}
