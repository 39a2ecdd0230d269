/// Level: everything that exists while one layout is being played.
///
/// ## Ownership
///
/// The level owns every tile, entity and the camera. Entities never hold a
/// reference back to it; per-tick functions receive `&[Tile]` instead.
/// Bullets belong to the player that fired them.
///
/// ## Coordinates
///
/// Everything is in world pixels. The visible window is
/// `[camera.offset, camera.offset + screen_width) × [0, screen_height)`.

use rand::rngs::StdRng;

use crate::config::PhysicsConfig;
use crate::domain::camera::Camera;
use crate::domain::entity::{Enemy, Player, SnowFlake};
use crate::domain::rect::Rect;
use crate::domain::tile::Tile;

pub struct Level {
    pub name: String,
    pub tiles: Vec<Tile>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub snowflakes: Vec<SnowFlake>,
    pub camera: Camera,

    /// Layout extent in pixels.
    pub width: i32,
    pub height: i32,

    pub tuning: PhysicsConfig,
    pub rng: StdRng,
    pub tick: u64,
}

impl Level {
    /// The part of the world currently on screen.
    pub fn view_rect(&self) -> Rect {
        Rect::new(
            self.camera.offset, 0,
            self.tuning.screen_width, self.tuning.screen_height,
        )
    }

    /// Shift all tiles horizontally (world scrolls, camera stays).
    #[allow(dead_code)]
    pub fn scroll_x(&mut self, dx: i32) {
        for tile in &mut self.tiles {
            tile.shift(dx);
        }
    }
}
