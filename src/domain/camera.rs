/// Horizontal camera with a dead zone.
///
/// `offset` is the world x shown at the left edge of the screen.
/// Let `d = target_x - offset` (how far into the screen the player is):
///   - `|d| > max_offset` → move `step` pixels towards the player
///   - `|d| < min_offset` → move `step` pixels left, giving the player room
///   - otherwise          → stay put
///
/// The camera therefore sits still while the player roams the middle of the
/// screen and tracks at a constant speed outside it. `offset` never goes
/// below 0: the camera never shows anything left of the level start.

use crate::config::CameraConfig;

#[derive(Clone, Debug)]
pub struct Camera {
    pub offset: i32,
    pub min_offset: i32,
    pub max_offset: i32,
    pub step: i32,
}

impl Camera {
    pub fn new(cfg: &CameraConfig) -> Self {
        Camera {
            offset: 0,
            min_offset: cfg.min_offset,
            max_offset: cfg.max_offset,
            step: cfg.step,
        }
    }

    /// Advance one tick towards keeping `target_x` inside the dead zone.
    pub fn follow(&mut self, target_x: i32) {
        let d = target_x - self.offset;
        let dist = d.abs();
        if dist > self.max_offset {
            self.offset += if d >= 0 { self.step } else { -self.step };
        } else if dist < self.min_offset {
            self.offset -= self.step;
        }
        self.offset = self.offset.max(0);
    }

    /// Translate a world x into screen x.
    #[inline]
    pub fn to_screen_x(&self, world_x: i32) -> i32 {
        world_x - self.offset
    }
}
