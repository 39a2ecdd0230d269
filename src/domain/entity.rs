/// Entities: Player, Enemy, SnowFlake, Bullet.
///
/// Every falling thing is built from the same parts:
///   - `PhysicsBody`: rect, velocity, gravity, ground state
///   - `Animation`: which animation plays and which frame is showing
///
/// Kinds differ only in which parts they carry and how they are tuned.
/// A snowflake's body has `GroundSensor::Never`, so it never lands.
/// Bullets have no body at all: they fly straight at constant speed.

use rand::Rng;

use super::rect::Rect;
use crate::config::PhysicsConfig;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
}

/// How a body decides whether it is standing on something.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GroundSensor {
    /// 1-pixel probe below the rect, tested against tiles.
    Probe,
    /// Never grounded; falls forever.
    Never,
}

#[derive(Clone, Debug)]
pub struct PhysicsBody {
    pub rect: Rect,
    pub vel_x: i32,
    pub vel_y: i32,
    pub on_ground: bool,
    pub gravity: i32,
    pub terminal_velocity: i32,
    pub sensor: GroundSensor,
}

impl PhysicsBody {
    pub fn new(rect: Rect, gravity: i32, terminal_velocity: i32, sensor: GroundSensor) -> Self {
        PhysicsBody {
            rect,
            vel_x: 0,
            vel_y: 0,
            on_ground: false,
            gravity,
            terminal_velocity,
            sensor,
        }
    }
}

// ── Animation ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AnimationState {
    Idle,
    Run,
    Jump,
    Fall,
}

impl AnimationState {
    /// Pick the animation matching what a body is doing right now.
    /// Rising wins over `on_ground`: on the tick a jump starts the probe
    /// still touches the floor.
    pub fn of(body: &PhysicsBody) -> Self {
        if body.vel_y < 0 {
            AnimationState::Jump
        } else if !body.on_ground {
            AnimationState::Fall
        } else if body.vel_x != 0 {
            AnimationState::Run
        } else {
            AnimationState::Idle
        }
    }
}

/// Frame cursor for an animated sprite.
///
/// `frame_idx` only ever counts up; the renderer wraps it modulo the number
/// of frames it has for `state`.
#[derive(Clone, Debug)]
pub struct Animation {
    pub state: AnimationState,
    pub frame_idx: usize,
    steps: u32,
    period: u32,
}

impl Animation {
    pub fn new(period: u32) -> Self {
        Animation {
            state: AnimationState::Idle,
            frame_idx: 0,
            steps: 0,
            period: period.max(1),
        }
    }

    /// Switch animation. Restarts from the first frame only on an actual change.
    pub fn set_state(&mut self, state: AnimationState) {
        if self.state != state {
            self.state = state;
            self.frame_idx = 0;
            self.steps = 0;
        }
    }

    /// Advance one tick; moves to the next frame once every `period` ticks.
    pub fn animate(&mut self) {
        self.steps = (self.steps + 1) % self.period;
        if self.steps == 0 {
            self.frame_idx = self.frame_idx.wrapping_add(1);
        }
    }
}

/// Frames between animation frame changes, derived from walking speed.
fn animation_period(cfg: &PhysicsConfig) -> u32 {
    (cfg.speed.max(1) * 3) as u32
}

// ── Input ──

/// Player intent for one tick.
/// Horizontal movement is continuous (held key); jump and shoot are
/// edge-triggered (fresh press).
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    pub horizontal: Option<Direction>,
    pub jump: bool,
    pub shoot: bool,
}

// ── Player ──

#[derive(Clone, Debug)]
pub struct Player {
    pub body: PhysicsBody,
    pub direction: Direction,
    pub animation: Animation,
    pub bullets: Vec<Bullet>,
    speed: i32,
    jump_speed: i32,
    bullet_speed: i32,
    bullet_period: u32,
}

impl Player {
    pub fn new(x: i32, y: i32, cfg: &PhysicsConfig) -> Self {
        let rect = Rect::new(x, y, cfg.tile_size / 2, cfg.tile_size);
        Player {
            body: PhysicsBody::new(rect, cfg.gravity, cfg.terminal_velocity, GroundSensor::Probe),
            direction: Direction::Right,
            animation: Animation::new(animation_period(cfg)),
            bullets: vec![],
            speed: cfg.speed,
            jump_speed: cfg.jump_speed,
            bullet_speed: cfg.bullet_speed,
            bullet_period: animation_period(cfg),
        }
    }

    pub fn move_left(&mut self) {
        self.body.vel_x = -self.speed;
        self.direction = Direction::Left;
    }

    pub fn move_right(&mut self) {
        self.body.vel_x = self.speed;
        self.direction = Direction::Right;
    }

    pub fn stop(&mut self) {
        self.body.vel_x = 0;
    }

    /// Jump if standing on something. One jump per ground contact.
    /// Returns true if the jump fired.
    pub fn jump(&mut self) -> bool {
        if !self.body.on_ground {
            return false;
        }
        self.body.vel_y = -self.jump_speed;
        self.body.on_ground = false;
        true
    }

    /// Fire a bullet from the player's center in the facing direction.
    pub fn shoot(&mut self) {
        let (cx, cy) = self.body.rect.center();
        self.bullets.push(Bullet::new(cx, cy, self.direction, self.bullet_speed, self.bullet_period));
    }

    /// Translate one tick of input into actions.
    /// Returns (jumped, shot) for event reporting.
    pub fn apply_input(&mut self, input: FrameInput) -> (bool, bool) {
        match input.horizontal {
            Some(Direction::Left) => self.move_left(),
            Some(Direction::Right) => self.move_right(),
            None => self.stop(),
        }
        let jumped = input.jump && self.jump();
        if input.shoot {
            self.shoot();
        }
        (jumped, input.shoot)
    }
}

// ── Enemy ──

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: PhysicsBody,
    pub direction: Direction,
    pub animation: Animation,
}

impl Enemy {
    pub fn new(x: i32, y: i32, cfg: &PhysicsConfig) -> Self {
        let rect = Rect::new(x, y, cfg.tile_size / 2, cfg.tile_size);
        Enemy {
            body: PhysicsBody::new(rect, cfg.gravity, cfg.terminal_velocity, GroundSensor::Probe),
            direction: Direction::Left,
            animation: Animation::new(animation_period(cfg)),
        }
    }
}

// ── SnowFlake ──

pub const SNOWFLAKE_SIZE: i32 = 10;

#[derive(Clone, Debug)]
pub struct SnowFlake {
    pub body: PhysicsBody,
    pub animation: Animation,
}

impl SnowFlake {
    /// Spawn anywhere on screen.
    pub fn new<R: Rng>(rng: &mut R, cfg: &PhysicsConfig) -> Self {
        let x = rng.gen_range(0..cfg.screen_width);
        let y = rng.gen_range(0..cfg.screen_height);
        let rect = Rect::new(x, y, SNOWFLAKE_SIZE, SNOWFLAKE_SIZE);
        SnowFlake {
            body: PhysicsBody::new(
                rect,
                cfg.snowflake_gravity,
                cfg.snowflake_terminal_velocity,
                GroundSensor::Never,
            ),
            animation: Animation::new(animation_period(cfg)),
        }
    }

    /// Put the flake back at the top of the screen at a random column.
    pub fn respawn<R: Rng>(&mut self, rng: &mut R, screen_width: i32) {
        let x = rng.gen_range(0..screen_width);
        self.body.rect.set_topleft(x, 0);
        self.body.vel_y = 0;
    }
}

// ── Bullet ──

pub const BULLET_SIZE: i32 = 10;

#[derive(Clone, Debug)]
pub struct Bullet {
    pub rect: Rect,
    pub direction: Direction,
    pub speed: i32,
    pub animation: Animation,
}

impl Bullet {
    pub fn new(x: i32, y: i32, direction: Direction, speed: i32, period: u32) -> Self {
        Bullet {
            rect: Rect::new(x, y, BULLET_SIZE, BULLET_SIZE),
            direction,
            speed,
            animation: Animation::new(period),
        }
    }

    pub fn vel_x(&self) -> i32 {
        match self.direction {
            Direction::Right => self.speed,
            Direction::Left => -self.speed,
        }
    }

    pub fn advance(&mut self) {
        self.rect.x += self.vel_x();
        self.animation.animate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cfg() -> PhysicsConfig {
        GameConfig::default().physics
    }

    #[test]
    fn player_is_half_tile_wide() {
        let p = Player::new(64, 128, &cfg());
        assert_eq!(p.body.rect, Rect::new(64, 128, 32, 64));
        assert_eq!(p.direction, Direction::Right);
    }

    #[test]
    fn move_and_stop() {
        let mut p = Player::new(0, 0, &cfg());
        p.move_left();
        assert_eq!(p.body.vel_x, -5);
        assert_eq!(p.direction, Direction::Left);
        p.move_right();
        assert_eq!(p.body.vel_x, 5);
        assert_eq!(p.direction, Direction::Right);
        p.stop();
        assert_eq!(p.body.vel_x, 0);
        assert_eq!(p.direction, Direction::Right);
    }

    #[test]
    fn jump_requires_ground() {
        let mut p = Player::new(0, 0, &cfg());
        p.body.on_ground = false;
        p.body.vel_y = 3;
        assert!(!p.jump());
        assert_eq!(p.body.vel_y, 3);

        p.body.on_ground = true;
        assert!(p.jump());
        assert_eq!(p.body.vel_y, -30);
        assert!(!p.body.on_ground);

        // No double jump
        assert!(!p.jump());
        assert_eq!(p.body.vel_y, -30);
    }

    #[test]
    fn shoot_spawns_bullet_at_center_facing() {
        let mut p = Player::new(100, 200, &cfg());
        p.move_left();
        p.shoot();
        assert_eq!(p.bullets.len(), 1);
        let b = &p.bullets[0];
        assert_eq!((b.rect.x, b.rect.y), (116, 232));
        assert_eq!(b.vel_x(), -10);
    }

    #[test]
    fn bullets_are_per_player() {
        let mut a = Player::new(0, 0, &cfg());
        let b = Player::new(0, 0, &cfg());
        a.shoot();
        assert_eq!(a.bullets.len(), 1);
        assert!(b.bullets.is_empty());
    }

    #[test]
    fn apply_input_without_direction_stops() {
        let mut p = Player::new(0, 0, &cfg());
        p.move_right();
        let (jumped, shot) = p.apply_input(FrameInput::default());
        assert_eq!(p.body.vel_x, 0);
        assert!(!jumped);
        assert!(!shot);
    }

    #[test]
    fn animation_advances_every_period() {
        let mut a = Animation::new(15);
        for _ in 0..14 { a.animate(); }
        assert_eq!(a.frame_idx, 0);
        a.animate();
        assert_eq!(a.frame_idx, 1);
        for _ in 0..15 { a.animate(); }
        assert_eq!(a.frame_idx, 2);
    }

    #[test]
    fn animation_resets_on_state_change_only() {
        let mut a = Animation::new(1);
        a.animate();
        a.animate();
        assert_eq!(a.frame_idx, 2);
        a.set_state(AnimationState::Idle);
        assert_eq!(a.frame_idx, 2);
        a.set_state(AnimationState::Run);
        assert_eq!(a.frame_idx, 0);
    }

    #[test]
    fn animation_state_from_body() {
        let mut body = PhysicsBody::new(Rect::new(0, 0, 1, 1), 2, 5, GroundSensor::Probe);
        body.on_ground = true;
        assert_eq!(AnimationState::of(&body), AnimationState::Idle);
        body.vel_x = 5;
        assert_eq!(AnimationState::of(&body), AnimationState::Run);
        body.on_ground = false;
        body.vel_y = -30;
        assert_eq!(AnimationState::of(&body), AnimationState::Jump);
        body.vel_y = 4;
        assert_eq!(AnimationState::of(&body), AnimationState::Fall);
    }

    #[test]
    fn snowflake_spawns_on_screen() {
        let c = cfg();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let f = SnowFlake::new(&mut rng, &c);
            assert!((0..c.screen_width).contains(&f.body.rect.x));
            assert!((0..c.screen_height).contains(&f.body.rect.y));
            assert_eq!(f.body.sensor, GroundSensor::Never);
        }
    }
}
