/// The step function: advances a level by one tick.
///
/// Processing order:
///   1. Player intent (move / stop / jump / shoot)
///   2. Player physics (gravity → integrate → tile collision) + animation
///   3. Player bullets (fly, then cull outside the camera window)
///   4. Enemies (gravity → integrate → tile collision), no AI
///   5. Snowflakes (gravity → fall → respawn at the top)
///   6. Camera follow
///   7. Snowflake horizontal wrap into the camera window
///
/// Physics queries live in `domain::physics`; this module only sequences them.

use crate::domain::entity::{AnimationState, FrameInput, PhysicsBody};
use crate::domain::physics;
use super::event::GameEvent;
use super::world::Level;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

/// Apply one tick of player input, then advance the level.
pub fn step(level: &mut Level, input: FrameInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let (jumped, shot) = level.player.apply_input(input);
    if jumped {
        tracing::debug!(tick = level.tick, "player jumped");
        events.push(GameEvent::PlayerJumped);
    }
    if shot {
        tracing::debug!(tick = level.tick, bullets = level.player.bullets.len(), "player shot");
        events.push(GameEvent::BulletFired);
    }

    update(level, &mut events);
    events
}

/// Advance every entity and the camera by one tick.
pub fn update(level: &mut Level, events: &mut Vec<GameEvent>) {
    level.tick += 1;

    resolve_player(level, events);
    resolve_bullets(level, events);
    resolve_enemies(level, events);
    resolve_snowflakes(level, events);
    level.camera.follow(level.player.body.rect.centerx());
    wrap_snowflakes(level);
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn resolve_player(level: &mut Level, events: &mut Vec<GameEvent>) {
    let threshold = level.tuning.overlap_threshold;
    let player = &mut level.player;
    let was_grounded = player.body.on_ground;

    player.animation.animate();
    physics::step_body(&mut player.body, &level.tiles, threshold);
    player.animation.set_state(AnimationState::of(&player.body));

    if landed(was_grounded, &player.body) {
        tracing::debug!(tick = level.tick, x = player.body.rect.x, y = player.body.rect.y, "player landed");
        events.push(GameEvent::PlayerLanded);
    }
}

/// Grounded now, not before, and not on the way up from a jump.
fn landed(was_grounded: bool, body: &PhysicsBody) -> bool {
    !was_grounded && body.on_ground && body.vel_y == 0
}

/// Bullets fly straight and vanish once fully outside the visible window.
fn resolve_bullets(level: &mut Level, events: &mut Vec<GameEvent>) {
    let view = level.view_rect();
    let bullets = &mut level.player.bullets;

    for b in bullets.iter_mut() {
        b.advance();
    }

    let before = bullets.len();
    bullets.retain(|b| b.rect.collides(&view));
    let expired = before - bullets.len();
    if expired > 0 {
        events.push(GameEvent::BulletExpired { count: expired });
    }
}

// ══════════════════════════════════════════════════════════════
// Enemies: gravity and collision only
// ══════════════════════════════════════════════════════════════

fn resolve_enemies(level: &mut Level, events: &mut Vec<GameEvent>) {
    let threshold = level.tuning.overlap_threshold;
    for (idx, enemy) in level.enemies.iter_mut().enumerate() {
        let was_grounded = enemy.body.on_ground;
        enemy.animation.animate();
        physics::step_body(&mut enemy.body, &level.tiles, threshold);
        enemy.animation.set_state(AnimationState::of(&enemy.body));
        if landed(was_grounded, &enemy.body) {
            events.push(GameEvent::EnemyLanded { idx });
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Snowflakes: fall forever, respawn at the top
// ══════════════════════════════════════════════════════════════

fn resolve_snowflakes(level: &mut Level, events: &mut Vec<GameEvent>) {
    let screen_w = level.tuning.screen_width;
    let screen_h = level.tuning.screen_height;

    for flake in level.snowflakes.iter_mut() {
        flake.animation.animate();
        physics::apply_gravity(&mut flake.body, &level.tiles);
        physics::integrate(&mut flake.body);
        if flake.body.rect.y >= screen_h {
            flake.respawn(&mut level.rng, screen_w);
            events.push(GameEvent::SnowFlakeRespawned);
        }
    }
}

/// Keep decorative flakes on screen as the camera moves right: a flake that
/// drifted off the left edge reappears one screen width further right.
fn wrap_snowflakes(level: &mut Level) {
    let screen_w = level.tuning.screen_width;
    for flake in level.snowflakes.iter_mut() {
        if level.camera.to_screen_x(flake.body.rect.x) < 0 {
            flake.body.rect.x += screen_w;
        }
    }
}
