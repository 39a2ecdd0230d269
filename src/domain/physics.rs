/// Physics: gravity, ground detection and tile collision.
///
/// ## Per-tick order for a body
///
///   1. `apply_gravity`     : refresh `on_ground`, accelerate if airborne
///   2. `integrate`         : `rect += velocity`
///   3. `resolve_collisions`: push the rect back out of tiles it entered
///
/// ## Ground detection
///
/// A body is on the ground if its rect, moved down by exactly one pixel,
/// overlaps any tile. `on_ground` is recomputed at the start of every tick
/// so it can never go stale. Bodies with `GroundSensor::Never` are never
/// grounded.
///
/// ## Collision resolution
///
/// Not a swept test. After integration, every tile overlapping the rect is
/// collected, then for each hit:
///
///   - Horizontal: moving right and `|right - tile.left| < threshold`
///     → snap right edge to tile.left, stop. Mirror for moving left.
///   - Vertical: falling and `|bottom - tile.top| < threshold`
///     → snap onto tile.top, stop, grounded. Mirror for rising.
///
/// The two axes are independent: a diagonal approach into a tile corner
/// may be corrected on both axes by the same tile. Corrections apply in
/// hit order to the same rect; later writes win.
///
/// Penetrations at or beyond `threshold` are ignored, so a body that ends up
/// deep inside a tile (teleport, very high speed) is left where it is.

use super::entity::{GroundSensor, PhysicsBody};
use super::tile::Tile;

/// Is there a tile directly under the body (1-pixel probe)?
pub fn check_in_ground(body: &PhysicsBody, tiles: &[Tile]) -> bool {
    match body.sensor {
        GroundSensor::Never => false,
        GroundSensor::Probe => {
            let below = body.rect.translated(0, 1);
            tiles.iter().any(|t| below.collides(&t.rect))
        }
    }
}

/// Refresh ground state; accelerate downwards towards terminal velocity if airborne.
pub fn apply_gravity(body: &mut PhysicsBody, tiles: &[Tile]) {
    body.on_ground = check_in_ground(body, tiles);
    if !body.on_ground {
        body.vel_y = (body.vel_y + body.gravity).min(body.terminal_velocity);
    }
}

/// Move the rect by one tick of velocity.
pub fn integrate(body: &mut PhysicsBody) {
    body.rect.x += body.vel_x;
    body.rect.y += body.vel_y;
}

/// Push the body out of any tile it overlaps (see module docs).
pub fn resolve_collisions(body: &mut PhysicsBody, tiles: &[Tile], threshold: i32) {
    let hits: Vec<usize> = tiles.iter()
        .enumerate()
        .filter(|(_, t)| body.rect.collides(&t.rect))
        .map(|(i, _)| i)
        .collect();

    for i in hits {
        let t = tiles[i].rect;

        if body.vel_x > 0 && (body.rect.right() - t.left()).abs() < threshold {
            body.rect.set_right(t.left());
            body.vel_x = 0;
        } else if body.vel_x < 0 && (body.rect.left() - t.right()).abs() < threshold {
            body.rect.set_left(t.right());
            body.vel_x = 0;
        }

        if body.vel_y > 0 && (body.rect.bottom() - t.top()).abs() < threshold {
            body.rect.set_bottom(t.top());
            body.vel_y = 0;
            body.on_ground = true;
        } else if body.vel_y < 0 && (body.rect.top() - t.bottom()).abs() < threshold {
            body.rect.set_top(t.bottom());
            body.vel_y = 0;
        }
    }
}

/// Full tick for a solid body: gravity, integration, collision.
pub fn step_body(body: &mut PhysicsBody, tiles: &[Tile], threshold: i32) {
    apply_gravity(body, tiles);
    integrate(body);
    resolve_collisions(body, tiles, threshold);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rect::Rect;

    const THRESHOLD: i32 = 10;

    fn body(x: i32, y: i32, w: i32, h: i32) -> PhysicsBody {
        PhysicsBody::new(Rect::new(x, y, w, h), 2, 5, GroundSensor::Probe)
    }

    fn tile(x: i32, y: i32) -> Tile {
        Tile::new(64, x, y)
    }

    // ── Ground probe ──

    #[test]
    fn probe_detects_tile_directly_below() {
        let tiles = [tile(0, 64)];
        let b = body(0, 0, 32, 64);
        assert!(check_in_ground(&b, &tiles));
    }

    #[test]
    fn probe_misses_tile_one_pixel_lower() {
        let tiles = [tile(0, 65)];
        let b = body(0, 0, 32, 64);
        assert!(!check_in_ground(&b, &tiles));
    }

    #[test]
    fn never_sensor_ignores_tiles() {
        let tiles = [tile(0, 64)];
        let mut b = body(0, 0, 32, 64);
        b.sensor = GroundSensor::Never;
        assert!(!check_in_ground(&b, &tiles));
    }

    // ── Gravity ──

    #[test]
    fn gravity_accumulates_to_terminal_velocity() {
        let mut b = body(0, 0, 32, 64);
        let mut last = b.vel_y;
        let mut seen = vec![];
        for _ in 0..10 {
            apply_gravity(&mut b, &[]);
            assert!(b.vel_y >= last);
            assert!(b.vel_y <= b.terminal_velocity);
            seen.push(b.vel_y);
            last = b.vel_y;
        }
        assert_eq!(&seen[..4], &[2, 4, 5, 5]);
        assert!(seen.iter().skip(2).all(|&v| v == 5));
    }

    #[test]
    fn gravity_strictly_increases_until_terminal() {
        let mut b = body(0, 0, 32, 64);
        b.gravity = 1;
        b.terminal_velocity = 4;
        for expected in 1..=4 {
            apply_gravity(&mut b, &[]);
            assert_eq!(b.vel_y, expected);
        }
        apply_gravity(&mut b, &[]);
        assert_eq!(b.vel_y, 4);
    }

    #[test]
    fn grounded_body_keeps_velocity() {
        let tiles = [tile(0, 64)];
        let mut b = body(0, 0, 32, 64);
        apply_gravity(&mut b, &tiles);
        assert!(b.on_ground);
        assert_eq!(b.vel_y, 0);
    }

    #[test]
    fn rising_from_ground_keeps_jump_velocity_for_one_tick() {
        // Still touching the floor on the tick the jump starts: gravity skipped.
        let tiles = [tile(0, 64)];
        let mut b = body(0, 0, 32, 64);
        b.vel_y = -30;
        apply_gravity(&mut b, &tiles);
        assert_eq!(b.vel_y, -30);
        integrate(&mut b);
        apply_gravity(&mut b, &tiles);
        assert!(!b.on_ground);
        assert_eq!(b.vel_y, -28);
    }

    // ── Landing ──

    #[test]
    fn falling_body_lands_and_stays_put() {
        let tiles = [tile(0, 100)];
        let mut b = body(0, 30, 32, 64); // bottom = 94
        for _ in 0..10 {
            step_body(&mut b, &tiles, THRESHOLD);
        }
        assert_eq!(b.rect.bottom(), 100);
        assert!(b.on_ground);
        assert_eq!(b.vel_y, 0);

        for _ in 0..10 {
            step_body(&mut b, &tiles, THRESHOLD);
            assert_eq!(b.vel_y, 0);
            assert_eq!(b.rect.bottom(), 100);
        }
    }

    #[test]
    fn head_bump_stops_rising() {
        let tiles = [tile(0, 0)];
        let mut b = body(0, 70, 32, 64); // top = 70, tile bottom = 64
        b.vel_y = -8;
        integrate(&mut b);
        resolve_collisions(&mut b, &tiles, THRESHOLD);
        assert_eq!(b.rect.top(), 64);
        assert_eq!(b.vel_y, 0);
        assert!(!b.on_ground);
    }

    // ── Walls ──

    #[test]
    fn approach_from_left_never_passes_tile_edge() {
        let tiles = [Tile::new(64, 100, 100)];
        let mut b = body(58, 110, 32, 32); // right edge at 90
        b.vel_x = 5;
        for _ in 0..20 {
            integrate(&mut b);
            resolve_collisions(&mut b, &tiles, THRESHOLD);
            assert!(b.rect.right() <= tiles[0].rect.left() + 5);
        }
        assert_eq!(b.rect.right(), 100);
        assert_eq!(b.vel_x, 0);
    }

    #[test]
    fn approach_from_right_snaps_to_tile_right() {
        let tiles = [tile(0, 0)];
        let mut b = body(67, 10, 32, 32);
        b.vel_x = -5;
        integrate(&mut b);
        resolve_collisions(&mut b, &tiles, THRESHOLD);
        assert_eq!(b.rect.left(), 64);
        assert_eq!(b.vel_x, 0);
    }

    #[test]
    fn diagonal_hit_corrects_both_axes() {
        let tiles = [tile(100, 100)];
        // Overlaps the tile's top-left corner by 3px horizontally and 4px vertically
        let mut b = body(71, 40, 32, 64);
        b.vel_x = 5;
        b.vel_y = 5;
        resolve_collisions(&mut b, &tiles, THRESHOLD);
        assert_eq!(b.rect.right(), 100);
        assert_eq!(b.rect.bottom(), 100);
        assert_eq!((b.vel_x, b.vel_y), (0, 0));
        assert!(b.on_ground);
    }

    #[test]
    fn deep_penetration_is_left_alone() {
        let tiles = [tile(100, 100)];
        let mut b = body(90, 110, 32, 32); // 22px into the tile horizontally
        b.vel_x = 5;
        let before = b.rect;
        resolve_collisions(&mut b, &tiles, THRESHOLD);
        assert_eq!(b.rect, before);
        assert_eq!(b.vel_x, 5);
    }

    #[test]
    fn walking_along_floor_is_not_blocked() {
        let tiles = [tile(0, 64), tile(64, 64), tile(128, 64)];
        let mut b = body(0, 0, 32, 64);
        b.vel_x = 5;
        for _ in 0..20 {
            step_body(&mut b, &tiles, THRESHOLD);
        }
        assert_eq!(b.rect.x, 100);
        assert_eq!(b.rect.bottom(), 64);
        assert!(b.on_ground);
    }

    #[test]
    fn first_matching_tile_stops_horizontal_for_the_rest() {
        // Two stacked wall tiles; the first hit zeroes vel_x, the second sees vel_x == 0.
        let tiles = [tile(100, 0), tile(100, 64)];
        let mut b = body(71, 40, 32, 64);
        b.vel_x = 5;
        resolve_collisions(&mut b, &tiles, THRESHOLD);
        assert_eq!(b.rect.right(), 100);
        assert_eq!(b.vel_x, 0);
    }
}
