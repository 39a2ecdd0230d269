/// Level loader.
///
/// ## Sources (priority order):
///   1. `levels/` directory (individual `.txt` files, sorted by file name)
///   2. Built-in embedded levels
///
/// ## Level file format (`.txt`):
///   Optional first line: `# Level Name`
///   Remaining lines: map rows, one character per tile
///
/// ## Tile legend:
///   'X' = Solid tile     'P' = Player spawn (exactly one)
///   'E' = Enemy spawn    ' ' = Empty
///
/// Any other character is treated as empty space.
/// Cell `(col, row)` sits at world pixel `(col * tile_size, row * tile_size)`.

use std::path::Path;

use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::domain::camera::Camera;
use crate::domain::entity::{Enemy, Player, SnowFlake};
use crate::domain::tile::Tile;
use crate::sim::world::Level;

/// A parsed but not yet instantiated layout.
#[derive(Clone, Debug)]
pub struct LevelDef {
    pub name: String,
    pub rows: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level \"{0}\" has no rows")]
    EmptyLayout(String),

    #[error("level \"{0}\" has no player spawn ('P')")]
    MissingPlayer(String),

    #[error("level \"{name}\" has a second player spawn at column {col}, row {row}")]
    DuplicatePlayer { name: String, col: usize, row: usize },

    #[error("no levels to play")]
    NoLevels,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Instantiate a layout: tiles, player, enemies, snowflakes, camera.
pub fn build_level(def: &LevelDef, config: &GameConfig, mut rng: StdRng) -> Result<Level, LevelError> {
    if def.rows.iter().all(|r| r.trim().is_empty()) {
        return Err(LevelError::EmptyLayout(def.name.clone()));
    }

    let size = config.physics.tile_size;
    let mut tiles = vec![];
    let mut enemies = vec![];
    let mut player: Option<Player> = None;

    for (row, line) in def.rows.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let x = col as i32 * size;
            let y = row as i32 * size;
            match ch {
                'X' => tiles.push(Tile::new(size, x, y)),
                'P' => {
                    if player.is_some() {
                        return Err(LevelError::DuplicatePlayer {
                            name: def.name.clone(),
                            col,
                            row,
                        });
                    }
                    player = Some(Player::new(x, y, &config.physics));
                }
                'E' => enemies.push(Enemy::new(x, y, &config.physics)),
                _ => {}
            }
        }
    }

    let player = player.ok_or_else(|| LevelError::MissingPlayer(def.name.clone()))?;

    let snowflakes = (0..config.physics.snowflake_count)
        .map(|_| SnowFlake::new(&mut rng, &config.physics))
        .collect();

    let cols = def.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

    debug!(
        level = %def.name,
        tiles = tiles.len(),
        enemies = enemies.len(),
        "level built"
    );

    Ok(Level {
        name: def.name.clone(),
        tiles,
        player,
        enemies,
        snowflakes,
        camera: Camera::new(&config.camera),
        width: cols as i32 * size,
        height: def.rows.len() as i32 * size,
        tuning: config.physics.clone(),
        rng,
        tick: 0,
    })
}

/// Every playable layout: `levels/` files if any, otherwise the built-ins.
pub fn load_level_defs(config: &GameConfig) -> Vec<LevelDef> {
    let dir = &config.levels_dir;
    if dir.is_dir() {
        let mut levels = load_from_directory(dir);
        if !levels.is_empty() {
            levels.sort_by(|a, b| a.0.cmp(&b.0));
            info!(count = levels.len(), dir = %dir.display(), "using level files");
            return levels.into_iter().map(|(_, def)| def).collect();
        }
    }
    embedded_levels()
}

// ══════════════════════════════════════════════════════════════
// Single-level file parsing
// ══════════════════════════════════════════════════════════════

/// Parse a single level from text content.
/// The first `#` line names the level; later `#` lines are comments.
pub fn parse_level_file(content: &str, fallback_name: &str) -> Option<LevelDef> {
    let mut name = String::new();
    let mut rows = vec![];

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix('#') {
            if name.is_empty() && rows.is_empty() {
                name = rest.trim().to_string();
            }
            continue;
        }
        rows.push(line.trim_end_matches('\r').to_string());
    }

    while rows.last().map_or(false, |r| r.trim().is_empty()) {
        rows.pop();
    }

    if rows.is_empty() {
        return None;
    }

    if name.is_empty() {
        name = fallback_name.to_string();
    }

    Some(LevelDef { name, rows })
}

// ══════════════════════════════════════════════════════════════
// Directory loading (individual .txt files)
// ══════════════════════════════════════════════════════════════

fn load_from_directory(dir: &Path) -> Vec<(String, LevelDef)> {
    let mut results = vec![];

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("could not read {}: {e}", dir.display());
            return results;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map_or(false, |e| e == "txt") {
            let filename = path.file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    let stem = path.file_stem()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .to_string();
                    if let Some(def) = parse_level_file(&content, &stem) {
                        results.push((filename, def));
                    } else {
                        warn!("{} contains no map rows, skipped", path.display());
                    }
                }
                Err(e) => warn!("could not read {}: {e}", path.display()),
            }
        }
    }

    results
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels
// ══════════════════════════════════════════════════════════════

pub fn embedded_levels() -> Vec<LevelDef> {
    vec![
        make_embedded("Frozen Ledges", &[
            "   P                ",
            "   XXXX         XXXX",
            "          E         ",
            "         XXX        ",
            "                    ",
            "X                   ",
            "X     XX            ",
            "XX        E        X",
            "XXXX     XX  X    XX",
            "XXXXXX         XXXXX",
        ]),
        make_embedded("Icy Steps", &[
            "  P                 ",
            "XXXXXXX         XXXX",
            "                    ",
            "         XXX        ",
            "                    ",
            "X                   ",
            "X                   ",
            "XX                 X",
            "XXXX     XX       XX",
            "XXXX             XXX",
        ]),
    ]
}

fn make_embedded(name: &str, map: &[&str]) -> LevelDef {
    LevelDef {
        name: name.to_string(),
        rows: map.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn def(rows: &[&str]) -> LevelDef {
        make_embedded("test", rows)
    }

    fn build(rows: &[&str]) -> Result<Level, LevelError> {
        build_level(&def(rows), &GameConfig::default(), StdRng::seed_from_u64(1))
    }

    #[test]
    fn cells_map_to_tile_grid() {
        let level = build(&[
            " P  ",
            "XX E",
            "   X",
        ]).unwrap();
        assert_eq!(level.tiles.len(), 3);
        assert_eq!(level.tiles[0].rect.x, 0);
        assert_eq!(level.tiles[1].rect.x, 64);
        assert_eq!(level.tiles[2].rect.x, 192);
        assert_eq!(level.tiles[2].rect.y, 128);
        assert_eq!((level.player.body.rect.x, level.player.body.rect.y), (64, 0));
        assert_eq!(level.enemies.len(), 1);
        assert_eq!(level.enemies[0].body.rect.x, 192);
        assert_eq!(level.enemies[0].body.rect.y, 64);
        assert_eq!(level.width, 256);
        assert_eq!(level.height, 192);
        assert_eq!(level.camera.offset, 0);
    }

    #[test]
    fn snowflakes_are_spawned() {
        let level = build(&["P", "X"]).unwrap();
        assert_eq!(level.snowflakes.len(), 20);
    }

    #[test]
    fn missing_player_is_rejected() {
        let err = build(&["  E ", "XXXX"]).err();
        assert_eq!(err, Some(LevelError::MissingPlayer("test".into())));
    }

    #[test]
    fn duplicate_player_is_rejected() {
        let err = build(&["P  P", "XXXX"]).err();
        assert_eq!(
            err,
            Some(LevelError::DuplicatePlayer { name: "test".into(), col: 3, row: 0 })
        );
    }

    #[test]
    fn blank_layout_is_rejected() {
        assert!(matches!(build(&["   ", ""]), Err(LevelError::EmptyLayout(_))));
    }

    #[test]
    fn unknown_characters_are_empty() {
        let level = build(&["P?.", "X~X"]).unwrap();
        assert_eq!(level.tiles.len(), 2);
    }

    #[test]
    fn embedded_levels_are_valid() {
        let defs = embedded_levels();
        assert_eq!(defs.len(), 2);
        for d in &defs {
            let level = build_level(d, &GameConfig::default(), StdRng::seed_from_u64(0)).unwrap();
            assert!(!level.tiles.is_empty());
        }
    }

    #[test]
    fn parse_file_with_name_and_trailing_blank_rows() {
        let text = "# Cold Start\n P \nXXX\n\n   \n";
        let d = parse_level_file(text, "fallback").unwrap();
        assert_eq!(d.name, "Cold Start");
        assert_eq!(d.rows, vec![" P ".to_string(), "XXX".to_string()]);
    }

    #[test]
    fn parse_file_without_name_uses_fallback() {
        let d = parse_level_file("P\nX\n", "level_03").unwrap();
        assert_eq!(d.name, "level_03");
    }

    #[test]
    fn parse_file_without_rows_is_none() {
        assert!(parse_level_file("# Only a name\n\n", "x").is_none());
    }
}
