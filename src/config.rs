/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to the built-in tuning if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use tracing::{info, warn};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub timing: TimingConfig,
    pub render: RenderConfig,
    pub gamepad: GamepadConfig,
    pub levels_dir: PathBuf,
    pub start_level: usize,
    pub seed: Option<u64>,
    pub log_file: PathBuf,
}

/// Movement and collision tuning, all in pixels (per tick where relevant).
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    pub tile_size: i32,
    pub screen_width: i32,
    pub screen_height: i32,
    pub speed: i32,
    pub jump_speed: i32,
    pub gravity: i32,
    pub terminal_velocity: i32,
    pub snowflake_gravity: i32,
    pub snowflake_terminal_velocity: i32,
    pub overlap_threshold: i32,
    pub bullet_speed: i32,
    pub snowflake_count: usize,
}

#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub min_offset: i32,
    pub max_offset: i32,
    pub step: i32,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub fps: u32,
}

/// How many world pixels one terminal cell covers.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub cell_width_px: i32,
    pub cell_height_px: i32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub shoot: Vec<String>,
    pub pause: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    camera: TomlCamera,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    render: TomlRender,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_tile_size")]
    tile_size: i32,
    #[serde(default = "default_screen_width")]
    screen_width: i32,
    #[serde(default = "default_screen_height")]
    screen_height: i32,
    #[serde(default = "default_speed")]
    speed: i32,
    #[serde(default = "default_jump_speed")]
    jump_speed: i32,
    #[serde(default = "default_gravity")]
    gravity: i32,
    #[serde(default = "default_terminal_velocity")]
    terminal_velocity: i32,
    #[serde(default = "default_snowflake_gravity")]
    snowflake_gravity: i32,
    #[serde(default = "default_snowflake_terminal")]
    snowflake_terminal_velocity: i32,
    #[serde(default = "default_overlap_threshold")]
    overlap_threshold: i32,
    #[serde(default = "default_bullet_speed")]
    bullet_speed: i32,
    #[serde(default = "default_snowflake_count")]
    snowflake_count: usize,
}

#[derive(Deserialize, Debug)]
struct TomlCamera {
    #[serde(default = "default_min_offset")]
    min_offset: i32,
    #[serde(default = "default_max_offset")]
    max_offset: i32,
    #[serde(default = "default_camera_step")]
    step: i32,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_fps")]
    fps: u32,
}

#[derive(Deserialize, Debug)]
struct TomlRender {
    #[serde(default = "default_cell_width")]
    cell_width_px: i32,
    #[serde(default = "default_cell_height")]
    cell_height_px: i32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_shoot")]
    shoot: Vec<String>,
    #[serde(default = "default_pad_pause")]
    pause: Vec<String>,
    #[serde(default = "default_pad_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_pad_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default)]
    start_level: usize,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_tile_size() -> i32 { 64 }
fn default_screen_width() -> i32 { 64 * 12 }
fn default_screen_height() -> i32 { 64 * 10 }
fn default_speed() -> i32 { 5 }
fn default_jump_speed() -> i32 { 30 }
fn default_gravity() -> i32 { 2 }
fn default_terminal_velocity() -> i32 { 5 }
fn default_snowflake_gravity() -> i32 { 1 }
fn default_snowflake_terminal() -> i32 { 2 }
fn default_overlap_threshold() -> i32 { 10 }
fn default_bullet_speed() -> i32 { 10 }
fn default_snowflake_count() -> usize { 20 }

fn default_min_offset() -> i32 { 100 }
fn default_max_offset() -> i32 { 400 }
fn default_camera_step() -> i32 { 5 }

fn default_fps() -> u32 { 60 }

fn default_cell_width() -> i32 { 16 }   // 768px / 16 = 48 columns
fn default_cell_height() -> i32 { 32 }  // 640px / 32 = 20 rows

fn default_pad_jump() -> Vec<String> { vec!["A".into()] }
fn default_pad_shoot() -> Vec<String> { vec!["X".into(), "R1".into()] }
fn default_pad_pause() -> Vec<String> { vec!["Start".into()] }
fn default_pad_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_pad_cancel() -> Vec<String> { vec!["Select".into()] }

fn default_levels_dir() -> String { "levels".into() }
fn default_log_file() -> String { "frostbound.log".into() }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            tile_size: default_tile_size(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            speed: default_speed(),
            jump_speed: default_jump_speed(),
            gravity: default_gravity(),
            terminal_velocity: default_terminal_velocity(),
            snowflake_gravity: default_snowflake_gravity(),
            snowflake_terminal_velocity: default_snowflake_terminal(),
            overlap_threshold: default_overlap_threshold(),
            bullet_speed: default_bullet_speed(),
            snowflake_count: default_snowflake_count(),
        }
    }
}

impl Default for TomlCamera {
    fn default() -> Self {
        TomlCamera {
            min_offset: default_min_offset(),
            max_offset: default_max_offset(),
            step: default_camera_step(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming { fps: default_fps() }
    }
}

impl Default for TomlRender {
    fn default() -> Self {
        TomlRender {
            cell_width_px: default_cell_width(),
            cell_height_px: default_cell_height(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            shoot: default_pad_shoot(),
            pause: default_pad_pause(),
            confirm: default_pad_confirm(),
            cancel: default_pad_cancel(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
            start_level: 0,
            seed: None,
            log_file: default_log_file(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse config text directly (no directory search for `levels_dir`).
    #[cfg(test)]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(toml_cfg, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let levels_dir_str = &toml_cfg.general.levels_dir;
        let levels_dir = if PathBuf::from(levels_dir_str).is_absolute() {
            PathBuf::from(levels_dir_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(levels_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(levels_dir_str))
        };

        let p = toml_cfg.physics;
        GameConfig {
            physics: PhysicsConfig {
                tile_size: p.tile_size.max(1),
                screen_width: p.screen_width.max(1),
                screen_height: p.screen_height.max(1),
                speed: p.speed,
                jump_speed: p.jump_speed,
                gravity: p.gravity,
                terminal_velocity: p.terminal_velocity,
                snowflake_gravity: p.snowflake_gravity,
                snowflake_terminal_velocity: p.snowflake_terminal_velocity,
                overlap_threshold: p.overlap_threshold,
                bullet_speed: p.bullet_speed,
                snowflake_count: p.snowflake_count,
            },
            camera: CameraConfig {
                min_offset: toml_cfg.camera.min_offset,
                max_offset: toml_cfg.camera.max_offset,
                step: toml_cfg.camera.step,
            },
            timing: TimingConfig {
                fps: toml_cfg.timing.fps.max(1),
            },
            render: RenderConfig {
                cell_width_px: toml_cfg.render.cell_width_px.max(1),
                cell_height_px: toml_cfg.render.cell_height_px.max(1),
            },
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                shoot: toml_cfg.gamepad.shoot,
                pause: toml_cfg.gamepad.pause,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
            },
            levels_dir,
            start_level: toml_cfg.general.start_level,
            seed: toml_cfg.general.seed,
            log_file: PathBuf::from(toml_cfg.general.log_file),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), &[])
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        info!(path = %path.display(), "loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        warn!("config.toml parse error: {e}; using default settings");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
