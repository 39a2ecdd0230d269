/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::error::Error;
use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use domain::entity::{Direction, FrameInput};
use sim::event::GameEvent;
use sim::game::{Game, Phase};
use sim::level::{load_level_defs, LevelError};
use ui::gamepad::Gamepad;
use ui::input::{self, Keyboard};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Everything the loop touches, owned in one place.
struct App {
    config: GameConfig,
    game: Game,
    renderer: Renderer,
    keyboard: Keyboard,
    gamepad: Gamepad,
    sound: Option<SoundEngine>,
}

fn main() {
    // Config problems are reported on stderr; the log file isn't known yet.
    let startup = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    let config = tracing::subscriber::with_default(startup, GameConfig::load);
    init_logging(&config);

    let game = match Game::new(load_level_defs(&config), &config) {
        Ok(game) => game,
        Err(e) => {
            error!("startup aborted: {e}");
            eprintln!("Level error: {e}");
            std::process::exit(1);
        }
    };

    let mut app = App {
        renderer: Renderer::new(&config.render),
        keyboard: Keyboard::new(),
        gamepad: Gamepad::new(&config.gamepad),
        sound: SoundEngine::new(),
        game,
        config,
    };

    if let Err(e) = app.renderer.init() {
        error!("terminal init failed: {e}");
        eprintln!("Terminal init failed: {e}");
        return;
    }
    app.keyboard.honor_release = app.renderer.enable_key_release();
    info!(key_release = app.keyboard.honor_release, gamepad = app.gamepad.connected, "terminal ready");

    let result = app.run();

    if let Err(e) = app.renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    info!(level = %app.game.level.name, ticks = app.game.level.tick, "exit");
    println!();
    println!("Thanks for playing Frostbound!");
}

/// File logger filtered by `RUST_LOG` (default `info`). The terminal is the
/// game screen, so nothing is ever logged to stdout.
fn init_logging(config: &GameConfig) {
    let file = match File::create(&config.log_file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("logging disabled, cannot create {}: {e}", config.log_file.display());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

impl App {
    fn run(&mut self) -> Result<(), Box<dyn Error>> {
        let fps = self.config.timing.fps.max(1);
        let tick_rate = Duration::from_secs_f64(1.0 / fps as f64);
        let mut last_tick = Instant::now();
        let mut pending = FrameInput::default();
        info!(fps, "game loop started");

        loop {
            self.keyboard.poll();
            self.gamepad.poll();

            if self.keyboard.ctrl_c_pressed() {
                self.game.quit();
            }

            let phase_before = self.game.phase;
            self.handle_meta()?;
            if self.game.is_done() {
                break;
            }

            // Edges are latched until the next tick so a press between ticks
            // still counts. The press that started the game is not a jump.
            if phase_before == Phase::Started && self.game.phase == Phase::Started {
                pending.jump |= self.keyboard.any_pressed(input::KEYS_JUMP) || self.gamepad.jump_pressed();
                pending.shoot |= self.keyboard.any_pressed(input::KEYS_SHOOT) || self.gamepad.shoot_pressed();
            } else {
                pending = FrameInput::default();
            }

            if last_tick.elapsed() >= tick_rate {
                last_tick = Instant::now();
                let frame_input = FrameInput {
                    horizontal: self.held_direction(),
                    ..std::mem::take(&mut pending)
                };
                let events = self.game.tick(frame_input);
                self.play_sounds(&events);
            }

            self.renderer.render(&self.game)?;
            std::thread::sleep(FRAME_SLEEP);
        }

        Ok(())
    }

    /// Quit, start, pause, restart and next-level keys.
    fn handle_meta(&mut self) -> Result<(), LevelError> {
        let kb = &self.keyboard;
        let gp = &self.gamepad;

        if kb.any_pressed(input::KEYS_QUIT) || gp.cancel_pressed() {
            self.game.quit();
            return Ok(());
        }

        match self.game.phase {
            Phase::Idle => {
                if kb.any_pressed(input::KEYS_CONFIRM) || gp.confirm_pressed() {
                    self.game.start();
                    if let Some(sfx) = &self.sound {
                        sfx.play_start();
                    }
                }
            }
            Phase::Started | Phase::Paused => {
                if kb.any_pressed(input::KEYS_PAUSE) || gp.pause_pressed() {
                    self.game.toggle_pause();
                } else if kb.any_pressed(input::KEYS_RESTART) {
                    self.game.restart_level()?;
                } else if kb.any_pressed(input::KEYS_NEXT_LEVEL) {
                    self.game.next_level()?;
                    if let Some(sfx) = &self.sound {
                        sfx.play_start();
                    }
                }
            }
            Phase::GameOver => {}
        }
        Ok(())
    }

    /// Left wins when both directions are held.
    fn held_direction(&self) -> Option<Direction> {
        if self.keyboard.any_held(input::KEYS_LEFT) || self.gamepad.left_held() {
            Some(Direction::Left)
        } else if self.keyboard.any_held(input::KEYS_RIGHT) || self.gamepad.right_held() {
            Some(Direction::Right)
        } else {
            None
        }
    }

    fn play_sounds(&self, events: &[GameEvent]) {
        let sfx = match &self.sound {
            Some(s) => s,
            None => return,
        };
        for event in events {
            match event {
                GameEvent::PlayerJumped => sfx.play_jump(),
                GameEvent::BulletFired => sfx.play_shoot(),
                GameEvent::PlayerLanded => sfx.play_land(),
                GameEvent::BulletExpired { count } => {
                    debug!(count, "snowballs left the screen");
                    sfx.play_fizzle();
                }
                GameEvent::EnemyLanded { .. } | GameEvent::SnowFlakeRespawned => {}
            }
        }
    }
}
