/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Compose the next frame onto the canvas (front buffer)
///   2. Compare each cell with `back` (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen layout: HUD on row 0, the world viewport from row 1, a help line
/// below the viewport.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::config::RenderConfig;
use crate::domain::rect::Rect;
use crate::sim::game::{Game, Phase};
use super::canvas::{Canvas, Cell, FrameBuffer};
use super::sprites::{Drawable, SKY};

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 1;

const HUD_BG: Color = Color::Rgb { r: 20, g: 30, b: 70 };
const TITLE_FG: Color = Color::Rgb { r: 170, g: 225, b: 255 };
const PROMPT_FG: Color = Color::Rgb { r: 80, g: 255, b: 160 };
const DIM: Color = Color::DarkGrey;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    canvas: Canvas,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    frame: u64,
    key_release: bool,
}

impl Renderer {
    pub fn new(cfg: &RenderConfig) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            canvas: Canvas::new(cfg, MAP_ROW),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            frame: 0,
            key_release: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.fit_terminal()
    }

    /// Ask the terminal to report key releases. Returns whether it will.
    pub fn enable_key_release(&mut self) -> bool {
        if !matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            return false;
        }
        self.key_release = execute!(
            self.writer,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        ).is_ok();
        self.key_release
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.key_release {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Track the terminal size; any change forces a full repaint.
    fn fit_terminal(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if tw != self.term_w || th != self.term_h {
            self.term_w = tw;
            self.term_h = th;
            self.canvas.buf.resize(tw, th);
            self.back.resize(tw, th);
            self.back.invalidate();
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }
        Ok(())
    }

    pub fn render(&mut self, game: &Game) -> io::Result<()> {
        self.fit_terminal()?;
        self.frame = self.frame.wrapping_add(1);

        if self.last_phase != Some(game.phase) {
            self.back.invalidate();
            self.last_phase = Some(game.phase);
        }

        let tuning = &game.level.tuning;
        self.canvas.set_view(tuning.screen_width, tuning.screen_height);
        self.canvas.buf.clear();

        match game.phase {
            Phase::Idle => self.compose_title(game),
            Phase::Started | Phase::Paused => self.compose_game(game),
            Phase::GameOver => {}
        }
        if game.is_paused() {
            self.compose_pause_overlay();
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.canvas.buf, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let front = &self.canvas.buf;
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..front.height {
            for x in 0..front.width {
                let cell = front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, game: &Game) {
        let level = &game.level;
        let hud = format!(
            " {}  [{}/{}]  x:{}/{}  cam:{:<5} snowballs:{} ",
            level.name,
            game.level_index + 1,
            game.levels.len(),
            level.player.body.rect.x,
            level.width,
            level.camera.offset,
            level.player.bullets.len(),
        );
        let buf = &mut self.canvas.buf;
        buf.fill_row(HUD_ROW, HUD_BG);
        buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_help(&mut self) {
        let row = self.canvas.below_view();
        let help = " ←→/AD Move  Space/W Jump  F/X Shoot  P Pause  R Restart  N Next  Q Quit";
        self.canvas.buf.put_str(0, row, help, DIM, Color::Reset);
    }

    fn compose_game(&mut self, game: &Game) {
        self.compose_hud(game);
        game.level.draw(&mut self.canvas, game.level.camera.offset);
        self.compose_help();
    }

    fn compose_title(&mut self, game: &Game) {
        let art = [
            r" ___ ___  ___  ___ _____ ___  ___  _   _ _  _ ___ ",
            r"| __| _ \/ _ \/ __|_   _| _ )/ _ \| | | | \| |   \",
            r"| _||   / (_) \__ \ | | | _ \ (_) | |_| | .` | |) |",
            r"|_| |_|_\\___/|___/ |_| |___/\___/ \___/|_|\_|___/ ",
        ];

        let tuning = &game.level.tuning;
        let sky = Rect::new(0, 0, tuning.screen_width, tuning.screen_height);
        self.canvas.fill_px(sky, ' ', Color::White, SKY);

        for (i, line) in art.iter().enumerate() {
            self.canvas.put_centered(2 + i, line, TITLE_FG, SKY);
        }

        let first = format!("◈ {} ◈", game.level.name);
        self.canvas.put_centered(8, &first, Color::White, SKY);
        let count = format!("{} level(s) loaded", game.levels.len());
        self.canvas.put_centered(9, &count, DIM, SKY);

        if (self.frame / 20) % 2 == 0 {
            self.canvas.put_centered(12, "▸▸▸ PRESS ENTER OR SPACE TO START ◂◂◂", PROMPT_FG, SKY);
        }

        let controls = [
            "←→ / A D     Move",
            "Space / W    Jump",
            "F / X / J    Throw snowball",
            "P Pause   R Restart   N Next level",
            "Esc / Q      Quit",
        ];
        for (i, line) in controls.iter().enumerate() {
            self.canvas.put_centered(14 + i, line, Color::White, SKY);
        }
    }

    fn compose_pause_overlay(&mut self) {
        let box_bg = Color::Rgb { r: 40, g: 40, b: 50 };
        let hdr = Color::Rgb { r: 255, g: 220, b: 50 };
        let lines = [
            "╔══════════════════╗",
            if (self.frame / 20) % 2 == 0 { "║  ▶   PAUSED   ◀  ║" } else { "║      PAUSED      ║" },
            "╚══════════════════╝",
            "   P  Resume        ",
            "   R  Restart level ",
            "   Q  Quit          ",
        ];
        let top = self.canvas.view_rows().saturating_sub(lines.len()) / 2;
        for (i, line) in lines.iter().enumerate() {
            let fg = if i < 3 { hdr } else { Color::White };
            self.canvas.put_centered(top + i, line, fg, box_bg);
        }
    }
}
