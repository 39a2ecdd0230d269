/// Keyboard state tracker.
///
/// Terminals report key presses, not key state. To get "held" semantics
/// for walking, a key counts as held until either its Release event arrives
/// (terminals with keyboard enhancement) or `HOLD_TIMEOUT` passes without a
/// Press/Repeat for it.
///
/// One-shot actions (jump, shoot, pause) use `was_pressed`, which only fires
/// on the not-held → held transition.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

// ── Key bindings ──

pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_JUMP: &[KeyCode] = &[
    KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W'),
];
pub const KEYS_SHOOT: &[KeyCode] = &[
    KeyCode::Char('f'), KeyCode::Char('F'), KeyCode::Char('x'), KeyCode::Char('X'),
    KeyCode::Char('j'), KeyCode::Char('J'),
];
pub const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
pub const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
pub const KEYS_NEXT_LEVEL: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];
pub const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];

pub struct Keyboard {
    /// Last Press/Repeat time per key.
    last_seen: HashMap<KeyCode, Instant>,
    /// Keys that became held during the latest `poll()`.
    fresh: Vec<KeyCode>,
    /// Every key event read during the latest `poll()`.
    events: Vec<KeyEvent>,
    /// Trust Release events. Off unless the terminal supports them.
    pub honor_release: bool,
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard {
            last_seen: HashMap::with_capacity(16),
            fresh: Vec::with_capacity(8),
            events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Read every pending terminal event without blocking. Call once per frame.
    pub fn poll(&mut self) {
        self.fresh.clear();
        self.events.clear();

        while event::poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }

        self.expire(Instant::now());
    }

    fn record(&mut self, key: KeyEvent, now: Instant) {
        self.events.push(key);
        match key.kind {
            KeyEventKind::Release => {
                if self.honor_release {
                    self.last_seen.remove(&key.code);
                }
            }
            _ => {
                if !self.is_held_at(key.code, now) {
                    self.fresh.push(key.code);
                }
                self.last_seen.insert(key.code, now);
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_seen.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_seen.get(&code)
            .map_or(false, |t| now.duration_since(*t) < HOLD_TIMEOUT)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        let now = Instant::now();
        codes.iter().any(|c| self.is_held_at(*c, now))
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh.contains(c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
        })
    }
}
