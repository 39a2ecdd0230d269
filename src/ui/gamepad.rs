/// Gamepad input via gilrs.
///
/// Button mapping comes from `[gamepad]` in config.toml.
/// Default mapping:
///   D-pad / Left Stick  →  Walk left / right
///   A                   →  Jump
///   X / R1              →  Shoot
///   Start               →  Pause (and start from the title)
///   Select              →  Quit
///
/// Without the `gamepad` feature every query returns false.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
#[cfg(feature = "gamepad")]
use tracing::info;

use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical face/shoulder buttons.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Held (continuous) and just_pressed (edge) for one input.
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

/// Which buttons trigger which game action.
struct ActionMap {
    jump: Vec<Btn>,
    shoot: Vec<Btn>,
    pause: Vec<Btn>,
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            jump: vec![Btn::A],
            shoot: vec![Btn::X, Btn::R1],
            pause: vec![Btn::Start],
            confirm: vec![Btn::Start, Btn::A],
            cancel: vec![Btn::Select],
        }
    }
}

fn parse_buttons(names: &[String]) -> Vec<Btn> {
    names.iter().filter_map(|s| Btn::from_name(s)).collect()
}

pub struct Gamepad {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],
    dpad_left: bool,
    dpad_right: bool,
    stick_x: f32,

    actions: ActionMap,
    pub connected: bool,
}

impl Gamepad {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                if has_pad {
                    info!("gamepad detected");
                }
                (Some(g), has_pad)
            }
            Err(e) => {
                tracing::warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        let mut pad = Gamepad {
            #[cfg(feature = "gamepad")]
            gilrs,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad_left: false,
            dpad_right: false,
            stick_x: 0.0,
            actions: ActionMap::default(),
            connected,
        };
        pad.apply_config(cfg);
        pad
    }

    /// Override the default mapping with configured names; unknown or empty
    /// lists keep the default for that action.
    fn apply_config(&mut self, cfg: &GamepadConfig) {
        let slots: [(&[String], &mut Vec<Btn>); 5] = [
            (&cfg.jump, &mut self.actions.jump),
            (&cfg.shoot, &mut self.actions.shoot),
            (&cfg.pause, &mut self.actions.pause),
            (&cfg.confirm, &mut self.actions.confirm),
            (&cfg.cancel, &mut self.actions.cancel),
        ];
        for (names, slot) in slots {
            let parsed = parse_buttons(names);
            if !parsed.is_empty() {
                *slot = parsed;
            }
        }
    }

    /// Drain pending controller events. Call once per frame.
    pub fn poll(&mut self) {
        for b in &mut self.buttons {
            b.just_pressed = false;
        }

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_x = value,
                EventType::Connected => {
                    info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        match gilrs_btn {
            Button::DPadLeft => self.dpad_left = held,
            Button::DPadRight => self.dpad_right = held,
            other => {
                if let Some(btn) = Btn::from_gilrs(other) {
                    let state = &mut self.buttons[btn as usize];
                    if held && !state.held {
                        state.just_pressed = true;
                    }
                    state.held = held;
                }
            }
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); BTN_COUNT];
        self.dpad_left = false;
        self.dpad_right = false;
        self.stick_x = 0.0;
    }

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    // ── Action queries ──

    pub fn jump_pressed(&self) -> bool { self.any_just_pressed(&self.actions.jump) }
    pub fn shoot_pressed(&self) -> bool { self.any_just_pressed(&self.actions.shoot) }
    pub fn pause_pressed(&self) -> bool { self.any_just_pressed(&self.actions.pause) }
    pub fn confirm_pressed(&self) -> bool { self.any_just_pressed(&self.actions.confirm) }
    pub fn cancel_pressed(&self) -> bool { self.any_just_pressed(&self.actions.cancel) }

    pub fn left_held(&self) -> bool {
        self.dpad_left || self.stick_x < -STICK_DEADZONE
    }

    pub fn right_held(&self) -> bool {
        self.dpad_right || self.stick_x > STICK_DEADZONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("South"), Some(Btn::A));
        assert_eq!(Btn::from_name("rb"), Some(Btn::R1));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn unknown_names_keep_default_mapping() {
        let names = vec!["turbo".to_string()];
        assert!(parse_buttons(&names).is_empty());
        let names = vec!["B".to_string(), "nope".to_string()];
        assert_eq!(parse_buttons(&names), vec![Btn::B]);
    }
}
