//! Key table and held-key tracking.
//!
//! Terminals with keyboard enhancement report key releases, so a key stays
//! held until released.  Classic terminals only repeat presses; there a key
//! counts as held while its last press or repeat is at most `HOLD_WINDOW`
//! frames old.

use crossterm::event::KeyCode;

/// 8 frames @ 60 FPS ≈ 133 ms, longer than any OS key-repeat interval.
pub const HOLD_WINDOW: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Fire,
    Left,
    Up,
    Right,
    Down,
}

impl Action {
    const ALL: [Action; 5] = [
        Action::Fire,
        Action::Left,
        Action::Up,
        Action::Right,
        Action::Down,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// The fixed key table.  Unmapped keys yield `None` and are ignored.
pub fn action_for(code: &KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char(' ') => Some(Action::Fire),
        KeyCode::Left => Some(Action::Left),
        KeyCode::Up => Some(Action::Up),
        KeyCode::Right => Some(Action::Right),
        KeyCode::Down => Some(Action::Down),
        _ => None,
    }
}

/// Which actions are held during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

#[derive(Clone, Debug, Default)]
pub struct KeyStatus {
    /// Frame of the last press/repeat per action, `None` when released.
    last_seen: [Option<u64>; 5],
    /// Set once a release event arrives; from then on keys never expire.
    releases_reported: bool,
}

impl KeyStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press or repeat.  Returns `false` for unmapped keys.
    pub fn key_down(&mut self, code: &KeyCode, frame: u64) -> bool {
        match action_for(code) {
            Some(action) => {
                self.last_seen[action.slot()] = Some(frame);
                true
            }
            None => false,
        }
    }

    /// Release.  Returns `false` for unmapped keys.
    pub fn key_up(&mut self, code: &KeyCode) -> bool {
        match action_for(code) {
            Some(action) => {
                self.releases_reported = true;
                self.last_seen[action.slot()] = None;
                true
            }
            None => false,
        }
    }

    pub fn is_held(&self, action: Action, frame: u64) -> bool {
        self.last_seen[action.slot()]
            .map(|last| self.releases_reported || frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn controls(&self, frame: u64) -> Controls {
        Controls {
            left: self.is_held(Action::Left, frame),
            right: self.is_held(Action::Right, frame),
            up: self.is_held(Action::Up, frame),
            down: self.is_held(Action::Down, frame),
            fire: self.is_held(Action::Fire, frame),
        }
    }

    /// Forget every held key.
    pub fn release_all(&mut self) {
        for action in Action::ALL {
            self.last_seen[action.slot()] = None;
        }
    }
}
