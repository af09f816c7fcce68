//! Abstract input classification for the session core.
//!
//! Window-system and gamepad events are translated at the application edge
//! into [`SessionEvent`]s and a per-frame [`InputSnapshot`], so the session
//! core never touches `winit` or `gilrs` types directly.

use std::collections::HashSet;

use winit::keyboard;

/// Discrete game actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Make the player jump (Space).
    Jump,
    /// Toggle pause (P).
    Pause,
    /// Reload the level geometry from disk (Q).
    Reload,
    /// Run left (A / ArrowLeft). Continuous, sampled per frame.
    MoveLeft,
    /// Run right (D / ArrowRight). Continuous, sampled per frame.
    MoveRight,
}

/// Gamepad buttons the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadButton {
    /// The primary action button; makes the player jump.
    Primary,
    /// Any other recognized button; ignored by the session.
    Secondary,
}

/// A discrete input event, already classified for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The window close button was pressed.
    WindowClose,
    /// A bound key went down.
    KeyDown(GameKey),
    /// A gamepad button went down.
    ControllerButtonDown(PadButton),
}

/// Continuous input sampled once per frame.
///
/// `axis` is the horizontal analog stick value in `[-1.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Keyboard "move left" is held.
    pub left: bool,
    /// Keyboard "move right" is held.
    pub right: bool,
    /// Horizontal analog axis; negative is left.
    pub axis: f32,
}

/// Currently held keys, maintained from window key events.
#[derive(Debug, Default)]
pub struct KeyState {
    pressed_keys: HashSet<GameKey>,
}

impl KeyState {
    /// Creates an empty key state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as held.
    pub fn press_key(&mut self, key: GameKey) {
        self.pressed_keys.insert(key);
    }

    /// Marks `key` as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed_keys.remove(&key);
    }

    /// Whether `key` is currently held.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Builds the continuous snapshot for this frame, merging the held
    /// movement keys with the gamepad axis value.
    pub fn snapshot(&self, axis: f32) -> InputSnapshot {
        InputSnapshot {
            left: self.is_pressed(GameKey::MoveLeft),
            right: self.is_pressed(GameKey::MoveRight),
            axis,
        }
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit key to the game's key enum.
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            Space => GameKey::Jump,
            ArrowLeft => GameKey::MoveLeft,
            ArrowRight => GameKey::MoveRight,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "a" => GameKey::MoveLeft,
            "d" => GameKey::MoveRight,
            "p" => GameKey::Pause,
            "q" => GameKey::Reload,
        }),

        _ => None,
    }
}

/// Converts a gilrs button to the game's pad button enum. Buttons the
/// session has no binding for map to `None` and are dropped at the edge.
pub fn gilrs_button_to_pad_button(button: gilrs::Button) -> Option<PadButton> {
    match button {
        gilrs::Button::East => Some(PadButton::Primary),
        gilrs::Button::South | gilrs::Button::North | gilrs::Button::West => {
            Some(PadButton::Secondary)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_keys_translate() {
        let key = keyboard::Key::Character("P".into());
        assert_eq!(winit_key_to_game_key(&key), Some(GameKey::Pause));
        let key = keyboard::Key::Character("q".into());
        assert_eq!(winit_key_to_game_key(&key), Some(GameKey::Reload));
    }

    #[test]
    fn unbound_keys_translate_to_none() {
        let key = keyboard::Key::Character("z".into());
        assert_eq!(winit_key_to_game_key(&key), None);
    }

    #[test]
    fn snapshot_reflects_held_movement_keys() {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::MoveLeft);
        let snapshot = keys.snapshot(0.4);
        assert!(snapshot.left);
        assert!(!snapshot.right);
        assert_eq!(snapshot.axis, 0.4);

        keys.release_key(GameKey::MoveLeft);
        assert!(!keys.snapshot(0.0).left);
    }
}
