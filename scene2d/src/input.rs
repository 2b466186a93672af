use std::collections::{HashMap, HashSet};

use winit::{
    event::{ElementState, KeyEvent, MouseButton},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::error::EngineError;
use crate::math::Vec2;

/// Tracks keyboard and mouse state across frames.
///
/// The host feeds raw events in; scenes read level (`is_key_down`) and edge
/// (`is_key_pressed`) state. Edge flags live for exactly one frame.
pub struct InputState {
    keyboard_available: bool,

    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,

    mouse_x: f32,
    mouse_y: f32,
    mouse_down: [bool; 8],
    mouse_pressed: [bool; 8],
    mouse_released: [bool; 8],
}

impl InputState {
    pub fn new(keyboard_available: bool) -> Self {
        Self {
            keyboard_available,
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            keys_released: HashSet::new(),
            mouse_x: 0.0,
            mouse_y: 0.0,
            mouse_down: [false; 8],
            mouse_pressed: [false; 8],
            mouse_released: [false; 8],
        }
    }

    /// Clear per-frame pressed/released flags.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.mouse_pressed.fill(false);
        self.mouse_released.fill(false);
    }

    /// Whether the host provides a keyboard at all.
    pub fn has_keyboard(&self) -> bool {
        self.keyboard_available
    }

    /// Borrow the keyboard, failing when the host has none.
    pub fn keyboard(&self) -> Result<&InputState, EngineError> {
        if self.keyboard_available {
            Ok(self)
        } else {
            Err(EngineError::KeyboardUnavailable)
        }
    }

    /// Handle a keyboard input event from winit.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(keycode) = event.physical_key {
            self.handle_key(keycode, event.state);
        }
    }

    /// Record a key transition.
    pub fn handle_key(&mut self, keycode: KeyCode, state: ElementState) {
        if !self.keyboard_available {
            return;
        }
        match state {
            ElementState::Pressed => {
                if !self.keys_down.contains(&keycode) {
                    self.keys_pressed.insert(keycode);
                }
                self.keys_down.insert(keycode);
            }
            ElementState::Released => {
                self.keys_down.remove(&keycode);
                self.keys_released.insert(keycode);
            }
        }
    }

    pub fn press_key(&mut self, keycode: KeyCode) {
        self.handle_key(keycode, ElementState::Pressed);
    }

    pub fn release_key(&mut self, keycode: KeyCode) {
        self.handle_key(keycode, ElementState::Released);
    }

    /// Handle a mouse button input event from winit.
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if let Some(idx) = mouse_button_index(button) {
            match state {
                ElementState::Pressed => {
                    if !self.mouse_down[idx] {
                        self.mouse_pressed[idx] = true;
                    }
                    self.mouse_down[idx] = true;
                }
                ElementState::Released => {
                    self.mouse_down[idx] = false;
                    self.mouse_released[idx] = true;
                }
            }
        }
    }

    /// Handle mouse cursor movement.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        self.mouse_x = x as f32;
        self.mouse_y = y as f32;
    }

    /// Move the cursor and click the left button (press and release).
    ///
    /// The press edge stays visible until the next `begin_frame`.
    pub fn click(&mut self, x: f32, y: f32) {
        self.handle_cursor_moved(x as f64, y as f64);
        self.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        self.handle_mouse_button(MouseButton::Left, ElementState::Released);
    }

    /// Returns true if the key is currently held down.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Returns true if the mouse button is currently held down.
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        mouse_button_index(button)
            .map(|idx| self.mouse_down[idx])
            .unwrap_or(false)
    }

    /// Returns true if the mouse button was pressed this frame.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        mouse_button_index(button)
            .map(|idx| self.mouse_pressed[idx])
            .unwrap_or(false)
    }

    /// Current mouse cursor position in logical pixels.
    pub fn mouse_position(&self) -> Vec2 {
        Vec2::new(self.mouse_x, self.mouse_y)
    }

    /// Position of a left click made this frame, if any.
    pub fn left_click(&self) -> Option<Vec2> {
        self.is_mouse_pressed(MouseButton::Left)
            .then(|| self.mouse_position())
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(true)
    }
}

/// A logical input action (e.g. "move_left", "pause").
///
/// Game code binds one or more physical inputs to each action and then
/// queries the action state instead of referencing key codes directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionId(pub String);

impl ActionId {
    /// Create a new action identifier from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        ActionId(name.into())
    }
}

/// Mapping from named actions to physical inputs.
#[derive(Clone, Debug, Default)]
pub struct InputMap {
    actions: HashMap<ActionId, Vec<KeyCode>>,
}

impl InputMap {
    /// Create an empty input map.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Bind a key to an action.
    pub fn bind_key(&mut self, action: ActionId, key: KeyCode) {
        self.actions.entry(action).or_default().push(key);
    }

    /// Check if an action is currently held down.
    pub fn action_down(&self, input: &InputState, action: &ActionId) -> bool {
        self.actions
            .get(action)
            .map(|keys| keys.iter().any(|&k| input.is_key_down(k)))
            .unwrap_or(false)
    }

    /// Check if an action was pressed this frame (key-down edge).
    pub fn action_pressed(&self, input: &InputState, action: &ActionId) -> bool {
        self.actions
            .get(action)
            .map(|keys| keys.iter().any(|&k| input.is_key_pressed(k)))
            .unwrap_or(false)
    }
}

fn mouse_button_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        MouseButton::Back => Some(3),
        MouseButton::Forward => Some(4),
        MouseButton::Other(raw) => {
            let idx = raw as usize;
            let mapped = 5 + idx; // Reserve 0-4 for standard buttons
            (mapped < 8).then_some(mapped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_is_an_edge_and_down_is_a_level() {
        let mut input = InputState::new(true);
        input.press_key(KeyCode::KeyP);
        assert!(input.is_key_pressed(KeyCode::KeyP));
        assert!(input.is_key_down(KeyCode::KeyP));

        input.begin_frame();
        // Key repeat while held must not produce a second edge.
        input.press_key(KeyCode::KeyP);
        assert!(!input.is_key_pressed(KeyCode::KeyP));
        assert!(input.is_key_down(KeyCode::KeyP));

        input.release_key(KeyCode::KeyP);
        input.begin_frame();
        input.press_key(KeyCode::KeyP);
        assert!(input.is_key_pressed(KeyCode::KeyP));
    }

    #[test]
    fn missing_keyboard_is_reported_and_ignored() {
        let mut input = InputState::new(false);
        assert!(matches!(
            input.keyboard(),
            Err(EngineError::KeyboardUnavailable)
        ));
        input.press_key(KeyCode::Enter);
        assert!(!input.is_key_down(KeyCode::Enter));
    }

    #[test]
    fn actions_resolve_through_bindings() {
        let mut map = InputMap::new();
        let start = ActionId::new("start");
        map.bind_key(start.clone(), KeyCode::Enter);
        map.bind_key(start.clone(), KeyCode::Space);

        let mut input = InputState::new(true);
        assert!(!map.action_down(&input, &start));
        input.press_key(KeyCode::Space);
        assert!(map.action_down(&input, &start));
        assert!(map.action_pressed(&input, &start));
        assert!(!map.action_pressed(&input, &ActionId::new("unbound")));
    }

    #[test]
    fn click_sets_position_and_edge() {
        let mut input = InputState::new(true);
        input.click(12.0, 34.0);
        assert_eq!(input.left_click(), Some(Vec2::new(12.0, 34.0)));
        input.begin_frame();
        assert_eq!(input.left_click(), None);
    }

    #[test]
    fn clicks_in_consecutive_frames_each_register() {
        let mut input = InputState::new(true);
        input.click(10.0, 10.0);
        assert!(!input.is_mouse_down(MouseButton::Left));

        input.begin_frame();
        input.click(500.0, 400.0);
        assert_eq!(input.left_click(), Some(Vec2::new(500.0, 400.0)));
    }
}
