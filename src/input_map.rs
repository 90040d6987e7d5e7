use ultraviolet::Vec2;
use winit::event::MouseButton;

const NUM_MOUSE_BUTTONS: usize = 3;

/// Input state of the current frame. Deltas accumulate until [`InputMap::clear_frame_deltas`].
pub struct InputMap {
    mouse_state: [bool; NUM_MOUSE_BUTTONS],
    mouse_delta: Vec2,
    /// In lines, positive is away from the user
    scroll_delta: f32,
}

impl InputMap {
    pub fn new() -> Self {
        InputMap {
            mouse_state: [false; NUM_MOUSE_BUTTONS],
            mouse_delta: Vec2::zero(),
            scroll_delta: 0.0,
        }
    }

    pub fn update_mouse_press(&mut self, button: MouseButton) {
        if let Some(index) = mouse_index(button) {
            self.mouse_state[index] = true;
        }
    }

    pub fn update_mouse_release(&mut self, button: MouseButton) {
        if let Some(index) = mouse_index(button) {
            self.mouse_state[index] = false;
        }
    }

    pub fn accumulate_mouse_delta(&mut self, delta: Vec2) {
        self.mouse_delta += delta;
    }

    pub fn accumulate_scroll_delta(&mut self, delta: f32) {
        self.scroll_delta += delta;
    }

    pub fn clear_frame_deltas(&mut self) {
        self.mouse_delta = Vec2::zero();
        self.scroll_delta = 0.0;
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        mouse_index(button).map_or(false, |index| self.mouse_state[index])
    }
}

impl Default for InputMap {
    fn default() -> Self {
        Self::new()
    }
}

fn mouse_index(button: MouseButton) -> Option<usize> {
    match button {
        MouseButton::Left => Some(0),
        MouseButton::Right => Some(1),
        MouseButton::Middle => Some(2),
        MouseButton::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_buttons() {
        let mut input = InputMap::new();
        input.update_mouse_press(MouseButton::Middle);
        input.update_mouse_press(MouseButton::Other(7));

        assert!(input.is_mouse_pressed(MouseButton::Middle));
        assert!(!input.is_mouse_pressed(MouseButton::Other(7)));
        input.update_mouse_release(MouseButton::Middle);
        assert!(!input.is_mouse_pressed(MouseButton::Middle));
    }

    #[test]
    fn deltas_accumulate_until_cleared() {
        let mut input = InputMap::new();
        input.accumulate_mouse_delta(Vec2::new(1.0, 2.0));
        input.accumulate_mouse_delta(Vec2::new(3.0, -1.0));
        input.accumulate_scroll_delta(1.5);

        assert_eq!(input.mouse_delta(), Vec2::new(4.0, 1.0));
        assert_eq!(input.scroll_delta(), 1.5);
        input.clear_frame_deltas();
        assert_eq!(input.mouse_delta(), Vec2::zero());
        assert_eq!(input.scroll_delta(), 0.0);
    }
}
