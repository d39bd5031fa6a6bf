use crate::control::Control;
use flashgrid_common::Movement;
use glam::Vec2;
use std::collections::HashSet;

/// Turns absolute cursor positions into offsets.
///
/// Y is inverted (`last_y - y`) because window coordinates grow downwards
/// while pitch grows upwards.
#[derive(Debug, Clone, Default)]
pub struct CursorTracker {
    last: Option<Vec2>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset since the previous sample; zero for the first sample.
    pub fn sample(&mut self, x: f32, y: f32) -> Vec2 {
        let current = Vec2::new(x, y);
        let offset = match self.last {
            Some(last) => Vec2::new(current.x - last.x, last.y - current.y),
            None => Vec2::ZERO,
        };
        self.last = Some(current);
        offset
    }

    /// Forget the last position so the next sample is treated as the first.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Everything input-driven that a single frame needs to apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputFrame {
    /// Held movement directions, in [`Movement::ALL`] order.
    pub movements: Vec<Movement>,
    /// Accumulated look offset, y already inverted.
    pub look: Vec2,
    /// Accumulated vertical scroll.
    pub scroll: f32,
    pub toggle_flashlight: bool,
    pub toggle_cheat: bool,
    pub quit: bool,
}

impl InputFrame {
    pub fn is_idle(&self) -> bool {
        self.movements.is_empty()
            && self.look == Vec2::ZERO
            && self.scroll == 0.0
            && !self.toggle_flashlight
            && !self.toggle_cheat
            && !self.quit
    }
}

/// Collects input events between frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Control>,
    cursor: CursorTracker,
    pending_look: Vec2,
    pending_scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        if self.held.insert(control) {
            tracing::trace!("pressed {control:?}");
        }
    }

    pub fn release(&mut self, control: Control) {
        self.held.remove(&control);
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.cursor.reset();
    }

    /// Absolute cursor position in window coordinates.
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        let offset = self.cursor.sample(x, y);
        self.add_look(offset);
    }

    /// Raw relative motion (window y-down convention).
    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        self.add_look(Vec2::new(dx, -dy));
    }

    pub fn reset_cursor(&mut self) {
        self.cursor.reset();
    }

    pub fn scroll(&mut self, dy: f32) {
        if dy.is_finite() {
            self.pending_scroll += dy;
        }
    }

    /// Consume everything gathered since the previous drain.
    pub fn drain(&mut self) -> InputFrame {
        let movements = Movement::ALL
            .into_iter()
            .filter(|m| self.held.contains(&Control::Move(*m)))
            .collect();

        InputFrame {
            movements,
            look: std::mem::take(&mut self.pending_look),
            scroll: std::mem::take(&mut self.pending_scroll),
            toggle_flashlight: self.held.contains(&Control::ToggleFlashlight),
            toggle_cheat: self.held.contains(&Control::ToggleCheat),
            quit: self.held.contains(&Control::Quit),
        }
    }

    fn add_look(&mut self, offset: Vec2) {
        if offset.is_finite() {
            self.pending_look += offset;
        } else {
            tracing::warn!("dropping non-finite cursor offset {offset}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_cursor_sample_is_zero() {
        let mut tracker = CursorTracker::new();
        assert_eq!(tracker.sample(960.0, 540.0), Vec2::ZERO);
        assert_eq!(tracker.sample(970.0, 530.0), Vec2::new(10.0, 10.0));
        tracker.reset();
        assert_eq!(tracker.sample(0.0, 0.0), Vec2::ZERO);
    }

    #[test]
    fn drain_accumulates_and_clears() {
        let mut input = InputState::new();
        input.cursor_moved(100.0, 100.0);
        input.cursor_moved(110.0, 95.0);
        input.cursor_moved(115.0, 90.0);
        input.scroll(1.0);
        input.scroll(2.0);

        let frame = input.drain();
        assert_eq!(frame.look, Vec2::new(15.0, 10.0));
        assert_eq!(frame.scroll, 3.0);

        let next = input.drain();
        assert_eq!(next.look, Vec2::ZERO);
        assert_eq!(next.scroll, 0.0);
        assert!(next.is_idle());
    }

    #[test]
    fn mouse_motion_inverts_y() {
        let mut input = InputState::new();
        input.mouse_motion(4.0, 6.0);
        assert_eq!(input.drain().look, Vec2::new(4.0, -6.0));
    }

    #[test]
    fn held_controls_repeat_until_released() {
        let mut input = InputState::new();
        input.press(Control::Move(Movement::Up));
        input.press(Control::Move(Movement::Forward));
        input.press(Control::ToggleFlashlight);

        for _ in 0..3 {
            let frame = input.drain();
            assert_eq!(frame.movements, vec![Movement::Forward, Movement::Up]);
            assert!(frame.toggle_flashlight);
        }

        input.release(Control::Move(Movement::Forward));
        input.release(Control::ToggleFlashlight);
        let frame = input.drain();
        assert_eq!(frame.movements, vec![Movement::Up]);
        assert!(!frame.toggle_flashlight);
    }

    #[test]
    fn release_all_resets_cursor() {
        let mut input = InputState::new();
        input.press(Control::Quit);
        input.cursor_moved(10.0, 10.0);
        input.release_all();
        input.cursor_moved(500.0, 500.0);
        let frame = input.drain();
        assert!(!frame.quit);
        assert_eq!(frame.look, Vec2::ZERO);
    }

    #[test]
    fn non_finite_scroll_ignored() {
        let mut input = InputState::new();
        input.scroll(f32::NAN);
        input.mouse_motion(f32::INFINITY, 0.0);
        assert!(input.drain().is_idle());
    }
}
