use flashgrid_common::Movement;
use flashgrid_input::Control;
use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

/// Pixels of touchpad scroll that count as one wheel notch.
const PIXELS_PER_LINE: f32 = 20.0;

/// Map a physical key to the control it drives, if any.
pub fn control_for(key: KeyCode) -> Option<Control> {
    let control = match key {
        KeyCode::KeyW => Control::Move(Movement::Forward),
        KeyCode::KeyS => Control::Move(Movement::Backward),
        KeyCode::KeyA => Control::Move(Movement::Left),
        KeyCode::KeyD => Control::Move(Movement::Right),
        KeyCode::Space => Control::Move(Movement::Up),
        KeyCode::ControlLeft => Control::Move(Movement::Down),
        KeyCode::KeyF => Control::ToggleFlashlight,
        KeyCode::KeyC => Control::ToggleCheat,
        KeyCode::Escape => Control::Quit,
        _ => return None,
    };
    Some(control)
}

/// Vertical scroll in wheel notches.
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn wasd_and_vertical_keys() {
        assert_eq!(
            control_for(KeyCode::KeyW),
            Some(Control::Move(Movement::Forward))
        );
        assert_eq!(
            control_for(KeyCode::ControlLeft),
            Some(Control::Move(Movement::Down))
        );
        assert_eq!(control_for(KeyCode::KeyF), Some(Control::ToggleFlashlight));
        assert_eq!(control_for(KeyCode::Escape), Some(Control::Quit));
        assert_eq!(control_for(KeyCode::KeyQ), None);
    }

    #[test]
    fn pixel_scroll_is_scaled() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
        assert_eq!(
            scroll_lines(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0))),
            2.0
        );
    }
}
