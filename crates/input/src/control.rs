use flashgrid_common::Movement;

/// A logical control the user can hold down.
///
/// Platform layers map their key codes onto controls; everything downstream
/// consumes controls, never raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Translate the camera while held.
    Move(Movement),
    /// Request a flashlight flip (debounced downstream).
    ToggleFlashlight,
    /// Request a cheat-mode flip (debounced downstream).
    ToggleCheat,
    /// Ask the application to close.
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_are_hashable_keys() {
        let mut set = std::collections::HashSet::new();
        set.insert(Control::Move(Movement::Forward));
        set.insert(Control::Move(Movement::Forward));
        set.insert(Control::ToggleFlashlight);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn move_controls_differ_by_direction() {
        assert_ne!(
            Control::Move(Movement::Up),
            Control::Move(Movement::Down)
        );
    }
}
