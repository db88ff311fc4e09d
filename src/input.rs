use crate::state::State;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton},
};

/// Left-button release toggles the cell under the cursor. Everything else is ignored.
pub fn handle_mouse_input(state: &mut State, button: MouseButton, element_state: ElementState) {
    if button != MouseButton::Left || element_state != ElementState::Released {
        return;
    }

    match state.cursor_pos {
        Some(position) => {
            state.click(position);
        }
        None => log::debug!("Left click with no known cursor position"),
    }
}

pub fn handle_cursor_move(state: &mut State, position: PhysicalPosition<f64>) {
    state.cursor_pos = Some(position);
}

pub fn handle_cursor_left(state: &mut State) {
    state.cursor_pos = None;
}

// Keys are received but don't drive anything yet.
pub fn handle_keyboard_input(event: &KeyEvent) {
    log::trace!("Key {:?} {:?}", event.logical_key, event.state);
}
