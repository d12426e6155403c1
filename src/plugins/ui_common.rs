use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

/// Escape releases the pointer, and on native targets also quits.
pub fn handle_exit_events(
    keys: Res<ButtonInput<KeyCode>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    #[cfg_attr(target_arch = "wasm32", allow(unused_mut, unused_variables))]
    mut exit: EventWriter<AppExit>,
) {
    if !keys.just_pressed(KeyCode::Escape) {
        return;
    }
    if let Ok(mut window) = windows.single_mut() {
        set_pointer_captured(&mut window, false);
        info!("Pointer released");
    }

    #[cfg(not(target_arch = "wasm32"))]
    exit.write(AppExit::Success);
}

/// Left click or Space locks and hides the pointer for mouse look.
pub fn capture_pointer(
    keys: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !(mouse_buttons.just_pressed(MouseButton::Left) || keys.just_pressed(KeyCode::Space)) {
        return;
    }
    if let Ok(mut window) = windows.single_mut() {
        set_pointer_captured(&mut window, true);
    }
}

pub fn set_pointer_captured(window: &mut Window, captured: bool) {
    if captured {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    } else {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}
