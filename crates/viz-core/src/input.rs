//! Keyboard shortcuts, mapped without touching the DOM.

use crate::constants::SENSITIVITY_STEP;
use crate::controller::ModeController;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    ToggleFullscreen,
    ExitFullscreen,
    RandomMode,
    NextMode,
    ToggleParticles,
    ToggleAutoCycle,
    AdjustSensitivity(f32),
}

/// Map a `KeyboardEvent.key` value. `f` only enters fullscreen; leaving it
/// goes through Escape or F11 so typing in the overlay never exits by accident.
pub fn action_for_key(key: &str, fullscreen: bool) -> Option<KeyAction> {
    match key {
        "F11" => Some(KeyAction::ToggleFullscreen),
        "f" | "F" if !fullscreen => Some(KeyAction::ToggleFullscreen),
        "Escape" if fullscreen => Some(KeyAction::ExitFullscreen),
        "r" | "R" => Some(KeyAction::RandomMode),
        "n" | "N" => Some(KeyAction::NextMode),
        "p" | "P" => Some(KeyAction::ToggleParticles),
        "c" | "C" => Some(KeyAction::ToggleAutoCycle),
        "+" | "=" => Some(KeyAction::AdjustSensitivity(SENSITIVITY_STEP)),
        "-" | "_" => Some(KeyAction::AdjustSensitivity(-SENSITIVITY_STEP)),
        _ => None,
    }
}

/// Apply the controller-side part of an action. Fullscreen actions are left to
/// the view layer; returns false for those.
pub fn apply_key_action(controller: &mut ModeController, action: KeyAction) -> bool {
    match action {
        KeyAction::ToggleFullscreen | KeyAction::ExitFullscreen => return false,
        KeyAction::RandomMode => {
            controller.pick_random_mode();
        }
        KeyAction::NextMode => {
            controller.advance_ordered_mode();
        }
        KeyAction::ToggleParticles => {
            let on = controller.state().particles;
            controller.set_particles_enabled(!on);
        }
        KeyAction::ToggleAutoCycle => {
            if controller.state().auto_cycle {
                controller.stop_auto_cycle();
            } else {
                let secs = controller.state().cycle_interval_sec;
                controller.start_auto_cycle(secs);
            }
        }
        KeyAction::AdjustSensitivity(delta) => controller.adjust_sensitivity(delta),
    }
    true
}
