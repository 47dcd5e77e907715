use starwake_core::commands::PlayerCommand;
use starwake_core::components::ShipControls;
use starwake_core::enums::{CycleDirection, GamePhase};

use crate::actions::{ActionContext, InputAction};
use crate::gamepad::{apply_deadzone, GamepadState};
use crate::hub::InputHub;
use crate::keyboard::{KeyBindings, KeyboardState};
use crate::pointer::PointerLook;
use crate::touch::{TouchControls, TouchJoystick};

// ---- Keyboard ----

#[test]
fn test_keyboard_axes() {
    let mut kb = KeyboardState::new(KeyBindings::default());
    kb.press("KeyW");
    kb.press("KeyA");
    kb.press("ShiftLeft");
    let c = kb.controls();
    assert_eq!(c.thrust, 1.0);
    assert_eq!(c.strafe, -1.0);
    assert!(c.boost);
    assert!(!c.fire);

    // Opposing keys cancel.
    kb.press("KeyS");
    assert_eq!(kb.controls().thrust, 0.0);

    kb.release("KeyW");
    assert_eq!(kb.controls().thrust, -1.0);
}

#[test]
fn test_keyboard_actions_are_edge_triggered() {
    let mut kb = KeyboardState::new(KeyBindings::default());
    kb.press("Tab");
    kb.press("Tab"); // auto-repeat
    assert_eq!(kb.take_actions(), vec![InputAction::NextTarget]);
    assert!(kb.take_actions().is_empty());

    kb.release("Tab");
    kb.press("Tab");
    assert_eq!(kb.take_actions(), vec![InputAction::NextTarget]);
}

#[test]
fn test_keyboard_clear_releases_everything() {
    let mut kb = KeyboardState::new(KeyBindings::default());
    kb.press("KeyW");
    kb.press("Space");
    kb.clear();
    assert_eq!(kb.controls(), ShipControls::default());
}

#[test]
fn test_custom_bindings_from_toml() {
    let bindings: KeyBindings = toml::from_str("fire = \"KeyK\"\n").unwrap();
    assert_eq!(bindings.fire, "KeyK");
    assert_eq!(bindings.thrust_forward, "KeyW");

    let mut kb = KeyboardState::new(bindings);
    kb.press("KeyK");
    assert!(kb.controls().fire);
    kb.press("Space");
    assert!(kb.take_actions().is_empty());
}

// ---- Gamepad ----

#[test]
fn test_deadzone_zeroes_small_input() {
    assert_eq!(apply_deadzone(0.1, 0.05, 0.15), (0.0, 0.0));
}

#[test]
fn test_deadzone_rescales_to_full_range() {
    let (x, y) = apply_deadzone(1.0, 0.0, 0.2);
    assert!((x - 1.0).abs() < 1e-12);
    assert_eq!(y, 0.0);

    let (x, _) = apply_deadzone(0.6, 0.0, 0.2);
    assert!((x - 0.5).abs() < 1e-12, "x = {x}");
}

#[test]
fn test_gamepad_controls_and_actions() {
    let mut pad = GamepadState::new(0.1);
    let mut buttons = vec![0.0; 17];
    buttons[0] = 1.0; // A: fire
    buttons[7] = 0.75; // right trigger
    buttons[2] = 1.0; // X: mining
    pad.update(&[0.0, 0.0, 1.0, 0.0], &buttons);

    let c = pad.controls();
    assert!(c.fire);
    assert!((c.thrust - 0.75).abs() < 1e-12);
    assert!(c.yaw < -0.99, "right stick right turns right");
    assert_eq!(pad.take_actions(), vec![InputAction::ToggleMining]);

    // Holding the button does not retrigger.
    pad.update(&[0.0, 0.0, 1.0, 0.0], &buttons);
    assert!(pad.take_actions().is_empty());
}

#[test]
fn test_gamepad_short_poll_reads_zero() {
    let mut pad = GamepadState::default();
    pad.update(&[0.9], &[]);
    let c = pad.controls();
    assert!(c.strafe > 0.8);
    assert_eq!(c.thrust, 0.0);
    assert!(!c.fire);
}

// ---- Touch ----

#[test]
fn test_touch_joystick_clamps_to_radius() {
    let mut stick = TouchJoystick::new(50.0);
    assert_eq!(stick.vector(), (0.0, 0.0));

    stick.begin(100.0, 100.0);
    stick.move_to(125.0, 100.0);
    let (x, y) = stick.vector();
    assert!((x - 0.5).abs() < 1e-12);
    assert_eq!(y, 0.0);

    stick.move_to(100.0, 300.0);
    let (x, y) = stick.vector();
    assert_eq!(x, 0.0);
    assert!((y - 1.0).abs() < 1e-12);

    stick.end();
    assert!(!stick.is_active());
    assert_eq!(stick.vector(), (0.0, 0.0));
}

#[test]
fn test_touch_move_without_begin_is_ignored() {
    let mut stick = TouchJoystick::default();
    stick.move_to(500.0, 500.0);
    assert_eq!(stick.vector(), (0.0, 0.0));
}

#[test]
fn test_touch_controls_mapping() {
    let mut touch = TouchControls::default();
    touch.set_throttle(3.0);
    touch.stick.begin(0.0, 0.0);
    touch.stick.move_to(-1000.0, 0.0);
    let c = touch.controls();
    assert_eq!(c.thrust, 1.0);
    assert!((c.yaw - 1.0).abs() < 1e-12, "dragging left turns left");
}

// ---- Pointer ----

#[test]
fn test_pointer_only_accumulates_when_locked() {
    let mut look = PointerLook::new(0.01);
    look.on_mouse_move(30.0, 0.0);
    assert_eq!(look.take(), (0.0, 0.0));

    look.set_locked(true);
    look.on_mouse_move(30.0, -20.0);
    let (yaw, pitch) = look.take();
    assert!((yaw + 0.3).abs() < 1e-12);
    assert!((pitch - 0.2).abs() < 1e-12);
    assert_eq!(look.take(), (0.0, 0.0));

    look.on_mouse_move(1000.0, 0.0);
    assert_eq!(look.take().0, -1.0);
}

// ---- Merge / actions / hub ----

#[test]
fn test_merge_sums_and_clamps() {
    let a = ShipControls {
        thrust: 1.0,
        yaw: 0.5,
        ..Default::default()
    };
    let b = ShipControls {
        thrust: 0.5,
        yaw: -0.25,
        fire: true,
        ..Default::default()
    };
    let m = crate::merge(&[a, b]);
    assert_eq!(m.thrust, 1.0);
    assert!((m.yaw - 0.25).abs() < 1e-12);
    assert!(m.fire);
    assert!(!m.boost);
}

#[test]
fn test_toggle_actions_follow_context() {
    let idle = ActionContext::default();
    let busy = ActionContext {
        phase: GamePhase::Paused,
        mining: true,
        docked: true,
    };
    assert!(matches!(
        InputAction::ToggleMining.to_command(&idle),
        PlayerCommand::StartMining
    ));
    assert!(matches!(
        InputAction::ToggleMining.to_command(&busy),
        PlayerCommand::StopMining
    ));
    assert!(matches!(InputAction::ToggleDock.to_command(&idle), PlayerCommand::Dock));
    assert!(matches!(InputAction::ToggleDock.to_command(&busy), PlayerCommand::Undock));
    assert!(matches!(InputAction::TogglePause.to_command(&busy), PlayerCommand::Resume));
    assert!(matches!(
        InputAction::PreviousTarget.to_command(&idle),
        PlayerCommand::CycleTarget {
            direction: CycleDirection::Previous
        }
    ));
}

#[test]
fn test_hub_emits_controls_only_on_change() {
    let mut hub = InputHub::new(KeyBindings::default());
    let ctx = ActionContext::default();

    hub.keyboard.press("KeyW");
    let cmds = hub.frame_commands(&ctx);
    assert_eq!(cmds.len(), 1);
    match &cmds[0] {
        PlayerCommand::SetControls { controls } => assert_eq!(controls.thrust, 1.0),
        other => panic!("unexpected {other:?}"),
    }

    assert!(hub.frame_commands(&ctx).is_empty(), "unchanged input is silent");

    hub.keyboard.press("KeyG");
    let cmds = hub.frame_commands(&ctx);
    assert_eq!(cmds.len(), 1);
    assert!(matches!(cmds[0], PlayerCommand::Dock));
}

#[test]
fn test_hub_resends_held_controls_when_phase_or_dock_changes() {
    let mut hub = InputHub::new(KeyBindings::default());
    let intro = ActionContext::default();
    let playing = ActionContext {
        phase: GamePhase::Playing,
        ..Default::default()
    };
    let docked = ActionContext {
        docked: true,
        ..playing
    };

    hub.keyboard.press("KeyW");
    assert_eq!(hub.frame_commands(&intro).len(), 1);
    assert!(hub.frame_commands(&intro).is_empty());

    // Intro ends with the key still held
    let cmds = hub.frame_commands(&playing);
    assert!(
        matches!(&cmds[..], [PlayerCommand::SetControls { controls }] if controls.thrust == 1.0),
        "held thrust should be re-sent once play starts, got {cmds:?}"
    );
    assert!(hub.frame_commands(&playing).is_empty());

    assert_eq!(hub.frame_commands(&docked).len(), 1);
    assert_eq!(hub.frame_commands(&playing).len(), 1, "undocking re-sends too");
    assert!(hub.frame_commands(&playing).is_empty());

    hub.resync();
    assert_eq!(hub.frame_commands(&playing).len(), 1);
}
