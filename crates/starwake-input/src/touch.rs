//! On-screen virtual joystick and buttons for touch devices.
//!
//! Coordinates are screen pixels with +y pointing down.

use starwake_core::components::ShipControls;

/// Drag distance (pixels) that maps to full deflection.
pub const DEFAULT_JOYSTICK_RADIUS: f64 = 60.0;

/// A virtual stick anchored where the finger first touched.
#[derive(Debug, Clone)]
pub struct TouchJoystick {
    pub radius: f64,
    origin: Option<(f64, f64)>,
    current: (f64, f64),
}

impl Default for TouchJoystick {
    fn default() -> Self {
        Self::new(DEFAULT_JOYSTICK_RADIUS)
    }
}

impl TouchJoystick {
    pub fn new(radius: f64) -> Self {
        Self {
            radius: radius.max(1.0),
            origin: None,
            current: (0.0, 0.0),
        }
    }

    pub fn begin(&mut self, x: f64, y: f64) {
        self.origin = Some((x, y));
        self.current = (x, y);
    }

    /// Ignored when no touch is active.
    pub fn move_to(&mut self, x: f64, y: f64) {
        if self.origin.is_some() {
            self.current = (x, y);
        }
    }

    pub fn end(&mut self) {
        self.origin = None;
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// Stick deflection in [-1, 1] per axis (screen orientation, +y down).
    /// The drag is clamped to the joystick radius before normalizing.
    pub fn vector(&self) -> (f64, f64) {
        let Some((ox, oy)) = self.origin else {
            return (0.0, 0.0);
        };
        let dx = self.current.0 - ox;
        let dy = self.current.1 - oy;
        let len = dx.hypot(dy);
        if len == 0.0 {
            return (0.0, 0.0);
        }
        let clamped = len.min(self.radius);
        let k = clamped / len / self.radius;
        (dx * k, dy * k)
    }
}

/// Complete touch layout: steering stick, throttle slider and buttons.
#[derive(Debug, Clone, Default)]
pub struct TouchControls {
    pub stick: TouchJoystick,
    /// Throttle slider position in [-1, 1].
    pub throttle: f64,
    pub fire: bool,
    pub boost: bool,
}

impl TouchControls {
    pub fn set_throttle(&mut self, value: f64) {
        self.throttle = value.clamp(-1.0, 1.0);
    }

    pub fn controls(&self) -> ShipControls {
        let (x, y) = self.stick.vector();
        ShipControls {
            thrust: self.throttle,
            yaw: -x,
            // Dragging down pulls the nose up, like pulling back on a stick.
            pitch: y,
            fire: self.fire,
            boost: self.boost,
            ..Default::default()
        }
    }
}
