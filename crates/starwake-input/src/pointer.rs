//! Mouse look under pointer lock.

/// Default radians-per-pixel style scale from mouse counts to stick deflection.
pub const DEFAULT_SENSITIVITY: f64 = 0.02;

/// Accumulates mouse movement while the pointer is locked to the canvas.
#[derive(Debug, Clone)]
pub struct PointerLook {
    pub sensitivity: f64,
    locked: bool,
    dx: f64,
    dy: f64,
}

impl Default for PointerLook {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVITY)
    }
}

impl PointerLook {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            sensitivity,
            locked: false,
            dx: 0.0,
            dy: 0.0,
        }
    }

    /// Pointer lock acquired or lost. Losing the lock discards pending motion.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if !locked {
            self.dx = 0.0;
            self.dy = 0.0;
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Raw movement deltas; ignored unless locked.
    pub fn on_mouse_move(&mut self, dx: f64, dy: f64) {
        if self.locked {
            self.dx += dx;
            self.dy += dy;
        }
    }

    /// Drain accumulated motion as (yaw, pitch) deflection in [-1, 1].
    pub fn take(&mut self) -> (f64, f64) {
        let yaw = (-self.dx * self.sensitivity).clamp(-1.0, 1.0);
        let pitch = (-self.dy * self.sensitivity).clamp(-1.0, 1.0);
        self.dx = 0.0;
        self.dy = 0.0;
        (yaw, pitch)
    }
}
