//! Joystick conditioning: direction/button samples and button edges.

/// Readings below this are a push towards the low end of the axis.
pub const ANALOG_LOW: u16 = 400;
/// Readings above this are a push towards the high end of the axis.
pub const ANALOG_HIGH: u16 = 600;
/// Y readings above this are the stick being pressed.
pub const ANALOG_BUTTON: u16 = 1000;

/// One sample of the local controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSample {
    /// Horizontal direction, one of -1, 0, 1.
    pub dx: i8,
    /// Vertical direction, one of -1, 0, 1.
    pub dy: i8,
    pub button_down: bool,
}

impl InputSample {
    /// No direction, button up.
    pub const IDLE: InputSample = InputSample {
        dx: 0,
        dy: 0,
        button_down: false,
    };

    /// Build a sample, clamping directions to -1..=1.
    pub fn new(dx: i8, dy: i8, button_down: bool) -> Self {
        Self {
            dx: dx.signum(),
            dy: dy.signum(),
            button_down,
        }
    }

    /// Button held, no direction.
    pub fn button() -> Self {
        Self::new(0, 0, true)
    }

    /// Classify raw 10-bit joystick readings.
    ///
    /// The Y axis is inverted on the hardware, and pushing Y past
    /// [`ANALOG_BUTTON`] is the stick click.
    pub fn from_analog(raw_x: u16, raw_y: u16) -> Self {
        let dx = if raw_x < ANALOG_LOW {
            -1
        } else if raw_x > ANALOG_HIGH {
            1
        } else {
            0
        };
        let dy = if raw_y < ANALOG_LOW {
            1
        } else if raw_y > ANALOG_HIGH && raw_y < ANALOG_BUTTON {
            -1
        } else {
            0
        };
        Self {
            dx,
            dy,
            button_down: raw_y > ANALOG_BUTTON,
        }
    }

    /// Whether any direction is pushed.
    pub fn has_direction(&self) -> bool {
        self.dx != 0 || self.dy != 0
    }
}

/// Transition of the button level between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Pressed,
    Released,
}

/// Turns the sampled button level into edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonTracker {
    down: bool,
}

impl ButtonTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the latest level; returns the edge if the level changed.
    pub fn update(&mut self, down: bool) -> Option<ButtonEdge> {
        let edge = match (self.down, down) {
            (false, true) => Some(ButtonEdge::Pressed),
            (true, false) => Some(ButtonEdge::Released),
            _ => None,
        };
        self.down = down;
        edge
    }

    pub fn is_down(&self) -> bool {
        self.down
    }
}
