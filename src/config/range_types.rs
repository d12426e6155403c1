use derive_more::Display;
use serde::{Deserialize, Serialize};

/// NaN and infinities fall back to `default`; everything else is clamped.
fn clamp_or_default(value: f32, min: f32, max: f32, default: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default
    }
}

/// World distance between adjacent maze cells, constrained to [0.5, 20.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct CellPitch(f32);

impl CellPitch {
    const MIN: f32 = 0.5;
    const MAX: f32 = 20.0;
    const DEFAULT: f32 = 3.75;

    pub fn new(value: f32) -> Self {
        Self(clamp_or_default(value, Self::MIN, Self::MAX, Self::DEFAULT))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for CellPitch {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Wall height, constrained to [0.5, 20.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct WallHeight(f32);

impl WallHeight {
    const MIN: f32 = 0.5;
    const MAX: f32 = 20.0;
    const DEFAULT: f32 = 3.5;

    pub fn new(value: f32) -> Self {
        Self(clamp_or_default(value, Self::MIN, Self::MAX, Self::DEFAULT))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for WallHeight {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Seconds between reaching the goal and the next maze, constrained to [0.0, 60.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct RegenerateDelay(f32);

impl RegenerateDelay {
    const MIN: f32 = 0.0;
    const MAX: f32 = 60.0;
    const DEFAULT: f32 = 4.0;

    pub fn new(value: f32) -> Self {
        Self(clamp_or_default(value, Self::MIN, Self::MAX, Self::DEFAULT))
    }

    pub fn get(self) -> f32 {
        self.0
    }

    pub fn as_duration(self) -> std::time::Duration {
        std::time::Duration::from_secs_f32(self.0)
    }
}

impl Default for RegenerateDelay {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// A movement speed value constrained to [0.1, 50.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct MovementSpeed(f32);

impl MovementSpeed {
    const MIN: f32 = 0.1;
    const MAX: f32 = 50.0;
    const DEFAULT: f32 = 5.0;

    pub fn new(value: f32) -> Self {
        Self(clamp_or_default(value, Self::MIN, Self::MAX, Self::DEFAULT))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Radians of view rotation per pixel of mouse motion, constrained to [0.0001, 0.05]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct MouseSensitivity(f32);

impl MouseSensitivity {
    const MIN: f32 = 0.0001;
    const MAX: f32 = 0.05;
    const DEFAULT: f32 = 0.003;

    pub fn new(value: f32) -> Self {
        Self(clamp_or_default(value, Self::MIN, Self::MAX, Self::DEFAULT))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for MouseSensitivity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

// Deserialized values go through `new`, so config files are clamped too.
impl From<f32> for CellPitch {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<CellPitch> for f32 {
    fn from(value: CellPitch) -> Self {
        value.0
    }
}

impl From<f32> for WallHeight {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<WallHeight> for f32 {
    fn from(value: WallHeight) -> Self {
        value.0
    }
}

impl From<f32> for RegenerateDelay {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<RegenerateDelay> for f32 {
    fn from(value: RegenerateDelay) -> Self {
        value.0
    }
}

impl From<f32> for MovementSpeed {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<MovementSpeed> for f32 {
    fn from(value: MovementSpeed) -> Self {
        value.0
    }
}

impl From<f32> for MouseSensitivity {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<MouseSensitivity> for f32 {
    fn from(value: MouseSensitivity) -> Self {
        value.0
    }
}
