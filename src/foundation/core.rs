use crate::foundation::error::{TripError, TripResult};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Output frame rate in whole frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Fps(u32);

impl Fps {
    /// Create a validated FPS value.
    pub fn new(fps: u32) -> TripResult<Self> {
        if fps == 0 {
            return Err(TripError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Frames per second as an integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of ticks covering `secs` whole seconds.
    pub fn frames_for_secs(self, secs: u32) -> u64 {
        u64::from(secs) * u64::from(self.0)
    }
}

impl TryFrom<u32> for Fps {
    type Error = TripError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<Fps> for u32 {
    fn from(v: Fps) -> Self {
        v.0
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(30)
    }
}

/// Canonical output dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a validated resolution.
    pub fn new(width: u32, height: u32) -> TripResult<Self> {
        if width == 0 || height == 0 {
            return Err(TripError::validation("resolution width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// `width / height`.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Number of pixels.
    pub fn area(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Resolution {
    type Err = TripError;

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x720`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| TripError::validation(format!("resolution '{s}' is not WxH")))?;
        let w = w
            .trim()
            .parse::<u32>()
            .map_err(|e| TripError::validation(format!("resolution width '{w}': {e}")))?;
        let h = h
            .trim()
            .parse::<u32>()
            .map_err(|e| TripError::validation(format!("resolution height '{h}': {e}")))?;
        Self::new(w, h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
