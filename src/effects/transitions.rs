use crate::effects::composite::blend_toward_black;
use crate::render::frame::FrameRGB;

/// Linear fade-in/fade-out envelope over a segment of `total` ticks.
///
/// For tick `i`:
/// - `i < ramp`: weight `i / ramp` (fade in from black)
/// - otherwise, `i > total - ramp`: weight `(total - i) / ramp` (fade out to black)
/// - otherwise: unblended
///
/// When the two ramps overlap (`ramp > total / 2`) the fade-in branch wins. A zero ramp
/// disables both fades.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FadeEnvelope {
    /// Ticks in the segment.
    pub total: u64,
    /// Ramp length in ticks.
    pub ramp: u64,
}

impl FadeEnvelope {
    /// Create an envelope.
    pub fn new(total: u64, ramp: u64) -> Self {
        Self { total, ramp }
    }

    /// Weight of the source frame at tick `i`; `None` means the frame is not blended.
    pub fn weight(self, i: u64) -> Option<f32> {
        if self.ramp == 0 {
            return None;
        }
        let ramp = self.ramp as f32;
        if i < self.ramp {
            return Some(i as f32 / ramp);
        }
        if i + self.ramp > self.total {
            return Some(self.total.saturating_sub(i) as f32 / ramp);
        }
        None
    }

    /// The frame for tick `i`, derived from `keyframe`.
    pub fn frame_at(self, keyframe: &FrameRGB, i: u64) -> FrameRGB {
        match self.weight(i) {
            Some(w) => blend_toward_black(keyframe, w),
            None => keyframe.clone(),
        }
    }

    /// Expand `keyframe` into the full faded sequence, calling `emit` once per tick in order.
    pub fn expand<E>(
        self,
        keyframe: &FrameRGB,
        mut emit: impl FnMut(FrameRGB) -> Result<(), E>,
    ) -> Result<u64, E> {
        for i in 0..self.total {
            emit(self.frame_at(keyframe, i))?;
        }
        Ok(self.total)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
