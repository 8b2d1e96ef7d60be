use std::time::Duration;

/// Shortest non-zero indicator tick; the tokio timer cannot resolve less
pub const MIN_INDICATOR_TICK: Duration = Duration::from_millis(1);

/// Upper bound on indicator frames per message
pub const MAX_INDICATOR_FRAMES: u32 = 600;

/// Rejected pacing value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PacingError {
    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    Invalid { field: &'static str, value: f64 },

    #[error("{field} must be 0 or at least 0.001 seconds (got {value})")]
    TickTooShort { field: &'static str, value: f64 },
}

impl PacingError {
    /// Name of the offending setting
    pub fn field(&self) -> &'static str {
        match self {
            PacingError::Invalid { field, .. } | PacingError::TickTooShort { field, .. } => *field,
        }
    }
}

/// Timing of the reveal. Tunes speed only, never which steps happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Wait after a finalized assistant message
    pub inter_message_pause: Duration,
    /// Wait after each revealed character
    pub char_reveal_delay: Duration,
    /// Lower bound on how long the typing indicator is shown
    pub typing_indicator_min_duration: Duration,
    /// Interval between typing indicator frames
    pub typing_indicator_tick_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self::standard()
    }
}

impl Pacing {
    pub fn standard() -> Self {
        Self {
            inter_message_pause: Duration::from_secs(8),
            char_reveal_delay: Duration::from_millis(30),
            typing_indicator_min_duration: Duration::from_millis(800),
            typing_indicator_tick_delay: Duration::from_millis(200),
        }
    }

    pub fn fast() -> Self {
        Self {
            inter_message_pause: Duration::from_secs(2),
            char_reveal_delay: Duration::from_millis(12),
            typing_indicator_min_duration: Duration::from_millis(600),
            typing_indicator_tick_delay: Duration::from_millis(200),
        }
    }

    /// No waiting at all; every step still happens
    pub fn instant() -> Self {
        Self {
            inter_message_pause: Duration::ZERO,
            char_reveal_delay: Duration::ZERO,
            typing_indicator_min_duration: Duration::ZERO,
            typing_indicator_tick_delay: Duration::ZERO,
        }
    }

    /// Converts a configured number of seconds
    pub fn secs(field: &'static str, value: f64) -> Result<Duration, PacingError> {
        Duration::try_from_secs_f64(value).map_err(|_| PacingError::Invalid { field, value })
    }

    /// Converts a configured indicator tick. Zero is allowed, anything else
    /// must be at least [`MIN_INDICATOR_TICK`].
    pub fn tick_secs(field: &'static str, value: f64) -> Result<Duration, PacingError> {
        let tick = Self::secs(field, value)?;
        if !tick.is_zero() && tick < MIN_INDICATOR_TICK {
            return Err(PacingError::TickTooShort { field, value });
        }
        Ok(tick)
    }

    /// Number of typing indicator frames. At least one so the indicator is
    /// visible, at most [`MAX_INDICATOR_FRAMES`].
    pub fn indicator_frames(&self) -> u32 {
        let tick = self.typing_indicator_tick_delay.as_nanos();
        if tick == 0 {
            return 1;
        }
        let frames = self.typing_indicator_min_duration.as_nanos().div_ceil(tick);
        frames.clamp(1, u128::from(MAX_INDICATOR_FRAMES)) as u32
    }

    /// Wait after each indicator frame.
    ///
    /// Normally the tick; stretched when the tick is zero or the frame count
    /// was capped, so that frames × delay never falls short of the minimum.
    pub fn indicator_frame_delay(&self) -> Duration {
        let frames = u128::from(self.indicator_frames());
        let needed = self.typing_indicator_min_duration.as_nanos().div_ceil(frames);
        let needed = Duration::from_nanos(u64::try_from(needed).unwrap_or(u64::MAX));
        self.typing_indicator_tick_delay.max(needed)
    }

    /// Total time the indicator is shown for one message
    pub fn indicator_duration(&self) -> Duration {
        self.indicator_frame_delay() * self.indicator_frames()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_frames_cover_minimum() {
        let pacing = Pacing::standard();
        assert_eq!(pacing.indicator_frames(), 4);

        let uneven = Pacing {
            typing_indicator_min_duration: Duration::from_millis(700),
            ..Pacing::standard()
        };
        assert_eq!(uneven.indicator_frames(), 4);
        assert_eq!(uneven.indicator_frame_delay(), Duration::from_millis(200));
        assert!(uneven.indicator_duration() >= uneven.typing_indicator_min_duration);
    }

    #[test]
    fn test_zero_tick_still_waits_out_the_minimum() {
        let pacing = Pacing {
            typing_indicator_tick_delay: Duration::ZERO,
            ..Pacing::standard()
        };
        assert_eq!(pacing.indicator_frames(), 1);
        assert_eq!(pacing.indicator_frame_delay(), Duration::from_millis(800));
        assert_eq!(pacing.indicator_duration(), Duration::from_millis(800));
        assert_eq!(Pacing::instant().indicator_duration(), Duration::ZERO);
    }

    #[test]
    fn test_frame_count_is_capped() {
        let pacing = Pacing {
            typing_indicator_min_duration: Duration::from_secs(60),
            typing_indicator_tick_delay: Duration::from_millis(1),
            ..Pacing::standard()
        };
        assert_eq!(pacing.indicator_frames(), MAX_INDICATOR_FRAMES);
        assert_eq!(pacing.indicator_frame_delay(), Duration::from_millis(100));
        assert!(pacing.indicator_duration() >= pacing.typing_indicator_min_duration);
    }

    #[test]
    fn test_indicator_always_has_a_frame() {
        assert_eq!(Pacing::instant().indicator_frames(), 1);
        let no_minimum = Pacing {
            typing_indicator_min_duration: Duration::ZERO,
            ..Pacing::standard()
        };
        assert_eq!(no_minimum.indicator_frames(), 1);
    }

    #[test]
    fn test_secs_rejects_bad_values() {
        assert_eq!(Pacing::secs("pause", 0.5), Ok(Duration::from_millis(500)));
        assert!(Pacing::secs("pause", -1.0).is_err());
        assert!(Pacing::secs("pause", f64::NAN).is_err());
        assert!(Pacing::secs("pause", f64::INFINITY).is_err());
    }

    #[test]
    fn test_tick_below_timer_resolution_is_rejected() {
        assert_eq!(
            Pacing::tick_secs("tick", 0.000000001),
            Err(PacingError::TickTooShort { field: "tick", value: 0.000000001 })
        );
        assert_eq!(Pacing::tick_secs("tick", 0.0), Ok(Duration::ZERO));
        assert_eq!(Pacing::tick_secs("tick", 0.001), Ok(Duration::from_millis(1)));
        assert_eq!(Pacing::tick_secs("tick", -1.0).unwrap_err().field(), "tick");
    }
}
