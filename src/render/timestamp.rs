//! `HH:MM:SS,mmm` and `HH:MM:SS.mmm` offsets.
//!
//! Hours, minutes and seconds are floored; milliseconds are rounded up and
//! clamped to 999. Offsets are first rounded to whole microseconds so binary
//! float noise (`1.1 * 1000 = 1100.0000000000002`) does not bump the
//! millisecond field.

/// Separator between seconds and milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStyle {
    /// `00:00:01,250`, used in the annotated transcript.
    Comma,
    /// `00:00:01.250`, used in WebVTT cues.
    Dot,
}

impl TimestampStyle {
    fn separator(self) -> char {
        match self {
            TimestampStyle::Comma => ',',
            TimestampStyle::Dot => '.',
        }
    }
}

/// Formats an offset in seconds. Negative and non-finite offsets format as zero.
pub fn format_offset(secs: f64, style: TimestampStyle) -> String {
    let micros = if secs.is_finite() && secs > 0.0 {
        (secs * 1_000_000.0).round() as u64
    } else {
        0
    };

    let hours = micros / 3_600_000_000;
    let minutes = (micros % 3_600_000_000) / 60_000_000;
    let seconds = (micros % 60_000_000) / 1_000_000;
    let millis = (micros % 1_000_000).div_ceil(1_000).min(999);

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        seconds,
        style.separator(),
        millis
    )
}

/// Cue end: the start floored to whole seconds plus `duration_secs`.
pub fn cue_end(start: f64, duration_secs: u64) -> f64 {
    start.max(0.0).floor() + duration_secs as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero() {
        assert_eq!(format_offset(0.0, TimestampStyle::Comma), "00:00:00,000");
        assert_eq!(format_offset(0.0, TimestampStyle::Dot), "00:00:00.000");
    }

    #[test]
    fn pads_fields() {
        assert_eq!(format_offset(3725.05, TimestampStyle::Dot), "01:02:05.050");
        assert_eq!(format_offset(12.345, TimestampStyle::Comma), "00:00:12,345");
    }

    #[test]
    fn float_noise_does_not_round_up() {
        assert_eq!(format_offset(1.1, TimestampStyle::Comma), "00:00:01,100");
        assert_eq!(format_offset(0.29, TimestampStyle::Dot), "00:00:00.290");
    }

    #[test]
    fn sub_millisecond_rounds_up_and_clamps() {
        assert_eq!(format_offset(2.0004, TimestampStyle::Dot), "00:00:02.001");
        assert_eq!(format_offset(2.9996, TimestampStyle::Dot), "00:00:02.999");
    }

    #[test]
    fn negative_is_zero() {
        assert_eq!(format_offset(-4.0, TimestampStyle::Dot), "00:00:00.000");
        assert_eq!(format_offset(f64::NAN, TimestampStyle::Dot), "00:00:00.000");
    }

    #[test]
    fn cue_end_floors_start() {
        assert_eq!(cue_end(4.6, 3), 7.0);
        assert_eq!(cue_end(0.0, 3), 3.0);
    }
}
