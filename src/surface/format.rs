//! Time formatting for the display surface.
//!
//! The countdown renders as `HH:MM:SS`. The stopwatch renders as
//! `HH:MM:SS.T` with the tenths digit truncated, not rounded. Lap rows drop
//! the hours component when it is zero; the main stopwatch readout never
//! does.

use std::time::Duration;

/// Formats a countdown value as `HH:MM:SS`.
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Formats an elapsed time as `HH:MM:SS.T`, truncating to tenths.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    let tenths = (elapsed.as_millis() / 100) % 10;
    format!("{:02}:{:02}:{:02}.{}", hours, minutes, seconds, tenths)
}

/// Formats a lap value, dropping a zero hours component (`MM:SS.T`).
pub fn format_lap(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    if total < 3600 {
        let minutes = total / 60;
        let seconds = total % 60;
        let tenths = (elapsed.as_millis() / 100) % 10;
        format!("{:02}:{:02}.{}", minutes, seconds, tenths)
    } else {
        format_elapsed(elapsed)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod format_clock_tests {
        use super::*;

        #[test]
        fn test_zero() {
            assert_eq!(format_clock(0), "00:00:00");
        }

        #[test]
        fn test_seconds_only() {
            assert_eq!(format_clock(5), "00:00:05");
        }

        #[test]
        fn test_minutes_and_seconds() {
            assert_eq!(format_clock(930), "00:15:30");
        }

        #[test]
        fn test_with_hours() {
            assert_eq!(format_clock(3723), "01:02:03");
        }

        #[test]
        fn test_large_hours() {
            assert_eq!(format_clock(100 * 3600), "100:00:00");
        }
    }

    mod format_elapsed_tests {
        use super::*;

        #[test]
        fn test_zero() {
            assert_eq!(format_elapsed(Duration::ZERO), "00:00:00.0");
        }

        #[test]
        fn test_tenths_truncated_not_rounded() {
            // 1.29 s displays as .2, never .3
            assert_eq!(format_elapsed(Duration::from_millis(1290)), "00:00:01.2");
            assert_eq!(format_elapsed(Duration::from_millis(1999)), "00:00:01.9");
        }

        #[test]
        fn test_just_under_a_second() {
            assert_eq!(format_elapsed(Duration::from_millis(999)), "00:00:00.9");
        }

        #[test]
        fn test_with_hours() {
            let elapsed = Duration::from_secs(3600 + 62) + Duration::from_millis(500);
            assert_eq!(format_elapsed(elapsed), "01:01:02.5");
        }
    }

    mod format_lap_tests {
        use super::*;

        #[test]
        fn test_compact_below_one_hour() {
            assert_eq!(format_lap(Duration::from_millis(1230)), "00:01.2");
            assert_eq!(format_lap(Duration::from_secs(930)), "15:30.0");
        }

        #[test]
        fn test_boundary_just_under_one_hour() {
            let elapsed = Duration::from_secs(3599) + Duration::from_millis(900);
            assert_eq!(format_lap(elapsed), "59:59.9");
        }

        #[test]
        fn test_full_form_at_one_hour() {
            assert_eq!(format_lap(Duration::from_secs(3600)), "01:00:00.0");
        }

        #[test]
        fn test_main_readout_keeps_hours_where_lap_drops_them() {
            // Intentional asymmetry between the readout and lap rows
            let elapsed = Duration::from_millis(1230);
            assert_eq!(format_elapsed(elapsed), "00:00:01.2");
            assert_eq!(format_lap(elapsed), "00:01.2");
        }
    }
}
