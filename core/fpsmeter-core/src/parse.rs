//! Counter value extraction.
//!
//! The counter resource is free-form text maintained by an external producer;
//! the only contract is that the current reading is the first contiguous run
//! of decimal digits. Everything else (labels, units, trailing newlines) is
//! ignored. Unparsable input degrades to [`SENTINEL`] rather than an error so
//! a garbled read never kills the sampling loop.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// The latest counter reading. Only the most recent value is meaningful.
pub type SampleValue = u64;

/// Substituted when a sample cannot be obtained or parsed.
pub const SENTINEL: SampleValue = 0;

static RE_DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Extracts the first contiguous run of decimal digits from `raw`.
///
/// Returns [`SENTINEL`] when no digits are present or the run does not fit a
/// `SampleValue`.
pub fn parse_sample(raw: &str) -> SampleValue {
    match RE_DIGIT_RUN.find(raw) {
        Some(run) => match run.as_str().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(run = run.as_str(), "Digit run out of range; using sentinel");
                SENTINEL
            }
        },
        None => {
            debug!(raw = raw.trim(), "No digits in sample; using sentinel");
            SENTINEL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_value_from_labelled_reading() {
        assert_eq!(parse_sample("fps: 58\n"), 58);
    }

    #[test]
    fn garbage_yields_sentinel() {
        assert_eq!(parse_sample("garbage"), SENTINEL);
    }

    #[test]
    fn empty_input_yields_sentinel() {
        assert_eq!(parse_sample(""), SENTINEL);
    }

    #[test]
    fn takes_first_digit_run_only() {
        assert_eq!(parse_sample("59.94"), 59);
        assert_eq!(parse_sample("fps=120 dropped=3"), 120);
    }

    #[test]
    fn bare_number_parses() {
        assert_eq!(parse_sample("60"), 60);
    }

    #[test]
    fn overlong_digit_run_yields_sentinel() {
        assert_eq!(parse_sample("99999999999999999999999999"), SENTINEL);
    }
}
