use crate::domain::Exchange;
use crate::error::{BreadthError, Result};
use crate::models::{AlignedSample, RatioReading};

/// Signed up/down volume ratio.
///
/// # Formula
/// - `up > down`: `up / down` (how many times up-volume exceeds down-volume)
/// - otherwise: `-(down / up)`
///
/// Equal volumes land on the negative side and give exactly `-1.0`.
/// A zero divisor is reported as [`BreadthError::DivisionByZero`] instead of
/// producing an infinity. Volumes must be finite and non-negative.
pub fn breadth_ratio(up: f64, down: f64) -> Result<f64> {
    if !up.is_finite() || !down.is_finite() || up < 0.0 || down < 0.0 {
        return Err(BreadthError::InvalidVolume { up, down });
    }

    if up > down {
        if down == 0.0 {
            return Err(BreadthError::DivisionByZero { up, down });
        }
        Ok(up / down)
    } else {
        if up == 0.0 {
            return Err(BreadthError::DivisionByZero { up, down });
        }
        Ok(-(down / up))
    }
}

/// Ratio for an aligned sample, falling back to a neutral 0.0 when it cannot
/// be computed. The failure is logged, never propagated.
pub fn reading_or_neutral(exchange: Exchange, sample: &AlignedSample) -> RatioReading {
    match breadth_ratio(sample.up, sample.down) {
        Ok(ratio) => RatioReading::Measured(ratio),
        Err(e) => {
            log::warn!(
                "[{}] {} at {}, publishing 0.0",
                exchange,
                e,
                sample.timestamp_ms
            );
            RatioReading::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn up_dominant_is_positive_multiple() {
        assert_eq!(breadth_ratio(300.0, 100.0), Ok(3.0));
        let ratio = breadth_ratio(250.0, 200.0).unwrap();
        assert!(approx_eq(ratio, 1.25));
        assert!(ratio > 1.0);
    }

    #[test]
    fn down_dominant_is_negative_multiple() {
        assert_eq!(breadth_ratio(100.0, 300.0), Ok(-3.0));
        let ratio = breadth_ratio(200.0, 250.0).unwrap();
        assert!(approx_eq(ratio, -1.25));
    }

    #[test]
    fn tie_goes_to_the_negative_side() {
        assert_eq!(breadth_ratio(150.0, 150.0), Ok(-1.0));
        assert_eq!(breadth_ratio(1e9, 1e9), Ok(-1.0));
    }

    #[test]
    fn every_valid_ratio_has_magnitude_at_least_one() {
        let volumes = [1.0, 7.5, 100.0, 2_500_000.0];
        for &up in &volumes {
            for &down in &volumes {
                let ratio = breadth_ratio(up, down).unwrap();
                assert!(ratio.abs() >= 1.0, "{} / {} gave {}", up, down, ratio);
                assert_eq!(ratio > 0.0, up > down);
            }
        }
    }

    #[test]
    fn zero_divisor_is_an_error() {
        assert_eq!(
            breadth_ratio(500.0, 0.0),
            Err(BreadthError::DivisionByZero {
                up: 500.0,
                down: 0.0
            })
        );
        assert!(matches!(
            breadth_ratio(0.0, 500.0),
            Err(BreadthError::DivisionByZero { .. })
        ));
        assert!(matches!(
            breadth_ratio(0.0, 0.0),
            Err(BreadthError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn non_finite_volume_is_rejected() {
        assert!(matches!(
            breadth_ratio(f64::NAN, 1.0),
            Err(BreadthError::InvalidVolume { .. })
        ));
        assert!(matches!(
            breadth_ratio(1.0, f64::INFINITY),
            Err(BreadthError::InvalidVolume { .. })
        ));
    }

    #[test]
    fn negative_volume_is_rejected() {
        assert_eq!(
            breadth_ratio(5.0, -1.0),
            Err(BreadthError::InvalidVolume {
                up: 5.0,
                down: -1.0
            })
        );
        assert!(matches!(
            breadth_ratio(-2.0, 10.0),
            Err(BreadthError::InvalidVolume { .. })
        ));
    }

    #[test]
    fn failed_ratio_becomes_neutral() {
        let sample = AlignedSample {
            timestamp_ms: 0,
            up: 100.0,
            down: 0.0,
        };
        assert_eq!(
            reading_or_neutral(Exchange::Nyse, &sample),
            RatioReading::Neutral
        );

        let sample = AlignedSample {
            timestamp_ms: 0,
            up: 300.0,
            down: 100.0,
        };
        assert_eq!(
            reading_or_neutral(Exchange::Nyse, &sample),
            RatioReading::Measured(3.0)
        );
    }
}
