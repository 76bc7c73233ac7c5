//! BMI calculation and health status buckets.
//!
//! Buckets are closed-open intervals:
//! - below 18.5: underweight
//! - [18.5, 25): normal weight
//! - [25, 30): overweight
//! - 30 and above: obese

use crate::{BmiReading, Error, HealthStatus, Result};

const UNDERWEIGHT_BELOW: f64 = 18.5;
const OVERWEIGHT_FROM: f64 = 25.0;
const OBESE_FROM: f64 = 30.0;

/// Compute BMI (unrounded) and its health status.
///
/// Height must be positive and finite, otherwise no meaningful BMI exists
/// and [`Error::Computation`] is returned.
pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> Result<BmiReading> {
    if !(height_cm.is_finite() && height_cm > 0.0) {
        return Err(Error::Computation(format!(
            "height must be a positive number of centimetres, got {}",
            height_cm
        )));
    }

    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    let status = classify(bmi);

    tracing::debug!("BMI for {} cm / {} kg: {:.2} ({})", height_cm, weight_kg, bmi, status);
    Ok(BmiReading { bmi, status })
}

/// Map a BMI value onto its health status
pub fn classify(bmi: f64) -> HealthStatus {
    if bmi < UNDERWEIGHT_BELOW {
        HealthStatus::Underweight
    } else if bmi < OVERWEIGHT_FROM {
        HealthStatus::NormalWeight
    } else if bmi < OBESE_FROM {
        HealthStatus::Overweight
    } else {
        HealthStatus::Obese
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_normal_weight() {
        let reading = calculate_bmi(170.0, 70.0).unwrap();
        assert!((reading.bmi - 24.221_453).abs() < 1e-5);
        assert_eq!(round2(reading.bmi), 24.22);
        assert_eq!(reading.status, HealthStatus::NormalWeight);
    }

    #[test]
    fn test_bmi_matches_formula() {
        for (height, weight) in [(150.0, 45.0), (182.5, 90.3), (250.0, 200.0), (50.0, 20.0)] {
            let reading = calculate_bmi(height, weight).unwrap();
            let expected = weight / ((height / 100.0) * (height / 100.0));
            assert!((reading.bmi - expected).abs() < 1e-9);
            assert_eq!(reading.status, classify(expected));
        }
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(classify(18.49), HealthStatus::Underweight);
        assert_eq!(classify(18.5), HealthStatus::NormalWeight);
        assert_eq!(classify(24.9), HealthStatus::NormalWeight);
        // 24.95 falls in the gap of the 24.9/29.9 convention; here it is normal
        assert_eq!(classify(24.95), HealthStatus::NormalWeight);
        assert_eq!(classify(25.0), HealthStatus::Overweight);
        assert_eq!(classify(29.95), HealthStatus::Overweight);
        assert_eq!(classify(30.0), HealthStatus::Obese);
        assert_eq!(classify(45.0), HealthStatus::Obese);
    }

    #[test]
    fn test_rejects_invalid_height() {
        for height in [0.0, -170.0, f64::NAN, f64::INFINITY] {
            let result = calculate_bmi(height, 70.0);
            assert!(
                matches!(result, Err(Error::Computation(_))),
                "height {} should be rejected",
                height
            );
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(24.221453), 24.22);
        assert_eq!(round2(22.857), 22.86);
        assert_eq!(round2(30.0), 30.0);
    }
}
