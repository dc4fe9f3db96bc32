use std::fmt;

use super::error::ClassifierError;

/// One field observation, in the fixed order the model was trained on:
/// latitude, longitude, trunk diameter (cm), height (m).
///
/// Values are passed to the model as-is; whatever scale the classifier was
/// trained on is assumed to match raw user input. Diameter and height must be
/// non-negative and all four values must be finite.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    pub latitude: f32,
    pub longitude: f32,
    pub diameter_cm: f32,
    pub height_m: f32,
}

impl FeatureVector {
    pub fn new(
        latitude: f32,
        longitude: f32,
        diameter_cm: f32,
        height_m: f32,
    ) -> Result<Self, ClassifierError> {
        let values = [latitude, longitude, diameter_cm, height_m];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::Validation(
                "All features must be finite numbers".into(),
            ));
        }
        if diameter_cm < 0.0 {
            return Err(ClassifierError::Validation(format!(
                "Diameter must be non-negative, got {}",
                diameter_cm
            )));
        }
        if height_m < 0.0 {
            return Err(ClassifierError::Validation(format!(
                "Height must be non-negative, got {}",
                height_m
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            diameter_cm,
            height_m,
        })
    }

    /// The model's expected input order.
    pub fn as_array(&self) -> [f32; 4] {
        [self.latitude, self.longitude, self.diameter_cm, self.height_m]
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Latitude: {}, Longitude: {}, Diameter: {}cm, Height: {}m",
            self.latitude, self.longitude, self.diameter_cm, self.height_m
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_features() {
        let features = FeatureVector::new(35.0, -106.0, 20.0, 10.0).unwrap();
        assert_eq!(features.as_array(), [35.0, -106.0, 20.0, 10.0]);
    }

    #[test]
    fn test_negative_diameter_rejected() {
        let result = FeatureVector::new(35.0, -106.0, -1.0, 10.0);
        assert!(matches!(result, Err(ClassifierError::Validation(_))));
    }

    #[test]
    fn test_negative_height_rejected() {
        let result = FeatureVector::new(35.0, -106.0, 20.0, -0.5);
        assert!(matches!(result, Err(ClassifierError::Validation(_))));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(FeatureVector::new(f32::NAN, -106.0, 20.0, 10.0).is_err());
        assert!(FeatureVector::new(35.0, f32::INFINITY, 20.0, 10.0).is_err());
    }

    #[test]
    fn test_negative_coordinates_allowed() {
        assert!(FeatureVector::new(-35.0, -106.0, 0.0, 0.0).is_ok());
    }
}
