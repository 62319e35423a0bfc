/// Aesthetic constants of the noise field. The defaults reproduce the
/// reference look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    /// Time multiplier applied to both noise fields.
    pub drift_rate: f32,
    /// Rate of the second field relative to the first; it drifts the
    /// opposite way.
    pub secondary_drift_ratio: f32,
    /// Number of fbm octaves.
    pub octaves: u32,
    /// Domain scale of the first field.
    pub primary_scale: f32,
    /// Domain scale of the second field.
    pub secondary_scale: f32,
}

pub const MAX_OCTAVES: u32 = 12;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("octaves must be between 1 and 12 (got {0})")]
    Octaves(u32),
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            drift_rate: 0.08,
            secondary_drift_ratio: 1.2,
            octaves: 5,
            primary_scale: 2.5,
            secondary_scale: 4.5,
        }
    }
}

impl FieldParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (field, value) in [
            ("drift_rate", self.drift_rate),
            ("secondary_drift_ratio", self.secondary_drift_ratio),
        ] {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite { field, value });
            }
        }

        for (field, value) in [
            ("primary_scale", self.primary_scale),
            ("secondary_scale", self.secondary_scale),
        ] {
            if !value.is_finite() {
                return Err(ParamsError::NotFinite { field, value });
            }
            if value <= 0.0 {
                return Err(ParamsError::NotPositive { field, value });
            }
        }

        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(ParamsError::Octaves(self.octaves));
        }

        Ok(())
    }

    /// Rate at which the second field drifts, `drift_rate * secondary_drift_ratio`.
    pub fn secondary_rate(&self) -> f32 {
        self.drift_rate * self.secondary_drift_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = FieldParams::default();
        assert_eq!(params.validate(), Ok(()));
        assert!((params.secondary_rate() - 0.096).abs() < 1e-6);
    }

    #[test]
    fn rejects_non_positive_scale() {
        let params = FieldParams {
            secondary_scale: 0.0,
            ..FieldParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::NotPositive {
                field: "secondary_scale",
                ..
            })
        ));
    }

    #[test]
    fn rejects_out_of_range_octaves() {
        for octaves in [0, MAX_OCTAVES + 1] {
            let params = FieldParams {
                octaves,
                ..FieldParams::default()
            };
            assert_eq!(params.validate(), Err(ParamsError::Octaves(octaves)));
        }
    }

    #[test]
    fn rejects_nan_drift() {
        let params = FieldParams {
            drift_rate: f32::NAN,
            ..FieldParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::NotFinite { field: "drift_rate", .. })
        ));
    }
}
