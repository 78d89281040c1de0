use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("Unknown celestial body: {0}")]
    UnknownBody(String),

    #[error("No ephemeris available for body: {0}")]
    EphemerisUnavailable(String),

    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    #[error("Bearing search did not converge after {iterations} iterations")]
    NonConvergent { iterations: usize },

    #[error("Geomagnetic model file not found at: {0}")]
    GeomagneticModelNotFound(String),

    #[error("Invalid geomagnetic model: {0}")]
    InvalidGeomagneticModel(String),

    #[error("Date {0} is outside the range covered by the geomagnetic model")]
    GeomagneticDateOutOfRange(f64),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for NavError {
    fn eq(&self, other: &Self) -> bool {
        use NavError::*;
        match (self, other) {
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (EphemerisUnavailable(a), EphemerisUnavailable(b)) => a == b,
            (InvalidObservation(a), InvalidObservation(b)) => a == b,
            (NonConvergent { iterations: a }, NonConvergent { iterations: b }) => a == b,
            (GeomagneticModelNotFound(a), GeomagneticModelNotFound(b)) => a == b,
            (InvalidGeomagneticModel(a), InvalidGeomagneticModel(b)) => a == b,
            (GeomagneticDateOutOfRange(a), GeomagneticDateOutOfRange(b)) => a == b,

            // io::Error is not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
