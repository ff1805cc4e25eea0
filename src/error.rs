use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeodesicError {
    #[error("Invalid ellipsoid parameter: {0}")]
    InvalidEllipsoid(String),
}
