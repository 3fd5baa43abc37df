use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the domain, wizard and storage layers.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Plate `{0}` is already part of this booking")]
    DuplicatePlate(String),
    #[error("Invalid license plate `{0}` (expected e.g. AB123CD)")]
    InvalidPlate(String),
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),
    #[error("Index {index} is out of range (list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("The primary phone number comes from the account and cannot be edited")]
    PrimaryPhoneLocked,
    #[error("Current mileage {current} km is below the last recorded {last_known} km")]
    MileageBelowLastKnown { current: u32, last_known: u32 },
    #[error("Date {0} cannot be booked")]
    DateNotBookable(chrono::NaiveDate),
    #[error("Dealership not found: {0}")]
    UnknownDealership(String),
    #[error("Time slot {0} is not offered")]
    UnknownTimeSlot(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, BookingError>;

impl From<std::io::Error> for BookingError {
    fn from(err: std::io::Error) -> Self {
        BookingError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BookingError {
    fn from(err: serde_json::Error) -> Self {
        BookingError::StorageError(err.to_string())
    }
}

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BookingError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}
