//! Draft services. Each operation reads the current draft and returns the
//! [`DraftPatch`](crate::domain::DraftPatch) that applies it, replacing
//! nested lists as a whole.

pub mod client_service;
pub mod payment_service;
pub mod pickup_service;
pub mod vehicle_service;

pub use client_service::ClientService;
pub use payment_service::PaymentService;
pub use pickup_service::PickupService;
pub use vehicle_service::VehicleService;

use crate::errors::BookingError;

pub type ServiceResult<T> = Result<T, BookingError>;
