//! Booking draft aggregate and the records it is assembled from.

pub mod client;
pub mod common;
pub mod draft;
pub mod payment;
pub mod vehicle;

pub use client::{ClientInfo, ClientProfile, DocumentIdentity, DocumentType, PhoneNumbers};
pub use common::Displayable;
pub use draft::{BookingDraft, DraftPatch};
pub use payment::{CorporateAccountPayment, PaymentMethod, BANKS};
pub use vehicle::{
    is_valid_plate, normalize_plate, PickupPerson, VehicleBookingEntry, VehicleId, VehicleOrigin,
    VehicleRecord, VehicleRecordPatch,
};
