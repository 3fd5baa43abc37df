use crate::domain::{normalize_plate, BookingDraft, DraftPatch, PickupPerson};
use crate::errors::BookingError;

use super::ServiceResult;

pub struct PickupService;

impl PickupService {
    /// Assigns `person` to the vehicle with `plate`.
    pub fn assign(draft: &BookingDraft, plate: &str, person: PickupPerson) -> ServiceResult<DraftPatch> {
        let (index, _) = draft
            .vehicle_by_plate(plate)
            .ok_or_else(|| BookingError::VehicleNotFound(normalize_plate(plate)))?;
        let mut vehicles = draft.vehicles.clone();
        vehicles[index].pickup_person = Some(person);
        Ok(DraftPatch::vehicles(vehicles))
    }

    /// Copies `person` onto every vehicle in the booking.
    pub fn apply_to_all(draft: &BookingDraft, person: &PickupPerson) -> DraftPatch {
        let vehicles = draft
            .vehicles
            .iter()
            .cloned()
            .map(|mut vehicle| {
                vehicle.pickup_person = Some(person.clone());
                vehicle
            })
            .collect();
        DraftPatch::vehicles(vehicles)
    }

    pub fn clear(draft: &BookingDraft, plate: &str) -> ServiceResult<DraftPatch> {
        let (index, _) = draft
            .vehicle_by_plate(plate)
            .ok_or_else(|| BookingError::VehicleNotFound(normalize_plate(plate)))?;
        let mut vehicles = draft.vehicles.clone();
        vehicles[index].pickup_person = None;
        Ok(DraftPatch::vehicles(vehicles))
    }

    pub fn set_owner_picks_up(flag: bool) -> DraftPatch {
        DraftPatch::owner_picks_up(flag)
    }
}
