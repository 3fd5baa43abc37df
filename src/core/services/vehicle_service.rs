use chrono::{NaiveDate, NaiveTime};

use crate::dealership::DealershipDirectory;
use crate::domain::{
    is_valid_plate, normalize_plate, BookingDraft, DraftPatch, VehicleBookingEntry, VehicleRecord,
};
use crate::errors::BookingError;

use super::ServiceResult;

pub struct VehicleService;

impl VehicleService {
    /// Appends `entry`, rejecting plates already in the booking.
    pub fn add(draft: &BookingDraft, entry: VehicleBookingEntry) -> ServiceResult<DraftPatch> {
        if entry.is_new() && !is_valid_plate(&entry.plate) {
            return Err(BookingError::InvalidPlate(entry.plate));
        }
        Self::ensure_unique(&draft.vehicles, None, &entry.plate)?;
        let mut vehicles = draft.vehicles.clone();
        vehicles.push(entry);
        Ok(DraftPatch::vehicles(vehicles))
    }

    /// Appends the registry vehicle with `plate`.
    pub fn add_registered(
        draft: &BookingDraft,
        registry: &[VehicleRecord],
        plate: &str,
    ) -> ServiceResult<DraftPatch> {
        let plate = normalize_plate(plate);
        let record = registry
            .iter()
            .find(|record| record.plate == plate)
            .ok_or_else(|| BookingError::VehicleNotFound(plate.clone()))?;
        Self::add(draft, VehicleBookingEntry::from_record(record))
    }

    pub fn remove_at(draft: &BookingDraft, index: usize) -> ServiceResult<DraftPatch> {
        Self::check_index(&draft.vehicles, index)?;
        let mut vehicles = draft.vehicles.clone();
        vehicles.remove(index);
        Ok(DraftPatch::vehicles(vehicles))
    }

    pub fn remove_plate(draft: &BookingDraft, plate: &str) -> ServiceResult<DraftPatch> {
        let index = Self::position(draft, plate)?;
        Self::remove_at(draft, index)
    }

    /// Replaces the entry at `index`; the new plate must not clash with the others.
    pub fn replace_at(
        draft: &BookingDraft,
        index: usize,
        entry: VehicleBookingEntry,
    ) -> ServiceResult<DraftPatch> {
        Self::check_index(&draft.vehicles, index)?;
        if entry.is_new() && !is_valid_plate(&entry.plate) {
            return Err(BookingError::InvalidPlate(entry.plate));
        }
        Self::ensure_unique(&draft.vehicles, Some(index), &entry.plate)?;
        let mut vehicles = draft.vehicles.clone();
        vehicles[index] = entry;
        Ok(DraftPatch::vehicles(vehicles))
    }

    /// Records the reading chosen for the vehicle with `plate`.
    pub fn set_current_mileage(
        draft: &BookingDraft,
        plate: &str,
        mileage: u32,
    ) -> ServiceResult<DraftPatch> {
        let index = Self::position(draft, plate)?;
        let mut entry = draft.vehicles[index].clone();
        let floor = entry.mileage_floor();
        if mileage < floor {
            return Err(BookingError::MileageBelowLastKnown {
                current: mileage,
                last_known: floor,
            });
        }
        entry.current_mileage = Some(mileage);
        Self::replace_at(draft, index, entry)
    }

    /// Sets date and slot for one vehicle at the draft's dealership.
    pub fn schedule(
        draft: &BookingDraft,
        directory: &DealershipDirectory,
        today: NaiveDate,
        plate: &str,
        date: NaiveDate,
        slot: NaiveTime,
    ) -> ServiceResult<DraftPatch> {
        let dealership_id = draft
            .dealership_id
            .as_deref()
            .ok_or_else(|| BookingError::InvalidInput("choose a dealership first".into()))?;
        if !directory.is_date_bookable(date, today) {
            return Err(BookingError::DateNotBookable(date));
        }
        if !directory.time_slots_for(dealership_id)?.contains(&slot) {
            return Err(BookingError::UnknownTimeSlot(slot.format("%H:%M").to_string()));
        }
        let index = Self::position(draft, plate)?;
        let mut entry = draft.vehicles[index].clone();
        entry.scheduled_date = Some(date);
        entry.time_slot = Some(slot);
        Self::replace_at(draft, index, entry)
    }

    fn position(draft: &BookingDraft, plate: &str) -> ServiceResult<usize> {
        draft
            .vehicle_by_plate(plate)
            .map(|(index, _)| index)
            .ok_or_else(|| BookingError::VehicleNotFound(normalize_plate(plate)))
    }

    fn check_index(vehicles: &[VehicleBookingEntry], index: usize) -> ServiceResult<()> {
        if index < vehicles.len() {
            Ok(())
        } else {
            Err(BookingError::IndexOutOfRange {
                index,
                len: vehicles.len(),
            })
        }
    }

    fn ensure_unique(
        vehicles: &[VehicleBookingEntry],
        exclude: Option<usize>,
        plate: &str,
    ) -> ServiceResult<()> {
        let duplicate = vehicles
            .iter()
            .enumerate()
            .any(|(idx, vehicle)| vehicle.plate == plate && exclude.map_or(true, |skip| skip != idx));
        if duplicate {
            Err(BookingError::DuplicatePlate(plate.to_string()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClientProfile;

    fn draft() -> BookingDraft {
        BookingDraft::seeded(&ClientProfile::sample())
    }

    fn with_fleet(plates: &[&str]) -> BookingDraft {
        let fleet = VehicleRecord::sample_fleet();
        let mut current = draft();
        for plate in plates {
            let patch = VehicleService::add_registered(&current, &fleet, plate).unwrap();
            current = current.merged(patch);
        }
        current
    }

    #[test]
    fn duplicate_plate_is_rejected_and_list_unchanged() {
        let current = with_fleet(&["AB123CD"]);
        let fleet = VehicleRecord::sample_fleet();
        let err = VehicleService::add_registered(&current, &fleet, "ab123cd").unwrap_err();
        assert!(matches!(err, BookingError::DuplicatePlate(plate) if plate == "AB123CD"));
        assert_eq!(current.vehicles.len(), 1);
    }

    #[test]
    fn new_vehicle_with_bad_plate_is_rejected() {
        let entry = VehicleBookingEntry::new_vehicle("A1234", "Hilux", "2024", "M", "C");
        assert!(matches!(
            VehicleService::add(&draft(), entry),
            Err(BookingError::InvalidPlate(_))
        ));
    }

    #[test]
    fn remove_and_replace_address_by_index() {
        let current = with_fleet(&["AB123CD", "XY987ZW", "LM456NO"]);
        let removed = current.merged(VehicleService::remove_at(&current, 1).unwrap());
        let plates: Vec<&str> = removed.vehicles.iter().map(|v| v.plate.as_str()).collect();
        assert_eq!(plates, ["AB123CD", "LM456NO"]);

        let clash = removed.vehicles[0].clone();
        assert!(matches!(
            VehicleService::replace_at(&removed, 1, clash),
            Err(BookingError::DuplicatePlate(_))
        ));
        assert!(matches!(
            VehicleService::remove_at(&removed, 5),
            Err(BookingError::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn mileage_below_last_known_is_refused() {
        let current = with_fleet(&["XY987ZW"]);
        let err = VehicleService::set_current_mileage(&current, "XY987ZW", 20_000).unwrap_err();
        assert!(matches!(
            err,
            BookingError::MileageBelowLastKnown {
                current: 20_000,
                last_known: 30_000
            }
        ));
        let patched = current
            .merged(VehicleService::set_current_mileage(&current, "XY987ZW", 40_000).unwrap());
        assert_eq!(patched.vehicles[0].current_mileage, Some(40_000));
    }

    #[test]
    fn schedule_requires_dealership_and_bookable_date() {
        let directory = DealershipDirectory::reference();
        let today = NaiveDate::from_ymd_opt(2025, 4, 14).unwrap();
        let slot = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 4, 21).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2025, 4, 22).unwrap();

        let current = with_fleet(&["AB123CD"]);
        assert!(matches!(
            VehicleService::schedule(&current, &directory, today, "AB123CD", tuesday, slot),
            Err(BookingError::InvalidInput(_))
        ));

        let current = current.merged(DraftPatch::dealership(Some("2".into())));
        assert!(matches!(
            VehicleService::schedule(&current, &directory, today, "AB123CD", monday, slot),
            Err(BookingError::DateNotBookable(_))
        ));
        let lunch = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert!(matches!(
            VehicleService::schedule(&current, &directory, today, "AB123CD", tuesday, lunch),
            Err(BookingError::UnknownTimeSlot(_))
        ));

        let patch =
            VehicleService::schedule(&current, &directory, today, "AB123CD", tuesday, slot).unwrap();
        let scheduled = current.merged(patch);
        assert_eq!(scheduled.vehicles[0].scheduled_date, Some(tuesday));
        assert_eq!(scheduled.vehicles[0].time_slot, Some(slot));
    }
}
