use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{is_filled, Displayable};

/// Old (`ABC123`) and current (`AB123CD`) national plate formats.
static PLATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2,3}[0-9]{3}[A-Z]{0,2}$").expect("plate pattern is a valid regex")
});

/// Trims and upper-cases user input before validation.
pub fn normalize_plate(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub fn is_valid_plate(plate: &str) -> bool {
    PLATE_PATTERN.is_match(plate)
}

/// Opaque vehicle identifier: a registry key or a freshly minted `new-…` id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints an id for a vehicle that is not in the registry yet.
    pub fn mint() -> Self {
        Self(format!("new-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry entry describing a vehicle owned by the account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VehicleRecord {
    pub id: VehicleId,
    pub plate: String,
    pub model: String,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chassis_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_mileage: Option<u32>,
}

impl VehicleRecord {
    pub fn new(
        id: impl Into<String>,
        plate: impl Into<String>,
        model: impl Into<String>,
        year: impl Into<String>,
        last_known_mileage: Option<u32>,
    ) -> Self {
        Self {
            id: VehicleId::new(id),
            plate: plate.into(),
            model: model.into(),
            year: year.into(),
            engine_number: None,
            chassis_number: None,
            last_known_mileage,
        }
    }

    /// Demo fleet used to seed an empty registry.
    pub fn sample_fleet() -> Vec<VehicleRecord> {
        vec![
            VehicleRecord::new("1", "AB123CD", "Toyota Hilux", "2024", Some(10_000)),
            VehicleRecord::new("2", "XY987ZW", "Ford Ranger", "2022", Some(30_000)),
            VehicleRecord::new("3", "LM456NO", "Volkswagen Amarok", "2025", Some(1_001)),
            VehicleRecord::new("4", "OP789QR", "Chevrolet S10", "2011", Some(40_000)),
            VehicleRecord::new("5", "ST012UV", "Fiat Toro", "2024", Some(10_000)),
        ]
    }

    pub fn apply(&mut self, patch: &VehicleRecordPatch) {
        if let Some(plate) = &patch.plate {
            self.plate = plate.clone();
        }
        if let Some(model) = &patch.model {
            self.model = model.clone();
        }
        if let Some(year) = &patch.year {
            self.year = year.clone();
        }
        if let Some(engine) = &patch.engine_number {
            self.engine_number = engine.clone();
        }
        if let Some(chassis) = &patch.chassis_number {
            self.chassis_number = chassis.clone();
        }
        if let Some(mileage) = patch.last_known_mileage {
            self.last_known_mileage = mileage;
        }
    }
}

impl Displayable for VehicleRecord {
    fn display_label(&self) -> String {
        format!("{} - {} ({})", self.plate, self.model, self.year)
    }
}

/// Partial update for a registry record; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleRecordPatch {
    pub plate: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub engine_number: Option<Option<String>>,
    pub chassis_number: Option<Option<String>>,
    pub last_known_mileage: Option<Option<u32>>,
}

/// Where a booking entry came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleOrigin {
    Registered,
    New,
}

/// Person authorised to collect a vehicle after the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickupPerson {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
}

impl PickupPerson {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        national_id: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            national_id: national_id.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        is_filled(&self.first_name) && is_filled(&self.last_name) && is_filled(&self.national_id)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// One vehicle inside the booking draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VehicleBookingEntry {
    pub id: VehicleId,
    pub origin: VehicleOrigin,
    pub plate: String,
    pub model: String,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chassis_number: Option<String>,
    #[serde(default)]
    pub last_known_mileage: Option<u32>,
    #[serde(default)]
    pub current_mileage: Option<u32>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub time_slot: Option<NaiveTime>,
    #[serde(default)]
    pub pickup_person: Option<PickupPerson>,
}

impl VehicleBookingEntry {
    pub fn from_record(record: &VehicleRecord) -> Self {
        Self {
            id: record.id.clone(),
            origin: VehicleOrigin::Registered,
            plate: record.plate.clone(),
            model: record.model.clone(),
            year: record.year.clone(),
            engine_number: record.engine_number.clone(),
            chassis_number: record.chassis_number.clone(),
            last_known_mileage: record.last_known_mileage,
            current_mileage: None,
            scheduled_date: None,
            time_slot: None,
            pickup_person: None,
        }
    }

    /// Entry for a vehicle registered during the booking. The plate is
    /// normalised; completeness is judged by the vehicle-selection validator.
    pub fn new_vehicle(
        plate: &str,
        model: impl Into<String>,
        year: impl Into<String>,
        engine_number: impl Into<String>,
        chassis_number: impl Into<String>,
    ) -> Self {
        Self {
            id: VehicleId::mint(),
            origin: VehicleOrigin::New,
            plate: normalize_plate(plate),
            model: model.into(),
            year: year.into(),
            engine_number: Some(engine_number.into()),
            chassis_number: Some(chassis_number.into()),
            last_known_mileage: None,
            current_mileage: None,
            scheduled_date: None,
            time_slot: None,
            pickup_person: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.origin == VehicleOrigin::New
    }

    /// Last-known reading, `0` when the vehicle has no history.
    pub fn mileage_floor(&self) -> u32 {
        self.last_known_mileage.unwrap_or(0)
    }

    /// Registry record for a freshly registered vehicle.
    pub fn to_record(&self) -> VehicleRecord {
        VehicleRecord {
            id: self.id.clone(),
            plate: self.plate.clone(),
            model: self.model.clone(),
            year: self.year.clone(),
            engine_number: self.engine_number.clone(),
            chassis_number: self.chassis_number.clone(),
            last_known_mileage: self.current_mileage.or(self.last_known_mileage),
        }
    }
}

impl Displayable for VehicleBookingEntry {
    fn display_label(&self) -> String {
        format!("{} - {}", self.plate, self.model)
    }
}
