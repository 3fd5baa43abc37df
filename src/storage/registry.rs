use crate::domain::{VehicleId, VehicleRecord, VehicleRecordPatch};
use crate::errors::{BookingError, Result};

use super::KeyValueStore;

/// Store key holding the serialized vehicle list.
pub const VEHICLES_KEY: &str = "vehicles";

/// Vehicles owned by the account, outside any single booking.
pub trait VehicleRegistry {
    fn list(&self) -> &[VehicleRecord];
    fn add(&mut self, record: VehicleRecord) -> Result<()>;
    fn remove(&mut self, id: &VehicleId) -> Result<VehicleRecord>;
    fn update(&mut self, id: &VehicleId, patch: &VehicleRecordPatch) -> Result<()>;

    fn find_by_plate(&self, plate: &str) -> Option<&VehicleRecord> {
        self.list()
            .iter()
            .find(|record| record.plate.eq_ignore_ascii_case(plate.trim()))
    }
}

/// Registry kept in memory and mirrored to a [`KeyValueStore`].
///
/// Persistence is best effort: read and write failures are logged and the
/// in-memory list stays authoritative for the session.
pub struct LocalVehicleRegistry {
    store: Box<dyn KeyValueStore>,
    records: Vec<VehicleRecord>,
}

impl LocalVehicleRegistry {
    /// Loads the stored list. Only a store without a `vehicles` entry is
    /// seeded with the sample fleet; unreadable data leaves the session
    /// with an empty registry and the stored document untouched.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let stored = load_records(store.as_ref());
        let mut registry = Self {
            store,
            records: Vec::new(),
        };
        match stored {
            StoredRecords::Missing => {
                registry.records = VehicleRecord::sample_fleet();
                registry.persist();
            }
            StoredRecords::Loaded(records) => registry.records = records,
            StoredRecords::Unreadable => {}
        }
        registry
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.records) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "could not serialize vehicle registry");
                return;
            }
        };
        if let Err(err) = self.store.set(VEHICLES_KEY, &json) {
            tracing::warn!(error = %err, "could not persist vehicle registry");
        }
    }

    fn position(&self, id: &VehicleId) -> Result<usize> {
        self.records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| BookingError::VehicleNotFound(id.to_string()))
    }
}

impl VehicleRegistry for LocalVehicleRegistry {
    fn list(&self) -> &[VehicleRecord] {
        &self.records
    }

    fn add(&mut self, record: VehicleRecord) -> Result<()> {
        if self.find_by_plate(&record.plate).is_some() {
            return Err(BookingError::DuplicatePlate(record.plate));
        }
        tracing::debug!(plate = %record.plate, "registering vehicle");
        self.records.push(record);
        self.persist();
        Ok(())
    }

    fn remove(&mut self, id: &VehicleId) -> Result<VehicleRecord> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);
        self.persist();
        Ok(removed)
    }

    fn update(&mut self, id: &VehicleId, patch: &VehicleRecordPatch) -> Result<()> {
        let index = self.position(id)?;
        self.records[index].apply(patch);
        self.persist();
        Ok(())
    }
}

enum StoredRecords {
    Missing,
    Loaded(Vec<VehicleRecord>),
    Unreadable,
}

fn load_records(store: &dyn KeyValueStore) -> StoredRecords {
    let raw = match store.get(VEHICLES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return StoredRecords::Missing,
        Err(err) => {
            tracing::warn!(error = %err, "could not read vehicle registry");
            return StoredRecords::Unreadable;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(records) => StoredRecords::Loaded(records),
        Err(err) => {
            tracing::warn!(error = %err, "stored vehicle registry is malformed; starting empty");
            StoredRecords::Unreadable
        }
    }
}
