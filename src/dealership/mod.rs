//! Dealership reference data and the date/slot booking rules.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::Displayable;
use crate::errors::{BookingError, Result};

/// Number of dealerships listed as "near" when nothing else is configured.
pub const DEFAULT_NEAR_COUNT: usize = 3;

/// Dates closed for bookings regardless of weekday.
pub const BLOCKED_DATES: [(i32, u32, u32); 3] = [(2025, 4, 20), (2025, 4, 21), (2025, 4, 25)];

/// Hours offered by every dealership.
pub const SLOT_HOURS: [u32; 8] = [8, 9, 10, 11, 14, 15, 16, 17];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dealership {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Vehicles the workshop accepts per day.
    pub capacity: u32,
}

impl Dealership {
    fn reference(id: &str, name: &str, address: &str, capacity: u32) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Concesionaria {name}"),
            address: address.to_string(),
            capacity,
        }
    }
}

impl Displayable for Dealership {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.address)
    }
}

/// Calendar classification of a day in the dealership step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayAvailability {
    /// Past date or weekend; not selectable.
    Disabled,
    /// Blocked by the dealership.
    Unavailable,
    Available,
}

/// Static dealership list with the near/other split.
#[derive(Debug, Clone)]
pub struct DealershipDirectory {
    dealerships: Vec<Dealership>,
    near_count: usize,
    blocked: Vec<NaiveDate>,
}

impl Default for DealershipDirectory {
    fn default() -> Self {
        Self::reference()
    }
}

impl DealershipDirectory {
    pub fn reference() -> Self {
        let dealerships = vec![
            Dealership::reference("1", "Central", "Av. Corrientes 1234, CABA", 5),
            Dealership::reference("2", "Norte", "Av. Maipú 2345, Vicente López", 3),
            Dealership::reference("3", "Sur", "Av. Hipólito Yrigoyen 8765, Lanús", 4),
            Dealership::reference("4", "Este", "Av. Mitre 111, Avellaneda", 2),
            Dealership::reference("5", "Oeste", "Av. Rivadavia 2222, Morón", 3),
            Dealership::reference("6", "Centro", "Calle Lavalle 333, Lomas de Zamora", 4),
            Dealership::reference("7", "Playa", "Av. Costanera 444, Mar del Plata", 2),
            Dealership::reference("8", "Montaña", "Ruta 7 Km 123, Mendoza", 1),
        ];
        let blocked = BLOCKED_DATES
            .iter()
            .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
            .collect();
        Self {
            dealerships,
            near_count: DEFAULT_NEAR_COUNT,
            blocked,
        }
    }

    pub fn with_near_count(mut self, near_count: usize) -> Self {
        self.near_count = near_count;
        self
    }

    pub fn all(&self) -> &[Dealership] {
        &self.dealerships
    }

    pub fn near_count(&self) -> usize {
        self.near_count.min(self.dealerships.len())
    }

    /// Dealerships closest to `location`. Proximity is not computed yet: the
    /// first entries of the list stand in for the nearest ones.
    pub fn list_near(&self, _location: &str) -> &[Dealership] {
        &self.dealerships[..self.near_count()]
    }

    /// Everything not returned by [`list_near`](Self::list_near).
    pub fn list_others(&self, _location: &str) -> &[Dealership] {
        &self.dealerships[self.near_count()..]
    }

    pub fn find(&self, id: &str) -> Option<&Dealership> {
        let id = id.trim();
        self.dealerships.iter().find(|dealership| dealership.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Dealership> {
        self.find(id)
            .ok_or_else(|| BookingError::UnknownDealership(id.trim().to_string()))
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked.contains(&date)
    }

    pub fn day_availability(&self, date: NaiveDate, today: NaiveDate) -> DayAvailability {
        if date < today || is_weekend(date) {
            DayAvailability::Disabled
        } else if self.is_blocked(date) {
            DayAvailability::Unavailable
        } else {
            DayAvailability::Available
        }
    }

    pub fn is_date_bookable(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.day_availability(date, today) == DayAvailability::Available
    }

    /// Slots offered by dealership `id`; every dealership shares one schedule.
    pub fn time_slots_for(&self, id: &str) -> Result<Vec<NaiveTime>> {
        self.require(id)?;
        Ok(standard_slots())
    }

    /// Resolves `HH:MM` (or a bare hour) against the dealership's slots.
    pub fn parse_slot(&self, id: &str, raw: &str) -> Result<NaiveTime> {
        let raw = raw.trim();
        let parsed = NaiveTime::parse_from_str(raw, "%H:%M").ok().or_else(|| {
            raw.parse::<u32>()
                .ok()
                .and_then(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        });
        let slots = self.time_slots_for(id)?;
        parsed
            .filter(|slot| slots.contains(slot))
            .ok_or_else(|| BookingError::UnknownTimeSlot(raw.to_string()))
    }
}

fn standard_slots() -> Vec<NaiveTime> {
    SLOT_HOURS
        .iter()
        .filter_map(|&hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .collect()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
