//! Mileage-based service pricing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::currency::{format_amount, format_number, CurrencyCode, LocaleConfig};
use crate::domain::VehicleBookingEntry;

/// Readings at or below this value need no service and are free.
pub const FREE_SERVICE_LIMIT: u32 = 1_000;
/// Highest reading the price table covers.
pub const MAX_PRICED_MILEAGE: u32 = 150_000;

/// Result of a price lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Price {
    Amount(u64),
    NotAvailable,
}

impl Price {
    pub fn amount(&self) -> Option<u64> {
        match self {
            Price::Amount(value) => Some(*value),
            Price::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Price::Amount(_))
    }

    pub fn render(&self, code: &CurrencyCode, locale: &LocaleConfig) -> String {
        match self {
            Price::Amount(value) => format_amount(*value, code, locale),
            Price::NotAvailable => "No disponible".into(),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&CurrencyCode::default(), &LocaleConfig::default()))
    }
}

/// How unpriceable vehicles affect a draft total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingPolicy {
    /// Unpriceable vehicles contribute nothing.
    #[default]
    Lenient,
    /// Any unpriceable vehicle makes the whole total unavailable.
    Strict,
}

/// Inclusive mileage range with a fixed service price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: u32,
    pub max: u32,
    pub price: u64,
}

impl PriceBand {
    pub const fn new(min: u32, max: u32, price: u64) -> Self {
        Self { min, max, price }
    }

    pub fn contains(&self, mileage: u32) -> bool {
        (self.min..=self.max).contains(&mileage)
    }
}

const STANDARD_BANDS: [PriceBand; 15] = [
    PriceBand::new(1_001, 10_000, 35_000),
    PriceBand::new(10_001, 20_000, 40_000),
    PriceBand::new(20_001, 30_000, 45_000),
    PriceBand::new(30_001, 40_000, 50_000),
    PriceBand::new(40_001, 50_000, 55_000),
    PriceBand::new(50_001, 60_000, 60_000),
    PriceBand::new(60_001, 70_000, 65_000),
    PriceBand::new(70_001, 80_000, 70_000),
    PriceBand::new(80_001, 90_000, 75_000),
    PriceBand::new(90_001, 100_000, 80_000),
    PriceBand::new(100_001, 110_000, 85_000),
    PriceBand::new(110_001, 120_000, 90_000),
    PriceBand::new(120_001, 130_000, 95_000),
    PriceBand::new(130_001, 140_000, 100_000),
    PriceBand::new(140_001, 150_000, 105_000),
];

/// Readings offered by the service step selector.
pub const MILEAGE_OPTIONS: [u32; 16] = [
    1_000, 10_000, 20_000, 30_000, 40_000, 50_000, 60_000, 70_000, 80_000, 90_000, 100_000,
    110_000, 120_000, 130_000, 140_000, 150_000,
];

/// One entry of the mileage selector for a given vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MileageOption {
    pub value: u32,
    /// Disabled when below the vehicle's last-known reading.
    pub enabled: bool,
}

impl MileageOption {
    pub fn label(&self, locale: &LocaleConfig) -> String {
        format!("< {} km", format_number(u64::from(self.value), locale))
    }
}

/// Selector entries for a vehicle whose last reading is `last_known`.
pub fn mileage_options(last_known: u32) -> Vec<MileageOption> {
    MILEAGE_OPTIONS
        .iter()
        .map(|&value| MileageOption {
            value,
            enabled: value >= last_known,
        })
        .collect()
}

/// Ordered, contiguous, non-overlapping price bands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingTable {
    bands: Vec<PriceBand>,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PricingTable {
    pub fn standard() -> Self {
        Self {
            bands: STANDARD_BANDS.to_vec(),
        }
    }

    pub fn bands(&self) -> &[PriceBand] {
        &self.bands
    }

    pub fn price_for(&self, mileage: u32) -> Price {
        if mileage <= FREE_SERVICE_LIMIT {
            return Price::Amount(0);
        }
        if mileage > MAX_PRICED_MILEAGE {
            return Price::NotAvailable;
        }
        self.bands
            .iter()
            .find(|band| band.contains(mileage))
            .map(|band| Price::Amount(band.price))
            .unwrap_or(Price::NotAvailable)
    }

    /// Price for a single booked vehicle; `None` until a reading is chosen.
    pub fn price_for_vehicle(&self, vehicle: &VehicleBookingEntry) -> Option<Price> {
        vehicle.current_mileage.map(|mileage| self.price_for(mileage))
    }

    /// Sum over every vehicle's current reading. Vehicles without a reading
    /// contribute nothing under either policy.
    pub fn total_for(&self, vehicles: &[VehicleBookingEntry], policy: PricingPolicy) -> Price {
        let mut total = 0u64;
        for vehicle in vehicles {
            match self.price_for_vehicle(vehicle) {
                Some(Price::Amount(value)) => total += value,
                Some(Price::NotAvailable) => {
                    if policy == PricingPolicy::Strict {
                        tracing::debug!(plate = %vehicle.plate, "total unavailable under strict pricing");
                        return Price::NotAvailable;
                    }
                }
                None => {}
            }
        }
        Price::Amount(total)
    }
}
