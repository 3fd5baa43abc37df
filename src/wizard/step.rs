use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered stages of the booking wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Client,
    VehicleSelection,
    ServiceSelection,
    DealershipSelection,
    PickupData,
    Payment,
    Confirmation,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::Client,
        WizardStep::VehicleSelection,
        WizardStep::ServiceSelection,
        WizardStep::DealershipSelection,
        WizardStep::PickupData,
        WizardStep::Payment,
        WizardStep::Confirmation,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|step| step == self)
            .unwrap_or_default()
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Client => "Client details",
            WizardStep::VehicleSelection => "Vehicle selection",
            WizardStep::ServiceSelection => "Service selection",
            WizardStep::DealershipSelection => "Dealership and schedule",
            WizardStep::PickupData => "Pickup data",
            WizardStep::Payment => "Payment",
            WizardStep::Confirmation => "Confirmation",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
