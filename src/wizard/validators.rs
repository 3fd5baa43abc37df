use std::collections::HashSet;
use std::fmt;

use crate::core::{Clock, SystemClock};
use crate::dealership::DealershipDirectory;
use crate::domain::common::{is_filled, is_filled_opt};
use crate::domain::{is_valid_plate, BookingDraft, PaymentMethod, VehicleBookingEntry};
use crate::wizard::WizardStep;

/// One field blocking a step, suitable for an inline message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub step: WizardStep,
    /// Dotted path, e.g. `vehicles[AB123CD].current_mileage`.
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn new(step: WizardStep, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step,
            field: field.into(),
            message: message.into(),
        }
    }

    fn vehicle(
        step: WizardStep,
        vehicle: &VehicleBookingEntry,
        field: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::new(step, format!("vehicles[{}].{field}", vehicle.plate), message)
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Per-step completeness checks over a draft.
pub struct StepValidators {
    clock: Box<dyn Clock>,
    directory: DealershipDirectory,
}

impl Default for StepValidators {
    fn default() -> Self {
        Self::new(Box::new(SystemClock), DealershipDirectory::reference())
    }
}

impl StepValidators {
    pub fn new(clock: Box<dyn Clock>, directory: DealershipDirectory) -> Self {
        Self { clock, directory }
    }

    pub fn directory(&self) -> &DealershipDirectory {
        &self.directory
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn can_advance(&self, step: WizardStep, draft: &BookingDraft) -> bool {
        self.missing_fields(step, draft).is_empty()
    }

    pub fn missing_fields(&self, step: WizardStep, draft: &BookingDraft) -> Vec<FieldIssue> {
        match step {
            WizardStep::Client => client_issues(draft),
            WizardStep::VehicleSelection => vehicle_selection_issues(draft),
            WizardStep::ServiceSelection => service_issues(draft),
            WizardStep::DealershipSelection => self.dealership_issues(draft),
            WizardStep::PickupData => pickup_issues(draft),
            WizardStep::Payment => payment_issues(draft),
            WizardStep::Confirmation => Vec::new(),
        }
    }

    fn dealership_issues(&self, draft: &BookingDraft) -> Vec<FieldIssue> {
        let step = WizardStep::DealershipSelection;
        let mut issues = Vec::new();
        match draft.dealership_id.as_deref() {
            None => issues.push(FieldIssue::new(step, "dealership_id", "Choose a dealership")),
            Some(id) if self.directory.find(id).is_none() => issues.push(FieldIssue::new(
                step,
                "dealership_id",
                format!("Unknown dealership `{id}`"),
            )),
            Some(_) => {}
        }

        let today = self.clock.today();
        for vehicle in &draft.vehicles {
            match vehicle.scheduled_date {
                None => issues.push(FieldIssue::vehicle(
                    step,
                    vehicle,
                    "scheduled_date",
                    "Pick a date",
                )),
                Some(date) if !self.directory.is_date_bookable(date, today) => {
                    issues.push(FieldIssue::vehicle(
                        step,
                        vehicle,
                        "scheduled_date",
                        format!("{date} cannot be booked"),
                    ))
                }
                Some(_) => {}
            }
            if vehicle.time_slot.is_none() {
                issues.push(FieldIssue::vehicle(step, vehicle, "time_slot", "Pick a time slot"));
            }
        }
        issues
    }
}

fn client_issues(draft: &BookingDraft) -> Vec<FieldIssue> {
    let step = WizardStep::Client;
    let client = &draft.client;
    let mut issues = Vec::new();

    match client.identity() {
        None => issues.push(FieldIssue::new(step, "document_type", "Select a document type")),
        Some(identity) if !identity.is_complete() => {
            let field = if client.document_type.map(|kind| kind.is_company()).unwrap_or(false) {
                "legal_name"
            } else {
                "full_name"
            };
            issues.push(FieldIssue::new(step, field, "Name is required"));
        }
        Some(_) => {}
    }
    if !is_filled(&client.document_number) {
        issues.push(FieldIssue::new(step, "document_number", "Document number is required"));
    }
    if !is_filled(&client.email) {
        issues.push(FieldIssue::new(step, "email", "Email is required"));
    }
    if !client.phones.has_any() {
        issues.push(FieldIssue::new(step, "phones", "Add at least one phone number"));
    }
    if !is_filled(&client.address) {
        issues.push(FieldIssue::new(step, "address", "Address is required"));
    }
    issues
}

fn vehicle_selection_issues(draft: &BookingDraft) -> Vec<FieldIssue> {
    let step = WizardStep::VehicleSelection;
    let mut issues = Vec::new();
    if draft.vehicles.is_empty() {
        issues.push(FieldIssue::new(step, "vehicles", "Select at least one vehicle"));
        return issues;
    }

    let mut seen = HashSet::new();
    for vehicle in &draft.vehicles {
        if !seen.insert(vehicle.plate.as_str()) {
            issues.push(FieldIssue::vehicle(step, vehicle, "plate", "Duplicate plate"));
        }
        if !vehicle.is_new() {
            continue;
        }
        if !is_valid_plate(&vehicle.plate) {
            issues.push(FieldIssue::vehicle(
                step,
                vehicle,
                "plate",
                "Plate must look like AB123CD or ABC123",
            ));
        }
        let required = [
            ("model", is_filled(&vehicle.model)),
            ("year", is_filled(&vehicle.year)),
            ("engine_number", is_filled_opt(vehicle.engine_number.as_deref())),
            ("chassis_number", is_filled_opt(vehicle.chassis_number.as_deref())),
        ];
        for (field, present) in required {
            if !present {
                issues.push(FieldIssue::vehicle(step, vehicle, field, "Required"));
            }
        }
    }
    issues
}

fn service_issues(draft: &BookingDraft) -> Vec<FieldIssue> {
    let step = WizardStep::ServiceSelection;
    draft
        .vehicles
        .iter()
        .filter_map(|vehicle| match vehicle.current_mileage {
            None => Some(FieldIssue::vehicle(
                step,
                vehicle,
                "current_mileage",
                "Select the current mileage",
            )),
            Some(current) if current < vehicle.mileage_floor() => Some(FieldIssue::vehicle(
                step,
                vehicle,
                "current_mileage",
                format!(
                    "{current} km is below the last recorded {} km",
                    vehicle.mileage_floor()
                ),
            )),
            Some(_) => None,
        })
        .collect()
}

fn pickup_issues(draft: &BookingDraft) -> Vec<FieldIssue> {
    if draft.owner_picks_up {
        return Vec::new();
    }
    let step = WizardStep::PickupData;
    draft
        .vehicles
        .iter()
        .filter(|vehicle| {
            !vehicle
                .pickup_person
                .as_ref()
                .map(|person| person.is_complete())
                .unwrap_or(false)
        })
        .map(|vehicle| {
            FieldIssue::vehicle(
                step,
                vehicle,
                "pickup_person",
                "Assign who will pick up this vehicle",
            )
        })
        .collect()
}

fn payment_issues(draft: &BookingDraft) -> Vec<FieldIssue> {
    let step = WizardStep::Payment;
    match draft.payment_method {
        None => vec![FieldIssue::new(step, "payment_method", "Choose a payment method")],
        Some(PaymentMethod::CorporateAccount) => match &draft.corporate_account {
            None => vec![FieldIssue::new(
                step,
                "corporate_account",
                "Corporate account details are required",
            )],
            Some(payment) => payment
                .missing_fields()
                .into_iter()
                .map(|field| {
                    FieldIssue::new(step, format!("corporate_account.{field}"), "Required")
                })
                .collect(),
        },
        Some(_) => Vec::new(),
    }
}
