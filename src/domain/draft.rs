use serde::{Deserialize, Serialize};

use crate::domain::client::{ClientInfo, ClientProfile};
use crate::domain::payment::{CorporateAccountPayment, PaymentMethod};
use crate::domain::vehicle::VehicleBookingEntry;

/// Booking being assembled across the wizard steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingDraft {
    pub client: ClientInfo,
    pub vehicles: Vec<VehicleBookingEntry>,
    pub dealership_id: Option<String>,
    /// Location used to rank dealerships, seeded from the client address.
    pub current_location: String,
    /// Free-text override picked by the user.
    pub selected_location: Option<String>,
    /// When set the account holder collects every vehicle personally.
    pub owner_picks_up: bool,
    pub payment_method: Option<PaymentMethod>,
    pub corporate_account: Option<CorporateAccountPayment>,
}

impl BookingDraft {
    /// Fresh draft for a session opened by `profile`.
    pub fn seeded(profile: &ClientProfile) -> Self {
        let client = ClientInfo::from_profile(profile);
        let corporate_account = Some(CorporateAccountPayment::for_client(&client));
        Self {
            current_location: client.address.clone(),
            client,
            vehicles: Vec::new(),
            dealership_id: None,
            selected_location: None,
            owner_picks_up: false,
            payment_method: Some(PaymentMethod::CorporateAccount),
            corporate_account,
        }
    }

    /// Location the dealership step works from.
    pub fn effective_location(&self) -> &str {
        self.selected_location
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(self.current_location.as_str())
    }

    pub fn vehicle_by_plate(&self, plate: &str) -> Option<(usize, &VehicleBookingEntry)> {
        self.vehicles
            .iter()
            .enumerate()
            .find(|(_, vehicle)| vehicle.plate.eq_ignore_ascii_case(plate.trim()))
    }

    /// Returns a new draft with every field present in `patch` replaced.
    ///
    /// Fields are merged shallowly and the last write wins; `vehicles` is
    /// always replaced as a whole list. A locked primary phone survives any
    /// attempt to overwrite it.
    pub fn merged(&self, patch: DraftPatch) -> BookingDraft {
        let mut next = self.clone();
        if let Some(mut client) = patch.client {
            if self.client.phones.is_primary_locked() {
                let primary = self.client.phones.primary().unwrap_or_default();
                if client.phones.primary() != Some(primary) || !client.phones.is_primary_locked() {
                    tracing::debug!("restoring locked primary phone on client update");
                }
                client.phones = client.phones.with_locked_primary(primary);
            }
            next.client = client;
        }
        if let Some(vehicles) = patch.vehicles {
            next.vehicles = vehicles;
        }
        if let Some(dealership_id) = patch.dealership_id {
            next.dealership_id = dealership_id;
        }
        if let Some(location) = patch.current_location {
            next.current_location = location;
        }
        if let Some(location) = patch.selected_location {
            next.selected_location = location;
        }
        if let Some(flag) = patch.owner_picks_up {
            next.owner_picks_up = flag;
        }
        if let Some(method) = patch.payment_method {
            next.payment_method = method;
        }
        if let Some(payment) = patch.corporate_account {
            next.corporate_account = payment;
        }
        next
    }
}

/// Partial update of a [`BookingDraft`]. `None` leaves the field alone; for
/// optional draft fields `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPatch {
    pub client: Option<ClientInfo>,
    pub vehicles: Option<Vec<VehicleBookingEntry>>,
    pub dealership_id: Option<Option<String>>,
    pub current_location: Option<String>,
    pub selected_location: Option<Option<String>>,
    pub owner_picks_up: Option<bool>,
    pub payment_method: Option<Option<PaymentMethod>>,
    pub corporate_account: Option<Option<CorporateAccountPayment>>,
}

impl DraftPatch {
    pub fn is_empty(&self) -> bool {
        self == &DraftPatch::default()
    }

    pub fn client(client: ClientInfo) -> Self {
        Self {
            client: Some(client),
            ..Self::default()
        }
    }

    pub fn vehicles(vehicles: Vec<VehicleBookingEntry>) -> Self {
        Self {
            vehicles: Some(vehicles),
            ..Self::default()
        }
    }

    pub fn dealership(id: Option<String>) -> Self {
        Self {
            dealership_id: Some(id),
            ..Self::default()
        }
    }

    pub fn selected_location(location: Option<String>) -> Self {
        Self {
            selected_location: Some(location),
            ..Self::default()
        }
    }

    pub fn owner_picks_up(flag: bool) -> Self {
        Self {
            owner_picks_up: Some(flag),
            ..Self::default()
        }
    }

    pub fn payment_method(method: Option<PaymentMethod>) -> Self {
        Self {
            payment_method: Some(method),
            ..Self::default()
        }
    }

    pub fn corporate_account(payment: Option<CorporateAccountPayment>) -> Self {
        Self {
            corporate_account: Some(payment),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::PhoneNumbers;
    use crate::domain::vehicle::VehicleRecord;

    fn draft() -> BookingDraft {
        BookingDraft::seeded(&ClientProfile::sample())
    }

    #[test]
    fn empty_patch_leaves_draft_unchanged() {
        let original = draft();
        assert_eq!(original.merged(DraftPatch::default()), original);
    }

    #[test]
    fn patch_replaces_only_present_fields() {
        let original = draft();
        let merged = original.merged(DraftPatch::dealership(Some("2".into())));
        assert_eq!(merged.dealership_id.as_deref(), Some("2"));
        assert_eq!(merged.client, original.client);
        assert_eq!(merged.payment_method, original.payment_method);
        assert!(original.dealership_id.is_none(), "merge is not in place");
    }

    #[test]
    fn later_patch_wins() {
        let merged = draft()
            .merged(DraftPatch::payment_method(Some(PaymentMethod::Wallet)))
            .merged(DraftPatch::payment_method(Some(PaymentMethod::DebitCard)));
        assert_eq!(merged.payment_method, Some(PaymentMethod::DebitCard));
    }

    #[test]
    fn vehicles_are_replaced_as_whole_list() {
        let fleet = VehicleRecord::sample_fleet();
        let first = draft().merged(DraftPatch::vehicles(vec![
            VehicleBookingEntry::from_record(&fleet[0]),
            VehicleBookingEntry::from_record(&fleet[1]),
        ]));
        let second = first.merged(DraftPatch::vehicles(vec![VehicleBookingEntry::from_record(
            &fleet[2],
        )]));
        assert_eq!(second.vehicles.len(), 1);
        assert_eq!(second.vehicles[0].plate, "LM456NO");
    }

    #[test]
    fn locked_primary_phone_survives_client_patch() {
        let original = draft();
        let mut client = original.client.clone();
        client.phones = PhoneNumbers::new(vec!["99-9999-9999".into(), "11-2222-3333".into()]);
        client.email = "new@example.com".into();

        let merged = original.merged(DraftPatch::client(client));
        assert_eq!(merged.client.email, "new@example.com");
        assert_eq!(merged.client.phones.entries(), ["11-4567-8901", "11-2222-3333"]);
        assert!(merged.client.phones.is_primary_locked());
    }

    #[test]
    fn selected_location_overrides_address() {
        let original = draft();
        assert_eq!(original.effective_location(), "Av. Corrientes 1234, CABA, Buenos Aires");
        let moved = original.merged(DraftPatch::selected_location(Some("Mendoza".into())));
        assert_eq!(moved.effective_location(), "Mendoza");
    }
}
