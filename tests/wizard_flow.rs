mod common;

use booking_core::core::services::payment_service::CorporateField;
use booking_core::core::services::{ClientService, PaymentService, PickupService, VehicleService};
use booking_core::domain::{PaymentMethod, PickupPerson, VehicleBookingEntry, VehicleRecord};
use booking_core::pricing::Price;
use booking_core::wizard::WizardStep;
use chrono::NaiveTime;
use common::{date, reference_today, setup_wizard};

fn ten_am() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap()
}

#[test]
fn corporate_booking_walks_every_step() {
    let (mut wizard, validators) = setup_wizard();
    let fleet = VehicleRecord::sample_fleet();
    let directory = validators.directory().clone();

    assert_eq!(wizard.current_step(), WizardStep::Client);
    assert!(validators.can_advance(WizardStep::Client, wizard.draft()));
    wizard.advance();

    assert!(!validators.can_advance(WizardStep::VehicleSelection, wizard.draft()));
    let patch = VehicleService::add_registered(wizard.draft(), &fleet, "ab123cd").unwrap();
    wizard.merge_draft(patch);
    let patch = VehicleService::add_registered(wizard.draft(), &fleet, "XY987ZW").unwrap();
    wizard.merge_draft(patch);
    assert!(validators.can_advance(WizardStep::VehicleSelection, wizard.draft()));
    wizard.advance();

    for (plate, km) in [("AB123CD", 20_000), ("XY987ZW", 35_000)] {
        let patch = VehicleService::set_current_mileage(wizard.draft(), plate, km).unwrap();
        wizard.merge_draft(patch);
    }
    assert_eq!(wizard.total(), Price::Amount(90_000));
    assert!(validators.can_advance(WizardStep::ServiceSelection, wizard.draft()));
    wizard.advance();

    wizard.merge_draft(booking_core::domain::DraftPatch::dealership(Some("1".into())));
    for plate in ["AB123CD", "XY987ZW"] {
        let patch = VehicleService::schedule(
            wizard.draft(),
            &directory,
            reference_today(),
            plate,
            date(2025, 4, 16),
            ten_am(),
        )
        .unwrap();
        wizard.merge_draft(patch);
    }
    assert!(validators.can_advance(WizardStep::DealershipSelection, wizard.draft()));
    wizard.advance();

    let person = PickupPerson::new("Ana", "Gómez", "30111222");
    let patch = PickupService::apply_to_all(wizard.draft(), &person);
    wizard.merge_draft(patch);
    assert!(validators.can_advance(WizardStep::PickupData, wizard.draft()));
    wizard.advance();

    assert_eq!(wizard.draft().payment_method, Some(PaymentMethod::CorporateAccount));
    assert_eq!(wizard.draft().corporate_account.as_ref().unwrap().total, 90_000);
    for (field, value) in [
        (CorporateField::Bank, "1"),
        (CorporateField::AccountNumber, "123-456/7"),
        (CorporateField::BankCode, "0110599520000001234567"),
        (CorporateField::DueDate, "2025-05-10"),
    ] {
        let patch = PaymentService::set_corporate_field(wizard.draft(), field, value).unwrap();
        wizard.merge_draft(patch);
    }
    let issues = validators.missing_fields(WizardStep::Payment, wizard.draft());
    assert_eq!(issues.len(), 1);
    assert!(issues[0].field.contains("proof_of_payment"));

    let patch = PaymentService::set_corporate_field(
        wizard.draft(),
        CorporateField::ProofOfPayment,
        "transferencia.pdf",
    )
    .unwrap();
    wizard.merge_draft(patch);
    assert!(validators.can_advance(WizardStep::Payment, wizard.draft()));
    wizard.advance();

    assert_eq!(wizard.current_step(), WizardStep::Confirmation);
    assert!(!wizard.is_completed());
    wizard.advance();
    assert!(wizard.is_completed());
}

#[test]
fn corporate_total_follows_vehicle_changes() {
    let (mut wizard, _) = setup_wizard();
    let fleet = VehicleRecord::sample_fleet();
    let patch = VehicleService::add_registered(wizard.draft(), &fleet, "AB123CD").unwrap();
    wizard.merge_draft(patch);
    let patch = VehicleService::set_current_mileage(wizard.draft(), "AB123CD", 20_000).unwrap();
    wizard.merge_draft(patch);
    assert_eq!(wizard.draft().corporate_account.as_ref().unwrap().total, 40_000);

    let patch = VehicleService::remove_plate(wizard.draft(), "AB123CD").unwrap();
    wizard.merge_draft(patch);
    assert_eq!(wizard.draft().corporate_account.as_ref().unwrap().total, 0);
}

#[test]
fn retreat_keeps_entered_data_and_reset_restores_seed() {
    let (mut wizard, _) = setup_wizard();
    let entry = VehicleBookingEntry::new_vehicle("aa111bb", "Partner", "2023", "E-1", "C-1");
    let patch = VehicleService::add(wizard.draft(), entry).unwrap();
    wizard.merge_draft(patch);
    let patch = ClientService::add_phone(wizard.draft(), "1155550000").unwrap();
    wizard.merge_draft(patch);
    wizard.advance();
    wizard.advance();
    wizard.retreat();

    assert_eq!(wizard.current_step(), WizardStep::VehicleSelection);
    assert_eq!(wizard.draft().vehicles[0].plate, "AA111BB");
    assert_eq!(wizard.draft().client.phones.len(), 2);

    wizard.reset();
    assert_eq!(wizard.cursor(), 0);
    assert!(wizard.draft().vehicles.is_empty());
    assert_eq!(wizard.draft().client.phones.len(), 1);
}

#[test]
fn primary_phone_cannot_be_replaced() {
    let (wizard, _) = setup_wizard();
    assert!(ClientService::replace_phone(wizard.draft(), 0, "1100000000").is_err());
    assert!(ClientService::remove_phone(wizard.draft(), 0).is_err());
}

#[test]
fn scheduling_rejects_blocked_and_past_days() {
    let (mut wizard, validators) = setup_wizard();
    let fleet = VehicleRecord::sample_fleet();
    let patch = VehicleService::add_registered(wizard.draft(), &fleet, "AB123CD").unwrap();
    wizard.merge_draft(patch);
    wizard.merge_draft(booking_core::domain::DraftPatch::dealership(Some("2".into())));

    for day in [date(2025, 4, 11), date(2025, 4, 20), date(2025, 4, 25)] {
        let result = VehicleService::schedule(
            wizard.draft(),
            validators.directory(),
            reference_today(),
            "AB123CD",
            day,
            ten_am(),
        );
        assert!(result.is_err(), "{day} should not be bookable");
    }
}
