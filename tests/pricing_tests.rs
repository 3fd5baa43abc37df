use booking_core::currency::{CurrencyCode, LocaleConfig};
use booking_core::domain::{VehicleBookingEntry, VehicleRecord};
use booking_core::pricing::{mileage_options, Price, PricingPolicy, PricingTable};

fn booked(plate: &str, current: u32) -> VehicleBookingEntry {
    let record = VehicleRecord::new(plate, plate, "Toyota Hilux", "2024", Some(0));
    let mut entry = VehicleBookingEntry::from_record(&record);
    entry.current_mileage = Some(current);
    entry
}

#[test]
fn band_edges_are_inclusive() {
    let table = PricingTable::standard();
    assert_eq!(table.price_for(1_000), Price::Amount(0));
    assert_eq!(table.price_for(1_001), Price::Amount(35_000));
    assert_eq!(table.price_for(10_000), Price::Amount(35_000));
    assert_eq!(table.price_for(20_000), Price::Amount(40_000));
    assert_eq!(table.price_for(20_001), Price::Amount(45_000));
    assert_eq!(table.price_for(150_000), Price::Amount(105_000));
    assert_eq!(table.price_for(150_001), Price::NotAvailable);
}

#[test]
fn policies_differ_only_on_unpriceable_vehicles() {
    let table = PricingTable::standard();
    let vehicles = vec![booked("AB123CD", 20_000), booked("XY987ZW", 200_000)];
    assert_eq!(
        table.total_for(&vehicles, PricingPolicy::Lenient),
        Price::Amount(40_000)
    );
    assert_eq!(
        table.total_for(&vehicles, PricingPolicy::Strict),
        Price::NotAvailable
    );

    let priced = &vehicles[..1];
    assert_eq!(
        table.total_for(priced, PricingPolicy::Strict),
        table.total_for(priced, PricingPolicy::Lenient)
    );
}

#[test]
fn selector_disables_readings_below_history() {
    let options = mileage_options(30_000);
    let enabled: Vec<u32> = options
        .iter()
        .filter(|option| option.enabled)
        .map(|option| option.value)
        .collect();
    assert_eq!(enabled.first(), Some(&30_000));
    assert!(options.iter().filter(|option| !option.enabled).all(|option| option.value < 30_000));
    assert_eq!(options[3].label(&LocaleConfig::from_tag("es-AR")), "< 30.000 km");
}

#[test]
fn prices_render_in_the_configured_locale() {
    let price = Price::Amount(45_000);
    assert_eq!(price.render(&CurrencyCode::new("ars"), &LocaleConfig::from_tag("es-AR")), "$45.000");
    assert_eq!(price.render(&CurrencyCode::new("USD"), &LocaleConfig::from_tag("en-US")), "$45,000");
    assert_eq!(Price::NotAvailable.to_string(), "No disponible");
}
