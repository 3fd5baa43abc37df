//! Vehicle selection and service (mileage) commands.

use crate::cli::commands::{arg, split_subcommand, usage_error};
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::forms::{
    FormEngine, FormResult, NewVehicleWizard, VehicleFormData, WizardInteraction,
};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::VehicleService;
use crate::domain::{normalize_plate, Displayable, VehicleBookingEntry};
use crate::errors::BookingError;
use crate::pricing::{mileage_options, FREE_SERVICE_LIMIT, MAX_PRICED_MILEAGE};
use crate::storage::VehicleRegistry;

pub(crate) const SUBCOMMANDS: &[&str] = &["list", "available", "add", "new", "edit", "remove"];

const USAGE: &str =
    "vehicle [list|available|add <plate>|new [<plate> <model> <year> <engine> <chassis>]|edit <plate>|remove <plate>]";
const NEW_USAGE: &str = "vehicle new <plate> <model> <year> <engine> <chassis> [last_km]";
const EDIT_USAGE: &str =
    "vehicle edit <plate> [<new plate> <model> <year> <engine> <chassis> [last_km]]";
const MILEAGE_USAGE: &str = "mileage <plate> [km]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "vehicle",
            "Choose the vehicles to book",
            USAGE,
            cmd_vehicle,
        ),
        CommandEntry::new(
            "mileage",
            "Show mileage options or set a vehicle's current reading",
            MILEAGE_USAGE,
            cmd_mileage,
        ),
        CommandEntry::new(
            "prices",
            "Show the service price bands and the booking total",
            "prices",
            cmd_prices,
        ),
    ]
}

fn cmd_vehicle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        list_selected(context);
        return Ok(());
    }
    let (subcommand, rest) = split_subcommand(args, USAGE)?;
    match subcommand.as_str() {
        "list" => {
            list_selected(context);
            Ok(())
        }
        "available" => {
            list_available(context);
            Ok(())
        }
        "add" => handle_add(context, rest),
        "new" => handle_new(context, rest),
        "edit" => handle_edit(context, rest),
        "remove" | "rm" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown vehicle action `{other}`; usage: {USAGE}"
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage_error("vehicle add <plate> [plate...]"));
    }
    for plate in args {
        let patch = VehicleService::add_registered(context.draft(), context.vehicles.list(), plate)?;
        context.apply(patch);
        let label = context
            .draft()
            .vehicles
            .last()
            .map(Displayable::display_label)
            .unwrap_or_else(|| normalize_plate(plate));
        io::print_success(format!("Added {label} to the booking."));
    }
    Ok(())
}

fn handle_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let entry = if args.is_empty() {
        context.require_interactive(NEW_USAGE)?;
        match prompt_new_vehicle(context)? {
            Some(entry) => entry,
            None => {
                io::print_info("Vehicle not added.");
                return Ok(());
            }
        }
    } else {
        if args.len() < 5 {
            return Err(usage_error(NEW_USAGE));
        }
        let plate = normalize_plate(args[0]);
        if context.vehicles.find_by_plate(&plate).is_some() {
            return Err(CommandError::InvalidArguments(format!(
                "{plate} is already registered; use `vehicle add {plate}`"
            )));
        }
        let mut entry = VehicleBookingEntry::new_vehicle(&plate, args[1], args[2], args[3], args[4]);
        if let Some(raw) = args.get(5) {
            entry.last_known_mileage = Some(parse_km(raw)?);
        }
        entry
    };

    let plate = entry.plate.clone();
    let patch = VehicleService::add(context.draft(), entry)?;
    context.apply(patch);
    io::print_success(format!(
        "Added new vehicle {plate}; it joins your registry once the booking is confirmed."
    ));
    Ok(())
}

fn prompt_new_vehicle(context: &ShellContext) -> Result<Option<VehicleBookingEntry>, CommandError> {
    let wizard = NewVehicleWizard::new(taken_plates(context, None));
    let mut interaction = WizardInteraction::new();
    match FormEngine::new(&wizard).run(&mut interaction) {
        Ok(FormResult::Completed(data)) => Ok(Some(data.into_booking_entry())),
        Ok(FormResult::Cancelled) => Ok(None),
        Err(never) => match never {},
    }
}

/// Plates a new vehicle may not use, other than the one at `skip`.
fn taken_plates(context: &ShellContext, skip: Option<usize>) -> Vec<String> {
    context
        .draft()
        .vehicles
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != skip)
        .map(|(_, vehicle)| vehicle.plate.clone())
        .chain(context.vehicles.list().iter().map(|record| record.plate.clone()))
        .collect()
}

/// Corrects the details of a vehicle added with `vehicle new`.
fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let plate = arg(args, 0, EDIT_USAGE)?;
    let (index, current) = context
        .draft()
        .vehicle_by_plate(plate)
        .map(|(index, vehicle)| (index, vehicle.clone()))
        .ok_or_else(|| BookingError::VehicleNotFound(normalize_plate(plate)))?;
    if !current.is_new() {
        return Err(CommandError::InvalidArguments(format!(
            "{} comes from your registry; change it with `registry update`",
            current.plate
        )));
    }

    let data = match &args[1..] {
        [] => {
            context.require_interactive(EDIT_USAGE)?;
            let wizard = NewVehicleWizard::editing(taken_plates(context, Some(index)), &current);
            match FormEngine::new(&wizard).run(&mut WizardInteraction::new()) {
                Ok(FormResult::Completed(data)) => data,
                Ok(FormResult::Cancelled) => {
                    io::print_info("Vehicle unchanged.");
                    return Ok(());
                }
                Err(never) => match never {},
            }
        }
        [new_plate, model, year, engine, chassis, km @ ..] if km.len() <= 1 => VehicleFormData {
            plate: normalize_plate(new_plate),
            model: model.to_string(),
            year: year.to_string(),
            engine_number: engine.to_string(),
            chassis_number: chassis.to_string(),
            last_known_mileage: km.first().map(|raw| parse_km(raw)).transpose()?,
        },
        _ => return Err(usage_error(EDIT_USAGE)),
    };

    if context.vehicles.find_by_plate(&data.plate).is_some() {
        return Err(CommandError::InvalidArguments(format!(
            "{} is already registered; use `vehicle add {}`",
            data.plate, data.plate
        )));
    }
    let mut entry = data.into_booking_entry();
    entry.id = current.id.clone();
    entry.scheduled_date = current.scheduled_date;
    entry.time_slot = current.time_slot;
    entry.pickup_person = current.pickup_person.clone();
    entry.current_mileage = current
        .current_mileage
        .filter(|km| *km >= entry.mileage_floor());
    if current.current_mileage.is_some() && entry.current_mileage.is_none() {
        io::print_warning(format!(
            "The current reading for {} is below the new last known mileage; set it again with `mileage`.",
            entry.plate
        ));
    }

    let label = entry.display_label();
    let patch = VehicleService::replace_at(context.draft(), index, entry)?;
    context.apply(patch);
    io::print_success(format!("Updated {label}."));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let plate = arg(args, 0, "vehicle remove <plate>")?;
    let patch = VehicleService::remove_plate(context.draft(), plate)?;
    context.apply(patch);
    io::print_success(format!("Removed {} from the booking.", normalize_plate(plate)));
    Ok(())
}

fn list_selected(context: &ShellContext) {
    let draft = context.draft();
    output_section("Vehicles in this booking");
    if draft.vehicles.is_empty() {
        io::print_info("No vehicles selected yet.");
        io::print_hint("Use `vehicle available` to see your registry.");
        return;
    }
    let rows: Vec<Vec<String>> = draft
        .vehicles
        .iter()
        .enumerate()
        .map(|(idx, vehicle)| {
            vec![
                (idx + 1).to_string(),
                vehicle.plate.clone(),
                vehicle.model.clone(),
                vehicle.year.clone(),
                if vehicle.is_new() { "new" } else { "registered" }.to_string(),
                vehicle
                    .last_known_mileage
                    .map(|km| format!("{km} km"))
                    .unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    render_table(&["#", "Plate", "Model", "Year", "Origin", "Last km"], &rows);
}

fn list_available(context: &ShellContext) {
    let draft = context.draft();
    output_section("Registered vehicles");
    let rows: Vec<Vec<String>> = context
        .vehicles
        .list()
        .iter()
        .map(|record| {
            let selected = draft.vehicle_by_plate(&record.plate).is_some();
            vec![
                record.plate.clone(),
                record.model.clone(),
                record.year.clone(),
                record
                    .last_known_mileage
                    .map(|km| format!("{km} km"))
                    .unwrap_or_else(|| "-".into()),
                if selected { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    render_table(&["Plate", "Model", "Year", "Last km", "Selected"], &rows);
}

fn cmd_mileage(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let plate = arg(args, 0, MILEAGE_USAGE)?;
    let Some(raw) = args.get(1) else {
        return show_mileage_options(context, plate);
    };
    let km = parse_km(raw)?;
    let patch = VehicleService::set_current_mileage(context.draft(), plate, km)?;
    context.apply(patch);

    let price = context.wizard.pricing().price_for(km);
    io::print_success(format!(
        "{}: {} km, service {}.",
        normalize_plate(plate),
        km,
        context.render_price(price)
    ));
    if !price.is_available() {
        io::print_warning(format!(
            "Readings above {MAX_PRICED_MILEAGE} km have no standard price."
        ));
    }
    Ok(())
}

fn show_mileage_options(context: &mut ShellContext, plate: &str) -> CommandResult {
    let (_, vehicle) = context
        .draft()
        .vehicle_by_plate(plate)
        .ok_or_else(|| BookingError::VehicleNotFound(normalize_plate(plate)))?;
    let locale = context.locale();
    let pricing = context.wizard.pricing();
    output_section(format!("Mileage options for {}", vehicle.plate));
    let rows: Vec<Vec<String>> = mileage_options(vehicle.mileage_floor())
        .into_iter()
        .map(|option| {
            vec![
                option.label(&locale),
                context.render_price(pricing.price_for(option.value)),
                if option.enabled { "" } else { "below last reading" }.to_string(),
            ]
        })
        .collect();
    render_table(&["Reading", "Price", ""], &rows);
    if context.mode() == CliMode::Interactive {
        io::print_hint(format!("Set it with `mileage {} <km>`.", vehicle.plate));
    }
    Ok(())
}

fn cmd_prices(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Service prices");
    let mut rows = vec![vec![
        format!("0 - {FREE_SERVICE_LIMIT} km"),
        context.render_amount(0),
    ]];
    rows.extend(context.wizard.pricing().bands().iter().map(|band| {
        vec![
            format!("{} - {} km", band.min, band.max),
            context.render_amount(band.price),
        ]
    }));
    render_table(&["Reading", "Price"], &rows);

    let draft = context.draft();
    if !draft.vehicles.is_empty() {
        output_section("This booking");
        let rows: Vec<Vec<String>> = draft
            .vehicles
            .iter()
            .map(|vehicle| {
                vec![
                    vehicle.plate.clone(),
                    context
                        .wizard
                        .pricing()
                        .price_for_vehicle(vehicle)
                        .map(|price| context.render_price(price))
                        .unwrap_or_else(|| "no reading".into()),
                ]
            })
            .collect();
        render_table(&["Plate", "Price"], &rows);
    }
    io::print_info(format!(
        "Total ({:?} pricing): {}",
        context.wizard.policy(),
        context.render_price(context.wizard.total())
    ));
    Ok(())
}

/// Parses `20000`, `20.000` or `20k`.
fn parse_km(raw: &str) -> Result<u32, CommandError> {
    let cleaned = raw.trim().to_ascii_lowercase().replace(['.', ','], "");
    let parsed = match cleaned.strip_suffix('k') {
        Some(thousands) => thousands.parse::<u32>().ok().and_then(|k| k.checked_mul(1_000)),
        None => cleaned.trim_end_matches("km").trim().parse::<u32>().ok(),
    };
    parsed.ok_or_else(|| {
        CommandError::InvalidArguments(format!("`{raw}` is not a mileage in kilometres"))
    })
}

#[cfg(test)]
mod tests {
    use super::parse_km;
    use crate::cli::core::{process_script_in, CommandError};
    use crate::errors::BookingError;
    use tempfile::tempdir;

    #[test]
    fn km_accepts_grouping_and_suffixes() {
        assert_eq!(parse_km("20000").unwrap(), 20_000);
        assert_eq!(parse_km("20.000").unwrap(), 20_000);
        assert_eq!(parse_km("20k").unwrap(), 20_000);
        assert_eq!(parse_km("35000km").unwrap(), 35_000);
        assert!(parse_km("lots").is_err());
    }

    #[test]
    fn add_from_registry_and_reject_duplicates() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(temp.path(), &["vehicle add AB123CD xy987zw"]).unwrap();
        assert_eq!(context.wizard.draft().vehicles.len(), 2);

        let err = context.process_line("vehicle add ab123cd").unwrap_err();
        assert!(matches!(err, CommandError::Core(BookingError::DuplicatePlate(_))));
    }

    #[test]
    fn new_vehicle_requires_valid_unregistered_plate() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(temp.path(), &[]).unwrap();
        let err = context
            .process_line("vehicle new A1 Kangoo 2023 M-1 CH-1")
            .unwrap_err();
        assert!(matches!(err, CommandError::Core(BookingError::InvalidPlate(_))));
        assert!(context
            .process_line("vehicle new AB123CD Hilux 2024 M-1 CH-1")
            .is_err());

        context
            .process_line("vehicle new AA111BB Kangoo 2023 M-1 CH-1 5000")
            .unwrap();
        let draft = context.wizard.draft();
        assert!(draft.vehicles[0].is_new());
        assert_eq!(draft.vehicles[0].last_known_mileage, Some(5_000));
    }

    #[test]
    fn edit_corrects_new_vehicle_in_place() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(
            temp.path(),
            &[
                "vehicle new AA111BB Kangoo 2023 M-1 CH-1",
                "mileage AA111BB 20000",
                "pickup assign AA111BB Ana Gómez 30111222",
            ],
        )
        .unwrap();
        let id = context.wizard.draft().vehicles[0].id.clone();

        context
            .process_line("vehicle edit aa111bb AA222BB Kangoo-Z 2024 M-2 CH-2")
            .unwrap();
        let draft = context.wizard.draft();
        assert_eq!(draft.vehicles.len(), 1);
        let vehicle = &draft.vehicles[0];
        assert_eq!(vehicle.id, id);
        assert!(vehicle.is_new());
        assert_eq!(vehicle.plate, "AA222BB");
        assert_eq!(vehicle.model, "Kangoo-Z");
        assert_eq!(vehicle.year, "2024");
        assert_eq!(vehicle.engine_number.as_deref(), Some("M-2"));
        assert_eq!(vehicle.chassis_number.as_deref(), Some("CH-2"));
        assert_eq!(vehicle.current_mileage, Some(20_000));
        assert_eq!(vehicle.pickup_person.as_ref().unwrap().national_id, "30111222");
    }

    #[test]
    fn edit_rejects_registered_vehicles_and_plate_clashes() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(
            temp.path(),
            &[
                "vehicle add AB123CD",
                "vehicle new AA111BB Kangoo 2023 M-1 CH-1",
                "vehicle new AA333BB Partner 2021 M-3 CH-3",
            ],
        )
        .unwrap();
        let before = context.wizard.draft().vehicles.clone();

        assert!(context
            .process_line("vehicle edit AB123CD AB123CD Hilux 2024 M-1 CH-1")
            .is_err());
        let err = context
            .process_line("vehicle edit AA111BB AA333BB Kangoo 2023 M-1 CH-1")
            .unwrap_err();
        assert!(matches!(err, CommandError::Core(BookingError::DuplicatePlate(_))));
        assert!(context
            .process_line("vehicle edit AA111BB XY987ZW Kangoo 2023 M-1 CH-1")
            .is_err());
        let err = context
            .process_line("vehicle edit AA111BB A1 Kangoo 2023 M-1 CH-1")
            .unwrap_err();
        assert!(matches!(err, CommandError::Core(BookingError::InvalidPlate(_))));
        assert!(context.process_line("vehicle edit ZZ999ZZ").is_err());
        assert!(context.process_line("vehicle edit AA111BB").is_err());
        assert_eq!(context.wizard.draft().vehicles, before);
    }

    #[test]
    fn new_vehicle_without_args_needs_a_terminal() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(temp.path(), &[]).unwrap();
        assert!(matches!(
            context.process_line("vehicle new"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn mileage_below_last_reading_is_rejected() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(temp.path(), &["vehicle add XY987ZW"]).unwrap();
        let err = context.process_line("mileage XY987ZW 20000").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Core(BookingError::MileageBelowLastKnown { .. })
        ));

        context.process_line("mileage XY987ZW 40k").unwrap();
        assert_eq!(context.wizard.total().amount(), Some(50_000));
        assert!(context.process_line("mileage XY987ZW").is_ok());
    }

    #[test]
    fn remove_drops_vehicle_from_total() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(
            temp.path(),
            &["vehicle add AB123CD XY987ZW", "mileage AB123CD 20000", "mileage XY987ZW 40000"],
        )
        .unwrap();
        assert_eq!(context.wizard.total().amount(), Some(90_000));
        context.process_line("vehicle remove XY987ZW").unwrap();
        assert_eq!(context.wizard.total().amount(), Some(40_000));
    }
}
