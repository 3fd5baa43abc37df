//! Registry maintenance: vehicles owned by the account outside any booking.

use crate::cli::commands::{arg, split_subcommand, usage_error};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::forms::{FormEngine, FormResult, NewVehicleWizard, WizardInteraction};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::domain::{
    is_valid_plate, normalize_plate, Displayable, VehicleId, VehicleRecord, VehicleRecordPatch,
};
use crate::errors::BookingError;
use crate::storage::VehicleRegistry;

pub(crate) const SUBCOMMANDS: &[&str] = &["list", "add", "update", "remove"];

const USAGE: &str = "registry [list|add <plate> <model> <year> [engine] [chassis] [km]|update <plate> <field> <value>|remove <plate>]";
const UPDATE_FIELDS: &str = "model, year, engine, chassis, km";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "registry",
        "Manage the vehicles registered to your account",
        USAGE,
        cmd_registry,
    )]
}

fn cmd_registry(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        list_records(context);
        return Ok(());
    }
    let (subcommand, rest) = split_subcommand(args, USAGE)?;
    match subcommand.as_str() {
        "list" => {
            list_records(context);
            Ok(())
        }
        "add" | "register" => handle_add(context, rest),
        "update" | "edit" => handle_update(context, rest),
        "remove" | "rm" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown registry action `{other}`; usage: {USAGE}"
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let record = if args.is_empty() {
        context.require_interactive("registry add <plate> <model> <year> [engine] [chassis] [km]")?;
        let taken = context
            .vehicles
            .list()
            .iter()
            .map(|record| record.plate.clone())
            .collect();
        let wizard = NewVehicleWizard::new(taken);
        match FormEngine::new(&wizard).run(&mut WizardInteraction::new()) {
            Ok(FormResult::Completed(data)) => data.into_record(),
            Ok(FormResult::Cancelled) => {
                io::print_info("Nothing registered.");
                return Ok(());
            }
            Err(never) => match never {},
        }
    } else {
        if args.len() < 3 {
            return Err(usage_error(
                "registry add <plate> <model> <year> [engine] [chassis] [km]",
            ));
        }
        let plate = normalize_plate(args[0]);
        if !is_valid_plate(&plate) {
            return Err(BookingError::InvalidPlate(plate).into());
        }
        let mut record = VehicleRecord::new(
            VehicleId::mint().as_str(),
            &plate,
            args[1],
            args[2],
            args.get(5).map(|raw| parse_km(raw)).transpose()?,
        );
        record.engine_number = args.get(3).map(|value| value.to_string());
        record.chassis_number = args.get(4).map(|value| value.to_string());
        record
    };

    let label = record.display_label();
    context.vehicles.add(record)?;
    io::print_success(format!("Registered {label}."));
    Ok(())
}

fn handle_update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const UPDATE_USAGE: &str = "registry update <plate> <field> <value>";
    let plate = arg(args, 0, UPDATE_USAGE)?;
    let field = arg(args, 1, UPDATE_USAGE)?;
    if args.len() < 3 {
        return Err(usage_error(UPDATE_USAGE));
    }
    let value = args[2..].join(" ");

    let mut patch = VehicleRecordPatch::default();
    match field.to_ascii_lowercase().as_str() {
        "model" => patch.model = Some(value),
        "year" => patch.year = Some(value),
        "engine" | "engine_number" => patch.engine_number = Some(Some(value)),
        "chassis" | "chassis_number" => patch.chassis_number = Some(Some(value)),
        "km" | "mileage" | "last_known_mileage" => {
            patch.last_known_mileage = Some(Some(parse_km(&value)?))
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown vehicle field `{other}` (expected {UPDATE_FIELDS})"
            )))
        }
    }

    let id = record_id(context, plate)?;
    context.vehicles.update(&id, &patch)?;
    io::print_success(format!("Updated {}.", normalize_plate(plate)));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let plate = arg(args, 0, "registry remove <plate>")?;
    let id = record_id(context, plate)?;
    let removed = context.vehicles.remove(&id)?;
    io::print_success(format!("Removed {} from your registry.", removed.plate));
    if context.draft().vehicle_by_plate(&removed.plate).is_some() {
        io::print_hint("It stays in the current booking until you remove it there.");
    }
    Ok(())
}

fn record_id(context: &ShellContext, plate: &str) -> Result<VehicleId, CommandError> {
    context
        .vehicles
        .find_by_plate(plate)
        .map(|record| record.id.clone())
        .ok_or_else(|| BookingError::VehicleNotFound(normalize_plate(plate)).into())
}

fn parse_km(raw: &str) -> Result<u32, CommandError> {
    raw.trim()
        .replace('.', "")
        .parse::<u32>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a whole number of km")))
}

fn list_records(context: &ShellContext) {
    output_section("Vehicle registry");
    let records = context.vehicles.list();
    if records.is_empty() {
        io::print_info("No vehicles registered.");
        return;
    }
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            vec![
                record.plate.clone(),
                record.model.clone(),
                record.year.clone(),
                record.engine_number.clone().unwrap_or_else(|| "-".into()),
                record.chassis_number.clone().unwrap_or_else(|| "-".into()),
                record
                    .last_known_mileage
                    .map(|km| format!("{km} km"))
                    .unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    render_table(&["Plate", "Model", "Year", "Engine", "Chassis", "Last km"], &rows);
}
