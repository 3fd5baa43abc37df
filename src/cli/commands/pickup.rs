//! Who collects each vehicle after the service.

use crate::cli::commands::{arg, split_subcommand, usage_error};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::forms::{FormEngine, FormResult, PickupWizard, WizardInteraction};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::PickupService;
use crate::domain::{normalize_plate, PickupPerson};

pub(crate) const SUBCOMMANDS: &[&str] = &["show", "owner", "assign", "all", "clear"];

const USAGE: &str =
    "pickup [show|owner <on|off>|assign <plate> [<first> <last> <dni>]|all [<first> <last> <dni>]|clear <plate>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "pickup",
        "Set who picks up the vehicles",
        USAGE,
        cmd_pickup,
    )]
}

fn cmd_pickup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        show_pickups(context);
        return Ok(());
    }
    let (subcommand, rest) = split_subcommand(args, USAGE)?;
    match subcommand.as_str() {
        "show" => {
            show_pickups(context);
            Ok(())
        }
        "owner" => handle_owner(context, rest),
        "assign" => handle_assign(context, rest),
        "all" => handle_all(context, rest),
        "clear" => {
            let plate = arg(rest, 0, "pickup clear <plate>")?;
            let patch = PickupService::clear(context.draft(), plate)?;
            context.apply(patch);
            io::print_success(format!("Cleared pickup person for {}.", normalize_plate(plate)));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown pickup action `{other}`; usage: {USAGE}"
        ))),
    }
}

fn handle_owner(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let flag = match arg(args, 0, "pickup owner <on|off>")?.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" => true,
        "off" | "no" | "false" => false,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "expected on/off, got `{other}`"
            )))
        }
    };
    context.apply(PickupService::set_owner_picks_up(flag));
    if flag {
        io::print_success("The account holder will pick up every vehicle.");
    } else {
        io::print_success("Assign a pickup person per vehicle with `pickup assign`.");
    }
    Ok(())
}

fn handle_assign(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const ASSIGN_USAGE: &str = "pickup assign <plate> <first> <last> <dni>";
    let plate = arg(args, 0, ASSIGN_USAGE)?;
    let current = context
        .draft()
        .vehicle_by_plate(plate)
        .and_then(|(_, vehicle)| vehicle.pickup_person.clone());
    let Some(person) = person_from_args(context, &args[1..], current.as_ref(), ASSIGN_USAGE)? else {
        io::print_info("Pickup person unchanged.");
        return Ok(());
    };
    let name = person.full_name();
    let patch = PickupService::assign(context.draft(), plate, person)?;
    context.apply(patch);
    io::print_success(format!("{name} will pick up {}.", normalize_plate(plate)));
    Ok(())
}

fn handle_all(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const ALL_USAGE: &str = "pickup all <first> <last> <dni>";
    if context.draft().vehicles.is_empty() {
        return Err(CommandError::InvalidArguments("the booking has no vehicles yet".into()));
    }
    let Some(person) = person_from_args(context, args, None, ALL_USAGE)? else {
        io::print_info("Pickup person unchanged.");
        return Ok(());
    };
    let patch = PickupService::apply_to_all(context.draft(), &person);
    context.apply(patch);
    io::print_success(format!("{} will pick up every vehicle.", person.full_name()));
    Ok(())
}

/// Reads the person from `<first> <last> <dni>` or, with no arguments, the form.
fn person_from_args(
    context: &ShellContext,
    args: &[&str],
    current: Option<&PickupPerson>,
    usage: &str,
) -> Result<Option<PickupPerson>, CommandError> {
    match args {
        [] => {
            context.require_interactive(usage)?;
            let wizard = PickupWizard::new(current);
            match FormEngine::new(&wizard).run(&mut WizardInteraction::new()) {
                Ok(FormResult::Completed(person)) => Ok(Some(person)),
                Ok(FormResult::Cancelled) => Ok(None),
                Err(never) => match never {},
            }
        }
        [first, last, dni] => Ok(Some(PickupPerson::new(*first, *last, *dni))),
        _ => Err(usage_error(usage)),
    }
}

fn show_pickups(context: &ShellContext) {
    let draft = context.draft();
    output_section("Pickup");
    if draft.owner_picks_up {
        io::print_info(format!(
            "{} picks up every vehicle.",
            draft.client.display_name()
        ));
        return;
    }
    let rows: Vec<Vec<String>> = draft
        .vehicles
        .iter()
        .map(|vehicle| match &vehicle.pickup_person {
            Some(person) => vec![
                vehicle.plate.clone(),
                person.full_name(),
                person.national_id.clone(),
            ],
            None => vec![vehicle.plate.clone(), "-".into(), "-".into()],
        })
        .collect();
    render_table(&["Plate", "Pickup person", "DNI"], &rows);
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script_in;
    use crate::wizard::WizardStep;
    use tempfile::tempdir;

    #[test]
    fn assign_per_vehicle_then_override_for_all() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(
            temp.path(),
            &[
                "vehicle add AB123CD XY987ZW",
                "pickup assign AB123CD Ana Gómez 30111222",
            ],
        )
        .unwrap();
        assert!(!context
            .validators
            .can_advance(WizardStep::PickupData, context.wizard.draft()));

        context.process_line("pickup all Luis Paz 28999000").unwrap();
        let draft = context.wizard.draft();
        assert!(draft
            .vehicles
            .iter()
            .all(|vehicle| vehicle.pickup_person.as_ref().unwrap().national_id == "28999000"));
        assert!(context.validators.can_advance(WizardStep::PickupData, draft));
    }

    #[test]
    fn owner_flag_satisfies_pickup_step() {
        let temp = tempdir().unwrap();
        let context =
            process_script_in(temp.path(), &["vehicle add AB123CD", "pickup owner on"]).unwrap();
        assert!(context.wizard.draft().owner_picks_up);
        assert!(context
            .validators
            .can_advance(WizardStep::PickupData, context.wizard.draft()));
    }

    #[test]
    fn partial_person_is_a_usage_error() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(temp.path(), &["vehicle add AB123CD"]).unwrap();
        assert!(context.process_line("pickup assign AB123CD Ana").is_err());
        assert!(context.process_line("pickup assign ZZ999ZZ Ana Gómez 1").is_err());
        assert!(context.process_line("pickup owner maybe").is_err());
    }
}
