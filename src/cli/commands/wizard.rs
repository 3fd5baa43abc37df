//! Step navigation, progress and the booking summary.

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::domain::{PaymentMethod, VehicleBookingEntry};
use crate::storage::VehicleRegistry;
use crate::wizard::{FieldIssue, WizardStep};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "status",
            "Show the current step and what blocks it",
            "status",
            cmd_status,
        ),
        CommandEntry::new(
            "next",
            "Advance to the next step (confirms on the last one)",
            "next",
            cmd_next,
        ),
        CommandEntry::new("back", "Return to the previous step", "back", cmd_back),
        CommandEntry::new(
            "reset",
            "Discard the draft and start over",
            "reset",
            cmd_reset,
        ),
        CommandEntry::new(
            "summary",
            "Show everything entered so far",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "issues",
            "List missing fields for a step",
            "issues [step number|all]",
            cmd_issues,
        ),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let progress = context.wizard.progress(&context.validators);
    if progress.completed {
        io::print_success("Booking confirmed.");
        io::print_hint("Use `summary` to review it or `reset` to start another.");
        return Ok(());
    }
    output_section(format!(
        "Step {}/{}: {}",
        progress.current_index + 1,
        progress.total_steps,
        progress.step
    ));
    io::print_info(format!(
        "Total so far: {}",
        context.render_price(context.wizard.total())
    ));
    if progress.can_advance {
        io::print_success("Ready to continue. Type `next`.");
    } else {
        print_issues(&context.validators.missing_fields(progress.step, context.draft()));
    }
    print_step_hint(progress.step);
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.wizard.is_completed() {
        io::print_info("This booking is already confirmed. Use `reset` to start a new one.");
        return Ok(());
    }

    let step = context.wizard.current_step();
    let issues = if step == WizardStep::Confirmation {
        all_issues(context)
    } else {
        context.validators.missing_fields(step, context.draft())
    };
    if !issues.is_empty() {
        io::print_warning(format!("{step} is not complete yet:"));
        print_issues(&issues);
        return Ok(());
    }

    context.wizard.advance();
    if context.wizard.is_completed() {
        finalize_booking(context);
    } else {
        let next = context.wizard.current_step();
        output_section(format!(
            "Step {}/{}: {}",
            next.index() + 1,
            WizardStep::COUNT,
            next
        ));
        print_step_hint(next);
        if next == WizardStep::Confirmation {
            print_summary(context);
        }
    }
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.wizard.is_completed() {
        return Err(CommandError::Message(
            "The booking is confirmed; use `reset` to start a new one.".into(),
        ));
    }
    if context.wizard.cursor() == 0 {
        io::print_warning("Already at the first step.");
        return Ok(());
    }
    context.wizard.retreat();
    let step = context.wizard.current_step();
    output_section(format!(
        "Step {}/{}: {}",
        step.index() + 1,
        WizardStep::COUNT,
        step
    ));
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.mode() == CliMode::Interactive
        && !context.wizard.is_completed()
        && !io::confirm_action("Discard the current booking draft?")?
    {
        io::print_info("Operation cancelled.");
        return Ok(());
    }
    context.wizard.reset();
    io::print_success("Started a new booking.");
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_summary(context);
    Ok(())
}

fn cmd_issues(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let issues = match args.first() {
        None => context
            .validators
            .missing_fields(context.wizard.current_step(), context.draft()),
        Some(arg) if arg.eq_ignore_ascii_case("all") => all_issues(context),
        Some(arg) => {
            let step = arg
                .parse::<usize>()
                .ok()
                .and_then(|number| number.checked_sub(1))
                .and_then(WizardStep::from_index)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "`{arg}` is not a step number (1-{})",
                        WizardStep::COUNT
                    ))
                })?;
            context.validators.missing_fields(step, context.draft())
        }
    };
    if issues.is_empty() {
        io::print_success("Nothing missing.");
    } else {
        print_issues(&issues);
    }
    Ok(())
}

fn all_issues(context: &ShellContext) -> Vec<FieldIssue> {
    WizardStep::ALL
        .iter()
        .flat_map(|step| context.validators.missing_fields(*step, context.draft()))
        .collect()
}

fn print_issues(issues: &[FieldIssue]) {
    for issue in issues {
        io::print_warning(format!("  [{}] {}", issue.step, issue));
    }
}

fn print_step_hint(step: WizardStep) {
    let hint = match step {
        WizardStep::Client => "Edit with `client set <field> <value>` and `client phone ...`.",
        WizardStep::VehicleSelection => {
            "Pick vehicles with `vehicle add <plate>` or register one with `vehicle new`."
        }
        WizardStep::ServiceSelection => "Set readings with `mileage <plate> <km>`; see `prices`.",
        WizardStep::DealershipSelection => {
            "Use `dealership choose <id>`, then `schedule <plate|all> <date> <HH:MM>`."
        }
        WizardStep::PickupData => {
            "Use `pickup owner on` or `pickup assign <plate> <first> <last> <dni>`."
        }
        WizardStep::Payment => "Use `payment method <name>` and `payment set <field> <value>`.",
        WizardStep::Confirmation => "Review the summary and type `next` to confirm.",
    };
    io::print_hint(hint);
}

/// Registers vehicles added during the booking and prints the receipt.
fn finalize_booking(context: &mut ShellContext) {
    let new_records: Vec<_> = context
        .draft()
        .vehicles
        .iter()
        .filter(|vehicle| vehicle.is_new())
        .map(VehicleBookingEntry::to_record)
        .collect();
    for record in new_records {
        let plate = record.plate.clone();
        match context.vehicles.add(record) {
            Ok(()) => io::print_info(format!("Vehicle {plate} added to your registry.")),
            Err(err) => tracing::warn!(%plate, error = %err, "could not register booked vehicle"),
        }
    }

    tracing::info!(
        vehicles = context.draft().vehicles.len(),
        total = ?context.wizard.total().amount(),
        "booking confirmed"
    );
    io::print_success("Booking confirmed.");
    print_summary(context);
    io::print_hint("Type `reset` to book again or `exit` to leave.");
}

pub(crate) fn print_summary(context: &ShellContext) {
    let draft = context.draft();

    output_section("Client");
    let client = &draft.client;
    if let Some(kind) = client.document_type {
        io::print_info(format!("  {}: {}", kind, client.document_number));
    }
    io::print_info(format!("  Name   : {}", client.display_name()));
    io::print_info(format!("  Email  : {}", client.email));
    io::print_info(format!("  Phones : {}", client.phones.entries().join(", ")));
    io::print_info(format!("  Address: {}", client.address));

    output_section("Vehicles");
    if draft.vehicles.is_empty() {
        io::print_info("  No vehicles selected.");
    } else {
        let rows: Vec<Vec<String>> = draft
            .vehicles
            .iter()
            .map(|vehicle| vehicle_row(context, vehicle))
            .collect();
        render_table(
            &["Plate", "Model", "Mileage", "Service", "Date", "Slot", "Pickup"],
            &rows,
        );
    }
    io::print_info(format!(
        "  Total: {}",
        context.render_price(context.wizard.total())
    ));

    output_section("Dealership");
    match draft
        .dealership_id
        .as_deref()
        .and_then(|id| context.directory().find(id))
    {
        Some(dealership) => io::print_info(format!(
            "  {} ({})",
            dealership.name, dealership.address
        )),
        None => io::print_info("  Not chosen."),
    }
    io::print_info(format!("  Your location: {}", draft.effective_location()));

    output_section("Payment");
    match draft.payment_method {
        None => io::print_info("  Not chosen."),
        Some(method) => io::print_info(format!("  {method}")),
    }
    if let (Some(PaymentMethod::CorporateAccount), Some(account)) =
        (draft.payment_method, draft.corporate_account.as_ref())
    {
        io::print_info(format!("  Holder : {}", account.holder));
        io::print_info(format!("  Bank   : {}", account.bank));
        io::print_info(format!("  Amount : {}", context.render_amount(account.total)));
        if let Some(due) = account.due_date {
            io::print_info(format!("  Due    : {}", context.render_date(due)));
        }
    }
}

fn vehicle_row(context: &ShellContext, vehicle: &VehicleBookingEntry) -> Vec<String> {
    let draft = context.draft();
    let service = context
        .wizard
        .pricing()
        .price_for_vehicle(vehicle)
        .map(|price| context.render_price(price))
        .unwrap_or_else(|| "-".into());
    let pickup = if draft.owner_picks_up {
        "Owner".to_string()
    } else {
        vehicle
            .pickup_person
            .as_ref()
            .map(|person| person.full_name())
            .unwrap_or_else(|| "-".into())
    };
    vec![
        vehicle.plate.clone(),
        vehicle.model.clone(),
        vehicle
            .current_mileage
            .map(|km| format!("{km} km"))
            .unwrap_or_else(|| "-".into()),
        service,
        vehicle
            .scheduled_date
            .map(|date| context.render_date(date))
            .unwrap_or_else(|| "-".into()),
        vehicle
            .time_slot
            .map(|slot| slot.format("%H:%M").to_string())
            .unwrap_or_else(|| "-".into()),
        pickup,
    ]
}
