//! Dealership choice, calendar and per-vehicle scheduling.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::cli::commands::{arg, split_subcommand, usage_error};
use crate::cli::core::{parse_date, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::core::services::VehicleService;
use crate::dealership::{DayAvailability, Dealership};
use crate::domain::{normalize_plate, Displayable, DraftPatch};
use crate::errors::BookingError;

pub(crate) const SUBCOMMANDS: &[&str] = &["list", "choose", "location", "slots"];

const USAGE: &str = "dealership [list|choose <id>|location <address>|location clear|slots]";
const SCHEDULE_USAGE: &str = "schedule <plate|all> <YYYY-MM-DD> <HH:MM>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "dealership",
            "List dealerships, pick one or change the search location",
            USAGE,
            cmd_dealership,
        ),
        CommandEntry::new(
            "calendar",
            "Show bookable days for a month",
            "calendar [YYYY-MM]",
            cmd_calendar,
        ),
        CommandEntry::new(
            "schedule",
            "Book a date and time slot for one vehicle or all of them",
            SCHEDULE_USAGE,
            cmd_schedule,
        ),
    ]
}

fn cmd_dealership(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        list_dealerships(context);
        return Ok(());
    }
    let (subcommand, rest) = split_subcommand(args, USAGE)?;
    match subcommand.as_str() {
        "list" => {
            list_dealerships(context);
            Ok(())
        }
        "choose" | "select" => {
            let id = arg(rest, 0, "dealership choose <id>")?;
            let label = context.directory().require(id)?.display_label();
            context.apply(DraftPatch::dealership(Some(id.trim().to_string())));
            io::print_success(format!("Dealership set to {label}."));
            Ok(())
        }
        "location" => {
            let location = rest.join(" ");
            let patch = match location.trim() {
                "" => return Err(usage_error("dealership location <address>|clear")),
                "clear" => DraftPatch::selected_location(None),
                value => DraftPatch::selected_location(Some(value.to_string())),
            };
            context.apply(patch);
            io::print_success(format!(
                "Searching near {}.",
                context.draft().effective_location()
            ));
            Ok(())
        }
        "slots" => show_slots(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown dealership action `{other}`; usage: {USAGE}"
        ))),
    }
}

fn list_dealerships(context: &ShellContext) {
    let draft = context.draft();
    let location = draft.effective_location();
    let chosen = draft.dealership_id.as_deref();
    let rows = |dealerships: &[Dealership]| -> Vec<Vec<String>> {
        dealerships
            .iter()
            .map(|dealership| {
                vec![
                    dealership.id.clone(),
                    dealership.name.clone(),
                    dealership.address.clone(),
                    dealership.capacity.to_string(),
                    if Some(dealership.id.as_str()) == chosen { "*" } else { "" }.to_string(),
                ]
            })
            .collect()
    };
    let headers = ["Id", "Name", "Address", "Daily capacity", ""];

    output_section(format!("Near {location}"));
    render_table(&headers, &rows(context.directory().list_near(location)));
    let others = context.directory().list_others(location);
    if !others.is_empty() {
        output_section("Other dealerships");
        render_table(&headers, &rows(others));
    }
}

fn show_slots(context: &ShellContext) -> CommandResult {
    let id = context.draft().dealership_id.as_deref().ok_or_else(|| {
        CommandError::InvalidArguments("choose a dealership first: `dealership choose <id>`".into())
    })?;
    let slots = context.directory().time_slots_for(id)?;
    let rendered: Vec<String> = slots
        .iter()
        .map(|slot| slot.format("%H:%M").to_string())
        .collect();
    io::print_info(format!("Time slots: {}", rendered.join("  ")));
    Ok(())
}

fn cmd_calendar(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let today = context.today();
    let first = match args.first() {
        Some(raw) => NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
            .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a YYYY-MM month")))?,
        None => today.with_day(1).unwrap_or(today),
    };
    output_section(first.format("%B %Y").to_string());
    for line in calendar_lines(first, |date| context.directory().day_availability(date, today)) {
        io::print_info(line);
    }
    io::print_hint("[dd] available, (dd) blocked, plain days cannot be booked.");
    Ok(())
}

/// Month grid starting on Monday.
fn calendar_lines(first: NaiveDate, availability: impl Fn(NaiveDate) -> DayAvailability) -> Vec<String> {
    let mut lines = vec![" Mo   Tu   We   Th   Fr   Sa   Su".to_string()];
    let offset = first.weekday().num_days_from_monday() as usize;
    let mut cells: Vec<String> = vec!["    ".to_string(); offset];
    let mut day = first;
    while day.month() == first.month() {
        let cell = match availability(day) {
            DayAvailability::Available => format!("[{:>2}]", day.day()),
            DayAvailability::Unavailable => format!("({:>2})", day.day()),
            DayAvailability::Disabled => format!(" {:>2} ", day.day()),
        };
        cells.push(cell);
        day += Duration::days(1);
    }
    for week in cells.chunks(7) {
        lines.push(week.join(" ").trim_end().to_string());
    }
    lines
}

fn cmd_schedule(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 3 {
        return Err(usage_error(SCHEDULE_USAGE));
    }
    let target = args[0];
    let date = parse_date(args[1])?;
    let slot = resolve_slot(context, args[2])?;

    let plates: Vec<String> = if target.eq_ignore_ascii_case("all") {
        context
            .draft()
            .vehicles
            .iter()
            .map(|vehicle| vehicle.plate.clone())
            .collect()
    } else {
        vec![normalize_plate(target)]
    };
    if plates.is_empty() {
        return Err(CommandError::InvalidArguments("the booking has no vehicles yet".into()));
    }

    let today = context.today();
    for plate in &plates {
        let patch =
            VehicleService::schedule(context.draft(), context.directory(), today, plate, date, slot)?;
        context.apply(patch);
    }
    io::print_success(format!(
        "Scheduled {} for {} at {}.",
        plates.join(", "),
        context.render_date(date),
        slot.format("%H:%M")
    ));
    Ok(())
}

fn resolve_slot(context: &ShellContext, raw: &str) -> Result<NaiveTime, CommandError> {
    let id = context.draft().dealership_id.as_deref().ok_or_else(|| {
        BookingError::InvalidInput("choose a dealership first".into())
    })?;
    Ok(context.directory().parse_slot(id, raw)?)
}
