mod common;

use common::{script_cli, temp_home};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

const CARD_BOOKING: &str = "\
config set ui_color_enabled off
# client data comes from the account
next
vehicle add AB123CD
next
mileage AB123CD 20.000
next
dealership choose 1
schedule AB123CD 2025-04-15 10:00
next
pickup owner on
next
payment method credit
next
next
exit
";

#[test]
fn script_mode_confirms_a_card_booking() {
    let home = temp_home();
    script_cli(&home)
        .write_stdin(CARD_BOOKING)
        .assert()
        .success()
        .stdout(contains("Booking confirmed."))
        .stdout(contains("$40.000"));
}

#[test]
fn incomplete_step_blocks_next() {
    let home = temp_home();
    script_cli(&home)
        .write_stdin("config set ui_color_enabled off\nnext\nnext\nstatus\n")
        .assert()
        .success()
        .stdout(contains("Vehicle selection is not complete yet"))
        .stdout(contains("Select at least one vehicle"))
        .stdout(contains("Booking confirmed.").not());
}

#[test]
fn unknown_command_gets_a_suggestion() {
    let home = temp_home();
    script_cli(&home)
        .write_stdin("stauts\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `stauts`"))
        .stdout(contains("Suggestion: `status`?"));
}

#[test]
fn registry_changes_persist_between_runs() {
    let home = temp_home();
    script_cli(&home)
        .write_stdin("registry add GH111IJ \"Peugeot Partner\" 2020 E-9 C-9 5000\n")
        .assert()
        .success()
        .stdout(contains("Registered GH111IJ - Peugeot Partner (2020)."));

    script_cli(&home)
        .write_stdin("registry list\n")
        .assert()
        .success()
        .stdout(contains("Peugeot Partner"));
}

#[test]
fn interactive_forms_are_refused_in_scripts() {
    let home = temp_home();
    script_cli(&home)
        .write_stdin("payment account\n")
        .assert()
        .success()
        .stdout(contains("payment set <field> <value>"));
}
