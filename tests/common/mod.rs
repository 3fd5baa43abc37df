#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use assert_cmd::Command;
use booking_core::{
    core::FixedClock,
    dealership::DealershipDirectory,
    domain::ClientProfile,
    wizard::{StepValidators, WizardStateMachine},
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Monday 14 April 2025; the reference calendar blocks the 20th, 21st and 25th.
pub fn reference_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 14).expect("valid date")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Fresh wizard for the demo account plus validators pinned to [`reference_today`].
pub fn setup_wizard() -> (WizardStateMachine, StepValidators) {
    let wizard = WizardStateMachine::new(&ClientProfile::sample());
    let validators = StepValidators::new(
        Box::new(FixedClock::new(reference_today())),
        DealershipDirectory::reference(),
    );
    (wizard, validators)
}

/// Unique data directory kept alive until the test binary exits.
pub fn temp_home() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Script-mode CLI rooted at `home` with the clock pinned.
pub fn script_cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("booking_core_cli").expect("binary built");
    cmd.env("BOOKING_CORE_CLI_SCRIPT", "1")
        .env("BOOKING_CORE_HOME", home)
        .env("BOOKING_CORE_TODAY", "2025-04-14")
        .env("NO_COLOR", "1");
    cmd
}
