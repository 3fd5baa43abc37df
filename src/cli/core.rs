//! Core CLI loop, dispatch, and shell context helpers.

use std::{env, io, path::PathBuf};

use chrono::NaiveDate;
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{utils::PathResolver, Clock, FixedClock, SystemClock},
    currency::{format_amount, format_date, CurrencyCode, LocaleConfig},
    dealership::DealershipDirectory,
    domain::{BookingDraft, DraftPatch},
    errors::BookingError,
    pricing::{Price, PricingTable},
    storage::{JsonFileStore, LocalVehicleRegistry},
    wizard::{StepValidators, WizardStateMachine},
};

pub use crate::errors::CliError;

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

/// Pins "today" for date rules, e.g. `BOOKING_CORE_TODAY=2025-04-14`.
const TODAY_ENV: &str = "BOOKING_CORE_TODAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub wizard: WizardStateMachine,
    pub validators: StepValidators,
    pub vehicles: LocalVehicleRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub fixed_today: Option<NaiveDate>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir(), today_from_env()?)
    }

    /// Context rooted at `base`, optionally pinned to `fixed_today`.
    pub fn with_base_dir(
        mode: CliMode,
        base: PathBuf,
        fixed_today: Option<NaiveDate>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        cli_io::apply_config(&config);

        let store = JsonFileStore::new(Some(base))?;
        let vehicles = LocalVehicleRegistry::open(Box::new(store));
        let wizard = WizardStateMachine::with_pricing(
            &config.profile(),
            PricingTable::standard(),
            config.pricing_policy(),
        );
        let validators = build_validators(&config, fixed_today);

        tracing::debug!(?mode, "shell context ready");
        Ok(ShellContext {
            mode,
            registry,
            wizard,
            validators,
            vehicles,
            config_manager,
            config,
            fixed_today,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn draft(&self) -> &BookingDraft {
        self.wizard.draft()
    }

    pub(crate) fn apply(&mut self, patch: DraftPatch) {
        self.wizard.merge_draft(patch);
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.validators.clock().today()
    }

    pub(crate) fn directory(&self) -> &DealershipDirectory {
        self.validators.directory()
    }

    pub(crate) fn locale(&self) -> LocaleConfig {
        self.config.locale_config()
    }

    pub(crate) fn currency(&self) -> CurrencyCode {
        self.config.currency_code()
    }

    pub(crate) fn render_price(&self, price: Price) -> String {
        price.render(&self.currency(), &self.locale())
    }

    pub(crate) fn render_amount(&self, amount: u64) -> String {
        format_amount(amount, &self.currency(), &self.locale())
    }

    pub(crate) fn render_date(&self, date: NaiveDate) -> String {
        format_date(&self.locale(), date)
    }

    /// Saves the config and pushes dependent settings into the session.
    pub(crate) fn persist_config(&mut self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        cli_io::apply_config(&self.config);
        self.wizard.set_policy(self.config.pricing_policy());
        self.validators = build_validators(&self.config, self.fixed_today);
        Ok(())
    }

    pub(crate) fn prompt(&self) -> String {
        let step = self.wizard.current_step();
        if self.wizard.is_completed() {
            "booking [done] ⮞ ".to_string()
        } else {
            format!(
                "booking [{}/{} {}] ⮞ ",
                step.index() + 1,
                crate::wizard::WizardStep::COUNT,
                step.title()
            )
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        if let Some(best) = closest_name(self.registry.names(), input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Exit shell?")?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(BookingError::InvalidPlate(plate)) => {
                self.print_error(&format!("Invalid license plate `{plate}`."));
                self.print_hint("Plates look like AB123CD or ABC123.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    /// Fails with a usage hint unless the shell can prompt interactively.
    pub(crate) fn require_interactive(&self, usage: &str) -> CommandResult {
        if self.mode == CliMode::Interactive {
            Ok(())
        } else {
            Err(CommandError::InvalidArguments(format!("usage: {usage}")))
        }
    }
}

fn build_validators(config: &Config, fixed_today: Option<NaiveDate>) -> StepValidators {
    let clock: Box<dyn Clock> = match fixed_today {
        Some(today) => Box::new(FixedClock::new(today)),
        None => Box::new(SystemClock),
    };
    let directory =
        DealershipDirectory::reference().with_near_count(config.near_dealership_count);
    StepValidators::new(clock, directory)
}

fn today_from_env() -> Result<Option<NaiveDate>, CliError> {
    match env::var(TODAY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => parse_date(raw.trim())
            .map(Some)
            .map_err(|err| CliError::Input(format!("{TODAY_ENV}: {err}"))),
        _ => Ok(None),
    }
}

fn closest_name<'a>(names: impl Iterator<Item = &'a str>, input: &str) -> Option<&'a str> {
    let needle = input.to_lowercase();
    names
        .map(|name| (levenshtein(name, &needle), name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, name)| name)
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_index(input: &str) -> Result<usize, CommandError> {
    match input.parse::<usize>() {
        Ok(index) if index > 0 => Ok(index - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{input}` is not a valid position (positions start at 1)"
        ))),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] BookingError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script_in(
    base: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let today = NaiveDate::from_ymd_opt(2025, 4, 14);
    let mut app = ShellContext::with_base_dir(CliMode::Script, base.to_path_buf(), today)?;
    for line in lines {
        match app.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::VehicleRegistry;
    use crate::wizard::WizardStep;
    use tempfile::tempdir;

    #[test]
    fn parse_line_handles_quotes() {
        let tokens =
            crate::cli::shell::parse_command_line("client set full_name \"Ana Gómez\"").unwrap();
        assert_eq!(tokens, vec!["client", "set", "full_name", "Ana Gómez"]);
    }

    #[test]
    fn unknown_command_is_not_fatal() {
        let temp = tempdir().unwrap();
        let context = process_script_in(temp.path(), &["stauts", "exit"]).unwrap();
        assert!(context.wizard.draft().vehicles.is_empty());
    }

    #[test]
    fn suggestion_picks_nearest_command() {
        let names = ["status", "next", "vehicle"];
        assert_eq!(closest_name(names.into_iter(), "stauts"), Some("status"));
        assert_eq!(closest_name(names.into_iter(), "VEHICEL"), Some("vehicle"));
        assert_eq!(closest_name(names.into_iter(), "dealership"), None);
    }

    #[test]
    fn blocked_step_reports_instead_of_advancing() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(temp.path(), &["next"]).unwrap();
        assert_eq!(context.wizard.current_step(), WizardStep::VehicleSelection);

        context.process_line("next").unwrap();
        assert_eq!(context.wizard.current_step(), WizardStep::VehicleSelection);
    }

    #[test]
    fn command_errors_leave_session_running() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(temp.path(), &["next"]).unwrap();
        let err = context.process_line("vehicle add ZZ999ZZ").unwrap_err();
        assert!(matches!(err, CommandError::Core(BookingError::VehicleNotFound(_))));
        context.report_error(err).unwrap();
        assert!(context.running);
    }

    #[test]
    fn fresh_home_is_seeded_with_sample_fleet() {
        let temp = tempdir().unwrap();
        let context = process_script_in(temp.path(), &[]).unwrap();
        assert!(!context.vehicles.list().is_empty());
        assert!(temp.path().join("store").join("vehicles.json").exists());
    }

    #[test]
    fn config_changes_apply_to_running_session() {
        let temp = tempdir().unwrap();
        let context =
            process_script_in(temp.path(), &["config set near_dealership_count 1"]).unwrap();
        assert_eq!(context.directory().near_count(), 1);

        let reloaded = ConfigManager::with_base_dir(temp.path().to_path_buf())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(reloaded.near_dealership_count, 1);
    }

    #[test]
    fn prompt_shows_step_position() {
        let temp = tempdir().unwrap();
        let context = process_script_in(temp.path(), &[]).unwrap();
        assert!(context.prompt().contains("[1/7"));
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(parse_index("1").unwrap(), 0);
        assert!(parse_index("0").is_err());
        assert!(parse_index("x").is_err());
    }
}
