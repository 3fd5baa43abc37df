//! Shell commands, one module per wizard concern.

use std::collections::BTreeMap;

pub mod client;
pub mod config;
pub mod dealership;
pub mod fleet;
pub mod payment;
pub mod pickup;
pub mod system;
pub mod vehicle;
pub mod wizard;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(wizard::definitions());
    commands.extend(client::definitions());
    commands.extend(vehicle::definitions());
    commands.extend(fleet::definitions());
    commands.extend(dealership::definitions());
    commands.extend(pickup::definitions());
    commands.extend(payment::definitions());
    commands.extend(config::definitions());
    commands
}

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

/// Second-word completions for commands that take a subcommand.
pub(crate) fn subcommands() -> BTreeMap<&'static str, &'static [&'static str]> {
    BTreeMap::from([
        ("client", client::SUBCOMMANDS),
        ("vehicle", vehicle::SUBCOMMANDS),
        ("registry", fleet::SUBCOMMANDS),
        ("dealership", dealership::SUBCOMMANDS),
        ("pickup", pickup::SUBCOMMANDS),
        ("payment", payment::SUBCOMMANDS),
        ("config", config::SUBCOMMANDS),
    ])
}

/// Splits `args` into a lower-cased subcommand and the rest.
pub(crate) fn split_subcommand<'a>(
    args: &'a [&'a str],
    usage: &str,
) -> Result<(String, &'a [&'a str]), CommandError> {
    match args.split_first() {
        Some((first, rest)) => Ok((first.to_ascii_lowercase(), rest)),
        None => Err(usage_error(usage)),
    }
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {usage}"))
}

/// Required positional argument.
pub(crate) fn arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CommandError> {
    args.get(index).copied().ok_or_else(|| usage_error(usage))
}
