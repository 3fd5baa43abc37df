use crate::cli::commands::{split_subcommand, usage_error};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;

pub(crate) const SUBCOMMANDS: &[&str] = &["show", "set"];

const USAGE: &str = "config [show|set <key> <value>]";
const SET_USAGE: &str =
    "config set <locale|currency|strict_pricing|near_dealership_count|ui_color_enabled> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        show_config(context);
        return Ok(());
    }
    let (subcommand, rest) = split_subcommand(args, USAGE)?;
    match subcommand.as_str() {
        "show" => {
            show_config(context);
            Ok(())
        }
        "set" => {
            if rest.len() < 2 {
                return Err(usage_error(SET_USAGE));
            }
            let key = rest[0];
            let value = rest[1..].join(" ");
            let mut updated = context.config.clone();
            updated.set(key, &value)?;
            context.config = updated;
            context.persist_config()?;
            io::print_success(format!("{key} set to {}.", value.trim()));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`; usage: {USAGE}"
        ))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output_section("Preferences");
    let rows = vec![
        vec!["locale".to_string(), config.locale.clone()],
        vec!["currency".to_string(), config.currency.clone()],
        vec!["strict_pricing".to_string(), config.strict_pricing.to_string()],
        vec![
            "near_dealership_count".to_string(),
            config.near_dealership_count.to_string(),
        ],
        vec!["ui_color_enabled".to_string(), config.ui_color_enabled.to_string()],
    ];
    render_table(&["Key", "Value"], &rows);
    io::print_hint(format!("Stored in {}", context.config_manager.path().display()));
}
