use crate::cli::commands::{arg, split_subcommand};
use crate::cli::core::{parse_index, CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::client_service::ClientField;
use crate::core::services::ClientService;
use crate::domain::{ClientInfo, DocumentType};

pub(crate) const SUBCOMMANDS: &[&str] = &["show", "set", "phone"];

const USAGE: &str = "client [show|set <field> <value>|phone <add <number>|remove <n>|set <n> <number>>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "client",
        "Show or edit the account holder details",
        USAGE,
        cmd_client,
    )]
}

fn cmd_client(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        show_client(context);
        return Ok(());
    }
    let (subcommand, rest) = split_subcommand(args, USAGE)?;
    match subcommand.as_str() {
        "show" => {
            show_client(context);
            Ok(())
        }
        "set" => handle_set(context, rest),
        "phone" | "phones" => handle_phone(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown client action `{other}`; usage: {USAGE}"
        ))),
    }
}

fn handle_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let field = ClientField::parse(arg(args, 0, "client set <field> <value>")?)?;
    let value = if args.len() > 1 {
        args[1..].join(" ")
    } else if context.mode() == CliMode::Interactive {
        let current = current_value(&context.draft().client, field);
        io::prompt_text(field.key(), Some(current.as_str()))?
    } else {
        return Err(CommandError::InvalidArguments(
            "usage: client set <field> <value>".into(),
        ));
    };

    let patch = ClientService::set_field(context.draft(), field, &value)?;
    context.apply(patch);
    io::print_success(format!("Updated {}.", field.key()));
    Ok(())
}

fn handle_phone(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const PHONE_USAGE: &str = "client phone <add <number>|remove <n>|set <n> <number>>";
    let (action, rest) = split_subcommand(args, PHONE_USAGE)?;
    let patch = match action.as_str() {
        "add" => {
            let number = rest.join(" ");
            if number.trim().is_empty() {
                return Err(CommandError::InvalidArguments(format!("usage: {PHONE_USAGE}")));
            }
            ClientService::add_phone(context.draft(), &number)?
        }
        "remove" | "rm" => {
            let index = parse_index(arg(rest, 0, PHONE_USAGE)?)?;
            ClientService::remove_phone(context.draft(), index)?
        }
        "set" | "edit" => {
            let index = parse_index(arg(rest, 0, PHONE_USAGE)?)?;
            let number = rest.get(1..).map(|parts| parts.join(" ")).unwrap_or_default();
            if number.trim().is_empty() {
                return Err(CommandError::InvalidArguments(format!("usage: {PHONE_USAGE}")));
            }
            ClientService::replace_phone(context.draft(), index, &number)?
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown phone action `{other}`; usage: {PHONE_USAGE}"
            )))
        }
    };
    context.apply(patch);
    print_phones(&context.draft().client);
    Ok(())
}

fn current_value(client: &ClientInfo, field: ClientField) -> String {
    match field {
        ClientField::DocumentType => client
            .document_type
            .map(|kind| kind.code().to_string())
            .unwrap_or_default(),
        ClientField::DocumentNumber => client.document_number.clone(),
        ClientField::FullName => client.full_name.clone(),
        ClientField::LegalName => client.legal_name.clone(),
        ClientField::Email => client.email.clone(),
        ClientField::Address => client.address.clone(),
    }
}

fn show_client(context: &ShellContext) {
    let client = &context.draft().client;
    output_section("Client details");
    let document_types = DocumentType::ALL
        .iter()
        .map(DocumentType::code)
        .collect::<Vec<_>>()
        .join("/");
    for field in ClientField::ALL {
        let value = current_value(client, field);
        let shown = if value.trim().is_empty() { "-" } else { value.as_str() };
        io::print_info(format!("  {:<16} {}", field.key(), shown));
    }
    print_phones(client);
    io::print_hint(format!("document_type accepts {document_types}."));
}

fn print_phones(client: &ClientInfo) {
    io::print_info("  phones:");
    for (idx, number) in client.phones.entries().iter().enumerate() {
        let lock = if idx == 0 && client.phones.is_primary_locked() {
            " (account)"
        } else {
            ""
        };
        io::print_info(format!("    {}. {}{}", idx + 1, number, lock));
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::core::{process_script_in, CommandError};
    use crate::domain::DocumentType;
    use crate::errors::BookingError;
    use tempfile::tempdir;

    #[test]
    fn set_joins_multi_word_values() {
        let temp = tempdir().unwrap();
        let context = process_script_in(
            temp.path(),
            &["client set document_type DNI", "client set full_name Ana María Gómez"],
        )
        .unwrap();
        let client = &context.wizard.draft().client;
        assert_eq!(client.document_type, Some(DocumentType::NationalId));
        assert_eq!(client.display_name(), "Ana María Gómez");
    }

    #[test]
    fn phone_list_edits_are_positional() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(
            temp.path(),
            &["client phone add 11-1111-1111", "client phone add 11-2222-2222"],
        )
        .unwrap();
        context.process_line("client phone remove 2").unwrap();
        context.process_line("client phone set 2 11-3333-3333").unwrap();

        let phones = context.wizard.draft().client.phones.entries().to_vec();
        assert_eq!(phones.len(), 2);
        assert_eq!(phones[1], "11-3333-3333");
    }

    #[test]
    fn account_phone_cannot_be_replaced() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(temp.path(), &[]).unwrap();
        let err = context.process_line("client phone set 1 000").unwrap_err();
        assert!(matches!(err, CommandError::Core(BookingError::PrimaryPhoneLocked)));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let temp = tempdir().unwrap();
        let mut context = process_script_in(temp.path(), &[]).unwrap();
        assert!(context.process_line("client set nickname Bob").is_err());
    }
}
