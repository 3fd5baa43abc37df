//! Payment method and corporate account details.

use crate::cli::commands::{arg, split_subcommand, usage_error};
use crate::cli::core::{parse_date, CommandError, CommandResult, ShellContext};
use crate::cli::forms::{CorporateAccountWizard, FormEngine, FormResult, WizardInteraction};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::payment_service::CorporateField;
use crate::core::services::PaymentService;
use crate::domain::{CorporateAccountPayment, DraftPatch, PaymentMethod, BANKS};

pub(crate) const SUBCOMMANDS: &[&str] =
    &["show", "method", "set", "account", "banks", "penalty"];

const USAGE: &str =
    "payment [show|method <corporate|credit|debit|wallet>|set <field> <value>|account|banks|penalty <YYYY-MM-DD>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "payment",
        "Choose how to pay and fill in the corporate account",
        USAGE,
        cmd_payment,
    )]
}

fn cmd_payment(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        show_payment(context);
        return Ok(());
    }
    let (subcommand, rest) = split_subcommand(args, USAGE)?;
    match subcommand.as_str() {
        "show" => {
            show_payment(context);
            Ok(())
        }
        "method" => handle_method(context, rest),
        "set" => handle_set(context, rest),
        "account" => handle_account_form(context),
        "banks" => {
            for (idx, bank) in BANKS.iter().enumerate() {
                io::print_info(format!("  {:>2}. {}", idx + 1, bank));
            }
            Ok(())
        }
        "penalty" => handle_penalty(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown payment action `{other}`; usage: {USAGE}"
        ))),
    }
}

fn handle_method(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.join(" ");
    let method = PaymentMethod::parse(&raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown payment method `{raw}` (corporate, credit, debit, wallet)"
        ))
    })?;
    let patch = PaymentService::select_method(context.draft(), method);
    context.apply(patch);
    io::print_success(format!("Paying by {method}."));
    if method == PaymentMethod::CorporateAccount {
        io::print_hint("Fill the account with `payment set <field> <value>` or `payment account`.");
    }
    Ok(())
}

fn handle_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const SET_USAGE: &str =
        "payment set <bank|account|cbu|due|reference|proof> <value>";
    let field = CorporateField::parse(arg(args, 0, SET_USAGE)?)?;
    if args.len() < 2 {
        return Err(usage_error(SET_USAGE));
    }
    let value = args[1..].join(" ");
    let patch = PaymentService::set_corporate_field(context.draft(), field, &value)?;
    context.apply(patch);
    io::print_success("Corporate account updated.");
    Ok(())
}

fn handle_account_form(context: &mut ShellContext) -> CommandResult {
    context.require_interactive("payment set <field> <value>")?;
    let base = context
        .draft()
        .corporate_account
        .clone()
        .unwrap_or_else(|| CorporateAccountPayment::for_client(&context.draft().client));
    let wizard = CorporateAccountWizard::new(base);
    let payment = match FormEngine::new(&wizard).run(&mut WizardInteraction::new()) {
        Ok(FormResult::Completed(payment)) => payment,
        Ok(FormResult::Cancelled) => {
            io::print_info("Corporate account unchanged.");
            return Ok(());
        }
        Err(never) => match never {},
    };
    context.apply(DraftPatch::corporate_account(Some(payment)));
    io::print_success("Corporate account updated.");
    Ok(())
}

fn handle_penalty(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let paid_on = parse_date(arg(args, 0, "payment penalty <YYYY-MM-DD>")?)?;
    let account = context.draft().corporate_account.as_ref().ok_or_else(|| {
        CommandError::InvalidArguments("no corporate account in this booking".into())
    })?;
    let penalty = PaymentService::late_penalty(account, paid_on);
    if penalty == 0 {
        io::print_info("No late surcharge for that date.");
    } else {
        io::print_warning(format!(
            "Paying on {} adds a surcharge of {}.",
            context.render_date(paid_on),
            context.render_amount(penalty)
        ));
    }
    Ok(())
}

fn show_payment(context: &ShellContext) {
    let draft = context.draft();
    output_section("Payment");
    match draft.payment_method {
        Some(method) => io::print_info(format!("  Method : {method}")),
        None => io::print_info("  Method : -"),
    }
    let Some(account) = draft.corporate_account.as_ref() else {
        return;
    };
    if draft.payment_method != Some(PaymentMethod::CorporateAccount) {
        return;
    }
    let or_dash = |value: &str| {
        if value.trim().is_empty() {
            "-".to_string()
        } else {
            value.to_string()
        }
    };
    io::print_info(format!("  Holder : {}", or_dash(&account.holder)));
    io::print_info(format!("  Tax id : {}", or_dash(&account.tax_id)));
    io::print_info(format!("  Bank   : {}", or_dash(&account.bank)));
    io::print_info(format!("  Account: {}", or_dash(&account.account_number)));
    io::print_info(format!("  CBU    : {}", or_dash(&account.bank_code)));
    io::print_info(format!(
        "  Due    : {}",
        account
            .due_date
            .map(|due| context.render_date(due))
            .unwrap_or_else(|| "-".into())
    ));
    io::print_info(format!("  Ref.   : {}", or_dash(&account.reference)));
    io::print_info(format!(
        "  Proof  : {}",
        or_dash(account.proof_of_payment.as_deref().unwrap_or_default())
    ));
    io::print_info(format!("  Amount : {}", context.render_amount(account.total)));
    let missing = account.missing_fields();
    if !missing.is_empty() {
        io::print_warning(format!("Still missing: {}", missing.join(", ")));
    }
}
