//! Field-by-field form framework used by interactive CLI commands.
//!
//! A [`FormFlow`] describes its fields and turns the collected strings into a
//! typed value; the [`FormEngine`] walks the fields through a
//! [`FormInteraction`], handling back/help/cancel and the final review.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::cli::io;
use crate::core::services::payment_service::resolve_bank;
use crate::domain::{
    is_valid_plate, normalize_plate, CorporateAccountPayment, PickupPerson, VehicleBookingEntry,
    VehicleId, VehicleRecord, BANKS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Describes how prompts can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Value(String),
    /// Keep the default/current value.
    Keep,
    Cancel,
    Back,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResponse {
    Confirm,
    Back,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Date,
    Choice(Vec<String>),
}

type ValidatorCallback = dyn Fn(&str) -> Result<String, String> + Send + Sync;

#[derive(Clone)]
pub enum Validator {
    None,
    NonEmpty,
    Date,
    Custom(Arc<ValidatorCallback>),
}

impl Validator {
    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        match self {
            Validator::None => Ok(input.trim().to_string()),
            Validator::NonEmpty => {
                if input.trim().is_empty() {
                    Err(ValidationError::new("Value cannot be empty"))
                } else {
                    Ok(input.trim().to_string())
                }
            }
            Validator::Date => NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
                .map(|date| date.to_string())
                .map_err(|_| ValidationError::new("Use YYYY-MM-DD format")),
            Validator::Custom(func) => func(input).map_err(ValidationError::new),
        }
    }
}

#[derive(Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
    pub validator: Validator,
}

impl FieldDescriptor {
    pub fn new(key: &'static str, label: &'static str, kind: FieldKind, validator: Validator) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
            help: None,
            validator,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

pub struct FormDescriptor {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }
}

fn make_plate_validator(taken: Vec<String>) -> Validator {
    Validator::Custom(Arc::new(move |input| {
        let plate = normalize_plate(input);
        if !is_valid_plate(&plate) {
            Err(format!("`{plate}` is not a valid plate (e.g. AB123CD or ABC123)"))
        } else if taken.iter().any(|existing| existing == &plate) {
            Err(format!("Plate `{plate}` is already registered"))
        } else {
            Ok(plate)
        }
    }))
}

fn make_year_validator() -> Validator {
    Validator::Custom(Arc::new(|input| {
        let trimmed = input.trim();
        match trimmed.parse::<u16>() {
            Ok(year) if (1900..=2100).contains(&year) => Ok(trimmed.to_string()),
            _ => Err("Enter a four-digit year".into()),
        }
    }))
}

fn make_mileage_validator() -> Validator {
    Validator::Custom(Arc::new(|input| {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }
        trimmed
            .replace('.', "")
            .parse::<u32>()
            .map(|value| value.to_string())
            .map_err(|_| "Enter the reading in whole kilometres".into())
    }))
}

fn make_bank_validator() -> Validator {
    Validator::Custom(Arc::new(|input| {
        resolve_bank(input.trim()).map_err(|err| err.to_string())
    }))
}

fn non_empty(values: &BTreeMap<String, String>, key: &str) -> String {
    values.get(key).cloned().unwrap_or_default()
}

/// Fields of a vehicle being registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleFormData {
    pub plate: String,
    pub model: String,
    pub year: String,
    pub engine_number: String,
    pub chassis_number: String,
    pub last_known_mileage: Option<u32>,
}

impl VehicleFormData {
    /// Booking entry for a vehicle added during the booking.
    pub fn into_booking_entry(self) -> VehicleBookingEntry {
        let mut entry = VehicleBookingEntry::new_vehicle(
            &self.plate,
            self.model,
            self.year,
            self.engine_number,
            self.chassis_number,
        );
        entry.last_known_mileage = self.last_known_mileage;
        entry
    }

    /// Registry record for a vehicle registered outside a booking.
    pub fn into_record(self) -> VehicleRecord {
        VehicleRecord {
            id: VehicleId::mint(),
            plate: normalize_plate(&self.plate),
            model: self.model,
            year: self.year,
            engine_number: Some(self.engine_number),
            chassis_number: Some(self.chassis_number),
            last_known_mileage: self.last_known_mileage,
        }
    }
}

pub struct NewVehicleWizard {
    descriptor: FormDescriptor,
    defaults: BTreeMap<String, String>,
}

impl NewVehicleWizard {
    /// `taken` lists plates that may not be reused.
    pub fn new(taken: Vec<String>) -> Self {
        let fields = vec![
            FieldDescriptor::new("plate", "License plate", FieldKind::Text, make_plate_validator(taken))
                .with_help("Old format ABC123 or current format AB123CD."),
            FieldDescriptor::new("model", "Model", FieldKind::Text, Validator::NonEmpty),
            FieldDescriptor::new("year", "Year", FieldKind::Text, make_year_validator()),
            FieldDescriptor::new("engine", "Engine number", FieldKind::Text, Validator::NonEmpty),
            FieldDescriptor::new("chassis", "Chassis number", FieldKind::Text, Validator::NonEmpty),
            FieldDescriptor::new("mileage", "Last known mileage", FieldKind::Text, make_mileage_validator())
                .with_optional()
                .with_help("Leave empty when the vehicle has no recorded service."),
        ];
        Self {
            descriptor: FormDescriptor::new("vehicle", fields),
            defaults: BTreeMap::new(),
        }
    }

    /// Same form, prefilled with the values of a vehicle being corrected.
    pub fn editing(taken: Vec<String>, entry: &VehicleBookingEntry) -> Self {
        let mut wizard = Self::new(taken);
        let mut defaults = BTreeMap::new();
        defaults.insert("plate".into(), entry.plate.clone());
        defaults.insert("model".into(), entry.model.clone());
        defaults.insert("year".into(), entry.year.clone());
        if let Some(engine) = &entry.engine_number {
            defaults.insert("engine".into(), engine.clone());
        }
        if let Some(chassis) = &entry.chassis_number {
            defaults.insert("chassis".into(), chassis.clone());
        }
        if let Some(km) = entry.last_known_mileage {
            defaults.insert("mileage".into(), km.to_string());
        }
        wizard.defaults = defaults;
        wizard
    }
}

impl FormFlow for NewVehicleWizard {
    type Output = VehicleFormData;
    type Error = Infallible;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        self.defaults.clone()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        Ok(VehicleFormData {
            plate: non_empty(&values, "plate"),
            model: non_empty(&values, "model"),
            year: non_empty(&values, "year"),
            engine_number: non_empty(&values, "engine"),
            chassis_number: non_empty(&values, "chassis"),
            last_known_mileage: values.get("mileage").and_then(|value| value.parse().ok()),
        })
    }

    fn cancel(&self) -> Self::Error {
        unreachable!()
    }
}

pub struct PickupWizard {
    descriptor: FormDescriptor,
    defaults: BTreeMap<String, String>,
}

impl PickupWizard {
    pub fn new(initial: Option<&PickupPerson>) -> Self {
        let fields = vec![
            FieldDescriptor::new("first_name", "First name", FieldKind::Text, Validator::NonEmpty),
            FieldDescriptor::new("last_name", "Last name", FieldKind::Text, Validator::NonEmpty),
            FieldDescriptor::new("national_id", "DNI", FieldKind::Text, Validator::NonEmpty)
                .with_help("National id of the person collecting the vehicle."),
        ];
        let mut defaults = BTreeMap::new();
        if let Some(person) = initial {
            defaults.insert("first_name".into(), person.first_name.clone());
            defaults.insert("last_name".into(), person.last_name.clone());
            defaults.insert("national_id".into(), person.national_id.clone());
        }
        Self {
            descriptor: FormDescriptor::new("pickup", fields),
            defaults,
        }
    }
}

impl FormFlow for PickupWizard {
    type Output = PickupPerson;
    type Error = Infallible;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        self.defaults.clone()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        Ok(PickupPerson::new(
            non_empty(&values, "first_name"),
            non_empty(&values, "last_name"),
            non_empty(&values, "national_id"),
        ))
    }

    fn cancel(&self) -> Self::Error {
        unreachable!()
    }
}

pub struct CorporateAccountWizard {
    descriptor: FormDescriptor,
    base: CorporateAccountPayment,
    defaults: BTreeMap<String, String>,
}

impl CorporateAccountWizard {
    pub fn new(base: CorporateAccountPayment) -> Self {
        let banks: Vec<String> = BANKS.iter().map(|bank| bank.to_string()).collect();
        let fields = vec![
            FieldDescriptor::new("bank", "Bank", FieldKind::Choice(banks), make_bank_validator()),
            FieldDescriptor::new("account_number", "Account number", FieldKind::Text, Validator::NonEmpty),
            FieldDescriptor::new("bank_code", "CBU", FieldKind::Text, Validator::NonEmpty)
                .with_help("22-digit national bank code of the paying account."),
            FieldDescriptor::new("due_date", "Due date", FieldKind::Date, Validator::Date),
            FieldDescriptor::new("reference", "Reference", FieldKind::Text, Validator::None)
                .with_optional(),
            FieldDescriptor::new("proof", "Proof of payment", FieldKind::Text, Validator::NonEmpty)
                .with_help("File name of the transfer receipt."),
        ];
        let mut defaults = BTreeMap::new();
        let mut seed = |key: &str, value: &str| {
            if !value.trim().is_empty() {
                defaults.insert(key.to_string(), value.to_string());
            }
        };
        seed("bank", &base.bank);
        seed("account_number", &base.account_number);
        seed("bank_code", &base.bank_code);
        seed("reference", &base.reference);
        if let Some(due) = base.due_date {
            seed("due_date", &due.to_string());
        }
        if let Some(proof) = &base.proof_of_payment {
            seed("proof", proof);
        }
        Self {
            descriptor: FormDescriptor::new("corporate_account", fields),
            base,
            defaults,
        }
    }
}

impl FormFlow for CorporateAccountWizard {
    type Output = CorporateAccountPayment;
    type Error = Infallible;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        self.defaults.clone()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        let mut payment = self.base.clone();
        payment.bank = non_empty(&values, "bank");
        payment.account_number = non_empty(&values, "account_number");
        payment.bank_code = non_empty(&values, "bank_code");
        payment.due_date = values
            .get("due_date")
            .and_then(|value| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok());
        payment.reference = non_empty(&values, "reference");
        payment.proof_of_payment = values.get("proof").filter(|value| !value.is_empty()).cloned();
        Ok(payment)
    }

    fn cancel(&self) -> Self::Error {
        unreachable!()
    }
}

/// Snapshot of collected data displayed before final confirmation.
#[derive(Default)]
pub struct FormSummary {
    pub entries: Vec<(String, String)>,
}

pub struct PromptContext<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub default: Option<&'a str>,
    pub index: usize,
    pub total: usize,
}

pub trait FormInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse;

    fn confirm(&mut self, summary: &FormSummary, lines: &[String]) -> ConfirmationResponse;
}

/// Terminal implementation backed by dialoguer prompts. Typing `:back`,
/// `:help` or `:cancel` steers the form; an empty answer keeps the default.
pub struct WizardInteraction {
    theme: ColorfulTheme,
}

impl Default for WizardInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn step_title(context: &PromptContext<'_>) -> String {
        format!(
            "[{}/{}] {}",
            context.index + 1,
            context.total,
            context.descriptor.label
        )
    }

    fn prompt_text(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(Self::step_title(context))
            .allow_empty(true);
        if let Some(default) = context.default {
            input = input.default(default.to_string()).show_default(true);
        }
        match input.interact_text() {
            Ok(value) => interpret_text(&value, context.default),
            Err(_) => PromptResponse::Cancel,
        }
    }

    fn prompt_choice(&mut self, context: &PromptContext<'_>, options: &[String]) -> PromptResponse {
        let default = context
            .default
            .and_then(|current| options.iter().position(|option| option == current))
            .unwrap_or(0);
        match Select::with_theme(&self.theme)
            .with_prompt(Self::step_title(context))
            .items(options)
            .default(default)
            .interact_opt()
        {
            Ok(Some(index)) => PromptResponse::Value((index + 1).to_string()),
            Ok(None) if context.index > 0 => PromptResponse::Back,
            Ok(None) | Err(_) => PromptResponse::Cancel,
        }
    }
}

fn interpret_text(value: &str, default: Option<&str>) -> PromptResponse {
    match value.trim() {
        ":back" => PromptResponse::Back,
        ":help" => PromptResponse::Help,
        ":cancel" => PromptResponse::Cancel,
        "" => PromptResponse::Keep,
        trimmed if Some(trimmed) == default => PromptResponse::Keep,
        trimmed => PromptResponse::Value(trimmed.to_string()),
    }
}

impl FormInteraction for WizardInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        match &context.descriptor.kind {
            FieldKind::Choice(options) => self.prompt_choice(context, options),
            FieldKind::Text | FieldKind::Date => self.prompt_text(context),
        }
    }

    fn confirm(&mut self, _summary: &FormSummary, lines: &[String]) -> ConfirmationResponse {
        for line in lines {
            io::print_info(line);
        }
        let options = ["Confirm", "Back", "Cancel"];
        match Select::with_theme(&self.theme)
            .with_prompt("Save these details?")
            .items(&options)
            .default(0)
            .interact_opt()
        {
            Ok(Some(0)) => ConfirmationResponse::Confirm,
            Ok(Some(1)) => ConfirmationResponse::Back,
            _ => ConfirmationResponse::Cancel,
        }
    }
}

pub struct FormSession<'a> {
    descriptor: &'a FormDescriptor,
    values: BTreeMap<String, String>,
    index: usize,
    cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSessionEvent {
    Moved,
    Repeat,
    Cancelled,
}

impl<'a> FormSession<'a> {
    pub fn new(descriptor: &'a FormDescriptor, defaults: BTreeMap<String, String>) -> Self {
        Self {
            descriptor,
            values: defaults,
            index: 0,
            cancelled: false,
        }
    }

    pub fn current_field(&self) -> Option<(&'a FieldDescriptor, Option<&str>)> {
        self.descriptor
            .fields
            .get(self.index)
            .map(|field| (field, self.values.get(field.key).map(String::as_str)))
    }

    pub fn apply_response(&mut self, response: PromptResponse) -> Result<FormSessionEvent, ValidationError> {
        let Some(field) = self.descriptor.fields.get(self.index) else {
            return Ok(FormSessionEvent::Repeat);
        };

        match response {
            PromptResponse::Cancel => {
                self.cancelled = true;
                Ok(FormSessionEvent::Cancelled)
            }
            PromptResponse::Back => {
                if self.index > 0 {
                    self.index -= 1;
                    Ok(FormSessionEvent::Moved)
                } else {
                    io::print_warning("Already at the first field.");
                    Ok(FormSessionEvent::Repeat)
                }
            }
            PromptResponse::Help => {
                io::print_info(
                    field
                        .help
                        .unwrap_or("No additional information available for this field."),
                );
                Ok(FormSessionEvent::Repeat)
            }
            PromptResponse::Keep => {
                if self.values.contains_key(field.key) || !field.required {
                    self.index += 1;
                    Ok(FormSessionEvent::Moved)
                } else {
                    io::print_warning("This field is required.");
                    Ok(FormSessionEvent::Repeat)
                }
            }
            PromptResponse::Value(raw) => match field.validator.validate(&raw) {
                Ok(value) => {
                    if value.is_empty() && !field.required {
                        self.values.remove(field.key);
                    } else {
                        self.values.insert(field.key.to_string(), value);
                    }
                    self.index += 1;
                    Ok(FormSessionEvent::Moved)
                }
                Err(err) => {
                    io::print_warning(&err.message);
                    Err(err)
                }
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.descriptor.fields.len()
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

/// High-level form contract for entity-specific wizards.
pub trait FormFlow {
    type Output;
    type Error;

    fn descriptor(&self) -> &FormDescriptor;

    fn defaults(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error>;

    fn cancel(&self) -> Self::Error;
}

/// Drives a [`FormFlow`] using a [`FormInteraction`] implementation.
pub struct FormEngine<'a, F: FormFlow> {
    flow: &'a F,
}

impl<'a, F: FormFlow> FormEngine<'a, F> {
    pub fn new(flow: &'a F) -> Self {
        Self { flow }
    }

    pub fn run<I: FormInteraction>(&self, interaction: &mut I) -> Result<FormResult<F::Output>, F::Error> {
        let descriptor = self.flow.descriptor();
        let mut session = FormSession::new(descriptor, self.flow.defaults());

        loop {
            if session.cancelled {
                return Ok(FormResult::Cancelled);
            }

            if session.is_complete() {
                let summary = build_summary(descriptor, session.values());
                let lines = format_summary_lines(&summary);
                match interaction.confirm(&summary, &lines) {
                    ConfirmationResponse::Confirm => {
                        let output = self.flow.commit(session.values().clone())?;
                        return Ok(FormResult::Completed(output));
                    }
                    ConfirmationResponse::Back => {
                        if descriptor.fields.is_empty() {
                            return Ok(FormResult::Cancelled);
                        }
                        session.index = descriptor.fields.len() - 1;
                        continue;
                    }
                    ConfirmationResponse::Cancel => return Ok(FormResult::Cancelled),
                }
            }

            let Some((field, default)) = session.current_field() else {
                continue;
            };
            let context = PromptContext {
                descriptor: field,
                default,
                index: session.index,
                total: descriptor.fields.len(),
            };
            let response = interaction.prompt_field(&context);

            match session.apply_response(response) {
                Ok(FormSessionEvent::Cancelled) => return Ok(FormResult::Cancelled),
                // Validation errors are already printed; ask again.
                Ok(_) | Err(_) => continue,
            }
        }
    }
}

fn format_summary_lines(summary: &FormSummary) -> Vec<String> {
    let mut lines = vec!["Review your entries:".to_string()];
    for (key, value) in &summary.entries {
        lines.push(format!("  {}: {}", key, value));
    }
    lines
}

fn build_summary(descriptor: &FormDescriptor, values: &BTreeMap<String, String>) -> FormSummary {
    let mut summary = FormSummary::default();
    for field in &descriptor.fields {
        let value = values
            .get(field.key)
            .cloned()
            .unwrap_or_else(|| "[unfilled]".to_string());
        summary.entries.push((field.label.to_string(), value));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct MockInteraction {
        prompts: VecDeque<PromptResponse>,
        confirmations: VecDeque<ConfirmationResponse>,
        seen_defaults: Vec<Option<String>>,
    }

    impl MockInteraction {
        fn new(prompts: Vec<PromptResponse>, confirmations: Vec<ConfirmationResponse>) -> Self {
            Self {
                prompts: prompts.into(),
                confirmations: confirmations.into(),
                seen_defaults: Vec::new(),
            }
        }
    }

    impl FormInteraction for MockInteraction {
        fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
            self.seen_defaults.push(context.default.map(str::to_string));
            self.prompts.pop_front().unwrap_or(PromptResponse::Cancel)
        }

        fn confirm(&mut self, _summary: &FormSummary, _lines: &[String]) -> ConfirmationResponse {
            self.confirmations
                .pop_front()
                .unwrap_or(ConfirmationResponse::Cancel)
        }
    }

    fn value(text: &str) -> PromptResponse {
        PromptResponse::Value(text.into())
    }

    #[test]
    fn vehicle_wizard_normalizes_plate_and_retries_invalid_input() {
        let wizard = NewVehicleWizard::new(vec!["AB123CD".into()]);
        let mut interaction = MockInteraction::new(
            vec![
                value("ab123cd"),
                value("A1234"),
                value(" aa111bb "),
                value("Renault Kangoo"),
                value("20x4"),
                value("2023"),
                value("M-778"),
                value("CH-991"),
                PromptResponse::Keep,
            ],
            vec![ConfirmationResponse::Confirm],
        );
        let result = FormEngine::new(&wizard).run(&mut interaction).unwrap();
        let FormResult::Completed(data) = result else {
            panic!("expected completed form");
        };
        assert_eq!(data.plate, "AA111BB");
        assert_eq!(data.year, "2023");
        assert_eq!(data.last_known_mileage, None);

        let entry = data.into_booking_entry();
        assert!(entry.is_new());
        assert_eq!(entry.engine_number.as_deref(), Some("M-778"));
    }

    #[test]
    fn editing_vehicle_prefills_current_values() {
        let mut entry = VehicleBookingEntry::new_vehicle("AA111BB", "Kangoo", "2023", "M-1", "CH-1");
        entry.last_known_mileage = Some(5_000);
        let wizard = NewVehicleWizard::editing(vec!["AB123CD".into()], &entry);
        let mut interaction = MockInteraction::new(
            vec![
                PromptResponse::Keep,
                value("Renault Kangoo"),
                PromptResponse::Keep,
                PromptResponse::Keep,
                value("CH-2"),
                PromptResponse::Keep,
            ],
            vec![ConfirmationResponse::Confirm],
        );
        let FormResult::Completed(data) = FormEngine::new(&wizard).run(&mut interaction).unwrap()
        else {
            panic!("expected completed form");
        };
        assert_eq!(interaction.seen_defaults[0].as_deref(), Some("AA111BB"));
        assert_eq!(data.plate, "AA111BB");
        assert_eq!(data.model, "Renault Kangoo");
        assert_eq!(data.engine_number, "M-1");
        assert_eq!(data.chassis_number, "CH-2");
        assert_eq!(data.last_known_mileage, Some(5_000));
    }

    #[test]
    fn back_revisits_previous_field() {
        let wizard = PickupWizard::new(None);
        let mut interaction = MockInteraction::new(
            vec![
                value("Ana"),
                PromptResponse::Back,
                value("Ana María"),
                value("Gómez"),
                value("30111222"),
            ],
            vec![ConfirmationResponse::Confirm],
        );
        let result = FormEngine::new(&wizard).run(&mut interaction).unwrap();
        assert_eq!(
            result,
            FormResult::Completed(PickupPerson::new("Ana María", "Gómez", "30111222"))
        );
    }

    #[test]
    fn required_field_cannot_be_skipped() {
        let wizard = PickupWizard::new(None);
        let mut interaction = MockInteraction::new(
            vec![PromptResponse::Keep, PromptResponse::Cancel],
            vec![],
        );
        let result = FormEngine::new(&wizard).run(&mut interaction).unwrap();
        assert_eq!(result, FormResult::Cancelled);
        assert_eq!(interaction.seen_defaults.len(), 2);
    }

    #[test]
    fn corporate_wizard_keeps_existing_values() {
        let base = CorporateAccountPayment {
            holder: "Empresa de Transportes S.A.".into(),
            bank: "Banco Galicia".into(),
            account_number: "123".into(),
            bank_code: "0070".into(),
            total: 45_000,
            ..CorporateAccountPayment::default()
        };
        let wizard = CorporateAccountWizard::new(base);
        let mut interaction = MockInteraction::new(
            vec![
                PromptResponse::Keep,
                PromptResponse::Keep,
                PromptResponse::Keep,
                value("2025-05-10"),
                PromptResponse::Keep,
                value("comprobante.pdf"),
            ],
            vec![ConfirmationResponse::Confirm],
        );
        let result = FormEngine::new(&wizard).run(&mut interaction).unwrap();
        let FormResult::Completed(payment) = result else {
            panic!("expected completed form");
        };
        assert_eq!(interaction.seen_defaults[0].as_deref(), Some("Banco Galicia"));
        assert_eq!(payment.total, 45_000);
        assert!(payment.missing_fields().is_empty());
    }

    #[test]
    fn bank_choice_accepts_menu_index() {
        let wizard = CorporateAccountWizard::new(CorporateAccountPayment::default());
        let mut interaction = MockInteraction::new(
            vec![
                value("5"),
                value("1"),
                value("2"),
                value("2025-05-10"),
                PromptResponse::Keep,
                value("r.pdf"),
            ],
            vec![ConfirmationResponse::Confirm],
        );
        let FormResult::Completed(payment) = FormEngine::new(&wizard).run(&mut interaction).unwrap()
        else {
            panic!("expected completed form");
        };
        assert_eq!(payment.bank, "Banco Macro");
    }

    #[test]
    fn text_shortcuts_map_to_responses() {
        assert_eq!(interpret_text(":back", None), PromptResponse::Back);
        assert_eq!(interpret_text("", Some("x")), PromptResponse::Keep);
        assert_eq!(interpret_text("x", Some("x")), PromptResponse::Keep);
        assert_eq!(interpret_text(" y ", Some("x")), value("y"));
    }
}
