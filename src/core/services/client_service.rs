use crate::domain::{BookingDraft, ClientInfo, DocumentType, DraftPatch};
use crate::errors::{BookingError, Result};

use super::ServiceResult;

/// Editable client fields addressed by name from forms and commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    DocumentType,
    DocumentNumber,
    FullName,
    LegalName,
    Email,
    Address,
}

impl ClientField {
    pub const ALL: [ClientField; 6] = [
        ClientField::DocumentType,
        ClientField::DocumentNumber,
        ClientField::FullName,
        ClientField::LegalName,
        ClientField::Email,
        ClientField::Address,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ClientField::DocumentType => "document_type",
            ClientField::DocumentNumber => "document_number",
            ClientField::FullName => "full_name",
            ClientField::LegalName => "legal_name",
            ClientField::Email => "email",
            ClientField::Address => "address",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|field| field.key() == normalized)
            .ok_or_else(|| {
                BookingError::InvalidInput(format!("unknown client field `{}`", value.trim()))
            })
    }
}

pub struct ClientService;

impl ClientService {
    pub fn set_field(draft: &BookingDraft, field: ClientField, value: &str) -> ServiceResult<DraftPatch> {
        let mut client = draft.client.clone();
        let value = value.trim().to_string();
        match field {
            ClientField::DocumentType => {
                let kind = DocumentType::parse(&value).ok_or_else(|| {
                    BookingError::InvalidInput(format!("unknown document type `{value}`"))
                })?;
                client.document_type = Some(kind);
            }
            ClientField::DocumentNumber => client.document_number = value,
            ClientField::FullName => client.full_name = value,
            ClientField::LegalName => client.legal_name = value,
            ClientField::Email => client.email = value,
            ClientField::Address => client.address = value,
        }
        Ok(Self::patch_with_holder(draft, client))
    }

    pub fn add_phone(draft: &BookingDraft, number: &str) -> ServiceResult<DraftPatch> {
        let number = number.trim();
        if number.is_empty() {
            return Err(BookingError::InvalidInput("phone number cannot be empty".into()));
        }
        let mut client = draft.client.clone();
        client.phones = client.phones.with_added(number);
        Ok(DraftPatch::client(client))
    }

    pub fn remove_phone(draft: &BookingDraft, index: usize) -> ServiceResult<DraftPatch> {
        let mut client = draft.client.clone();
        client.phones = client.phones.with_removed(index)?;
        Ok(DraftPatch::client(client))
    }

    pub fn replace_phone(draft: &BookingDraft, index: usize, number: &str) -> ServiceResult<DraftPatch> {
        let mut client = draft.client.clone();
        client.phones = client.phones.with_replaced(index, number.trim())?;
        Ok(DraftPatch::client(client))
    }

    /// Client patch that also refreshes the corporate account holder, which
    /// mirrors the client's display name.
    fn patch_with_holder(draft: &BookingDraft, client: ClientInfo) -> DraftPatch {
        let mut patch = DraftPatch::client(client.clone());
        if let Some(payment) = &draft.corporate_account {
            let mut payment = payment.clone();
            payment.holder = client.display_name().to_string();
            if client.document_type.map(|kind| kind.is_company()).unwrap_or(false) {
                payment.tax_id = client.document_number.clone();
            }
            patch.corporate_account = Some(Some(payment));
        }
        patch
    }
}
