use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::common::is_filled;
use crate::errors::{BookingError, Result};

/// Identity documents accepted for the account holder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// DNI.
    NationalId,
    /// CUIL, the personal tax id.
    TaxIdPerson,
    /// CUIT, the company tax id.
    TaxIdCompany,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::NationalId,
        DocumentType::TaxIdPerson,
        DocumentType::TaxIdCompany,
    ];

    /// Short code printed on forms.
    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::NationalId => "DNI",
            DocumentType::TaxIdPerson => "CUIL",
            DocumentType::TaxIdCompany => "CUIT",
        }
    }

    /// Accepts either the short code (`CUIT`) or the variant name
    /// (`tax_id_company`), case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "DNI" | "NATIONAL_ID" => Some(DocumentType::NationalId),
            "CUIL" | "TAX_ID_PERSON" => Some(DocumentType::TaxIdPerson),
            "CUIT" | "TAX_ID_COMPANY" => Some(DocumentType::TaxIdCompany),
            _ => None,
        }
    }

    pub fn is_company(&self) -> bool {
        matches!(self, DocumentType::TaxIdCompany)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Name that identifies the holder, selected by document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentIdentity<'a> {
    Person { name: &'a str },
    Company { legal_name: &'a str },
}

impl<'a> DocumentIdentity<'a> {
    pub fn display_name(&self) -> &'a str {
        match self {
            DocumentIdentity::Person { name } => name,
            DocumentIdentity::Company { legal_name } => legal_name,
        }
    }

    pub fn is_complete(&self) -> bool {
        is_filled(self.display_name())
    }
}

/// Ordered phone list. The first entry is the primary number; once seeded
/// from an account profile it is locked and only the extra numbers change.
///
/// All operations return a new list, leaving `self` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhoneNumbers {
    entries: Vec<String>,
    #[serde(default)]
    primary_locked: bool,
}

impl PhoneNumbers {
    pub fn new(entries: Vec<String>) -> Self {
        Self {
            entries,
            primary_locked: false,
        }
    }

    /// List seeded with an account's primary number, locked when non-empty.
    pub fn prefilled(primary: impl Into<String>) -> Self {
        let primary = primary.into();
        let locked = is_filled(&primary);
        Self {
            entries: vec![primary],
            primary_locked: locked,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn primary(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    pub fn is_primary_locked(&self) -> bool {
        self.primary_locked
    }

    pub fn has_any(&self) -> bool {
        self.entries.iter().any(|entry| is_filled(entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn with_added(&self, number: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.entries.push(number.into());
        next
    }

    pub fn with_removed(&self, index: usize) -> Result<Self> {
        self.check_editable(index)?;
        let mut next = self.clone();
        next.entries.remove(index);
        Ok(next)
    }

    pub fn with_replaced(&self, index: usize, number: impl Into<String>) -> Result<Self> {
        self.check_editable(index)?;
        let mut next = self.clone();
        next.entries[index] = number.into();
        Ok(next)
    }

    /// Forces the primary slot back to `primary` and keeps it locked.
    pub(crate) fn with_locked_primary(mut self, primary: &str) -> Self {
        match self.entries.first_mut() {
            Some(first) => *first = primary.to_string(),
            None => self.entries.push(primary.to_string()),
        }
        self.primary_locked = true;
        self
    }

    fn check_editable(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(BookingError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        if index == 0 && self.primary_locked {
            return Err(BookingError::PrimaryPhoneLocked);
        }
        Ok(())
    }
}

/// Known account profile used to pre-seed a booking session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientProfile {
    pub document_type: DocumentType,
    pub document_number: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub legal_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ClientProfile {
    /// Demo corporate account shipped with the application.
    pub fn sample() -> Self {
        Self {
            document_type: DocumentType::TaxIdCompany,
            document_number: "30-71234567-9".into(),
            full_name: "Juan Carlos Pérez".into(),
            legal_name: "Empresa de Transportes S.A.".into(),
            email: "contacto@transportes.com.ar".into(),
            phone: "11-4567-8901".into(),
            address: "Av. Corrientes 1234, CABA, Buenos Aires".into(),
        }
    }
}

/// Client step fields of the booking draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientInfo {
    pub document_type: Option<DocumentType>,
    pub document_number: String,
    pub full_name: String,
    pub legal_name: String,
    pub email: String,
    pub phones: PhoneNumbers,
    pub address: String,
}

impl ClientInfo {
    pub fn from_profile(profile: &ClientProfile) -> Self {
        Self {
            document_type: Some(profile.document_type),
            document_number: profile.document_number.clone(),
            full_name: profile.full_name.clone(),
            legal_name: profile.legal_name.clone(),
            email: profile.email.clone(),
            phones: PhoneNumbers::prefilled(profile.phone.clone()),
            address: profile.address.clone(),
        }
    }

    /// Typed view of the holder's name; both names are kept so switching the
    /// document type back and forth loses nothing.
    pub fn identity(&self) -> Option<DocumentIdentity<'_>> {
        self.document_type.map(|kind| {
            if kind.is_company() {
                DocumentIdentity::Company {
                    legal_name: &self.legal_name,
                }
            } else {
                DocumentIdentity::Person {
                    name: &self.full_name,
                }
            }
        })
    }

    pub fn display_name(&self) -> &str {
        self.identity()
            .map(|identity| identity.display_name())
            .unwrap_or(self.full_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_parses_codes_and_names() {
        assert_eq!(DocumentType::parse("cuit"), Some(DocumentType::TaxIdCompany));
        assert_eq!(DocumentType::parse("NATIONAL_ID"), Some(DocumentType::NationalId));
        assert_eq!(DocumentType::parse("tax-id-person"), Some(DocumentType::TaxIdPerson));
        assert_eq!(DocumentType::parse("passport"), None);
    }

    #[test]
    fn identity_follows_document_type() {
        let mut client = ClientInfo::from_profile(&ClientProfile::sample());
        assert_eq!(
            client.identity(),
            Some(DocumentIdentity::Company {
                legal_name: "Empresa de Transportes S.A."
            })
        );

        client.document_type = Some(DocumentType::NationalId);
        assert_eq!(client.display_name(), "Juan Carlos Pérez");
    }

    #[test]
    fn prefilled_primary_phone_is_locked() {
        let phones = PhoneNumbers::prefilled("11-4567-8901");
        assert!(phones.is_primary_locked());
        assert!(matches!(
            phones.with_replaced(0, "other"),
            Err(BookingError::PrimaryPhoneLocked)
        ));
        assert!(matches!(
            phones.with_removed(0),
            Err(BookingError::PrimaryPhoneLocked)
        ));

        let extended = phones.with_added("11-0000-0000");
        let edited = extended.with_replaced(1, "11-1111-1111").unwrap();
        assert_eq!(edited.entries(), ["11-4567-8901", "11-1111-1111"]);
        assert_eq!(phones.len(), 1, "original list is untouched");
    }

    #[test]
    fn out_of_range_edits_are_rejected() {
        let phones = PhoneNumbers::new(vec!["1".into()]);
        assert!(matches!(
            phones.with_removed(3),
            Err(BookingError::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn empty_profile_phone_stays_unlocked() {
        let phones = PhoneNumbers::prefilled("  ");
        assert!(!phones.is_primary_locked());
        assert!(!phones.has_any());
    }
}
