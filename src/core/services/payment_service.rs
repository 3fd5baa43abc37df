use chrono::NaiveDate;

use crate::domain::{BookingDraft, CorporateAccountPayment, DraftPatch, PaymentMethod, BANKS};
use crate::errors::{BookingError, Result};

use super::ServiceResult;

/// Corporate account fields addressed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorporateField {
    Bank,
    AccountNumber,
    BankCode,
    DueDate,
    Reference,
    ProofOfPayment,
}

impl CorporateField {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "bank" => Ok(CorporateField::Bank),
            "account" | "account_number" => Ok(CorporateField::AccountNumber),
            "cbu" | "bank_code" => Ok(CorporateField::BankCode),
            "due" | "due_date" => Ok(CorporateField::DueDate),
            "reference" => Ok(CorporateField::Reference),
            "proof" | "proof_of_payment" => Ok(CorporateField::ProofOfPayment),
            other => Err(BookingError::InvalidInput(format!(
                "unknown payment field `{other}`"
            ))),
        }
    }
}

pub struct PaymentService;

impl PaymentService {
    /// Selects a method. Choosing the corporate account creates its
    /// sub-record when missing; other methods keep it for a later switch back.
    pub fn select_method(draft: &BookingDraft, method: PaymentMethod) -> DraftPatch {
        let mut patch = DraftPatch::payment_method(Some(method));
        if method == PaymentMethod::CorporateAccount && draft.corporate_account.is_none() {
            patch.corporate_account = Some(Some(CorporateAccountPayment::for_client(&draft.client)));
        }
        patch
    }

    pub fn set_corporate_field(
        draft: &BookingDraft,
        field: CorporateField,
        value: &str,
    ) -> ServiceResult<DraftPatch> {
        let mut payment = draft
            .corporate_account
            .clone()
            .unwrap_or_else(|| CorporateAccountPayment::for_client(&draft.client));
        let value = value.trim();
        match field {
            CorporateField::Bank => payment.bank = resolve_bank(value)?,
            CorporateField::AccountNumber => payment.account_number = value.to_string(),
            CorporateField::BankCode => payment.bank_code = value.to_string(),
            CorporateField::DueDate => {
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                    BookingError::InvalidInput(format!("`{value}` is not a YYYY-MM-DD date"))
                })?;
                payment.due_date = Some(date);
            }
            CorporateField::Reference => payment.reference = value.to_string(),
            CorporateField::ProofOfPayment => {
                payment.proof_of_payment = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
        }
        Ok(DraftPatch::corporate_account(Some(payment)))
    }

    /// Late surcharge owed if the corporate account is settled on `paid_on`.
    pub fn late_penalty(payment: &CorporateAccountPayment, paid_on: NaiveDate) -> u64 {
        match payment.due_date {
            Some(due) if paid_on > due => {
                let days = (paid_on - due).num_days();
                payment.late_penalty(u32::try_from(days).unwrap_or(u32::MAX))
            }
            _ => 0,
        }
    }
}

/// Accepts a bank by 1-based index into [`BANKS`] or by name.
pub fn resolve_bank(value: &str) -> Result<String> {
    if let Ok(index) = value.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|idx| BANKS.get(idx))
            .map(|bank| bank.to_string())
            .ok_or_else(|| BookingError::InvalidInput(format!("no bank number {index}")));
    }
    BANKS
        .iter()
        .find(|bank| bank.eq_ignore_ascii_case(value))
        .map(|bank| bank.to_string())
        .ok_or_else(|| BookingError::InvalidInput(format!("unknown bank `{value}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClientProfile;

    fn draft() -> BookingDraft {
        BookingDraft::seeded(&ClientProfile::sample())
    }

    #[test]
    fn corporate_fields_fill_the_sub_record() {
        let mut current = draft();
        for (field, value) in [
            (CorporateField::Bank, "3"),
            (CorporateField::AccountNumber, "123-456/7"),
            (CorporateField::BankCode, "0070999030004123456789"),
            (CorporateField::DueDate, "2025-05-10"),
        ] {
            current = current.merged(PaymentService::set_corporate_field(&current, field, value).unwrap());
        }
        let payment = current.corporate_account.clone().unwrap();
        assert_eq!(payment.bank, "Banco Galicia");
        assert_eq!(payment.missing_fields(), ["proof_of_payment"]);

        let attached = current.merged(
            PaymentService::set_corporate_field(&current, CorporateField::ProofOfPayment, "comprobante.pdf")
                .unwrap(),
        );
        assert!(attached.corporate_account.unwrap().missing_fields().is_empty());
    }

    #[test]
    fn bad_due_date_and_bank_are_rejected() {
        assert!(PaymentService::set_corporate_field(&draft(), CorporateField::DueDate, "10/05/2025").is_err());
        assert!(resolve_bank("0").is_err());
        assert!(resolve_bank("Banco Inexistente").is_err());
        assert_eq!(resolve_bank("banco macro").unwrap(), "Banco Macro");
    }

    #[test]
    fn selecting_corporate_account_recreates_missing_record() {
        let current = draft().merged(DraftPatch::corporate_account(None));
        let next = current.merged(PaymentService::select_method(&current, PaymentMethod::CorporateAccount));
        assert_eq!(
            next.corporate_account.map(|payment| payment.holder),
            Some("Empresa de Transportes S.A.".to_string())
        );
    }

    #[test]
    fn late_penalty_counts_days_past_due() {
        let payment = CorporateAccountPayment {
            total: 40_000,
            due_date: NaiveDate::from_ymd_opt(2025, 5, 10),
            ..CorporateAccountPayment::default()
        };
        let on_time = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let late = NaiveDate::from_ymd_opt(2025, 5, 12).unwrap();
        assert_eq!(PaymentService::late_penalty(&payment, on_time), 0);
        assert_eq!(PaymentService::late_penalty(&payment, late), 1_200);
    }
}
