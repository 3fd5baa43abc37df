//! Booking wizard: step cursor, draft ownership and per-step validation.

mod step;
pub mod validators;

pub use step::WizardStep;
pub use validators::{FieldIssue, StepValidators};

use crate::domain::{BookingDraft, ClientProfile, DraftPatch};
use crate::pricing::{Price, PricingPolicy, PricingTable};

/// What the shell needs to render progress and the advance button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardProgress {
    pub current_index: usize,
    pub total_steps: usize,
    pub step: WizardStep,
    pub can_advance: bool,
    pub completed: bool,
}

/// Owns the draft of one booking session and the cursor over its steps.
///
/// The machine never validates; callers gate `advance` on
/// [`StepValidators::can_advance`].
#[derive(Debug, Clone)]
pub struct WizardStateMachine {
    cursor: usize,
    completed: bool,
    draft: BookingDraft,
    initial: BookingDraft,
    pricing: PricingTable,
    policy: PricingPolicy,
}

impl WizardStateMachine {
    pub fn new(profile: &ClientProfile) -> Self {
        Self::with_pricing(profile, PricingTable::standard(), PricingPolicy::default())
    }

    pub fn with_pricing(profile: &ClientProfile, pricing: PricingTable, policy: PricingPolicy) -> Self {
        let initial = BookingDraft::seeded(profile);
        let mut machine = Self {
            cursor: 0,
            completed: false,
            draft: initial.clone(),
            initial,
            pricing,
            policy,
        };
        machine.sync_corporate_total();
        machine.initial = machine.draft.clone();
        machine
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_step(&self) -> WizardStep {
        WizardStep::from_index(self.cursor).unwrap_or(WizardStep::Client)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    pub fn policy(&self) -> PricingPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: PricingPolicy) {
        self.policy = policy;
        self.sync_corporate_total();
    }

    /// Draft total under the configured policy.
    pub fn total(&self) -> Price {
        self.pricing.total_for(&self.draft.vehicles, self.policy)
    }

    /// Moves to the next step, or marks the booking completed on the last one.
    pub fn advance(&mut self) {
        if self.cursor + 1 < WizardStep::COUNT {
            self.cursor += 1;
            tracing::debug!(step = %self.current_step(), "advanced");
        } else if !self.completed {
            self.completed = true;
            tracing::debug!("booking completed");
        }
    }

    /// Moves back one step; no-op on the first step.
    pub fn retreat(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            tracing::debug!(step = %self.current_step(), "retreated");
        }
    }

    /// Applies `patch` through [`BookingDraft::merged`] and re-syncs the
    /// corporate account total.
    pub fn merge_draft(&mut self, patch: DraftPatch) {
        if patch.is_empty() {
            return;
        }
        self.draft = self.draft.merged(patch);
        self.sync_corporate_total();
        tracing::debug!(vehicles = self.draft.vehicles.len(), "draft updated");
    }

    /// Restores the pre-seeded draft on the first step.
    pub fn reset(&mut self) {
        self.draft = self.initial.clone();
        self.cursor = 0;
        self.completed = false;
        tracing::debug!("wizard reset");
    }

    pub fn progress(&self, validators: &StepValidators) -> WizardProgress {
        let step = self.current_step();
        WizardProgress {
            current_index: self.cursor,
            total_steps: WizardStep::COUNT,
            step,
            can_advance: validators.can_advance(step, &self.draft),
            completed: self.completed,
        }
    }

    fn sync_corporate_total(&mut self) {
        let total = self.total().amount().unwrap_or(0);
        if let Some(payment) = self.draft.corporate_account.as_mut() {
            payment.total = total;
        }
    }
}
