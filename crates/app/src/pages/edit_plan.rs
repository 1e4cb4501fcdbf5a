//! Edit-plan page.
//!
//! Loads the event, the organization balance, and the plan's persisted
//! expense rows; local edits accumulate in the [`ExpenseEditor`] and one
//! save reconciles them as a batch. A failed save keeps the editable state
//! so a retry loses nothing.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use backend::repositories::{ExpenseRepository, OrganizationRepository, PlanRepository};
use backend::BackendError;
use domain::models::{EventRecord, Plan};
use feed::EventSource;

use crate::error::PageError;
use crate::pages::ExpenseEditor;

/// States of the edit-plan page.
#[derive(Debug, Clone, PartialEq)]
pub enum EditPlanState {
    Loading,
    /// The feed has no event with this id.
    NoEvent,
    Failed(String),
    Ready,
    Saving,
    Done { event_id: i64 },
}

/// Controller for the edit-plan route.
pub struct EditPlanPage {
    event_id: String,
    events: Arc<dyn EventSource>,
    plans: PlanRepository,
    organizations: OrganizationRepository,
    expenses: ExpenseRepository,
    cancel: CancellationToken,
    state: EditPlanState,
    event: Option<EventRecord>,
    plan: Option<Plan>,
    balance: Option<Decimal>,
    pub editor: ExpenseEditor,
}

impl EditPlanPage {
    pub fn new(
        event_id: String,
        events: Arc<dyn EventSource>,
        plans: PlanRepository,
        organizations: OrganizationRepository,
        expenses: ExpenseRepository,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            event_id,
            events,
            plans,
            organizations,
            expenses,
            cancel,
            state: EditPlanState::Loading,
            event: None,
            plan: None,
            balance: None,
            editor: ExpenseEditor::new(),
        }
    }

    pub fn state(&self) -> &EditPlanState {
        &self.state
    }

    pub fn event(&self) -> Option<&EventRecord> {
        self.event.as_ref()
    }

    pub fn balance(&self) -> Option<Decimal> {
        self.balance
    }

    /// Fetch the event, the balance, and the plan with its expenses
    /// concurrently. A cancelled load returns without touching state.
    pub async fn load(&mut self, feed_url: Option<&str>, org_id: Option<i64>) {
        if self.cancel.is_cancelled() {
            return;
        }
        let cancel = self.cancel.clone();
        let events = self.events.clone();
        let plans = self.plans.clone();
        let expenses = self.expenses.clone();
        let organizations = self.organizations.clone();
        let event_id = self.event_id.clone();
        let numeric_id = event_id.parse::<i64>().ok();

        let (event_result, plan_result, balance) = tokio::select! {
            _ = cancel.cancelled() => return,
            fetched = async {
                tokio::join!(
                    events.event_by_id(feed_url, &event_id),
                    async {
                        let Some(id) = numeric_id else {
                            return Ok(None);
                        };
                        let Some(plan) = plans.find_for_event(id).await? else {
                            return Ok(None);
                        };
                        let rows = expenses.list(plan.id).await?;
                        Ok::<_, BackendError>(Some((plan, rows)))
                    },
                    async {
                        match org_id {
                            Some(id) => match organizations.balance(id).await {
                                Ok(balance) => balance,
                                Err(err) => {
                                    warn!(error = %err, org_id = id, "balance read failed");
                                    None
                                }
                            },
                            None => None,
                        }
                    },
                )
            } => fetched,
        };

        match event_result {
            Ok(Some(event)) => self.event = Some(event),
            Ok(None) => {
                self.state = EditPlanState::NoEvent;
                return;
            }
            Err(err) => {
                self.state = EditPlanState::Failed(err.to_string());
                return;
            }
        }

        match plan_result {
            Ok(Some((plan, rows))) => {
                self.plan = Some(plan);
                self.editor = ExpenseEditor::with_rows(rows);
                self.balance = balance;
                self.state = EditPlanState::Ready;
            }
            // An event can be viewed without a plan, but it cannot be
            // edited; the caller should route to the create page instead.
            Ok(None) => {
                self.state = EditPlanState::Failed(format!(
                    "no plan exists for event {}",
                    self.event_id
                ));
            }
            Err(err) => self.state = EditPlanState::Failed(err.to_string()),
        }
    }

    /// Persist the accumulated edits as one reconcile batch.
    ///
    /// A failed save may be retried; the editor still holds the edits. A
    /// cancelled save puts the page back in `Ready` with the edits intact.
    pub async fn save(&mut self) -> Result<(), PageError> {
        if !matches!(
            self.state,
            EditPlanState::Ready | EditPlanState::Failed(_)
        ) {
            return Err(PageError::NotReady);
        }
        let Some(plan) = self.plan.clone() else {
            return Err(PageError::NotReady);
        };
        if self.cancel.is_cancelled() {
            return Ok(());
        }

        self.state = EditPlanState::Saving;
        let cancel = self.cancel.clone();
        let expenses = self.expenses.clone();
        let current = self.editor.expenses().to_vec();
        let deleted = self.editor.deleted_ids().to_vec();

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                self.state = EditPlanState::Ready;
                return Ok(());
            }
            result = expenses.reconcile(plan.id, &current, &deleted) => result,
        };

        match result {
            Ok(saved) => {
                self.editor.replace_with_saved(saved);
                self.state = EditPlanState::Done {
                    event_id: plan.event_id,
                };
                Ok(())
            }
            Err(err) => {
                self.state = EditPlanState::Failed(err.to_string());
                Err(err.into())
            }
        }
    }
}
