//! Create-plan page.
//!
//! Loads the event, the organization balance, and any existing plan in
//! parallel; an event that already has a plan redirects to the edit page
//! before the create surface is ever shown. Submit creates the plan row and
//! reconciles the drafted expenses against it.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use backend::repositories::{ExpenseRepository, OrganizationRepository, PlanRepository};
use domain::models::EventRecord;
use feed::EventSource;

use crate::error::PageError;
use crate::pages::ExpenseEditor;

/// States of the create-plan page.
#[derive(Debug, Clone, PartialEq)]
pub enum CreatePlanState {
    Loading,
    /// The feed has no event with this id.
    NotFound,
    Failed(String),
    /// A plan already exists; the create surface is never shown.
    RedirectToPlan { event_id: i64 },
    Ready,
    Submitting,
    Done { event_id: i64 },
}

/// Controller for the create-plan route.
pub struct CreatePlanPage {
    event_id: String,
    events: Arc<dyn EventSource>,
    plans: PlanRepository,
    organizations: OrganizationRepository,
    expenses: ExpenseRepository,
    cancel: CancellationToken,
    state: CreatePlanState,
    event: Option<EventRecord>,
    balance: Option<Decimal>,
    pub editor: ExpenseEditor,
}

impl CreatePlanPage {
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
            state: CreatePlanState::Loading,
            event: None,
            balance: None,
            editor: ExpenseEditor::new(),
        }
    }

    pub fn state(&self) -> &CreatePlanState {
        &self.state
    }

    pub fn event(&self) -> Option<&EventRecord> {
        self.event.as_ref()
    }

    /// The organization balance, when known.
    pub fn balance(&self) -> Option<Decimal> {
        self.balance
    }

    /// Fetch the event, the balance, and any existing plan concurrently.
    ///
    /// A cancelled load returns without touching state.
    pub async fn load(&mut self, feed_url: Option<&str>, org_id: Option<i64>) {
        if self.cancel.is_cancelled() {
            return;
        }
        let cancel = self.cancel.clone();
        let events = self.events.clone();
        let plans = self.plans.clone();
        let organizations = self.organizations.clone();
        let event_id = self.event_id.clone();
        let numeric_id = event_id.parse::<i64>().ok();

        let (event_result, plan_result, balance) = tokio::select! {
            _ = cancel.cancelled() => return,
            fetched = async {
                tokio::join!(
                    events.event_by_id(feed_url, &event_id),
                    async {
                        match numeric_id {
                            Some(id) => plans.find_for_event(id).await,
                            None => Ok(None),
                        }
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

        // An existing plan wins over everything else.
        match plan_result {
            Ok(Some(plan)) => {
                debug!(plan_id = plan.id, "plan already exists, redirecting");
                self.state = CreatePlanState::RedirectToPlan {
                    event_id: plan.event_id,
                };
                return;
            }
            Ok(None) => {}
            Err(err) => {
                self.state = CreatePlanState::Failed(err.to_string());
                return;
            }
        }

        match event_result {
            Ok(Some(event)) => {
                self.event = Some(event);
                self.balance = balance;
                self.state = CreatePlanState::Ready;
            }
            Ok(None) => self.state = CreatePlanState::NotFound,
            Err(err) => self.state = CreatePlanState::Failed(err.to_string()),
        }
    }

    /// Create the plan and persist the drafted expenses.
    ///
    /// On failure the page moves to `Failed` but the drafted expense list is
    /// kept, so a retry loses nothing. A cancelled submit puts the page back
    /// in `Ready`; operations already dispatched may still land and the
    /// existing-plan redirect catches them on the next load.
    pub async fn submit(&mut self) -> Result<(), PageError> {
        if self.state != CreatePlanState::Ready {
            return Err(PageError::NotReady);
        }
        if self.cancel.is_cancelled() {
            return Ok(());
        }
        let event_id = self
            .event
            .as_ref()
            .and_then(|event| event.numeric_id())
            .ok_or_else(|| PageError::NonNumericEventId(self.event_id.clone()))?;

        self.state = CreatePlanState::Submitting;
        let cancel = self.cancel.clone();
        let plans = self.plans.clone();
        let expenses = self.expenses.clone();
        let drafted = self.editor.expenses().to_vec();

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                self.state = CreatePlanState::Ready;
                return Ok(());
            }
            result = async {
                let plan = plans.create(event_id).await?;
                expenses.reconcile(plan.id, &drafted, &[]).await
            } => result,
        };

        match result {
            Ok(saved) => {
                self.editor.replace_with_saved(saved);
                self.state = CreatePlanState::Done { event_id };
                Ok(())
            }
            Err(err) => {
                self.state = CreatePlanState::Failed(err.to_string());
                Err(err.into())
            }
        }
    }
}
