//! Integration tests for the create-plan page.
//!
//! Drives the controller against the in-memory row store and a static
//! event source.

mod common;

use std::sync::Arc;

use common::{create_page, expense_row, org_row, plan_row, ORG_ID};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use backend::test_utils::MemoryStore;
use budgetit_app::pages::CreatePlanState;
use budgetit_app::PageError;
use domain::budget::BalanceStatus;
use domain::models::NewExpense;
use feed::test_utils::{sample_event, StaticEvents};

fn new_expense(name: &str, amount: i64) -> NewExpense {
    NewExpense {
        name: name.to_string(),
        amount: Decimal::from(amount),
    }
}

#[tokio::test]
async fn test_draft_and_submit_creates_plan_and_expenses() {
    let store = Arc::new(MemoryStore::new());
    store.seed("organizations", vec![org_row("100")]);
    let source = Arc::new(StaticEvents::new(vec![sample_event("101", "Game Night")]));
    let mut page = create_page("101", source, store.clone(), CancellationToken::new());

    page.load(None, Some(ORG_ID)).await;
    assert_eq!(*page.state(), CreatePlanState::Ready);
    assert_eq!(page.event().unwrap().title, "Game Night");

    page.editor.add(new_expense("pizza", 30)).unwrap();
    page.editor.add(new_expense("banner", 20)).unwrap();
    let budget = page.editor.budget(page.balance());
    assert_eq!(budget.total_expenses, Decimal::from(50));
    assert_eq!(budget.remaining_balance, Some(Decimal::from(50)));
    assert_eq!(budget.status(), BalanceStatus::Positive);

    page.submit().await.unwrap();
    assert_eq!(*page.state(), CreatePlanState::Done { event_id: 101 });

    let plans = store.rows("plan");
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0]["event_id"], 101);

    let expenses = store.rows("expenses");
    assert_eq!(expenses.len(), 2);
    assert!(expenses.iter().all(|row| row["plan_id"] == plans[0]["id"]));

    // The editor now holds backend-assigned ids.
    assert!(page
        .editor
        .expenses()
        .iter()
        .all(|expense| expense.id.is_persisted()));
}

#[tokio::test]
async fn test_existing_plan_redirects_without_a_second_insert() {
    let store = Arc::new(MemoryStore::new());
    store.seed("plan", vec![plan_row(7, 101)]);
    let source = Arc::new(StaticEvents::new(vec![sample_event("101", "Game Night")]));
    let mut page = create_page("101", source, store.clone(), CancellationToken::new());

    page.load(None, Some(ORG_ID)).await;
    assert_eq!(
        *page.state(),
        CreatePlanState::RedirectToPlan { event_id: 101 }
    );
    assert!(store.operations().is_empty());
    assert!(page.submit().await.is_err());
    assert_eq!(store.rows("plan").len(), 1);
}

#[tokio::test]
async fn test_duplicate_plans_redirect_to_the_lowest_id() {
    let store = Arc::new(MemoryStore::new());
    store.seed("plan", vec![plan_row(9, 101), plan_row(4, 101)]);
    let source = Arc::new(StaticEvents::new(vec![sample_event("101", "Game Night")]));
    let mut page = create_page("101", source, store, CancellationToken::new());

    page.load(None, None).await;
    assert_eq!(
        *page.state(),
        CreatePlanState::RedirectToPlan { event_id: 101 }
    );
}

#[tokio::test]
async fn test_unknown_event_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(StaticEvents::new(vec![sample_event("101", "Game Night")]));
    let mut page = create_page("999", source, store, CancellationToken::new());

    page.load(None, None).await;
    assert_eq!(*page.state(), CreatePlanState::NotFound);
}

#[tokio::test]
async fn test_non_numeric_event_id_cannot_be_submitted() {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(StaticEvents::new(vec![sample_event(
        "spring-mixer",
        "Spring Mixer",
    )]));
    let mut page = create_page("spring-mixer", source, store.clone(), CancellationToken::new());

    // The event itself is viewable.
    page.load(None, None).await;
    assert_eq!(*page.state(), CreatePlanState::Ready);

    let err = page.submit().await.unwrap_err();
    assert!(matches!(err, PageError::NonNumericEventId(_)));
    assert!(store.rows("plan").is_empty());
}

#[tokio::test]
async fn test_missing_organization_balance_is_unknown() {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(StaticEvents::new(vec![sample_event("101", "Game Night")]));
    let mut page = create_page("101", source, store, CancellationToken::new());

    page.load(None, Some(ORG_ID)).await;
    assert_eq!(*page.state(), CreatePlanState::Ready);
    assert_eq!(page.balance(), None);
    let budget = page.editor.budget(page.balance());
    assert_eq!(budget.status(), BalanceStatus::Unknown);
}

#[tokio::test]
async fn test_failed_submit_keeps_the_draft() {
    let store = Arc::new(MemoryStore::new());
    store.seed("organizations", vec![org_row("100")]);
    store.fail_inserts();
    let source = Arc::new(StaticEvents::new(vec![sample_event("101", "Game Night")]));
    let mut page = create_page("101", source, store, CancellationToken::new());

    page.load(None, Some(ORG_ID)).await;
    page.editor.add(new_expense("pizza", 30)).unwrap();

    assert!(page.submit().await.is_err());
    assert!(matches!(page.state(), CreatePlanState::Failed(_)));
    assert_eq!(page.editor.expenses().len(), 1);
    assert_eq!(page.editor.expenses()[0].name, "pizza");
}

#[tokio::test]
async fn test_cancelled_submit_returns_to_ready() {
    let rows = Arc::new(MemoryStore::new());
    let slow = Arc::new(common::SlowInserts::new(
        rows.clone(),
        std::time::Duration::from_millis(200),
    ));
    let source = Arc::new(StaticEvents::new(vec![sample_event("101", "Game Night")]));
    let cancel = CancellationToken::new();
    let mut page = budgetit_app::pages::CreatePlanPage::new(
        "101".to_string(),
        source,
        backend::repositories::PlanRepository::new(slow.clone()),
        backend::repositories::OrganizationRepository::new(slow.clone()),
        backend::repositories::ExpenseRepository::new(slow),
        cancel.clone(),
    );

    page.load(None, None).await;
    assert_eq!(*page.state(), CreatePlanState::Ready);
    page.editor.add(new_expense("pizza", 30)).unwrap();

    // Cancel while the plan insert is still in flight.
    let (result, _) = tokio::join!(page.submit(), async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        cancel.cancel();
    });

    assert!(result.is_ok());
    assert_eq!(*page.state(), CreatePlanState::Ready);
    assert_eq!(page.editor.expenses().len(), 1);
}

#[tokio::test]
async fn test_cancelled_load_leaves_state_untouched() {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(StaticEvents::new(vec![sample_event("101", "Game Night")]));
    let cancel = CancellationToken::new();
    let mut page = create_page("101", source, store, cancel.clone());

    cancel.cancel();
    page.load(None, None).await;
    assert_eq!(*page.state(), CreatePlanState::Loading);
}

#[tokio::test]
async fn test_existing_expenses_elsewhere_do_not_leak_into_a_new_plan() {
    let store = Arc::new(MemoryStore::new());
    store.seed("plan", vec![plan_row(7, 202)]);
    store.seed("expenses", vec![expense_row(1, 7, "other plan", "5")]);
    let source = Arc::new(StaticEvents::new(vec![sample_event("101", "Game Night")]));
    let mut page = create_page("101", source, store.clone(), CancellationToken::new());

    page.load(None, None).await;
    assert_eq!(*page.state(), CreatePlanState::Ready);
    assert!(page.editor.expenses().is_empty());
}
