//! Page controllers, one per route.

pub mod auth;
pub mod create_plan;
pub mod edit_plan;
pub mod event;
pub mod events;
pub mod expense_editor;

pub use auth::{AuthMode, AuthPage};
pub use create_plan::{CreatePlanPage, CreatePlanState};
pub use edit_plan::{EditPlanPage, EditPlanState};
pub use event::EventPage;
pub use events::{EventsPage, EventsView};
pub use expense_editor::ExpenseEditor;
