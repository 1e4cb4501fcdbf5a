//! Domain models.

pub mod event;
pub mod expense;
pub mod organization;
pub mod plan;
pub mod profile;

pub use event::{event_id_from_guid, EventRecord};
pub use expense::{Expense, ExpenseId, NewExpense};
pub use organization::Organization;
pub use plan::Plan;
pub use profile::{default_username, Profile};
