//! Repositories over the row-store contract.

pub mod expense;
pub mod organization;
pub mod plan;
pub mod profile;

pub use expense::ExpenseRepository;
pub use organization::OrganizationRepository;
pub use plan::PlanRepository;
pub use profile::ProfileRepository;
