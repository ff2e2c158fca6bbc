//! Service layer for the finance tracker
//!
//! Services sit on top of `Storage`: they validate input, apply the change,
//! save through `Storage::commit` and log what happened. Budget and
//! prediction math live here as pure functions.

pub mod bill;
pub mod budget;
pub mod prediction;
pub mod transaction;

pub use bill::BillService;
pub use budget::{calculate_budget, classify_spending, BudgetService, BudgetSummary};
pub use prediction::{predict, predict_with_fallback, PredictionConfig, PredictionStrategy};
pub use transaction::{TransactionFilter, TransactionService};
