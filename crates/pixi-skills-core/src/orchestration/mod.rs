//! Reconciliation of desired skill selections against installed links.

pub mod reconcile;
pub mod relink;

pub use reconcile::{
    LinkAction, LinkOperation, LinkOutcome, ReconcilePlan, ReconcileReport, apply_plan,
};
pub use relink::{ListingError, RelinkOutcome, RelinkReport, relink};
