//! Computes an ordered, partitioned [`MigrationPlan`] that transforms a
//! current [`schema_model::Schema`] into a desired one, ordering tables by
//! foreign-key dependency along the way.

mod column_diff;
mod constraint_diff;
mod dependency;
mod error;
mod index_diff;
mod pair;
mod pk_diff;
mod planner;
mod type_convert;

pub use dependency::DependencyResolver;
pub use error::{DependencyError, DifferError};
pub use pair::Pair;
pub use planner::{diff, MigrationPlan, PlannerOptions};
