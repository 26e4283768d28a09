//! Query planning: from a bag of optional filters to one store operation.

mod condition;
pub mod cursor;
mod error;
mod filters;
mod normalize;
mod planner;
mod schema;

pub use condition::{compare_values, values_equal, Condition, SortKeyCondition};
pub use error::PlanError;
pub use filters::{FilterValue, Filters};
pub use normalize::title_case;
pub use planner::{
    plan, Operation, Pagination, Plan, Strategy, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use schema::{EntitySchema, FilterField, FilterKind};
