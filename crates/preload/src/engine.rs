//! Plan rewriting for filtered includes.
//!
//! Each submodule is one rewriting step. The include planner in [`include`]
//! drives them once per navigation of an include path.

pub mod filter;
pub use filter::translate_filter;

pub(crate) mod include;

pub mod join_predicate;
pub use join_predicate::build_join_predicate;

pub mod lift_order_by;
pub use lift_order_by::lift_order_by;

#[cfg(test)]
mod tests;
