//! Fluent builders accumulating operation IR.
//!
//! Builder methods are total: invalid input is remembered and surfaced
//! when `execute()` runs, so chains never panic halfway through
//! construction.

mod delete;
mod insert;
mod select;
mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::SelectBuilder;
pub use update::UpdateBuilder;
