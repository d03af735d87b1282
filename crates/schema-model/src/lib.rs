//! The normalized, in-memory schema model shared by the parser, the
//! introspector, and the differ.
//!
//! Values here are plain data: nothing in this crate talks to a database or
//! a parser. `Schema` values are constructed once and never mutated —
//! callers that need a modified schema build a new one.

mod column;
mod constraint;
mod enum_type;
mod error;
mod index;
mod schema;
mod table;

pub use column::Column;
pub use constraint::{CheckConstraint, ForeignKeyConstraint, PrimaryKeyConstraint, ReferentialAction, UniqueConstraint};
pub use enum_type::EnumType;
pub use error::ModelError;
pub use index::{Index, IndexMethod};
pub use schema::Schema;
pub use table::Table;
