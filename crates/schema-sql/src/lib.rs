//! Shared SQL helpers invoked by both the parser (expression round-tripping)
//! and the differ (statement synthesis).

mod expression;
mod quote;
mod render;

pub use expression::serialize_expr;
pub use quote::quote_ident;
pub use render::{
    render_add_check, render_add_column, render_add_foreign_key, render_add_primary_key, render_add_unique,
    render_alter_column_type, render_check_fragment, render_create_index, render_create_table, render_drop_check,
    render_drop_column, render_drop_default, render_drop_foreign_key, render_drop_index, render_drop_not_null,
    render_drop_primary_key, render_drop_table, render_drop_unique, render_foreign_key_fragment,
    render_primary_key_fragment, render_set_default, render_set_not_null, render_unique_fragment,
};
