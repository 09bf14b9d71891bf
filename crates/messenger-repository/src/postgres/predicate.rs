//! Renders an [`AddressPredicate`] as a SQL `WHERE` clause.

use messenger_core::AddressPredicate;
use sqlx::{Postgres, QueryBuilder};

/// Appends ` WHERE TRUE AND col = $n ...` to `builder`.
///
/// Column names come from a closed enum; values are always bound.
pub(crate) fn push_where(builder: &mut QueryBuilder<'_, Postgres>, predicate: &AddressPredicate) {
    builder.push(" WHERE TRUE");
    for condition in predicate.conditions() {
        builder.push(" AND ");
        if condition.field.is_numeric() {
            builder.push(format!("CAST({} AS TEXT)", condition.field.column()));
        } else {
            builder.push(condition.field.column());
        }
        builder.push(" = ");
        builder.push_bind(condition.value.clone());
    }
}
