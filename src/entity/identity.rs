use crate::{ActiveValue, Column, Expression, Target, Value, is_zero};

/// Collect the primary key values of every record in `target`.
///
/// Records whose key is entirely absent, unset or zero carry no identity and are skipped,
/// as are duplicate keys.
pub fn get_identity_field_values(target: &Target, columns: &[&str]) -> Vec<Vec<Value>> {
    let mut rows: Vec<Vec<Value>> = Vec::new();
    if columns.is_empty() {
        return rows;
    }

    for record in target.records() {
        let mut row = Vec::with_capacity(columns.len());
        let mut not_zero = false;
        for column in columns {
            let value = match record.get_active(column) {
                Some(ActiveValue::Set(v)) | Some(ActiveValue::Unchanged(v)) => v.clone(),
                Some(ActiveValue::NotSet) | None => Value::String(None),
            };
            not_zero |= !is_zero(&value);
            row.push(value);
        }
        if not_zero && !rows.contains(&row) {
            rows.push(row);
        }
    }

    rows
}

/// `key IN (..)` over the table of the statement; `None` if there are no rows
pub fn to_query_values(columns: &[&str], rows: Vec<Vec<Value>>) -> Option<Expression> {
    let columns = columns.iter().map(|c| Column::current(*c)).collect();
    Expression::in_tuples(columns, rows)
}
