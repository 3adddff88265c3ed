//! Sparse `UPDATE tasks` construction.
//!
//! Columns are visited in a fixed order (title, description, completed,
//! due_date) so the same subset of fields always yields the same statement
//! text, with `$1..$N` bound in that order and the task id bound last.

use sea_orm::{DbBackend, Statement, Value};
use uuid::Uuid;

use crate::models::UpdateTask;
use crate::postgres::TASK_COLUMNS;

/// Right-hand side of one `column = ...` assignment.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Assignment {
    /// Bind the value to the next placeholder
    Bind(Value),
    /// Literal `NULL`, consumes no placeholder
    Null,
}

struct UpdatableField {
    column: &'static str,
    setter: fn(&UpdateTask) -> Option<Assignment>,
}

const UPDATABLE_FIELDS: [UpdatableField; 4] = [
    UpdatableField {
        column: "title",
        setter: |u| u.title.clone().map(|v| Assignment::Bind(v.into())),
    },
    UpdatableField {
        column: "description",
        setter: |u| u.description.clone().map(|v| Assignment::Bind(v.into())),
    },
    UpdatableField {
        column: "completed",
        setter: |u| u.completed.map(|v| Assignment::Bind(v.into())),
    },
    UpdatableField {
        column: "due_date",
        // The clear flag wins; callers reject requests carrying both.
        setter: |u| {
            if u.clear_due_date {
                Some(Assignment::Null)
            } else {
                u.due_date.map(|v| Assignment::Bind(v.into()))
            }
        },
    },
];

/// Output of [`build_update`]: SQL text plus positional values.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UpdateStatement {
    pub sql: String,
    pub values: Vec<Value>,
}

impl UpdateStatement {
    pub fn into_statement(self) -> Statement {
        Statement::from_sql_and_values(DbBackend::Postgres, self.sql, self.values)
    }
}

/// Build `UPDATE tasks SET ... WHERE id = $N RETURNING ...`.
///
/// Returns `None` when the request carries nothing to set; such a statement
/// must not be executed.
pub(crate) fn build_update(id: Uuid, update: &UpdateTask) -> Option<UpdateStatement> {
    let mut assignments = Vec::with_capacity(UPDATABLE_FIELDS.len() + 1);
    let mut values = Vec::with_capacity(UPDATABLE_FIELDS.len() + 1);

    for field in &UPDATABLE_FIELDS {
        match (field.setter)(update) {
            Some(Assignment::Bind(value)) => {
                values.push(value);
                assignments.push(format!("{} = ${}", field.column, values.len()));
            }
            Some(Assignment::Null) => assignments.push(format!("{} = NULL", field.column)),
            None => {}
        }
    }

    if assignments.is_empty() {
        return None;
    }

    assignments.push("updated_at = now()".to_string());
    values.push(id.into());

    let sql = format!(
        "UPDATE tasks SET {} WHERE id = ${} RETURNING {}",
        assignments.join(", "),
        values.len(),
        TASK_COLUMNS
    );

    Some(UpdateStatement { sql, values })
}
