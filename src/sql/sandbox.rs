//! Ephemeral SQL sandbox
//!
//! Every attempt gets a fresh in-memory database: the setup batch rebuilds
//! the schema and seed rows, the learner's statement runs once, and the
//! connection is dropped. Nothing persists between attempts, so destructive
//! statements are harmless by construction.

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::debug;

use crate::sql::compat;

/// Ordered rows of rendered cell text.
pub type RowSet = Vec<Vec<String>>;

/// The observable result of one attempt against the sandbox.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRun {
    /// For queries: the result grid. For mutations: the verification
    /// query's grid (empty when no verification query exists).
    pub rows: RowSet,
    /// Rows changed by a mutation; `None` for plain queries.
    pub rows_affected: Option<usize>,
    pub was_select: bool,
}

/// Run one learner statement in a fresh database.
///
/// The statement is dialect-rewritten first; it counts as a query iff the
/// rewritten text starts with `SELECT`. Mutations execute and are then
/// observed through `verification`, which runs un-rewritten (it is
/// tutor-authored).
pub fn run_query(
    setup: &str,
    statement: &str,
    verification: Option<&str>,
) -> Result<QueryRun, rusqlite::Error> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(setup)?;

    let rewritten = compat::rewrite(statement);
    let was_select = rewritten
        .trim_start()
        .to_uppercase()
        .starts_with("SELECT");
    debug!(was_select, "running sandboxed statement");

    if was_select {
        let rows = query_rows(&conn, &rewritten)?;
        return Ok(QueryRun {
            rows,
            rows_affected: None,
            was_select: true,
        });
    }

    let affected = conn.execute(&rewritten, [])?;
    let rows = match verification {
        Some(query) => query_rows(&conn, query)?,
        None => Vec::new(),
    };
    Ok(QueryRun {
        rows,
        rows_affected: Some(affected),
        was_select: false,
    })
}

fn query_rows(conn: &Connection, sql: &str) -> Result<RowSet, rusqlite::Error> {
    let mut stmt = conn.prepare(sql)?;
    let columns = stmt.column_count();
    let mut rows = stmt.query([])?;
    let mut out: RowSet = Vec::new();
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(columns);
        for i in 0..columns {
            cells.push(render_cell(row.get_ref(i)?));
        }
        out.push(cells);
    }
    Ok(out)
}

/// Render one cell the way expected grids are authored. Floats use Rust's
/// shortest-roundtrip formatting, so `9.95` renders as `9.95`.
fn render_cell(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(v) => v.to_string(),
        ValueRef::Real(v) => v.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETUP: &str = "
        CREATE TABLE Buch (Titel TEXT, Preis REAL, Jahr INTEGER);
        INSERT INTO Buch VALUES ('Faust', 9.95, 1808);
        INSERT INTO Buch VALUES ('Die Verwandlung', 7.50, 1915);
    ";

    #[test]
    fn test_select_returns_rendered_rows() {
        let run = run_query(SETUP, "SELECT Titel, Preis FROM Buch ORDER BY Jahr", None).unwrap();
        assert!(run.was_select);
        assert_eq!(run.rows_affected, None);
        assert_eq!(
            run.rows,
            vec![
                vec!["Faust".to_string(), "9.95".to_string()],
                vec!["Die Verwandlung".to_string(), "7.5".to_string()],
            ]
        );
    }

    #[test]
    fn test_mutation_observed_through_verification() {
        let run = run_query(
            SETUP,
            "UPDATE Buch SET Preis = 5.0 WHERE Jahr < 1900",
            Some("SELECT Titel, Preis FROM Buch WHERE Preis = 5.0"),
        )
        .unwrap();
        assert!(!run.was_select);
        assert_eq!(run.rows_affected, Some(1));
        assert_eq!(run.rows, vec![vec!["Faust".to_string(), "5".to_string()]]);
    }

    #[test]
    fn test_null_and_integer_rendering() {
        let run = run_query(
            "CREATE TABLE T (A INTEGER, B TEXT);
             INSERT INTO T VALUES (42, NULL);",
            "SELECT A, B FROM T",
            None,
        )
        .unwrap();
        assert_eq!(run.rows, vec![vec!["42".to_string(), "NULL".to_string()]]);
    }

    #[test]
    fn test_bad_statement_is_an_error() {
        let result = run_query(SETUP, "SELEKT * FROM Buch", None);
        assert!(result.is_err());
    }

    #[test]
    fn test_each_run_starts_fresh() {
        // A destructive statement in one run leaves no trace in the next.
        run_query(SETUP, "DELETE FROM Buch", None).unwrap();
        let run = run_query(SETUP, "SELECT Titel FROM Buch ORDER BY Titel", None).unwrap();
        assert_eq!(run.rows.len(), 2);
    }

    #[test]
    fn test_dialect_rewrite_applies_to_learner_statement() {
        let run = run_query(
            SETUP,
            "SELECT CONCAT(Titel, '!') FROM Buch WHERE Jahr = 1808",
            None,
        )
        .unwrap();
        assert_eq!(run.rows, vec![vec!["Faust!".to_string()]]);
    }
}
