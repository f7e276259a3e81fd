//! End-to-end coverage of the data track: sandbox, dialect shims, and the
//! row-set comparator driven through the scheduler.

use elitecode_engine::{EngineConfig, ReferenceSet, Scheduler, SqlExercise, Verdict};

fn scheduler() -> Scheduler {
    Scheduler::new(EngineConfig::default(), ReferenceSet::standard())
}

fn buch_exercise() -> SqlExercise {
    SqlExercise::from_toml_str(
        r#"
id = "buch_1"
title = "Titel und Preis"
setup = """
CREATE TABLE Buch (Titel TEXT, Preis REAL, Jahr INTEGER);
INSERT INTO Buch VALUES ('Faust', 9.95, 1808);
INSERT INTO Buch VALUES ('Die Verwandlung', 7.5, 1915);
"""
expected = [["Faust", "9.95"], ["Die Verwandlung", "7.5"]]
success_feedback = "Richtig!"
"#,
    )
    .expect("exercise definition")
}

#[test]
fn correct_query_passes() {
    let verdict = scheduler().run_query_attempt(
        &buch_exercise(),
        "SELECT Titel, Preis FROM Buch ORDER BY Jahr",
    );
    assert_eq!(
        verdict,
        Verdict::Success {
            feedback: "Richtig!".into()
        }
    );
}

#[test]
fn missing_column_fails_on_row_width() {
    // The learner selects only Titel; every row is narrower than expected,
    // so the attempt fails even though the Titel cells all match.
    let verdict = scheduler().run_query_attempt(
        &buch_exercise(),
        "SELECT Titel FROM Buch ORDER BY Jahr",
    );
    assert_eq!(verdict.kind(), "contract_violation");
}

#[test]
fn wrong_order_fails() {
    let verdict = scheduler().run_query_attempt(
        &buch_exercise(),
        "SELECT Titel, Preis FROM Buch ORDER BY Titel",
    );
    assert_eq!(verdict.kind(), "contract_violation");
}

#[test]
fn syntax_error_is_a_runtime_fault() {
    let verdict = scheduler().run_query_attempt(&buch_exercise(), "SELEKT * FROM Buch");
    match verdict {
        Verdict::RuntimeFault { message } => {
            assert!(message.starts_with("SQL error:"), "message: {}", message);
        }
        other => panic!("expected RuntimeFault, got {:?}", other),
    }
}

#[test]
fn mutation_exercise_uses_the_verification_query() {
    let exercise = SqlExercise::from_toml_str(
        r#"
id = "buch_2"
title = "Klassiker verbilligen"
setup = """
CREATE TABLE Buch (Titel TEXT, Preis REAL, Jahr INTEGER);
INSERT INTO Buch VALUES ('Faust', 9.95, 1808);
INSERT INTO Buch VALUES ('Die Verwandlung', 7.5, 1915);
"""
verification = "SELECT Titel, Preis FROM Buch ORDER BY Jahr"
expected = [["Faust", "5"], ["Die Verwandlung", "7.5"]]
success_feedback = "Richtig!"
"#,
    )
    .expect("exercise definition");

    let scheduler = scheduler();
    let verdict = scheduler.run_query_attempt(
        &exercise,
        "UPDATE Buch SET Preis = 5.0 WHERE Jahr < 1900",
    );
    assert_eq!(
        verdict,
        Verdict::Success {
            feedback: "Richtig! (1 rows affected)".into()
        }
    );

    // An update that touches the wrong rows fails against the same grid.
    let verdict = scheduler.run_query_attempt(&exercise, "UPDATE Buch SET Preis = 5.0");
    assert_eq!(verdict.kind(), "contract_violation");
}

#[test]
fn classroom_mysql_constructs_are_translated() {
    let exercise = SqlExercise::from_toml_str(
        r#"
id = "autor_1"
title = "Volle Namen"
setup = """
CREATE TABLE Autor (Vorname TEXT, Nachname TEXT);
INSERT INTO Autor VALUES ('Johann', 'Goethe');
"""
expected = [["Johann Goethe"]]
success_feedback = "Richtig!"
"#,
    )
    .expect("exercise definition");

    let verdict = scheduler().run_query_attempt(
        &exercise,
        "# voller Name\nSELECT CONCAT(Vorname, ' ', Nachname) FROM Autor",
    );
    assert!(verdict.is_success(), "got {:?}", verdict);
}

#[test]
fn session_variables_are_substituted() {
    let exercise = SqlExercise::from_toml_str(
        r#"
id = "buch_3"
title = "Preisgrenze"
setup = """
CREATE TABLE Buch (Titel TEXT, Preis REAL);
INSERT INTO Buch VALUES ('Faust', 9.95);
INSERT INTO Buch VALUES ('Die Verwandlung', 7.5);
"""
expected = [["Die Verwandlung"]]
success_feedback = "Richtig!"
"#,
    )
    .expect("exercise definition");

    let verdict = scheduler().run_query_attempt(
        &exercise,
        "SET @grenze := 8; SELECT Titel FROM Buch WHERE Preis < @grenze",
    );
    assert!(verdict.is_success(), "got {:?}", verdict);
}

#[test]
fn destructive_statements_cannot_poison_later_attempts() {
    let exercise = buch_exercise();
    let scheduler = scheduler();

    // First attempt wipes its own throwaway database.
    let verdict = scheduler.run_query_attempt(&exercise, "DELETE FROM Buch");
    assert_eq!(verdict.kind(), "contract_violation");

    // The next attempt still sees the full seed data.
    let verdict = scheduler.run_query_attempt(
        &exercise,
        "SELECT Titel, Preis FROM Buch ORDER BY Jahr",
    );
    assert!(verdict.is_success(), "got {:?}", verdict);
}
