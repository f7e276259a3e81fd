//! Exercise definitions
//!
//! An [`Exercise`] bundles everything one coding task needs: how the
//! learner's text is wrapped, tutor-authored companion fragments, the
//! scenario script, and the feedback policy. [`SqlExercise`] is the data
//! track's counterpart. Both deserialize from TOML or JSON.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::compiler::SourceShape;
use crate::harness::ScenarioStep;

/// Feedback policy for failed steps.
///
/// `Specific` shows the authored hint (plus engine detail such as
/// did-you-mean suggestions); `Withheld` replaces every hint with one fixed
/// message, for exam-style exercises where the learner must debug alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintStyle {
    Specific,
    Withheld,
}

impl Default for HintStyle {
    fn default() -> Self {
        HintStyle::Specific
    }
}

fn default_success_feedback() -> String {
    "All checks passed. Well done!".to_string()
}

/// One coding exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub shape: SourceShape,
    /// Companion fragments compiled into the same unit as the learner's
    /// text (e.g. a base class the learner must extend).
    #[serde(default)]
    pub auxiliary: Vec<String>,
    #[serde(default)]
    pub hint_style: HintStyle,
    #[serde(default = "default_success_feedback")]
    pub success_feedback: String,
    #[serde(rename = "step", default)]
    pub steps: Vec<ScenarioStep>,
}

impl Exercise {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid exercise definition (TOML)")
    }

    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid exercise definition (JSON)")
    }
}

/// One SQL exercise: a setup script building the ephemeral database, the
/// expected result grid, and optionally a verification query for mutation
/// tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlExercise {
    pub id: String,
    pub title: String,
    /// DDL/DML batch run against a fresh in-memory database before the
    /// learner's statement.
    pub setup: String,
    /// For mutation exercises: the query whose rows are compared after the
    /// learner's statement ran. `None` means the learner's own statement
    /// must be a query.
    #[serde(default)]
    pub verification: Option<String>,
    /// Expected rows, outer Vec in order, cells already rendered as text.
    pub expected: Vec<Vec<String>>,
    #[serde(default = "default_success_feedback")]
    pub success_feedback: String,
}

impl SqlExercise {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid SQL exercise definition (TOML)")
    }

    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid SQL exercise definition (JSON)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_from_toml() {
        let text = r#"
id = "zoo_1"
title = "Die Klasse Tier"
success_feedback = "Sehr gut!"

[[step]]
kind = "require_class"
class = "Tier"
hint = "Lege die Klasse Tier an."

[[step]]
kind = "construct"
class = "Tier"
args = ["Elefant", 4]
bind = "t"
hint = "Tier konnte nicht erzeugt werden."

[[step]]
kind = "invoke"
on = "t"
method = "GetAlter"
expect = 4
hint = "GetAlter liefert das falsche Ergebnis."
"#;
        let exercise = Exercise::from_toml_str(text).unwrap();
        assert_eq!(exercise.id, "zoo_1");
        assert_eq!(exercise.shape, SourceShape::FullClass);
        assert_eq!(exercise.hint_style, HintStyle::Specific);
        assert_eq!(exercise.steps.len(), 3);
        assert_eq!(exercise.success_feedback, "Sehr gut!");
    }

    #[test]
    fn test_exercise_from_json_with_shape_and_style() {
        let text = r#"{
            "id": "intro_2",
            "title": "Verdoppeln",
            "shape": { "kind": "method_body", "wrapper_class": "Aufgabe" },
            "hint_style": "withheld",
            "step": [
                {
                    "kind": "require_method",
                    "class": "Aufgabe",
                    "method": "Verdopple",
                    "params": ["int"],
                    "returns": "int",
                    "hint": "Verdopple fehlt."
                }
            ]
        }"#;
        let exercise = Exercise::from_json_str(text).unwrap();
        assert_eq!(
            exercise.shape,
            SourceShape::MethodBody {
                wrapper_class: "Aufgabe".into()
            }
        );
        assert_eq!(exercise.hint_style, HintStyle::Withheld);
        assert_eq!(exercise.success_feedback, "All checks passed. Well done!");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = Exercise::from_toml_str("id = 42").unwrap_err();
        assert!(err.to_string().contains("invalid exercise definition"));
    }

    #[test]
    fn test_sql_exercise_from_toml() {
        let text = r#"
id = "buch_1"
title = "Alle Bücher"
setup = """
CREATE TABLE Buch (Titel TEXT, Preis REAL);
INSERT INTO Buch VALUES ('Faust', 9.95);
"""
expected = [["Faust", "9.95"]]
"#;
        let exercise = SqlExercise::from_toml_str(text).unwrap();
        assert_eq!(exercise.id, "buch_1");
        assert!(exercise.verification.is_none());
        assert_eq!(exercise.expected, vec![vec!["Faust", "9.95"]]);
    }
}
