//! Compilation service
//!
//! Turns learner text into a uniquely named [`LoadedUnit`] or a list of
//! diagnostics. Before parsing, a synthetic header is injected ahead of the
//! learner's text: one `using` line per granted reference plus a blank line,
//! and for method-body exercises an enclosing wrapper class. Raw diagnostic
//! lines are relative to that synthesized source; callers remap them with
//! `header_lines` before showing them.
//!
//! Two entry points:
//! - [`compile`] for the evaluation pipeline (blocking, run it off the
//!   async runtime),
//! - [`analyze`] for live underlining while the learner types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::diagnostics::{remap_live, Diagnostic, Severity};
use crate::lang::{parser, ClassTable, LoadedUnit};

/// Message prefix on diagnostics from auxiliary fragments. Their lines are
/// fragment-relative (no injected header), so the remapper must leave them
/// alone.
pub const AUXILIARY_TAG: &str = "auxiliary fragment: ";

/// The references (simulated namespaces) granted to an exercise. A `using`
/// directive naming anything else draws a warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSet(pub Vec<String>);

impl ReferenceSet {
    /// The default grant every exercise starts from.
    pub fn standard() -> Self {
        Self(vec![
            "System".to_string(),
            "System.Collections.Generic".to_string(),
            "System.Linq".to_string(),
        ])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|r| r == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ReferenceSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// How the learner's text is wrapped before compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceShape {
    /// The learner writes complete class declarations.
    FullClass,
    /// The learner writes only members; they are wrapped in a synthetic
    /// class so early exercises can skip class syntax.
    MethodBody { wrapper_class: String },
}

impl Default for SourceShape {
    fn default() -> Self {
        SourceShape::FullClass
    }
}

/// One compilation request. Fields are owned so the whole request can move
/// onto a blocking worker.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub exercise_id: String,
    pub main_text: String,
    /// Tutor-authored companion fragments compiled into the same unit.
    pub auxiliary: Vec<String>,
    pub shape: SourceShape,
    pub references: ReferenceSet,
}

/// Result of a compilation attempt. Both variants carry `header_lines` so
/// the caller can remap raw diagnostic positions.
#[derive(Debug)]
pub enum CompilationOutcome {
    /// At least one error; the unit was not produced.
    Diagnostics {
        diagnostics: Vec<Diagnostic>,
        header_lines: usize,
    },
    /// A loaded unit, possibly with warnings.
    Unit {
        unit: LoadedUnit,
        warnings: Vec<Diagnostic>,
        header_lines: usize,
    },
}

/// Number of injected lines ahead of the learner's first line.
fn header_line_count(shape: &SourceShape, references: &ReferenceSet) -> usize {
    match shape {
        SourceShape::FullClass => references.len() + 1,
        SourceShape::MethodBody { .. } => references.len() + 2,
    }
}

/// Synthesize the full source the parser sees.
fn synthesize(main_text: &str, shape: &SourceShape, references: &ReferenceSet) -> String {
    let mut source = String::new();
    for reference in &references.0 {
        source.push_str("using ");
        source.push_str(reference);
        source.push_str(";\n");
    }
    source.push('\n');
    match shape {
        SourceShape::FullClass => {
            source.push_str(main_text);
        }
        SourceShape::MethodBody { wrapper_class } => {
            source.push_str("class ");
            source.push_str(wrapper_class);
            source.push_str(" {\n");
            source.push_str(main_text);
            source.push_str("\n}\n");
        }
    }
    source
}

/// Compile a request into a unit or diagnostics. Blocking; the scheduler
/// runs this on a worker thread.
pub fn compile(request: CompileRequest) -> CompilationOutcome {
    let header_lines = header_line_count(&request.shape, &request.references);
    let source = synthesize(&request.main_text, &request.shape, &request.references);

    let (program, mut diagnostics) = parser::parse(&source);

    // Unknown `using` directives are the engine's only warning.
    for (name, line) in &program.usings {
        if !request.references.contains(name) {
            diagnostics.push(Diagnostic::warning(
                format!("unknown reference '{}'", name),
                *line,
            ));
        }
    }

    let mut classes = program.classes;

    // Companion fragments share the unit but never the learner's header, so
    // their diagnostics are tagged rather than remapped.
    for fragment in &request.auxiliary {
        let (aux_program, aux_diags) = parser::parse(fragment);
        for diag in aux_diags {
            diagnostics.push(Diagnostic {
                severity: diag.severity,
                message: format!("{}{}", AUXILIARY_TAG, diag.message),
                line: diag.line,
            });
        }
        classes.extend(aux_program.classes);
    }

    // Whole-unit checks the parser cannot see.
    let mut seen: Vec<&str> = Vec::new();
    for class in &classes {
        if seen.contains(&class.name.as_str()) {
            diagnostics.push(Diagnostic::error(
                format!("class '{}' is declared more than once", class.name),
                class.line,
            ));
        } else {
            seen.push(&class.name);
        }
        if let Some(parent) = &class.parent {
            if !classes.iter().any(|c| &c.name == parent) {
                diagnostics.push(Diagnostic::error(
                    format!("unknown base class '{}' for '{}'", parent, class.name),
                    class.line,
                ));
            }
        }

        // Inheritance cycles must die here: downstream parent walks assume
        // acyclic chains.
        let mut chain = vec![class.name.as_str()];
        let mut current = class.parent.as_deref();
        while let Some(parent) = current {
            if chain.contains(&parent) {
                diagnostics.push(Diagnostic::error(
                    format!("inheritance cycle involving '{}'", class.name),
                    class.line,
                ));
                break;
            }
            chain.push(parent);
            current = classes
                .iter()
                .find(|c| c.name == parent)
                .and_then(|c| c.parent.as_deref());
        }
    }

    if diagnostics.iter().any(|d| d.severity == Severity::Error) {
        tracing::debug!(
            exercise_id = %request.exercise_id,
            count = diagnostics.len(),
            "compilation produced errors"
        );
        return CompilationOutcome::Diagnostics {
            diagnostics,
            header_lines,
        };
    }

    let name = format!(
        "unit_{}_{}",
        request.exercise_id,
        Uuid::new_v4().simple()
    );
    tracing::debug!(unit = %name, classes = classes.len(), "compilation succeeded");

    CompilationOutcome::Unit {
        unit: LoadedUnit::new(name, ClassTable::new(classes)),
        warnings: diagnostics,
        header_lines,
    }
}

/// Parse-only pass for live underlining. Returns diagnostics already
/// remapped to learner-visible lines; positions inside the injected header
/// are discarded rather than clamped.
pub fn analyze(
    main_text: &str,
    shape: &SourceShape,
    references: &ReferenceSet,
) -> Vec<Diagnostic> {
    let header_lines = header_line_count(shape, references);
    let source = synthesize(main_text, shape, references);
    let (_, diagnostics) = parser::parse(&source);

    diagnostics
        .into_iter()
        .filter_map(|d| {
            remap_live(d.line, header_lines).map(|line| Diagnostic {
                severity: d.severity,
                message: d.message,
                line,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(main_text: &str) -> CompileRequest {
        CompileRequest {
            exercise_id: "test".into(),
            main_text: main_text.into(),
            auxiliary: Vec::new(),
            shape: SourceShape::FullClass,
            references: ReferenceSet::standard(),
        }
    }

    #[test]
    fn test_compile_full_class() {
        let outcome = compile(request("class Tier { public Tier() {} }"));
        match outcome {
            CompilationOutcome::Unit {
                unit,
                warnings,
                header_lines,
            } => {
                assert!(unit.find_class("Tier").is_some());
                assert!(warnings.is_empty());
                assert_eq!(header_lines, 4);
                assert!(unit.name().starts_with("unit_test_"));
            }
            other => panic!("expected a unit, got {:?}", other),
        }
    }

    #[test]
    fn test_unit_names_are_unique() {
        let a = compile(request("class A {}"));
        let b = compile(request("class A {}"));
        match (a, b) {
            (
                CompilationOutcome::Unit { unit: ua, .. },
                CompilationOutcome::Unit { unit: ub, .. },
            ) => assert_ne!(ua.name(), ub.name()),
            _ => panic!("expected units"),
        }
    }

    #[test]
    fn test_error_lines_are_raw_until_remapped() {
        // Learner line 1 (0-based) holds the bad declaration; the standard
        // header adds 4 lines, so the raw diagnostic sits at line 5.
        let outcome = compile(request("class Kaputt {\n    int b = ;\n}"));
        match outcome {
            CompilationOutcome::Diagnostics {
                diagnostics,
                header_lines,
            } => {
                assert_eq!(header_lines, 4);
                assert!(diagnostics.iter().any(|d| d.line == 5));
            }
            other => panic!("expected diagnostics, got {:?}", other),
        }
    }

    #[test]
    fn test_method_body_shape_wraps_members() {
        let outcome = compile(CompileRequest {
            shape: SourceShape::MethodBody {
                wrapper_class: "Aufgabe".into(),
            },
            ..request("public int Verdopple(int x) { return x * 2; }")
        });
        match outcome {
            CompilationOutcome::Unit {
                unit, header_lines, ..
            } => {
                assert_eq!(header_lines, 5);
                let class = unit.find_class("Aufgabe").unwrap();
                assert!(class.find_method("Verdopple").is_some());
            }
            other => panic!("expected a unit, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_using_is_a_warning_not_an_error() {
        let outcome = compile(request("using System.Quatsch;\nclass A {}"));
        match outcome {
            CompilationOutcome::Unit { warnings, .. } => {
                assert_eq!(warnings.len(), 1);
                assert!(warnings[0].message.contains("System.Quatsch"));
                assert_eq!(warnings[0].severity, Severity::Warning);
            }
            other => panic!("expected a unit, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let outcome = compile(request("class A {}\nclass A {}"));
        match outcome {
            CompilationOutcome::Diagnostics { diagnostics, .. } => {
                assert!(diagnostics
                    .iter()
                    .any(|d| d.message.contains("more than once")));
            }
            other => panic!("expected diagnostics, got {:?}", other),
        }
    }

    #[test]
    fn test_inheritance_cycle_rejected() {
        let outcome = compile(request("class A : B {}\nclass B : A {}"));
        match outcome {
            CompilationOutcome::Diagnostics { diagnostics, .. } => {
                assert!(diagnostics
                    .iter()
                    .any(|d| d.message.contains("inheritance cycle")));
            }
            other => panic!("expected diagnostics, got {:?}", other),
        }

        // Self-inheritance is the one-class cycle.
        let outcome = compile(request("class A : A {}"));
        match outcome {
            CompilationOutcome::Diagnostics { diagnostics, .. } => {
                assert!(diagnostics
                    .iter()
                    .any(|d| d.message.contains("inheritance cycle")));
            }
            other => panic!("expected diagnostics, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let outcome = compile(request("class Loewe : Tier {}"));
        match outcome {
            CompilationOutcome::Diagnostics { diagnostics, .. } => {
                assert!(diagnostics.iter().any(|d| d.message.contains("Tier")));
            }
            other => panic!("expected diagnostics, got {:?}", other),
        }
    }

    #[test]
    fn test_auxiliary_fragments_join_the_unit() {
        let outcome = compile(CompileRequest {
            auxiliary: vec!["class Tier { public Tier() {} }".into()],
            ..request("class Loewe : Tier { public Loewe() : base() {} }")
        });
        match outcome {
            CompilationOutcome::Unit { unit, .. } => {
                assert!(unit.find_class("Tier").is_some());
                assert!(unit.find_class("Loewe").is_some());
            }
            other => panic!("expected a unit, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_drops_header_positions() {
        // An error in the learner's text surfaces at the learner-visible
        // line; analyze never reports positions the learner cannot see.
        let diags = analyze(
            "class Kaputt {\n    int b = ;\n}",
            &SourceShape::FullClass,
            &ReferenceSet::standard(),
        );
        assert!(!diags.is_empty());
        assert!(diags.iter().all(|d| d.line <= 2));
        assert!(diags.iter().any(|d| d.line == 1));
    }
}
