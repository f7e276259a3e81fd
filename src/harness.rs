//! Assertion harness
//!
//! Drives a tutor-authored scenario script against a compiled unit. Each
//! step either inspects the unit through capability lookups (cheap, never
//! guarded) or executes learner code (constructor calls, method calls),
//! which runs under the per-step guard so a single hot loop cannot stall
//! the attempt for more than `step_timeout`.
//!
//! Steps run strictly in order and the first failure is terminal: every
//! exit path reduces to one [`Verdict`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::exercise::{Exercise, HintStyle};
use crate::lang::{read_field, ExecError, LoadedUnit, TypeName, Value};
use crate::scheduler::CancelToken;
use crate::timeout::{race_blocking, GuardOutcome};
use crate::util::closest_name;
use crate::verdict::{TimeoutScope, Verdict};

/// The fixed feedback used when an exercise withholds its hints.
pub const WITHHELD_FEEDBACK: &str =
    "The tests failed. Review the exercise requirements and check your implementation on your own.";

/// A literal value in a scenario script (arguments and expectations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(v) => Value::Int(*v),
            Literal::Float(v) => Value::Float(*v),
            Literal::Str(s) => Value::Str(s.clone()),
        }
    }

    /// Loose numeric matching: an expected `3` accepts a computed `3.0`.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::Bool(a), Value::Bool(b)) => a == b,
            (Literal::Int(a), Value::Int(b)) => a == b,
            (Literal::Int(a), Value::Float(b)) => *a as f64 == *b,
            (Literal::Float(a), Value::Float(b)) => a == b,
            (Literal::Float(a), Value::Int(b)) => *a == *b as f64,
            (Literal::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// One scripted step. `Require*` steps inspect structure; `Construct`,
/// `Invoke` and `ReadField` execute or observe learner code and can bind
/// results to named slots for later steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioStep {
    RequireClass {
        class: String,
        #[serde(default)]
        must_be_abstract: Option<bool>,
        hint: String,
    },
    RequireInherits {
        class: String,
        parent: String,
        hint: String,
    },
    RequireConstructor {
        class: String,
        params: Vec<String>,
        hint: String,
    },
    RequireMethod {
        class: String,
        method: String,
        #[serde(default)]
        params: Option<Vec<String>>,
        #[serde(default)]
        returns: Option<String>,
        hint: String,
    },
    RequireField {
        class: String,
        field: String,
        hint: String,
    },
    Construct {
        class: String,
        #[serde(default)]
        args: Vec<Literal>,
        bind: String,
        hint: String,
    },
    Invoke {
        on: String,
        method: String,
        #[serde(default)]
        args: Vec<Literal>,
        #[serde(default)]
        bind: Option<String>,
        #[serde(default)]
        expect: Option<Literal>,
        hint: String,
    },
    ReadField {
        on: String,
        field: String,
        #[serde(default)]
        expect: Option<Literal>,
        #[serde(default)]
        bind: Option<String>,
        hint: String,
    },
}

impl ScenarioStep {
    fn kind(&self) -> &'static str {
        match self {
            ScenarioStep::RequireClass { .. } => "require_class",
            ScenarioStep::RequireInherits { .. } => "require_inherits",
            ScenarioStep::RequireConstructor { .. } => "require_constructor",
            ScenarioStep::RequireMethod { .. } => "require_method",
            ScenarioStep::RequireField { .. } => "require_field",
            ScenarioStep::Construct { .. } => "construct",
            ScenarioStep::Invoke { .. } => "invoke",
            ScenarioStep::ReadField { .. } => "read_field",
        }
    }
}

/// Run the exercise's scenario against a compiled unit.
pub async fn evaluate(
    exercise: &Exercise,
    unit: &LoadedUnit,
    cancel: &CancelToken,
    config: &EngineConfig,
) -> Verdict {
    let style = exercise.hint_style;
    let mut slots: HashMap<String, Value> = HashMap::new();

    for (index, step) in exercise.steps.iter().enumerate() {
        if cancel.is_cancelled() {
            debug!(exercise_id = %exercise.id, step = index, "attempt cancelled between steps");
            return Verdict::Cancelled;
        }
        debug!(exercise_id = %exercise.id, step = index, kind = step.kind(), "running scenario step");

        if let Some(verdict) = run_step(step, unit, &mut slots, style, config).await {
            return verdict;
        }
    }

    Verdict::Success {
        feedback: exercise.success_feedback.clone(),
    }
}

/// Execute one step. `None` means the step passed.
async fn run_step(
    step: &ScenarioStep,
    unit: &LoadedUnit,
    slots: &mut HashMap<String, Value>,
    style: HintStyle,
    config: &EngineConfig,
) -> Option<Verdict> {
    match step {
        ScenarioStep::RequireClass {
            class,
            must_be_abstract,
            hint,
        } => {
            let handle = match unit.find_class(class) {
                Some(handle) => handle,
                None => return Some(missing_class(class, unit, style, hint)),
            };
            if let Some(required) = must_be_abstract {
                if handle.is_abstract() != *required {
                    return Some(violation(style, hint));
                }
            }
            None
        }

        ScenarioStep::RequireInherits {
            class,
            parent,
            hint,
        } => {
            let handle = match unit.find_class(class) {
                Some(handle) => handle,
                None => return Some(missing_class(class, unit, style, hint)),
            };
            if !handle.is_subclass_of(parent) {
                return Some(violation(style, hint));
            }
            None
        }

        ScenarioStep::RequireConstructor {
            class,
            params,
            hint,
        } => {
            let handle = match unit.find_class(class) {
                Some(handle) => handle,
                None => return Some(missing_class(class, unit, style, hint)),
            };
            let types = match parse_types(params) {
                Ok(types) => types,
                Err(verdict) => return Some(verdict),
            };
            if handle.find_constructor(&types).is_none() {
                return Some(violation(style, hint));
            }
            None
        }

        ScenarioStep::RequireMethod {
            class,
            method,
            params,
            returns,
            hint,
        } => {
            let handle = match unit.find_class(class) {
                Some(handle) => handle,
                None => return Some(missing_class(class, unit, style, hint)),
            };
            let found = match handle.find_method(method) {
                Some(found) => found,
                None => {
                    let hinted = match style {
                        HintStyle::Specific => {
                            with_suggestion(hint, method, &handle.method_names())
                        }
                        HintStyle::Withheld => WITHHELD_FEEDBACK.to_string(),
                    };
                    return Some(Verdict::ContractViolation { hint: hinted });
                }
            };
            if let Some(params) = params {
                let types = match parse_types(params) {
                    Ok(types) => types,
                    Err(verdict) => return Some(verdict),
                };
                if found.param_types != types {
                    return Some(violation(style, hint));
                }
            }
            if let Some(returns) = returns {
                let expected = match TypeName::parse(returns) {
                    Some(ty) => ty,
                    None => return Some(bad_scenario(format!("invalid type '{}'", returns))),
                };
                if found.return_type != expected {
                    return Some(violation(style, hint));
                }
            }
            None
        }

        ScenarioStep::RequireField { class, field, hint } => {
            let handle = match unit.find_class(class) {
                Some(handle) => handle,
                None => return Some(missing_class(class, unit, style, hint)),
            };
            if handle.field_type(field).is_none() {
                return Some(violation(style, hint));
            }
            None
        }

        ScenarioStep::Construct {
            class,
            args,
            bind,
            hint,
        } => {
            let handle = match unit.find_class(class) {
                Some(handle) => handle,
                None => return Some(missing_class(class, unit, style, hint)),
            };
            let values: Vec<Value> = args.iter().map(Literal::to_value).collect();
            let outcome = race_blocking(move || handle.construct(values), config.step_timeout).await;
            match outcome {
                GuardOutcome::TimedOut => Some(Verdict::Timeout {
                    scope: TimeoutScope::Step,
                }),
                GuardOutcome::Panicked(message) => Some(Verdict::RuntimeFault { message }),
                GuardOutcome::Completed(Err(error)) => Some(classify(error, style, hint)),
                GuardOutcome::Completed(Ok(value)) => {
                    slots.insert(bind.clone(), value);
                    None
                }
            }
        }

        ScenarioStep::Invoke {
            on,
            method,
            args,
            bind,
            expect,
            hint,
        } => {
            let target = match slots.get(on) {
                Some(target) => target.clone(),
                None => return Some(bad_scenario(format!("unknown slot '{}'", on))),
            };
            // For objects, resolve the method up front so a missing member
            // reads as a contract problem, not a runtime fault.
            if let Some(class_name) = target.class_name() {
                if let Some(handle) = unit.find_class(&class_name) {
                    if handle.find_method(method).is_none() {
                        let hinted = match style {
                            HintStyle::Specific => {
                                with_suggestion(hint, method, &handle.method_names())
                            }
                            HintStyle::Withheld => WITHHELD_FEEDBACK.to_string(),
                        };
                        return Some(Verdict::ContractViolation { hint: hinted });
                    }
                }
            }

            let unit_clone = unit.clone();
            let method_name = method.clone();
            let call_target = target.clone();
            let values: Vec<Value> = args.iter().map(Literal::to_value).collect();
            let outcome = race_blocking(
                move || unit_clone.invoke(&call_target, &method_name, values),
                config.step_timeout,
            )
            .await;

            match outcome {
                GuardOutcome::TimedOut => Some(Verdict::Timeout {
                    scope: TimeoutScope::Step,
                }),
                GuardOutcome::Panicked(message) => Some(Verdict::RuntimeFault { message }),
                GuardOutcome::Completed(Err(error)) => Some(classify(error, style, hint)),
                GuardOutcome::Completed(Ok(value)) => {
                    if let Some(expected) = expect {
                        if !expected.matches(&value) {
                            return Some(expectation_failed(style, hint, expected, &value));
                        }
                    }
                    if let Some(bind) = bind {
                        slots.insert(bind.clone(), value);
                    }
                    None
                }
            }
        }

        ScenarioStep::ReadField {
            on,
            field,
            expect,
            bind,
            hint,
        } => {
            let target = match slots.get(on) {
                Some(target) => target.clone(),
                None => return Some(bad_scenario(format!("unknown slot '{}'", on))),
            };
            let value = match read_field(&target, field) {
                Some(value) => value,
                None => return Some(violation(style, hint)),
            };
            if let Some(expected) = expect {
                if !expected.matches(&value) {
                    return Some(expectation_failed(style, hint, expected, &value));
                }
            }
            if let Some(bind) = bind {
                slots.insert(bind.clone(), value);
            }
            None
        }
    }
}

fn parse_types(params: &[String]) -> Result<Vec<TypeName>, Verdict> {
    params
        .iter()
        .map(|p| TypeName::parse(p).ok_or_else(|| bad_scenario(format!("invalid type '{}'", p))))
        .collect()
}

/// An authoring mistake in the scenario itself, never the learner's fault.
fn bad_scenario(detail: String) -> Verdict {
    Verdict::RuntimeFault {
        message: format!("scenario definition error: {}", detail),
    }
}

fn violation(style: HintStyle, hint: &str) -> Verdict {
    Verdict::ContractViolation {
        hint: match style {
            HintStyle::Specific => hint.to_string(),
            HintStyle::Withheld => WITHHELD_FEEDBACK.to_string(),
        },
    }
}

fn missing_class(class: &str, unit: &LoadedUnit, style: HintStyle, hint: &str) -> Verdict {
    Verdict::ContractViolation {
        hint: match style {
            HintStyle::Specific => with_suggestion(hint, class, &unit.class_names()),
            HintStyle::Withheld => WITHHELD_FEEDBACK.to_string(),
        },
    }
}

fn with_suggestion(hint: &str, target: &str, candidates: &[String]) -> String {
    match closest_name(target, candidates) {
        Some(name) => format!("{} (did you mean '{}'?)", hint, name),
        None => hint.to_string(),
    }
}

fn expectation_failed(style: HintStyle, hint: &str, expected: &Literal, got: &Value) -> Verdict {
    Verdict::ContractViolation {
        hint: match style {
            HintStyle::Specific => format!("{} (expected {}, got {})", hint, expected, got),
            HintStyle::Withheld => WITHHELD_FEEDBACK.to_string(),
        },
    }
}

/// Reduce an execution fault to a verdict. Faults that mean "the required
/// structure is not there" are contract violations; everything else is the
/// learner's code blowing up at runtime.
fn classify(error: ExecError, style: HintStyle, hint: &str) -> Verdict {
    match error.innermost() {
        ExecError::NoMatchingConstructor { .. }
        | ExecError::AbstractInstantiation(_)
        | ExecError::AbstractMethodCall { .. }
        | ExecError::UnknownMethod { .. } => violation(style, hint),
        other => Verdict::RuntimeFault {
            message: other.to_string(),
        },
    }
}
