//! The learner language: lexer, parser, interpreter, and the reflective
//! lookup surface the assertion harness drives.
//!
//! A compiled source fragment becomes a [`LoadedUnit`]. The unit hands out
//! capability handles ([`ClassHandle`], [`ConstructorHandle`],
//! [`MethodHandle`]); every lookup returns `Option`, so the harness can turn
//! a missing capability into feedback instead of a fault. Handles are cheap
//! clones over one shared class table and are `Send`, which lets guarded
//! steps move them onto a worker thread.

pub mod ast;
pub mod error;
pub mod interp;
pub mod parser;
pub mod token;
pub mod value;

use std::sync::Arc;

pub use error::ExecError;
pub use interp::{ClassTable, Interp};
pub use value::{Instance, ListRef, ObjRef, TypeName, Value};

/// One compiled unit: a uniquely named, immutable set of classes.
#[derive(Debug, Clone)]
pub struct LoadedUnit {
    name: String,
    table: Arc<ClassTable>,
}

impl LoadedUnit {
    pub fn new(name: String, table: ClassTable) -> Self {
        Self {
            name,
            table: Arc::new(table),
        }
    }

    /// The unit's unique name, e.g. `unit_zoo_3_9f41..`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a class by exact name.
    pub fn find_class(&self, name: &str) -> Option<ClassHandle> {
        self.table.get(name)?;
        Some(ClassHandle {
            table: self.table.clone(),
            name: name.to_string(),
        })
    }

    /// All class names in the unit, sorted for stable feedback.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.table.names().map(String::from).collect();
        names.sort();
        names
    }

    /// Invoke `method` on an arbitrary runtime value. Dispatch uses the
    /// value's runtime class; list builtins resolve here too.
    pub fn invoke(&self, target: &Value, method: &str, args: Vec<Value>) -> Result<Value, ExecError> {
        Interp::new(&self.table).invoke(target, method, args)
    }
}

/// Read a field off an object value. `None` when the value is not an object
/// or has no such field.
pub fn read_field(target: &Value, field: &str) -> Option<Value> {
    match target {
        Value::Object(obj) => obj
            .lock()
            .expect("poisoned instance")
            .fields
            .get(field)
            .cloned(),
        _ => None,
    }
}

/// A resolved class.
#[derive(Debug, Clone)]
pub struct ClassHandle {
    table: Arc<ClassTable>,
    name: String,
}

impl ClassHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_abstract(&self) -> bool {
        self.table.get(&self.name).map(|c| c.is_abstract).unwrap_or(false)
    }

    pub fn parent(&self) -> Option<String> {
        self.table.get(&self.name)?.parent.clone()
    }

    /// Strict descendant test, never true for the class itself.
    pub fn is_subclass_of(&self, ancestor: &str) -> bool {
        self.table.is_subclass_of(&self.name, ancestor)
    }

    /// Look up a constructor whose parameter types match `param_types`
    /// exactly.
    pub fn find_constructor(&self, param_types: &[TypeName]) -> Option<ConstructorHandle> {
        let class = self.table.get(&self.name)?;
        let found = class.ctors.iter().any(|ctor| {
            ctor.params.len() == param_types.len()
                && ctor.params.iter().zip(param_types).all(|(p, t)| &p.ty == t)
        });
        // A class with no declared constructors still has the implicit
        // parameterless one.
        let implicit = class.ctors.is_empty() && param_types.is_empty();
        if found || implicit {
            Some(ConstructorHandle {
                table: self.table.clone(),
                class: self.name.clone(),
            })
        } else {
            None
        }
    }

    /// Look up a method by name, searching the runtime class first and then
    /// its ancestors.
    pub fn find_method(&self, method: &str) -> Option<MethodHandle> {
        let mut lineage = self.table.lineage(&self.name);
        lineage.reverse();
        for class in lineage {
            if let Some(decl) = class.methods.iter().find(|m| m.name == method) {
                return Some(MethodHandle {
                    table: self.table.clone(),
                    class: self.name.clone(),
                    method: method.to_string(),
                    param_types: decl.params.iter().map(|p| p.ty.clone()).collect(),
                    return_type: decl.ret.clone(),
                });
            }
        }
        None
    }

    /// The declared type of a field, own or inherited.
    pub fn field_type(&self, field: &str) -> Option<TypeName> {
        let mut lineage = self.table.lineage(&self.name);
        lineage.reverse();
        for class in lineage {
            if let Some(decl) = class.fields.iter().find(|f| f.name == field) {
                return Some(decl.ty.clone());
            }
        }
        None
    }

    /// All method names visible on this class (own and inherited), sorted.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .table
            .lineage(&self.name)
            .iter()
            .flat_map(|c| c.methods.iter().map(|m| m.name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Instantiate the class, choosing a constructor by argument count.
    pub fn construct(&self, args: Vec<Value>) -> Result<Value, ExecError> {
        Interp::new(&self.table).construct(&self.name, args)
    }
}

/// A resolved constructor.
#[derive(Debug, Clone)]
pub struct ConstructorHandle {
    table: Arc<ClassTable>,
    class: String,
}

impl ConstructorHandle {
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, ExecError> {
        Interp::new(&self.table).construct(&self.class, args)
    }
}

/// A resolved method, bound to the class it was looked up on.
#[derive(Debug, Clone)]
pub struct MethodHandle {
    table: Arc<ClassTable>,
    class: String,
    method: String,
    pub param_types: Vec<TypeName>,
    pub return_type: TypeName,
}

impl MethodHandle {
    pub fn name(&self) -> &str {
        &self.method
    }

    /// The class the lookup was made on.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Invoke on `target`; dispatch uses the target's runtime class.
    pub fn invoke(&self, target: &Value, args: Vec<Value>) -> Result<Value, ExecError> {
        Interp::new(&self.table).invoke(target, &self.method, args)
    }
}
