//! Tree-walking interpreter for the learner language
//!
//! Executes constructor and method bodies against a `ClassTable`. All faults
//! surface as `ExecError`; nothing panics on learner input. Non-termination
//! is not handled here: callers run interpreter entry points under a watchdog.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::lang::ast::*;
use crate::lang::error::ExecError;
use crate::lang::value::{Instance, ObjRef, Value};

/// All classes of one compiled unit, keyed by name.
#[derive(Debug, Default)]
pub struct ClassTable {
    classes: HashMap<String, ClassDecl>,
}

impl ClassTable {
    pub fn new(classes: Vec<ClassDecl>) -> Self {
        let classes = classes
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();
        Self { classes }
    }

    pub fn get(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(|s| s.as_str())
    }

    /// Strict subclass test: `child` must be a proper descendant of
    /// `ancestor`, not the same class. Tolerates cyclic parent links the
    /// same way `lineage` does.
    pub fn is_subclass_of(&self, child: &str, ancestor: &str) -> bool {
        let mut seen = vec![child];
        let mut current = self.get(child).and_then(|c| c.parent.as_deref());
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            if seen.contains(&name) {
                return false;
            }
            seen.push(name);
            current = self.get(name).and_then(|c| c.parent.as_deref());
        }
        false
    }

    /// The inheritance chain of `name`, root class first.
    /// Cycles are broken by refusing to revisit a class.
    pub fn lineage(&self, name: &str) -> Vec<&ClassDecl> {
        let mut chain = Vec::new();
        let mut current = self.get(name);
        while let Some(class) = current {
            if chain.iter().any(|c: &&ClassDecl| c.name == class.name) {
                break;
            }
            chain.push(class);
            current = class.parent.as_deref().and_then(|p| self.get(p));
        }
        chain.reverse();
        chain
    }
}

/// Control flow out of a statement.
enum Flow {
    Normal,
    Return(Value),
}

/// Lexical environment for one constructor or method activation.
struct Env {
    scopes: Vec<HashMap<String, Value>>,
    this: ObjRef,
}

impl Env {
    fn new(this: ObjRef) -> Self {
        Self {
            scopes: vec![HashMap::new()],
            this,
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    fn get_local(&self, name: &str) -> Option<Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).cloned())
    }

    fn set_local(&mut self, name: &str, value: Value) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }
}

/// Interpreter over one class table.
pub struct Interp<'a> {
    table: &'a ClassTable,
}

impl<'a> Interp<'a> {
    pub fn new(table: &'a ClassTable) -> Self {
        Self { table }
    }

    /// Instantiate `class_name` with the given arguments.
    pub fn construct(&self, class_name: &str, args: Vec<Value>) -> Result<Value, ExecError> {
        let class = self
            .table
            .get(class_name)
            .ok_or_else(|| ExecError::UnknownClass(class_name.to_string()))?;
        if class.is_abstract {
            return Err(ExecError::AbstractInstantiation(class_name.to_string()));
        }

        let obj: ObjRef = Arc::new(Mutex::new(Instance {
            class: class_name.to_string(),
            fields: HashMap::new(),
        }));

        // Field defaults root-first, so subclass fields shadow inherited ones.
        for ancestor in self.table.lineage(class_name) {
            for field in &ancestor.fields {
                let value = match &field.init {
                    Some(expr) => {
                        let mut env = Env::new(obj.clone());
                        self.eval(&mut env, expr)?
                    }
                    None => field.ty.default_value(),
                };
                obj.lock()
                    .expect("poisoned instance")
                    .fields
                    .insert(field.name.clone(), value);
            }
        }

        self.run_ctor(class, &obj, args)?;
        Ok(Value::Object(obj))
    }

    fn run_ctor(&self, class: &ClassDecl, obj: &ObjRef, args: Vec<Value>) -> Result<(), ExecError> {
        let ctor = class.ctors.iter().find(|c| c.params.len() == args.len());

        let ctor = match ctor {
            Some(ctor) => ctor,
            None => {
                // Implicit parameterless constructor when none is declared.
                if class.ctors.is_empty() && args.is_empty() {
                    if let Some(parent) = self.parent_of(class)? {
                        self.run_ctor(parent, obj, Vec::new())
                            .map_err(|e| e.in_frame(format!("{}.{}", parent.name, parent.name)))?;
                    }
                    return Ok(());
                }
                return Err(ExecError::NoMatchingConstructor {
                    class: class.name.clone(),
                    arity: args.len(),
                });
            }
        };

        let mut env = Env::new(obj.clone());
        for (param, arg) in ctor.params.iter().zip(args) {
            env.declare(&param.name, arg);
        }

        match (&ctor.base_args, self.parent_of(class)?) {
            (Some(exprs), Some(parent)) => {
                let mut base_args = Vec::with_capacity(exprs.len());
                for expr in exprs {
                    base_args.push(self.eval(&mut env, expr)?);
                }
                self.run_ctor(parent, obj, base_args)
                    .map_err(|e| e.in_frame(format!("{}.{}", parent.name, parent.name)))?;
            }
            (Some(_), None) => {
                return Err(ExecError::Type(format!(
                    "class '{}' has no base class but its constructor calls base(..)",
                    class.name
                )));
            }
            (None, Some(parent)) => {
                self.run_ctor(parent, obj, Vec::new())
                    .map_err(|e| e.in_frame(format!("{}.{}", parent.name, parent.name)))?;
            }
            (None, None) => {}
        }

        match self.exec_block(&mut env, &ctor.body)? {
            Flow::Normal | Flow::Return(_) => Ok(()),
        }
    }

    fn parent_of(&self, class: &ClassDecl) -> Result<Option<&ClassDecl>, ExecError> {
        match class.parent.as_deref() {
            None => Ok(None),
            Some(name) => self
                .table
                .get(name)
                .map(Some)
                .ok_or_else(|| ExecError::UnknownClass(name.to_string())),
        }
    }

    /// Invoke `method` on `target`. Dispatch starts at the runtime class, so
    /// overrides win over inherited bodies.
    pub fn invoke(
        &self,
        target: &Value,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, ExecError> {
        match target {
            Value::Object(obj) => {
                let class_name = obj.lock().expect("poisoned instance").class.clone();
                self.invoke_on_object(obj, &class_name, method, args)
                    .map_err(|e| e.in_frame(format!("{}.{}", class_name, method)))
            }
            Value::List(list) => self.invoke_list_builtin(list, method, args),
            Value::Null => Err(ExecError::NullReference(format!(
                "cannot call '{}' on null",
                method
            ))),
            other => Err(ExecError::Type(format!(
                "cannot call '{}' on a value of type {}",
                method,
                other.type_label()
            ))),
        }
    }

    fn invoke_on_object(
        &self,
        obj: &ObjRef,
        class_name: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, ExecError> {
        let mut lineage = self.table.lineage(class_name);
        if lineage.is_empty() {
            return Err(ExecError::UnknownClass(class_name.to_string()));
        }
        // Search derived-first.
        lineage.reverse();

        let mut named_match: Option<(&ClassDecl, &MethodDecl)> = None;
        for &class in &lineage {
            for decl in &class.methods {
                if decl.name == method {
                    named_match.get_or_insert((class, decl));
                    if decl.params.len() == args.len() {
                        return self.run_method(obj, class, decl, args);
                    }
                }
            }
        }

        match named_match {
            Some((class, decl)) => Err(ExecError::ArityMismatch {
                class: class.name.clone(),
                method: method.to_string(),
                expected: decl.params.len(),
                actual: args.len(),
            }),
            None => Err(ExecError::UnknownMethod {
                class: class_name.to_string(),
                method: method.to_string(),
            }),
        }
    }

    fn run_method(
        &self,
        obj: &ObjRef,
        class: &ClassDecl,
        decl: &MethodDecl,
        args: Vec<Value>,
    ) -> Result<Value, ExecError> {
        let body = decl.body.as_ref().ok_or_else(|| ExecError::AbstractMethodCall {
            class: class.name.clone(),
            method: decl.name.clone(),
        })?;

        let mut env = Env::new(obj.clone());
        for (param, arg) in decl.params.iter().zip(args) {
            env.declare(&param.name, arg);
        }

        match self.exec_block(&mut env, body)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Null),
        }
    }

    fn invoke_list_builtin(
        &self,
        list: &crate::lang::value::ListRef,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, ExecError> {
        let check_arity = |expected: usize| -> Result<(), ExecError> {
            if args.len() != expected {
                return Err(ExecError::ArityMismatch {
                    class: "List".into(),
                    method: method.to_string(),
                    expected,
                    actual: args.len(),
                });
            }
            Ok(())
        };

        match method {
            "Add" => {
                check_arity(1)?;
                list.lock()
                    .expect("poisoned list")
                    .push(args.into_iter().next().unwrap());
                Ok(Value::Null)
            }
            "Get" => {
                check_arity(1)?;
                let index = match &args[0] {
                    Value::Int(i) => *i,
                    other => {
                        return Err(ExecError::Type(format!(
                            "List.Get expects an int index, got {}",
                            other.type_label()
                        )))
                    }
                };
                let items = list.lock().expect("poisoned list");
                if index < 0 || index as usize >= items.len() {
                    return Err(ExecError::IndexOutOfBounds {
                        index,
                        size: items.len(),
                    });
                }
                Ok(items[index as usize].clone())
            }
            "Size" => {
                check_arity(0)?;
                Ok(Value::Int(list.lock().expect("poisoned list").len() as i64))
            }
            "Contains" => {
                check_arity(1)?;
                let items = list.lock().expect("poisoned list");
                Ok(Value::Bool(items.iter().any(|v| v == &args[0])))
            }
            _ => Err(ExecError::UnknownMethod {
                class: "List".into(),
                method: method.to_string(),
            }),
        }
    }

    // ---- statements ----

    fn exec_block(&self, env: &mut Env, block: &Block) -> Result<Flow, ExecError> {
        env.push_scope();
        let mut flow = Flow::Normal;
        for stmt in block {
            match self.exec_stmt(env, stmt)? {
                Flow::Normal => {}
                ret @ Flow::Return(_) => {
                    flow = ret;
                    break;
                }
            }
        }
        env.pop_scope();
        Ok(flow)
    }

    fn exec_stmt(&self, env: &mut Env, stmt: &Stmt) -> Result<Flow, ExecError> {
        match stmt {
            Stmt::Local { ty, name, init } => {
                let value = match init {
                    Some(expr) => self.eval(env, expr)?,
                    None => ty.default_value(),
                };
                env.declare(name, value);
                Ok(Flow::Normal)
            }
            Stmt::Assign { target, value } => {
                let value = self.eval(env, value)?;
                match target {
                    LValue::Name(name) => {
                        if env.set_local(name, value.clone()) {
                            return Ok(Flow::Normal);
                        }
                        self.set_field(env, name, value)?;
                        Ok(Flow::Normal)
                    }
                    LValue::ThisField(field) => {
                        self.set_field(env, field, value)?;
                        Ok(Flow::Normal)
                    }
                }
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_bool(env, cond)? {
                    self.exec_block(env, then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_block(env, else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::While { cond, body } => {
                while self.eval_bool(env, cond)? {
                    if let ret @ Flow::Return(_) = self.exec_block(env, body)? {
                        return Ok(ret);
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Return { value } => {
                let value = match value {
                    Some(expr) => self.eval(env, expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Expr(expr) => {
                self.eval(env, expr)?;
                Ok(Flow::Normal)
            }
        }
    }

    fn set_field(&self, env: &Env, field: &str, value: Value) -> Result<(), ExecError> {
        let mut instance = env.this.lock().expect("poisoned instance");
        match instance.fields.get_mut(field) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ExecError::UnknownField {
                class: instance.class.clone(),
                field: field.to_string(),
            }),
        }
    }

    // ---- expressions ----

    fn eval_bool(&self, env: &mut Env, expr: &Expr) -> Result<bool, ExecError> {
        match self.eval(env, expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(ExecError::Type(format!(
                "condition must be bool, got {}",
                other.type_label()
            ))),
        }
    }

    fn eval(&self, env: &mut Env, expr: &Expr) -> Result<Value, ExecError> {
        match expr {
            Expr::Int(v) => Ok(Value::Int(*v)),
            Expr::Float(v) => Ok(Value::Float(*v)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::This => Ok(Value::Object(env.this.clone())),
            Expr::Name(name) => {
                if let Some(value) = env.get_local(name) {
                    return Ok(value);
                }
                let instance = env.this.lock().expect("poisoned instance");
                instance
                    .fields
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ExecError::UnknownName(name.clone()))
            }
            Expr::Unary { op, expr } => {
                let value = self.eval(env, expr)?;
                match (op, value) {
                    (UnOp::Neg, Value::Int(v)) => Ok(Value::Int(-v)),
                    (UnOp::Neg, Value::Float(v)) => Ok(Value::Float(-v)),
                    (UnOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (UnOp::Neg, other) => Err(ExecError::Type(format!(
                        "cannot negate a value of type {}",
                        other.type_label()
                    ))),
                    (UnOp::Not, other) => Err(ExecError::Type(format!(
                        "'!' expects bool, got {}",
                        other.type_label()
                    ))),
                }
            }
            Expr::Binary { op, lhs, rhs } => self.eval_binary(env, *op, lhs, rhs),
            Expr::Call {
                target,
                method,
                args,
            } => {
                let receiver = match target {
                    Some(expr) => self.eval(env, expr)?,
                    None => Value::Object(env.this.clone()),
                };
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.eval(env, arg)?);
                }
                self.invoke(&receiver, method, arg_values)
            }
            Expr::FieldAccess { target, field } => {
                let receiver = self.eval(env, target)?;
                match receiver {
                    Value::Object(obj) => {
                        let instance = obj.lock().expect("poisoned instance");
                        instance.fields.get(field).cloned().ok_or_else(|| {
                            ExecError::UnknownField {
                                class: instance.class.clone(),
                                field: field.clone(),
                            }
                        })
                    }
                    Value::Null => Err(ExecError::NullReference(format!(
                        "cannot read '{}' of null",
                        field
                    ))),
                    other => Err(ExecError::Type(format!(
                        "cannot read field '{}' of a value of type {}",
                        field,
                        other.type_label()
                    ))),
                }
            }
            Expr::New {
                class,
                type_arg,
                args,
            } => {
                if class == "List" || type_arg.is_some() {
                    if class != "List" {
                        return Err(ExecError::Type(format!(
                            "generic type '{}' is not supported",
                            class
                        )));
                    }
                    if !args.is_empty() {
                        return Err(ExecError::NoMatchingConstructor {
                            class: "List".into(),
                            arity: args.len(),
                        });
                    }
                    return Ok(Value::List(Arc::new(Mutex::new(Vec::new()))));
                }
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.eval(env, arg)?);
                }
                self.construct(class, arg_values)
            }
        }
    }

    fn eval_binary(
        &self,
        env: &mut Env,
        op: BinOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<Value, ExecError> {
        // Short-circuit forms first.
        match op {
            BinOp::And => {
                return Ok(Value::Bool(
                    self.eval_logic_operand(env, lhs, "&&")?
                        && self.eval_logic_operand(env, rhs, "&&")?,
                ));
            }
            BinOp::Or => {
                if self.eval_logic_operand(env, lhs, "||")? {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(self.eval_logic_operand(env, rhs, "||")?));
            }
            _ => {}
        }

        let left = self.eval(env, lhs)?;
        let right = self.eval(env, rhs)?;

        match op {
            BinOp::Eq => Ok(Value::Bool(left == right)),
            BinOp::Ne => Ok(Value::Bool(left != right)),
            BinOp::Add => {
                // String concatenation when either side is a string.
                if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
                    return Ok(Value::Str(format!("{}{}", left, right)));
                }
                self.arith(op, left, right)
            }
            BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem => self.arith(op, left, right),
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
                let (a, b) = match (&left, &right) {
                    (Value::Int(a), Value::Int(b)) => (*a as f64, *b as f64),
                    (Value::Int(a), Value::Float(b)) => (*a as f64, *b),
                    (Value::Float(a), Value::Int(b)) => (*a, *b as f64),
                    (Value::Float(a), Value::Float(b)) => (*a, *b),
                    _ => {
                        return Err(ExecError::Type(format!(
                            "cannot compare {} and {}",
                            left.type_label(),
                            right.type_label()
                        )))
                    }
                };
                Ok(Value::Bool(match op {
                    BinOp::Lt => a < b,
                    BinOp::Gt => a > b,
                    BinOp::Le => a <= b,
                    BinOp::Ge => a >= b,
                    _ => unreachable!(),
                }))
            }
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }

    fn eval_logic_operand(&self, env: &mut Env, expr: &Expr, op: &str) -> Result<bool, ExecError> {
        match self.eval(env, expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(ExecError::Type(format!(
                "'{}' expects bool operands, got {}",
                op,
                other.type_label()
            ))),
        }
    }

    fn arith(&self, op: BinOp, left: Value, right: Value) -> Result<Value, ExecError> {
        match (left, right) {
            (Value::Int(a), Value::Int(b)) => match op {
                BinOp::Add => Ok(Value::Int(a.wrapping_add(b))),
                BinOp::Sub => Ok(Value::Int(a.wrapping_sub(b))),
                BinOp::Mul => Ok(Value::Int(a.wrapping_mul(b))),
                BinOp::Div => {
                    if b == 0 {
                        Err(ExecError::DivisionByZero)
                    } else {
                        Ok(Value::Int(a.wrapping_div(b)))
                    }
                }
                BinOp::Rem => {
                    if b == 0 {
                        Err(ExecError::DivisionByZero)
                    } else {
                        Ok(Value::Int(a.wrapping_rem(b)))
                    }
                }
                _ => unreachable!(),
            },
            (left, right) => {
                let (a, b) = match (&left, &right) {
                    (Value::Int(a), Value::Float(b)) => (*a as f64, *b),
                    (Value::Float(a), Value::Int(b)) => (*a, *b as f64),
                    (Value::Float(a), Value::Float(b)) => (*a, *b),
                    _ => {
                        return Err(ExecError::Type(format!(
                            "arithmetic needs numbers, got {} and {}",
                            left.type_label(),
                            right.type_label()
                        )))
                    }
                };
                Ok(Value::Float(match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    BinOp::Rem => a % b,
                    _ => unreachable!(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::parser::parse;

    fn table(source: &str) -> ClassTable {
        let (program, diags) = parse(source);
        assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
        ClassTable::new(program.classes)
    }

    #[test]
    fn test_construct_and_invoke() {
        let table = table(
            r#"
class Tier {
    private string name;
    private int alter;
    public Tier(string name, int alter) {
        this.name = name;
        this.alter = alter;
    }
    public int GetAlter() { return alter; }
    public void AltereUm(int jahre) { alter = alter + jahre; }
}
"#,
        );
        let interp = Interp::new(&table);
        let tier = interp
            .construct("Tier", vec![Value::Str("Elefant".into()), Value::Int(4)])
            .unwrap();
        assert_eq!(interp.invoke(&tier, "GetAlter", vec![]).unwrap(), Value::Int(4));
        interp.invoke(&tier, "AltereUm", vec![Value::Int(3)]).unwrap();
        assert_eq!(interp.invoke(&tier, "GetAlter", vec![]).unwrap(), Value::Int(7));
    }

    #[test]
    fn test_inheritance_base_ctor_and_override() {
        let table = table(
            r#"
abstract class Tier {
    private string name;
    public Tier(string name) { this.name = name; }
    public string Beschreibung() { return name; }
    public abstract string Laut();
}
class Loewe : Tier {
    public Loewe(string name) : base(name) {}
    public string Laut() { return "Brüllen"; }
}
"#,
        );
        let interp = Interp::new(&table);
        let loewe = interp
            .construct("Loewe", vec![Value::Str("Simba".into())])
            .unwrap();
        assert_eq!(
            interp.invoke(&loewe, "Beschreibung", vec![]).unwrap(),
            Value::Str("Simba".into())
        );
        assert_eq!(
            interp.invoke(&loewe, "Laut", vec![]).unwrap(),
            Value::Str("Brüllen".into())
        );
    }

    #[test]
    fn test_abstract_instantiation_rejected() {
        let table = table("abstract class Tier { }");
        let interp = Interp::new(&table);
        assert_eq!(
            interp.construct("Tier", vec![]).unwrap_err(),
            ExecError::AbstractInstantiation("Tier".into())
        );
    }

    #[test]
    fn test_no_matching_constructor() {
        let table = table("class Tier { public Tier(int a) {} }");
        let interp = Interp::new(&table);
        assert_eq!(
            interp.construct("Tier", vec![]).unwrap_err(),
            ExecError::NoMatchingConstructor {
                class: "Tier".into(),
                arity: 0
            }
        );
    }

    #[test]
    fn test_list_builtins() {
        let table = table(
            r#"
class Gehege {
    List<int> werte;
    public Gehege() { werte = new List<int>(); }
    public void Merke(int w) { werte.Add(w); }
    public int Anzahl() { return werte.Size(); }
    public int Erstes() { return werte.Get(0); }
    public bool Kennt(int w) { return werte.Contains(w); }
}
"#,
        );
        let interp = Interp::new(&table);
        let gehege = interp.construct("Gehege", vec![]).unwrap();
        interp.invoke(&gehege, "Merke", vec![Value::Int(42)]).unwrap();
        assert_eq!(interp.invoke(&gehege, "Anzahl", vec![]).unwrap(), Value::Int(1));
        assert_eq!(interp.invoke(&gehege, "Erstes", vec![]).unwrap(), Value::Int(42));
        assert_eq!(
            interp.invoke(&gehege, "Kennt", vec![Value::Int(7)]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_division_by_zero_surfaces_root_cause() {
        let table = table(
            r#"
class Rechner {
    public int Teile(int a, int b) { return a / b; }
}
"#,
        );
        let interp = Interp::new(&table);
        let rechner = interp.construct("Rechner", vec![]).unwrap();
        let err = interp
            .invoke(&rechner, "Teile", vec![Value::Int(1), Value::Int(0)])
            .unwrap_err();
        assert_eq!(err.innermost(), &ExecError::DivisionByZero);
        assert!(err.to_string().contains("Rechner.Teile"));
    }

    #[test]
    fn test_while_loop_and_recursion() {
        let table = table(
            r#"
class Mathe {
    public int Summe(int n) {
        int summe = 0;
        int i = 1;
        while (i <= n) {
            summe = summe + i;
            i = i + 1;
        }
        return summe;
    }
    public int Fakultaet(int n) {
        if (n <= 1) { return 1; }
        return n * Fakultaet(n - 1);
    }
}
"#,
        );
        let interp = Interp::new(&table);
        let mathe = interp.construct("Mathe", vec![]).unwrap();
        assert_eq!(
            interp.invoke(&mathe, "Summe", vec![Value::Int(10)]).unwrap(),
            Value::Int(55)
        );
        assert_eq!(
            interp.invoke(&mathe, "Fakultaet", vec![Value::Int(5)]).unwrap(),
            Value::Int(120)
        );
    }

    #[test]
    fn test_string_concatenation_and_mixed_arithmetic() {
        let table = table(
            r#"
class Text {
    public string Gruss(string name, int alter) {
        return "Hallo " + name + ", " + alter;
    }
    public double Mittel(int a, int b) {
        return (a + b) / 2.0;
    }
}
"#,
        );
        let interp = Interp::new(&table);
        let text = interp.construct("Text", vec![]).unwrap();
        assert_eq!(
            interp
                .invoke(
                    &text,
                    "Gruss",
                    vec![Value::Str("Anna".into()), Value::Int(12)]
                )
                .unwrap(),
            Value::Str("Hallo Anna, 12".into())
        );
        assert_eq!(
            interp
                .invoke(&text, "Mittel", vec![Value::Int(3), Value::Int(4)])
                .unwrap(),
            Value::Float(3.5)
        );
    }

    #[test]
    fn test_subclass_relationships() {
        let table = table(
            "class A {}\nclass B : A {}\nclass C : B {}\nclass D {}\n",
        );
        assert!(table.is_subclass_of("C", "A"));
        assert!(table.is_subclass_of("B", "A"));
        assert!(!table.is_subclass_of("A", "A"));
        assert!(!table.is_subclass_of("D", "A"));
    }

    #[test]
    fn test_subclass_test_terminates_on_cyclic_parents() {
        // A table with cyclic parent links can only come from an unchecked
        // source; the walk must still terminate.
        let table = table("class A : B {}\nclass B : A {}\n");
        assert!(!table.is_subclass_of("A", "X"));
        assert!(table.is_subclass_of("A", "B"));
        assert!(table.is_subclass_of("B", "A"));
    }
}
