//! Abstract syntax tree for the learner language

use crate::lang::value::TypeName;

/// One parsed source fragment: its `using` directives plus class declarations.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// (reference name, 0-based raw line)
    pub usings: Vec<(String, usize)>,
    pub classes: Vec<ClassDecl>,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub parent: Option<String>,
    pub is_abstract: bool,
    pub fields: Vec<FieldDecl>,
    pub ctors: Vec<CtorDecl>,
    pub methods: Vec<MethodDecl>,
    /// 0-based raw line of the `class` keyword.
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeName,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeName,
}

#[derive(Debug, Clone)]
pub struct CtorDecl {
    pub params: Vec<Param>,
    /// `: base(args)` initializer, when present.
    pub base_args: Option<Vec<Expr>>,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: TypeName,
    /// `None` for abstract method declarations.
    pub body: Option<Block>,
}

pub type Block = Vec<Stmt>;

#[derive(Debug, Clone)]
pub enum Stmt {
    Local {
        ty: TypeName,
        name: String,
        init: Option<Expr>,
    },
    Assign {
        target: LValue,
        value: Expr,
    },
    If {
        cond: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    While {
        cond: Expr,
        body: Block,
    },
    Return {
        value: Option<Expr>,
    },
    Expr(Expr),
}

/// Assignment targets: a bare name (local, parameter, or own field) or an
/// explicit `this.field`.
#[derive(Debug, Clone)]
pub enum LValue {
    Name(String),
    ThisField(String),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
    This,
    /// Local, parameter, or implicit own-field read.
    Name(String),
    Unary {
        op: UnOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `target.method(args)`; `target == None` means a call on `this`.
    Call {
        target: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },
    /// `target.field`
    FieldAccess {
        target: Box<Expr>,
        field: String,
    },
    /// `new Class(args)` or `new List<T>()`
    New {
        class: String,
        type_arg: Option<TypeName>,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}
