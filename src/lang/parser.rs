//! Recursive-descent parser for the learner language
//!
//! Parsing never aborts on the first problem: statement- and member-level
//! recovery skips to a synchronization token so one run can report several
//! diagnostics, the way learners expect from a real compiler.

use crate::diagnostics::Diagnostic;
use crate::lang::ast::*;
use crate::lang::token::{lex, Tok, Token};
use crate::lang::value::TypeName;

/// Parse a source fragment into a `Program` plus any diagnostics (lexical
/// and syntactic, raw 0-based lines).
pub fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
    let (tokens, mut diagnostics) = lex(source);
    let mut parser = Parser {
        tokens,
        pos: 0,
        diagnostics: Vec::new(),
    };
    let program = parser.parse_program();
    diagnostics.extend(parser.diagnostics);
    (program, diagnostics)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

/// Unit error: the diagnostic has already been recorded; the caller decides
/// how far to skip.
type PResult<T> = Result<T, ()>;

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|t| &t.tok)
    }

    fn peek_at(&self, offset: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + offset).map(|t| &t.tok)
    }

    fn cur_line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(0)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let line = self.cur_line();
        self.diagnostics.push(Diagnostic::error(message, line));
    }

    fn expect(&mut self, tok: Tok, context: &str) -> PResult<()> {
        if self.eat(&tok) {
            Ok(())
        } else {
            let found = self
                .peek()
                .map(|t| t.describe())
                .unwrap_or_else(|| "end of input".into());
            self.error(format!(
                "expected {} {} but found {}",
                tok.describe(),
                context,
                found
            ));
            Err(())
        }
    }

    fn expect_ident(&mut self, what: &str) -> PResult<String> {
        match self.peek() {
            Some(Tok::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            other => {
                let found = other
                    .map(|t| t.describe())
                    .unwrap_or_else(|| "end of input".into());
                self.error(format!("expected {} but found {}", what, found));
                Err(())
            }
        }
    }

    // ---- top level ----

    fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while let Some(tok) = self.peek() {
            match tok {
                Tok::KwUsing => {
                    if let Ok((name, line)) = self.parse_using() {
                        program.usings.push((name, line));
                    } else {
                        self.skip_past_semi();
                    }
                }
                Tok::KwClass | Tok::KwPublic | Tok::KwPrivate | Tok::KwProtected
                | Tok::KwAbstract => match self.parse_class() {
                    Ok(class) => program.classes.push(class),
                    Err(()) => self.skip_to_next_class(),
                },
                other => {
                    let found = other.describe();
                    self.error(format!("expected 'class' or 'using' but found {}", found));
                    self.skip_to_next_class();
                }
            }
        }

        program
    }

    fn parse_using(&mut self) -> PResult<(String, usize)> {
        let line = self.cur_line();
        self.expect(Tok::KwUsing, "")?;
        let mut name = self.expect_ident("a reference name after 'using'")?;
        while self.eat(&Tok::Dot) {
            let part = self.expect_ident("a name after '.'")?;
            name.push('.');
            name.push_str(&part);
        }
        self.expect(Tok::Semi, "after the using directive")?;
        Ok((name, line))
    }

    fn parse_class(&mut self) -> PResult<ClassDecl> {
        let mut is_abstract = false;
        while let Some(tok) = self.peek() {
            match tok {
                Tok::KwPublic | Tok::KwPrivate | Tok::KwProtected => {
                    self.pos += 1;
                }
                Tok::KwAbstract => {
                    is_abstract = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }

        let line = self.cur_line();
        self.expect(Tok::KwClass, "to start a class declaration")?;
        let name = self.expect_ident("a class name")?;
        let parent = if self.eat(&Tok::Colon) {
            Some(self.expect_ident("a base class name after ':'")?)
        } else {
            None
        };
        self.expect(Tok::LBrace, "to open the class body")?;

        let mut class = ClassDecl {
            name: name.clone(),
            parent,
            is_abstract,
            fields: Vec::new(),
            ctors: Vec::new(),
            methods: Vec::new(),
            line,
        };

        loop {
            match self.peek() {
                Some(Tok::RBrace) => {
                    self.pos += 1;
                    break;
                }
                None => {
                    self.error(format!("unexpected end of input in class '{}'", name));
                    break;
                }
                Some(_) => {
                    if self.parse_member(&mut class).is_err() {
                        self.skip_member();
                    }
                }
            }
        }

        Ok(class)
    }

    fn parse_member(&mut self, class: &mut ClassDecl) -> PResult<()> {
        let mut is_abstract = false;
        while let Some(tok) = self.peek() {
            match tok {
                Tok::KwPublic | Tok::KwPrivate | Tok::KwProtected => {
                    self.pos += 1;
                }
                Tok::KwAbstract => {
                    is_abstract = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }

        // Constructor: the class name followed by '('
        if let (Some(Tok::Ident(name)), Some(Tok::LParen)) = (self.peek(), self.peek_at(1)) {
            if name == &class.name {
                self.pos += 1;
                let params = self.parse_params()?;
                let base_args = if self.eat(&Tok::Colon) {
                    self.expect(Tok::KwBase, "in the constructor initializer")?;
                    self.expect(Tok::LParen, "after 'base'")?;
                    Some(self.parse_args_until_rparen()?)
                } else {
                    None
                };
                let body = self.parse_block()?;
                class.ctors.push(CtorDecl {
                    params,
                    base_args,
                    body,
                });
                return Ok(());
            }
        }

        let ty = self.parse_type()?;
        let name = self.expect_ident("a member name")?;

        if self.peek() == Some(&Tok::LParen) {
            let params = self.parse_params()?;
            let body = if is_abstract {
                self.expect(Tok::Semi, "after the abstract method declaration")?;
                None
            } else {
                Some(self.parse_block()?)
            };
            class.methods.push(MethodDecl {
                name,
                params,
                ret: ty,
                body,
            });
        } else {
            let init = if self.eat(&Tok::Assign) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            self.expect(Tok::Semi, "after the field declaration")?;
            if ty == TypeName::Void {
                self.error(format!("field '{}' cannot have type 'void'", name));
                return Err(());
            }
            class.fields.push(FieldDecl { name, ty, init });
        }

        Ok(())
    }

    fn parse_type(&mut self) -> PResult<TypeName> {
        let name = self.expect_ident("a type name")?;
        if self.eat(&Tok::Lt) {
            let inner = self.parse_type()?;
            self.expect(Tok::Gt, "to close the type argument")?;
            if name == "List" {
                return Ok(TypeName::List(Box::new(inner)));
            }
            self.error(format!("generic type '{}' is not supported (only List<T>)", name));
            return Err(());
        }
        Ok(match name.as_str() {
            "int" => TypeName::Int,
            "double" => TypeName::Double,
            "bool" => TypeName::Bool,
            "string" => TypeName::Str,
            "void" => TypeName::Void,
            _ => TypeName::Class(name),
        })
    }

    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect(Tok::LParen, "to open the parameter list")?;
        let mut params = Vec::new();
        if self.eat(&Tok::RParen) {
            return Ok(params);
        }
        loop {
            let ty = self.parse_type()?;
            let name = self.expect_ident("a parameter name")?;
            params.push(Param { name, ty });
            if self.eat(&Tok::Comma) {
                continue;
            }
            self.expect(Tok::RParen, "to close the parameter list")?;
            break;
        }
        Ok(params)
    }

    // ---- statements ----

    fn parse_block(&mut self) -> PResult<Block> {
        self.expect(Tok::LBrace, "to open a block")?;
        let mut stmts = Vec::new();
        loop {
            match self.peek() {
                Some(Tok::RBrace) => {
                    self.pos += 1;
                    break;
                }
                None => {
                    self.error("unexpected end of input in a block");
                    break;
                }
                Some(_) => match self.parse_stmt() {
                    Ok(stmt) => stmts.push(stmt),
                    Err(()) => self.skip_to_stmt_end(),
                },
            }
        }
        Ok(stmts)
    }

    fn parse_stmt_or_block(&mut self) -> PResult<Block> {
        if self.peek() == Some(&Tok::LBrace) {
            self.parse_block()
        } else {
            Ok(vec![self.parse_stmt()?])
        }
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        match self.peek() {
            Some(Tok::KwIf) => {
                self.pos += 1;
                self.expect(Tok::LParen, "after 'if'")?;
                let cond = self.parse_expr()?;
                self.expect(Tok::RParen, "to close the condition")?;
                let then_branch = self.parse_stmt_or_block()?;
                let else_branch = if self.eat(&Tok::KwElse) {
                    Some(self.parse_stmt_or_block()?)
                } else {
                    None
                };
                Ok(Stmt::If {
                    cond,
                    then_branch,
                    else_branch,
                })
            }
            Some(Tok::KwWhile) => {
                self.pos += 1;
                self.expect(Tok::LParen, "after 'while'")?;
                let cond = self.parse_expr()?;
                self.expect(Tok::RParen, "to close the condition")?;
                let body = self.parse_stmt_or_block()?;
                Ok(Stmt::While { cond, body })
            }
            Some(Tok::KwReturn) => {
                self.pos += 1;
                let value = if self.peek() == Some(&Tok::Semi) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(Tok::Semi, "after 'return'")?;
                Ok(Stmt::Return { value })
            }
            Some(Tok::KwThis) => {
                self.pos += 1;
                self.expect(Tok::Dot, "after 'this'")?;
                let name = self.expect_ident("a member name after 'this.'")?;
                if self.eat(&Tok::Assign) {
                    let value = self.parse_expr()?;
                    self.expect(Tok::Semi, "after the assignment")?;
                    return Ok(Stmt::Assign {
                        target: LValue::ThisField(name),
                        value,
                    });
                }
                // `this.method(..)` or `this.field` used as an expression
                let base = if self.peek() == Some(&Tok::LParen) {
                    let args = self.parse_call_args()?;
                    Expr::Call {
                        target: Some(Box::new(Expr::This)),
                        method: name,
                        args,
                    }
                } else {
                    Expr::FieldAccess {
                        target: Box::new(Expr::This),
                        field: name,
                    }
                };
                let expr = self.parse_postfix_from(base)?;
                self.expect(Tok::Semi, "after the statement")?;
                Ok(Stmt::Expr(expr))
            }
            Some(Tok::Ident(_)) => {
                // Disambiguate declaration vs assignment vs expression.
                let is_decl = matches!(self.peek_at(1), Some(Tok::Ident(_)))
                    || (matches!(self.peek_at(1), Some(Tok::Lt))
                        && matches!(self.peek_at(2), Some(Tok::Ident(_)))
                        && matches!(self.peek_at(3), Some(Tok::Gt))
                        && matches!(self.peek_at(4), Some(Tok::Ident(_))));
                if is_decl {
                    let ty = self.parse_type()?;
                    let name = self.expect_ident("a variable name")?;
                    let init = if self.eat(&Tok::Assign) {
                        Some(self.parse_expr()?)
                    } else {
                        None
                    };
                    self.expect(Tok::Semi, "after the declaration")?;
                    return Ok(Stmt::Local { ty, name, init });
                }
                if matches!(self.peek_at(1), Some(Tok::Assign)) {
                    let name = self.expect_ident("a variable name")?;
                    self.pos += 1; // '='
                    let value = self.parse_expr()?;
                    self.expect(Tok::Semi, "after the assignment")?;
                    return Ok(Stmt::Assign {
                        target: LValue::Name(name),
                        value,
                    });
                }
                let expr = self.parse_expr()?;
                self.expect(Tok::Semi, "after the statement")?;
                Ok(Stmt::Expr(expr))
            }
            Some(other) => {
                let found = other.describe();
                self.error(format!("unexpected {} at the start of a statement", found));
                Err(())
            }
            None => {
                self.error("unexpected end of input");
                Err(())
            }
        }
    }

    // ---- expressions ----

    fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat(&Tok::OrOr) {
            let rhs = self.parse_and()?;
            lhs = Expr::Binary {
                op: BinOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_equality()?;
        while self.eat(&Tok::AndAnd) {
            let rhs = self.parse_equality()?;
            lhs = Expr::Binary {
                op: BinOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                Some(Tok::EqEq) => BinOp::Eq,
                Some(Tok::NotEq) => BinOp::Ne,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_relational()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Lt) => BinOp::Lt,
                Some(Tok::Gt) => BinOp::Gt,
                Some(Tok::Le) => BinOp::Le,
                Some(Tok::Ge) => BinOp::Ge,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_additive()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Plus) => BinOp::Add,
                Some(Tok::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Star) => BinOp::Mul,
                Some(Tok::Slash) => BinOp::Div,
                Some(Tok::Percent) => BinOp::Rem,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        match self.peek() {
            Some(Tok::Bang) => {
                self.pos += 1;
                let expr = self.parse_unary()?;
                Ok(Expr::Unary {
                    op: UnOp::Not,
                    expr: Box::new(expr),
                })
            }
            Some(Tok::Minus) => {
                self.pos += 1;
                let expr = self.parse_unary()?;
                Ok(Expr::Unary {
                    op: UnOp::Neg,
                    expr: Box::new(expr),
                })
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let primary = self.parse_primary()?;
        self.parse_postfix_from(primary)
    }

    fn parse_postfix_from(&mut self, mut expr: Expr) -> PResult<Expr> {
        while self.eat(&Tok::Dot) {
            let name = self.expect_ident("a member name after '.'")?;
            if self.peek() == Some(&Tok::LParen) {
                let args = self.parse_call_args()?;
                expr = Expr::Call {
                    target: Some(Box::new(expr)),
                    method: name,
                    args,
                };
            } else {
                expr = Expr::FieldAccess {
                    target: Box::new(expr),
                    field: name,
                };
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        match self.peek().cloned() {
            Some(Tok::Int(v)) => {
                self.pos += 1;
                Ok(Expr::Int(v))
            }
            Some(Tok::Float(v)) => {
                self.pos += 1;
                Ok(Expr::Float(v))
            }
            Some(Tok::Str(s)) => {
                self.pos += 1;
                Ok(Expr::Str(s))
            }
            Some(Tok::KwTrue) => {
                self.pos += 1;
                Ok(Expr::Bool(true))
            }
            Some(Tok::KwFalse) => {
                self.pos += 1;
                Ok(Expr::Bool(false))
            }
            Some(Tok::KwNull) => {
                self.pos += 1;
                Ok(Expr::Null)
            }
            Some(Tok::KwThis) => {
                self.pos += 1;
                Ok(Expr::This)
            }
            Some(Tok::LParen) => {
                self.pos += 1;
                let expr = self.parse_expr()?;
                self.expect(Tok::RParen, "to close the parenthesized expression")?;
                Ok(expr)
            }
            Some(Tok::KwNew) => {
                self.pos += 1;
                let class = self.expect_ident("a class name after 'new'")?;
                let type_arg = if self.eat(&Tok::Lt) {
                    let inner = self.parse_type()?;
                    self.expect(Tok::Gt, "to close the type argument")?;
                    Some(inner)
                } else {
                    None
                };
                let args = self.parse_call_args()?;
                Ok(Expr::New {
                    class,
                    type_arg,
                    args,
                })
            }
            Some(Tok::Ident(name)) => {
                self.pos += 1;
                if self.peek() == Some(&Tok::LParen) {
                    let args = self.parse_call_args()?;
                    Ok(Expr::Call {
                        target: None,
                        method: name,
                        args,
                    })
                } else {
                    Ok(Expr::Name(name))
                }
            }
            Some(other) => {
                let found = other.describe();
                self.error(format!("unexpected {} in an expression", found));
                Err(())
            }
            None => {
                self.error("unexpected end of input in an expression");
                Err(())
            }
        }
    }

    fn parse_call_args(&mut self) -> PResult<Vec<Expr>> {
        self.expect(Tok::LParen, "to open the argument list")?;
        self.parse_args_until_rparen()
    }

    fn parse_args_until_rparen(&mut self) -> PResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat(&Tok::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.eat(&Tok::Comma) {
                continue;
            }
            self.expect(Tok::RParen, "to close the argument list")?;
            break;
        }
        Ok(args)
    }

    // ---- recovery ----

    /// After a bad statement: consume up to and including the next ';', but
    /// never past the enclosing '}'.
    fn skip_to_stmt_end(&mut self) {
        while let Some(tok) = self.peek() {
            match tok {
                Tok::Semi => {
                    self.pos += 1;
                    return;
                }
                Tok::RBrace => return,
                Tok::LBrace => {
                    self.skip_balanced_braces();
                }
                _ => {
                    self.pos += 1;
                }
            }
        }
    }

    /// After a bad member: consume up to and including the next ';' or a
    /// balanced '{..}' body, but never past the class's closing '}'.
    fn skip_member(&mut self) {
        while let Some(tok) = self.peek() {
            match tok {
                Tok::Semi => {
                    self.pos += 1;
                    return;
                }
                Tok::LBrace => {
                    self.skip_balanced_braces();
                    return;
                }
                Tok::RBrace => return,
                _ => {
                    self.pos += 1;
                }
            }
        }
    }

    fn skip_balanced_braces(&mut self) {
        debug_assert_eq!(self.peek(), Some(&Tok::LBrace));
        let mut depth = 0usize;
        while let Some(token) = self.advance() {
            match token.tok {
                Tok::LBrace => depth += 1,
                Tok::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn skip_past_semi(&mut self) {
        while let Some(token) = self.advance() {
            if token.tok == Tok::Semi {
                return;
            }
        }
    }

    fn skip_to_next_class(&mut self) {
        while let Some(tok) = self.peek() {
            match tok {
                Tok::KwClass | Tok::KwUsing => return,
                Tok::LBrace => self.skip_balanced_braces(),
                _ => {
                    self.pos += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class_with_fields_ctor_method() {
        let source = r#"
public class Tier {
    private string name;
    private int alter;

    public Tier(string name, int alter) {
        this.name = name;
        this.alter = alter;
    }

    public int GetAlter() {
        return alter;
    }
}
"#;
        let (program, diags) = parse(source);
        assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
        assert_eq!(program.classes.len(), 1);
        let class = &program.classes[0];
        assert_eq!(class.name, "Tier");
        assert_eq!(class.fields.len(), 2);
        assert_eq!(class.ctors.len(), 1);
        assert_eq!(class.ctors[0].params.len(), 2);
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].ret, TypeName::Int);
    }

    #[test]
    fn test_parse_inheritance_and_base_initializer() {
        let source = r#"
public abstract class Tier {
    private string name;
    public Tier(string name) { this.name = name; }
}
public class Loewe : Tier {
    private int laenge;
    public Loewe(string name, int laenge) : base(name) {
        this.laenge = laenge;
    }
}
"#;
        let (program, diags) = parse(source);
        assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
        assert!(program.classes[0].is_abstract);
        assert_eq!(program.classes[1].parent.as_deref(), Some("Tier"));
        assert!(program.classes[1].ctors[0].base_args.is_some());
    }

    #[test]
    fn test_parse_generic_list_declaration() {
        let source = r#"
class Gehege {
    List<Tier> bewohner;
    public Gehege() {
        bewohner = new List<Tier>();
    }
    public int AnzahlTiere() {
        return bewohner.Size();
    }
}
"#;
        let (program, diags) = parse(source);
        assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
        let class = &program.classes[0];
        assert_eq!(
            class.fields[0].ty,
            TypeName::List(Box::new(TypeName::Class("Tier".into())))
        );
    }

    #[test]
    fn test_parse_error_reports_line_and_recovers() {
        // Line 2 (0-based) is missing a semicolon; the following method must
        // still be parsed.
        let source = "class Kaputt {\n    int a;\n    int b = 5\n    int Ok() { return 1; }\n}\n";
        let (program, diags) = parse(source);
        assert!(!diags.is_empty());
        assert!(diags.iter().any(|d| d.line >= 2));
        assert_eq!(program.classes[0].methods.len(), 1);
    }

    #[test]
    fn test_parse_using_directives() {
        let (program, diags) = parse("using System;\nusing System.Collections.Generic;\nclass A {}\n");
        assert!(diags.is_empty());
        assert_eq!(
            program.usings,
            vec![
                ("System".to_string(), 0),
                ("System.Collections.Generic".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_parse_while_and_if() {
        let source = r#"
class Logik {
    public bool IstGross(int wert) {
        if (wert > 5) {
            return true;
        } else {
            return false;
        }
    }
    public int Summe(int n) {
        int summe = 0;
        int i = 1;
        while (i <= n) {
            summe = summe + i;
            i = i + 1;
        }
        return summe;
    }
}
"#;
        let (program, diags) = parse(source);
        assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
        assert_eq!(program.classes[0].methods.len(), 2);
    }
}
