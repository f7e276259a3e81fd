//! Lexer for the learner language
//!
//! Produces a flat token stream with 0-based line positions. Lexing never
//! aborts: malformed input becomes error diagnostics and the offending
//! characters are skipped, so the parser can still report later problems.

use crate::diagnostics::Diagnostic;

#[derive(Debug, Clone, PartialEq)]
pub enum Tok {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),

    // Keywords
    KwUsing,
    KwClass,
    KwPublic,
    KwPrivate,
    KwProtected,
    KwAbstract,
    KwNew,
    KwThis,
    KwBase,
    KwIf,
    KwElse,
    KwWhile,
    KwReturn,
    KwTrue,
    KwFalse,
    KwNull,

    // Punctuation and operators
    LBrace,
    RBrace,
    LParen,
    RParen,
    Semi,
    Comma,
    Dot,
    Colon,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Bang,
}

impl Tok {
    /// Human-readable form for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Tok::Ident(name) => format!("'{}'", name),
            Tok::Int(v) => format!("'{}'", v),
            Tok::Float(v) => format!("'{}'", v),
            Tok::Str(_) => "string literal".to_string(),
            Tok::KwUsing => "'using'".into(),
            Tok::KwClass => "'class'".into(),
            Tok::KwPublic => "'public'".into(),
            Tok::KwPrivate => "'private'".into(),
            Tok::KwProtected => "'protected'".into(),
            Tok::KwAbstract => "'abstract'".into(),
            Tok::KwNew => "'new'".into(),
            Tok::KwThis => "'this'".into(),
            Tok::KwBase => "'base'".into(),
            Tok::KwIf => "'if'".into(),
            Tok::KwElse => "'else'".into(),
            Tok::KwWhile => "'while'".into(),
            Tok::KwReturn => "'return'".into(),
            Tok::KwTrue => "'true'".into(),
            Tok::KwFalse => "'false'".into(),
            Tok::KwNull => "'null'".into(),
            Tok::LBrace => "'{'".into(),
            Tok::RBrace => "'}'".into(),
            Tok::LParen => "'('".into(),
            Tok::RParen => "')'".into(),
            Tok::Semi => "';'".into(),
            Tok::Comma => "','".into(),
            Tok::Dot => "'.'".into(),
            Tok::Colon => "':'".into(),
            Tok::Assign => "'='".into(),
            Tok::Plus => "'+'".into(),
            Tok::Minus => "'-'".into(),
            Tok::Star => "'*'".into(),
            Tok::Slash => "'/'".into(),
            Tok::Percent => "'%'".into(),
            Tok::Lt => "'<'".into(),
            Tok::Gt => "'>'".into(),
            Tok::Le => "'<='".into(),
            Tok::Ge => "'>='".into(),
            Tok::EqEq => "'=='".into(),
            Tok::NotEq => "'!='".into(),
            Tok::AndAnd => "'&&'".into(),
            Tok::OrOr => "'||'".into(),
            Tok::Bang => "'!'".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub tok: Tok,
    pub line: usize,
}

fn keyword(word: &str) -> Option<Tok> {
    Some(match word {
        "using" => Tok::KwUsing,
        "class" => Tok::KwClass,
        "public" => Tok::KwPublic,
        "private" => Tok::KwPrivate,
        "protected" => Tok::KwProtected,
        "abstract" => Tok::KwAbstract,
        "new" => Tok::KwNew,
        "this" => Tok::KwThis,
        "base" => Tok::KwBase,
        "if" => Tok::KwIf,
        "else" => Tok::KwElse,
        "while" => Tok::KwWhile,
        "return" => Tok::KwReturn,
        "true" => Tok::KwTrue,
        "false" => Tok::KwFalse,
        "null" => Tok::KwNull,
        _ => return None,
    })
}

/// Tokenize `source`. Lexical problems are reported as diagnostics with raw
/// 0-based lines; the returned stream covers everything that could be read.
pub fn lex(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut tokens = Vec::new();
    let mut diagnostics = Vec::new();
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;
    let mut line = 0usize;

    macro_rules! push {
        ($tok:expr) => {
            tokens.push(Token { tok: $tok, line })
        };
    }

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\n' => {
                line += 1;
                i += 1;
            }
            c if c.is_whitespace() => i += 1,
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let start_line = line;
                i += 2;
                let mut closed = false;
                while i < chars.len() {
                    if chars[i] == '\n' {
                        line += 1;
                    }
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        i += 2;
                        closed = true;
                        break;
                    }
                    i += 1;
                }
                if !closed {
                    diagnostics.push(Diagnostic::error("unterminated block comment", start_line));
                }
            }
            '"' => {
                let start_line = line;
                i += 1;
                let mut text = String::new();
                let mut closed = false;
                while i < chars.len() {
                    match chars[i] {
                        '"' => {
                            i += 1;
                            closed = true;
                            break;
                        }
                        '\n' => break,
                        '\\' => {
                            let escaped = match chars.get(i + 1) {
                                Some('n') => '\n',
                                Some('t') => '\t',
                                Some('"') => '"',
                                Some('\\') => '\\',
                                other => {
                                    diagnostics.push(Diagnostic::error(
                                        format!(
                                            "unknown escape sequence '\\{}'",
                                            other.copied().unwrap_or(' ')
                                        ),
                                        line,
                                    ));
                                    i += 1;
                                    continue;
                                }
                            };
                            text.push(escaped);
                            i += 2;
                        }
                        other => {
                            text.push(other);
                            i += 1;
                        }
                    }
                }
                if !closed {
                    diagnostics.push(Diagnostic::error("unterminated string literal", start_line));
                }
                tokens.push(Token {
                    tok: Tok::Str(text),
                    line: start_line,
                });
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let is_float = chars.get(i) == Some(&'.')
                    && chars.get(i + 1).map(|c| c.is_ascii_digit()).unwrap_or(false);
                if is_float {
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                if is_float {
                    match text.parse::<f64>() {
                        Ok(v) => push!(Tok::Float(v)),
                        Err(_) => diagnostics
                            .push(Diagnostic::error(format!("invalid number '{}'", text), line)),
                    }
                } else {
                    match text.parse::<i64>() {
                        Ok(v) => push!(Tok::Int(v)),
                        Err(_) => diagnostics.push(Diagnostic::error(
                            format!("integer literal '{}' is too large", text),
                            line,
                        )),
                    }
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                match keyword(&word) {
                    Some(tok) => push!(tok),
                    None => push!(Tok::Ident(word)),
                }
            }
            '{' => {
                push!(Tok::LBrace);
                i += 1;
            }
            '}' => {
                push!(Tok::RBrace);
                i += 1;
            }
            '(' => {
                push!(Tok::LParen);
                i += 1;
            }
            ')' => {
                push!(Tok::RParen);
                i += 1;
            }
            ';' => {
                push!(Tok::Semi);
                i += 1;
            }
            ',' => {
                push!(Tok::Comma);
                i += 1;
            }
            '.' => {
                push!(Tok::Dot);
                i += 1;
            }
            ':' => {
                push!(Tok::Colon);
                i += 1;
            }
            '+' => {
                push!(Tok::Plus);
                i += 1;
            }
            '-' => {
                push!(Tok::Minus);
                i += 1;
            }
            '*' => {
                push!(Tok::Star);
                i += 1;
            }
            '/' => {
                push!(Tok::Slash);
                i += 1;
            }
            '%' => {
                push!(Tok::Percent);
                i += 1;
            }
            '=' => {
                if chars.get(i + 1) == Some(&'=') {
                    push!(Tok::EqEq);
                    i += 2;
                } else {
                    push!(Tok::Assign);
                    i += 1;
                }
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    push!(Tok::NotEq);
                    i += 2;
                } else {
                    push!(Tok::Bang);
                    i += 1;
                }
            }
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    push!(Tok::Le);
                    i += 2;
                } else {
                    push!(Tok::Lt);
                    i += 1;
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    push!(Tok::Ge);
                    i += 2;
                } else {
                    push!(Tok::Gt);
                    i += 1;
                }
            }
            '&' => {
                if chars.get(i + 1) == Some(&'&') {
                    push!(Tok::AndAnd);
                    i += 2;
                } else {
                    diagnostics.push(Diagnostic::error("unexpected character '&'", line));
                    i += 1;
                }
            }
            '|' => {
                if chars.get(i + 1) == Some(&'|') {
                    push!(Tok::OrOr);
                    i += 2;
                } else {
                    diagnostics.push(Diagnostic::error("unexpected character '|'", line));
                    i += 1;
                }
            }
            other => {
                diagnostics.push(Diagnostic::error(
                    format!("unexpected character '{}'", other),
                    line,
                ));
                i += 1;
            }
        }
    }

    (tokens, diagnostics)
}
