//! Dialect shims
//!
//! Exercises are authored in classroom MySQL; the sandbox runs SQLite. A
//! fixed set of textual rewrites translates the constructs that actually
//! occur in lesson material. This is deliberately not a SQL parser: each
//! shim is a regex over the statement text.

use regex::{NoExpand, Regex};
use std::sync::OnceLock;

fn set_var_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)SET\s+@(\w+)\s*:?=\s*([^;]+);").expect("invalid regex")
    })
}

fn hash_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)(^|\s)#").expect("invalid regex"))
}

fn concat_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bCONCAT\(([^()]*)\)").expect("invalid regex"))
}

fn year_month_day_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(YEAR|MONTH|DAY)\(([^()]*)\)").expect("invalid regex"))
}

fn datediff_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bDATEDIFF\(\s*([^,()]+)\s*,\s*([^,()]+)\s*\)").expect("invalid regex")
    })
}

fn date_add_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bDATE_ADD\(\s*([^,()]+)\s*,\s*INTERVAL\s+([+-]?\d+)\s+DAY\s*\)")
            .expect("invalid regex")
    })
}

fn now_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bNOW\(\)").expect("invalid regex"))
}

fn curdate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bCURDATE\(\)").expect("invalid regex"))
}

/// Rewrite a MySQL-flavored statement into SQLite-compatible text.
pub fn rewrite(statement: &str) -> String {
    // `#` line comments become `--` before anything else looks at the text.
    let text = hash_comment_re().replace_all(statement, "$1--").into_owned();

    // `SET @name := value;` declarations are lifted out and substituted.
    let mut variables: Vec<(String, String)> = Vec::new();
    let text = set_var_re()
        .replace_all(&text, |caps: &regex::Captures<'_>| {
            variables.push((caps[1].to_string(), caps[2].trim().to_string()));
            String::new()
        })
        .into_owned();
    let mut text = text;
    for (name, value) in &variables {
        let usage = Regex::new(&format!(r"@{}\b", regex::escape(name))).expect("invalid regex");
        // NoExpand: the value is literal text, not a replacement template.
        let replacement = format!("({})", value);
        text = usage.replace_all(&text, NoExpand(&replacement)).into_owned();
    }

    let text = concat_re()
        .replace_all(&text, |caps: &regex::Captures<'_>| {
            caps[1]
                .split(',')
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(" || ")
        })
        .into_owned();

    let text = year_month_day_re()
        .replace_all(&text, |caps: &regex::Captures<'_>| {
            let fmt = match caps[1].to_uppercase().as_str() {
                "YEAR" => "%Y",
                "MONTH" => "%m",
                _ => "%d",
            };
            format!("CAST(strftime('{}', {}) AS INTEGER)", fmt, &caps[2])
        })
        .into_owned();

    let text = datediff_re()
        .replace_all(&text, "CAST((julianday($1) - julianday($2)) AS INTEGER)")
        .into_owned();
    let text = date_add_re().replace_all(&text, "date($1, '$2 days')").into_owned();
    let text = now_re().replace_all(&text, "datetime('now')").into_owned();
    let text = curdate_re().replace_all(&text, "date('now')").into_owned();

    text.trim().to_string()
}
