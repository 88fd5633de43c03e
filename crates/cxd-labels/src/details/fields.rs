//! Field extractors, one per diagnostic message template.
//!
//! Each accepts both the Russian localization found in the collected samples
//! and the English MSVC wording:
//!
//! ```text
//! C2065: cout: необъявленный идентификатор
//! C2065: 'cout': undeclared identifier
//! ```

use std::sync::LazyLock;

use regex::Regex;

const QUOTES: &[char] = &['\'', '"', '`', '“', '”'];

static LEADING_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^C\d{4}: ([^:]+):").expect("valid leading field regex"));

static BEFORE_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:перед\s+идентификатором|before\s+identifier)\s*['"“”]([^'"“”]+)['"“”]"#)
        .expect("valid C2146 regex")
});

static CONVERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)C2440:.*?(?:невозможно\s+преобразовать|cannot\s+convert\s+from)\s*["']([^"']+)["']\s*(?:в|to)\s*["']([^"']+)["']"#,
    )
    .expect("valid C2440 regex")
});

static COMPARISON_OP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^C2446:\s*['"]?(==|!=|<=|>=|<|>|:)"#).expect("valid C2446 regex")
});

static OPERATOR_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^\s*C2676:\s*(?:бинарн\w*|унарн\w*|binary|unary)?\s*["']([^"']+)["']\s*:"#)
        .expect("valid C2676 regex")
});

static OPERAND_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^\s*(C267[89]):\s*(?:бинарн\w*|унарн\w*|binary|unary)?\s*["']([^"']+)["']\s*:.*?(?:операнд\w*\s+типа|operand\s+of\s+type)\s*["']([^"']+)["']"#,
    )
    .expect("valid operand type regex")
});

/// The identifier in the leading `C1234: name:` field, unquoted.
#[must_use]
pub fn leading_identifier(text: &str) -> Option<&str> {
    let field = LEADING_FIELD.captures(text)?.get(1)?.as_str();
    let ident = field.trim().trim_matches(QUOTES).trim();
    (!ident.is_empty()).then_some(ident)
}

/// The identifier a C2146 message reports the missing token before.
#[must_use]
pub fn identifier_before(text: &str) -> Option<&str> {
    let ident = BEFORE_IDENTIFIER.captures(text)?.get(1)?.as_str().trim();
    (!ident.is_empty()).then_some(ident)
}

/// Source and destination types of a C2440 conversion.
#[must_use]
pub fn conversion_types(text: &str) -> Option<(&str, &str)> {
    let caps = CONVERSION.captures(text)?;
    Some((caps.get(1)?.as_str().trim(), caps.get(2)?.as_str().trim()))
}

/// Comparison operator of a C2446 message.
#[must_use]
pub fn comparison_operator(text: &str) -> Option<&str> {
    Some(COMPARISON_OP.captures(text.trim())?.get(1)?.as_str())
}

/// Operator of a C2676 message, if the head names one.
#[must_use]
pub fn operator_head(text: &str) -> Option<&str> {
    Some(OPERATOR_HEAD.captures(text)?.get(1)?.as_str())
}

/// Operator and operand type of a C2678 (left) or C2679 (right) message.
///
/// The code prefix must match `code`, so a C2678 message never feeds a C2679 rule.
#[must_use]
pub fn operator_and_operand<'t>(text: &'t str, code: &str) -> Option<(&'t str, &'t str)> {
    let caps = OPERAND_TYPE.captures(text.trim())?;
    if caps.get(1)?.as_str() != code {
        return None;
    }
    let op = caps.get(2)?.as_str().trim();
    let operand = caps.get(3)?.as_str().trim();
    (!op.is_empty() && !operand.is_empty()).then_some((op, operand))
}

/// Every fragment enclosed in matching single or double quotes, trimmed.
#[must_use]
pub fn quoted_fragments(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find(['\'', '"']) {
        let quote = rest[open..].chars().next().unwrap_or('"');
        let body = &rest[open + 1..];
        let Some(close) = body.find(quote) else {
            break;
        };
        fragments.push(body[..close].trim());
        rest = &body[close + 1..];
    }
    fragments
}
