//! Token normalization shared by document terms and query predicates.

use once_cell::sync::Lazy;
use regex::Regex;

/// Punctuation and symbol characters removed before splitting.
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[`~!@#$%^&*()_|+\-=?;:'",.<>{}\[\]\\/]"#).expect("punctuation pattern is valid")
});

/// Strip punctuation, trim, lowercase, split on single spaces and drop empty tokens.
pub fn normalize(text: &str) -> Vec<String> {
    let stripped = PUNCTUATION.replace_all(text, "");
    stripped
        .trim()
        .to_lowercase()
        .split(' ')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Unique tokens of several texts, in first-seen order.
pub fn unique_tokens<'a, I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for text in texts {
        for token in normalize(text) {
            if !out.contains(&token) {
                out.push(token);
            }
        }
    }
    out
}
