use regex::Regex;
use std::sync::OnceLock;

fn env_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env reference pattern"))
}

/// Expand `${VAR_NAME}` references using `lookup`; unknown names are left as-is.
pub fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    env_ref_pattern()
        .replace_all(value, |cap: &regex::Captures<'_>| {
            lookup(&cap[1]).unwrap_or_else(|| cap[0].to_string())
        })
        .into_owned()
}

/// Digits with an optional leading `+`; spaces, dashes and brackets are dropped.
pub fn normalize_phone_number(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let plus = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    let only_separators = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')' | '.'));

    if !only_separators || !(8..=15).contains(&digits.len()) {
        return None;
    }
    Some(if plus { format!("+{}", digits) } else { digits })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_references_only() {
        let lookup = |name: &str| (name == "HOST").then(|| "example.org".to_string());
        assert_eq!(
            expand_with("https://${HOST}/${MISSING}", lookup),
            "https://example.org/${MISSING}"
        );
    }

    #[test]
    fn phone_numbers_are_normalized() {
        assert_eq!(
            normalize_phone_number("+55 (11) 99999-9999").as_deref(),
            Some("+5511999999999")
        );
        assert_eq!(normalize_phone_number("351912345678").as_deref(), Some("351912345678"));
        assert_eq!(normalize_phone_number("12ab"), None);
        assert_eq!(normalize_phone_number(""), None);
    }
}
