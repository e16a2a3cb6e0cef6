const MAX_VISIBLE_CHARS: usize = 100;

const SENSITIVE_PREFIXES: [(&str, &str); 4] = [
    ("Bearer ", "Bearer [REDACTED]"),
    ("password=", "password=[REDACTED]"),
    ("secret=", "secret=[REDACTED]"),
    ("token=", "token=[REDACTED]"),
];

/// Prepares user-supplied text for logging: trims, truncates to a short
/// preview on a character boundary, and redacts credential-shaped
/// substrings.
pub fn sanitize_for_log(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let preview = match trimmed.char_indices().nth(MAX_VISIBLE_CHARS) {
        Some((boundary, _)) => format!(
            "{}... ({} chars total)",
            &trimmed[..boundary],
            trimmed.chars().count()
        ),
        None => trimmed.to_string(),
    };

    redact_sensitive(&preview)
}

fn redact_sensitive(text: &str) -> String {
    let mut result = text.to_string();

    for (prefix, replacement) in SENSITIVE_PREFIXES {
        if let Some(start) = result.find(prefix) {
            let value_start = start + prefix.len();
            let value_end = result[value_start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|offset| value_start + offset)
                .unwrap_or(result.len());

            result = format!("{}{}{}", &result[..start], replacement, &result[value_end..]);
        }
    }

    result
}
