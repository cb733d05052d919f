use super::Snapshot;
use std::collections::BTreeSet;

struct Assignment<'a> {
    exported: bool,
    key: &'a str,
    value: &'a str,
}

fn parse_assignment(line: &str) -> Option<Assignment<'_>> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (exported, body) = match trimmed.strip_prefix("export ") {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let (key, value) = body.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some(Assignment {
        exported,
        key,
        value,
    })
}

pub fn parse_env(content: &str) -> Snapshot {
    let mut values = Snapshot::new();
    for line in content.lines() {
        if let Some(assignment) = parse_assignment(line) {
            values.insert(
                assignment.key.to_string(),
                parse_env_value(assignment.value),
            );
        }
    }
    values
}

pub fn parse_env_value(raw: &str) -> String {
    let raw = raw.trim_start();
    if let Some(rest) = raw.strip_prefix('"') {
        let mut value = String::new();
        let mut chars = rest.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '"' => return value,
                '\\' => match chars.next() {
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some(other) => value.push(other),
                    None => value.push('\\'),
                },
                other => value.push(other),
            }
        }
        return value;
    }
    if let Some(rest) = raw.strip_prefix('\'') {
        return match rest.find('\'') {
            Some(end) => rest[..end].to_string(),
            None => rest.to_string(),
        };
    }
    let unquoted = match raw.find(" #") {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    unquoted.trim_end().to_string()
}

pub fn format_env_value(value: &str) -> String {
    let needs_quotes = value.chars().any(|ch| {
        ch.is_whitespace() || matches!(ch, '#' | '"' | '\'' | '\\' | '=' | '$' | '`')
    });
    if !needs_quotes {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// Rewrites assignments for `values` in place, keeping comments and unrelated lines, and
/// appends keys that were not present yet.
pub fn update_env(content: &str, values: &Snapshot) -> String {
    let mut written = BTreeSet::new();
    let mut lines: Vec<String> = Vec::new();
    for line in content.lines() {
        let replacement = parse_assignment(line).and_then(|assignment| {
            values.get(assignment.key).map(|value| {
                written.insert(assignment.key.to_string());
                let prefix = if assignment.exported { "export " } else { "" };
                format!("{prefix}{}={}", assignment.key, format_env_value(value))
            })
        });
        lines.push(replacement.unwrap_or_else(|| line.to_string()));
    }
    for (key, value) in values {
        if !written.contains(key) {
            lines.push(format!("{key}={}", format_env_value(value)));
        }
    }
    let mut body = lines.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_handles_comments_exports_and_quotes() {
        let values = parse_env(
            "# header\n\nPORT=3000\nexport NAME = 'single quoted'\nMOTD=\"line\\nnext\"\nURL=http://x # trailing\nnot an assignment\n",
        );
        assert_eq!(values.get("PORT").map(String::as_str), Some("3000"));
        assert_eq!(values.get("NAME").map(String::as_str), Some("single quoted"));
        assert_eq!(values.get("MOTD").map(String::as_str), Some("line\nnext"));
        assert_eq!(values.get("URL").map(String::as_str), Some("http://x"));
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn format_env_value_quotes_only_when_needed() {
        assert_eq!(format_env_value("plain"), "plain");
        assert_eq!(format_env_value(""), "");
        assert_eq!(format_env_value("two words"), "\"two words\"");
        assert_eq!(format_env_value("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn formatted_values_parse_back_unchanged() {
        for value in ["plain", "two words", "quote\"and\\slash", "multi\nline", "#hash"] {
            assert_eq!(parse_env_value(&format_env_value(value)), value);
        }
    }

    #[test]
    fn update_env_replaces_in_place_and_appends_new_keys() {
        let content = "# keep me\nexport PORT=80\nOTHER=1\n";
        let values = Snapshot::from_iter([
            ("PORT".to_string(), "3000".to_string()),
            ("DEBUG".to_string(), "true".to_string()),
        ]);
        assert_eq!(
            update_env(content, &values),
            "# keep me\nexport PORT=3000\nOTHER=1\nDEBUG=true\n"
        );
    }
}
