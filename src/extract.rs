//! Pulls a JSON object out of free-form model output.
//!
//! Models asked for "JSON only" still sometimes wrap the object in prose or
//! code fences. The scanner below finds the first balanced `{...}` span,
//! skipping braces that appear inside JSON string literals.

/// Returns the first top-level balanced `{...}` span in `text`.
pub fn find_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    // Unterminated object
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerates_leading_prose() {
        let text = r#"Sure! {"figure_id":"napoleon","hot_take":"Sacré bleu!"}"#;
        assert_eq!(
            find_json_object(text),
            Some(r#"{"figure_id":"napoleon","hot_take":"Sacré bleu!"}"#)
        );
    }

    #[test]
    fn test_stops_at_first_balanced_object() {
        let text = r#"{"a": {"b": 1}} and then {"c": 2}"#;
        assert_eq!(find_json_object(text), Some(r#"{"a": {"b": 1}}"#));
    }

    #[test]
    fn test_ignores_braces_inside_strings() {
        let text = r#"```json
{"hot_take": "I came, I saw, I wrote {braces} and \"quotes\" }"}
```"#;
        let span = find_json_object(text).unwrap();
        let value: serde_json::Value = serde_json::from_str(span).unwrap();
        assert_eq!(value["hot_take"], r#"I came, I saw, I wrote {braces} and "quotes" }"#);
    }

    #[test]
    fn test_no_object() {
        assert_eq!(find_json_object("The spirits are silent."), None);
        assert_eq!(find_json_object(r#"{"unterminated": "#), None);
    }
}
