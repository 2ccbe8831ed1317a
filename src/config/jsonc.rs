// ABOUTME: Comment and trailing-comma stripping for JSON-with-comments files.
// ABOUTME: Replaces stripped bytes with spaces so parse errors keep their line and column.

/// Remove `//` and `/* */` comments and trailing commas outside string literals.
pub fn strip(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;
    let mut in_string = false;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            match b {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }

        match (b, bytes.get(i + 1).copied()) {
            (b'"', _) => {
                in_string = true;
                i += 1;
            }
            (b'/', Some(b'/')) => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    out[i] = b' ';
                    i += 1;
                }
            }
            (b'/', Some(b'*')) => {
                let end = input[i + 2..]
                    .find("*/")
                    .map(|pos| i + 2 + pos + 2)
                    .unwrap_or(bytes.len());
                blank(&mut out[i..end]);
                i = end;
            }
            _ => i += 1,
        }
    }

    remove_trailing_commas(&mut out);
    String::from_utf8_lossy(&out).into_owned()
}

fn blank(span: &mut [u8]) {
    for b in span.iter_mut().filter(|b| **b != b'\n') {
        *b = b' ';
    }
}

// Runs after comments are blanked, so only whitespace can sit between a
// comma and the closing bracket.
fn remove_trailing_commas(out: &mut [u8]) {
    let mut in_string = false;
    let mut i = 0;
    while i < out.len() {
        let b = out[i];
        if in_string {
            match b {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
        } else if b == b'"' {
            in_string = true;
        } else if b == b',' {
            let next = out[i + 1..]
                .iter()
                .copied()
                .find(|c| !c.is_ascii_whitespace());
            if matches!(next, Some(b'}') | Some(b']')) {
                out[i] = b' ';
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_comments() {
        let input = "{\n  // the name\n  \"name\": \"x\"\n}";
        let value: serde_json::Value = serde_json::from_str(&strip(input)).unwrap();
        assert_eq!(value["name"], "x");
    }

    #[test]
    fn strips_block_comments_across_lines() {
        let input = "{ /* one\n two */ \"a\": 1 }";
        let stripped = strip(input);
        assert_eq!(stripped.lines().count(), 2);
        let value: serde_json::Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn keeps_comment_markers_inside_strings() {
        let input = r#"{"url": "https://example.com/*path*/", "q": "say \"//hi\""}"#;
        let value: serde_json::Value = serde_json::from_str(&strip(input)).unwrap();
        assert_eq!(value["url"], "https://example.com/*path*/");
        assert_eq!(value["q"], "say \"//hi\"");
    }

    #[test]
    fn removes_trailing_commas() {
        let input = "{\"a\": [1, 2, ], \"b\": {\"c\": true, // done\n }, }";
        let value: serde_json::Value = serde_json::from_str(&strip(input)).unwrap();
        assert_eq!(value["a"], serde_json::json!([1, 2]));
        assert_eq!(value["b"]["c"], true);
    }

    #[test]
    fn keeps_commas_inside_strings() {
        let input = r#"{"a": "x, }"}"#;
        assert_eq!(strip(input), input);
    }
}
