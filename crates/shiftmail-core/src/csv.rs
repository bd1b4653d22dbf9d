//! Single-line CSV records.
//!
//! Used for backend arguments in the bootstrap file and for list-valued
//! properties. Fields are comma separated; a field containing a comma or a
//! double quote is wrapped in quotes, with embedded quotes doubled.

use crate::error::ModelError;

/// Split one record into its fields.
pub fn parse_record(input: &str) -> Result<Vec<String>, ModelError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = input.chars().peekable();
    // Set once a quoted field has been closed; only a comma may follow.
    let mut closed = false;

    loop {
        match chars.next() {
            None => {
                fields.push(std::mem::take(&mut field));
                return Ok(fields);
            }
            Some(',') => {
                fields.push(std::mem::take(&mut field));
                closed = false;
            }
            Some(_) if closed => {
                return Err(ModelError::IllegalArgument(format!(
                    "unexpected text after closing quote in '{input}'"
                )));
            }
            Some('"') if field.is_empty() => {
                loop {
                    match chars.next() {
                        None => {
                            return Err(ModelError::IllegalArgument(format!(
                                "unterminated quote in '{input}'"
                            )));
                        }
                        Some('"') if chars.peek() == Some(&'"') => {
                            chars.next();
                            field.push('"');
                        }
                        Some('"') => break,
                        Some(c) => field.push(c),
                    }
                }
                closed = true;
            }
            Some('"') => {
                return Err(ModelError::IllegalArgument(format!(
                    "unquoted field contains a quote in '{input}'"
                )));
            }
            Some(c) => field.push(c),
        }
    }
}

/// Join fields into one record, quoting where needed.
pub fn format_record<S: AsRef<str>>(fields: &[S]) -> String {
    if let [only] = fields {
        if only.as_ref().is_empty() {
            return "\"\"".to_string();
        }
    }

    fields
        .iter()
        .map(|f| quote_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"'])
        || field.starts_with(char::is_whitespace)
        || field.ends_with(char::is_whitespace);

    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_fields() {
        assert_eq!(parse_record("a,b,c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(parse_record("one").unwrap(), vec!["one"]);
        assert!(parse_record("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_keeps_empty_fields() {
        assert_eq!(parse_record("a,,b,").unwrap(), vec!["a", "", "b", ""]);
        assert_eq!(parse_record("\"\"").unwrap(), vec![""]);
    }

    #[test]
    fn test_parse_quoted_fields() {
        assert_eq!(
            parse_record(r#""Smith, Jo","say ""hi""",plain"#).unwrap(),
            vec!["Smith, Jo", "say \"hi\"", "plain"]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_quotes() {
        assert!(parse_record("\"open").is_err());
        assert!(parse_record("\"done\"x").is_err());
        assert!(parse_record("ab\"c").is_err());
    }

    #[test]
    fn test_format_quotes_only_when_needed() {
        assert_eq!(format_record(&["a", "b"]), "a,b");
        assert_eq!(format_record(&["x,y", "q\"t"]), r#""x,y","q""t""#);
        assert_eq!(format_record(&[" padded"]), "\" padded\"");
        assert_eq!(format_record::<&str>(&[]), "");
    }

    #[test]
    fn test_format_then_parse_awkward_fields() {
        let fields = vec!["", "Kitchen, Bar", "\"Angel\"", " lead "];
        let record = format_record(&fields);
        assert_eq!(parse_record(&record).unwrap(), fields);
    }
}
