//! Field declarations

use crate::scope::declaration_name;
use crate::source::SourceLine;
use crate::SchemaResult;
use protostub_common::{MessageField, SchemaError};

const REPEATED: &str = "repeated";

/// Labels that carry no meaning for the extracted model
const IGNORED_LABELS: [&str; 2] = ["optional", "required"];

/// Parse a `[repeated] <type> <name> [= N];` line
///
/// Anything after the name (tag numbers, field options) is ignored. The name
/// may come back empty, e.g. for `string =1;`; callers skip such fields.
pub fn parse_field(line: &SourceLine) -> SchemaResult<MessageField> {
    let mut tokens = line.text.split_whitespace().peekable();
    let mut is_array = false;

    match tokens.peek() {
        Some(&REPEATED) => {
            is_array = true;
            tokens.next();
        }
        Some(label) if IGNORED_LABELS.contains(label) => {
            tokens.next();
        }
        _ => {}
    }

    let (Some(data_type), Some(name)) = (tokens.next(), tokens.next()) else {
        return Err(SchemaError::MalformedField {
            line: line.number,
            text: line.text.clone(),
        });
    };

    let name = name
        .split(['=', ';', '{', '}'])
        .next()
        .unwrap_or_default()
        .to_string();

    Ok(MessageField {
        name,
        data_type: data_type.to_string(),
        is_array,
    })
}

/// Field descriptor implied by a `message Foo {` header: `{name: Foo, data_type: message}`
pub fn header_field(header: &SourceLine) -> SchemaResult<MessageField> {
    let name = declaration_name(header)?;
    let data_type = header.first_token().unwrap_or_default().to_string();

    Ok(MessageField {
        name,
        data_type,
        is_array: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SchemaResult<MessageField> {
        parse_field(&SourceLine::new(1, text))
    }

    #[test]
    fn test_plain_field() {
        let field = parse("string name = 1;").unwrap();
        assert_eq!(field.name, "name");
        assert_eq!(field.data_type, "string");
        assert!(!field.is_array);
    }

    #[test]
    fn test_repeated_field() {
        let field = parse("repeated string tags;").unwrap();
        assert_eq!(
            field,
            MessageField {
                name: "tags".to_string(),
                data_type: "string".to_string(),
                is_array: true,
            }
        );
    }

    #[test]
    fn test_name_is_cut_at_tag() {
        assert_eq!(parse("int64 id=3;").unwrap().name, "id");
        assert_eq!(
            parse("google.protobuf.Timestamp created_at = 4 [deprecated = true];")
                .unwrap()
                .data_type,
            "google.protobuf.Timestamp"
        );
    }

    #[test]
    fn test_labels_are_dropped() {
        let field = parse("optional int32 page_size = 2;").unwrap();
        assert_eq!(field.name, "page_size");
        assert_eq!(field.data_type, "int32");
        assert!(!field.is_array);
    }

    #[test]
    fn test_missing_name() {
        assert_eq!(
            parse("repeated string").unwrap_err(),
            SchemaError::MalformedField {
                line: 1,
                text: "repeated string".to_string()
            }
        );
        assert!(parse("bool").is_err());
    }

    #[test]
    fn test_empty_name_is_not_an_error() {
        assert_eq!(parse("string =1;").unwrap().name, "");
    }

    #[test]
    fn test_header_field() {
        let field = header_field(&SourceLine::new(2, "message Inner {")).unwrap();
        assert_eq!(field.name, "Inner");
        assert_eq!(field.data_type, "message");
        assert!(!field.is_array);
    }
}
