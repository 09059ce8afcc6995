//! Line normalization
//!
//! Source text is reduced to a list of [`SourceLine`]s before extraction:
//! comments and blank lines are dropped, whitespace is collapsed, and every
//! kept line remembers where it came from.

/// First tokens of lines that never contribute a declaration
const OMITTED_KEYWORDS: [&str; 6] = ["", "//", "import", "option", "syntax", "package"];

/// A normalized, non-blank source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the original text
    pub number: usize,
    /// Normalized text
    pub text: String,
}

impl SourceLine {
    pub fn new(number: usize, raw: &str) -> Self {
        Self {
            number,
            text: normalize(raw),
        }
    }

    /// First whitespace-delimited token
    pub fn first_token(&self) -> Option<&str> {
        self.text.split_whitespace().next()
    }

    /// Whether the first token is exactly `keyword`
    pub fn starts_with_keyword(&self, keyword: &str) -> bool {
        self.first_token() == Some(keyword)
    }

    pub fn is_omittable(&self) -> bool {
        is_omittable(&self.text)
    }

    /// Number of `{` on the line
    pub fn opens(&self) -> i64 {
        self.text.matches('{').count() as i64
    }

    /// Number of `}` on the line
    pub fn closes(&self) -> i64 {
        self.text.matches('}').count() as i64
    }
}

/// Replace tabs, collapse repeated spaces and trim the line
pub fn normalize(raw: &str) -> String {
    raw.replace('\t', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a line is structurally irrelevant (blank, comment, import, option,
/// syntax or package statement)
pub fn is_omittable(line: &str) -> bool {
    let first = line
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_end_matches([';', '{', '}']);

    OMITTED_KEYWORDS.contains(&first)
}

/// Split source text into normalized lines, dropping comments and blank lines
pub fn source_lines(source: &str) -> Vec<SourceLine> {
    let mut in_block_comment = false;

    source
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| {
            let stripped = strip_comments(raw, &mut in_block_comment);
            let line = SourceLine::new(idx + 1, &stripped);
            (!line.text.is_empty()).then_some(line)
        })
        .collect()
}

/// Remove `//` and `/* */` comments, leaving string literals alone.
/// `in_block` carries an open block comment over to the next line.
fn strip_comments(raw: &str, in_block: &mut bool) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if *in_block {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                *in_block = false;
            }
            continue;
        }

        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => break,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                *in_block = true;
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("\tstring  name =\t1;  "), "string name = 1;");
        assert_eq!(normalize("message Foo {\r"), "message Foo {");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_omittable_lines() {
        assert!(is_omittable(""));
        assert!(is_omittable("}"));
        assert!(is_omittable("};"));
        assert!(is_omittable("// comment"));
        assert!(is_omittable("import \"google/api/annotations.proto\";"));
        assert!(is_omittable("option java_package = \"io.grpc\";"));
        assert!(is_omittable("syntax = \"proto3\";"));
        assert!(is_omittable("package helloworld;"));
        assert!(is_omittable("package;"));

        assert!(!is_omittable("string name = 1;"));
        assert!(!is_omittable("options string = 1;"));
        assert!(!is_omittable("repeated packages list = 2;"));
    }

    #[test]
    fn test_source_lines_drop_comments_and_blanks() {
        let source = "syntax = \"proto3\";\n\n// leading comment\nmessage A { // trailing\r\n  string x = 1;\n}\n";
        let lines = source_lines(source);

        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["syntax = \"proto3\";", "message A {", "string x = 1;", "}"]
        );
        assert_eq!(lines[1].number, 4);
        assert_eq!(lines[3].number, 6);
    }

    #[test]
    fn test_block_comments_span_lines() {
        let source = "/*\n * message Fake {\n */\nmessage Real { /* inline */ }\n";
        let lines = source_lines(source);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "message Real { }");
        assert_eq!(lines[0].number, 4);
    }

    #[test]
    fn test_comment_markers_inside_strings_are_kept() {
        let lines = source_lines("get: \"/v1/a//b\" // route\n");
        assert_eq!(lines[0].text, "get: \"/v1/a//b\"");
    }

    #[test]
    fn test_brace_counts() {
        let line = SourceLine::new(1, "option (google.api.http) = { get: \"/v1\" };");
        assert_eq!(line.opens(), 1);
        assert_eq!(line.closes(), 1);
        assert!(line.starts_with_keyword("option"));
    }
}
