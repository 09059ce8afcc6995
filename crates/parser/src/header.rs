//! File-level statements
//!
//! `package`, `syntax` and `import` lines are omitted from the declaration
//! tree, but the package identifier is needed downstream to build method
//! paths, so they are collected separately here.

use crate::source::SourceLine;

/// Top-level statements of a source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    pub package: Option<String>,
    pub syntax: Option<String>,
    pub imports: Vec<String>,
}

impl FileHeader {
    /// Collect statements that appear outside of any block
    ///
    /// The first `package` and `syntax` statements win.
    pub fn scan(lines: &[SourceLine]) -> Self {
        let mut header = Self::default();
        let mut depth: i64 = 0;

        for line in lines {
            if depth == 0 {
                match line.first_token() {
                    Some("package") if header.package.is_none() => {
                        header.package = line
                            .text
                            .split_whitespace()
                            .nth(1)
                            .map(|p| p.trim_end_matches(';').to_string())
                            .filter(|p| !p.is_empty());
                    }
                    Some("syntax") if header.syntax.is_none() => {
                        header.syntax = quoted_value(&line.text);
                    }
                    Some("import") => {
                        if let Some(path) = quoted_value(&line.text) {
                            header.imports.push(path);
                        }
                    }
                    _ => {}
                }
            }
            depth = (depth + line.opens() - line.closes()).max(0);
        }

        header
    }
}

/// Contents of the first quoted string on the line
fn quoted_value(text: &str) -> Option<String> {
    let start = text.find(['"', '\''])?;
    let quote = text[start..].chars().next()?;
    let rest = &text[start + 1..];
    let end = rest.find(quote)?;
    Some(rest[..end].to_string())
}
