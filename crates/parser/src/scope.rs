//! Scope boundaries and declaration headers

use crate::source::SourceLine;
use crate::SchemaResult;
use protostub_common::SchemaError;

/// Number of lines in the block opened by the first line of `lines`,
/// closing-brace line included.
///
/// Braces are tallied line by line. The block counts as opened once a line
/// containing `{` has been seen; it ends on the first line after which the
/// tally drops below 1. `message Foo {}` is therefore a one-line block.
pub fn block_extent(lines: &[SourceLine]) -> SchemaResult<usize> {
    let mut depth: i64 = 0;
    let mut opened = false;

    for (idx, line) in lines.iter().enumerate() {
        let opens = line.opens();
        if opens > 0 {
            opened = true;
        }
        depth += opens - line.closes();

        if opened && depth < 1 {
            return Ok(idx + 1);
        }
    }

    let header = lines.first();
    Err(SchemaError::UnterminatedBlock {
        line: header.map_or(0, |l| l.number),
        text: header.map(|l| l.text.clone()).unwrap_or_default(),
    })
}

/// Name declared by a `message`/`enum`/`service` header line
///
/// ```
/// use protostub_parser::{declaration_name, SourceLine};
///
/// let header = SourceLine::new(1, "message UpdateBasketReq{");
/// assert_eq!(declaration_name(&header).unwrap(), "UpdateBasketReq");
/// ```
pub fn declaration_name(header: &SourceLine) -> SchemaResult<String> {
    let name = header
        .text
        .split_whitespace()
        .nth(1)
        .map(|token| token.replace(['{', '}'], ""))
        .unwrap_or_default();

    if name.is_empty() {
        return Err(SchemaError::MalformedDeclarationHeader {
            line: header.number,
            text: header.text.clone(),
        });
    }

    Ok(name)
}
