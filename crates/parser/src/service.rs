//! Service blocks and their rpc definitions
//!
//! A service body is cut into brace-balanced segments first. Each segment is
//! either a bare `rpc Name(Req) returns (Resp);` line or an rpc with an option
//! body, possibly carrying an HTTP mapping:
//!
//! ```text
//! rpc GetFoo(GetFooRequest) returns (Foo) {
//!   option (google.api.http) = {
//!     get: "/v1/foo"
//!   };
//! }
//! ```

use crate::cursor::Cursor;
use crate::scope::{block_extent, declaration_name};
use crate::source::SourceLine;
use crate::SchemaResult;
use protostub_common::{HttpMethod, Rpc, SchemaError, Service};

const RPC: &str = "rpc";
const RETURNS: &str = "returns";
const STREAM: &str = "stream";
const OPTION: &str = "option";

/// Request/response body selectors; accepted but not modeled
const BODY_KEYS: [&str; 2] = ["body", "response_body"];

/// Extract the service whose header is under `cursor`
///
/// Returns the service and the cursor positioned after its closing brace.
pub fn extract_service(cursor: Cursor<'_>) -> SchemaResult<(Service, Cursor<'_>)> {
    let window = cursor.rest();
    let Some(header) = window.first() else {
        return Ok((Service::default(), cursor));
    };

    let name = declaration_name(header)?;
    if window.len() < 2 && header.opens() == 0 {
        return Err(SchemaError::EmptyService {
            line: header.number,
            name,
        });
    }

    let extent = block_extent(window)?;
    let body = service_body(&window[..extent]);

    if body.is_empty() {
        return Err(SchemaError::EmptyService {
            line: header.number,
            name,
        });
    }

    let mut rpcs = Vec::new();
    for segment in split_segments(&body)? {
        if let Some(rpc) = parse_segment(segment)? {
            tracing::trace!(service = %name, rpc = %rpc.name, "extracted rpc");
            rpcs.push(rpc);
        }
    }

    Ok((Service { name, rpcs }, cursor.advance(extent)))
}

/// Lines strictly between the service's opening `{` and its matching `}`
///
/// The brace may sit on the header or on a line of its own, and the whole
/// service may fit on one line. Text sharing a line with either brace is kept.
fn service_body(block: &[SourceLine]) -> Vec<SourceLine> {
    let Some(open_idx) = block.iter().position(|line| line.opens() > 0) else {
        return Vec::new();
    };
    let close_idx = block.len() - 1;

    let mut body = Vec::new();
    let mut push = |number: usize, text: &str| {
        let line = SourceLine::new(number, text);
        if !line.text.is_empty() {
            body.push(line);
        }
    };

    let open_line = &block[open_idx];
    let after_open = open_line
        .text
        .split_once('{')
        .map_or("", |(_, rest)| rest);

    if open_idx == close_idx {
        let inner = after_open.rsplit_once('}').map_or("", |(inner, _)| inner);
        push(open_line.number, inner);
        return body;
    }

    push(open_line.number, after_open);
    for line in &block[open_idx + 1..close_idx] {
        push(line.number, &line.text);
    }

    let close_line = &block[close_idx];
    let before_close = close_line
        .text
        .rsplit_once('}')
        .map_or("", |(before, _)| before);
    push(close_line.number, before_close);

    body
}

/// Cut a service body into brace-balanced groups of lines
fn split_segments(body: &[SourceLine]) -> SchemaResult<Vec<&[SourceLine]>> {
    let mut segments = Vec::new();
    let mut start: Option<usize> = None;
    let mut depth: i64 = 0;

    for (idx, line) in body.iter().enumerate() {
        let first = *start.get_or_insert(idx);
        depth += line.opens() - line.closes();

        if depth <= 0 {
            segments.push(&body[first..=idx]);
            start = None;
            depth = 0;
        }
    }

    if let Some(first) = start {
        return Err(SchemaError::UnterminatedBlock {
            line: body[first].number,
            text: body[first].text.clone(),
        });
    }

    Ok(segments)
}

/// Parse one segment into an rpc
///
/// Segments made only of service-level options yield `None`.
fn parse_segment(segment: &[SourceLine]) -> SchemaResult<Option<Rpc>> {
    let has_rpc = segment.iter().any(|l| l.starts_with_keyword(RPC));
    if !has_rpc
        && segment
            .first()
            .is_some_and(|l| l.starts_with_keyword(OPTION))
    {
        return Ok(None);
    }

    if let [line] = segment {
        if line.starts_with_keyword(RPC) {
            return parse_rpc_line(line).map(Some);
        }
    }

    let mut rpc: Option<Rpc> = None;
    let mut http_method = None;
    let mut endpoint = None;

    for line in segment {
        if line.starts_with_keyword(RPC) {
            rpc = Some(parse_rpc_line(line)?);
            continue;
        }
        if line.starts_with_keyword(OPTION) {
            continue;
        }

        let (key, value) = option_entry(&line.text);
        if let Some(method) = HttpMethod::from_keyword(key) {
            http_method = Some(method);
            endpoint = value.and_then(endpoint_path);
            continue;
        }
        if BODY_KEYS.contains(&key) {
            continue;
        }

        // Anything else closes the rpc definition
        return match rpc {
            Some(rpc) => Ok(Some(Rpc {
                http_method,
                endpoint,
                ..rpc
            })),
            None => Err(SchemaError::UnexpectedToken {
                line: line.number,
                text: line.text.clone(),
            }),
        };
    }

    Ok(rpc.map(|rpc| Rpc {
        http_method,
        endpoint,
        ..rpc
    }))
}

/// Parse `rpc Name(Request) returns (Response)` positionally
fn parse_rpc_line(line: &SourceLine) -> SchemaResult<Rpc> {
    let cleaned = line.text.replace(['(', ')'], " ");
    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|t| *t != STREAM)
        .collect();

    if tokens.len() < 5 || tokens[3] != RETURNS {
        return Err(SchemaError::MalformedRpc {
            line: line.number,
            text: line.text.clone(),
        });
    }

    Ok(Rpc {
        name: tokens[1].to_string(),
        request: tokens[2].to_string(),
        response: tokens[4].trim_end_matches([';', '{', '}']).to_string(),
        endpoint: None,
        http_method: None,
    })
}

/// Split `key: value` (or `key value`) into its key and the rest of the line
fn option_entry(text: &str) -> (&str, Option<&str>) {
    if let Some((key, rest)) = text.split_once(':') {
        let key = key.trim();
        if !key.is_empty() && !key.contains(char::is_whitespace) {
            return (key, Some(rest.trim()));
        }
    }

    match text.split_once(' ') {
        Some((key, rest)) => (key, Some(rest.trim())),
        None => (text, None),
    }
}

/// Endpoint path from the value of an HTTP method entry, quotes stripped
fn endpoint_path(value: &str) -> Option<String> {
    let path = value
        .split_whitespace()
        .next()?
        .trim_end_matches([';', ','])
        .trim_matches(['"', '\'']);

    (!path.is_empty()).then(|| path.to_string())
}
