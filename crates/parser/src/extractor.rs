//! Recursive scope extraction
//!
//! Walks a range of lines, dispatching on the first token of each line:
//! `message` recurses into the nested block, `enum` and `service` hand off to
//! their extractors, and every other non-omittable line is read as a field.

use crate::cursor::Cursor;
use crate::enums::extract_enum;
use crate::field::{header_field, parse_field};
use crate::scope::block_extent;
use crate::service::extract_service;
use crate::source::SourceLine;
use crate::SchemaResult;
use protostub_common::{Declaration, DeclarationKind, Message, ScopedSection, SectionType};

/// Populate `section` with the declarations found in `lines`
///
/// The first structural error aborts the walk and is returned unchanged.
pub fn extract_scope(
    lines: &[SourceLine],
    mut section: ScopedSection,
) -> SchemaResult<ScopedSection> {
    let mut cursor = Cursor::new(lines);

    while let Some(line) = cursor.peek() {
        cursor = match line.first_token() {
            Some(kw) if kw == DeclarationKind::Message.keyword() => {
                let (message, next) = extract_message(cursor)?;
                section.push(Declaration::Message(message));
                next
            }
            Some(kw) if kw == DeclarationKind::Enum.keyword() => {
                let (proto_enum, next) = extract_enum(cursor)?;
                section.push(Declaration::Enum(proto_enum));
                next
            }
            Some(kw) if kw == DeclarationKind::Service.keyword() => {
                let (service, next) = extract_service(cursor)?;
                tracing::debug!(
                    service = %service.name,
                    rpcs = service.rpcs.len(),
                    line = line.number,
                    position = cursor.position(),
                    "extracted service"
                );
                section.push(Declaration::Service(service));
                next
            }
            _ => {
                if !line.is_omittable() {
                    let field = parse_field(line)?;
                    if !field.name.is_empty() {
                        section.push(Declaration::Field(field));
                    }
                }
                cursor.advance(1)
            }
        };
    }

    Ok(section)
}

/// Extract the message whose header is under `cursor`, recursing into its body
fn extract_message(cursor: Cursor<'_>) -> SchemaResult<(Message, Cursor<'_>)> {
    let window = cursor.rest();
    let Some(header) = window.first() else {
        return Ok((
            Message::new(Default::default(), ScopedSection::root()),
            cursor,
        ));
    };

    let declaration = header_field(header)?;
    let extent = block_extent(window)?;

    // The closing line stays in the interior; a bare `}` is omittable.
    let interior = &window[1..extent];
    let body = extract_scope(
        interior,
        ScopedSection::new(declaration.name.clone(), SectionType::Message),
    )?;

    tracing::debug!(
        name = %declaration.name,
        declarations = body.declarations.len(),
        line = header.number,
        "extracted message"
    );

    Ok((Message::new(declaration, body), cursor.advance(extent)))
}
