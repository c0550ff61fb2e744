use crate::data::{ParseError, ParseErrorKind, Position};
use crate::property::{find_property, JsonRecord};
use crate::scanner::Scanner;
use crate::value::JsonValue;
use tracing::trace;

enum ParseState {
    // Between properties: expecting a key or the end of the object
    Default,
    KeyName,
    // The key (and its colon) has been read, its value comes next
    Value { key: String, pos: Position },
}

/// Parses a JSON object into a freshly defaulted record.
///
/// Keys may arrive in any order and are matched by exact name against
/// [`JsonRecord::properties`]. A key the record doesn't declare is an
/// [`ParseErrorKind::UnexpectedPropertyName`] error. A comma right before the closing
/// brace is accepted. Property names are not checked for duplicates here, the
/// top-level entry points do it once per call.
pub fn parse_record<R: JsonRecord>(scanner: &mut Scanner<'_>) -> Result<R, ParseError> {
    scanner.expect('{')?;
    scanner.enter()?;

    let properties = R::properties();
    let mut record = R::default();
    let mut state = ParseState::Default;

    loop {
        state = match state {
            ParseState::Default => match scanner.peek_token()? {
                '"' => ParseState::KeyName,
                '}' => {
                    scanner.expect('}')?;
                    scanner.leave();
                    return Ok(record);
                }
                ch => return Err(scanner.error_here(ParseErrorKind::UnexpectedCharacter(ch))),
            },
            ParseState::KeyName => {
                scanner.skip_whitespace();
                let pos = scanner.position();
                let key = scanner.scan_key()?;
                scanner.expect(':')?;
                ParseState::Value { key, pos }
            }
            ParseState::Value { key, pos } => {
                let Some(property) = find_property(properties, &key) else {
                    trace!(record = R::record_name(), key = %key, "rejecting undeclared property");
                    return Err(ParseError::at(ParseErrorKind::UnexpectedPropertyName(key), pos));
                };
                trace!(record = R::record_name(), property = property.name(), "parsing property");
                property.value_mut(&mut record).parse_json(scanner)?;
                scanner.expect_separator_or('}')?;
                ParseState::Default
            }
        };
    }
}

/// Parses a JSON array whose elements all have the type `T`.
/// A comma right before the closing bracket is accepted.
pub fn parse_sequence<T: JsonValue + Default>(scanner: &mut Scanner<'_>) -> Result<Vec<T>, ParseError> {
    scanner.expect('[')?;
    scanner.enter()?;

    let mut items = Vec::new();
    while scanner.peek_token()? != ']' {
        let mut item = T::default();
        item.parse_json(scanner)?;
        items.push(item);
        scanner.expect_separator_or(']')?;
    }

    scanner.expect(']')?;
    scanner.leave();
    Ok(items)
}
