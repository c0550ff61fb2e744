//! A structural JSON codec: JSON objects are parsed straight into declared records,
//! and records are serialized back to compact JSON, without going through a
//! generic JSON tree.
//!
//! ```
//! use json_record::json_record;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Seed {
//!     radius: f32,
//! }
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Fruit {
//!     color: String,
//!     size: i32,
//!     seeds: Vec<Seed>,
//! }
//!
//! json_record!(Seed { radius });
//! json_record!(Fruit { color, size, seeds });
//!
//! let fruit: Fruit = json_record::parse(r#"{"size": -25, "color": "red", "seeds": [{"radius": 0.5}]}"#)?;
//! assert_eq!(fruit.seeds[0].radius, 0.5);
//! assert_eq!(
//!     json_record::to_string(&fruit)?,
//!     r#"{"color":"red","size":-25,"seeds":[{"radius":0.5}]}"#
//! );
//! # Ok::<(), json_record::Error>(())
//! ```
mod data;
mod parser;
mod property;
mod scanner;
mod serializer;
mod value;

use std::{fmt, io};
use tracing::debug;

pub use data::{Error, Limits, ParseError, ParseErrorKind, Position, SchemaError, DEFAULT_MAX_DEPTH};
pub use parser::{parse_record, parse_sequence};
pub use property::{check_field_schema, check_properties, check_record_schema, find_property, JsonRecord, Property};
pub use scanner::Scanner;
pub use serializer::Serializer;
pub use value::JsonValue;

/// Parses a JSON object into the record `R`, or returns a [ParseError].
///
/// Parsing stops at the closing brace of the object: whatever follows it is not read.
/// A record type declaring a property name twice, itself or in any record reachable
/// from it, fails with [`ParseErrorKind::Schema`] at line 1, column 0.
pub fn parse<R: JsonRecord>(json: impl AsRef<str>) -> Result<R, ParseError> {
    parse_with_limits(json, Limits::default())
}

/// Same as [parse], with explicit [Limits].
pub fn parse_with_limits<R: JsonRecord>(json: impl AsRef<str>, limits: Limits) -> Result<R, ParseError> {
    let json = json.as_ref();
    debug!(record = R::record_name(), len = json.len(), "parsing record");

    R::check_schema(&mut Vec::new()).map_err(|err| ParseError::at(err.into(), Position::default()))?;
    let mut scanner = Scanner::new(json, limits);
    parse_record(&mut scanner)
}

/// Reads the whole source and parses it with [parse].
pub fn parse_reader<R: JsonRecord>(mut reader: impl io::Read) -> Result<R, Error> {
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    Ok(parse(json)?)
}

/// Serializes the record as compact JSON into `out`.
///
/// Nothing is rolled back on failure, so `out` may hold a partial document.
/// Property names are checked before anything is written, see [parse].
pub fn serialize<R: JsonRecord>(record: &R, out: &mut impl fmt::Write) -> Result<(), Error> {
    debug!(record = R::record_name(), "serializing record");
    R::check_schema(&mut Vec::new())?;
    Serializer::new(out).write_record(record)
}

/// Serializes the record into an [io::Write] sink.
pub fn serialize_to_writer<R: JsonRecord>(record: &R, mut writer: impl io::Write) -> Result<(), Error> {
    let json = to_string(record)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Serializes the record into a new string.
pub fn to_string<R: JsonRecord>(record: &R) -> Result<String, Error> {
    let mut json = String::new();
    serialize(record, &mut json)?;
    debug!(record = R::record_name(), len = json.len(), "serialized record");
    Ok(json)
}
