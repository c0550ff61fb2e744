/* Per-type dispatch for property values */

use crate::data::{Error, ParseError, ParseErrorKind, SchemaError};
use crate::parser;
use crate::scanner::Scanner;
use crate::serializer::Serializer;
use std::any::TypeId;

/// A value that can be stored in a record property.
///
/// Implemented for `String`, the integer and floating point primitives, `Vec<T>` of any
/// value type, and every type declared with [`json_record!`](crate::json_record).
pub trait JsonValue {
    /// Parses a value of this type at the scanner's position and stores it in `self`.
    fn parse_json(&mut self, scanner: &mut Scanner<'_>) -> Result<(), ParseError>;

    fn write_json(&self, serializer: &mut Serializer<'_>) -> Result<(), Error>;

    /// Checks the property list of every record type reachable from this type, even
    /// through an empty `Vec`. `visited` holds the record types already checked, so
    /// recursive records terminate. Scalars have nothing to check.
    fn check_schema(visited: &mut Vec<TypeId>) -> Result<(), SchemaError>
    where
        Self: Sized,
    {
        let _ = visited;
        Ok(())
    }
}

impl JsonValue for String {
    fn parse_json(&mut self, scanner: &mut Scanner<'_>) -> Result<(), ParseError> {
        *self = scanner.scan_string()?;
        Ok(())
    }

    fn write_json(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
        serializer.write_string(self)
    }
}

impl<T: JsonValue + Default> JsonValue for Vec<T> {
    fn parse_json(&mut self, scanner: &mut Scanner<'_>) -> Result<(), ParseError> {
        *self = parser::parse_sequence(scanner)?;
        Ok(())
    }

    fn write_json(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
        serializer.write_sequence(self)
    }

    fn check_schema(visited: &mut Vec<TypeId>) -> Result<(), SchemaError> {
        T::check_schema(visited)
    }
}

macro_rules! impl_integer {
    ($scan:ident => $($ty:ty),*) => {$(
        impl JsonValue for $ty {
            fn parse_json(&mut self, scanner: &mut Scanner<'_>) -> Result<(), ParseError> {
                scanner.skip_whitespace();
                let pos = scanner.position();
                let digits = scanner.$scan()?;
                *self = digits.parse().map_err(|_| {
                    ParseError::at(ParseErrorKind::InvalidNumber(digits.into()), pos)
                })?;
                Ok(())
            }

            fn write_json(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
                serializer.write_display(self)
            }
        }
    )*};
}

impl_integer!(scan_signed => i8, i16, i32, i64);
impl_integer!(scan_unsigned => u8, u16, u32, u64);

macro_rules! impl_float {
    ($($ty:ty),*) => {$(
        impl JsonValue for $ty {
            fn parse_json(&mut self, scanner: &mut Scanner<'_>) -> Result<(), ParseError> {
                scanner.skip_whitespace();
                let pos = scanner.position();
                let number = scanner.scan_float()?;
                let invalid = || ParseError::at(ParseErrorKind::InvalidNumber(number.into()), pos);
                // Literals too large for the target width would parse as infinity
                let value: $ty = number.parse().map_err(|_| invalid())?;
                if !value.is_finite() {
                    return Err(invalid());
                }
                *self = value;
                Ok(())
            }

            fn write_json(&self, serializer: &mut Serializer<'_>) -> Result<(), Error> {
                if !self.is_finite() {
                    return Err(Error::NonFiniteNumber(f64::from(*self)));
                }
                serializer.write_display(self)
            }
        }
    )*};
}

impl_float!(f32, f64);
