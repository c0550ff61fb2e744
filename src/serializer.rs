use crate::data::Error;
use crate::property::JsonRecord;
use crate::value::JsonValue;
use std::fmt::{Display, Write};

/// Writes compact JSON, without any insignificant whitespace, into a text sink.
pub struct Serializer<'w> {
    out: &'w mut dyn Write,
}

impl<'w> Serializer<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self { out }
    }

    /// Writes the record as an object, with its properties in declaration order.
    pub fn write_record<R: JsonRecord>(&mut self, record: &R) -> Result<(), Error> {
        self.out.write_char('{')?;

        for (i, property) in R::properties().iter().enumerate() {
            if i > 0 {
                self.out.write_char(',')?;
            }
            self.write_string(property.name())?;
            self.out.write_char(':')?;
            property.value(record).write_json(self)?;
        }

        self.out.write_char('}')?;
        Ok(())
    }

    pub fn write_sequence<T: JsonValue>(&mut self, items: &[T]) -> Result<(), Error> {
        self.out.write_char('[')?;

        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.write_char(',')?;
            }
            item.write_json(self)?;
        }

        self.out.write_char(']')?;
        Ok(())
    }

    /// Writes a quoted string, escaping quotes, backslashes and control characters.
    pub fn write_string(&mut self, s: &str) -> Result<(), Error> {
        self.out.write_char('"')?;

        for ch in s.chars() {
            match ch {
                '"' => self.out.write_str("\\\"")?,
                '\\' => self.out.write_str("\\\\")?,
                '\n' => self.out.write_str("\\n")?,
                '\r' => self.out.write_str("\\r")?,
                '\t' => self.out.write_str("\\t")?,
                '\x08' => self.out.write_str("\\b")?,
                '\x0C' => self.out.write_str("\\f")?,
                x if x < '\u{20}' => write!(self.out, "\\u{:04x}", x as u32)?,
                x => self.out.write_char(x)?,
            }
        }

        self.out.write_char('"')?;
        Ok(())
    }

    /// Writes a number in its default decimal form.
    pub fn write_display(&mut self, value: impl Display) -> Result<(), Error> {
        write!(self.out, "{value}")?;
        Ok(())
    }
}
