/* Record declarations */

use crate::data::SchemaError;
use crate::value::JsonValue;
use std::any::TypeId;
use std::fmt::{self, Debug};

/// Binds a JSON key to one field of the record `R`.
///
/// Descriptors are usually produced by [`json_record!`](crate::json_record), but they
/// can be written by hand as long as `get` and `get_mut` point to the same field:
///
/// ```
/// use json_record::{JsonValue, Property};
///
/// #[derive(Default)]
/// struct Seed {
///     radius: f32,
/// }
///
/// fn radius(seed: &Seed) -> &dyn JsonValue {
///     &seed.radius
/// }
///
/// fn radius_mut(seed: &mut Seed) -> &mut dyn JsonValue {
///     &mut seed.radius
/// }
///
/// const RADIUS: Property<Seed> = Property::new("radius", radius, radius_mut);
/// assert_eq!(RADIUS.name(), "radius");
/// ```
pub struct Property<R> {
    name: &'static str,
    get: fn(&R) -> &dyn JsonValue,
    get_mut: fn(&mut R) -> &mut dyn JsonValue,
}

impl<R> Property<R> {
    pub const fn new(
        name: &'static str,
        get: fn(&R) -> &dyn JsonValue,
        get_mut: fn(&mut R) -> &mut dyn JsonValue,
    ) -> Self {
        Self { name, get, get_mut }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn value<'r>(&self, record: &'r R) -> &'r dyn JsonValue {
        (self.get)(record)
    }

    pub fn value_mut<'r>(&self, record: &'r mut R) -> &'r mut dyn JsonValue {
        (self.get_mut)(record)
    }
}

// Manual impls: deriving would demand `R: Clone`/`R: Debug`, which the descriptor doesn't need.
impl<R> Clone for Property<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Property<R> {}

impl<R> Debug for Property<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property").field("name", &self.name).finish()
    }
}

/// A type that can be parsed from and serialized to a JSON object.
///
/// The property list is ordered: serialization writes the properties in this order,
/// while parsing accepts the keys in any order. Names must be unique within a record,
/// see [`check_properties`].
pub trait JsonRecord: JsonValue + Default + 'static {
    fn properties() -> &'static [Property<Self>];

    /// Name used in diagnostics.
    fn record_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Finds the first property named exactly `name`.
pub fn find_property<'p, R>(properties: &'p [Property<R>], name: &str) -> Option<&'p Property<R>> {
    properties.iter().find(|property| property.name == name)
}

/// Rejects a property list that declares the same name twice. Such a record
/// could not round-trip: the second property would be written but never read back.
pub fn check_properties<R: JsonRecord>() -> Result<(), SchemaError> {
    let properties = R::properties();
    for (i, property) in properties.iter().enumerate() {
        if find_property(&properties[..i], property.name).is_some() {
            return Err(SchemaError {
                record: R::record_name(),
                name: property.name,
            });
        }
    }
    Ok(())
}

/// Runs [`check_properties`] on `R` unless it was already visited, then on the
/// record types reachable from `R`'s fields. `fields` runs the field checks.
pub fn check_record_schema<R: JsonRecord>(
    visited: &mut Vec<TypeId>,
    fields: impl FnOnce(&mut Vec<TypeId>) -> Result<(), SchemaError>,
) -> Result<(), SchemaError> {
    let id = TypeId::of::<R>();
    if visited.contains(&id) {
        return Ok(());
    }
    visited.push(id);
    check_properties::<R>()?;
    fields(visited)
}

/// Checks the type of the field picked by `field`. Only the type matters,
/// `field` is never called.
#[doc(hidden)]
pub fn check_field_schema<R, T: JsonValue>(
    _field: impl Fn(&R) -> &T,
    visited: &mut Vec<TypeId>,
) -> Result<(), SchemaError> {
    T::check_schema(visited)
}

/// Declares the JSON properties of a struct, in serialization order.
///
/// Implements both [`JsonRecord`] and [`JsonValue`], so the struct can be parsed and
/// serialized at the top level and also nested inside other records or `Vec`s.
///
/// ```
/// use json_record::json_record;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Apple {
///     color: String,
///     size: i32,
/// }
///
/// // Keys can be renamed...
/// json_record!(Apple { "colour" => color, "size" => size });
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Seed {
///     radius: f32,
/// }
///
/// // ...or taken from the field names
/// json_record!(Seed { radius });
///
/// let apple: Apple = json_record::parse(r#"{"colour": "red", "size": 3}"#).unwrap();
/// assert_eq!(apple, Apple { color: "red".into(), size: 3 });
/// ```
#[macro_export]
macro_rules! json_record {
    ($record:ty { $($field:ident),+ $(,)? }) => {
        $crate::json_record!($record { $(stringify!($field) => $field),* });
    };
    ($record:ty { $($name:expr => $field:ident),* $(,)? }) => {
        impl $crate::JsonRecord for $record {
            fn properties() -> &'static [$crate::Property<Self>] {
                static PROPERTIES: &[$crate::Property<$record>] = &[$(
                    $crate::Property::new(
                        $name,
                        {
                            fn get(record: &$record) -> &dyn $crate::JsonValue {
                                &record.$field
                            }
                            get
                        },
                        {
                            fn get_mut(record: &mut $record) -> &mut dyn $crate::JsonValue {
                                &mut record.$field
                            }
                            get_mut
                        },
                    )
                ),*];
                PROPERTIES
            }
        }

        impl $crate::JsonValue for $record {
            fn parse_json(
                &mut self,
                scanner: &mut $crate::Scanner<'_>,
            ) -> ::std::result::Result<(), $crate::ParseError> {
                *self = $crate::parse_record::<Self>(scanner)?;
                Ok(())
            }

            fn write_json(
                &self,
                serializer: &mut $crate::Serializer<'_>,
            ) -> ::std::result::Result<(), $crate::Error> {
                serializer.write_record(self)
            }

            fn check_schema(
                visited: &mut ::std::vec::Vec<::std::any::TypeId>,
            ) -> ::std::result::Result<(), $crate::SchemaError> {
                $crate::check_record_schema::<Self>(visited, |visited| {
                    $($crate::check_field_schema(|record: &$record| &record.$field, visited)?;)*
                    Ok(())
                })
            }
        }
    };
}
