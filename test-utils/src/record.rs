//! Record types and their overridable properties.
//!
//! A model becomes usable in a fake repository by implementing [`Record`]: it describes how to
//! generate a random instance and which properties a test may force to a specific value. The
//! property list is a [`FieldTable`] of typed setter functions, validated once when a
//! repository is built, so every later override is a name lookup plus a type comparison.

use std::{
    any::{type_name, Any, TypeId},
    fmt,
};

use crate::{error::TestError, generator::Generator};

/// A model that can populate a fake repository.
pub trait Record: Clone + Sized + 'static {
    /// Properties that can be overridden when adding a record.
    fn fields() -> FieldTable<Self>;

    /// Generates an instance with every property set to a random value.
    fn generate(g: &mut Generator) -> Result<Self, TestError>;
}

/// Short type name without its module path, used in errors and logs.
pub(crate) fn type_label<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);

    let Some((parent, last)) = base.rsplit_once("::") else {
        return base;
    };
    if last != "Model" {
        return last;
    }

    // SeaORM names every entity model `Model`; keep the entity module.
    let module_start = parent.rfind("::").map_or(0, |index| index + 2);
    &base[module_start..]
}

type Setter<M> = Box<dyn Fn(&mut M, Box<dyn Any>) -> Result<(), Box<dyn Any>>>;

struct Field<M> {
    name: &'static str,
    type_id: TypeId,
    type_name: &'static str,
    set: Setter<M>,
}

/// Overridable properties of a record type, keyed by name.
pub struct FieldTable<M> {
    fields: Vec<Field<M>>,
}

impl<M: 'static> Default for FieldTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: 'static> FieldTable<M> {
    /// Creates a table with no registered properties.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Registers a property and the function that assigns it.
    ///
    /// The property's type is taken from the setter's value parameter; overrides for this
    /// property must carry exactly that type.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// FieldTable::new()
    ///     .field("name", |user: &mut Model, name: String| user.name = name)
    ///     .field("admin", |user: &mut Model, admin: bool| user.admin = admin)
    /// ```
    pub fn field<V, F>(mut self, name: &'static str, set: F) -> Self
    where
        V: 'static,
        F: Fn(&mut M, V) + 'static,
    {
        self.fields.push(Field {
            name,
            type_id: TypeId::of::<V>(),
            type_name: type_name::<V>(),
            set: Box::new(move |record: &mut M, value: Box<dyn Any>| -> Result<(), Box<dyn Any>> {
                let value = value.downcast::<V>()?;
                set(record, *value);
                Ok(())
            }),
        });
        self
    }

    /// Names of the registered properties in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    /// Number of registered properties.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no property is registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Checks that no property name is registered twice.
    ///
    /// # Returns
    /// - `Ok(())` - Every name is unique
    /// - `Err(TestError::DuplicateProperty)` - First name found registered twice
    pub fn validate(&self) -> Result<(), TestError> {
        for (index, field) in self.fields.iter().enumerate() {
            if self.fields[..index].iter().any(|f| f.name == field.name) {
                return Err(TestError::DuplicateProperty {
                    model: type_label::<M>(),
                    property: field.name,
                });
            }
        }

        Ok(())
    }

    /// Resolves every override against the table without touching a record.
    ///
    /// # Returns
    /// - `Ok(())` - All names exist and all value types match
    /// - `Err(TestError::PropertyNotFound)` - An override names an unknown property
    /// - `Err(TestError::TypeMismatch)` - An override value has the wrong type
    pub fn check(&self, overrides: &Overrides) -> Result<(), TestError> {
        for (name, value) in &overrides.entries {
            self.resolve(name, value)?;
        }

        Ok(())
    }

    /// Applies overrides to a record in order.
    ///
    /// Overrides are checked before any of them is applied, so a failed call leaves the record
    /// untouched.
    pub fn apply(&self, record: &mut M, overrides: Overrides) -> Result<(), TestError> {
        self.check(&overrides)?;

        for (name, value) in overrides.entries {
            let field = self.resolve(&name, &value)?;
            let value_type = value.type_name;
            (field.set)(record, value.value).map_err(|_| TestError::TypeMismatch {
                model: type_label::<M>(),
                property: name,
                expected: field.type_name,
                actual: value_type,
            })?;
        }

        Ok(())
    }

    fn resolve(&self, name: &str, value: &OverrideValue) -> Result<&Field<M>, TestError> {
        let field = self
            .fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| TestError::PropertyNotFound {
                model: type_label::<M>(),
                property: name.to_string(),
            })?;

        if field.type_id != value.type_id {
            return Err(TestError::TypeMismatch {
                model: type_label::<M>(),
                property: name.to_string(),
                expected: field.type_name,
                actual: value.type_name,
            });
        }

        Ok(field)
    }
}

/// A value forced onto a property, tagged with its type.
pub struct OverrideValue {
    type_id: TypeId,
    type_name: &'static str,
    value: Box<dyn Any>,
}

impl OverrideValue {
    /// Tags a value with its type.
    ///
    /// A string literal is stored as an owned `String`, so `"Alice"` can be given for a
    /// `String` property. Every other value keeps its exact type.
    pub fn new<V: 'static>(value: V) -> Self {
        let value: Box<dyn Any> = Box::new(value);

        match value.downcast::<&'static str>() {
            Ok(text) => Self::tagged(text.to_string()),
            Err(value) => Self {
                type_id: TypeId::of::<V>(),
                type_name: type_name::<V>(),
                value,
            },
        }
    }

    fn tagged<V: 'static>(value: V) -> Self {
        Self {
            type_id: TypeId::of::<V>(),
            type_name: type_name::<V>(),
            value: Box::new(value),
        }
    }
}

impl fmt::Debug for OverrideValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideValue")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Ordered property overrides for a single record.
///
/// # Example
///
/// ```rust,ignore
/// let overrides = Overrides::new()
///     .with("name", "Alice")
///     .with("admin", true);
/// ```
#[derive(Debug, Default)]
pub struct Overrides {
    entries: Vec<(String, OverrideValue)>,
}

impl Overrides {
    /// Creates an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property override. A later override of the same property wins.
    pub fn with<V: 'static>(mut self, property: impl Into<String>, value: V) -> Self {
        self.entries
            .push((property.into(), OverrideValue::new(value)));
        self
    }

    /// Number of overrides, counting repeated properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no override was given.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
