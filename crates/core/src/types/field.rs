//! Form fields and the per-field error set.

use core::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A contact form field, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
    Company,
    Github,
}

impl Field {
    /// Wire name of the field, as used in JSON bodies and error maps.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
            Self::Company => "company",
            Self::Github => "github",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-keyed validation errors.
///
/// Holds at most one message per field; the first message recorded for a
/// field wins. Iteration follows insertion order, which the schema keeps in
/// field order.
///
/// Serialized as a JSON object: `{"name": "...", "email": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrorSet {
    entries: Vec<(Field, String)>,
}

impl FieldErrorSet {
    /// Create an empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an error for `field` unless one is already present.
    ///
    /// Returns `true` if the message was recorded.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) -> bool {
        if self.contains(field) {
            return false;
        }
        self.entries.push((field, message.into()));
        true
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| message.as_str())
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.entries.iter().any(|(f, _)| *f == field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Fields with errors, in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }

    /// `(field, message)` pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.entries.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl Serialize for FieldErrorSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldErrorSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldErrorSetVisitor;

        impl<'de> Visitor<'de> for FieldErrorSetVisitor {
            type Value = FieldErrorSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field name to error message")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = FieldErrorSet::new();
                while let Some((field, message)) = access.next_entry::<Field, String>()? {
                    set.insert(field, message);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(FieldErrorSetVisitor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrorSet::new();
        assert!(errors.insert(Field::Name, "too short"));
        assert!(!errors.insert(Field::Name, "too long"));
        assert_eq!(errors.get(Field::Name), Some("too short"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut errors = FieldErrorSet::new();
        errors.insert(Field::Name, "a");
        errors.insert(Field::Email, "b");
        errors.insert(Field::Message, "c");
        let fields: Vec<Field> = errors.fields().collect();
        assert_eq!(fields, vec![Field::Name, Field::Email, Field::Message]);
    }

    #[test]
    fn test_serializes_as_object() {
        let mut errors = FieldErrorSet::new();
        errors.insert(Field::Name, "Nome curto");
        errors.insert(Field::Email, "Email inválido");
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"name":"Nome curto","email":"Email inválido"}"#);
    }

    #[test]
    fn test_deserializes_from_object() {
        let errors: FieldErrorSet =
            serde_json::from_str(r#"{"message":"curta","github":"longo"}"#).unwrap();
        assert_eq!(errors.get(Field::Message), Some("curta"));
        assert_eq!(errors.get(Field::Github), Some("longo"));
        assert!(!errors.contains(Field::Name));
    }

    #[test]
    fn test_deserialize_rejects_unknown_field() {
        let result = serde_json::from_str::<FieldErrorSet>(r#"{"phone":"x"}"#);
        assert!(result.is_err());
    }
}
