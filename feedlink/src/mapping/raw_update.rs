//! Normalized field-update record shared by both transport variants.

use std::collections::HashMap;

/// One field's transition within a single push.
///
/// The unified transport resends every schema field with a changed flag;
/// the legacy transport omits unchanged values and carries only the old
/// one. Both shapes fit here, and [`FieldChange::effective_value`] hides
/// the difference from consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub changed: bool,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl FieldChange {
    /// A field the server pushed a new value for.
    pub fn changed(old_value: Option<&str>, new_value: Option<&str>) -> Self {
        Self {
            changed: true,
            old_value: old_value.map(str::to_owned),
            new_value: new_value.map(str::to_owned),
        }
    }

    /// A field the server skipped; only the previously known value is
    /// carried.
    pub fn unchanged(old_value: Option<&str>) -> Self {
        Self {
            changed: false,
            old_value: old_value.map(str::to_owned),
            new_value: None,
        }
    }

    /// Substitution rule: changed fields read the new value, unchanged
    /// fields the old one.
    pub fn effective_value(&self) -> Option<&str> {
        let value = if self.changed {
            self.new_value.as_ref()
        } else {
            self.old_value.as_ref()
        };
        value.map(String::as_str)
    }
}

/// One push for one item, normalized to a field-name map.
///
/// Built once by the variant glue, then shared immutably (`Arc`) with every
/// attached consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFieldUpdate {
    pub item: String,
    fields: HashMap<String, FieldChange>,
}

impl RawFieldUpdate {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder-style [`RawFieldUpdate::set_field`].
    pub fn with_field(mut self, name: impl Into<String>, change: FieldChange) -> Self {
        self.set_field(name, change);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, change: FieldChange) {
        self.fields.insert(name.into(), change);
    }

    pub fn field(&self, name: &str) -> Option<&FieldChange> {
        self.fields.get(name)
    }

    /// The field's current value under the substitution rule; `None` when
    /// the update does not carry the field at all.
    pub fn effective_value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(FieldChange::effective_value)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldChange, RawFieldUpdate};

    #[test]
    fn changed_fields_read_the_new_value() {
        let change = FieldChange::changed(Some("3.04"), Some("3.10"));
        assert_eq!(change.effective_value(), Some("3.10"));
    }

    #[test]
    fn unchanged_fields_read_the_old_value() {
        let change = FieldChange::unchanged(Some("Test stock"));
        assert_eq!(change.effective_value(), Some("Test stock"));
    }

    #[test]
    fn a_changed_field_cleared_by_the_server_reads_none() {
        let change = FieldChange::changed(Some("3.04"), None);
        assert_eq!(change.effective_value(), None);
    }

    #[test]
    fn missing_fields_read_none() {
        let update = RawFieldUpdate::new("item1")
            .with_field("bid", FieldChange::changed(None, Some("11.25")));
        assert_eq!(update.effective_value("bid"), Some("11.25"));
        assert_eq!(update.effective_value("ask"), None);
        assert_eq!(update.field_count(), 1);
        assert_eq!(update.item, "item1");
    }
}
