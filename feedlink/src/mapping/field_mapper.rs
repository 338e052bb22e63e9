//! Typed-record construction contract.

use super::RawFieldUpdate;

/// Converts raw field updates into one consumer-facing record type.
///
/// Mappers are pure converters: `apply` reads the update and writes the
/// record, nothing is retained. Records start as placeholders carrying only
/// their item key and fill in field by field as updates arrive, so a mapper
/// must leave fields alone when an update does not carry a usable value for
/// them.
pub trait FieldMapper {
    type Record;

    /// Placeholder record carrying only the originating item key.
    fn blank_record(&self, item_key: &str) -> Self::Record;

    /// Copies every usable field of `update` onto `record`.
    fn apply(&self, record: &mut Self::Record, update: &RawFieldUpdate);

    /// Fresh record built from a single update.
    fn map(&self, update: &RawFieldUpdate) -> Self::Record {
        let mut record = self.blank_record(&update.item);
        self.apply(&mut record, update);
        record
    }
}
