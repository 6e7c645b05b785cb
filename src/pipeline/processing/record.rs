use crate::pipeline::processing::mapper::{
    ContactField, ContactMap, MappedFields, RecordField, RecordMap,
};

/// Final attribute set of one table, ready for serialization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSystemRecord {
    pub data: RecordMap,
    pub contact: ContactMap,
}

impl CodeSystemRecord {
    /// Merge the mapped fields, deriving `publisher` as `"{name}; {address}"`.
    ///
    /// The separator is always present, so two missing parts yield `"; "`.
    pub fn build(mapped: MappedFields) -> Self {
        let MappedFields { mut record, contact } = mapped;
        let publisher = format!(
            "{}; {}",
            contact.get_or_empty(ContactField::Name),
            contact.get_or_empty(ContactField::Address)
        );
        record.set(RecordField::Publisher, publisher);
        Self {
            data: record,
            contact,
        }
    }

    pub fn field(&self, field: RecordField) -> &str {
        self.data.get_or_empty(field)
    }

    pub fn contact_field(&self, field: ContactField) -> &str {
        self.contact.get_or_empty(field)
    }
}
