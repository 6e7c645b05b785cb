use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::common::types::{Table, TableRow};
use crate::pipeline::processing::normalize::{normalize_quoted, normalize_text, NbspMode};

/// Semantic fields of the CodeSystem record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordField {
    Title,
    Description,
    Copyright,
    Url,
    ShortName,
    PubDate,
    /// Derived from the owner name and address
    Publisher,
}

impl RecordField {
    /// Fields whose absence the quality gate reports
    pub const REQUIRED: [RecordField; 6] = [
        RecordField::Title,
        RecordField::Description,
        RecordField::Copyright,
        RecordField::Url,
        RecordField::ShortName,
        RecordField::PubDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Title => "title",
            RecordField::Description => "description",
            RecordField::Copyright => "copyright",
            RecordField::Url => "url",
            RecordField::ShortName => "short_name",
            RecordField::PubDate => "pub_date",
            RecordField::Publisher => "publisher",
        }
    }
}

/// Fields describing the code system owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactField {
    Name,
    Address,
    Website,
    /// Telecom system of the website (always `url`)
    System,
}

impl ContactField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Address => "address",
            ContactField::Website => "website",
            ContactField::System => "system",
        }
    }
}

/// Accumulator of field values. Unset fields are absent, not empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap<K: Ord> {
    fields: BTreeMap<K, String>,
}

impl<K: Ord> Default for FieldMap<K> {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> FieldMap<K> {
    pub fn get(&self, field: K) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Value for serialization: absent fields read as the empty string.
    pub fn get_or_empty(&self, field: K) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn set(&mut self, field: K, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    pub fn contains(&self, field: K) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub type RecordMap = FieldMap<RecordField>;
pub type ContactMap = FieldMap<ContactField>;

/// Where a mapped value lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Record(RecordField),
    Contact(ContactField),
}

/// Cleanup applied to a value before it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Verbatim,
    Normalize(NbspMode),
    StripQuotes,
}

impl Transform {
    pub fn apply(&self, value: &str) -> String {
        match self {
            Transform::Verbatim => value.to_string(),
            Transform::Normalize(mode) => normalize_text(value, *mode),
            Transform::StripQuotes => normalize_quoted(value),
        }
    }
}

/// How a rule key is compared against a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    /// The full composite key must match
    Exact,
    /// Only the first label cell is compared; the second is ignored
    Label,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub key: &'static str,
    pub matching: KeyMatch,
    pub target: Target,
    pub transform: Transform,
    /// Fixed value written next to the main one
    pub companion: Option<(Target, &'static str)>,
}

impl FieldRule {
    const fn exact(key: &'static str, target: Target, transform: Transform) -> Self {
        Self {
            key,
            matching: KeyMatch::Exact,
            target,
            transform,
            companion: None,
        }
    }

    fn matches(&self, field_key: &str, label_key: &str) -> bool {
        match self.matching {
            KeyMatch::Exact => field_key == self.key,
            KeyMatch::Label => label_key == self.key,
        }
    }
}

/// Recognized rows of the Confluence code system template
pub static FIELD_RULES: &[FieldRule] = &[
    FieldRule::exact(
        "CodeSystemNames.Formalnameofthecodesystem",
        Target::Record(RecordField::Title),
        Transform::Verbatim,
    ),
    FieldRule::exact(
        "CodeSystemTechnicalIdentifiers.HTA-endorsedURI",
        Target::Record(RecordField::Url),
        Transform::Verbatim,
    ),
    FieldRule::exact(
        "CodeSystemNames.Shortnameofthecodesystem",
        Target::Record(RecordField::ShortName),
        Transform::Verbatim,
    ),
    FieldRule::exact(
        "CodeSystemOwner.Name",
        Target::Contact(ContactField::Name),
        Transform::Normalize(NbspMode::Comma),
    ),
    FieldRule::exact(
        "CodeSystemOwner.Address",
        Target::Contact(ContactField::Address),
        Transform::Normalize(NbspMode::Space),
    ),
    FieldRule {
        key: "CodeSystemOwner.Website",
        matching: KeyMatch::Exact,
        target: Target::Contact(ContactField::Website),
        transform: Transform::Verbatim,
        companion: Some((
            Target::Contact(ContactField::System),
            crate::common::constants::TELECOM_SYSTEM_URL,
        )),
    },
    FieldRule::exact(
        "CodeSystemInformation.Notes",
        Target::Record(RecordField::Description),
        Transform::StripQuotes,
    ),
    FieldRule::exact(
        "CodeSystemCopyright,IntellectualPropertyandLicensing.CopyrightStatement",
        Target::Record(RecordField::Copyright),
        Transform::StripQuotes,
    ),
    FieldRule {
        key: "Informationcurrentasat(date)",
        matching: KeyMatch::Label,
        target: Target::Record(RecordField::PubDate),
        transform: Transform::Verbatim,
        companion: None,
    },
];

/// The two accumulators filled from one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedFields {
    pub record: RecordMap,
    pub contact: ContactMap,
}

impl MappedFields {
    fn assign(&mut self, target: Target, value: impl Into<String>) {
        match target {
            Target::Record(field) => self.record.set(field, value),
            Target::Contact(field) => self.contact.set(field, value),
        }
    }
}

fn compact(cell: &str) -> String {
    cell.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Composite lookup key of a row: the label cells with whitespace removed,
/// joined by `.`. Rows without any label have no key.
pub fn field_key(row: &TableRow) -> Option<String> {
    match (row.label.as_deref(), row.sublabel.as_deref()) {
        (Some(label), Some(sublabel)) => Some(format!("{}.{}", compact(label), compact(sublabel))),
        (Some(label), None) => Some(compact(label)),
        (None, _) => None,
    }
}

/// Routes table rows into record and contact fields through [`FIELD_RULES`].
#[derive(Debug, Clone, Copy)]
pub struct FieldMapper {
    rules: &'static [FieldRule],
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapper {
    pub fn new() -> Self {
        Self { rules: FIELD_RULES }
    }

    #[instrument(skip_all, fields(rows = table.len()))]
    pub fn map_table(&self, table: &Table) -> MappedFields {
        let mut mapped = MappedFields::default();
        for row in &table.rows {
            self.map_row(row, &mut mapped);
        }
        debug!(
            record_fields = mapped.record.len(),
            contact_fields = mapped.contact.len(),
            "mapped table"
        );
        mapped
    }

    /// Apply one row. Later rows overwrite earlier ones unless their value is empty.
    pub fn map_row(&self, row: &TableRow, mapped: &mut MappedFields) {
        let Some(key) = field_key(row) else {
            return;
        };
        let label_key = row.label.as_deref().map(compact).unwrap_or_default();

        let mut recognized = false;
        for rule in self.rules.iter().filter(|r| r.matches(&key, &label_key)) {
            recognized = true;
            let Some(value) = row.value.as_deref() else {
                continue;
            };
            mapped.assign(rule.target, rule.transform.apply(value));
            if let Some((target, fixed)) = rule.companion {
                mapped.assign(target, fixed);
            }
        }

        if !recognized {
            debug!(key = %key, "ignoring unrecognized row");
        }
    }
}
