use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, instrument};

use crate::common::constants::{
    CODESYSTEM_CASE_SENSITIVE, CODESYSTEM_CONTENT, CODESYSTEM_EXPERIMENTAL, CODESYSTEM_STATUS,
    CODESYSTEM_VERSION, FHIR_NAMESPACE,
};
use crate::common::error::Result;
use crate::pipeline::processing::mapper::{ContactField, RecordField};
use crate::pipeline::processing::record::CodeSystemRecord;

// FHIR primitives carry their value in a `value` attribute, never as text
fn leaf<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> quick_xml::Result<()> {
    writer
        .create_element(name)
        .with_attribute(("value", value))
        .write_empty()?;
    Ok(())
}

/// Render the record as a FHIR CodeSystem document.
///
/// Every element is always emitted; absent fields serialize as `value=""`.
pub fn render_codesystem(record: &CodeSystemRecord) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    writer
        .create_element("CodeSystem")
        .with_attribute(("xmlns", FHIR_NAMESPACE))
        .write_inner_content(|w| {
            leaf(w, "id", record.field(RecordField::ShortName))?;
            leaf(w, "url", record.field(RecordField::Url))?;
            leaf(w, "version", CODESYSTEM_VERSION)?;
            leaf(w, "name", record.field(RecordField::ShortName))?;
            leaf(w, "title", record.field(RecordField::Title))?;
            leaf(w, "status", CODESYSTEM_STATUS)?;
            leaf(w, "experimental", CODESYSTEM_EXPERIMENTAL)?;
            leaf(w, "date", record.field(RecordField::PubDate))?;
            leaf(w, "publisher", record.contact_field(ContactField::Name))?;
            w.create_element("contact").write_inner_content(|contact| {
                contact.create_element("telecom").write_inner_content(|telecom| {
                    leaf(telecom, "system", record.contact_field(ContactField::System))?;
                    leaf(telecom, "value", record.contact_field(ContactField::Website))
                })?;
                leaf(contact, "name", record.field(RecordField::Publisher))
            })?;
            leaf(w, "description", record.field(RecordField::Description))?;
            leaf(w, "copyright", record.field(RecordField::Copyright))?;
            leaf(w, "caseSensitive", CODESYSTEM_CASE_SENSITIVE)?;
            leaf(w, "content", CODESYSTEM_CONTENT)
        })?;

    Ok(writer.into_inner())
}

/// Render and write the artifact to `path`.
#[instrument(skip(record), fields(path = %path.display()))]
pub fn write_codesystem(record: &CodeSystemRecord, path: &Path) -> Result<()> {
    let bytes = render_codesystem(record)?;
    fs::write(path, &bytes)?;
    debug!(bytes = bytes.len(), "wrote CodeSystem");
    Ok(())
}
