use anyhow::Result;
use cs_scraper::common::{Table, TableRow};
use cs_scraper::pipeline::processing::parser::Parser;
use cs_scraper::pipeline::processing::quality_gate::QualityDecision;
use cs_scraper::pipeline::processing::{RecordField, RequiredFieldsGate};
use cs_scraper::{Config, Pipeline};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn test_config(output_dir: &Path) -> Config {
    Config {
        output_dir: output_dir.to_path_buf(),
        name: "example".to_string(),
        page_id: "81028287".to_string(),
        token_file: "access.token".into(),
        base_url: "https://confluence.example.org/pages/viewpage.action".to_string(),
        user_agent: "test-agent".to_string(),
        html_source: None,
        log_dir: None,
    }
}

/// Hands back fixed rows instead of parsing HTML
struct FixedTables(Vec<Table>);

impl Parser for FixedTables {
    fn parse(&self, _html: &str) -> Vec<Table> {
        self.0.clone()
    }
}

fn scenario_rows() -> Vec<TableRow> {
    vec![
        TableRow::new(Some("CodeSystemNames"), Some("Formalnameofthecodesystem"), Some("Example CS")),
        TableRow::new(Some("CodeSystemNames"), Some("Shortnameofthecodesystem"), Some("ex-cs")),
        TableRow::new(Some("CodeSystemOwner"), Some("Name"), Some("Example Org,Inc")),
        TableRow::new(Some("CodeSystemOwner"), Some("Address"), Some("123 Main St,Springfield")),
    ]
}

#[test]
fn end_to_end_rows_to_codesystem() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    let result = Pipeline::new(&config)
        .with_parser(FixedTables(vec![Table::new(scenario_rows())]))
        .run_page("")?;

    assert_eq!(result.tables_found, 1);
    let outcome = &result.outcomes[0];
    assert_eq!(outcome.output_file, temp_dir.path().join("cs-example.xml"));

    let xml = fs::read_to_string(&outcome.output_file)?;
    assert!(xml.contains(r#"<id value="ex-cs"/>"#));
    assert!(xml.contains(r#"<name value="ex-cs"/>"#));
    assert!(xml.contains(r#"<title value="Example CS"/>"#));
    assert!(xml.contains(r#"<publisher value="Example Org, Inc"/>"#));
    assert!(xml.contains(r#"<name value="Example Org, Inc; 123 Main St, Springfield"/>"#));

    // description, copyright, url and pub_date are all absent
    assert_eq!(outcome.quality.missing_count(), 4);
    assert_eq!(
        outcome.quality.missing_fields(),
        vec![
            RecordField::Description,
            RecordField::Copyright,
            RecordField::Url,
            RecordField::PubDate
        ]
    );
    Ok(())
}

#[test]
fn confluence_page_html_to_codesystem() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    let html = r#"
        <html><body><div id="main-content">
          <table class="confluenceTable"><tbody>
            <tr><th>Data element</th><th>Sub data element</th><th>Value</th></tr>
            <tr><th rowspan="2">Code System Names</th><td>Formal name of the code system</td><td>ClinVar Variant</td></tr>
            <tr><td>Short name of the code system</td><td>clinVarV</td></tr>
            <tr><th>Code System Technical Identifiers</th><td>HTA-endorsed URI</td><td>http://www.ncbi.nlm.nih.gov/clinvar</td></tr>
            <tr><th rowspan="3">Code System Owner</th><td>Name</td><td>National Center for Biotechnology Information&nbsp;National Library of Medicine</td></tr>
            <tr><td>Address</td><td>8600 Rockville Pike&nbsp;Bethesda,MD 20894</td></tr>
            <tr><td>Website</td><td>https://www.ncbi.nlm.nih.gov/clinvar/</td></tr>
            <tr><th>Code System Information</th><td>Notes</td><td>"ClinVar" aggregates information,about variants</td></tr>
            <tr><th>Code System Copyright, Intellectual Property and Licensing</th><td>Copyright Statement</td><td>"Public domain"</td></tr>
            <tr><th colspan="2">Information current as at (date)</th><td>2023-05-01</td></tr>
            <tr><th>Unrelated heading</th><td>Ignored</td><td>nothing</td></tr>
          </tbody></table>
        </div></body></html>"#;

    let result = Pipeline::new(&config).run_page(html)?;
    assert_eq!(result.tables_found, 1);
    assert_eq!(result.total_warnings(), 0);

    let xml = fs::read_to_string(temp_dir.path().join("cs-example.xml"))?;
    assert!(xml.contains(r#"<id value="clinVarV"/>"#));
    assert!(xml.contains(r#"<url value="http://www.ncbi.nlm.nih.gov/clinvar"/>"#));
    assert!(xml.contains(r#"<title value="ClinVar Variant"/>"#));
    assert!(xml.contains(r#"<date value="2023-05-01"/>"#));
    assert!(xml.contains(
        r#"<publisher value="National Center for Biotechnology Information, National Library of Medicine"/>"#
    ));
    assert!(xml.contains(r#"<system value="url"/>"#));
    assert!(xml.contains(r#"<value value="https://www.ncbi.nlm.nih.gov/clinvar/"/>"#));
    assert!(xml.contains(
        r#"<name value="National Center for Biotechnology Information, National Library of Medicine; 8600 Rockville Pike Bethesda, MD 20894"/>"#
    ));
    assert!(xml.contains(r#"<description value="ClinVar aggregates information, about variants"/>"#));
    assert!(xml.contains(r#"<copyright value="Public domain"/>"#));
    Ok(())
}

#[test]
fn each_table_gets_its_own_file() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    let first = Table::new(vec![TableRow::new(
        Some("Code System Names"),
        Some("Short name of the code system"),
        Some("first"),
    )]);
    let second = Table::new(vec![TableRow::new(
        Some("Code System Names"),
        Some("Short name of the code system"),
        Some("second"),
    )]);

    let result = Pipeline::new(&config)
        .with_parser(FixedTables(vec![first, second]))
        .run_page("")?;

    assert_eq!(result.outcomes.len(), 2);
    let first_xml = fs::read_to_string(temp_dir.path().join("cs-example-1.xml"))?;
    let second_xml = fs::read_to_string(temp_dir.path().join("cs-example-2.xml"))?;
    assert!(first_xml.contains(r#"<id value="first"/>"#));
    assert!(second_xml.contains(r#"<id value="second"/>"#));
    assert!(!temp_dir.path().join("cs-example.xml").exists());
    Ok(())
}

#[test]
fn page_without_tables_writes_nothing() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    let result = Pipeline::new(&config).run_page("<html><body><p>No tables</p></body></html>")?;

    assert_eq!(result.tables_found, 0);
    assert!(result.outcomes.is_empty());
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn missing_output_directory_fails_the_write() {
    let temp_dir = tempdir().unwrap();
    let config = test_config(&temp_dir.path().join("not-created"));

    let result = Pipeline::new(&config)
        .with_parser(FixedTables(vec![Table::new(scenario_rows())]))
        .run_page("");
    assert!(result.is_err());
}

#[test]
fn custom_quality_gate_checks_only_its_fields() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path());

    let gate = RequiredFieldsGate {
        required: vec![RecordField::Title, RecordField::ShortName],
    };
    let second = Table::new(vec![TableRow::new(
        Some("Code System Names"),
        Some("Short name of the code system"),
        Some("second"),
    )]);

    let result = Pipeline::new(&config)
        .with_parser(FixedTables(vec![Table::new(scenario_rows()), second]))
        .with_quality_gate(gate)
        .run_page("")?;

    let first = &result.outcomes[0];
    assert_eq!(first.index, 0);
    assert_eq!(first.record.field(RecordField::Title), "Example CS");
    assert_eq!(first.record.field(RecordField::ShortName), "ex-cs");
    assert_eq!(first.quality.decision, QualityDecision::Accept);

    let second = &result.outcomes[1];
    assert_eq!(second.index, 1);
    assert_eq!(second.record.field(RecordField::Title), "");
    assert_eq!(second.quality.missing_fields(), vec![RecordField::Title]);
    assert_eq!(result.total_warnings(), 1);
    Ok(())
}
