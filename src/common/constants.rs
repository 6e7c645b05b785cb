/// Source and output constants to ensure consistency across the codebase

// Confluence page defaults (used in CLI)
pub const DEFAULT_BASE_URL: &str = "https://confluence.hl7.org/pages/viewpage.action";
pub const DEFAULT_PAGE_ID: &str = "81028287";
pub const DEFAULT_CODESYSTEM_NAME: &str = "clinVarV";
pub const DEFAULT_TOKEN_FILE: &str = "access.token";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";
pub const PAGE_CONTENT_TYPE: &str = "application/html";

/// Default output location, relative to the user's home directory
pub const DEFAULT_OUTPUT_SUBDIRS: [&str; 2] = ["data", "hta"];

// CodeSystem artifact constants
pub const FHIR_NAMESPACE: &str = "http://hl7.org/fhir";
pub const CODESYSTEM_VERSION: &str = "1.0.0";
pub const CODESYSTEM_STATUS: &str = "active";
pub const CODESYSTEM_EXPERIMENTAL: &str = "false";
pub const CODESYSTEM_CASE_SENSITIVE: &str = "true";
pub const CODESYSTEM_CONTENT: &str = "not-present";

/// Telecom system recorded alongside an owner website
pub const TELECOM_SYSTEM_URL: &str = "url";

/// Build the output file name for one table of a page.
///
/// A page with a single table keeps the plain `cs-{name}.xml` name; pages
/// with several tables get a 1-based index suffix so no table overwrites another.
pub fn output_file_name(name: &str, index: usize, table_count: usize) -> String {
    if table_count <= 1 {
        format!("cs-{name}.xml")
    } else {
        format!("cs-{name}-{}.xml", index + 1)
    }
}
