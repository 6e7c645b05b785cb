use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::constants::{
    output_file_name, DEFAULT_BASE_URL, DEFAULT_CODESYSTEM_NAME, DEFAULT_OUTPUT_SUBDIRS,
    DEFAULT_PAGE_ID, DEFAULT_TOKEN_FILE, DEFAULT_USER_AGENT,
};
use crate::common::error::{Result, ScraperError};

/// Scrape a Confluence code system page into a FHIR CodeSystem XML artifact
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cs_scraper")]
#[command(about = "Transform a Confluence code system page into a FHIR CodeSystem")]
#[command(version = "0.1.0")]
pub struct CliArgs {
    /// CodeSystem data folder (defaults to $HOME/data/hta)
    #[arg(short = 'r', long = "csdir")]
    pub csdir: Option<PathBuf>,

    /// CodeSystem name, used in the output file name
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Confluence page id
    #[arg(short = 'p', long)]
    pub page: Option<String>,

    /// File holding the Confluence access token
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read the page from a local HTML file instead of fetching it
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Also write JSON logs to this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

/// Optional settings read from a TOML file
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub confluence: ConfluenceConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfluenceConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub token_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: FileConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Run configuration, resolved once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub name: String,
    pub page_id: String,
    pub token_file: PathBuf,
    pub base_url: String,
    pub user_agent: String,
    pub html_source: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Resolve from CLI arguments and the process environment.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::resolve(args, home)
    }

    /// CLI values win over the config file, which wins over built-in defaults.
    pub fn resolve(args: &CliArgs, home: Option<PathBuf>) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let output_dir = match (&args.csdir, home) {
            (Some(dir), _) => dir.clone(),
            (None, Some(home)) => DEFAULT_OUTPUT_SUBDIRS
                .iter()
                .fold(home, |path, part| path.join(part)),
            (None, None) => {
                return Err(ScraperError::Config(
                    "HOME is not set; pass --csdir explicitly".to_string(),
                ))
            }
        };

        Ok(Self {
            output_dir,
            name: args
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_CODESYSTEM_NAME.to_string()),
            page_id: args
                .page
                .clone()
                .unwrap_or_else(|| DEFAULT_PAGE_ID.to_string()),
            token_file: args
                .token_file
                .clone()
                .or(file.confluence.token_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE)),
            base_url: file
                .confluence
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            user_agent: file
                .confluence
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            html_source: args.html.clone(),
            log_dir: args.log_dir.clone(),
        })
    }

    pub fn page_url(&self) -> String {
        format!("{}?pageId={}", self.base_url, self.page_id)
    }

    pub fn output_path(&self, index: usize, table_count: usize) -> PathBuf {
        self.output_dir
            .join(output_file_name(&self.name, index, table_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_follow_home_directory() {
        let args = CliArgs::default();
        let config = Config::resolve(&args, Some(PathBuf::from("/home/tester"))).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/home/tester/data/hta"));
        assert_eq!(config.name, "clinVarV");
        assert_eq!(config.page_id, "81028287");
        assert_eq!(config.token_file, PathBuf::from("access.token"));
        assert_eq!(
            config.page_url(),
            "https://confluence.hl7.org/pages/viewpage.action?pageId=81028287"
        );
        assert_eq!(
            config.output_path(0, 1),
            PathBuf::from("/home/tester/data/hta/cs-clinVarV.xml")
        );
    }

    #[test]
    fn missing_home_without_csdir_is_config_error() {
        let err = Config::resolve(&CliArgs::default(), None).unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }

    #[test]
    fn cli_flags_parse_short_and_long_forms() {
        let args = CliArgs::try_parse_from([
            "cs_scraper",
            "-r",
            "/tmp/out",
            "-n",
            "loinc",
            "--page",
            "12345",
        ])
        .unwrap();
        let config = Config::resolve(&args, None).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.name, "loinc");
        assert_eq!(config.page_id, "12345");
        assert!(config.html_source.is_none());
    }

    #[test]
    fn cli_values_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[confluence]\nbase_url = \"https://wiki.example.org/view\"\nuser_agent = \"test-agent\"\ntoken_file = \"from-file.token\""
        )
        .unwrap();

        let args = CliArgs {
            csdir: Some(PathBuf::from("/tmp/out")),
            token_file: Some(PathBuf::from("from-cli.token")),
            config: Some(file.path().to_path_buf()),
            ..CliArgs::default()
        };
        let config = Config::resolve(&args, None).unwrap();

        assert_eq!(config.base_url, "https://wiki.example.org/view");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.token_file, PathBuf::from("from-cli.token"));
    }

    #[test]
    fn unreadable_config_file_is_reported() {
        let args = CliArgs {
            csdir: Some(PathBuf::from("/tmp/out")),
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            ..CliArgs::default()
        };
        let err = Config::resolve(&args, None).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
