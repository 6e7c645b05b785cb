use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::common::constants::PAGE_CONTENT_TYPE;
use crate::common::error::{Result, ScraperError};
use crate::config::Config;

/// Read the bearer token: the whole file content, trimmed.
pub fn read_access_token(path: &Path) -> Result<String> {
    let token = fs::read_to_string(path).map_err(|source| ScraperError::Credential {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(token.trim().to_string())
}

/// Fetches a single Confluence page view as HTML.
pub struct ConfluenceCrawler {
    client: Client,
    token: String,
    user_agent: String,
}

impl ConfluenceCrawler {
    pub fn new(token: String, user_agent: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token,
            user_agent: user_agent.into(),
        }
    }

    /// Build a crawler from the run configuration, reading the token file once.
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = read_access_token(&config.token_file)?;
        debug!(token_file = %config.token_file.display(), "loaded access token");
        Ok(Self::new(token, config.user_agent.clone()))
    }

    #[instrument(skip(self))]
    pub fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, PAGE_CONTENT_TYPE)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()?
            .error_for_status()?;

        let body = response.text()?;
        info!(bytes = body.len(), "fetched page");
        Ok(body)
    }
}

/// Load page HTML from the configured local file, or fetch it from Confluence.
pub fn load_page(config: &Config) -> Result<String> {
    match &config.html_source {
        Some(path) => {
            info!(path = %path.display(), "reading page from local file");
            Ok(fs::read_to_string(path)?)
        }
        None => {
            let crawler = ConfluenceCrawler::from_config(config)?;
            crawler.fetch_page(&config.page_url())
        }
    }
}
