// Page pipeline: extract tables, then map, build, write and check each one

pub mod processing;
pub mod storage;

use std::path::PathBuf;
use tracing::{info, instrument, warn};

use crate::common::error::Result;
use crate::common::types::Table;
use crate::config::Config;
use processing::parser::{HtmlTableParser, Parser};
use processing::{CodeSystemRecord, FieldMapper, QualityAssessment, QualityGate, RequiredFieldsGate};

/// Result of processing one table
#[derive(Debug)]
pub struct TableOutcome {
    pub index: usize,
    pub output_file: PathBuf,
    pub record: CodeSystemRecord,
    pub quality: QualityAssessment,
}

/// Result of a complete page run
#[derive(Debug, Default)]
pub struct PipelineResult {
    pub tables_found: usize,
    pub outcomes: Vec<TableOutcome>,
}

impl PipelineResult {
    pub fn total_warnings(&self) -> usize {
        self.outcomes.iter().map(|o| o.quality.missing_count()).sum()
    }
}

/// Runs every table of a page through mapping, serialization and the quality gate.
pub struct Pipeline<'a> {
    config: &'a Config,
    parser: Box<dyn Parser + 'a>,
    mapper: FieldMapper,
    gate: Box<dyn QualityGate + 'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            parser: Box::new(HtmlTableParser),
            mapper: FieldMapper::new(),
            gate: Box::new(RequiredFieldsGate::new()),
        }
    }

    pub fn with_parser(mut self, parser: impl Parser + 'a) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn with_quality_gate(mut self, gate: impl QualityGate + 'a) -> Self {
        self.gate = Box::new(gate);
        self
    }

    /// Process a page body. Tables are handled in document order; the first
    /// failing table aborts the run.
    #[instrument(skip_all, fields(page = %self.config.page_id))]
    pub fn run_page(&self, html: &str) -> Result<PipelineResult> {
        let tables = self.parser.parse(html);
        if tables.is_empty() {
            warn!("No tables found on page");
        }

        let mut result = PipelineResult {
            tables_found: tables.len(),
            outcomes: Vec::with_capacity(tables.len()),
        };
        for (index, table) in tables.iter().enumerate() {
            let output_file = self.config.output_path(index, tables.len());
            result.outcomes.push(self.process_table(index, table, output_file)?);
        }

        info!(
            tables = result.tables_found,
            warnings = result.total_warnings(),
            "Pipeline finished"
        );
        Ok(result)
    }

    /// Map, build, write and check a single table.
    #[instrument(skip(self, table), fields(rows = table.len(), path = %output_file.display()))]
    pub fn process_table(
        &self,
        index: usize,
        table: &Table,
        output_file: PathBuf,
    ) -> Result<TableOutcome> {
        let mapped = self.mapper.map_table(table);
        let record = CodeSystemRecord::build(mapped);
        storage::write_codesystem(&record, &output_file)?;
        let quality = self.gate.assess(&record);
        info!(missing = quality.missing_count(), "Wrote CodeSystem");

        Ok(TableOutcome {
            index,
            output_file,
            record,
            quality,
        })
    }
}
