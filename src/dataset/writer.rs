// CSV Dataset Output
//
// Writes page records under a fixed, catalog-derived header. Because every
// record carries the full schema key set, rows can stream out as pages
// finish with no discovery pass.

use anyhow::{Context, Result};
use csv::Writer;
use std::fs::File;
use std::path::Path;

use crate::extractors::base::{FeatureRecord, FeatureValue};

pub struct DatasetWriter {
    writer: Writer<File>,
    schema: Vec<String>,
}

impl DatasetWriter {
    /// Create the output file and write the header row.
    pub fn create(path: &Path, schema: Vec<String>) -> Result<Self> {
        let mut writer = Writer::from_path(path)
            .with_context(|| format!("creating dataset file {}", path.display()))?;
        writer.write_record(&schema).context("writing CSV header")?;
        Ok(Self { writer, schema })
    }

    pub fn write(&mut self, record: &FeatureRecord) -> Result<()> {
        let row: Vec<String> = self
            .schema
            .iter()
            .map(|key| {
                record
                    .get(key)
                    .as_ref()
                    .map(FeatureValue::csv_field)
                    .unwrap_or_else(|| "0".to_string())
            })
            .collect();
        self.writer.write_record(&row).context("writing CSV row")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().context("flushing dataset file")?;
        Ok(())
    }
}
