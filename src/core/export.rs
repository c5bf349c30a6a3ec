use crate::core::pipeline::CrimePipeline;
use crate::core::{ConfigProvider, DashboardData, ExtractedSources, Pipeline, Storage};
use crate::domain::model::CrimeTable;
use crate::utils::error::{Result, SafeCityError};

pub const LONG_FORMAT_FILE: &str = "crime_long.csv";
pub const BOROUGH_TOTALS_FILE: &str = "borough_totals.csv";

/// Same extract/transform as [`CrimePipeline`], but loads into CSV files instead of memory.
pub struct ExportPipeline<S: Storage, C: ConfigProvider, O: Storage> {
    source: CrimePipeline<S, C>,
    output: O,
}

impl<S: Storage, C: ConfigProvider, O: Storage> ExportPipeline<S, C, O> {
    pub fn new(source: CrimePipeline<S, C>, output: O) -> Self {
        Self { source, output }
    }
}

pub const LONG_FORMAT_HEADER: [&str; 5] = [
    "BoroughName",
    "MajorCrimeCategory",
    "CrimeSubcategory",
    "Month",
    "CrimeCount",
];

/// Header row is always written, even for a table with no observations.
pub fn long_format_csv(table: &CrimeTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(LONG_FORMAT_HEADER)?;
    for observation in &table.observations {
        writer.serialize(observation)?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|e| SafeCityError::IoError(e.into_error()))
}

pub fn borough_totals_csv(table: &CrimeTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["BoroughName", "CrimeCount"])?;
    for (borough, total) in table.borough_totals() {
        writer.write_record([borough, total.to_string()])?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|e| SafeCityError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, O: Storage> Pipeline for ExportPipeline<S, C, O> {
    type Output = String;

    async fn extract(&self) -> Result<ExtractedSources> {
        self.source.extract().await
    }

    async fn transform(&self, sources: ExtractedSources) -> Result<DashboardData> {
        self.source.transform(sources).await
    }

    async fn load(&self, data: DashboardData) -> Result<String> {
        let crimes = data.crimes.ok_or_else(|| SafeCityError::CrimeDataRequired {
            path: self.source.config().crime_file().to_string(),
        })?;

        let long = long_format_csv(&crimes)?;
        tracing::debug!("Writing {} ({} bytes)", LONG_FORMAT_FILE, long.len());
        self.output.write_file(LONG_FORMAT_FILE, &long).await?;

        let totals = borough_totals_csv(&crimes)?;
        tracing::debug!("Writing {} ({} bytes)", BOROUGH_TOTALS_FILE, totals.len());
        self.output.write_file(BOROUGH_TOTALS_FILE, &totals).await?;

        Ok(self.output.describe(""))
    }
}
