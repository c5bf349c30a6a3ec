use crate::core::loader::{parse_boundaries, parse_crime_csv};
use crate::core::transform::melt;
use crate::core::{ConfigProvider, DashboardData, ExtractedSources, Pipeline, Storage};
use crate::utils::error::{Result, SafeCityError};

/// Reads the crime table and borough boundaries and builds the dashboard snapshot.
pub struct CrimePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CrimePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Missing or empty sources become `None`; any other failure is returned.
    async fn read_optional(&self, path: &str) -> Result<Option<Vec<u8>>> {
        match self.storage.read_file(path).await {
            Ok(bytes) if bytes.is_empty() => {
                tracing::warn!("Data file is empty: {}", self.storage.describe(path));
                Ok(None)
            }
            Ok(bytes) => Ok(Some(bytes)),
            Err(SafeCityError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Data file not found: {}", self.storage.describe(path));
                Ok(None)
            }
            Err(e) if e.is_data_unavailable() => {
                tracing::warn!("Data file unavailable: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn tolerate_unavailable<T>(result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_data_unavailable() => {
                tracing::warn!("{}", e.user_friendly_message());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CrimePipeline<S, C> {
    type Output = DashboardData;

    async fn extract(&self) -> Result<ExtractedSources> {
        tracing::debug!(
            "Reading crime data from {}",
            self.storage.describe(self.config.crime_file())
        );
        let crime_csv = self.read_optional(self.config.crime_file()).await?;

        tracing::debug!(
            "Reading borough boundaries from {}",
            self.storage.describe(self.config.boundaries_file())
        );
        let boundaries_json = self.read_optional(self.config.boundaries_file()).await?;

        Ok(ExtractedSources {
            crime_csv,
            boundaries_json,
        })
    }

    async fn transform(&self, sources: ExtractedSources) -> Result<DashboardData> {
        let crime_name = self.config.crime_file();
        let crimes = match sources.crime_csv {
            Some(bytes) => Self::tolerate_unavailable(parse_crime_csv(crime_name, &bytes))?.map(melt),
            None => None,
        };

        let boundaries_name = self.config.boundaries_file();
        let boundaries = match sources.boundaries_json {
            Some(bytes) => Self::tolerate_unavailable(parse_boundaries(boundaries_name, &bytes))?,
            None => None,
        };

        if let (Some(crimes), Some(boundaries)) = (&crimes, &boundaries) {
            let unmatched = crimes
                .borough_names()
                .into_iter()
                .filter(|b| !boundaries.names.contains(b))
                .count();
            if unmatched > 0 {
                tracing::warn!(
                    "{} boroughs in the crime data have no matching boundary feature",
                    unmatched
                );
            }
        }

        Ok(DashboardData::new(crimes, boundaries))
    }

    async fn load(&self, data: DashboardData) -> Result<DashboardData> {
        match &data.crimes {
            Some(crimes) => tracing::info!(
                "Loaded {} crime observations across {} months",
                crimes.len(),
                crimes.months.len()
            ),
            None => tracing::warn!("Crime data unavailable; charts will show no data"),
        }
        match &data.boundaries {
            Some(boundaries) => tracing::info!("Loaded {} borough boundaries", boundaries.names.len()),
            None => tracing::warn!("Borough boundaries unavailable; heatmap will show no data"),
        }
        Ok(data)
    }
}
