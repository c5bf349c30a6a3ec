pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

#[cfg(feature = "cli")]
pub use config::args::{Cli, Command};

pub use config::{storage::LocalStorage, AppConfig};
pub use core::{etl::EtlEngine, export::ExportPipeline, pipeline::CrimePipeline};
pub use domain::model::DashboardData;
pub use utils::error::{Result, SafeCityError};
pub use web::{build_router, AppState};

/// Runs the load pipeline against the configured data directory.
pub async fn load_dashboard_data(config: &AppConfig) -> Result<DashboardData> {
    let storage = LocalStorage::new(&config.data_dir);
    let pipeline = CrimePipeline::new(storage, config.clone());
    EtlEngine::new_with_monitoring(pipeline, config.monitor)
        .run()
        .await
}
