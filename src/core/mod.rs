pub mod dashboard;
pub mod etl;
pub mod export;
pub mod figures;
pub mod loader;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{DashboardData, ExtractedSources};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
