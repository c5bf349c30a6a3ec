use crate::domain::model::{DashboardData, ExtractedSources};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Human-readable location of `path`, used in logs and returned paths.
    fn describe(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn crime_file(&self) -> &str;
    fn boundaries_file(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Output: Send;

    async fn extract(&self) -> Result<ExtractedSources>;
    async fn transform(&self, sources: ExtractedSources) -> Result<DashboardData>;
    async fn load(&self, data: DashboardData) -> Result<Self::Output>;
}
