//! Resource and data source trait definitions

use crate::error::{CloudError, Result};
use crate::resource::ResourceData;
use crate::schema::Schema;
use async_trait::async_trait;

/// A managed resource type
///
/// Every CRUD function receives the state handle and the shared API client.
/// `create` must write the new identifier with [`ResourceData::set_id`]
/// before returning; `read` clears the id when the resource is gone.
#[async_trait]
pub trait Resource<C: Send + Sync>: Send + Sync {
    /// Type name (e.g., "security_group")
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn create(&self, d: &mut ResourceData, client: &C) -> Result<()>;

    async fn read(&self, d: &mut ResourceData, client: &C) -> Result<()>;

    /// Apply in-place changes. Types whose attributes all force replacement
    /// keep the default, which refuses.
    async fn update(&self, _d: &mut ResourceData, _client: &C) -> Result<()> {
        Err(CloudError::InvalidConfig(format!(
            "{} cannot be updated in place",
            self.type_name()
        )))
    }

    async fn delete(&self, d: &mut ResourceData, client: &C) -> Result<()>;
}

/// A read-only data source type
#[async_trait]
pub trait DataSource<C: Send + Sync>: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn read(&self, d: &mut ResourceData, client: &C) -> Result<()>;
}

/// Enforce exactly-one semantics on a lookup result.
pub fn single<T>(mut items: Vec<T>) -> Result<T> {
    match items.len() {
        0 => Err(CloudError::NoResults),
        1 => Ok(items.remove(0)),
        n => Err(CloudError::TooManyResults(n)),
    }
}
