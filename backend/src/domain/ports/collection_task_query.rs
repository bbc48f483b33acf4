//! Driving port for browsing collection tasks.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{CollectionTask, Error};

/// Default page size of the task list.
pub const TASKS_PER_PAGE: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTasksRequest {
    pub page: PageRequest,
    /// Case-insensitive location filter.
    pub search: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionTaskQuery: Send + Sync {
    async fn list_tasks(&self, request: ListTasksRequest) -> Result<Page<CollectionTask>, Error>;
}
