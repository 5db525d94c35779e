//! Driving port for garage reads.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::query::{GarageProjection, ListQuery};

/// Request to list garages by declarative query.
#[derive(Debug, Clone)]
pub struct ListGaragesRequest {
    pub query: ListQuery,
}

/// One page of projected garages in query order.
#[derive(Debug, Clone)]
pub struct ListGaragesResponse {
    pub data: Vec<GarageProjection>,
}

/// Domain use-case port for listing garages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GarageQuery: Send + Sync {
    /// Plan and execute a list query.
    async fn list(&self, request: ListGaragesRequest) -> Result<ListGaragesResponse, Error>;
}
