//! Route-planning collaborator

use crate::core::order::Order;
use anyhow::Result;
use async_trait::async_trait;

/// Receives the validated order batch once the user confirms the preview
#[async_trait]
pub trait RoutePlanner: Send + Sync {
    async fn plan_routes(&self, orders: Vec<Order>) -> Result<()>;
}

/// Planner used until route optimization exists: logs receipt and accepts
#[derive(Debug, Clone, Default)]
pub struct PendingRoutePlanner;

#[async_trait]
impl RoutePlanner for PendingRoutePlanner {
    async fn plan_routes(&self, orders: Vec<Order>) -> Result<()> {
        tracing::info!(
            orders = orders.len(),
            "Orders received for route planning (optimization not available yet)"
        );
        Ok(())
    }
}
