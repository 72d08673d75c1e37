use serde::Serialize;

use crate::metrics::{BotMetrics, SeatMetrics};
use crate::models::{DeploymentModel, Environment, Industry};
use crate::server::ServerSpec;

/// Monthly token spend when the conversational-AI layer uses a managed API.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CloudCostEstimate {
    pub tokens_per_minute: f64,
    pub monthly_tokens: f64,
    pub monthly_cost_usd: f64,
    pub provider: String,
    pub notes: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ComponentMetrics {
    pub crm: SeatMetrics,
    pub marketing: SeatMetrics,
    pub bot: BotMetrics,
}

/// Everything one engine invocation produces. Built once, never mutated.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CalculationResult {
    pub client_name: String,
    pub industry: Industry,
    pub environment: Environment,
    pub deployment: DeploymentModel,
    pub servers: Vec<ServerSpec>,
    pub metrics: ComponentMetrics,
    pub cloud_cost: Option<CloudCostEstimate>,
    pub managed_message: Option<String>,
    pub dr_message: Option<String>,
}

impl CalculationResult {
    pub fn node_count(&self) -> usize {
        self.servers.len()
    }
}
