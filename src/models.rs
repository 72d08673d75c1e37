use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A complete sizing request: workload, selected components and deployment context.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SizingRequest {
    pub client_name: String,
    pub industry: Industry,
    pub environment: Environment,
    pub deployment: DeploymentModel,
    pub bot_mode: BotMode,
    pub crm: SeatLoad,
    pub marketing: SeatLoad,
    pub bot: BotLoad,
    pub components: ComponentSelection,
    pub data_volume_gb: f64,
    pub ha_enabled: bool,
    pub dr_enabled: bool,
}

impl Default for SizingRequest {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            industry: Industry::Financial,
            environment: Environment::Prod,
            deployment: DeploymentModel::OnPremise,
            bot_mode: BotMode::SelfHosted,
            crm: SeatLoad::default(),
            marketing: SeatLoad::default(),
            bot: BotLoad::default(),
            components: ComponentSelection::default(),
            data_volume_gb: 50.0,
            ha_enabled: true,
            dr_enabled: false,
        }
    }
}

impl SizingRequest {
    /// Same request pinned to another environment tier.
    pub fn for_environment(&self, environment: Environment) -> Self {
        Self {
            environment,
            ..self.clone()
        }
    }
}

/// Seat-based load for CRM and Marketing.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SeatLoad {
    pub named_users: u32,
    /// Percentage of named users active at the same time.
    pub concurrency_rate: f64,
    pub triggers_per_minute: f64,
}

impl Default for SeatLoad {
    fn default() -> Self {
        Self {
            named_users: 100,
            concurrency_rate: 10.0,
            triggers_per_minute: 3.0,
        }
    }
}

/// Conversational-AI load.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BotLoad {
    pub active_users: u32,
    pub requests_per_user_per_minute: f64,
    pub avg_tokens_per_request: f64,
    pub performance: BotPerformance,
}

impl Default for BotLoad {
    fn default() -> Self {
        Self {
            active_users: 5,
            requests_per_user_per_minute: 2.0,
            avg_tokens_per_request: 500.0,
            performance: BotPerformance::Average,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ComponentSelection {
    pub crm: bool,
    pub marketing: bool,
    #[serde(alias = "bot")]
    pub assistant: bool,
    #[serde(alias = "olap")]
    pub analytics: bool,
    #[serde(alias = "bi")]
    pub visualization: bool,
    pub messaging: bool,
}

impl Default for ComponentSelection {
    fn default() -> Self {
        Self {
            crm: true,
            marketing: false,
            assistant: false,
            analytics: true,
            visualization: true,
            messaging: false,
        }
    }
}

impl ComponentSelection {
    pub fn none() -> Self {
        Self {
            crm: false,
            marketing: false,
            assistant: false,
            analytics: false,
            visualization: false,
            messaging: false,
        }
    }

    pub fn set(&mut self, component: Component, enabled: bool) {
        match component {
            Component::Crm => self.crm = enabled,
            Component::Marketing => self.marketing = enabled,
            Component::Assistant => self.assistant = enabled,
            Component::Analytics => self.analytics = enabled,
            Component::Visualization => self.visualization = enabled,
            Component::Messaging => self.messaging = enabled,
        }
    }

    pub fn is_enabled(&self, component: Component) -> bool {
        match component {
            Component::Crm => self.crm,
            Component::Marketing => self.marketing,
            Component::Assistant => self.assistant,
            Component::Analytics => self.analytics,
            Component::Visualization => self.visualization,
            Component::Messaging => self.messaging,
        }
    }
}

/// Optional software components a request can select.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Component {
    Crm,
    Marketing,
    Assistant,
    Analytics,
    Visualization,
    Messaging,
}

impl Component {
    pub const ALL: [Component; 6] = [
        Component::Crm,
        Component::Marketing,
        Component::Assistant,
        Component::Analytics,
        Component::Visualization,
        Component::Messaging,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Component::Crm => "crm",
            Component::Marketing => "marketing",
            Component::Assistant => "assistant",
            Component::Analytics => "analytics",
            Component::Visualization => "visualization",
            Component::Messaging => "messaging",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Component::Crm => "CRM Solution",
            Component::Marketing => "Marketing Automation",
            Component::Assistant => "Conversational AI Layer",
            Component::Analytics => "OLAP Analytics",
            Component::Visualization => "BI Visualization",
            Component::Messaging => "Team Messaging",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|component| component.key() == key)
    }
}

#[derive(
    Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[serde(alias = "DEV")]
    Dev,
    #[serde(alias = "UAT")]
    Uat,
    #[serde(alias = "PROD")]
    Prod,
}

impl Environment {
    /// Report order used when every tier is rendered side by side.
    pub const REPORT_ORDER: [Environment; 3] =
        [Environment::Prod, Environment::Uat, Environment::Dev];

    pub fn label(&self) -> &'static str {
        match self {
            Environment::Dev => "DEV",
            Environment::Uat => "UAT",
            Environment::Prod => "PROD",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentModel {
    #[serde(alias = "on-prem")]
    #[value(alias = "on-prem")]
    OnPremise,
    OnCloud,
    #[serde(alias = "saas")]
    #[value(alias = "saas")]
    FullyManaged,
}

impl fmt::Display for DeploymentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeploymentModel::OnPremise => "ON PREMISE",
            DeploymentModel::OnCloud => "ON CLOUD",
            DeploymentModel::FullyManaged => "FULLY MANAGED",
        };
        f.write_str(label)
    }
}

/// How the conversational-AI layer is hosted.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BotMode {
    #[serde(alias = "premise")]
    #[value(alias = "premise")]
    SelfHosted,
    #[serde(alias = "cloud")]
    #[value(alias = "cloud")]
    ManagedApi,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BotPerformance {
    Average,
    High,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Industry {
    /// Banking, financial services and insurance.
    #[serde(alias = "bfsi")]
    #[value(alias = "bfsi")]
    Financial,
    General,
}

impl Industry {
    /// Regulated industries route outbound traffic through a forward proxy.
    pub fn is_restricted(&self) -> bool {
        matches!(self, Industry::Financial)
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Industry::Financial => "BFSI",
            Industry::General => "Non BFSI/Healthcare",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_fill_missing_fields() {
        let request: SizingRequest = toml::from_str(
            r#"
environment = "uat"
[crm]
named_users = 800
"#,
        )
        .expect("request should parse");

        assert_eq!(request.environment, Environment::Uat);
        assert_eq!(request.crm.named_users, 800);
        assert_eq!(request.crm.concurrency_rate, 10.0);
        assert_eq!(request.deployment, DeploymentModel::OnPremise);
        assert!(request.components.crm);
    }

    #[test]
    fn legacy_aliases_are_accepted() {
        let request: SizingRequest = serde_json::from_str(
            r#"{
                "environment": "PROD",
                "deployment": "saas",
                "bot_mode": "cloud",
                "industry": "bfsi",
                "components": { "crm": false, "bot": true, "rocketChat": true }
            }"#,
        )
        .expect("request should parse");

        assert_eq!(request.deployment, DeploymentModel::FullyManaged);
        assert_eq!(request.bot_mode, BotMode::ManagedApi);
        assert!(request.components.assistant);
        assert!(!request.components.messaging);
    }

    #[test]
    fn environments_are_ordered() {
        assert!(Environment::Dev < Environment::Uat);
        assert!(Environment::Uat < Environment::Prod);
    }

    #[test]
    fn component_keys_round_trip() {
        for component in Component::ALL {
            assert_eq!(Component::from_key(component.key()), Some(component));
        }
        assert_eq!(Component::from_key("rocket"), None);
    }
}
