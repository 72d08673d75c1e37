use std::fmt;

use serde::Serialize;

use crate::tuning::{AcceleratorSpec, Resources};

pub const OS_LINUX: &str = "RHEL 9 / Centos stream 9 x86_64 bit";
pub const OS_WINDOWS: &str = "Windows Server 2016+";

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoadTier {
    Low,
    Medium,
    High,
    Enterprise,
}

impl fmt::Display for LoadTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoadTier::Low => "Low",
            LoadTier::Medium => "Medium",
            LoadTier::High => "High",
            LoadTier::Enterprise => "Enterprise",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum NetworkZone {
    #[serde(rename = "DMZ")]
    Dmz,
    Internal,
    Private,
}

impl fmt::Display for NetworkZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NetworkZone::Dmz => "DMZ",
            NetworkZone::Internal => "Internal",
            NetworkZone::Private => "Private",
        };
        f.write_str(label)
    }
}

/// What a server does. Post-processing switches on this, never on names.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    AppServer,
    DbServer,
    CombinedAppDb,
    Accelerator,
    Analytics,
    Auxiliary,
}

/// Which component created a server.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    Crm,
    Marketing,
    Assistant,
    Analytics,
    Messaging,
    Shared,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Accelerator {
    #[serde(rename = "type")]
    pub kind: String,
    pub memory: String,
}

impl From<&AcceleratorSpec> for Accelerator {
    fn from(spec: &AcceleratorSpec) -> Self {
        Self {
            kind: spec.kind.clone(),
            memory: spec.memory.clone(),
        }
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.memory)
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ServerSpec {
    pub id: String,
    pub name: String,
    pub specification: Option<String>,
    pub cpu: String,
    pub ram: String,
    pub storage: String,
    pub os: String,
    pub load_tier: LoadTier,
    pub zone: NetworkZone,
    pub accelerator: Option<Accelerator>,
    pub notes: Option<String>,
    pub role: Role,
    pub origin: Origin,
    pub resources: Resources,
}

impl ServerSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        origin: Origin,
        resources: Resources,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            specification: None,
            cpu: format_cpu(resources.cpu),
            ram: format_ram(resources.ram_gb),
            storage: format_storage(resources.storage_gb),
            os: OS_LINUX.to_string(),
            load_tier: LoadTier::Medium,
            zone: NetworkZone::Internal,
            accelerator: None,
            notes: None,
            role,
            origin,
            resources,
        }
    }

    pub fn with_specification(mut self, specification: impl Into<String>) -> Self {
        self.specification = Some(specification.into());
        self
    }

    pub fn with_tier(mut self, tier: LoadTier) -> Self {
        self.load_tier = tier;
        self
    }

    pub fn in_zone(mut self, zone: NetworkZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_os(mut self, os: &str) -> Self {
        self.os = os.to_string();
        self
    }

    pub fn with_accelerator(mut self, accelerator: Accelerator) -> Self {
        self.accelerator = Some(accelerator);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Copy of this server under a new identity and role.
    pub fn derive(&self, id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            ..self.clone()
        }
    }
}

pub fn format_cpu(cores: u32) -> String {
    format!("{} Core Xeon Processor or equivalent", cores)
}

pub fn format_ram(gb: u32) -> String {
    format!("{} GB", gb)
}

pub fn format_storage(gb: u32) -> String {
    format!("{} GB Available", gb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_server_formats_resources() {
        let server = ServerSpec::new(
            "crm",
            "PROD APP+DB Server (CRM)",
            Role::CombinedAppDb,
            Origin::Crm,
            Resources::new(8, 24, 450),
        );
        assert_eq!(server.cpu, "8 Core Xeon Processor or equivalent");
        assert_eq!(server.ram, "24 GB");
        assert_eq!(server.storage, "450 GB Available");
        assert_eq!(server.os, OS_LINUX);
        assert_eq!(server.zone, NetworkZone::Internal);
    }

    #[test]
    fn derive_keeps_resources_and_replaces_identity() {
        let server = ServerSpec::new(
            "crm",
            "PROD APP+DB Server (CRM)",
            Role::CombinedAppDb,
            Origin::Crm,
            Resources::new(8, 24, 450),
        )
        .with_tier(LoadTier::High);
        let app = server.derive("crm-app", "PROD APP Server (CRM)", Role::AppServer);

        assert_eq!(app.id, "crm-app");
        assert_eq!(app.role, Role::AppServer);
        assert_eq!(app.resources, server.resources);
        assert_eq!(app.load_tier, LoadTier::High);
        assert_eq!(app.origin, Origin::Crm);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(LoadTier::Low < LoadTier::Medium);
        assert!(LoadTier::High < LoadTier::Enterprise);
    }
}
