//! Tuning table consumed by the sizing engine.
//!
//! A [`ConfigTable`] is resolved once, before the engine runs, and is treated
//! as an immutable snapshot for the whole calculation. A table file is an
//! overlay: it is merged key by key onto [`ConfigTable::default`], so a
//! partial section only overrides the values it names and every other value,
//! at any depth, keeps the default for that position. A table that cannot be
//! read or parsed at all falls back to the defaults entirely.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::Environment;
use crate::server::LoadTier;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ConfigTable {
    pub env_multipliers: EnvMultipliers,
    pub crm: SeatTuning,
    pub marketing: SeatTuning,
    pub integration_server: Resources,
    pub assistant: AssistantTuning,
    pub analytics: AnalyticsTuning,
    pub messaging: MessagingTuning,
    pub forward_proxy: Resources,
    /// CRM concurrent users above which UAT also gets the HA pair.
    pub ha_uat_user_threshold: u32,
}

impl Default for ConfigTable {
    fn default() -> Self {
        Self {
            env_multipliers: EnvMultipliers::default(),
            crm: SeatTuning::crm(),
            marketing: SeatTuning::marketing(),
            integration_server: Resources::new(4, 16, 200),
            assistant: AssistantTuning::default(),
            analytics: AnalyticsTuning::default(),
            messaging: MessagingTuning::default(),
            forward_proxy: Resources::new(2, 4, 50),
            ha_uat_user_threshold: 100,
        }
    }
}

impl ConfigTable {
    /// Parses a TOML overlay. Unparsable input yields the defaults.
    pub fn from_toml_str(contents: &str) -> Self {
        let parsed = toml::from_str::<toml::Value>(contents)
            .map_err(|err| err.to_string())
            .and_then(|value| serde_json::to_value(value).map_err(|err| err.to_string()))
            .and_then(|overlay| Self::overlay(overlay).map_err(|err| err.to_string()));
        match parsed {
            Ok(table) => table.sanitized(),
            Err(err) => {
                warn!("ignoring malformed TOML tuning table: {}", err);
                Self::default()
            }
        }
    }

    /// Parses a JSON overlay. Unparsable input yields the defaults.
    pub fn from_json_str(contents: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(contents).and_then(Self::overlay);
        match parsed {
            Ok(table) => table.sanitized(),
            Err(err) => {
                warn!("ignoring malformed JSON tuning table: {}", err);
                Self::default()
            }
        }
    }

    /// Defaults with `overlay` merged on top, key by key.
    fn overlay(overlay: Value) -> serde_json::Result<Self> {
        let mut merged = serde_json::to_value(Self::default())?;
        merge_value(&mut merged, normalize_keys(overlay));
        serde_json::from_value(merged)
    }

    /// Reads a table from disk, choosing the parser by extension.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(
                    "failed to read tuning table '{}': {}; using defaults",
                    path.display(),
                    err
                );
                return Self::default();
            }
        };
        let ext = path
            .extension()
            .and_then(|value| value.to_str())
            .unwrap_or("");
        debug!("loading tuning table from {}", path.display());

        match ext {
            "toml" => Self::from_toml_str(&contents),
            "json" => Self::from_json_str(&contents),
            _ => {
                warn!("unsupported tuning table format '{}'; using defaults", ext);
                Self::default()
            }
        }
    }

    /// Resolves the snapshot for one run: the file when given, else defaults.
    pub fn resolve(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path),
            None => Self::default(),
        }
    }

    pub fn multiplier(&self, environment: Environment) -> f64 {
        self.env_multipliers.for_env(environment)
    }

    /// Replaces values the engine cannot work with by their defaults.
    fn sanitized(mut self) -> Self {
        let defaults = EnvMultipliers::default();
        for env in [Environment::Dev, Environment::Uat, Environment::Prod] {
            let value = self.env_multipliers.for_env(env);
            if !value.is_finite() || value <= 0.0 {
                warn!("invalid multiplier {} for {}; using default", value, env);
                self.env_multipliers.set(env, defaults.for_env(env));
            }
        }
        let minutes = self.assistant.minutes_per_month;
        if !minutes.is_finite() || minutes < 0.0 {
            self.assistant.minutes_per_month = AssistantTuning::default().minutes_per_month;
        }
        self
    }
}

/// Objects merge recursively; any other overlay value replaces the base.
/// `null` leaves the base untouched.
fn merge_value(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_value(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Rewrites the key spellings used by exported admin tables (`lowToMedium`,
/// `DEV`, `hdd`, ...) to the field names of this module.
fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (canonical_key(&key), normalize_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

fn canonical_key(key: &str) -> String {
    match key {
        "talendServer" => return "integration_server".to_string(),
        "namedUsers" => return "concurrent_users".to_string(),
        "ram" => return "ram_gb".to_string(),
        "hdd" => return "storage_gb".to_string(),
        "baseHdd" => return "base_storage_gb".to_string(),
        _ => {}
    }
    if key.chars().all(|c| !c.is_ascii_lowercase()) {
        return key.to_ascii_lowercase();
    }
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct EnvMultipliers {
    pub dev: f64,
    pub uat: f64,
    pub prod: f64,
}

impl Default for EnvMultipliers {
    fn default() -> Self {
        Self {
            dev: 0.8,
            uat: 1.0,
            prod: 1.5,
        }
    }
}

impl EnvMultipliers {
    pub fn for_env(&self, environment: Environment) -> f64 {
        match environment {
            Environment::Dev => self.dev,
            Environment::Uat => self.uat,
            Environment::Prod => self.prod,
        }
    }

    fn set(&mut self, environment: Environment, value: f64) {
        match environment {
            Environment::Dev => self.dev = value,
            Environment::Uat => self.uat = value,
            Environment::Prod => self.prod = value,
        }
    }
}

/// Base resource tuple. Storage is ignored where a sizer derives it.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Resources {
    pub cpu: u32,
    pub ram_gb: u32,
    pub storage_gb: u32,
}

impl Resources {
    pub const fn new(cpu: u32, ram_gb: u32, storage_gb: u32) -> Self {
        Self {
            cpu,
            ram_gb,
            storage_gb,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TierSpecs {
    pub low: Resources,
    pub medium: Resources,
    pub high: Resources,
}

impl TierSpecs {
    pub fn for_tier(&self, tier: LoadTier) -> Resources {
        match tier {
            LoadTier::Low => self.low,
            LoadTier::Medium => self.medium,
            LoadTier::High | LoadTier::Enterprise => self.high,
        }
    }
}

/// Minimums enforced after environment scaling.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Default)]
pub struct Floor {
    pub cpu: u32,
    pub ram_gb: u32,
}

/// One boundary for seat-driven components. A metric strictly above its
/// limit moves the component past the boundary.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct SeatThreshold {
    pub triggers_per_sec: f64,
    pub concurrent_users: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SeatTuning {
    pub low_to_medium: SeatThreshold,
    pub medium_to_high: SeatThreshold,
    pub specs: TierSpecs,
    pub floor: Floor,
    /// Round scaled CPU up to the next power of two.
    pub round_cpu_pow2: bool,
    /// Apply the environment multiplier to storage as well.
    pub scale_storage: bool,
    /// Minimum storage as a multiple of the data volume; zero disables it.
    pub storage_per_data_gb: f64,
}

impl SeatTuning {
    pub fn crm() -> Self {
        Self {
            low_to_medium: SeatThreshold {
                triggers_per_sec: 10.0,
                concurrent_users: 300.0,
            },
            medium_to_high: SeatThreshold {
                triggers_per_sec: 100.0,
                concurrent_users: 3000.0,
            },
            specs: TierSpecs {
                low: Resources::new(2, 8, 200),
                medium: Resources::new(4, 16, 300),
                high: Resources::new(8, 32, 500),
            },
            floor: Floor { cpu: 4, ram_gb: 16 },
            round_cpu_pow2: true,
            scale_storage: true,
            storage_per_data_gb: 1.2,
        }
    }

    pub fn marketing() -> Self {
        Self {
            specs: TierSpecs {
                low: Resources::new(2, 8, 80),
                medium: Resources::new(4, 12, 100),
                high: Resources::new(8, 24, 200),
            },
            floor: Floor { cpu: 4, ram_gb: 12 },
            round_cpu_pow2: false,
            scale_storage: false,
            storage_per_data_gb: 0.0,
            ..Self::crm()
        }
    }
}

/// One boundary for the conversational-AI control server.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct TokenThreshold {
    pub tokens_per_minute: f64,
    pub requests_per_minute: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AcceleratorSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub memory: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AssistantTuning {
    pub low_to_medium: TokenThreshold,
    pub medium_to_high: TokenThreshold,
    pub specs: TierSpecs,
    pub ram_floor_gb: u32,
    /// Requests per minute above which a dedicated accelerator worker is added.
    pub worker_rpm_threshold: f64,
    /// Tokens per minute above which the worker moves to the large band.
    pub worker_band_tpm: f64,
    pub worker_standard: Resources,
    pub worker_large: Resources,
    pub worker_round_cpu_pow2: bool,
    pub accelerator_average: AcceleratorSpec,
    pub accelerator_high: AcceleratorSpec,
    pub gateway: Resources,
    pub frontend: Resources,
    pub cost_per_million_tokens: f64,
    pub minutes_per_month: f64,
    pub provider: String,
}

impl Default for AssistantTuning {
    fn default() -> Self {
        Self {
            low_to_medium: TokenThreshold {
                tokens_per_minute: 5_000.0,
                requests_per_minute: 100.0,
            },
            medium_to_high: TokenThreshold {
                tokens_per_minute: 20_000.0,
                requests_per_minute: 400.0,
            },
            specs: TierSpecs {
                low: Resources::new(4, 12, 100),
                medium: Resources::new(6, 16, 100),
                high: Resources::new(8, 32, 100),
            },
            ram_floor_gb: 16,
            worker_rpm_threshold: 200.0,
            worker_band_tpm: 50_000.0,
            worker_standard: Resources::new(8, 32, 500),
            worker_large: Resources::new(16, 64, 1000),
            worker_round_cpu_pow2: true,
            accelerator_average: AcceleratorSpec {
                kind: "NVIDIA L4".to_string(),
                memory: "24 GB".to_string(),
            },
            accelerator_high: AcceleratorSpec {
                kind: "NVIDIA A100".to_string(),
                memory: "80 GB".to_string(),
            },
            gateway: Resources::new(2, 4, 50),
            frontend: Resources::new(2, 4, 50),
            cost_per_million_tokens: 3.5,
            minutes_per_month: 60.0 * 24.0 * 30.0,
            provider: "Cloud LLM Provider".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AnalyticsTuning {
    /// CRM concurrent users at or above which analytics is split and auto-enabled.
    pub consolidation_threshold: u32,
    pub consolidated: Resources,
    pub base_storage_gb: u32,
    pub storage_multiplier: f64,
    pub olap_standard: Resources,
    pub olap_large: Resources,
    pub olap_user_threshold: u32,
    pub visualization: Resources,
    pub round_cpu_pow2: bool,
}

impl Default for AnalyticsTuning {
    fn default() -> Self {
        Self {
            consolidation_threshold: 100,
            consolidated: Resources::new(4, 16, 0),
            base_storage_gb: 80,
            storage_multiplier: 1.5,
            olap_standard: Resources::new(8, 24, 0),
            olap_large: Resources::new(16, 64, 0),
            olap_user_threshold: 1000,
            visualization: Resources::new(4, 8, 80),
            round_cpu_pow2: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MessagingTuning {
    /// CRM concurrent users above which the large spec applies.
    pub user_threshold: u32,
    pub standard: Resources,
    pub large: Resources,
    pub round_cpu_pow2: bool,
}

impl Default for MessagingTuning {
    fn default() -> Self {
        Self {
            user_threshold: 50,
            standard: Resources::new(4, 16, 100),
            large: Resources::new(8, 24, 200),
            round_cpu_pow2: false,
        }
    }
}
