//! Platform recommendations: the software and browser matrix shipped with
//! every sizing report. The engine never reads it; it is advisory data.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareRecommendation {
    pub software: String,
    pub supported_version: String,
    #[serde(default)]
    pub component_hosted: String,
    #[serde(default)]
    pub comments: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserRecommendation {
    pub browser: String,
    pub supported_version: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PlatformRecommendations {
    pub software: Vec<SoftwareRecommendation>,
    pub browsers: Vec<BrowserRecommendation>,
}

impl Default for PlatformRecommendations {
    fn default() -> Self {
        let software = [
            (
                "RHEL / CentOS Stream",
                "9.x (x86_64)",
                "All Application & Database Servers",
                "Recommended Linux distribution for production workloads",
            ),
            (
                "Windows Server",
                "2016 / 2019 / 2022",
                "Integration / ETL Server",
                "Required for the integration runtime",
            ),
            (
                "Java (OpenJDK)",
                "17 LTS",
                "CRM Application Server",
                "Runtime for CRM backend services",
            ),
            (
                "Node.js",
                "20 LTS",
                "Web Server / Marketing / AI Frontend",
                "Runtime for frontend SSR and API proxy",
            ),
            (
                "PostgreSQL",
                "15.x / 16.x",
                "Database Server",
                "Primary relational database",
            ),
            (
                "ClickHouse",
                "24.x",
                "OLAP Analytics Server",
                "OLAP engine for analytical queries",
            ),
            (
                "Metabase",
                "0.49+",
                "BI Visualization Server",
                "BI dashboard and reporting layer",
            ),
            (
                "Nginx",
                "1.24+",
                "Web / Reverse Proxy",
                "Load balancer and reverse proxy for HA",
            ),
            (
                "Docker",
                "24.x / 25.x",
                "All Servers (optional)",
                "Container runtime for microservice deployments",
            ),
            (
                "NVIDIA CUDA Toolkit",
                "12.x",
                "AI Inference Worker",
                "Required only for self-hosted GPU inference nodes",
            ),
        ]
        .into_iter()
        .map(|(software, version, hosted, comments)| SoftwareRecommendation {
            software: software.to_string(),
            supported_version: version.to_string(),
            component_hosted: hosted.to_string(),
            comments: comments.to_string(),
        })
        .collect();

        let browsers = [
            ("Google Chrome", "120+"),
            ("Microsoft Edge", "120+ (Chromium-based)"),
            ("Mozilla Firefox", "115+ ESR / 120+"),
            ("Apple Safari", "17+"),
        ]
        .into_iter()
        .map(|(browser, version)| BrowserRecommendation {
            browser: browser.to_string(),
            supported_version: version.to_string(),
        })
        .collect();

        Self { software, browsers }
    }
}

impl PlatformRecommendations {
    /// Drops rows with blank required fields. Fails when nothing usable is left.
    pub fn validated(self) -> Result<Self> {
        let software: Vec<_> = self
            .software
            .into_iter()
            .filter(|row| {
                !row.software.trim().is_empty() && !row.supported_version.trim().is_empty()
            })
            .collect();
        let browsers: Vec<_> = self
            .browsers
            .into_iter()
            .filter(|row| {
                !row.browser.trim().is_empty() && !row.supported_version.trim().is_empty()
            })
            .collect();

        if software.is_empty() && browsers.is_empty() {
            return Err(Error::InvalidRecommendations(
                "no valid software or browser rows".to_string(),
            ));
        }
        Ok(Self { software, browsers })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            Error::ConfigIo(format!(
                "failed to read recommendations '{}': {}",
                path.display(),
                err
            ))
        })?;
        let parsed: PlatformRecommendations = serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err)))?;
        let before = parsed.software.len() + parsed.browsers.len();
        let validated = parsed.validated()?;
        let dropped = before - validated.software.len() - validated.browsers.len();
        if dropped > 0 {
            warn!(dropped, "ignored invalid recommendation rows");
        }
        Ok(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let defaults = PlatformRecommendations::default();
        assert_eq!(defaults.software.len(), 10);
        assert_eq!(defaults.browsers.len(), 4);
        assert_eq!(defaults.clone().validated().expect("valid"), defaults);
    }

    #[test]
    fn blank_rows_are_dropped() {
        let parsed: PlatformRecommendations = serde_json::from_str(
            r#"{
                "software": [
                    { "software": "Nginx", "supportedVersion": "1.24+" },
                    { "software": " ", "supportedVersion": "1.0" }
                ],
                "browsers": [ { "browser": "", "supportedVersion": "1" } ]
            }"#,
        )
        .expect("parses");
        let validated = parsed.validated().expect("one row survives");
        assert_eq!(validated.software.len(), 1);
        assert!(validated.browsers.is_empty());
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let empty = PlatformRecommendations {
            software: Vec::new(),
            browsers: Vec::new(),
        };
        let err = empty.validated().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid recommendations: no valid software or browser rows"
        );
    }
}
