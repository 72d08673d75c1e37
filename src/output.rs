use std::fmt::Write;

use crate::recommendations::PlatformRecommendations;
use crate::report::CalculationResult;
use crate::server::ServerSpec;

pub trait Formatter {
    fn write(&self, result: &CalculationResult) -> String;
}

/// Server cards with metrics and advisories.
pub struct HumanFormatter;

/// Compact text meant for pasting into an email or chat.
pub struct SummaryFormatter;

pub struct JsonFormatter;

pub struct CsvFormatter;

impl Formatter for HumanFormatter {
    fn write(&self, result: &CalculationResult) -> String {
        let mut out = String::new();
        if !result.client_name.is_empty() {
            let _ = writeln!(out, "Client: {}", result.client_name);
        }
        let _ = writeln!(out, "Environment: {}", result.environment);
        let _ = writeln!(out, "Deployment: {}", result.deployment);
        let _ = writeln!(out, "Industry: {}", result.industry);

        let metrics = &result.metrics;
        out.push_str("Metrics:\n");
        let _ = writeln!(out, "crm_active_users: {}", metrics.crm.active_users);
        let _ = writeln!(out, "crm_triggers_per_second: {}", metrics.crm.triggers_per_second);
        let _ = writeln!(out, "marketing_active_users: {}", metrics.marketing.active_users);
        let _ = writeln!(
            out,
            "marketing_triggers_per_second: {}",
            metrics.marketing.triggers_per_second
        );
        let _ = writeln!(out, "bot_requests_per_minute: {}", metrics.bot.requests_per_minute);
        let _ = writeln!(out, "bot_tokens_per_minute: {}", metrics.bot.tokens_per_minute);

        if let Some(message) = &result.managed_message {
            let _ = writeln!(out, "Note: {}", message);
            return out;
        }

        let _ = writeln!(out, "Servers ({}):", result.node_count());
        for server in &result.servers {
            write_card(&mut out, server);
        }

        if let Some(cost) = &result.cloud_cost {
            let _ = writeln!(
                out,
                "Cloud cost: ${:.2}/month ({} TPM, {})",
                cost.monthly_cost_usd, cost.tokens_per_minute, cost.provider
            );
        }
        if let Some(message) = &result.dr_message {
            let _ = writeln!(out, "DR: {}", message);
        }
        out
    }
}

fn write_card(out: &mut String, server: &ServerSpec) {
    let _ = writeln!(out, "{}", server.name);
    if let Some(specification) = &server.specification {
        let _ = writeln!(out, "  specification: {}", specification);
    }
    let _ = writeln!(out, "  cpu: {}", server.cpu);
    let _ = writeln!(out, "  ram: {}", server.ram);
    let _ = writeln!(out, "  storage: {}", server.storage);
    let _ = writeln!(out, "  os: {}", server.os);
    let _ = writeln!(out, "  load: {}", server.load_tier);
    let _ = writeln!(out, "  zone: {}", server.zone);
    if let Some(accelerator) = &server.accelerator {
        let _ = writeln!(out, "  accelerator: {}", accelerator);
    }
    if let Some(notes) = &server.notes {
        let _ = writeln!(out, "  notes: {}", notes);
    }
}

impl Formatter for SummaryFormatter {
    fn write(&self, result: &CalculationResult) -> String {
        let mut blocks = Vec::new();
        if !result.client_name.is_empty() {
            blocks.push(format!("Client: {}", result.client_name));
        }
        blocks.push(format!("Deployment: {}", result.deployment));

        match &result.managed_message {
            Some(message) => blocks.push(message.clone()),
            None => {
                for server in &result.servers {
                    blocks.push(format!(
                        "{}\n{} | {} | {}",
                        server.name, server.cpu, server.ram, server.storage
                    ));
                }
                if let Some(cost) = &result.cloud_cost {
                    blocks.push(format!(
                        "AI Cloud: ${:.2}/mo ({} TPM)",
                        cost.monthly_cost_usd, cost.tokens_per_minute
                    ));
                }
            }
        }

        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }
}

impl Formatter for JsonFormatter {
    fn write(&self, result: &CalculationResult) -> String {
        match serde_json::to_string_pretty(result) {
            Ok(mut json) => {
                json.push('\n');
                json
            }
            Err(err) => format!("{{\"error\": \"{}\"}}\n", err),
        }
    }
}

const CSV_HEADERS: [&str; 9] = [
    "Server Node",
    "Specification",
    "CPU",
    "RAM",
    "Storage",
    "OS",
    "Load Tier",
    "Network Zone",
    "Accelerator",
];

impl Formatter for CsvFormatter {
    fn write(&self, result: &CalculationResult) -> String {
        let mut out = CSV_HEADERS.join(",");
        out.push('\n');
        for server in &result.servers {
            let accelerator = server
                .accelerator
                .as_ref()
                .map(|accelerator| accelerator.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let row = [
                quote(&server.name),
                quote(server.specification.as_deref().unwrap_or("")),
                quote(&server.cpu),
                quote(&server.ram),
                quote(&server.storage),
                quote(&server.os),
                server.load_tier.to_string(),
                server.zone.to_string(),
                quote(&accelerator),
            ];
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Renders several results (one per environment) as consecutive sections.
pub fn write_sections(formatter: &dyn Formatter, results: &[CalculationResult]) -> String {
    let mut out = String::new();
    for (idx, result) in results.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "== {} ==", result.environment);
        out.push_str(&formatter.write(result));
    }
    out
}

pub fn write_recommendations(recommendations: &PlatformRecommendations) -> String {
    let mut out = String::from("Software:\n");
    for row in &recommendations.software {
        let _ = write!(out, "{}: {}", row.software, row.supported_version);
        if !row.component_hosted.is_empty() {
            let _ = write!(out, " [{}]", row.component_hosted);
        }
        if !row.comments.is_empty() {
            let _ = write!(out, " - {}", row.comments);
        }
        out.push('\n');
    }
    out.push_str("Browsers:\n");
    for row in &recommendations.browsers {
        let _ = writeln!(out, "{}: {}", row.browser, row.supported_version);
    }
    out
}
