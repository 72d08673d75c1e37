//! Structural post-processing of the assembled server list.
//!
//! Stages run in a fixed order and each consumes the whole list produced by
//! the previous one: split, HA duplication, DR advisory, node labels.

use tracing::debug;

use crate::models::Environment;
use crate::server::{Origin, Role, ServerSpec};

#[derive(Clone, Copy, Debug)]
pub struct PipelineContext {
    pub environment: Environment,
    pub ha_enabled: bool,
    pub dr_enabled: bool,
    pub crm_active_users: u32,
    pub ha_uat_user_threshold: u32,
}

#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub servers: Vec<ServerSpec>,
    pub dr_message: Option<String>,
}

pub fn run(servers: Vec<ServerSpec>, ctx: &PipelineContext) -> PipelineOutput {
    let servers = split_combined(servers, ctx.environment);
    let servers = duplicate_for_ha(servers, ctx);
    let dr_message = dr_advisory(ctx);
    let servers = label_nodes(servers);
    debug!(nodes = servers.len(), "pipeline finished");
    PipelineOutput {
        servers,
        dr_message,
    }
}

/// Replaces every combined application+database unit with two servers.
pub fn split_combined(servers: Vec<ServerSpec>, environment: Environment) -> Vec<ServerSpec> {
    let mut out = Vec::with_capacity(servers.len() + 1);
    for server in servers {
        if server.role != Role::CombinedAppDb {
            out.push(server);
            continue;
        }
        let owner = origin_label(server.origin);
        out.push(server.derive(
            format!("{}-app", server.id),
            format!("{} APP Server ({})", environment, owner),
            Role::AppServer,
        ));
        out.push(server.derive(
            format!("{}-db", server.id),
            format!("{} DB Server ({})", environment, owner),
            Role::DbServer,
        ));
    }
    out
}

pub fn ha_applies(ctx: &PipelineContext) -> bool {
    if !ctx.ha_enabled {
        return false;
    }
    match ctx.environment {
        Environment::Prod => true,
        Environment::Uat => ctx.crm_active_users > ctx.ha_uat_user_threshold,
        Environment::Dev => false,
    }
}

fn ha_eligible(server: &ServerSpec) -> bool {
    server.origin == Origin::Crm && matches!(server.role, Role::AppServer | Role::DbServer)
}

/// Turns each CRM application/database server into a two-node pair.
pub fn duplicate_for_ha(servers: Vec<ServerSpec>, ctx: &PipelineContext) -> Vec<ServerSpec> {
    if !ha_applies(ctx) {
        return servers;
    }
    let mut out = Vec::with_capacity(servers.len() * 2);
    for server in servers {
        if !ha_eligible(&server) {
            out.push(server);
            continue;
        }
        for node in 1..=2 {
            let mut copy = server.derive(
                format!("{}-{}", server.id, node),
                format!("{} {}", server.name, node),
                server.role,
            );
            copy.notes = Some("High availability pair".to_string());
            out.push(copy);
        }
    }
    out
}

/// Disaster recovery is advisory only; the server list is left alone.
pub fn dr_advisory(ctx: &PipelineContext) -> Option<String> {
    if ctx.dr_enabled && ctx.environment == Environment::Prod {
        Some(
            "Disaster recovery requested: provision a secondary site mirroring the PROD \
             servers listed here."
                .to_string(),
        )
    } else {
        None
    }
}

/// Appends a 1-based "(Node N)" suffix in final list order.
pub fn label_nodes(servers: Vec<ServerSpec>) -> Vec<ServerSpec> {
    servers
        .into_iter()
        .enumerate()
        .map(|(idx, mut server)| {
            server.name = format!("{} (Node {})", server.name, idx + 1);
            server
        })
        .collect()
}

fn origin_label(origin: Origin) -> &'static str {
    match origin {
        Origin::Crm => "CRM",
        Origin::Marketing => "Marketing",
        Origin::Assistant => "AI",
        Origin::Analytics => "Analytics",
        Origin::Messaging => "Messaging",
        Origin::Shared => "Shared",
    }
}
