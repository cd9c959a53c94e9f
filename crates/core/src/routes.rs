// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routing info: opaque per-router payloads keyed by router name.
//!
//! The reconciler owns exactly one key ([`HTTP_ROUTER_KEY`]). Every other
//! key belongs to some other router and must survive updates verbatim.

use crate::app::HttpRoute;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Router key owned by this system. Only this entry is ever rewritten.
pub const HTTP_ROUTER_KEY: &str = "cf-router";

/// Map from router name to that router's opaque payload.
pub type RoutingInfo = HashMap<String, serde_json::Value>;

/// One entry of the owned HTTP-router payload: a set of hostnames bound to a
/// single container port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfRoute {
    pub hostnames: Vec<String>,
    pub port: u16,
}

impl CfRoute {
    /// Convert catalog routes into the owned payload at the given default
    /// ports.
    ///
    /// Routes with an explicit port bind only there; routes without one bind
    /// to every default port. Hostnames are grouped per port, preserving the
    /// order routes arrive in.
    pub fn from_catalog_routes(routes: &[HttpRoute], default_ports: &[u16]) -> Vec<CfRoute> {
        let mut ports_seen: Vec<u16> = Vec::new();
        let mut by_port: HashMap<u16, Vec<String>> = HashMap::new();

        let mut bind = |port: u16, hostname: &str| {
            let hostnames = by_port.entry(port).or_default();
            if !hostnames.iter().any(|h| h == hostname) {
                hostnames.push(hostname.to_string());
            }
            if !ports_seen.contains(&port) {
                ports_seen.push(port);
            }
        };

        for route in routes {
            match route.port {
                Some(port) => bind(port, &route.hostname),
                None => {
                    for port in default_ports {
                        bind(*port, &route.hostname);
                    }
                }
            }
        }

        ports_seen
            .into_iter()
            .map(|port| CfRoute { hostnames: by_port.remove(&port).unwrap_or_default(), port })
            .collect()
    }

    /// Render a route set as the owned routing-info entry.
    pub fn routing_info(routes: &[CfRoute]) -> RoutingInfo {
        let mut info = RoutingInfo::new();
        info.insert(
            HTTP_ROUTER_KEY.to_string(),
            serde_json::to_value(routes).unwrap_or(serde_json::Value::Null),
        );
        info
    }
}

/// Overlay the existing routing info onto a freshly built one, preserving
/// every router key except the one this system owns.
pub fn merge_routing_info(fresh: RoutingInfo, existing: &RoutingInfo) -> RoutingInfo {
    let mut merged = fresh;
    for (key, payload) in existing {
        if key != HTTP_ROUTER_KEY {
            merged.insert(key.clone(), payload.clone());
        }
    }
    merged
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
