//! Host port bookkeeping.

use std::collections::BTreeSet;

use kitgen_core::{Error, Result};
use serde_yaml::Value;

use crate::manifest::{ComposeManifest, PortSpec};

/// Host ports bound by one `ports:` item.
///
/// Short syntax is `[ip:][host:]container[/proto]` where host may be a
/// range; without a host part, or with an empty one, nothing is bound on the
/// host. Unparsable values (e.g. `${PORT}:80`) bind nothing.
pub fn host_ports(spec: &PortSpec) -> Vec<u16> {
    match spec {
        PortSpec::Number(_) => Vec::new(),
        PortSpec::Short(s) => {
            let s = s.split('/').next().unwrap_or(s);
            match s.rsplit_once(':') {
                None => Vec::new(),
                Some((left, _container)) => {
                    let host = left.rsplit_once(':').map_or(left, |(_, host)| host);
                    parse_port_range(host)
                }
            }
        }
        PortSpec::Long(map) => match map.get("published") {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|p| u16::try_from(p).ok())
                .into_iter()
                .collect(),
            Some(Value::String(s)) => parse_port_range(s),
            _ => Vec::new(),
        },
    }
}

fn parse_port_range(s: &str) -> Vec<u16> {
    let s = s.trim();
    let parsed = match s.split_once('-') {
        Some((start, end)) => start
            .parse::<u16>()
            .ok()
            .zip(end.parse::<u16>().ok())
            .filter(|(start, end)| start <= end)
            .map(|(start, end)| (start..=end).collect()),
        None => s.parse::<u16>().ok().map(|p| vec![p]),
    };
    parsed.unwrap_or_else(|| {
        if !s.is_empty() {
            tracing::debug!(value = s, "ignoring unparsable host port");
        }
        Vec::new()
    })
}

/// Hands out host ports that no manifest entry binds yet.
#[derive(Debug, Clone)]
pub struct PortAllocator {
    claimed: BTreeSet<u16>,
    base: u16,
    window: u16,
}

impl PortAllocator {
    /// Probe `window` ports starting at `base`.
    pub fn new(base: u16, window: u16) -> Self {
        Self {
            claimed: BTreeSet::new(),
            base,
            window,
        }
    }

    /// Start with every host port already bound in `manifest` claimed,
    /// including ports an entry inherits through a `<<` merge key.
    pub fn from_manifest(manifest: &ComposeManifest, base: u16, window: u16) -> Self {
        let mut allocator = Self::new(base, window);
        for entry in manifest.services.values() {
            for spec in entry.effective_ports() {
                for port in host_ports(&spec) {
                    allocator.claim(port);
                }
            }
        }
        allocator
    }

    /// Mark `port` as taken. Returns false if it already was.
    pub fn claim(&mut self, port: u16) -> bool {
        self.claimed.insert(port)
    }

    pub fn is_claimed(&self, port: u16) -> bool {
        self.claimed.contains(&port)
    }

    /// Claim and return the lowest free port in the window.
    pub fn claim_next(&mut self, service: &str) -> Result<u16> {
        let last = self.last();
        let port = (self.base..=last)
            .find(|p| !self.claimed.contains(p))
            .ok_or_else(|| {
                Box::new(Error::ResourceExhausted {
                    service: service.to_string(),
                    first: self.base,
                    last,
                })
            })?;
        self.claimed.insert(port);
        Ok(port)
    }

    fn last(&self) -> u16 {
        self.base.saturating_add(self.window.saturating_sub(1))
    }
}
