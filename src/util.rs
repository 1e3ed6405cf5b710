use std::net::Ipv4Addr;

const AGENT_PORT: &str = "AGENT_PORT";

const DEFAULT_PORT: u16 = 4000;

pub fn get_default_port() -> u16 {
    DEFAULT_PORT
}

pub fn get_port() -> u16 {
    let port_from_env = std::env::var(AGENT_PORT);
    port_from_env.map_or(DEFAULT_PORT, |res| res.parse().unwrap_or(DEFAULT_PORT))
}

const AGENT_ADDR: &str = "AGENT_ADDR";

const DEFAULT_ADDR: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

pub fn get_addr() -> Ipv4Addr {
    let addr_from_env = std::env::var(AGENT_ADDR);
    addr_from_env.map_or(DEFAULT_ADDR, |res| res.parse().unwrap_or(DEFAULT_ADDR))
}

const AGENT_KEY: &str = "AGENT_KEY";

pub fn get_api_key() -> Option<String> {
    let key_from_env = std::env::var(AGENT_KEY);
    key_from_env.ok()
}

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Convert raw bytes to gigabytes, rounded to two decimals for display.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_GB * 100.0).round() / 100.0
}

/// Usage as a percentage of total, rounded to one decimal.
///
/// Returns `None` when the total is zero so callers never divide by it.
pub fn usage_percent(used: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some((used as f64 / total as f64 * 1000.0).round() / 10.0)
}
