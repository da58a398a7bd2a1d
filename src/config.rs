use std::time::Duration;

const DEFAULT_REMOTE_CONFIG_URL: &str = "https://config.storefront.example/v1/remote-config";
const DEFAULT_REMOTE_CONFIG_KEY: &str = "webview_url";
const DEFAULT_HEALTH_URL: &str = "https://config.storefront.example/health";
const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 4000;
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 800;
const DEFAULT_SURFACE_LOAD_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone)]
pub struct ShellSettings {
    pub remote_config_url: String,
    pub remote_config_key: String,
    pub health_url: String,
    pub remote_timeout: Duration,
    pub probe_timeout: Duration,
    pub surface_load_timeout: Duration,
}

impl Default for ShellSettings {
    fn default() -> Self {
        // NOTE: endpoints are build/deploy specific; keep real hosts out of the repo.
        Self {
            remote_config_url: string_setting(
                "STOREFRONT_REMOTE_CONFIG_URL",
                option_env!("STOREFRONT_REMOTE_CONFIG_URL"),
                DEFAULT_REMOTE_CONFIG_URL,
            ),
            remote_config_key: string_setting(
                "STOREFRONT_REMOTE_CONFIG_KEY",
                option_env!("STOREFRONT_REMOTE_CONFIG_KEY"),
                DEFAULT_REMOTE_CONFIG_KEY,
            ),
            health_url: string_setting(
                "STOREFRONT_HEALTH_URL",
                option_env!("STOREFRONT_HEALTH_URL"),
                DEFAULT_HEALTH_URL,
            ),
            remote_timeout: millis_setting("STOREFRONT_REMOTE_TIMEOUT_MS", DEFAULT_REMOTE_TIMEOUT_MS),
            probe_timeout: millis_setting("STOREFRONT_PROBE_TIMEOUT_MS", DEFAULT_PROBE_TIMEOUT_MS),
            surface_load_timeout: millis_setting(
                "STOREFRONT_SURFACE_LOAD_TIMEOUT_MS",
                DEFAULT_SURFACE_LOAD_TIMEOUT_MS,
            ),
        }
    }
}

fn string_setting(var: &str, baked: Option<&'static str>, default: &str) -> String {
    pick_string(std::env::var(var).ok(), baked, default)
}

fn pick_string(runtime: Option<String>, baked: Option<&str>, default: &str) -> String {
    runtime
        .filter(|v| !v.trim().is_empty())
        .or_else(|| baked.filter(|v| !v.trim().is_empty()).map(|v| v.to_string()))
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| default.to_string())
}

fn millis_setting(var: &str, default_ms: u64) -> Duration {
    Duration::from_millis(parse_millis(var, std::env::var(var).ok(), default_ms))
}

fn parse_millis(var: &str, raw: Option<String>, default_ms: u64) -> u64 {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return default_ms;
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => ms,
        _ => {
            tracing::warn!(var, value = %raw, default_ms, "invalid duration setting; using default");
            default_ms
        }
    }
}
