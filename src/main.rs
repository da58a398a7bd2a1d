#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use storefront_shell::{app, config::ShellSettings};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let settings = ShellSettings::default();
    tracing::info!(
        remote_config_url = %settings.remote_config_url,
        health_url = %settings.health_url,
        "starting storefront shell"
    );

    app::run_app(settings)
}
