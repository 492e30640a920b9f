use reasonchat::{WidgetConfig, logging};

fn main() -> anyhow::Result<()> {
    let config = WidgetConfig::load()?;
    logging::init(&config.log_filter);
    tracing::info!(banner_ttl = ?config.banner_ttl, "launching chat widget");
    dioxus::LaunchBuilder::new()
        .with_context(config)
        .launch(reasonchat::ui::App);
    Ok(())
}
