use tradeboard_messaging::api;
use tradeboard_messaging::common::init;
use tradeboard_messaging::settings::AppSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::get();
    init::initialize_logging(settings);
    match settings.app_component.as_str() {
        "api" => api::serve(settings).await,
        component => anyhow::bail!("Unknown app component: {component}"),
    }
}
