use settings::Settings;

use crate::comfort::ComfortModule;

mod comfort;
mod core;
mod floor_plan;
mod settings;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    settings.monitoring.init().expect("Error initializing monitoring");

    let db_pool = settings
        .database
        .new_pool()
        .await
        .expect("Error initializing database");

    let comfort = ComfortModule::new(db_pool, settings.comfort.default_window);

    tracing::info!(
        "Starting HTTP server with a default window of {}",
        settings.comfort.default_window
    );

    settings
        .http_server
        .run_server(move || comfort.routes())
        .await
        .expect("HTTP server execution failed");
}
