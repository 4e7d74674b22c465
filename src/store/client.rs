use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Database,
};
use tracing::{info, instrument};

/// Opens the long-lived store client and returns a handle to the configured database.
/// The client pools its connections internally; clones of the returned handle share them.
#[instrument(skip(uri))]
pub async fn connect(uri: &str, database_name: &str) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(uri).await?;
    options.app_name = Some("pethaven".to_string());
    options.server_api = Some(
        ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build(),
    );

    let client = Client::with_options(options)?;
    let database = client.database(database_name);

    database.run_command(doc! { "ping": 1 }, None).await?;
    info!("Connected to document store");

    Ok(database)
}
