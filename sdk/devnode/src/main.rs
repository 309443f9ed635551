use {
  crate::{escrow::Escrow, rpc::AppState, settings::SystemSettings},
  clap::Parser,
  crowdfund_client_sdk::{FileUploader, UploaderConfig},
  futures::future::try_join_all,
  std::sync::Arc,
  tracing::{info, subscriber::set_global_default, warn},
  tracing_subscriber::FmtSubscriber,
};

mod escrow;
mod rpc;
mod settings;
mod storage;

/// The pinning proxy is only served when the node holds credentials.
fn pinning_proxy(
  settings: &SystemSettings,
) -> anyhow::Result<Option<FileUploader>> {
  let Some(credentials) = settings.pinata_credentials() else {
    warn!("no pinning credentials provided, file uploads are disabled");
    return Ok(None);
  };

  info!("forwarding file uploads to {}", settings.pinning_upstream());
  Ok(Some(FileUploader::new(UploaderConfig {
    endpoint: settings.pinning_upstream().to_owned(),
    credentials: Some(credentials),
    timeout: settings.pinning_timeout(),
    ..Default::default()
  })?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // configure logging
  set_global_default(FmtSubscriber::new())?;

  // gather CLI parameters
  let settings = SystemSettings::parse();
  info!("startup settings: {settings:#?}");

  let escrow = Escrow::new(settings.storage()?);
  let state = Arc::new(AppState::new(
    escrow,
    pinning_proxy(&settings)?,
    settings.max_upload_size(),
  ));

  let mut servers = vec![];
  for addr in settings.rpc_addrs() {
    let server = axum::Server::try_bind(&addr)?
      .serve(rpc::router(Arc::clone(&state)).into_make_service());
    info!("serving rpc on http://{}", server.local_addr());
    servers.push(server);
  }

  try_join_all(servers).await?;
  Ok(())
}
