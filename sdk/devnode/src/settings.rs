use {
  crate::{
    rpc::DEFAULT_UPLOAD_LIMIT,
    storage::{self, InMemoryProjectStore, OnDiskProjectStore, ProjectStore},
  },
  clap::Parser,
  crowdfund_client_sdk::{PinataCredentials, PINATA_PIN_FILE_ENDPOINT},
  humantime::Duration,
  std::{
    convert::Infallible,
    fmt::Debug,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    str::FromStr,
  },
  tracing::info,
};

/// A value that never shows up in logs.
#[derive(Clone)]
pub struct Secret(String);

impl FromStr for Secret {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(Self(s.to_owned()))
  }
}

impl Debug for Secret {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "<redacted>")
  }
}

/// Research Crowdfunding Local Devnode
///
/// A single node instance of the research escrow contract for local
/// use in dev, CI and test scenarios. Also proxies file pinning so
/// that pinning credentials stay on the server.
#[derive(Debug, Parser)]
pub struct SystemSettings {
  /// TCP port for accepting HTTP RPC requests
  #[clap(long, short,
    default_value = "8080",
    value_name = "PORT")]
  rpc_port: u16,

  /// IP addresses for accepting RPC connections
  #[clap(long, short,
    value_name = "ADDRESS",
    default_values_t = vec![IpAddr::V4(Ipv4Addr::LOCALHOST)])]
  ip: Vec<IpAddr>,

  /// Directory of the on-disk project store. Projects are kept
  /// in memory when omitted.
  #[clap(long, short, value_name = "PATH")]
  data_dir: Option<PathBuf>,

  /// Pinning service endpoint that uploads are forwarded to
  #[clap(long,
    value_name = "URL",
    default_value = PINATA_PIN_FILE_ENDPOINT)]
  pinning_upstream: String,

  /// Pinning service API key
  #[clap(long, env = "PINATA_API_KEY", hide_env_values = true)]
  pinata_api_key: Option<Secret>,

  /// Pinning service secret API key
  #[clap(long, env = "PINATA_SECRET_API_KEY", hide_env_values = true)]
  pinata_secret_api_key: Option<Secret>,

  /// Upper bound on a single forwarded upload
  #[clap(long,
    value_name = "DURATION",
    default_value = "60s")]
  pinning_timeout: Duration,

  /// Largest upload body accepted by the pinning proxy
  #[clap(long,
    value_name = "BYTES",
    default_value_t = DEFAULT_UPLOAD_LIMIT)]
  max_upload_size: usize,
}

impl SystemSettings {
  pub fn rpc_addrs(&self) -> Vec<SocketAddr> {
    self
      .ip
      .iter()
      .cloned()
      .map(|ip| SocketAddr::new(ip, self.rpc_port))
      .collect()
  }

  /// Get an instance of the project store, it can be either an in-memory
  /// ephemeral storage if no data directory is provided by cli or
  /// persistent on-disk store otherwise.
  pub fn storage(&self) -> Result<Box<dyn ProjectStore>, storage::Error> {
    Ok(match &self.data_dir {
      Some(path) => {
        info!("opening project store at {}", path.display());
        Box::new(OnDiskProjectStore::open(path)?)
      }
      None => {
        info!("using ephemeral in-memory project store");
        Box::new(InMemoryProjectStore::default())
      }
    })
  }

  pub fn pinning_upstream(&self) -> &str {
    &self.pinning_upstream
  }

  pub fn pinning_timeout(&self) -> std::time::Duration {
    self.pinning_timeout.into()
  }

  pub fn max_upload_size(&self) -> usize {
    self.max_upload_size
  }

  /// Both keys are needed for the pinning proxy to be enabled.
  pub fn pinata_credentials(&self) -> Option<PinataCredentials> {
    match (&self.pinata_api_key, &self.pinata_secret_api_key) {
      (Some(Secret(api_key)), Some(Secret(secret_api_key)))
        if !api_key.is_empty() && !secret_api_key.is_empty() =>
      {
        Some(PinataCredentials {
          api_key: api_key.clone(),
          secret_api_key: secret_api_key.clone(),
        })
      }
      _ => None,
    }
  }
}
