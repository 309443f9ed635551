use {
  clap::{Parser, Subcommand},
  crowdfund_client_sdk::IPFS_GATEWAY,
  std::path::PathBuf,
};

/// Research Crowdfunding client
///
/// Lists and creates research projects on the escrow contract exposed
/// by a devnode, and pins supporting files.
#[derive(Debug, Parser)]
pub struct CliOptions {
  /// Base url of the devnode RPC
  #[clap(long,
    env = "CROWDFUND_RPC",
    value_name = "URL",
    default_value = "http://127.0.0.1:8080")]
  pub rpc: String,

  /// Upper bound on every single request
  #[clap(long, value_name = "DURATION", default_value = "10s")]
  timeout: humantime::Duration,

  #[clap(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Print all research projects
  List {
    /// Keep running and reprint whenever the project count changes
    #[clap(long)]
    watch: bool,

    /// How often the project count is polled in watch mode
    #[clap(long,
      value_name = "DURATION",
      default_value = "5s",
      value_parser = parse_poll_period)]
    poll: humantime::Duration,
  },

  /// Start crowdfunding for a new research project
  Create {
    #[clap(long)]
    title: String,

    #[clap(long, default_value = "")]
    description: String,

    /// Funding goal, e.g. "1.5 ETH"
    #[clap(long)]
    amount: String,

    /// Closing date as YYYY-MM-DD or an RFC 3339 timestamp
    #[clap(long)]
    deadline: String,

    /// Send the description along with the write call
    #[clap(long)]
    forward_description: bool,
  },

  /// Pin a file and print the url it can be retrieved from
  Upload {
    path: PathBuf,

    /// Defaults to the pinning proxy of the devnode
    #[clap(long, value_name = "URL")]
    pinning_endpoint: Option<String>,

    #[clap(long, value_name = "URL", default_value = IPFS_GATEWAY)]
    gateway: String,
  },
}

fn parse_poll_period(value: &str) -> Result<humantime::Duration, String> {
  let period: humantime::Duration =
    value.parse().map_err(|e| format!("{e}"))?;
  if period.is_zero() {
    return Err("poll period must be greater than zero".into());
  }
  Ok(period)
}

impl CliOptions {
  pub fn timeout(&self) -> std::time::Duration {
    self.timeout.into()
  }

  /// Explicit endpoint if given, otherwise the devnode proxy that
  /// holds the pinning credentials.
  pub fn pinning_endpoint(&self, explicit: Option<&str>) -> String {
    match explicit {
      Some(endpoint) => endpoint.to_owned(),
      None => format!(
        "{}/pinning/pinFileToIPFS",
        self.rpc.trim_end_matches('/')
      ),
    }
  }
}
