use {
  reqwest::multipart::{Form, Part},
  serde::{Deserialize, Serialize},
  std::{fmt::Debug, path::Path, time::Duration},
  thiserror::Error,
  tracing::{error, info},
};

pub const PINATA_PIN_FILE_ENDPOINT: &str =
  "https://api.pinata.cloud/pinning/pinFileToIPFS";

pub const IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

pub const API_KEY_HEADER: &str = "pinata_api_key";
pub const SECRET_API_KEY_HEADER: &str = "pinata_secret_api_key";

#[derive(Debug, Error)]
pub enum Error {
  #[error("Upload transport failure: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Pinning service responded with {status}: {body}")]
  Service { status: u16, body: String },

  #[error("Pinning service response carries no content hash")]
  MissingHash,
}

/// Pinning service API credentials.
///
/// These are secrets. Prefer keeping them on a server-side proxy
/// (the devnode pinning route) and leave clients without any.
#[derive(Clone, PartialEq, Eq)]
pub struct PinataCredentials {
  pub api_key: String,
  pub secret_api_key: String,
}

impl PinataCredentials {
  /// Reads `PINATA_API_KEY` and `PINATA_SECRET_API_KEY`.
  /// Both must be set and non-empty.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("PINATA_API_KEY").ok()?;
    let secret_api_key = std::env::var("PINATA_SECRET_API_KEY").ok()?;
    if api_key.is_empty() || secret_api_key.is_empty() {
      return None;
    }
    Some(Self {
      api_key,
      secret_api_key,
    })
  }
}

impl Debug for PinataCredentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PinataCredentials")
      .field("api_key", &self.api_key)
      .field("secret_api_key", &"<redacted>")
      .finish()
  }
}

/// Response of `pinFileToIPFS`. Only the hash is of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinFileResponse {
  #[serde(rename = "IpfsHash", default)]
  pub ipfs_hash: String,
}

#[derive(Debug, Clone)]
pub struct Config {
  /// Multipart endpoint accepting a `file` field.
  pub endpoint: String,

  /// Prefix the content hash is appended to.
  pub gateway: String,

  /// Sent as `pinata_api_key` / `pinata_secret_api_key` headers when set.
  pub credentials: Option<PinataCredentials>,

  /// Upper bound on the whole upload request.
  pub timeout: Duration,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      endpoint: PINATA_PIN_FILE_ENDPOINT.into(),
      gateway: IPFS_GATEWAY.into(),
      credentials: None,
      timeout: Duration::from_secs(60),
    }
  }
}

/// In-memory file contents along with the name sent to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
  pub name: String,
  pub bytes: Vec<u8>,
}

impl FileBlob {
  pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
    Self {
      name: name.into(),
      bytes: bytes.into(),
    }
  }

  pub async fn read(path: impl AsRef<Path>) -> std::io::Result<Self> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| "file".into());
    Ok(Self { name, bytes })
  }
}

/// Pins files on a content addressed store and hands back the
/// gateway URL they can be retrieved from.
#[derive(Debug, Clone)]
pub struct FileUploader {
  http: reqwest::Client,
  config: Config,
}

impl FileUploader {
  pub fn new(config: Config) -> Result<Self, Error> {
    Ok(Self {
      http: reqwest::Client::builder().timeout(config.timeout).build()?,
      config,
    })
  }

  /// Uploads `file` and returns its retrieval URL.
  ///
  /// No file means no request and no result. Failures are logged
  /// and also produce no result, callers must treat `None` as
  /// "nothing was pinned".
  pub async fn upload(&self, file: Option<FileBlob>) -> Option<String> {
    let file = file?;
    match self.try_upload(file).await {
      Ok(url) => {
        info!("{url}");
        Some(url)
      }
      Err(e) => {
        error!("Error uploading file: {e}");
        None
      }
    }
  }

  /// Like [`FileUploader::upload`] but surfaces the failure.
  pub async fn try_upload(&self, file: FileBlob) -> Result<String, Error> {
    let pinned = self.pin(file).await?;
    Ok(format!(
      "{}/{}",
      self.config.gateway.trim_end_matches('/'),
      pinned.ipfs_hash
    ))
  }

  /// Posts `file` to the pinning endpoint and returns the service
  /// response as is.
  pub async fn pin(&self, file: FileBlob) -> Result<PinFileResponse, Error> {
    let form =
      Form::new().part("file", Part::bytes(file.bytes).file_name(file.name));

    let mut request = self.http.post(&self.config.endpoint).multipart(form);
    if let Some(credentials) = &self.config.credentials {
      request = request
        .header(API_KEY_HEADER, credentials.api_key.as_str())
        .header(SECRET_API_KEY_HEADER, credentials.secret_api_key.as_str());
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(Error::Service {
        status: status.as_u16(),
        body,
      });
    }

    let pinned: PinFileResponse = response.json().await?;
    if pinned.ipfs_hash.is_empty() {
      return Err(Error::MissingHash);
    }

    Ok(pinned)
  }
}
