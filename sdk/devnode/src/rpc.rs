use {
  crate::escrow::{Error as EscrowError, Escrow},
  axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json,
    Router,
  },
  crowdfund_client_sdk::{
    ErrorBody,
    FileBlob,
    FileUploader,
    PinFileResponse,
    ProjectCount,
    UploadError,
  },
  crowdfund_primitives::{
    ProjectId,
    Receipt,
    ResearchProject,
    StartResearchCrowdfunding,
  },
  std::sync::Arc,
  thiserror::Error,
  time::OffsetDateTime,
  tracing::{error, warn},
};

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Research project {0} does not exist")]
  NotFound(ProjectId),

  #[error(transparent)]
  Escrow(#[from] EscrowError),

  #[error("Malformed upload: {0}")]
  MalformedUpload(String),

  #[error("Pinning proxy is not configured on this node")]
  PinningUnavailable,

  #[error("Pinning upstream failed: {0}")]
  Upstream(#[from] UploadError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Escrow(EscrowError::Storage(_)) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
      ApiError::Escrow(_) | ApiError::MalformedUpload(_) => {
        StatusCode::BAD_REQUEST
      }
      ApiError::PinningUnavailable => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
    };

    if status.is_server_error() {
      error!("{self}");
    } else {
      warn!("{self}");
    }

    let body = ErrorBody {
      error: self.to_string(),
    };
    (status, Json(body)).into_response()
  }
}

/// Largest request body the pinning proxy accepts unless configured
/// otherwise.
pub const DEFAULT_UPLOAD_LIMIT: usize = 100 * 1024 * 1024;

/// Everything the RPC handlers share.
pub struct AppState {
  escrow: Escrow,

  /// Uploader holding the pinning credentials, `None` when the node
  /// was started without them.
  pinning: Option<FileUploader>,

  /// Body limit of the pinning route in bytes.
  upload_limit: usize,
}

impl AppState {
  pub fn new(
    escrow: Escrow,
    pinning: Option<FileUploader>,
    upload_limit: usize,
  ) -> Self {
    Self {
      escrow,
      pinning,
      upload_limit,
    }
  }
}

pub fn router(state: Arc<AppState>) -> Router {
  // multipart bodies are otherwise capped at 2 MiB
  let pinning_route =
    post(pin_file).layer(DefaultBodyLimit::max(state.upload_limit));

  Router::new()
    .route("/escrow/nextProjectId", get(next_project_id))
    .route("/escrow/projects", post(start_research_crowdfunding))
    .route("/escrow/projects/:id", get(get_research_project))
    .route("/pinning/pinFileToIPFS", pinning_route)
    .with_state(state)
}

async fn next_project_id(
  State(state): State<Arc<AppState>>,
) -> Result<Json<ProjectCount>, ApiError> {
  Ok(Json(ProjectCount {
    next_project_id: state.escrow.next_project_id().await?,
  }))
}

async fn get_research_project(
  State(state): State<Arc<AppState>>,
  Path(id): Path<ProjectId>,
) -> Result<Json<ResearchProject>, ApiError> {
  state
    .escrow
    .get_research_project(id)
    .await?
    .map(Json)
    .ok_or(ApiError::NotFound(id))
}

async fn start_research_crowdfunding(
  State(state): State<Arc<AppState>>,
  Json(call): Json<StartResearchCrowdfunding>,
) -> Result<Json<Receipt>, ApiError> {
  let now = OffsetDateTime::now_utc().unix_timestamp().max(0) as u64;
  Ok(Json(
    state.escrow.start_research_crowdfunding(call, now).await?,
  ))
}

/// Accepts the same multipart body as the pinning service and
/// forwards it upstream with this node's credentials.
async fn pin_file(
  State(state): State<Arc<AppState>>,
  mut multipart: Multipart,
) -> Result<Json<PinFileResponse>, ApiError> {
  let uploader = state
    .pinning
    .as_ref()
    .ok_or(ApiError::PinningUnavailable)?;

  let mut file = None;
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::MalformedUpload(e.to_string()))?
  {
    if field.name() == Some("file") {
      let name = field.file_name().unwrap_or("file").to_owned();
      let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::MalformedUpload(e.to_string()))?;
      file = Some(FileBlob::new(name, bytes.to_vec()));
    }
  }

  let file =
    file.ok_or_else(|| ApiError::MalformedUpload("missing file field".into()))?;
  Ok(Json(uploader.pin(file).await?))
}
