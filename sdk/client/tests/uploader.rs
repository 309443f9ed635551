mod common;

use {
  axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json,
    Router,
  },
  common::serve,
  crowdfund_client_sdk::{
    FileBlob,
    FileUploader,
    PinataCredentials,
    UploadError,
    UploaderConfig,
    API_KEY_HEADER,
    SECRET_API_KEY_HEADER,
  },
  serde_json::json,
  std::{
    net::SocketAddr,
    sync::{
      atomic::{AtomicUsize, Ordering},
      Arc,
    },
  },
};

#[derive(Default)]
struct FakePinata {
  hits: AtomicUsize,
}

async fn pin_file(
  State(pinata): State<Arc<FakePinata>>,
  headers: HeaderMap,
  mut multipart: Multipart,
) -> Response {
  pinata.hits.fetch_add(1, Ordering::SeqCst);

  let header = |name: &str| headers.get(name).map(|v| v.as_bytes().to_vec());
  if header(API_KEY_HEADER).as_deref() != Some(b"key".as_slice())
    || header(SECRET_API_KEY_HEADER).as_deref() != Some(b"secret".as_slice())
  {
    return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response();
  }

  let mut file = None;
  while let Ok(Some(field)) = multipart.next_field().await {
    if field.name() == Some("file") {
      let name = field.file_name().map(str::to_owned);
      let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
      file = Some((name, bytes));
    }
  }

  match file {
    Some((Some(name), bytes)) if name == "paper.pdf" && bytes == b"%PDF-1.7" => {
      Json(json!({
        "IpfsHash": "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG",
        "PinSize": 8,
        "Timestamp": "2025-01-01T00:00:00.000Z"
      }))
      .into_response()
    }
    _ => StatusCode::BAD_REQUEST.into_response(),
  }
}

async fn start_pinata() -> anyhow::Result<(SocketAddr, Arc<FakePinata>)> {
  let pinata = Arc::new(FakePinata::default());
  let router = Router::new()
    .route("/pinning/pinFileToIPFS", post(pin_file))
    .with_state(pinata.clone());
  Ok((serve(router).await?, pinata))
}

fn uploader(addr: SocketAddr, secret: &str) -> anyhow::Result<FileUploader> {
  Ok(FileUploader::new(UploaderConfig {
    endpoint: format!("http://{addr}/pinning/pinFileToIPFS"),
    credentials: Some(PinataCredentials {
      api_key: "key".into(),
      secret_api_key: secret.into(),
    }),
    ..Default::default()
  })?)
}

fn paper() -> FileBlob {
  FileBlob::new("paper.pdf", b"%PDF-1.7".to_vec())
}

#[tokio::test]
async fn upload_returns_gateway_url() -> anyhow::Result<()> {
  let (addr, pinata) = start_pinata().await?;
  let url = uploader(addr, "secret")?.upload(Some(paper())).await;

  assert_eq!(
    url.as_deref(),
    Some("https://ipfs.io/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG")
  );
  assert!(url.unwrap().starts_with("https://ipfs.io/ipfs/"));
  assert_eq!(pinata.hits.load(Ordering::SeqCst), 1);
  Ok(())
}

#[tokio::test]
async fn no_file_means_no_request() -> anyhow::Result<()> {
  let (addr, pinata) = start_pinata().await?;
  assert_eq!(uploader(addr, "secret")?.upload(None).await, None);
  assert_eq!(pinata.hits.load(Ordering::SeqCst), 0);
  Ok(())
}

#[tokio::test]
async fn service_errors_produce_no_result() -> anyhow::Result<()> {
  let (addr, _) = start_pinata().await?;
  let uploader = uploader(addr, "wrong")?;

  assert_eq!(uploader.upload(Some(paper())).await, None);
  assert!(matches!(
    uploader.try_upload(paper()).await,
    Err(UploadError::Service { status: 401, .. })
  ));
  Ok(())
}

#[tokio::test]
async fn unreachable_service_produces_no_result() -> anyhow::Result<()> {
  let uploader = FileUploader::new(UploaderConfig {
    endpoint: "http://127.0.0.1:9/pinning/pinFileToIPFS".into(),
    ..Default::default()
  })?;

  assert_eq!(uploader.upload(Some(paper())).await, None);
  assert!(matches!(
    uploader.try_upload(paper()).await,
    Err(UploadError::Transport(_))
  ));
  Ok(())
}

#[tokio::test]
async fn reads_blob_from_disk() -> anyhow::Result<()> {
  let path = std::env::temp_dir().join("crowdfund-uploader-paper.pdf");
  tokio::fs::write(&path, b"%PDF-1.7").await?;

  let blob = FileBlob::read(&path).await?;
  assert_eq!(blob.name, "crowdfund-uploader-paper.pdf");
  assert_eq!(blob.bytes, b"%PDF-1.7");

  tokio::fs::remove_file(&path).await?;
  Ok(())
}

#[test]
fn debug_output_hides_secret() {
  let credentials = PinataCredentials {
    api_key: "key".into(),
    secret_api_key: "super-secret".into(),
  };
  let printed = format!("{credentials:?}");
  assert!(printed.contains("key"));
  assert!(!printed.contains("super-secret"));
}
