mod contract;
mod http;
mod loader;
mod modal;
mod submitter;
mod uploader;
mod watcher;

pub use {
  contract::{
    ContractCall,
    ContractQuery,
    Error as ContractError,
    EscrowContract,
    QueryOutput,
  },
  http::{ErrorBody, HttpEscrowClient, ProjectCount},
  loader::{Config as LoaderConfig, Error as LoaderError, ProjectListLoader},
  modal::{CreateResearchModal, Notification},
  submitter::{
    Config as SubmitterConfig,
    Error as SubmitError,
    Field,
    ProjectSubmitter,
    ResearchForm,
  },
  uploader::{
    Config as UploaderConfig,
    Error as UploadError,
    FileBlob,
    FileUploader,
    PinFileResponse,
    PinataCredentials,
    API_KEY_HEADER,
    IPFS_GATEWAY,
    PINATA_PIN_FILE_ENDPOINT,
    SECRET_API_KEY_HEADER,
  },
  watcher::{spawn_count_poller, ProjectListWatcher, MIN_POLL_PERIOD},
};
