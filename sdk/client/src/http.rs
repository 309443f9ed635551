use {
  crate::contract::{ContractCall, ContractQuery, Error, EscrowContract, QueryOutput},
  crowdfund_primitives::{Receipt, ResearchProject},
  futures::future::BoxFuture,
  reqwest::{Response, StatusCode},
  serde::{Deserialize, Serialize},
  std::time::Duration,
  tracing::debug,
};

/// Body of `GET /escrow/nextProjectId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCount {
  pub next_project_id: u64,
}

/// Body of every non-2xx devnode response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
  pub error: String,
}

impl From<reqwest::Error> for Error {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      Error::Timeout
    } else {
      Error::Transport(e.to_string())
    }
  }
}

/// [`EscrowContract`] implementation that talks to the escrow
/// routes of a devnode over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpEscrowClient {
  http: reqwest::Client,
  endpoint: String,
}

impl HttpEscrowClient {
  /// `endpoint` is the devnode base url, e.g. `http://127.0.0.1:8080`.
  /// Every request is bounded by `timeout`.
  pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, Error> {
    Ok(Self {
      http: reqwest::Client::builder().timeout(timeout).build()?,
      endpoint: endpoint.trim_end_matches('/').to_owned(),
    })
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }

  async fn get_project_count(&self) -> Result<u64, Error> {
    let url = format!("{}/escrow/nextProjectId", self.endpoint);
    let response = self.http.get(url).send().await?;
    let count: ProjectCount = ensure_success(response).await?.json().await?;
    Ok(count.next_project_id)
  }

  async fn get_project(&self, id: u64) -> Result<ResearchProject, Error> {
    let url = format!("{}/escrow/projects/{id}", self.endpoint);
    let response = self.http.get(url).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
      return Err(Error::NotFound(id));
    }
    Ok(ensure_success(response).await?.json().await?)
  }
}

impl EscrowContract for HttpEscrowClient {
  fn read(
    &self,
    query: ContractQuery,
  ) -> BoxFuture<'_, Result<QueryOutput, Error>> {
    Box::pin(async move {
      debug!("contract read {query:?}");
      match query {
        ContractQuery::NextProjectId => {
          Ok(QueryOutput::ProjectCount(self.get_project_count().await?))
        }
        ContractQuery::GetResearchProject(id) => {
          Ok(QueryOutput::ResearchProject(self.get_project(id).await?))
        }
      }
    })
  }

  fn write(&self, call: ContractCall) -> BoxFuture<'_, Result<Receipt, Error>> {
    Box::pin(async move {
      debug!("contract write {call:?}");
      match call {
        ContractCall::StartResearchCrowdfunding(args) => {
          let url = format!("{}/escrow/projects", self.endpoint);
          let response = self.http.post(url).json(&args).send().await?;
          Ok(ensure_success(response).await?.json().await?)
        }
      }
    })
  }
}

async fn ensure_success(response: Response) -> Result<Response, Error> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let message = match response.json::<ErrorBody>().await {
    Ok(body) => body.error,
    Err(_) => status.to_string(),
  };

  Err(Error::Rejected(message))
}
