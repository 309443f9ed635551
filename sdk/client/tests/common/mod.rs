#![allow(dead_code)]

use {
  crowdfund_client_sdk::{
    ContractCall,
    ContractError,
    ContractQuery,
    EscrowContract,
    QueryOutput,
  },
  crowdfund_primitives::{
    Receipt,
    ResearchProject,
    StartResearchCrowdfunding,
    Wei,
    WEI_PER_ETH,
  },
  futures::future::BoxFuture,
  std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
      atomic::{AtomicUsize, Ordering},
      Mutex,
    },
    time::Duration,
  },
  tracing_subscriber::EnvFilter,
};

pub fn init_logging() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

/// 1/1/2025 00:00:00 UTC
pub const FIRST_DEADLINE: u64 = 1735689600;

/// Project `i` asks for `(i + 1) / 2` ETH and closes `i` days
/// after [`FIRST_DEADLINE`].
pub fn project(i: u64) -> ResearchProject {
  ResearchProject {
    title: format!("project {i}"),
    description: format!("description of project {i}"),
    amount: Wei::new((i as u128 + 1) * WEI_PER_ETH / 2),
    deadline: FIRST_DEADLINE + i * 86_400,
  }
}

/// In-memory escrow contract.
///
/// A `None` slot is a record that exists but can't be read.
#[derive(Default)]
pub struct MockEscrow {
  pub projects: Mutex<Vec<Option<ResearchProject>>>,
  pub delays: HashMap<u64, Duration>,
  pub writes: Mutex<Vec<StartResearchCrowdfunding>>,
  pub reads: AtomicUsize,
  pub fail_writes: bool,
}

impl MockEscrow {
  pub fn with_projects(count: u64) -> Self {
    Self {
      projects: Mutex::new((0..count).map(|i| Some(project(i))).collect()),
      ..Default::default()
    }
  }

  pub fn push(&self, project: Option<ResearchProject>) {
    self.projects.lock().unwrap().push(project);
  }

  pub fn writes(&self) -> Vec<StartResearchCrowdfunding> {
    self.writes.lock().unwrap().clone()
  }

  pub fn reads(&self) -> usize {
    self.reads.load(Ordering::SeqCst)
  }
}

impl EscrowContract for MockEscrow {
  fn read(
    &self,
    query: ContractQuery,
  ) -> BoxFuture<'_, Result<QueryOutput, ContractError>> {
    Box::pin(async move {
      self.reads.fetch_add(1, Ordering::SeqCst);
      match query {
        ContractQuery::NextProjectId => Ok(QueryOutput::ProjectCount(
          self.projects.lock().unwrap().len() as u64,
        )),
        ContractQuery::GetResearchProject(id) => {
          if let Some(delay) = self.delays.get(&id) {
            tokio::time::sleep(*delay).await;
          }
          let slot = self.projects.lock().unwrap().get(id as usize).cloned();
          match slot {
            Some(Some(project)) => Ok(QueryOutput::ResearchProject(project)),
            Some(None) => {
              Err(ContractError::Transport("record unavailable".into()))
            }
            None => Err(ContractError::NotFound(id)),
          }
        }
      }
    })
  }

  fn write(
    &self,
    call: ContractCall,
  ) -> BoxFuture<'_, Result<Receipt, ContractError>> {
    Box::pin(async move {
      let ContractCall::StartResearchCrowdfunding(args) = call;
      if self.fail_writes {
        return Err(ContractError::Rejected("user rejected the request".into()));
      }

      let mut writes = self.writes.lock().unwrap();
      let project_id = writes.len() as u64;
      let transaction = args.transaction_hash(project_id);
      writes.push(args);
      Ok(Receipt {
        project_id,
        transaction,
      })
    })
  }
}

/// Serves `router` on an ephemeral local port.
pub async fn serve(router: axum::Router) -> anyhow::Result<SocketAddr> {
  let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
  let addr = listener.local_addr()?;
  let server =
    axum::Server::from_tcp(listener)?.serve(router.into_make_service());
  tokio::spawn(server);
  Ok(addr)
}
