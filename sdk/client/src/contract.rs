use {
  crowdfund_primitives::{
    ProjectId,
    Receipt,
    ResearchProject,
    StartResearchCrowdfunding,
  },
  futures::future::BoxFuture,
  thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Contract transport failure: {0}")]
  Transport(String),

  #[error("Contract rejected the call: {0}")]
  Rejected(String),

  #[error("Research project {0} does not exist")]
  NotFound(ProjectId),

  #[error("Contract call timed out")]
  Timeout,

  #[error("Unexpected contract output for {0:?}")]
  UnexpectedOutput(ContractQuery),
}

/// Read-only functions of the escrow contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractQuery {
  /// `nextProjectId()`, the number of projects created so far.
  NextProjectId,

  /// `getResearchProject(index)`
  GetResearchProject(ProjectId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutput {
  ProjectCount(u64),
  ResearchProject(ResearchProject),
}

/// State changing functions of the escrow contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
  StartResearchCrowdfunding(StartResearchCrowdfunding),
}

/// Capabilities of the escrow contract as seen by a client.
///
/// Components receive an implementation of this trait explicitly
/// instead of reaching for a globally configured wallet/provider.
/// [`crate::HttpEscrowClient`] talks to a devnode, tests use in-memory
/// implementations.
pub trait EscrowContract: Send + Sync {
  fn read(&self, query: ContractQuery)
    -> BoxFuture<'_, Result<QueryOutput, Error>>;

  fn write(&self, call: ContractCall) -> BoxFuture<'_, Result<Receipt, Error>>;

  fn next_project_id(&self) -> BoxFuture<'_, Result<u64, Error>> {
    Box::pin(async move {
      let query = ContractQuery::NextProjectId;
      match self.read(query).await? {
        QueryOutput::ProjectCount(count) => Ok(count),
        QueryOutput::ResearchProject(_) => Err(Error::UnexpectedOutput(query)),
      }
    })
  }

  fn research_project(
    &self,
    id: ProjectId,
  ) -> BoxFuture<'_, Result<ResearchProject, Error>> {
    Box::pin(async move {
      let query = ContractQuery::GetResearchProject(id);
      match self.read(query).await? {
        QueryOutput::ResearchProject(project) => Ok(project),
        QueryOutput::ProjectCount(_) => Err(Error::UnexpectedOutput(query)),
      }
    })
  }

  fn start_research_crowdfunding(
    &self,
    call: StartResearchCrowdfunding,
  ) -> BoxFuture<'_, Result<Receipt, Error>> {
    self.write(ContractCall::StartResearchCrowdfunding(call))
  }
}
