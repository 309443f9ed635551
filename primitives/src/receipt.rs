use {
  crate::{ProjectId, TransactionHash},
  serde::{Deserialize, Serialize},
  std::fmt::Display,
};

/// Confirmation of a successful `startResearchCrowdfunding` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
  /// Id assigned to the newly created project.
  pub project_id: ProjectId,

  pub transaction: TransactionHash,
}

impl Display for Receipt {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "project #{} created in transaction {}",
      self.project_id,
      self.transaction
    )
  }
}
