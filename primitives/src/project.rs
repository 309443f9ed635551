use {
  crate::{
    deadline::{Error as DeadlineError, Locale},
    Wei,
  },
  serde::{Deserialize, Serialize},
};

/// Sequential identifier assigned by the escrow contract.
/// Valid ids are `0..nextProjectId`.
pub type ProjectId = u64;

/// A research project as stored by the escrow contract.
///
/// Records are immutable once created on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchProject {
  pub title: String,
  pub description: String,

  /// Funding goal in base units.
  pub amount: Wei,

  /// Unix timestamp (seconds) after which the campaign closes.
  pub deadline: u64,
}

/// Display-ready shape of a [`ResearchProject`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchProjectView {
  pub title: String,
  pub description: String,

  /// e.g. `1.5 ETH`
  pub amount: String,

  /// Calendar date of the deadline in the rendering locale.
  pub deadline: String,
}

impl ResearchProjectView {
  pub fn new(
    project: &ResearchProject,
    locale: &Locale,
  ) -> Result<Self, DeadlineError> {
    Ok(Self {
      title: project.title.clone(),
      description: project.description.clone(),
      amount: project.amount.to_string(),
      deadline: locale.format_date(project.deadline)?,
    })
  }
}
