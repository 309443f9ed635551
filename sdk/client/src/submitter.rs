use {
  crate::contract::{Error as ContractError, EscrowContract},
  crowdfund_primitives::{
    parse_deadline,
    seconds_until,
    AmountError,
    DeadlineError,
    Receipt,
    StartResearchCrowdfunding,
    Wei,
  },
  std::sync::Arc,
  thiserror::Error,
  time::OffsetDateTime,
  tracing::info,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  MalformedAmount(#[from] AmountError),

  #[error(transparent)]
  InvalidDeadline(#[from] DeadlineError),

  #[error("Contract write failed: {0}")]
  ContractWriteFailure(#[source] ContractError),
}

/// Input fields of the new research form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Title,
  Description,
  Amount,
  Deadline,
}

/// User entered values of a new research project, kept verbatim
/// until submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchForm {
  pub title: String,
  pub description: String,

  /// Funding goal as typed, e.g. `10 ETH` or `0.5`.
  pub amount: String,

  /// `YYYY-MM-DD` or an RFC 3339 timestamp.
  pub deadline: String,
}

impl ResearchForm {
  pub fn set(&mut self, field: Field, value: impl Into<String>) {
    let value = value.into();
    match field {
      Field::Title => self.title = value,
      Field::Description => self.description = value,
      Field::Amount => self.amount = value,
      Field::Deadline => self.deadline = value,
    }
  }

  pub fn clear(&mut self) {
    *self = Self::default();
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }

  /// Validates the form and turns it into write call arguments.
  ///
  /// The amount is checked first, then the deadline, which must be
  /// strictly after `now`. Nothing here touches the network.
  pub fn prepare(
    &self,
    now: OffsetDateTime,
    forward_description: bool,
  ) -> Result<StartResearchCrowdfunding, Error> {
    let amount = Wei::parse_ether(&self.amount)?;
    let duration = seconds_until(parse_deadline(&self.deadline)?, now)?;

    Ok(StartResearchCrowdfunding {
      title: self.title.clone(),
      amount,
      duration,
      description: forward_description.then(|| self.description.clone()),
    })
  }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
  /// The contract's `startResearchCrowdfunding` takes
  /// `(title, amount, duration)` and the description collected by the
  /// form is not part of it. Turn this on only against a contract that
  /// accepts a description argument.
  pub forward_description: bool,
}

/// Validates research forms and submits them to the escrow contract.
#[derive(Clone)]
pub struct ProjectSubmitter {
  contract: Arc<dyn EscrowContract>,
  config: Config,
}

impl ProjectSubmitter {
  pub fn new(contract: Arc<dyn EscrowContract>, config: Config) -> Self {
    Self { contract, config }
  }

  pub async fn submit(&self, form: &ResearchForm) -> Result<Receipt, Error> {
    self.submit_at(form, OffsetDateTime::now_utc()).await
  }

  /// Same as [`ProjectSubmitter::submit`] with an explicit current time.
  pub async fn submit_at(
    &self,
    form: &ResearchForm,
    now: OffsetDateTime,
  ) -> Result<Receipt, Error> {
    let call = form.prepare(now, self.config.forward_description)?;
    info!(
      "starting research crowdfunding '{}' for {} over {}s",
      call.title, call.amount, call.duration
    );

    self
      .contract
      .start_research_crowdfunding(call)
      .await
      .map_err(Error::ContractWriteFailure)
  }
}
