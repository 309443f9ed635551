use {
  crate::storage::{Error as StorageError, ProjectStore},
  crowdfund_primitives::{
    ProjectId,
    Receipt,
    ResearchProject,
    StartResearchCrowdfunding,
    ToBase58String,
  },
  thiserror::Error,
  time::OffsetDateTime,
  tokio::sync::RwLock,
  tracing::info,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Research title must not be empty")]
  EmptyTitle,

  #[error("Funding amount must be greater than zero")]
  ZeroAmount,

  #[error("Duration must be greater than zero")]
  ZeroDuration,

  #[error("Deadline is too far in the future")]
  DeadlineOverflow,

  #[error(transparent)]
  Storage(#[from] StorageError),
}

/// The research escrow contract of this node.
///
/// Exposes the two read functions and the one write function that
/// clients use. Records are never modified after creation.
pub struct Escrow {
  store: RwLock<Box<dyn ProjectStore>>,
}

impl Escrow {
  pub fn new(store: Box<dyn ProjectStore>) -> Self {
    Self {
      store: RwLock::new(store),
    }
  }

  pub async fn next_project_id(&self) -> Result<u64, Error> {
    Ok(self.store.read().await.len()?)
  }

  pub async fn get_research_project(
    &self,
    id: ProjectId,
  ) -> Result<Option<ResearchProject>, Error> {
    Ok(self.store.read().await.get(id)?)
  }

  /// Creates a new project that closes `call.duration` seconds
  /// after `now` (unix seconds).
  pub async fn start_research_crowdfunding(
    &self,
    call: StartResearchCrowdfunding,
    now: u64,
  ) -> Result<Receipt, Error> {
    if call.title.trim().is_empty() {
      return Err(Error::EmptyTitle);
    }

    if call.amount.is_zero() {
      return Err(Error::ZeroAmount);
    }

    if call.duration == 0 {
      return Err(Error::ZeroDuration);
    }

    let deadline = now
      .checked_add(call.duration)
      .filter(|d| is_calendar_timestamp(*d))
      .ok_or(Error::DeadlineOverflow)?;

    let project = ResearchProject {
      title: call.title.clone(),
      description: call.description.clone().unwrap_or_default(),
      amount: call.amount,
      deadline,
    };

    let project_id = self.store.write().await.append(project)?;
    let transaction = call.transaction_hash(project_id);
    info!(
      "research project #{project_id} '{}' asking {} until {deadline} created \
       in tx {}",
      call.title,
      call.amount,
      transaction.to_b58()
    );

    Ok(Receipt {
      project_id,
      transaction,
    })
  }
}

/// Deadlines must be representable as calendar dates so that
/// clients can render them.
fn is_calendar_timestamp(unix_seconds: u64) -> bool {
  i64::try_from(unix_seconds)
    .ok()
    .and_then(|t| OffsetDateTime::from_unix_timestamp(t).ok())
    .is_some()
}

#[cfg(test)]
mod tests {
  use {
    super::{Error, Escrow},
    crate::storage::InMemoryProjectStore,
    crowdfund_primitives::{StartResearchCrowdfunding, Wei},
  };

  const NOW: u64 = 1_735_689_600;

  fn escrow() -> Escrow {
    Escrow::new(Box::new(InMemoryProjectStore::default()))
  }

  fn call(title: &str, amount: u128, duration: u64) -> StartResearchCrowdfunding {
    StartResearchCrowdfunding {
      title: title.into(),
      amount: Wei::new(amount),
      duration,
      description: None,
    }
  }

  #[tokio::test]
  async fn creates_projects_with_sequential_ids() -> anyhow::Result<()> {
    let escrow = escrow();
    assert_eq!(escrow.next_project_id().await?, 0);

    let first = escrow
      .start_research_crowdfunding(call("first", 10, 3600), NOW)
      .await?;
    let second = escrow
      .start_research_crowdfunding(call("second", 20, 60), NOW)
      .await?;

    assert_eq!(first.project_id, 0);
    assert_eq!(second.project_id, 1);
    assert_eq!(first.transaction, call("first", 10, 3600).transaction_hash(0));
    assert_eq!(escrow.next_project_id().await?, 2);

    let stored = escrow.get_research_project(0).await?.unwrap();
    assert_eq!(stored.title, "first");
    assert_eq!(stored.amount, Wei::new(10));
    assert_eq!(stored.deadline, NOW + 3600);
    assert_eq!(stored.description, "");

    assert!(escrow.get_research_project(2).await?.is_none());
    Ok(())
  }

  #[tokio::test]
  async fn stores_forwarded_description() -> anyhow::Result<()> {
    let escrow = escrow();
    let mut with_description = call("described", 1, 1);
    with_description.description = Some("all the details".into());

    escrow
      .start_research_crowdfunding(with_description, NOW)
      .await?;
    assert_eq!(
      escrow.get_research_project(0).await?.unwrap().description,
      "all the details"
    );
    Ok(())
  }

  #[tokio::test]
  async fn rejects_invalid_calls() -> anyhow::Result<()> {
    let escrow = escrow();

    assert!(matches!(
      escrow.start_research_crowdfunding(call("  ", 1, 1), NOW).await,
      Err(Error::EmptyTitle)
    ));
    assert!(matches!(
      escrow.start_research_crowdfunding(call("t", 0, 1), NOW).await,
      Err(Error::ZeroAmount)
    ));
    assert!(matches!(
      escrow.start_research_crowdfunding(call("t", 1, 0), NOW).await,
      Err(Error::ZeroDuration)
    ));
    assert!(matches!(
      escrow
        .start_research_crowdfunding(call("t", 1, u64::MAX), NOW)
        .await,
      Err(Error::DeadlineOverflow)
    ));

    assert_eq!(escrow.next_project_id().await?, 0);
    Ok(())
  }
}
