mod common;

use {
  common::MockEscrow,
  crowdfund_client_sdk::{
    CreateResearchModal,
    Field,
    Notification,
    ProjectSubmitter,
    ResearchForm,
    SubmitError,
    SubmitterConfig,
  },
  crowdfund_primitives::{DeadlineError, Wei},
  std::sync::Arc,
  time::{macros::datetime, Duration, OffsetDateTime},
};

fn form(amount: &str, deadline: &str) -> ResearchForm {
  ResearchForm {
    title: "Coral reef resilience".into(),
    description: "Long term temperature logging".into(),
    amount: amount.into(),
    deadline: deadline.into(),
  }
}

fn submitter(contract: Arc<MockEscrow>) -> ProjectSubmitter {
  ProjectSubmitter::new(contract, SubmitterConfig::default())
}

#[tokio::test]
async fn yesterday_is_rejected_before_any_write() {
  let contract = Arc::new(MockEscrow::default());
  let yesterday = OffsetDateTime::now_utc().date() - Duration::days(1);

  let result = submitter(contract.clone())
    .submit(&form("1 ETH", &yesterday.to_string()))
    .await;

  assert!(matches!(
    result,
    Err(SubmitError::InvalidDeadline(DeadlineError::NotInFuture(_)))
  ));
  assert!(contract.writes().is_empty());
}

#[tokio::test]
async fn amount_is_written_in_base_units() -> anyhow::Result<()> {
  let contract = Arc::new(MockEscrow::default());
  let now = datetime!(2025-06-15 12:00 UTC);

  let receipt = submitter(contract.clone())
    .submit_at(&form("2 ETH", "2025-06-16"), now)
    .await?;
  assert_eq!(receipt.project_id, 0);

  let writes = contract.writes();
  assert_eq!(writes.len(), 1);
  assert_eq!(writes[0].title, "Coral reef resilience");
  assert_eq!(writes[0].amount, Wei::new(2_000_000_000_000_000_000));
  assert_eq!(writes[0].duration, 12 * 3600);
  assert_eq!(writes[0].description, None);
  assert_eq!(receipt.transaction, writes[0].transaction_hash(0));
  Ok(())
}

#[tokio::test]
async fn malformed_amount_is_reported_first() {
  let contract = Arc::new(MockEscrow::default());
  let now = datetime!(2025-06-15 12:00 UTC);
  let submitter = submitter(contract.clone());

  let result = submitter.submit_at(&form("lots", "2025-07-01"), now).await;
  assert!(matches!(result, Err(SubmitError::MalformedAmount(_))));

  // both fields invalid, the amount is checked before the deadline
  let result = submitter.submit_at(&form("", "someday"), now).await;
  assert!(matches!(result, Err(SubmitError::MalformedAmount(_))));

  let result = submitter.submit_at(&form("1", "someday"), now).await;
  assert!(matches!(
    result,
    Err(SubmitError::InvalidDeadline(DeadlineError::Unparsable(_)))
  ));

  assert!(contract.writes().is_empty());
}

#[tokio::test]
async fn description_is_forwarded_only_when_enabled() -> anyhow::Result<()> {
  let contract = Arc::new(MockEscrow::default());
  let now = datetime!(2025-06-15 12:00 UTC);

  let forwarding = ProjectSubmitter::new(contract.clone(), SubmitterConfig {
    forward_description: true,
  });
  forwarding
    .submit_at(&form("0.25", "2025-06-20"), now)
    .await?;

  assert_eq!(
    contract.writes()[0].description.as_deref(),
    Some("Long term temperature logging")
  );
  Ok(())
}

#[tokio::test]
async fn failed_write_keeps_modal_open_and_form_intact() {
  let contract = Arc::new(MockEscrow {
    fail_writes: true,
    ..Default::default()
  });
  let submitter = submitter(contract);
  let now = datetime!(2025-06-15 12:00 UTC);

  let mut modal = CreateResearchModal::new();
  modal.open();
  modal.set(Field::Title, "Coral reef resilience");
  modal.set(Field::Description, "Long term temperature logging");
  modal.set(Field::Amount, "3 ETH");
  modal.set(Field::Deadline, "2025-08-01");
  let before = modal.form().clone();

  let notification = modal.submit_at(&submitter, now).await;
  assert!(matches!(notification, Notification::Error(_)));
  assert!(modal.is_open());
  assert_eq!(modal.form(), &before);
}

#[tokio::test]
async fn past_deadline_keeps_modal_open() {
  let contract = Arc::new(MockEscrow::default());
  let submitter = submitter(contract.clone());
  let now = datetime!(2025-06-15 12:00 UTC);

  let mut modal = CreateResearchModal::new();
  modal.open();
  modal.set(Field::Amount, "1");
  modal.set(Field::Deadline, "2025-06-14");

  assert_eq!(
    modal.submit_at(&submitter, now).await,
    Notification::Error("Deadline must be in the future".into())
  );
  assert!(modal.is_open());
  assert_eq!(modal.form().deadline, "2025-06-14");
  assert!(contract.writes().is_empty());
}

#[tokio::test]
async fn successful_submit_clears_and_closes() {
  let contract = Arc::new(MockEscrow::default());
  let submitter = submitter(contract.clone());
  let now = datetime!(2025-06-15 12:00 UTC);

  let mut modal = CreateResearchModal::new();
  modal.open();
  modal.set(Field::Title, "Bee colony collapse");
  modal.set(Field::Amount, "1.5 ETH");
  modal.set(Field::Deadline, "2025-09-01");

  let notification = modal.submit_at(&submitter, now).await;
  assert!(notification.is_success());
  assert!(!modal.is_open());
  assert!(modal.form().is_empty());
  assert_eq!(contract.writes()[0].title, "Bee colony collapse");
}

#[test]
fn dismiss_discards_input() {
  let mut modal = CreateResearchModal::new();
  modal.open();
  modal.set(Field::Title, "half typed");
  modal.dismiss();

  assert!(!modal.is_open());
  assert!(modal.form().is_empty());
}
