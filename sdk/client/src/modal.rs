use {
  crate::submitter::{Error as SubmitError, Field, ProjectSubmitter, ResearchForm},
  crowdfund_primitives::DeadlineError,
  std::fmt::Display,
  time::OffsetDateTime,
  tracing::{error, info},
};

/// User visible outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
  Success(String),
  Error(String),
}

impl Notification {
  pub fn is_success(&self) -> bool {
    matches!(self, Notification::Success(_))
  }
}

impl Display for Notification {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Notification::Success(message) => write!(f, "{message}"),
      Notification::Error(message) => write!(f, "error: {message}"),
    }
  }
}

/// The "create research" dialog: visibility plus the form it owns.
///
/// A successful submission clears the form and closes the dialog.
/// A failed one leaves both untouched so the user can correct the
/// input and try again.
#[derive(Debug, Default)]
pub struct CreateResearchModal {
  open: bool,
  form: ResearchForm,
}

impl CreateResearchModal {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn form(&self) -> &ResearchForm {
    &self.form
  }

  pub fn open(&mut self) {
    self.open = true;
  }

  /// Closes without submitting, discarding the input.
  pub fn dismiss(&mut self) {
    self.open = false;
    self.form.clear();
  }

  pub fn set(&mut self, field: Field, value: impl Into<String>) {
    self.form.set(field, value);
  }

  pub async fn submit(&mut self, submitter: &ProjectSubmitter) -> Notification {
    self.submit_at(submitter, OffsetDateTime::now_utc()).await
  }

  pub async fn submit_at(
    &mut self,
    submitter: &ProjectSubmitter,
    now: OffsetDateTime,
  ) -> Notification {
    match submitter.submit_at(&self.form, now).await {
      Ok(receipt) => {
        info!("{receipt}");
        self.form.clear();
        self.open = false;
        Notification::Success("Research created successfully!".into())
      }
      Err(SubmitError::InvalidDeadline(DeadlineError::NotInFuture(_))) => {
        Notification::Error("Deadline must be in the future".into())
      }
      Err(e) => {
        error!("Error creating research: {e}");
        Notification::Error(format!(
          "Error creating research ({e}). Please try again."
        ))
      }
    }
  }
}
