use {
  crate::contract::{Error as ContractError, EscrowContract},
  crowdfund_primitives::{
    DeadlineError,
    Locale,
    ProjectId,
    ResearchProjectView,
  },
  futures::{stream, StreamExt},
  std::{future::ready, num::NonZeroUsize, sync::Arc, time::Duration},
  thiserror::Error,
  tokio::time::timeout,
  tracing::{debug, info, warn},
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Reading research project failed: {0}")]
  Read(#[from] ContractError),

  #[error("Research project can't be displayed: {0}")]
  Render(#[from] DeadlineError),
}

#[derive(Debug, Clone)]
pub struct Config {
  /// Locale used to render project deadlines.
  pub locale: Locale,

  /// Upper bound on a single `getResearchProject` read.
  pub read_timeout: Duration,

  /// Maximum number of reads in flight at once.
  pub max_concurrent_reads: NonZeroUsize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      locale: Locale::local(),
      read_timeout: Duration::from_secs(10),
      max_concurrent_reads: NonZeroUsize::new(16).expect("non-zero literal"),
    }
  }
}

/// Fetches research project records from the escrow contract
/// and shapes them for display.
#[derive(Clone)]
pub struct ProjectListLoader {
  contract: Arc<dyn EscrowContract>,
  config: Config,
}

impl ProjectListLoader {
  pub fn new(contract: Arc<dyn EscrowContract>, config: Config) -> Self {
    Self { contract, config }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Loads projects `0..total` as one batch.
  ///
  /// A missing or zero total produces nothing and callers keep whatever
  /// they are currently showing. Reads run concurrently but the returned
  /// list is always in index order. A record that fails to load or render
  /// is logged and left out, so the output never has more than `total`
  /// entries.
  pub async fn load(&self, total: Option<u64>) -> Option<Vec<ResearchProjectView>> {
    let total = match total {
      Some(total) if total > 0 => total,
      _ => return None,
    };

    let views: Vec<_> = stream::iter(0..total)
      .map(|id| async move { (id, self.fetch(id).await) })
      .buffered(self.config.max_concurrent_reads.get())
      .filter_map(|(id, result)| {
        ready(match result {
          Ok(view) => Some(view),
          Err(e) => {
            warn!("skipping research project {id}: {e}");
            None
          }
        })
      })
      .collect()
      .await;

    info!("loaded {} of {total} research projects", views.len());
    Some(views)
  }

  /// Reads the current `nextProjectId` and loads that many projects.
  pub async fn load_all(
    &self,
  ) -> Result<Option<Vec<ResearchProjectView>>, ContractError> {
    let total = timeout(self.config.read_timeout, self.contract.next_project_id())
      .await
      .map_err(|_| ContractError::Timeout)??;
    Ok(self.load(Some(total)).await)
  }

  async fn fetch(&self, id: ProjectId) -> Result<ResearchProjectView, Error> {
    let project =
      timeout(self.config.read_timeout, self.contract.research_project(id))
        .await
        .map_err(|_| ContractError::Timeout)??;
    debug!("research project {id}: {project:?}");
    Ok(ResearchProjectView::new(&project, &self.config.locale)?)
  }
}
