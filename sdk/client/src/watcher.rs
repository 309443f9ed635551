use {
  crate::{contract::EscrowContract, loader::ProjectListLoader},
  crowdfund_primitives::ResearchProjectView,
  std::{
    sync::{
      atomic::{AtomicU64, Ordering},
      Arc,
    },
    time::Duration,
  },
  tokio::{
    sync::{watch, RwLock},
    task::{JoinHandle, JoinSet},
    time::{interval, MissedTickBehavior},
  },
  tracing::{debug, info, warn},
};

/// Keeps a list of research projects in sync with the upstream
/// project count.
///
/// Every time the count observed on `totals` changes, a new batch load
/// is started. Loads are not cancelled when a newer count arrives,
/// instead each load is tagged with a generation number and only the
/// load of the most recent generation is allowed to replace the list.
/// The list is always replaced as a whole.
pub struct ProjectListWatcher {
  projects: Arc<RwLock<Vec<ResearchProjectView>>>,
  commits: watch::Receiver<u64>,
  task: JoinHandle<()>,
}

impl ProjectListWatcher {
  pub fn new(
    loader: ProjectListLoader,
    totals: watch::Receiver<Option<u64>>,
  ) -> Self {
    let projects = Arc::new(RwLock::new(Vec::new()));
    let (commits_tx, commits) = watch::channel(0);

    let task = tokio::spawn(run(
      Arc::new(loader),
      totals,
      projects.clone(),
      Arc::new(commits_tx),
    ));

    Self {
      projects,
      commits,
      task,
    }
  }

  /// Snapshot of the most recently committed list.
  pub async fn projects(&self) -> Vec<ResearchProjectView> {
    self.projects.read().await.clone()
  }

  /// Waits until a new list is committed. Returns false once the
  /// watcher has stopped and no further commits will happen.
  pub async fn changed(&mut self) -> bool {
    self.commits.changed().await.is_ok()
  }

  pub async fn stop(self) {
    self.task.abort();
    if let Err(e) = self.task.await {
      if !e.is_cancelled() {
        warn!("project list watcher terminated abnormally: {e}");
      }
    }
  }
}

async fn run(
  loader: Arc<ProjectListLoader>,
  mut totals: watch::Receiver<Option<u64>>,
  projects: Arc<RwLock<Vec<ResearchProjectView>>>,
  commits: Arc<watch::Sender<u64>>,
) {
  let generation = Arc::new(AtomicU64::new(0));
  let mut loads = JoinSet::new();

  'totals: loop {
    let total = *totals.borrow_and_update();
    let current = generation.fetch_add(1, Ordering::SeqCst) + 1;
    debug!("project count is {total:?}, starting load #{current}");

    loads.spawn(load_and_commit(
      loader.clone(),
      total,
      current,
      generation.clone(),
      projects.clone(),
      commits.clone(),
    ));

    // wait for the next count while reaping finished loads
    loop {
      tokio::select! {
        changed = totals.changed() => match changed {
          Ok(()) => continue 'totals,
          Err(_) => break 'totals,
        },
        Some(_) = loads.join_next() => {}
      }
    }
  }

  // upstream is gone, let in-flight loads finish.
  while loads.join_next().await.is_some() {}
}

async fn load_and_commit(
  loader: Arc<ProjectListLoader>,
  total: Option<u64>,
  current: u64,
  generation: Arc<AtomicU64>,
  projects: Arc<RwLock<Vec<ResearchProjectView>>>,
  commits: Arc<watch::Sender<u64>>,
) {
  let Some(views) = loader.load(total).await else {
    return;
  };

  let mut list = projects.write().await;
  if generation.load(Ordering::SeqCst) != current {
    debug!("discarding stale project list of load #{current}");
    return;
  }

  *list = views;
  drop(list);
  commits.send_replace(current);
}

/// Shortest period [`spawn_count_poller`] polls at.
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(10);

/// Polls `nextProjectId` every `period` and publishes the count
/// whenever it differs from the last published value.
///
/// Periods below [`MIN_POLL_PERIOD`] are raised to it. Failed reads
/// are logged and the previous value is kept. The poller exits once
/// every receiver has been dropped.
pub fn spawn_count_poller(
  contract: Arc<dyn EscrowContract>,
  period: Duration,
) -> (watch::Receiver<Option<u64>>, JoinHandle<()>) {
  let (sender, receiver) = watch::channel(None);

  if period < MIN_POLL_PERIOD {
    warn!("poll period {period:?} raised to {MIN_POLL_PERIOD:?}");
  }
  let period = period.max(MIN_POLL_PERIOD);

  let task = tokio::spawn(async move {
    let mut ticks = interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !sender.is_closed() {
      ticks.tick().await;
      match contract.next_project_id().await {
        Ok(count) => {
          let updated = sender.send_if_modified(|current| {
            if *current == Some(count) {
              false
            } else {
              *current = Some(count);
              true
            }
          });

          if updated {
            info!("project count changed to {count}");
          }
        }
        Err(e) => warn!("reading project count failed: {e}"),
      }
    }
  });

  (receiver, task)
}
