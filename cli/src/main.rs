use {
  crate::cli::{CliOptions, Command},
  anyhow::bail,
  clap::Parser,
  crowdfund_client_sdk::{
    spawn_count_poller,
    CreateResearchModal,
    EscrowContract,
    Field,
    FileBlob,
    FileUploader,
    HttpEscrowClient,
    LoaderConfig,
    PinataCredentials,
    ProjectListLoader,
    ProjectListWatcher,
    ProjectSubmitter,
    SubmitterConfig,
    UploaderConfig,
  },
  crowdfund_primitives::ResearchProjectView,
  std::{path::Path, sync::Arc, time::Duration},
  tracing::{info, warn},
  tracing_subscriber::EnvFilter,
};

mod cli;

fn print_projects(projects: &[ResearchProjectView]) {
  if projects.is_empty() {
    println!("no research projects yet");
  }

  for project in projects {
    println!(
      "{} | {} | closes {}",
      project.title, project.amount, project.deadline
    );
    if !project.description.is_empty() {
      println!("    {}", project.description);
    }
  }
}

async fn list(
  contract: Arc<dyn EscrowContract>,
  watch: bool,
  poll: Duration,
) -> anyhow::Result<()> {
  let loader = ProjectListLoader::new(contract.clone(), LoaderConfig::default());

  if !watch {
    print_projects(&loader.load_all().await?.unwrap_or_default());
    return Ok(());
  }

  let (totals, poller) = spawn_count_poller(contract, poll);
  let mut watcher = ProjectListWatcher::new(loader, totals);

  loop {
    tokio::select! {
      changed = watcher.changed() => {
        if !changed {
          break;
        }
        print_projects(&watcher.projects().await);
      }
      _ = tokio::signal::ctrl_c() => {
        info!("stopped watching");
        break;
      }
    }
  }

  watcher.stop().await;
  poller.abort();
  Ok(())
}

async fn create(
  contract: Arc<dyn EscrowContract>,
  fields: [(Field, String); 4],
  forward_description: bool,
) -> anyhow::Result<()> {
  let submitter = ProjectSubmitter::new(contract, SubmitterConfig {
    forward_description,
  });

  let mut modal = CreateResearchModal::new();
  modal.open();
  for (field, value) in fields {
    modal.set(field, value);
  }

  let notification = modal.submit(&submitter).await;
  println!("{notification}");
  if !notification.is_success() {
    bail!("research project was not created");
  }
  Ok(())
}

async fn upload(
  path: &Path,
  endpoint: String,
  gateway: String,
  timeout: Duration,
) -> anyhow::Result<()> {
  let credentials = PinataCredentials::from_env();
  if credentials.is_some() {
    warn!("sending pinning credentials from the client");
  }

  let uploader = FileUploader::new(UploaderConfig {
    endpoint,
    gateway,
    credentials,
    timeout,
  })?;

  let file = FileBlob::read(path).await?;
  match uploader.upload(Some(file)).await {
    Some(url) => {
      println!("{url}");
      Ok(())
    }
    None => bail!("{} was not uploaded", path.display()),
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let opts = CliOptions::parse();
  info!("cli options: {opts:#?}");

  let contract: Arc<dyn EscrowContract> =
    Arc::new(HttpEscrowClient::new(&opts.rpc, opts.timeout())?);

  match &opts.command {
    Command::List { watch, poll } => {
      list(contract, *watch, (*poll).into()).await
    }
    Command::Create {
      title,
      description,
      amount,
      deadline,
      forward_description,
    } => {
      let fields = [
        (Field::Title, title.clone()),
        (Field::Description, description.clone()),
        (Field::Amount, amount.clone()),
        (Field::Deadline, deadline.clone()),
      ];
      create(contract, fields, *forward_description).await
    }
    Command::Upload {
      path,
      pinning_endpoint,
      gateway,
    } => {
      let endpoint = opts.pinning_endpoint(pinning_endpoint.as_deref());
      upload(path, endpoint, gateway.clone(), opts.timeout()).await
    }
  }
}
