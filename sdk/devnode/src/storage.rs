use {
  crowdfund_primitives::{ProjectId, ResearchProject},
  rmp_serde::{from_slice, to_vec},
  std::path::Path,
  thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Database(#[from] sled::Error),

  #[error("Corrupt project record: {0}")]
  Decode(#[from] rmp_serde::decode::Error),

  #[error("Failed encoding project record: {0}")]
  Encode(#[from] rmp_serde::encode::Error),
}

/// Append-only storage of research projects. Ids are assigned
/// sequentially starting at zero.
pub trait ProjectStore: Send + Sync {
  fn len(&self) -> Result<u64, Error>;
  fn get(&self, id: ProjectId) -> Result<Option<ResearchProject>, Error>;
  fn append(&mut self, project: ResearchProject) -> Result<ProjectId, Error>;
}

#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
  projects: Vec<ResearchProject>,
}

impl ProjectStore for InMemoryProjectStore {
  fn len(&self) -> Result<u64, Error> {
    Ok(self.projects.len() as u64)
  }

  fn get(&self, id: ProjectId) -> Result<Option<ResearchProject>, Error> {
    Ok(
      usize::try_from(id)
        .ok()
        .and_then(|i| self.projects.get(i))
        .cloned(),
    )
  }

  fn append(&mut self, project: ResearchProject) -> Result<ProjectId, Error> {
    self.projects.push(project);
    Ok(self.projects.len() as u64 - 1)
  }
}

/// Projects kept in a sled tree, keyed by big-endian id with
/// MessagePack encoded values.
pub struct OnDiskProjectStore {
  _db: sled::Db,
  tree: sled::Tree,
}

impl OnDiskProjectStore {
  pub fn open(path: &Path) -> Result<Self, Error> {
    let db = sled::open(path)?;
    let tree = db.open_tree("projects")?;
    Ok(Self { _db: db, tree })
  }
}

impl ProjectStore for OnDiskProjectStore {
  fn len(&self) -> Result<u64, Error> {
    Ok(self.tree.len() as u64)
  }

  fn get(&self, id: ProjectId) -> Result<Option<ResearchProject>, Error> {
    match self.tree.get(id.to_be_bytes())? {
      Some(bytes) => Ok(Some(from_slice(&bytes)?)),
      None => Ok(None),
    }
  }

  fn append(&mut self, project: ResearchProject) -> Result<ProjectId, Error> {
    let id = self.len()?;
    self.tree.insert(id.to_be_bytes(), to_vec(&project)?)?;
    self.tree.flush()?;
    Ok(id)
  }
}
