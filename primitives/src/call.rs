use {
  crate::{ProjectId, TransactionHash, Wei},
  serde::{Deserialize, Serialize},
};

/// Arguments of the escrow contract's `startResearchCrowdfunding`
/// write function.
///
/// The contract's positional parameters are `(title, amount, duration)`.
/// `description` is only present when the caller explicitly opted into
/// forwarding it; otherwise it is omitted from the wire entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResearchCrowdfunding {
  pub title: String,

  /// Funding goal in base units.
  pub amount: Wei,

  /// Seconds from now until the campaign deadline.
  pub duration: u64,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

impl StartResearchCrowdfunding {
  /// Identifier of the transaction that created project `id` from
  /// this call. Deterministic over the call contents and the id.
  pub fn transaction_hash(&self, id: ProjectId) -> TransactionHash {
    let mut preimage = Vec::with_capacity(self.title.len() + 48);
    preimage.extend_from_slice(&id.to_be_bytes());
    preimage.extend_from_slice(&(self.title.len() as u64).to_be_bytes());
    preimage.extend_from_slice(self.title.as_bytes());
    preimage.extend_from_slice(&self.amount.base_units().to_be_bytes());
    preimage.extend_from_slice(&self.duration.to_be_bytes());
    if let Some(description) = &self.description {
      preimage.extend_from_slice(description.as_bytes());
    }
    TransactionHash::digest(&preimage)
  }
}
