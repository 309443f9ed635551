use {
  crate::ToBase58String,
  serde::{de, Deserialize, Deserializer, Serialize, Serializer},
  sha3::{Digest, Sha3_256},
  std::fmt::{Debug, Display},
};

/// Sha3-256 digest identifying a contract write.
///
/// Travels as base58 text on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionHash([u8; 32]);

impl TransactionHash {
  pub fn digest(preimage: &[u8]) -> Self {
    Self(Sha3_256::digest(preimage).into())
  }

  pub fn as_bytes(&self) -> &[u8; 32] {
    &self.0
  }
}

impl Display for TransactionHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_b58())
  }
}

impl Debug for TransactionHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "tx({})", self.to_b58())
  }
}

impl Serialize for TransactionHash {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.to_b58())
  }
}

impl<'de> Deserialize<'de> for TransactionHash {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let text = String::deserialize(deserializer)?;
    let bytes = bs58::decode(&text).into_vec().map_err(de::Error::custom)?;
    let bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
      de::Error::custom(format!("expected 32 byte hash, got {}", b.len()))
    })?;
    Ok(Self(bytes))
  }
}
