mod amount;
mod b58;
mod call;
mod deadline;
mod hash;
mod project;
mod receipt;

pub use {
  amount::{Error as AmountError, Wei, DECIMALS, WEI_PER_ETH},
  b58::ToBase58String,
  call::StartResearchCrowdfunding,
  deadline::{parse_deadline, seconds_until, Error as DeadlineError, Locale},
  hash::TransactionHash,
  project::{ProjectId, ResearchProject, ResearchProjectView},
  receipt::Receipt,
};
