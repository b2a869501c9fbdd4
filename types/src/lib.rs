pub mod execution;
pub mod house;

use commonware_cryptography::{
    sha256::{Digest, Sha256},
    Hasher,
};
pub use execution::{Account, Beacon, Event, Instruction, Key, Output, Transaction, Value, NAMESPACE};

/// Genesis message to use during initialization.
const GENESIS: &[u8] = b"bullseye genesis";

/// Entropy assumed for the height before the first executed block.
pub fn genesis_entropy() -> Digest {
    Sha256::hash(GENESIS)
}
