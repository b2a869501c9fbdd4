use crate::{
    randomness::compute_commitment,
    state_transition::{execute_state_transition, StateTransitionResult},
    State,
};
use bullseye_types::execution::{Beacon, Instruction, Transaction, SECRET_LENGTH};
use commonware_cryptography::{
    ed25519::{PrivateKey, PublicKey},
    sha256::{Digest, Sha256},
    Hasher, Signer,
};
use rand::RngCore;

/// Milliseconds between mock blocks.
pub const BLOCK_TIME_MS: u64 = 3_000;

/// Creates an account keypair for Ed25519 signatures used by users
pub fn create_account_keypair(seed: u64) -> (PrivateKey, PublicKey) {
    let private = PrivateKey::from_seed(seed);
    let public = private.public_key();
    (private, public)
}

/// Creates a deterministic beacon for `height`
pub fn create_beacon(height: u64) -> Beacon {
    let mut hasher = Sha256::new();
    hasher.update(b"mock-beacon");
    hasher.update(&height.to_be_bytes());
    Beacon {
        height,
        timestamp_ms: height * BLOCK_TIME_MS,
        entropy: hasher.finalize(),
    }
}

/// Draws a fresh bet secret
pub fn create_secret<R: RngCore>(rng: &mut R) -> [u8; SECRET_LENGTH] {
    let mut secret = [0u8; SECRET_LENGTH];
    rng.fill_bytes(&mut secret);
    secret
}

/// Builds the commit instruction for `secret`
pub fn commit_instruction(
    stake: u64,
    secret: &[u8; SECRET_LENGTH],
    player: &PublicKey,
) -> Instruction {
    Instruction::CommitBet {
        stake,
        commitment: compute_commitment(secret, player),
    }
}

/// Signing key plus the next nonce to use
pub struct MockAccount {
    pub private: PrivateKey,
    pub public: PublicKey,
    pub nonce: u64,
}

impl MockAccount {
    pub fn new(seed: u64) -> Self {
        let (private, public) = create_account_keypair(seed);
        Self {
            private,
            public,
            nonce: 0,
        }
    }

    pub fn sign(&mut self, instruction: Instruction) -> Transaction {
        let tx = Transaction::sign(&self.private, self.nonce, instruction);
        self.nonce += 1;
        tx
    }
}

/// Executes the next block using [`create_beacon`]
pub async fn execute_block<S: State>(
    state: &mut S,
    height: u64,
    transactions: Vec<Transaction>,
) -> anyhow::Result<StateTransitionResult> {
    execute_state_transition(state, create_beacon(height), transactions).await
}

/// Entropy [`create_beacon`] produces for `height`
pub fn beacon_entropy(height: u64) -> Digest {
    create_beacon(height).entropy
}
