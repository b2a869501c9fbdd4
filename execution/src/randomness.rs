//! Commit-reveal randomness for bets.
//!
//! ## Commit-Reveal Flow
//!
//! 1. **Commit** - The player picks a 32-byte secret and submits
//!    `commitment = SHA-256(secret || player)` with their stake at height `H`.
//! 2. **Wait** - Block `H + 1` is produced. Its beacon entropy did not exist when
//!    the commitment was made.
//! 3. **Reveal** - The player discloses the secret. The roll is
//!    `SHA-256(secret || entropy(H + 1) || player || H) mod 100`.
//!
//! Binding the player into the commitment stops one caller from replaying
//! another caller's digest. Neither the player (who fixed the secret before the
//! entropy existed) nor the block producer (who never sees the secret before the
//! reveal) can pick the roll.
//!
//! ## Quick bets
//!
//! [`quick_roll`] only mixes values visible while the enclosing block is being
//! built. Whoever proposes that block can compute the roll and drop outcomes
//! it dislikes. This is a reduced-security tier for small stakes.

use bullseye_types::execution::SECRET_LENGTH;
use bullseye_types::house::ROLL_MODULUS;
use commonware_cryptography::{
    ed25519::PublicKey,
    sha256::{Digest, Sha256},
    Hasher,
};
use commonware_utils::modulo;

/// Compute the commitment a player submits with [`bullseye_types::Instruction::CommitBet`].
pub fn compute_commitment(secret: &[u8; SECRET_LENGTH], player: &PublicKey) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.update(player.as_ref());
    hasher.finalize()
}

/// Returns `true` if `secret` opens `commitment` for `player`.
pub fn verify_reveal(
    commitment: &Digest,
    secret: &[u8; SECRET_LENGTH],
    player: &PublicKey,
) -> bool {
    &compute_commitment(secret, player) == commitment
}

/// Roll for a revealed bet.
///
/// `entropy` must be the beacon entropy of `commit_height + 1`.
pub fn reveal_roll(
    secret: &[u8; SECRET_LENGTH],
    entropy: &Digest,
    player: &PublicKey,
    commit_height: u64,
) -> u8 {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.update(entropy.as_ref());
    hasher.update(player.as_ref());
    hasher.update(&commit_height.to_be_bytes());
    reduce(&hasher.finalize())
}

/// Roll for a quick bet.
pub fn quick_roll(
    entropy: &Digest,
    timestamp_ms: u64,
    player: &PublicKey,
    game_counter: u64,
    previous_entropy: &Digest,
) -> u8 {
    let mut hasher = Sha256::new();
    hasher.update(entropy.as_ref());
    hasher.update(&timestamp_ms.to_be_bytes());
    hasher.update(player.as_ref());
    hasher.update(&game_counter.to_be_bytes());
    hasher.update(previous_entropy.as_ref());
    reduce(&hasher.finalize())
}

fn reduce(digest: &Digest) -> u8 {
    modulo(digest.as_ref(), ROLL_MODULUS) as u8
}
