/// Heights that must pass after a commit before the bet can be revealed.
/// A reveal is accepted once `height > commit_height + MIN_REVEAL_DELAY`.
pub const MIN_REVEAL_DELAY: u64 = 1;

/// Heights after the commit during which a reveal is still accepted.
/// Past `commit_height + REVEAL_TIMEOUT` the bet can only be refunded.
pub const REVEAL_TIMEOUT: u64 = 256;

/// Rolls strictly below this land in the bullseye.
pub const BULLSEYE_THRESHOLD: u8 = 15;

/// Rolls strictly below this (and not a bullseye) land on the ring.
pub const RING_THRESHOLD: u8 = 50;

/// Rolls are reduced into `[0, ROLL_MODULUS)`.
pub const ROLL_MODULUS: u64 = 100;

/// Bullseye payout as a fraction of the stake (1.9x).
pub const BULLSEYE_MULTIPLIER_NUMERATOR: u64 = 190;
pub const BULLSEYE_MULTIPLIER_DENOMINATOR: u64 = 100;

/// Ring payout divides the stake by this (0.5x).
pub const RING_DIVISOR: u64 = 2;

/// Default bet limits applied when none are configured.
pub const DEFAULT_MIN_BET: u64 = 500;
pub const DEFAULT_MAX_BET: u64 = 5_000;

/// Hard ceiling on `max_bet`.
pub const MAX_BET_CEILING: u64 = 1_000_000;

/// Largest single faucet deposit (dev mode only).
pub const FAUCET_MAX_DEPOSIT: u64 = 100_000;

/// Faucet rate limit in blocks.
pub const FAUCET_RATE_LIMIT: u64 = 100;
