//! Maps a roll in `[0, 100)` to a result tier and payout.
//!
//! Integer arithmetic only; every division truncates.

use bullseye_types::house::{
    Tier, BULLSEYE_MULTIPLIER_DENOMINATOR, BULLSEYE_MULTIPLIER_NUMERATOR, BULLSEYE_THRESHOLD,
    RING_DIVISOR, RING_THRESHOLD,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub tier: Tier,
    pub payout: u64,
}

/// Worst-case payout for `stake`. This is what gets reserved at commit.
pub fn max_payout(stake: u64) -> u64 {
    let payout = stake as u128 * BULLSEYE_MULTIPLIER_NUMERATOR as u128
        / BULLSEYE_MULTIPLIER_DENOMINATOR as u128;
    u64::try_from(payout).unwrap_or(u64::MAX)
}

pub fn resolve(roll: u8, stake: u64) -> Outcome {
    if roll < BULLSEYE_THRESHOLD {
        Outcome {
            tier: Tier::Bullseye,
            payout: max_payout(stake),
        }
    } else if roll < RING_THRESHOLD {
        Outcome {
            tier: Tier::Ring,
            payout: stake / RING_DIVISOR,
        }
    } else {
        Outcome {
            tier: Tier::Miss,
            payout: 0,
        }
    }
}
