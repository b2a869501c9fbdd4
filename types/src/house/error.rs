use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use thiserror::Error as ThisError;

/// Why an instruction was rejected.
///
/// Rejections never mutate state. Each variant carries the values a caller
/// needs to decide whether to retry, wait, or give up.
#[derive(Clone, Debug, ThisError, PartialEq, Eq)]
pub enum BetError {
    #[error("house is paused")]
    Paused,
    #[error("house has not been initialized")]
    NotInitialized,
    #[error("house is already initialized")]
    AlreadyInitialized,
    #[error("caller is not the house owner")]
    Unauthorized,
    #[error("stake below minimum (stake={stake}, min={min})")]
    BetTooSmall { stake: u64, min: u64 },
    #[error("stake above maximum (stake={stake}, max={max})")]
    BetTooLarge { stake: u64, max: u64 },
    #[error("caller already has an open bet")]
    PendingBetExists,
    #[error("caller has no open bet")]
    NoPendingBet,
    #[error("insufficient balance (available={available}, required={required})")]
    InsufficientBalance { available: u64, required: u64 },
    #[error("house cannot cover payout (available={available}, required={required})")]
    InsufficientHouseBalance { available: u64, required: u64 },
    #[error("reveal too early (current={current}, earliest={earliest})")]
    RevealTooEarly { current: u64, earliest: u64 },
    #[error("reveal too late (current={current}, deadline={deadline})")]
    RevealTooLate { current: u64, deadline: u64 },
    #[error("secret does not match commitment")]
    InvalidReveal,
    #[error("bet not expired (current={current}, refundable_from={refundable_from})")]
    BetNotExpired { current: u64, refundable_from: u64 },
    #[error("withdrawal exceeds available funds (requested={requested}, available={available})")]
    ExceedsAvailable { requested: u64, available: u64 },
    #[error("invalid bet limits (min={min_bet}, max={max_bet})")]
    InvalidBetLimits { min_bet: u64, max_bet: u64 },
    #[error("house is already paused")]
    AlreadyPaused,
    #[error("house is not paused")]
    NotPaused,
    #[error("amount must be non-zero")]
    ZeroAmount,
    #[error("faucet cooldown active (next_height={next_height})")]
    FaucetRateLimited { next_height: u64 },
    #[error("faucet deposit too large (amount={amount}, max={max})")]
    FaucetLimitExceeded { amount: u64, max: u64 },
}

impl Write for BetError {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Paused => 0u8.write(writer),
            Self::NotInitialized => 1u8.write(writer),
            Self::AlreadyInitialized => 2u8.write(writer),
            Self::Unauthorized => 3u8.write(writer),
            Self::BetTooSmall { stake, min } => {
                4u8.write(writer);
                stake.write(writer);
                min.write(writer);
            }
            Self::BetTooLarge { stake, max } => {
                5u8.write(writer);
                stake.write(writer);
                max.write(writer);
            }
            Self::PendingBetExists => 6u8.write(writer),
            Self::NoPendingBet => 7u8.write(writer),
            Self::InsufficientBalance {
                available,
                required,
            } => {
                8u8.write(writer);
                available.write(writer);
                required.write(writer);
            }
            Self::InsufficientHouseBalance {
                available,
                required,
            } => {
                9u8.write(writer);
                available.write(writer);
                required.write(writer);
            }
            Self::RevealTooEarly { current, earliest } => {
                10u8.write(writer);
                current.write(writer);
                earliest.write(writer);
            }
            Self::RevealTooLate { current, deadline } => {
                11u8.write(writer);
                current.write(writer);
                deadline.write(writer);
            }
            Self::InvalidReveal => 12u8.write(writer),
            Self::BetNotExpired {
                current,
                refundable_from,
            } => {
                13u8.write(writer);
                current.write(writer);
                refundable_from.write(writer);
            }
            Self::ExceedsAvailable {
                requested,
                available,
            } => {
                14u8.write(writer);
                requested.write(writer);
                available.write(writer);
            }
            Self::InvalidBetLimits { min_bet, max_bet } => {
                15u8.write(writer);
                min_bet.write(writer);
                max_bet.write(writer);
            }
            Self::AlreadyPaused => 16u8.write(writer),
            Self::NotPaused => 17u8.write(writer),
            Self::ZeroAmount => 18u8.write(writer),
            Self::FaucetRateLimited { next_height } => {
                19u8.write(writer);
                next_height.write(writer);
            }
            Self::FaucetLimitExceeded { amount, max } => {
                20u8.write(writer);
                amount.write(writer);
                max.write(writer);
            }
        }
    }
}

impl Read for BetError {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        let error = match kind {
            0 => Self::Paused,
            1 => Self::NotInitialized,
            2 => Self::AlreadyInitialized,
            3 => Self::Unauthorized,
            4 => Self::BetTooSmall {
                stake: u64::read(reader)?,
                min: u64::read(reader)?,
            },
            5 => Self::BetTooLarge {
                stake: u64::read(reader)?,
                max: u64::read(reader)?,
            },
            6 => Self::PendingBetExists,
            7 => Self::NoPendingBet,
            8 => Self::InsufficientBalance {
                available: u64::read(reader)?,
                required: u64::read(reader)?,
            },
            9 => Self::InsufficientHouseBalance {
                available: u64::read(reader)?,
                required: u64::read(reader)?,
            },
            10 => Self::RevealTooEarly {
                current: u64::read(reader)?,
                earliest: u64::read(reader)?,
            },
            11 => Self::RevealTooLate {
                current: u64::read(reader)?,
                deadline: u64::read(reader)?,
            },
            12 => Self::InvalidReveal,
            13 => Self::BetNotExpired {
                current: u64::read(reader)?,
                refundable_from: u64::read(reader)?,
            },
            14 => Self::ExceedsAvailable {
                requested: u64::read(reader)?,
                available: u64::read(reader)?,
            },
            15 => Self::InvalidBetLimits {
                min_bet: u64::read(reader)?,
                max_bet: u64::read(reader)?,
            },
            16 => Self::AlreadyPaused,
            17 => Self::NotPaused,
            18 => Self::ZeroAmount,
            19 => Self::FaucetRateLimited {
                next_height: u64::read(reader)?,
            },
            20 => Self::FaucetLimitExceeded {
                amount: u64::read(reader)?,
                max: u64::read(reader)?,
            },
            i => return Err(Error::InvalidEnum(i)),
        };
        Ok(error)
    }
}

impl EncodeSize for BetError {
    fn encode_size(&self) -> usize {
        1 + match self {
            Self::Paused
            | Self::NotInitialized
            | Self::AlreadyInitialized
            | Self::Unauthorized
            | Self::PendingBetExists
            | Self::NoPendingBet
            | Self::InvalidReveal
            | Self::AlreadyPaused
            | Self::NotPaused
            | Self::ZeroAmount => 0,
            Self::FaucetRateLimited { .. } => u64::SIZE,
            Self::BetTooSmall { .. }
            | Self::BetTooLarge { .. }
            | Self::InsufficientBalance { .. }
            | Self::InsufficientHouseBalance { .. }
            | Self::RevealTooEarly { .. }
            | Self::RevealTooLate { .. }
            | Self::BetNotExpired { .. }
            | Self::ExceedsAvailable { .. }
            | Self::InvalidBetLimits { .. }
            | Self::FaucetLimitExceeded { .. } => 2 * u64::SIZE,
        }
    }
}

/// Accounting violations raised by [`super::HouseTreasury`].
#[derive(Clone, Copy, Debug, ThisError, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("insufficient funds (available={available}, required={required})")]
    InsufficientFunds { available: u64, required: u64 },
    #[error("release exceeds reserved liability (release={amount}, reserved={reserved})")]
    ReleaseUnderflow { amount: u64, reserved: u64 },
    #[error("debit would dip into reserved liability (amount={amount}, available={available})")]
    DebitExceedsAvailable { amount: u64, available: u64 },
    #[error("treasury balance overflow")]
    Overflow,
}
