use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use commonware_cryptography::ed25519::PublicKey;

use super::{BetError, GlobalStats, HouseTreasury, DEFAULT_MAX_BET, DEFAULT_MIN_BET, MAX_BET_CEILING};

/// Inclusive stake bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BetLimits {
    pub min_bet: u64,
    pub max_bet: u64,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            min_bet: DEFAULT_MIN_BET,
            max_bet: DEFAULT_MAX_BET,
        }
    }
}

impl BetLimits {
    pub fn new(min_bet: u64, max_bet: u64) -> Result<Self, BetError> {
        let limits = Self { min_bet, max_bet };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<(), BetError> {
        if self.min_bet == 0 || self.min_bet >= self.max_bet || self.max_bet > MAX_BET_CEILING {
            return Err(BetError::InvalidBetLimits {
                min_bet: self.min_bet,
                max_bet: self.max_bet,
            });
        }
        Ok(())
    }

    pub fn check(&self, stake: u64) -> Result<(), BetError> {
        if stake < self.min_bet {
            return Err(BetError::BetTooSmall {
                stake,
                min: self.min_bet,
            });
        }
        if stake > self.max_bet {
            return Err(BetError::BetTooLarge {
                stake,
                max: self.max_bet,
            });
        }
        Ok(())
    }
}

impl Write for BetLimits {
    fn write(&self, writer: &mut impl BufMut) {
        self.min_bet.write(writer);
        self.max_bet.write(writer);
    }
}

impl Read for BetLimits {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            min_bet: u64::read(reader)?,
            max_bet: u64::read(reader)?,
        })
    }
}

impl FixedSize for BetLimits {
    const SIZE: usize = u64::SIZE * 2;
}

/// Singleton house record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HouseState {
    pub owner: PublicKey,
    pub paused: bool,
    pub limits: BetLimits,
    pub treasury: HouseTreasury,
    pub stats: GlobalStats,
}

impl HouseState {
    pub fn new(owner: PublicKey, limits: BetLimits) -> Self {
        Self {
            owner,
            paused: false,
            limits,
            treasury: HouseTreasury::default(),
            stats: GlobalStats::default(),
        }
    }

    pub fn is_owner(&self, public: &PublicKey) -> bool {
        &self.owner == public
    }
}

impl Write for HouseState {
    fn write(&self, writer: &mut impl BufMut) {
        self.owner.write(writer);
        self.paused.write(writer);
        self.limits.write(writer);
        self.treasury.write(writer);
        self.stats.write(writer);
    }
}

impl Read for HouseState {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            owner: PublicKey::read(reader)?,
            paused: bool::read(reader)?,
            limits: BetLimits::read(reader)?,
            treasury: HouseTreasury::read(reader)?,
            stats: GlobalStats::read(reader)?,
        })
    }
}

impl FixedSize for HouseState {
    const SIZE: usize = PublicKey::SIZE
        + bool::SIZE
        + BetLimits::SIZE
        + HouseTreasury::SIZE
        + GlobalStats::SIZE;
}
