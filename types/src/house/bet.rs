use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use commonware_cryptography::sha256::Digest;

use super::{MIN_REVEAL_DELAY, REVEAL_TIMEOUT};

/// Result tier of a resolved bet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tier {
    Bullseye = 0,
    Ring = 1,
    Miss = 2,
}

impl Write for Tier {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Tier {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Tier::Bullseye),
            1 => Ok(Tier::Ring),
            2 => Ok(Tier::Miss),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for Tier {
    const SIZE: usize = 1;
}

/// A caller's bet slot.
///
/// Holds at most one live bet. A resolved entry stays in place until the
/// caller's next commit overwrites it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingBet {
    pub stake: u64,
    pub commit_height: u64,
    pub commitment: Digest,
    /// Liability reserved at commit; released verbatim on reveal or refund.
    pub reserved: u64,
    pub resolved: bool,
}

impl PendingBet {
    pub fn new(stake: u64, commit_height: u64, commitment: Digest, reserved: u64) -> Self {
        Self {
            stake,
            commit_height,
            commitment,
            reserved,
            resolved: false,
        }
    }

    /// First height at which a reveal is accepted.
    pub fn earliest_reveal(&self) -> u64 {
        self.commit_height
            .saturating_add(MIN_REVEAL_DELAY)
            .saturating_add(1)
    }

    /// Last height at which a reveal is accepted.
    pub fn reveal_deadline(&self) -> u64 {
        self.commit_height.saturating_add(REVEAL_TIMEOUT)
    }

    /// First height at which a refund is accepted.
    pub fn refundable_from(&self) -> u64 {
        self.reveal_deadline().saturating_add(1)
    }

    pub fn can_reveal(&self, height: u64) -> bool {
        !self.resolved && height >= self.earliest_reveal() && height <= self.reveal_deadline()
    }

    pub fn can_refund(&self, height: u64) -> bool {
        !self.resolved && height >= self.refundable_from()
    }
}

impl Write for PendingBet {
    fn write(&self, writer: &mut impl BufMut) {
        self.stake.write(writer);
        self.commit_height.write(writer);
        self.commitment.write(writer);
        self.reserved.write(writer);
        self.resolved.write(writer);
    }
}

impl Read for PendingBet {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            stake: u64::read(reader)?,
            commit_height: u64::read(reader)?,
            commitment: Digest::read(reader)?,
            reserved: u64::read(reader)?,
            resolved: bool::read(reader)?,
        })
    }
}

impl FixedSize for PendingBet {
    const SIZE: usize = u64::SIZE * 3 + Digest::SIZE + bool::SIZE;
}
