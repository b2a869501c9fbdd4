use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};

use super::TreasuryError;

/// Funds custodied by the house.
///
/// `total_balance` counts every unit the house holds, including the part
/// earmarked for open bets. `reserved_liability` is the sum of worst-case
/// payouts over all open bets and never exceeds `total_balance`. All mutation
/// goes through the methods below so that invariant is checked in one place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HouseTreasury {
    pub total_balance: u64,
    pub reserved_liability: u64,
}

impl HouseTreasury {
    /// Funds not earmarked for open bets.
    pub fn available(&self) -> u64 {
        self.total_balance.saturating_sub(self.reserved_liability)
    }

    /// Amount an owner may withdraw. Floored at zero.
    pub fn withdrawable(&self) -> u64 {
        self.available()
    }

    /// Earmark `amount` against an open bet.
    pub fn reserve(&mut self, amount: u64) -> Result<(), TreasuryError> {
        let available = self.available();
        if available < amount {
            return Err(TreasuryError::InsufficientFunds {
                available,
                required: amount,
            });
        }
        self.reserved_liability += amount;
        Ok(())
    }

    /// Return a previous reservation of exactly `amount`.
    pub fn release(&mut self, amount: u64) -> Result<(), TreasuryError> {
        if amount > self.reserved_liability {
            return Err(TreasuryError::ReleaseUnderflow {
                amount,
                reserved: self.reserved_liability,
            });
        }
        self.reserved_liability -= amount;
        Ok(())
    }

    /// Take custody of `amount` (a stake or house funding).
    pub fn credit(&mut self, amount: u64) -> Result<(), TreasuryError> {
        self.total_balance = self
            .total_balance
            .checked_add(amount)
            .ok_or(TreasuryError::Overflow)?;
        Ok(())
    }

    /// Pay `amount` out of unreserved funds.
    pub fn debit(&mut self, amount: u64) -> Result<(), TreasuryError> {
        let available = self.available();
        if amount > available {
            return Err(TreasuryError::DebitExceedsAvailable { amount, available });
        }
        self.total_balance -= amount;
        Ok(())
    }

    pub fn is_solvent(&self) -> bool {
        self.reserved_liability <= self.total_balance
    }
}

impl Write for HouseTreasury {
    fn write(&self, writer: &mut impl BufMut) {
        self.total_balance.write(writer);
        self.reserved_liability.write(writer);
    }
}

impl Read for HouseTreasury {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let total_balance = u64::read(reader)?;
        let reserved_liability = u64::read(reader)?;
        if reserved_liability > total_balance {
            return Err(Error::Invalid(
                "HouseTreasury",
                "reserved liability exceeds total balance",
            ));
        }
        Ok(Self {
            total_balance,
            reserved_liability,
        })
    }
}

impl FixedSize for HouseTreasury {
    const SIZE: usize = u64::SIZE * 2;
}
