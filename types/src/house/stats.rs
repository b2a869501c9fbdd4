use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use serde::Serialize;

/// Per-player counters, updated once per resolved bet. Refunds are not games.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub games_played: u64,
    pub total_wagered: u64,
    pub total_won: u64,
}

impl PlayerStats {
    pub fn record(&mut self, stake: u64, payout: u64) {
        self.games_played = self.games_played.saturating_add(1);
        self.total_wagered = self.total_wagered.saturating_add(stake);
        self.total_won = self.total_won.saturating_add(payout);
    }
}

impl Write for PlayerStats {
    fn write(&self, writer: &mut impl BufMut) {
        self.games_played.write(writer);
        self.total_wagered.write(writer);
        self.total_won.write(writer);
    }
}

impl Read for PlayerStats {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            games_played: u64::read(reader)?,
            total_wagered: u64::read(reader)?,
            total_won: u64::read(reader)?,
        })
    }
}

impl FixedSize for PlayerStats {
    const SIZE: usize = u64::SIZE * 3;
}

/// House-wide mirror of [`PlayerStats`].
///
/// `games_played` doubles as the running game counter mixed into quick-bet
/// rolls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GlobalStats {
    pub games_played: u64,
    pub total_wagered: u64,
    pub total_paid_out: u64,
}

impl GlobalStats {
    pub fn record(&mut self, stake: u64, payout: u64) {
        self.games_played = self.games_played.saturating_add(1);
        self.total_wagered = self.total_wagered.saturating_add(stake);
        self.total_paid_out = self.total_paid_out.saturating_add(payout);
    }
}

impl Write for GlobalStats {
    fn write(&self, writer: &mut impl BufMut) {
        self.games_played.write(writer);
        self.total_wagered.write(writer);
        self.total_paid_out.write(writer);
    }
}

impl Read for GlobalStats {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            games_played: u64::read(reader)?,
            total_wagered: u64::read(reader)?,
            total_paid_out: u64::read(reader)?,
        })
    }
}

impl FixedSize for GlobalStats {
    const SIZE: usize = u64::SIZE * 3;
}
