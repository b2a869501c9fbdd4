use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};
use commonware_cryptography::{
    ed25519::{self, PublicKey},
    sha256::Digest,
    Signer, Verifier,
};
use commonware_utils::union;

use crate::house::{BetError, HouseState, PendingBet, PlayerStats, Tier};

pub const NAMESPACE: &[u8] = b"_BULLSEYE";
pub const TRANSACTION_SUFFIX: &[u8] = b"_TX";
pub const MAX_BLOCK_TRANSACTIONS: usize = 500;

/// Length of a bet secret in bytes.
pub const SECRET_LENGTH: usize = 32;

#[inline]
pub fn transaction_namespace(namespace: &[u8]) -> Vec<u8> {
    union(namespace, TRANSACTION_SUFFIX)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub nonce: u64,
    pub instruction: Instruction,

    pub public: ed25519::PublicKey,
    pub signature: ed25519::Signature,
}

impl Transaction {
    fn payload(nonce: &u64, instruction: &Instruction) -> Vec<u8> {
        let mut payload = Vec::new();
        nonce.write(&mut payload);
        instruction.write(&mut payload);

        payload
    }

    pub fn sign(private: &ed25519::PrivateKey, nonce: u64, instruction: Instruction) -> Self {
        let signature = private.sign(
            &transaction_namespace(NAMESPACE),
            &Self::payload(&nonce, &instruction),
        );

        Self {
            nonce,
            instruction,
            public: private.public_key(),
            signature,
        }
    }

    pub fn verify(&self) -> bool {
        self.public.verify(
            &transaction_namespace(NAMESPACE),
            &Self::payload(&self.nonce, &self.instruction),
            &self.signature,
        )
    }
}

impl Write for Transaction {
    fn write(&self, writer: &mut impl BufMut) {
        self.nonce.write(writer);
        self.instruction.write(writer);
        self.public.write(writer);
        self.signature.write(writer);
    }
}

impl Read for Transaction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let nonce = u64::read(reader)?;
        let instruction = Instruction::read(reader)?;
        let public = ed25519::PublicKey::read(reader)?;
        let signature = ed25519::Signature::read(reader)?;

        Ok(Self {
            nonce,
            instruction,
            public,
            signature,
        })
    }
}

impl EncodeSize for Transaction {
    fn encode_size(&self) -> usize {
        self.nonce.encode_size()
            + self.instruction.encode_size()
            + self.public.encode_size()
            + self.signature.encode_size()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Create the house with the sender as owner.
    /// Binary: [0] [minBet:u64 BE] [maxBet:u64 BE]
    Initialize { min_bet: u64, max_bet: u64 },

    /// Faucet deposit into the sender's account (dev mode only).
    /// Binary: [1] [amount:u64 BE]
    Deposit { amount: u64 },

    /// Move funds from the sender's account into the house.
    /// Binary: [2] [amount:u64 BE]
    FundHouse { amount: u64 },

    /// Open a bet bound to `SHA-256(secret || sender)`.
    /// Binary: [3] [stake:u64 BE] [commitment:32]
    CommitBet { stake: u64, commitment: Digest },

    /// Resolve the sender's open bet.
    /// Binary: [4] [secret:32]
    RevealBet { secret: [u8; SECRET_LENGTH] },

    /// Reclaim the stake of the sender's expired bet.
    /// Binary: [5]
    RefundExpiredBet,

    /// Single-step bet resolved against current block entropy.
    /// Binary: [6] [stake:u64 BE]
    QuickBet { stake: u64 },

    /// Owner withdrawal of unreserved funds.
    /// Binary: [7] [amount:u64 BE]
    WithdrawHouse { amount: u64 },

    /// Binary: [8]
    Pause,

    /// Binary: [9]
    Unpause,

    /// Binary: [10] [minBet:u64 BE] [maxBet:u64 BE]
    UpdateBetLimits { min_bet: u64, max_bet: u64 },

    /// Binary: [11] [newOwner:32]
    TransferOwnership { new_owner: PublicKey },
}

impl Write for Instruction {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Initialize { min_bet, max_bet } => {
                0u8.write(writer);
                min_bet.write(writer);
                max_bet.write(writer);
            }
            Self::Deposit { amount } => {
                1u8.write(writer);
                amount.write(writer);
            }
            Self::FundHouse { amount } => {
                2u8.write(writer);
                amount.write(writer);
            }
            Self::CommitBet { stake, commitment } => {
                3u8.write(writer);
                stake.write(writer);
                commitment.write(writer);
            }
            Self::RevealBet { secret } => {
                4u8.write(writer);
                writer.put_slice(secret);
            }
            Self::RefundExpiredBet => 5u8.write(writer),
            Self::QuickBet { stake } => {
                6u8.write(writer);
                stake.write(writer);
            }
            Self::WithdrawHouse { amount } => {
                7u8.write(writer);
                amount.write(writer);
            }
            Self::Pause => 8u8.write(writer),
            Self::Unpause => 9u8.write(writer),
            Self::UpdateBetLimits { min_bet, max_bet } => {
                10u8.write(writer);
                min_bet.write(writer);
                max_bet.write(writer);
            }
            Self::TransferOwnership { new_owner } => {
                11u8.write(writer);
                new_owner.write(writer);
            }
        }
    }
}

impl Read for Instruction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        let instruction = match kind {
            0 => Self::Initialize {
                min_bet: u64::read(reader)?,
                max_bet: u64::read(reader)?,
            },
            1 => Self::Deposit {
                amount: u64::read(reader)?,
            },
            2 => Self::FundHouse {
                amount: u64::read(reader)?,
            },
            3 => Self::CommitBet {
                stake: u64::read(reader)?,
                commitment: Digest::read(reader)?,
            },
            4 => {
                if reader.remaining() < SECRET_LENGTH {
                    return Err(Error::EndOfBuffer);
                }
                let mut secret = [0u8; SECRET_LENGTH];
                reader.copy_to_slice(&mut secret);
                Self::RevealBet { secret }
            }
            5 => Self::RefundExpiredBet,
            6 => Self::QuickBet {
                stake: u64::read(reader)?,
            },
            7 => Self::WithdrawHouse {
                amount: u64::read(reader)?,
            },
            8 => Self::Pause,
            9 => Self::Unpause,
            10 => Self::UpdateBetLimits {
                min_bet: u64::read(reader)?,
                max_bet: u64::read(reader)?,
            },
            11 => Self::TransferOwnership {
                new_owner: PublicKey::read(reader)?,
            },
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(instruction)
    }
}

impl EncodeSize for Instruction {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Initialize { .. } | Self::UpdateBetLimits { .. } => u64::SIZE * 2,
                Self::Deposit { .. }
                | Self::FundHouse { .. }
                | Self::QuickBet { .. }
                | Self::WithdrawHouse { .. } => u64::SIZE,
                Self::CommitBet { .. } => u64::SIZE + Digest::SIZE,
                Self::RevealBet { .. } => SECRET_LENGTH,
                Self::RefundExpiredBet | Self::Pause | Self::Unpause => 0,
                Self::TransferOwnership { .. } => PublicKey::SIZE,
            }
    }
}

/// Per-block context supplied by the host.
///
/// `entropy` must be unknowable before the block is produced (for example the
/// hash of a threshold signature over the height).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Beacon {
    pub height: u64,
    pub timestamp_ms: u64,
    pub entropy: Digest,
}

impl Write for Beacon {
    fn write(&self, writer: &mut impl BufMut) {
        self.height.write(writer);
        self.timestamp_ms.write(writer);
        self.entropy.write(writer);
    }
}

impl Read for Beacon {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            height: u64::read(reader)?,
            timestamp_ms: u64::read(reader)?,
            entropy: Digest::read(reader)?,
        })
    }
}

impl FixedSize for Beacon {
    const SIZE: usize = u64::SIZE * 2 + Digest::SIZE;
}

/// Account for nonce tracking and the funds the caller can stake.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Account {
    pub nonce: u64,
    pub balance: u64,
    /// Height of the last faucet deposit (0 if never).
    pub last_deposit_height: u64,
}

impl Write for Account {
    fn write(&self, writer: &mut impl BufMut) {
        self.nonce.write(writer);
        self.balance.write(writer);
        self.last_deposit_height.write(writer);
    }
}

impl Read for Account {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            nonce: u64::read(reader)?,
            balance: u64::read(reader)?,
            last_deposit_height: u64::read(reader)?,
        })
    }
}

impl FixedSize for Account {
    const SIZE: usize = u64::SIZE * 3;
}

#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Debug)]
pub enum Key {
    Account(PublicKey),
    House,
    PendingBet(PublicKey),
    PlayerStats(PublicKey),
    BlockEntropy(u64),
    Commit,
}

impl Write for Key {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Account(account) => {
                0u8.write(writer);
                account.write(writer);
            }
            Self::House => 1u8.write(writer),
            Self::PendingBet(player) => {
                2u8.write(writer);
                player.write(writer);
            }
            Self::PlayerStats(player) => {
                3u8.write(writer);
                player.write(writer);
            }
            Self::BlockEntropy(height) => {
                4u8.write(writer);
                height.write(writer);
            }
            Self::Commit => 5u8.write(writer),
        }
    }
}

impl Read for Key {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        let key = match kind {
            0 => Self::Account(PublicKey::read(reader)?),
            1 => Self::House,
            2 => Self::PendingBet(PublicKey::read(reader)?),
            3 => Self::PlayerStats(PublicKey::read(reader)?),
            4 => Self::BlockEntropy(u64::read(reader)?),
            5 => Self::Commit,
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(key)
    }
}

impl EncodeSize for Key {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Account(_) | Self::PendingBet(_) | Self::PlayerStats(_) => PublicKey::SIZE,
                Self::BlockEntropy(_) => u64::SIZE,
                Self::House | Self::Commit => 0,
            }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum Value {
    Account(Account),
    House(HouseState),
    PendingBet(PendingBet),
    PlayerStats(PlayerStats),
    BlockEntropy(Digest),
    Commit { height: u64 },
}

impl Write for Value {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Account(account) => {
                0u8.write(writer);
                account.write(writer);
            }
            Self::House(house) => {
                1u8.write(writer);
                house.write(writer);
            }
            Self::PendingBet(bet) => {
                2u8.write(writer);
                bet.write(writer);
            }
            Self::PlayerStats(stats) => {
                3u8.write(writer);
                stats.write(writer);
            }
            Self::BlockEntropy(entropy) => {
                4u8.write(writer);
                entropy.write(writer);
            }
            Self::Commit { height } => {
                5u8.write(writer);
                height.write(writer);
            }
        }
    }
}

impl Read for Value {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        let value = match kind {
            0 => Self::Account(Account::read(reader)?),
            1 => Self::House(HouseState::read(reader)?),
            2 => Self::PendingBet(PendingBet::read(reader)?),
            3 => Self::PlayerStats(PlayerStats::read(reader)?),
            4 => Self::BlockEntropy(Digest::read(reader)?),
            5 => Self::Commit {
                height: u64::read(reader)?,
            },
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(value)
    }
}

impl EncodeSize for Value {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Account(_) => Account::SIZE,
                Self::House(_) => HouseState::SIZE,
                Self::PendingBet(_) => PendingBet::SIZE,
                Self::PlayerStats(_) => PlayerStats::SIZE,
                Self::BlockEntropy(_) => Digest::SIZE,
                Self::Commit { .. } => u64::SIZE,
            }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    HouseInitialized {
        owner: PublicKey,
        min_bet: u64,
        max_bet: u64,
    },
    Deposited {
        player: PublicKey,
        amount: u64,
        balance: u64,
    },
    HouseFunded {
        funder: PublicKey,
        amount: u64,
        total_balance: u64,
    },
    BetCommitted {
        player: PublicKey,
        stake: u64,
        commit_height: u64,
        reserved: u64,
    },
    BetRevealed {
        player: PublicKey,
        stake: u64,
        roll: u8,
        tier: Tier,
        payout: u64,
    },
    BetRefunded {
        player: PublicKey,
        stake: u64,
    },
    QuickBetResolved {
        player: PublicKey,
        stake: u64,
        roll: u8,
        tier: Tier,
        payout: u64,
    },
    /// House could not cover the worst case; the stake went straight back.
    QuickBetRefunded {
        player: PublicKey,
        stake: u64,
        available: u64,
        required: u64,
    },
    HouseWithdrawn {
        owner: PublicKey,
        amount: u64,
        total_balance: u64,
    },
    PauseChanged {
        paused: bool,
    },
    BetLimitsUpdated {
        min_bet: u64,
        max_bet: u64,
    },
    OwnershipTransferred {
        previous: PublicKey,
        owner: PublicKey,
    },
    BetRejected {
        player: PublicKey,
        error: BetError,
    },
}

impl Write for Event {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::HouseInitialized {
                owner,
                min_bet,
                max_bet,
            } => {
                0u8.write(writer);
                owner.write(writer);
                min_bet.write(writer);
                max_bet.write(writer);
            }
            Self::Deposited {
                player,
                amount,
                balance,
            } => {
                1u8.write(writer);
                player.write(writer);
                amount.write(writer);
                balance.write(writer);
            }
            Self::HouseFunded {
                funder,
                amount,
                total_balance,
            } => {
                2u8.write(writer);
                funder.write(writer);
                amount.write(writer);
                total_balance.write(writer);
            }
            Self::BetCommitted {
                player,
                stake,
                commit_height,
                reserved,
            } => {
                3u8.write(writer);
                player.write(writer);
                stake.write(writer);
                commit_height.write(writer);
                reserved.write(writer);
            }
            Self::BetRevealed {
                player,
                stake,
                roll,
                tier,
                payout,
            } => {
                4u8.write(writer);
                player.write(writer);
                stake.write(writer);
                roll.write(writer);
                tier.write(writer);
                payout.write(writer);
            }
            Self::BetRefunded { player, stake } => {
                5u8.write(writer);
                player.write(writer);
                stake.write(writer);
            }
            Self::QuickBetResolved {
                player,
                stake,
                roll,
                tier,
                payout,
            } => {
                6u8.write(writer);
                player.write(writer);
                stake.write(writer);
                roll.write(writer);
                tier.write(writer);
                payout.write(writer);
            }
            Self::QuickBetRefunded {
                player,
                stake,
                available,
                required,
            } => {
                7u8.write(writer);
                player.write(writer);
                stake.write(writer);
                available.write(writer);
                required.write(writer);
            }
            Self::HouseWithdrawn {
                owner,
                amount,
                total_balance,
            } => {
                8u8.write(writer);
                owner.write(writer);
                amount.write(writer);
                total_balance.write(writer);
            }
            Self::PauseChanged { paused } => {
                9u8.write(writer);
                paused.write(writer);
            }
            Self::BetLimitsUpdated { min_bet, max_bet } => {
                10u8.write(writer);
                min_bet.write(writer);
                max_bet.write(writer);
            }
            Self::OwnershipTransferred { previous, owner } => {
                11u8.write(writer);
                previous.write(writer);
                owner.write(writer);
            }
            Self::BetRejected { player, error } => {
                12u8.write(writer);
                player.write(writer);
                error.write(writer);
            }
        }
    }
}

impl Read for Event {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        let event = match kind {
            0 => Self::HouseInitialized {
                owner: PublicKey::read(reader)?,
                min_bet: u64::read(reader)?,
                max_bet: u64::read(reader)?,
            },
            1 => Self::Deposited {
                player: PublicKey::read(reader)?,
                amount: u64::read(reader)?,
                balance: u64::read(reader)?,
            },
            2 => Self::HouseFunded {
                funder: PublicKey::read(reader)?,
                amount: u64::read(reader)?,
                total_balance: u64::read(reader)?,
            },
            3 => Self::BetCommitted {
                player: PublicKey::read(reader)?,
                stake: u64::read(reader)?,
                commit_height: u64::read(reader)?,
                reserved: u64::read(reader)?,
            },
            4 => Self::BetRevealed {
                player: PublicKey::read(reader)?,
                stake: u64::read(reader)?,
                roll: u8::read(reader)?,
                tier: Tier::read(reader)?,
                payout: u64::read(reader)?,
            },
            5 => Self::BetRefunded {
                player: PublicKey::read(reader)?,
                stake: u64::read(reader)?,
            },
            6 => Self::QuickBetResolved {
                player: PublicKey::read(reader)?,
                stake: u64::read(reader)?,
                roll: u8::read(reader)?,
                tier: Tier::read(reader)?,
                payout: u64::read(reader)?,
            },
            7 => Self::QuickBetRefunded {
                player: PublicKey::read(reader)?,
                stake: u64::read(reader)?,
                available: u64::read(reader)?,
                required: u64::read(reader)?,
            },
            8 => Self::HouseWithdrawn {
                owner: PublicKey::read(reader)?,
                amount: u64::read(reader)?,
                total_balance: u64::read(reader)?,
            },
            9 => Self::PauseChanged {
                paused: bool::read(reader)?,
            },
            10 => Self::BetLimitsUpdated {
                min_bet: u64::read(reader)?,
                max_bet: u64::read(reader)?,
            },
            11 => Self::OwnershipTransferred {
                previous: PublicKey::read(reader)?,
                owner: PublicKey::read(reader)?,
            },
            12 => Self::BetRejected {
                player: PublicKey::read(reader)?,
                error: BetError::read(reader)?,
            },
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(event)
    }
}

impl EncodeSize for Event {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::HouseInitialized { .. }
                | Self::Deposited { .. }
                | Self::HouseFunded { .. }
                | Self::HouseWithdrawn { .. } => PublicKey::SIZE + u64::SIZE * 2,
                Self::BetCommitted { .. } => PublicKey::SIZE + u64::SIZE * 3,
                Self::BetRevealed { .. } | Self::QuickBetResolved { .. } => {
                    PublicKey::SIZE + u64::SIZE * 2 + u8::SIZE + Tier::SIZE
                }
                Self::BetRefunded { .. } => PublicKey::SIZE + u64::SIZE,
                Self::QuickBetRefunded { .. } => PublicKey::SIZE + u64::SIZE * 3,
                Self::PauseChanged { .. } => bool::SIZE,
                Self::BetLimitsUpdated { .. } => u64::SIZE * 2,
                Self::OwnershipTransferred { .. } => PublicKey::SIZE * 2,
                Self::BetRejected { error, .. } => PublicKey::SIZE + error.encode_size(),
            }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Event(Event),
    Transaction(Transaction),
    Commit { height: u64 },
}

impl Write for Output {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Event(event) => {
                0u8.write(writer);
                event.write(writer);
            }
            Self::Transaction(transaction) => {
                1u8.write(writer);
                transaction.write(writer);
            }
            Self::Commit { height } => {
                2u8.write(writer);
                height.write(writer);
            }
        }
    }
}

impl Read for Output {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Self::Event(Event::read(reader)?)),
            1 => Ok(Self::Transaction(Transaction::read(reader)?)),
            2 => Ok(Self::Commit {
                height: u64::read(reader)?,
            }),
            _ => Err(Error::InvalidEnum(kind)),
        }
    }
}

impl EncodeSize for Output {
    fn encode_size(&self) -> usize {
        1 + match self {
            Self::Event(event) => event.encode_size(),
            Self::Transaction(transaction) => transaction.encode_size(),
            Self::Commit { height } => height.encode_size(),
        }
    }
}
