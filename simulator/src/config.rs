use bullseye_types::{
    execution::MAX_BLOCK_TRANSACTIONS,
    house::{BetError, BetLimits, DEFAULT_MAX_BET, DEFAULT_MIN_BET, FAUCET_MAX_DEPOSIT},
};
use serde::{Deserialize, Serialize};
use std::{
    num::{NonZeroU64, NonZeroUsize},
    str::FromStr,
};
use thiserror::Error;
use tracing::Level;

/// Simulator configuration as read from YAML. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub min_bet: u64,
    pub max_bet: u64,
    /// Initial house bankroll, paid from the owner's faucet deposit.
    pub house_funding: u64,
    pub players: usize,
    /// Faucet amount each player requests when running low.
    pub player_funds: u64,
    pub blocks: u64,
    /// Share of new bets placed through the quick path.
    pub quick_bet_percent: u8,
    /// Share of committed bets that are never revealed.
    pub abandon_percent: u8,
    pub seed: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_bet: DEFAULT_MIN_BET,
            max_bet: DEFAULT_MAX_BET,
            house_funding: FAUCET_MAX_DEPOSIT,
            players: 8,
            player_funds: 50_000,
            blocks: 1_000,
            quick_bet_percent: 30,
            abandon_percent: 5,
            seed: 0,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bet limits")]
    InvalidBetLimits(#[source] BetError),
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("{field} must be a percentage (got {value})")]
    InvalidPercent { field: &'static str, value: u8 },
    #[error("{field} exceeds the faucet limit (got {value}, max {max})")]
    ExceedsFaucet {
        field: &'static str,
        value: u64,
        max: u64,
    },
    #[error("too many players for one block (got {players}, max {max})")]
    TooManyPlayers { players: usize, max: usize },
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
}

#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    pub limits: BetLimits,
    pub house_funding: u64,
    pub players: NonZeroUsize,
    pub player_funds: u64,
    pub blocks: NonZeroU64,
    pub quick_bet_percent: u8,
    pub abandon_percent: u8,
    pub seed: u64,
    pub log_level: Level,
}

fn nonzero_u64(field: &'static str, value: u64) -> Result<NonZeroU64, ConfigError> {
    NonZeroU64::new(value).ok_or(ConfigError::InvalidNonZero { field, value })
}

fn ensure_percent(field: &'static str, value: u8) -> Result<(), ConfigError> {
    if value > 100 {
        return Err(ConfigError::InvalidPercent { field, value });
    }
    Ok(())
}

fn ensure_faucet(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value > FAUCET_MAX_DEPOSIT {
        return Err(ConfigError::ExceedsFaucet {
            field,
            value,
            max: FAUCET_MAX_DEPOSIT,
        });
    }
    Ok(())
}

impl Config {
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let limits =
            BetLimits::new(self.min_bet, self.max_bet).map_err(ConfigError::InvalidBetLimits)?;

        let house_funding = nonzero_u64("house_funding", self.house_funding)?.get();
        ensure_faucet("house_funding", house_funding)?;
        let player_funds = nonzero_u64("player_funds", self.player_funds)?.get();
        ensure_faucet("player_funds", player_funds)?;

        let players = NonZeroUsize::new(self.players).ok_or(ConfigError::InvalidNonZero {
            field: "players",
            value: 0,
        })?;
        // Setup packs the owner's transactions and one per player into the first block.
        let max = MAX_BLOCK_TRANSACTIONS - 3;
        if players.get() > max {
            return Err(ConfigError::TooManyPlayers {
                players: players.get(),
                max,
            });
        }

        let blocks = nonzero_u64("blocks", self.blocks)?;
        ensure_percent("quick_bet_percent", self.quick_bet_percent)?;
        ensure_percent("abandon_percent", self.abandon_percent)?;

        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        Ok(ValidatedConfig {
            limits,
            house_funding,
            players,
            player_funds,
            blocks,
            quick_bet_percent: self.quick_bet_percent,
            abandon_percent: self.abandon_percent,
            seed: self.seed,
            log_level,
        })
    }
}
