//! Block-by-block workload driver for the Bullseye engine.
//!
//! Runs a seeded population of players against an in-memory state: commit/reveal bets, quick
//! bets and bets that are abandoned and later refunded. The reserve invariant is checked after
//! every block and a [`Report`] summarizes the run.

use anyhow::{bail, Context as _, Result};
use bullseye_execution::{
    mocks::{commit_instruction, create_secret, execute_block, MockAccount},
    query::{account_balance, global_stats, house_balance, house_state, HouseBalance},
    Memory,
};
use bullseye_types::{
    execution::{Event, Instruction, Output, Transaction, SECRET_LENGTH},
    house::{GlobalStats, Tier, FAUCET_RATE_LIMIT, MIN_REVEAL_DELAY, REVEAL_TIMEOUT},
};
use commonware_cryptography::ed25519::PublicKey;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

mod config;
pub use config::{Config, ConfigError, ValidatedConfig};

const OWNER_SEED: u64 = 0;
const PROGRESS_INTERVAL: u64 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TierCounts {
    pub bullseye: u64,
    pub ring: u64,
    pub miss: u64,
}

impl TierCounts {
    fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Bullseye => self.bullseye += 1,
            Tier::Ring => self.ring += 1,
            Tier::Miss => self.miss += 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Report {
    pub blocks: u64,
    pub bets_committed: u64,
    pub bets_revealed: u64,
    pub bets_refunded: u64,
    pub quick_bets: u64,
    pub quick_bets_refunded: u64,
    pub rejections: u64,
    pub tiers: TierCounts,
    pub total_wagered: u64,
    pub total_paid_out: u64,
    /// Share of settled stakes kept by the house.
    pub house_edge: f64,
    pub max_reserved: u64,
    pub house: HouseBalance,
    /// Counters as recorded by the engine.
    pub stats: GlobalStats,
}

struct OpenBet {
    commit_height: u64,
    abandoned: bool,
}

enum Action {
    Idle,
    Deposit,
    Commit {
        secret: [u8; SECRET_LENGTH],
        abandoned: bool,
    },
    Reveal,
    Refund,
    Quick,
}

struct Player {
    account: MockAccount,
    secret: [u8; SECRET_LENGTH],
    open: Option<OpenBet>,
    pending_commit: Option<bool>,
    last_deposit: u64,
}

pub struct Simulator {
    config: ValidatedConfig,
    state: Memory,
    height: u64,
    rng: ChaCha20Rng,
    owner: MockAccount,
    players: Vec<Player>,
    index: BTreeMap<PublicKey, usize>,
    report: Report,
}

impl Simulator {
    pub fn new(config: ValidatedConfig) -> Self {
        let players: Vec<Player> = (1..=config.players.get() as u64)
            .map(|seed| Player {
                account: MockAccount::new(seed),
                secret: [0u8; SECRET_LENGTH],
                open: None,
                pending_commit: None,
                last_deposit: 0,
            })
            .collect();
        let index = players
            .iter()
            .enumerate()
            .map(|(i, player)| (player.account.public.clone(), i))
            .collect();
        Self {
            rng: ChaCha20Rng::seed_from_u64(config.seed),
            config,
            state: Memory::default(),
            height: 0,
            owner: MockAccount::new(OWNER_SEED),
            players,
            index,
            report: Report::default(),
        }
    }

    /// Runs setup plus the configured number of blocks.
    pub async fn run(mut self) -> Result<Report> {
        self.setup().await.context("setup block")?;
        for _ in 0..self.config.blocks.get() {
            let transactions = self.plan_block().await?;
            self.block(transactions).await?;
            if self.height % PROGRESS_INTERVAL == 0 {
                let house = house_balance(&self.state).await?;
                info!(
                    height = self.height,
                    total = house.total,
                    reserved = house.reserved,
                    wagered = self.report.total_wagered,
                    paid_out = self.report.total_paid_out,
                    "progress"
                );
            }
        }
        self.finish().await
    }

    async fn setup(&mut self) -> Result<()> {
        let limits = self.config.limits;
        let mut transactions = vec![
            self.owner.sign(Instruction::Initialize {
                min_bet: limits.min_bet,
                max_bet: limits.max_bet,
            }),
            self.owner.sign(Instruction::Deposit {
                amount: self.config.house_funding,
            }),
            self.owner.sign(Instruction::FundHouse {
                amount: self.config.house_funding,
            }),
        ];
        for player in self.players.iter_mut() {
            transactions.push(player.account.sign(Instruction::Deposit {
                amount: self.config.player_funds,
            }));
        }
        self.block(transactions).await?;
        if house_state(&self.state).await?.is_none() {
            bail!("house was not initialized");
        }
        info!(
            players = self.players.len(),
            house_funding = self.config.house_funding,
            "house deployed"
        );
        Ok(())
    }

    async fn plan_block(&mut self) -> Result<Vec<Transaction>> {
        let height = self.height + 1;
        let mut transactions = Vec::new();
        for i in 0..self.players.len() {
            let balance = account_balance(&self.state, &self.players[i].account.public).await?;
            let action = self.choose(i, height, balance);
            let limits = self.config.limits;
            let stakes = limits.min_bet..=limits.max_bet.min(balance);
            let player = &mut self.players[i];
            let instruction = match action {
                Action::Idle => continue,
                Action::Deposit => Instruction::Deposit {
                    amount: self.config.player_funds,
                },
                Action::Commit { secret, abandoned } => {
                    let stake = self.rng.gen_range(stakes);
                    player.secret = secret;
                    player.pending_commit = Some(abandoned);
                    commit_instruction(stake, &secret, &player.account.public)
                }
                Action::Reveal => Instruction::RevealBet {
                    secret: player.secret,
                },
                Action::Refund => Instruction::RefundExpiredBet,
                Action::Quick => Instruction::QuickBet {
                    stake: self.rng.gen_range(stakes),
                },
            };
            transactions.push(player.account.sign(instruction));
        }
        Ok(transactions)
    }

    fn choose(&mut self, i: usize, height: u64, balance: u64) -> Action {
        let player = &self.players[i];
        if let Some(open) = &player.open {
            let earliest = open.commit_height + MIN_REVEAL_DELAY + 1;
            let deadline = open.commit_height + REVEAL_TIMEOUT;
            if !open.abandoned && (earliest..=deadline).contains(&height) {
                return Action::Reveal;
            }
            if height > deadline {
                return Action::Refund;
            }
            return Action::Idle;
        }
        if balance < self.config.limits.min_bet {
            if height >= player.last_deposit + FAUCET_RATE_LIMIT {
                return Action::Deposit;
            }
            return Action::Idle;
        }
        if self.rng.gen_range(0..100u8) < self.config.quick_bet_percent {
            return Action::Quick;
        }
        Action::Commit {
            secret: create_secret(&mut self.rng),
            abandoned: self.rng.gen_range(0..100u8) < self.config.abandon_percent,
        }
    }

    async fn block(&mut self, transactions: Vec<Transaction>) -> Result<()> {
        self.height += 1;
        let height = self.height;
        let result = execute_block(&mut self.state, height, transactions)
            .await
            .with_context(|| format!("execute block {height}"))?;
        for output in result.outputs {
            if let Output::Event(event) = output {
                self.observe(height, event);
            }
        }
        for player in self.players.iter_mut() {
            player.pending_commit = None;
        }
        self.check_solvency().await?;
        self.report.blocks = height;
        Ok(())
    }

    fn player_mut(&mut self, public: &PublicKey) -> Option<&mut Player> {
        let i = *self.index.get(public)?;
        self.players.get_mut(i)
    }

    fn observe(&mut self, height: u64, event: Event) {
        match event {
            Event::Deposited { player, .. } => {
                if let Some(player) = self.player_mut(&player) {
                    player.last_deposit = height;
                }
            }
            Event::BetCommitted {
                player,
                commit_height,
                ..
            } => {
                self.report.bets_committed += 1;
                if let Some(player) = self.player_mut(&player) {
                    let abandoned = player.pending_commit.unwrap_or(false);
                    player.open = Some(OpenBet {
                        commit_height,
                        abandoned,
                    });
                }
            }
            Event::BetRevealed {
                player,
                stake,
                tier,
                payout,
                ..
            } => {
                self.report.bets_revealed += 1;
                self.settle(stake, tier, payout);
                if let Some(player) = self.player_mut(&player) {
                    player.open = None;
                }
            }
            Event::BetRefunded { player, .. } => {
                self.report.bets_refunded += 1;
                if let Some(player) = self.player_mut(&player) {
                    player.open = None;
                }
            }
            Event::QuickBetResolved {
                stake,
                tier,
                payout,
                ..
            } => {
                self.report.quick_bets += 1;
                self.settle(stake, tier, payout);
            }
            Event::QuickBetRefunded { .. } => self.report.quick_bets_refunded += 1,
            Event::BetRejected { player, error } => {
                debug!(height, ?player, %error, "instruction rejected");
                self.report.rejections += 1;
            }
            _ => {}
        }
    }

    fn settle(&mut self, stake: u64, tier: Tier, payout: u64) {
        self.report.tiers.record(tier);
        self.report.total_wagered += stake;
        self.report.total_paid_out += payout;
    }

    async fn check_solvency(&mut self) -> Result<()> {
        let Some(house) = house_state(&self.state).await? else {
            return Ok(());
        };
        let treasury = house.treasury;
        if !treasury.is_solvent() {
            bail!(
                "reserved liability {} exceeds balance {} at height {}",
                treasury.reserved_liability,
                treasury.total_balance,
                self.height
            );
        }
        self.report.max_reserved = self.report.max_reserved.max(treasury.reserved_liability);
        Ok(())
    }

    async fn finish(mut self) -> Result<Report> {
        self.report.house = house_balance(&self.state).await?;
        self.report.stats = global_stats(&self.state).await?;
        if self.report.total_wagered > 0 {
            let kept = self.report.total_wagered as f64 - self.report.total_paid_out as f64;
            self.report.house_edge = kept / self.report.total_wagered as f64;
        }
        info!(
            blocks = self.report.blocks,
            wagered = self.report.total_wagered,
            paid_out = self.report.total_paid_out,
            house_edge = self.report.house_edge,
            "simulation complete"
        );
        Ok(self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonware_runtime::{deterministic::Runner, Runner as _};

    fn run(config: Config) -> Report {
        let config = config.validate().unwrap();
        Runner::default().start(|_| async move { Simulator::new(config).run().await.unwrap() })
    }

    #[test]
    fn test_mixed_workload_stays_solvent() {
        let report = run(Config {
            players: 4,
            blocks: 400,
            abandon_percent: 20,
            seed: 7,
            ..Config::default()
        });
        assert_eq!(report.blocks, 401);
        assert!(report.bets_revealed > 0);
        assert!(report.quick_bets > 0);
        assert!(report.bets_refunded > 0);
        assert!(report.house.reserved <= report.house.total);
        let settled = report.tiers.bullseye + report.tiers.ring + report.tiers.miss;
        assert_eq!(settled, report.bets_revealed + report.quick_bets);
        assert_eq!(report.stats.games_played, settled);
        assert_eq!(report.stats.total_wagered, report.total_wagered);
        assert_eq!(report.stats.total_paid_out, report.total_paid_out);
    }

    #[test]
    fn test_abandoned_bets_are_refunded() {
        let report = run(Config {
            players: 2,
            // Commits land at height 2 and become refundable at 259.
            blocks: 258,
            quick_bet_percent: 0,
            abandon_percent: 100,
            ..Config::default()
        });
        assert_eq!(report.bets_revealed, 0);
        assert_eq!(report.bets_committed, 2);
        assert_eq!(report.bets_refunded, 2);
        assert_eq!(report.total_wagered, 0);
        assert_eq!(report.house.reserved, 0);
    }

    #[test]
    fn test_same_seed_same_report() {
        let config = Config {
            players: 3,
            blocks: 150,
            seed: 11,
            ..Config::default()
        };
        assert_eq!(run(config.clone()), run(config));
    }
}
