use super::*;
use crate::{
    outcome::{max_payout, resolve},
    query::{load_pending_bet, player_stats},
    randomness::{quick_roll, reveal_roll, verify_reveal},
};
use anyhow::anyhow;
use bullseye_types::{
    execution::SECRET_LENGTH,
    house::{PendingBet, TreasuryError},
};
use tracing::{info, warn};

impl<'a, S: State> Layer<'a, S> {
    pub(in crate::layer) async fn handle_commit_bet(
        &mut self,
        public: &PublicKey,
        stake: u64,
        commitment: &Digest,
    ) -> Result<Vec<Event>> {
        let mut house = match self.house_or_rejected(public).await? {
            Ok(house) => house,
            Err(events) => return Ok(events),
        };
        if house.paused {
            return Ok(rejected(public, BetError::Paused));
        }
        if let Err(error) = house.limits.check(stake) {
            return Ok(rejected(public, error));
        }
        if let Some(bet) = load_pending_bet(self, public).await? {
            if !bet.resolved {
                return Ok(rejected(public, BetError::PendingBetExists));
            }
        }
        let mut account = self.get_account(public).await?;
        if account.balance < stake {
            return Ok(rejected(
                public,
                BetError::InsufficientBalance {
                    available: account.balance,
                    required: stake,
                },
            ));
        }

        // Reserve against a treasury that already holds the stake. On failure the
        // copy is dropped, so the stake is never taken.
        let reserved = max_payout(stake);
        let mut treasury = house.treasury;
        treasury
            .credit(stake)
            .context("credit stake to treasury")?;
        match treasury.reserve(reserved) {
            Ok(()) => {}
            Err(TreasuryError::InsufficientFunds {
                available,
                required,
            }) => {
                return Ok(rejected(
                    public,
                    BetError::InsufficientHouseBalance {
                        available,
                        required,
                    },
                ));
            }
            Err(err) => return Err(err).context("reserve liability"),
        }

        account.balance -= stake;
        house.treasury = treasury;
        let commit_height = self.height();
        self.insert(Key::Account(public.clone()), Value::Account(account));
        self.insert(Key::House, Value::House(house));
        self.insert(
            Key::PendingBet(public.clone()),
            Value::PendingBet(PendingBet::new(stake, commit_height, *commitment, reserved)),
        );

        info!(player = ?public, stake, reserved, commit_height, "bet committed");
        Ok(vec![Event::BetCommitted {
            player: public.clone(),
            stake,
            commit_height,
            reserved,
        }])
    }

    pub(in crate::layer) async fn handle_reveal_bet(
        &mut self,
        public: &PublicKey,
        secret: &[u8; SECRET_LENGTH],
    ) -> Result<Vec<Event>> {
        let mut house = match self.house_or_rejected(public).await? {
            Ok(house) => house,
            Err(events) => return Ok(events),
        };
        if house.paused {
            return Ok(rejected(public, BetError::Paused));
        }
        let mut bet = match load_pending_bet(self, public).await? {
            Some(bet) if !bet.resolved => bet,
            _ => return Ok(rejected(public, BetError::NoPendingBet)),
        };
        let height = self.height();
        if height < bet.earliest_reveal() {
            return Ok(rejected(
                public,
                BetError::RevealTooEarly {
                    current: height,
                    earliest: bet.earliest_reveal(),
                },
            ));
        }
        if height > bet.reveal_deadline() {
            return Ok(rejected(
                public,
                BetError::RevealTooLate {
                    current: height,
                    deadline: bet.reveal_deadline(),
                },
            ));
        }
        if !verify_reveal(&bet.commitment, secret, public) {
            return Ok(rejected(public, BetError::InvalidReveal));
        }

        // Resolve before any funds move.
        bet.resolved = true;
        self.insert(Key::PendingBet(public.clone()), Value::PendingBet(bet.clone()));
        house
            .treasury
            .release(bet.reserved)
            .context("release reserved liability")?;

        let entropy_height = bet.commit_height + 1;
        let entropy = self
            .entropy_at(entropy_height)
            .await?
            .ok_or_else(|| anyhow!("missing entropy for height {entropy_height}"))?;
        let roll = reveal_roll(secret, &entropy, public, bet.commit_height);
        let outcome = resolve(roll, bet.stake);

        let mut stats = player_stats(self, public).await?;
        stats.record(bet.stake, outcome.payout);
        house.stats.record(bet.stake, outcome.payout);
        house
            .treasury
            .debit(outcome.payout)
            .context("debit payout from treasury")?;
        self.insert(Key::PlayerStats(public.clone()), Value::PlayerStats(stats));
        self.insert(Key::House, Value::House(house));
        if outcome.payout > 0 {
            self.credit_account(public, outcome.payout).await?;
        }

        info!(
            player = ?public,
            stake = bet.stake,
            roll,
            tier = ?outcome.tier,
            payout = outcome.payout,
            "bet revealed"
        );
        Ok(vec![Event::BetRevealed {
            player: public.clone(),
            stake: bet.stake,
            roll,
            tier: outcome.tier,
            payout: outcome.payout,
        }])
    }

    /// Refunds stay available while the house is paused so stakes are never stranded.
    pub(in crate::layer) async fn handle_refund_expired_bet(
        &mut self,
        public: &PublicKey,
    ) -> Result<Vec<Event>> {
        let mut house = match self.house_or_rejected(public).await? {
            Ok(house) => house,
            Err(events) => return Ok(events),
        };
        let mut bet = match load_pending_bet(self, public).await? {
            Some(bet) if !bet.resolved => bet,
            _ => return Ok(rejected(public, BetError::NoPendingBet)),
        };
        let height = self.height();
        if height < bet.refundable_from() {
            return Ok(rejected(
                public,
                BetError::BetNotExpired {
                    current: height,
                    refundable_from: bet.refundable_from(),
                },
            ));
        }

        bet.resolved = true;
        self.insert(Key::PendingBet(public.clone()), Value::PendingBet(bet.clone()));
        house
            .treasury
            .release(bet.reserved)
            .context("release reserved liability")?;
        house
            .treasury
            .debit(bet.stake)
            .context("debit refund from treasury")?;
        self.insert(Key::House, Value::House(house));
        self.credit_account(public, bet.stake).await?;

        info!(player = ?public, stake = bet.stake, commit_height = bet.commit_height, "bet refunded");
        Ok(vec![Event::BetRefunded {
            player: public.clone(),
            stake: bet.stake,
        }])
    }

    /// Single-step bet. The roll only uses values the block proposer already
    /// knows, so this path is for small stakes.
    pub(in crate::layer) async fn handle_quick_bet(
        &mut self,
        public: &PublicKey,
        stake: u64,
    ) -> Result<Vec<Event>> {
        let mut house = match self.house_or_rejected(public).await? {
            Ok(house) => house,
            Err(events) => return Ok(events),
        };
        if house.paused {
            return Ok(rejected(public, BetError::Paused));
        }
        if let Err(error) = house.limits.check(stake) {
            return Ok(rejected(public, error));
        }
        let mut account = self.get_account(public).await?;
        if account.balance < stake {
            return Ok(rejected(
                public,
                BetError::InsufficientBalance {
                    available: account.balance,
                    required: stake,
                },
            ));
        }

        // Funds are accepted first; an underfunded house hands them straight back.
        account.balance -= stake;
        house
            .treasury
            .credit(stake)
            .context("credit stake to treasury")?;
        let required = max_payout(stake);
        match house.treasury.reserve(required) {
            Ok(()) => {}
            Err(TreasuryError::InsufficientFunds {
                available,
                required,
            }) => {
                house
                    .treasury
                    .debit(stake)
                    .context("return quick bet stake")?;
                account.balance += stake;
                self.insert(Key::Account(public.clone()), Value::Account(account));
                self.insert(Key::House, Value::House(house));

                warn!(player = ?public, stake, available, required, "house underfunded; quick bet refunded");
                return Ok(vec![Event::QuickBetRefunded {
                    player: public.clone(),
                    stake,
                    available,
                    required,
                }]);
            }
            Err(err) => return Err(err).context("reserve liability"),
        }
        house
            .treasury
            .release(required)
            .context("release reserved liability")?;

        let previous = self.previous_entropy().await?;
        let roll = quick_roll(
            &self.beacon.entropy,
            self.beacon.timestamp_ms,
            public,
            house.stats.games_played,
            &previous,
        );
        let outcome = resolve(roll, stake);

        let mut stats = player_stats(self, public).await?;
        stats.record(stake, outcome.payout);
        house.stats.record(stake, outcome.payout);
        house
            .treasury
            .debit(outcome.payout)
            .context("debit payout from treasury")?;
        self.insert(Key::Account(public.clone()), Value::Account(account));
        self.insert(Key::PlayerStats(public.clone()), Value::PlayerStats(stats));
        self.insert(Key::House, Value::House(house));
        if outcome.payout > 0 {
            self.credit_account(public, outcome.payout).await?;
        }

        info!(
            player = ?public,
            stake,
            roll,
            tier = ?outcome.tier,
            payout = outcome.payout,
            "quick bet resolved"
        );
        Ok(vec![Event::QuickBetResolved {
            player: public.clone(),
            stake,
            roll,
            tier: outcome.tier,
            payout: outcome.payout,
        }])
    }
}
