use anyhow::{Context as _, Result};
use bullseye_types::{
    execution::{Account, Beacon, Event, Instruction, Key, Output, Transaction, Value},
    genesis_entropy,
    house::{HouseState, REVEAL_TIMEOUT},
};
use commonware_cryptography::{ed25519::PublicKey, sha256::Digest};
use std::collections::BTreeMap;
use tracing::debug;

use crate::state::{load_account, validate_and_increment_nonce, PrepareError, State, Status};

mod handlers;

/// Pending changes for one block.
///
/// Transactions are applied one at a time against an overlay of `state`.
/// Nothing reaches `state` until the caller applies [`Layer::commit`], so a
/// hard error anywhere discards the whole block.
pub struct Layer<'a, S: State> {
    state: &'a S,
    pending: BTreeMap<Key, Status>,

    beacon: Beacon,
}

impl<'a, S: State> Layer<'a, S> {
    pub fn new(state: &'a S, beacon: Beacon) -> Self {
        Self {
            state,
            pending: BTreeMap::new(),

            beacon,
        }
    }

    pub fn height(&self) -> u64 {
        self.beacon.height
    }

    fn insert(&mut self, key: Key, value: Value) {
        self.pending.insert(key, Status::Update(value));
    }

    async fn prepare(&mut self, transaction: &Transaction) -> Result<(), PrepareError> {
        let mut account = load_account(self, &transaction.public)
            .await
            .map_err(PrepareError::State)?;
        validate_and_increment_nonce(&mut account, transaction.nonce)?;
        self.insert(
            Key::Account(transaction.public.clone()),
            Value::Account(account),
        );

        Ok(())
    }

    async fn apply(&mut self, transaction: &Transaction) -> Result<Vec<Event>> {
        let public = &transaction.public;

        match &transaction.instruction {
            Instruction::Initialize { min_bet, max_bet } => {
                self.handle_initialize(public, *min_bet, *max_bet).await
            }
            Instruction::Deposit { amount } => self.handle_deposit(public, *amount).await,
            Instruction::FundHouse { amount } => self.handle_fund_house(public, *amount).await,
            Instruction::CommitBet { stake, commitment } => {
                self.handle_commit_bet(public, *stake, commitment).await
            }
            Instruction::RevealBet { secret } => self.handle_reveal_bet(public, secret).await,
            Instruction::RefundExpiredBet => self.handle_refund_expired_bet(public).await,
            Instruction::QuickBet { stake } => self.handle_quick_bet(public, *stake).await,
            Instruction::WithdrawHouse { amount } => {
                self.handle_withdraw_house(public, *amount).await
            }
            Instruction::Pause => self.handle_set_paused(public, true).await,
            Instruction::Unpause => self.handle_set_paused(public, false).await,
            Instruction::UpdateBetLimits { min_bet, max_bet } => {
                self.handle_update_bet_limits(public, *min_bet, *max_bet)
                    .await
            }
            Instruction::TransferOwnership { new_owner } => {
                self.handle_transfer_ownership(public, new_owner).await
            }
        }
    }

    async fn get_house(&self) -> Result<Option<HouseState>> {
        crate::query::house_state(self).await
    }

    async fn get_account(&self, public: &PublicKey) -> Result<Account> {
        load_account(self, public).await
    }

    /// Entropy recorded for `height`, if it is still retained.
    async fn entropy_at(&self, height: u64) -> Result<Option<Digest>> {
        Ok(match self.get(&Key::BlockEntropy(height)).await? {
            Some(Value::BlockEntropy(entropy)) => Some(entropy),
            _ => None,
        })
    }

    async fn previous_entropy(&self) -> Result<Digest> {
        let previous = self.height().saturating_sub(1);
        Ok(self
            .entropy_at(previous)
            .await?
            .unwrap_or_else(genesis_entropy))
    }

    /// Record this block's entropy and forget entropy no bet can reference anymore.
    fn record_entropy(&mut self) {
        let height = self.height();
        self.insert(
            Key::BlockEntropy(height),
            Value::BlockEntropy(self.beacon.entropy),
        );
        if height > REVEAL_TIMEOUT {
            self.pending
                .insert(Key::BlockEntropy(height - REVEAL_TIMEOUT), Status::Delete);
        }
    }

    pub async fn execute(
        &mut self,
        transactions: Vec<Transaction>,
    ) -> Result<(Vec<Output>, BTreeMap<PublicKey, u64>)> {
        let mut processed_nonces = BTreeMap::new();
        let mut outputs = Vec::new();

        self.record_entropy();
        for tx in transactions {
            if !tx.verify() {
                debug!(public = ?tx.public, "invalid signature; dropping transaction");
                continue;
            }
            match self.prepare(&tx).await {
                Ok(()) => {}
                Err(PrepareError::NonceMismatch { expected, got }) => {
                    debug!(
                        public = ?tx.public,
                        expected,
                        got,
                        "nonce mismatch; dropping transaction"
                    );
                    continue;
                }
                Err(PrepareError::State(err)) => {
                    return Err(err).context("state error during prepare");
                }
            }
            processed_nonces.insert(tx.public.clone(), tx.nonce.saturating_add(1));
            outputs.extend(self.apply(&tx).await?.into_iter().map(Output::Event));
            outputs.push(Output::Transaction(tx));
        }

        Ok((outputs, processed_nonces))
    }

    pub fn commit(self) -> Vec<(Key, Status)> {
        self.pending.into_iter().collect()
    }
}

impl<'a, S: State> State for Layer<'a, S> {
    async fn get(&self, key: &Key) -> Result<Option<Value>> {
        Ok(match self.pending.get(key) {
            Some(Status::Update(value)) => Some(value.clone()),
            Some(Status::Delete) => None,
            None => self.state.get(key).await?,
        })
    }

    async fn insert(&mut self, key: Key, value: Value) -> Result<()> {
        self.pending.insert(key, Status::Update(value));
        Ok(())
    }

    async fn delete(&mut self, key: &Key) -> Result<()> {
        self.pending.insert(key.clone(), Status::Delete);
        Ok(())
    }
}
