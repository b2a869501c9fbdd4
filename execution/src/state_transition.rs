//! Apply a block's transactions to state.
//!
//! Blocks are applied exactly once and in height order. Re-submitting an already applied height
//! is a no-op so a host can safely replay after a crash.

use crate::{query::state_height, Layer, State};
use anyhow::{anyhow, Context as _};
use bullseye_types::execution::{
    Beacon, Key, Output, Transaction, Value, MAX_BLOCK_TRANSACTIONS,
};
use commonware_cryptography::ed25519::PublicKey;
use std::collections::BTreeMap;
use tracing::debug;

/// Result of executing a block's state transition
pub struct StateTransitionResult {
    pub height: u64,
    /// Events and included transactions, terminated by [`Output::Commit`]. Empty for a replay.
    pub outputs: Vec<Output>,
    /// Map of public keys to their next expected nonce after processing
    pub processed_nonces: BTreeMap<PublicKey, u64>,
}

/// Execute state transition for a block
///
/// Only processes the block if it's the next expected height.
pub async fn execute_state_transition<S: State>(
    state: &mut S,
    beacon: Beacon,
    transactions: Vec<Transaction>,
) -> anyhow::Result<StateTransitionResult> {
    let height = beacon.height;
    let state_height = state_height(state).await.context("read state height")?;

    // If this is not the next expected height, either treat as a no-op (already processed),
    // or fail (height gap) to avoid silently skipping blocks.
    if height <= state_height {
        debug!(height, state_height, "block already applied; skipping");
        return Ok(StateTransitionResult {
            height,
            outputs: Vec::new(),
            processed_nonces: BTreeMap::new(),
        });
    }
    let expected_next_height = state_height.saturating_add(1);
    if height != expected_next_height {
        return Err(anyhow!(
            "non-sequential height: state_height={state_height}, expected={expected_next_height}, requested={height}"
        ));
    }
    if transactions.len() > MAX_BLOCK_TRANSACTIONS {
        return Err(anyhow!(
            "too many transactions (height={height}, count={}, max={MAX_BLOCK_TRANSACTIONS})",
            transactions.len()
        ));
    }

    let mut layer = Layer::new(state, beacon);
    let (mut outputs, processed_nonces) = layer
        .execute(transactions)
        .await
        .with_context(|| format!("execute layer (height={height})"))?;
    let changes = layer.commit();

    state
        .apply(changes)
        .await
        .with_context(|| format!("apply state changes (height={height})"))?;
    state
        .insert(Key::Commit, Value::Commit { height })
        .await
        .with_context(|| format!("commit state (height={height})"))?;
    outputs.push(Output::Commit { height });

    Ok(StateTransitionResult {
        height,
        outputs,
        processed_nonces,
    })
}
