//! Read-only views over [`State`].

use crate::state::{load_account, State};
use anyhow::Result;
use bullseye_types::{
    execution::{Key, Value},
    house::{GlobalStats, HouseState, PendingBet, PlayerStats},
};
use commonware_cryptography::ed25519::PublicKey;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HouseBalance {
    pub total: u64,
    pub available: u64,
    pub reserved: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PendingBetView {
    pub stake: u64,
    pub commit_height: u64,
    pub can_reveal: bool,
    pub can_refund: bool,
    pub resolved: bool,
}

/// Height of the last block applied to `state` (0 if none).
pub async fn state_height<S: State>(state: &S) -> Result<u64> {
    Ok(match state.get(&Key::Commit).await? {
        Some(Value::Commit { height }) => height,
        _ => 0,
    })
}

pub async fn house_state<S: State>(state: &S) -> Result<Option<HouseState>> {
    Ok(match state.get(&Key::House).await? {
        Some(Value::House(house)) => Some(house),
        _ => None,
    })
}

pub async fn house_balance<S: State>(state: &S) -> Result<HouseBalance> {
    Ok(house_state(state)
        .await?
        .map(|house| HouseBalance {
            total: house.treasury.total_balance,
            available: house.treasury.available(),
            reserved: house.treasury.reserved_liability,
        })
        .unwrap_or_default())
}

pub async fn global_stats<S: State>(state: &S) -> Result<GlobalStats> {
    Ok(house_state(state)
        .await?
        .map(|house| house.stats)
        .unwrap_or_default())
}

pub async fn player_stats<S: State>(state: &S, public: &PublicKey) -> Result<PlayerStats> {
    Ok(match state.get(&Key::PlayerStats(public.clone())).await? {
        Some(Value::PlayerStats(stats)) => stats,
        _ => PlayerStats::default(),
    })
}

pub(crate) async fn load_pending_bet<S: State>(
    state: &S,
    public: &PublicKey,
) -> Result<Option<PendingBet>> {
    Ok(match state.get(&Key::PendingBet(public.clone())).await? {
        Some(Value::PendingBet(bet)) => Some(bet),
        _ => None,
    })
}

/// The caller's bet slot as seen by the next block (`state_height + 1`), which is where a
/// reveal or refund submitted now would execute.
pub async fn pending_bet<S: State>(
    state: &S,
    public: &PublicKey,
) -> Result<Option<PendingBetView>> {
    let height = state_height(state).await?.saturating_add(1);
    pending_bet_at(state, public, height).await
}

/// The caller's bet slot as seen at `height`.
pub async fn pending_bet_at<S: State>(
    state: &S,
    public: &PublicKey,
    height: u64,
) -> Result<Option<PendingBetView>> {
    Ok(load_pending_bet(state, public)
        .await?
        .map(|bet| PendingBetView {
            stake: bet.stake,
            commit_height: bet.commit_height,
            can_reveal: bet.can_reveal(height),
            can_refund: bet.can_refund(height),
            resolved: bet.resolved,
        }))
}

pub async fn account_balance<S: State>(state: &S, public: &PublicKey) -> Result<u64> {
    Ok(load_account(state, public).await?.balance)
}
