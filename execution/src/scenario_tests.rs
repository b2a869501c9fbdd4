use crate::{
    mocks::{beacon_entropy, commit_instruction, execute_block, MockAccount},
    query::{
        account_balance, global_stats, house_balance, pending_bet, pending_bet_at, player_stats,
        HouseBalance,
    },
    randomness::{compute_commitment, reveal_roll},
    state::Memory,
};
use bullseye_types::{
    execution::{Event, Instruction, Output, Transaction, SECRET_LENGTH},
    house::{BetError, Tier, REVEAL_TIMEOUT},
};
use commonware_cryptography::{ed25519::PublicKey, sha256::Sha256, Hasher};
use commonware_runtime::{deterministic::Runner, Runner as _};

const PLAYER_FUNDS: u64 = 10_000;
const STAKE: u64 = 1_000;

struct Harness {
    state: Memory,
    height: u64,
    owner: MockAccount,
    player: MockAccount,
}

impl Harness {
    /// Block 1 creates the house (limits 500..=5000), funds it with `house_funding` and gives
    /// the player `PLAYER_FUNDS`.
    async fn new(house_funding: u64) -> Self {
        let mut harness = Self {
            state: Memory::default(),
            height: 0,
            owner: MockAccount::new(0),
            player: MockAccount::new(1),
        };
        let mut txs = vec![
            harness.owner.sign(Instruction::Initialize {
                min_bet: 500,
                max_bet: 5_000,
            }),
            harness.owner.sign(Instruction::Deposit { amount: 100_000 }),
        ];
        if house_funding > 0 {
            txs.push(harness.owner.sign(Instruction::FundHouse {
                amount: house_funding,
            }));
        }
        txs.push(harness.player.sign(Instruction::Deposit {
            amount: PLAYER_FUNDS,
        }));
        let events = harness.block(txs).await;
        assert!(events
            .iter()
            .all(|event| !matches!(event, Event::BetRejected { .. })));
        harness
    }

    async fn block(&mut self, transactions: Vec<Transaction>) -> Vec<Event> {
        self.height += 1;
        let result = execute_block(&mut self.state, self.height, transactions)
            .await
            .unwrap();
        result
            .outputs
            .into_iter()
            .filter_map(|output| match output {
                Output::Event(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    /// Execute empty blocks until the next block is `height`.
    async fn advance_to(&mut self, height: u64) {
        while self.height + 1 < height {
            self.block(vec![]).await;
        }
    }

    async fn player_tx(&mut self, instruction: Instruction) -> Vec<Event> {
        let tx = self.player.sign(instruction);
        self.block(vec![tx]).await
    }

    async fn owner_tx(&mut self, instruction: Instruction) -> Vec<Event> {
        let tx = self.owner.sign(instruction);
        self.block(vec![tx]).await
    }

    async fn balance(&self) -> HouseBalance {
        house_balance(&self.state).await.unwrap()
    }

    async fn funds(&self, public: &PublicKey) -> u64 {
        account_balance(&self.state, public).await.unwrap()
    }
}

fn rejection(player: &PublicKey, error: BetError) -> Vec<Event> {
    vec![Event::BetRejected {
        player: player.clone(),
        error,
    }]
}

/// Finds a secret whose reveal rolls `target` for a bet committed at `commit_height`.
fn secret_for_roll(player: &PublicKey, commit_height: u64, target: u8) -> [u8; SECRET_LENGTH] {
    let entropy = beacon_entropy(commit_height + 1);
    (0u64..)
        .map(|i| Sha256::hash(&i.to_be_bytes()).0)
        .find(|secret| reveal_roll(secret, &entropy, player, commit_height) == target)
        .unwrap()
}

async fn commit_and_reveal(roll: u8, tier: Tier, payout: u64) -> Harness {
    let mut h = Harness::new(10_000).await;
    let player = h.player.public.clone();
    let secret = secret_for_roll(&player, 2, roll);

    let events = h.player_tx(commit_instruction(STAKE, &secret, &player)).await;
    assert_eq!(
        events,
        vec![Event::BetCommitted {
            player: player.clone(),
            stake: STAKE,
            commit_height: 2,
            reserved: 1_900,
        }]
    );
    assert_eq!(
        h.balance().await,
        HouseBalance {
            total: 11_000,
            available: 9_100,
            reserved: 1_900,
        }
    );
    assert_eq!(h.funds(&player).await, PLAYER_FUNDS - STAKE);

    let events = h.player_tx(Instruction::RevealBet { secret }).await;
    assert_eq!(
        events,
        rejection(
            &player,
            BetError::RevealTooEarly {
                current: 3,
                earliest: 4
            }
        )
    );

    let events = h.player_tx(Instruction::RevealBet { secret }).await;
    assert_eq!(
        events,
        vec![Event::BetRevealed {
            player: player.clone(),
            stake: STAKE,
            roll,
            tier,
            payout,
        }]
    );
    assert_eq!(h.balance().await.reserved, 0);
    assert_eq!(h.funds(&player).await, PLAYER_FUNDS - STAKE + payout);
    assert_eq!(h.balance().await.total, 11_000 - payout);

    let stats = player_stats(&h.state, &player).await.unwrap();
    assert_eq!(stats.games_played, 1);
    assert_eq!(stats.total_wagered, STAKE);
    assert_eq!(stats.total_won, payout);
    let global = global_stats(&h.state).await.unwrap();
    assert_eq!(global.games_played, 1);
    assert_eq!(global.total_paid_out, payout);
    h
}

#[test]
fn test_bullseye_pays_190_percent() {
    Runner::default().start(|_| async move {
        commit_and_reveal(10, Tier::Bullseye, 1_900).await;
    });
}

#[test]
fn test_ring_pays_half() {
    Runner::default().start(|_| async move {
        commit_and_reveal(30, Tier::Ring, 500).await;
    });
}

#[test]
fn test_miss_keeps_stake() {
    Runner::default().start(|_| async move {
        commit_and_reveal(70, Tier::Miss, 0).await;
    });
}

#[test]
fn test_underfunded_house_rejects_commit() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(500).await;
        let player = h.player.public.clone();
        let secret = [7u8; SECRET_LENGTH];

        let events = h.player_tx(commit_instruction(STAKE, &secret, &player)).await;
        assert_eq!(
            events,
            rejection(
                &player,
                BetError::InsufficientHouseBalance {
                    available: 1_500,
                    required: 1_900,
                }
            )
        );
        assert_eq!(h.funds(&player).await, PLAYER_FUNDS);
        assert_eq!(
            h.balance().await,
            HouseBalance {
                total: 500,
                available: 500,
                reserved: 0,
            }
        );
        assert!(pending_bet(&h.state, &player)
            .await
            .unwrap()
            .is_none());
    });
}

#[test]
fn test_timeout_blocks_reveal_and_allows_refund() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let player = h.player.public.clone();
        let secret = [3u8; SECRET_LENGTH];
        h.player_tx(commit_instruction(STAKE, &secret, &player)).await;

        // Still inside the window at the deadline.
        h.advance_to(2 + REVEAL_TIMEOUT).await;
        let events = h.player_tx(Instruction::RefundExpiredBet).await;
        assert_eq!(
            events,
            rejection(
                &player,
                BetError::BetNotExpired {
                    current: 258,
                    refundable_from: 259,
                }
            )
        );

        h.advance_to(302).await;
        let events = h.player_tx(Instruction::RevealBet { secret }).await;
        assert_eq!(
            events,
            rejection(
                &player,
                BetError::RevealTooLate {
                    current: 302,
                    deadline: 258,
                }
            )
        );

        let events = h.player_tx(Instruction::RefundExpiredBet).await;
        assert_eq!(
            events,
            vec![Event::BetRefunded {
                player: player.clone(),
                stake: STAKE,
            }]
        );
        assert_eq!(h.funds(&player).await, PLAYER_FUNDS);
        assert_eq!(
            h.balance().await,
            HouseBalance {
                total: 10_000,
                available: 10_000,
                reserved: 0,
            }
        );
        // Refunds are not games.
        assert_eq!(player_stats(&h.state, &player).await.unwrap().games_played, 0);

        // Terminal: neither transition can run twice.
        let events = h.player_tx(Instruction::RefundExpiredBet).await;
        assert_eq!(events, rejection(&player, BetError::NoPendingBet));
        let events = h.player_tx(Instruction::RevealBet { secret }).await;
        assert_eq!(events, rejection(&player, BetError::NoPendingBet));
    });
}

#[test]
fn test_reveal_at_deadline_succeeds() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let player = h.player.public.clone();
        let secret = [5u8; SECRET_LENGTH];
        h.player_tx(commit_instruction(STAKE, &secret, &player)).await;

        h.advance_to(2 + REVEAL_TIMEOUT).await;
        let events = h.player_tx(Instruction::RevealBet { secret }).await;
        assert!(matches!(events.as_slice(), [Event::BetRevealed { .. }]));

        // Once revealed the bet can never be refunded.
        h.advance_to(400).await;
        let events = h.player_tx(Instruction::RefundExpiredBet).await;
        assert_eq!(events, rejection(&player, BetError::NoPendingBet));
    });
}

#[test]
fn test_withdraw_cannot_touch_reserved() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let owner = h.owner.public.clone();
        let player = h.player.public.clone();
        let secret = secret_for_roll(&player, 2, 0);
        h.player_tx(commit_instruction(STAKE, &secret, &player)).await;
        let owner_funds = h.funds(&owner).await;

        let events = h.owner_tx(Instruction::WithdrawHouse { amount: 9_101 }).await;
        assert_eq!(
            events,
            rejection(
                &owner,
                BetError::ExceedsAvailable {
                    requested: 9_101,
                    available: 9_100,
                }
            )
        );
        assert_eq!(h.balance().await.total, 11_000);

        let events = h.owner_tx(Instruction::WithdrawHouse { amount: 9_100 }).await;
        assert_eq!(
            events,
            vec![Event::HouseWithdrawn {
                owner: owner.clone(),
                amount: 9_100,
                total_balance: 1_900,
            }]
        );
        assert_eq!(h.funds(&owner).await, owner_funds + 9_100);

        // The reserve still covers a bullseye.
        let events = h.player_tx(Instruction::RevealBet { secret }).await;
        assert!(matches!(
            events.as_slice(),
            [Event::BetRevealed {
                tier: Tier::Bullseye,
                payout: 1_900,
                ..
            }]
        ));
        assert_eq!(h.balance().await, HouseBalance::default());
    });
}

#[test]
fn test_one_open_bet_per_player() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let player = h.player.public.clone();
        let secret = [1u8; SECRET_LENGTH];
        h.player_tx(commit_instruction(STAKE, &secret, &player)).await;
        let before = h.balance().await;

        let events = h
            .player_tx(commit_instruction(2_000, &[2u8; SECRET_LENGTH], &player))
            .await;
        assert_eq!(events, rejection(&player, BetError::PendingBetExists));
        assert_eq!(h.balance().await, before);
        assert_eq!(h.funds(&player).await, PLAYER_FUNDS - STAKE);

        // After resolving, the slot accepts a new bet.
        h.player_tx(Instruction::RevealBet { secret }).await;
        let events = h
            .player_tx(commit_instruction(2_000, &[2u8; SECRET_LENGTH], &player))
            .await;
        assert!(matches!(
            events.as_slice(),
            [Event::BetCommitted { stake: 2_000, .. }]
        ));
    });
}

#[test]
fn test_wrong_secret_leaves_bet_open() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let player = h.player.public.clone();
        let secret = [9u8; SECRET_LENGTH];
        h.player_tx(commit_instruction(STAKE, &secret, &player)).await;
        h.advance_to(4).await;

        let events = h
            .player_tx(Instruction::RevealBet {
                secret: [8u8; SECRET_LENGTH],
            })
            .await;
        assert_eq!(events, rejection(&player, BetError::InvalidReveal));
        assert_eq!(h.balance().await.reserved, 1_900);
        let view = pending_bet(&h.state, &player)
            .await
            .unwrap()
            .unwrap();
        assert!(view.can_reveal);
        assert!(!view.can_refund);
        assert!(!view.resolved);

        let events = h.player_tx(Instruction::RevealBet { secret }).await;
        assert!(matches!(events.as_slice(), [Event::BetRevealed { .. }]));
        let view = pending_bet(&h.state, &player)
            .await
            .unwrap()
            .unwrap();
        assert!(view.resolved);
        assert!(!view.can_reveal);
        assert!(!view.can_refund);
    });
}

#[test]
fn test_commitment_cannot_be_replayed_by_another_player() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let alice = h.player.public.clone();
        let mut bob = MockAccount::new(2);
        let secret = [4u8; SECRET_LENGTH];

        let deposit = bob.sign(Instruction::Deposit {
            amount: PLAYER_FUNDS,
        });
        h.block(vec![deposit]).await;

        // Bob copies Alice's digest.
        let stolen = Instruction::CommitBet {
            stake: STAKE,
            commitment: compute_commitment(&secret, &alice),
        };
        let alice_commit = h.player.sign(stolen.clone());
        let bob_commit = bob.sign(stolen);
        h.block(vec![alice_commit, bob_commit]).await;
        let reveal_height = h.height + 3;
        h.advance_to(reveal_height).await;

        // Alice reveals first; Bob learns the secret but cannot open his copy with it.
        let alice_reveal = h.player.sign(Instruction::RevealBet { secret });
        let bob_reveal = bob.sign(Instruction::RevealBet { secret });
        let events = h.block(vec![alice_reveal, bob_reveal]).await;
        assert!(matches!(events[0], Event::BetRevealed { .. }));
        assert_eq!(
            events[1],
            Event::BetRejected {
                player: bob.public.clone(),
                error: BetError::InvalidReveal,
            }
        );
    });
}

#[test]
fn test_bet_limits_enforced() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let player = h.player.public.clone();
        let secret = [1u8; SECRET_LENGTH];

        let events = h.player_tx(commit_instruction(499, &secret, &player)).await;
        assert_eq!(
            events,
            rejection(&player, BetError::BetTooSmall { stake: 499, min: 500 })
        );
        let events = h.player_tx(commit_instruction(5_001, &secret, &player)).await;
        assert_eq!(
            events,
            rejection(
                &player,
                BetError::BetTooLarge {
                    stake: 5_001,
                    max: 5_000
                }
            )
        );
        let events = h.player_tx(Instruction::QuickBet { stake: 499 }).await;
        assert_eq!(
            events,
            rejection(&player, BetError::BetTooSmall { stake: 499, min: 500 })
        );
        let events = h.player_tx(commit_instruction(5_000, &secret, &player)).await;
        assert!(matches!(events.as_slice(), [Event::BetCommitted { .. }]));
    });
}

#[test]
fn test_commit_requires_player_funds() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let mut broke = MockAccount::new(3);
        let instruction = commit_instruction(STAKE, &[1u8; SECRET_LENGTH], &broke.public);
        let tx = broke.sign(instruction);
        let events = h.block(vec![tx]).await;
        assert_eq!(
            events,
            rejection(
                &broke.public,
                BetError::InsufficientBalance {
                    available: 0,
                    required: STAKE,
                }
            )
        );
    });
}

#[test]
fn test_pause_blocks_betting_but_not_refunds() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let player = h.player.public.clone();
        let secret = [6u8; SECRET_LENGTH];
        h.player_tx(commit_instruction(STAKE, &secret, &player)).await;

        let events = h.owner_tx(Instruction::Pause).await;
        assert_eq!(events, vec![Event::PauseChanged { paused: true }]);
        let events = h.owner_tx(Instruction::Pause).await;
        assert_eq!(events, rejection(&h.owner.public, BetError::AlreadyPaused));

        let events = h.player_tx(Instruction::RevealBet { secret }).await;
        assert_eq!(events, rejection(&player, BetError::Paused));
        let events = h.player_tx(Instruction::QuickBet { stake: STAKE }).await;
        assert_eq!(events, rejection(&player, BetError::Paused));

        h.advance_to(2 + REVEAL_TIMEOUT + 1).await;
        let events = h.player_tx(Instruction::RefundExpiredBet).await;
        assert_eq!(
            events,
            vec![Event::BetRefunded {
                player: player.clone(),
                stake: STAKE,
            }]
        );

        let events = h
            .player_tx(commit_instruction(STAKE, &secret, &player))
            .await;
        assert_eq!(events, rejection(&player, BetError::Paused));

        let events = h.owner_tx(Instruction::Unpause).await;
        assert_eq!(events, vec![Event::PauseChanged { paused: false }]);
        let events = h.owner_tx(Instruction::Unpause).await;
        assert_eq!(events, rejection(&h.owner.public, BetError::NotPaused));
        let events = h
            .player_tx(commit_instruction(STAKE, &secret, &player))
            .await;
        assert!(matches!(events.as_slice(), [Event::BetCommitted { .. }]));
    });
}

#[test]
fn test_admin_requires_owner() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let player = h.player.public.clone();
        for instruction in [
            Instruction::Pause,
            Instruction::WithdrawHouse { amount: 1 },
            Instruction::UpdateBetLimits {
                min_bet: 1,
                max_bet: 2,
            },
            Instruction::TransferOwnership {
                new_owner: player.clone(),
            },
        ] {
            let events = h.player_tx(instruction).await;
            assert_eq!(events, rejection(&player, BetError::Unauthorized));
        }

        let events = h
            .player_tx(Instruction::Initialize {
                min_bet: 1,
                max_bet: 2,
            })
            .await;
        assert_eq!(events, rejection(&player, BetError::AlreadyInitialized));
    });
}

#[test]
fn test_update_bet_limits() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let owner = h.owner.public.clone();

        for (min_bet, max_bet) in [(0, 100), (100, 100), (200, 100), (1, 1_000_001)] {
            let events = h
                .owner_tx(Instruction::UpdateBetLimits { min_bet, max_bet })
                .await;
            assert_eq!(
                events,
                rejection(&owner, BetError::InvalidBetLimits { min_bet, max_bet })
            );
        }

        let events = h
            .owner_tx(Instruction::UpdateBetLimits {
                min_bet: 100,
                max_bet: 200,
            })
            .await;
        assert_eq!(
            events,
            vec![Event::BetLimitsUpdated {
                min_bet: 100,
                max_bet: 200
            }]
        );
        let player = h.player.public.clone();
        let events = h.player_tx(commit_instruction(STAKE, &[1u8; 32], &player)).await;
        assert_eq!(
            events,
            rejection(&player, BetError::BetTooLarge { stake: STAKE, max: 200 })
        );
    });
}

#[test]
fn test_transfer_ownership() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let owner = h.owner.public.clone();
        let player = h.player.public.clone();

        let events = h
            .owner_tx(Instruction::TransferOwnership {
                new_owner: player.clone(),
            })
            .await;
        assert_eq!(
            events,
            vec![Event::OwnershipTransferred {
                previous: owner.clone(),
                owner: player.clone(),
            }]
        );
        let events = h.owner_tx(Instruction::Pause).await;
        assert_eq!(events, rejection(&owner, BetError::Unauthorized));
        let events = h.player_tx(Instruction::Pause).await;
        assert_eq!(events, vec![Event::PauseChanged { paused: true }]);
    });
}

#[test]
fn test_quick_bet_resolves_in_one_step() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let player = h.player.public.clone();

        let events = h.player_tx(Instruction::QuickBet { stake: STAKE }).await;
        let payout = match events.as_slice() {
            [Event::QuickBetResolved {
                stake,
                roll,
                tier,
                payout,
                ..
            }] => {
                assert_eq!(*stake, STAKE);
                assert_eq!(crate::outcome::resolve(*roll, STAKE).tier, *tier);
                *payout
            }
            other => panic!("unexpected events: {other:?}"),
        };

        assert_eq!(h.funds(&player).await, PLAYER_FUNDS - STAKE + payout);
        assert_eq!(
            h.balance().await,
            HouseBalance {
                total: 10_000 + STAKE - payout,
                available: 10_000 + STAKE - payout,
                reserved: 0,
            }
        );
        let stats = player_stats(&h.state, &player).await.unwrap();
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.total_won, payout);
    });
}

#[test]
fn test_quick_bet_refunded_when_house_underfunded() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(500).await;
        let player = h.player.public.clone();

        let events = h.player_tx(Instruction::QuickBet { stake: STAKE }).await;
        assert_eq!(
            events,
            vec![Event::QuickBetRefunded {
                player: player.clone(),
                stake: STAKE,
                available: 1_500,
                required: 1_900,
            }]
        );
        assert_eq!(h.funds(&player).await, PLAYER_FUNDS);
        assert_eq!(h.balance().await.total, 500);
        assert_eq!(player_stats(&h.state, &player).await.unwrap().games_played, 0);
    });
}

#[test]
fn test_faucet_rate_limit() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(0).await;
        let player = h.player.public.clone();

        let events = h.player_tx(Instruction::Deposit { amount: 10 }).await;
        assert_eq!(
            events,
            rejection(&player, BetError::FaucetRateLimited { next_height: 101 })
        );
        let events = h.player_tx(Instruction::Deposit { amount: 100_001 }).await;
        assert_eq!(
            events,
            rejection(
                &player,
                BetError::FaucetLimitExceeded {
                    amount: 100_001,
                    max: 100_000
                }
            )
        );

        h.advance_to(101).await;
        let events = h.player_tx(Instruction::Deposit { amount: 10 }).await;
        assert_eq!(
            events,
            vec![Event::Deposited {
                player,
                amount: 10,
                balance: PLAYER_FUNDS + 10,
            }]
        );
    });
}

#[test]
fn test_operations_before_initialize() {
    Runner::default().start(|_| async move {
        let mut state = Memory::default();
        let mut player = MockAccount::new(1);
        let txs = vec![
            player.sign(Instruction::Deposit { amount: 5_000 }),
            player.sign(Instruction::FundHouse { amount: 1_000 }),
            player.sign(Instruction::RefundExpiredBet),
        ];
        let result = execute_block(&mut state, 1, txs).await.unwrap();
        let rejections = result
            .outputs
            .iter()
            .filter(|output| {
                matches!(
                    output,
                    Output::Event(Event::BetRejected {
                        error: BetError::NotInitialized,
                        ..
                    })
                )
            })
            .count();
        assert_eq!(rejections, 2);
        assert_eq!(account_balance(&state, &player.public).await.unwrap(), 5_000);
    });
}

#[test]
fn test_pending_bet_view_tracks_next_block() {
    Runner::default().start(|_| async move {
        let mut h = Harness::new(10_000).await;
        let player = h.player.public.clone();
        let secret = [2u8; SECRET_LENGTH];
        h.player_tx(commit_instruction(STAKE, &secret, &player)).await;

        // Next block is 3: one block too early to reveal.
        let view = pending_bet(&h.state, &player).await.unwrap().unwrap();
        assert_eq!(view.commit_height, 2);
        assert_eq!(view.stake, STAKE);
        assert!(!view.can_reveal);
        assert!(!view.can_refund);

        h.advance_to(4).await;
        let view = pending_bet(&h.state, &player).await.unwrap().unwrap();
        assert!(view.can_reveal);

        // State is at 258, so the next block may refund while 258 itself may not.
        h.advance_to(2 + REVEAL_TIMEOUT + 1).await;
        assert_eq!(h.height, 2 + REVEAL_TIMEOUT);
        let view = pending_bet(&h.state, &player).await.unwrap().unwrap();
        assert!(view.can_refund);
        assert!(!view.can_reveal);
        let at_deadline = pending_bet_at(&h.state, &player, h.height)
            .await
            .unwrap()
            .unwrap();
        assert!(at_deadline.can_reveal);
        assert!(!at_deadline.can_refund);

        let events = h.player_tx(Instruction::RefundExpiredBet).await;
        assert!(matches!(events.as_slice(), [Event::BetRefunded { .. }]));
    });
}
