use super::*;
use bullseye_types::house::{FAUCET_MAX_DEPOSIT, FAUCET_RATE_LIMIT};
use tracing::info;

impl<'a, S: State> Layer<'a, S> {
    /// Faucet deposit (dev/testing). Stands in for funds arriving from the host ledger.
    pub(in crate::layer) async fn handle_deposit(
        &mut self,
        public: &PublicKey,
        amount: u64,
    ) -> Result<Vec<Event>> {
        if amount == 0 {
            return Ok(rejected(public, BetError::ZeroAmount));
        }
        if amount > FAUCET_MAX_DEPOSIT {
            return Ok(rejected(
                public,
                BetError::FaucetLimitExceeded {
                    amount,
                    max: FAUCET_MAX_DEPOSIT,
                },
            ));
        }

        let mut account = self.get_account(public).await?;
        let height = self.height();
        if account.last_deposit_height != 0
            && height.saturating_sub(account.last_deposit_height) < FAUCET_RATE_LIMIT
        {
            return Ok(rejected(
                public,
                BetError::FaucetRateLimited {
                    next_height: account.last_deposit_height + FAUCET_RATE_LIMIT,
                },
            ));
        }

        account.balance = account.balance.saturating_add(amount);
        account.last_deposit_height = height;
        let balance = account.balance;
        self.insert(Key::Account(public.clone()), Value::Account(account));

        info!(player = ?public, amount, balance, "faucet deposit");
        Ok(vec![Event::Deposited {
            player: public.clone(),
            amount,
            balance,
        }])
    }
}
