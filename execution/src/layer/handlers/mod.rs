use super::*;
use bullseye_types::house::BetError;

fn rejected(player: &PublicKey, error: BetError) -> Vec<Event> {
    debug!(player = ?player, %error, "instruction rejected");
    vec![Event::BetRejected {
        player: player.clone(),
        error,
    }]
}

impl<'a, S: State> Layer<'a, S> {
    /// Load the house, or the rejection to return if it does not exist yet.
    async fn house_or_rejected(
        &self,
        public: &PublicKey,
    ) -> Result<Result<HouseState, Vec<Event>>> {
        Ok(match self.get_house().await? {
            Some(house) => Ok(house),
            None => Err(rejected(public, BetError::NotInitialized)),
        })
    }

    /// Owner-only variant of [`Self::house_or_rejected`].
    async fn owned_house_or_rejected(
        &self,
        public: &PublicKey,
    ) -> Result<Result<HouseState, Vec<Event>>> {
        Ok(match self.house_or_rejected(public).await? {
            Ok(house) if house.is_owner(public) => Ok(house),
            Ok(_) => Err(rejected(public, BetError::Unauthorized)),
            Err(events) => Err(events),
        })
    }

    /// Pay `amount` into `public`'s account.
    ///
    /// Runs after all house bookkeeping for the instruction. Failure aborts the block.
    async fn credit_account(&mut self, public: &PublicKey, amount: u64) -> Result<u64> {
        let mut account = self.get_account(public).await?;
        let balance = account.balance.checked_add(amount).ok_or_else(|| {
            anyhow::anyhow!(
                "payout to {public:?} overflows balance (balance={}, amount={amount})",
                account.balance
            )
        })?;
        account.balance = balance;
        self.insert(Key::Account(public.clone()), Value::Account(account));
        Ok(balance)
    }
}

mod account;
mod bet;
mod house;
