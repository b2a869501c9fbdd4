use super::*;
use bullseye_types::house::BetLimits;
use tracing::info;

impl<'a, S: State> Layer<'a, S> {
    pub(in crate::layer) async fn handle_initialize(
        &mut self,
        public: &PublicKey,
        min_bet: u64,
        max_bet: u64,
    ) -> Result<Vec<Event>> {
        if self.get_house().await?.is_some() {
            return Ok(rejected(public, BetError::AlreadyInitialized));
        }
        let limits = match BetLimits::new(min_bet, max_bet) {
            Ok(limits) => limits,
            Err(error) => return Ok(rejected(public, error)),
        };

        self.insert(
            Key::House,
            Value::House(HouseState::new(public.clone(), limits)),
        );

        info!(owner = ?public, min_bet, max_bet, "house initialized");
        Ok(vec![Event::HouseInitialized {
            owner: public.clone(),
            min_bet,
            max_bet,
        }])
    }

    /// Anyone may fund the house.
    pub(in crate::layer) async fn handle_fund_house(
        &mut self,
        public: &PublicKey,
        amount: u64,
    ) -> Result<Vec<Event>> {
        let mut house = match self.house_or_rejected(public).await? {
            Ok(house) => house,
            Err(events) => return Ok(events),
        };
        if amount == 0 {
            return Ok(rejected(public, BetError::ZeroAmount));
        }
        let mut account = self.get_account(public).await?;
        if account.balance < amount {
            return Ok(rejected(
                public,
                BetError::InsufficientBalance {
                    available: account.balance,
                    required: amount,
                },
            ));
        }

        house
            .treasury
            .credit(amount)
            .context("credit house funding")?;
        account.balance -= amount;
        let total_balance = house.treasury.total_balance;
        self.insert(Key::Account(public.clone()), Value::Account(account));
        self.insert(Key::House, Value::House(house));

        info!(funder = ?public, amount, total_balance, "house funded");
        Ok(vec![Event::HouseFunded {
            funder: public.clone(),
            amount,
            total_balance,
        }])
    }

    /// Owner withdrawal, capped at funds not reserved for open bets.
    pub(in crate::layer) async fn handle_withdraw_house(
        &mut self,
        public: &PublicKey,
        amount: u64,
    ) -> Result<Vec<Event>> {
        let mut house = match self.owned_house_or_rejected(public).await? {
            Ok(house) => house,
            Err(events) => return Ok(events),
        };
        if amount == 0 {
            return Ok(rejected(public, BetError::ZeroAmount));
        }
        let available = house.treasury.withdrawable();
        if amount > available {
            return Ok(rejected(
                public,
                BetError::ExceedsAvailable {
                    requested: amount,
                    available,
                },
            ));
        }

        house
            .treasury
            .debit(amount)
            .context("debit house withdrawal")?;
        let total_balance = house.treasury.total_balance;
        self.insert(Key::House, Value::House(house));
        self.credit_account(public, amount).await?;

        info!(owner = ?public, amount, total_balance, "house withdrawal");
        Ok(vec![Event::HouseWithdrawn {
            owner: public.clone(),
            amount,
            total_balance,
        }])
    }

    pub(in crate::layer) async fn handle_set_paused(
        &mut self,
        public: &PublicKey,
        paused: bool,
    ) -> Result<Vec<Event>> {
        let mut house = match self.owned_house_or_rejected(public).await? {
            Ok(house) => house,
            Err(events) => return Ok(events),
        };
        match (house.paused, paused) {
            (true, true) => return Ok(rejected(public, BetError::AlreadyPaused)),
            (false, false) => return Ok(rejected(public, BetError::NotPaused)),
            _ => {}
        }

        house.paused = paused;
        self.insert(Key::House, Value::House(house));

        info!(owner = ?public, paused, "pause state changed");
        Ok(vec![Event::PauseChanged { paused }])
    }

    pub(in crate::layer) async fn handle_update_bet_limits(
        &mut self,
        public: &PublicKey,
        min_bet: u64,
        max_bet: u64,
    ) -> Result<Vec<Event>> {
        let mut house = match self.owned_house_or_rejected(public).await? {
            Ok(house) => house,
            Err(events) => return Ok(events),
        };
        house.limits = match BetLimits::new(min_bet, max_bet) {
            Ok(limits) => limits,
            Err(error) => return Ok(rejected(public, error)),
        };
        self.insert(Key::House, Value::House(house));

        info!(owner = ?public, min_bet, max_bet, "bet limits updated");
        Ok(vec![Event::BetLimitsUpdated { min_bet, max_bet }])
    }

    pub(in crate::layer) async fn handle_transfer_ownership(
        &mut self,
        public: &PublicKey,
        new_owner: &PublicKey,
    ) -> Result<Vec<Event>> {
        let mut house = match self.owned_house_or_rejected(public).await? {
            Ok(house) => house,
            Err(events) => return Ok(events),
        };
        house.owner = new_owner.clone();
        self.insert(Key::House, Value::House(house));

        info!(previous = ?public, owner = ?new_owner, "ownership transferred");
        Ok(vec![Event::OwnershipTransferred {
            previous: public.clone(),
            owner: new_owner.clone(),
        }])
    }
}
