//! Loyalty points. A user's balance is the sum of their ledger entries;
//! redeeming a reward books a negative entry next to the redemption record.

use cardhub_model::{LoyaltyEvent, LoyaltyKind, Reward, RewardRedemption, User};
use cardhub_store::loyalty;
use serde::Serialize;
use tracing::info;

use crate::{Hub, HubError, Result};

/// Description prefix of the ledger entry booked by a redemption.
pub const REDEMPTION_PREFIX: &str = "Reward redeemed: ";

/// Cheapest active rewards shown in the overview.
const OVERVIEW_REWARDS: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct LoyaltyOverview {
    pub balance: i64,
    /// Newest first.
    pub events: Vec<LoyaltyEvent>,
    pub rewards: Vec<Reward>,
}

impl Hub {
    pub fn balance(&self, user: &User) -> Result<i64> {
        Ok(loyalty::balance(self.store.conn(), user.id)?)
    }

    pub fn award_points(
        &self,
        user: &User,
        kind: LoyaltyKind,
        points: i64,
        description: &str,
    ) -> Result<LoyaltyEvent> {
        if points == 0 {
            return Err(HubError::invalid("points must not be zero"));
        }
        Ok(loyalty::insert_event(
            self.store.conn(),
            user.id,
            kind,
            points,
            description.trim(),
        )?)
    }

    pub fn loyalty_overview(&self, user: &User) -> Result<LoyaltyOverview> {
        let conn = self.store.conn();
        Ok(LoyaltyOverview {
            balance: loyalty::balance(conn, user.id)?,
            events: loyalty::events(conn, user.id, None)?,
            rewards: loyalty::list_rewards(conn, true, Some(OVERVIEW_REWARDS))?,
        })
    }

    /// Ledger entries, newest first.
    pub fn loyalty_events(&self, user: &User, limit: Option<usize>) -> Result<Vec<LoyaltyEvent>> {
        Ok(loyalty::events(self.store.conn(), user.id, limit)?)
    }

    /// Cheapest first.
    pub fn rewards(&self, active_only: bool) -> Result<Vec<Reward>> {
        Ok(loyalty::list_rewards(self.store.conn(), active_only, None)?)
    }

    pub fn create_reward(&self, name: &str, description: &str, cost_points: u32) -> Result<Reward> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HubError::invalid("reward name is required"));
        }
        Ok(loyalty::create_reward(
            self.store.conn(),
            name,
            description.trim(),
            cost_points,
            true,
        )?)
    }

    pub fn set_reward_active(&self, reward_id: i64, active: bool) -> Result<()> {
        Ok(loyalty::set_reward_active(self.store.conn(), reward_id, active)?)
    }

    /// Spend points on an active reward.
    pub fn redeem(&mut self, user: &User, reward_id: i64) -> Result<RewardRedemption> {
        self.store.write(|conn| {
            let reward = loyalty::get_reward(conn, reward_id)?;
            if !reward.active {
                return Err(HubError::RewardInactive(reward.name));
            }
            let balance = loyalty::balance(conn, user.id)?;
            if balance < i64::from(reward.cost_points) {
                return Err(HubError::InsufficientPoints {
                    balance,
                    cost: reward.cost_points,
                });
            }
            let redemption =
                loyalty::insert_redemption(conn, user.id, reward.id, reward.cost_points, true)?;
            loyalty::insert_event(
                conn,
                user.id,
                LoyaltyKind::Bonus,
                -i64::from(reward.cost_points),
                &format!("{REDEMPTION_PREFIX}{}", reward.name),
            )?;
            info!(user_id = user.id, reward = %reward.name, cost = reward.cost_points, "reward redeemed");
            Ok(redemption)
        })
    }

    pub fn redemptions(&self, user: &User) -> Result<Vec<RewardRedemption>> {
        Ok(loyalty::redemptions(self.store.conn(), user.id)?)
    }
}
