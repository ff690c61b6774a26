use futures::future::join_all;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use sayho_core::dashboard::{build_dashboard, DashboardView, GoalTransactionsState};
use sayho_core::errors::{Error, Result};
use sayho_core::goals::Goal;

use crate::traits::FinanceApi;

/// Loads goals, their transactions and fund data for the dashboard.
pub struct DashboardLoader {
    api: Arc<dyn FinanceApi>,
}

impl DashboardLoader {
    pub fn new(api: Arc<dyn FinanceApi>) -> Self {
        Self { api }
    }

    /// Fetches each goal's transactions concurrently.
    ///
    /// A failed fetch marks only that goal as failed. An expired session
    /// aborts the whole load, since every other request would fail as well.
    pub async fn load_goal_transactions(
        &self,
        goals: &[Goal],
    ) -> Result<HashMap<i64, GoalTransactionsState>> {
        let fetches = goals.iter().map(|goal| {
            let api = self.api.clone();
            let goal_id = goal.id;
            async move { (goal_id, api.list_transactions(goal_id).await) }
        });

        let mut states = HashMap::with_capacity(goals.len());
        for (goal_id, result) in join_all(fetches).await {
            let state = match result {
                Ok(transactions) => GoalTransactionsState::Loaded(transactions),
                Err(Error::SessionExpired) => return Err(Error::SessionExpired),
                Err(e) => {
                    warn!("[Dashboard] Failed to load transactions for goal {}: {}", goal_id, e);
                    GoalTransactionsState::Failed(e.to_string())
                }
            };
            states.insert(goal_id, state);
        }
        Ok(states)
    }

    /// Fetches everything and builds the dashboard view.
    pub async fn load(&self) -> Result<DashboardView> {
        let goals = self.api.list_goals().await?;

        let (states, categories, snapshots) = futures::try_join!(
            self.load_goal_transactions(&goals),
            self.api.list_fund_categories(),
            self.api.list_fund_snapshots(),
        )?;

        debug!(
            "[Dashboard] Loaded {} goals, {} categories, {} snapshots",
            goals.len(),
            categories.len(),
            snapshots.len()
        );
        Ok(build_dashboard(&goals, &states, &snapshots, &categories))
    }
}
