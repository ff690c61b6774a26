//! Goals module - goal and transaction models, progress calculation.

mod goals_model;
mod goals_progress;

pub use goals_model::{
    Goal, GoalMember, GoalProgress, NewGoal, NewTransaction, Transaction, TransactionType,
};
pub use goals_progress::{compute_goal_progress, net_saved};
