use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use sayho_connect::{DashboardLoader, SessionManager};
use sayho_core::dashboard::{DashboardView, GoalProgressView};
use sayho_core::goals::{NewTransaction, TransactionType};
use sayho_core::users::{PasswordUpdate, ThemePreference, UserUpdate};
use sayho_core::utils::decimal_serde::round_for_display;

use crate::main_lib::AppState;

#[derive(Parser, Debug)]
#[command(name = "sayho", about = "Track savings goals and fund status from the terminal.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login { email: String, password: String },
    /// Create an account and sign in
    Signup {
        email: String,
        name: String,
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Print the session state as JSON
    Status,
    /// Print the signed-in user, fetched fresh from the server
    Whoami,
    /// Show goal progress and fund trend
    Dashboard {
        /// Print the view as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Record a deposit or withdrawal on a goal
    AddTransaction {
        goal_id: i64,
        #[arg(value_enum)]
        kind: TransactionKind,
        amount: String,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        memo: Option<String>,
    },
    /// Set the display theme
    Theme {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
    /// Change the account password
    ChangePassword { current: String, new: String },
    /// Save the fund snapshot import template
    Template { output: PathBuf },
    /// Import fund snapshots from a filled-in template
    Import { file: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl From<TransactionKind> for TransactionType {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Deposit => TransactionType::Deposit,
            TransactionKind::Withdrawal => TransactionType::Withdrawal,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ThemePreference {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Light => ThemePreference::Light,
            ThemeArg::Dark => ThemePreference::Dark,
        }
    }
}

pub async fn run(command: Command, state: &AppState) -> anyhow::Result<()> {
    let session = &state.session;
    session.bootstrap().await;

    match command {
        Command::Login { email, password } => {
            let user = session.login_with_credentials(&email, &password).await?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        Command::Signup {
            email,
            name,
            password,
        } => {
            let user = session.signup_and_login(&email, &name, &password).await?;
            println!("Welcome, {}! You are signed in.", user.name);
        }
        Command::Logout => {
            session.logout()?;
            println!("Signed out.");
        }
        Command::Status => {
            println!("{}", serde_json::to_string_pretty(&session.state())?);
        }
        Command::Whoami => {
            require_session(session)?;
            let user = session.refresh_user().await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Command::Dashboard { json } => {
            require_session(session)?;
            let view = DashboardLoader::new(state.client.clone()).load().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render_dashboard(&view));
            }
        }
        Command::AddTransaction {
            goal_id,
            kind,
            amount,
            date,
            memo,
        } => {
            require_session(session)?;
            let new_transaction = NewTransaction {
                transaction_type: kind.into(),
                amount,
                category: None,
                occurred_on: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                memo,
            };
            let created = state
                .client
                .create_transaction(goal_id, &new_transaction)
                .await?;
            println!(
                "Recorded {} of {} on goal {}",
                created.transaction_type, created.amount, created.goal_id
            );
        }
        Command::Theme { theme } => {
            require_session(session)?;
            let update = UserUpdate {
                name: None,
                theme_preference: Some(theme.into()),
            };
            session.update_profile(&update).await?;
            println!("Theme updated.");
        }
        Command::ChangePassword { current, new } => {
            require_session(session)?;
            let update = PasswordUpdate {
                current_password: current,
                new_password: new,
            };
            session.change_password(&update).await?;
            println!("Password changed.");
        }
        Command::Template { output } => {
            require_session(session)?;
            let bytes = state.client.download_snapshot_template().await?;
            fs::write(&output, bytes)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Template saved to {}", output.display());
        }
        Command::Import { file } => {
            require_session(session)?;
            let contents =
                fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("snapshots.xlsx");
            let created = state
                .client
                .import_fund_snapshots(file_name, contents)
                .await?;
            println!("Imported {} snapshots.", created.len());
        }
    }
    Ok(())
}

fn require_session(session: &SessionManager) -> anyhow::Result<()> {
    if !session.is_authenticated() {
        bail!("Not signed in. Run `sayho login <email> <password>` first.");
    }
    Ok(())
}

fn money(value: Decimal) -> String {
    format!("{:.2}", round_for_display(value))
}

fn goal_line(goal: &GoalProgressView) -> String {
    let status = if goal.is_loading {
        " (loading)".to_string()
    } else if let Some(error) = &goal.load_error {
        format!(" (unavailable: {})", error)
    } else {
        String::new()
    };
    format!(
        "  {:<24} {:>3}%  {} of {}{}",
        goal.title,
        goal.percentage,
        money(goal.total_saved),
        goal.target_amount,
        status
    )
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();

    out.push_str("Goals\n");
    if view.goals.is_empty() {
        out.push_str("  No goals yet.\n");
    }
    for goal in &view.goals {
        out.push_str(&goal_line(goal));
        out.push('\n');
    }
    out.push_str(&format!("  Total saved: {}\n", money(view.total_saved)));

    out.push_str("\nFunds\n");
    match &view.funds.latest {
        Some(latest) => {
            out.push_str(&format!(
                "  {}: total {}, liquid {}\n",
                latest.date,
                money(latest.total),
                money(latest.liquid_total)
            ));
            if let Some(change) = view.funds.change_from_previous {
                out.push_str(&format!("  Change since previous: {}\n", money(change)));
            }
        }
        None => out.push_str("  No snapshots yet.\n"),
    }
    for entry in &view.breakdown {
        let label = entry
            .asset_type
            .map(|asset_type| asset_type.to_string())
            .unwrap_or_else(|| "uncategorized".to_string());
        out.push_str(&format!("    {:<14} {}\n", label, money(entry.total)));
    }

    out
}
