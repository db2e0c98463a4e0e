//! Policy Desk - command-line front end
//!
//! # Usage
//!
//! ```bash
//! policy-desk login --email jo@example.com --password secret
//! policy-desk policies list --status active --search acme
//! policy-desk claims file --policy 5 --amount 200 --description "Car accident on highway"
//! ```
//!
//! # Environment Variables
//!
//! * `DESK_API_BASE_URL` - Repository and auth base URL (default: http://localhost:5000/api)
//! * `DESK_SESSION_FILE` - Where the session is kept (default: policy-desk-session.json)
//! * `DESK_TIMEOUT_SECS` - Request timeout in seconds (default: none)
//! * `DESK_TIMEZONE` - Zone calendar dates are anchored in (default: UTC)
//! * `DESK_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{ClaimId, PolicyId, Timezone};
use domain_claims::{eligible_policies_in, ClaimDraft};
use domain_policy::{PolicyDraft, PolicyFilter, PolicyStatus, PolicyType, StatusFilter};
use interface_client::{
    AuthClient, ClientConfig, Credentials, FileTokenStore, HttpRepository, RecordController,
    Registration, Session, TokenStore,
};

#[derive(Debug, Parser)]
#[command(name = "policy-desk")]
#[command(about = "Manage your insurance policies and claims")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    #[command(subcommand)]
    Policies(PolicyCommand),
    #[command(subcommand)]
    Claims(ClaimCommand),
}

#[derive(Debug, Subcommand)]
enum PolicyCommand {
    List {
        /// all, active, lapsed or cancelled
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Matches insurer or policy type
        #[arg(long)]
        search: Option<String>,
    },
    Add(PolicyFields),
    Edit {
        id: PolicyId,
        #[command(flatten)]
        fields: PolicyFields,
    },
    Delete {
        id: PolicyId,
        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct PolicyFields {
    #[arg(long)]
    insurer: Option<String>,
    #[arg(long = "type")]
    policy_type: Option<PolicyType>,
    #[arg(long)]
    premium: Option<Decimal>,
    /// YYYY-MM-DD
    #[arg(long)]
    start: Option<NaiveDate>,
    /// YYYY-MM-DD
    #[arg(long)]
    end: Option<NaiveDate>,
    #[arg(long)]
    status: Option<PolicyStatus>,
}

impl PolicyFields {
    /// Overlays the given flags on `draft`
    fn apply(self, mut draft: PolicyDraft) -> PolicyDraft {
        if let Some(insurer) = self.insurer {
            draft.insurer = insurer;
        }
        if self.policy_type.is_some() {
            draft.policy_type = self.policy_type;
        }
        if self.premium.is_some() {
            draft.premium_amt = self.premium;
        }
        if self.start.is_some() {
            draft.start_date = self.start;
        }
        if self.end.is_some() {
            draft.end_date = self.end;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        draft
    }
}

#[derive(Debug, Subcommand)]
enum ClaimCommand {
    List,
    File {
        #[arg(long)]
        policy: Option<PolicyId>,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long, default_value = "")]
        description: String,
    },
    Edit {
        id: ClaimId,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        description: Option<String>,
    },
}

/// Everything a command needs, built once
struct Desk {
    config: ClientConfig,
    timezone: Timezone,
    auth: AuthClient,
    session: Session,
    controller: RecordController,
}

impl Desk {
    fn build(config: ClientConfig) -> Result<Self> {
        let timezone = config.timezone()?;
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.session_file));
        let session = Session::from_store(store.as_ref())?;
        let auth = AuthClient::from_config(&config, store)?;

        let repository = Arc::new(HttpRepository::from_config(&config)?);
        let controller =
            RecordController::new(repository.clone(), repository).with_timezone(timezone);

        Ok(Self {
            config,
            timezone,
            auth,
            session,
            controller,
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_level);

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

async fn run(command: Commands, config: ClientConfig) -> Result<()> {
    let desk = Desk::build(config)?;
    tracing::debug!(base_url = %desk.config.api_base_url, "Policy desk ready");

    match command {
        Commands::Register {
            name,
            email,
            password,
        } => {
            let registration = Registration {
                name,
                email,
                password,
            };
            let answer = desk.auth.register(&registration).await?;
            println!("Registered. {}", answer_message(&answer).unwrap_or_default());
        }
        Commands::Login { email, password } => {
            desk.auth.login(&Credentials { email, password }).await?;
            if desk.auth.is_authenticated() {
                println!("Logged in.");
            } else {
                println!("The server did not issue a token.");
            }
        }
        Commands::Logout => {
            desk.auth.logout()?;
            println!("Logged out.");
        }
        Commands::Whoami => match desk.auth.current_user() {
            Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
            None => println!("Not logged in."),
        },
        Commands::Policies(command) => policies(&desk, command).await?,
        Commands::Claims(command) => claims(&desk, command).await?,
    }

    Ok(())
}

async fn policies(desk: &Desk, command: PolicyCommand) -> Result<()> {
    let session = &desk.session;
    let controller = &desk.controller;

    match command {
        PolicyCommand::List { status, search } => {
            let policies = controller.list_policies(session).await?;
            let mut filter = PolicyFilter::new()
                .with_status(status)
                .with_timezone(desk.timezone);
            if let Some(term) = search {
                filter = filter.with_search(term);
            }

            let views = filter.apply(&policies, controller.now());
            if views.is_empty() {
                println!("No policies found.");
            }
            for view in views {
                let policy = view.policy;
                println!(
                    "{:<8} {:<24} {:<8} {:>12} {} -> {}  {}",
                    policy.policy_id,
                    policy.insurer,
                    policy.policy_type,
                    policy.premium_amt,
                    policy.start_date,
                    policy.end_date,
                    view.effective,
                );
            }
        }
        PolicyCommand::Add(fields) => {
            let draft = fields.apply(PolicyDraft::default());
            let policy = controller.create_policy(session, &draft).await?;
            println!("Policy {} created.", policy.policy_id);
        }
        PolicyCommand::Edit { id, fields } => {
            let policies = controller.list_policies(session).await?;
            let current = policies
                .iter()
                .find(|p| p.policy_id == id)
                .ok_or_else(|| anyhow!("Policy {} not found", id))?;

            let draft = fields.apply(current.to_draft());
            let policy = controller.update_policy(session, id, &draft).await?;
            println!("Policy {} updated.", policy.policy_id);
        }
        PolicyCommand::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete policy {}?", id))? {
                return Ok(());
            }
            controller.delete_policy(session, id).await?;
            println!("Policy {} deleted.", id);
        }
    }

    Ok(())
}

async fn claims(desk: &Desk, command: ClaimCommand) -> Result<()> {
    let session = &desk.session;
    let controller = &desk.controller;

    match command {
        ClaimCommand::List => {
            let claims = controller.list_claims(session).await?;
            if claims.is_empty() {
                println!("No claims found.");
            }
            for claim in claims {
                println!(
                    "{:<8} {:<8} {:>12} {:<13} {}  {}",
                    claim.claim_id,
                    claim.policy_id,
                    claim.claim_amt,
                    claim.status,
                    claim.submitted_at.format("%Y-%m-%d"),
                    claim.description,
                );
            }
        }
        ClaimCommand::File {
            policy,
            amount,
            description,
        } => {
            let policies = controller.list_policies(session).await?;
            let draft = ClaimDraft {
                policy_id: policy,
                claim_amt: amount,
                description,
            };
            if draft.policy_id.is_none() {
                let eligible =
                    eligible_policies_in(&policies, controller.now(), desk.timezone);
                for p in eligible {
                    println!("  {}  {} ({})", p.policy_id, p.insurer, p.policy_type);
                }
            }
            let claim = controller.create_claim(session, &draft, &policies).await?;
            println!("Claim {} filed.", claim.claim_id);
        }
        ClaimCommand::Edit {
            id,
            amount,
            description,
        } => {
            let claims = controller.list_claims(session).await?;
            let current = claims
                .iter()
                .find(|c| c.claim_id == id)
                .ok_or_else(|| anyhow!("Claim {} not found", id))?;

            let mut draft = current.to_draft();
            if amount.is_some() {
                draft.claim_amt = amount;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            let claim = controller.update_claim(session, current, &draft).await?;
            println!("Claim {} updated.", claim.claim_id);
        }
    }

    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Could not read the answer")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn answer_message(answer: &serde_json::Value) -> Option<String> {
    answer
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
