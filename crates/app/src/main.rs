mod config;
mod error;
mod report;

use chrono::Utc;
use chrono_tz::Tz;
use cuan_client::{HttpAuthProvider, HttpRemoteStore, SignUpOutcome, SyncCoordinator};
use engine::{Period, TransactionId, TransactionInput, TransactionKind};

use crate::{
    config::{AppConfig, Command},
    error::Result,
};

type Coordinator = SyncCoordinator<HttpAuthProvider, HttpRemoteStore, Tz>;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, command) = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "cuan={level},cuan_client={level},engine={level}",
            level = config.level
        ))
        .init();
    tracing::debug!(?config, "configuration loaded");

    let tz = config.timezone()?;
    let auth = HttpAuthProvider::new(&config.base_url, &config.api_key)?;
    let remote = HttpRemoteStore::new(&config.base_url, &config.api_key)?;
    let mut sync = SyncCoordinator::start(auth, remote, tz, Utc::now()).await;

    let result = run(&mut sync, &config, command).await;

    if sync.session().is_some() {
        sync.sign_out().await;
    }
    sync.shutdown();
    result
}

async fn run(sync: &mut Coordinator, config: &AppConfig, command: Command) -> Result<()> {
    if let Command::Signup = command {
        match sync.sign_up(&config.email, &config.password).await? {
            SignUpOutcome::ConfirmationPending => {
                println!("Check {} for a confirmation link, then sign in.", config.email);
            }
            SignUpOutcome::SignedIn => println!("Account created for {}.", config.email),
        }
        return Ok(());
    }

    sync.sign_in(&config.email, &config.password).await?;

    match command {
        Command::Signup => {}
        Command::Summary { month, year } => {
            let current = sync.state().period;
            let month0 = month.map_or(current.month0(), |m| m.saturating_sub(1));
            sync.select_period(Period::new(month0, year.unwrap_or(current.year()))?);
        }
        Command::Add {
            description,
            amount,
            kind,
            date,
        } => {
            let tz = config.timezone()?;
            let input = TransactionInput {
                description,
                amount,
                kind: Some(TransactionKind::try_from(kind.as_str())?),
                date: date.unwrap_or_else(|| {
                    Utc::now().with_timezone(&tz).format("%Y-%m-%d").to_string()
                }),
            };
            sync.insert(&input).await?;
            println!("Saved.");
        }
        Command::Remove { id } => {
            sync.remove(&TransactionId::new(id)).await?;
            println!("Removed.");
        }
    }

    let tz = config.timezone()?;
    print!("{}", report::Report::new(&sync.view(), &tz));
    Ok(())
}
