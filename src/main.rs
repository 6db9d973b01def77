use anyhow::{bail, Context};
use clap::{ArgEnum, Parser, Subcommand};
use std::fmt::Write;
use std::path::PathBuf;
use tokio::fs;
use twitter_tools::{Account, Endpoint, HarvestEnd, Session, Settings};

// Largest `count` statuses/user_timeline accepts
const MAX_PAGE_SIZE: i32 = 200;

#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
    /// Path to the credentials file (oauth.accessToken=... one per line)
    #[clap(short, long, default_value = "./auth.txt")]
    auth: PathBuf,
    /// Write results to this file instead of stdout
    #[clap(short, long)]
    output: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the remaining calls for an endpoint
    Quota {
        #[clap(long, arg_enum, default_value = "timeline")]
        endpoint: EndpointArg,
    },
    /// List the ids of every follower of an account
    Followers {
        /// Numeric user id or screen name
        account: Account,
    },
    /// List the ids of every account an account follows
    Friends {
        /// Numeric user id or screen name
        account: Account,
    },
    /// Dump recent statuses of an account as JSON lines
    Statuses {
        /// Numeric user id or screen name
        account: Account,
        /// Maximum number of pages to fetch
        #[clap(long, default_value_t = 5)]
        pages: usize,
        /// Statuses per page (1 to 200)
        #[clap(long, default_value_t = 50)]
        per_page: i32,
    },
}

#[derive(ArgEnum, Clone, Copy, Debug)]
enum EndpointArg {
    Followers,
    Friends,
    Timeline,
}

impl From<EndpointArg> for Endpoint {
    fn from(arg: EndpointArg) -> Self {
        match arg {
            EndpointArg::Followers => Endpoint::FollowerIds,
            EndpointArg::Friends => Endpoint::FriendIds,
            EndpointArg::Timeline => Endpoint::UserTimeline,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = main2().await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn main2() -> anyhow::Result<()> {
    let args: Args = Args::parse();
    let mut settings = Settings::default();
    if let Command::Statuses {
        pages, per_page, ..
    } = &args.command
    {
        settings.page_limit = *pages;
        settings.page_size = checked_page_size(*per_page)?;
    }
    let session = Session::from_auth_file(&args.auth, settings)
        .await
        .context("Unable to set up API session")?;

    let mut out = String::new();
    match &args.command {
        Command::Quota { endpoint } => {
            let quota = session
                .api()
                .quota((*endpoint).into())
                .await
                .context("Unable to get quota")?;
            writeln!(out, "{}", quota.remaining)?;
            if let Some(reset_at) = quota.reset_at {
                log::info!("Window resets at {}", reset_at);
            }
        }
        Command::Followers { account } => {
            let ids = session
                .followers(account)
                .await
                .with_context(|| format!("Unable to list followers of {}", account))?;
            log::info!("Got {} followers for {}", ids.len(), account);
            for id in ids {
                writeln!(out, "{}", id)?;
            }
        }
        Command::Friends { account } => {
            let ids = session
                .friends(account)
                .await
                .with_context(|| format!("Unable to list friends of {}", account))?;
            log::info!("Got {} friends for {}", ids.len(), account);
            for id in ids {
                writeln!(out, "{}", id)?;
            }
        }
        Command::Statuses { account, .. } => {
            let harvest = session.statuses(account).await;
            match harvest.end {
                HarvestEnd::GaveUp => log::warn!(
                    "Timeline of {} is incomplete, got {} statuses",
                    account,
                    harvest.statuses.len()
                ),
                end => log::info!(
                    "Got {} statuses in {} pages for {} ({:?})",
                    harvest.statuses.len(),
                    harvest.pages,
                    account,
                    end
                ),
            }
            for status in harvest.statuses.iter().rev() {
                writeln!(out, "{}", status.to_json()?)?;
            }
        }
    }

    match &args.output {
        Some(path) => fs::write(path, out)
            .await
            .with_context(|| format!("Unable to write {}", path.display()))?,
        None => print!("{}", out),
    }
    Ok(())
}

fn checked_page_size(per_page: i32) -> anyhow::Result<i32> {
    if !(1..=MAX_PAGE_SIZE).contains(&per_page) {
        bail!(
            "Statuses per page must be between 1 and {}, got {}",
            MAX_PAGE_SIZE,
            per_page
        );
    }
    Ok(per_page)
}
