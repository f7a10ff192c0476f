use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use subcost::cli::domains::DomainsCommand;
use subcost::cli::subscriptions::SubsCommand;
use subcost::core::currency::{Currency, parse_amount, parse_price};
use subcost::core::domain::DomainPatch;
use subcost::core::log::init_logging;
use subcost::core::period::BillingPeriod;
use subcost::core::subscription::SubscriptionPatch;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show subscription costs, totals and the reality check
    Summary {
        /// Display currency (USD, EUR, UAH)
        #[arg(long)]
        currency: Option<Currency>,
        /// Years for the cost projection (1-50)
        #[arg(long)]
        years: Option<u32>,
    },
    /// Manage subscriptions
    #[command(subcommand)]
    Subs(SubsArgs),
    /// Manage domain renewals
    #[command(subcommand)]
    Domains(DomainsArgs),
    /// Show current exchange rates
    Rates {
        /// Currency the amount is given in
        #[arg(long)]
        currency: Option<Currency>,
        /// Amount to convert
        #[arg(long)]
        amount: Option<String>,
        /// Only show currency codes containing this text
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show how much of the monthly budget subscriptions use
    Budget {
        /// Monthly budget amount
        #[arg(long)]
        amount: Option<String>,
        /// Currency of the budget amount
        #[arg(long)]
        currency: Option<Currency>,
        /// Year to report on
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Args)]
struct SubscriptionFields {
    /// Price per billing period
    #[arg(long)]
    price: Option<String>,
    /// Currency of the price
    #[arg(long)]
    currency: Option<Currency>,
    /// weekly, monthly, quarterly, half-yearly or yearly
    #[arg(long)]
    period: Option<BillingPeriod>,
}

#[derive(Subcommand)]
enum SubsArgs {
    /// List subscriptions
    List,
    /// List popular services that can be added in one step
    Popular,
    /// Add a subscription
    Add {
        name: String,
        #[arg(long)]
        price: String,
        #[arg(long, default_value = "USD")]
        currency: Currency,
        #[arg(long, default_value = "monthly")]
        period: BillingPeriod,
    },
    /// Add one of the popular services
    AddPopular { name: String },
    /// Change a subscription
    Edit {
        name: String,
        /// New name
        #[arg(long)]
        rename: Option<String>,
        #[command(flatten)]
        fields: SubscriptionFields,
    },
    /// Remove a subscription
    Remove { name: String },
}

#[derive(Subcommand)]
enum DomainsArgs {
    /// List domains
    List,
    /// List domains expiring within 30 days
    Expiring,
    /// Add a domain
    Add {
        name: String,
        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expiry: NaiveDate,
        #[arg(long, default_value = "")]
        provider: String,
        #[arg(long, default_value = "")]
        renewal_cost: String,
        #[arg(long)]
        auto_renewal: bool,
    },
    /// Change a domain
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        provider: Option<String>,
        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expiry: Option<NaiveDate>,
        #[arg(long)]
        renewal_cost: Option<String>,
        #[arg(long)]
        auto_renewal: Option<bool>,
    },
    /// Remove a domain
    Remove { id: String },
}

impl From<SubsArgs> for SubsCommand {
    fn from(args: SubsArgs) -> SubsCommand {
        match args {
            SubsArgs::List => SubsCommand::List,
            SubsArgs::Popular => SubsCommand::Popular,
            SubsArgs::Add {
                name,
                price,
                currency,
                period,
            } => SubsCommand::Add {
                name,
                price: parse_price(&price),
                currency,
                period,
            },
            SubsArgs::AddPopular { name } => SubsCommand::AddPopular { name },
            SubsArgs::Edit {
                name,
                rename,
                fields,
            } => SubsCommand::Edit {
                name,
                patch: SubscriptionPatch {
                    name: rename,
                    price: fields.price.as_deref().map(parse_price),
                    currency: fields.currency,
                    period: fields.period,
                },
            },
            SubsArgs::Remove { name } => SubsCommand::Remove { name },
        }
    }
}

impl From<DomainsArgs> for DomainsCommand {
    fn from(args: DomainsArgs) -> DomainsCommand {
        match args {
            DomainsArgs::List => DomainsCommand::List,
            DomainsArgs::Expiring => DomainsCommand::Expiring,
            DomainsArgs::Add {
                name,
                expiry,
                provider,
                renewal_cost,
                auto_renewal,
            } => DomainsCommand::Add {
                name,
                provider,
                expiry_date: expiry,
                renewal_cost,
                auto_renewal,
            },
            DomainsArgs::Edit {
                id,
                name,
                provider,
                expiry,
                renewal_cost,
                auto_renewal,
            } => DomainsCommand::Edit {
                id,
                patch: DomainPatch {
                    name,
                    provider,
                    expiry_date: expiry,
                    renewal_cost,
                    auto_renewal,
                },
            },
            DomainsArgs::Remove { id } => DomainsCommand::Remove { id },
        }
    }
}

impl From<Commands> for subcost::AppCommand {
    fn from(cmd: Commands) -> subcost::AppCommand {
        match cmd {
            Commands::Summary { currency, years } => {
                subcost::AppCommand::Summary { currency, years }
            }
            Commands::Subs(args) => subcost::AppCommand::Subs(args.into()),
            Commands::Domains(args) => subcost::AppCommand::Domains(args.into()),
            Commands::Rates {
                currency,
                amount,
                filter,
            } => subcost::AppCommand::Rates {
                currency,
                amount: amount.as_deref().map(parse_amount),
                filter,
            },
            Commands::Budget {
                amount,
                currency,
                year,
            } => subcost::AppCommand::Budget {
                amount: amount.as_deref().map(parse_amount),
                currency,
                year,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => subcost::cli::setup::setup(),
        Some(cmd) => subcost::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
