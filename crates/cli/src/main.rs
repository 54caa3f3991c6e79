//! Portfolio CLI - Submit and check contact form input from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Send a message through the relay (developer form)
//! portfolio-cli send --form dev -n "Jo" -e jo@x.com -m "Hello there, this is long enough."
//!
//! # Send a project inquiry (client form)
//! portfolio-cli send --form client -n "Jo" -e jo@x.com -m "Need a landing page" --company Acme
//!
//! # Check input without sending
//! portfolio-cli validate -n "J" -e nope -m short
//!
//! # Print a WhatsApp link
//! portfolio-cli deep-link -n "Jo" -m "Hello!"
//! ```
//!
//! # Commands
//!
//! - `send` - Validate and submit through the relay
//! - `validate` - Run the validation schema only
//! - `deep-link` - Build a WhatsApp click-to-chat link

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand, ValueEnum};
use portfolio_core::{FormKind, RawSubmission};

mod commands;

#[derive(Parser)]
#[command(name = "portfolio-cli")]
#[command(author, version, about = "Portfolio contact form tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and send a contact message through the relay
    Send {
        #[command(flatten)]
        form: FormArgs,

        /// Don't print the WhatsApp follow-up link after sending
        #[arg(long)]
        no_deep_link: bool,
    },
    /// Validate a contact message without sending it
    Validate {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Print a WhatsApp click-to-chat link
    DeepLink {
        /// Sender name; the default greeting is used when name or message is missing
        #[arg(short, long)]
        name: Option<String>,

        /// Message to prefill
        #[arg(short, long)]
        message: Option<String>,

        /// Phone number in international format
        #[arg(long, env = "PORTFOLIO_WHATSAPP_PHONE", default_value = portfolio_client::config::DEFAULT_WHATSAPP_PHONE)]
        phone: String,
    },
}

/// Which contact form to fill.
#[derive(Clone, Copy, ValueEnum)]
enum FormArg {
    /// Project inquiry (name, email, project, company)
    Client,
    /// Developer contact (name, email, message, GitHub)
    Dev,
}

impl From<FormArg> for FormKind {
    fn from(arg: FormArg) -> Self {
        match arg {
            FormArg::Client => Self::Client,
            FormArg::Dev => Self::Dev,
        }
    }
}

#[derive(Args)]
struct FormArgs {
    /// Form variant
    #[arg(long, value_enum, default_value = "client")]
    form: FormArg,

    /// Your name
    #[arg(short, long, default_value = "")]
    name: String,

    /// Your email address
    #[arg(short, long, default_value = "")]
    email: String,

    /// Message (project description on the client form)
    #[arg(short, long, default_value = "")]
    message: String,

    /// Company (client form)
    #[arg(long, conflicts_with = "github")]
    company: Option<String>,

    /// GitHub profile (developer form)
    #[arg(long)]
    github: Option<String>,
}

impl FormArgs {
    fn into_raw(self) -> RawSubmission {
        let kind = FormKind::from(self.form);
        let (company, github) = match kind {
            FormKind::Client => (self.company, None),
            FormKind::Dev => (None, self.github),
        };
        RawSubmission {
            kind,
            name: self.name,
            email: self.email,
            message: self.message,
            company,
            github,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Send { form, no_deep_link } => {
            commands::send::run(form.into_raw(), !no_deep_link).await
        }
        Commands::Validate { form } => commands::validate::run(&form.into_raw()),
        Commands::DeepLink {
            name,
            message,
            phone,
        } => {
            commands::deep_link::run(&phone, name.as_deref(), message.as_deref());
            Ok(())
        }
    }
}
