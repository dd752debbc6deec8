use clap::{Parser, Subcommand};
use folio::contact::{ContactController, Field, Recipient, SubmitOutcome};
use folio::content::ContentStore;
use folio::generate::{self, BuildOptions};
use folio::relay::{self, RelayConfig};
use folio::{config, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for developer portfolios")]
#[command(long_about = "\
Static site generator for developer portfolios

Your content directory is a set of JSON documents. folio renders them into a
static site: a single-page home with one section per navigation entry, detail
pages for projects, achievements, experience and education, and a 404 page.

Content structure:

  content/
  ├── profile.json                 # Name, title, bio, contact, social links (required)
  ├── skills.json                  # Skill categories
  ├── projects.json                # Projects and filter categories
  ├── experience.json              # Work history
  ├── education.json
  ├── achievements.json
  ├── certifications.json
  ├── activities.json
  ├── site.json                    # SEO metadata, optional custom navigation
  ├── config.toml                  # Colors, theme, layout limits (optional)
  ├── relay.toml                   # Mail relay credentials (optional)
  └── images/                      # Copied to the output as-is

Every file except profile.json is optional.

Mail relay settings come from EMAILJS_SERVICE_ID, EMAILJS_TEMPLATE_ID and
EMAILJS_PUBLIC_KEY, falling back to relay.toml. Without them the contact form
opens the visitor's mail client instead.

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the site into the output directory
    Build {
        /// Show render errors on the fallback error page
        #[arg(long)]
        dev: bool,
    },
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Send a message through the contact pipeline
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "folio=debug" } else { "folio=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build { dev } => {
            println!(
                "==> Building {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let report = generate::build(&cli.source, &cli.output, &BuildOptions { dev })?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let report = generate::check(&cli.source)?;
            output::print_check_output(&report);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Contact {
            name,
            email,
            message,
        } => {
            let store = ContentStore::load(&cli.source)?;
            let relay_config = RelayConfig::load(&cli.source)?;
            let recipient = Recipient {
                name: store.profile.name.clone(),
                email: store.profile.email.clone(),
            };
            let mut controller =
                ContactController::new(recipient, relay::relay_from_config(&relay_config));
            controller.set_field(Field::Name, name);
            controller.set_field(Field::Email, email);
            controller.set_field(Field::Message, message);

            let outcome = controller.submit().await;
            output::print_contact_output(&outcome, controller.status(), controller.errors());
            if matches!(outcome, SubmitOutcome::Invalid | SubmitOutcome::Failed) {
                return Err(format!("message not sent ({outcome:?})").into());
            }
        }
    }

    Ok(())
}
