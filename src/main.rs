//! tld-sweep - check a word's domain availability across every TLD

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use tld_sweep::{
    reconcile::load_unchecked,
    store::OutputLayout,
    tlds::{load_tld_list, TldOrigin},
    types::{default_workers, RetryPolicy, SweepConfig},
    validate_word, SweepError, WhoisClient,
};

#[derive(Parser, Debug)]
#[command(name = "tld-sweep")]
#[command(version, about = "Check whether <word>.<tld> is registered for every known TLD", long_about = None)]
struct Cli {
    /// The word to check availability for (lowercase letters only)
    word: String,

    /// TLD list file; downloaded from IANA when missing
    #[arg(short = 't', long, env = "TLD_SWEEP_TLD_FILE", default_value = "tlds.txt")]
    tld_file: PathBuf,

    /// Directory for outcome files, the unchecked list and errors.log
    #[arg(short = 'o', long, env = "TLD_SWEEP_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Concurrent lookups (default: available parallelism)
    #[arg(short = 'w', long, env = "TLD_SWEEP_WORKERS")]
    workers: Option<usize>,

    /// Lookup attempts per TLD
    #[arg(long, env = "TLD_SWEEP_ATTEMPTS", default_value_t = 3)]
    attempts: u32,

    /// Seconds to wait between attempts
    #[arg(long, env = "TLD_SWEEP_RETRY_DELAY", default_value_t = 5)]
    retry_delay: u64,

    /// Per-query WHOIS socket timeout in seconds
    #[arg(long, env = "TLD_SWEEP_TIMEOUT", default_value_t = 10)]
    timeout: u64,

    /// Only re-check the TLDs listed in unchecked_domains.txt. That file is
    /// shared by every word and holds the gaps of the last run in --output-dir
    #[arg(long)]
    retry_unchecked: bool,

    /// Write a downloaded TLD list to --tld-file
    #[arg(long)]
    save_tlds: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Also log progress and debug events to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Result<SweepConfig, SweepError> {
        if self.workers == Some(0) {
            return Err(SweepError::config("--workers must be at least 1"));
        }
        if self.attempts == 0 {
            return Err(SweepError::config("--attempts must be at least 1"));
        }

        Ok(SweepConfig {
            workers: self.workers.unwrap_or_else(default_workers),
            retry: RetryPolicy {
                attempts: self.attempts,
                delay: Duration::from_secs(self.retry_delay),
            },
            timeout: Duration::from_secs(self.timeout),
            tld_file: self.tld_file.clone(),
            output_dir: self.output_dir.clone(),
            show_progress: !self.quiet,
        })
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = tld_sweep::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<SweepError>() {
            Some(sweep_error) => eprintln!("{}", sweep_error.user_message()),
            None => eprintln!("❌ Error: {:#}", e),
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Nothing may touch the filesystem or network before the word is accepted.
    validate_word(&cli.word)?;

    let config = cli.config()?;
    let layout = OutputLayout::new(&config.output_dir);
    std::fs::create_dir_all(layout.dir())
        .with_context(|| format!("creating output directory {}", layout.dir().display()))?;
    tld_sweep::logging::init(&layout.error_log_path(), cli.verbose)?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("tld-sweep/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;

    let (universe, origin) = load_tld_list(&config.tld_file, &http, cli.save_tlds).await?;
    if origin == TldOrigin::Iana && !cli.save_tlds {
        tracing::info!("TLD list downloaded from IANA; pass --save-tlds to keep it");
    }

    let targets = if cli.retry_unchecked {
        let pending = load_unchecked(&layout).context("reading unchecked_domains.txt for --retry-unchecked")?;
        let source = layout.unchecked_path();
        tracing::warn!(
            word = %cli.word,
            path = %source.display(),
            tlds = pending.len(),
            "Retrying TLDs from the shared unchecked list; it reflects the last run in this directory, whatever its word"
        );
        if !cli.quiet {
            eprintln!(
                "🔁 Retrying {} TLDs listed in {} (left by the last run in this directory)",
                pending.len(),
                source.display()
            );
        }
        Some(pending)
    } else {
        None
    };

    let lookup = Arc::new(WhoisClient::with_timeout(config.timeout));
    let report = tld_sweep::sweep(&cli.word, &universe, targets.as_deref(), lookup, &config).await?;

    if !cli.quiet {
        let summary = &report.summary;
        eprintln!("📈 Summary for '{}':", cli.word);
        eprintln!("   ✅ Available: {}", summary.available);
        eprintln!("   ❌ Taken: {}", summary.unavailable);
        eprintln!("   ⚠️  Unchecked: {}", report.reconciliation.unchecked.len());
        eprintln!("   ⏱️  Total time: {:.2}s", summary.elapsed.as_secs_f32());
    }

    Ok(())
}
