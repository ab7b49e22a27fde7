use anyhow::Result;
use bucketstats::{init_tracing_once, BucketStats, LocalStore, ObjectStore, S3Store, ScanOptions};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

/// Top-level CLI entry point.
#[derive(Debug, Parser)]
#[command(
    name = "bucketstats",
    version,
    about = "Byte totals and word statistics over an object-storage prefix"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Read buckets from `<DIR>/<bucket>/…` on disk instead of S3.
    #[arg(global = true, long, value_name = "DIR")]
    local_root: Option<PathBuf>,
    /// S3-compatible endpoint (falls back to S3_ENDPOINT_URL).
    #[arg(global = true, long, value_name = "URL")]
    endpoint_url: Option<String>,
    /// Draw a progress bar on stderr.
    #[arg(global = true, long)]
    progress: bool,
    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Total size of every object under a prefix, in GiB.
    Size(Target),
    /// Share of Hebrew words against the declared `n_words` across CSV objects.
    Hebrew(Target),
    /// Whitespace word count across line-delimited JSON objects.
    Words(WordsArgs),
}

#[derive(Debug, Args)]
struct Target {
    #[arg(long)]
    bucket: Option<String>,
    #[arg(long)]
    prefix: Option<String>,
}

impl Target {
    fn apply(self, mut opts: ScanOptions) -> ScanOptions {
        if let Some(b) = self.bucket {
            opts = opts.with_bucket(b);
        }
        if let Some(p) = self.prefix {
            opts = opts.with_prefix(p);
        }
        opts
    }
}

#[derive(Debug, Args)]
struct WordsArgs {
    #[command(flatten)]
    target: Target,
    /// Only keys ending with this are counted; compression follows the key (.gz, .zst).
    #[arg(long)]
    suffix: Option<String>,
    /// Text field priority, repeatable (default: text, content, body, message, data).
    #[arg(long = "field", value_name = "NAME")]
    fields: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing_once(cli.verbose);

    let store: Box<dyn ObjectStore> = match &cli.local_root {
        Some(root) => Box::new(LocalStore::new(root)),
        None => Box::new(S3Store::connect(cli.endpoint_url.as_deref())?),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Size(target) => {
            BucketStats::new(target.apply(ScanOptions::for_size()))
                .progress(cli.progress)
                .total_size(store.as_ref(), &mut out)?;
        }
        Commands::Hebrew(target) => {
            BucketStats::new(target.apply(ScanOptions::for_hebrew()))
                .progress(cli.progress)
                .hebrew_ratio(store.as_ref(), &mut out)?;
        }
        Commands::Words(args) => {
            let mut opts = args.target.apply(ScanOptions::for_words()).with_text_fields(args.fields);
            if let Some(s) = args.suffix {
                opts = opts.with_suffix(s);
            }
            BucketStats::new(opts)
                .progress(cli.progress)
                .word_count(store.as_ref(), &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
