use {
    anyhow::{Context, Result, bail},
    clap::{ColorChoice, Parser, ValueEnum},
    colored::Colorize,
    flexi_logger::Logger,
    libhgbatch::{
        BookmarkNaming, Config, DesktopNotifier, Importer, Notifier, Outcome, ProcessRunner,
        SilentNotifier,
    },
    std::path::PathBuf,
};

const DEFAULT_DEST: &str = "~/hg-draft";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Naming {
    /// p<number>, from the number the file name starts with
    Numeric,
    /// p<first three words of the file name>, without any "N-of-M" marker
    Slug,
}

impl From<Naming> for BookmarkNaming {
    fn from(naming: Naming) -> BookmarkNaming {
        match naming {
            Naming::Numeric => BookmarkNaming::Numeric,
            Naming::Slug => BookmarkNaming::Slug,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(version, author, color(ColorChoice::Auto))]
#[command(
    name = "hgbatch",
    about = "Apply a batch of exported Mercurial patches to a working copy."
)]
pub struct Opts {
    /// patch files, as written by `hg export`
    patches: Vec<PathBuf>,
    /// working copy to import into
    #[arg(long, env = "PATCH_DEST", default_value = DEFAULT_DEST)]
    dest: String,
    /// sort the patches so that each one comes after its parent
    #[arg(long)]
    reorder: bool,
    /// how to name the bookmark (defaults to "slug" with --reorder and "numeric" otherwise)
    #[arg(long, value_enum)]
    naming: Option<Naming>,
    /// the Mercurial executable
    #[arg(long, default_value = "hg")]
    hg: String,
    /// the program used for desktop notifications
    #[arg(long, default_value = "notify-send")]
    notify_send: String,
    /// only log notifications instead of showing them
    #[arg(long)]
    no_notify: bool,
    /// file to append the output of every hg command to
    #[arg(long, conflicts_with = "no_log")]
    log_file: Option<PathBuf>,
    /// don't keep a log of hg commands
    #[arg(long)]
    no_log: bool,
    /// file to write the final patch order to
    #[arg(long)]
    manifest: Option<PathBuf>,
}

fn main() {
    let opts = Opts::parse();

    let _logger = Logger::try_with_env_or_str("warn")
        .and_then(|logger| logger.start())
        .unwrap_or_else(|e| panic!("Logger initialization failed with {e}"));

    match run(opts) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            println!("Error: {e}");
            for cause in e.chain().skip(1) {
                println!("\tcaused by: {cause}");
            }
            std::process::exit(1);
        }
    }
}

fn run(opts: Opts) -> Result<i32> {
    let config = config(&opts)?;
    if !opts.patches.is_empty() && !config.dest.is_dir() {
        bail!("The destination {:?} is not a directory", config.dest);
    }

    let patches = opts
        .patches
        .iter()
        .map(|p| {
            std::path::absolute(p)
                .with_context(|| format!("Could not resolve the path {}", p.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let runner = ProcessRunner::new(&config.dest, config.log_file.clone());
    let notifier: Box<dyn Notifier> = if opts.no_notify {
        Box::new(SilentNotifier)
    } else {
        Box::new(DesktopNotifier::new(opts.notify_send))
    };

    let mut importer = Importer::new(config, runner, notifier);
    let outcome = importer
        .apply_patches(&patches)
        .context("Failed to import the patches")?;
    report(&outcome);
    Ok(outcome.exit_code())
}

fn config(opts: &Opts) -> Result<Config> {
    let mut config = Config::new(expand_home(&opts.dest)?);
    config.hg = opts.hg.clone();
    config.reorder = opts.reorder;
    config.naming = match opts.naming {
        Some(naming) => naming.into(),
        None if opts.reorder => BookmarkNaming::Slug,
        None => BookmarkNaming::Numeric,
    };
    if opts.no_log {
        config.log_file = None;
    } else if let Some(log_file) = &opts.log_file {
        config.log_file = Some(log_file.clone());
    }
    if let Some(manifest) = &opts.manifest {
        config.manifest = manifest.clone();
    }
    Ok(config)
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(PathBuf::from(path)),
    };
    let home = dirs::home_dir().context("Could not find your home directory")?;
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::NothingToPatch => println!("Nothing to patch"),
        Outcome::Applied {
            count,
            base,
            bookmark,
            fuzz,
        } => println!(
            "{} {count} patches at {base} as bookmark {bookmark}{}",
            "Applied".green().bold(),
            if *fuzz { " (with fuzz)" } else { "" },
        ),
        Outcome::ImportFailed { code, .. } => {
            println!("{} with exit code {code}", "Import failed".red().bold())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~").unwrap(), home);
        assert_eq!(expand_home("~/hg-draft").unwrap(), home.join("hg-draft"));
        assert_eq!(expand_home("/srv/hg").unwrap(), PathBuf::from("/srv/hg"));
        assert_eq!(expand_home("~other/x").unwrap(), PathBuf::from("~other/x"));
    }

    #[test]
    fn naming_follows_reorder() {
        let opts = Opts::parse_from(["hgbatch", "--dest", "/srv/hg", "--reorder", "a.patch"]);
        let config = config(&opts).unwrap();
        assert!(config.reorder);
        assert_eq!(config.naming, BookmarkNaming::Slug);

        let opts = Opts::parse_from([
            "hgbatch", "--dest", "/srv/hg", "--naming", "numeric", "--reorder",
        ]);
        assert_eq!(config_naming(&opts), BookmarkNaming::Numeric);

        let opts = Opts::parse_from(["hgbatch", "--dest", "/srv/hg"]);
        assert_eq!(config_naming(&opts), BookmarkNaming::Numeric);
    }

    fn config_naming(opts: &Opts) -> BookmarkNaming {
        config(opts).unwrap().naming
    }

    #[test]
    fn log_options() {
        let opts = Opts::parse_from(["hgbatch", "--dest", "/srv/hg", "--no-log"]);
        assert_eq!(config(&opts).unwrap().log_file, None);

        let opts = Opts::parse_from(["hgbatch", "--dest", "/srv/hg", "--log-file", "/var/log/p"]);
        assert_eq!(config(&opts).unwrap().log_file, Some(PathBuf::from("/var/log/p")));

        assert!(Opts::try_parse_from(["hgbatch", "--no-log", "--log-file", "x"]).is_err());
    }
}
