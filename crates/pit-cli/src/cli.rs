use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pit", about = "Pit - a simple version control system", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Run as if started in <DIR>
    #[arg(short = 'C', global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty pit repository
    Init(InitArgs),
    /// Add files to the staging area
    Add(AddArgs),
    /// Record staged changes to the repository
    Commit(CommitArgs),
    /// Show commit logs
    Log(LogArgs),
    /// Show the working tree status
    Status(StatusArgs),
    /// Show a single commit
    Show(ShowArgs),
    /// Check that all history objects are present and intact
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Files to stage; `*` stages every non-ignored file
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct ShowArgs {
    /// Commit address (64 hex characters)
    pub hash: String,
}

#[derive(Args)]
pub struct VerifyArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["pit", "init"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.path, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_init_with_path() {
        let cli = Cli::try_parse_from(["pit", "init", "/tmp/project"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.path, Some(PathBuf::from("/tmp/project")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_add_many() {
        let cli = Cli::try_parse_from(["pit", "add", "a.txt", "src/b.rs"]).unwrap();
        if let Command::Add(args) = cli.command {
            assert_eq!(args.paths, vec!["a.txt", "src/b.rs"]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_add_wildcard() {
        let cli = Cli::try_parse_from(["pit", "add", "*"]).unwrap();
        if let Command::Add(args) = cli.command {
            assert_eq!(args.paths, vec!["*"]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn add_requires_a_path() {
        assert!(Cli::try_parse_from(["pit", "add"]).is_err());
    }

    #[test]
    fn parse_commit() {
        let cli = Cli::try_parse_from(["pit", "commit", "-m", "hello"]).unwrap();
        if let Command::Commit(args) = cli.command {
            assert_eq!(args.message, "hello");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn commit_requires_message() {
        assert!(Cli::try_parse_from(["pit", "commit"]).is_err());
    }

    #[test]
    fn parse_log_oneline() {
        let cli = Cli::try_parse_from(["pit", "log", "--oneline", "-n", "5"]).unwrap();
        if let Command::Log(args) = cli.command {
            assert!(args.oneline);
            assert_eq!(args.limit, Some(5));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_show() {
        let cli = Cli::try_parse_from(["pit", "show", "abc"]).unwrap();
        if let Command::Show(args) = cli.command {
            assert_eq!(args.hash, "abc");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_verify() {
        let cli = Cli::try_parse_from(["pit", "verify"]).unwrap();
        assert!(matches!(cli.command, Command::Verify(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["pit", "--verbose", "status"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["pit", "--format", "json", "status"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn parse_directory_flag() {
        let cli = Cli::try_parse_from(["pit", "-C", "/work", "log"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("/work")));
    }
}
