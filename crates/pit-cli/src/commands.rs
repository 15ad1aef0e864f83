use std::env;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use pit_sdk::{Commit, FileStatus, ObjectId, RepoError, Repository, StatusReport};
use serde_json::json;

use crate::cli::*;

const WILDCARD: &str = "*";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let cwd = working_dir(cli.dir.as_deref())?;
    let json = matches!(cli.format, OutputFormat::Json);
    match cli.command {
        Command::Init(args) => cmd_init(&cwd, args, json),
        Command::Add(args) => cmd_add(&cwd, args, json),
        Command::Commit(args) => cmd_commit(&cwd, args, json),
        Command::Log(args) => cmd_log(&cwd, args, json),
        Command::Status(_) => cmd_status(&cwd, json),
        Command::Show(args) => cmd_show(&cwd, args, json),
        Command::Verify(_) => cmd_verify(&cwd, json),
    }
}

fn working_dir(dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    let cwd = env::current_dir().context("cannot determine current directory")?;
    let dir = match dir {
        Some(dir) => cwd.join(dir),
        None => cwd,
    };
    dir.canonicalize()
        .with_context(|| format!("cannot access {}", dir.display()))
}

fn cmd_init(cwd: &Path, args: InitArgs, json: bool) -> anyhow::Result<()> {
    let target = match args.path {
        Some(path) => cwd.join(path),
        None => cwd.to_path_buf(),
    };
    let repo = Repository::init_repository(&target)?;
    if json {
        println!("{}", json!({ "initialized": repo.pit_dir() }));
    } else {
        println!(
            "{} Initialized empty pit repository in {}",
            "✓".green().bold(),
            repo.pit_dir().display().to_string().bold()
        );
    }
    Ok(())
}

fn cmd_add(cwd: &Path, args: AddArgs, json: bool) -> anyhow::Result<()> {
    let repo = Repository::discover(cwd)?;
    let mut added = Vec::new();

    for arg in &args.paths {
        if arg == WILDCARD {
            for path in repo.working_tree().files()? {
                match repo.stage_file(&path) {
                    Ok(id) => added.push((path, id)),
                    // Unchanged since it was staged; nothing to do.
                    Err(RepoError::AlreadyStaged { .. }) => {}
                    Err(e) => return Err(e.into()),
                }
            }
        } else {
            let path = repo_relative(repo.root(), cwd, arg);
            let id = repo.stage_file(&path)?;
            added.push((path, id));
        }
    }

    if json {
        let entries: Vec<_> = added
            .iter()
            .map(|(path, id)| json!({ "path": path, "hash": id }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (path, _) in &added {
            println!("{} Added {} to staging area", "✓".green(), path.bold());
        }
    }
    Ok(())
}

fn cmd_commit(cwd: &Path, args: CommitArgs, json: bool) -> anyhow::Result<()> {
    let repo = Repository::discover(cwd)?;
    let id = repo.commit(&args.message)?;
    if json {
        println!("{}", json!({ "commit": id }));
    } else {
        println!("{} Committed as {}", "✓".green().bold(), id.to_hex().yellow());
    }
    Ok(())
}

fn cmd_log(cwd: &Path, args: LogArgs, json: bool) -> anyhow::Result<()> {
    let repo = Repository::discover(cwd)?;
    let limit = args.limit.unwrap_or(usize::MAX);

    let mut commits = Vec::new();
    for item in repo.log()?.take(limit) {
        commits.push(item?);
    }

    if json {
        let entries: Vec<_> = commits
            .iter()
            .map(|(id, commit)| commit_json(id, commit))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if commits.is_empty() {
        println!("No commits yet!");
        return Ok(());
    }
    for (id, commit) in &commits {
        if args.oneline {
            println!("{} {}", id.short_hex().yellow(), commit.message);
        } else {
            print_commit(id, commit);
            println!();
        }
    }
    Ok(())
}

fn cmd_status(cwd: &Path, json: bool) -> anyhow::Result<()> {
    let repo = Repository::discover(cwd)?;
    let report = repo.status()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_status(&report);
    }
    Ok(())
}

fn cmd_show(cwd: &Path, args: ShowArgs, json: bool) -> anyhow::Result<()> {
    let repo = Repository::discover(cwd)?;
    let id: ObjectId = args
        .hash
        .parse()
        .with_context(|| format!("invalid commit hash {:?}", args.hash))?;
    let commit = repo.show(&id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&commit_json(&id, &commit))?);
    } else {
        print_commit(&id, &commit);
    }
    Ok(())
}

fn cmd_verify(cwd: &Path, json: bool) -> anyhow::Result<()> {
    let repo = Repository::discover(cwd)?;
    let commits = repo.verify()?;
    if json {
        println!("{}", json!({ "commits": commits, "ok": true }));
    } else {
        println!("{} {} commits verified", "✓".green().bold(), commits);
    }
    Ok(())
}

fn commit_json(id: &ObjectId, commit: &Commit) -> serde_json::Value {
    json!({
        "hash": id,
        "parent": commit.parent,
        "message": commit.message,
        "date": commit.date,
        "files": commit.files,
    })
}

fn print_commit(id: &ObjectId, commit: &Commit) {
    println!("{} {}", "Commit:".yellow().bold(), id.to_hex().yellow());
    if let Some(parent) = &commit.parent {
        println!("Parent: {}", parent.to_hex().dimmed());
    }
    println!("Date:   {}", commit.date.to_rfc3339());
    println!();
    println!("    {}", commit.message);
    if !commit.files.is_empty() {
        println!();
        for file in &commit.files {
            println!("    {}  {}", file.object_id.short_hex().dimmed(), file.path);
        }
    }
}

fn print_status(report: &StatusReport) {
    match &report.head {
        Some(head) => println!("On commit {}", head.short_hex().yellow()),
        None => println!("No commits yet!"),
    }
    if report.is_clean() {
        println!("\nNothing to commit, working tree clean.");
        return;
    }

    let sections = [
        (FileStatus::Staged, "Changes staged for commit:"),
        (FileStatus::Modified, "Changes not staged for commit:"),
        (FileStatus::Untracked, "Untracked files:"),
    ];
    for (status, title) in sections {
        let paths = report.paths_with(status);
        if paths.is_empty() {
            continue;
        }
        println!("\n{title}");
        for path in paths {
            let label = format!("{status}:");
            let label = match status {
                FileStatus::Staged => label.green(),
                FileStatus::Modified => label.red(),
                FileStatus::Untracked => label.dimmed(),
            };
            println!("  {label:<12} {path}");
        }
    }
}

/// Map a path given on the command line (relative to `cwd`) to a path
/// relative to the repository root. Paths outside the root stay absolute,
/// which staging rejects.
fn repo_relative(root: &Path, cwd: &Path, arg: &str) -> String {
    let candidate = cwd.join(arg);
    let resolved = candidate
        .canonicalize()
        .unwrap_or_else(|_| lexical_normalize(&candidate));
    match resolved.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => resolved.to_string_lossy().into_owned(),
    }
}

/// Resolve `.` and `..` without touching the filesystem, for paths that
/// do not exist yet.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn relative_from_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        assert_eq!(repo_relative(&root, &root, "a.txt"), "a.txt");
        assert_eq!(repo_relative(&root, &root, "./a.txt"), "a.txt");
    }

    #[test]
    fn relative_from_subdirectory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::write(root.join("src/nested/lib.rs"), "").unwrap();
        let cwd = root.join("src");
        assert_eq!(repo_relative(&root, &cwd, "nested/lib.rs"), "src/nested/lib.rs");
        // Missing files still map into the repository.
        assert_eq!(repo_relative(&root, &cwd, "new.rs"), "src/new.rs");
    }

    #[test]
    fn missing_file_in_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        let cwd = root.join("src");
        assert_eq!(repo_relative(&root, &cwd, "../x.txt"), "x.txt");
        assert_eq!(repo_relative(&root, &cwd, "./../docs/./y.md"), "docs/y.md");
    }

    #[test]
    fn outside_root_stays_absolute() {
        let root = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let root_path = root.path().canonicalize().unwrap();
        let other_path = other.path().canonicalize().unwrap();
        let mapped = repo_relative(&root_path, &other_path, "x.txt");
        assert!(Path::new(&mapped).is_absolute());
    }
}
