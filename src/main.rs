//! sgit CLI - minimal version control command line interface

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use sgit::ops::{commit, log};
use sgit::{refs, Index, ObjectType, Repo};

#[derive(Parser)]
#[command(name = "sgit")]
#[command(about = "minimal version control - content-addressed object store")]
#[command(version)]
struct Cli {
    /// repository path (searched upward for a repository root)
    #[arg(short, long, default_value = ".")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// initialize a new repository
    Init {
        /// path to create repository at
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// add file contents to the index
    Add {
        /// files or directories to stage
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// show the working tree status
    Status,

    /// record changes to the repository
    Commit {
        /// commit message
        #[arg(short, long)]
        message: String,

        /// author identity, e.g. "Name <email>"
        #[arg(short, long)]
        author: Option<String>,
    },

    /// show commit logs
    Log {
        /// revision to start from (defaults to HEAD)
        rev: Option<String>,

        /// maximum number of commits to show
        #[arg(short = 'n', long)]
        max_count: Option<usize>,
    },

    /// list, create, or delete branches
    Branch {
        /// branch name to create at HEAD
        name: Option<String>,

        /// delete the named branch instead
        #[arg(short, long)]
        delete: bool,
    },

    /// point HEAD at a branch or commit
    Switch {
        /// branch name or full commit hash
        target: String,
    },

    /// show contents of an object
    CatFile {
        /// revision or object hash
        object: String,
    },

    /// resolve a revision to a hash
    RevParse {
        /// revision to resolve
        rev: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> sgit::Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let repo = Repo::init(&path)?;
            println!(
                "Initialized empty sgit repository in {}",
                repo.meta_path().display()
            );
        }

        Commands::Add { paths } => {
            let repo = Repo::discover(&cli.repo)?;
            let mut index = Index::load(&repo)?;

            for path in &paths {
                let report = index.add(&repo, path)?;
                for (failed_path, reason) in &report.failed {
                    eprintln!("warning: could not add {}: {}", failed_path, reason);
                }
            }

            index.save(&repo)?;
        }

        Commands::Status => {
            let repo = Repo::discover(&cli.repo)?;

            match repo.current_branch()? {
                Some(branch) => println!("On branch {}", branch),
                None => println!("Not currently on any branch"),
            }

            let index = Index::load(&repo)?;
            let report = index.status(&repo)?;

            if report.is_clean() {
                println!("nothing to commit, working tree clean");
            } else {
                if !report.modified.is_empty() {
                    println!("\nChanges not staged for commit:");
                    println!("  (use \"sgit add <file>...\" to update what will be committed)");
                    for path in &report.modified {
                        println!("\tmodified:   {}", path);
                    }
                }

                if !report.untracked.is_empty() {
                    println!("\nUntracked files:");
                    println!("  (use \"sgit add <file>...\" to include in what will be committed)");
                    for path in &report.untracked {
                        println!("\t{}", path);
                    }
                }

                println!("\nno changes added to commit");
            }
        }

        Commands::Commit { message, author } => {
            let repo = Repo::discover(&cli.repo)?;
            let hash = commit(&repo, &message, author.as_deref())?;
            println!("{}", hash);
        }

        Commands::Log { rev, max_count } => {
            let repo = Repo::discover(&cli.repo)?;
            let entries = log(&repo, rev.as_deref(), max_count)?;

            for entry in entries {
                println!("{}", entry);
            }
        }

        Commands::Branch { name, delete } => {
            let repo = Repo::discover(&cli.repo)?;

            match name {
                Some(name) if delete => {
                    refs::delete_branch(&repo, &name)?;
                    println!("Deleted branch {}", name);
                }
                Some(name) => {
                    let head = refs::resolve_head(&repo)?
                        .ok_or_else(|| sgit::Error::RefNotFound("HEAD".to_string()))?;
                    refs::write_branch(&repo, &name, &head)?;
                }
                None => {
                    let current = repo.current_branch()?;
                    for (branch, _) in refs::list_branches(&repo)? {
                        let marker = if Some(&branch) == current.as_ref() {
                            "*"
                        } else {
                            " "
                        };
                        println!("{} {}", marker, branch);
                    }
                }
            }
        }

        Commands::Switch { target } => {
            let repo = Repo::discover(&cli.repo)?;
            refs::update_head(&repo, &target)?;

            match refs::read_head(&repo)? {
                refs::Head::Symbolic(branch) => println!("Switched to branch {}", branch),
                refs::Head::Detached(hash) => println!("HEAD is now detached at {}", hash),
            }
        }

        Commands::CatFile { object } => {
            let repo = Repo::discover(&cli.repo)?;
            let hash = refs::resolve(&repo, &object)?;

            match sgit::load_object(&repo, &hash)? {
                (ObjectType::Blob, payload) => {
                    std::io::stdout()
                        .write_all(&payload)
                        .map_err(|source| sgit::Error::Io {
                            path: PathBuf::from("<stdout>"),
                            source,
                        })?;
                }
                (ObjectType::Tree, _) => {
                    let tree = sgit::read_tree(&repo, &hash)?;
                    for entry in tree.entries() {
                        println!("{} {} {}", entry.mode, entry.hash, entry.name);
                    }
                }
                (ObjectType::Commit, payload) => {
                    print!("{}", String::from_utf8_lossy(&payload));
                    println!();
                }
            }
        }

        Commands::RevParse { rev } => {
            let repo = Repo::discover(&cli.repo)?;
            let hash = refs::resolve(&repo, &rev)?;
            println!("{}", hash);
        }
    }

    Ok(())
}
