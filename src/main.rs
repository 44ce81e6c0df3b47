//! pit - minimal content-addressed version control command line interface

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pit::ops::{self, fsck, log, ls_tree};
use pit::{IoResultExt, ObjectType, Repo};

#[derive(Parser)]
#[command(name = "pit")]
#[command(about = "minimal content-addressed version control")]
#[command(version)]
struct Cli {
    /// working tree root (the store lives in `<root>/.pit`)
    #[arg(short = 'C', long = "work-tree", env = "PIT_WORK_TREE", default_value = ".", global = true)]
    work_tree: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// initialize a new repository
    Init,

    /// store a file as a blob and print its id
    HashObject {
        /// file to store
        file: PathBuf,
    },

    /// write an object's raw payload to stdout
    CatFile {
        /// object id, or HEAD
        object: String,

        /// fail unless the object has this type (blob, tree, commit)
        #[arg(short = 't', long = "type")]
        expected: Option<String>,
    },

    /// snapshot the working tree and print the tree id
    WriteTree,

    /// replace the working tree with a tree or commit
    ReadTree {
        /// tree id, commit id, or HEAD
        tree: String,
    },

    /// snapshot the working tree as a new commit on HEAD
    Commit {
        /// commit message
        #[arg(short, long)]
        message: String,
    },

    /// show commit history
    Log {
        /// commit to start from (defaults to HEAD)
        rev: Option<String>,

        /// maximum number of commits to show
        #[arg(short = 'n', long)]
        max_count: Option<usize>,
    },

    /// list tree contents
    LsTree {
        /// tree id, commit id, or HEAD
        #[arg(default_value = "HEAD")]
        rev: String,

        /// list every file path
        #[arg(short, long)]
        recursive: bool,
    },

    /// verify repository integrity
    Fsck,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// log to stderr so stdout only carries command output
fn init_tracing() {
    let filter = EnvFilter::try_from_env("PIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> pit::Result<()> {
    let work_tree = cli.work_tree;
    let open = || Repo::open(&work_tree);

    match cli.command {
        Commands::Init => {
            let repo = Repo::init(&work_tree)?;
            let path = repo.path().canonicalize().with_path(repo.path())?;
            println!("Initialized empty pit repository in {}", path.display());
        }

        Commands::HashObject { file } => {
            let repo = open()?;
            let id = ops::hash_object(&repo, &file)?;
            println!("{}", id);
        }

        Commands::CatFile { object, expected } => {
            let repo = open()?;
            let expected = expected.map(|t| t.parse::<ObjectType>()).transpose()?;
            let payload = ops::cat_file(&repo, &object, expected)?;

            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&payload)
                .and_then(|()| stdout.flush())
                .with_path("stdout")?;
        }

        Commands::WriteTree => {
            let repo = open()?;
            let id = ops::write_tree(&repo)?;
            println!("{}", id);
        }

        Commands::ReadTree { tree } => {
            let repo = open()?;
            let id = ops::read_tree(&repo, &tree)?;
            tracing::debug!(tree = %id, "read-tree done");
        }

        Commands::Commit { message } => {
            let repo = open()?;
            let id = ops::commit(&repo, &message)?;
            println!("{}", id);
        }

        Commands::Log { rev, max_count } => {
            let repo = open()?;
            let start = rev.map(|r| repo.resolve(&r)).transpose()?;
            let entries = log(&repo, start, max_count)?;

            for (i, entry) in entries.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", entry);
            }
        }

        Commands::LsTree { rev, recursive } => {
            let repo = open()?;
            for entry in ls_tree(&repo, &rev, recursive)? {
                println!("{}", entry);
            }
        }

        Commands::Fsck => {
            let repo = open()?;
            let report = fsck(&repo)?;

            for obj in &report.corrupt_objects {
                println!("corrupt {}: {}", obj.id, obj.message);
            }
            for obj in &report.missing_objects {
                println!(
                    "missing {} {} (referenced by {})",
                    obj.object_type, obj.id, obj.referenced_by
                );
            }
            for id in &report.dangling_objects {
                println!("dangling {}", id);
            }

            println!("checked {} objects", report.objects_checked);

            if !report.is_ok() {
                return Err(pit::Error::FsckFailed {
                    corrupt: report.corrupt_objects.len(),
                    missing: report.missing_objects.len(),
                });
            }
        }
    }

    Ok(())
}
