use anyhow::Context;
use bitstore::areas::repository::Repository;
use bitstore::commands::UsageError;
use bitstore::commands::plumbing::cat_file::CatFileMode;
use bitstore::commands::plumbing::hash_object::{self, HashSource};
use bitstore::commands::plumbing::ls_files::LsFilesFilter;
use bitstore::commands::plumbing::update_index::UpdateIndexOptions;
use bitstore::errors::Error;
use bytes::Bytes;
use clap::{ArgGroup, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status for repository and usage failures
const FATAL_EXIT_CODE: u8 = 128;

#[derive(Parser)]
#[command(
    name = "bitstore",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A content-addressable object store modeled on git's plumbing",
    long_about = "Stores blobs, trees and commits by their SHA-1 ids, \
    keeps a binary staging index compatible with git's, \
    and builds tree objects from it.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create an empty repository or reinitialize an existing one"
    )]
    Init {
        #[arg(index = 1, help = "The directory to initialize (defaults to the current one)")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "hash-object",
        about = "Compute the blob id of files and optionally store them"
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(long, help = "Read the content from standard input")]
        stdin: bool,
        #[arg(index = 1)]
        files: Vec<PathBuf>,
    },
    #[command(
        name = "cat-file",
        about = "Print the type, size or content of an object",
        group(ArgGroup::new("mode").required(true).args(["object_type", "size", "pretty"]))
    )]
    CatFile {
        #[arg(short = 't', help = "Print the object type")]
        object_type: bool,
        #[arg(short = 's', help = "Print the payload size")]
        size: bool,
        #[arg(short = 'p', help = "Pretty-print the content")]
        pretty: bool,
        #[arg(index = 1, help = "Full, abbreviated or symbolic object name")]
        object: String,
    },
    #[command(
        name = "update-index",
        about = "Register file contents in the index"
    )]
    UpdateIndex {
        #[arg(long, conflicts_with = "remove", help = "Add files that are not in the index yet")]
        add: bool,
        #[arg(long, help = "Remove files that no longer exist from the index")]
        remove: bool,
        #[arg(index = 1, required = true)]
        paths: Vec<PathBuf>,
    },
    #[command(name = "ls-files", about = "Show files in the index")]
    LsFiles {
        #[arg(short = 'c', long, help = "Show cached files (default)")]
        cached: bool,
        #[arg(short = 'd', long, help = "Show deleted files")]
        deleted: bool,
        #[arg(short = 'm', long, help = "Show modified files")]
        modified: bool,
    },
    #[command(name = "write-tree", about = "Create tree objects from the index")]
    WriteTree,
    #[command(
        name = "commit-tree",
        about = "Create a commit object for a tree",
        long_about = "Creates a commit for the given tree. The message is read from \
        standard input unless -m is given; the author comes from GIT_AUTHOR_NAME, \
        GIT_AUTHOR_EMAIL and GIT_AUTHOR_DATE."
    )]
    CommitTree {
        #[arg(index = 1)]
        tree: String,
        #[arg(short = 'p', help = "Parent commit")]
        parents: Vec<String>,
        #[arg(short = 'm', help = "The commit message")]
        message: Option<String>,
    },
    #[command(name = "update-ref", about = "Point a reference at an object")]
    UpdateRef {
        #[arg(index = 1)]
        name: String,
        #[arg(index = 2)]
        object: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.use_stderr() {
                true => FATAL_EXIT_CODE,
                false => 0,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fatal: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Unable to read the current directory")?;
    let stdout = || Box::new(std::io::stdout()) as Box<dyn std::io::Write>;

    match cli.command {
        Commands::Init { path } => {
            let path = path.map(|path| cwd.join(path)).unwrap_or_else(|| cwd.clone());
            Repository::new(&path, stdout())?.init()
        }
        Commands::HashObject {
            write,
            stdin,
            files,
        } => {
            let mut sources = Vec::with_capacity(files.len() + 1);
            if stdin {
                sources.push(HashSource::Content(read_stdin()?));
            }
            sources.extend(files.into_iter().map(HashSource::File));

            match write {
                true => discover(&cwd)?.hash_object(&sources, true),
                false => hash_object::print_blob_ids(&sources, &mut std::io::stdout()),
            }
        }
        Commands::CatFile {
            object_type,
            size,
            pretty,
            object,
        } => {
            let mode = match (object_type, size, pretty) {
                (true, _, _) => CatFileMode::Type,
                (_, true, _) => CatFileMode::Size,
                _ => CatFileMode::Pretty,
            };
            discover(&cwd)?.cat_file(mode, &object)
        }
        Commands::UpdateIndex { add, remove, paths } => {
            let options = UpdateIndexOptions { add, remove };
            discover(&cwd)?.update_index(&cwd, &paths, options)
        }
        Commands::LsFiles {
            cached,
            deleted,
            modified,
        } => {
            let filter = LsFilesFilter {
                cached,
                deleted,
                modified,
            };
            discover(&cwd)?.ls_files(filter)
        }
        Commands::WriteTree => discover(&cwd)?.write_tree(),
        Commands::CommitTree {
            tree,
            parents,
            message,
        } => {
            let mut repository = discover(&cwd)?;
            let message = match message {
                Some(message) => format!("{}\n", message.trim_end_matches('\n')),
                None => String::from_utf8(read_stdin()?.to_vec())
                    .context("Commit message is not valid UTF-8")?,
            };
            repository.commit_tree(&tree, &parents, message)
        }
        Commands::UpdateRef { name, object } => discover(&cwd)?.update_ref(&name, &object),
    }
}

fn discover(cwd: &Path) -> anyhow::Result<Repository> {
    Ok(Repository::discover(cwd, Box::new(std::io::stdout()))?)
}

fn read_stdin() -> anyhow::Result<Bytes> {
    let mut content = Vec::new();
    std::io::stdin()
        .read_to_end(&mut content)
        .context("Unable to read standard input")?;
    Ok(Bytes::from(content))
}

/// 128 for repository and usage failures, 1 for everything else
fn exit_code(error: &anyhow::Error) -> u8 {
    for cause in error.chain() {
        if cause.downcast_ref::<UsageError>().is_some() {
            return FATAL_EXIT_CODE;
        }
        match cause.downcast_ref::<Error>() {
            Some(Error::Io { .. }) => return 1,
            Some(_) => return FATAL_EXIT_CODE,
            None => {}
        }
    }

    1
}
