use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use grove::Result;
use grove::commands::init::Shell;
use grove::commands::{add, init, remove, setup, switch};
use grove::deps;
use grove::errors::GroveError;

#[derive(Parser)]
#[command(name = "grove")]
#[command(about = "A CLI tool for managing git worktrees in a per-repository container")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a worktree, reusing the branch if it exists or creating it from HEAD
    Add {
        /// Directory name for the worktree under the container
        #[arg(value_hint = ValueHint::Other)]
        dir_name: String,
        /// Branch to check out in the worktree
        #[arg(value_hint = ValueHint::Other)]
        branch_name: String,
    },
    /// Interactively select a worktree and remove it
    Remove,
    /// Add the worktree container to the global git ignore file
    Setup,
    /// Generate shell integration for directory navigation
    Init {
        /// Shell to generate integration for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    #[command(external_subcommand)]
    External(Vec<String>),
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return handle_parse_error(&err),
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if matches!(
                err.downcast_ref::<GroveError>(),
                Some(GroveError::UnknownCommand { .. })
            ) {
                eprintln!();
                eprintln!("{}", Cli::command().render_usage());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // External tools are verified before any command runs
    deps::check()?;

    match cli.command {
        // Bare invocation: pick a worktree and hand its path to the shell
        // wrapper on stdout. Everything else goes to stderr.
        None => match switch::switch_worktree()? {
            Some(path) => println!("{}", path.display()),
            None => eprintln!("No worktree selected."),
        },
        Some(Commands::Add {
            dir_name,
            branch_name,
        }) => {
            add::add_worktree(&dir_name, &branch_name)?;
        }
        Some(Commands::Remove) => {
            if remove::remove_worktree()?.is_none() {
                eprintln!("No worktree selected.");
            }
        }
        Some(Commands::Setup) => {
            setup::run_setup()?;
        }
        Some(Commands::Init { shell }) => {
            init::generate_shell_integration(shell);
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            init::generate_completions(shell, &mut cmd);
        }
        Some(Commands::External(args)) => {
            let command = args.first().cloned().unwrap_or_default();
            return Err(GroveError::UnknownCommand { command }.into());
        }
    }

    Ok(())
}

fn handle_parse_error(err: &clap::Error) -> ExitCode {
    use clap::error::ErrorKind;

    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        kind => {
            // Arity and flag mistakes; clap's rendering carries the usage
            // block that accompanies the failure message.
            let message = match kind {
                ErrorKind::MissingRequiredArgument => "missing required arguments",
                ErrorKind::UnknownArgument | ErrorKind::InvalidSubcommand => {
                    "unrecognized argument"
                }
                _ => "invalid arguments",
            };
            let invalid = GroveError::InvalidArguments {
                message: message.to_string(),
            };
            log::debug!("argument parsing failed: {invalid}");
            let _ = err.print();
            ExitCode::FAILURE
        }
    }
}
