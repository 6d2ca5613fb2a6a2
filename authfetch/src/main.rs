use std::path::PathBuf;

use authfetch_core::constants::AUTHFETCH_DEFAULT_HOST;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod fetch;
mod session;
mod token;

#[derive(Parser)]
#[command(name = "authfetch")]
#[command(bin_name = "authfetch")]
#[command(author, version, about = "send requests with the stored access token", long_about = None)]
struct AuthfetchArgs {
    /// base url relative addresses are resolved against
    #[arg(long, global = true, env = "AUTHFETCH_HOST", default_value = AUTHFETCH_DEFAULT_HOST)]
    host: String,

    /// storage file holding the access token, default: ~/.authfetch/storage.json
    #[arg(long, global = true, env = "AUTHFETCH_STORAGE")]
    storage: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: AuthfetchCommand,
}

#[derive(Subcommand)]
enum AuthfetchCommand {
    Fetch(fetch::FetchArgs),
    #[command(subcommand)]
    Token(token::TokenArgs),
    Login(session::LoginArgs),
    Signup(session::SignupArgs),
    /// remove the stored access token
    Logout,
    #[command(subcommand)]
    Reset(session::ResetArgs),
    /// show the user the stored token belongs to
    Whoami,
}

fn main() -> anyhow::Result<()> {
    let cli = AuthfetchArgs::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    config::init_cli_config(config::CliConfig::new(&cli.host, cli.storage)?);

    run_main(cli.command)
}

#[tokio::main]
async fn run_main(command: AuthfetchCommand) -> anyhow::Result<()> {
    match command {
        AuthfetchCommand::Fetch(args) => fetch::run(args).await,
        AuthfetchCommand::Token(args) => token::run(args),
        AuthfetchCommand::Login(args) => session::run_login(args).await,
        AuthfetchCommand::Signup(args) => session::run_signup(args).await,
        AuthfetchCommand::Logout => session::run_logout(),
        AuthfetchCommand::Reset(args) => session::run_reset(args).await,
        AuthfetchCommand::Whoami => session::run_whoami().await,
    }
}
