use authfetch_core::{constants::ACCESS_TOKEN_KEY, storage::TokenStorage};
use clap::{Args, Subcommand};
use tracing::info;

use crate::config::cli_config;

#[derive(Subcommand, Debug)]
#[command(author, version, about = "token command", long_about = None)]
pub enum TokenArgs {
    /// print the stored access token
    Show,
    Set(SetTokenArgs),
    /// remove the stored access token
    Clear,
}

#[derive(Debug, Args)]
#[command(author, version, about = "store an access token", long_about = None)]
pub struct SetTokenArgs {
    pub token: String,
}

pub(crate) fn run(args: TokenArgs) -> anyhow::Result<()> {
    let storage = cli_config().storage();
    match args {
        TokenArgs::Show => match show_token(&storage)? {
            Some(token) => println!("{}", token),
            None => info!("no access token in {}", storage.path().display()),
        },
        TokenArgs::Set(args) => {
            set_token(&storage, &args.token)?;
            info!("access token saved to {}", storage.path().display());
        }
        TokenArgs::Clear => {
            clear_token(&storage)?;
            info!("access token removed");
        }
    }
    Ok(())
}

pub(crate) fn show_token<S: TokenStorage>(storage: &S) -> anyhow::Result<Option<String>> {
    storage.get_item(ACCESS_TOKEN_KEY)
}

pub(crate) fn set_token<S: TokenStorage>(storage: &S, token: &str) -> anyhow::Result<()> {
    storage.set_item(ACCESS_TOKEN_KEY, token)
}

pub(crate) fn clear_token<S: TokenStorage>(storage: &S) -> anyhow::Result<()> {
    storage.remove_item(ACCESS_TOKEN_KEY)
}
