use authfetch_core::{
    api::{
        req::{LoginRequest, PasswordResetRequest, ResetPasswordRequest, SignupRequest},
        resp::{AccessTokenResponse, ErrorResponse, MessageResponse, ResetLinkResponse},
    },
    constants::{
        ACCESS_TOKEN_KEY, AUTH_LOGIN_PATH, AUTH_REQUEST_RESET_PATH, AUTH_RESET_PASSWORD_PATH,
        AUTH_SIGNUP_PATH, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE, USERS_ME_PATH,
    },
    fetch::{AuthFetch, Fetch},
    options::RequestOptions,
    storage::TokenStorage,
};
use clap::{Args, Subcommand};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::config::cli_config;

#[derive(Debug, Args)]
#[command(author, version, about = "log in and store the access token", long_about = None)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: String,

    #[arg(short, long)]
    pub password: String,
}

#[derive(Debug, Args)]
#[command(author, version, about = "create an account and store the access token", long_about = None)]
pub struct SignupArgs {
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub email: String,

    #[arg(short, long)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
#[command(author, version, about = "password reset command", long_about = None)]
pub enum ResetArgs {
    /// ask the server for a reset link
    Request {
        #[arg(short, long)]
        email: String,
    },
    /// set a new password with the token from the reset link
    Confirm {
        #[arg(short, long)]
        token: String,

        #[arg(short, long)]
        new_password: String,
    },
}

pub(crate) async fn run_login(args: LoginArgs) -> anyhow::Result<()> {
    let config = cli_config();
    let req = LoginRequest {
        email: args.email,
        password: args.password,
    };
    login(&config.fetcher()?, &config.storage(), &req).await?;
    info!("logged in as {}", req.email);
    Ok(())
}

pub(crate) async fn run_signup(args: SignupArgs) -> anyhow::Result<()> {
    let config = cli_config();
    let req = SignupRequest {
        name: args.name,
        email: args.email,
        password: args.password,
    };
    signup(&config.fetcher()?, &config.storage(), &req).await?;
    info!("signed up as {}", req.email);
    Ok(())
}

pub(crate) fn run_logout() -> anyhow::Result<()> {
    logout(&cli_config().storage())?;
    info!("logged out");
    Ok(())
}

pub(crate) async fn run_reset(args: ResetArgs) -> anyhow::Result<()> {
    let fetcher = cli_config().fetcher()?;
    match args {
        ResetArgs::Request { email } => {
            let resp = request_password_reset(&fetcher, &PasswordResetRequest { email }).await?;
            println!("{}", resp.reset_link);
        }
        ResetArgs::Confirm {
            token,
            new_password,
        } => {
            let resp = reset_password(
                &fetcher,
                &ResetPasswordRequest {
                    token,
                    new_password,
                },
            )
            .await?;
            println!("{}", resp.message);
        }
    }
    Ok(())
}

pub(crate) async fn run_whoami() -> anyhow::Result<()> {
    let me = whoami(&cli_config().auth_client()?).await?;
    println!("{}", serde_json::to_string_pretty(&me)?);
    Ok(())
}

pub(crate) async fn login<F, S>(fetcher: &F, storage: &S, req: &LoginRequest) -> anyhow::Result<()>
where
    F: Fetch<Response = reqwest::Response>,
    S: TokenStorage,
{
    let resp: AccessTokenResponse = post_json(fetcher, AUTH_LOGIN_PATH, req).await?;
    storage.set_item(ACCESS_TOKEN_KEY, &resp.access_token)
}

pub(crate) async fn signup<F, S>(fetcher: &F, storage: &S, req: &SignupRequest) -> anyhow::Result<()>
where
    F: Fetch<Response = reqwest::Response>,
    S: TokenStorage,
{
    let resp: AccessTokenResponse = post_json(fetcher, AUTH_SIGNUP_PATH, req).await?;
    storage.set_item(ACCESS_TOKEN_KEY, &resp.access_token)
}

pub(crate) fn logout<S: TokenStorage>(storage: &S) -> anyhow::Result<()> {
    storage.remove_item(ACCESS_TOKEN_KEY)
}

pub(crate) async fn request_password_reset<F>(
    fetcher: &F,
    req: &PasswordResetRequest,
) -> anyhow::Result<ResetLinkResponse>
where
    F: Fetch<Response = reqwest::Response>,
{
    post_json(fetcher, AUTH_REQUEST_RESET_PATH, req).await
}

pub(crate) async fn reset_password<F>(
    fetcher: &F,
    req: &ResetPasswordRequest,
) -> anyhow::Result<MessageResponse>
where
    F: Fetch<Response = reqwest::Response>,
{
    post_json(fetcher, AUTH_RESET_PASSWORD_PATH, req).await
}

pub(crate) async fn whoami<S, F>(client: &AuthFetch<S, F>) -> anyhow::Result<serde_json::Value>
where
    S: TokenStorage,
    F: Fetch<Response = reqwest::Response>,
{
    let resp = client.fetch(USERS_ME_PATH, None).await?;
    read_json(resp).await
}

// auth endpoints are called without a bearer token
async fn post_json<F, T, R>(fetcher: &F, path: &str, body: &T) -> anyhow::Result<R>
where
    F: Fetch<Response = reqwest::Response>,
    T: Serialize,
    R: DeserializeOwned,
{
    let options = RequestOptions::default()
        .with_method("POST")
        .with_header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)
        .with_body(serde_json::to_string(body)?);

    let resp = fetcher.fetch(path, options).await?;
    read_json(resp).await
}

async fn read_json<R: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<R> {
    let status = resp.status();
    let text = resp.text().await?;
    debug!("{} {}", status, text);

    if !status.is_success() {
        let msg = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.msg())
            .unwrap_or(text);
        return Err(anyhow::anyhow!("server returned {}: {}", status, msg));
    }

    Ok(serde_json::from_str(&text)?)
}
