use authfetch_core::options::{Headers, RequestOptions};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use crate::config::cli_config;

#[derive(Debug, Args)]
#[command(author, version, about = "send a request with the stored access token", long_about = None)]
pub struct FetchArgs {
    /// absolute url, or a path resolved against --host
    pub url: String,

    #[arg(short = 'X', long)]
    pub method: Option<String>,

    /// extra header, `Name: Value`, repeatable; repeated names are all sent
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    #[arg(short = 'd', long = "data")]
    pub body: Option<String>,

    /// print status line and response headers before the body
    #[arg(short, long, default_value_t = false)]
    pub include: bool,
}

#[derive(Tabled)]
struct HeaderRow {
    name: String,
    value: String,
}

pub(crate) async fn run(args: FetchArgs) -> anyhow::Result<()> {
    let client = cli_config().auth_client()?;
    let options = build_options(&args)?;

    let resp = client.fetch(&args.url, options).await?;

    if args.include {
        println!("{:?} {}", resp.version(), resp.status());
        let rows = resp
            .headers()
            .iter()
            .map(|(name, value)| HeaderRow {
                name: name.to_string(),
                value: String::from_utf8_lossy(value.as_bytes()).to_string(),
            })
            .collect::<Vec<_>>();
        let mut table = Table::new(rows);
        table.with(Style::blank());
        println!("{}\n", table);
    }

    println!("{}", resp.text().await?);
    Ok(())
}

fn build_options(args: &FetchArgs) -> anyhow::Result<Option<RequestOptions>> {
    if args.method.is_none() && args.headers.is_empty() && args.body.is_none() {
        return Ok(None);
    }

    let mut headers = Headers::new();
    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        headers.append(name, value);
    }

    Ok(Some(RequestOptions {
        method: args.method.clone(),
        headers: (!headers.is_empty()).then_some(headers),
        body: args.body.clone(),
        ..Default::default()
    }))
}

fn parse_header(raw: &str) -> anyhow::Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("header must look like `Name: Value`, got: {}", raw))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow::anyhow!("empty header name: {}", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
