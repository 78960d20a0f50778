//! One-time Spotify authorization: prints the consent URL, reads back the
//! redirect URL and stores the resulting tokens.

use anyhow::{bail, Context, Result};
use clap::Parser;
use gesture_spotify::{
    auth::{authorize_url, exchange_code, extract_code, PkcePair},
    config::Config,
};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Authorize gesture-spotify against a Spotify account")]
struct Args {
    /// Application client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID")]
    client_id: Option<String>,

    /// Redirect URI registered for the application
    #[arg(long, env = "SPOTIFY_REDIRECT_URI")]
    redirect_uri: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Where to write the token record
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let config = match &args.config {
        Some(path) => Config::from_file(path).unwrap_or_else(|e| {
            warn!("Failed to load config file: {e}. Using defaults.");
            Config::default()
        }),
        None => Config::default(),
    };
    let spotify = config.spotify;

    let client_id = args.client_id.unwrap_or(spotify.client_id);
    let redirect_uri = args.redirect_uri.unwrap_or(spotify.redirect_uri);
    if client_id.is_empty() || redirect_uri.is_empty() {
        bail!("Client id and redirect URI are required (flags, SPOTIFY_CLIENT_ID/SPOTIFY_REDIRECT_URI, or config)");
    }
    let output = args.output.unwrap_or(spotify.token_path);

    let pkce = PkcePair::generate();
    let url = authorize_url(
        &spotify.accounts_base,
        &client_id,
        &redirect_uri,
        &spotify.scope,
        &pkce.challenge,
    )?;

    println!("Open this URL in a browser and approve access:\n\n{url}\n");
    print!("Paste the full URL you were redirected to: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read redirect URL")?;
    let code = extract_code(&line)?;

    let record = exchange_code(
        &spotify.accounts_base,
        &client_id,
        &redirect_uri,
        &code,
        &pkce.verifier,
    )?;
    record
        .save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Token saved to {}", output.display());
    println!("Authentication successful.");
    Ok(())
}
