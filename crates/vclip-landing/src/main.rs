//! Landing page uploader binary.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{error, info, warn};

use vclip_landing::logging::init_tracing;
use vclip_landing::{view, LandingConfig, UploadWidget, WidgetState};
use vclip_landing_client::{LandingApiClient, UploadFile};

/// Upload a video and collect the generated viral shorts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video file to upload
    file: PathBuf,

    /// Phone number for the lead form (asked on stdin when omitted)
    #[arg(short, long)]
    phone: Option<String>,

    /// Backend base URL (overrides LANDING_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Print state snapshots as JSON lines instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Install rustls crypto provider (required for TLS/HTTPS)
    let _ = rustls::crypto::ring::default_provider().install_default();

    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<bool> {
    let mut config = LandingConfig::from_env();
    if let Some(url) = args.api_url.clone() {
        config.api = config.api.with_base_url(url);
    }
    info!("Uploader config: {:?}", config);

    let client = LandingApiClient::new(config.api.clone()).context("invalid API configuration")?;
    let base_url = client.base_url().to_string();
    let file = UploadFile::from_path(&args.file)
        .await
        .with_context(|| format!("cannot open {}", args.file.display()))?;

    let mut widget = UploadWidget::new(Arc::new(client), config.widget.clone());
    let printer = tokio::spawn(print_updates(widget.subscribe(), base_url, args.json));

    let flow = async {
        if widget.select_file(file).await.is_err() {
            return Ok(());
        }
        if widget.snapshot().lead.visible {
            submit_lead(&mut widget, args.phone.as_deref()).await?;
        }
        anyhow::Ok(())
    };

    tokio::select! {
        result = flow => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, discarding upload");
            return Ok(false);
        }
    }

    tokio::select! {
        finished = printer => Ok(finished.unwrap_or(false)),
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, discarding upload");
            widget.reset();
            Ok(false)
        }
    }
}

/// Fill in and submit the lead form, asking again on stdin after a rejection.
async fn submit_lead(
    widget: &mut UploadWidget<LandingApiClient>,
    phone_arg: Option<&str>,
) -> anyhow::Result<()> {
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let phone = match phone_arg {
            Some(phone) => phone.to_string(),
            None => {
                print!("Enter phone number with country code: ");
                std::io::stdout().flush().ok();
                match stdin.next_line().await? {
                    Some(line) => line,
                    None => anyhow::bail!("no phone number given"),
                }
            }
        };

        widget.input_phone(&phone);
        match widget.submit_phone().await {
            Ok(_) => return Ok(()),
            Err(e) if phone_arg.is_none() => warn!("{}", e.user_message()),
            Err(e) => anyhow::bail!("lead form rejected: {}", e.user_message()),
        }
    }
}

/// Print every distinct view until the widget settles. Returns whether clips were produced.
async fn print_updates(mut rx: watch::Receiver<WidgetState>, base_url: String, json: bool) -> bool {
    let mut last = String::new();

    loop {
        let (rendered, settled, succeeded) = {
            let state = rx.borrow_and_update();
            let rendered = if json {
                serde_json::to_string(&*state).unwrap_or_default()
            } else {
                view::render(&state, &base_url)
            };
            let succeeded = state.upload.result_clips.is_some() && state.upload.error.is_none();
            (rendered, state.is_settled(), succeeded)
        };

        if rendered != last {
            println!("{}", rendered);
            last = rendered;
        }
        if settled {
            return succeeded;
        }
        if rx.changed().await.is_err() {
            return false;
        }
    }
}
