// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG overrides the default "warn" level)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = copy/publish failed, 2 = error)
//
// User-facing results go to stdout (annotated HTML, JSON) or appear as
// notifications on stderr; logs also go to stderr.
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use footnote_publish::annotate::LinkAnnotator;
use footnote_publish::cli::{Cli, Commands};
use footnote_publish::clipboard::{ClipboardSink, SystemClipboard};
use footnote_publish::content::{ContentContainer, ContentFormatter};
use footnote_publish::notify::{Notifier, Severity, ToastBoard};
use footnote_publish::publish::{PublishConfig, Publisher};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected errors (bad input file, invalid config) exit with 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let clipboard = SystemClipboard::with_hold(Duration::from_secs(cli.clipboard_hold_secs));
    let annotator = LinkAnnotator::new(cli.heading);

    match cli.command {
        Commands::Annotate { file, json } => handle_annotate(&file, &annotator, json),
        Commands::Copy { file } => handle_copy(&file, &annotator, clipboard),
        Commands::Publish {
            article_id,
            server,
            settle_ms,
            preview,
            no_format,
        } => {
            let config = PublishConfig::new(server).with_settle_delay(Duration::from_millis(settle_ms));
            let formatter = if no_format { None } else { Some(annotator) };
            handle_publish(&article_id, config, clipboard, preview.as_deref(), formatter).await
        }
    }
}

// Handles the 'annotate' subcommand
// Prints the annotated HTML, or the reference entries as JSON
fn handle_annotate(file: &Path, annotator: &LinkAnnotator, json: bool) -> Result<i32> {
    let mut container = ContentContainer::from_html(&read_input(file)?);
    let references = annotator.annotate(&mut container);

    if json {
        println!("{}", serde_json::to_string_pretty(&references)?);
    } else {
        println!("{}", container.inner_html());
    }

    Ok(0)
}

// Handles the 'copy' subcommand
// Same as annotate, but the result goes to the clipboard as rich text
fn handle_copy(file: &Path, annotator: &LinkAnnotator, clipboard: SystemClipboard) -> Result<i32> {
    let mut container = ContentContainer::from_html(&read_input(file)?);
    let references = annotator.annotate(&mut container);
    let toasts = ToastBoard::stderr();

    match clipboard.copy_html(&container.inner_html(), &container.text()) {
        Ok(()) => {
            info!("copied article with {} reference(s)", references.len());
            toasts.notify(
                "✅ Copied!\n\nPaste it straight into the editor.\n⚠️ Images must be uploaded by hand.",
                Severity::Success,
            );
            Ok(0)
        }
        Err(e) => {
            toasts.notify(
                &format!("❌ Copy failed\n\n{}\n\nTry selecting the article and copying it by hand.", e),
                Severity::Error,
            );
            Ok(1)
        }
    }
}

// Handles the 'publish' subcommand
//
// The preview file stands in for the page the article is displayed on:
// it is formatted once on load, like the page does, and is what the
// publisher restores after copying.
async fn handle_publish(
    article_id: &str,
    config: PublishConfig,
    clipboard: SystemClipboard,
    preview: Option<&Path>,
    formatter: Option<LinkAnnotator>,
) -> Result<i32> {
    let html = match preview {
        Some(path) => read_input(path)?,
        None => String::new(),
    };
    let mut container = ContentContainer::from_html(&html);

    let toasts = Arc::new(ToastBoard::stderr());
    let mut publisher = Publisher::new(config, Arc::new(clipboard), toasts)?;
    if let Some(formatter) = formatter {
        formatter.format(&mut container);
        publisher = publisher.with_formatter(formatter);
    }

    // Failures were already shown as notifications
    match publisher.publish(&mut container, article_id).await {
        Ok(_) => Ok(0),
        Err(_) => Ok(1),
    }
}

// Reads a whole file, or stdin when the path is "-"
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("could not read stdin")?;
        return Ok(input);
    }

    std::fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))
}
