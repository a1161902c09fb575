// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every option that is configuration rather than input can also come from
// an environment variable (clap's `env` feature), so a shell profile or CI
// job can set the server once.
//
// Rust concepts:
// - Derive macros: clap generates the parser from these types
// - PathBuf / Url: arguments are parsed into real types, not left as strings
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

use crate::annotate::DEFAULT_REFERENCE_HEADING;
use crate::clipboard::DEFAULT_HOLD;
use crate::publish::{DEFAULT_SERVER, DEFAULT_SETTLE_MS};

#[derive(Parser, Debug)]
#[command(
    name = "footnote-publish",
    version,
    about = "Turn article links into footnotes and copy the result as rich text",
    long_about = "footnote-publish numbers the external links of an HTML article, appends a \
                  reference list, and copies the result to the clipboard. The publish command \
                  first asks the preview server to upload local images."
)]
pub struct Cli {
    /// Heading shown above the reference list
    #[arg(long, global = true, env = "REFERENCE_HEADING", default_value = DEFAULT_REFERENCE_HEADING)]
    pub heading: String,

    /// Seconds to keep serving copied content on X11/Wayland (0 = don't wait)
    #[arg(long, global = true, env = "CLIPBOARD_HOLD_SECS", default_value_t = DEFAULT_HOLD.as_secs())]
    pub clipboard_hold_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print an HTML file with its links turned into footnotes
    ///
    /// Example: footnote-publish annotate post.html > post.wechat.html
    Annotate {
        /// HTML fragment to annotate ("-" reads stdin)
        file: PathBuf,

        /// Print the reference entries as JSON instead of the HTML
        #[arg(long)]
        json: bool,
    },

    /// Annotate an HTML file and copy it to the clipboard (images are not uploaded)
    ///
    /// Example: footnote-publish copy post.html
    Copy {
        /// HTML fragment to copy ("-" reads stdin)
        file: PathBuf,
    },

    /// Upload an article's images through the preview server, then copy it
    ///
    /// Example: footnote-publish publish 02-openclaw --server http://localhost:8080
    Publish {
        /// Article identifier known to the server
        article_id: String,

        /// Base URL of the preview server
        #[arg(long, env = "PUBLISH_SERVER", default_value = DEFAULT_SERVER)]
        server: Url,

        /// Milliseconds to wait after swapping content in, before copying
        #[arg(long, env = "PUBLISH_SETTLE_MS", default_value_t = DEFAULT_SETTLE_MS)]
        settle_ms: u64,

        /// HTML currently displayed for the article; restored after the copy
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Copy the server's HTML as-is, without footnotes
        #[arg(long)]
        no_format: bool,
    },
}
