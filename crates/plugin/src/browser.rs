//! Opening catalog pages in the user's browser.

use std::io;
use std::process::{Command, Stdio};

use tracing::debug;

/// Opens a URL outside the plugin process.
pub trait PageOpener: Send + Sync {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Hands the URL to the platform's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(url: &str) -> Command {
        if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl PageOpener for SystemOpener {
    fn open(&self, url: &str) -> io::Result<()> {
        debug!("Opening {}", url);
        // stdout carries the protocol, so the child must not inherit it
        Self::command(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}
