//! CLI definition using clap derive.
//!
//! Every monitor flag has an env-var fallback (`NUDGE_*`); explicit
//! flags override env vars, env vars override built-in defaults.

use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use nudge_core::config::{
    DEFAULT_CONFIRM_TEXT, DEFAULT_CONSOLE_CLASS, DEFAULT_ELEVATED_PREFIX,
    DEFAULT_ERROR_BACKOFF_SECS, DEFAULT_ESCAPE_CHANCE, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_STALE_THRESHOLD_SECS,
    MonitorConfig, SendPolicy, TargetSpec,
};
use nudge_core::types::WindowHandle;

#[derive(Parser)]
#[command(name = "nudge", about = "auto-confirms prompts in an unattended console window")]
pub struct Cli {
    #[command(flatten)]
    pub opts: MonitorOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List all top-level windows
    Ls(LsOpts),
    /// List windows passing the heuristic target filter
    Candidates,
    /// Interactively choose the target window, then run the monitor
    Pick,
    /// Dump matching windows with class, pid and a text preview
    Inspect,
}

#[derive(Args)]
pub struct LsOpts {
    /// Emit JSON instead of aligned columns
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct MonitorOpts {
    /// Full title of the target window (anchored prefix match)
    #[arg(long, env = "NUDGE_TITLE", global = true)]
    pub title: Option<String>,

    /// Title fragment accepted by the heuristic scan
    #[arg(long, env = "NUDGE_TITLE_SUBSTRING", global = true)]
    pub title_substring: Option<String>,

    /// Target window handle (decimal or 0x-hex); wins over title matching
    #[arg(long, env = "NUDGE_WINDOW_HANDLE", global = true)]
    pub window_handle: Option<WindowHandle>,

    /// Window class the heuristic scan filters on
    #[arg(long, env = "NUDGE_CLASS_NAME", default_value = DEFAULT_CONSOLE_CLASS, global = true)]
    pub class_name: String,

    /// Title prefix recognizing elevated console windows
    #[arg(long, env = "NUDGE_ELEVATED_PREFIX", default_value = DEFAULT_ELEVATED_PREFIX, global = true)]
    pub elevated_prefix: String,

    /// Seconds between monitor ticks
    #[arg(long, env = "NUDGE_POLL_INTERVAL_SECS", default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,

    /// Seconds content must stay unchanged before a send fires
    #[arg(long, env = "NUDGE_STALE_THRESHOLD_SECS", default_value_t = DEFAULT_STALE_THRESHOLD_SECS)]
    pub stale_threshold_secs: u64,

    /// Send every tick regardless of staleness
    #[arg(long, env = "NUDGE_PERSISTENT")]
    pub persistent: bool,

    /// Confirmation text (Enter is appended)
    #[arg(long, env = "NUDGE_CONFIRM_TEXT", default_value = DEFAULT_CONFIRM_TEXT)]
    pub confirm_text: String,

    /// Probability [0,1] of sending the re-evaluation message instead
    #[arg(long, env = "NUDGE_ESCAPE_CHANCE", default_value_t = DEFAULT_ESCAPE_CHANCE)]
    pub escape_chance: f64,

    /// Disable the re-evaluation escape message entirely
    #[arg(long, env = "NUDGE_NO_ESCAPE_MESSAGE")]
    pub no_escape_message: bool,

    /// Seconds to pause after an injection failure
    #[arg(long, env = "NUDGE_ERROR_BACKOFF_SECS", default_value_t = DEFAULT_ERROR_BACKOFF_SECS)]
    pub error_backoff_secs: u64,

    /// Path to the liveness animation GIF
    #[arg(long, env = "NUDGE_GIF", default_value = "nudge.gif")]
    pub gif: String,

    /// Run the monitor without the animation window
    #[arg(long, env = "NUDGE_NO_GIF")]
    pub no_gif: bool,
}

impl MonitorOpts {
    /// Assemble the immutable run configuration.
    pub fn to_config(&self) -> MonitorConfig {
        let mut policy = SendPolicy {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            stale_threshold: Duration::from_secs(self.stale_threshold_secs),
            persistent: self.persistent,
            confirm_text: self.confirm_text.clone(),
            escape_chance: self.escape_chance,
            error_backoff: Duration::from_secs(self.error_backoff_secs),
            ..SendPolicy::default()
        };
        if self.no_escape_message {
            policy.escape_message.clear();
        }

        MonitorConfig {
            target: TargetSpec {
                handle: self.window_handle,
                title: self.title.clone(),
                title_substring: self.title_substring.clone(),
                class_name: self.class_name.clone(),
                elevated_prefix: self.elevated_prefix.clone(),
            },
            policy,
        }
    }
}
