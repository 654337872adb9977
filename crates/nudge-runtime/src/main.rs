//! nudge: keeps an unattended console session moving by confirming its
//! prompts. Single binary embedding the monitor loop, the listing and
//! picking verbs, and the liveness animation.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;

use nudge_core::config::MonitorConfig;
use nudge_window::platform_backend;

mod cli;
mod cmd_inspect;
mod cmd_ls;
mod cmd_pick;
mod monitor;
mod render;

/// Window for graceful shutdown after a termination signal.
const GRACE_PERIOD: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("NUDGE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    match args.command {
        Some(cli::Command::Ls(opts)) => {
            let backend = platform_backend()?;
            cmd_ls::cmd_ls(&backend, opts.json)?;
        }
        Some(cli::Command::Candidates) => {
            let backend = platform_backend()?;
            let cfg = args.opts.to_config();
            cmd_ls::cmd_candidates(&backend, &cfg.target)?;
        }
        Some(cli::Command::Inspect) => {
            let backend = platform_backend()?;
            let cfg = args.opts.to_config();
            cmd_inspect::cmd_inspect(&backend, &cfg.target)?;
        }
        Some(cli::Command::Pick) => {
            let mut cfg = args.opts.to_config();
            let picked = {
                let backend = platform_backend()?;
                let stdin = std::io::stdin();
                cmd_pick::choose(
                    &backend,
                    &cfg.target,
                    &mut stdin.lock(),
                    &mut std::io::stdout(),
                )?
            };
            match picked {
                Some(handle) => {
                    tracing::info!("picked {handle}");
                    cfg.target.handle = Some(handle);
                    run(cfg, &args.opts).await?;
                }
                None => eprintln!("aborted"),
            }
        }
        None => {
            let cfg = args.opts.to_config();
            run(cfg, &args.opts).await?;
        }
    }

    Ok(())
}

/// Run the monitor (+ optional animation) until a termination signal or
/// a close request on the animation window.
async fn run(cfg: MonitorConfig, opts: &cli::MonitorOpts) -> anyhow::Result<()> {
    let backend = Arc::new(platform_backend()?);
    let stop = Arc::new(AtomicBool::new(false));

    tracing::info!(
        "monitor starting: poll {:?}, stale threshold {:?}, persistent {}",
        cfg.policy.poll_interval,
        cfg.policy.stale_threshold,
        cfg.policy.persistent
    );

    let monitor_stop = Arc::clone(&stop);
    let mut monitor_handle = tokio::spawn(monitor::run_monitor(backend, cfg, monitor_stop));

    // The animation runs on its own thread: minifb wants a plain blocking
    // loop, and a render stall must never hold up a monitor tick.
    let render_handle = if opts.no_gif {
        None
    } else {
        match render::Animation::load(Path::new(&opts.gif)) {
            Ok(animation) => {
                let render_stop = Arc::clone(&stop);
                Some(std::thread::spawn(move || {
                    if let Err(e) = render::run_render_loop(animation, render_stop) {
                        tracing::error!("render loop failed: {e:#}");
                    }
                }))
            }
            Err(e) => {
                // Render setup failure aborts the animation only.
                tracing::error!("animation disabled: {e:#}");
                None
            }
        }
    };

    let shutdown = async {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to register SIGTERM handler");
            tokio::select! {
                _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
                _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            }
        }

        #[cfg(not(unix))]
        {
            ctrl_c.await.ok();
            tracing::info!("received ctrl-c, shutting down");
        }
    };

    tokio::select! {
        () = shutdown => {
            stop.store(true, Ordering::SeqCst);
            if tokio::time::timeout(GRACE_PERIOD, &mut monitor_handle)
                .await
                .is_err()
            {
                tracing::warn!("graceful shutdown exceeded grace period, forcing exit");
                std::process::exit(1);
            }
        }
        _ = &mut monitor_handle => {
            // Monitor wound down on its own — the animation window was
            // closed, which sets the shared stop flag.
            stop.store(true, Ordering::SeqCst);
        }
    }

    if let Some(handle) = render_handle {
        let _ = handle.join();
    }
    tracing::info!("stopped");
    Ok(())
}
