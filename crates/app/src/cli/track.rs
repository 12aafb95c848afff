use clap::Args;
use steamline::tracking::{TrackingMode, TrackingState};
use steamline_app::context::AppContext;
use tokio::signal;

use super::render;

#[derive(Debug, Args)]
pub(crate) struct TrackArgs {
    /// Order number, e.g. `42` or `#ORD-42`
    order: String,

    /// Keep refreshing until interrupted
    #[arg(long)]
    watch: bool,
}

pub(crate) async fn run(args: TrackArgs, context: &AppContext) -> Result<(), String> {
    let identity = context
        .session
        .current()
        .map_err(|error| format!("failed to read session: {error}"))?;

    let mode = if identity.is_some() {
        TrackingMode::Authenticated
    } else {
        TrackingMode::Public
    };

    let mut handle = context
        .tracker
        .watch(&args.order, mode)
        .map_err(|error| error.to_string())?;

    let Some(state) = handle.wait_for(|state| !state.is_fetching()).await else {
        return Err("tracking stopped unexpectedly".to_string());
    };

    outcome(&state)?;
    print!("{}", render::tracking(&state));

    if !args.watch {
        return Ok(());
    }

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => break,
            next = handle.changed() => match next {
                Some(state) if state.is_fetching() => {}
                Some(state) => {
                    println!();
                    print!("{}", render::tracking(&state));
                }
                None => break,
            },
        }
    }

    outcome(&handle.state())
}

fn outcome(state: &TrackingState) -> Result<(), String> {
    match state.error() {
        Some(message) if state.data().is_none() => Err(message.to_string()),
        _ => Ok(()),
    }
}
