use clap::Args;
use steamline::roles::Route;
use steamline_app::context::AppContext;
use tokio::signal;

use super::render;

#[derive(Debug, Args)]
pub(crate) struct DashboardArgs {
    /// Keep refreshing until interrupted
    #[arg(long)]
    watch: bool,
}

pub(crate) async fn run(args: DashboardArgs, context: &AppContext) -> Result<(), String> {
    context
        .session
        .require_identity(Route::Dashboard)
        .map_err(|error| error.to_string())?;

    if !args.watch {
        let snapshot = context
            .dashboard
            .snapshot()
            .await
            .map_err(|error| format!("failed to load dashboard: {error}"))?;

        println!("{}", render::dashboard(&snapshot));

        return Ok(());
    }

    let mut feed = context.dashboard.watch(context.poll_interval());

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => break,
            next = feed.next() => match next {
                Some(Ok(snapshot)) => println!("{}", render::dashboard(&snapshot)),
                Some(Err(message)) => eprintln!("! {message}"),
                None => break,
            },
        }
    }

    Ok(())
}
