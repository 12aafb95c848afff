use clap::{Args, Subcommand};
use steamline::{
    ids::OrderId,
    orders::search,
    roles::{LOGISTICS, Route},
};
use steamline_app::context::AppContext;
use tokio::signal;

use super::render;

#[derive(Debug, Args)]
pub(crate) struct TasksCommand {
    #[command(subcommand)]
    command: TasksSubcommand,
}

#[derive(Debug, Subcommand)]
enum TasksSubcommand {
    /// List assigned deliveries
    List(ListArgs),
    /// Pick up or deliver a task
    Advance(AdvanceArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Filter by customer name or order number
    #[arg(long, default_value = "")]
    search: String,

    /// Keep refreshing until interrupted
    #[arg(long)]
    watch: bool,
}

#[derive(Debug, Args)]
struct AdvanceArgs {
    /// Order id of the task
    id: OrderId,
}

pub(crate) async fn run(command: TasksCommand, context: &AppContext) -> Result<(), String> {
    let identity = context
        .session
        .require_identity(Route::Logistics)
        .map_err(|error| error.to_string())?;

    if !identity.has_role(LOGISTICS) {
        return Err("only drivers can open the delivery board".to_string());
    }

    match command.command {
        TasksSubcommand::List(args) if args.watch => {
            let mut feed = context.logistics.watch(context.poll_interval());

            loop {
                tokio::select! {
                    _ = signal::ctrl_c() => break,
                    next = feed.next() => match next {
                        Some(Ok(tasks)) => {
                            let tasks: Vec<_> =
                                search(&tasks, &args.search).into_iter().cloned().collect();
                            println!("{}", render::tasks(&tasks));
                        }
                        Some(Err(message)) => eprintln!("! {message}"),
                        None => break,
                    },
                }
            }
        }
        TasksSubcommand::List(args) => {
            let tasks = context
                .logistics
                .tasks(&args.search)
                .await
                .map_err(|error| format!("failed to load tasks: {error}"))?;

            if tasks.is_empty() {
                println!("no tasks assigned");
            } else {
                println!("{}", render::tasks(&tasks));
            }
        }
        TasksSubcommand::Advance(args) => {
            let tasks = context
                .logistics
                .tasks("")
                .await
                .map_err(|error| format!("failed to load tasks: {error}"))?;

            let task = tasks
                .iter()
                .find(|task| task.id == args.id)
                .ok_or_else(|| format!("{} is not one of your tasks", args.id.reference()))?;

            context
                .logistics
                .advance(task)
                .await
                .map_err(|error| format!("failed to update task: {error}"))?;
        }
    }

    Ok(())
}
