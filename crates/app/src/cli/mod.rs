use clap::{Parser, Subcommand};
use steamline_app::{
    config::ClientConfig,
    context::AppContext,
    notifications::{Notification, NotificationKind},
};

mod account;
mod checkout;
mod dashboard;
mod orders;
mod render;
mod services;
mod tasks;
mod track;
mod users;

#[derive(Debug, Parser)]
#[command(name = "steamline-app", about = "Steamline laundry client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login(account::LoginArgs),
    /// Forget the session
    Logout,
    /// Show the signed-in user and their menu
    Whoami,
    /// Create a customer account
    Register(account::RegisterArgs),
    /// Browse or manage the service catalog
    Services(services::ServicesCommand),
    /// Pick services and proceed to checkout
    Order(checkout::NewOrderArgs),
    /// Review, place or abandon the pending checkout
    Checkout(checkout::CheckoutCommand),
    /// Point of sale: list, inspect and update orders
    Orders(orders::OrdersCommand),
    /// Orders placed by the signed-in customer
    MyOrders,
    /// Follow an order's progress
    Track(track::TrackArgs),
    /// Driver delivery board
    Tasks(tasks::TasksCommand),
    /// User administration
    Users(users::UsersCommand),
    /// Headline statistics for the signed-in role
    Dashboard(dashboard::DashboardArgs),
}

impl Cli {
    /// Parse arguments after loading `.env`.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let context = AppContext::from_config(&self.config)
            .map_err(|error| format!("failed to start: {error}"))?;

        let result = match self.command {
            Commands::Login(args) => account::login(args, &context).await,
            Commands::Logout => account::logout(&context),
            Commands::Whoami => account::whoami(&context),
            Commands::Register(args) => account::register(args, &context).await,
            Commands::Services(command) => services::run(command, &context).await,
            Commands::Order(args) => checkout::new_order(args, &context).await,
            Commands::Checkout(command) => checkout::run(command, &context).await,
            Commands::Orders(command) => orders::run(command, &context).await,
            Commands::MyOrders => orders::my_orders(&context).await,
            Commands::Track(args) => track::run(args, &context).await,
            Commands::Tasks(command) => tasks::run(command, &context).await,
            Commands::Users(command) => users::run(command, &context).await,
            Commands::Dashboard(args) => dashboard::run(args, &context).await,
        };

        flush(context.notifications.drain());

        result
    }
}

fn flush(notifications: Vec<Notification>) {
    for notification in notifications {
        let marker = match notification.kind {
            NotificationKind::Info => "i",
            NotificationKind::Success => "✓",
            NotificationKind::Error => "✗",
        };

        eprintln!(
            "{marker} {}: {}",
            notification.title, notification.description
        );
    }
}
