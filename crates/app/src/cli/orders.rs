use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use steamline::{
    ids::{OrderId, UserId},
    receipt::Receipt,
    roles::Route,
    status::OrderStatus,
};
use steamline_app::context::AppContext;

use super::render;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders
    List(ListArgs),
    /// Show an order and its lines
    Show(OrderArgs),
    /// Move an order to another status
    Status(StatusArgs),
    /// Hand an order to a driver
    AssignDriver(AssignDriverArgs),
    /// Take a cash payment
    Pay(PayArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Filter by customer name or order number
    #[arg(long, default_value = "")]
    search: String,
}

#[derive(Debug, Args)]
struct OrderArgs {
    /// Order id
    id: OrderId,
}

#[derive(Debug, Args)]
struct StatusArgs {
    /// Order id
    id: OrderId,

    /// New status (pending, washing, drying, ironing, ready_for_delivery, delivery, completed)
    status: OrderStatus,
}

#[derive(Debug, Args)]
struct AssignDriverArgs {
    /// Order id
    id: OrderId,

    /// Driver user id
    driver: UserId,
}

#[derive(Debug, Args)]
struct PayArgs {
    /// Order id
    id: OrderId,

    /// Cash received in Rupiah
    amount: Decimal,
}

pub(crate) async fn run(command: OrdersCommand, context: &AppContext) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List(args) => {
            context
                .session
                .require_identity(Route::Orders)
                .map_err(|error| error.to_string())?;

            let orders = context
                .pos
                .orders(&args.search)
                .await
                .map_err(|error| format!("failed to list orders: {error}"))?;

            if orders.is_empty() {
                println!("no orders found");
            } else {
                println!("{}", render::orders(&orders));
            }
        }
        OrdersSubcommand::Show(args) => {
            context
                .session
                .require_identity(Route::OrderDetail(args.id))
                .map_err(|error| error.to_string())?;

            let detail = context
                .pos
                .detail(args.id)
                .await
                .map_err(|error| format!("failed to load order: {error}"))?;

            println!(
                "status: {}  payment: {}",
                detail.order.status.label(),
                detail.order.payment_status
            );
            render::receipt(&Receipt::for_order(&detail))?;
        }
        OrdersSubcommand::Status(args) => {
            let identity = context
                .session
                .require_identity(Route::OrderDetail(args.id))
                .map_err(|error| error.to_string())?;

            context
                .pos
                .change_status(&identity, args.id, args.status)
                .await
                .map_err(|error| format!("failed to update status: {error}"))?;
        }
        OrdersSubcommand::AssignDriver(args) => {
            let identity = context
                .session
                .require_identity(Route::OrderDetail(args.id))
                .map_err(|error| error.to_string())?;

            context
                .pos
                .assign_driver(&identity, args.id, args.driver)
                .await
                .map_err(|error| format!("failed to assign driver: {error}"))?;
        }
        OrdersSubcommand::Pay(args) => {
            let identity = context
                .session
                .require_identity(Route::OrderDetail(args.id))
                .map_err(|error| error.to_string())?;

            let detail = context
                .pos
                .detail(args.id)
                .await
                .map_err(|error| format!("failed to load order: {error}"))?;

            let payment = context
                .pos
                .take_payment(&identity, &detail.order, args.amount)
                .await
                .map_err(|error| format!("failed to take payment: {error}"))?;

            render::receipt(&Receipt::for_order(&detail).with_payment(payment))?;
        }
    }

    Ok(())
}

pub(crate) async fn my_orders(context: &AppContext) -> Result<(), String> {
    context
        .session
        .require_identity(Route::MyOrders)
        .map_err(|error| error.to_string())?;

    let orders = context
        .portal
        .orders()
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    if orders.is_empty() {
        println!("you have no orders yet");
    } else {
        println!("{}", render::orders(&orders));
    }

    Ok(())
}
