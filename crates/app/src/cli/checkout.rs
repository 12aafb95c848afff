use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use steamline::{
    catalog::Service,
    checkout::{CheckoutStage, PaymentMethod},
    ids::{ServiceId, UserId},
    quantity::Quantity,
    receipt::Receipt,
    roles::{Role, Route},
};
use steamline_app::context::AppContext;

use super::render;

#[derive(Debug, Args)]
pub(crate) struct NewOrderArgs {
    /// Service and quantity as `SERVICE_ID:QTY`; repeat for more lines
    #[arg(long = "item", value_parser = parse_item)]
    items: Vec<(ServiceId, Decimal)>,
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutCommand {
    #[command(subcommand)]
    command: CheckoutSubcommand,
}

#[derive(Debug, Subcommand)]
enum CheckoutSubcommand {
    /// Show the pending checkout
    Show,
    /// Place the order
    Submit(SubmitArgs),
    /// Discard the pending checkout
    Abandon,
}

#[derive(Debug, Args)]
struct SubmitArgs {
    /// Payment method (bank, cod, unpaid)
    #[arg(long)]
    method: PaymentMethod,

    /// Customer the order is for, when a cashier takes it at the counter
    #[arg(long)]
    customer: Option<UserId>,
}

fn parse_item(raw: &str) -> Result<(ServiceId, Decimal), String> {
    let (id, quantity) = raw.split_once(':').unwrap_or((raw, "1"));

    let id = id
        .parse::<ServiceId>()
        .map_err(|error| format!("invalid service id `{id}`: {error}"))?;
    let quantity = quantity
        .trim()
        .parse::<Decimal>()
        .map_err(|error| format!("invalid quantity `{quantity}`: {error}"))?;

    Ok((id, quantity))
}

/// The `customer_id` sent with a new order. Customers send none and the
/// backend attaches the account behind the token.
fn order_customer(requested: Option<UserId>, role: &Role) -> Result<Option<UserId>, String> {
    match (requested, role) {
        (Some(_), Role::Customer) => Err("customers cannot place orders for someone else".to_string()),
        (requested, _) => Ok(requested),
    }
}

pub(crate) async fn new_order(args: NewOrderArgs, context: &AppContext) -> Result<(), String> {
    context
        .session
        .require_identity(Route::NewOrder)
        .map_err(|error| error.to_string())?;

    let catalog = context
        .catalog
        .services()
        .await
        .map_err(|error| format!("failed to load services: {error}"))?;

    let mut checkout = context
        .checkout()
        .map_err(|error| format!("failed to open checkout: {error}"))?;

    for (service_id, quantity) in args.items {
        let service = Service::find(&catalog, service_id)
            .ok_or_else(|| format!("unknown service {service_id}"))?;
        let quantity = Quantity::new(quantity).map_err(|error| error.to_string())?;

        checkout.cart_mut().add_item_by(service, quantity);
    }

    let pending = checkout
        .commit()
        .map_err(|error| format!("failed to proceed to checkout: {error}"))?;

    render::receipt(&Receipt::for_checkout(pending))?;
    println!("place it with `steamline-app checkout submit --method <bank|cod|unpaid>`");

    Ok(())
}

pub(crate) async fn run(command: CheckoutCommand, context: &AppContext) -> Result<(), String> {
    let identity = context
        .session
        .require_identity(Route::Checkout)
        .map_err(|error| error.to_string())?;

    let mut checkout = context
        .checkout()
        .map_err(|error| format!("failed to open checkout: {error}"))?;

    match command.command {
        CheckoutSubcommand::Show => match checkout.stage() {
            CheckoutStage::AwaitingPayment(pending) => {
                render::receipt(&Receipt::for_checkout(pending))?;
            }
            _ => println!("no pending checkout"),
        },
        CheckoutSubcommand::Submit(args) => {
            let customer = order_customer(args.customer, &identity.role)?;

            let order_id = checkout
                .submit_order(args.method, customer)
                .await
                .map_err(|error| error.to_string())?;

            println!("order placed: {}", order_id.reference());
        }
        CheckoutSubcommand::Abandon => {
            checkout
                .abandon()
                .map_err(|error| format!("failed to abandon checkout: {error}"))?;

            println!("checkout abandoned");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn customers_send_no_customer_id() -> TestResult {
        assert_eq!(order_customer(None, &Role::Customer)?, None);
        assert!(order_customer(Some(UserId::new(9)), &Role::Customer).is_err());

        Ok(())
    }

    #[test]
    fn staff_pass_the_chosen_customer_through() -> TestResult {
        assert_eq!(
            order_customer(Some(UserId::new(9)), &Role::Cashier)?,
            Some(UserId::new(9))
        );
        assert_eq!(order_customer(None, &Role::Admin)?, None);

        Ok(())
    }
}
