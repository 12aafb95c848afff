use clap::{Args, Subcommand};
use steamline::{
    ids::UserId,
    roles::{Role, Route, STAFF},
};
use steamline_app::context::AppContext;

use super::render;

#[derive(Debug, Args)]
pub(crate) struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Debug, Subcommand)]
enum UsersSubcommand {
    /// List users
    List(ListArgs),
    /// Change a user's role
    SetRole(SetRoleArgs),
    /// List customers
    Customers,
    /// List drivers
    Drivers,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Filter by username or name
    #[arg(long, default_value = "")]
    search: String,
}

#[derive(Debug, Args)]
struct SetRoleArgs {
    /// User id
    id: UserId,

    /// New role (admin, cashier, driver, customer)
    role: Role,
}

pub(crate) async fn run(command: UsersCommand, context: &AppContext) -> Result<(), String> {
    let users = match command.command {
        UsersSubcommand::List(args) => {
            context
                .session
                .require_identity(Route::Users)
                .map_err(|error| error.to_string())?;

            context
                .admin
                .users(&args.search)
                .await
                .map_err(|error| format!("failed to list users: {error}"))?
        }
        UsersSubcommand::SetRole(args) => {
            context
                .session
                .require_identity(Route::Users)
                .map_err(|error| error.to_string())?;

            return context
                .admin
                .set_role(args.id, args.role)
                .await
                .map_err(|error| format!("failed to change role: {error}"));
        }
        UsersSubcommand::Customers => {
            require_staff(context)?;

            context
                .pos
                .customers()
                .await
                .map_err(|error| format!("failed to list customers: {error}"))?
        }
        UsersSubcommand::Drivers => {
            require_staff(context)?;

            context
                .pos
                .drivers()
                .await
                .map_err(|error| format!("failed to list drivers: {error}"))?
        }
    };

    if users.is_empty() {
        println!("no users found");
    } else {
        println!("{}", render::users(&users));
    }

    Ok(())
}

fn require_staff(context: &AppContext) -> Result<(), String> {
    let identity = context
        .session
        .require_identity(Route::Orders)
        .map_err(|error| error.to_string())?;

    if identity.has_role(STAFF) {
        Ok(())
    } else {
        Err("only staff can list accounts".to_string())
    }
}
