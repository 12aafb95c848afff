use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use steamline::{
    catalog::ServiceDraft,
    ids::ServiceId,
    roles::{ADMIN_ONLY, Route},
};
use steamline_app::context::AppContext;

use super::render;

#[derive(Debug, Args)]
pub(crate) struct ServicesCommand {
    #[command(subcommand)]
    command: ServicesSubcommand,
}

#[derive(Debug, Subcommand)]
enum ServicesSubcommand {
    /// List the catalog
    List,
    /// Add a service
    Create(DraftArgs),
    /// Replace a service
    Update(UpdateArgs),
    /// Remove a service
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
struct DraftArgs {
    /// Service name
    #[arg(long)]
    name: String,

    /// Unit the service is sold in
    #[arg(long, default_value = "kg")]
    unit: String,

    /// Price per unit in Rupiah
    #[arg(long)]
    price: Decimal,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Service id
    id: ServiceId,

    #[command(flatten)]
    draft: DraftArgs,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    /// Service id
    id: ServiceId,
}

impl From<DraftArgs> for ServiceDraft {
    fn from(args: DraftArgs) -> Self {
        ServiceDraft {
            name: args.name,
            unit: args.unit,
            price: args.price,
        }
    }
}

pub(crate) async fn run(command: ServicesCommand, context: &AppContext) -> Result<(), String> {
    if !matches!(command.command, ServicesSubcommand::List) {
        let identity = context
            .session
            .require_identity(Route::Services)
            .map_err(|error| error.to_string())?;

        if !identity.has_role(ADMIN_ONLY) {
            return Err("only admins can change the catalog".to_string());
        }
    }

    match command.command {
        ServicesSubcommand::List => {
            let services = context
                .admin
                .services()
                .await
                .map_err(|error| format!("failed to load services: {error}"))?;

            println!("{}", render::services(&services));
        }
        ServicesSubcommand::Create(args) => context
            .admin
            .create_service(args.into())
            .await
            .map_err(|error| format!("failed to create service: {error}"))?,
        ServicesSubcommand::Update(args) => context
            .admin
            .update_service(args.id, args.draft.into())
            .await
            .map_err(|error| format!("failed to update service: {error}"))?,
        ServicesSubcommand::Delete(args) => context
            .admin
            .delete_service(args.id)
            .await
            .map_err(|error| format!("failed to delete service: {error}"))?,
    }

    Ok(())
}
