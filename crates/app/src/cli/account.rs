use clap::Args;
use steamline_app::{api::Registration, context::AppContext};

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Username
    #[arg(long)]
    username: String,

    /// Password
    #[arg(long, env = "STEAMLINE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Debug, Args)]
pub(crate) struct RegisterArgs {
    /// Username
    #[arg(long)]
    username: String,

    /// Password
    #[arg(long, env = "STEAMLINE_PASSWORD", hide_env_values = true)]
    password: String,

    /// Full name
    #[arg(long, default_value = "")]
    full_name: String,

    /// Phone number
    #[arg(long, default_value = "")]
    phone: String,
}

pub(crate) async fn login(args: LoginArgs, context: &AppContext) -> Result<(), String> {
    let identity = context
        .session
        .login(&args.username, &args.password)
        .await
        .map_err(|error| error.to_string())?;

    println!("signed in as {} ({})", identity.display_name, identity.role);

    Ok(())
}

pub(crate) fn logout(context: &AppContext) -> Result<(), String> {
    context
        .session
        .logout()
        .map_err(|error| format!("failed to sign out: {error}"))?;

    println!("signed out");

    Ok(())
}

pub(crate) fn whoami(context: &AppContext) -> Result<(), String> {
    let identity = context
        .session
        .current()
        .map_err(|error| format!("failed to read session: {error}"))?;

    let Some(identity) = identity else {
        println!("not signed in");
        return Ok(());
    };

    println!("user_id: {}", identity.id);
    println!("name: {}", identity.display_name);
    println!("role: {}", identity.role);
    println!("menu:");

    for item in identity.menu() {
        println!("  {:<14} {}", item.label, item.route.path());
    }

    Ok(())
}

pub(crate) async fn register(args: RegisterArgs, context: &AppContext) -> Result<(), String> {
    context
        .session
        .register(Registration {
            username: args.username.trim().to_string(),
            password: args.password,
            full_name: args.full_name,
            phone: args.phone,
        })
        .await
        .map_err(|error| error.to_string())?;

    context
        .notifications
        .success("Registration successful", "Please log in.");

    Ok(())
}
