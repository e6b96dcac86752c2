//! Session commands: login, register, logout, whoami.

use sweetshop_client::Session;
use sweetshop_client::api::RegisterRequest;

use super::{CliError, Context, require_session};

/// Exchange credentials for a token and persist the session.
pub async fn login(ctx: &Context, email: &str, password: &str) -> Result<(), CliError> {
    let token = ctx.api.login(email, password).await?;
    let session = Session::from(token);
    session.persist(&ctx.store)?;
    ctx.api.set_token(session.token().clone()).await;

    println!("Logged in as {email} ({})", session.role());
    Ok(())
}

/// Create a new account. Does not log in; the user logs in afterwards,
/// matching the registration screen's flow.
pub async fn register(
    ctx: &Context,
    username: String,
    email: String,
    password: String,
    mobile: String,
    address: String,
) -> Result<(), CliError> {
    let profile = ctx
        .api
        .register(&RegisterRequest {
            username,
            email,
            password,
            mobile,
            address,
        })
        .await?;

    println!(
        "Account created for {} <{}>. Run `sweetshop login` to sign in.",
        profile.username, profile.email
    );
    Ok(())
}

/// Drop the stored session, token, and any pending cart.
pub async fn logout(ctx: &Context) -> Result<(), CliError> {
    Session::destroy(&ctx.store)?;
    ctx.api.clear_token().await;

    println!("Logged out.");
    Ok(())
}

/// Show the authenticated user's profile.
pub async fn whoami(ctx: &Context) -> Result<(), CliError> {
    require_session(ctx)?;
    let profile = ctx.api.me().await?;

    println!("{} <{}>", profile.username, profile.email);
    println!("  role:    {}", profile.role);
    println!("  mobile:  {}", profile.mobile);
    println!("  address: {}", profile.address);
    Ok(())
}
