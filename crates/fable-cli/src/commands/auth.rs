use anyhow::Result;
use colored::Colorize;
use fable_core::user::{User, clean_name};

use super::AppContext;

pub async fn login(app: &AppContext, name: &str) -> Result<()> {
    let service = app.authentication();
    let greeting = service.greeting().await?;
    println!("{}", greeting.message().bright_magenta());

    app.admit(User::named(clean_name(name)));
    let user = match service.current_user().await? {
        Some(_) => service.reauthenticate(name).await,
        None => service.authenticate(name).await,
    };

    match user {
        Ok(user) => {
            println!(
                "{}",
                format!("Welcome, {} (@{})!", user.display_name(), user.username).bright_green()
            );
            Ok(())
        }
        Err(e) => anyhow::bail!(e.user_message()),
    }
}

pub async fn logout(app: &AppContext) -> Result<()> {
    app.authentication().logout().await?;
    println!("{}", "Logged out.".bright_black());
    Ok(())
}

pub async fn whoami(app: &AppContext) -> Result<()> {
    match app.authentication().current_user().await? {
        Some(user) => println!("{} (@{})", user.display_name(), user.username),
        None => println!("{}", "Not logged in.".bright_black()),
    }
    Ok(())
}
