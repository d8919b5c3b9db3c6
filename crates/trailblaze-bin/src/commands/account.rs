// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `account` and `notifications` commands.
//!
//! Dashboard actions run through the page controller so the affected
//! section is reloaded once the server accepts them.

use serde_json::Value;
use trailblaze_client::HttpTransport;
use trailblaze_view::{PageController, PageKind};

use super::to_json;
use crate::app::ClientApp;
use crate::cli::{AccountAction, AccountArgs, OutputArgs, OutputFormat};
use crate::error::BinResult;

/// Runs an account action and prints its result.
pub async fn account<T: HttpTransport + 'static>(app: &ClientApp<T>, args: AccountArgs) -> BinResult<()> {
    let controller = PageController::open(PageKind::Dashboard, app.guard())?;
    let outcome = match (args.action.operation(), &args.action) {
        (Some((operation, target)), _) => controller.account_operation(operation, target).await?,
        (None, AccountAction::ForceLogout { target }) => controller.force_logout(target).await?,
        (None, AccountAction::CreateUser(form)) => controller.register_institutional(&form.form()).await?,
        (None, AccountAction::ToggleVisibility) => controller.toggle_profile_visibility().await?,
        (None, AccountAction::Users(filter)) => {
            let users = app.accounts().list_users(controller.context(), &filter.filter()).await?;
            print!("{}", render_users(&users));
            return Ok(());
        }
        (None, AccountAction::Details { target }) => {
            let details = controller.user_details(target).await?;
            println!("User:    {}", details.username);
            println!("State:   {}", details.state);
            println!("Profile: {}", details.profile);
            return Ok(());
        }
        (None, _) => controller.request_removal().await?,
    };

    println!("{}", outcome.message);
    Ok(())
}

/// Prints the notification list.
pub async fn notifications<T: HttpTransport + 'static>(app: &ClientApp<T>, args: OutputArgs) -> BinResult<()> {
    let controller = PageController::open(PageKind::UserPage, app.guard())?;
    let list = controller.notifications().await?;

    match args.format {
        OutputFormat::Text => print!("{}", render_notifications(&list)),
        OutputFormat::Json => println!("{}", to_json(&list)?),
    }
    Ok(())
}

fn render_users(users: &[String]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }
    users.iter().map(|user| format!("- {}\n", user)).collect()
}

fn render_notifications(list: &Value) -> String {
    let items = match list {
        Value::Array(items) if !items.is_empty() => items,
        Value::Array(_) | Value::Null => return "No notifications.\n".to_string(),
        other => return format!("{}\n", other),
    };

    items
        .iter()
        .map(|item| match item.get("message").and_then(Value::as_str) {
            Some(message) => format!("- {}\n", message),
            None => format!("- {}\n", item),
        })
        .collect()
}
