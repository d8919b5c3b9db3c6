// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `event` command.

use trailblaze_client::HttpTransport;
use trailblaze_view::{PageController, PageKind};

use super::to_json;
use crate::app::ClientApp;
use crate::cli::{EventAction, EventArgs, OutputFormat};
use crate::error::BinResult;

/// Runs an event action from the events page and prints the result.
pub async fn event<T: HttpTransport + 'static>(app: &ClientApp<T>, args: EventArgs) -> BinResult<()> {
    let controller = PageController::open(PageKind::Events, app.guard())?;

    let outcome = match &args.action {
        EventAction::Create(form) => controller.create_event(&form.form()).await?,
        EventAction::Update { id, form } => controller.update_event(id, &form.form()).await?,
        EventAction::Delete { id } => controller.delete_event(id).await?,
        EventAction::Register { id } => controller.register_for_event(id).await?,
        EventAction::Unregister { id } => controller.unregister_from_event(id).await?,
        EventAction::Registrations { id, format } => {
            let users = controller.event_registrations(id).await?;
            match format {
                OutputFormat::Text => print!("{}", render_registrations(&users)),
                OutputFormat::Json => println!("{}", to_json(&users)?),
            }
            return Ok(());
        }
    };

    println!("{}", outcome.message);
    Ok(())
}

fn render_registrations(users: &[String]) -> String {
    if users.is_empty() {
        return "No registrations.\n".to_string();
    }
    users.iter().map(|user| format!("- {}\n", user)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_registrations() {
        assert_eq!(render_registrations(&[]), "No registrations.\n");
        assert_eq!(
            render_registrations(&["ana".to_string(), "rui".to_string()]),
            "- ana\n- rui\n"
        );
    }
}
