// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `open` command.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use trailblaze_auth::Capability;
use trailblaze_client::HttpTransport;
use trailblaze_view::{LoadOutcome, PageController, PageHeader, PageKind, WorksheetView};

use super::to_json;
use crate::app::ClientApp;
use crate::cli::{OpenArgs, OutputFormat};
use crate::error::BinResult;

/// Opens a page, switches to the requested section and prints its data.
pub async fn open<T: HttpTransport + 'static>(app: &ClientApp<T>, args: OpenArgs) -> BinResult<()> {
    let report = load_page(app, &args).await?;
    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", to_json(&report)?),
    }
    Ok(())
}

/// Builds the page controller and runs the requested navigation.
pub async fn load_page<T: HttpTransport + 'static>(
    app: &ClientApp<T>,
    args: &OpenArgs,
) -> BinResult<PageReport> {
    let controller = PageController::open(args.page, app.guard())?;

    let outcome = match (&args.worksheet, &args.section) {
        (Some(id), _) => {
            let view = if args.detailed {
                WorksheetView::Detailed
            } else {
                WorksheetView::Generic
            };
            controller.open_worksheet(id, view).await?
        }
        (None, Some(section)) => controller.open_section(section).await?,
        (None, None) => controller.start().await?,
    };

    Ok(PageReport::from_controller(&controller, outcome))
}

// =============================================================================
// PageReport
// =============================================================================

/// A declared section and whether its data is available to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    /// Section name.
    pub name: &'static str,
    /// Section title.
    pub title: &'static str,
    /// The section's gate admits the user.
    pub available: bool,
}

/// What a page shows after a navigation.
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    /// Page opened.
    pub page: PageKind,
    /// Visible section.
    pub section: &'static str,
    /// Page title.
    pub title: &'static str,
    /// What happened to the section load.
    pub outcome: LoadOutcome,
    /// Header strip.
    pub header: PageHeader,
    /// Declared sections.
    pub sections: Vec<SectionEntry>,
    /// Navigation entries and whether they are shown.
    pub navigation: BTreeMap<&'static str, bool>,
    /// Loaded data of the visible section.
    pub content: Option<Value>,
}

impl PageReport {
    /// Captures the controller's state.
    pub fn from_controller<T: HttpTransport + 'static>(
        controller: &PageController<T>,
        outcome: LoadOutcome,
    ) -> Self {
        let ctx = controller.context();
        let sections = controller
            .layout()
            .sections()
            .iter()
            .map(|spec| SectionEntry {
                name: spec.name,
                title: spec.title,
                available: spec.gate.is_none_or(|gate| gate.allows(ctx)),
            })
            .collect();
        let navigation = Capability::navigation()
            .iter()
            .map(|c| (c.as_str(), controller.capabilities().contains(*c)))
            .collect();

        Self {
            page: controller.kind(),
            section: controller.current_section(),
            title: controller.title(),
            outcome,
            header: controller.header(),
            sections,
            navigation,
            content: controller.displayed().map(|c| c.payload),
        }
    }

    /// Renders the report for the terminal.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} | {}", self.page, self.title)?;
        writeln!(f, "User: {} ({})", self.header.display_name, self.header.primary_role)?;

        writeln!(f, "Sections:")?;
        for entry in &self.sections {
            let marker = if entry.name == self.section {
                ">"
            } else if entry.available {
                " "
            } else {
                "-"
            };
            writeln!(f, "  {} {:<16} {}", marker, entry.name, entry.title)?;
        }

        let shown: Vec<&str> = self
            .navigation
            .iter()
            .filter(|(_, shown)| **shown)
            .map(|(name, _)| *name)
            .collect();
        if !shown.is_empty() {
            writeln!(f, "Navigation: {}", shown.join(", "))?;
        }

        match (self.outcome, &self.content) {
            (LoadOutcome::Skipped, _) => writeln!(f, "(no access to this section's data)"),
            (_, Some(content)) => {
                let rendered = serde_json::to_string_pretty(content).unwrap_or_else(|_| content.to_string());
                writeln!(f, "{}", rendered)
            }
            (_, None) => writeln!(f, "(no data for this section)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(outcome: LoadOutcome, content: Option<Value>) -> PageReport {
        PageReport {
            page: PageKind::Dashboard,
            section: "reports",
            title: "Reports & Analytics",
            outcome,
            header: PageHeader {
                display_name: "rui".into(),
                initial: Some("R".into()),
                primary_role: "RU".into(),
                roles: vec!["RU".into()],
            },
            sections: vec![
                SectionEntry { name: "overview", title: "Overview", available: true },
                SectionEntry { name: "reports", title: "Reports & Analytics", available: false },
                SectionEntry { name: "users", title: "User Management", available: false },
            ],
            navigation: [("admin-mgmt", false), ("notifications", true)].into_iter().collect(),
            content,
        }
    }

    #[test]
    fn test_render_skipped_section() {
        let text = report(LoadOutcome::Skipped, None).render_text();
        assert!(text.starts_with("dashboard | Reports & Analytics\n"));
        assert!(text.contains("  > reports"));
        assert!(text.contains("  - users"));
        assert!(text.contains("Navigation: notifications\n"));
        assert!(text.contains("(no access to this section's data)"));
    }

    #[test]
    fn test_render_loaded_section() {
        let text = report(LoadOutcome::Applied, Some(json!({"activeSessions": 3}))).render_text();
        assert!(text.contains("\"activeSessions\": 3"));
    }

    #[test]
    fn test_render_stops_on_writer_error() {
        use std::fmt::Write as _;

        struct Closed;
        impl fmt::Write for Closed {
            fn write_str(&mut self, _: &str) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let report = report(LoadOutcome::NoLoader, None);
        let mut sink = Closed;
        assert!(write!(sink, "{}", report).is_err());
        assert!(report.render_text().ends_with("(no data for this section)\n"));
    }
}
