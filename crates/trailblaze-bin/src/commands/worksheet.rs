// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `worksheet` command.

use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use trailblaze_client::HttpTransport;
use trailblaze_view::{PageController, PageKind};

use crate::app::ClientApp;
use crate::cli::{WorksheetAction, WorksheetArgs};
use crate::error::BinResult;

/// Runs a worksheet change from the worksheets page and prints the result.
pub async fn worksheet<T: HttpTransport + 'static>(app: &ClientApp<T>, args: WorksheetArgs) -> BinResult<()> {
    let controller = PageController::open(PageKind::Worksheets, app.guard())?;

    let outcome = match &args.action {
        WorksheetAction::Import { file } => controller.import_worksheets(&read_json(file)?).await?,
        WorksheetAction::Update { id, file } => controller.update_worksheet(id, &read_json(file)?).await?,
        WorksheetAction::Delete { id } => controller.delete_worksheet(id).await?,
    };

    println!("{}", outcome.message);
    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.geojson");
        std::fs::write(&path, r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert_eq!(read_json(&path).unwrap()["type"], "FeatureCollection");

        std::fs::write(&path, "{").unwrap();
        let err = read_json(&path).unwrap_err();
        assert!(err.to_string().ends_with("is not valid JSON"));
        assert!(read_json(&dir.path().join("missing.json")).is_err());
    }
}
