use crate::output::{print_json, print_table};
use anyhow::Context;
use optout_core::action::OptOutAction;
use optout_core::catalog::Catalog;
use optout_core::platform::Platform;

pub fn run(all: bool, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::builtin().context("built-in catalog is invalid")?;
    let platform = Platform::detect();
    let actions: Vec<&OptOutAction> = if all {
        catalog.iter().collect()
    } else {
        catalog.for_platform(platform).collect()
    };

    if json {
        return print_json(&actions);
    }

    if actions.is_empty() {
        println!("No opt-out actions apply to {platform}.");
        return Ok(());
    }

    let rows = actions
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.kind.label().to_string(),
                a.platform_label(),
                a.render(),
                a.description.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "KIND", "PLATFORMS", "ACTION", "DESCRIPTION"], rows);
    Ok(())
}
