use quire_core::storage::SettingValue;

use crate::app::AppContext;
use crate::cli::SettingsCommand;
use crate::output::{print_json, print_settings};

pub async fn handle_settings(
    ctx: &AppContext<'_>,
    command: &SettingsCommand,
) -> anyhow::Result<()> {
    let db = ctx.open_database().await?;
    match command {
        SettingsCommand::Show { json } => {
            let settings = db.site().settings()?;
            if *json {
                print_json(&settings)?;
            } else {
                print_settings(&settings);
            }
        }
        SettingsCommand::Set { key, value } => {
            let value = SettingValue::parse(value);
            db.site().set_setting(key, value.clone())?;
            if !ctx.quiet() {
                println!("Set {} = {}", key, value);
            }
        }
    }
    db.close().await?;
    Ok(())
}
