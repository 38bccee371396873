use quire_core::storage::NewLogEntry;

use crate::app::AppContext;
use crate::cli::{LogsArgs, VisitArgs};
use crate::output::{logs_table, print_json};

pub async fn handle_visit(ctx: &AppContext<'_>, args: &VisitArgs) -> anyhow::Result<()> {
    let mut visit = NewLogEntry::new(args.ip.clone(), args.page.clone());
    if let Some(agent) = &args.agent {
        visit = visit.with_agent(agent.clone());
    }
    let db = ctx.open_database().await?;
    let entry = db.site().record_visit(visit)?;
    db.close().await?;
    if !ctx.quiet() {
        println!("Recorded visit {}", entry.id);
    }
    Ok(())
}

pub async fn handle_logs(ctx: &AppContext<'_>, args: &LogsArgs) -> anyhow::Result<()> {
    let db = ctx.open_database().await?;
    let mut entries = db.site().logs()?;
    if let Some(limit) = args.limit {
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }

    if args.json {
        print_json(&entries)?;
    } else if entries.is_empty() {
        if !ctx.quiet() {
            println!("No visits recorded.");
        }
    } else {
        println!("{}", logs_table(&entries));
    }
    Ok(())
}
