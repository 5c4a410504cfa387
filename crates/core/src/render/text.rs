//! Text-based rendering for snapshots

use crate::models::ProcessSnapshot;
use tabled::{
    settings::{object::Columns, style::Style as TableStyle, Alignment, Modify},
    Table, Tabled,
};

/// Width at which command lines are cut in the table view
const CMDLINE_WIDTH: usize = 60;

/// Process row for the snapshot table
#[derive(Tabled)]
struct ProcessRow {
    #[tabled(rename = "PID")]
    pid: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Command")]
    command: String,
}

/// Render the snapshot as a table sorted by PID
pub fn render_table(snapshot: &ProcessSnapshot) -> String {
    let rows: Vec<ProcessRow> = snapshot
        .sorted()
        .into_iter()
        .map(|(pid, record)| ProcessRow {
            pid,
            name: record.name.clone(),
            user: record
                .owner
                .as_ref()
                .map(|o| o.to_string())
                .unwrap_or_else(|| "-".to_string()),
            command: truncate(&record.command_line, CMDLINE_WIDTH),
        })
        .collect();

    Table::new(&rows)
        .with(TableStyle::rounded())
        .with(Modify::new(Columns::single(0)).with(Alignment::right()))
        .to_string()
}

/// Render a one-line summary of the snapshot
pub fn render_summary(snapshot: &ProcessSnapshot) -> String {
    let unowned = snapshot.unowned_count();
    if unowned == 0 {
        format!("{} processes", snapshot.len())
    } else {
        format!("{} processes, {} without owner", snapshot.len(), unowned)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", cut)
    }
}
