//! Terminal rendering of the member table.

use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use kinfolk_core::{Member, RenderSink};

/// Keeps the latest filtered set pushed by the controller.
#[derive(Debug, Default)]
pub struct TableSink {
    latest: Vec<Member>,
    total: usize,
}

impl RenderSink for TableSink {
    fn render(&mut self, visible: &[Member], total: usize) {
        self.latest = visible.to_vec();
        self.total = total;
    }
}

impl TableSink {
    pub fn print(&self, json: bool) -> anyhow::Result<()> {
        if json {
            let payload = serde_json::json!({
                "count": self.latest.len(),
                "total": self.total,
                "members": self.latest,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(());
        }

        if self.latest.is_empty() {
            println!("No family members found.");
            return Ok(());
        }

        println!("{}", member_table(&self.latest));
        println!("{} Members", self.latest.len());
        Ok(())
    }
}

pub fn member_table(members: &[Member]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Age").fg(Color::White),
        Cell::new("Gender").fg(Color::White),
        Cell::new("Relation").fg(Color::White),
        Cell::new("Education").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for member in members {
        table.add_row(vec![
            Cell::new(&member.name).fg(Color::Cyan),
            Cell::new(member.age_display()),
            Cell::new(member.gender.as_str()),
            Cell::new(member.relation.as_str()),
            Cell::new(member.education_display()),
            Cell::new(member.id).fg(Color::DarkGrey),
        ]);
    }
    table
}
