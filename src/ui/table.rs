use crate::edge::FollowEdge;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[derive(Tabled)]
pub struct EdgeRow {
    #[tabled(rename = "#")]
    pub id: i64,
    #[tabled(rename = "Follower")]
    pub follower: String,
    #[tabled(rename = "Followable")]
    pub followable: String,
    #[tabled(rename = "State")]
    pub state: String,
    #[tabled(rename = "Since")]
    pub since: String,
}

impl From<&FollowEdge> for EdgeRow {
    fn from(edge: &FollowEdge) -> Self {
        Self {
            id: edge.id,
            follower: edge.follower.to_ref_string(),
            followable: edge.followable.to_ref_string(),
            state: edge.state().to_string(),
            since: edge.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

pub fn edge_table(edges: &[FollowEdge]) -> String {
    let rows: Vec<EdgeRow> = edges.iter().map(EdgeRow::from).collect();
    Table::new(&rows).with(Style::rounded()).to_string()
}
