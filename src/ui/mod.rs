pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, header, info, outcome, success, summary_row, warn};
pub use table::{edge_table, stats_table, EdgeRow, TableBuilder};
pub use theme::{theme, Theme};
