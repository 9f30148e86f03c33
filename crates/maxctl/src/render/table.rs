use console::Style;
use maxctl_admin::PoolStatus;
use maxctl_common::error::Result;
use prettytable::{
    Table,
    format::{FormatBuilder, LinePosition, LineSeparator, TableFormat},
    row,
};

use super::{Confirmation, Render};
use crate::{
    config::OutputConfig,
    view::{ActivePoolView, PoolProgress, PoolStatusRow},
};

/// Box-drawn borders with a rule under the title row only.
fn box_format() -> TableFormat {
    FormatBuilder::new()
        .column_separator('│')
        .borders('│')
        .separators(&[LinePosition::Top], LineSeparator::new('─', '┬', '┌', '┐'))
        .separators(&[LinePosition::Title], LineSeparator::new('─', '┼', '├', '┤'))
        .separators(&[LinePosition::Bottom], LineSeparator::new('─', '┴', '└', '┘'))
        .padding(1, 1)
        .build()
}

/// Human readable output: tables for listings, plain lines for messages.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    quiet: bool,
    header_style: Option<Style>,
    row_style: Option<Style>,
    message_style: Option<Style>,
}

impl TableRenderer {
    pub fn new(config: &OutputConfig) -> Self {
        let styled = |style: Style| config.color.then(|| style.force_styling(true));
        Self {
            quiet: config.quiet,
            header_style: styled(Style::new().green().bold()),
            row_style: styled(Style::new().dim()),
            message_style: styled(Style::new().green()),
        }
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(box_format());
        table
    }

    /// Styles whole lines after layout so escape codes never skew column widths.
    fn table(&self, table: &Table) -> String {
        let plain = table.to_string();
        let lines = plain.lines().collect::<Vec<_>>();
        let bottom = lines.len().saturating_sub(1);

        let mut out = String::with_capacity(plain.len());
        for (index, line) in lines.iter().enumerate() {
            let style = match index {
                1 => self.header_style.as_ref(),
                index if index > 2 && index < bottom => self.row_style.as_ref(),
                _ => None,
            };
            match style {
                Some(style) => out.push_str(&style.apply_to(line).to_string()),
                None => out.push_str(line),
            }
            out.push('\n');
        }
        out
    }

    fn message(&self, text: &str) -> String {
        match &self.message_style {
            Some(style) => format!("{}\n", style.apply_to(text)),
            None => format!("{text}\n"),
        }
    }
}

impl Render for TableRenderer {
    fn active_pools(&self, view: &ActivePoolView) -> Result<String> {
        let mut table = self.new_table();
        table.set_titles(row!["ID", "Pools", "Capacity", "Status"]);
        for pool in &view.pools {
            table.add_row(row![pool.ordinal, pool.pool, pool.capacity, pool.status]);
        }
        Ok(self.table(&table))
    }

    fn pool_list(&self, pools: &[PoolStatus]) -> Result<String> {
        let mut table = self.new_table();
        table.set_titles(row!["ID", "Pools", "Drives Usage", "Status"]);
        for pool in pools.iter().map(PoolStatusRow::from_pool) {
            table.add_row(row![pool.ordinal, pool.pool, pool.drives_usage, pool.status]);
        }
        Ok(self.table(&table))
    }

    fn pool_progress(&self, _pool: &PoolStatus, progress: &PoolProgress) -> Result<String> {
        Ok(self.message(&progress.message()))
    }

    fn confirmation(&self, confirmation: &Confirmation) -> Result<String> {
        if self.quiet {
            return Ok(String::new());
        }
        Ok(self.message(&confirmation.message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classify::{PoolClass, tests::pool},
        view::ActivePoolView,
    };

    fn plain() -> TableRenderer {
        TableRenderer::new(&OutputConfig::default())
    }

    #[test]
    fn empty_view_renders_header_only() {
        let rendered = plain().active_pools(&ActivePoolView::default()).unwrap();
        assert_eq!(
            rendered,
            "┌────┬───────┬──────────┬────────┐\n\
             │ ID │ Pools │ Capacity │ Status │\n\
             ├────┼───────┼──────────┼────────┤\n\
             └────┴───────┴──────────┴────────┘\n"
        );
    }

    #[test]
    fn draining_row_layout() {
        let snapshot = vec![
            pool(0, PoolClass::Inactive),
            pool(1, PoolClass::Pending),
            pool(2, PoolClass::Draining),
            pool(3, PoolClass::Finished),
        ];
        let rendered = plain()
            .active_pools(&ActivePoolView::from_snapshot(&snapshot))
            .unwrap();
        let lines = rendered.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[3],
            "│ 3rd │ http://server{9...12}/disk{1...4} │ 512.0 MiB (used) / 1.0 GiB (total) │ Draining │"
        );
        assert!(lines[1].starts_with("│ ID  │ Pools"));
    }

    #[test]
    fn rows_are_not_separated_by_rules() {
        let snapshot = vec![pool(0, PoolClass::Draining), pool(1, PoolClass::Draining)];
        let rendered = plain()
            .active_pools(&ActivePoolView::from_snapshot(&snapshot))
            .unwrap();
        let lines = rendered.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 6);
        assert!(lines[2].starts_with('├'));
        assert!(lines[3].starts_with("│ 1st │"));
        assert!(lines[4].starts_with("│ 2nd │"));
        assert!(lines[5].starts_with('└'));
        assert_eq!(
            console::measure_text_width(lines[0]),
            console::measure_text_width(lines[3])
        );
    }

    #[test]
    fn header_is_styled_when_color_enabled() {
        let config = OutputConfig {
            color: true,
            ..OutputConfig::default()
        };
        let rendered = TableRenderer::new(&config)
            .active_pools(&ActivePoolView::default())
            .unwrap();
        assert!(rendered.contains("\u{1b}["));
        assert_eq!(
            console::strip_ansi_codes(&rendered).to_string(),
            plain().active_pools(&ActivePoolView::default()).unwrap()
        );
    }

    #[test]
    fn status_listing_covers_every_pool() {
        let snapshot = vec![
            pool(0, PoolClass::Inactive),
            pool(1, PoolClass::Draining),
            pool(2, PoolClass::Finished),
        ];
        let rendered = plain().pool_list(&snapshot).unwrap();
        let lines = rendered.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 7);
        assert!(lines[1].contains("Drives Usage"));
        assert!(lines[3].ends_with("│ Active   │"));
        assert!(lines[4].contains("50.0% (total: 1.0 GiB)"));
        assert!(lines[5].ends_with("│ Complete │"));
    }

    #[test]
    fn quiet_suppresses_confirmation() {
        let confirmation = Confirmation::Canceled {
            pool: "http://server{5...8}/disk{1...4}".to_string(),
        };
        assert_eq!(
            plain().confirmation(&confirmation).unwrap(),
            "Decommission canceled successfully for pool http://server{5...8}/disk{1...4}.\n"
        );

        let quiet = TableRenderer::new(&OutputConfig {
            quiet: true,
            ..OutputConfig::default()
        });
        assert_eq!(quiet.confirmation(&confirmation).unwrap(), "");
    }
}
