use std::io::{self, IsTerminal, Stdout, Write};

use chrono::{DateTime, Local};
use crossterm::style::{Color, Stylize};

use crate::aggregator::Generation;
use crate::catalog::TrackedItem;
use crate::records::ItemResult;
use crate::utils::format_timestamp;

pub mod format;
pub mod table;

use format::{format_compact, format_logo, format_percent, format_quantity, format_usd};
use table::Align;

const SUMMARY_HEADERS: [(&str, Align); 6] = [
    ("#", Align::Right),
    ("Name", Align::Left),
    ("Symbol", Align::Left),
    ("Price", Align::Right),
    ("24h", Align::Right),
    ("Logo", Align::Left),
];

/// Writes fetch progress and results as plain text, optionally with ANSI colors.
pub struct ConsolePresenter<W: Write> {
    out: W,
    color: bool,
}

impl ConsolePresenter<Stdout> {
    /// Present on stdout, coloring only when it is a terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self::new(out, color)
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn cycle_started(&mut self, generation: Generation, total: usize) -> io::Result<()> {
        let line = format!("Fetching {total} assets (refresh {generation})...");
        let line = self.dim(&line);
        self.message(&line)
    }

    pub fn item_ready(&mut self, row: &ItemResult, done: usize, total: usize) -> io::Result<()> {
        let status = if row.is_available() {
            format_usd(&row.record.price_usd)
        } else {
            self.dim("unavailable")
        };
        let symbol = self.accented(&row.item, &format!("{:<5}", row.item.symbol));
        writeln!(
            self.out,
            "[{done}/{total}] {symbol} {:<10} {status}",
            row.item.display_name
        )?;
        self.out.flush()
    }

    pub fn summary(
        &mut self,
        rows: &[ItemResult],
        updated: Option<DateTime<Local>>,
    ) -> io::Result<()> {
        let cells: Vec<Vec<String>> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                vec![
                    row.record
                        .rank
                        .clone()
                        .filter(|_| row.is_available())
                        .unwrap_or_else(|| (index + 1).to_string()),
                    row.record.name.clone(),
                    row.record.symbol.clone(),
                    format_usd(&row.record.price_usd),
                    format_percent(row.record.change_percent_24h.as_deref()),
                    format_logo(row.logo.as_ref()),
                ]
            })
            .collect();

        let lines = table::layout(&SUMMARY_HEADERS, &cells);
        let mut lines = lines.into_iter();

        writeln!(self.out)?;
        if let Some(header) = lines.next() {
            let header = header.join("  ");
            let header = self.bold(&header);
            writeln!(self.out, "{header}")?;
        }

        for (row, line) in rows.iter().zip(lines) {
            let rendered = if row.is_available() {
                let mut cells = line;
                let symbol = self.accented(&row.item, &cells[2]);
                let change = self.signed(&cells[4], row.record.change_percent_24h.as_deref());
                cells[2] = symbol;
                cells[4] = change;
                cells.join("  ")
            } else {
                self.dim(&line.join("  "))
            };
            writeln!(self.out, "{rendered}")?;
        }

        let available = rows.iter().filter(|row| row.is_available()).count();
        let footer = match updated {
            Some(at) => format!(
                "{available}/{} assets available. Updated {}.",
                rows.len(),
                format_timestamp(at)
            ),
            None => format!("{available}/{} assets available.", rows.len()),
        };
        writeln!(self.out, "{footer}")?;
        self.out.flush()
    }

    /// Full record for one asset, as on the detail screen.
    pub fn detail(&mut self, row: &ItemResult) -> io::Result<()> {
        let record = &row.record;
        let title = format!("{} ({})", record.name, record.symbol);
        let title = self.bold(&title);
        writeln!(self.out, "{title}")?;

        if !row.is_available() {
            writeln!(self.out, "  Live data unavailable for this asset.")?;
            return self.out.flush();
        }

        let fields = [
            ("Price", format_usd(&record.price_usd)),
            ("Rank", record.rank.clone().unwrap_or_else(|| "N/A".to_string())),
            (
                "Supply (in circulation)",
                format!("{} {}", format_quantity(record.supply.as_deref()), record.symbol),
            ),
            ("Max supply", format_quantity(record.max_supply.as_deref())),
            ("Market cap", format_compact(record.market_cap_usd.as_deref())),
            ("Volume (24h)", format_compact(record.volume_usd_24h.as_deref())),
            ("Change (24h)", format_percent(record.change_percent_24h.as_deref())),
            ("Explorer", record.explorer_url.clone().unwrap_or_else(|| "-".to_string())),
            ("Logo", format_logo(row.logo.as_ref())),
        ];

        let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in fields {
            writeln!(self.out, "  {}  {value}", table::pad(label, width, Align::Left))?;
        }
        self.out.flush()
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dim().to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn accented(&self, item: &TrackedItem, cell: &str) -> String {
        if !self.color {
            return cell.to_string();
        }
        let [r, g, b] = item.accent;
        cell.with(Color::Rgb { r, g, b }).to_string()
    }

    fn signed(&self, cell: &str, change: Option<&str>) -> String {
        let change = change.and_then(|value| value.trim().parse::<f64>().ok());
        match change {
            Some(value) if self.color && value > 0.0 => cell.green().to_string(),
            Some(value) if self.color && value < 0.0 => cell.red().to_string(),
            _ => cell.to_string(),
        }
    }
}
