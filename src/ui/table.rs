use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Pad every cell to its column's display width. Returns one line per row, header first.
pub fn layout(headers: &[(&str, Align)], rows: &[Vec<String>]) -> Vec<Vec<String>> {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|(title, _)| UnicodeWidthStr::width(*title))
        .collect();

    for row in rows {
        for (col, cell) in row.iter().enumerate().take(widths.len()) {
            widths[col] = widths[col].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let pad_row = |cells: Vec<&str>| -> Vec<String> {
        cells
            .into_iter()
            .zip(headers.iter().zip(&widths))
            .map(|(cell, ((_, align), width))| pad(cell, *width, *align))
            .collect()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(pad_row(headers.iter().map(|(title, _)| *title).collect()));
    for row in rows {
        lines.push(pad_row(row.iter().map(String::as_str).collect()));
    }
    lines
}

pub fn pad(cell: &str, width: usize, align: Align) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(cell));
    match align {
        Align::Left => format!("{cell}{}", " ".repeat(fill)),
        Align::Right => format!("{}{cell}", " ".repeat(fill)),
    }
}
