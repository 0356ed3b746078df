//! Buffer text extraction and scrollback replay for the VT parser.

/// Collect scrollback and visible rows, oldest first, one entry per line.
///
/// Walks the scrollback one offset at a time, taking the top visible row at
/// each offset, then appends the live screen. A row the terminal soft-wrapped
/// is joined with the row after it, so a line wider than the screen comes
/// back as one entry. Trailing whitespace on each line and trailing blank
/// lines are dropped. The parser is left at offset 0.
pub fn buffer_lines(parser: &mut vt100::Parser) -> Vec<String> {
    let (rows, cols) = parser.screen().size();

    parser.set_scrollback(usize::MAX);
    let depth = parser.screen().scrollback();

    let mut physical: Vec<(String, bool)> = Vec::new();
    for offset in (1..=depth).rev() {
        parser.set_scrollback(offset);
        let screen = parser.screen();
        if let Some(row) = screen.rows(0, cols).next() {
            physical.push((row, screen.row_wrapped(0)));
        }
    }

    parser.set_scrollback(0);
    let screen = parser.screen();
    physical.extend(
        screen
            .rows(0, cols)
            .zip(0..rows)
            .map(|(row, idx)| (row, screen.row_wrapped(idx))),
    );

    let mut lines = join_wrapped(physical);
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Merge soft-wrapped rows into logical lines
fn join_wrapped(rows: impl IntoIterator<Item = (String, bool)>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = String::new();
    for (row, wrapped) in rows {
        pending.push_str(&row);
        if !wrapped {
            lines.push(pending.trim_end().to_string());
            pending.clear();
        }
    }
    // The last screen row can still be waiting for its continuation
    if !pending.is_empty() {
        lines.push(pending.trim_end().to_string());
    }
    lines
}

/// Write saved lines into a fresh parser, as if a previous child had
/// printed them
pub fn replay_lines(parser: &mut vt100::Parser, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let text = format!("{}\n", lines.join("\n"));
    parser.process(to_terminal_text(&text).as_bytes());
}

/// Convert plain text to what a terminal expects: bare `\n` becomes `\r\n`
pub fn to_terminal_text(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}
