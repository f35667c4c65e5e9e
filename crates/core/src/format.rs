use crate::tally::TallySnapshot;

/// Right-align `value` in a column of `width`.
pub fn pad_count(value: u64, width: usize) -> String {
    format!("{:>width$}", value, width = width)
}

/// Render the final tallies as a plain text table, one action per row.
pub fn format_tally_readable(snapshot: &TallySnapshot<'_>) -> String {
    let mut output = String::new();

    if snapshot.is_empty() {
        output.push_str("No audit events recorded.\n");
        return output;
    }

    let label_width = snapshot
        .iter()
        .map(|(action, _)| action.chars().count())
        .max()
        .unwrap_or(0)
        .max("action".len());

    output.push_str(&format!(
        "{:<label_width$}  {:>9}  {:>10}  {:>12}  {:>7}\n",
        "action", "attempted", "successful", "unsuccessful", "total"
    ));
    output.push_str(&format!("{}\n", "-".repeat(label_width + 48)));

    for (action, tally) in snapshot.iter() {
        output.push_str(&format!(
            "{:<label_width$}  {}  {}  {}  {}\n",
            action,
            pad_count(tally.attempted, 9),
            pad_count(tally.successful, 10),
            pad_count(tally.unsuccessful, 12),
            pad_count(tally.total, 7),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::TallyTable;

    #[test]
    fn renders_one_row_per_action() {
        let mut table = TallyTable::new();
        table.record("login", "successful");
        table.record("login", "unsuccessful");
        table.record("logout", "attempted");

        let text = format_tally_readable(&table.snapshot());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("action"));
        assert!(lines[2].starts_with("login "));
        assert!(lines[2].ends_with("      2"));
        assert!(lines[3].starts_with("logout"));
    }

    #[test]
    fn empty_table_says_so() {
        let table = TallyTable::new();
        assert_eq!(
            format_tally_readable(&table.snapshot()),
            "No audit events recorded.\n"
        );
    }
}
