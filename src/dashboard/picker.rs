/// Companies whose name contains `term`, ignoring case. A blank term keeps everything.
pub fn filter_companies<'a>(
    companies: &[(&'a str, &'a str)],
    term: &str,
) -> Vec<(&'a str, &'a str)> {
    let needle = term.trim().to_lowercase();
    companies
        .iter()
        .filter(|(name, _)| name.to_lowercase().contains(&needle))
        .copied()
        .collect()
}

pub fn company_label(name: &str, symbol: &str) -> String {
    format!("{name} ({symbol})")
}

/// Parses a 1-based menu choice into an index below `len`.
pub fn parse_choice(input: &str, len: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Some(n - 1),
        _ => None,
    }
}

pub fn is_quit(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "q" | "quit" | "exit")
}

/// Numbered menu lines, one option per line.
pub fn numbered<I, S>(options: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    options
        .into_iter()
        .enumerate()
        .map(|(i, option)| format!("  {}. {}\n", i + 1, option.as_ref()))
        .collect()
}
