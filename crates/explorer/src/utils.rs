use comfy_table::{presets, Row, Table};

/// Formats an integer with `,` as thousands separator.
pub(crate) fn thousands<T: ToString>(n: T) -> String {
    let digits = n.to_string();
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    format!("{sign}{out}")
}

/// Shortens `s` to `max` characters; a shortened string ends with
/// `...`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let mut short: String = s.chars().take(max).collect();
        short.push_str("...");
        short
    } else {
        s.to_string()
    }
}

pub(crate) fn table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: ToString,
{
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(Row::from(
        header.into_iter().map(|s| s.to_string()).collect::<Vec<_>>(),
    ));
    table
}

/// Prints a section heading.
pub(crate) fn heading(title: &str) {
    println!("\n{}\n{title}\n{}", "=".repeat(60), "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separator() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567u64), "1,234,567");
        assert_eq!(thousands(-42000), "-42,000");
    }

    #[test]
    fn truncate_titles() {
        assert_eq!(truncate("short", 80), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("äöüß", 2), "äö...");
    }

    #[test]
    fn table_header() {
        let mut table = table(["year", "papers"]);
        table.add_row(["2020", "12"]);
        let out = table.to_string();
        assert!(out.contains("year") && out.contains("2020"));
    }
}
