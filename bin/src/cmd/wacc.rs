//! WACC command implementation.

use tasador_traits::{WaccLookup, WaccTable};

/// Print the beta-to-WACC bucket table, and optionally one lookup.
pub(crate) fn show_wacc(table: &WaccTable, beta: Option<f64>) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    WACC by Beta                              ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    for line in table_lines(table) {
        println!("{line}");
    }
    println!();

    if let Some(beta) = beta {
        println!(
            "Beta {beta:.2} -> WACC {:.2}%",
            table.lookup_wacc_by_beta(beta) * 100.0
        );
        println!();
    }
}

fn table_lines(table: &WaccTable) -> Vec<String> {
    let mut lines = vec![format!("{:20} {:>8}", "Beta", "WACC"), "-".repeat(29)];
    let mut lower: Option<f64> = None;

    for bucket in table.buckets() {
        let range = match lower {
            Some(low) => format!("{low:.2} to < {:.2}", bucket.upper_beta),
            None => format!("< {:.2}", bucket.upper_beta),
        };
        lines.push(format!("{range:20} {:>7.2}%", bucket.wacc * 100.0));
        lower = Some(bucket.upper_beta);
    }

    let range = lower.map_or_else(|| "any".to_string(), |low| format!(">= {low:.2}"));
    lines.push(format!("{range:20} {:>7.2}%", table.above() * 100.0));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_lines() {
        let lines = table_lines(&WaccTable::default());
        assert_eq!(lines.len(), 2 + 7);
        assert!(lines[2].starts_with("< 0.80"));
        assert!(lines[2].ends_with("5.00%"));
        assert!(lines[6].starts_with("1.20 to < 1.30"));
        assert!(lines[6].ends_with("8.00%"));
        assert!(lines[8].starts_with(">= 1.50"));
        assert!(lines[8].ends_with("9.00%"));
    }

    #[test]
    fn test_single_rate_table() {
        let table = WaccTable::new(vec![], 0.1).unwrap();
        let lines = table_lines(&table);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("any"));
    }
}
