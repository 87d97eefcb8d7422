use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let render = |cells: Vec<String>| cells.join("  ");

    println!(
        "{}",
        render(
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| pad(h, widths[i]))
                .collect()
        )
    );
    println!("{}", render(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in rows {
        println!(
            "{}",
            render(
                row.iter()
                    .enumerate()
                    .map(|(i, cell)| pad(cell, widths.get(i).copied().unwrap_or(0)))
                    .collect()
            )
        );
    }
}

fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_left_aligns_to_width() {
        assert_eq!(pad("id", 4), "id  ");
        assert_eq!(pad("longer", 4), "longer");
    }
}
