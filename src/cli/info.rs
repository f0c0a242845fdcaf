use anyhow::{Context, Result};
use std::path::PathBuf;

#[cfg(feature = "colorized_output")]
use console::style;

use soxml::document::{Element, Node};
use soxml::matrix::Matrix;
use soxml::schema::ColumnType;
use soxml::table::Table;
use soxml::So;

#[cfg(feature = "colorized_output")]
fn heading(text: &str) -> String {
    style(text).bold().cyan().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn heading(text: &str) -> String {
    text.to_string()
}

/// Matrices below `element`, with their paths
fn matrices<'a>(element: &'a Element, prefix: &str, out: &mut Vec<(String, &'a Matrix)>) {
    for child in element.children() {
        let path = if prefix.is_empty() {
            child.local_name().to_string()
        } else {
            format!("{}/{}", prefix, child.local_name())
        };
        match child {
            Node::Matrix(m) => out.push((path, m)),
            Node::Element(e) => matrices(e, &path, out),
            _ => {}
        }
    }
}

fn describe_table(path: &str, table: &Table) {
    let location = match table.external_file().and_then(|f| f.path()) {
        Some(file) => format!(" in {}", file),
        None => String::new(),
    };
    println!(
        "    {} ({} rows x {} columns{})",
        path,
        table.num_rows(),
        table.num_columns(),
        location
    );
    for column in table.columns() {
        println!(
            "      {:<20} {:<8} {}",
            column.column_id(),
            column.value_type().as_str(),
            ColumnType::format_list(column.column_types())
        );
    }
}

/// Display information about an SO file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }
    let so = So::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;

    println!("{}", heading("SO File Information"));
    println!("===================");
    println!("File: {}", file.display());
    if let Some(model) = so.pharmml_ref() {
        println!("PharmML model: {}", model);
    }
    println!("Blocks: {}", so.blocks().count());

    for block in so.blocks() {
        println!();
        println!(
            "{}",
            heading(&format!("SOBlock {}", block.blk_id().unwrap_or("<no blkId>")))
        );

        let tables = block.tables();
        if !tables.is_empty() {
            println!("  Tables:");
            for (path, table) in &tables {
                describe_table(path, table);
            }
        }

        let mut found = Vec::new();
        matrices(block, "", &mut found);
        if !found.is_empty() {
            println!("  Matrices:");
            for (path, m) in found {
                println!("    {} ({} x {})", path, m.num_rows(), m.num_columns());
            }
        }

        let messages: Vec<&Element> = block.messages().collect();
        if !messages.is_empty() {
            println!("  Messages:");
            for message in messages {
                println!(
                    "    [{}] {}: {}",
                    message.attribute("type").unwrap_or("?"),
                    message.leaf_at("Toolname/String").unwrap_or(""),
                    message.leaf_at("Content/String").unwrap_or("")
                );
            }
        }
    }

    Ok(())
}
