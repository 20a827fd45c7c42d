use abcd_catalog::structure::{read_event_names, read_header};
use anyhow::Result;
use std::{env, path::Path, process::exit};

fn main() {
    // Expect a structure file and an optional one-byte delimiter.
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <STRUCTURE_FILE> [DELIMITER]", args[0]);
        exit(1);
    }
    let delimiter = match args.get(2).map(String::as_bytes) {
        None => b'\t',
        Some([b]) => *b,
        Some(_) => {
            eprintln!("Error: delimiter must be a single byte");
            exit(1);
        }
    };
    if let Err(e) = inspect_structure(Path::new(&args[1]), delimiter) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Print the elements, descriptions and event names of one structure file.
fn inspect_structure(path: &Path, delimiter: u8) -> Result<()> {
    let header = read_header(path, delimiter)?;

    println!("=== Structure: {} ===", header.name);
    println!("File:     {}", path.display());
    println!("Elements: {}", header.columns.len());
    println!();

    println!("=== Elements ===");
    for col in &header.columns {
        println!("- {:<30} | {}", col.element, col.description);
    }
    println!();

    println!("=== Events ===");
    match read_event_names(path, &header, delimiter)? {
        None => println!("(no eventname column)"),
        Some(events) if events.is_empty() => println!("(no data rows)"),
        Some(events) => {
            for event in events {
                println!("- {}", event);
            }
        }
    }
    Ok(())
}
