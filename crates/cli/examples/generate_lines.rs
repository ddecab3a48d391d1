use finder_core::generate::generate_elems_with_dups;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/test_lines.txt".to_string());
    let num_lines: usize = match std::env::args().nth(2) {
        Some(n) => n.parse()?,
        None => 10_000,
    };
    let dup_rate: f64 = match std::env::args().nth(3) {
        Some(r) => r.parse()?,
        None => 0.4,
    };

    println!("Generating {} lines with dup_rate={:.2}: {}", num_lines, dup_rate, output_file);

    let mut rng = StdRng::seed_from_u64(42);
    let lines = generate_elems_with_dups(num_lines, dup_rate, &mut rng)?;

    let mut writer = BufWriter::new(File::create(&output_file)?);
    for line in &lines {
        writeln!(writer, "line-{}", line)?;
    }
    writer.flush()?;

    let unique = num_lines - (num_lines as f64 * dup_rate).floor() as usize;
    println!("\n✓ Wrote {} lines (~{} unique)", lines.len(), unique);
    println!("\nDeduplicate with:");
    println!("  cargo run -p finder-cli -- dedupe-file -i {} -o {}.dedup --finder map", output_file, output_file);
    println!("  cargo run -p finder-cli -- dedupe-file -i {} -o {}.dedup --finder slice", output_file, output_file);

    Ok(())
}
