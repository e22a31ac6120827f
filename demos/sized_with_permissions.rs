use {
    std::time::Instant,
    ziproller::{FileRotatorBuilder, RotationSize},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let mut rotator = FileRotatorBuilder::new("./logs", "sized.log")
        .rotation_size(RotationSize::KB(64)) // Rotate at 64KB
        .keep_files(5) // The active file plus the 4 newest archives
        .file_mode(0o640) // Set file permissions to: owner rw, group r, others none
        .build()?;

    // Simulate writing logs that will trigger several rotations
    for i in 1..=10_000 {
        let line = format!("Log entry #{i}: This is a sample log message that will contribute to file size");
        rotator.write_line(line.as_bytes())?;
    }

    println!("Done logging: {:?}", start.elapsed());
    for archive in rotator.archives()? {
        let size = std::fs::metadata(&archive).map_or(0, |m| m.len());
        println!("{} : {size} Bytes", archive.display());
    }
    Ok(())
}
