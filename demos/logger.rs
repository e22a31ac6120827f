use ziproller::{FileRotatorBuilder, RotationSize};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rotator = FileRotatorBuilder::new("./logs", "logger.log")
        .rotation_size(RotationSize::KB(256))
        .keep_files(3)
        .build()?;

    rotator.write_line(b"This is an info message")?;
    rotator.write_line(b"This is a warning message")?;
    rotator.write_line(b"This is an error message")?;

    Ok(())
}
