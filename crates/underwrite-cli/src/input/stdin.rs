use std::io::{self, Read};

use underwrite_core::rent_roll::RentRoll;

/// Read a normalized rent roll piped on stdin. Returns None when stdin is
/// a TTY (interactive session, nothing piped) or the pipe is empty, so the
/// caller can fall back to demanding --input.
pub fn read_rent_roll() -> Result<Option<RentRoll>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let rent_roll: RentRoll = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse rent roll from stdin: {}", e))?;
    Ok(Some(rent_roll))
}
