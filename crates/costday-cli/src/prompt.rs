//! Interactive prompts

use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(is_yes(&input))
}

/// Prompt with a default value, returns None if user keeps default
pub fn prompt_with_default(prompt: &str, default: &str) -> Result<Option<String>> {
    let stdin = io::stdin();
    read_with_default(&mut stdin.lock(), &mut io::stdout(), prompt, default)
}

fn read_with_default(
    input: &mut impl BufRead,
    out: &mut impl Write,
    prompt: &str,
    default: &str,
) -> Result<Option<String>> {
    if default.is_empty() {
        write!(out, "{}: ", prompt)?;
    } else {
        write!(out, "{} [{}]: ", prompt, default)?;
    }
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let line = line.trim();

    if line.is_empty() {
        Ok(None)
    } else {
        Ok(Some(line.to_string()))
    }
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}
