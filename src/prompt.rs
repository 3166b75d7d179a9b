use std::io::{self, BufRead, Write};

/// Ask whether to proceed with `count` renames.
///
/// Strict mode accepts only the exact word "yes"; lenient mode also
/// takes "y" and is case-insensitive. Anything else, including EOF,
/// declines.
pub fn confirm(
    input: &mut impl BufRead,
    output: &mut impl Write,
    count: usize,
    strict: bool,
) -> io::Result<bool> {
    let noun = if count == 1 { "file" } else { "files" };
    if strict {
        write!(output, "Rename {} {}? Type 'yes' to continue: ", count, noun)?;
    } else {
        write!(output, "Rename {} {}? [y/N] ", count, noun)?;
    }
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    let answer = line.trim();

    let accepted = if strict {
        answer == "yes"
    } else {
        answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
    };
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(reply: &str, strict: bool) -> (bool, String) {
        let mut input = Cursor::new(reply.as_bytes().to_vec());
        let mut output = Vec::new();
        let accepted = confirm(&mut input, &mut output, 3, strict).unwrap();
        (accepted, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_strict_requires_full_yes() {
        assert!(run("yes\n", true).0);
        assert!(!run("y\n", true).0);
        assert!(!run("YES\n", true).0);
        assert!(!run("no\n", true).0);
    }

    #[test]
    fn test_lenient_accepts_short_and_cased_forms() {
        assert!(run("y\n", false).0);
        assert!(run("Y\n", false).0);
        assert!(run("Yes\n", false).0);
        assert!(!run("n\n", false).0);
        assert!(!run("\n", false).0);
    }

    #[test]
    fn test_eof_declines() {
        assert!(!run("", true).0);
        assert!(!run("", false).0);
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert!(run("  yes  \n", true).0);
    }

    #[test]
    fn test_prompt_states_the_count() {
        let (_, prompt) = run("no\n", true);
        assert!(prompt.contains("3 files"));

        let mut input = Cursor::new(b"no\n".to_vec());
        let mut output = Vec::new();
        confirm(&mut input, &mut output, 1, true).unwrap();
        assert!(String::from_utf8(output).unwrap().contains("1 file?"));
    }
}
