// src/io.rs

use crate::error::CliError;
use std::io::{stdin, stdout, Write};

/// Trait for terminal input/output so handlers can be tested with a
/// scripted double.
pub trait IoHandler {
    fn read_line(&mut self, prompt: &str) -> Result<String, CliError>;
    fn write_line(&mut self, line: &str) -> Result<(), CliError>;
    /// Writes without appending a newline.
    fn write_raw(&mut self, text: &str) -> Result<(), CliError>;
    fn flush(&mut self) -> Result<(), CliError>;

    /// Yes/no prompt; empty input means no.
    fn confirm(&mut self, prompt: &str) -> Result<bool, CliError> {
        let answer = self.read_line(&format!("{prompt} [y/N]"))?;
        Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
    }
}

/// Standard I/O handler backed by stdin and stdout.
#[derive(Default)]
pub struct StdIoHandler;

impl IoHandler for StdIoHandler {
    fn read_line(&mut self, prompt: &str) -> Result<String, CliError> {
        print!("{} ", prompt);
        stdout().flush().map_err(CliError::Io)?;
        let mut input = String::new();
        stdin().read_line(&mut input).map_err(CliError::Io)?;
        Ok(input.trim().to_string())
    }

    fn write_line(&mut self, line: &str) -> Result<(), CliError> {
        println!("{}", line);
        Ok(())
    }

    fn write_raw(&mut self, text: &str) -> Result<(), CliError> {
        print!("{}", text);
        stdout().flush().map_err(CliError::Io)
    }

    fn flush(&mut self) -> Result<(), CliError> {
        stdout().flush().map_err(CliError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct ScriptedIo {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl ScriptedIo {
        fn new(input: &str) -> Self {
            Self {
                input: Cursor::new(input.as_bytes().to_vec()),
                output: Vec::new(),
            }
        }

        fn output_as_string(&self) -> String {
            String::from_utf8_lossy(&self.output).to_string()
        }
    }

    impl IoHandler for ScriptedIo {
        fn read_line(&mut self, prompt: &str) -> Result<String, CliError> {
            self.write_raw(prompt)?;
            self.write_raw(" ")?;
            let mut buf = String::new();
            std::io::BufRead::read_line(&mut self.input, &mut buf).map_err(CliError::Io)?;
            Ok(buf.trim().to_string())
        }

        fn write_line(&mut self, line: &str) -> Result<(), CliError> {
            writeln!(&mut self.output, "{}", line).map_err(CliError::Io)
        }

        fn write_raw(&mut self, text: &str) -> Result<(), CliError> {
            write!(&mut self.output, "{}", text).map_err(CliError::Io)
        }

        fn flush(&mut self) -> Result<(), CliError> {
            Write::flush(&mut self.output).map_err(CliError::Io)
        }
    }

    #[test]
    fn read_line_trims_and_echoes_prompt() {
        let mut io = ScriptedIo::new("  navy blazer  \n");
        let value = io.read_line("Item name:").unwrap();
        assert_eq!(value, "navy blazer");
        assert_eq!(io.output_as_string(), "Item name: ");
    }

    #[test]
    fn confirm_accepts_yes_variants() {
        for answer in ["y\n", "Y\n", "yes\n", "Yes\n"] {
            let mut io = ScriptedIo::new(answer);
            assert!(io.confirm("Delete this item?").unwrap());
        }
    }

    #[test]
    fn confirm_defaults_to_no() {
        for answer in ["\n", "n\n", "whatever\n"] {
            let mut io = ScriptedIo::new(answer);
            assert!(!io.confirm("Delete this item?").unwrap());
        }
    }
}
