//! Typed console prompts with re-prompt on invalid input

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

pub(crate) const INVALID_NUMBER: &str = "Invalid input. Please enter a number.";

/// Line-oriented console over any reader/writer pair.
///
/// End of input surfaces as `io::ErrorKind::UnexpectedEof`, which the shell
/// treats as a request to exit.
pub struct Console<R, W> {
    input: R,
    pub(crate) output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_raw(&mut self) -> io::Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Prompt for a line of text, returned as typed (without the newline)
    pub fn line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.read_raw()
    }

    /// Prompt for text; blank input becomes `None`
    pub fn optional_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let value = self.line(prompt)?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }

    pub fn integer(&mut self, prompt: &str) -> io::Result<i64> {
        loop {
            if let Ok(value) = self.line(prompt)?.trim().parse::<i64>() {
                return Ok(value);
            }
            writeln!(self.output, "{}", INVALID_NUMBER)?;
        }
    }

    /// Like [`Console::integer`], for values that must fit an `i32` column
    pub fn small_integer(&mut self, prompt: &str) -> io::Result<i32> {
        loop {
            if let Ok(value) = self.line(prompt)?.trim().parse::<i32>() {
                return Ok(value);
            }
            writeln!(self.output, "{}", INVALID_NUMBER)?;
        }
    }

    pub fn decimal(&mut self, prompt: &str) -> io::Result<f64> {
        loop {
            if let Some(value) = self.optional_decimal(prompt)? {
                return Ok(value);
            }
            writeln!(self.output, "{}", INVALID_NUMBER)?;
        }
    }

    /// Prompt for a decimal; blank input becomes `None`, anything else that
    /// does not parse is re-prompted.
    pub fn decimal_or_default(&mut self, prompt: &str, default: f64) -> io::Result<f64> {
        loop {
            let raw = self.line(prompt)?;
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(default);
            }
            match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(value),
                _ => writeln!(self.output, "{}", INVALID_NUMBER)?,
            }
        }
    }

    fn optional_decimal(&mut self, prompt: &str) -> io::Result<Option<f64>> {
        Ok(self
            .line(prompt)?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite()))
    }

    /// Prompt for a `YYYY-MM-DD` date; blank input picks `default`
    pub fn date_or_default(&mut self, prompt: &str, default: NaiveDate) -> io::Result<NaiveDate> {
        loop {
            let raw = self.line(prompt)?;
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(default);
            }
            match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => return Ok(date),
                Err(_) => writeln!(self.output, "Invalid date. Please use YYYY-MM-DD.")?,
            }
        }
    }

    pub fn pause(&mut self) -> io::Result<()> {
        write!(self.output, "\nPress Enter to continue...")?;
        self.read_raw().map(|_| ())
    }
}
