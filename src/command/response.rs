//! JSON response lines.

use core::fmt::{self, Display, Write};

use heapless::String;

use super::parser::{CommandFailure, Verb};

/// Capacity of one response line, enough for a level 3 STATUS.
pub const RESPONSE_CAPACITY: usize = 320;

/// One response line, terminated by `\r\n`.
pub type Response = String<RESPONSE_CAPACITY>;

/// Builder for a flat single-line JSON object.
///
/// Always starts with `"Cmd"` and `"Status"`. Output that does not fit is
/// cut off and logged; the line terminator is always written.
pub struct ResponseBuilder {
    line: Response,
    truncated: bool,
}

impl ResponseBuilder {
    /// `{"Cmd": "<verb>", "Status": "Success"`
    pub fn success(verb: Verb) -> Self {
        Self::open(verb, "Success")
    }

    /// `{"Cmd": "<verb>", "Status": "Error"`
    pub fn error(verb: Verb) -> Self {
        Self::open(verb, "Error")
    }

    fn open(verb: Verb, status: &str) -> Self {
        let mut builder = Self {
            line: String::new(),
            truncated: false,
        };
        builder.push_fmt(format_args!("{{\"Cmd\": \"{}\", \"Status\": \"{}\"", verb.name(), status));
        builder
    }

    /// Add an unquoted value: numbers, booleans, arrays.
    pub fn value(mut self, key: &str, value: impl Display) -> Self {
        self.push_fmt(format_args!(", \"{}\": {}", key, value));
        self
    }

    /// Add a quoted string value.
    pub fn text(mut self, key: &str, value: &str) -> Self {
        self.push_fmt(format_args!(", \"{}\": \"{}\"", key, Escaped(value)));
        self
    }

    /// Close the object and terminate the line.
    pub fn finish(mut self) -> Response {
        const END: &str = "}\r\n";
        if self.line.len() + END.len() > RESPONSE_CAPACITY {
            let mut cut = RESPONSE_CAPACITY - END.len();
            while !self.line.is_char_boundary(cut) {
                cut -= 1;
            }
            self.line.truncate(cut);
            self.truncated = true;
        }
        if self.truncated {
            warn!("response truncated to {} bytes", RESPONSE_CAPACITY);
        }
        // fits after the truncation above
        let _ = self.line.push_str(END);
        self.line
    }

    fn push_fmt(&mut self, args: fmt::Arguments<'_>) {
        if self.line.write_fmt(args).is_err() {
            self.truncated = true;
        }
    }
}

/// Error reply for a line that failed to parse.
///
/// Unknown keywords answer with `Cmd` `UNKNOWN` and the fixed message
/// `Unknown command`.
pub fn failure(failure: &CommandFailure<'_>) -> Response {
    let mut builder = ResponseBuilder::error(failure.verb);
    if let Some(parameter) = failure.parameter {
        builder = builder.text("Parameter", parameter);
    }
    let mut message: String<32> = String::new();
    let _ = write!(message, "{}", failure.error);
    builder.text("Message", &message).finish()
}

/// `[a, b, c]` rendering of a sample slice.
pub struct SampleList<'a>(pub &'a [i16]);

impl Display for SampleList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        for (i, sample) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", sample)?;
        }
        f.write_char(']')
    }
}

struct Escaped<'a>(&'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                c if c.is_control() => {}
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}
