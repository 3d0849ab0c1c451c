//! Serial command protocol.
//!
//! Lines are framed by [`LineBuffer`], parsed into a [`Command`] and answered
//! with a single JSON object per line. Execution lives in
//! [`Positioner::handle_command`](crate::Positioner::handle_command).

mod line;
mod parser;
mod response;

pub use line::{Line, LineBuffer, MAX_LINE_LEN};
pub use parser::{parse, Command, CommandFailure, Parameter, Setting, Verb};
pub use response::{failure, Response, ResponseBuilder, SampleList, RESPONSE_CAPACITY};
