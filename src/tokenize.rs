//! Line tokenizer.
//!
//! Splits a single source line into a command keyword and its raw
//! arguments:
//!
//! ```text
//! line x0mm;y0mm, w10cm = &wall1   # comment
//! ^^^^ ^^^^^^^^^  ^^^^^   ^^^^^^
//! cmd  arg 0      arg 1   arg 2 (object variable)
//! ```
//!
//! Whitespace is dropped everywhere after the keyword, `,` separates
//! arguments, `=` introduces a trailing `&name` variable and `#` starts a
//! comment that runs to the end of the line.

use std::str::Chars;

use crate::config::Limits;
use crate::errors::LexError;

/// A tokenized statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens {
    pub command: String,
    pub arguments: Vec<String>,
}

impl Tokens {
    /// Trailing `&name` argument, if the statement stores its object
    pub fn capture(&self) -> Option<&str> {
        self.arguments
            .last()
            .map(String::as_str)
            .filter(|arg| arg.starts_with('&'))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Command,
    Arguments,
    CaptureVariable,
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

struct Tokenizer<'a> {
    chars: Chars<'a>,
    limits: Limits,
    stage: Stage,
    command: String,
    arguments: Vec<String>,
    current: String,
    capture: String,
    capture_done: bool,
}

impl<'a> Tokenizer<'a> {
    fn new(line: &'a str, limits: Limits) -> Self {
        Self {
            chars: line.chars(),
            limits,
            stage: Stage::Command,
            command: String::new(),
            arguments: Vec::new(),
            current: String::new(),
            capture: String::new(),
            capture_done: false,
        }
    }

    fn run(mut self) -> Result<Option<Tokens>, LexError> {
        while let Some(c) = self.chars.next() {
            if c == '#' {
                break;
            }
            match self.stage {
                Stage::Command => self.command_char(c)?,
                Stage::Arguments => self.argument_char(c)?,
                Stage::CaptureVariable => self.capture_char(c)?,
            }
        }
        self.finish()
    }

    fn command_char(&mut self, c: char) -> Result<(), LexError> {
        if is_blank(c) {
            if !self.command.is_empty() {
                self.stage = Stage::Arguments;
            }
            return Ok(());
        }
        if self.command.chars().count() >= self.limits.max_keyword_len {
            return Err(LexError::KeywordTooLong {
                limit: self.limits.max_keyword_len,
            });
        }
        self.command.push(c);
        Ok(())
    }

    fn argument_char(&mut self, c: char) -> Result<(), LexError> {
        match c {
            ',' => {
                if self.current.is_empty() {
                    return Err(LexError::EmptyArgument {
                        index: self.arguments.len(),
                    });
                }
                self.end_argument()
            }
            '=' => {
                if !self.current.is_empty() {
                    self.end_argument()?;
                } else if !self.arguments.is_empty() {
                    // "line a, = &x" leaves a dangling separator
                    return Err(LexError::EmptyArgument {
                        index: self.arguments.len(),
                    });
                }
                self.stage = Stage::CaptureVariable;
                Ok(())
            }
            c if is_blank(c) => Ok(()),
            c => {
                if self.current.is_empty() && self.arguments.len() >= self.limits.max_arguments {
                    return Err(LexError::TooManyArguments {
                        limit: self.limits.max_arguments,
                    });
                }
                if self.current.chars().count() >= self.limits.max_argument_len {
                    return Err(LexError::ArgumentTooLong {
                        index: self.arguments.len(),
                        limit: self.limits.max_argument_len,
                    });
                }
                self.current.push(c);
                Ok(())
            }
        }
    }

    fn capture_char(&mut self, c: char) -> Result<(), LexError> {
        if self.capture.is_empty() {
            return match c {
                '&' => {
                    self.capture.push(c);
                    Ok(())
                }
                c if is_blank(c) => Ok(()),
                found => Err(LexError::UnexpectedCaptureChar { found }),
            };
        }
        if is_blank(c) {
            self.capture_done = true;
            return Ok(());
        }
        if self.capture_done {
            return Err(LexError::TrailingAfterCapture { found: c });
        }
        if self.capture.chars().count() >= self.limits.max_argument_len {
            return Err(LexError::ArgumentTooLong {
                index: self.arguments.len(),
                limit: self.limits.max_argument_len,
            });
        }
        self.capture.push(c);
        Ok(())
    }

    fn end_argument(&mut self) -> Result<(), LexError> {
        if self.arguments.len() >= self.limits.max_arguments {
            return Err(LexError::TooManyArguments {
                limit: self.limits.max_arguments,
            });
        }
        self.arguments.push(std::mem::take(&mut self.current));
        Ok(())
    }

    fn finish(mut self) -> Result<Option<Tokens>, LexError> {
        match self.stage {
            Stage::Command => {}
            Stage::Arguments => {
                if !self.current.is_empty() {
                    self.end_argument()?;
                } else if !self.arguments.is_empty() {
                    // "line a, b," leaves a dangling separator
                    return Err(LexError::EmptyArgument {
                        index: self.arguments.len(),
                    });
                }
            }
            Stage::CaptureVariable => {
                if self.capture.len() <= 1 {
                    return Err(LexError::MissingCaptureName);
                }
                self.current = std::mem::take(&mut self.capture);
                self.end_argument()?;
            }
        }

        if self.command.is_empty() {
            return Ok(None);
        }
        Ok(Some(Tokens {
            command: self.command,
            arguments: self.arguments,
        }))
    }
}

/// Tokenize one line (without its terminator).
///
/// Returns `None` for lines with nothing to execute: empty, blank or
/// comment-only.
pub fn tokenize(line: &str, limits: Limits) -> Result<Option<Tokens>, LexError> {
    Tokenizer::new(line, limits).run()
}
