//! Line patterns for the log sinks.
//!
//! A pattern is compiled once at configuration time into a list of segments
//! and then rendered for every event. The conversion syntax is the familiar
//! log4j subset:
//!
//! | token      | output                                   |
//! |------------|------------------------------------------|
//! | `%c`       | logger name                              |
//! | `%d{fmt}`  | local time, `fmt` in `SimpleDateFormat`  |
//! | `%l`       | location, `target(file:line)`            |
//! | `%p`       | level, `%-5p` pads to five columns       |
//! | `%m`       | message followed by any extra fields     |
//! | `%t`       | thread name                              |
//! | `%n`       | newline                                  |
//! | `%%`       | a literal `%`                            |
//!
//! Padding widths are capped at [`MAX_WIDTH`]. In dates, any run of `S`
//! renders three millisecond digits.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Local};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::constants::DEFAULT_DATE_FORMAT;
use crate::error::{RcsError, RcsResult};

/// Name of the event field that overrides the recorded call site.
pub const CALLER_FIELD: &str = "caller";

/// Widest padding a conversion may request.
pub const MAX_WIDTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Logger,
    /// chrono `strftime` string.
    Date(String),
    Location,
    Level { width: usize, left_align: bool },
    Message,
    Thread,
    Newline,
}

/// A compiled line pattern bound to a logger name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePattern {
    logger_name: String,
    source: String,
    segments: Vec<Segment>,
}

/// Everything a pattern needs to render one line.
#[derive(Debug, Clone)]
pub struct LineRecord<'a> {
    pub level: Level,
    pub target: &'a str,
    pub file: Option<&'a str>,
    pub line: Option<u32>,
    pub message: &'a str,
}

impl LinePattern {
    /// Compile `pattern` for the logger called `logger_name`.
    pub fn compile(logger_name: impl Into<String>, pattern: &str) -> RcsResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            let left_align = chars.next_if_eq(&'-').is_some();
            let mut width = 0usize;
            while let Some(d) = chars.next_if(|c| c.is_ascii_digit()) {
                width = width
                    .checked_mul(10)
                    .and_then(|w| w.checked_add(d.to_digit(10).unwrap_or(0) as usize))
                    .filter(|w| *w <= MAX_WIDTH)
                    .ok_or_else(|| {
                        RcsError::new(format!("pattern '{pattern}' has an invalid width"))
                    })?;
            }

            let conversion = chars.next().ok_or_else(|| {
                RcsError::new(format!("pattern '{pattern}' ends with a dangling '%'"))
            })?;

            if conversion == '%' {
                literal.push('%');
                continue;
            }

            let segment = match conversion {
                'c' => Segment::Logger,
                'l' => Segment::Location,
                'p' => Segment::Level { width, left_align },
                'm' => Segment::Message,
                't' => Segment::Thread,
                'n' => Segment::Newline,
                'd' => {
                    let format = if chars.next_if_eq(&'{').is_some() {
                        let mut format = String::new();
                        loop {
                            match chars.next() {
                                Some('}') => break,
                                Some(c) => format.push(c),
                                None => {
                                    return Err(RcsError::new(format!(
                                        "pattern '{pattern}' has an unterminated date format"
                                    )))
                                }
                            }
                        }
                        format
                    } else {
                        DEFAULT_DATE_FORMAT.to_string()
                    };
                    Segment::Date(java_date_to_strftime(&format)?)
                }
                other => {
                    return Err(RcsError::new(format!(
                        "pattern '{pattern}' uses unknown conversion '%{other}'"
                    )))
                }
            };

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(segment);
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            logger_name: logger_name.into(),
            source: pattern.to_string(),
            segments,
        })
    }

    /// The pattern text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The logger name rendered by `%c`.
    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    /// Render one line into `out`.
    pub fn render<W: fmt::Write>(
        &self,
        out: &mut W,
        record: &LineRecord<'_>,
        now: &DateTime<Local>,
    ) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.write_str(text)?,
                Segment::Logger => out.write_str(&self.logger_name)?,
                Segment::Date(format) => write!(out, "{}", now.format(format))?,
                Segment::Location => {
                    write!(out, "{}(", record.target)?;
                    match (record.file, record.line) {
                        (Some(file), Some(line)) => write!(out, "{file}:{line}")?,
                        (Some(file), None) => out.write_str(file)?,
                        _ => out.write_str("unknown")?,
                    }
                    out.write_char(')')?;
                }
                Segment::Level { width, left_align } => {
                    let level = record.level.as_str();
                    if *left_align {
                        write!(out, "{level:<width$}", width = *width)?;
                    } else {
                        write!(out, "{level:>width$}", width = *width)?;
                    }
                }
                Segment::Message => out.write_str(record.message)?,
                Segment::Thread => {
                    out.write_str(std::thread::current().name().unwrap_or("unnamed"))?
                }
                Segment::Newline => out.write_char('\n')?,
            }
        }
        Ok(())
    }
}

impl<S, N> FormatEvent<S, N> for LinePattern
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let mut fields = EventFields::default();
        event.record(&mut fields);

        let (file, line) = match fields.caller.as_deref().and_then(split_caller) {
            Some((file, line)) => (Some(file), Some(line)),
            None => (meta.file(), meta.line()),
        };

        let message = fields.message + &fields.extra;
        let record = LineRecord {
            level: *meta.level(),
            target: meta.target(),
            file,
            line,
            message: &message,
        };
        self.render(&mut writer, &record, &Local::now())
    }
}

/// Collects the message and any structured fields of an event.
#[derive(Default)]
struct EventFields {
    message: String,
    extra: String,
    caller: Option<String>,
}

impl EventFields {
    fn push_extra(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        let _ = write!(self.extra, " {}={}", field.name(), value);
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            CALLER_FIELD => self.caller = Some(value.to_string()),
            _ => self.push_extra(field, format_args!("{value}")),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => {
                let _ = write!(self.message, "{value:?}");
            }
            CALLER_FIELD => self.caller = Some(format!("{value:?}")),
            _ => self.push_extra(field, format_args!("{value:?}")),
        }
    }
}

fn split_caller(caller: &str) -> Option<(&str, u32)> {
    let (file, line) = caller.rsplit_once(':')?;
    Some((file, line.parse().ok()?))
}

/// Translate a `SimpleDateFormat` pattern into a chrono format string.
pub fn java_date_to_strftime(format: &str) -> RcsResult<String> {
    let mut out = String::new();
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            // Quoted literal; '' is an escaped quote.
            if chars.next_if_eq(&'\'').is_some() {
                out.push('\'');
                continue;
            }
            loop {
                match chars.next() {
                    Some('\'') if chars.next_if_eq(&'\'').is_some() => out.push('\''),
                    Some('\'') | None => break,
                    Some('%') => out.push_str("%%"),
                    Some(c) => out.push(c),
                }
            }
            continue;
        }

        if !c.is_ascii_alphabetic() {
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
            continue;
        }

        let mut run = 1;
        while chars.next_if_eq(&c).is_some() {
            run += 1;
        }

        let spec = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            // chrono only has fixed-width fractions, so `S` and `SS` also give three digits.
            ('S', _) => "%3f",
            ('a', _) => "%p",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('Z', _) => "%z",
            (other, _) => {
                return Err(RcsError::new(format!(
                    "date format '{format}' uses unsupported letter '{other}'"
                )))
            }
        };
        out.push_str(spec);
    }

    Ok(out)
}
