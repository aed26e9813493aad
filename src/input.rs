//! Manual time entry: parsing, range checks and the three-field editor.

use thiserror::Error;

use crate::timing::ClockTime;

/// Why a manually entered time was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeInputError {
    #[error("cannot read time '{input}': expected time in HH:MM:SS format")]
    Malformed { input: String },

    #[error("{hour:02}:{minute:02}:{second:02} is not a valid time, check the specified time")]
    OutOfRange { hour: u32, minute: u32, second: u32 },
}

impl TimeInputError {
    /// Short message for the notification line.
    pub fn user_message(&self) -> &'static str {
        match self {
            TimeInputError::Malformed { .. } => "Wrong format, expected HH:MM:SS",
            TimeInputError::OutOfRange { .. } => "Check the specified time",
        }
    }
}

fn parse_component(text: &str, whole: &str) -> Result<u32, TimeInputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeInputError::Malformed {
            input: whole.to_string(),
        });
    }
    // All-digit strings only fail to parse on overflow, which is out of range.
    Ok(trimmed.parse::<u32>().unwrap_or(u32::MAX))
}

/// Parses the three field contents (hour, minute, second).
pub fn parse_fields(hour: &str, minute: &str, second: &str) -> Result<ClockTime, TimeInputError> {
    let whole = format!("{}:{}:{}", hour.trim(), minute.trim(), second.trim());
    let h = parse_component(hour, &whole)?;
    let m = parse_component(minute, &whole)?;
    let s = parse_component(second, &whole)?;
    ClockTime::new(h, m, s)
}

/// Parses `HH:MM:SS`. Single-digit components are accepted.
pub fn parse_clock_time(text: &str) -> Result<ClockTime, TimeInputError> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    match parts.as_slice() {
        [h, m, s] => parse_fields(h, m, s),
        _ => Err(TimeInputError::Malformed {
            input: text.trim().to_string(),
        }),
    }
}

// ============================================================================
// FIELD EDITOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Hour,
    Minute,
    Second,
}

impl TimeField {
    pub const ALL: [TimeField; 3] = [TimeField::Hour, TimeField::Minute, TimeField::Second];

    pub fn next(self) -> Self {
        match self {
            TimeField::Hour => TimeField::Minute,
            TimeField::Minute => TimeField::Second,
            TimeField::Second => TimeField::Hour,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeField::Hour => "HH",
            TimeField::Minute => "MM",
            TimeField::Second => "SS",
        }
    }
}

/// Text contents of the hour/minute/second fields.
#[derive(Debug, Clone, Default)]
pub struct TimeEntry {
    fields: [String; 3],
    focus: Option<TimeField>,
}

const FIELD_MAX_CHARS: usize = 2;

impl TimeEntry {
    pub fn prefilled(time: ClockTime) -> Self {
        Self {
            fields: [
                format!("{:02}", time.hour),
                format!("{:02}", time.minute),
                format!("{:02}", time.second),
            ],
            focus: None,
        }
    }

    fn index(field: TimeField) -> usize {
        match field {
            TimeField::Hour => 0,
            TimeField::Minute => 1,
            TimeField::Second => 2,
        }
    }

    pub fn text(&self, field: TimeField) -> &str {
        &self.fields[Self::index(field)]
    }

    pub fn focus(&self) -> Option<TimeField> {
        self.focus
    }

    pub fn set_focus(&mut self, field: Option<TimeField>) {
        self.focus = field;
    }

    pub fn focus_next(&mut self) {
        self.focus = Some(self.focus.map_or(TimeField::Hour, TimeField::next));
    }

    /// Appends typed text to the focused field. Anything is accepted here so
    /// that malformed input reaches validation and gets reported.
    pub fn insert(&mut self, text: &str) {
        let Some(field) = self.focus else {
            return;
        };
        let buf = &mut self.fields[Self::index(field)];
        for c in text.chars().filter(|c| !c.is_control()) {
            if buf.chars().count() >= FIELD_MAX_CHARS {
                break;
            }
            buf.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focus {
            self.fields[Self::index(field)].pop();
        }
    }

    pub fn submit(&self) -> Result<ClockTime, TimeInputError> {
        parse_fields(&self.fields[0], &self.fields[1], &self.fields[2])
    }
}
