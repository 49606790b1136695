//! Document information dictionary and PDF dates

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object};

/// Entries of the `/Info` dictionary that can be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InfoType {
    CreationDate,
    ModDate,
    Author,
    Creator,
    Title,
    Subject,
    Keywords,
}

impl InfoType {
    pub const ALL: [InfoType; 7] = [
        InfoType::CreationDate,
        InfoType::ModDate,
        InfoType::Author,
        InfoType::Creator,
        InfoType::Title,
        InfoType::Subject,
        InfoType::Keywords,
    ];

    pub fn key(self) -> &'static str {
        match self {
            InfoType::CreationDate => "CreationDate",
            InfoType::ModDate => "ModDate",
            InfoType::Author => "Author",
            InfoType::Creator => "Creator",
            InfoType::Title => "Title",
            InfoType::Subject => "Subject",
            InfoType::Keywords => "Keywords",
        }
    }

    pub fn is_date(self) -> bool {
        matches!(self, InfoType::CreationDate | InfoType::ModDate)
    }
}

/// Relationship of a [`PdfDate`] to universal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtcOffset {
    /// `Z`
    Utc,
    /// `+HH'mm'`
    Ahead { hours: u32, minutes: u32 },
    /// `-HH'mm'`
    Behind { hours: u32, minutes: u32 },
}

/// Calendar date and time as written in `/CreationDate` and `/ModDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// `None` writes no time zone information.
    pub offset: Option<UtcOffset>,
}

impl PdfDate {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minutes,
            seconds,
            offset: None,
        }
    }

    pub fn with_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |what: &str| Err(PdfError::InvalidDateTime(format!("{what} in {self:?}")));

        if !(0..=9999).contains(&self.year) {
            return invalid("year");
        }
        if NaiveDate::from_ymd_opt(self.year, self.month, self.day).is_none() {
            return invalid("calendar date");
        }
        if self.hour > 23 || self.minutes > 59 || self.seconds > 59 {
            return invalid("time of day");
        }
        match self.offset {
            Some(UtcOffset::Ahead { hours, minutes }) | Some(UtcOffset::Behind { hours, minutes })
                if hours > 23 || minutes > 59 =>
            {
                invalid("time zone offset")
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for PdfDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "D:{:04}{:02}{:02}{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minutes, self.seconds
        )?;
        match self.offset {
            None => Ok(()),
            Some(UtcOffset::Utc) => f.write_str("Z"),
            Some(UtcOffset::Ahead { hours, minutes }) => write!(f, "+{hours:02}'{minutes:02}'"),
            Some(UtcOffset::Behind { hours, minutes }) => write!(f, "-{hours:02}'{minutes:02}'"),
        }
    }
}

impl From<DateTime<FixedOffset>> for PdfDate {
    fn from(value: DateTime<FixedOffset>) -> Self {
        let seconds = value.offset().local_minus_utc();
        let magnitude = seconds.unsigned_abs();
        let (hours, minutes) = (magnitude / 3600, (magnitude % 3600) / 60);
        let offset = match seconds {
            0 => UtcOffset::Utc,
            s if s > 0 => UtcOffset::Ahead { hours, minutes },
            _ => UtcOffset::Behind { hours, minutes },
        };
        PdfDate {
            year: value.year(),
            month: value.month(),
            day: value.day(),
            hour: value.hour(),
            minutes: value.minute(),
            seconds: value.second(),
            offset: Some(offset),
        }
    }
}

/// Values of the `/Info` dictionary, dates stored already formatted.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DocumentInfo {
    values: BTreeMap<InfoType, String>,
}

impl DocumentInfo {
    pub fn set(&mut self, kind: InfoType, value: &str) -> Result<()> {
        if kind.is_date() {
            return Err(PdfError::InvalidParameter(format!(
                "{} takes a date value",
                kind.key()
            )));
        }
        self.values.insert(kind, value.to_string());
        Ok(())
    }

    pub fn set_date(&mut self, kind: InfoType, date: PdfDate) -> Result<()> {
        if !kind.is_date() {
            return Err(PdfError::InvalidParameter(format!(
                "{} takes a string value",
                kind.key()
            )));
        }
        date.validate()?;
        self.values.insert(kind, date.to_string());
        Ok(())
    }

    pub fn get(&self, kind: InfoType) -> Option<&str> {
        self.values.get(&kind).map(String::as_str)
    }

    /// `/Info` with the producer always present.
    pub fn to_dict(&self, producer: &str) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Producer", text_string(producer));
        for (kind, value) in &self.values {
            dict.set(kind.key(), text_string(value));
        }
        dict
    }

    /// Input to the file identifier: the info values in a fixed order.
    pub fn digest_input(&self, producer: &str) -> Vec<u8> {
        let mut data = producer.as_bytes().to_vec();
        for value in self.values.values() {
            data.extend_from_slice(value.as_bytes());
        }
        data
    }
}

/// ASCII verbatim, anything else as UTF-16BE with a byte order mark.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec());
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes)
}
