//! Packed FAT date/time stamps.
//!
//! Date word: bits 9-15 year since 1980, bits 5-8 month, bits 0-4 day.
//! Time word: bits 11-15 hour, bits 5-10 minute, bits 0-4 seconds / 2.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use std::fmt;

pub const MDTM_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FatDateTime {
    pub date: u16,
    pub time: u16,
}

impl FatDateTime {
    /// 1980-01-01 00:00:00, the smallest representable stamp.
    pub const EPOCH: FatDateTime = FatDateTime {
        date: (1 << 5) | 1,
        time: 0,
    };
    /// 2107-12-31 23:59:58, the largest representable stamp.
    pub const MAX: FatDateTime = FatDateTime {
        date: (127 << 9) | (12 << 5) | 31,
        time: (23 << 11) | (59 << 5) | 29,
    };

    pub fn new(date: u16, time: u16) -> Self {
        Self { date, time }
    }

    pub fn from_parts(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Option<Self> {
        if !(1980..=2107).contains(&year)
            || !(1..=12).contains(&month)
            || !(1..=31).contains(&day)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return None;
        }
        let date = ((year - 1980) << 9) | ((month as u16) << 5) | day as u16;
        let time = ((hour as u16) << 11) | ((minute as u16) << 5) | (second as u16 >> 1);
        Some(Self { date, time })
    }

    /// Seconds are truncated to even values; out of range years clamp.
    pub fn from_naive(dt: &NaiveDateTime) -> Self {
        if dt.year() < 1980 {
            return Self::EPOCH;
        }
        if dt.year() > 2107 {
            return Self::MAX;
        }
        Self::from_parts(
            dt.year() as u16,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second().min(59) as u8,
        )
        .unwrap_or(Self::EPOCH)
    }

    pub fn year(&self) -> u16 {
        ((self.date & 0xFE00) >> 9) + 1980
    }

    pub fn month(&self) -> u8 {
        ((self.date & 0x01E0) >> 5) as u8
    }

    pub fn day(&self) -> u8 {
        (self.date & 0x001F) as u8
    }

    pub fn hour(&self) -> u8 {
        ((self.time & 0xF800) >> 11) as u8
    }

    pub fn minute(&self) -> u8 {
        ((self.time & 0x07E0) >> 5) as u8
    }

    pub fn second(&self) -> u8 {
        ((self.time & 0x001F) << 1) as u8
    }

    /// `None` when the packed fields do not name a real calendar instant.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year() as i32, self.month() as u32, self.day() as u32)?
            .and_hms_opt(self.hour() as u32, self.minute() as u32, self.second() as u32)
    }
}

/// Renders `YYYYMMDDHHMMSS` straight from the packed fields.
impl fmt::Display for FatDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}{:02}{:02}{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

pub fn parse_mdtm_timestamp(digits: &str) -> Option<NaiveDateTime> {
    if digits.len() != 14 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(digits, MDTM_FORMAT).ok()
}
