// libs/appointment-cell/src/services/availability.rs
use chrono::{Datelike, Local, NaiveDate, NaiveTime, Timelike, Weekday};
use tracing::debug;

use crate::models::{
    hhmm, BookingError, DaySchedule, SlotRequest, WeeklyAvailability, SLOT_DURATION_MINUTES,
};

/// Furthest ahead a date picker is offered dates.
pub const MAX_BOOKING_HORIZON_DAYS: usize = 366;

/// English name of a weekday, as stored in `availableDays`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Whether the provider works on the weekday `date` falls on.
pub fn is_open_on(availability: &WeeklyAvailability, date: NaiveDate) -> bool {
    let name = weekday_name(date.weekday());
    availability.available_days.iter().any(|day| day == name)
}

/// Start times of the slots that fit inside a daily window.
///
/// Cloning restarts the sequence from the first slot.
#[derive(Debug, Clone)]
pub struct Slots {
    next_minute: u32,
    end_minute: u32,
}

impl Iterator for Slots {
    type Item = NaiveTime;

    fn next(&mut self) -> Option<NaiveTime> {
        if self.next_minute + SLOT_DURATION_MINUTES > self.end_minute {
            return None;
        }
        let start = NaiveTime::from_num_seconds_from_midnight_opt(self.next_minute * 60, 0)?;
        self.next_minute += SLOT_DURATION_MINUTES;
        Some(start)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end_minute.saturating_sub(self.next_minute) / SLOT_DURATION_MINUTES;
        (remaining as usize, Some(remaining as usize))
    }
}

impl ExactSizeIterator for Slots {}

fn minute_of_day(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

/// Enumerates the 30-minute slots of the provider's daily window.
///
/// A trailing remainder shorter than one slot is dropped.
pub fn enumerate_slots(availability: &WeeklyAvailability) -> Result<Slots, BookingError> {
    let window = &availability.daily_window;
    if !window.is_chronological() {
        return Err(BookingError::InvalidAvailability(format!(
            "start time {} is not before end time {}",
            window.start.format(hhmm::FORMAT),
            window.end.format(hhmm::FORMAT)
        )));
    }

    Ok(Slots {
        next_minute: minute_of_day(window.start),
        end_minute: minute_of_day(window.end),
    })
}

/// Checks a requested slot against the availability, using the viewer's
/// local calendar for "today".
pub fn validate(
    availability: &WeeklyAvailability,
    date: NaiveDate,
    slot_start: NaiveTime,
) -> Result<SlotRequest, BookingError> {
    validate_on(availability, date, slot_start, Local::now().date_naive())
}

pub fn validate_on(
    availability: &WeeklyAvailability,
    date: NaiveDate,
    slot_start: NaiveTime,
    today: NaiveDate,
) -> Result<SlotRequest, BookingError> {
    let mut slots = enumerate_slots(availability)?;

    if date < today || !is_open_on(availability, date) {
        return Err(BookingError::DateNotAvailable(date));
    }

    if !slots.any(|slot| slot == slot_start) {
        return Err(BookingError::SlotNotOffered(
            slot_start.format(hhmm::FORMAT).to_string(),
        ));
    }

    Ok(SlotRequest::new(date, slot_start))
}

/// Open dates within `days` calendar days starting at `from`, for
/// pre-filtering a date picker. The horizon never exceeds
/// `MAX_BOOKING_HORIZON_DAYS`.
pub fn bookable_dates(
    availability: &WeeklyAvailability,
    from: NaiveDate,
    days: usize,
) -> Vec<NaiveDate> {
    from.iter_days()
        .take(days.min(MAX_BOOKING_HORIZON_DAYS))
        .filter(|date| is_open_on(availability, *date))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct AvailabilityService;

impl AvailabilityService {
    pub fn new() -> Self {
        Self
    }

    /// Open/closed status and slot list for a single date. Dates before
    /// `today` are closed.
    pub fn day_schedule(
        &self,
        availability: &WeeklyAvailability,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<DaySchedule, BookingError> {
        let slots = enumerate_slots(availability)?;
        let is_open = date >= today && is_open_on(availability, date);

        let slots: Vec<String> = if is_open {
            slots.map(|slot| slot.format(hhmm::FORMAT).to_string()).collect()
        } else {
            Vec::new()
        };

        debug!("Schedule for {}: open={}, {} slots", date, is_open, slots.len());

        Ok(DaySchedule {
            date,
            is_open,
            slots,
        })
    }

    pub fn bookable_dates(
        &self,
        availability: &WeeklyAvailability,
        from: NaiveDate,
        days: usize,
    ) -> Result<Vec<NaiveDate>, BookingError> {
        // A provider with a broken window has no bookable dates at all.
        enumerate_slots(availability)?;
        let dates = bookable_dates(availability, from, days);
        debug!("Found {} bookable dates in {} days from {}", dates.len(), days, from);
        Ok(dates)
    }

    pub fn validate(
        &self,
        availability: &WeeklyAvailability,
        date: NaiveDate,
        slot_start: NaiveTime,
        today: NaiveDate,
    ) -> Result<SlotRequest, BookingError> {
        debug!("Validating slot {} on {}", slot_start.format(hhmm::FORMAT), date);
        validate_on(availability, date, slot_start, today)
    }
}
