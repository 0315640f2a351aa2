//! Habits and their weekly schedules
//!
//! Habits are keyed by a unique name. A habit is "active" on the weekdays in
//! its schedule and "scheduled" on every other day.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc, Weekday};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn day_name(day: Weekday) -> &'static str {
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

/// A set of weekdays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DaySet(u8);

impl DaySet {
    /// The empty set
    pub fn empty() -> Self {
        Self(0)
    }

    /// Every day of the week
    pub fn every_day() -> Self {
        Self(0x7f)
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    pub fn with(mut self, day: Weekday) -> Self {
        self.insert(day);
        self
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Raw bitmask, Monday in the lowest bit
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Rebuild from a raw bitmask, ignoring unused bits
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0x7f)
    }

    /// Days in the set, Monday first
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEK.into_iter().filter(|d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = DaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(day_name).collect();
        f.write_str(&names.join(","))
    }
}

/// Parses comma-separated day names ("Monday,Friday"); English names or
/// three-letter abbreviations, case-insensitive.
impl FromStr for DaySet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|part| {
                Weekday::from_str(part)
                    .map_err(|_| Error::InvalidInput(format!("unknown weekday '{}'", part)))
            })
            .collect()
    }
}

impl Serialize for DaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(day_name))
    }
}

impl<'de> Deserialize<'de> for DaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names
            .join(",")
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// A tracked habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// 0 is the most important
    pub priority: u8,
    pub days: DaySet,
    /// Completed since the last rollover
    pub completed: bool,
}

impl Habit {
    /// Whether the habit is on today's schedule
    pub fn is_active_on(&self, day: Weekday) -> bool {
        self.days.contains(day)
    }
}

/// Caller-supplied habit fields for add and edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitSpec {
    pub name: String,
    pub priority: u8,
    pub days: DaySet,
}

impl HabitSpec {
    pub fn new(name: impl Into<String>, priority: u8, days: DaySet) -> Self {
        Self {
            name: name.into(),
            priority,
            days,
        }
    }

    /// Check the fields against the priority scale
    pub fn validate(&self, max_priority: u8) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("habit name must not be empty".into()));
        }
        if self.priority > max_priority {
            return Err(Error::InvalidInput(format!(
                "priority {} is outside 0..={}",
                self.priority, max_priority
            )));
        }
        if self.days.is_empty() {
            return Err(Error::InvalidInput(
                "a habit needs at least one day of the week".into(),
            ));
        }
        Ok(())
    }
}

/// All habits keyed by name, in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitBook {
    habits: IndexMap<String, Habit>,
}

impl HabitBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Habit> {
        self.habits.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Habit> {
        self.habits.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habit> {
        self.habits.values()
    }

    /// Insert a loaded habit as-is, replacing one with the same name
    pub fn restore(&mut self, habit: Habit) {
        self.habits.insert(habit.name.clone(), habit);
    }

    /// Add a new habit
    pub fn add(&mut self, spec: HabitSpec, now: DateTime<Utc>, max_priority: u8) -> Result<()> {
        spec.validate(max_priority)?;
        if self.habits.contains_key(&spec.name) {
            return Err(Error::DuplicateName(spec.name));
        }
        self.habits.insert(
            spec.name.clone(),
            Habit {
                name: spec.name,
                created_at: now,
                priority: spec.priority,
                days: spec.days,
                completed: false,
            },
        );
        Ok(())
    }

    /// Rename, reprioritize or reschedule an existing habit
    ///
    /// Creation time, completion state and position are kept.
    pub fn edit(&mut self, existing: &str, spec: HabitSpec, max_priority: u8) -> Result<()> {
        spec.validate(max_priority)?;
        let index = self
            .habits
            .get_index_of(existing)
            .ok_or_else(|| Error::NotFound(format!("habit '{}'", existing)))?;
        if spec.name != existing && self.habits.contains_key(&spec.name) {
            return Err(Error::DuplicateName(spec.name));
        }

        let (_, mut habit) = self
            .habits
            .shift_remove_index(index)
            .ok_or_else(|| Error::NotFound(format!("habit '{}'", existing)))?;
        habit.name = spec.name.clone();
        habit.priority = spec.priority;
        habit.days = spec.days;
        let (end, _) = self.habits.insert_full(spec.name, habit);
        self.habits.move_index(end, index);
        Ok(())
    }

    /// Remove a habit
    pub fn delete(&mut self, name: &str) -> Result<Habit> {
        self.habits
            .shift_remove(name)
            .ok_or_else(|| Error::NotFound(format!("habit '{}'", name)))
    }

    /// Habits active on `day`, then the rest
    pub fn partition(&self, day: Weekday) -> (Vec<&Habit>, Vec<&Habit>) {
        self.habits.values().partition(|h| h.is_active_on(day))
    }

    /// Clear every completion flag
    pub fn reset_daily(&mut self) {
        for habit in self.habits.values_mut() {
            habit.completed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap()
    }

    fn weekdays() -> DaySet {
        "Monday,Tuesday,Wednesday,Thursday,Friday".parse().unwrap()
    }

    #[test]
    fn test_day_set_parse_and_display() {
        let days: DaySet = "Monday, friday,Sun".parse().unwrap();
        assert!(days.contains(Weekday::Mon));
        assert!(days.contains(Weekday::Fri));
        assert!(days.contains(Weekday::Sun));
        assert!(!days.contains(Weekday::Tue));
        assert_eq!(days.to_string(), "Monday,Friday,Sunday");
        assert_eq!(DaySet::from_bits(days.bits()), days);

        assert!("Moonday".parse::<DaySet>().is_err());
        assert!("".parse::<DaySet>().unwrap().is_empty());

        let weekend: DaySet = [Weekday::Sun, Weekday::Sat, Weekday::Sun].into_iter().collect();
        assert_eq!(weekend.to_string(), "Saturday,Sunday");
    }

    #[test]
    fn test_add_duplicate() {
        let mut book = HabitBook::new();
        book.add(HabitSpec::new("Read", 1, weekdays()), now(), 5).unwrap();

        let err = book
            .add(HabitSpec::new("Read", 2, DaySet::every_day()), now(), 5)
            .unwrap_err();
        assert_eq!(err, Error::DuplicateName("Read".into()));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_add_rejects_bad_fields() {
        let mut book = HabitBook::new();
        let cases = [
            HabitSpec::new("  ", 1, weekdays()),
            HabitSpec::new("Run", 6, weekdays()),
            HabitSpec::new("Run", 1, DaySet::empty()),
        ];
        for spec in cases {
            assert!(matches!(
                book.add(spec, now(), 5),
                Err(Error::InvalidInput(_))
            ));
        }
        assert!(book.is_empty());
    }

    #[test]
    fn test_edit_rename_keeps_position() {
        let mut book = HabitBook::new();
        book.add(HabitSpec::new("Read", 1, weekdays()), now(), 5).unwrap();
        book.add(HabitSpec::new("Run", 2, weekdays()), now(), 5).unwrap();
        book.add(HabitSpec::new("Stretch", 3, weekdays()), now(), 5).unwrap();
        book.get_mut("Run").unwrap().completed = true;

        book.edit("Run", HabitSpec::new("Jog", 0, DaySet::every_day()), 5)
            .unwrap();

        let names: Vec<&str> = book.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Read", "Jog", "Stretch"]);
        let jog = book.get("Jog").unwrap();
        assert_eq!(jog.priority, 0);
        assert!(jog.completed);
        assert!(book.get("Run").is_none());
    }

    #[test]
    fn test_edit_errors() {
        let mut book = HabitBook::new();
        book.add(HabitSpec::new("Read", 1, weekdays()), now(), 5).unwrap();
        book.add(HabitSpec::new("Run", 2, weekdays()), now(), 5).unwrap();

        let err = book
            .edit("Swim", HabitSpec::new("Dive", 1, weekdays()), 5)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = book
            .edit("Run", HabitSpec::new("Read", 1, weekdays()), 5)
            .unwrap_err();
        assert_eq!(err, Error::DuplicateName("Read".into()));

        // keeping the same name is not a collision
        book.edit("Run", HabitSpec::new("Run", 4, weekdays()), 5)
            .unwrap();
        assert_eq!(book.get("Run").unwrap().priority, 4);
    }

    #[test]
    fn test_delete() {
        let mut book = HabitBook::new();
        book.add(HabitSpec::new("Read", 1, weekdays()), now(), 5).unwrap();

        assert_eq!(book.delete("Read").unwrap().name, "Read");
        assert!(matches!(book.delete("Read"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_partition_and_reset() {
        let mut book = HabitBook::new();
        book.add(HabitSpec::new("Read", 1, weekdays()), now(), 5).unwrap();
        book.add(
            HabitSpec::new("Hike", 2, DaySet::empty().with(Weekday::Sat)),
            now(),
            5,
        )
        .unwrap();
        book.get_mut("Read").unwrap().completed = true;

        let (active, scheduled) = book.partition(Weekday::Mon);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Read");
        assert_eq!(scheduled[0].name, "Hike");

        book.reset_daily();
        assert!(book.iter().all(|h| !h.completed));
    }
}
