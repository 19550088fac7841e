use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::shared::sanitize::{sanitize_optional, sanitize_text};

/// Meal choices a guest may pick from. Matching is case-insensitive;
/// values are stored lowercase.
pub const MEAL_PREFERENCES: [&str; 7] = [
    "chicken",
    "beef",
    "fish",
    "vegetarian",
    "vegan",
    "kids",
    "other",
];

pub const MAX_ALLERGY_LEN: usize = 500;
pub const MAX_NOTES_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attendance {
    Yes,
    No,
    Maybe,
}

impl Attendance {
    /// Case-insensitive parse; stored form is always uppercase.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_uppercase().as_str() {
            "YES" => Some(Self::Yes),
            "NO" => Some(Self::No),
            "MAYBE" => Some(Self::Maybe),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Maybe => "MAYBE",
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One member of the attending party. Serialized into the RSVP's JSON
/// guests column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpGuest {
    pub full_name: String,
    pub meal_preference: String,
    #[serde(default)]
    pub allergies: Option<String>,
}

/// A stored RSVP.
#[derive(Debug, Clone, PartialEq)]
pub struct Rsvp {
    pub id: Uuid,
    pub user_id: Uuid,
    pub attendance: Attendance,
    pub guest_count: i32,
    pub guests: Vec<RsvpGuest>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw submission as it arrives from the client, before validation.
#[derive(Debug, Clone, Default)]
pub struct RsvpDraft {
    pub attending: String,
    pub guest_count: Option<i32>,
    pub guests: Vec<RsvpGuestDraft>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RsvpGuestDraft {
    pub full_name: String,
    pub meal_preference: String,
    pub allergies: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RsvpValidationError {
    #[error("Invalid attendance value: {0}")]
    InvalidAttendance(String),
    #[error("Guest #{0} is missing a name")]
    MissingGuestName(usize),
    #[error("Guest #{index} has an invalid meal preference: {value}")]
    InvalidMealPreference { index: usize, value: String },
    #[error("Guest list exceeds declared guest count ({declared} declared, {submitted} submitted)")]
    TooManyGuests { declared: i32, submitted: usize },
    #[error("Guest count cannot be negative")]
    NegativeGuestCount,
}

/// A submission that passed the attendance-dependent rules.
///
/// Fields are private: the only way to obtain one is [`RsvpSubmission::new`],
/// so repositories never see unvalidated data.
#[derive(Debug, Clone, PartialEq)]
pub struct RsvpSubmission {
    attendance: Attendance,
    guest_count: i32,
    guests: Vec<RsvpGuest>,
    notes: Option<String>,
}

impl RsvpSubmission {
    pub fn new(draft: RsvpDraft) -> Result<Self, RsvpValidationError> {
        let attendance = Attendance::parse(&draft.attending)
            .ok_or_else(|| RsvpValidationError::InvalidAttendance(draft.attending.clone()))?;

        let notes = sanitize_optional(draft.notes.as_deref(), MAX_NOTES_LEN);

        // A declining party has no guests, whatever was submitted.
        if attendance == Attendance::No {
            return Ok(Self {
                attendance,
                guest_count: 0,
                guests: vec![],
                notes,
            });
        }

        let guest_count = draft
            .guest_count
            .unwrap_or(draft.guests.len() as i32);
        if guest_count < 0 {
            return Err(RsvpValidationError::NegativeGuestCount);
        }

        if draft.guests.len() > (guest_count as usize) + 1 {
            return Err(RsvpValidationError::TooManyGuests {
                declared: guest_count,
                submitted: draft.guests.len(),
            });
        }

        let mut guests = Vec::with_capacity(draft.guests.len());
        for (i, guest) in draft.guests.into_iter().enumerate() {
            let full_name = guest.full_name.trim().to_string();
            if full_name.is_empty() {
                return Err(RsvpValidationError::MissingGuestName(i + 1));
            }

            let meal_preference = guest.meal_preference.trim().to_lowercase();
            if !MEAL_PREFERENCES.contains(&meal_preference.as_str()) {
                return Err(RsvpValidationError::InvalidMealPreference {
                    index: i + 1,
                    value: guest.meal_preference,
                });
            }

            guests.push(RsvpGuest {
                full_name: sanitize_text(&full_name, 200),
                meal_preference,
                allergies: sanitize_optional(guest.allergies.as_deref(), MAX_ALLERGY_LEN),
            });
        }

        Ok(Self {
            attendance,
            guest_count,
            guests,
            notes,
        })
    }

    pub fn attendance(&self) -> Attendance {
        self.attendance
    }

    pub fn guest_count(&self) -> i32 {
        self.guest_count
    }

    pub fn guests(&self) -> &[RsvpGuest] {
        &self.guests
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(name: &str, meal: &str) -> RsvpGuestDraft {
        RsvpGuestDraft {
            full_name: name.to_string(),
            meal_preference: meal.to_string(),
            allergies: None,
        }
    }

    #[test]
    fn attendance_parse_is_case_insensitive() {
        assert_eq!(Attendance::parse("yes"), Some(Attendance::Yes));
        assert_eq!(Attendance::parse(" No "), Some(Attendance::No));
        assert_eq!(Attendance::parse("mAyBe"), Some(Attendance::Maybe));
        assert_eq!(Attendance::parse("definitely"), None);
        assert_eq!(Attendance::parse(""), None);
    }

    #[test]
    fn attendance_stored_form_is_uppercase() {
        assert_eq!(Attendance::Yes.as_str(), "YES");
        assert_eq!(Attendance::No.as_str(), "NO");
        assert_eq!(Attendance::Maybe.as_str(), "MAYBE");
    }

    #[test]
    fn yes_with_valid_guests_passes() {
        let submission = RsvpSubmission::new(RsvpDraft {
            attending: "YES".to_string(),
            guest_count: Some(2),
            guests: vec![guest("Jane Doe", "vegetarian"), guest("Sam Doe", "Beef")],
            notes: Some("so excited!".to_string()),
        })
        .unwrap();

        assert_eq!(submission.attendance(), Attendance::Yes);
        assert_eq!(submission.guest_count(), 2);
        assert_eq!(submission.guests().len(), 2);
        // meal preferences normalize to lowercase
        assert_eq!(submission.guests()[1].meal_preference, "beef");
        assert_eq!(submission.notes(), Some("so excited!"));
    }

    #[test]
    fn no_forces_empty_guest_list_and_zero_count() {
        let submission = RsvpSubmission::new(RsvpDraft {
            attending: "no".to_string(),
            guest_count: Some(4),
            guests: vec![guest("Jane Doe", "vegetarian")],
            notes: None,
        })
        .unwrap();

        assert_eq!(submission.attendance(), Attendance::No);
        assert_eq!(submission.guest_count(), 0);
        assert!(submission.guests().is_empty());
    }

    #[test]
    fn invalid_attendance_rejected() {
        let result = RsvpSubmission::new(RsvpDraft {
            attending: "PROBABLY".to_string(),
            ..Default::default()
        });
        assert_eq!(
            result.unwrap_err(),
            RsvpValidationError::InvalidAttendance("PROBABLY".to_string())
        );
    }

    #[test]
    fn missing_guest_name_rejected() {
        let result = RsvpSubmission::new(RsvpDraft {
            attending: "YES".to_string(),
            guest_count: Some(1),
            guests: vec![guest("   ", "beef")],
            notes: None,
        });
        assert_eq!(result.unwrap_err(), RsvpValidationError::MissingGuestName(1));
    }

    #[test]
    fn meal_preference_outside_vocabulary_rejected() {
        let result = RsvpSubmission::new(RsvpDraft {
            attending: "YES".to_string(),
            guest_count: Some(1),
            guests: vec![guest("Jane Doe", "steak tartare")],
            notes: None,
        });
        assert_eq!(
            result.unwrap_err(),
            RsvpValidationError::InvalidMealPreference {
                index: 1,
                value: "steak tartare".to_string()
            }
        );
    }

    #[test]
    fn every_vocabulary_entry_is_accepted() {
        for meal in MEAL_PREFERENCES {
            let result = RsvpSubmission::new(RsvpDraft {
                attending: "YES".to_string(),
                guest_count: Some(1),
                guests: vec![guest("Jane Doe", meal)],
                notes: None,
            });
            assert!(result.is_ok(), "meal {meal:?} should be accepted");
        }
    }

    #[test]
    fn guest_list_may_exceed_count_by_one_only() {
        let ok = RsvpSubmission::new(RsvpDraft {
            attending: "YES".to_string(),
            guest_count: Some(1),
            guests: vec![guest("A B", "beef"), guest("C D", "fish")],
            notes: None,
        });
        assert!(ok.is_ok());

        let too_many = RsvpSubmission::new(RsvpDraft {
            attending: "YES".to_string(),
            guest_count: Some(1),
            guests: vec![
                guest("A B", "beef"),
                guest("C D", "fish"),
                guest("E F", "vegan"),
            ],
            notes: None,
        });
        assert_eq!(
            too_many.unwrap_err(),
            RsvpValidationError::TooManyGuests {
                declared: 1,
                submitted: 3
            }
        );
    }

    #[test]
    fn negative_guest_count_rejected() {
        let result = RsvpSubmission::new(RsvpDraft {
            attending: "MAYBE".to_string(),
            guest_count: Some(-1),
            guests: vec![],
            notes: None,
        });
        assert_eq!(result.unwrap_err(), RsvpValidationError::NegativeGuestCount);
    }

    #[test]
    fn omitted_guest_count_defaults_to_party_size() {
        let submission = RsvpSubmission::new(RsvpDraft {
            attending: "YES".to_string(),
            guest_count: None,
            guests: vec![guest("Jane Doe", "kids"), guest("Sam Doe", "other")],
            notes: None,
        })
        .unwrap();
        assert_eq!(submission.guest_count(), 2);
    }

    #[test]
    fn maybe_guests_are_validated_like_yes() {
        let result = RsvpSubmission::new(RsvpDraft {
            attending: "MAYBE".to_string(),
            guest_count: Some(1),
            guests: vec![guest("Jane Doe", "mystery")],
            notes: None,
        });
        assert!(matches!(
            result,
            Err(RsvpValidationError::InvalidMealPreference { .. })
        ));
    }

    #[test]
    fn free_text_is_sanitized_and_capped() {
        let submission = RsvpSubmission::new(RsvpDraft {
            attending: "YES".to_string(),
            guest_count: Some(1),
            guests: vec![RsvpGuestDraft {
                full_name: "Jane Doe".to_string(),
                meal_preference: "vegan".to_string(),
                allergies: Some("<b>peanuts</b>".to_string()),
            }],
            notes: Some(format!("<script>x</script>{}", "n".repeat(2000))),
        })
        .unwrap();

        assert_eq!(submission.guests()[0].allergies.as_deref(), Some("peanuts"));
        let notes = submission.notes().unwrap();
        assert_eq!(notes.len(), MAX_NOTES_LEN);
        assert!(!notes.contains('<'));
    }
}
