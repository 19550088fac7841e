use crate::modules::auth::application::domain::entities::Guest;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// Templates are resolved at send time, not enqueue time. An unknown
/// template name sits in the queue and fails per attempt like any other
/// delivery error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    RsvpReminder,
    RsvpConfirmation,
}

impl EmailTemplate {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "rsvp_reminder" => Some(Self::RsvpReminder),
            "rsvp_confirmation" => Some(Self::RsvpConfirmation),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::RsvpReminder => "rsvp_reminder",
            Self::RsvpConfirmation => "rsvp_confirmation",
        }
    }

    pub fn render(&self, guest: &Guest) -> RenderedEmail {
        let first_name = guest.first_name();
        match self {
            Self::RsvpReminder => RenderedEmail {
                subject: "A little reminder about our wedding".to_string(),
                body: format!(
                    "Hi {first_name},\n\n\
                     We noticed you haven't responded to our wedding invitation yet. \
                     We would love to know whether you can join us!\n\n\
                     You can RSVP any time by scanning the QR code on your invitation.\n\n\
                     Warmly,\nThe happy couple"
                ),
            },
            Self::RsvpConfirmation => RenderedEmail {
                subject: "We received your RSVP!".to_string(),
                body: format!(
                    "Hi {first_name},\n\n\
                     Thank you for responding to our wedding invitation. \
                     Your RSVP has been recorded.\n\n\
                     If anything changes, you can edit your response on the website \
                     using the QR code on your invitation.\n\n\
                     Warmly,\nThe happy couple"
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn guest(full_name: &str) -> Guest {
        Guest {
            id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            full_name: full_name.to_string(),
            is_invited: true,
            has_rsvped: false,
            is_admin: false,
            qr_token: "tok".to_string(),
            qr_alias: None,
            household_members: vec![],
            address_line: None,
            city: None,
            postal_code: None,
            country: None,
            personal_note: None,
            rsvp_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn lookup_knows_both_templates() {
        assert_eq!(
            EmailTemplate::lookup("rsvp_reminder"),
            Some(EmailTemplate::RsvpReminder)
        );
        assert_eq!(
            EmailTemplate::lookup("rsvp_confirmation"),
            Some(EmailTemplate::RsvpConfirmation)
        );
        assert_eq!(EmailTemplate::lookup("welcome"), None);
    }

    #[test]
    fn reminder_addresses_guest_by_first_name() {
        let rendered = EmailTemplate::RsvpReminder.render(&guest("Jane Doe"));
        assert!(rendered.body.starts_with("Hi Jane,"));
        assert!(rendered.subject.contains("reminder"));
    }

    #[test]
    fn confirmation_mentions_the_recorded_rsvp() {
        let rendered = EmailTemplate::RsvpConfirmation.render(&guest("Sam Smith"));
        assert!(rendered.body.starts_with("Hi Sam,"));
        assert!(rendered.body.contains("RSVP has been recorded"));
    }
}
