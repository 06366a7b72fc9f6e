use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points granted per recipient on a group award
pub const GROUP_AWARD_POINTS_EACH: i64 = 500;

/// Data behind an individual recognition card
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndividualAwardCard {
    /// Who gave the recognition
    #[serde(default)]
    pub sender_name: String,
    /// Pre-rendered avatar glyph, when the platform provides one
    #[serde(default)]
    pub sender_avatar: Option<String>,
    /// Who was recognized
    #[serde(default)]
    pub receiver_name: String,
    /// Badge attached to the award
    #[serde(default)]
    pub badge_name: Option<String>,
    /// Company-value tag, used when no badge is attached
    #[serde(default)]
    pub value_tag: Option<String>,
    /// Points granted
    #[serde(default)]
    pub points: i64,
    /// Message from the sender
    #[serde(default)]
    pub message: Option<String>,
    /// When the recognition was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl IndividualAwardCard {
    /// Avatar for the sender: the provided glyph, else the first
    /// letter of the name uppercased, else blank.
    pub fn avatar(&self) -> String {
        if let Some(avatar) = &self.sender_avatar {
            return avatar.clone();
        }
        self.sender_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default()
    }

    /// Badge pill label: badge name, else value tag, else the generic
    /// label.
    pub fn badge_label(&self) -> &str {
        self.badge_name
            .as_deref()
            .or(self.value_tag.as_deref())
            .unwrap_or("Individual Award")
    }

    /// Quoted message body, with the standard placeholder when empty.
    pub fn message_text(&self) -> &str {
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => message,
            _ => "No message provided",
        }
    }

    /// Relative timestamp for the card footer, "pinned" when the
    /// platform sent no timestamp.
    pub fn footer_time(&self, now: DateTime<Utc>) -> String {
        match self.created_at {
            Some(created_at) => time_ago(created_at, now),
            None => "pinned".to_string(),
        }
    }
}

/// Data behind a group award card
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupAwardCard {
    /// Recognized team members
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Award level label
    #[serde(default)]
    pub award_level: String,
    /// Shared message
    #[serde(default)]
    pub message: Option<String>,
}

impl GroupAwardCard {
    /// Total points the award grants across all recipients.
    pub fn total_points(&self) -> i64 {
        self.recipients.len() as i64 * GROUP_AWARD_POINTS_EACH
    }
}

/// Coarse relative-time label for card footers.
fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);

    if elapsed.num_seconds() < 60 {
        "just now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn card() -> IndividualAwardCard {
        IndividualAwardCard {
            sender_name: "maya chen".to_string(),
            sender_avatar: None,
            receiver_name: "Ravi Patel".to_string(),
            badge_name: None,
            value_tag: None,
            points: 250,
            message: None,
            created_at: None,
        }
    }

    #[test]
    fn test_avatar_falls_back_to_initial() {
        let mut card = card();
        assert_eq!(card.avatar(), "M");

        card.sender_avatar = Some("🦊".to_string());
        assert_eq!(card.avatar(), "🦊");

        card.sender_avatar = None;
        card.sender_name.clear();
        assert_eq!(card.avatar(), "");
    }

    #[test]
    fn test_badge_label_fallback_chain() {
        let mut card = card();
        assert_eq!(card.badge_label(), "Individual Award");

        card.value_tag = Some("Customer Obsession".to_string());
        assert_eq!(card.badge_label(), "Customer Obsession");

        card.badge_name = Some("Top Performer".to_string());
        assert_eq!(card.badge_label(), "Top Performer");
    }

    #[test]
    fn test_message_placeholder() {
        let mut card = card();
        assert_eq!(card.message_text(), "No message provided");

        card.message = Some(String::new());
        assert_eq!(card.message_text(), "No message provided");

        card.message = Some("Great launch!".to_string());
        assert_eq!(card.message_text(), "Great launch!");
    }

    #[test]
    fn test_footer_time_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let mut card = card();
        assert_eq!(card.footer_time(now), "pinned");

        card.created_at = Some(now - chrono::Duration::seconds(30));
        assert_eq!(card.footer_time(now), "just now");

        card.created_at = Some(now - chrono::Duration::minutes(5));
        assert_eq!(card.footer_time(now), "5m ago");

        card.created_at = Some(now - chrono::Duration::hours(2));
        assert_eq!(card.footer_time(now), "2h ago");

        card.created_at = Some(now - chrono::Duration::days(3));
        assert_eq!(card.footer_time(now), "3d ago");
    }

    #[test]
    fn test_group_award_total_points() {
        let card = GroupAwardCard {
            recipients: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            award_level: "Custom".to_string(),
            message: Some("Team win".to_string()),
        };
        assert_eq!(card.total_points(), 1500);
    }
}
