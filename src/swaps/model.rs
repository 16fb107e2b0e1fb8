use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SwapStatus {
    pub fn as_str(self) -> &'static str {
        use SwapStatus::*;
        match self {
            Pending => "pending",
            Accepted => "accepted",
            Rejected => "rejected",
        }
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status a swap can be moved to. `pending` is only ever the initial one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Accepted,
    Rejected,
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Resolution::Accepted),
            "rejected" => Ok(Resolution::Rejected),
            _ => Err("Invalid status".to_owned()),
        }
    }
}

impl From<Resolution> for SwapStatus {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Accepted => SwapStatus::Accepted,
            Resolution::Rejected => SwapStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    pub(crate) fn field(self) -> &'static str {
        match self {
            Direction::Sent => "sender_id",
            Direction::Received => "recipient_id",
        }
    }
}

/// What a sender submits. Status and timestamp are assigned server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct SwapForm {
    pub sender_id: String,
    pub recipient_id: String,
    pub offered_skill: String,
    pub requested_skill: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl SwapForm {
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("sender_id", &self.sender_id),
            ("recipient_id", &self.recipient_id),
            ("offered_skill", &self.offered_skill),
            ("requested_skill", &self.requested_skill),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{field} must not be empty").into());
            }
        }
        if self.sender_id == self.recipient_id {
            return Err("cannot request a swap with yourself".into());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swap {
    pub sender_id: String,
    pub recipient_id: String,
    pub offered_skill: String,
    pub requested_skill: String,
    #[serde(default)]
    pub message: Option<String>,
    pub status: SwapStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Swap {
    pub fn pending(form: SwapForm) -> Self {
        let SwapForm { sender_id, recipient_id, offered_skill, requested_skill, message } = form;
        Swap {
            sender_id,
            recipient_id,
            offered_skill,
            requested_skill,
            message,
            status: SwapStatus::Pending,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// A stored swap together with its document id.
#[derive(Debug, Clone, Serialize)]
pub struct SwapRecord {
    pub id: String,
    #[serde(flatten)]
    pub swap: Swap,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn form() -> SwapForm {
        serde_json::from_value(json!({
            "sender_id": "a",
            "recipient_id": "b",
            "offered_skill": "cooking",
            "requested_skill": "painting",
            "status": "accepted",
        }))
        .unwrap()
    }

    #[test]
    fn only_resolutions_parse() {
        assert_eq!("accepted".parse(), Ok(Resolution::Accepted));
        assert_eq!("rejected".parse(), Ok(Resolution::Rejected));
        for bad in ["pending", "Accepted", "", "done"] {
            assert_eq!(bad.parse::<Resolution>(), Err("Invalid status".to_owned()));
        }
        assert_eq!(SwapStatus::from(Resolution::Rejected), SwapStatus::Rejected);
    }

    #[test]
    fn new_swaps_start_pending() {
        let swap = Swap::pending(form());
        assert_eq!(swap.status, SwapStatus::Pending);
        assert_eq!(swap.message, None);

        let value = serde_json::to_value(SwapRecord { id: "s1".to_owned(), swap }).unwrap();
        assert_eq!(value["id"], "s1");
        assert_eq!(value["status"], "pending");
        assert!(value["created_at"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn validate_rejects_self_swaps_and_blanks() {
        assert!(form().validate().is_ok());

        let mut own = form();
        own.recipient_id = own.sender_id.clone();
        assert!(own.validate().is_err());

        let mut blank = form();
        blank.offered_skill = " ".to_owned();
        assert!(blank.validate().is_err());
    }
}
