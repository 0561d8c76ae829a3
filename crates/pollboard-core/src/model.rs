// Poll, option, and user records as served by the backend.
//
// Identifiers are newtypes so that "same poll" / "same option" comparisons
// are always explicit. Field names follow the backend's JSON (`_id`,
// camelCase elsewhere).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }
    };
}

string_id!(
    /// Backend identifier of a poll.
    PollId
);
string_id!(
    /// Backend identifier of an option, unique within its poll.
    OptionId
);
string_id!(
    /// Backend identifier of a user.
    UserId
);

// ---------------------------------------------------------------------------
// Poll
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    #[serde(rename = "_id")]
    pub id: OptionId,
    pub text: String,
    #[serde(default)]
    pub votes: u64,
}

/// The user who created a poll, as embedded in the poll record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    #[serde(rename = "_id")]
    pub id: PollId,
    pub question: String,
    pub options: Vec<PollOption>,
    #[serde(default, deserialize_with = "creator_ref")]
    pub created_by: Option<Creator>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Poll {
    /// Sum of all option vote counts.
    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|o| o.votes).sum()
    }

    pub fn option(&self, id: &OptionId) -> Option<&PollOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    /// Share of the poll's votes held by `option`, in percent.
    pub fn percentage(&self, option: &PollOption) -> f64 {
        vote_percentage(option.votes, self.total_votes())
    }

    /// Display name of the creator, or "Unknown".
    pub fn creator_name(&self) -> &str {
        self.created_by
            .as_ref()
            .and_then(|c| c.display_name.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn is_created_by(&self, user: &UserId) -> bool {
        self.created_by.as_ref().is_some_and(|c| &c.id == user)
    }
}

/// `createdBy` arrives either populated or as the bare user id. An id alone
/// becomes a `Creator` without a display name.
fn creator_ref<'de, D>(deserializer: D) -> Result<Option<Creator>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CreatorRef {
        Populated(Creator),
        Id(UserId),
    }

    Ok(
        Option::<CreatorRef>::deserialize(deserializer)?.map(|r| match r {
            CreatorRef::Populated(creator) => creator,
            CreatorRef::Id(id) => Creator {
                id,
                display_name: None,
            },
        }),
    )
}

/// `votes / total * 100`, or exactly 0 when nobody has voted yet.
pub fn vote_percentage(votes: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        votes as f64 / total as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// One vote the user has cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub poll: PollId,
    pub option_id: OptionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub display_name: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub voted_polls: Vec<VoteRecord>,
}

// ---------------------------------------------------------------------------
// Outgoing payloads
// ---------------------------------------------------------------------------

/// A validated poll ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    pub question: String,
    pub options: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
