use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One of the four relationship lists a channel can be asked about.
///
/// The lowercase name doubles as the inline button label and its callback payload.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Follows,
    Moders,
    Vips,
    Founders,
}

impl DataKind {
    pub const ALL: [DataKind; 4] = [
        DataKind::Follows,
        DataKind::Moders,
        DataKind::Vips,
        DataKind::Founders,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DataKind::Follows => "follows",
            DataKind::Moders => "moders",
            DataKind::Vips => "vips",
            DataKind::Founders => "founders",
        }
    }

    /// Path segment of the upstream API operation.
    pub fn operation(self) -> &'static str {
        match self {
            DataKind::Follows => "getfollows",
            DataKind::Moders => "getmods",
            DataKind::Vips => "getvips",
            DataKind::Founders => "getfounders",
        }
    }

    /// What the upstream API means by answering 400 for this list.
    pub fn no_entries_message(self) -> &'static str {
        match self {
            DataKind::Follows => "the user does not follow any channel",
            DataKind::Moders => "the user does not have any moderators on their channel",
            DataKind::Vips => "the user does not have any VIPs on their channel",
            DataKind::Founders => "the user does not have any founders on their channel",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown option: {0}")]
pub struct UnknownDataKind(pub String);

impl FromStr for DataKind {
    type Err = UnknownDataKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataKind::ALL
            .into_iter()
            .find(|k| k.label() == s)
            .ok_or_else(|| UnknownDataKind(s.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Follow {
    pub id: String,
    pub display_name: String,
    pub login: String,
    pub avatar: String,
    pub followed_at: Option<DateTime<Utc>>,
    pub is_live: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Mod {
    pub id: String,
    pub display_name: String,
    pub login: String,
    pub avatar: String,
    #[serde(rename = "granted_at")]
    pub granted_at: Option<DateTime<Utc>>,
    pub banned: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Vip {
    pub id: String,
    pub display_name: String,
    pub login: String,
    pub avatar: String,
    #[serde(rename = "granted_at")]
    pub granted_at: Option<DateTime<Utc>>,
    pub banned: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Founder {
    pub id: String,
    pub display_name: String,
    pub login: String,
    pub avatar: String,
    pub first_month: Option<DateTime<Utc>>,
    pub is_subscribed: bool,
    pub banned: bool,
}
