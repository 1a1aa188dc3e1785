use crate::types::{DataKind, Follow, Founder, Mod, Vip};
use chrono::{DateTime, Utc};
use std::fmt::Write;

const TWITCH_URL: &str = "https://twitch.tv/";

/// A record that can be listed as one numbered line.
pub trait Entry {
    fn login(&self) -> &str;
    fn display_name(&self) -> &str;
    fn date(&self) -> Option<DateTime<Utc>>;
    /// Status words shown after the date, only those that are currently true.
    fn status(&self) -> Vec<&'static str>;
}

impl Entry for Follow {
    fn login(&self) -> &str {
        &self.login
    }
    fn display_name(&self) -> &str {
        &self.display_name
    }
    fn date(&self) -> Option<DateTime<Utc>> {
        self.followed_at
    }
    fn status(&self) -> Vec<&'static str> {
        if self.is_live {
            vec!["live"]
        } else {
            vec![]
        }
    }
}

impl Entry for Mod {
    fn login(&self) -> &str {
        &self.login
    }
    fn display_name(&self) -> &str {
        &self.display_name
    }
    fn date(&self) -> Option<DateTime<Utc>> {
        self.granted_at
    }
    fn status(&self) -> Vec<&'static str> {
        if self.banned {
            vec!["banned"]
        } else {
            vec![]
        }
    }
}

impl Entry for Vip {
    fn login(&self) -> &str {
        &self.login
    }
    fn display_name(&self) -> &str {
        &self.display_name
    }
    fn date(&self) -> Option<DateTime<Utc>> {
        self.granted_at
    }
    fn status(&self) -> Vec<&'static str> {
        if self.banned {
            vec!["banned"]
        } else {
            vec![]
        }
    }
}

impl Entry for Founder {
    fn login(&self) -> &str {
        &self.login
    }
    fn display_name(&self) -> &str {
        &self.display_name
    }
    fn date(&self) -> Option<DateTime<Utc>> {
        self.first_month
    }
    fn status(&self) -> Vec<&'static str> {
        [(self.is_subscribed, "subscribed"), (self.banned, "banned")]
            .into_iter()
            .filter_map(|(on, word)| on.then_some(word))
            .collect()
    }
}

pub fn format_follows(channel: &str, follows: &[Follow]) -> String {
    format_list(DataKind::Follows, channel, follows)
}

pub fn format_mods(channel: &str, mods: &[Mod]) -> String {
    format_list(DataKind::Moders, channel, mods)
}

pub fn format_vips(channel: &str, vips: &[Vip]) -> String {
    format_list(DataKind::Vips, channel, vips)
}

pub fn format_founders(channel: &str, founders: &[Founder]) -> String {
    format_list(DataKind::Founders, channel, founders)
}

/// Renders a header linking `channel` and one numbered line per entry, keeping the input order.
pub fn format_list<E: Entry>(kind: DataKind, channel: &str, entries: &[E]) -> String {
    let mut out = format!("{}{}\n", channel_link(channel, channel), caption(kind));

    for (i, entry) in entries.iter().enumerate() {
        let name = match entry.display_name() {
            "" => entry.login(),
            name => name,
        };
        let mut details = format!("{} at {}", verb(kind), format_date(entry.date()));
        for word in entry.status() {
            details.push_str(", ");
            details.push_str(word);
        }
        // writing into a String cannot fail
        let _ = writeln!(
            out,
            "{}. {} ({})",
            i + 1,
            channel_link(entry.login(), name),
            details
        );
    }

    out
}

fn caption(kind: DataKind) -> &'static str {
    match kind {
        DataKind::Follows => " is following:",
        DataKind::Moders => "'s list of channel moders:",
        DataKind::Vips => "'s list of channel vips:",
        DataKind::Founders => "'s list of channel founders:",
    }
}

fn verb(kind: DataKind) -> &'static str {
    match kind {
        DataKind::Follows => "followed",
        DataKind::Moders => "moded",
        DataKind::Vips => "viped",
        DataKind::Founders => "founded",
    }
}

fn channel_link(login: &str, text: &str) -> String {
    format!(
        r#"<a href="{}{}">{}</a>"#,
        TWITCH_URL,
        html_escape::encode_double_quoted_attribute(login),
        html_escape::encode_text(text),
    )
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
