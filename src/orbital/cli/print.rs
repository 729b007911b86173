use chrono::{DateTime, Utc};
use colored::Colorize;
use orbital::commands::search::{HitKind, SearchOutcome};
use orbital::model::{Collection, Link, OpenTab, Space};
use std::collections::BTreeMap;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const STAR_MARKER: &str = "★";
const ACTIVE_MARKER: &str = "●";

#[derive(Debug, Clone, Copy)]
pub(super) enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub(super) struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

/// A collection as it should be displayed.
pub(super) struct CollectionView<'a> {
    pub collection: &'a Collection,
    pub links: Vec<&'a Link>,
    pub expanded: bool,
}

pub(super) fn print_spaces(spaces: &[Space], active_id: &str) {
    for space in spaces {
        let marker = if space.id == active_id {
            format!("  {} ", ACTIVE_MARKER).green()
        } else {
            "    ".normal()
        };
        println!(
            "{}{} {} {}",
            marker,
            space.name.bold(),
            format!("[{}]", space.icon).dimmed(),
            space.id.dimmed()
        );
    }
}

pub(super) fn print_space(space: &Space, collections: &[CollectionView]) {
    println!("{} {}", space.name.bold(), space.id.dimmed());
    if collections.is_empty() {
        println!("    {}", "No collections yet.".dimmed());
        return;
    }

    for view in collections {
        let col = view.collection;
        let fold = if view.expanded { "▾" } else { "▸" };
        let star = if col.is_starred {
            format!(" {}", STAR_MARKER).yellow()
        } else {
            "".normal()
        };
        println!(
            "  {} {}{} {} {}",
            fold,
            col.name.bold(),
            star,
            format!("({} tabs)", view.links.len()).dimmed(),
            col.id.dimmed()
        );
        if !view.expanded {
            continue;
        }
        for link in &view.links {
            print_link_line(link);
        }
    }
}

fn print_link_line(link: &Link) {
    let left_prefix = "      ";
    let time_ago = format_time_ago(link.created_at);

    let text = match &link.comment {
        Some(comment) => format!("{} {} ({})", link.title, link.url, comment),
        None => format!("{} {}", link.title, link.url),
    };
    let available = LINE_WIDTH.saturating_sub(left_prefix.width() + TIME_WIDTH);
    let shown = truncate_to_width(&text, available);
    let padding = available.saturating_sub(shown.width());

    println!(
        "{}{}{}{}",
        left_prefix,
        shown,
        " ".repeat(padding),
        time_ago.dimmed()
    );
}

pub(super) fn print_hits(outcome: &SearchOutcome) {
    let hits = match outcome {
        SearchOutcome::Prompt => {
            println!("{}", "Type something to search.".dimmed());
            return;
        }
        SearchOutcome::Results(hits) => hits,
    };
    if hits.is_empty() {
        println!("No results found.");
        return;
    }

    for hit in hits {
        let kind = format!("{:<11}", hit.kind.to_string());
        let kind = match hit.kind {
            HitKind::Collection => kind.cyan(),
            HitKind::Link => kind.normal(),
            HitKind::OpenTab => kind.magenta(),
        };
        let available = LINE_WIDTH.saturating_sub(4 + 11);
        println!(
            "    {}{}",
            kind,
            truncate_to_width(&hit.title, available).bold()
        );
        println!(
            "    {:<11}{}",
            "",
            truncate_to_width(&hit.subtitle, available).dimmed()
        );
    }
}

pub(super) fn print_tabs(windows: &BTreeMap<i64, Vec<&OpenTab>>) {
    if windows.is_empty() {
        println!("No open tabs.");
        return;
    }
    for (window, tabs) in windows {
        println!("{}", format!("Window {}", window).bold());
        for tab in tabs {
            let id = format!("{:<8}", tab.id);
            let available = LINE_WIDTH.saturating_sub(4 + id.width());
            println!(
                "    {}{}",
                id.yellow(),
                truncate_to_width(&tab.title, available)
            );
        }
    }
}

pub(super) fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // wide glyphs take two columns each
        assert_eq!(truncate_to_width("剑来第二季", 5), "剑来…");
    }
}
