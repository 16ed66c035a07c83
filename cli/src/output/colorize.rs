use crate::format::plain::sync_marker;
use owo_colors::OwoColorize;
use secondbrain::{Bookmark, Collection};

pub trait Colorize {
    fn to_colored(&self) -> String;
}

pub struct ColorizeBookmark<'a>(pub &'a Bookmark);

impl<'a> Colorize for ColorizeBookmark<'a> {
    fn to_colored(&self) -> String {
        let b = self.0;
        let mut s = String::new();
        let id = b.id.to_string();

        let mut badges = String::new();
        if b.is_favorite {
            badges.push_str(" ★");
        }
        if b.is_archived {
            badges.push_str(" [archived]");
        }
        s.push_str(&format!(
            "{}. {}{} {}\n",
            id.bright_blue(),
            b.title.bold().green(),
            badges.yellow(),
            format!("({})", sync_marker(b)).dimmed(),
        ));

        let padding = id.len() + 3;
        s.push_str(&format!("{:>padding$} {}\n", ">".red(), b.url.yellow()));

        if let Some(description) = b.description.as_deref().filter(|d| !d.trim().is_empty()) {
            s.push_str(&format!("{:>padding$} {}\n", "+".red(), description));
        }

        if !b.tags.is_empty() {
            let tags_str = b.tags.join(", ");
            s.push_str(&format!("{:>padding$} {}\n", "#".red(), tags_str.blue()));
        }
        s
    }
}

pub struct ColorizeCollection<'a>(pub &'a Collection);

impl<'a> Colorize for ColorizeCollection<'a> {
    fn to_colored(&self) -> String {
        let c = self.0;
        let mut s = format!(
            "{}. {} {}",
            c.id.to_string().bright_blue(),
            c.name.bold().green(),
            format!("({} bookmarks)", c.bookmark_count).dimmed()
        );
        if let Some(description) = c.description.as_deref() {
            s.push_str(&format!("\n   {}", description));
        }
        s
    }
}
