use crate::format::{
    json::JsonFormat, plain::PlainBookmark, plain::PlainCollection, traits::BookmarkFormat,
    yaml::YamlFormat,
};
use crate::output::colorize::{Colorize, ColorizeBookmark, ColorizeCollection};
use secondbrain::error::Result;
use secondbrain::{Bookmark, Collection};

pub mod json;
pub mod plain;
pub mod traits;
pub mod yaml;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Plain,
    Colored,
}

impl OutputFormat {
    pub fn from_string(format: &str) -> Self {
        match format {
            "json" => OutputFormat::Json,
            "yaml" | "yml" => OutputFormat::Yaml,
            "plain" | "tsv" => OutputFormat::Plain,
            _ => OutputFormat::Colored,
        }
    }

    pub fn print_bookmarks(self, records: &[Bookmark], no_color: bool) -> Result<()> {
        match self {
            OutputFormat::Json => println!("{}", JsonFormat(&records).render()?),
            OutputFormat::Yaml => print!("{}", YamlFormat(&records).render()?),
            OutputFormat::Plain => {
                for b in records {
                    println!("{}", PlainBookmark(b).render()?);
                }
            }
            OutputFormat::Colored => {
                for b in records {
                    if no_color {
                        println!("{}", PlainBookmark(b).render()?);
                    } else {
                        println!("{}", ColorizeBookmark(b).to_colored());
                    }
                }
            }
        }
        Ok(())
    }

    pub fn print_collections(self, collections: &[Collection], no_color: bool) -> Result<()> {
        match self {
            OutputFormat::Json => println!("{}", JsonFormat(&collections).render()?),
            OutputFormat::Yaml => print!("{}", YamlFormat(&collections).render()?),
            OutputFormat::Plain => {
                for c in collections {
                    println!("{}", PlainCollection(c).render()?);
                }
            }
            OutputFormat::Colored => {
                for c in collections {
                    if no_color {
                        println!("{}", PlainCollection(c).render()?);
                    } else {
                        println!("{}", ColorizeCollection(c).to_colored());
                    }
                }
            }
        }
        Ok(())
    }
}
