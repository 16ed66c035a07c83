use secondbrain::error::Result;

/// A record rendered in one output format
pub trait BookmarkFormat {
    fn render(&self) -> Result<String>;
}
