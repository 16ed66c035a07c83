use crate::format::traits::BookmarkFormat;
use secondbrain::error::Result;
use serde::Serialize;

pub struct JsonFormat<'a, T: Serialize>(pub &'a T);

impl<'a, T: Serialize> BookmarkFormat for JsonFormat<'a, T> {
    fn render(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self.0)?)
    }
}
