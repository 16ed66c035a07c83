use crate::format::traits::BookmarkFormat;
use secondbrain::error::Result;
use serde::Serialize;

pub struct YamlFormat<'a, T: Serialize>(pub &'a T);

impl<'a, T: Serialize> BookmarkFormat for YamlFormat<'a, T> {
    fn render(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self.0)?)
    }
}
