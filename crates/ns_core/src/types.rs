use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Title NewsAPI substitutes for retracted articles.
pub const REMOVED_TITLE: &str = "[Removed]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Generated when the record is decoded, so the same story fetched twice
    /// gets two different ids.
    pub id: Uuid,
    pub author: Option<String>,
    pub title: String,
    pub url: String,
    /// Raw `publishedAt` value, kept as a string because upstream does not
    /// guarantee a single format.
    pub published_at: String,
    pub content: String,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>, published_at: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: None,
            title: title.into(),
            url: url.into(),
            published_at: published_at.into(),
            content: String::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn is_removed(&self) -> bool {
        self.title == REMOVED_TITLE
    }

    /// Medium-style date (`Oct 18, 2026`), or the raw string when it does not parse.
    pub fn display_date(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.published_at) {
            Ok(date) => date.format("%b %-d, %Y").to_string(),
            Err(_) => self.published_at.clone(),
        }
    }

    /// Two-line label used by list views.
    pub fn list_label(&self) -> String {
        format!("{}\n{}", self.display_date(), self.title)
    }
}

/// What a detail view shows for a selected result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleDetail {
    pub title: String,
    pub date: String,
    pub author: String,
    pub content: String,
    pub url: String,
}

impl From<&Article> for ArticleDetail {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            date: article.display_date(),
            author: format!("Author: {}", article.author.as_deref().unwrap_or("Unknown")),
            content: article.content.clone(),
            url: article.url.clone(),
        }
    }
}

impl fmt::Display for ArticleDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.date)?;
        writeln!(f, "{}", self.author)?;
        writeln!(f, "{}", self.url)?;
        write!(f, "\n{}", self.content)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortCriterion {
    #[default]
    ByDate,
    /// Stands in for popularity, which NewsAPI does not expose.
    ByTitle,
}

impl SortCriterion {
    /// Maps a segmented-control index: 0 is date, 1 is popularity.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::ByDate),
            1 => Some(Self::ByTitle),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::ByDate => 0,
            Self::ByTitle => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ByDate => "Date",
            Self::ByTitle => "Popularity",
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortCriterion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" | "publishedat" | "0" => Ok(Self::ByDate),
            "title" | "popularity" | "1" => Ok(Self::ByTitle),
            other => Err(Error::InvalidInput(format!("Unknown sort option: {}", other))),
        }
    }
}
