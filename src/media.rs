// Media sources cited by example usages. Kinds are a closed set with an
// exhaustive renderer per kind, discriminated by a `type` tag on the wire.

use serde::{Deserialize, Serialize};

/// Where an example usage of a term was published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum MediaSource {
    Book {
        title: String,
        #[serde(default)]
        authors: Vec<String>,
        #[serde(default)]
        publisher: Option<String>,
        #[serde(default)]
        year: Option<u16>,
    },
    Movie {
        title: String,
        #[serde(default)]
        directors: Vec<String>,
        #[serde(default)]
        year: Option<u16>,
    },
    Webpage {
        title: String,
        url: String,
        #[serde(default)]
        author: Option<String>,
    },
}

impl MediaSource {
    pub fn kind_label(&self) -> &'static str {
        match self {
            MediaSource::Book { .. } => "book",
            MediaSource::Movie { .. } => "movie",
            MediaSource::Webpage { .. } => "webpage",
        }
    }

    /// One-line citation for reports and tooltips.
    pub fn citation(&self) -> String {
        match self {
            MediaSource::Book {
                title,
                authors,
                publisher,
                year,
            } => {
                let mut line = String::new();
                if !authors.is_empty() {
                    line.push_str(&authors.join(", "));
                    line.push_str(": ");
                }
                line.push_str(title);
                if let Some(publisher) = publisher {
                    line.push_str(&format!(" ({publisher}"));
                    if let Some(year) = year {
                        line.push_str(&format!(", {year}"));
                    }
                    line.push(')');
                } else if let Some(year) = year {
                    line.push_str(&format!(" ({year})"));
                }
                line
            }
            MediaSource::Movie {
                title,
                directors,
                year,
            } => {
                let mut line = title.clone();
                if !directors.is_empty() {
                    line.push_str(&format!(", dir. {}", directors.join(", ")));
                }
                if let Some(year) = year {
                    line.push_str(&format!(" ({year})"));
                }
                line
            }
            MediaSource::Webpage { title, url, author } => {
                let mut line = String::new();
                if let Some(author) = author {
                    line.push_str(author);
                    line.push_str(": ");
                }
                line.push_str(&format!("{title} <{url}>"));
                line
            }
        }
    }
}
