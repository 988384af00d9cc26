use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tutorial {
    pub id: i64,
    pub title: String,
    pub author: Option<Author>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    /// Ids of the tutorials this author wrote
    #[serde(default)]
    pub tutorials: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub body: String,
}

/// Named collections of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Tutorials,
    Authors,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Tutorials => "tutorials",
            Collection::Authors => "authors",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tutorials" => Ok(Collection::Tutorials),
            "authors" => Ok(Collection::Authors),
            other => Err(format!("Unknown collection '{}'", other)),
        }
    }
}

/// Any record stored in a collection
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Tutorial(Tutorial),
    Author(Author),
}

impl Entity {
    pub fn collection(&self) -> Collection {
        match self {
            Entity::Tutorial(_) => Collection::Tutorials,
            Entity::Author(_) => Collection::Authors,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Entity::Tutorial(t) => t.id,
            Entity::Author(a) => a.id,
        }
    }
}

impl From<Tutorial> for Entity {
    fn from(tutorial: Tutorial) -> Self {
        Entity::Tutorial(tutorial)
    }
}

impl From<Author> for Entity {
    fn from(author: Author) -> Self {
        Entity::Author(author)
    }
}
