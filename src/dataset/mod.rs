/// In-memory dataset
///
/// Holds the tutorial and author collections behind a single read/write lock.
/// Reads take the shared lock and return owned snapshots; appends take the
/// write lock for the whole check-and-push, so concurrent writers never lose
/// updates and readers never see a half-applied write.

mod types;

pub use types::{Author, Collection, Comment, Entity, Tutorial};

use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

/// Dataset handle passed to the executor as per-request data
pub type SharedDataset = Arc<dyn Dataset>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("{collection} already contains an entry with id {id}")]
    DuplicateId { collection: Collection, id: i64 },
}

/// Storage consumed by resolvers
pub trait Dataset: Send + Sync {
    fn find_by_id(&self, collection: Collection, id: i64) -> Option<Entity>;

    /// Every entry of a collection, in insertion order
    fn list(&self, collection: Collection) -> Vec<Entity>;

    /// Append atomically; nothing is stored on error
    fn append(&self, entity: Entity) -> Result<(), DatasetError>;

    fn find_tutorial(&self, id: i64) -> Option<Tutorial> {
        match self.find_by_id(Collection::Tutorials, id) {
            Some(Entity::Tutorial(tutorial)) => Some(tutorial),
            _ => None,
        }
    }

    fn find_author(&self, id: i64) -> Option<Author> {
        match self.find_by_id(Collection::Authors, id) {
            Some(Entity::Author(author)) => Some(author),
            _ => None,
        }
    }

    fn tutorials(&self) -> Vec<Tutorial> {
        self.list(Collection::Tutorials)
            .into_iter()
            .filter_map(|entity| match entity {
                Entity::Tutorial(tutorial) => Some(tutorial),
                _ => None,
            })
            .collect()
    }

    fn authors(&self) -> Vec<Author> {
        self.list(Collection::Authors)
            .into_iter()
            .filter_map(|entity| match entity {
                Entity::Author(author) => Some(author),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct Collections {
    tutorials: Vec<Tutorial>,
    authors: Vec<Author>,
}

/// Lock-guarded dataset living for the lifetime of the process
#[derive(Debug, Default)]
pub struct InMemoryDataset {
    inner: RwLock<Collections>,
}

impl InMemoryDataset {
    pub fn new(tutorials: Vec<Tutorial>, authors: Vec<Author>) -> Self {
        Self {
            inner: RwLock::new(Collections { tutorials, authors }),
        }
    }

    /// The two authors, two tutorials and two comments served by default
    pub fn seeded() -> Self {
        let (tutorials, authors) = seed();
        Self::new(tutorials, authors)
    }

    pub fn len(&self, collection: Collection) -> usize {
        let inner = self.inner.read();
        match collection {
            Collection::Tutorials => inner.tutorials.len(),
            Collection::Authors => inner.authors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        let inner = self.inner.read();
        inner.tutorials.is_empty() && inner.authors.is_empty()
    }
}

impl Dataset for InMemoryDataset {
    fn find_by_id(&self, collection: Collection, id: i64) -> Option<Entity> {
        let inner = self.inner.read();
        match collection {
            Collection::Tutorials => inner
                .tutorials
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .map(Entity::Tutorial),
            Collection::Authors => inner
                .authors
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .map(Entity::Author),
        }
    }

    fn list(&self, collection: Collection) -> Vec<Entity> {
        let inner = self.inner.read();
        match collection {
            Collection::Tutorials => inner.tutorials.iter().cloned().map(Entity::Tutorial).collect(),
            Collection::Authors => inner.authors.iter().cloned().map(Entity::Author).collect(),
        }
    }

    fn append(&self, entity: Entity) -> Result<(), DatasetError> {
        let mut inner = self.inner.write();
        let collection = entity.collection();
        let id = entity.id();
        let exists = match collection {
            Collection::Tutorials => inner.tutorials.iter().any(|t| t.id == id),
            Collection::Authors => inner.authors.iter().any(|a| a.id == id),
        };
        if exists {
            return Err(DatasetError::DuplicateId { collection, id });
        }

        match entity {
            Entity::Tutorial(tutorial) => inner.tutorials.push(tutorial),
            Entity::Author(author) => inner.authors.push(author),
        }
        tracing::debug!("Appended {} id {}", collection, id);
        Ok(())
    }
}

/// Fixture data: two authors, each with one tutorial carrying one comment
pub fn seed() -> (Vec<Tutorial>, Vec<Author>) {
    let author1 = Author {
        id: 1,
        name: "Elliot Forbes".to_string(),
        tutorials: vec![1],
    };
    let author2 = Author {
        id: 2,
        name: "Max Lopez".to_string(),
        tutorials: vec![2],
    };

    let tutorials = vec![
        Tutorial {
            id: 1,
            title: "Go GraphQL Tutorial".to_string(),
            author: Some(author1.clone()),
            comments: vec![Comment {
                body: "First Comment".to_string(),
            }],
        },
        Tutorial {
            id: 2,
            title: "Pandit Football Tutorial".to_string(),
            author: Some(author2.clone()),
            comments: vec![Comment {
                body: "Second Comment".to_string(),
            }],
        },
    ];

    (tutorials, vec![author1, author2])
}
