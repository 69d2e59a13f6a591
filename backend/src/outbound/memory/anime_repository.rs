//! `AnimeRepository` adapter backed by an ordered in-memory table.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{AnimePersistenceError, AnimeRepository};
use crate::domain::{Anime, AnimeId, NewAnime};

#[derive(Debug)]
struct AnimeTable {
    next_id: i32,
    records: BTreeMap<AnimeId, Anime>,
}

impl Default for AnimeTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: BTreeMap::new(),
        }
    }
}

impl AnimeTable {
    /// Reserve `count` consecutive ids without committing them.
    fn reserve(&self, count: usize) -> Result<Vec<AnimeId>, AnimePersistenceError> {
        let count = i32::try_from(count)
            .map_err(|_| AnimePersistenceError::query("batch too large"))?;
        let end = self
            .next_id
            .checked_add(count)
            .ok_or_else(|| AnimePersistenceError::query("identifier space exhausted"))?;
        Ok((self.next_id..end).map(AnimeId::new).collect())
    }

    fn commit(&mut self, animes: Vec<NewAnime>, ids: Vec<AnimeId>) -> Vec<Anime> {
        let stored: Vec<Anime> = animes
            .into_iter()
            .zip(ids)
            .map(|(anime, id)| anime.into_anime(id))
            .collect();
        if let Some(last) = stored.last() {
            self.next_id = last.id().get().saturating_add(1);
        }
        for anime in &stored {
            self.records.insert(anime.id(), anime.clone());
        }
        stored
    }
}

/// Record store holding every anime in a `BTreeMap` keyed by id.
///
/// Ids start at 1 and are never reused, even after deletion.
#[derive(Debug, Default)]
pub struct InMemoryAnimeRepository {
    table: RwLock<AnimeTable>,
}

impl InMemoryAnimeRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.table.read().await.records.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.records.is_empty()
    }
}

#[async_trait]
impl AnimeRepository for InMemoryAnimeRepository {
    async fn find_all(&self) -> Result<Vec<Anime>, AnimePersistenceError> {
        let table = self.table.read().await;
        Ok(table.records.values().cloned().collect())
    }

    async fn find_by_id(&self, id: AnimeId) -> Result<Option<Anime>, AnimePersistenceError> {
        let table = self.table.read().await;
        Ok(table.records.get(&id).cloned())
    }

    async fn insert(&self, anime: NewAnime) -> Result<Anime, AnimePersistenceError> {
        let mut table = self.table.write().await;
        let ids = table.reserve(1)?;
        table
            .commit(vec![anime], ids)
            .pop()
            .ok_or_else(|| AnimePersistenceError::query("insert produced no record"))
    }

    async fn insert_all(
        &self,
        animes: Vec<NewAnime>,
    ) -> Result<Vec<Anime>, AnimePersistenceError> {
        let mut table = self.table.write().await;
        let ids = table.reserve(animes.len())?;
        Ok(table.commit(animes, ids))
    }

    async fn update(&self, anime: &Anime) -> Result<(), AnimePersistenceError> {
        let mut table = self.table.write().await;
        match table.records.get_mut(&anime.id()) {
            Some(slot) => {
                *slot = anime.clone();
                Ok(())
            }
            None => Err(AnimePersistenceError::missing(anime.id())),
        }
    }

    async fn delete(&self, id: AnimeId) -> Result<(), AnimePersistenceError> {
        self.table.write().await.records.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for id assignment and batch atomicity.
    use super::*;
    use crate::domain::AnimeName;
    use rstest::{fixture, rstest};

    fn new_anime(name: &str) -> NewAnime {
        NewAnime::new(AnimeName::new(name).expect("fixture name"))
    }

    #[fixture]
    fn repo() -> InMemoryAnimeRepository {
        InMemoryAnimeRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn insert_assigns_increasing_ids(repo: InMemoryAnimeRepository) {
        let first = repo.insert(new_anime("Mushishi")).await.expect("insert");
        let second = repo.insert(new_anime("Monster")).await.expect("insert");

        assert_eq!(first.id(), AnimeId::new(1));
        assert_eq!(second.id(), AnimeId::new(2));
        assert_eq!(repo.len().await, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_not_reused_after_delete(repo: InMemoryAnimeRepository) {
        let first = repo.insert(new_anime("Mushishi")).await.expect("insert");
        repo.delete(first.id()).await.expect("delete");

        let second = repo.insert(new_anime("Monster")).await.expect("insert");
        assert_eq!(second.id(), AnimeId::new(2));
        assert!(repo.find_by_id(first.id()).await.expect("lookup").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn insert_all_keeps_input_order(repo: InMemoryAnimeRepository) {
        let stored = repo
            .insert_all(vec![new_anime("A"), new_anime("B"), new_anime("C")])
            .await
            .expect("batch");

        let names: Vec<&str> = stored.iter().map(|a| a.name().as_ref()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(repo.find_all().await.expect("all"), stored);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_batch_is_a_no_op(repo: InMemoryAnimeRepository) {
        let stored = repo.insert_all(Vec::new()).await.expect("batch");
        assert!(stored.is_empty());
        assert!(repo.is_empty().await);

        let next = repo.insert(new_anime("A")).await.expect("insert");
        assert_eq!(next.id(), AnimeId::new(1));
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_name_in_place(repo: InMemoryAnimeRepository) {
        let stored = repo.insert(new_anime("Old")).await.expect("insert");
        let renamed = new_anime("New").into_anime(stored.id());

        repo.update(&renamed).await.expect("update");
        let found = repo.find_by_id(stored.id()).await.expect("lookup");
        assert_eq!(found, Some(renamed));
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_record_fails(repo: InMemoryAnimeRepository) {
        let ghost = new_anime("Ghost").into_anime(AnimeId::new(9));
        let err = repo.update(&ghost).await.expect_err("missing record");
        assert_eq!(err, AnimePersistenceError::missing(AnimeId::new(9)));
        assert_eq!(err.to_string(), "record 9 does not exist");
    }
}
