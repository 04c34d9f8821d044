use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument};

use crate::entity::EntityRef;
use crate::models::Game;
use crate::repository::GameRepository;
use crate::server::Page;
use crate::shared::AppError;

/// What happened to a search once its response came back
#[derive(Debug)]
pub enum SearchOutcome {
    /// The response was the latest one and now backs [`GameSearch::results`]
    Applied(Page<EntityRef<Game>>),
    /// A newer search (or a clear) started first; the response was dropped
    Superseded,
}

#[derive(Default)]
struct SearchState {
    query: String,
    results: Vec<EntityRef<Game>>,
    page_number: u32,
    total_pages: u32,
}

/// Store search box results.
///
/// Responses can arrive out of order. Each search takes a new generation and
/// its response is applied only while that generation is still the latest.
pub struct GameSearch {
    games: Arc<GameRepository>,
    attributes: Vec<String>,
    generation: AtomicU64,
    state: Mutex<SearchState>,
}

impl GameSearch {
    pub fn new(games: Arc<GameRepository>, attributes: Vec<String>) -> Self {
        Self {
            games,
            attributes,
            generation: AtomicU64::new(0),
            state: Mutex::new(SearchState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchOutcome, AppError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state().query = query.to_string();

        let response = self.games.search(query, &self.attributes, page, true).await;

        let mut state = self.state();
        if self.generation.load(Ordering::SeqCst) != generation || state.query != query {
            debug!(generation, "Dropping stale search response");
            return Ok(SearchOutcome::Superseded);
        }

        let page = response?;
        state.results = page.entries.clone();
        state.page_number = page.page_number;
        state.total_pages = page.total_pages;
        debug!(generation, hits = page.entries.len(), "Search results applied");
        Ok(SearchOutcome::Applied(page))
    }

    pub fn results(&self) -> Vec<EntityRef<Game>> {
        self.state().results.clone()
    }

    pub fn query(&self) -> String {
        self.state().query.clone()
    }

    /// Page number and page count of the applied results
    pub fn page(&self) -> (u32, u32) {
        let state = self.state();
        (state.page_number, state.total_pages)
    }

    /// Resets the slot; searches still in flight come back superseded
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.state() = SearchState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use crate::repository::EntitySource;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::{oneshot, Notify};

    type Response = Result<Page<Game>, AppError>;

    /// Source whose searches block until the test releases them
    #[derive(Default)]
    struct GatedSource {
        pending: Mutex<HashMap<String, oneshot::Sender<Response>>>,
        arrived: Notify,
    }

    impl GatedSource {
        async fn wait_for(&self, query: &str) {
            loop {
                let notified = self.arrived.notified();
                if self.pending.lock().unwrap().contains_key(query) {
                    return;
                }
                notified.await;
            }
        }

        fn release(&self, query: &str, response: Response) {
            let sender = self.pending.lock().unwrap().remove(query).unwrap();
            sender.send(response).unwrap();
        }
    }

    #[async_trait]
    impl EntitySource<Game> for GatedSource {
        async fn fetch_one(&self, id: &EntityId, _attributes: &[String]) -> Result<Game, AppError> {
            Err(AppError::NotFound(id.to_string()))
        }

        async fn fetch_many(
            &self,
            _ids: &[EntityId],
            _attributes: &[String],
        ) -> Result<Vec<Game>, AppError> {
            Ok(Vec::new())
        }

        async fn search(
            &self,
            query: &str,
            _attributes: &[String],
            _page: u32,
        ) -> Result<Page<Game>, AppError> {
            let (sender, receiver) = oneshot::channel();
            self.pending
                .lock()
                .unwrap()
                .insert(query.to_string(), sender);
            self.arrived.notify_waiters();
            receiver
                .await
                .unwrap_or_else(|_| Err(AppError::Network("dropped".to_string())))
        }
    }

    fn hits(names: &[&str]) -> Response {
        let entries = names
            .iter()
            .enumerate()
            .map(|(n, name)| {
                let mut game = Game::with_id(format!("{}-{}", name, n));
                game.name = Some(name.to_string());
                game
            })
            .collect();
        Ok(Page {
            entries,
            page_number: 1,
            page_size: 10,
            total_pages: 1,
        })
    }

    fn names(search: &GameSearch) -> Vec<String> {
        search
            .results()
            .iter()
            .filter_map(|game| game.read().name.clone())
            .collect()
    }

    fn setup() -> (Arc<GatedSource>, Arc<GameSearch>) {
        let source = Arc::new(GatedSource::default());
        let games = Arc::new(GameRepository::new(source.clone()));
        let search = Arc::new(GameSearch::new(games, vec!["name".to_string()]));
        (source, search)
    }

    fn start(
        search: &Arc<GameSearch>,
        query: &'static str,
    ) -> tokio::task::JoinHandle<Result<SearchOutcome, AppError>> {
        let search = search.clone();
        tokio::spawn(async move { search.search(query, 1).await })
    }

    #[tokio::test]
    async fn late_response_for_older_query_is_dropped() {
        let (source, search) = setup();

        let older = start(&search, "hal");
        source.wait_for("hal").await;
        let newer = start(&search, "half");
        source.wait_for("half").await;

        source.release("half", hits(&["Half-Life"]));
        let newer = newer.await.unwrap().unwrap();
        source.release("hal", hits(&["Halo", "Half-Life"]));
        let older = older.await.unwrap().unwrap();

        assert!(matches!(newer, SearchOutcome::Applied(_)));
        assert!(matches!(older, SearchOutcome::Superseded));
        assert_eq!(names(&search), vec!["Half-Life"]);
        assert_eq!(search.query(), "half");
    }

    #[tokio::test]
    async fn stale_error_is_reported_as_superseded() {
        let (source, search) = setup();

        let older = start(&search, "hal");
        source.wait_for("hal").await;
        let newer = start(&search, "halo");
        source.wait_for("halo").await;

        source.release("halo", hits(&["Halo"]));
        newer.await.unwrap().unwrap();
        source.release("hal", Err(AppError::Network("timeout".to_string())));
        let older = older.await.unwrap();

        assert!(matches!(older, Ok(SearchOutcome::Superseded)));
        assert_eq!(names(&search), vec!["Halo"]);
    }

    #[tokio::test]
    async fn latest_error_is_returned() {
        let (source, search) = setup();

        let only = start(&search, "hal");
        source.wait_for("hal").await;
        source.release("hal", Err(AppError::Network("timeout".to_string())));

        assert!(matches!(only.await.unwrap(), Err(AppError::Network(_))));
        assert!(search.results().is_empty());
    }

    #[tokio::test]
    async fn clear_supersedes_in_flight_search() {
        let (source, search) = setup();

        let pending = start(&search, "hal");
        source.wait_for("hal").await;
        search.clear();
        source.release("hal", hits(&["Halo"]));

        assert!(matches!(
            pending.await.unwrap(),
            Ok(SearchOutcome::Superseded)
        ));
        assert!(search.results().is_empty());
        assert_eq!(search.query(), "");
    }

    #[tokio::test]
    async fn applied_results_share_cached_instances() {
        let (source, search) = setup();
        let games = search.games.clone();

        let pending = start(&search, "halo");
        source.wait_for("halo").await;
        source.release("halo", hits(&["Halo"]));
        pending.await.unwrap().unwrap();

        let cached = games.retrieve(&EntityId::new("Halo-0")).unwrap();
        assert!(search.results()[0].ptr_eq(&cached));
        assert_eq!(search.page(), (1, 1));
    }
}
