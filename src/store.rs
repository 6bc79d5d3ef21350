//! In-memory view state: the single source of truth for what the
//! signed-in user currently sees. Every mutation follows the same
//! shape: set the loading flag, call the service, on success re-fetch
//! the affected listings so the view reflects authoritative
//! post-mutation state, then clear the flag. The store never predicts
//! the remote's new state from a mutation's own response beyond what
//! that response explicitly returns.

use crate::{
    actor::Connector,
    error::GameResult,
    game_service::{
        CreateGameParams,
        GameService,
    },
    types::{
        GameDetail,
        GameSummary,
        TablaEarnings,
        TablaInfo,
    },
};
use tracing::warn;

pub struct GameStore<C> {
    service: GameService<C>,
    open_games: Vec<GameSummary>,
    active_games: Vec<GameSummary>,
    current_game_id: Option<String>,
    current_game: Option<GameSummary>,
    current_game_detail: Option<GameDetail>,
    available_tablas: Vec<TablaInfo>,
    tabla_stats: Vec<TablaEarnings>,
    is_loading: bool,
    last_error: Option<String>,
}

impl<C: Connector> GameStore<C> {
    pub fn new(service: GameService<C>) -> Self {
        Self {
            service,
            open_games: Vec::new(),
            active_games: Vec::new(),
            current_game_id: None,
            current_game: None,
            current_game_detail: None,
            available_tablas: Vec::new(),
            tabla_stats: Vec::new(),
            is_loading: false,
            last_error: None,
        }
    }

    pub fn service(&self) -> &GameService<C> {
        &self.service
    }

    pub fn open_games(&self) -> &[GameSummary] {
        &self.open_games
    }

    pub fn active_games(&self) -> &[GameSummary] {
        &self.active_games
    }

    pub fn current_game(&self) -> Option<&GameSummary> {
        self.current_game.as_ref()
    }

    pub fn current_game_detail(&self) -> Option<&GameDetail> {
        self.current_game_detail.as_ref()
    }

    pub fn available_tablas(&self) -> &[TablaInfo] {
        &self.available_tablas
    }

    pub fn tabla_stats(&self) -> &[TablaEarnings] {
        &self.tabla_stats
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Clears all cached view state. Sign-out path.
    pub fn reset(&mut self) {
        self.open_games.clear();
        self.active_games.clear();
        self.current_game_id = None;
        self.current_game = None;
        self.current_game_detail = None;
        self.available_tablas.clear();
        self.tabla_stats.clear();
        self.is_loading = false;
        self.last_error = None;
    }

    // ---------- fetches ----------

    pub async fn fetch_open_games(&mut self, page: u64) -> GameResult<()> {
        self.is_loading = true;
        let fetched = self.service.get_open_games(page).await;
        let result = fetched.map(|games| self.open_games = games);
        self.finish(result)
    }

    pub async fn fetch_active_games(&mut self, page: u64) -> GameResult<()> {
        self.is_loading = true;
        let fetched = self.service.get_active_games(page).await;
        let result = fetched.map(|games| self.active_games = games);
        self.finish(result)
    }

    /// Navigates to a game: marks it current, then resolves summary
    /// and detail. A resolution landing after the user has navigated
    /// elsewhere is dropped rather than clobbering the newer view.
    pub async fn fetch_game_by_id(&mut self, game_id: &str) -> GameResult<()> {
        self.is_loading = true;
        self.current_game_id = Some(game_id.to_string());
        let game = self.service.get_game(game_id).await;
        let detail = match game {
            Ok(game) => self
                .service
                .get_game_detail(game_id)
                .await
                .map(|detail| (game, detail)),
            Err(err) => Err(err),
        };
        let result = detail.map(|(game, detail)| {
            self.apply_current_game(game_id, game, detail);
        });
        self.finish(result)
    }

    pub async fn fetch_available_tablas(&mut self) {
        self.is_loading = true;
        self.available_tablas = self.service.get_available_tablas().await;
        self.is_loading = false;
    }

    pub async fn fetch_tabla_stats(&mut self) {
        self.is_loading = true;
        self.tabla_stats = self.service.get_all_tabla_stats().await;
        self.is_loading = false;
    }

    // ---------- mutations ----------

    /// Returns the new game id.
    pub async fn create_game(&mut self, params: &CreateGameParams) -> GameResult<String> {
        self.is_loading = true;
        let created = self.service.create_game(params).await;
        if created.is_ok() {
            self.refetch_open_games().await;
        }
        self.finish(created)
    }

    pub async fn join_game(&mut self, game_id: &str, tabla_ids: &[u32]) -> GameResult<()> {
        self.is_loading = true;
        let joined = self.service.join_game(game_id, tabla_ids).await;
        if joined.is_ok() {
            self.refetch_current_game(game_id).await;
        }
        self.finish(joined)
    }

    pub async fn start_game(&mut self, game_id: &str) -> GameResult<()> {
        self.is_loading = true;
        let started = self.service.start_game(game_id).await;
        if started.is_ok() {
            self.refetch_listings().await;
            self.refetch_current_game(game_id).await;
        }
        self.finish(started)
    }

    pub async fn end_game(&mut self, game_id: &str) -> GameResult<()> {
        self.is_loading = true;
        let ended = self.service.end_game(game_id).await;
        if ended.is_ok() {
            self.refetch_listings().await;
        }
        self.finish(ended)
    }

    pub async fn leave_game(&mut self, game_id: &str) -> GameResult<()> {
        self.is_loading = true;
        let left = self.service.leave_game(game_id).await;
        if left.is_ok() {
            self.refetch_listings().await;
        }
        self.finish(left)
    }

    /// Returns the settlement message from the backend.
    pub async fn terminate_game(&mut self, game_id: &str) -> GameResult<String> {
        self.is_loading = true;
        let terminated = self.service.terminate_game(game_id).await;
        if terminated.is_ok() {
            self.refetch_listings().await;
        }
        self.finish(terminated)
    }

    /// Returns the drawn card id; the refreshed detail carries the
    /// authoritative draw history including it.
    pub async fn draw_card(&mut self, game_id: &str) -> GameResult<u32> {
        self.is_loading = true;
        let drawn = self.service.draw_card(game_id).await;
        if drawn.is_ok() {
            self.refetch_current_game(game_id).await;
        }
        self.finish(drawn)
    }

    pub async fn claim_win(&mut self, game_id: &str, tabla_id: u32) -> GameResult<()> {
        self.is_loading = true;
        let claimed = self.service.claim_win(game_id, tabla_id).await;
        // A partial payout means the claim was accepted and the game
        // completed remotely; the view must reflect that even though
        // the call reports a failure.
        let accepted = match &claimed {
            Ok(()) => true,
            Err(err) => err.retryable_claim().is_some(),
        };
        if accepted {
            self.refetch_current_game(game_id).await;
            self.refetch_listings().await;
        }
        self.finish(claimed)
    }

    pub async fn retry_failed_claim(&mut self, game_id: &str) -> GameResult<()> {
        self.is_loading = true;
        let retried = self.service.retry_failed_claim(game_id).await;
        self.finish(retried)
    }

    pub async fn mark_position(
        &mut self,
        game_id: &str,
        tabla_id: u32,
        row: u32,
        col: u32,
    ) -> GameResult<()> {
        self.is_loading = true;
        let marked = self.service.mark_position(game_id, tabla_id, row, col).await;
        if marked.is_ok() {
            self.refetch_current_game(game_id).await;
        }
        self.finish(marked)
    }

    pub async fn send_chat_message(&mut self, game_id: &str, text: &str) -> GameResult<()> {
        self.is_loading = true;
        let sent = self.service.send_chat_message(game_id, text).await;
        if sent.is_ok() {
            self.refetch_current_game(game_id).await;
        }
        self.finish(sent)
    }

    pub async fn update_rental_fee(&mut self, tabla_id: u32, new_fee: u128) -> GameResult<()> {
        self.is_loading = true;
        let updated = self.service.update_rental_fee(tabla_id, new_fee).await;
        if updated.is_ok() {
            self.fetch_available_tablas().await;
        }
        self.finish(updated)
    }

    // ---------- internals ----------

    fn finish<T>(&mut self, result: GameResult<T>) -> GameResult<T> {
        self.is_loading = false;
        match &result {
            Ok(_) => self.last_error = None,
            Err(err) => self.last_error = Some(err.to_string()),
        }
        result
    }

    /// Installs freshly fetched state for `game_id`, unless the user
    /// has since navigated to a different game.
    pub(crate) fn apply_current_game(
        &mut self,
        game_id: &str,
        game: Option<GameSummary>,
        detail: Option<GameDetail>,
    ) {
        if self.current_game_id.as_deref() != Some(game_id) {
            return;
        }
        self.current_game = game;
        self.current_game_detail = detail;
    }

    /// Post-mutation refreshes are best-effort: the mutation already
    /// succeeded, so a failed refresh only leaves the view stale.
    async fn refetch_open_games(&mut self) {
        match self.service.get_open_games(0).await {
            Ok(games) => self.open_games = games,
            Err(err) => warn!(%err, "open games refresh failed"),
        }
    }

    async fn refetch_listings(&mut self) {
        self.refetch_open_games().await;
        match self.service.get_active_games(0).await {
            Ok(games) => self.active_games = games,
            Err(err) => warn!(%err, "active games refresh failed"),
        }
    }

    async fn refetch_current_game(&mut self, game_id: &str) {
        let game = self.service.get_game(game_id).await;
        let detail = self.service.get_game_detail(game_id).await;
        match (game, detail) {
            (Ok(game), Ok(detail)) => {
                if self.current_game_id.is_none() {
                    self.current_game_id = Some(game_id.to_string());
                }
                self.apply_current_game(game_id, game, detail);
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(game_id, %err, "game refresh failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::{
        testing::{
            self,
            FakeConnector,
        },
        wire,
    };

    fn store_with(connector: &FakeConnector) -> GameStore<FakeConnector> {
        GameStore::new(GameService::new(connector.clone(), connector.clone()))
    }

    #[tokio::test]
    async fn fetch_game_by_id__populates_current_game() {
        let connector = FakeConnector::new();
        connector.stub_ok(
            "getGame",
            vec![testing::game_view("g-1", wire::GameStatusDto::Lobby)],
        );
        connector.stub_ok(
            "getGameDetail",
            vec![testing::game_detail("g-1", wire::GameStatusDto::Lobby)],
        );
        let mut store = store_with(&connector);

        store.fetch_game_by_id("g-1").await.unwrap();

        assert_eq!(store.current_game().unwrap().game_id, "g-1");
        assert_eq!(store.current_game_detail().unwrap().summary.game_id, "g-1");
        assert!(!store.is_loading());
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn fetch_open_games__records_error_and_clears_loading() {
        let connector = FakeConnector::new();
        let mut store = store_with(&connector);

        let result = store.fetch_open_games(0).await;

        assert!(result.is_err());
        assert!(store.last_error().is_some());
        assert!(!store.is_loading());
        assert!(store.open_games().is_empty());
    }

    #[tokio::test]
    async fn create_game__refetches_open_games_on_success() {
        let connector = FakeConnector::new();
        connector.stub_ok("createGame", "g-9".to_string());
        connector.stub_ok(
            "getOpenGames",
            vec![testing::game_view("g-9", wire::GameStatusDto::Lobby)],
        );
        let mut store = store_with(&connector);

        let game_id = store.create_game(&sample_params()).await.unwrap();

        assert_eq!(game_id, "g-9");
        assert_eq!(connector.calls_for("getOpenGames"), 1);
        assert_eq!(store.open_games().len(), 1);
    }

    #[tokio::test]
    async fn create_game__skips_refetch_when_rejected() {
        let connector = FakeConnector::new();
        connector.stub_err("createGame", "a game with that name already exists");
        let mut store = store_with(&connector);

        let result = store.create_game(&sample_params()).await;

        assert!(matches!(result, Err(crate::error::GameError::Rejected(_))));
        assert_eq!(connector.calls_for("getOpenGames"), 0);
    }

    #[tokio::test]
    async fn claim_win__partial_payout_still_refreshes_the_game_view() {
        let connector = FakeConnector::new();
        connector.stub_ok(
            "claimWin",
            wire::ClaimOutcomeDto::Partial(testing::failed_claim("g-1")),
        );
        connector.stub_ok(
            "getGame",
            vec![testing::game_view("g-1", wire::GameStatusDto::Completed)],
        );
        connector.stub_ok(
            "getGameDetail",
            vec![testing::game_detail("g-1", wire::GameStatusDto::Completed)],
        );
        let empty: Vec<wire::GameViewDto> = Vec::new();
        connector.stub_ok("getOpenGames", empty.clone());
        connector.stub_ok("getActiveGames", empty);
        let mut store = store_with(&connector);
        store.current_game_id = Some("g-1".to_string());

        let result = store.claim_win("g-1", 7).await;

        // The claim was accepted remotely, so the game completed even
        // though the payout is still owed.
        assert!(result.unwrap_err().retryable_claim().is_some());
        assert_eq!(connector.calls_for("getGame"), 1);
        assert_eq!(connector.calls_for("getGameDetail"), 1);
        assert_eq!(connector.calls_for("getOpenGames"), 1);
        assert_eq!(
            store.current_game().unwrap().status,
            crate::types::GameStatus::Completed
        );
    }

    #[tokio::test]
    async fn claim_win__rejection_skips_the_refetch() {
        let connector = FakeConnector::new();
        connector.stub_err("claimWin", "tabla has no winning pattern");
        let mut store = store_with(&connector);

        let result = store.claim_win("g-1", 7).await;

        assert!(matches!(result, Err(crate::error::GameError::Rejected(_))));
        assert_eq!(connector.calls_for("getGame"), 0);
        assert_eq!(connector.calls_for("getOpenGames"), 0);
    }

    #[test]
    fn apply_current_game__drops_resolution_for_departed_game() {
        let connector = FakeConnector::new();
        let mut store = store_with(&connector);
        store.current_game_id = Some("g-2".to_string());

        let stale_game =
            testing::game_view("g-1", wire::GameStatusDto::Active).try_into().unwrap();
        store.apply_current_game("g-1", Some(stale_game), None);

        assert!(store.current_game().is_none());
    }

    #[test]
    fn reset__clears_all_cached_state() {
        let connector = FakeConnector::new();
        let mut store = store_with(&connector);
        store.current_game_id = Some("g-1".to_string());
        store.last_error = Some("boom".to_string());
        store.is_loading = true;

        store.reset();

        assert!(store.current_game_id.is_none());
        assert!(store.last_error().is_none());
        assert!(!store.is_loading());
    }

    fn sample_params() -> CreateGameParams {
        CreateGameParams {
            name: "viernes".to_string(),
            mode: crate::types::GameMode::Line,
            token: crate::types::TokenKind::Icp,
            entry_fee_tokens: 2,
            host_fee_percent: 5,
        }
    }
}
