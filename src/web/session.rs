use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration as CookieDuration;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::verify::{ViewSnapshot, ViewState};

pub const SESSION_COOKIE: &str = "licence_session";

struct SessionEntry {
    view: ViewState,
    last_seen: Instant,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            view: ViewState::default(),
            last_seen: Instant::now(),
        }
    }
}

/// In-memory view state per browser session. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl SessionStore {
    /// Runs `f` against the session's view state, creating it on first use.
    /// The lock is held only for the duration of `f`.
    pub async fn with_view<R>(&self, id: Uuid, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let mut guard = self.inner.write().await;
        let entry = guard.entry(id).or_insert_with(SessionEntry::new);
        entry.last_seen = Instant::now();
        f(&mut entry.view)
    }

    pub async fn snapshot(&self, id: Uuid) -> ViewSnapshot {
        self.with_view(id, |view| view.snapshot()).await
    }

    /// Drops sessions idle for longer than `ttl`. Sessions with a submission
    /// in flight are kept so the outcome has somewhere to land.
    pub async fn purge_idle(&self, ttl: Duration) -> usize {
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|_, entry| entry.view.is_loading() || entry.last_seen.elapsed() <= ttl);
        before - guard.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Returns the caller's session id, issuing a fresh cookie when the request
/// carries none (or an unparsable one).
pub fn resolve_session(jar: CookieJar, ttl: Duration) -> (CookieJar, Uuid) {
    if let Some(id) = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
    {
        return (jar, id);
    }

    let id = Uuid::new_v4();
    let mut cookie = Cookie::new(SESSION_COOKIE, id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::seconds(ttl.as_secs() as i64));

    (jar.add(cookie), id)
}
