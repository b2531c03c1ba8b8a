use earn_core::{BroadcastSink, CoreResult, EventSink, SinkSet, TracingSink};
use earn_order::{Experience, ExperienceConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::app_config::ServerConfig;

pub type Sessions = Arc<Mutex<SessionStore>>;

/// Bounds on how many visits are kept and for how long
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    pub max_sessions: usize,
    pub idle_ttl: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            idle_ttl: Duration::from_secs(30 * 60),
        }
    }
}

struct SessionEntry {
    experience: Experience,
    last_seen: Instant,
}

/// Live experiences keyed by session id.
///
/// A session idle for longer than the TTL is dropped on its next lookup or
/// on the next insert. When full, inserting evicts the least recently used.
pub struct SessionStore {
    entries: HashMap<Uuid, SessionEntry>,
    limits: SessionLimits,
}

impl SessionStore {
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            entries: HashMap::new(),
            limits,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a new session, making room first
    pub fn insert(&mut self, id: Uuid, experience: Experience) {
        self.prune_idle();

        while self.entries.len() >= self.limits.max_sessions {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            self.entries.remove(&oldest);
            info!(session_id = %oldest, "Session evicted");
        }

        self.entries.insert(
            id,
            SessionEntry {
                experience,
                last_seen: Instant::now(),
            },
        );
    }

    /// Look up a live session and mark it as used
    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Experience> {
        let now = Instant::now();
        let expired = now.duration_since(self.entries.get(id)?.last_seen) > self.limits.idle_ttl;
        if expired {
            self.entries.remove(id);
            info!(session_id = %id, "Session expired");
            return None;
        }

        let entry = self.entries.get_mut(id)?;
        entry.last_seen = now;
        Some(&mut entry.experience)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<Experience> {
        self.entries.remove(id).map(|entry| entry.experience)
    }

    /// Drop every session idle past the TTL; returns how many went
    pub fn prune_idle(&mut self) -> usize {
        let now = Instant::now();
        let ttl = self.limits.idle_ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_seen) <= ttl);

        let pruned = before - self.entries.len();
        if pruned > 0 {
            info!(pruned, "Idle sessions dropped");
        }
        pruned
    }
}

#[derive(Clone)]
pub struct AppState {
    pub experience: Arc<ExperienceConfig>,
    pub sessions: Sessions,
    /// Shared by every session; each one wraps it to stamp its id
    pub sink: Arc<dyn EventSink>,
    pub events: BroadcastSink,
}

impl AppState {
    /// Logs every notification and forwards it to SSE subscribers
    pub fn new(experience: ExperienceConfig, server: &ServerConfig) -> CoreResult<Self> {
        server.validate()?;

        let events = BroadcastSink::new(server.event_buffer)?;
        let sink = SinkSet::new()
            .with(Arc::new(TracingSink))
            .with(Arc::new(events.clone()));

        Ok(Self::with_sink(experience, Arc::new(sink), events, server.session_limits()))
    }

    pub fn with_sink(
        experience: ExperienceConfig,
        sink: Arc<dyn EventSink>,
        events: BroadcastSink,
        limits: SessionLimits,
    ) -> Self {
        Self {
            experience: Arc::new(experience),
            sessions: Arc::new(Mutex::new(SessionStore::new(limits))),
            sink,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earn_core::RecordingSink;

    fn experience() -> Experience {
        Experience::new(Arc::new(ExperienceConfig::default()), Arc::new(RecordingSink::new()))
    }

    fn store(max_sessions: usize, idle_secs: u64) -> SessionStore {
        SessionStore::new(SessionLimits {
            max_sessions,
            idle_ttl: Duration::from_secs(idle_secs),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_store_evicts_least_recently_used() {
        let mut sessions = store(2, 600);
        let (first, second, third) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        sessions.insert(first, experience());
        tokio::time::advance(Duration::from_secs(1)).await;
        sessions.insert(second, experience());
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(sessions.get_mut(&first).is_some());

        sessions.insert(third, experience());

        assert_eq!(sessions.len(), 2);
        assert!(sessions.get_mut(&second).is_none());
        assert!(sessions.get_mut(&first).is_some());
        assert!(sessions.get_mut(&third).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_expires() {
        let mut sessions = store(10, 60);
        let (idle, busy) = (Uuid::new_v4(), Uuid::new_v4());
        sessions.insert(idle, experience());
        sessions.insert(busy, experience());

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(sessions.get_mut(&busy).is_some());
        tokio::time::advance(Duration::from_secs(30)).await;

        assert!(sessions.get_mut(&idle).is_none());
        assert!(sessions.get_mut(&busy).is_some());
        assert_eq!(sessions.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_prunes_idle_sessions() {
        let mut sessions = store(10, 60);
        sessions.insert(Uuid::new_v4(), experience());
        sessions.insert(Uuid::new_v4(), experience());

        tokio::time::advance(Duration::from_secs(61)).await;
        sessions.insert(Uuid::new_v4(), experience());

        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_zero_event_buffer_is_rejected() {
        let server = ServerConfig {
            port: 3000,
            event_buffer: 0,
            max_sessions: 10,
            session_idle_secs: 60,
        };

        assert!(AppState::new(ExperienceConfig::default(), &server).is_err());
    }
}
