// src/services/session_store.rs
use crate::errors::VectorQuoteError;
use crate::models::*;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};
use uuid::Uuid;

struct Session {
    attempt_id: Uuid,
    file: FileInfo,
    preview: Option<String>,
    status: AnalysisStatus,
    order: Option<Order>,
    task: Option<AbortHandle>,
    updated_at: DateTime<Utc>,
}

impl Session {
    fn snapshot(&self, session_id: Uuid) -> SessionSnapshot {
        SessionSnapshot {
            session_id,
            attempt_id: self.attempt_id,
            file: self.file.clone(),
            preview: self.preview.clone(),
            analysis: self.status.clone(),
            order: self.order.clone(),
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Process-local session state. Nothing here survives a restart.
///
/// Every analysis write is keyed by attempt id; a write whose attempt is no
/// longer the session's current one is dropped.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn contains(&self, session_id: &Uuid) -> bool {
        self.sessions.read().contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes `attempt_id` the session's current analysis. With
    /// `require_existing` the session must already be present; otherwise it is
    /// created. Any open order is discarded. Returns the superseded task so the
    /// caller can abort it.
    pub fn begin_attempt(
        &self,
        session_id: Uuid,
        attempt_id: Uuid,
        file: FileInfo,
        require_existing: bool,
    ) -> Result<Option<AbortHandle>, VectorQuoteError> {
        let mut sessions = self.sessions.write();
        if require_existing && !sessions.contains_key(&session_id) {
            return Err(VectorQuoteError::SessionNotFound(session_id.to_string()));
        }

        let fresh = Session {
            attempt_id,
            file,
            preview: None,
            status: AnalysisStatus::Analyzing,
            order: None,
            task: None,
            updated_at: Utc::now(),
        };

        Ok(sessions
            .insert(session_id, fresh)
            .and_then(|previous| previous.task))
    }

    pub fn set_preview(&self, session_id: &Uuid, attempt_id: &Uuid, preview: String) -> bool {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(session_id) {
            Some(session) if session.attempt_id == *attempt_id => {
                session.preview = Some(preview);
                true
            }
            _ => false,
        }
    }

    /// Returns false when the attempt was superseded before its task was
    /// registered.
    pub fn attach_task(&self, session_id: &Uuid, attempt_id: &Uuid, task: AbortHandle) -> bool {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(session_id) {
            Some(session) if session.attempt_id == *attempt_id => {
                session.task = Some(task);
                true
            }
            _ => false,
        }
    }

    pub fn complete(&self, session_id: &Uuid, attempt_id: &Uuid, result: AnalysisResult) -> bool {
        self.finish(session_id, attempt_id, AnalysisStatus::Complete { result })
    }

    pub fn fail(&self, session_id: &Uuid, attempt_id: &Uuid, message: String) -> bool {
        self.finish(session_id, attempt_id, AnalysisStatus::Failed { message })
    }

    fn finish(&self, session_id: &Uuid, attempt_id: &Uuid, status: AnalysisStatus) -> bool {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(session_id) {
            Some(session)
                if session.attempt_id == *attempt_id
                    && session.status == AnalysisStatus::Analyzing =>
            {
                session.status = status;
                session.task = None;
                session.touch();
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self, session_id: &Uuid) -> Result<SessionSnapshot, VectorQuoteError> {
        self.sessions
            .read()
            .get(session_id)
            .map(|s| s.snapshot(*session_id))
            .ok_or_else(|| VectorQuoteError::SessionNotFound(session_id.to_string()))
    }

    pub fn analysis_result(&self, session_id: &Uuid) -> Result<AnalysisResult, VectorQuoteError> {
        let sessions = self.sessions.read();
        let session = sessions
            .get(session_id)
            .ok_or_else(|| VectorQuoteError::SessionNotFound(session_id.to_string()))?;

        match &session.status {
            AnalysisStatus::Complete { result } => Ok(result.clone()),
            AnalysisStatus::Analyzing => {
                Err(VectorQuoteError::AnalysisNotReady(session_id.to_string()))
            }
            AnalysisStatus::Failed { .. } => Err(VectorQuoteError::AnalysisFailed),
        }
    }

    /// Drops the session, aborting an in-flight analysis.
    pub fn remove(&self, session_id: &Uuid) -> Result<(), VectorQuoteError> {
        let session = self
            .sessions
            .write()
            .remove(session_id)
            .ok_or_else(|| VectorQuoteError::SessionNotFound(session_id.to_string()))?;

        if let Some(task) = session.task {
            task.abort();
        }
        Ok(())
    }

    /// Drops every session untouched for longer than `ttl`.
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        match chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
        {
            Some(cutoff) => self.evict_before(cutoff),
            None => 0,
        }
    }

    fn evict_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| {
            if session.updated_at >= cutoff {
                return true;
            }
            if let Some(task) = session.task.take() {
                task.abort();
            }
            false
        });
        before - sessions.len()
    }

    /// Sweeps idle sessions in the background for as long as the runtime lives.
    pub fn spawn_sweeper(store: Arc<SessionStore>, ttl: Duration) -> JoinHandle<()> {
        let period = (ttl / 2).clamp(Duration::from_millis(10), Duration::from_secs(60));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(ttl);
                if evicted > 0 {
                    log::info!("Evicted {} idle session(s), {} remaining", evicted, store.len());
                }
            }
        })
    }

    /// Opens an order, replacing any order already open for the session.
    pub fn open_order(&self, session_id: &Uuid, order: Order) -> Result<Order, VectorQuoteError> {
        self.with_session(session_id, |session| {
            session.order = Some(order.clone());
            Ok(order)
        })
    }

    pub fn order(&self, session_id: &Uuid) -> Result<Order, VectorQuoteError> {
        let sessions = self.sessions.read();
        let session = sessions
            .get(session_id)
            .ok_or_else(|| VectorQuoteError::SessionNotFound(session_id.to_string()))?;
        session
            .order
            .clone()
            .ok_or_else(|| VectorQuoteError::OrderNotFound(session_id.to_string()))
    }

    /// Applies `f` to the open order and returns the updated copy.
    pub fn update_order<F>(&self, session_id: &Uuid, f: F) -> Result<Order, VectorQuoteError>
    where
        F: FnOnce(&mut Order) -> Result<(), VectorQuoteError>,
    {
        self.with_session(session_id, |session| {
            let order = session
                .order
                .as_mut()
                .ok_or_else(|| VectorQuoteError::OrderNotFound(session_id.to_string()))?;
            f(order)?;
            Ok(order.clone())
        })
    }

    pub fn close_order(&self, session_id: &Uuid) -> Result<Order, VectorQuoteError> {
        self.with_session(session_id, |session| {
            session
                .order
                .take()
                .ok_or_else(|| VectorQuoteError::OrderNotFound(session_id.to_string()))
        })
    }

    fn with_session<T, F>(&self, session_id: &Uuid, f: F) -> Result<T, VectorQuoteError>
    where
        F: FnOnce(&mut Session) -> Result<T, VectorQuoteError>,
    {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| VectorQuoteError::SessionNotFound(session_id.to_string()))?;
        let value = f(session)?;
        session.touch();
        Ok(value)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
