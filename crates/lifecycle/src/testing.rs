//! In-memory cluster for tests.
//!
//! Available when running tests or when the `test-utils` feature is enabled.
//! [`FakeCluster`] records every call, applies mutations to its own index
//! table, and can be told to fail or hang on selected calls.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use esmaint_client::{
    ClientError, ClusterTransport, ElasticsearchIndex, ElasticsearchRecovery, FlatSettings,
    SettingsPatch,
};

/// A recorded transport call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListIndices,
    Open(String),
    Close(String),
    GetSettings(String),
    PutSettings(String, SettingsPatch),
    ForceMerge(String, u32),
    Delete(String),
    ListRecoveries,
}

impl Call {
    /// The index this call targets, if any.
    pub fn index(&self) -> Option<&str> {
        match self {
            Self::Open(index)
            | Self::Close(index)
            | Self::GetSettings(index)
            | Self::PutSettings(index, _)
            | Self::ForceMerge(index, _)
            | Self::Delete(index) => Some(index),
            Self::ListIndices | Self::ListRecoveries => None,
        }
    }
}

/// State of one fake index.
#[derive(Debug, Clone, Default)]
pub struct FakeIndex {
    pub open: bool,
    pub merged: bool,
    pub settings: FlatSettings,
}

type Matcher = Box<dyn Fn(&Call) -> bool + Send + Sync>;

#[derive(Default)]
struct State {
    indices: BTreeMap<String, FakeIndex>,
    recoveries: VecDeque<Vec<ElasticsearchRecovery>>,
    calls: Vec<Call>,
    failures: Vec<Matcher>,
    hangs: Vec<Matcher>,
}

/// In-memory [`ClusterTransport`].
#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<State>>,
}

impl std::fmt::Debug for FakeCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeCluster")
            .field("indices", &self.lock().indices.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add an open, unmerged index with default settings.
    pub fn with_index(self, name: &str) -> Self {
        self.with_index_state(
            name,
            FakeIndex {
                open: true,
                ..FakeIndex::default()
            },
        )
    }

    pub fn with_index_state(self, name: &str, index: FakeIndex) -> Self {
        self.lock().indices.insert(name.to_string(), index);
        self
    }

    /// Queue the result of the next recovery poll. Polls past the queue see none.
    pub fn push_recoveries(&self, recoveries: Vec<ElasticsearchRecovery>) {
        self.lock().recoveries.push_back(recoveries);
    }

    /// Fail every call matching `matcher` with a server error.
    pub fn fail_when(&self, matcher: impl Fn(&Call) -> bool + Send + Sync + 'static) {
        self.lock().failures.push(Box::new(matcher));
    }

    /// Never complete calls matching `matcher`.
    pub fn hang_when(&self, matcher: impl Fn(&Call) -> bool + Send + Sync + 'static) {
        self.lock().hangs.push(Box::new(matcher));
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Calls that mutate the cluster, in order.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                !matches!(
                    call,
                    Call::ListIndices | Call::GetSettings(_) | Call::ListRecoveries
                )
            })
            .collect()
    }

    pub fn index(&self, name: &str) -> Option<FakeIndex> {
        self.lock().indices.get(name).cloned()
    }

    /// Record `call` and decide its fate before any state change.
    async fn enter(&self, call: Call) -> Result<(), ClientError> {
        let (hang, fail) = {
            let mut state = self.lock();
            let hang = state.hangs.iter().any(|m| m(&call));
            let fail = state.failures.iter().any(|m| m(&call));
            state.calls.push(call.clone());
            (hang, fail)
        };
        if hang {
            std::future::pending::<()>().await;
        }
        if fail {
            return Err(ClientError::ApiError {
                status: 500,
                url: format!("fake://{}", call.index().unwrap_or("_cluster")),
                message: format!("injected failure for {call:?}"),
            });
        }
        Ok(())
    }

    fn with_existing<R>(
        &self,
        index: &str,
        f: impl FnOnce(&mut FakeIndex) -> R,
    ) -> Result<R, ClientError> {
        let mut state = self.lock();
        let entry = state
            .indices
            .get_mut(index)
            .ok_or_else(|| ClientError::ApiError {
                status: 404,
                url: format!("fake://{index}"),
                message: format!("index_not_found_exception: no such index [{index}]"),
            })?;
        Ok(f(entry))
    }
}

impl ClusterTransport for FakeCluster {
    async fn list_indices(&self) -> Result<Vec<ElasticsearchIndex>, ClientError> {
        self.enter(Call::ListIndices).await?;
        let state = self.lock();
        Ok(state
            .indices
            .iter()
            .map(|(name, index)| ElasticsearchIndex {
                name: name.clone(),
                open: index.open,
                merged: index.merged,
            })
            .collect())
    }

    async fn open_index(&self, index: &str) -> Result<(), ClientError> {
        self.enter(Call::Open(index.to_string())).await?;
        self.with_existing(index, |entry| entry.open = true)
    }

    async fn close_index(&self, index: &str) -> Result<(), ClientError> {
        self.enter(Call::Close(index.to_string())).await?;
        self.with_existing(index, |entry| entry.open = false)
    }

    async fn get_settings(&self, index: &str) -> Result<Option<FlatSettings>, ClientError> {
        self.enter(Call::GetSettings(index.to_string())).await?;
        Ok(self.lock().indices.get(index).map(|entry| entry.settings.clone()))
    }

    async fn put_settings(&self, index: &str, patch: &SettingsPatch) -> Result<(), ClientError> {
        self.enter(Call::PutSettings(index.to_string(), patch.clone()))
            .await?;
        self.with_existing(index, |entry| entry.settings.apply(patch))
    }

    async fn force_merge(&self, index: &str, max_num_segments: u32) -> Result<(), ClientError> {
        self.enter(Call::ForceMerge(index.to_string(), max_num_segments))
            .await?;
        self.with_existing(index, |entry| entry.merged = true)
    }

    async fn delete_index(&self, index: &str) -> Result<(), ClientError> {
        self.enter(Call::Delete(index.to_string())).await?;
        self.with_existing(index, |_| ())?;
        self.lock().indices.remove(index);
        Ok(())
    }

    async fn list_active_recoveries(&self) -> Result<Vec<ElasticsearchRecovery>, ClientError> {
        self.enter(Call::ListRecoveries).await?;
        Ok(self.lock().recoveries.pop_front().unwrap_or_default())
    }
}
