//! In-process stand-ins for the server and the error sink.

use crate::connectivity::ManualConnectivity;
use crate::db::BookmarkDb;
use crate::diagnostics::ErrorSink;
use crate::models::{BookmarkId, CollectionId};
use crate::remote::{BookmarkDto, BookmarkRequest, RemoteError, RemoteResult, RemoteService};
use crate::sync::BookmarkRepository;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(CollectionId),
    Create(String),
    Update(BookmarkId),
    Delete(BookmarkId),
    Favorite(BookmarkId, bool),
    Archive(BookmarkId, bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    List,
    Create,
    Update,
    Delete,
    Favorite,
    Archive,
}

impl Call {
    fn kind(&self) -> CallKind {
        match self {
            Call::List(_) => CallKind::List,
            Call::Create(_) => CallKind::Create,
            Call::Update(_) => CallKind::Update,
            Call::Delete(_) => CallKind::Delete,
            Call::Favorite(..) => CallKind::Favorite,
            Call::Archive(..) => CallKind::Archive,
        }
    }
}

struct ServerState {
    next_id: BookmarkId,
    records: BTreeMap<BookmarkId, BookmarkDto>,
    calls: Vec<Call>,
    failing: HashSet<CallKind>,
}

type Hook = Box<dyn FnOnce() + Send>;

/// A server kept in memory. Ids are handed out from 42 upwards.
pub struct FakeRemote {
    state: Mutex<ServerState>,
    hooks: Mutex<HashMap<CallKind, Hook>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ServerState {
                next_id: 42,
                records: BTreeMap::new(),
                calls: Vec::new(),
                failing: HashSet::new(),
            }),
            hooks: Mutex::new(HashMap::new()),
        }
    }

    /// Run `hook` once, inside the next call of `kind`, before it is served
    pub fn during(&self, kind: CallKind, hook: impl FnOnce() + Send + 'static) {
        self.hooks.lock().unwrap().insert(kind, Box::new(hook));
    }

    pub fn seed(&self, dto: BookmarkDto) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(dto.id + 1);
        state.records.insert(dto.id, dto);
    }

    pub fn record(&self, id: BookmarkId) -> Option<BookmarkDto> {
        self.state.lock().unwrap().records.get(&id).cloned()
    }

    pub fn record_count(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn fail(&self, kind: CallKind) {
        self.state.lock().unwrap().failing.insert(kind);
    }

    pub fn fail_all(&self) {
        use CallKind::*;
        let mut state = self.state.lock().unwrap();
        state
            .failing
            .extend([List, Create, Update, Delete, Favorite, Archive]);
    }

    pub fn heal(&self) {
        self.state.lock().unwrap().failing.clear();
    }

    fn begin(&self, call: Call) -> RemoteResult<std::sync::MutexGuard<'_, ServerState>> {
        let kind = call.kind();
        let hook = self.hooks.lock().unwrap().remove(&kind);
        if let Some(hook) = hook {
            hook();
        }
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing.contains(&kind) {
            return Err(RemoteError::Status {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(state)
    }
}

fn not_found() -> RemoteError {
    RemoteError::Status {
        status: 404,
        message: "not found".to_string(),
    }
}

fn apply_request(dto: &mut BookmarkDto, request: &BookmarkRequest) {
    dto.collection_id = request.collection_id;
    dto.title = request.title.clone();
    dto.url = request.url.clone();
    dto.description = request.description.clone();
    dto.tags = request.tags.clone();
    dto.favicon_url = request.favicon_url.clone();
    dto.image_url = request.image_url.clone();
    dto.is_favorite = request.is_favorite;
    dto.is_archived = request.is_archived;
    dto.last_opened = request.last_opened;
    dto.open_count = Some(request.open_count);
}

pub fn dto(id: BookmarkId, collection_id: CollectionId, title: &str) -> BookmarkDto {
    BookmarkDto {
        id,
        collection_id: Some(collection_id),
        title: title.to_string(),
        url: format!("https://server.io/{}", id),
        description: None,
        favicon_url: None,
        image_url: None,
        is_favorite: false,
        is_archived: false,
        tags: Vec::new(),
        created_at: Some(1_000),
        updated_at: Some(1_000),
        last_opened: None,
        open_count: None,
    }
}

impl RemoteService for FakeRemote {
    fn list(&self, collection_id: CollectionId) -> RemoteResult<Vec<BookmarkDto>> {
        let state = self.begin(Call::List(collection_id))?;
        Ok(state
            .records
            .values()
            .filter(|dto| dto.collection_id == Some(collection_id))
            .cloned()
            .collect())
    }

    fn create(&self, request: &BookmarkRequest) -> RemoteResult<BookmarkDto> {
        let mut state = self.begin(Call::Create(request.title.clone()))?;
        let id = state.next_id;
        state.next_id += 1;

        let mut created = dto(id, 0, "");
        apply_request(&mut created, request);
        state.records.insert(id, created.clone());
        Ok(created)
    }

    fn update(&self, id: BookmarkId, request: &BookmarkRequest) -> RemoteResult<BookmarkDto> {
        let mut state = self.begin(Call::Update(id))?;
        let record = state.records.get_mut(&id).ok_or_else(not_found)?;
        apply_request(record, request);
        Ok(record.clone())
    }

    fn delete(&self, id: BookmarkId) -> RemoteResult<()> {
        let mut state = self.begin(Call::Delete(id))?;
        state.records.remove(&id).map(|_| ()).ok_or_else(not_found)
    }

    fn update_favorite(&self, id: BookmarkId, value: bool) -> RemoteResult<()> {
        let mut state = self.begin(Call::Favorite(id, value))?;
        let record = state.records.get_mut(&id).ok_or_else(not_found)?;
        record.is_favorite = value;
        Ok(())
    }

    fn update_archive(&self, id: BookmarkId, value: bool) -> RemoteResult<()> {
        let mut state = self.begin(Call::Archive(id, value))?;
        let record = state.records.get_mut(&id).ok_or_else(not_found)?;
        record.is_archived = value;
        Ok(())
    }
}

/// Keeps every recorded failure message
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

impl ErrorSink for RecordingSink {
    fn record(&self, context: &str, error: &dyn std::error::Error) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("{}: {}", context, error));
    }
}

/// A repository wired to an in-memory store and the fake server
pub struct Harness {
    pub repo: BookmarkRepository,
    pub db: Arc<BookmarkDb>,
    pub remote: Arc<FakeRemote>,
    pub net: Arc<ManualConnectivity>,
    pub sink: Arc<RecordingSink>,
}

impl Harness {
    pub fn new(online: bool) -> Self {
        let db = Arc::new(BookmarkDb::init_in_memory().unwrap());
        let remote = Arc::new(FakeRemote::new());
        let net = Arc::new(ManualConnectivity::new(online));
        let sink = Arc::new(RecordingSink::default());
        let repo = BookmarkRepository::new(db.clone(), remote.clone(), net.clone())
            .with_error_sink(sink.clone());
        Self {
            repo,
            db,
            remote,
            net,
            sink,
        }
    }
}
