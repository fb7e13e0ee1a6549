//! Call-recording gateway for lifecycle tests.
//!
//! Keeps just enough state to behave like the remote system and records
//! every call in order, so tests can assert on call sequences. Faults are
//! injected through [`Faults`].

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use steward_gateway::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateParent(ResourceKind),
    GetParent(String),
    UpdateParent { id: String, token: String },
    DeleteParent(String),
    ListParents(Option<String>),
    ListMembership(Option<String>),
    Associate(Vec<String>),
    Disassociate(Vec<String>),
    ListTags(String),
    AddTags(Vec<Tag>),
    RemoveTags(Vec<String>),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::Associate(_) | Call::Disassociate(_) | Call::AddTags(_) | Call::RemoveTags(_)
        )
    }
}

#[derive(Debug, Default)]
pub struct Faults {
    /// URIs the remote refuses to associate.
    pub refuse_associate: BTreeSet<String>,
    /// Membership listing keeps returning the same cursor.
    pub repeat_membership_cursor: bool,
    /// Every update is answered with a stale-token rejection.
    pub stale_on_update: bool,
    pub fail_add_tags: Option<RemoteError>,
    pub fail_delete: Option<RemoteError>,
}

#[derive(Default)]
struct State {
    parents: HashMap<String, ParentRecord>,
    membership: HashMap<String, BTreeSet<String>>,
    tags: HashMap<String, BTreeMap<String, String>>,
    next_id: u32,
    next_token: u32,
}

pub struct MockGateway {
    state: Mutex<State>,
    calls: Mutex<Vec<Call>>,
    faults: Mutex<Faults>,
    membership_page: usize,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Self::with_membership_page(2)
    }

    pub fn with_membership_page(size: usize) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State::default()),
            calls: Mutex::new(Vec::new()),
            faults: Mutex::new(Faults::default()),
            membership_page: size,
        })
    }

    pub fn dyn_gateway(self: &Arc<Self>) -> DynGateway {
        self.clone()
    }

    pub fn faults(&self, configure: impl FnOnce(&mut Faults)) {
        configure(&mut self.faults.lock().unwrap());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(pred)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.state.lock().unwrap().parents.contains_key(id)
    }

    pub fn members(&self, id: &str) -> BTreeSet<String> {
        self.state
            .lock()
            .unwrap()
            .membership
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn tags_of(&self, id: &str) -> BTreeMap<String, String> {
        let state = self.state.lock().unwrap();
        let arn = &state.parents[id].arn;
        state.tags.get(arn).cloned().unwrap_or_default()
    }

    /// Inserts a parent directly, bypassing call recording.
    pub fn seed(
        &self,
        kind: ResourceKind,
        spec: Value,
        members: &[&str],
        tags: &[(&str, &str)],
    ) -> ParentRecord {
        let mut state = self.state.lock().unwrap();
        let record = new_record(&mut state, kind, spec);
        state.membership.insert(
            record.id.clone(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        state.tags.insert(
            record.arn.clone(),
            tags.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        record
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn new_record(state: &mut State, kind: ResourceKind, spec: Value) -> ParentRecord {
    state.next_id += 1;
    state.next_token += 1;
    let id = format!("{}-{}", kind.as_str(), state.next_id);
    let record = ParentRecord::new(
        id.clone(),
        format!("arn:mock:{kind}/{id}"),
        format!("tok-{}", state.next_token),
        kind,
        spec,
    );
    state.parents.insert(id, record.clone());
    record
}

fn offset_of(cursor: Option<&str>) -> usize {
    cursor
        .and_then(|c| c.strip_prefix('m'))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl RemoteGateway for MockGateway {
    async fn create_parent(
        &self,
        kind: ResourceKind,
        spec: &Value,
    ) -> RemoteResult<ParentRecord> {
        self.record(Call::CreateParent(kind));
        let mut state = self.state.lock().unwrap();
        let record = new_record(&mut state, kind, spec.clone());
        if kind == ResourceKind::ResourceSet {
            state.membership.insert(record.id.clone(), BTreeSet::new());
        }
        state.tags.insert(record.arn.clone(), BTreeMap::new());
        Ok(record)
    }

    async fn get_parent(&self, kind: ResourceKind, id: &str) -> RemoteResult<ParentRecord> {
        self.record(Call::GetParent(id.to_string()));
        self.state
            .lock()
            .unwrap()
            .parents
            .get(id)
            .cloned()
            .ok_or_else(|| RemoteError::not_found(kind.as_str(), id))
    }

    async fn update_parent(
        &self,
        kind: ResourceKind,
        id: &str,
        spec: &Value,
        update_token: &str,
    ) -> RemoteResult<ParentRecord> {
        self.record(Call::UpdateParent {
            id: id.to_string(),
            token: update_token.to_string(),
        });
        if self.faults.lock().unwrap().stale_on_update {
            return Err(RemoteError::stale_token(id, update_token));
        }
        let mut state = self.state.lock().unwrap();
        state.next_token += 1;
        let token = format!("tok-{}", state.next_token);
        let record = state
            .parents
            .get_mut(id)
            .ok_or_else(|| RemoteError::not_found(kind.as_str(), id))?;
        if record.update_token != update_token {
            return Err(RemoteError::stale_token(id, update_token));
        }
        record.spec = spec.clone();
        record.update_token = token;
        Ok(record.clone())
    }

    async fn delete_parent(&self, kind: ResourceKind, id: &str) -> Result<(), RemoteError> {
        self.record(Call::DeleteParent(id.to_string()));
        if let Some(err) = self.faults.lock().unwrap().fail_delete.clone() {
            return Err(err);
        }
        let mut state = self.state.lock().unwrap();
        let record = state
            .parents
            .remove(id)
            .ok_or_else(|| RemoteError::not_found(kind.as_str(), id))?;
        state.membership.remove(id);
        state.tags.remove(&record.arn);
        Ok(())
    }

    async fn list_parents(
        &self,
        kind: ResourceKind,
        cursor: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<Page<ParentSummary>, RemoteError> {
        self.record(Call::ListParents(cursor.map(String::from)));
        let state = self.state.lock().unwrap();
        let mut all: Vec<ParentSummary> = state
            .parents
            .values()
            .filter(|r| r.kind == kind)
            .map(ParentSummary::from)
            .collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));

        let size = page_size.unwrap_or(100) as usize;
        let offset = offset_of(cursor);
        let items: Vec<_> = all.iter().skip(offset).take(size).cloned().collect();
        if offset + size < all.len() {
            Ok(Page::with_cursor(items, format!("m{}", offset + size)))
        } else {
            Ok(Page::last(items))
        }
    }

    async fn list_membership(
        &self,
        id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<String>, RemoteError> {
        self.record(Call::ListMembership(cursor.map(String::from)));
        if self.faults.lock().unwrap().repeat_membership_cursor {
            return Ok(Page::with_cursor(vec!["arn:loop".to_string()], "m1"));
        }
        let state = self.state.lock().unwrap();
        let members = state
            .membership
            .get(id)
            .ok_or_else(|| RemoteError::not_found("resource-set", id))?;
        let offset = offset_of(cursor);
        let items: Vec<String> = members
            .iter()
            .skip(offset)
            .take(self.membership_page)
            .cloned()
            .collect();
        if offset + self.membership_page < members.len() {
            Ok(Page::with_cursor(
                items,
                format!("m{}", offset + self.membership_page),
            ))
        } else {
            Ok(Page::with_cursor(items, ""))
        }
    }

    async fn associate_items(
        &self,
        id: &str,
        items: &[String],
    ) -> Result<BatchOutcome, RemoteError> {
        self.record(Call::Associate(items.to_vec()));
        let refused = self.faults.lock().unwrap().refuse_associate.clone();
        let mut state = self.state.lock().unwrap();
        let members = state.membership.entry(id.to_string()).or_default();
        let mut outcome = BatchOutcome::succeeded();
        for item in items {
            if refused.contains(item) {
                outcome
                    .failed_items
                    .push(FailedItem::new(item.clone(), "RESOURCE_NOT_SUPPORTED"));
            } else {
                members.insert(item.clone());
            }
        }
        Ok(outcome)
    }

    async fn disassociate_items(
        &self,
        id: &str,
        items: &[String],
    ) -> Result<BatchOutcome, RemoteError> {
        self.record(Call::Disassociate(items.to_vec()));
        let mut state = self.state.lock().unwrap();
        if let Some(members) = state.membership.get_mut(id) {
            for item in items {
                members.remove(item);
            }
        }
        Ok(BatchOutcome::succeeded())
    }

    async fn list_tags(&self, arn: &str) -> Result<Vec<Tag>, RemoteError> {
        self.record(Call::ListTags(arn.to_string()));
        let state = self.state.lock().unwrap();
        let tags = state
            .tags
            .get(arn)
            .ok_or_else(|| RemoteError::not_found("arn", arn))?;
        Ok(tags.iter().map(|(k, v)| Tag::new(k, v)).collect())
    }

    async fn add_tags(&self, arn: &str, tags: &[Tag]) -> Result<(), RemoteError> {
        self.record(Call::AddTags(tags.to_vec()));
        if let Some(err) = self.faults.lock().unwrap().fail_add_tags.clone() {
            return Err(err);
        }
        let mut state = self.state.lock().unwrap();
        let current = state.tags.entry(arn.to_string()).or_default();
        for tag in tags {
            current.insert(tag.key.clone(), tag.value.clone());
        }
        Ok(())
    }

    async fn remove_tags(&self, arn: &str, keys: &[String]) -> Result<(), RemoteError> {
        self.record(Call::RemoveTags(keys.to_vec()));
        let mut state = self.state.lock().unwrap();
        if let Some(current) = state.tags.get_mut(arn) {
            for key in keys {
                current.remove(key);
            }
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
