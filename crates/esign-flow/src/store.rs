use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::sync::Arc;
use std::sync::Mutex;

use esign_core::actions::BinderAction;
use esign_core::reducer::reduce;
use esign_core::state::Binder;

type Subscriber = Arc<dyn Fn(Option<&Binder>) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Process-wide state container: one writer path (`dispatch`), many readers.
/// Dispatch is serialized behind a mutex so the single-writer guarantee
/// holds on multithreaded targets too; the lock is released before
/// subscribers run, so a subscriber may dispatch reentrantly and its nested
/// cycle completes before the outer notification loop resumes.
pub struct Store {
    state: Mutex<Option<Binder>>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    watchers: Mutex<Vec<mpsc::Sender<Option<Binder>>>>,
    next_subscription: AtomicU64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            subscribers: Mutex::new(Vec::new()),
            watchers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Current snapshot. Cloned out so readers can never observe a
    /// half-applied dispatch.
    pub fn get_state(&self) -> Option<Binder> {
        self.state.lock().expect("state mutex poisoned").clone()
    }

    pub fn dispatch(&self, action: BinderAction) {
        let snapshot = {
            let mut state = self.state.lock().expect("state mutex poisoned");
            *state = reduce(state.as_ref(), &action);
            state.clone()
        };
        tracing::debug!(action = action_name(&action), "binder action dispatched");

        let subscribers: Vec<(SubscriptionId, Subscriber)> = self
            .subscribers
            .lock()
            .expect("subscriber mutex poisoned")
            .clone();
        for (_, subscriber) in &subscribers {
            subscriber(snapshot.as_ref());
        }

        let mut watchers = self.watchers.lock().expect("watcher mutex poisoned");
        watchers.retain(|sender| sender.send(snapshot.clone()).is_ok());
    }

    /// Register a callback notified after every dispatch, in subscription
    /// order.
    pub fn subscribe(
        &self,
        subscriber: impl Fn(Option<&Binder>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .expect("subscriber mutex poisoned")
            .push((id, Arc::new(subscriber)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .lock()
            .expect("subscriber mutex poisoned")
            .retain(|(held, _)| *held != id);
    }

    /// Observable-state variant: a channel receiving every snapshot produced
    /// by subsequent dispatches. Dropped receivers are pruned lazily.
    pub fn watch(&self) -> mpsc::Receiver<Option<Binder>> {
        let (sender, receiver) = mpsc::channel();
        self.watchers
            .lock()
            .expect("watcher mutex poisoned")
            .push(sender);
        receiver
    }
}

fn action_name(action: &BinderAction) -> &'static str {
    match action {
        BinderAction::ReplaceBinder(_) => "replace_binder",
        BinderAction::ClearBinder => "clear_binder",
        BinderAction::AddInput { .. } => "add_input",
        BinderAction::UpdateInput(_) => "update_input",
        BinderAction::ToggleInputActiveness { .. } => "toggle_input_activeness",
        BinderAction::SetInputWarning { .. } => "set_input_warning",
        BinderAction::ClearInputWarnings => "clear_input_warnings",
        BinderAction::RemoveInput { .. } => "remove_input",
        BinderAction::RecordSignature { .. } => "record_signature",
        BinderAction::RecordDate { .. } => "record_date",
        BinderAction::RecordCustomText { .. } => "record_custom_text",
        BinderAction::RemoveSignaturesForParty { .. } => "remove_signatures_for_party",
        BinderAction::UpdateDocumentName { .. } => "update_document_name",
        BinderAction::UpdateDocumentContent { .. } => "update_document_content",
        BinderAction::MarkPageLoaded { .. } => "mark_page_loaded",
        BinderAction::AddParty(_) => "add_party",
        BinderAction::UpdateParty { .. } => "update_party",
        BinderAction::SwapPartyReferences { .. } => "swap_party_references",
        BinderAction::RemoveParty(_) => "remove_party",
        BinderAction::RemoveTemporaryParties => "remove_temporary_parties",
    }
}
