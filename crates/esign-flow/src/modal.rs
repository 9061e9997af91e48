use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tracing::warn;

/// Closed set of modal screens in the signing workspace. Each maps to the
/// string key the view layer registers under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Action,
    HowItWorks,
    AddSignerData,
    EditSigners,
    InviteSigners,
    InviteSent,
    FinalizeConfirm,
    FinalizeProgress,
    FinalizeSuccess,
    CancelSigning,
    DeclineSigning,
    DeclineSent,
    SaveProgress,
    SignatureCapture,
    SignatureSaved,
    PaymentCreator,
    PaymentSelectRole,
    PaymentPayer,
    PaymentPayee,
    PaymentSummary,
    DownloadDocument,
    RenameDocument,
    RemoveDocumentConfirm,
    OwnerTransfer,
    SessionExpired,
}

impl Modal {
    pub fn key(self) -> &'static str {
        match self {
            Self::Action => "actionModal",
            Self::HowItWorks => "howItWorksModal",
            Self::AddSignerData => "addSignerDataModal",
            Self::EditSigners => "editSignersModal",
            Self::InviteSigners => "inviteSignersModal",
            Self::InviteSent => "inviteSentModal",
            Self::FinalizeConfirm => "finalizeConfirmModal",
            Self::FinalizeProgress => "finalizeProgressModal",
            Self::FinalizeSuccess => "finalizeSuccessModal",
            Self::CancelSigning => "cancelSigningModal",
            Self::DeclineSigning => "declineSigningModal",
            Self::DeclineSent => "declineSentModal",
            Self::SaveProgress => "saveProgressModal",
            Self::SignatureCapture => "signatureCaptureModal",
            Self::SignatureSaved => "signatureSavedModal",
            Self::PaymentCreator => "paymentCreatorModal",
            Self::PaymentSelectRole => "paymentSelectRoleModal",
            Self::PaymentPayer => "paymentPayerModal",
            Self::PaymentPayee => "paymentPayeeModal",
            Self::PaymentSummary => "paymentSummaryModal",
            Self::DownloadDocument => "downloadDocumentModal",
            Self::RenameDocument => "renameDocumentModal",
            Self::RemoveDocumentConfirm => "removeDocumentConfirmModal",
            Self::OwnerTransfer => "ownerTransferModal",
            Self::SessionExpired => "sessionExpiredModal",
        }
    }
}

/// Why a modal closed. Maps to a default transition key unless the closing
/// modal names an explicit target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    CompletedSuccessfully,
    UserTerminated,
    UserNavigatedBack,
    UserNavigatedNext,
}

impl CloseReason {
    pub fn default_transition_key(self) -> &'static str {
        match self {
            Self::UserNavigatedBack => "back",
            Self::UserNavigatedNext => "next",
            Self::CompletedSuccessfully | Self::UserTerminated => "end",
        }
    }
}

/// Payload accompanying a close or navigate event. `to` overrides the
/// reason-derived default transition key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseData {
    pub to: Option<String>,
}

impl CloseData {
    pub fn to(key: impl Into<String>) -> Self {
        Self {
            to: Some(key.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Show the target immediately.
    To(Modal),
    /// Hide now, show the target after the delay unless cancelled.
    Delayed { to: Modal, delay_ms: u64 },
    /// Explicit terminal: hide, no next step defined.
    End,
}

/// Static transition table: `(current modal, key) -> transition`. Keys are
/// either the well-known defaults (back/next/end) or explicit keys supplied
/// by the closing modal.
pub fn transitions(from: Modal) -> &'static [(&'static str, Transition)] {
    use Transition::Delayed;
    use Transition::End;
    use Transition::To;
    match from {
        Modal::Action => &[
            ("editSigners", To(Modal::EditSigners)),
            ("invite", To(Modal::InviteSigners)),
            ("finalize", To(Modal::FinalizeConfirm)),
            ("payments", To(Modal::PaymentCreator)),
            ("cancelSigning", To(Modal::CancelSigning)),
            ("declineSigning", To(Modal::DeclineSigning)),
            ("download", To(Modal::DownloadDocument)),
            ("howItWorks", To(Modal::HowItWorks)),
            ("ownerTransfer", To(Modal::OwnerTransfer)),
            ("end", End),
        ],
        Modal::HowItWorks => &[("back", To(Modal::Action)), ("end", End)],
        Modal::AddSignerData => &[
            ("back", To(Modal::EditSigners)),
            ("next", To(Modal::InviteSigners)),
            ("end", End),
        ],
        Modal::EditSigners => &[
            ("back", To(Modal::Action)),
            ("next", To(Modal::AddSignerData)),
            ("payments", To(Modal::PaymentCreator)),
            ("end", End),
        ],
        Modal::InviteSigners => &[
            ("back", To(Modal::EditSigners)),
            ("next", To(Modal::InviteSent)),
            ("signerDataMissing", To(Modal::AddSignerData)),
            ("end", End),
        ],
        Modal::InviteSent => &[
            ("end", Delayed {
                to: Modal::Action,
                delay_ms: 3000,
            }),
        ],
        Modal::FinalizeConfirm => &[
            ("back", To(Modal::Action)),
            ("next", To(Modal::FinalizeProgress)),
            ("signerDataMissing", To(Modal::AddSignerData)),
            ("end", End),
        ],
        Modal::FinalizeProgress => &[
            ("next", To(Modal::FinalizeSuccess)),
            ("end", End),
        ],
        Modal::FinalizeSuccess => &[
            ("end", Delayed {
                to: Modal::Action,
                delay_ms: 3000,
            }),
        ],
        Modal::CancelSigning => &[
            ("back", To(Modal::Action)),
            ("end", Delayed {
                to: Modal::Action,
                delay_ms: 3000,
            }),
        ],
        Modal::DeclineSigning => &[
            ("back", To(Modal::Action)),
            ("next", To(Modal::DeclineSent)),
            ("end", End),
        ],
        Modal::DeclineSent => &[("end", End)],
        Modal::SaveProgress => &[
            ("next", To(Modal::SignatureSaved)),
            ("end", End),
        ],
        Modal::SignatureCapture => &[
            ("next", To(Modal::SaveProgress)),
            ("end", End),
        ],
        Modal::SignatureSaved => &[
            ("end", Delayed {
                to: Modal::Action,
                delay_ms: 1500,
            }),
        ],
        Modal::PaymentCreator => &[
            ("back", To(Modal::Action)),
            ("next", To(Modal::PaymentSelectRole)),
            ("end", End),
        ],
        Modal::PaymentSelectRole => &[
            ("back", To(Modal::PaymentCreator)),
            // The chosen role decides which counterparty gets configured
            // next: a payee sets up who pays, and vice versa.
            ("payeeRole", To(Modal::PaymentPayer)),
            ("payerRole", To(Modal::PaymentPayee)),
            ("end", End),
        ],
        Modal::PaymentPayer => &[
            ("back", To(Modal::PaymentSelectRole)),
            ("next", To(Modal::PaymentSummary)),
            ("end", End),
        ],
        Modal::PaymentPayee => &[
            ("back", To(Modal::PaymentSelectRole)),
            ("next", To(Modal::PaymentSummary)),
            ("end", End),
        ],
        Modal::PaymentSummary => &[
            ("back", To(Modal::PaymentSelectRole)),
            ("next", To(Modal::Action)),
            ("end", End),
        ],
        Modal::DownloadDocument => &[("back", To(Modal::Action)), ("end", End)],
        Modal::RenameDocument => &[("end", End)],
        Modal::RemoveDocumentConfirm => &[("back", To(Modal::RenameDocument)), ("end", End)],
        Modal::OwnerTransfer => &[
            ("back", To(Modal::Action)),
            ("next", To(Modal::InviteSent)),
            ("end", End),
        ],
        Modal::SessionExpired => &[("end", End)],
    }
}

/// Handle guarding one scheduled delayed transition. A newer show/cancel
/// decision leaves the handle dangling, so a late timer cannot fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    pub to: Modal,
    pub delay_ms: u64,
    pub token: DelayToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Shown(Modal),
    Hidden,
    Scheduled(PendingTransition),
}

/// Tracks which modal is visible plus at most one pending delayed show.
/// Routing never fails: an unknown key logs the allowed keys and falls open
/// to "no modal".
#[derive(Debug, Default)]
pub struct ModalRouter {
    visible: Option<Modal>,
    pending: Option<PendingTransition>,
    next_token: u64,
}

impl ModalRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> Option<Modal> {
        self.visible
    }

    pub fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    /// Show immediately, dropping any outstanding delayed transition.
    pub fn show_now(&mut self, modal: Modal) {
        self.pending = None;
        self.visible = Some(modal);
    }

    pub fn hide(&mut self) {
        self.pending = None;
        self.visible = None;
    }

    pub fn cancel_delayed(&mut self) {
        self.pending = None;
    }

    /// Consult the transition table for `(from, key)` and apply the result.
    pub fn route(&mut self, from: Modal, key: &str) -> RouteOutcome {
        let transition = transitions(from)
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, transition)| *transition);
        let Some(transition) = transition else {
            let allowed: Vec<&str> = transitions(from)
                .iter()
                .map(|(candidate, _)| *candidate)
                .collect();
            warn!(
                modal = from.key(),
                key,
                ?allowed,
                "no transition registered for key, hiding modal"
            );
            self.hide();
            return RouteOutcome::Hidden;
        };
        match transition {
            Transition::To(next) => {
                self.show_now(next);
                RouteOutcome::Shown(next)
            }
            Transition::End => {
                self.hide();
                RouteOutcome::Hidden
            }
            Transition::Delayed { to, delay_ms } => {
                self.visible = None;
                let token = DelayToken(self.next_token);
                self.next_token += 1;
                let pending = PendingTransition {
                    to,
                    delay_ms,
                    token,
                };
                self.pending = Some(pending);
                RouteOutcome::Scheduled(pending)
            }
        }
    }

    /// Apply a previously scheduled transition. Returns false when the
    /// token was invalidated by a newer decision or already consumed.
    pub fn fire_delayed(&mut self, token: DelayToken) -> bool {
        match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                self.visible = Some(pending.to);
                true
            }
            _ => false,
        }
    }

    /// Resolve a modal's close event into a route: an explicit `data.to`
    /// wins over the reason-derived default key.
    pub fn close(
        &mut self,
        from: Modal,
        reason: CloseReason,
        data: Option<&CloseData>,
    ) -> RouteOutcome {
        let key = data
            .and_then(|data| data.to.as_deref())
            .unwrap_or_else(|| reason.default_transition_key());
        self.route(from, key)
    }
}

/// Thread-backed driver around [`ModalRouter`]: turns scheduled transitions
/// into real timers. The router's token check makes a timer that lost the
/// race a no-op.
#[derive(Clone, Default)]
pub struct ModalFlow {
    router: Arc<Mutex<ModalRouter>>,
}

impl ModalFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> Option<Modal> {
        self.router.lock().expect("modal router poisoned").visible()
    }

    pub fn show_now(&self, modal: Modal) {
        self.router
            .lock()
            .expect("modal router poisoned")
            .show_now(modal);
    }

    pub fn cancel_delayed(&self) {
        self.router
            .lock()
            .expect("modal router poisoned")
            .cancel_delayed();
    }

    pub fn close(&self, from: Modal, reason: CloseReason, data: Option<&CloseData>) {
        let outcome = self
            .router
            .lock()
            .expect("modal router poisoned")
            .close(from, reason, data);
        self.drive(outcome);
    }

    /// Navigate-intention event: the modal stays responsible for naming the
    /// target key.
    pub fn navigate(&self, from: Modal, to_key: &str) {
        let outcome = self
            .router
            .lock()
            .expect("modal router poisoned")
            .route(from, to_key);
        self.drive(outcome);
    }

    fn drive(&self, outcome: RouteOutcome) {
        if let RouteOutcome::Scheduled(pending) = outcome {
            let router = Arc::clone(&self.router);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(pending.delay_ms));
                router
                    .lock()
                    .expect("modal router poisoned")
                    .fire_delayed(pending.token);
            });
        }
    }
}
