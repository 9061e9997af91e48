use chrono::NaiveDate;
use chrono::Utc;

use crate::state::Binder;
use crate::state::FontSpec;
use crate::state::Party;
use crate::state::PartyRole;
use crate::state::SignatureInput;
use crate::state::ValueKind;

/// How a `RemoveParty` caller identifies the target. The UI historically
/// sends either a bare id or the full `{id, reference}` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartyKey {
    Id(String),
    Full { id: String, reference: String },
}

impl PartyKey {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Full { id, .. } => id,
        }
    }

    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Full { reference, .. } => Some(reference),
        }
    }
}

/// Field-level merge payload for `UpdateParty`. `None` leaves the field
/// untouched; `Some` overwrites it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PartyPatch {
    pub id: Option<String>,
    pub legal_name: Option<String>,
    pub email: Option<String>,
    pub roles: Option<Vec<PartyRole>>,
    pub is_temporary: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BinderAction {
    /// Wholesale replace from the load boundary; runs the sort/index/color
    /// post-processing pipeline.
    ReplaceBinder(Binder),
    ClearBinder,

    AddInput {
        document_id: String,
        input: SignatureInput,
    },
    UpdateInput(SignatureInput),
    ToggleInputActiveness {
        input_id: String,
    },
    SetInputWarning {
        input_id: String,
    },
    ClearInputWarnings,
    RemoveInput {
        input_id: String,
    },
    RecordSignature {
        input_id: String,
        value: String,
        value_type: ValueKind,
        font: FontSpec,
        svg_data: Option<String>,
        signed_on: NaiveDate,
    },
    RecordDate {
        input_id: String,
        value: String,
    },
    RecordCustomText {
        input_id: String,
        value: String,
    },
    RemoveSignaturesForParty {
        reference: String,
    },

    UpdateDocumentName {
        document_id: String,
        name: String,
    },
    UpdateDocumentContent {
        document_id: String,
        content: String,
    },
    MarkPageLoaded {
        document_id: String,
        page_id: String,
    },

    AddParty(Party),
    UpdateParty {
        reference: String,
        patch: PartyPatch,
    },
    SwapPartyReferences {
        first_id: String,
        second_id: String,
    },
    RemoveParty(PartyKey),
    RemoveTemporaryParties,
}

impl BinderAction {
    /// `RecordSignature` with the signing date captured at creation time,
    /// keeping the reducer itself free of clock reads.
    pub fn record_signature(
        input_id: impl Into<String>,
        value: impl Into<String>,
        value_type: ValueKind,
        font: FontSpec,
        svg_data: Option<String>,
    ) -> Self {
        Self::RecordSignature {
            input_id: input_id.into(),
            value: value.into(),
            value_type,
            font,
            svg_data,
            signed_on: Utc::now().date_naive(),
        }
    }

    pub fn remove_party_by_id(id: impl Into<String>) -> Self {
        Self::RemoveParty(PartyKey::Id(id.into()))
    }

    pub fn remove_party(id: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::RemoveParty(PartyKey::Full {
            id: id.into(),
            reference: reference.into(),
        })
    }
}
