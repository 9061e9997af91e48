use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinderStatus {
    InPreparation,
    ReviewAndShare,
    SignInProgress,
    SignCompleted,
}

impl BinderStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::InPreparation => "IN_PREPARATION",
            Self::ReviewAndShare => "REVIEW_AND_SHARE",
            Self::SignInProgress => "SIGN_IN_PROGRESS",
            Self::SignCompleted => "SIGN_COMPLETED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputKind {
    SignatureText,
    Initials,
    DateSigned,
    CustomText,
}

impl InputKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::SignatureText => "SIGNATURE_TEXT",
            Self::Initials => "INITIALS",
            Self::DateSigned => "DATE_SIGNED",
            Self::CustomText => "CUSTOM_TEXT",
        }
    }

    /// Kinds whose value is entered by the party itself during signing.
    pub fn is_signature_like(self) -> bool {
        matches!(
            self,
            Self::SignatureText | Self::Initials | Self::CustomText
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueKind {
    Text,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputStatus {
    Pending,
    Declined,
    Completed,
}

impl InputStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Declined => "DECLINED",
            Self::Completed => "COMPLETED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionKind {
    Absolute,
    Placeholder,
    Sticky,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizingUnit {
    Pixel,
    Percent,
}

/// Where an input sits on a document. `page_id` is a lookup key into the
/// owning document's pages, not an owning reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputPosition {
    pub kind: PositionKind,
    pub page_id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub alignment: Alignment,
    pub unit: SizingUnit,
}

impl InputPosition {
    pub fn absolute(page_id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            kind: PositionKind::Absolute,
            page_id: Some(page_id.into()),
            x,
            y,
            alignment: Alignment::Left,
            unit: SizingUnit::Pixel,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            kind: PositionKind::Placeholder,
            page_id: None,
            x: 0.0,
            y: 0.0,
            alignment: Alignment::Left,
            unit: SizingUnit::Pixel,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: u16,
    pub color: String,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: u16, color: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            size,
            color: color.into(),
        }
    }

    /// Font used for an auto-filled date stamp: fixed face, the color is
    /// inherited from the signature it accompanies.
    pub fn date_font_from(signature_font: &FontSpec) -> Self {
        Self {
            family: "Courier".to_string(),
            size: 12,
            color: signature_font.color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureInput {
    pub id: String,
    pub kind: InputKind,
    /// Weak key into `Binder::parties` by `Party::reference`.
    pub party_reference: String,
    pub value: Option<String>,
    pub value_type: Option<ValueKind>,
    pub svg_data: Option<String>,
    pub font: Option<FontSpec>,
    pub position: InputPosition,
    pub optional: bool,
    pub status: InputStatus,
    #[serde(skip)]
    pub active: bool,
    #[serde(skip)]
    pub warning: bool,
    #[serde(skip)]
    pub is_fresh: bool,
}

impl SignatureInput {
    pub fn new(
        id: impl Into<String>,
        kind: InputKind,
        party_reference: impl Into<String>,
        position: InputPosition,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            party_reference: party_reference.into(),
            value: None,
            value_type: None,
            svg_data: None,
            font: None,
            position,
            optional: false,
            status: InputStatus::Pending,
            active: false,
            warning: false,
            is_fresh: false,
        }
    }

    pub fn has_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub loaded: bool,
}

impl Page {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            loaded: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub content_type: String,
    pub content: Option<String>,
    pub pages: Vec<Page>,
    pub inputs: Vec<SignatureInput>,
}

impl Document {
    pub fn has_page(&self, page_id: &str) -> bool {
        self.pages.iter().any(|page| page.id == page_id)
    }

    pub fn page_index(&self, page_id: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.id == page_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyRole {
    Owner,
    Signer,
    Viewer,
    Payer,
    Payee,
    Notary,
}

impl PartyRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Signer => "SIGNER",
            Self::Viewer => "VIEWER",
            Self::Payer => "PAYER",
            Self::Payee => "PAYEE",
            Self::Notary => "NOTARY",
        }
    }
}

/// Derived per-party progress; computed by selectors, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyStatus {
    Signed,
    Declined,
    Viewed,
    Invited,
}

impl PartyStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Signed => "SIGNED",
            Self::Declined => "DECLINED",
            Self::Viewed => "VIEWED",
            Self::Invited => "INVITED",
        }
    }
}

/// Per-party client-side bookkeeping. Travels with the reference during a
/// reference swap, so input assignments keep their display identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartyMeta {
    pub color: Option<String>,
    pub missing_legal_name_index: Option<u32>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// Assigned by the external system; absent until the party is persisted.
    pub id: Option<String>,
    /// Stable client-side identity key. Inputs point here, not at `id`.
    pub reference: String,
    pub legal_name: Option<String>,
    pub email: Option<String>,
    pub roles: Vec<PartyRole>,
    #[serde(default)]
    pub is_temporary: bool,
    #[serde(default)]
    pub email_changed: bool,
    #[serde(default)]
    pub meta: PartyMeta,
}

impl Party {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            id: None,
            reference: reference.into(),
            legal_name: None,
            email: None,
            roles: Vec::new(),
            is_temporary: false,
            email_changed: false,
            meta: PartyMeta::default(),
        }
    }

    pub fn with_role(mut self, role: PartyRole) -> Self {
        self.add_role(role);
        self
    }

    pub fn add_role(&mut self, role: PartyRole) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
    }

    pub fn remove_role(&mut self, role: PartyRole) {
        self.roles.retain(|held| *held != role);
    }

    pub fn has_role(&self, role: PartyRole) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestKind {
    Cancellation,
    Decline,
    Finalisation,
}

/// Historical workflow event attached to the binder by the external system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRequest {
    pub id: String,
    pub kind: RequestKind,
    pub actor_reference: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binder {
    pub id: String,
    pub status: BinderStatus,
    pub created_at: DateTime<Utc>,
    /// Display format for auto-filled dates, in DD/MM/YYYY-style tokens.
    pub date_format: String,
    pub documents: Vec<Document>,
    pub parties: Vec<Party>,
    pub requests: Vec<HistoricalRequest>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl Binder {
    /// The unique OWNER party. The reducer preserves this invariant; a
    /// snapshot without an owner is a collaborator contract violation.
    pub fn owner(&self) -> Option<&Party> {
        self.parties.iter().find(|party| party.has_role(PartyRole::Owner))
    }

    pub fn party_by_reference(&self, reference: &str) -> Option<&Party> {
        self.parties.iter().find(|party| party.reference == reference)
    }

    pub fn party_by_id(&self, id: &str) -> Option<&Party> {
        self.parties
            .iter()
            .find(|party| party.id.as_deref() == Some(id))
    }

    pub fn document_of_input(&self, input_id: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|doc| doc.inputs.iter().any(|input| input.id == input_id))
    }

    pub fn input(&self, input_id: &str) -> Option<&SignatureInput> {
        self.documents
            .iter()
            .flat_map(|doc| doc.inputs.iter())
            .find(|input| input.id == input_id)
    }
}

/// Identity handed in by the authentication layer. The core only consumes
/// the party id; it never manages sessions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthInfo {
    pub party_id: Option<String>,
}

/// Render a moment-style date format (DD, MM, YYYY, YY tokens) for a date.
/// Unknown tokens and literal `%` pass through untouched; `date_format`
/// arrives from the load boundary, so it must never be able to break
/// formatting.
pub fn format_signing_date(date: chrono::NaiveDate, date_format: &str) -> String {
    let strftime = date_format
        .replace('%', "%%")
        .replace("YYYY", "%Y")
        .replace("YY", "%y")
        .replace("MM", "%m")
        .replace("DD", "%d");
    date.format(&strftime).to_string()
}
