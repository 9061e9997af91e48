pub(super) use super::reduce;
pub(super) use crate::actions::BinderAction;
pub(super) use crate::actions::PartyKey;
pub(super) use crate::actions::PartyPatch;
pub(super) use crate::state::Binder;
pub(super) use crate::state::BinderStatus;
pub(super) use crate::state::Document;
pub(super) use crate::state::FontSpec;
pub(super) use crate::state::InputKind;
pub(super) use crate::state::InputPosition;
pub(super) use crate::state::InputStatus;
pub(super) use crate::state::Page;
pub(super) use crate::state::Party;
pub(super) use crate::state::PartyRole;
pub(super) use crate::state::SignatureInput;
pub(super) use crate::state::ValueKind;

mod input_actions;

pub(super) const OWNER_REF: &str = "owner-ref";
pub(super) const SIGNER_REF: &str = "signer-ref";

fn owner() -> Party {
    let mut party = Party::new(OWNER_REF)
        .with_role(PartyRole::Owner)
        .with_role(PartyRole::Signer);
    party.id = Some("party-owner".to_string());
    party.legal_name = Some("O. Owner".to_string());
    party.email = Some("owner@example.com".to_string());
    party
}

fn signer(reference: &str, id: &str) -> Party {
    let mut party = Party::new(reference).with_role(PartyRole::Signer);
    party.id = Some(id.to_string());
    party.legal_name = Some("S. Signer".to_string());
    party.email = Some("signer@example.com".to_string());
    party
}

fn document(id: &str, pages: &[&str]) -> Document {
    Document {
        id: id.to_string(),
        name: format!("{id}.pdf"),
        content_type: "application/pdf".to_string(),
        content: None,
        pages: pages.iter().map(|page| Page::new(*page)).collect(),
        inputs: Vec::new(),
    }
}

fn input(id: &str, kind: InputKind, reference: &str, page: &str, y: f64) -> SignatureInput {
    SignatureInput::new(id, kind, reference, InputPosition::absolute(page, 10.0, y))
}

fn binder() -> Binder {
    let mut doc = document("doc-1", &["page-1", "page-2"]);
    doc.inputs = vec![
        input("in-sig", InputKind::SignatureText, SIGNER_REF, "page-1", 100.0),
        input("in-date", InputKind::DateSigned, SIGNER_REF, "page-1", 120.0),
        input("in-owner", InputKind::SignatureText, OWNER_REF, "page-2", 40.0),
    ];
    Binder {
        id: "binder-1".to_string(),
        status: BinderStatus::InPreparation,
        created_at: chrono::DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc),
        date_format: "DD/MM/YYYY".to_string(),
        documents: vec![doc],
        parties: vec![owner(), signer(SIGNER_REF, "party-signer")],
        requests: Vec::new(),
        meta: Default::default(),
    }
}

fn apply(state: &Binder, action: BinderAction) -> Binder {
    reduce(Some(state), &action).expect("reducer dropped state")
}

fn font(color: &str) -> FontSpec {
    FontSpec::new("Caveat", 24, color)
}

fn signed_on(year: i32, month: u32, day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
