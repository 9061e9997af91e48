use std::cmp::Ordering;

use crate::state::AuthInfo;
use crate::state::Binder;
use crate::state::InputStatus;
use crate::state::Party;
use crate::state::PartyRole;
use crate::state::PartyStatus;
use crate::state::PositionKind;
use crate::state::RequestKind;
use crate::state::SignatureInput;

/// Every input across every document, insertion order preserved.
pub fn all_inputs(binder: &Binder) -> impl Iterator<Item = &SignatureInput> {
    binder.documents.iter().flat_map(|doc| doc.inputs.iter())
}

pub fn inputs_for_page<'a>(
    binder: &'a Binder,
    page_id: &'a str,
) -> impl Iterator<Item = &'a SignatureInput> {
    all_inputs(binder).filter(move |input| input.position.page_id.as_deref() == Some(page_id))
}

pub fn inputs_for_party<'a>(
    binder: &'a Binder,
    reference: &'a str,
) -> impl Iterator<Item = &'a SignatureInput> {
    all_inputs(binder).filter(move |input| input.party_reference == reference)
}

/// The authenticated actor's party, if the auth layer handed us an id that
/// matches anyone in the binder.
pub fn current_party<'a>(binder: &'a Binder, auth: &AuthInfo) -> Option<&'a Party> {
    let party_id = auth.party_id.as_deref()?;
    binder.party_by_id(party_id)
}

pub fn party_has_role(party: &Party, role: PartyRole) -> bool {
    party.has_role(role)
}

pub fn party_has_any_role(party: &Party, roles: &[PartyRole]) -> bool {
    roles.iter().any(|role| party.has_role(*role))
}

pub fn party_has_all_roles(party: &Party, roles: &[PartyRole]) -> bool {
    roles.iter().all(|role| party.has_role(*role))
}

pub fn party_by_role(binder: &Binder, role: PartyRole) -> Option<&Party> {
    binder.parties.iter().find(|party| party.has_role(role))
}

/// First party matching the highest-priority role in `hierarchy`.
pub fn party_by_role_hierarchy<'a>(
    binder: &'a Binder,
    hierarchy: &[PartyRole],
) -> Option<&'a Party> {
    hierarchy
        .iter()
        .find_map(|role| party_by_role(binder, *role))
}

/// Sort key for page order: the index of the input's page within the first
/// document's page list, then the vertical offset. Inputs on pages outside
/// `documents[0]` sort last; cross-document ordering is not a contract this
/// key defines.
pub fn input_position_key(binder: &Binder, input: &SignatureInput) -> (usize, f64) {
    let page_index = input
        .position
        .page_id
        .as_deref()
        .and_then(|page_id| {
            binder
                .documents
                .first()
                .and_then(|doc| doc.page_index(page_id))
        })
        .unwrap_or(usize::MAX);
    (page_index, input.position.y)
}

pub fn compare_position_keys(a: (usize, f64), b: (usize, f64)) -> Ordering {
    a.0.cmp(&b.0)
        .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
}

/// Top-to-bottom comparator over inputs; ties resolve equal.
pub fn compare_inputs_top_to_bottom(
    a: &SignatureInput,
    b: &SignatureInput,
    binder: &Binder,
) -> Ordering {
    compare_position_keys(input_position_key(binder, a), input_position_key(binder, b))
}

/// Inputs the current party can fill right now: theirs, concretely placed,
/// and not yet completed.
pub fn editable_inputs<'a>(binder: &'a Binder, auth: &AuthInfo) -> Vec<&'a SignatureInput> {
    let Some(party) = current_party(binder, auth) else {
        return Vec::new();
    };
    inputs_for_party(binder, &party.reference)
        .filter(|input| input.position.kind == PositionKind::Absolute)
        .filter(|input| {
            matches!(input.status, InputStatus::Pending | InputStatus::Declined)
        })
        .collect()
}

/// True when any non-notary party still lacks a legal name or email.
pub fn is_signer_data_missing(binder: &Binder) -> bool {
    binder
        .parties
        .iter()
        .filter(|party| !party.has_role(PartyRole::Notary))
        .any(|party| {
            party
                .legal_name
                .as_deref()
                .map_or(true, |name| name.trim().is_empty())
                || party
                    .email
                    .as_deref()
                    .map_or(true, |email| email.trim().is_empty())
        })
}

pub fn binder_has_inputs(binder: &Binder) -> bool {
    all_inputs(binder).next().is_some()
}

/// Mandatory inputs assigned to one party.
pub fn mandatory_input_count(binder: &Binder, reference: &str) -> usize {
    inputs_for_party(binder, reference)
        .filter(|input| !input.optional)
        .count()
}

/// Mandatory inputs one party has completed.
pub fn completed_input_count(binder: &Binder, reference: &str) -> usize {
    inputs_for_party(binder, reference)
        .filter(|input| !input.optional && input.status == InputStatus::Completed)
        .count()
}

/// A party has signed once every mandatory input of theirs is completed and
/// there was at least one to complete.
pub fn party_has_signed(binder: &Binder, reference: &str) -> bool {
    let mandatory = mandatory_input_count(binder, reference);
    mandatory > 0 && completed_input_count(binder, reference) == mandatory
}

pub fn user_has_signed(binder: &Binder, auth: &AuthInfo) -> bool {
    current_party(binder, auth)
        .is_some_and(|party| party_has_signed(binder, &party.reference))
}

/// Derived progress for one party. Declines recorded against the party win
/// over everything; completion beats viewing; the floor is "invited".
pub fn party_status(binder: &Binder, party: &Party) -> PartyStatus {
    let declined = binder.requests.iter().any(|request| {
        request.kind == RequestKind::Decline
            && request.actor_reference.as_deref() == Some(&party.reference)
    }) || inputs_for_party(binder, &party.reference)
        .any(|input| input.status == InputStatus::Declined);
    if declined {
        return PartyStatus::Declined;
    }
    if party_has_signed(binder, &party.reference) {
        return PartyStatus::Signed;
    }
    if party.meta.extra.contains_key("viewed_at") {
        return PartyStatus::Viewed;
    }
    PartyStatus::Invited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Binder;
    use crate::state::BinderStatus;
    use crate::state::Document;
    use crate::state::HistoricalRequest;
    use crate::state::InputKind;
    use crate::state::InputPosition;
    use crate::state::Page;
    use pretty_assertions::assert_eq;

    const OWNER_REF: &str = "owner-ref";
    const SIGNER_REF: &str = "signer-ref";

    fn party(reference: &str, id: &str, role: PartyRole) -> Party {
        let mut party = Party::new(reference).with_role(role);
        party.id = Some(id.to_string());
        party.legal_name = Some("Somebody".to_string());
        party.email = Some("someone@example.com".to_string());
        party
    }

    fn placed(id: &str, kind: InputKind, reference: &str, page: &str, y: f64) -> SignatureInput {
        SignatureInput::new(id, kind, reference, InputPosition::absolute(page, 0.0, y))
    }

    fn binder() -> Binder {
        let mut doc = Document {
            id: "doc-1".to_string(),
            name: "doc-1.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            content: None,
            pages: vec![Page::new("page-1"), Page::new("page-2")],
            inputs: Vec::new(),
        };
        doc.inputs = vec![
            placed("in-1", InputKind::SignatureText, SIGNER_REF, "page-2", 10.0),
            placed("in-2", InputKind::DateSigned, SIGNER_REF, "page-1", 90.0),
            placed("in-3", InputKind::SignatureText, OWNER_REF, "page-1", 20.0),
        ];
        Binder {
            id: "binder-1".to_string(),
            status: BinderStatus::SignInProgress,
            created_at: chrono::Utc::now(),
            date_format: "DD/MM/YYYY".to_string(),
            documents: vec![doc],
            parties: vec![
                party(OWNER_REF, "party-owner", PartyRole::Owner),
                party(SIGNER_REF, "party-signer", PartyRole::Signer),
            ],
            requests: Vec::new(),
            meta: Default::default(),
        }
    }

    fn auth(party_id: &str) -> AuthInfo {
        AuthInfo {
            party_id: Some(party_id.to_string()),
        }
    }

    #[test]
    fn all_inputs_preserves_insertion_order() {
        let binder = binder();
        let ids: Vec<&str> = all_inputs(&binder).map(|input| input.id.as_str()).collect();
        assert_eq!(ids, vec!["in-1", "in-2", "in-3"]);
    }

    #[test]
    fn inputs_for_page_filters_by_position_target() {
        let binder = binder();

        let ids: Vec<&str> = inputs_for_page(&binder, "page-1")
            .map(|input| input.id.as_str())
            .collect();
        assert_eq!(ids, vec!["in-2", "in-3"]);

        assert!(inputs_for_page(&binder, "page-404").next().is_none());
    }

    #[test]
    fn document_of_input_resolves_the_owning_document() {
        let binder = binder();

        assert_eq!(
            binder.document_of_input("in-1").map(|doc| doc.id.as_str()),
            Some("doc-1")
        );
        assert_eq!(binder.document_of_input("nope").map(|doc| doc.id.as_str()), None);
    }

    #[test]
    fn current_party_resolves_through_auth_info() {
        let binder = binder();
        assert_eq!(
            current_party(&binder, &auth("party-signer")).map(|p| p.reference.as_str()),
            Some(SIGNER_REF)
        );
        assert_eq!(current_party(&binder, &auth("party-unknown")), None);
        assert_eq!(current_party(&binder, &AuthInfo::default()), None);
    }

    #[test]
    fn role_membership_helpers() {
        let binder = binder();
        let owner = binder.party_by_reference(OWNER_REF).unwrap();
        assert!(party_has_role(owner, PartyRole::Owner));
        assert!(party_has_any_role(owner, &[PartyRole::Notary, PartyRole::Owner]));
        assert!(!party_has_all_roles(owner, &[PartyRole::Owner, PartyRole::Payer]));
        assert_eq!(
            party_by_role(&binder, PartyRole::Signer).map(|p| p.reference.as_str()),
            Some(SIGNER_REF)
        );
        assert_eq!(
            party_by_role_hierarchy(&binder, &[PartyRole::Notary, PartyRole::Signer, PartyRole::Owner])
                .map(|p| p.reference.as_str()),
            Some(SIGNER_REF)
        );
    }

    #[test]
    fn top_to_bottom_ordering_uses_first_document_page_order_then_offset() {
        let binder = binder();
        let mut ids: Vec<&str> = all_inputs(&binder).map(|input| input.id.as_str()).collect();
        ids.sort_by(|a, b| {
            compare_inputs_top_to_bottom(binder.input(a).unwrap(), binder.input(b).unwrap(), &binder)
        });
        assert_eq!(ids, vec!["in-3", "in-2", "in-1"]);
    }

    #[test]
    fn inputs_on_pages_outside_the_first_document_sort_last() {
        // Documents current behavior: the comparator only knows the first
        // document's pages, so anything else lands at the end.
        let mut binder = binder();
        binder.documents.push(Document {
            id: "doc-2".to_string(),
            name: "doc-2.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            content: None,
            pages: vec![Page::new("page-x")],
            inputs: vec![placed("in-x", InputKind::SignatureText, SIGNER_REF, "page-x", 1.0)],
        });

        let key = input_position_key(&binder, binder.input("in-x").unwrap());
        assert_eq!(key.0, usize::MAX);
    }

    #[test]
    fn editable_inputs_are_the_current_partys_pending_placed_fields() {
        let mut binder = binder();
        binder.documents[0].inputs[0].status = InputStatus::Completed;
        binder.documents[0].inputs.push(SignatureInput::new(
            "in-floating",
            InputKind::CustomText,
            SIGNER_REF,
            InputPosition::placeholder(),
        ));

        let editable: Vec<&str> = editable_inputs(&binder, &auth("party-signer"))
            .into_iter()
            .map(|input| input.id.as_str())
            .collect();

        // in-1 is completed, in-floating has no concrete position.
        assert_eq!(editable, vec!["in-2"]);
        assert!(editable_inputs(&binder, &AuthInfo::default()).is_empty());
    }

    #[test]
    fn signer_data_missing_ignores_notaries() {
        let mut binder = binder();
        assert!(!is_signer_data_missing(&binder));

        let mut notary = Party::new("notary-ref").with_role(PartyRole::Notary);
        notary.legal_name = None;
        binder.parties.push(notary);
        assert!(!is_signer_data_missing(&binder));

        binder.parties[1].email = None;
        assert!(is_signer_data_missing(&binder));
    }

    #[test]
    fn completion_predicates_compare_mandatory_and_completed_counts() {
        let mut binder = binder();
        assert!(binder_has_inputs(&binder));
        assert_eq!(mandatory_input_count(&binder, SIGNER_REF), 2);
        assert!(!user_has_signed(&binder, &auth("party-signer")));

        for input in binder.documents[0].inputs.iter_mut() {
            if input.party_reference == SIGNER_REF {
                input.status = InputStatus::Completed;
            }
        }
        assert_eq!(completed_input_count(&binder, SIGNER_REF), 2);
        assert!(user_has_signed(&binder, &auth("party-signer")));
        assert!(!user_has_signed(&binder, &auth("party-owner")));
    }

    #[test]
    fn party_status_prefers_decline_over_everything() {
        let mut binder = binder();
        binder.requests.push(HistoricalRequest {
            id: "req-1".to_string(),
            kind: crate::state::RequestKind::Decline,
            actor_reference: Some(SIGNER_REF.to_string()),
            message: None,
            created_at: chrono::Utc::now(),
        });
        for input in binder.documents[0].inputs.iter_mut() {
            input.status = InputStatus::Completed;
        }

        let signer = binder.party_by_reference(SIGNER_REF).unwrap();
        assert_eq!(party_status(&binder, signer), PartyStatus::Declined);

        let owner = binder.party_by_reference(OWNER_REF).unwrap();
        assert_eq!(party_status(&binder, owner), PartyStatus::Signed);
    }

    #[test]
    fn party_status_falls_back_to_viewed_then_invited() {
        let mut binder = binder();
        let signer = binder.party_by_reference(SIGNER_REF).unwrap();
        assert_eq!(party_status(&binder, signer), PartyStatus::Invited);

        binder.parties[1]
            .meta
            .extra
            .insert("viewed_at".to_string(), "2024-03-01T10:00:00Z".to_string());
        let signer = binder.party_by_reference(SIGNER_REF).unwrap();
        assert_eq!(party_status(&binder, signer), PartyStatus::Viewed);
    }
}
