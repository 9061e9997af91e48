use super::*;
use pretty_assertions::assert_eq;

#[test]
fn add_input_appends_to_the_owning_document() {
    let state = binder();
    let placed = input("in-new", InputKind::Initials, SIGNER_REF, "page-2", 50.0);

    let next = apply(
        &state,
        BinderAction::AddInput {
            document_id: "doc-1".to_string(),
            input: placed,
        },
    );

    let added = next.input("in-new").expect("input added");
    assert_eq!(added.kind, InputKind::Initials);
    assert!(added.is_fresh);
}

#[test]
fn add_input_is_dropped_when_target_page_disappeared() {
    let state = binder();
    let placed = input("in-gone", InputKind::Initials, SIGNER_REF, "page-9", 50.0);

    let next = apply(
        &state,
        BinderAction::AddInput {
            document_id: "doc-1".to_string(),
            input: placed,
        },
    );

    assert!(next.input("in-gone").is_none());
    assert_eq!(next.documents[0].inputs.len(), state.documents[0].inputs.len());
}

#[test]
fn add_input_without_page_target_is_kept() {
    let state = binder();
    let mut placed = SignatureInput::new(
        "in-ph",
        InputKind::CustomText,
        SIGNER_REF,
        InputPosition::placeholder(),
    );
    placed.value = Some("prefill".to_string());

    let next = apply(
        &state,
        BinderAction::AddInput {
            document_id: "doc-1".to_string(),
            input: placed,
        },
    );

    assert!(next.input("in-ph").is_some());
}

#[test]
fn update_input_replaces_the_full_payload_by_id() {
    let state = binder();
    let mut replacement = input("in-sig", InputKind::SignatureText, SIGNER_REF, "page-2", 7.0);
    replacement.optional = true;

    let next = apply(&state, BinderAction::UpdateInput(replacement.clone()));

    assert_eq!(next.input("in-sig"), Some(&replacement));
}

#[test]
fn update_input_with_stale_id_is_a_noop() {
    let state = binder();
    let ghost = input("in-ghost", InputKind::SignatureText, SIGNER_REF, "page-1", 1.0);

    let next = apply(&state, BinderAction::UpdateInput(ghost));

    assert_eq!(next, state);
}

#[test]
fn toggling_activeness_leaves_at_most_one_active_input() {
    let state = binder();

    let next = apply(
        &state,
        BinderAction::ToggleInputActiveness {
            input_id: "in-sig".to_string(),
        },
    );
    let active: Vec<&str> = next
        .documents
        .iter()
        .flat_map(|doc| doc.inputs.iter())
        .filter(|input| input.active)
        .map(|input| input.id.as_str())
        .collect();
    assert_eq!(active, vec!["in-sig"]);

    let next = apply(
        &next,
        BinderAction::ToggleInputActiveness {
            input_id: "in-owner".to_string(),
        },
    );
    let active: Vec<&str> = next
        .documents
        .iter()
        .flat_map(|doc| doc.inputs.iter())
        .filter(|input| input.active)
        .map(|input| input.id.as_str())
        .collect();
    assert_eq!(active, vec!["in-owner"]);
}

#[test]
fn toggling_an_unknown_input_clears_all_activeness() {
    let state = apply(
        &binder(),
        BinderAction::ToggleInputActiveness {
            input_id: "in-sig".to_string(),
        },
    );

    let next = apply(
        &state,
        BinderAction::ToggleInputActiveness {
            input_id: "in-gone".to_string(),
        },
    );

    assert!(next
        .documents
        .iter()
        .flat_map(|doc| doc.inputs.iter())
        .all(|input| !input.active));
}

#[test]
fn warnings_are_exclusive_and_clearable() {
    let state = binder();

    let next = apply(
        &state,
        BinderAction::SetInputWarning {
            input_id: "in-date".to_string(),
        },
    );
    assert!(next.input("in-date").unwrap().warning);
    assert!(!next.input("in-sig").unwrap().warning);

    let next = apply(
        &next,
        BinderAction::SetInputWarning {
            input_id: "in-sig".to_string(),
        },
    );
    assert!(!next.input("in-date").unwrap().warning);
    assert!(next.input("in-sig").unwrap().warning);

    let next = apply(&next, BinderAction::ClearInputWarnings);
    assert!(next
        .documents
        .iter()
        .flat_map(|doc| doc.inputs.iter())
        .all(|input| !input.warning));
}

#[test]
fn remove_input_deletes_by_id() {
    let state = binder();

    let next = apply(
        &state,
        BinderAction::RemoveInput {
            input_id: "in-date".to_string(),
        },
    );

    assert!(next.input("in-date").is_none());
    assert_eq!(next.documents[0].inputs.len(), 2);
}

#[test]
fn update_document_name_matches_by_id() {
    let state = binder();

    let next = apply(
        &state,
        BinderAction::UpdateDocumentName {
            document_id: "doc-1".to_string(),
            name: "Lease agreement".to_string(),
        },
    );
    assert_eq!(next.documents[0].name, "Lease agreement");

    let next = apply(
        &next,
        BinderAction::UpdateDocumentName {
            document_id: "doc-404".to_string(),
            name: "ignored".to_string(),
        },
    );
    assert_eq!(next.documents[0].name, "Lease agreement");
}

#[test]
fn mark_page_loaded_flips_the_load_flag() {
    let state = binder();

    let next = apply(
        &state,
        BinderAction::MarkPageLoaded {
            document_id: "doc-1".to_string(),
            page_id: "page-2".to_string(),
        },
    );

    assert!(!next.documents[0].pages[0].loaded);
    assert!(next.documents[0].pages[1].loaded);
}

#[test]
fn replacing_content_drops_placeholder_inputs_whose_marker_vanished() {
    let mut state = binder();
    let mut kept = SignatureInput::new(
        "ph-kept",
        InputKind::CustomText,
        SIGNER_REF,
        InputPosition::placeholder(),
    );
    kept.status = InputStatus::Pending;
    let dropped = SignatureInput::new(
        "ph-dropped",
        InputKind::CustomText,
        SIGNER_REF,
        InputPosition::placeholder(),
    );
    state.documents[0].inputs.push(kept);
    state.documents[0].inputs.push(dropped);

    let next = apply(
        &state,
        BinderAction::UpdateDocumentContent {
            document_id: "doc-1".to_string(),
            content: "Dear {{input:ph-kept}}, please sign below.".to_string(),
        },
    );

    assert!(next.input("ph-kept").is_some());
    assert!(next.input("ph-dropped").is_none());
    // Absolutely positioned inputs are untouched by a content rewrite.
    assert!(next.input("in-sig").is_some());
    assert_eq!(
        next.documents[0].content.as_deref(),
        Some("Dear {{input:ph-kept}}, please sign below.")
    );
}
