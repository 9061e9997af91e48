use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::actions::BinderAction;
use crate::actions::PartyKey;
use crate::actions::PartyPatch;
use crate::palette::assign_missing_colors;
use crate::palette::assign_missing_legal_name_indexes;
use crate::palette::colors_in_use;
use crate::palette::first_unused_color;
use crate::selectors::compare_position_keys;
use crate::selectors::input_position_key;
use crate::state::format_signing_date;
use crate::state::Binder;
use crate::state::FontSpec;
use crate::state::InputStatus;
use crate::state::Party;
use crate::state::PartyRole;
use crate::state::PositionKind;
use crate::state::SignatureInput;
use crate::state::ValueKind;

#[cfg(test)]
mod tests;

/// Single dispatch entry point. Externally pure: the previous state is never
/// touched, every action yields a fresh binder (or `None`). Stale ids and
/// unknown lookups are no-ops; the UI may dispatch against data a concurrent
/// full refetch has already replaced.
pub fn reduce(state: Option<&Binder>, action: &BinderAction) -> Option<Binder> {
    match action {
        BinderAction::ReplaceBinder(snapshot) => {
            let mut next = snapshot.clone();
            run_replace_pipeline(&mut next);
            Some(next)
        }
        BinderAction::ClearBinder => None,
        _ => {
            let mut next = state.cloned()?;
            reduce_binder(&mut next, action);
            Some(next)
        }
    }
}

fn reduce_binder(binder: &mut Binder, action: &BinderAction) {
    match action {
        // Handled before the clone in `reduce`.
        BinderAction::ReplaceBinder(_) | BinderAction::ClearBinder => {}

        BinderAction::AddInput { document_id, input } => {
            add_input(binder, document_id, input);
        }
        BinderAction::UpdateInput(input) => {
            for doc in &mut binder.documents {
                if let Some(slot) = doc.inputs.iter_mut().find(|held| held.id == input.id) {
                    *slot = input.clone();
                }
            }
        }
        BinderAction::ToggleInputActiveness { input_id } => {
            for input in inputs_mut(binder) {
                input.active = input.id == *input_id;
            }
        }
        BinderAction::SetInputWarning { input_id } => {
            for input in inputs_mut(binder) {
                input.warning = input.id == *input_id;
            }
        }
        BinderAction::ClearInputWarnings => {
            for input in inputs_mut(binder) {
                input.warning = false;
            }
        }
        BinderAction::RemoveInput { input_id } => {
            for doc in &mut binder.documents {
                doc.inputs.retain(|input| input.id != *input_id);
            }
        }
        BinderAction::RecordSignature {
            input_id,
            value,
            value_type,
            font,
            svg_data,
            signed_on,
        } => {
            record_signature(
                binder, input_id, value, *value_type, font, svg_data, *signed_on,
            );
        }
        BinderAction::RecordDate { input_id, value } => {
            record_plain_value(binder, input_id, value);
        }
        BinderAction::RecordCustomText { input_id, value } => {
            record_plain_value(binder, input_id, value);
        }
        BinderAction::RemoveSignaturesForParty { reference } => {
            for input in inputs_mut(binder) {
                if input.party_reference == *reference {
                    input.value = None;
                    input.value_type = None;
                    input.svg_data = None;
                    input.status = InputStatus::Pending;
                }
            }
        }

        BinderAction::UpdateDocumentName { document_id, name } => {
            if let Some(doc) = binder.documents.iter_mut().find(|doc| doc.id == *document_id) {
                doc.name = name.clone();
            }
        }
        BinderAction::UpdateDocumentContent {
            document_id,
            content,
        } => {
            update_document_content(binder, document_id, content);
        }
        BinderAction::MarkPageLoaded {
            document_id,
            page_id,
        } => {
            if let Some(doc) = binder.documents.iter_mut().find(|doc| doc.id == *document_id) {
                if let Some(page) = doc.pages.iter_mut().find(|page| page.id == *page_id) {
                    page.loaded = true;
                }
            }
        }

        BinderAction::AddParty(party) => {
            let mut party = party.clone();
            party.is_temporary = true;
            if party.meta.color.is_none() {
                party.meta.color =
                    first_unused_color(colors_in_use(&binder.parties)).map(str::to_string);
            }
            binder.parties.push(party);
        }
        BinderAction::UpdateParty { reference, patch } => {
            update_party(binder, reference, patch);
        }
        BinderAction::SwapPartyReferences {
            first_id,
            second_id,
        } => {
            swap_party_references(binder, first_id, second_id);
        }
        BinderAction::RemoveParty(key) => {
            remove_party(binder, key);
        }
        BinderAction::RemoveTemporaryParties => {
            let keys: Vec<PartyKey> = binder
                .parties
                .iter()
                .filter(|party| party.is_temporary)
                .map(|party| PartyKey::Full {
                    id: party.id.clone().unwrap_or_default(),
                    reference: party.reference.clone(),
                })
                .collect();
            for key in keys {
                remove_party(binder, &key);
            }
        }
    }
}

fn inputs_mut(binder: &mut Binder) -> impl Iterator<Item = &mut SignatureInput> {
    binder
        .documents
        .iter_mut()
        .flat_map(|doc| doc.inputs.iter_mut())
}

/// Full-replace post-processing, in fixed order: party sort by earliest
/// input position, then signer placeholder indexes, then palette colors.
fn run_replace_pipeline(binder: &mut Binder) {
    sort_parties_by_input_position(binder);
    assign_missing_legal_name_indexes(&mut binder.parties);
    assign_missing_colors(&mut binder.parties);
}

fn sort_parties_by_input_position(binder: &mut Binder) {
    let mut earliest: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for party in &binder.parties {
        let key = binder
            .documents
            .iter()
            .flat_map(|doc| doc.inputs.iter())
            .filter(|input| input.party_reference == party.reference)
            .map(|input| input_position_key(binder, input))
            .min_by(|a, b| compare_position_keys(*a, *b));
        if let Some(key) = key {
            earliest.insert(party.reference.clone(), key);
        }
    }

    // Stable sort: parties without any input keep their relative order at
    // the end of the list.
    binder.parties.sort_by(|a, b| {
        match (earliest.get(&a.reference), earliest.get(&b.reference)) {
            (Some(ka), Some(kb)) => compare_position_keys(*ka, *kb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

/// Append a placed input to its document, unless the page it targets has
/// disappeared from the document (external content may have changed pages).
fn add_input(binder: &mut Binder, document_id: &str, input: &SignatureInput) {
    let Some(doc) = binder.documents.iter_mut().find(|doc| doc.id == document_id) else {
        return;
    };
    if let Some(page_id) = input.position.page_id.as_deref() {
        if !doc.has_page(page_id) {
            return;
        }
    }
    let mut input = input.clone();
    input.is_fresh = true;
    doc.inputs.push(input);
}

fn record_signature(
    binder: &mut Binder,
    input_id: &str,
    value: &str,
    value_type: ValueKind,
    font: &FontSpec,
    svg_data: &Option<String>,
    signed_on: chrono::NaiveDate,
) {
    let Some(target) = binder.input(input_id) else {
        return;
    };
    if !target.kind.is_signature_like() {
        return;
    }
    let kind = target.kind;
    let reference = target.party_reference.clone();
    let date_format = binder.date_format.clone();

    // Pick the pending date stamp before anything mutates: the first
    // unfilled DATE_SIGNED of the same party, in top-to-bottom order.
    let date_input_id = binder
        .documents
        .iter()
        .flat_map(|doc| doc.inputs.iter())
        .filter(|input| {
            input.kind == crate::state::InputKind::DateSigned
                && input.party_reference == reference
                && !input.has_value()
        })
        .min_by(|a, b| {
            compare_position_keys(input_position_key(binder, a), input_position_key(binder, b))
        })
        .map(|input| input.id.clone());

    for input in inputs_mut(binder) {
        if input.id == input_id {
            input.value = Some(value.to_string());
            input.value_type = Some(value_type);
            input.font = Some(font.clone());
            input.svg_data = svg_data.clone();
            input.status = InputStatus::Completed;
            input.is_fresh = false;
        } else if input.kind == kind && input.party_reference == reference && input.has_value() {
            // Keep earlier fields of the same kind visually consistent with
            // the style the party just chose. Unfilled siblings stay empty.
            input.value = Some(value.to_string());
            input.value_type = Some(value_type);
            input.font = Some(font.clone());
            input.svg_data = svg_data.clone();
        }
    }

    if let Some(date_id) = date_input_id {
        let stamp = format_signing_date(signed_on, &date_format);
        let date_font = FontSpec::date_font_from(font);
        for input in inputs_mut(binder) {
            if input.id == date_id {
                input.value = Some(stamp.clone());
                input.value_type = Some(ValueKind::Text);
                input.font = Some(date_font.clone());
                input.status = InputStatus::Completed;
            }
        }
    }
}

fn record_plain_value(binder: &mut Binder, input_id: &str, value: &str) {
    for input in inputs_mut(binder) {
        if input.id == input_id {
            input.value = Some(value.to_string());
            input.value_type = Some(ValueKind::Text);
            input.status = InputStatus::Completed;
        }
    }
}

fn placeholder_marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"\{\{\s*input:([A-Za-z0-9_-]+)\s*\}\}").expect("placeholder marker regex")
    })
}

/// Replace a document's editable content. Placeholder-positioned inputs
/// whose `{{input:<id>}}` marker no longer appears in the new content are
/// dropped with it.
fn update_document_content(binder: &mut Binder, document_id: &str, content: &str) {
    let Some(doc) = binder.documents.iter_mut().find(|doc| doc.id == document_id) else {
        return;
    };
    let surviving: Vec<String> = placeholder_marker_regex()
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect();
    doc.content = Some(content.to_string());
    doc.inputs.retain(|input| {
        input.position.kind != PositionKind::Placeholder || surviving.contains(&input.id)
    });
}

fn update_party(binder: &mut Binder, reference: &str, patch: &PartyPatch) {
    let Some(party) = binder
        .parties
        .iter_mut()
        .find(|party| party.reference == reference)
    else {
        return;
    };
    if let Some(id) = &patch.id {
        party.id = Some(id.clone());
    }
    if let Some(legal_name) = &patch.legal_name {
        party.legal_name = Some(legal_name.clone());
    }
    if let Some(email) = &patch.email {
        if party.email.as_deref() != Some(email.as_str()) {
            party.email_changed = true;
        }
        party.email = Some(email.clone());
    }
    if let Some(roles) = &patch.roles {
        party.roles.clear();
        for role in roles {
            party.add_role(*role);
        }
    }
    if let Some(is_temporary) = patch.is_temporary {
        party.is_temporary = is_temporary;
    }
}

/// Exchange reference and meta between two parties, leaving ids in place.
/// Input assignments point at references, so they follow the swap.
fn swap_party_references(binder: &mut Binder, first_id: &str, second_id: &str) {
    let first = binder
        .parties
        .iter()
        .position(|party| party.id.as_deref() == Some(first_id));
    let second = binder
        .parties
        .iter()
        .position(|party| party.id.as_deref() == Some(second_id));
    let (Some(first), Some(second)) = (first, second) else {
        return;
    };
    if first == second {
        return;
    }
    let first_reference = binder.parties[first].reference.clone();
    let first_meta = binder.parties[first].meta.clone();
    binder.parties[first].reference = binder.parties[second].reference.clone();
    binder.parties[first].meta = binder.parties[second].meta.clone();
    binder.parties[second].reference = first_reference;
    binder.parties[second].meta = first_meta;
}

/// Remove a party and reassign its inputs to the owner. Removing the owner
/// itself is refused; ownership must be transferred first (see
/// `SwapPartyReferences`).
fn remove_party(binder: &mut Binder, key: &PartyKey) {
    let position = binder.parties.iter().position(|party| {
        party.id.as_deref() == Some(key.id())
            || key
                .reference()
                .is_some_and(|reference| party.reference == reference)
    });
    let Some(position) = position else {
        return;
    };
    if binder.parties[position].has_role(PartyRole::Owner) {
        return;
    }
    let removed = binder.parties.remove(position);
    let Some(owner_reference) = binder.owner().map(|owner| owner.reference.clone()) else {
        return;
    };
    reassign_inputs(binder, &removed, &owner_reference);
}

fn reassign_inputs(binder: &mut Binder, removed: &Party, owner_reference: &str) {
    for input in inputs_mut(binder) {
        let points_at_removed = input.party_reference == removed.reference
            || removed.id.as_deref() == Some(input.party_reference.as_str());
        if points_at_removed {
            input.party_reference = owner_reference.to_string();
        }
    }
}
