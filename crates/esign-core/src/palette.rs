use crate::state::Party;
use crate::state::PartyRole;

/// Fixed ordered display palette for parties. Assignment always scans from
/// the front, so colors are deterministic for a given set of in-use entries.
pub const PARTY_COLORS: &[&str] = &[
    "#FFB26A", "#FF758E", "#8AD5A6", "#6AB9FF", "#C79BFF", "#FFD166", "#6AE0D9",
    "#F49AC2", "#A3C940", "#FF9B54", "#7E9CFF", "#E6B89C", "#5FC9B2", "#E98CA8",
    "#B3D46A", "#FFB997", "#96B7FF", "#D7A9E3", "#84DCC6", "#FFC3A0", "#A0CED9",
    "#E3B7A0", "#ADF7B6", "#FFC09F", "#A0A7E2", "#C9B1FF", "#8FE388", "#FFA69E",
    "#B8E1FF", "#F2C6DE",
    "#AD90DF", "#75C77C", "#EEAAB9", "#538DC6", "#CDD6A9", "#D890DF", "#75C7A8",
    "#EEC0AA", "#5753C6", "#B4D6A9", "#DF90BC", "#75BAC7", "#EEE5AA", "#9553C6",
    "#A9D6B6", "#DF9091", "#758EC7", "#D2EEAA", "#C653B8", "#A9D6CE", "#DFBA90",
    "#8975C7", "#AEEEAA", "#C6537A", "#A9C5D6", "#D9DF90", "#B575C7", "#AAEECB",
    "#C66A53", "#A9ADD6", "#AFDF90", "#C775AD", "#AAECEE", "#C6A853", "#BDA9D6",
    "#90DF9D", "#C77581", "#AAC7EE", "#A6C653", "#D5A9D6", "#90DFC7", "#C79675",
    "#B2AAEE", "#67C653", "#D6A9BE", "#90CCDF", "#C7C275", "#D6AAEE", "#53C67C",
    "#D6ACA9", "#90A2DF", "#9FC775", "#EEAAE1", "#53C6BA", "#D6C4A9", "#A990DF",
    "#75C778", "#EEAABC", "#5393C6", "#CFD6A9", "#D490DF", "#75C7A4", "#EEBDAA",
    "#5355C6", "#B7D6A9", "#DF90BF", "#75BEC7", "#EEE1AA", "#8F53C6", "#A9D6B3",
    "#DF9095", "#7592C7", "#D5EEAA", "#C653BE", "#A9D6CC", "#DFB690", "#8575C7",
    "#B1EEAA", "#C65380", "#A9C7D6", "#DDDF90", "#B175C7", "#AAEEC8", "#C66453",
    "#A9AFD6", "#B2DF90", "#C775B1", "#AAEEEC", "#C6A253", "#BBA9D6", "#90DF99",
    "#C77584", "#AACAEE", "#ABC653", "#D3A9D6", "#90DFC3", "#C79275", "#AFAAEE",
    "#6DC653", "#D6A9C0", "#90D0DF", "#C7BE75", "#D3AAEE", "#53C677", "#D6AAA9",
    "#90A6DF", "#A3C775", "#EEAAE4", "#53C6B5", "#D6C2A9", "#A690DF", "#77C775",
    "#EEAABF", "#5398C6", "#D1D6A9", "#D090DF", "#75C7A0", "#EEBAAA", "#535AC6",
    "#B9D6A9", "#DF90C3", "#75C2C7", "#EEDEAA", "#8A53C6", "#A9D6B1", "#DF9099",
    "#7596C7", "#D9EEAA", "#C653C4", "#A9D6C9", "#DFB290", "#8175C7", "#B4EEAA",
    "#C65385", "#A9CAD6", "#DFDD90", "#AD75C7", "#AAEEC5", "#C65E53", "#A9B1D6",
    "#B6DF90", "#C775B4", "#AAEEE9", "#C69C53", "#B9A9D6", "#90DF95", "#C77588",
    "#AACEEE", "#B1C653", "#D1A9D6", "#90DFBF", "#C78E75", "#ABAAEE", "#73C653",
    "#D6A9C2", "#90D4DF", "#C7BA75", "#D0AAEE", "#53C671", "#D6A9AA", "#90A9DF",
    "#A7C775", "#EEAAE7", "#53C6AF", "#D6C0A9", "#A290DF", "#7BC775", "#EEAAC3",
    "#539EC6", "#D3D6A9",
];

/// First palette entry not present in `used`, or `None` when every entry is
/// taken. Exhaustion behavior is deliberately left to the caller: with a
/// binder-sized party list the palette is never expected to run out, and no
/// wrap-around policy has been agreed.
pub fn first_unused_color<'a, I>(used: I) -> Option<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let used: Vec<&str> = used.into_iter().collect();
    PARTY_COLORS
        .iter()
        .copied()
        .find(|candidate| !used.contains(candidate))
}

/// Colors currently held by any party of the binder.
pub fn colors_in_use(parties: &[Party]) -> Vec<&str> {
    parties
        .iter()
        .filter_map(|party| party.meta.color.as_deref())
        .collect()
}

/// Assign a palette color to every party lacking one, never overwriting an
/// existing assignment. Scans front-to-back over `parties`, so the order of
/// the list decides who gets the earlier palette entries.
pub fn assign_missing_colors(parties: &mut [Party]) {
    for idx in 0..parties.len() {
        if parties[idx].meta.color.is_some() {
            continue;
        }
        let used: Vec<String> = parties
            .iter()
            .filter_map(|party| party.meta.color.clone())
            .collect();
        parties[idx].meta.color =
            first_unused_color(used.iter().map(String::as_str)).map(str::to_string);
    }
}

/// Re-index the "Signer N" display placeholders: every SIGNER party without
/// a legal name gets a 1-based index in list order; everyone else is cleared.
/// Runs after the party sort, so indexes follow input position on the page.
pub fn assign_missing_legal_name_indexes(parties: &mut [Party]) {
    let mut next = 1u32;
    for party in parties.iter_mut() {
        let missing_name = party
            .legal_name
            .as_deref()
            .map_or(true, |name| name.trim().is_empty());
        if party.has_role(PartyRole::Signer) && missing_name {
            party.meta.missing_legal_name_index = Some(next);
            next += 1;
        } else {
            party.meta.missing_legal_name_index = None;
        }
    }
}
