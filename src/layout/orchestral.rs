//! Orchestral grouping inference (§4.5): bracket/brace assignment, family
//! grouping, and full vs. mensurstrich barline connections.
//!
//! The teacher's `layout::mod` hardcodes a single rule inline — "multi-staff
//! parts get a brace, single-staff parts get nothing, 14 staff-spaces
//! between staves" — with no family awareness at all. This module replaces
//! that with the fuller inference §4.5 asks for, grounded on the same
//! brace-for-multi-staff idea but widened to consecutive-family bracketing.

use crate::domain::{InstrumentFamily, Part};
use crate::layout::geometry::BracketType;

/// One orchestral grouping: a contiguous run of parts sharing a bracket
/// (or a single braced part), and whether their barlines connect across
/// the whole group or stop at each staff (mensurstrich).
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestralGroup {
    pub part_indices: Vec<usize>,
    pub bracket: BracketType,
    pub full_barlines: bool,
}

/// Groups consecutive parts of the same family under one bracket; a
/// multi-staff or keyboard part always forms its own braced group and
/// never merges into a neighboring family bracket, since a brace already
/// marks it as a unit. Choral (`Voices`) groups use mensurstrich — their
/// barlines gap between staves rather than running through them — every
/// other family's barlines connect fully.
pub fn infer_groups(parts: &[Part]) -> Vec<OrchestralGroup> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < parts.len() {
        if parts[i].takes_brace() {
            groups.push(OrchestralGroup {
                part_indices: vec![i],
                bracket: BracketType::Brace,
                full_barlines: true,
            });
            i += 1;
            continue;
        }

        let family = parts[i].family;
        let mut j = i + 1;
        while j < parts.len() && parts[j].family == family && !parts[j].takes_brace() {
            j += 1;
        }

        let part_indices: Vec<usize> = (i..j).collect();
        let bracket = if part_indices.len() > 1 {
            BracketType::Bracket
        } else {
            BracketType::None
        };
        groups.push(OrchestralGroup {
            part_indices,
            bracket,
            full_barlines: family != InstrumentFamily::Voices,
        });
        i = j;
    }
    groups
}

/// Whether the groups as a whole should carry an outer enclosing bracket
/// spanning every staff — conventional once an ensemble has more than one
/// bracketed orchestral family (strings + woodwinds, say), but not for a
/// single family, a solo/keyboard work, or a pure vocal ensemble.
pub fn needs_outer_bracket(groups: &[OrchestralGroup], parts: &[Part]) -> bool {
    let orchestral_families: std::collections::HashSet<InstrumentFamily> = groups
        .iter()
        .flat_map(|g| g.part_indices.iter().map(|&i| parts[i].family))
        .filter(|f| !matches!(f, InstrumentFamily::Voices | InstrumentFamily::Keyboards))
        .collect();
    orchestral_families.len() > 1
}
