//! System breaking (§4.3): a Knuth-Plass-style dynamic program over measure
//! widths, minimizing total quadratic badness subject to break hints and a
//! per-system capacity, with a greedy fallback when no valid break
//! sequence exists.
//!
//! Grounded on the teacher's `layout::breaker`, which implements the
//! greedy scan only (`break_into_systems`, `MeasureInfo`). `MeasureInfo`'s
//! shape is kept; the greedy scan survives as [`greedy_break`], the
//! fallback path used when the optimal search comes up empty (a measure
//! wider than capacity with a `Forbidden` hint on both sides, for
//! instance).

use crate::domain::BreakHint;

/// A measure's width and tick span as known to the breaker, independent of
/// which part/staff it came from — the breaker operates on one width per
/// measure column shared by every staff in the system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureInfo {
    pub width: f64,
    pub start_tick: u32,
    pub end_tick: u32,
    pub break_hint: Option<BreakHint>,
}

/// One system's worth of measures: a contiguous index range into the
/// measure slice the breaker was given, plus the natural (unstretched)
/// width that range occupies.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemBreak {
    pub start_index: usize,
    pub end_index: usize,
    pub natural_width: f64,
}

impl SystemBreak {
    pub fn measure_count(&self) -> usize {
        self.end_index - self.start_index
    }
}

const BADNESS_SCALE: f64 = 1000.0;
const PREFERRED_BONUS: f64 = 40.0;

fn allowed_breakpoints(measures: &[MeasureInfo]) -> Vec<bool> {
    let n = measures.len();
    let mut allowed = vec![true; n + 1];
    for (k, allowed_k) in allowed.iter_mut().enumerate().take(n).skip(1) {
        *allowed_k = measures[k - 1].break_hint != Some(BreakHint::Forbidden);
    }
    allowed
}

fn segment_contains_required(measures: &[MeasureInfo], start: usize, end: usize) -> bool {
    measures[start..end.saturating_sub(1).max(start)]
        .iter()
        .any(|m| m.break_hint == Some(BreakHint::Required))
}

fn segment_width(measures: &[MeasureInfo], start: usize, end: usize) -> f64 {
    measures[start..end].iter().map(|m| m.width).sum()
}

/// Quadratic badness of stretching/shrinking `width` to fill `capacity`:
/// zero at a perfect fit, growing with the square of the unused fraction.
/// A `Preferred` hint on the segment's final measure shaves a flat bonus
/// off the cost so the search favors breaking there when it's close.
fn badness(width: f64, capacity: f64, prefers_break: bool) -> f64 {
    if width > capacity {
        return f64::INFINITY;
    }
    let slack_ratio = if capacity > 0.0 {
        (capacity - width) / capacity
    } else {
        0.0
    };
    let cost = slack_ratio * slack_ratio * BADNESS_SCALE;
    if prefers_break {
        (cost - PREFERRED_BONUS).max(0.0)
    } else {
        cost
    }
}

/// Optimal break search: dynamic program over breakpoint positions
/// `0..=measures.len()`, where breaking at position `k` means the system
/// ends after measure `k - 1`. `first_system_capacity` lets the director
/// narrow the first system for its clef/key/time header (§4.3) and for
/// page-one credits (§4.8); every later system uses `capacity`.
pub fn break_into_systems(
    measures: &[MeasureInfo],
    capacity: f64,
    first_system_capacity: f64,
) -> Vec<SystemBreak> {
    if measures.is_empty() {
        return Vec::new();
    }

    let n = measures.len();
    let allowed = allowed_breakpoints(measures);

    let mut cost = vec![f64::INFINITY; n + 1];
    let mut back = vec![usize::MAX; n + 1];
    cost[0] = 0.0;

    for j in 1..=n {
        if !allowed[j] {
            continue;
        }
        for i in 0..j {
            if !allowed[i] || cost[i].is_infinite() {
                continue;
            }
            if segment_contains_required(measures, i, j) {
                continue;
            }
            let system_capacity = if i == 0 { first_system_capacity } else { capacity };
            let width = segment_width(measures, i, j);
            let oversized_single = j - i == 1 && width > system_capacity;
            let segment_cost = if oversized_single {
                // A lone measure wider than the system still gets its own
                // system rather than being declared unbreakable.
                0.0
            } else {
                let prefers_break = measures[j - 1].break_hint == Some(BreakHint::Preferred);
                badness(width, system_capacity, prefers_break)
            };
            if segment_cost.is_infinite() {
                continue;
            }
            let total = cost[i] + segment_cost;
            if total < cost[j] {
                cost[j] = total;
                back[j] = i;
            }
        }
    }

    if cost[n].is_finite() {
        let mut breaks = Vec::new();
        let mut j = n;
        while j > 0 {
            let i = back[j];
            breaks.push(SystemBreak {
                start_index: i,
                end_index: j,
                natural_width: segment_width(measures, i, j),
            });
            j = i;
        }
        breaks.reverse();
        breaks
    } else {
        greedy_break(measures, capacity, first_system_capacity)
    }
}

/// Greedy fallback: packs measures left to right, starting a new system
/// whenever the next measure would overflow capacity. Ignores break
/// hints beyond `Forbidden`/`Required` handling being unnecessary here —
/// this path only runs when the optimal search found no valid hint-
/// respecting solution at all, so hints are already unsatisfiable.
pub fn greedy_break(measures: &[MeasureInfo], capacity: f64, first_system_capacity: f64) -> Vec<SystemBreak> {
    let mut breaks = Vec::new();
    let mut start = 0usize;
    let mut width = 0.0;

    for (idx, measure) in measures.iter().enumerate() {
        let system_capacity = if breaks.is_empty() {
            first_system_capacity
        } else {
            capacity
        };
        let would_exceed = idx > start && width + measure.width > system_capacity;
        if would_exceed {
            breaks.push(SystemBreak {
                start_index: start,
                end_index: idx,
                natural_width: width,
            });
            start = idx;
            width = 0.0;
        }
        width += measure.width;
    }

    breaks.push(SystemBreak {
        start_index: start,
        end_index: measures.len(),
        natural_width: width,
    });
    breaks
}

/// One page's worth of systems: a contiguous index range into the system
/// slice the page breaker was given.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBreak {
    pub start_index: usize,
    pub end_index: usize,
}

impl PageBreak {
    pub fn system_count(&self) -> usize {
        self.end_index - self.start_index
    }
}

/// Cost of placing systems `heights[start..end)` on one page: an underfill
/// penalty when the page's fill ratio falls short of `min_page_fill`, plus
/// a few-systems penalty spread over the run (§4.3 page breaking).
fn page_run_cost(
    heights: &[f64],
    start: usize,
    end: usize,
    capacity: f64,
    system_gap: f64,
    min_page_fill: f64,
    underfill_penalty: f64,
    few_systems_penalty: f64,
) -> f64 {
    let count = end - start;
    let total_height: f64 =
        heights[start..end].iter().sum::<f64>() + (count as f64 - 1.0).max(0.0) * system_gap;
    if count > 1 && total_height > capacity {
        return f64::INFINITY;
    }
    let fill_ratio = if capacity > 0.0 { total_height / capacity } else { 1.0 };
    let mut cost = 0.0;
    if fill_ratio < min_page_fill {
        let shortfall = min_page_fill - fill_ratio;
        cost += shortfall * shortfall * underfill_penalty;
    }
    cost += few_systems_penalty / count as f64;
    cost
}

/// Optimal page-break search: the same DP shape as [`break_into_systems`]
/// run over system heights instead of measure widths, with the §4.3
/// underfill/few-systems cost in place of the measure breaker's
/// stretch/compress cost. `first_page_capacity` lets the director shrink
/// page one's usable height to leave room for credits.
pub fn break_into_pages(
    system_heights: &[f64],
    capacity: f64,
    first_page_capacity: f64,
    system_gap: f64,
    min_page_fill: f64,
    underfill_penalty: f64,
    few_systems_penalty: f64,
) -> Vec<PageBreak> {
    if system_heights.is_empty() {
        return Vec::new();
    }

    let n = system_heights.len();
    let mut cost = vec![f64::INFINITY; n + 1];
    let mut back = vec![usize::MAX; n + 1];
    cost[0] = 0.0;

    for j in 1..=n {
        for i in 0..j {
            if cost[i].is_infinite() {
                continue;
            }
            let page_capacity = if i == 0 { first_page_capacity } else { capacity };
            let oversized_single = j - i == 1 && system_heights[i] > page_capacity;
            let run_cost = if oversized_single {
                0.0
            } else {
                page_run_cost(
                    system_heights,
                    i,
                    j,
                    page_capacity,
                    system_gap,
                    min_page_fill,
                    underfill_penalty,
                    few_systems_penalty,
                )
            };
            if run_cost.is_infinite() {
                continue;
            }
            let total = cost[i] + run_cost;
            if total < cost[j] {
                cost[j] = total;
                back[j] = i;
            }
        }
    }

    if cost[n].is_finite() {
        let mut breaks = Vec::new();
        let mut j = n;
        while j > 0 {
            let i = back[j];
            breaks.push(PageBreak {
                start_index: i,
                end_index: j,
            });
            j = i;
        }
        breaks.reverse();
        breaks
    } else {
        greedy_page_break(system_heights, capacity, first_page_capacity, system_gap)
    }
}

/// Greedy page-break fallback, parallel to [`greedy_break`].
pub fn greedy_page_break(
    system_heights: &[f64],
    capacity: f64,
    first_page_capacity: f64,
    system_gap: f64,
) -> Vec<PageBreak> {
    let mut breaks = Vec::new();
    let mut start = 0usize;
    let mut total = 0.0;
    let mut count = 0usize;

    for (idx, &height) in system_heights.iter().enumerate() {
        let page_capacity = if breaks.is_empty() { first_page_capacity } else { capacity };
        let would_exceed = count > 0 && total + system_gap + height > page_capacity;
        if would_exceed {
            breaks.push(PageBreak {
                start_index: start,
                end_index: idx,
            });
            start = idx;
            total = 0.0;
            count = 0;
        }
        total += if count > 0 { system_gap + height } else { height };
        count += 1;
    }

    breaks.push(PageBreak {
        start_index: start,
        end_index: system_heights.len(),
    });
    breaks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure(width: f64) -> MeasureInfo {
        MeasureInfo {
            width,
            start_tick: 0,
            end_tick: 0,
            break_hint: None,
        }
    }

    #[test]
    fn fills_systems_without_exceeding_capacity() {
        let measures = vec![measure(30.0); 10];
        let breaks = break_into_systems(&measures, 100.0, 100.0);
        for b in &breaks {
            assert!(b.natural_width <= 100.0 + 1e-6);
        }
        let total: usize = breaks.iter().map(SystemBreak::measure_count).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn narrow_first_system_capacity_pushes_a_measure_into_the_second_system() {
        let measures = vec![measure(30.0); 10];
        let full = break_into_systems(&measures, 100.0, 100.0);
        let narrowed = break_into_systems(&measures, 100.0, 70.0);

        assert_eq!(full[0].measure_count(), 3);
        assert_eq!(narrowed[0].measure_count(), 2);

        let total: usize = narrowed.iter().map(SystemBreak::measure_count).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn oversized_measure_gets_its_own_system() {
        let measures = vec![measure(30.0), measure(500.0), measure(30.0)];
        let breaks = break_into_systems(&measures, 100.0, 100.0);
        let oversized = breaks
            .iter()
            .find(|b| b.start_index == 1 && b.end_index == 2)
            .unwrap();
        assert_eq!(oversized.measure_count(), 1);
    }

    #[test]
    fn required_break_is_always_honored() {
        let mut measures = vec![measure(10.0); 6];
        measures[2].break_hint = Some(BreakHint::Required);
        let breaks = break_into_systems(&measures, 100.0, 100.0);
        assert!(breaks.iter().any(|b| b.end_index == 3));
    }

    #[test]
    fn forbidden_break_is_never_used() {
        let mut measures = vec![measure(30.0); 4];
        measures[0].break_hint = Some(BreakHint::Forbidden);
        let breaks = break_into_systems(&measures, 65.0, 65.0);
        assert!(breaks.iter().all(|b| b.end_index != 1));
    }

    #[test]
    fn empty_input_yields_no_systems() {
        assert!(break_into_systems(&[], 100.0, 100.0).is_empty());
    }

    /// Total badness a set of breaks accrues, recomputed independently of
    /// either breaker so the comparison doesn't just restate their own
    /// bookkeeping.
    fn total_cost(measures: &[MeasureInfo], breaks: &[SystemBreak], capacity: f64, first_system_capacity: f64) -> f64 {
        breaks
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let system_capacity = if i == 0 { first_system_capacity } else { capacity };
                let prefers_break = measures[b.end_index - 1].break_hint == Some(BreakHint::Preferred);
                badness(b.natural_width, system_capacity, prefers_break)
            })
            .sum()
    }

    #[test]
    fn dp_breaker_never_costs_more_than_the_greedy_fallback() {
        let widths = [18.0, 42.0, 27.0, 55.0, 12.0, 33.0, 48.0, 21.0, 36.0, 15.0, 29.0, 44.0];
        let measures: Vec<MeasureInfo> = widths.iter().map(|&w| measure(w)).collect();
        let capacity = 90.0;
        let first_system_capacity = 90.0;

        let dp_breaks = break_into_systems(&measures, capacity, first_system_capacity);
        let greedy_breaks = greedy_break(&measures, capacity, first_system_capacity);

        let dp_cost = total_cost(&measures, &dp_breaks, capacity, first_system_capacity);
        let greedy_cost = total_cost(&measures, &greedy_breaks, capacity, first_system_capacity);

        assert!(
            dp_cost <= greedy_cost + 1e-9,
            "DP cost {dp_cost} exceeded greedy cost {greedy_cost}"
        );
    }

    #[test]
    fn pages_fill_without_exceeding_capacity() {
        let heights = vec![100.0; 8];
        let pages = break_into_pages(&heights, 500.0, 500.0, 20.0, 0.6, 500.0, 30.0);
        for p in &pages {
            let total: f64 = heights[p.start_index..p.end_index].iter().sum::<f64>()
                + (p.system_count() as f64 - 1.0).max(0.0) * 20.0;
            assert!(total <= 500.0 + 1e-6);
        }
        let total_systems: usize = pages.iter().map(PageBreak::system_count).sum();
        assert_eq!(total_systems, 8);
    }

    #[test]
    fn oversized_system_gets_its_own_page() {
        let heights = vec![100.0, 900.0, 100.0];
        let pages = break_into_pages(&heights, 300.0, 300.0, 20.0, 0.6, 500.0, 30.0);
        let oversized = pages
            .iter()
            .find(|p| p.start_index == 1 && p.end_index == 2)
            .unwrap();
        assert_eq!(oversized.system_count(), 1);
    }

    #[test]
    fn first_page_capacity_shrinks_independently() {
        let heights = vec![200.0; 3];
        let pages = break_into_pages(&heights, 500.0, 200.0, 20.0, 0.6, 500.0, 30.0);
        assert_eq!(pages[0].system_count(), 1);
    }

    #[test]
    fn empty_input_yields_no_pages() {
        assert!(break_into_pages(&[], 500.0, 500.0, 20.0, 0.6, 500.0, 30.0).is_empty());
    }
}
