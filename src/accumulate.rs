use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::date::{format_iso, next_day};
use crate::{Anchor, DateRange, PeriodLabel};

/// Days counted per anchor year, ordered by start year.
pub type PeriodTotals = BTreeMap<PeriodLabel, u32>;

/// Contributing days per anchor year.
pub type Heatmap = BTreeMap<PeriodLabel, DaySet>;

/// An ordered set of calendar days, stored as disjoint, non-adjacent spans.
///
/// Inserting a range costs O(log n) in the number of stored spans no matter
/// how many days it covers; days are only expanded when iterated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySet {
    // start -> inclusive end
    spans: BTreeMap<NaiveDate, NaiveDate>,
}

impl DaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every day of `range`, coalescing with spans it overlaps or touches.
    pub fn insert(&mut self, range: DateRange) {
        let (mut start, mut end) = range.dates();
        let reach = next_day(end).unwrap_or(end);

        let absorbed: Vec<(NaiveDate, NaiveDate)> = self
            .spans
            .range(..=reach)
            .rev()
            .take_while(|(_, span_end)| next_day(**span_end).unwrap_or(**span_end) >= start)
            .map(|(s, e)| (*s, *e))
            .collect();

        for (span_start, span_end) in absorbed {
            self.spans.remove(&span_start);
            start = start.min(span_start);
            end = end.max(span_end);
        }
        self.spans.insert(start, end);
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.spans
            .range(..=date)
            .next_back()
            .is_some_and(|(_, end)| date <= *end)
    }

    /// Number of distinct days in the set.
    pub fn len(&self) -> u64 {
        self.spans().map(|span| span.len_days()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The stored spans in ascending order.
    pub fn spans(&self) -> impl Iterator<Item = DateRange> + '_ {
        self.spans
            .iter()
            .filter_map(|(start, end)| DateRange::new(*start, *end).ok())
    }

    /// Every day in the set in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.spans
            .iter()
            .flat_map(|(start, end)| start.iter_days().take_while(move |d| d <= end))
    }

    /// Every day rendered as `YYYY-MM-DD`, ascending.
    pub fn to_iso_strings(&self) -> Vec<String> {
        self.days().map(format_iso).collect()
    }
}

impl FromIterator<DateRange> for DaySet {
    fn from_iter<I: IntoIterator<Item = DateRange>>(iter: I) -> Self {
        let mut set = Self::new();
        for range in iter {
            set.insert(range);
        }
        set
    }
}

/// Serialized as the ordered list of ISO day strings.
impl Serialize for DaySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.days().map(format_iso))
    }
}

/// Output of [`accumulate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulation {
    pub totals:  PeriodTotals,
    /// Present only when requested.
    pub heatmap: Option<Heatmap>,
}

/// Walks each range across the anchor years it touches and adds the
/// overlapping day counts to the matching period.
///
/// Ranges are counted independently: if two inputs overlap, shared days count
/// twice in `totals` (merge first to avoid that). Heatmap days are a set and
/// never double up.
pub fn accumulate(ranges: &[DateRange], anchor: Anchor, with_heatmap: bool) -> Accumulation {
    let mut accumulation = Accumulation {
        totals:  PeriodTotals::new(),
        heatmap: with_heatmap.then(Heatmap::new),
    };

    for range in ranges {
        let mut period = anchor.period_containing(range.start());
        while period.start() <= range.end() {
            if let Some(overlap) = period.overlap(range) {
                let label = period.label();
                let days = u32::try_from(overlap.len_days()).unwrap_or(u32::MAX);
                trace!(%label, %overlap, days, "period overlap");

                let total = accumulation.totals.entry(label).or_default();
                *total = total.saturating_add(days);

                if let Some(heatmap) = accumulation.heatmap.as_mut() {
                    heatmap.entry(label).or_default().insert(overlap);
                }
            }

            let next = period.next(anchor);
            if next.start() <= period.start() {
                // Saturated at the end of chrono's calendar
                break;
            }
            period = next;
        }
    }

    debug!(
        ranges = ranges.len(),
        periods = accumulation.totals.len(),
        %anchor,
        "accumulated period totals"
    );
    accumulation
}
