// Career totals: counting stats summed across seasons, rate stats recomputed
// from the sums (never averaged).
//
// Batting totals OBP is the simplified `(H + BB) / (AB + BB)`. HBP and SF are
// not carried into the totals row, so the career OBP can differ slightly from
// what the season-level formula would give on the same sums.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::season::{era, innings, ratio, total_bases, whip, BattingSeason, PitchingSeason, Seasons};

/// Summed batting counting stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BattingTotals {
    pub g: u64,
    pub ab: u64,
    pub r: u64,
    pub h: u64,
    pub doubles: u64,
    pub triples: u64,
    pub hr: u64,
    pub rbi: u64,
    pub sb: u64,
    pub cs: u64,
    pub bb: u64,
    pub so: u64,
}

impl BattingTotals {
    pub fn ba(&self) -> f64 {
        ratio(self.h as f64, self.ab as f64)
    }

    /// Simplified plate-appearance denominator: `AB + BB`.
    pub fn obp(&self) -> f64 {
        ratio((self.h + self.bb) as f64, (self.ab + self.bb) as f64)
    }

    pub fn slg(&self) -> f64 {
        ratio(
            total_bases(self.h, self.doubles, self.triples, self.hr) as f64,
            self.ab as f64,
        )
    }

    pub fn ops(&self) -> f64 {
        self.obp() + self.slg()
    }

    fn add(&mut self, s: &BattingSeason) {
        self.g += u64::from(s.g);
        self.ab += u64::from(s.ab);
        self.r += u64::from(s.r);
        self.h += u64::from(s.h);
        self.doubles += u64::from(s.doubles);
        self.triples += u64::from(s.triples);
        self.hr += u64::from(s.hr);
        self.rbi += u64::from(s.rbi);
        self.sb += u64::from(s.sb);
        self.cs += u64::from(s.cs);
        self.bb += u64::from(s.bb);
        self.so += u64::from(s.so);
    }
}

/// Summed pitching counting stats. Innings stay in outs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PitchingTotals {
    pub w: u64,
    pub l: u64,
    pub g: u64,
    pub gs: u64,
    pub cg: u64,
    pub sho: u64,
    pub sv: u64,
    pub outs: u64,
    pub h: u64,
    pub er: u64,
    pub hr: u64,
    pub bb: u64,
    pub so: u64,
}

impl PitchingTotals {
    pub fn ip(&self) -> f64 {
        innings(self.outs)
    }

    pub fn era(&self) -> f64 {
        era(self.er, self.outs)
    }

    pub fn whip(&self) -> f64 {
        whip(self.h, self.bb, self.outs)
    }

    fn add(&mut self, s: &PitchingSeason) {
        self.w += u64::from(s.w);
        self.l += u64::from(s.l);
        self.g += u64::from(s.g);
        self.gs += u64::from(s.gs);
        self.cg += u64::from(s.cg);
        self.sho += u64::from(s.sho);
        self.sv += u64::from(s.sv);
        self.outs += u64::from(s.outs);
        self.h += u64::from(s.h);
        self.er += u64::from(s.er);
        self.hr += u64::from(s.hr);
        self.bb += u64::from(s.bb);
        self.so += u64::from(s.so);
    }
}

/// Totals line matching the season table it summarizes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalsLine {
    Batting(BattingTotals),
    Pitching(PitchingTotals),
}

/// Career totals row with its `"<N> Yrs"` label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerTotals {
    pub label: String,
    /// Distinct years among the summed seasons.
    pub years: usize,
    pub line: TotalsLine,
}

fn label(years: usize) -> String {
    format!("{years} Yrs")
}

pub fn aggregate_batting(seasons: &[BattingSeason]) -> BattingTotals {
    let mut totals = BattingTotals::default();
    for s in seasons {
        totals.add(s);
    }
    totals
}

pub fn aggregate_pitching(seasons: &[PitchingSeason]) -> PitchingTotals {
    let mut totals = PitchingTotals::default();
    for s in seasons {
        totals.add(s);
    }
    totals
}

/// Sum a player's seasons into one totals row.
///
/// Multi-stint years count once toward the label.
pub fn aggregate(seasons: &Seasons) -> CareerTotals {
    let years = seasons.years().into_iter().collect::<BTreeSet<_>>().len();
    let line = match seasons {
        Seasons::Batting(s) => TotalsLine::Batting(aggregate_batting(s)),
        Seasons::Pitching(s) => TotalsLine::Pitching(aggregate_pitching(s)),
    };
    CareerTotals {
        label: label(years),
        years,
        line,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
