// Lahman franchise codes -> Baseball-Reference display codes.

/// Display code used when a row carries no team at all.
pub const UNKNOWN_TEAM: &str = "???";

/// Display code used when a row carries no league.
pub const UNKNOWN_LEAGUE: &str = "??";

const TEAM_DISPLAY: &[(&str, &str)] = &[
    ("LAN", "LAD"),
    ("SLN", "STL"),
    ("CHN", "CHC"),
    ("SFN", "SFG"),
    ("NYN", "NYM"),
    ("SDN", "SDP"),
    ("WAS", "WSN"),
    ("CHA", "CHW"),
    ("KCA", "KCR"),
    ("NYA", "NYY"),
    ("TBA", "TBR"),
    ("FLO", "FLA"),
    ("ML4", "MIL"),
    ("SE1", "SEA"),
    ("SLA", "STL"),
    ("BRO", "BKN"),
    ("NY1", "NYG"),
    ("WS1", "WSH"),
    ("WS2", "WSH"),
    ("BL2", "BAL"),
    ("BL3", "BAL"),
    ("BL4", "BAL"),
    ("PT1", "PIT"),
    ("RC1", "ROC"),
    ("CN1", "CIN"),
    ("CN2", "CIN"),
    ("CH1", "CHC"),
    ("CH2", "CHW"),
    ("CL4", "CLE"),
    ("CL5", "CLE"),
    ("CL6", "CLE"),
    ("PHN", "PHI"),
    ("SLF", "STL"),
];

/// Map a raw team code to its display code. Codes that already match their
/// display form (or that we don't know) pass through unchanged.
pub fn display_code(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return UNKNOWN_TEAM.to_string();
    };
    TEAM_DISPLAY
        .iter()
        .find(|(code, _)| *code == raw)
        .map(|(_, display)| (*display).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// League code, or the unknown placeholder.
pub fn league_code(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_LEAGUE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renamed_franchises() {
        assert_eq!(display_code(Some("NYA")), "NYY");
        assert_eq!(display_code(Some("LAN")), "LAD");
        assert_eq!(display_code(Some("BRO")), "BKN");
    }

    #[test]
    fn passthrough_and_missing() {
        assert_eq!(display_code(Some("BOS")), "BOS");
        assert_eq!(display_code(Some("XYZ")), "XYZ");
        assert_eq!(display_code(None), "???");
        assert_eq!(display_code(Some("  ")), "???");
        assert_eq!(league_code(None), "??");
        assert_eq!(league_code(Some("AL")), "AL");
    }
}
