//! Motion catalog: articulation qualifiers narrowing pattern candidates

/// One motion entry
#[derive(Debug)]
pub struct Motion {
    pub id: &'static str,
    pub label: &'static str,
    pub tags: &'static [&'static str],
    /// Whether arpeggio-family patterns stay eligible for bass/harmony roles
    pub allow_arps: bool,
}

pub static MOTION_CATALOG: &[Motion] = &[
    Motion { id: "flowing", label: "Flowing", tags: &["legato", "smooth"], allow_arps: false },
    Motion { id: "punchy", label: "Punchy", tags: &["accented", "tight"], allow_arps: false },
    Motion { id: "walking", label: "Walking", tags: &["stepwise", "steady"], allow_arps: false },
    Motion { id: "choppy", label: "Choppy", tags: &["staccato", "gated"], allow_arps: false },
    Motion { id: "swell", label: "Swell", tags: &["rising", "ambient"], allow_arps: false },
    Motion { id: "groove", label: "Groove", tags: &["rhythmic", "syncopated"], allow_arps: false },
    Motion { id: "fill", label: "Fill", tags: &["transition", "burst"], allow_arps: false },
    Motion { id: "arpeggiate", label: "Arpeggiate", tags: &["arp"], allow_arps: true },
];

pub fn motion_by_id(id: &str) -> Option<&'static Motion> {
    MOTION_CATALOG.iter().find(|m| m.id == id)
}
