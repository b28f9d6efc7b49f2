//! Role catalog: the part a node plays in the arrangement

/// One role entry
#[derive(Debug)]
pub struct Role {
    pub id: &'static str,
    pub label: &'static str,
    pub tags: &'static [&'static str],
    /// Arpeggio-family patterns are excluded for this role unless the
    /// node's motion allows them.
    pub arp_restricted: bool,
}

pub static ROLE_CATALOG: &[Role] = &[
    Role { id: "lead", label: "Lead", tags: &["melodic", "front"], arp_restricted: false },
    Role { id: "harmony", label: "Harmony", tags: &["support", "chords"], arp_restricted: true },
    Role { id: "bass", label: "Bass", tags: &["low_end", "foundation"], arp_restricted: true },
    Role { id: "drums", label: "Drums", tags: &["percussive", "rhythm"], arp_restricted: false },
    Role { id: "fx", label: "FX", tags: &["texture", "movement"], arp_restricted: false },
];

pub fn role_by_id(id: &str) -> Option<&'static Role> {
    ROLE_CATALOG.iter().find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accompaniment_roles_restrict_arps() {
        assert!(role_by_id("bass").unwrap().arp_restricted);
        assert!(role_by_id("harmony").unwrap().arp_restricted);
        assert!(!role_by_id("lead").unwrap().arp_restricted);
        assert!(role_by_id("unknown").is_none());
    }
}
