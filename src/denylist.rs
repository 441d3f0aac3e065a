//! Vendor/model identity matching for joiners.

/// True when `needle` occurs in `haystack`, ignoring ASCII case. An empty
/// needle matches everything.
pub fn contains_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}

/// One denylisted unit: a vendor token matched against the manufacturer
/// name and a model token matched against the model identifier. Either
/// token matching on its own classifies the device.
#[derive(Debug, Clone)]
pub struct DenyEntry {
    pub vendor: String,
    pub model: String,
}

/// The set of denylisted patterns. Fixed at construction; entries cannot
/// be removed or renamed at runtime.
#[derive(Debug, Clone)]
pub struct DenyList {
    entries: Vec<DenyEntry>,
}

impl DenyList {
    pub fn new(entries: Vec<DenyEntry>) -> Self {
        Self { entries }
    }

    pub fn matches_manufacturer(&self, text: &[u8]) -> bool {
        self.entries
            .iter()
            .any(|entry| contains_ignore_ascii_case(text, entry.vendor.as_bytes()))
    }

    pub fn matches_model(&self, text: &[u8]) -> bool {
        self.entries
            .iter()
            .any(|entry| contains_ignore_ascii_case(text, entry.model.as_bytes()))
    }
}

impl Default for DenyList {
    fn default() -> Self {
        Self::new(vec![DenyEntry {
            vendor: "ikea".into(),
            model: "tradfri".into(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match_is_case_insensitive() {
        assert!(contains_ignore_ascii_case(b"IKEA of Sweden", b"ikea"));
        assert!(contains_ignore_ascii_case(b"ikea of sweden", b"IKEA"));
        assert!(contains_ignore_ascii_case(b"TRADFRI bulb E27", b"tradfri"));
        assert!(!contains_ignore_ascii_case(b"Signify", b"ikea"));
    }

    #[test]
    fn match_commutes_under_case_changes() {
        let pairs: &[(&[u8], &[u8])] = &[
            (b"IKEA of Sweden", b"ikea"),
            (b"TRADFRI bulb E27", b"TrAdFrI"),
            (b"short", b"much longer needle"),
            (b"", b"x"),
        ];
        for (haystack, needle) in pairs {
            let base = contains_ignore_ascii_case(haystack, needle);
            let upper_haystack = haystack.to_ascii_uppercase();
            let upper_needle = needle.to_ascii_uppercase();
            assert_eq!(base, contains_ignore_ascii_case(&upper_haystack, needle));
            assert_eq!(base, contains_ignore_ascii_case(haystack, &upper_needle));
        }
    }

    #[test]
    fn empty_needle_matches_everything() {
        assert!(contains_ignore_ascii_case(b"", b""));
        assert!(contains_ignore_ascii_case(b"anything", b""));
    }

    #[test]
    fn default_denylist_matches_either_attribute_alone() {
        let list = DenyList::default();
        assert!(list.matches_manufacturer(b"IKEA of Sweden"));
        assert!(!list.matches_manufacturer(b"TRADFRI bulb E27"));
        assert!(list.matches_model(b"TRADFRI bulb E27"));
        assert!(!list.matches_model(b"IKEA of Sweden"));
    }
}
