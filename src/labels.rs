use crate::rom::to_address;
use crate::status::StatusMap;
use log::debug;

/// Label every data byte that directly follows code, so each block of
/// undecoded bytes after a routine has a name. Returns how many labels were
/// added.
pub fn resolve(map: &mut StatusMap) -> usize {
    let mut added = 0;
    for offset in 1..map.len() {
        if map.is_code(offset - 1) && map.is_data(offset) && !map.is_label(offset) {
            map.mark_label(offset);
            added += 1;
        }
    }
    debug!("Labelled {} code/data boundaries", added);
    added
}

/// Symbolic name for a bank offset, e.g. `LC010`.
pub fn label_name(offset: usize) -> String {
    format!("L{:04X}", to_address(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_names_use_cpu_addresses() {
        assert_eq!(label_name(0), "LC000");
        assert_eq!(label_name(0x10), "LC010");
        assert_eq!(label_name(0x3FFA), "LFFFA");
    }

    #[test]
    fn test_boundaries_after_code_are_labelled() {
        let mut map = StatusMap::new(8);
        map.mark_instruction(2, 2);
        map.mark_label(5);
        assert_eq!(resolve(&mut map), 1);
        assert!(map.is_label(4));
        assert!(!map.is_label(1));
        assert!(!map.is_label(3));
        // idempotent
        assert_eq!(resolve(&mut map), 0);
    }

    #[test]
    fn test_offset_zero_is_never_a_boundary() {
        let mut map = StatusMap::new(4);
        map.mark_instruction(3, 1);
        resolve(&mut map);
        assert!(!map.is_label(0));
    }
}
