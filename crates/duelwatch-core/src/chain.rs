//! Multi-level pointer chain resolution.
//!
//! The card slot lives behind several levels of indirection: each step
//! reads an 8-byte little-endian pointer at the current address and adds
//! the step's offset. Intermediate pointers move while the game runs, so
//! callers must re-resolve the full chain before every read instead of
//! caching a previous cycle's final address.

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

/// Resolve `offsets` starting from `entry_address`.
///
/// The first unreadable address aborts the whole resolution; no partial
/// result is returned, and the error names the address whose dereference
/// failed. Address arithmetic wraps at native width.
pub fn resolve_chain<R: ReadMemory>(
    reader: &R,
    entry_address: u64,
    offsets: &[u64],
) -> Result<u64> {
    let mut current = entry_address;
    for &offset in offsets {
        let pointer = reader
            .read_u64(current)
            .map_err(|e| Error::ChainResolveFailed {
                address: current,
                source: Box::new(e),
            })?;
        current = pointer.wrapping_add(offset);
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;

    #[test]
    fn resolves_single_level_chain() {
        let reader = MockMemoryBuilder::new().set_u64(0x1000, 0x2000).build();
        assert_eq!(resolve_chain(&reader, 0x1000, &[0x10]).unwrap(), 0x2010);
    }

    #[test]
    fn resolves_multi_level_chain() {
        // 0x1000 holds 0x2000 (+0x10 => 0x2010); 0x2010 holds 0x3000 (+0x8 => 0x3008)
        let reader = MockMemoryBuilder::new()
            .set_u64(0x1000, 0x2000)
            .set_u64(0x2010, 0x3000)
            .build();
        assert_eq!(
            resolve_chain(&reader, 0x1000, &[0x10, 0x8]).unwrap(),
            0x3008
        );
    }

    #[test]
    fn zero_offset_keeps_dereferenced_pointer() {
        let reader = MockMemoryBuilder::new().set_u64(0x1000, 0x4000).build();
        assert_eq!(resolve_chain(&reader, 0x1000, &[0x0]).unwrap(), 0x4000);
    }

    #[test]
    fn aborts_on_unmapped_intermediate() {
        // First level resolves; the second dereference hits unmapped memory.
        let reader = MockMemoryBuilder::new().set_u64(0x1000, 0x2000).build();
        let err = resolve_chain(&reader, 0x1000, &[0x10, 0x8]).unwrap_err();
        match err {
            Error::ChainResolveFailed { address, .. } => assert_eq!(address, 0x2010),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn re_resolution_follows_moved_pointers() {
        let reader = MockMemoryBuilder::new()
            .set_u64(0x1000, 0x2000)
            .set_u64(0x5000, 0)
            .build();
        assert_eq!(resolve_chain(&reader, 0x1000, &[0x10]).unwrap(), 0x2010);

        // The game reallocates; the intermediate pointer now targets 0x5000.
        reader.write_u64(0x1000, 0x5000);
        assert_eq!(resolve_chain(&reader, 0x1000, &[0x10]).unwrap(), 0x5010);
    }
}
