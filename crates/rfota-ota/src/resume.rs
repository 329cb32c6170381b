//! Resume decision for interrupted transfers
//!
//! The device remembers how many objects it has committed (`offset`) and
//! their running checksum. A transfer may continue from there only when the
//! current image has at least that many objects and its prefix checksum
//! matches.

use rfota_hid_pxi_protocol::{object_count, prefix_checksum};
use tracing::debug;

use crate::error::ResumeMismatch;
use crate::session::SessionState;

/// Check whether `session` can continue writing `image`.
pub fn check_resume(session: &SessionState, image: &[u8]) -> Result<(), ResumeMismatch> {
    let objects = object_count(image.len());
    let offset = usize::from(session.offset);
    let image_checksum = prefix_checksum(image, offset).ok_or(ResumeMismatch::OffsetOutOfRange {
        offset: session.offset,
        objects,
    })?;
    if image_checksum != session.checksum {
        return Err(ResumeMismatch::ChecksumDiffers {
            device: session.checksum,
            image: image_checksum,
        });
    }
    Ok(())
}

/// Apply the resume decision, restarting the session on mismatch.
///
/// Returns the mismatch when the transfer was restarted.
pub fn resolve_resume(session: &mut SessionState, image: &[u8]) -> Option<ResumeMismatch> {
    match check_resume(session, image) {
        Ok(()) => None,
        Err(mismatch) => {
            debug!("do not resume: {mismatch}");
            session.restart();
            Some(mismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfota_hid_pxi_protocol::SpecCheckResult;
    use tracing_test::traced_test;

    fn session(offset: u16, checksum: u16) -> SessionState {
        SessionState {
            status: 0,
            resume_flag: 0,
            offset,
            checksum,
            max_object_size: 4096,
            mtu_size: 20,
            prn_threshold: 5,
            spec_check_result: SpecCheckResult::Ok,
        }
    }

    #[test]
    fn test_fresh_transfer_resumes_at_zero() {
        let image = vec![0x01u8; 10_000];
        assert_eq!(check_resume(&session(0, 0), &image), Ok(()));
    }

    #[test]
    fn test_matching_prefix_resumes() {
        let image = vec![0x01u8; 10_000];
        let mut s = session(2, 8192);
        assert_eq!(resolve_resume(&mut s, &image), None);
        assert_eq!(s.offset, 2);
        assert_eq!(s.checksum, 8192);
    }

    #[test]
    fn test_full_image_offset_is_valid() {
        let image = vec![0x01u8; 10_000];
        assert_eq!(check_resume(&session(3, 10_000), &image), Ok(()));
    }

    #[test]
    fn test_offset_past_end() {
        let image = vec![0x01u8; 10_000];
        assert_eq!(
            check_resume(&session(4, 0), &image),
            Err(ResumeMismatch::OffsetOutOfRange {
                offset: 4,
                objects: 3
            })
        );
    }

    #[test]
    #[traced_test]
    fn test_checksum_mismatch_restarts() {
        let image = vec![0x01u8; 10_000];
        let mut s = session(2, 0x1234);
        let mismatch = resolve_resume(&mut s, &image);
        assert_eq!(
            mismatch,
            Some(ResumeMismatch::ChecksumDiffers {
                device: 0x1234,
                image: 8192
            })
        );
        assert_eq!((s.offset, s.checksum), (0, 0));
        assert!(logs_contain("do not resume: checksum is different from previous fw"));
    }
}
