/// Errors from item validation and storage.
///
/// The first five variants are protocol errors with fixed KRPC codes (see
/// [`StoreError::wire_code`]); their messages are the ones peers expect in
/// error replies.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The bencoded `v` field exceeds the protocol limit.
    #[error("message (v field) too big")]
    ValueFieldTooBig,

    /// The signature does not verify against the key, salt, seq, and value.
    #[error("invalid signature")]
    InvalidSignature,

    /// The `salt` field exceeds the protocol limit.
    #[error("salt (salt field) too big")]
    SaltFieldTooBig,

    /// The writer's CAS token does not match the stored one.
    #[error("the CAS hash mismatched, re-read value and try again")]
    CasHashMismatched,

    /// The incoming sequence number does not advance past the stored one.
    #[error("sequence number less than current")]
    SequenceNumberLessThanCurrent,

    /// Nothing is stored at the target, or the stored item expired.
    #[error("item not found")]
    ItemNotFound,

    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// KRPC error code for the reply, or `None` when the condition is not an
    /// error on the wire (a missing item is answered without a value).
    pub fn wire_code(&self) -> Option<i64> {
        match self {
            Self::ValueFieldTooBig => Some(205),
            Self::InvalidSignature => Some(206),
            Self::SaltFieldTooBig => Some(207),
            Self::CasHashMismatched => Some(301),
            Self::SequenceNumberLessThanCurrent => Some(302),
            Self::Backend(_) => Some(201),
            Self::ItemNotFound => None,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_errors_carry_bep44_codes() {
        assert_eq!(StoreError::ValueFieldTooBig.wire_code(), Some(205));
        assert_eq!(StoreError::InvalidSignature.wire_code(), Some(206));
        assert_eq!(StoreError::SaltFieldTooBig.wire_code(), Some(207));
        assert_eq!(StoreError::CasHashMismatched.wire_code(), Some(301));
        assert_eq!(StoreError::SequenceNumberLessThanCurrent.wire_code(), Some(302));
    }

    #[test]
    fn not_found_has_no_wire_code() {
        assert_eq!(StoreError::ItemNotFound.wire_code(), None);
        assert_eq!(StoreError::Backend("disk".into()).wire_code(), Some(201));
    }

    #[test]
    fn messages() {
        assert_eq!(
            StoreError::SequenceNumberLessThanCurrent.to_string(),
            "sequence number less than current"
        );
        assert_eq!(
            StoreError::Backend("lock poisoned".into()).to_string(),
            "storage backend error: lock poisoned"
        );
    }
}
