use crate::error::AcquisitionError;
use crate::model::ReaderId;

/// Pick the only connected reader.
///
/// Zero or several readers are refused; there is no "first one wins" fallback,
/// the operator has to unplug the readers that should not be used.
pub fn select_single_reader(readers: Vec<ReaderId>) -> Result<ReaderId, AcquisitionError> {
    let count = readers.len();
    let mut readers = readers.into_iter();
    match (readers.next(), count) {
        (None, _) => Err(AcquisitionError::NoReaderFound),
        (Some(reader), 1) => Ok(reader),
        (Some(_), count) => Err(AcquisitionError::AmbiguousReaderSelection { count }),
    }
}
