//! Segmentation of a geometry body into per-ordinate runs.
//!
//! A run accumulates bytes while they are at or above the continuation
//! threshold and ends, inclusively, on the first byte below it.

use std::io::Cursor;

use crate::coordinates::CONTINUATION_THRESHOLD;
use crate::error::Error;

/// Trait for reading byte runs from a source while advancing through it.
pub trait ReadRun<'a> {
    /// Reads the next run.
    ///
    /// ## Returns
    /// * `Ok(Some(run))` - The next run, terminal byte included
    /// * `Ok(None)` - The source is exhausted
    /// * `Err(Error::IncompleteRun)` - The source ends inside a run
    fn read_run(&mut self) -> Result<Option<&'a [u8]>, Error>;
}

impl<'a> ReadRun<'a> for Cursor<&'a [u8]> {
    fn read_run(&mut self) -> Result<Option<&'a [u8]>, Error> {
        let buffer: &'a [u8] = *self.get_ref();
        let start: usize = self
            .position()
            .try_into()
            .map_err(|_| Error::IncompleteRun)?;

        let Some(remaining) = buffer.get(start..).filter(|rest| !rest.is_empty()) else {
            return Ok(None);
        };

        let end = remaining
            .iter()
            .position(|&byte| byte < CONTINUATION_THRESHOLD)
            .ok_or(Error::IncompleteRun)?;

        self.set_position((start + end + 1) as u64);
        Ok(Some(&remaining[..=end]))
    }
}

/// Splits a body into its runs, in order.
pub fn split_runs(body: &[u8]) -> Result<Vec<&[u8]>, Error> {
    let mut cursor = Cursor::new(body);
    let mut runs = Vec::new();
    while let Some(run) = cursor.read_run()? {
        runs.push(run);
    }
    Ok(runs)
}
