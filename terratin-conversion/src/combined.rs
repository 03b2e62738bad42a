//! Racing combinator for the two conversion strategies
//!
//! Lee decimation is fast when little must be removed (tight error bounds);
//! Fjallstrom refinement is fast when few insertions suffice (loose error
//! bounds). Racing both on private copies of the input sidesteps having to
//! predict which regime applies: the first finisher wins and the loser is
//! cancelled cooperatively.

use std::sync::mpsc;
use std::thread;

use terratin_core::{Error, Grid, Raster, Result};

use crate::cancel::CancelFlag;
use crate::fjallstrom::fjallstrom_convert_cancellable;
use crate::lee::lee_convert_cancellable;
use crate::tin::Tin;

/// Run both conversions concurrently and return the first result.
///
/// Each worker builds its own grid from the raster, so the only state
/// shared between them is the result channel and the cancellation flag.
/// If the winner failed, the combinator waits for the other worker before
/// giving up.
pub fn combined_convert(raster: &Raster, max_error: f64) -> Result<(Tin, Grid)> {
    crate::validate_args(raster, max_error)?;

    let cancel = CancelFlag::new();
    let (sender, receiver) = mpsc::channel();

    thread::scope(|scope| {
        let refine_sender = sender.clone();
        let refine_cancel = cancel.clone();
        scope.spawn(move || {
            let _ = refine_sender.send(fjallstrom_convert_cancellable(
                raster,
                max_error,
                &refine_cancel,
            ));
        });

        let decimate_cancel = cancel.clone();
        scope.spawn(move || {
            let _ = sender.send(lee_convert_cancellable(raster, max_error, &decimate_cancel));
        });

        let first = receiver.recv().map_err(|_| Error::Cancelled)?;
        match first {
            Ok(result) => {
                cancel.cancel();
                Ok(result)
            }
            Err(first_error) => match receiver.recv() {
                Ok(second) => second,
                Err(_) => Err(first_error),
            },
        }
    })
}
