#[cfg(feature = "batch-ops")]
use rayon::prelude::*;

#[cfg(feature = "batch-ops")]
use crate::aliases::Salt16;
#[cfg(feature = "batch-ops")]
use crate::{Direction, LrzCryptError, Session};

/// Transform many independent blocks in parallel, each under its own salt.
///
/// Returns the first error encountered; blocks are independent, so on error
/// only the failed buffers are undefined, but callers should discard the batch.
#[cfg(feature = "batch-ops")]
pub fn transform_blocks<B>(
    session: &Session,
    blocks: &mut [(B, Salt16)],
    direction: Direction,
) -> Result<(), LrzCryptError>
where
    B: AsMut<[u8]> + Send,
{
    blocks
        .par_iter_mut()
        .try_for_each(|(buffer, salt)| session.transform_block(buffer.as_mut(), salt, direction))
}
