use crate::{Error, Foreign, Result};
use tracing::trace;

/// Protocol handle plus the element fetched one step ahead.
///
/// This is the only place where the runtime's exhaustion signal is consumed.
/// Once `End` is reached the handle is dropped, so the protocol cannot be
/// called again.
#[derive(Debug)]
pub(crate) enum Prefetch<H, E> {
    Active { handle: H, current: E },
    End,
}

fn pull<O, H, E>(handle: &mut H, next: fn(&mut H) -> Result<E, O::Error>) -> Result<Option<E>>
where
    O: Foreign,
{
    match next(handle) {
        Ok(element) => Ok(Some(element)),
        Err(err) if O::is_exhausted(&err) => {
            trace!("iteration exhausted");
            Ok(None)
        }
        Err(err) => Err(Error::foreign(err)),
    }
}

impl<H, E> Prefetch<H, E> {
    /// Fetches the first element through `next`.
    pub(crate) fn start<O: Foreign>(
        mut handle: H,
        next: fn(&mut H) -> Result<E, O::Error>,
    ) -> Result<Self> {
        Ok(match pull::<O, H, E>(&mut handle, next)? {
            Some(current) => Prefetch::Active { handle, current },
            None => Prefetch::End,
        })
    }

    pub(crate) fn current(&self) -> Result<&E> {
        match self {
            Prefetch::Active { current, .. } => Ok(current),
            Prefetch::End => Err(Error::InvalidIteratorUse),
        }
    }

    pub(crate) fn is_end(&self) -> bool {
        matches!(self, Prefetch::End)
    }

    /// Replaces the cached element with the next one. Exhaustion and errors
    /// both move to `End`; errors are then returned.
    pub(crate) fn advance<O: Foreign>(
        &mut self,
        next: fn(&mut H) -> Result<E, O::Error>,
    ) -> Result<()> {
        let pulled = match self {
            Prefetch::Active { handle, .. } => pull::<O, H, E>(handle, next),
            Prefetch::End => return Err(Error::InvalidIteratorUse),
        };
        match pulled {
            Ok(Some(element)) => {
                if let Prefetch::Active { current, .. } = self {
                    *current = element;
                }
                Ok(())
            }
            Ok(None) => {
                *self = Prefetch::End;
                Ok(())
            }
            Err(err) => {
                *self = Prefetch::End;
                Err(err)
            }
        }
    }
}
