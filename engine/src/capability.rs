use crate::Foreign;

/// A traversal guarantee an object can be probed for.
///
/// Implemented by the uninhabited tags [`SinglePass`], [`RandomAccess`] and
/// [`Mapping`].
pub trait Capability {
    /// Human readable name of the capability.
    const NAME: &'static str;

    /// Returns true if `obj` provides this capability.
    fn probe<O: Foreign>(obj: &O) -> bool;
}

/// Forward-only iteration through the runtime's iteration protocol.
#[derive(Debug)]
pub enum SinglePass {}

/// Length plus integer indexing.
#[derive(Debug)]
pub enum RandomAccess {}

/// Key/value iteration over a mapping.
#[derive(Debug)]
pub enum Mapping {}

impl Capability for SinglePass {
    const NAME: &'static str = "single-pass";

    fn probe<O: Foreign>(obj: &O) -> bool {
        // The handle is a temporary and is released before returning.
        obj.obtain_iterator().is_some()
    }
}

impl Capability for RandomAccess {
    const NAME: &'static str = "random-access";

    fn probe<O: Foreign>(obj: &O) -> bool {
        obj.is_sequence()
    }
}

impl Capability for Mapping {
    const NAME: &'static str = "mapping";

    fn probe<O: Foreign>(obj: &O) -> bool {
        SinglePass::probe(obj) && obj.is_mapping()
    }
}

/// Returns true if `obj` provides the capability `C`.
#[inline]
pub fn probe<C: Capability, O: Foreign>(obj: &O) -> bool {
    C::probe(obj)
}
