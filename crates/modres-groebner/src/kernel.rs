//! Where zero reductions of an RGS end up.

use crate::error::BuchbergerError;

/// Receives the bookkeeping tails (blocks `r..r + s`) of vectors whose
/// image part reduced to zero. Each tail is an element of the kernel.
pub trait KernelSink {
    /// Offers a candidate kernel generator. Duplicates are allowed.
    ///
    /// # Errors
    ///
    /// Propagates allocation failures of the receiving Gröbner set.
    fn possibly_new_kernel_generator(&mut self, tail: &[u32]) -> Result<(), BuchbergerError>;
}

/// Collects tails verbatim.
impl KernelSink for Vec<Vec<u32>> {
    fn possibly_new_kernel_generator(&mut self, tail: &[u32]) -> Result<(), BuchbergerError> {
        self.push(tail.to_vec());
        Ok(())
    }
}
