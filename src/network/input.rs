use std::borrow::Cow;

/// Anything that can be fed to the network: a flat vector, or a drawing grid
/// that is flattened row by row.
pub trait Pixels {
    fn flatten(&self) -> Cow<'_, [f64]>;
}

impl Pixels for [f64] {
    fn flatten(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self)
    }
}

impl Pixels for Vec<f64> {
    fn flatten(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<const N: usize> Pixels for [f64; N] {
    fn flatten(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl Pixels for [Vec<f64>] {
    fn flatten(&self) -> Cow<'_, [f64]> {
        Cow::Owned(self.concat())
    }
}

impl Pixels for Vec<Vec<f64>> {
    fn flatten(&self) -> Cow<'_, [f64]> {
        Cow::Owned(self.concat())
    }
}

impl<const R: usize, const C: usize> Pixels for [[f64; C]; R] {
    fn flatten(&self) -> Cow<'_, [f64]> {
        Cow::Owned(self.iter().flatten().copied().collect())
    }
}
