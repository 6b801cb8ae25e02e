use std::convert::Infallible;

use noisy_float::prelude::*;
use num_traits::sign::Signed;

use crate::error::Error;

/// A metric (distance function) on the space of items
///
/// Implementations have to be symmetric, non-negative, vanish exactly
/// on equal items, and satisfy the triangle inequality. If the triangle
/// inequality is violated the resulting clustering is undefined, but
/// the clustering call still terminates.
///
/// Any `Fn(&P, &P) -> f64` closure can be used as a metric.
pub trait Metric<P: ?Sized> {
    /// The distance between `a` and `b`
    fn distance(&self, a: &P, b: &P) -> f64;
}

impl<P: ?Sized, F> Metric<P> for F
where
    F: Fn(&P, &P) -> f64,
{
    fn distance(&self, a: &P, b: &P) -> f64 {
        self(a, b)
    }
}

/// A metric that can fail
///
/// In contrast to [Metric] each evaluation returns a `Result`. Errors
/// abort the clustering call and are surfaced verbatim as
/// [Error::MetricFailure](crate::error::Error::MetricFailure).
///
/// Every [Metric] is a `TryMetric` that never fails, so most callers
/// never implement this trait directly.
pub trait TryMetric<P: ?Sized> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The distance between `a` and `b`, or an error
    fn try_distance(&self, a: &P, b: &P) -> Result<f64, Self::Error>;
}

impl<P: ?Sized, M: Metric<P>> TryMetric<P> for M {
    type Error = Infallible;

    fn try_distance(&self, a: &P, b: &P) -> Result<f64, Self::Error> {
        Ok(self.distance(a, b))
    }
}

/// Absolute difference `|a - b|` between signed numbers
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AbsoluteDifference {}

impl<P> Metric<P> for AbsoluteDifference
where
    P: Copy + Signed + Into<f64>,
{
    fn distance(&self, a: &P, b: &P) -> f64 {
        (*a - *b).abs().into()
    }
}

/// Levenshtein edit distance between strings
///
/// The distance between two strings is the minimal number of character
/// insertions, deletions, and substitutions turning one into the other.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EditDistance {}

impl<S: AsRef<str> + ?Sized> Metric<S> for EditDistance {
    fn distance(&self, a: &S, b: &S) -> f64 {
        let d: u32 = distances::strings::levenshtein(a.as_ref(), b.as_ref());
        f64::from(d)
    }
}

/// Metric between items addressed by their position in a slice
///
/// This is the only place where raw metric values enter the crate:
/// errors are boxed into [Error::MetricFailure], values that are no
/// distance are rejected as [Error::InvalidMetric], and everything else
/// becomes a totally ordered [N64].
pub(crate) struct IndexedMetric<'a, P, M> {
    items: &'a [P],
    metric: &'a M,
}

impl<'a, P, M: TryMetric<P>> IndexedMetric<'a, P, M> {
    pub(crate) fn new(items: &'a [P], metric: &'a M) -> Self {
        Self { items, metric }
    }

    pub(crate) fn distance(&self, a: usize, b: usize) -> Result<N64, Error> {
        let d = self
            .metric
            .try_distance(&self.items[a], &self.items[b])
            .map_err(|err| Error::MetricFailure(Box::new(err)))?;
        if !d.is_finite() || d < 0. {
            return Err(Error::InvalidMetric { a, b, value: d });
        }
        Ok(n64(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abs_difference() {
        let d = AbsoluteDifference::default();
        assert_eq!(d.distance(&-1.5, &2.5), 4.);
        assert_eq!(d.distance(&3i32, &3i32), 0.);
    }

    #[test]
    fn closures_are_metrics() {
        let d = |a: &f64, b: &f64| (a - b).abs();
        assert_eq!(d.distance(&1., &3.), 2.);
        assert_eq!(d.try_distance(&1., &3.), Ok(2.));
    }

    #[test]
    fn edit_distances() {
        let d = EditDistance::default();
        assert_eq!(d.distance("cat", "cat"), 0.);
        assert_eq!(d.distance("cat", "bat"), 1.);
        assert_eq!(d.distance("cat", "cot"), 1.);
        assert_eq!(d.distance("bat", "cot"), 2.);
        assert_eq!(d.distance("house", "mouse"), 1.);
        assert_eq!(d.distance("", "mouse"), 5.);
        assert_eq!(d.distance("kitten", "sitting"), 3.);
        assert_eq!(d.distance("flaw", "lawn"), 2.);
    }

    #[test]
    fn indexed_metric_rejects_non_distances() {
        let items = [0., 1.];
        let bad = |_: &f64, _: &f64| -1.;
        let metric = IndexedMetric::new(&items, &bad);
        assert!(matches!(
            metric.distance(0, 1),
            Err(Error::InvalidMetric { value, .. }) if value == -1.
        ));

        let nan = |_: &f64, _: &f64| f64::NAN;
        let metric = IndexedMetric::new(&items, &nan);
        assert!(matches!(
            metric.distance(0, 1),
            Err(Error::InvalidMetric { .. })
        ));
    }
}
