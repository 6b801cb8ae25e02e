use log::debug;
use noisy_float::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use crate::error::{Error, InvalidParameter};

/// A vantage point tree over item indices
///
/// The tree never sees items, only their positions `0..npoints` in the
/// caller's collection and a distance function on those positions. All
/// nodes are stored in a single vector in which every subtree occupies
/// a contiguous slice. The first entry of a partitioned slice is the
/// vantage point; the distances of all other entries to it decide
/// whether they belong to the inner or the outer child slice. Slices
/// that are at most `bucket_size` long are kept as flat buckets.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct VPTree {
    nodes: Vec<Node>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
struct Node {
    item: usize,
    children: Option<Children>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
struct Children {
    radius: N64,
    outside_offset: usize,
}

impl VPTree {
    /// Build a tree over the indices `0..npoints`
    ///
    /// `dist` returns the distance between two indexed items.
    /// Construction evaluates it Θ(n log n) times in expectation and
    /// fails with the first error it reports. `seed` fixes the vantage
    /// point choices, so builds with equal arguments yield equal trees.
    pub fn build<D>(
        npoints: usize,
        bucket_size: usize,
        seed: u64,
        dist: &mut D,
    ) -> Result<Self, Error>
    where
        D: FnMut(usize, usize) -> Result<N64, Error>,
    {
        let mut nodes = Vec::from_iter((0..npoints).map(|item| {
            // first tuple element is scratch space for distances
            (n64(0.), Node {
                item,
                children: None,
            })
        }));
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);
        let bucket_size = std::cmp::max(bucket_size, 1);
        Self::build_subtree(&mut nodes, bucket_size, &mut rng, dist)?;
        debug!("built vantage point tree over {npoints} items");
        let nodes = nodes.into_iter().map(|(_d, node)| node).collect();
        Ok(Self { nodes })
    }

    // Recursively partition a subtree slice
    //
    // 1. Draw a vantage point from the slice and swap it to the front.
    //
    // 2. Calculate the distances of all other slice members to the
    //    vantage point. This is the only step consulting the metric.
    //
    // 3. Move the members with less than the median distance in front
    //    of the members with more than the median distance. Members at
    //    exactly the median distance are split by index, larger indices
    //    outward, so the two sides stay balanced under ties. The stored
    //    radius is the smallest distance on the outer side.
    //
    // Slices up to `bucket_size` are left as unpartitioned buckets.
    fn build_subtree<D>(
        pts: &mut [(N64, Node)],
        bucket_size: usize,
        rng: &mut Xoshiro256Plus,
        dist: &mut D,
    ) -> Result<(), Error>
    where
        D: FnMut(usize, usize) -> Result<N64, Error>,
    {
        if pts.len() <= bucket_size {
            return Ok(());
        }
        let vantage = rng.gen_range(0..pts.len());
        pts.swap(0, vantage);
        let (vp, rest) = pts.split_first_mut().unwrap();
        for (d, pt) in rest.iter_mut() {
            *d = dist(vp.1.item, pt.item)?;
        }
        let median = rest.len() / 2;
        rest.select_nth_unstable_by(median, |a, b| {
            (a.0, a.1.item).cmp(&(b.0, b.1.item))
        });
        vp.1.children = Some(Children {
            radius: rest[median].0,
            outside_offset: median,
        });
        let (inside, outside) = rest.split_at_mut(median);
        Self::build_subtree(inside, bucket_size, rng, dist)?;
        Self::build_subtree(outside, bucket_size, rng, dist)
    }

    /// All items within distance `radius` of the item at `point`
    ///
    /// `point` itself is always part of the result. The returned
    /// indices are unique but in no particular order. A negative
    /// `radius` is rejected as an invalid parameter.
    pub fn within<D>(
        &self,
        point: usize,
        radius: N64,
        dist: &mut D,
    ) -> Result<Vec<usize>, Error>
    where
        D: FnMut(usize, usize) -> Result<N64, Error>,
    {
        if radius < n64(0.) {
            return Err(InvalidParameter::Epsilon(radius.raw()).into());
        }
        let mut found = Vec::new();
        Self::within_subtree(&self.nodes, point, radius, dist, &mut found)?;
        Ok(found)
    }

    fn within_subtree<D>(
        subtree: &[Node],
        point: usize,
        eps: N64,
        dist: &mut D,
        found: &mut Vec<usize>,
    ) -> Result<(), Error>
    where
        D: FnMut(usize, usize) -> Result<N64, Error>,
    {
        let Some((vp, rest)) = subtree.split_first() else {
            return Ok(());
        };
        let d = dist(point, vp.item)?;
        if d <= eps {
            found.push(vp.item);
        }
        if let Some(children) = &vp.children {
            let (inside, outside) = rest.split_at(children.outside_offset);
            // some inner member may be close enough to the query
            if d - eps <= children.radius {
                Self::within_subtree(inside, point, eps, dist, found)?;
            }
            // `>=` instead of `>`: members at exactly the median
            // distance can sit on the outer side
            if d + eps >= children.radius {
                Self::within_subtree(outside, point, eps, dist, found)?;
            }
        } else {
            // bucket, the remaining members have to be checked one by one
            for node in rest {
                if dist(point, node.item)? <= eps {
                    found.push(node.item);
                }
            }
        }
        Ok(())
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree indexes no items at all
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::metric::{EditDistance, Metric};

    use rand::seq::SliceRandom;
    use rayon::prelude::*;

    fn log_init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn abs_diff(
        items: &[f64],
    ) -> impl FnMut(usize, usize) -> Result<N64, Error> + '_ {
        |a, b| Ok(n64((items[a] - items[b]).abs()))
    }

    fn naive_within(items: &[f64], point: usize, eps: f64) -> Vec<usize> {
        (0..items.len())
            .filter(|&i| (items[i] - items[point]).abs() <= eps)
            .collect()
    }

    #[test]
    fn empty() {
        log_init();

        let tree = VPTree::build(0, 1, 0, &mut |_, _| Ok(n64(0.))).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn queries_match_naive_search() {
        log_init();

        let items = [0., 1., 2., 10., 11., 12., -3., 7.5, 2., 100.];
        for bucket_size in [1, 2, 4, 16] {
            let tree = VPTree::build(
                items.len(),
                bucket_size,
                0,
                &mut abs_diff(&items),
            )
            .unwrap();
            assert_eq!(tree.len(), items.len());
            for point in 0..items.len() {
                for eps in [0., 0.5, 1., 1.5, 2.5, 10., 1000.] {
                    let mut found = tree
                        .within(point, n64(eps), &mut abs_diff(&items))
                        .unwrap();
                    found.sort_unstable();
                    assert_eq!(found, naive_within(&items, point, eps));
                }
            }
        }
    }

    #[test]
    fn zero_radius_finds_duplicates() {
        log_init();

        let items = [1., 5., 1., 3., 1.];
        let tree =
            VPTree::build(items.len(), 1, 0, &mut abs_diff(&items)).unwrap();
        let mut found =
            tree.within(0, n64(0.), &mut abs_diff(&items)).unwrap();
        found.sort_unstable();
        assert_eq!(found, [0, 2, 4]);
    }

    #[test]
    fn negative_radius_is_rejected() {
        log_init();

        let items = [0., 1.];
        let tree =
            VPTree::build(items.len(), 1, 0, &mut abs_diff(&items)).unwrap();
        let res = tree.within(0, n64(-1.), &mut abs_diff(&items));
        assert!(matches!(
            res,
            Err(Error::InvalidParameter(InvalidParameter::Epsilon(_)))
        ));
    }

    #[test]
    fn same_seed_same_tree() {
        log_init();

        let items = [3., 1., 4., 1., 5., 9., 2., 6.];
        let tree = VPTree::build(items.len(), 1, 42, &mut abs_diff(&items));
        let again = VPTree::build(items.len(), 1, 42, &mut abs_diff(&items));
        assert_eq!(tree.unwrap(), again.unwrap());
    }

    #[test]
    fn build_propagates_errors() {
        log_init();

        let res = VPTree::build(3, 1, 0, &mut |a, b| {
            Err(Error::InvalidMetric {
                a,
                b,
                value: f64::NAN,
            })
        });
        assert!(matches!(res, Err(Error::InvalidMetric { .. })));
    }

    #[test]
    fn string_queries_match_naive_search() {
        log_init();

        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        let alphabet = ['a', 'b', 'c', 'd'];
        let items: Vec<String> = (0..200)
            .map(|_| {
                let len = rng.gen_range(0..=8);
                (0..len)
                    .map(|_| *alphabet.choose(&mut rng).unwrap())
                    .collect()
            })
            .collect();
        let metric = EditDistance::default();

        let mut dist =
            |a: usize, b: usize| Ok(n64(metric.distance(&items[a], &items[b])));
        let tree = VPTree::build(items.len(), 4, 0, &mut dist).unwrap();

        (0..items.len()).into_par_iter().for_each(|point| {
            for eps in [0., 1., 2., 3., 5.] {
                let mut dist = |a: usize, b: usize| {
                    Ok(n64(metric.distance(&items[a], &items[b])))
                };
                let mut found =
                    tree.within(point, n64(eps), &mut dist).unwrap();
                found.sort_unstable();
                let expected: Vec<_> = (0..items.len())
                    .filter(|&i| {
                        metric.distance(&items[i], &items[point]) <= eps
                    })
                    .collect();
                assert_eq!(found, expected, "point {point}, eps {eps}");
            }
        });
    }
}
