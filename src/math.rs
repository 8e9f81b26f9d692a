use num::Float;

/// Similar to numpy.interp
pub(crate) fn interp<F: Float>(
    x_input: impl IntoIterator<Item = F>,
    coords: impl IntoIterator<Item = (F, F)> + Clone,
) -> Vec<F> {
    x_input
        .into_iter()
        .map(|x| {
            let mut iter = coords.clone().into_iter().enumerate().peekable();
            let mut last = F::zero();

            while let Some((i, (x1, y1))) = iter.next() {
                last = y1;

                // Base cases
                if i == 0 && x < x1 {
                    return y1;
                }

                let Some(&(_, (x2, y2))) = iter.peek() else {
                    continue;
                };

                // Actual interpolation
                if x1 <= x && x <= x2 {
                    if x2 == x1 {
                        return y2;
                    }

                    return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
                }
            }

            last
        })
        .collect()
}

/// Centroid of the piecewise linear function through `(universe[i], membership[i])`.
///
/// Every segment is split into a rectangle and a right triangle whose centroids are known exactly.
/// An empty area yields zero rather than NaN.
pub(crate) fn centroid<F: Float>(universe: &[F], membership: &[F]) -> F {
    let (area, moment) = area_moment(universe, membership);

    if area > F::zero() {
        moment / area
    } else {
        F::zero()
    }
}

pub(crate) fn area_moment<F: Float>(universe: &[F], membership: &[F]) -> (F, F) {
    let two = F::one() + F::one();
    let three = two + F::one();
    let mut area = F::zero();
    let mut moment = F::zero();

    for (x, mu) in universe.windows(2).zip(membership.windows(2)) {
        let base = x[1] - x[0];

        if base <= F::zero() {
            continue;
        }

        let area_rect = F::min(mu[0], mu[1]) * base;
        let center_rect = x[0] + base / two;
        let area_tri = base * F::abs(mu[1] - mu[0]) / two;
        let center_tri = if mu[1] > mu[0] {
            x[0] + two / three * base
        } else {
            x[0] + F::one() / three * base
        };

        area = area + area_rect + area_tri;
        moment = moment + area_rect * center_rect + area_tri * center_tri;
    }

    (area, moment)
}

/// Trapezoid rule areas of each segment under `(universe[i], membership[i])`.
pub(crate) fn segment_areas<F: Float>(universe: &[F], membership: &[F]) -> Vec<F> {
    let two = F::one() + F::one();

    universe
        .windows(2)
        .zip(membership.windows(2))
        .map(|(x, mu)| (mu[0] + mu[1]) * (x[1] - x[0]) / two)
        .collect()
}

#[test]
fn test_interp() {
    let x = [0., 1., 1.5, 2.72, 3.24];
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];

    assert_eq!(
        interp(x, xs.into_iter().zip(ys)),
        vec![3., 3., 2.5, 0.5599999999999996, 0.]
    );

    let x = [2.5, -1., 7.5];
    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];

    assert_eq!(interp(x, xs.into_iter().zip(ys)), vec![4., 0., 2.]);
}

#[test]
fn test_centroid() {
    // Symmetric triangle
    assert!((centroid(&[0., 5., 10.], &[0., 1., 0.]) - 5.).abs() < 1e-12);
    // Right triangle rising towards 3
    assert_eq!(centroid(&[0., 3.], &[0., 1.]), 2.);
    assert_eq!(centroid(&[0., 3.], &[1., 0.]), 1.);
    // Nothing to balance
    assert_eq!(centroid(&[0., 3., 6.], &[0., 0., 0.]), 0.);
    assert_eq!(centroid::<f64>(&[], &[]), 0.);

    let (area, moment) = area_moment(&[0., 2., 4.], &[1., 1., 0.]);

    assert_eq!(area, 3.);
    assert!((moment / area - 14. / 9.).abs() < 1e-12);
    assert_eq!(segment_areas(&[0., 2., 4.], &[1., 1., 0.]), vec![2., 1.]);
}
