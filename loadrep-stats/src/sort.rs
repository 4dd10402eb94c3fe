/// Stable ascending sort of `primary` that applies the identical
/// permutation to `secondary`, keeping `(primary[i], secondary[i])`
/// pairs together. Callers guarantee finite values.
///
/// # Panics
/// Panics if the slices differ in length.
pub fn sort_paired(primary: &mut [f64], secondary: &mut [f64]) {
    assert_eq!(
        primary.len(),
        secondary.len(),
        "paired sort requires equal-length slices"
    );

    let mut pairs: Vec<(f64, f64)> = primary
        .iter()
        .copied()
        .zip(secondary.iter().copied())
        .collect();
    // Stable sort on the primary key only, so tied primaries keep their
    // secondary order.
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (i, (p, s)) in pairs.into_iter().enumerate() {
        primary[i] = p;
        secondary[i] = s;
    }
}
